use std::collections::BTreeMap;

use anyhow::anyhow;
use gate_core::pass::PassPayload;
use gate_core::record::CheckInRecord;
use gate_core::validity::Verdict;
use schemars::schema_for;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty))?);
    };
}

/// Every wire type a station exchanges, by name.
fn schemas() -> anyhow::Result<BTreeMap<&'static str, Value>> {
    let mut schemas = BTreeMap::new();
    register!(schemas, "pass_payload", PassPayload);
    register!(schemas, "check_in_record", CheckInRecord);
    register!(schemas, "verdict", Verdict);
    Ok(schemas)
}

/// Handle `gate schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut schemas = schemas()?;
    let Some(name) = args.type_name.as_deref() else {
        return output(&schemas.keys().collect::<Vec<_>>(), flags.format);
    };

    let key = name.replace('-', "_");
    let schema = schemas.remove(key.as_str()).ok_or_else(|| {
        anyhow!(
            "unknown schema '{name}' (available: {})",
            schemas.keys().copied().collect::<Vec<_>>().join(", ")
        )
    })?;
    output(&schema, flags.format)
}
