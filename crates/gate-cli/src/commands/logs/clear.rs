use anyhow::bail;
use gate_store::LogStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ClearResponse {
    cleared: usize,
    store: String,
}

pub async fn run(yes: bool, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if !yes {
        bail!("refusing to delete every check-in without --yes");
    }

    let cleared = ctx.store.list_all().await?.len();
    ctx.store.clear_all().await?;
    tracing::info!(cleared, "check-in log cleared");

    output(
        &ClearResponse {
            cleared,
            store: ctx.store.describe(),
        },
        flags.format,
    )
}
