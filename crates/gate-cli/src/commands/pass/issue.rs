use chrono::{DateTime, Utc};
use gate_core::clock::SystemClock;
use gate_core::pass::{PassPayload, VisitorDetails, issue_pass};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PassIssueArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssuedPass {
    pass: PassPayload,
    /// Text to render as the visitor's QR code.
    encoded: String,
    valid_until: Option<DateTime<Utc>>,
}

pub fn run(args: &PassIssueArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let pass = issue_pass(&visitor_details(args), &SystemClock)?;
    let encoded = pass.encode()?;

    if args.encoded_only {
        println!("{encoded}");
        return Ok(());
    }

    let valid_until = DateTime::from_timestamp_millis(pass.valid_until_millis());
    output(
        &IssuedPass {
            pass,
            encoded,
            valid_until,
        },
        flags.format,
    )
}

fn visitor_details(args: &PassIssueArgs) -> VisitorDetails {
    VisitorDetails {
        full_name: args.name.clone(),
        phone_number: args.phone.clone(),
        id_number: args.id.clone(),
        vehicle_plate: args.plate.clone(),
        block_code: args.block.clone(),
        lot_code: args.lot.clone(),
        unit_code: args.unit.clone(),
    }
}
