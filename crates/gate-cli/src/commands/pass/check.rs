use anyhow::Context;
use gate_core::clock::{Clock, SystemClock};
use gate_core::validity::{Verdict, evaluate};
use serde::Serialize;
use tokio::io::AsyncReadExt;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PassCheckArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckResponse {
    #[serde(flatten)]
    verdict: Verdict,
    evaluated_at_millis: i64,
}

pub async fn run(args: &PassCheckArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let raw = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read pass file {path}"))?,
        (None, None) => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read pass text from stdin")?;
            buf
        }
    };

    let now = args.at.unwrap_or_else(|| SystemClock.now_millis());
    output(
        &CheckResponse {
            verdict: evaluate(raw.trim(), now),
            evaluated_at_millis: now,
        },
        flags.format,
    )
}
