//! The `campaigns` command: list sent campaigns from the email platform.

use std::io::{self, Write};

use mailbridge_client::{BrevoClient, SessionCache};

use crate::CliError;

pub fn campaigns(
    brevo: &BrevoClient,
    cache: &mut SessionCache,
    limit: u32,
    offset: u32,
    json: bool,
) -> Result<(), CliError> {
    let campaigns = cache
        .campaigns(|| brevo.list_campaigns(limit, offset))
        .map_err(|e| CliError::remote("Brevo", e))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &campaigns)
            .map_err(|e| CliError::io(e.to_string()))?;
        writeln!(out).map_err(|e| CliError::io(e.to_string()))?;
        return Ok(());
    }

    writeln!(out, "{:>10}  {:<40}  {}", "ID", "NAME", "SENT")
        .map_err(|e| CliError::io(e.to_string()))?;
    for campaign in &campaigns {
        writeln!(
            out,
            "{:>10}  {:<40}  {}",
            campaign.id, campaign.name, campaign.sent_date,
        )
        .map_err(|e| CliError::io(e.to_string()))?;
    }

    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────
