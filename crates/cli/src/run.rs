//! The `run` command: the full pipeline. Export each selected campaign's
//! recipients, page through CRM contacts, reconcile, aggregate, and write
//! the requested outputs.

use std::io::{self, Write};
use std::path::PathBuf;

use mailbridge_client::{BrevoClient, PipedriveClient, SessionCache};
use mailbridge_io::{to_csv, to_workbook};
use mailbridge_recon::{aggregate, reconcile, Contact, ReconFilters, RecipientRecord};

use crate::CliError;

pub struct RunConfig {
    pub campaigns: Vec<i64>,
    pub filters: ReconFilters,
    pub custom_field: Option<String>,
    pub page_size: u32,
    pub max_contacts: Option<u32>,
    pub out_csv: Option<PathBuf>,
    pub out_xlsx: Option<PathBuf>,
    pub quiet: bool,
}

#[derive(Debug)]
pub struct RunSummary {
    pub reconciled_rows: usize,
    pub report_campaigns: usize,
    pub contacts_fetched: usize,
}

pub fn run(
    cfg: &RunConfig,
    brevo: &BrevoClient,
    pipedrive: &PipedriveClient,
    cache: &mut SessionCache,
) -> Result<RunSummary, CliError> {
    if cfg.campaigns.is_empty() {
        return Err(CliError::args("no campaigns selected")
            .with_hint("pass --campaign at least once; `mailbridge campaigns` lists candidates"));
    }

    // Resolve the custom field's opaque key once, before any export work.
    let custom_key = match &cfg.custom_field {
        Some(name) => {
            let field = cache
                .person_field(name, || pipedrive.lookup_person_field(name))
                .map_err(|e| CliError::remote("Pipedrive", e))?;
            match field {
                Some(field) => Some(field.key),
                None => {
                    return Err(CliError::args(format!(
                        "custom field {name:?} does not exist in the CRM"
                    )))
                }
            }
        }
        None => None,
    };

    let mut records: Vec<RecipientRecord> = Vec::new();
    for &campaign_id in &cfg.campaigns {
        note(cfg.quiet, &format!("exporting recipients for campaign {campaign_id}"));
        let rows = cache
            .export(campaign_id, || brevo.export_recipients(campaign_id))
            .map_err(|e| CliError::remote("Brevo", e))?;
        note(cfg.quiet, &format!("  {} recipient rows", rows.len()));
        records.extend(rows);
    }

    let mut contacts: Vec<Contact> = Vec::new();
    let mut start = 0u32;
    loop {
        let page = cache
            .contacts_page(start, cfg.page_size, || {
                pipedrive.fetch_contacts(start, cfg.page_size, custom_key.as_deref())
            })
            .map_err(|e| CliError::remote("Pipedrive", e))?;
        if page.is_empty() {
            break;
        }
        contacts.extend(page);
        if let Some(max) = cfg.max_contacts {
            if contacts.len() as u32 >= max {
                contacts.truncate(max as usize);
                break;
            }
        }
        start += cfg.page_size;
    }
    let contacts_fetched = contacts.len();
    note(cfg.quiet, &format!("{contacts_fetched} CRM contacts fetched"));

    let rows = reconcile(&records, &contacts, &cfg.filters);
    let report = aggregate(&rows);
    note(
        cfg.quiet,
        &format!("{} reconciled rows across {} campaigns", rows.len(), report.len()),
    );

    let custom = cfg.custom_field.as_deref();

    if let Some(path) = &cfg.out_csv {
        let bytes = to_csv(&rows, custom).map_err(|e| CliError::io(e.to_string()))?;
        std::fs::write(path, &bytes)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
        note(cfg.quiet, &format!("wrote {}", path.display()));
    }

    if let Some(path) = &cfg.out_xlsx {
        let bytes =
            to_workbook(&rows, &report, custom).map_err(|e| CliError::io(e.to_string()))?;
        std::fs::write(path, &bytes)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
        note(cfg.quiet, &format!("wrote {}", path.display()));
    }

    // With no output flag the merged CSV goes to stdout.
    if cfg.out_csv.is_none() && cfg.out_xlsx.is_none() {
        let bytes = to_csv(&rows, custom).map_err(|e| CliError::io(e.to_string()))?;
        io::stdout()
            .write_all(&bytes)
            .map_err(|e| CliError::io(e.to_string()))?;
    }

    Ok(RunSummary {
        reconciled_rows: rows.len(),
        report_campaigns: report.len(),
        contacts_fetched,
    })
}

fn note(quiet: bool, msg: &str) {
    if !quiet && atty::is(atty::Stream::Stderr) {
        eprintln!("{msg}");
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_campaign_selection_is_usage_error() {
        let cfg = RunConfig {
            campaigns: Vec::new(),
            filters: ReconFilters::default(),
            custom_field: None,
            page_size: 500,
            max_contacts: None,
            out_csv: None,
            out_xlsx: None,
            quiet: true,
        };
        let brevo = BrevoClient::with_base_url("k".into(), "http://127.0.0.1:1".into());
        let pipedrive = PipedriveClient::new("t".into(), "http://127.0.0.1:1".into());
        let mut cache = SessionCache::new();

        let err = run(&cfg, &brevo, &pipedrive, &mut cache).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
        assert!(err.message.contains("no campaigns selected"));
    }
}
