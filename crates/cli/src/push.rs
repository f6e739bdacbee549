//! The `push` command: write values from a reconciled CSV back onto CRM
//! person records, mapping option labels to their CRM option ids.

use std::path::Path;
use std::time::Duration;

use mailbridge_client::{PersonField, PersonUpdate, PipedriveClient, SessionCache};

use crate::CliError;

/// Delay between person update requests; keeps the run under the CRM's
/// per-token rate limit.
pub const UPDATE_PACING: Duration = Duration::from_millis(100);

/// One `--map 'CRM Field=csv_column'` argument, parsed.
pub struct FieldMapping {
    pub crm_field: String,
    pub csv_column: String,
}

pub fn parse_mapping(arg: &str) -> Result<FieldMapping, CliError> {
    match arg.split_once('=') {
        Some((field, column)) if !field.trim().is_empty() && !column.trim().is_empty() => {
            Ok(FieldMapping {
                crm_field: field.trim().to_string(),
                csv_column: column.trim().to_string(),
            })
        }
        _ => Err(CliError::args(format!("bad --map value {arg:?}"))
            .with_hint("syntax: --map 'CRM Field=csv_column'")),
    }
}

/// Read `input`, build one update per row that carries a CRM id and at
/// least one mappable value, and push them. Returns the update count.
///
/// Rows without a CRM id (unmatched in the reconcile step), rows with only
/// empty values, and rows whose value is not a known option label are
/// skipped, not errors.
pub fn push(
    pipedrive: &PipedriveClient,
    cache: &mut SessionCache,
    input: &Path,
    mappings: &[FieldMapping],
    pacing: Duration,
    quiet: bool,
) -> Result<usize, CliError> {
    if mappings.is_empty() {
        return Err(CliError::args("no field mappings given")
            .with_hint("pass --map 'CRM Field=csv_column' at least once"));
    }

    let mut resolved: Vec<(&FieldMapping, PersonField)> = Vec::with_capacity(mappings.len());
    for mapping in mappings {
        let field = cache
            .person_field(&mapping.crm_field, || {
                pipedrive.lookup_person_field(&mapping.crm_field)
            })
            .map_err(|e| CliError::remote("Pipedrive", e))?
            .ok_or_else(|| {
                CliError::args(format!(
                    "CRM field {:?} does not exist",
                    mapping.crm_field
                ))
            })?;
        resolved.push((mapping, field));
    }

    let mut reader = csv::Reader::from_path(input)
        .map_err(|e| CliError::io(format!("{}: {e}", input.display())))?;
    let headers = reader
        .headers()
        .map_err(|e| CliError::io(format!("{}: {e}", input.display())))?
        .clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let id_col = position("id")
        .ok_or_else(|| CliError::args("input CSV has no 'id' column"))?;
    let mut columns: Vec<(usize, &PersonField)> = Vec::with_capacity(resolved.len());
    for (mapping, field) in &resolved {
        let col = position(&mapping.csv_column).ok_or_else(|| {
            CliError::args(format!("input CSV has no {:?} column", mapping.csv_column))
        })?;
        columns.push((col, field));
    }

    let mut updates: Vec<PersonUpdate> = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        let record =
            result.map_err(|e| CliError::io(format!("{}: {e}", input.display())))?;

        let id_raw = record.get(id_col).unwrap_or("").trim();
        if id_raw.is_empty() {
            skipped += 1;
            continue;
        }
        let id: i64 = id_raw
            .parse()
            .map_err(|_| CliError::args(format!("bad CRM id {id_raw:?} in input CSV")))?;

        let mut payload = serde_json::Map::new();
        let mut unknown_label = false;
        for (col, field) in &columns {
            let value = record.get(*col).unwrap_or("").trim();
            if value.is_empty() {
                continue;
            }
            if field.options.is_empty() {
                payload.insert(
                    field.key.clone(),
                    serde_json::Value::String(value.to_string()),
                );
            } else {
                match field.options.get(value) {
                    Some(option_id) => {
                        payload.insert(field.key.clone(), serde_json::json!(option_id));
                    }
                    None => unknown_label = true,
                }
            }
        }

        if unknown_label || payload.is_empty() {
            skipped += 1;
            continue;
        }
        updates.push(PersonUpdate {
            id,
            payload: serde_json::Value::Object(payload),
        });
    }

    if skipped > 0 && !quiet && atty::is(atty::Stream::Stderr) {
        eprintln!("note: {skipped} rows skipped (no CRM id, empty values, or unknown option label)");
    }

    pipedrive
        .update_persons_bulk(&updates, pacing)
        .map_err(|e| CliError::remote("Pipedrive", e))
}

// ── Tests ───────────────────────────────────────────────────────────
