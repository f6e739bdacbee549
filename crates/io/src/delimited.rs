//! Flat CSV serialization of the reconciled dataset.
//!
//! # Column contract
//!
//! The order is fixed and consumed downstream; do not reorder:
//! `id, name, first_name, [custom field], email, engagement_status,
//! blacklist, campaign_id, campaign_name`. The custom column appears only
//! when a custom field was configured for the run, headed by the field's
//! display name.

use mailbridge_recon::ReconciledRow;

use crate::error::ExportError;

/// Header row for the data table. The optional custom column sits between
/// `first_name` and `email`, matching the reference layout.
pub fn data_headers(custom_field: Option<&str>) -> Vec<String> {
    let mut headers = vec!["id".to_string(), "name".to_string(), "first_name".to_string()];
    if let Some(name) = custom_field {
        headers.push(name.to_string());
    }
    headers.extend([
        "email".to_string(),
        "engagement_status".to_string(),
        "blacklist".to_string(),
        "campaign_id".to_string(),
        "campaign_name".to_string(),
    ]);
    headers
}

/// One reconciled row in column-contract order. Missing contact fields
/// serialize as empty strings, never as a literal "null".
pub fn data_values(row: &ReconciledRow, custom_field: Option<&str>) -> Vec<String> {
    let mut values = vec![
        row.contact.as_ref().map(|c| c.id.to_string()).unwrap_or_default(),
        row.contact.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
        row.contact.as_ref().map(|c| c.first_name.clone()).unwrap_or_default(),
    ];
    if custom_field.is_some() {
        values.push(
            row.contact
                .as_ref()
                .and_then(|c| c.custom_field.clone())
                .unwrap_or_default(),
        );
    }
    values.extend([
        row.email.clone(),
        row.status.label().to_string(),
        row.blacklisted.to_string(),
        row.campaign_id.to_string(),
        row.campaign_name.clone(),
    ]);
    values
}

/// Serialize reconciled rows as UTF-8, comma-separated, header row first.
pub fn to_csv(
    rows: &[ReconciledRow],
    custom_field: Option<&str>,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(data_headers(custom_field))
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for row in rows {
        writer
            .write_record(data_values(row, custom_field))
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbridge_recon::{ContactFields, EngagementStatus};

    fn row(email: &str, matched: bool) -> ReconciledRow {
        ReconciledRow {
            campaign_id: 7,
            campaign_name: "Spring Launch".into(),
            email: email.into(),
            status: EngagementStatus::Opened,
            blacklisted: false,
            contact: matched.then(|| ContactFields {
                id: 42,
                name: "Ada Lovelace".into(),
                first_name: "Ada".into(),
                custom_field: Some("Customer".into()),
            }),
        }
    }

    #[test]
    fn header_first_fixed_order() {
        let bytes = to_csv(&[row("a@b.com", true)], None).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,name,first_name,email,engagement_status,blacklist,campaign_id,campaign_name",
        );
        assert_eq!(
            lines.next().unwrap(),
            "42,Ada Lovelace,Ada,a@b.com,Opened,false,7,Spring Launch",
        );
    }

    #[test]
    fn custom_column_between_first_name_and_email() {
        let bytes = to_csv(&[row("a@b.com", true)], Some("Segment")).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,name,first_name,Segment,email,engagement_status,blacklist,campaign_id,campaign_name",
        );
        assert!(lines.next().unwrap().contains(",Customer,a@b.com,"));
    }

    #[test]
    fn unmatched_contact_fields_are_empty() {
        let bytes = to_csv(&[row("ghost@b.com", false)], None).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text.lines().nth(1).unwrap(),
            ",,,ghost@b.com,Opened,false,7,Spring Launch",
        );
    }

    #[test]
    fn empty_rows_still_produce_header() {
        let bytes = to_csv(&[], None).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn output_is_byte_identical_across_runs() {
        let rows = vec![row("a@b.com", true), row("c@d.com", false)];
        assert_eq!(
            to_csv(&rows, Some("Segment")).unwrap(),
            to_csv(&rows, Some("Segment")).unwrap(),
        );
    }
}
