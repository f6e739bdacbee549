use crate::error::ReconError;
use crate::model::RecipientRecord;

// Column names as they appear in the platform's recipient export.
const COL_CAMPAIGN_ID: &str = "Campaign ID";
const COL_CAMPAIGN_NAME: &str = "Campaign Name";
const COL_EMAIL: &str = "Email_ID";
const COL_OPEN_COUNT: &str = "Open_Count";
const COL_CLICKED_COUNT: &str = "Clicked_Links_Count";
const COL_SOFT_BOUNCE: &str = "Soft_Bounce_Date";
const COL_HARD_BOUNCE: &str = "Hard_Bounce_Date";
const COL_UNSUBSCRIBE: &str = "Unsubscribe_Date";

/// Parse a recipient export (semicolon-delimited, header row) into typed rows.
///
/// Columns are resolved by header name, not position — exports carry extra
/// columns we ignore. Empty date cells become `None`.
pub fn load_recipient_rows(csv_data: &str) -> Result<Vec<RecipientRecord>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn { column: name.into() })
    };

    let campaign_id_idx = idx(COL_CAMPAIGN_ID)?;
    let campaign_name_idx = idx(COL_CAMPAIGN_NAME)?;
    let email_idx = idx(COL_EMAIL)?;
    let open_idx = idx(COL_OPEN_COUNT)?;
    let clicked_idx = idx(COL_CLICKED_COUNT)?;
    let soft_bounce_idx = idx(COL_SOFT_BOUNCE)?;
    let hard_bounce_idx = idx(COL_HARD_BOUNCE)?;
    let unsubscribe_idx = idx(COL_UNSUBSCRIBE)?;

    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Csv(e.to_string()))?;

        let email = record.get(email_idx).unwrap_or("").trim().to_string();

        let parse_count = |i: usize, column: &str| -> Result<u32, ReconError> {
            let value = record.get(i).unwrap_or("").trim();
            if value.is_empty() {
                return Ok(0);
            }
            value.parse().map_err(|_| ReconError::CountParse {
                email: email.clone(),
                column: column.into(),
                value: value.into(),
            })
        };

        let opt_date = |i: usize| -> Option<String> {
            let value = record.get(i).unwrap_or("").trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        let campaign_id = record
            .get(campaign_id_idx)
            .unwrap_or("")
            .trim()
            .parse()
            .map_err(|_| ReconError::CountParse {
                email: email.clone(),
                column: COL_CAMPAIGN_ID.into(),
                value: record.get(campaign_id_idx).unwrap_or("").into(),
            })?;

        // Counts must be parsed before `email` moves into the record.
        let open_count = parse_count(open_idx, COL_OPEN_COUNT)?;
        let clicked_links_count = parse_count(clicked_idx, COL_CLICKED_COUNT)?;

        rows.push(RecipientRecord {
            campaign_id,
            campaign_name: record.get(campaign_name_idx).unwrap_or("").trim().to_string(),
            email,
            open_count,
            clicked_links_count,
            soft_bounce_date: opt_date(soft_bounce_idx),
            hard_bounce_date: opt_date(hard_bounce_idx),
            unsubscribe_date: opt_date(unsubscribe_idx),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Campaign ID;Campaign Name;Email_ID;Open_Count;Clicked_Links_Count;Soft_Bounce_Date;Hard_Bounce_Date;Unsubscribe_Date";

    #[test]
    fn load_basic() {
        let csv = format!(
            "{HEADER}\n\
             7;Spring Launch;Alice@Example.com;2;1;;;\n\
             7;Spring Launch;bob@example.com;0;0;2023-04-02 10:11:12;;2023-04-03 08:00:00\n"
        );
        let rows = load_recipient_rows(&csv).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].campaign_id, 7);
        assert_eq!(rows[0].campaign_name, "Spring Launch");
        // Raw email preserved; normalization is the engine's job
        assert_eq!(rows[0].email, "Alice@Example.com");
        assert_eq!(rows[0].open_count, 2);
        assert_eq!(rows[0].clicked_links_count, 1);
        assert!(rows[0].soft_bounce_date.is_none());

        assert_eq!(rows[1].soft_bounce_date.as_deref(), Some("2023-04-02 10:11:12"));
        assert!(rows[1].hard_bounce_date.is_none());
        assert_eq!(rows[1].unsubscribe_date.as_deref(), Some("2023-04-03 08:00:00"));
    }

    #[test]
    fn load_ignores_extra_columns() {
        let csv = "Email_ID;Extra;Campaign ID;Campaign Name;Open_Count;Clicked_Links_Count;Soft_Bounce_Date;Hard_Bounce_Date;Unsubscribe_Date\n\
                   a@b.com;x;1;C;0;0;;;\n";
        let rows = load_recipient_rows(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "a@b.com");
    }

    #[test]
    fn load_missing_column() {
        let csv = "Campaign ID;Campaign Name;Email_ID\n1;C;a@b.com\n";
        let err = load_recipient_rows(csv).unwrap_err();
        match err {
            ReconError::MissingColumn { column } => assert_eq!(column, "Open_Count"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_empty_counts_default_to_zero() {
        let csv = format!("{HEADER}\n3;C;a@b.com;;;;;\n");
        let rows = load_recipient_rows(&csv).unwrap();
        assert_eq!(rows[0].open_count, 0);
        assert_eq!(rows[0].clicked_links_count, 0);
    }

    #[test]
    fn load_bad_count_is_typed_error() {
        let csv = format!("{HEADER}\n3;C;a@b.com;many;0;;;\n");
        let err = load_recipient_rows(&csv).unwrap_err();
        match err {
            ReconError::CountParse { email, column, value } => {
                assert_eq!(email, "a@b.com");
                assert_eq!(column, "Open_Count");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_bad_clicked_count_carries_email_context() {
        let csv = format!("{HEADER}\n3;C;a@b.com;1;lots;;;\n");
        let err = load_recipient_rows(&csv).unwrap_err();
        match err {
            ReconError::CountParse { email, column, value } => {
                assert_eq!(email, "a@b.com");
                assert_eq!(column, "Clicked_Links_Count");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_empty_input_is_empty() {
        let rows = load_recipient_rows(&format!("{HEADER}\n")).unwrap();
        assert!(rows.is_empty());
    }
}
