//! End-to-end pipeline test against mock Brevo and Pipedrive servers:
//! two campaigns with overlapping recipients, one CRM contact page, the
//! internal-domain filter, and both output files.

use std::time::Duration;

use httpmock::prelude::*;

use mailbridge_cli::run::{run, RunConfig};
use mailbridge_client::{BrevoClient, PipedriveClient, SessionCache};
use mailbridge_recon::ReconFilters;

const EXPORT_HEADER: &str = "Campaign ID;Campaign Name;Email_ID;Open_Count;Clicked_Links_Count;Soft_Bounce_Date;Hard_Bounce_Date;Unsubscribe_Date";

fn mock_export(server: &MockServer, campaign_id: i64, process_id: i64, body: String) {
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("/v3/emailCampaigns/{campaign_id}/exportRecipients"));
        then.status(202)
            .json_body(serde_json::json!({ "processId": process_id }));
    });
    server.mock(|when, then| {
        when.method(GET).path(format!("/v3/processes/{process_id}"));
        then.status(200).json_body(serde_json::json!({
            "id": process_id,
            "status": "completed",
            "export_url": server.url(format!("/exports/{process_id}.csv"))
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path(format!("/exports/{process_id}.csv"));
        then.status(200).body(body);
    });
}

fn person(id: i64, name: &str, first: &str, email: &str, segment: Option<&str>) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": id,
        "name": name,
        "first_name": first,
        "email": [{"label": "work", "value": email, "primary": true}],
    });
    if let Some(segment) = segment {
        value["9d2f0f6a"] = serde_json::json!(segment);
    }
    value
}

#[test]
fn full_pipeline_reconciles_two_campaigns() {
    let brevo_server = MockServer::start();
    let crm_server = MockServer::start();

    mock_export(
        &brevo_server,
        7,
        99,
        format!(
            "{EXPORT_HEADER}\n\
             7;Spring;a@b.com;1;0;;;\n\
             7;Spring;b@b.com;1;1;;;\n\
             7;Spring;c@b.com;0;0;2023-04-02 10:00:00;;\n\
             7;Spring;d@b.com;0;0;;;2023-04-03 08:00:00\n\
             7;Spring;e@corp.example;0;0;;;\n"
        ),
    );
    mock_export(
        &brevo_server,
        9,
        88,
        format!(
            "{EXPORT_HEADER}\n\
             9;Summer;A@B.com;0;0;;2023-05-02 09:00:00;\n\
             9;Summer;b@b.com;0;0;;;\n\
             9;Summer;f@b.com;2;0;;;\n\
             9;Summer;g@b.com;0;0;;;\n\
             9;Summer;h@b.com;1;1;;;\n"
        ),
    );

    crm_server.mock(|when, then| {
        when.method(GET).path("/api/v1/personFields");
        then.status(200).json_body(serde_json::json!({
            "data": [
                {"name": "Segment", "key": "9d2f0f6a", "field_type": "varchar"}
            ]
        }));
    });
    crm_server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/persons")
            .query_param("start", "0");
        then.status(200).json_body(serde_json::json!({
            "data": [
                person(1, "Ada Lovelace", "Ada", "a@b.com", Some("Customer")),
                person(2, "Carol Smith", "Carol", "c@b.com", None),
                person(3, "Fred Jones", "Fred", "f@b.com", Some("Prospect")),
            ]
        }));
    });
    crm_server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/persons")
            .query_param("start", "500");
        then.status(200)
            .json_body(serde_json::json!({ "data": serde_json::Value::Null }));
    });

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("merged.csv");
    let xlsx_path = dir.path().join("report.xlsx");

    let cfg = RunConfig {
        campaigns: vec![7, 9],
        filters: ReconFilters {
            drop_unmatched: false,
            internal_domain: Some("Corp.Example".to_string()),
        },
        custom_field: Some("Segment".to_string()),
        page_size: 500,
        max_contacts: None,
        out_csv: Some(csv_path.clone()),
        out_xlsx: Some(xlsx_path.clone()),
        quiet: true,
    };

    let brevo = BrevoClient::with_base_url("key".into(), brevo_server.base_url())
        .with_settle_delay(Duration::ZERO);
    let pipedrive = PipedriveClient::new("tok".into(), crm_server.base_url());
    let mut cache = SessionCache::new();

    let summary = run(&cfg, &brevo, &pipedrive, &mut cache).unwrap();

    // 10 export rows, 2 duplicate emails, 1 internal-domain row dropped.
    assert_eq!(summary.reconciled_rows, 7);
    assert_eq!(summary.report_campaigns, 2);
    assert_eq!(summary.contacts_fetched, 3);

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 8, "header plus seven rows:\n{csv}");
    assert_eq!(
        lines[0],
        "id,name,first_name,Segment,email,engagement_status,blacklist,campaign_id,campaign_name"
    );
    // a@b.com appears in both campaigns; campaign 9 (hard bounce) wins.
    assert_eq!(
        lines[1],
        "1,Ada Lovelace,Ada,Customer,a@b.com,Hard Bounce,false,9,Summer"
    );
    assert!(!csv.contains("e@corp.example"), "internal domain row leaked:\n{csv}");
    // d@b.com unsubscribed: blacklisted, status stays default.
    assert!(csv.contains("d@b.com,No Reaction,true,7,Spring"), "csv:\n{csv}");

    let xlsx = std::fs::read(&xlsx_path).unwrap();
    assert_eq!(&xlsx[..4], b"PK\x03\x04");
}

#[test]
fn export_rejection_aborts_the_run() {
    let brevo_server = MockServer::start();
    let crm_server = MockServer::start();

    brevo_server.mock(|when, then| {
        when.method(POST).path("/v3/emailCampaigns/8/exportRecipients");
        then.status(400)
            .json_body(serde_json::json!({"message": "campaign not sent"}));
    });

    let cfg = RunConfig {
        campaigns: vec![8],
        filters: ReconFilters::default(),
        custom_field: None,
        page_size: 500,
        max_contacts: None,
        out_csv: None,
        out_xlsx: None,
        quiet: true,
    };

    let brevo = BrevoClient::with_base_url("key".into(), brevo_server.base_url())
        .with_settle_delay(Duration::ZERO);
    let pipedrive = PipedriveClient::new("tok".into(), crm_server.base_url());
    let mut cache = SessionCache::new();

    let err = run(&cfg, &brevo, &pipedrive, &mut cache).unwrap_err();
    assert_eq!(err.code, mailbridge_cli::exit_codes::EXIT_REMOTE_EXPORT_REJECTED);
    assert!(err.message.contains("campaign 8"), "message: {}", err.message);
}
