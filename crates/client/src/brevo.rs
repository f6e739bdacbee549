//! Brevo campaign client: campaign listing and the recipient export flow
//! (request job → settle → poll once → download CSV).

use std::thread;
use std::time::Duration;

use mailbridge_recon::{load_recipient_rows, Campaign, RecipientRecord};

use crate::error::ClientError;
use crate::http::{build_http, send_json, send_text};

const BREVO_API_BASE: &str = "https://api.brevo.com";
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Delay between requesting an export job and polling its status. The
/// platform needs a moment to materialize the file; tests set this to zero.
const EXPORT_SETTLE_DELAY: Duration = Duration::from_secs(3);

pub struct BrevoClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    settle_delay: Duration,
}

impl BrevoClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BREVO_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: build_http(HTTP_TIMEOUT),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            settle_delay: EXPORT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// List sent classic campaigns.
    pub fn list_campaigns(&self, limit: u32, offset: u32) -> Result<Vec<Campaign>, ClientError> {
        let url = format!("{}/v3/emailCampaigns", self.base_url);
        let body = send_json(
            self.http
                .get(&url)
                .header("api-key", &self.api_key)
                .query(&[
                    ("type", "classic".to_string()),
                    ("status", "sent".to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ]),
            "Brevo",
        )?;

        // With zero matches the campaigns array is omitted.
        let Some(items) = body["campaigns"].as_array() else {
            return Ok(Vec::new());
        };

        let mut campaigns = Vec::with_capacity(items.len());
        for item in items {
            let id = item["id"].as_i64().ok_or_else(|| {
                ClientError::Parse("Brevo: campaign missing 'id' field".into())
            })?;
            campaigns.push(Campaign {
                id,
                name: item["name"].as_str().unwrap_or("").to_string(),
                sent_date: item["sentDate"].as_str().unwrap_or("").to_string(),
            });
        }
        Ok(campaigns)
    }

    /// Export one campaign's recipients and parse the resulting CSV.
    ///
    /// Issues at least three remote calls (job request, status poll, file
    /// download) and sleeps the settle delay in between — batch callers see
    /// latency linear in campaign count. The status is polled exactly once;
    /// a job that has not finished by then surfaces as a parse error rather
    /// than being waited on.
    pub fn export_recipients(
        &self,
        campaign_id: i64,
    ) -> Result<Vec<RecipientRecord>, ClientError> {
        let url = format!(
            "{}/v3/emailCampaigns/{campaign_id}/exportRecipients",
            self.base_url,
        );
        let body = send_json(
            self.http
                .post(&url)
                .header("api-key", &self.api_key)
                .json(&serde_json::json!({ "recipientsType": "all" })),
            "Brevo",
        )
        .map_err(|e| match e {
            // A non-auth 4xx means the platform refused this export job.
            // Auth failures and 5xx/network errors keep their classification.
            ClientError::Http(code, msg)
                if (400..500).contains(&code) && code != 401 && code != 403 =>
            {
                ClientError::ExportRejected(format!("campaign {campaign_id}: HTTP {code}: {msg}"))
            }
            other => other,
        })?;

        let process_id = body["processId"].as_i64().ok_or_else(|| {
            ClientError::Parse(format!(
                "Brevo: export response for campaign {campaign_id} missing 'processId'"
            ))
        })?;

        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }

        let url = format!("{}/v3/processes/{process_id}", self.base_url);
        let process = send_json(
            self.http.get(&url).header("api-key", &self.api_key),
            "Brevo",
        )?;

        let Some(export_url) = process["export_url"].as_str() else {
            let status = process["status"].as_str().unwrap_or("unknown");
            return Err(ClientError::Parse(format!(
                "Brevo: export process {process_id} not finished (status: {status})"
            )));
        };

        let csv_data = send_text(self.http.get(export_url), "Brevo")?;
        load_recipient_rows(&csv_data)
            .map_err(|e| ClientError::Parse(format!("Brevo: campaign {campaign_id}: {e}")))
    }
}

// ── Tests ───────────────────────────────────────────────────────────
