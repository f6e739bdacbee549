//! Pipedrive CRM client: paged person listing, person-field lookup, and
//! the bulk write-back path.

use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use mailbridge_recon::Contact;

use crate::error::ClientError;
use crate::http::{build_http, send_json};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A resolved custom person field: its opaque key plus, for enumerated
/// fields, the label → option-id map used when writing values back.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonField {
    pub key: String,
    pub options: BTreeMap<String, i64>,
}

/// One pending person update for the bulk write-back path.
#[derive(Debug, Clone)]
pub struct PersonUpdate {
    pub id: i64,
    pub payload: serde_json::Value,
}

pub struct PipedriveClient {
    http: reqwest::blocking::Client,
    api_token: String,
    base_url: String,
}

impl PipedriveClient {
    pub fn new(api_token: String, base_url: String) -> Self {
        Self {
            http: build_http(HTTP_TIMEOUT),
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch one page of persons.
    ///
    /// Emails are normalized to lower case. Persons without any email entry
    /// are skipped — they cannot participate in the join. When `custom_key`
    /// is set, that raw attribute key's value is carried as the contact's
    /// custom field.
    pub fn fetch_contacts(
        &self,
        start: u32,
        limit: u32,
        custom_key: Option<&str>,
    ) -> Result<Vec<Contact>, ClientError> {
        let url = format!("{}/api/v1/persons", self.base_url);
        let body = send_json(
            self.http.get(&url).query(&[
                ("start", start.to_string()),
                ("limit", limit.to_string()),
                ("api_token", self.api_token.clone()),
            ]),
            "Pipedrive",
        )?;

        // Past the last page the API returns data: null.
        let Some(data) = body["data"].as_array() else {
            return Ok(Vec::new());
        };

        let mut contacts = Vec::with_capacity(data.len());
        for item in data {
            if let Some(contact) = parse_person(item, custom_key)? {
                contacts.push(contact);
            }
        }
        Ok(contacts)
    }

    /// Resolve a custom person field by display name.
    ///
    /// For enumerated fields (anything but varchar/int) the option list is
    /// inverted into a label → id map; plain fields get an empty map.
    /// Returns `Ok(None)` when no field carries that name.
    pub fn lookup_person_field(&self, name: &str) -> Result<Option<PersonField>, ClientError> {
        let url = format!("{}/api/v1/personFields", self.base_url);
        let body = send_json(
            self.http
                .get(&url)
                .query(&[("api_token", self.api_token.clone())]),
            "Pipedrive",
        )?;

        let Some(data) = body["data"].as_array() else {
            return Ok(None);
        };

        for entry in data {
            if entry["name"].as_str() != Some(name) {
                continue;
            }
            let key = entry["key"]
                .as_str()
                .ok_or_else(|| {
                    ClientError::Parse(format!("Pipedrive: field '{name}' has no key"))
                })?
                .to_string();

            let field_type = entry["field_type"].as_str().unwrap_or("");
            let mut options = BTreeMap::new();
            if !matches!(field_type, "varchar" | "int") {
                if let Some(opts) = entry["options"].as_array() {
                    for opt in opts {
                        if let (Some(label), Some(id)) =
                            (opt["label"].as_str(), opt["id"].as_i64())
                        {
                            options.insert(label.to_string(), id);
                        }
                    }
                }
            }
            return Ok(Some(PersonField { key, options }));
        }

        Ok(None)
    }

    /// Update one person with a flat key-value payload.
    pub fn update_person(&self, id: i64, payload: &serde_json::Value) -> Result<(), ClientError> {
        let url = format!("{}/api/v1/persons/{id}", self.base_url);
        send_json(
            self.http
                .put(&url)
                .query(&[("api_token", self.api_token.clone())])
                .json(payload),
            "Pipedrive",
        )?;
        Ok(())
    }

    /// Push a batch of person updates with a fixed pacing delay between
    /// requests. Returns the number of persons updated; stops on the first
    /// failure.
    pub fn update_persons_bulk(
        &self,
        updates: &[PersonUpdate],
        pacing: Duration,
    ) -> Result<usize, ClientError> {
        for (i, update) in updates.iter().enumerate() {
            if i > 0 && !pacing.is_zero() {
                thread::sleep(pacing);
            }
            self.update_person(update.id, &update.payload)?;
        }
        Ok(updates.len())
    }
}

fn parse_person(
    item: &serde_json::Value,
    custom_key: Option<&str>,
) -> Result<Option<Contact>, ClientError> {
    let id = item["id"].as_i64().ok_or_else(|| {
        ClientError::Parse("Pipedrive: person missing 'id' field".into())
    })?;

    // The email field is multi-valued; the first entry is the primary.
    let Some(email) = item["email"][0]["value"].as_str() else {
        return Ok(None);
    };
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Ok(None);
    }

    let custom_field = custom_key.and_then(|key| match &item[key] {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });

    Ok(Some(Contact {
        id,
        name: item["name"].as_str().unwrap_or("").to_string(),
        first_name: item["first_name"].as_str().unwrap_or("").to_string(),
        email,
        custom_field,
    }))
}

// ── Tests ───────────────────────────────────────────────────────────
