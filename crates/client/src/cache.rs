//! Per-session memoization of remote results, keyed by the exact call
//! arguments. Replaces the reference implementation's opaque caching
//! decorators with an explicit map the caller can inspect and clear.
//!
//! Only successful results are cached; a failed call stays uncached so the
//! next invocation retries it. Credentials are not part of the keys — a
//! cache lives beside the clients it memoizes and is dropped with them.

use std::collections::HashMap;

use mailbridge_recon::{Campaign, Contact, RecipientRecord};

use crate::error::ClientError;
use crate::pipedrive::PersonField;

#[derive(Default)]
pub struct SessionCache {
    campaigns: Option<Vec<Campaign>>,
    contact_pages: HashMap<(u32, u32), Vec<Contact>>,
    exports: HashMap<i64, Vec<RecipientRecord>>,
    person_fields: HashMap<String, Option<PersonField>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Campaign list, fetched at most once per session.
    pub fn campaigns<F>(&mut self, fetch: F) -> Result<Vec<Campaign>, ClientError>
    where
        F: FnOnce() -> Result<Vec<Campaign>, ClientError>,
    {
        if let Some(hit) = &self.campaigns {
            return Ok(hit.clone());
        }
        let campaigns = fetch()?;
        self.campaigns = Some(campaigns.clone());
        Ok(campaigns)
    }

    /// One contact page, keyed by (start, limit).
    pub fn contacts_page<F>(
        &mut self,
        start: u32,
        limit: u32,
        fetch: F,
    ) -> Result<Vec<Contact>, ClientError>
    where
        F: FnOnce() -> Result<Vec<Contact>, ClientError>,
    {
        if let Some(hit) = self.contact_pages.get(&(start, limit)) {
            return Ok(hit.clone());
        }
        let page = fetch()?;
        self.contact_pages.insert((start, limit), page.clone());
        Ok(page)
    }

    /// One campaign's recipient export, keyed by campaign id.
    pub fn export<F>(&mut self, campaign_id: i64, fetch: F) -> Result<Vec<RecipientRecord>, ClientError>
    where
        F: FnOnce() -> Result<Vec<RecipientRecord>, ClientError>,
    {
        if let Some(hit) = self.exports.get(&campaign_id) {
            return Ok(hit.clone());
        }
        let rows = fetch()?;
        self.exports.insert(campaign_id, rows.clone());
        Ok(rows)
    }

    /// A person-field lookup, keyed by the field's display name.
    /// `Ok(None)` (field does not exist) is a cacheable answer too.
    pub fn person_field<F>(
        &mut self,
        name: &str,
        fetch: F,
    ) -> Result<Option<PersonField>, ClientError>
    where
        F: FnOnce() -> Result<Option<PersonField>, ClientError>,
    {
        if let Some(hit) = self.person_fields.get(name) {
            return Ok(hit.clone());
        }
        let field = fetch()?;
        self.person_fields.insert(name.to_string(), field.clone());
        Ok(field)
    }

    /// Drop everything; the next calls hit the network again.
    pub fn clear(&mut self) {
        self.campaigns = None;
        self.contact_pages.clear();
        self.exports.clear();
        self.person_fields.clear();
    }
}
