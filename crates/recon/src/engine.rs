use std::collections::{HashMap, HashSet};

use crate::model::{Contact, ContactFields, EngagementStatus, ReconciledRow, RecipientRecord};

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Row filters applied after the CRM join.
#[derive(Debug, Clone, Default)]
pub struct ReconFilters {
    /// Drop rows whose email matched no CRM contact.
    pub drop_unmatched: bool,
    /// Drop rows whose email belongs to this domain (the operator's own).
    pub internal_domain: Option<String>,
}

// ---------------------------------------------------------------------------
// Status derivation
// ---------------------------------------------------------------------------

/// Derive the engagement status for one recipient record.
///
/// Precedence, strongest last: No Reaction → Opened → Clicked →
/// Soft Bounce → Hard Bounce. A row that both clicked and hard-bounced
/// is a Hard Bounce.
pub fn derive_status(record: &RecipientRecord) -> EngagementStatus {
    if record.hard_bounce_date.is_some() {
        EngagementStatus::HardBounce
    } else if record.soft_bounce_date.is_some() {
        EngagementStatus::SoftBounce
    } else if record.clicked_links_count > 0 {
        EngagementStatus::Clicked
    } else if record.open_count > 0 {
        EngagementStatus::Opened
    } else {
        EngagementStatus::NoReaction
    }
}

// ---------------------------------------------------------------------------
// Reconcile
// ---------------------------------------------------------------------------

/// Merge recipient exports with CRM contacts into one row per recipient.
///
/// 1. Stable sort descending by campaign id; the numerically highest
///    campaign id is treated as most recent. Ids are not guaranteed to be
///    send-time monotonic; this tie-break is preserved from the reference
///    behavior.
/// 2. Deduplicate by normalized email, keeping the first occurrence.
/// 3. Derive status and blacklist flag per surviving row.
/// 4. Left-join against contacts on normalized email; misses keep
///    `contact: None`.
/// 5. Apply the unmatched and internal-domain filters.
///
/// Output order is deterministic: campaign id descending, then input order.
pub fn reconcile(
    records: &[RecipientRecord],
    contacts: &[Contact],
    filters: &ReconFilters,
) -> Vec<ReconciledRow> {
    let mut sorted: Vec<&RecipientRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.campaign_id.cmp(&a.campaign_id));

    // First contact per email wins, matching page fetch order.
    let mut by_email: HashMap<&str, &Contact> = HashMap::new();
    for contact in contacts {
        by_email.entry(contact.email.as_str()).or_insert(contact);
    }

    let internal_suffix = filters
        .internal_domain
        .as_ref()
        .map(|d| format!("@{}", d.to_lowercase()));

    let mut seen: HashSet<String> = HashSet::new();
    let mut rows = Vec::new();

    for record in sorted {
        let email = record.email.to_lowercase();
        if !seen.insert(email.clone()) {
            continue;
        }

        let contact = by_email.get(email.as_str()).map(|c| ContactFields {
            id: c.id,
            name: c.name.clone(),
            first_name: c.first_name.clone(),
            custom_field: c.custom_field.clone(),
        });

        if filters.drop_unmatched && contact.is_none() {
            continue;
        }
        if let Some(ref suffix) = internal_suffix {
            if email.ends_with(suffix.as_str()) {
                continue;
            }
        }

        rows.push(ReconciledRow {
            campaign_id: record.campaign_id,
            campaign_name: record.campaign_name.clone(),
            email,
            status: derive_status(record),
            blacklisted: record.unsubscribe_date.is_some(),
            contact,
        });
    }

    rows
}
