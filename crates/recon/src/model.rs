use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A CRM contact, keyed by normalized (lower-case) email for joining.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub first_name: String,
    /// Lower-cased at fetch time. The join key.
    pub email: String,
    /// Value of the configured custom attribute, if one was requested.
    pub custom_field: Option<String>,
}

/// A sent campaign as listed by the email platform.
#[derive(Debug, Clone, Serialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub sent_date: String,
}

/// One row of a campaign's recipient export: a (campaign, recipient) pair.
///
/// The email is kept raw here; normalization happens in [`crate::reconcile`].
/// Date fields carry whatever string the export provides — downstream logic
/// only cares about presence.
#[derive(Debug, Clone)]
pub struct RecipientRecord {
    pub campaign_id: i64,
    pub campaign_name: String,
    pub email: String,
    pub open_count: u32,
    pub clicked_links_count: u32,
    pub soft_bounce_date: Option<String>,
    pub hard_bounce_date: Option<String>,
    pub unsubscribe_date: Option<String>,
}

// ---------------------------------------------------------------------------
// Engagement status
// ---------------------------------------------------------------------------

/// Categorical label summarizing a recipient's reaction to a campaign.
///
/// Exactly one status per reconciled row, chosen by precedence: a bounce
/// overrides a click, a click overrides an open, an open overrides nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementStatus {
    NoReaction,
    Opened,
    Clicked,
    SoftBounce,
    HardBounce,
}

impl EngagementStatus {
    /// The fixed category order used by report columns and zero-fill.
    pub const ALL: [EngagementStatus; 5] = [
        Self::NoReaction,
        Self::Opened,
        Self::Clicked,
        Self::SoftBounce,
        Self::HardBounce,
    ];

    /// Position in [`Self::ALL`]; used to index report count arrays.
    pub fn index(&self) -> usize {
        match self {
            Self::NoReaction => 0,
            Self::Opened => 1,
            Self::Clicked => 2,
            Self::SoftBounce => 3,
            Self::HardBounce => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoReaction => "No Reaction",
            Self::Opened => "Opened",
            Self::Clicked => "Clicked",
            Self::SoftBounce => "Soft Bounce",
            Self::HardBounce => "Hard Bounce",
        }
    }
}

impl std::fmt::Display for EngagementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// CRM fields attached to a reconciled row after the join.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactFields {
    pub id: i64,
    pub name: String,
    pub first_name: String,
    pub custom_field: Option<String>,
}

/// A deduplicated recipient with derived status and (possibly) CRM fields.
///
/// `contact` is `None` when the email matched no CRM contact; those rows
/// survive unless the unmatched filter drops them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRow {
    pub campaign_id: i64,
    pub campaign_name: String,
    /// Normalized (lower-case) email.
    pub email: String,
    pub status: EngagementStatus,
    pub blacklisted: bool,
    pub contact: Option<ContactFields>,
}
