//! `mailbridge-recon` — Campaign engagement reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded recipient records and CRM
//! contacts, returns reconciled rows and per-campaign report rows.
//! No CLI or network dependencies.

pub mod engine;
pub mod error;
pub mod load;
pub mod model;
pub mod report;

pub use engine::{reconcile, ReconFilters};
pub use error::ReconError;
pub use load::load_recipient_rows;
pub use model::{Campaign, Contact, ContactFields, EngagementStatus, ReconciledRow, RecipientRecord};
pub use report::{aggregate, ReportRow};
