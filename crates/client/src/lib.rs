//! `mailbridge-client` — blocking API clients for the campaign platform
//! (Brevo) and the CRM (Pipedrive), plus the per-session memo cache.
//!
//! No Tokio runtime: everything goes through `reqwest::blocking`, one
//! attempt per call. Callers decide whether a failure aborts the run.

pub mod brevo;
pub mod cache;
pub mod error;
mod http;
pub mod pipedrive;

pub use brevo::BrevoClient;
pub use cache::SessionCache;
pub use error::ClientError;
pub use pipedrive::{PersonField, PersonUpdate, PipedriveClient};
