//! `mailbridge-io` — serialization of reconciled data and campaign reports.
//!
//! Two output shapes: a flat UTF-8 CSV of the reconciled rows, and a
//! two-sheet XLSX workbook (report + data). Both are produced in memory;
//! callers decide where the bytes go.

pub mod delimited;
pub mod error;
pub mod workbook;

pub use delimited::{data_headers, to_csv};
pub use error::ExportError;
pub use workbook::to_workbook;
