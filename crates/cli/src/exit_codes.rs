//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | General error (unspecified)              |
//! | 2       | Universal | CLI usage error (bad args, missing file) |
//! | 3       | Universal | Local I/O error (cannot read/write files)|
//! | 50-59   | remote    | Email platform / CRM API codes           |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-3)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Local I/O error - cannot read the input CSV or write an output file.
pub const EXIT_IO: u8 = 3;

// =============================================================================
// Remote APIs (50-59)
// =============================================================================

/// No API credential provided (neither flag nor env var).
pub const EXIT_REMOTE_NOT_AUTH: u8 = 50;

/// Credential rejected by upstream (401/403).
pub const EXIT_REMOTE_AUTH: u8 = 51;

/// Bad request rejected by upstream (4xx other than auth).
pub const EXIT_REMOTE_VALIDATION: u8 = 52;

/// Upstream error (5xx), network failure, or unparseable response.
pub const EXIT_REMOTE_UPSTREAM: u8 = 54;

/// The email platform refused a recipient export job.
pub const EXIT_REMOTE_EXPORT_REJECTED: u8 = 55;
