//! mailbridge CLI library: command implementations plus the error and
//! exit-code plumbing shared between them and the binary.

pub mod campaigns;
pub mod exit_codes;
pub mod push;
pub mod run;

use mailbridge_client::ClientError;

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: exit_codes::EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: exit_codes::EXIT_IO, message: msg.into(), hint: None }
    }

    /// Classify a remote API failure into its exit code. `source` names the
    /// upstream service for hints; the error message already carries it.
    pub fn remote(source: &str, err: ClientError) -> Self {
        let (code, hint) = if err.is_auth() {
            (
                exit_codes::EXIT_REMOTE_AUTH,
                Some(format!("check the {source} API credential")),
            )
        } else {
            match &err {
                ClientError::ExportRejected(_) => (
                    exit_codes::EXIT_REMOTE_EXPORT_REJECTED,
                    Some("only sent campaigns can be exported".to_string()),
                ),
                ClientError::Http(status, _) if (400..500).contains(status) => {
                    (exit_codes::EXIT_REMOTE_VALIDATION, None)
                }
                _ => (exit_codes::EXIT_REMOTE_UPSTREAM, None),
            }
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Resolve an API credential already merged by clap (flag > env): trim it,
/// and turn absence into the not-authenticated exit code.
pub fn resolve_key(
    value: Option<String>,
    source: &str,
    flag_name: &str,
    env_var: &str,
) -> Result<String, CliError> {
    if let Some(key) = value {
        let trimmed = key.trim().to_string();
        if !trimmed.is_empty() {
            return Ok(trimmed);
        }
    }
    Err(CliError {
        code: exit_codes::EXIT_REMOTE_NOT_AUTH,
        message: format!("missing {source} API key (use {flag_name} or set {env_var})"),
        hint: None,
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_key_trims() {
        let key = resolve_key(Some("  key_123  ".into()), "Brevo", "--brevo-key", "BREVO_API_KEY")
            .unwrap();
        assert_eq!(key, "key_123");
    }

    #[test]
    fn resolve_key_missing() {
        let err =
            resolve_key(None, "Brevo", "--brevo-key", "BREVO_API_KEY").unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_REMOTE_NOT_AUTH);
        assert!(err.message.contains("--brevo-key"));
        assert!(err.message.contains("BREVO_API_KEY"));
    }

    #[test]
    fn resolve_key_blank_flag_is_missing() {
        let err = resolve_key(Some("   ".into()), "Pipedrive", "--pipedrive-token", "PIPEDRIVE_API_TOKEN")
            .unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_REMOTE_NOT_AUTH);
    }

    #[test]
    fn remote_error_classification() {
        let auth = CliError::remote("Brevo", ClientError::Http(401, "bad key".into()));
        assert_eq!(auth.code, exit_codes::EXIT_REMOTE_AUTH);

        let rejected =
            CliError::remote("Brevo", ClientError::ExportRejected("campaign 8".into()));
        assert_eq!(rejected.code, exit_codes::EXIT_REMOTE_EXPORT_REJECTED);

        let validation = CliError::remote("Pipedrive", ClientError::Http(400, "bad".into()));
        assert_eq!(validation.code, exit_codes::EXIT_REMOTE_VALIDATION);

        let upstream = CliError::remote("Pipedrive", ClientError::Http(500, "boom".into()));
        assert_eq!(upstream.code, exit_codes::EXIT_REMOTE_UPSTREAM);

        let network = CliError::remote("Brevo", ClientError::Network("timeout".into()));
        assert_eq!(network.code, exit_codes::EXIT_REMOTE_UPSTREAM);
        assert!(network.message.contains("timeout"));
    }
}
