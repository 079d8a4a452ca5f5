//! Job status normalization
//!
//! The job service reports status in several shapes and spellings. Everything
//! downstream (manifest, poller, quality gates) works with one canonical
//! lower-case token and the fixed terminal classification below.

/// Tokens meaning the job finished successfully.
pub const SUCCESS_STATES: &[&str] = &["succeeded", "completed", "success", "done"];

/// Tokens meaning the job finished without producing a result.
pub const FAILURE_STATES: &[&str] = &["failed", "error", "cancelled", "canceled", "timed_out", "timeout"];

/// Token used when a handle carries no status information at all.
pub const UNKNOWN: &str = "unknown";

/// Terminal classification of a status token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// Finished, result available.
    Success,
    /// Finished, no result.
    Failure,
    /// Still queued or running, or unrecognized.
    NonTerminal,
}

impl StatusClass {
    /// Classify a status token (case and surrounding whitespace are ignored).
    #[must_use]
    pub fn of(token: &str) -> Self {
        let token = canonicalize(token);
        if SUCCESS_STATES.contains(&token.as_str()) {
            Self::Success
        } else if FAILURE_STATES.contains(&token.as_str()) {
            Self::Failure
        } else {
            Self::NonTerminal
        }
    }

    /// Whether no further state change is expected.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

/// Whether `token` is in the success or failure set.
#[must_use]
pub fn is_terminal(token: &str) -> bool {
    StatusClass::of(token).is_terminal()
}

/// Trim and lower-case a raw status string.
#[must_use]
pub fn canonicalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Produce the canonical status token from the two places a job handle may
/// carry it.
///
/// The structured status name wins over the raw status field. Absent or blank
/// values fall through to the next source; with neither present the result is
/// [`UNKNOWN`]. Never fails.
#[must_use]
pub fn normalize_status(status_name: Option<&str>, status: Option<&str>) -> String {
    [status_name, status]
        .into_iter()
        .flatten()
        .map(canonicalize)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_status_only() {
        assert_eq!(normalize_status(None, Some("FAILED")), "failed");
    }

    #[test]
    fn test_absent_fields_are_unknown() {
        assert_eq!(normalize_status(None, None), UNKNOWN);
        assert_eq!(normalize_status(Some("  "), None), UNKNOWN);
    }

    #[test]
    fn test_status_name_takes_precedence() {
        assert_eq!(normalize_status(Some(" Running "), Some("completed")), "running");
    }

    #[test]
    fn test_classification() {
        assert_eq!(StatusClass::of("Completed"), StatusClass::Success);
        assert_eq!(StatusClass::of("timed_out"), StatusClass::Failure);
        assert_eq!(StatusClass::of("canceled"), StatusClass::Failure);
        assert_eq!(StatusClass::of("submitted"), StatusClass::NonTerminal);
        assert_eq!(StatusClass::of(UNKNOWN), StatusClass::NonTerminal);
        assert!(is_terminal("done"));
        assert!(!is_terminal("dry_run"));
    }
}
