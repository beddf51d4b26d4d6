use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `snapthin`.
///
/// Each layer defines its own error variant. Library callers can match on
/// these to decide whether a run is safe to retry; the binary and the
/// orchestration layer continue to use `anyhow::Result` for context chains.
#[derive(Debug, Error)]
pub enum SnapthinError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Snapshot names ──────────────────────────────────────────────────
    #[error("naming: {0}")]
    Naming(#[from] NamingError),

    // ── Retention selection ─────────────────────────────────────────────
    #[error("retention: {0}")]
    Retention(#[from] RetentionError),

    // ── Snapshot store ──────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Naming errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum NamingError {
    #[error("malformed snapshot name {name:?}: {reason}")]
    Malformed { name: String, reason: String },
}

// ─── Retention errors ───────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetentionError {
    #[error("no successful snapshots to select from")]
    EmptyInventory,
}

// ─── Store errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("{tasks} snapshot delete task(s) already running, refusing to operate")]
    DeletionInProgress { tasks: usize },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, SnapthinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = SnapthinError::Config(ConfigError::Validation("empty prefix".into()));
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn malformed_name_quotes_the_name() {
        let err = SnapthinError::Naming(NamingError::Malformed {
            name: "nightly-1".into(),
            reason: "missing prefix".into(),
        });
        let text = err.to_string();
        assert!(text.contains("\"nightly-1\""));
        assert!(text.contains("missing prefix"));
    }

    #[test]
    fn deletion_in_progress_reports_task_count() {
        let err = SnapthinError::Store(StoreError::DeletionInProgress { tasks: 2 });
        assert!(err.to_string().contains("2 snapshot delete task(s)"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let err: SnapthinError = anyhow_err.into();
        assert!(err.to_string().contains("something went wrong"));
    }
}
