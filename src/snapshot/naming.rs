use crate::error::NamingError;
use chrono::NaiveDateTime;

/// Timestamp layout following the prefix, e.g. `201231_0416`.
pub const TIMESTAMP_FORMAT: &str = "%y%m%d_%H%M";

pub const DEFAULT_NAME_PREFIX: &str = "snapshot";

/// Maps snapshot names of the form `<prefix>_<yymmdd>_<HHMM>` to timestamps
/// and back.
///
/// Only canonical names decode: a name must carry the configured prefix and
/// re-encode to exactly the same text, so every accepted name corresponds to
/// exactly one minute and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotNamer {
    prefix: String,
}

impl Default for SnapshotNamer {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_PREFIX)
    }
}

impl SnapshotNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn encode(&self, timestamp: NaiveDateTime) -> String {
        format!("{}_{}", self.prefix, timestamp.format(TIMESTAMP_FORMAT))
    }

    pub fn decode(&self, name: &str) -> Result<NaiveDateTime, NamingError> {
        let malformed = |reason: String| NamingError::Malformed {
            name: name.to_string(),
            reason,
        };

        let stamp = name
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .ok_or_else(|| malformed(format!("expected prefix `{}_`", self.prefix)))?;

        let timestamp = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|e| malformed(format!("timestamp `{stamp}`: {e}")))?;

        if self.encode(timestamp) != name {
            return Err(malformed(format!(
                "timestamp `{stamp}` is not in canonical `{TIMESTAMP_FORMAT}` form"
            )));
        }

        Ok(timestamp)
    }
}
