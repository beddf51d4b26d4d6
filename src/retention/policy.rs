use crate::error::ConfigError;
use chrono::TimeDelta;

pub const DEFAULT_DAILY_DAYS: u32 = 7;
pub const DEFAULT_SPREAD_DAYS: u32 = 28;
pub const DEFAULT_CHECKPOINT_INTERVAL_DAYS: u32 = 28;

/// Window lengths of the three retention tiers.
///
/// Everything younger than `daily_window` is kept. Between `daily_window` and
/// `spread_window` only the oldest snapshot plus two trisection points are
/// kept. Older history is sampled once every `checkpoint_interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub daily_window: TimeDelta,
    pub spread_window: TimeDelta,
    pub checkpoint_interval: TimeDelta,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            daily_window: TimeDelta::days(i64::from(DEFAULT_DAILY_DAYS)),
            spread_window: TimeDelta::days(i64::from(DEFAULT_SPREAD_DAYS)),
            checkpoint_interval: TimeDelta::days(i64::from(DEFAULT_CHECKPOINT_INTERVAL_DAYS)),
        }
    }
}

impl RetentionPolicy {
    /// Build a policy from whole-day window lengths, validating it.
    pub fn from_days(
        daily_days: u32,
        spread_days: u32,
        checkpoint_interval_days: u32,
    ) -> Result<Self, ConfigError> {
        let policy = Self {
            daily_window: TimeDelta::days(i64::from(daily_days)),
            spread_window: TimeDelta::days(i64::from(spread_days)),
            checkpoint_interval: TimeDelta::days(i64::from(checkpoint_interval_days)),
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.daily_window <= TimeDelta::zero() {
            return Err(ConfigError::Validation(
                "retention.daily_days must be positive".into(),
            ));
        }
        if self.spread_window <= self.daily_window {
            return Err(ConfigError::Validation(
                "retention.spread_days must be greater than retention.daily_days".into(),
            ));
        }
        // A zero interval would never walk back past the earliest snapshot.
        if self.checkpoint_interval <= TimeDelta::zero() {
            return Err(ConfigError::Validation(
                "retention.checkpoint_interval_days must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_one_week_and_four_weeks() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.daily_window, TimeDelta::weeks(1));
        assert_eq!(policy.spread_window, TimeDelta::weeks(4));
        assert_eq!(policy.checkpoint_interval, TimeDelta::weeks(4));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn from_days_rejects_spread_not_wider_than_daily() {
        let err = RetentionPolicy::from_days(14, 14, 28).unwrap_err();
        assert!(err.to_string().contains("spread_days"));
    }

    #[test]
    fn from_days_rejects_zero_windows() {
        assert!(RetentionPolicy::from_days(0, 28, 28).is_err());
        assert!(RetentionPolicy::from_days(7, 28, 0).is_err());
    }

    #[test]
    fn from_days_accepts_custom_windows() {
        let policy = RetentionPolicy::from_days(3, 10, 30).unwrap();
        assert_eq!(policy.daily_window, TimeDelta::days(3));
        assert_eq!(policy.spread_window, TimeDelta::days(10));
        assert_eq!(policy.checkpoint_interval, TimeDelta::days(30));
    }
}
