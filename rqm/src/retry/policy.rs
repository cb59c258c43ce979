//! Retry policy

use serde::{Deserialize, Serialize};

/// How many times a failed request may be re-queued
///
/// The default is unbounded: a request that keeps failing is retried at the
/// scheduler's base rate forever. Setting `max-retries` opts into a limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt (absent = no limit)
    #[serde(rename = "max-retries", skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

impl RetryPolicy {
    /// Retry forever
    pub fn unbounded() -> Self {
        Self { max_retries: None }
    }

    /// Allow at most `max_retries` retries after the first attempt
    pub fn limited(max_retries: u32) -> Self {
        Self {
            max_retries: Some(max_retries),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.max_retries.is_some()
    }

    /// Whether attempt number `attempt` (1-based) may be followed by another
    pub fn allows_retry(&self, attempt: u32) -> bool {
        match self.max_retries {
            None => true,
            Some(max) => attempt <= max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let policy = RetryPolicy::default();
        assert!(!policy.is_bounded());
        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(u32::MAX));
    }

    #[test]
    fn test_limited_counts_retries_not_attempts() {
        let policy = RetryPolicy::limited(2);
        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(2));
        assert!(!policy.allows_retry(3));

        let none = RetryPolicy::limited(0);
        assert!(!none.allows_retry(1));
    }

    #[test]
    fn test_deserialize() {
        let policy: RetryPolicy = serde_yaml::from_str("max-retries: 5").unwrap();
        assert_eq!(policy, RetryPolicy::limited(5));

        let policy: RetryPolicy = serde_yaml::from_str("{}").unwrap();
        assert_eq!(policy, RetryPolicy::unbounded());
    }
}
