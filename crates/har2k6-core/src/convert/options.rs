//! Generator settings for a single conversion.

use chrono::TimeDelta;

use super::ConvertError;

/// Default batch threshold in milliseconds.
pub const DEFAULT_BATCH_THRESHOLD_MS: i64 = 500;

/// Explicit inputs to [`convert`](super::convert). Nothing here is read from
/// process state; callers fill it from their own configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Keep only requests whose host is (a subdomain of) one of these.
    pub only_domains: Vec<String>,
    /// Drop requests whose host is (a subdomain of) one of these.
    pub skip_domains: Vec<String>,
    /// Start-time gap in milliseconds at which a new batch begins.
    pub batch_threshold_ms: i64,
    /// Emit a status check for every replayed request.
    pub enable_checks: bool,
    /// Stop the iteration on the first failed status check.
    pub return_on_failed_check: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            only_domains: Vec::new(),
            skip_domains: Vec::new(),
            batch_threshold_ms: DEFAULT_BATCH_THRESHOLD_MS,
            enable_checks: false,
            return_on_failed_check: false,
        }
    }
}

impl ConvertConfig {
    pub fn new(
        enable_checks: bool,
        batch_threshold_ms: i64,
        only_domains: Vec<String>,
        skip_domains: Vec<String>,
    ) -> Self {
        Self {
            only_domains,
            skip_domains,
            batch_threshold_ms,
            enable_checks,
            return_on_failed_check: false,
        }
    }

    /// Rejects settings that cannot produce a meaningful script.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.batch_threshold_ms < 0 {
            return Err(ConvertError::NegativeThreshold(self.batch_threshold_ms));
        }
        if self.return_on_failed_check && !self.enable_checks {
            return Err(ConvertError::ReturnWithoutChecks);
        }
        Ok(())
    }

    pub(crate) fn batch_threshold(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.batch_threshold_ms.max(0))
    }
}
