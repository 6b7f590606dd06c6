// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow configuration passed explicitly to every request.

use legaltrack_domain::{
    DEFAULT_TRACKING_WIDTH, DomainError, MAX_SEQUENCE_WIDTH, SequenceScope, Tz, parse_timezone,
};
use thiserror::Error;
use time::OffsetDateTime;

/// Default number of attempts before identifier allocation gives up.
pub const DEFAULT_ALLOCATION_ATTEMPTS: u32 = 10;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown time zone '{0}'")]
    UnknownTimezone(String),

    #[error("Tracking width must be between 1 and {max}, got {width}")]
    TrackingWidthOutOfRange { width: u8, max: u8 },

    #[error("Allocation attempts must be at least 1")]
    NoAllocationAttempts,
}

/// Settings that shape identifier allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Office time zone; tracking months are bucketed in this zone.
    pub timezone: Tz,
    /// Digits in the monthly tracking sequence.
    pub tracking_width: u8,
    /// Attempts before allocation reports exhaustion.
    pub allocation_attempts: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::Asia__Manila,
            tracking_width: DEFAULT_TRACKING_WIDTH,
            allocation_attempts: DEFAULT_ALLOCATION_ATTEMPTS,
        }
    }
}

impl WorkflowConfig {
    /// Builds a validated configuration.
    ///
    /// # Arguments
    ///
    /// * `timezone` - IANA time zone name
    /// * `tracking_width` - Digits in the monthly sequence
    /// * `allocation_attempts` - Attempts before giving up
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range.
    pub fn new(
        timezone: &str,
        tracking_width: u8,
        allocation_attempts: u32,
    ) -> Result<Self, ConfigError> {
        let timezone: Tz = parse_timezone(timezone)
            .map_err(|_| ConfigError::UnknownTimezone(timezone.to_string()))?;
        if tracking_width == 0 || tracking_width > MAX_SEQUENCE_WIDTH {
            return Err(ConfigError::TrackingWidthOutOfRange {
                width: tracking_width,
                max: MAX_SEQUENCE_WIDTH,
            });
        }
        if allocation_attempts == 0 {
            return Err(ConfigError::NoAllocationAttempts);
        }

        Ok(Self {
            timezone,
            tracking_width,
            allocation_attempts,
        })
    }

    /// Returns the tracking-ID scope for the month containing `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if `now` cannot be placed in the office time zone.
    pub fn tracking_scope(&self, now: OffsetDateTime) -> Result<SequenceScope, DomainError> {
        SequenceScope::tracking(now, self.timezone, self.tracking_width)
    }
}
