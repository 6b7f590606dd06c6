// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Human-readable sequential identifiers.
//!
//! Identifiers have the shape `prefix + zero-padded sequence`. The next
//! sequence is computed from the identifiers that already exist under the
//! same prefix, so no counter is ever stored. Gaps are tolerated.
//!
//! Two scopes are used:
//!
//! - Case tracking numbers: `PAS` + `YYMM` in the office time zone, so the
//!   sequence resets every calendar month.
//! - Staff IDs: role prefix + `-`, with no time bucket.
//!
//! Uniqueness under concurrency is the caller's problem: a persistence layer
//! must retry with a fresh scan when an insert collides.

use crate::error::DomainError;
use crate::role::Role;
use chrono::{Datelike, TimeZone};
use chrono_tz::Tz;
use time::OffsetDateTime;

/// Prefix for case tracking numbers.
pub const TRACKING_PREFIX: &str = "PAS";

/// Default sequence width for tracking numbers.
pub const DEFAULT_TRACKING_WIDTH: u8 = 4;

/// Sequence width for staff IDs.
pub const STAFF_ID_WIDTH: u8 = 4;

/// Widest supported sequence. Keeps `10^width` inside `u64`.
pub const MAX_SEQUENCE_WIDTH: u8 = 9;

/// The office time zone used when nothing else is configured.
pub const DEFAULT_OFFICE_TIMEZONE: &str = "Asia/Manila";

/// A prefix plus a fixed sequence width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceScope {
    prefix: String,
    width: u8,
}

impl SequenceScope {
    /// Creates a scope.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSequenceWidth` if `width` is zero or
    /// larger than `MAX_SEQUENCE_WIDTH`.
    pub fn new(prefix: impl Into<String>, width: u8) -> Result<Self, DomainError> {
        if width == 0 || width > MAX_SEQUENCE_WIDTH {
            return Err(DomainError::InvalidSequenceWidth { width });
        }
        Ok(Self {
            prefix: prefix.into(),
            width,
        })
    }

    /// Builds the tracking-number scope for the month containing `now`.
    ///
    /// The month boundary is evaluated in `tz`, not UTC.
    ///
    /// # Arguments
    ///
    /// * `now` - The current instant
    /// * `tz` - The office time zone
    /// * `width` - Number of sequence digits
    ///
    /// # Errors
    ///
    /// Returns an error if the width is unsupported or the instant cannot be
    /// represented in the time zone.
    pub fn tracking(now: OffsetDateTime, tz: Tz, width: u8) -> Result<Self, DomainError> {
        let local = tz
            .timestamp_opt(now.unix_timestamp(), 0)
            .single()
            .ok_or_else(|| DomainError::InvalidTimestamp(now.to_string()))?;

        let yy = local.year().rem_euclid(100);
        let mm = local.month();
        Self::new(format!("{TRACKING_PREFIX}{yy:02}{mm:02}"), width)
    }

    /// Builds the staff-ID scope for a role, e.g. `EXM-`.
    #[must_use]
    pub fn staff(role: Role) -> Self {
        Self {
            prefix: format!("{}-", role.staff_id_prefix()),
            width: STAFF_ID_WIDTH,
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Largest sequence that fits in the width.
    #[must_use]
    pub fn max_sequence(&self) -> u64 {
        10_u64.pow(u32::from(self.width)) - 1
    }

    /// Extracts the sequence number from an identifier in this scope.
    ///
    /// Returns `None` for identifiers with a different prefix or whose
    /// suffix is not exactly `width` ASCII digits.
    #[must_use]
    pub fn sequence_of(&self, identifier: &str) -> Option<u64> {
        let suffix = identifier.strip_prefix(self.prefix.as_str())?;
        if suffix.len() != usize::from(self.width) || !suffix.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        suffix.parse().ok()
    }

    /// Formats a sequence number in this scope.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SequenceOverflow` if `sequence` needs more than
    /// `width` digits.
    pub fn format(&self, sequence: u64) -> Result<String, DomainError> {
        if sequence > self.max_sequence() {
            return Err(DomainError::SequenceOverflow {
                prefix: self.prefix.clone(),
                width: self.width,
            });
        }
        Ok(format!(
            "{}{:0width$}",
            self.prefix,
            sequence,
            width = usize::from(self.width)
        ))
    }

    /// Computes the next identifier given the identifiers already issued.
    ///
    /// The next sequence is one more than the largest existing sequence in
    /// this scope. Identifiers outside the scope are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SequenceOverflow` when the scope is exhausted.
    /// Overflow is never wrapped.
    pub fn next_identifier<I, S>(&self, existing: I) -> Result<String, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let max = existing
            .into_iter()
            .filter_map(|id| self.sequence_of(id.as_ref()))
            .max()
            .unwrap_or(0);
        self.format(max.saturating_add(1))
    }
}

/// Parses an IANA time zone name.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimezone` for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}
