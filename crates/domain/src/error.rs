// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Role string is not one of the known staff roles.
    InvalidRole(String),
    /// Account status string is not recognized.
    InvalidAccountStatus(String),
    /// Case status string is not recognized.
    InvalidCaseStatus {
        /// The unrecognized status.
        status: String,
    },
    /// Case type string is not recognized.
    InvalidCaseType(String),
    /// Workflow action string is not recognized.
    InvalidCaseAction(String),
    /// Listing tab string is not recognized.
    InvalidCaseTab(String),
    /// The time zone name could not be parsed.
    InvalidTimezone(String),
    /// A timestamp could not be converted into the office time zone.
    InvalidTimestamp(String),
    /// The sequence width is outside the supported range.
    InvalidSequenceWidth {
        /// The requested width.
        width: u8,
    },
    /// The next sequence number does not fit in the configured width.
    SequenceOverflow {
        /// The scope prefix that overflowed.
        prefix: String,
        /// The configured width.
        width: u8,
    },
    /// A required text field was empty.
    MissingField(&'static str),
    /// A text field exceeded its maximum length.
    FieldTooLong {
        /// The field name.
        field: &'static str,
        /// The maximum allowed number of characters.
        max: usize,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(role) => write!(f, "Invalid role: {role}"),
            Self::InvalidAccountStatus(status) => write!(f, "Invalid account status: {status}"),
            Self::InvalidCaseStatus { status } => write!(f, "Invalid case status: {status}"),
            Self::InvalidCaseType(case_type) => write!(f, "Invalid case type: {case_type}"),
            Self::InvalidCaseAction(action) => write!(f, "Invalid case action: {action}"),
            Self::InvalidCaseTab(tab) => write!(f, "Invalid case tab: {tab}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid time zone: {tz}"),
            Self::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {msg}"),
            Self::InvalidSequenceWidth { width } => {
                write!(f, "Sequence width {width} is outside the supported range 1..=9")
            }
            Self::SequenceOverflow { prefix, width } => {
                write!(
                    f,
                    "Sequence for {prefix} exceeded the maximum of {width} digits"
                )
            }
            Self::MissingField(field) => write!(f, "Field '{field}' is required"),
            Self::FieldTooLong { field, max } => {
                write!(f, "Field '{field}' must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for DomainError {}
