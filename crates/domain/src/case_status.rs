// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case status states.
//!
//! Which transitions connect these states is owned by the workflow engine's
//! transition table; this module only names the states and their labels.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Workflow status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Being prepared by the LGU; no tracking ID yet.
    Draft,
    /// Submitted by the LGU, not yet physically received by the Capitol.
    NotReceived,
    /// Physically received by Capitol Receiving.
    Received,
    /// Assigned to an examiner.
    InReview,
    /// Waiting for an approver.
    ForApproval,
    /// Transient; approval moves the case straight to numbering.
    Approved,
    /// Waiting for the official number.
    ForNumbering,
    /// Numbered and waiting for release.
    ForRelease,
    /// Released to the LGU.
    Released,
    /// Returned to the LGU for correction.
    Returned,
    /// Withdrawn by the LGU.
    Withdrawn,
}

impl CaseStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 11] = [
        Self::Draft,
        Self::NotReceived,
        Self::Received,
        Self::InReview,
        Self::ForApproval,
        Self::Approved,
        Self::ForNumbering,
        Self::ForRelease,
        Self::Released,
        Self::Returned,
        Self::Withdrawn,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::NotReceived => "not_received",
            Self::Received => "received",
            Self::InReview => "in_review",
            Self::ForApproval => "for_approval",
            Self::Approved => "approved",
            Self::ForNumbering => "for_numbering",
            Self::ForRelease => "for_release",
            Self::Released => "released",
            Self::Returned => "returned",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCaseStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidCaseStatus {
                status: s.to_string(),
            })
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Withdrawn)
    }

    /// Returns the simplified label shown on public tracking pages.
    #[must_use]
    pub const fn public_label(&self) -> &'static str {
        match self {
            Self::NotReceived => "Pending",
            Self::Received => "Received",
            Self::InReview => "Under Review",
            Self::ForApproval => "For Approval",
            Self::Approved => "Approved",
            Self::ForNumbering => "For Numbering",
            Self::ForRelease => "For Release",
            Self::Released => "Released",
            Self::Returned => "Returned for Correction",
            Self::Withdrawn => "Withdrawn",
            Self::Draft => "In Progress",
        }
    }
}

impl FromStr for CaseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the public label for a raw stored status string.
///
/// Unknown values fall back to "In Progress".
#[must_use]
pub fn public_status_label(status: &str) -> &'static str {
    status
        .parse::<CaseStatus>()
        .map_or("In Progress", |s| s.public_label())
}
