// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case visibility and per-role work queues.
//!
//! Visibility is consulted before every case read and before any transition
//! is considered. A case that is not visible must be reported to the caller
//! exactly like a case that does not exist.

use crate::case::Case;
use crate::case_status::CaseStatus;
use crate::error::DomainError;
use crate::role::{Role, StaffActor};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Returns true if `actor` may see `case`.
///
/// - Super Admin sees all cases.
/// - Capitol roles see every submitted case, but a draft only if they
///   started it.
/// - LGU Admin sees only cases it submitted.
/// - Inactive or pending accounts see nothing.
#[must_use]
pub fn can_view(actor: &StaffActor, case: &Case) -> bool {
    if !actor.is_active() {
        return false;
    }
    if case.status == CaseStatus::Draft && actor.role != Role::SuperAdmin {
        return case.is_owned_by(actor.staff_pk);
    }
    match actor.role {
        Role::SuperAdmin => true,
        role if role.is_capitol() => true,
        Role::LguAdmin => case.is_owned_by(actor.staff_pk),
        _ => false,
    }
}

/// Dashboard tab filter for case listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseTab {
    /// Submitted but not yet received, or returned.
    Pending,
    Received,
    UnderReview,
    ForApproval,
    ForNumbering,
    ForRelease,
    Released,
    Drafts,
}

impl CaseTab {
    /// Statuses shown under this tab.
    #[must_use]
    pub const fn statuses(&self) -> &'static [CaseStatus] {
        match self {
            Self::Pending => &[CaseStatus::NotReceived, CaseStatus::Returned],
            Self::Received => &[CaseStatus::Received],
            Self::UnderReview => &[CaseStatus::InReview],
            Self::ForApproval => &[CaseStatus::ForApproval],
            Self::ForNumbering => &[CaseStatus::ForNumbering],
            Self::ForRelease => &[CaseStatus::ForRelease],
            Self::Released => &[CaseStatus::Released],
            Self::Drafts => &[CaseStatus::Draft],
        }
    }
}

impl FromStr for CaseTab {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "received" => Ok(Self::Received),
            "under_review" => Ok(Self::UnderReview),
            "for_approval" => Ok(Self::ForApproval),
            "for_numbering" => Ok(Self::ForNumbering),
            "for_release" => Ok(Self::ForRelease),
            "released" => Ok(Self::Released),
            "drafts" => Ok(Self::Drafts),
            _ => Err(DomainError::InvalidCaseTab(s.to_string())),
        }
    }
}

/// Selection criteria for listing cases.
///
/// All present constraints are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    /// Restrict to these statuses. `None` means any status.
    pub statuses: Option<Vec<CaseStatus>>,
    pub submitted_by: Option<i64>,
    pub assigned_to: Option<i64>,
    /// Include drafts (cases without a tracking ID).
    pub include_drafts: bool,
}

impl CaseFilter {
    /// Returns true if `case` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, case: &Case) -> bool {
        if case.tracking_id.is_none() && !self.include_drafts {
            return false;
        }
        if let Some(statuses) = &self.statuses
            && !statuses.contains(&case.status)
        {
            return false;
        }
        if let Some(owner) = self.submitted_by
            && case.submitted_by != owner
        {
            return false;
        }
        self.assigned_to.is_none_or(|assignee| case.is_assigned_to(assignee))
    }
}

/// Builds the work-queue filter for an actor.
///
/// Returns `None` when the actor has no queue at all. The resulting filter is
/// never wider than what `can_view` admits.
#[must_use]
pub fn work_queue(actor: &StaffActor, tab: Option<CaseTab>) -> Option<CaseFilter> {
    if !actor.is_active() {
        return None;
    }

    // Drafts are private to whoever started them.
    if tab == Some(CaseTab::Drafts) {
        return matches!(actor.role, Role::LguAdmin | Role::CapitolReceiving).then(|| {
            CaseFilter {
                statuses: Some(vec![CaseStatus::Draft]),
                submitted_by: Some(actor.staff_pk),
                assigned_to: None,
                include_drafts: true,
            }
        });
    }

    let mut filter = match actor.role {
        Role::SuperAdmin | Role::CapitolReceiving => CaseFilter::default(),
        Role::LguAdmin => CaseFilter {
            submitted_by: Some(actor.staff_pk),
            ..CaseFilter::default()
        },
        Role::CapitolExaminer => CaseFilter {
            assigned_to: Some(actor.staff_pk),
            ..CaseFilter::default()
        },
        Role::CapitolApprover => CaseFilter {
            statuses: Some(vec![CaseStatus::ForApproval]),
            ..CaseFilter::default()
        },
        Role::CapitolNumberer => CaseFilter {
            statuses: Some(vec![CaseStatus::ForNumbering]),
            ..CaseFilter::default()
        },
        Role::CapitolReleaser => CaseFilter {
            statuses: Some(vec![CaseStatus::ForRelease]),
            ..CaseFilter::default()
        },
    };

    if let Some(tab) = tab {
        let tab_statuses = tab.statuses();
        filter.statuses = Some(match filter.statuses {
            None => tab_statuses.to_vec(),
            Some(own) => own
                .into_iter()
                .filter(|s| tab_statuses.contains(s))
                .collect(),
        });
    }

    Some(filter)
}
