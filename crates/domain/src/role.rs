// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff roles, account status, and the staff actor record.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A staff role.
///
/// Roles are fixed at account creation and drive every authorization
/// decision in the case workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access and visibility.
    SuperAdmin,
    /// Local government unit submitter.
    LguAdmin,
    /// Capitol front desk: receives, returns, and assigns cases.
    CapitolReceiving,
    /// Reviews assigned cases.
    CapitolExaminer,
    /// Approves reviewed cases or returns them for correction.
    CapitolApprover,
    /// Records the official numbering.
    CapitolNumberer,
    /// Releases numbered cases.
    CapitolReleaser,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 7] = [
        Self::SuperAdmin,
        Self::LguAdmin,
        Self::CapitolReceiving,
        Self::CapitolExaminer,
        Self::CapitolApprover,
        Self::CapitolNumberer,
        Self::CapitolReleaser,
    ];

    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::LguAdmin => "lgu_admin",
            Self::CapitolReceiving => "capitol_receiving",
            Self::CapitolExaminer => "capitol_examiner",
            Self::CapitolApprover => "capitol_approver",
            Self::CapitolNumberer => "capitol_numberer",
            Self::CapitolReleaser => "capitol_releaser",
        }
    }

    /// Returns the human-readable role name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::LguAdmin => "LGU Admin",
            Self::CapitolReceiving => "Capitol Receiving",
            Self::CapitolExaminer => "Capitol Examiner",
            Self::CapitolApprover => "Capitol Approver",
            Self::CapitolNumberer => "Capitol Numberer",
            Self::CapitolReleaser => "Capitol Releaser",
        }
    }

    /// Returns the prefix used when allocating staff IDs for this role.
    #[must_use]
    pub const fn staff_id_prefix(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "ADM",
            Self::LguAdmin => "LGU",
            Self::CapitolReceiving => "REC",
            Self::CapitolExaminer => "EXM",
            Self::CapitolApprover => "APR",
            Self::CapitolNumberer => "NUM",
            Self::CapitolReleaser => "REL",
        }
    }

    /// Returns true for every Capitol-side role.
    #[must_use]
    pub const fn is_capitol(&self) -> bool {
        matches!(
            self,
            Self::CapitolReceiving
                | Self::CapitolExaminer
                | Self::CapitolApprover
                | Self::CapitolNumberer
                | Self::CapitolReleaser
        )
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::InvalidRole(s.to_string()))
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Staff account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Created, waiting for the holder to activate.
    Pending,
    /// Able to act.
    Active,
    /// Deactivated by an administrator.
    Inactive,
}

impl AccountStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidAccountStatus(s.to_string())),
        }
    }
}

/// A role-bearing staff identity as seen by the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffActor {
    /// Internal numeric key.
    pub staff_pk: i64,
    /// Allocated staff identifier, e.g. `EXM-0001`.
    pub staff_id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub account_status: AccountStatus,
    /// Municipality for LGU accounts.
    pub lgu_municipality: Option<String>,
}

impl StaffActor {
    /// Creates a new staff actor.
    ///
    /// # Arguments
    ///
    /// * `staff_pk` - The internal numeric key
    /// * `staff_id` - The allocated staff identifier
    /// * `email` - The account email
    /// * `full_name` - The display name
    /// * `role` - The staff role
    /// * `account_status` - The lifecycle status
    #[must_use]
    pub const fn new(
        staff_pk: i64,
        staff_id: String,
        email: String,
        full_name: String,
        role: Role,
        account_status: AccountStatus,
    ) -> Self {
        Self {
            staff_pk,
            staff_id,
            email,
            full_name,
            role,
            account_status,
            lgu_municipality: None,
        }
    }

    /// Returns true if the account may currently act.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.account_status, AccountStatus::Active)
    }
}
