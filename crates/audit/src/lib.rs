// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

use legaltrack_domain::{Role, StaffActor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::OffsetDateTime;

/// Represents the staff member performing an action.
///
/// Audit entries may have no actor at all, for anonymous submissions and
/// system actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The internal staff key.
    pub staff_pk: i64,
    /// The allocated staff identifier.
    pub staff_id: String,
    /// The actor's role at the time of the action.
    pub role: Role,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `staff_pk` - The internal staff key
    /// * `staff_id` - The allocated staff identifier
    /// * `role` - The actor's role
    #[must_use]
    pub const fn new(staff_pk: i64, staff_id: String, role: Role) -> Self {
        Self {
            staff_pk,
            staff_id,
            role,
        }
    }
}

impl From<&StaffActor> for Actor {
    fn from(staff: &StaffActor) -> Self {
        Self::new(staff.staff_pk, staff.staff_id.clone(), staff.role)
    }
}

/// The kind of fact being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    LoginFailed,
    Logout,
    CreateUser,
    UpdateUser,
    DeactivateUser,
    ReactivateUser,
    ActivationEmailSent,
    ActivateAccount,
    CaseCreate,
    CaseUpdate,
    CaseRemark,
    CaseStatusChange,
    CaseReceipt,
    CaseAssignment,
    CaseApproval,
    CaseRejection,
    CaseRelease,
    SupportFeedback,
}

impl AuditAction {
    pub const ALL: [Self; 19] = [
        Self::Login,
        Self::LoginFailed,
        Self::Logout,
        Self::CreateUser,
        Self::UpdateUser,
        Self::DeactivateUser,
        Self::ReactivateUser,
        Self::ActivationEmailSent,
        Self::ActivateAccount,
        Self::CaseCreate,
        Self::CaseUpdate,
        Self::CaseRemark,
        Self::CaseStatusChange,
        Self::CaseReceipt,
        Self::CaseAssignment,
        Self::CaseApproval,
        Self::CaseRejection,
        Self::CaseRelease,
        Self::SupportFeedback,
    ];

    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::LoginFailed => "login_failed",
            Self::Logout => "logout",
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::DeactivateUser => "deactivate_user",
            Self::ReactivateUser => "reactivate_user",
            Self::ActivationEmailSent => "activation_email_sent",
            Self::ActivateAccount => "activate_account",
            Self::CaseCreate => "case_create",
            Self::CaseUpdate => "case_update",
            Self::CaseRemark => "case_remark",
            Self::CaseStatusChange => "case_status_change",
            Self::CaseReceipt => "case_receipt",
            Self::CaseAssignment => "case_assignment",
            Self::CaseApproval => "case_approval",
            Self::CaseRejection => "case_rejection",
            Self::CaseRelease => "case_release",
            Self::SupportFeedback => "support_feedback",
        }
    }

    /// Returns true for kinds that record a case status transition.
    #[must_use]
    pub const fn is_transition(&self) -> bool {
        matches!(
            self,
            Self::CaseReceipt
                | Self::CaseAssignment
                | Self::CaseStatusChange
                | Self::CaseApproval
                | Self::CaseRejection
                | Self::CaseRelease
        )
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown audit action: {s}"))
    }
}

/// What an audit entry is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditTarget {
    /// A case, referenced as `Case: <tracking_id>` or `Draft: <draft_id>`.
    Case {
        reference: String,
        /// Storage key, filled in once the case row exists.
        case_id: Option<i64>,
    },
    /// A staff account, referenced as `User: <email>`.
    User { reference: String, staff_pk: i64 },
    /// No target (anonymous feedback, failed logins for unknown accounts).
    None,
}

impl AuditTarget {
    /// Builds a user target.
    #[must_use]
    pub fn user(staff: &StaffActor) -> Self {
        Self::User {
            reference: format!("User: {}", staff.email),
            staff_pk: staff.staff_pk,
        }
    }

    /// Returns the human-readable reference, if any.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Case { reference, .. } | Self::User { reference, .. } => Some(reference),
            Self::None => None,
        }
    }

    /// Returns the case storage key, if this targets a persisted case.
    #[must_use]
    pub const fn case_id(&self) -> Option<i64> {
        match self {
            Self::Case { case_id, .. } => *case_id,
            _ => None,
        }
    }
}

/// An immutable, append-only audit entry.
///
/// Every state-changing operation produces exactly one entry. Entries are
/// never updated or deleted once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Storage key; `None` until persisted.
    pub event_id: Option<i64>,
    /// The actor, if any.
    pub actor: Option<Actor>,
    /// The kind of fact.
    pub action: AuditAction,
    /// What the fact is about.
    pub target: AuditTarget,
    /// Ordered key/value payload.
    pub details: BTreeMap<String, String>,
    /// When the fact was recorded.
    pub created_at: OffsetDateTime,
}

impl AuditEvent {
    /// Creates a new `AuditEvent` with no details.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change, if any
    /// * `action` - The kind of fact
    /// * `target` - What the fact is about
    /// * `created_at` - When it happened
    #[must_use]
    pub const fn new(
        actor: Option<Actor>,
        action: AuditAction,
        target: AuditTarget,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            action,
            target,
            details: BTreeMap::new(),
            created_at,
        }
    }

    /// Adds a detail entry.
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Returns a detail value.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }
}
