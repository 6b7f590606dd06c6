// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::CaseAction;
use legaltrack_domain::{CaseStatus, Role};

/// Errors that can occur during case transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The case does not exist or the actor may not see it.
    CaseNotFound,
    /// The actor's role, ownership, or assignment does not permit the action.
    UnauthorizedRole {
        /// The requested action.
        action: CaseAction,
        /// The actor's role.
        role: Role,
    },
    /// The action is not permitted from the case's current status.
    InvalidState {
        /// The requested action.
        action: CaseAction,
        /// The case's current status.
        status: CaseStatus,
    },
    /// A precondition of the action does not hold.
    PreconditionFailed {
        /// The requested action.
        action: CaseAction,
        /// Why the precondition failed.
        reason: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CaseNotFound => write!(f, "Case not found"),
            Self::UnauthorizedRole { action, role } => {
                write!(f, "Role {role} may not perform '{action}' on this case")
            }
            Self::InvalidState { action, status } => {
                write!(f, "Cannot perform '{action}' while case is '{status}'")
            }
            Self::PreconditionFailed { action, reason } => {
                write!(f, "Precondition for '{action}' failed: {reason}")
            }
        }
    }
}

impl std::error::Error for CoreError {}
