// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor resolution and account-level authorization.
//!
//! Sessions and credentials belong to the identity collaborator. By the time
//! a request reaches this crate it carries a staff key that the collaborator
//! vouches for; this module turns that key into an active `StaffActor`.
//!
//! Case-level authorization is not here: the workflow engine's transition
//! table decides who may act on a case.

use legaltrack_domain::{Role, StaffActor};
use legaltrack_persistence::{Persistence, StaffRecord};
use tracing::debug;

use crate::error::AuthError;

/// Resolves callers to staff actors.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Loads the staff member behind `staff_pk`.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `staff_pk` - The staff key supplied by the identity collaborator
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the account does not exist or is
    /// not active.
    pub fn resolve_actor(
        persistence: &mut Persistence,
        staff_pk: i64,
    ) -> Result<StaffActor, AuthError> {
        let record: StaffRecord = persistence
            .get_staff_by_pk(staff_pk)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Unknown staff account: {staff_pk}"),
            })?;

        if !record.actor.is_active() {
            return Err(AuthError::AuthenticationFailed {
                reason: format!("Account is {}", record.actor.account_status.as_str()),
            });
        }

        debug!(staff_pk, staff_id = %record.actor.staff_id, "Resolved actor");
        Ok(record.actor)
    }
}

/// Authorization checks for operations outside the case workflow.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Only Super Admins may create, edit, deactivate, or reactivate staff
    /// accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a Super Admin.
    pub fn authorize_manage_staff(actor: &StaffActor, action: &str) -> Result<(), AuthError> {
        Self::require_super_admin(actor, action)
    }

    /// Only Super Admins may read the global audit log.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a Super Admin.
    pub fn authorize_view_audit_log(actor: &StaffActor) -> Result<(), AuthError> {
        Self::require_super_admin(actor, "view_audit_log")
    }

    /// Capitol Receiving, who assigns cases, and Super Admins may see
    /// examiner workloads.
    ///
    /// # Errors
    ///
    /// Returns an error for any other role.
    pub fn authorize_view_examiner_load(actor: &StaffActor) -> Result<(), AuthError> {
        match actor.role {
            Role::SuperAdmin | Role::CapitolReceiving => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: String::from("list_examiners"),
                required_role: Role::CapitolReceiving.display_name().to_string(),
            }),
        }
    }

    fn require_super_admin(actor: &StaffActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::SuperAdmin => Ok(()),
            _ => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: Role::SuperAdmin.display_name().to_string(),
            }),
        }
    }
}
