// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff accounts, login outcomes, support feedback, and the audit log.
//!
//! Only the parts of the account lifecycle that produce audit entries live
//! here. Credential checks and sessions belong to the identity collaborator.

use legaltrack::RequestContext;
use legaltrack_audit::{Actor, AuditAction, AuditEvent, AuditTarget};
use legaltrack_domain::{AccountStatus, Role, SequenceScope, StaffActor};
use legaltrack_persistence::{
    IdentifierKind, NewStaff, Persistence, StaffRecord, format_timestamp, parse_timestamp,
};
use std::collections::HashMap;
use std::str::FromStr;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::auth::AuthorizationService;
use crate::config::WorkflowConfig;
use crate::error::{ApiError, translate_domain_error};
use crate::handlers::audit_entry_info;
use crate::notify::{Notification, Notifier, dispatch};
use crate::password_policy::{
    PasswordPolicy, generate_activation_nonce, generate_temporary_password, hash_password,
};
use crate::request_response::{
    ActivateAccountRequest, AuditLogResponse, CreateStaffRequest, CreateStaffResponse,
    ExaminerLoad, FeedbackRequest, FeedbackResponse, ListExaminersResponse, ListStaffResponse,
    LoginEventRequest, LoginOutcome, StaffInfo, StaffStatusResponse, UpdateStaffRequest,
    WriteResponse,
};

/// Default number of entries returned by the audit log.
pub const DEFAULT_AUDIT_LOG_LIMIT: i64 = 100;

/// Largest audit log page.
pub const MAX_AUDIT_LOG_LIMIT: i64 = 1000;

/// Longest accepted feedback message, in characters.
pub const MAX_FEEDBACK_CHARS: usize = 5000;

/// How long an activation link stays valid after it is sent.
pub const ACTIVATION_LINK_MAX_AGE: Duration = Duration::hours(1);

/// Creates a pending staff account and issues its activation.
///
/// The staff ID is allocated from the role's sequence. The temporary
/// password is stored only as a bcrypt hash and travels to the new user in
/// the `ActivationIssued` notification, sent after commit.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `config` - Allocation settings
/// * `notifier` - Receives the activation notification
/// * `ctx` - The acting Super Admin and request time
/// * `request` - The new account's details
///
/// # Errors
///
/// Returns `UnauthorizedRole` unless the actor is a Super Admin,
/// `InvalidInput` for malformed fields, `PreconditionFailed` if the email is
/// already registered, or `AllocationExhausted` if no staff ID is free.
pub fn create_staff(
    persistence: &mut Persistence,
    config: &WorkflowConfig,
    notifier: &dyn Notifier,
    ctx: &RequestContext,
    request: &CreateStaffRequest,
) -> Result<CreateStaffResponse, ApiError> {
    AuthorizationService::authorize_manage_staff(&ctx.actor, AuditAction::CreateUser.as_str())?;

    let role: Role = Role::from_str(request.role.trim()).map_err(translate_domain_error)?;
    let email: String = request.email.trim().to_lowercase();
    if !is_plausible_email(&email) {
        return Err(ApiError::invalid_input("email", "a valid email address is required"));
    }
    let full_name: String = request.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(ApiError::invalid_input("full_name", "full name is required"));
    }
    let lgu_municipality: Option<String> = request
        .lgu_municipality
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    if role == Role::LguAdmin && lgu_municipality.is_none() {
        return Err(ApiError::invalid_input(
            "lgu_municipality",
            "LGU Admin accounts must name their municipality",
        ));
    }

    if persistence.get_staff_by_email(&email)?.is_some() {
        return Err(ApiError::PreconditionFailed {
            action: AuditAction::CreateUser.as_str().to_string(),
            message: format!("{email} is already registered"),
        });
    }

    let temporary_password: String = generate_temporary_password();
    let password_hash: String = hash_password(&temporary_password).map_err(|e| {
        ApiError::Internal {
            message: format!("Failed to hash password: {e}"),
        }
    })?;
    let new_staff: NewStaff = NewStaff {
        email,
        full_name,
        role,
        lgu_municipality,
        password_hash,
        activation_nonce: generate_activation_nonce(),
        created_at: ctx.now,
    };

    let created: StaffRecord = persistence.transaction(|p: &mut Persistence| {
        let staff_pk: i64 = p.allocate_identifier(
            IdentifierKind::StaffId,
            &SequenceScope::staff(role),
            config.allocation_attempts,
            |p: &mut Persistence, staff_id: &str| p.insert_staff(staff_id, &new_staff),
        )?;
        let record: StaffRecord = load_staff(p, staff_pk)?;

        let actor: Option<Actor> = Some(Actor::from(&ctx.actor));
        let target: AuditTarget = AuditTarget::user(&record.actor);
        p.persist_audit_event(
            &AuditEvent::new(actor.clone(), AuditAction::CreateUser, target.clone(), ctx.now)
                .with_detail("staff_id", record.actor.staff_id.clone())
                .with_detail("role", role.display_name())
                .with_detail("account_status", record.actor.account_status.as_str()),
        )?;
        p.persist_audit_event(
            &AuditEvent::new(actor, AuditAction::ActivationEmailSent, target, ctx.now)
                .with_detail("email", record.actor.email.clone()),
        )?;
        Ok::<_, ApiError>(record)
    })?;

    info!(
        staff_pk = created.actor.staff_pk,
        staff_id = %created.actor.staff_id,
        role = role.as_str(),
        "Created staff account"
    );

    let notification: Notification = Notification::ActivationIssued {
        staff_pk: created.actor.staff_pk,
        staff_id: created.actor.staff_id.clone(),
        email: created.actor.email.clone(),
        full_name: created.actor.full_name.clone(),
        activation_nonce: created.activation_nonce.clone().unwrap_or_default(),
        temporary_password,
    };
    dispatch(notifier, &[notification]);

    Ok(CreateStaffResponse {
        staff_pk: created.actor.staff_pk,
        staff_id: created.actor.staff_id.clone(),
        email: created.actor.email.clone(),
        role,
        account_status: created.actor.account_status,
        message: format!("Created {} ({})", created.actor.staff_id, role.display_name()),
    })
}

/// Creates the first Super Admin account when none exists.
///
/// The account is active at once. Its password is random and never
/// revealed; the identity collaborator owns credentials. Returns `None` when
/// a Super Admin already exists.
///
/// # Errors
///
/// Returns `InvalidInput` for a malformed email or blank name, or any
/// persistence failure.
pub fn bootstrap_super_admin(
    persistence: &mut Persistence,
    config: &WorkflowConfig,
    email: &str,
    full_name: &str,
    now: OffsetDateTime,
) -> Result<Option<StaffInfo>, ApiError> {
    let email: String = email.trim().to_lowercase();
    if !is_plausible_email(&email) {
        return Err(ApiError::invalid_input("email", "a valid email address is required"));
    }
    let full_name: String = full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(ApiError::invalid_input("full_name", "full name is required"));
    }

    if persistence
        .list_staff()?
        .iter()
        .any(|record| record.actor.role == Role::SuperAdmin)
    {
        return Ok(None);
    }

    let password_hash: String = hash_password(&generate_temporary_password()).map_err(|e| {
        ApiError::Internal {
            message: format!("Failed to hash password: {e}"),
        }
    })?;
    let new_staff: NewStaff = NewStaff {
        email,
        full_name,
        role: Role::SuperAdmin,
        lgu_municipality: None,
        password_hash: password_hash.clone(),
        activation_nonce: generate_activation_nonce(),
        created_at: now,
    };

    let created: StaffRecord = persistence.transaction(|p: &mut Persistence| {
        let staff_pk: i64 = p.allocate_identifier(
            IdentifierKind::StaffId,
            &SequenceScope::staff(Role::SuperAdmin),
            config.allocation_attempts,
            |p: &mut Persistence, staff_id: &str| p.insert_staff(staff_id, &new_staff),
        )?;
        p.activate_staff(staff_pk, &password_hash, &format_timestamp(now)?)?;
        let record: StaffRecord = load_staff(p, staff_pk)?;
        p.persist_audit_event(
            &AuditEvent::new(
                None,
                AuditAction::CreateUser,
                AuditTarget::user(&record.actor),
                now,
            )
            .with_detail("staff_id", record.actor.staff_id.clone())
            .with_detail("role", Role::SuperAdmin.display_name())
            .with_detail("account_status", record.actor.account_status.as_str())
            .with_detail("method", "bootstrap"),
        )?;
        Ok::<_, ApiError>(record)
    })?;

    info!(
        staff_pk = created.actor.staff_pk,
        staff_id = %created.actor.staff_id,
        "Bootstrapped Super Admin account"
    );
    Ok(Some(staff_info(&created.actor)))
}

/// Activates a pending account from its activation link.
///
/// The holder chooses a new password, which must satisfy the password
/// policy. The nonce is single-use and expires `ACTIVATION_LINK_MAX_AGE`
/// after it was sent.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown or used nonce,
/// `InvalidState` if the account is not pending, `PreconditionFailed` if
/// the link has expired, or `PasswordPolicyViolation` if the new password
/// is rejected.
pub fn activate_account(
    persistence: &mut Persistence,
    request: &ActivateAccountRequest,
    now: OffsetDateTime,
) -> Result<StaffStatusResponse, ApiError> {
    let record: StaffRecord = persistence
        .get_staff_by_activation_nonce(request.nonce.trim())?
        .ok_or_else(|| ApiError::not_found("Activation", "unknown or already used link"))?;

    if record.actor.account_status != AccountStatus::Pending {
        return Err(ApiError::InvalidState {
            action: AuditAction::ActivateAccount.as_str().to_string(),
            message: format!("account is {}", record.actor.account_status.as_str()),
        });
    }
    if activation_expired(&record, now)? {
        warn!(staff_pk = record.actor.staff_pk, "Rejected expired activation link");
        return Err(ApiError::PreconditionFailed {
            action: AuditAction::ActivateAccount.as_str().to_string(),
            message: String::from(
                "activation link expired; ask the Super Admin to resend it",
            ),
        });
    }

    PasswordPolicy::default().validate(
        &request.new_password,
        &request.confirmation,
        &record.actor,
    )?;
    let password_hash: String = hash_password(&request.new_password).map_err(|e| {
        ApiError::Internal {
            message: format!("Failed to hash password: {e}"),
        }
    })?;

    let staff_pk: i64 = record.actor.staff_pk;
    let activated: StaffRecord = persistence.transaction(|p: &mut Persistence| {
        p.activate_staff(staff_pk, &password_hash, &format_timestamp(now)?)?;
        let activated: StaffRecord = load_staff(p, staff_pk)?;
        p.persist_audit_event(
            &AuditEvent::new(
                Some(Actor::from(&activated.actor)),
                AuditAction::ActivateAccount,
                AuditTarget::user(&activated.actor),
                now,
            )
            .with_detail("method", "activation_link"),
        )?;
        Ok::<_, ApiError>(activated)
    })?;

    info!(staff_pk, staff_id = %activated.actor.staff_id, "Activated staff account");
    Ok(StaffStatusResponse {
        staff: staff_info(&activated.actor),
        message: String::from("Account activated"),
    })
}

fn activation_expired(record: &StaffRecord, now: OffsetDateTime) -> Result<bool, ApiError> {
    let Some(sent_at) = record.activation_sent_at.as_deref() else {
        return Ok(true);
    };
    let sent_at: OffsetDateTime = parse_timestamp(sent_at)?;
    Ok(now - sent_at > ACTIVATION_LINK_MAX_AGE)
}

/// Issues a pending account a new temporary password and activation link.
///
/// Earlier links stop working. The credentials travel in an
/// `ActivationIssued` notification sent after commit.
///
/// # Errors
///
/// Returns `UnauthorizedRole` unless the actor is a Super Admin,
/// `ResourceNotFound` for an unknown account, or `InvalidState` if the
/// account is not pending.
pub fn resend_activation(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    ctx: &RequestContext,
    staff_pk: i64,
) -> Result<StaffStatusResponse, ApiError> {
    AuthorizationService::authorize_manage_staff(
        &ctx.actor,
        AuditAction::ActivationEmailSent.as_str(),
    )?;

    let temporary_password: String = generate_temporary_password();
    let password_hash: String = hash_password(&temporary_password).map_err(|e| {
        ApiError::Internal {
            message: format!("Failed to hash password: {e}"),
        }
    })?;
    let activation_nonce: String = generate_activation_nonce();

    let reissued: StaffRecord = persistence.transaction(|p: &mut Persistence| {
        let record: StaffRecord = load_staff(p, staff_pk)?;
        if record.actor.account_status != AccountStatus::Pending {
            return Err(ApiError::InvalidState {
                action: AuditAction::ActivationEmailSent.as_str().to_string(),
                message: format!("account is {}", record.actor.account_status.as_str()),
            });
        }

        p.reissue_activation(
            staff_pk,
            &password_hash,
            &activation_nonce,
            &format_timestamp(ctx.now)?,
        )?;
        let reissued: StaffRecord = load_staff(p, staff_pk)?;
        p.persist_audit_event(
            &AuditEvent::new(
                Some(Actor::from(&ctx.actor)),
                AuditAction::ActivationEmailSent,
                AuditTarget::user(&reissued.actor),
                ctx.now,
            )
            .with_detail("email", reissued.actor.email.clone())
            .with_detail("resend", "true"),
        )?;
        Ok(reissued)
    })?;

    info!(
        staff_pk,
        staff_id = %reissued.actor.staff_id,
        "Resent activation link"
    );

    let notification: Notification = Notification::ActivationIssued {
        staff_pk,
        staff_id: reissued.actor.staff_id.clone(),
        email: reissued.actor.email.clone(),
        full_name: reissued.actor.full_name.clone(),
        activation_nonce,
        temporary_password,
    };
    dispatch(notifier, &[notification]);

    Ok(StaffStatusResponse {
        staff: staff_info(&reissued.actor),
        message: String::from("Activation link resent"),
    })
}

/// Deactivates an active account.
///
/// # Errors
///
/// Returns `UnauthorizedRole` unless the actor is a Super Admin,
/// `PreconditionFailed` if the actor targets their own account, or
/// `InvalidState` if the account is not active.
pub fn deactivate_staff(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    staff_pk: i64,
) -> Result<StaffStatusResponse, ApiError> {
    AuthorizationService::authorize_manage_staff(
        &ctx.actor,
        AuditAction::DeactivateUser.as_str(),
    )?;
    if staff_pk == ctx.actor.staff_pk {
        return Err(ApiError::PreconditionFailed {
            action: AuditAction::DeactivateUser.as_str().to_string(),
            message: String::from("you cannot deactivate your own account"),
        });
    }
    change_account_status(
        persistence,
        ctx,
        staff_pk,
        AccountStatus::Active,
        AccountStatus::Inactive,
        AuditAction::DeactivateUser,
    )
}

/// Reactivates an inactive account.
///
/// # Errors
///
/// Returns `UnauthorizedRole` unless the actor is a Super Admin, or
/// `InvalidState` if the account is not inactive.
pub fn reactivate_staff(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    staff_pk: i64,
) -> Result<StaffStatusResponse, ApiError> {
    AuthorizationService::authorize_manage_staff(
        &ctx.actor,
        AuditAction::ReactivateUser.as_str(),
    )?;
    change_account_status(
        persistence,
        ctx,
        staff_pk,
        AccountStatus::Inactive,
        AccountStatus::Active,
        AuditAction::ReactivateUser,
    )
}

fn change_account_status(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    staff_pk: i64,
    from: AccountStatus,
    to: AccountStatus,
    audit_action: AuditAction,
) -> Result<StaffStatusResponse, ApiError> {
    let updated: StaffRecord = persistence.transaction(|p: &mut Persistence| {
        let record: StaffRecord = load_staff(p, staff_pk)?;
        if record.actor.account_status != from {
            return Err(ApiError::InvalidState {
                action: audit_action.as_str().to_string(),
                message: format!("account is {}", record.actor.account_status.as_str()),
            });
        }

        p.set_account_status(staff_pk, to)?;
        let updated: StaffRecord = load_staff(p, staff_pk)?;
        p.persist_audit_event(
            &AuditEvent::new(
                Some(Actor::from(&ctx.actor)),
                audit_action,
                AuditTarget::user(&updated.actor),
                ctx.now,
            )
            .with_detail("staff_id", updated.actor.staff_id.clone())
            .with_detail("old_status", from.as_str())
            .with_detail("new_status", to.as_str()),
        )?;
        Ok(updated)
    })?;

    info!(
        staff_pk,
        staff_id = %updated.actor.staff_id,
        status = to.as_str(),
        "Changed account status"
    );
    Ok(StaffStatusResponse {
        staff: staff_info(&updated.actor),
        message: format!("Account is now {}", to.as_str()),
    })
}

/// Edits a staff member's name and municipality.
///
/// # Errors
///
/// Returns `UnauthorizedRole` unless the actor is a Super Admin,
/// `InvalidInput` for a blank name, or `ResourceNotFound` for an unknown
/// account.
pub fn update_staff(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    staff_pk: i64,
    request: &UpdateStaffRequest,
) -> Result<StaffStatusResponse, ApiError> {
    AuthorizationService::authorize_manage_staff(&ctx.actor, AuditAction::UpdateUser.as_str())?;
    let full_name: &str = request.full_name.trim();
    if full_name.is_empty() {
        return Err(ApiError::invalid_input("full_name", "full name is required"));
    }
    let lgu_municipality: Option<&str> = request
        .lgu_municipality
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());

    let updated: StaffRecord = persistence.transaction(|p: &mut Persistence| {
        p.update_staff_profile(staff_pk, full_name, lgu_municipality)?;
        let updated: StaffRecord = load_staff(p, staff_pk)?;
        p.persist_audit_event(
            &AuditEvent::new(
                Some(Actor::from(&ctx.actor)),
                AuditAction::UpdateUser,
                AuditTarget::user(&updated.actor),
                ctx.now,
            )
            .with_detail("full_name", full_name)
            .with_detail("lgu_municipality", lgu_municipality.unwrap_or_default()),
        )?;
        Ok::<_, ApiError>(updated)
    })?;

    info!(staff_pk, "Updated staff profile");
    Ok(StaffStatusResponse {
        staff: staff_info(&updated.actor),
        message: String::from("Profile updated"),
    })
}

/// Lists every staff account.
///
/// # Errors
///
/// Returns `UnauthorizedRole` unless the actor is a Super Admin.
pub fn list_staff(
    persistence: &mut Persistence,
    actor: &StaffActor,
) -> Result<ListStaffResponse, ApiError> {
    AuthorizationService::authorize_manage_staff(actor, "list_users")?;
    let staff: Vec<StaffInfo> = persistence
        .list_staff()?
        .iter()
        .map(|record| staff_info(&record.actor))
        .collect();
    Ok(ListStaffResponse { staff })
}

/// Lists active examiners with their in-review workload.
///
/// Ordered by workload, then name, then email, so the first entry is the
/// natural next assignee.
///
/// # Errors
///
/// Returns `UnauthorizedRole` unless the actor is Capitol Receiving or a
/// Super Admin.
pub fn list_examiners(
    persistence: &mut Persistence,
    actor: &StaffActor,
) -> Result<ListExaminersResponse, ApiError> {
    AuthorizationService::authorize_view_examiner_load(actor)?;
    let loads: HashMap<i64, i64> = persistence.in_review_load_by_assignee()?;

    let mut examiners: Vec<ExaminerLoad> = persistence
        .list_staff()?
        .iter()
        .filter(|record| record.actor.role == Role::CapitolExaminer && record.actor.is_active())
        .map(|record| ExaminerLoad {
            staff: staff_info(&record.actor),
            in_review: loads.get(&record.actor.staff_pk).copied().unwrap_or(0),
        })
        .collect();
    examiners.sort_by(|a, b| {
        a.in_review
            .cmp(&b.in_review)
            .then_with(|| a.staff.full_name.cmp(&b.staff.full_name))
            .then_with(|| a.staff.email.cmp(&b.staff.email))
    });

    Ok(ListExaminersResponse { examiners })
}

/// Records a login outcome reported by the identity collaborator.
///
/// Unknown emails are still recorded, without an actor.
///
/// # Errors
///
/// Returns an error if the audit entry cannot be stored.
pub fn record_login_event(
    persistence: &mut Persistence,
    request: &LoginEventRequest,
    now: OffsetDateTime,
) -> Result<WriteResponse, ApiError> {
    let email: String = request.email.trim().to_lowercase();
    let staff: Option<StaffActor> = persistence
        .get_staff_by_email(&email)?
        .map(|record| record.actor);

    let action: AuditAction = match request.outcome {
        LoginOutcome::Success => AuditAction::Login,
        LoginOutcome::Failure => AuditAction::LoginFailed,
        LoginOutcome::Logout => AuditAction::Logout,
    };
    let target: AuditTarget = staff.as_ref().map_or(AuditTarget::None, AuditTarget::user);
    let mut event: AuditEvent =
        AuditEvent::new(staff.as_ref().map(Actor::from), action, target, now)
            .with_detail("email", email.clone());
    if action == AuditAction::LoginFailed {
        event = event.with_detail(
            "reason",
            request.reason.as_deref().unwrap_or("invalid credentials"),
        );
        warn!(email = %email, "Login failed");
    }

    let event_id: i64 = persistence.transaction(|p: &mut Persistence| {
        p.persist_audit_event(&event).map_err(ApiError::from)
    })?;

    Ok(WriteResponse {
        event_id,
        message: format!("Recorded {}", action.as_str()),
    })
}

/// Stores a support feedback message. Anonymous submissions are allowed.
///
/// # Errors
///
/// Returns `InvalidInput` for a blank or oversized message.
pub fn submit_feedback(
    persistence: &mut Persistence,
    actor: Option<&StaffActor>,
    request: &FeedbackRequest,
    now: OffsetDateTime,
) -> Result<FeedbackResponse, ApiError> {
    let message: &str = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::invalid_input("message", "message is required"));
    }
    if message.chars().count() > MAX_FEEDBACK_CHARS {
        return Err(ApiError::invalid_input(
            "message",
            format!("message must be at most {MAX_FEEDBACK_CHARS} characters"),
        ));
    }
    let name: Option<&str> = non_blank(request.name.as_deref());
    let email: Option<&str> = non_blank(request.email.as_deref());

    let feedback_id: i64 = persistence.transaction(|p: &mut Persistence| {
        let feedback_id: i64 = p.insert_feedback(name, email, message, &format_timestamp(now)?)?;
        p.persist_audit_event(
            &AuditEvent::new(
                actor.map(Actor::from),
                AuditAction::SupportFeedback,
                AuditTarget::None,
                now,
            )
            .with_detail("feedback_id", feedback_id.to_string())
            .with_detail("name", name.unwrap_or("Anonymous"))
            .with_detail("email", email.unwrap_or_default()),
        )?;
        Ok::<_, ApiError>(feedback_id)
    })?;

    info!(feedback_id, "Stored support feedback");
    Ok(FeedbackResponse {
        feedback_id,
        message: String::from("Thank you for your feedback"),
    })
}

/// Returns the newest audit entries, optionally for one action.
///
/// # Errors
///
/// Returns `UnauthorizedRole` unless the actor is a Super Admin, or
/// `InvalidInput` for an unknown action.
pub fn list_audit_log(
    persistence: &mut Persistence,
    actor: &StaffActor,
    action: Option<&str>,
    limit: Option<i64>,
) -> Result<AuditLogResponse, ApiError> {
    AuthorizationService::authorize_view_audit_log(actor)?;
    let action: Option<AuditAction> = action
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(AuditAction::from_str)
        .transpose()
        .map_err(|e| ApiError::invalid_input("action", e))?;
    let limit: i64 = limit
        .unwrap_or(DEFAULT_AUDIT_LOG_LIMIT)
        .clamp(1, MAX_AUDIT_LOG_LIMIT);

    let entries = persistence
        .list_audit_events(action, limit)?
        .iter()
        .map(audit_entry_info)
        .collect::<Result<_, _>>()?;
    Ok(AuditLogResponse { entries })
}

fn load_staff(p: &mut Persistence, staff_pk: i64) -> Result<StaffRecord, ApiError> {
    p.get_staff_by_pk(staff_pk)?
        .ok_or_else(|| ApiError::not_found("Staff", staff_pk.to_string()))
}

fn staff_info(actor: &StaffActor) -> StaffInfo {
    StaffInfo {
        staff_pk: actor.staff_pk,
        staff_id: actor.staff_id.clone(),
        email: actor.email.clone(),
        full_name: actor.full_name.clone(),
        role: actor.role,
        account_status: actor.account_status,
        lgu_municipality: actor.lgu_municipality.clone(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    }) && !email.contains(char::is_whitespace)
}
