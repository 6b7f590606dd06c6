// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{CaseAction, Command};
use crate::error::CoreError;
use crate::state::{RequestContext, TransitionResult, WorkflowFacts};
use crate::transition::{Guard, TransitionRule, rules_for};
use legaltrack_audit::{Actor, AuditAction, AuditEvent, AuditTarget};
use legaltrack_domain::{Case, CaseStatus, CaseType, ClientDetails, Role, StaffActor, can_view};
use uuid::Uuid;

/// Applies a command to a case, producing the new case and its audit event.
///
/// This function is pure: the caller supplies the current case, the facts
/// the preconditions need, and the request context, and persists the result.
///
/// Checks run in this order:
///
/// 1. the actor must be able to see the case, otherwise `CaseNotFound`
/// 2. some rule for the action must admit the actor's role, otherwise
///    `UnauthorizedRole`
/// 3. one of those rules must start from the current status, otherwise
///    `InvalidState`
/// 4. the rule's owner/assignee guard, otherwise `UnauthorizedRole`
/// 5. the rule's precondition, otherwise `PreconditionFailed`
///
/// # Arguments
///
/// * `facts` - Facts looked up by the caller for preconditions
/// * `ctx` - The acting staff member and request time
/// * `case` - The current case (immutable)
/// * `command` - The command to apply
///
/// # Errors
///
/// Returns an error if any of the checks above fails. On error nothing has
/// been changed.
pub fn apply(
    facts: &WorkflowFacts,
    ctx: &RequestContext,
    case: &Case,
    command: Command,
) -> Result<TransitionResult, CoreError> {
    let action: CaseAction = command.action();
    let rule: &TransitionRule = check_access(&ctx.actor, case, action)?;
    (rule.precondition)(case, &command, facts)
        .map_err(|reason| CoreError::PreconditionFailed { action, reason })?;

    let previous_status: CaseStatus = case.status;
    let mut next: Case = case.clone();
    let outcome = (rule.mutate)(&mut next, &command, ctx);
    if let Some(to) = rule.to {
        next.status = to;
    }
    next.updated_at = ctx.now;

    let mut audit_event: AuditEvent = AuditEvent::new(
        Some(Actor::from(&ctx.actor)),
        rule.audit_action,
        AuditTarget::Case {
            reference: next.reference(),
            case_id: next.case_id,
        },
        ctx.now,
    );
    if rule.to.is_some() {
        audit_event = audit_event
            .with_detail("old_status", previous_status.as_str())
            .with_detail("new_status", next.status.as_str());
    }
    for (key, value) in outcome.details {
        audit_event = audit_event.with_detail(key, value);
    }

    Ok(TransitionResult {
        previous_status,
        case: next,
        audit_event,
        effects: outcome.effects,
    })
}

/// Creates a new draft case owned by the acting staff member.
///
/// # Arguments
///
/// * `ctx` - The acting staff member and request time
/// * `draft_id` - The opaque draft identifier chosen by the caller
/// * `client` - Client details from the first wizard step
/// * `case_type` - The selected case type, if any
///
/// # Errors
///
/// Returns `UnauthorizedRole` unless the actor is an active LGU Admin or
/// Capitol Receiving account, and `PreconditionFailed` if no client name can
/// be derived.
pub fn create_draft(
    ctx: &RequestContext,
    draft_id: Uuid,
    client: ClientDetails,
    case_type: Option<CaseType>,
) -> Result<TransitionResult, CoreError> {
    let role: Role = ctx.actor.role;
    if !ctx.actor.is_active() || !matches!(role, Role::LguAdmin | Role::CapitolReceiving) {
        return Err(CoreError::UnauthorizedRole {
            action: CaseAction::CreateDraft,
            role,
        });
    }

    let case: Case = Case::new_draft(draft_id, ctx.actor.staff_pk, client, case_type, ctx.now);
    if !case.details_complete() {
        return Err(CoreError::PreconditionFailed {
            action: CaseAction::CreateDraft,
            reason: String::from("client name is required"),
        });
    }

    let audit_event: AuditEvent = AuditEvent::new(
        Some(Actor::from(&ctx.actor)),
        AuditAction::CaseCreate,
        AuditTarget::Case {
            reference: case.reference(),
            case_id: None,
        },
        ctx.now,
    )
    .with_detail("client", case.client.name.clone())
    .with_detail("case_type", case.case_type.map_or("", |t| t.as_str()));

    Ok(TransitionResult {
        previous_status: CaseStatus::Draft,
        case,
        audit_event,
        effects: Vec::new(),
    })
}

/// Runs the visibility, role, state, and guard checks of `apply` without
/// a payload.
///
/// Callers that must look something up to build a command (an examiner,
/// say) call this first so that authorization failures are reported ahead
/// of lookup failures.
///
/// # Errors
///
/// Returns `CaseNotFound`, `UnauthorizedRole`, or `InvalidState` exactly as
/// `apply` would.
pub fn authorize(actor: &StaffActor, case: &Case, action: CaseAction) -> Result<(), CoreError> {
    check_access(actor, case, action).map(|_| ())
}

/// Returns true if `actor` could perform `action` on `case` right now,
/// ignoring payload preconditions.
///
/// Used to decide which actions to offer.
#[must_use]
pub fn is_action_available(actor: &StaffActor, case: &Case, action: CaseAction) -> bool {
    check_access(actor, case, action).is_ok()
}

fn check_access(
    actor: &StaffActor,
    case: &Case,
    action: CaseAction,
) -> Result<&'static TransitionRule, CoreError> {
    if !can_view(actor, case) {
        return Err(CoreError::CaseNotFound);
    }
    let rule: &'static TransitionRule = select_rule(action, actor.role, case.status)?;
    check_guard(rule, case, actor)?;
    Ok(rule)
}

fn select_rule(
    action: CaseAction,
    role: Role,
    status: CaseStatus,
) -> Result<&'static TransitionRule, CoreError> {
    let mut permitted = rules_for(action)
        .filter(|rule| rule.roles.contains(&role))
        .peekable();

    if permitted.peek().is_none() {
        return Err(CoreError::UnauthorizedRole { action, role });
    }

    permitted
        .find(|rule| rule.from.contains(&status))
        .ok_or(CoreError::InvalidState { action, status })
}

fn check_guard(rule: &TransitionRule, case: &Case, actor: &StaffActor) -> Result<(), CoreError> {
    let allowed = match rule.guard {
        Guard::Anyone => true,
        Guard::Owner => case.is_owned_by(actor.staff_pk),
        Guard::Assignee => case.is_assigned_to(actor.staff_pk),
    };
    if allowed {
        Ok(())
    } else {
        Err(CoreError::UnauthorizedRole {
            action: rule.action,
            role: actor.role,
        })
    }
}
