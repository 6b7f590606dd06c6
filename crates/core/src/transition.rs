// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The case transition table.
//!
//! Every permitted `(status, role, action)` combination is a row in
//! `TRANSITIONS`. Anything not listed is rejected. Rows with `to: None`
//! change case data without changing status.
//!
//! Each row carries:
//!
//! - the statuses it may start from
//! - the roles that may perform it
//! - a guard tying the actor to the case (owner, assignee, or anyone)
//! - a precondition over the case, command payload, and looked-up facts
//! - an effect that mutates the case and reports audit details and side effects
//! - the status it ends in
//! - the audit kind it records

use crate::command::{CaseAction, Command};
use crate::state::{Effect, RequestContext, WorkflowFacts};
use legaltrack_audit::AuditAction;
use legaltrack_domain::{Case, CaseStatus, Role, mark_uploaded};

/// Remark text kept in audit details.
pub const MAX_REMARK_AUDIT_CHARS: usize = 2000;

/// How the actor must relate to the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Any actor holding one of the rule's roles.
    Anyone,
    /// The actor must have submitted the case.
    Owner,
    /// The actor must be the current assignee.
    Assignee,
}

/// Checks a precondition. `Err` carries the reason shown to the caller.
pub type Precondition = fn(&Case, &Command, &WorkflowFacts) -> Result<(), String>;

/// Applies a rule's field changes to the case.
pub type Mutation = fn(&mut Case, &Command, &RequestContext) -> Outcome;

/// What a mutation produced besides the case itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Extra audit detail entries.
    pub details: Vec<(&'static str, String)>,
    /// Side effects for the caller.
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn detail(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.details.push((key, value.into()));
        self
    }

    fn effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    pub action: CaseAction,
    pub from: &'static [CaseStatus],
    pub roles: &'static [Role],
    pub guard: Guard,
    pub precondition: Precondition,
    pub mutate: Mutation,
    /// Target status; `None` leaves the status unchanged.
    pub to: Option<CaseStatus>,
    pub audit_action: AuditAction,
}

const SUBMITTERS: &[Role] = &[Role::LguAdmin, Role::CapitolReceiving];
const REMARKERS: &[Role] = &[
    Role::SuperAdmin,
    Role::CapitolReceiving,
    Role::CapitolExaminer,
    Role::CapitolApprover,
    Role::CapitolNumberer,
    Role::CapitolReleaser,
];
const TRACKED: &[CaseStatus] = &[
    CaseStatus::NotReceived,
    CaseStatus::Received,
    CaseStatus::InReview,
    CaseStatus::ForApproval,
    CaseStatus::Approved,
    CaseStatus::ForNumbering,
    CaseStatus::ForRelease,
    CaseStatus::Released,
    CaseStatus::Returned,
    CaseStatus::Withdrawn,
];

/// The complete transition table.
pub static TRANSITIONS: &[TransitionRule] = &[
    TransitionRule {
        action: CaseAction::UpdateDetails,
        from: &[
            CaseStatus::Draft,
            CaseStatus::NotReceived,
            CaseStatus::Returned,
        ],
        roles: SUBMITTERS,
        guard: Guard::Owner,
        precondition: details_present,
        mutate: update_details,
        to: None,
        audit_action: AuditAction::CaseUpdate,
    },
    TransitionRule {
        action: CaseAction::RecordDocument,
        from: &[CaseStatus::Draft, CaseStatus::Returned],
        roles: SUBMITTERS,
        guard: Guard::Owner,
        precondition: document_present,
        mutate: record_document,
        to: None,
        audit_action: AuditAction::CaseUpdate,
    },
    TransitionRule {
        action: CaseAction::DeleteDraft,
        from: &[CaseStatus::Draft],
        roles: SUBMITTERS,
        guard: Guard::Owner,
        precondition: never_submitted,
        mutate: delete_draft,
        to: None,
        audit_action: AuditAction::CaseUpdate,
    },
    TransitionRule {
        action: CaseAction::Finalize,
        from: &[CaseStatus::Draft, CaseStatus::Returned],
        roles: SUBMITTERS,
        guard: Guard::Owner,
        precondition: details_complete,
        mutate: finalize,
        to: Some(CaseStatus::NotReceived),
        audit_action: AuditAction::CaseUpdate,
    },
    TransitionRule {
        action: CaseAction::Receive,
        from: &[CaseStatus::NotReceived, CaseStatus::Returned],
        roles: &[Role::CapitolReceiving],
        guard: Guard::Anyone,
        precondition: always,
        mutate: receive,
        to: Some(CaseStatus::Received),
        audit_action: AuditAction::CaseReceipt,
    },
    TransitionRule {
        action: CaseAction::ReturnToLgu,
        from: &[CaseStatus::NotReceived, CaseStatus::Received],
        roles: &[Role::CapitolReceiving],
        guard: Guard::Anyone,
        precondition: unassigned_with_reason,
        mutate: return_to_lgu,
        to: Some(CaseStatus::Returned),
        audit_action: AuditAction::CaseStatusChange,
    },
    TransitionRule {
        action: CaseAction::Assign,
        from: &[CaseStatus::Received],
        roles: &[Role::CapitolReceiving],
        guard: Guard::Anyone,
        precondition: assignable,
        mutate: assign,
        to: Some(CaseStatus::InReview),
        audit_action: AuditAction::CaseAssignment,
    },
    TransitionRule {
        action: CaseAction::SubmitForApproval,
        from: &[CaseStatus::InReview],
        roles: &[Role::CapitolExaminer],
        guard: Guard::Assignee,
        precondition: always,
        mutate: no_change,
        to: Some(CaseStatus::ForApproval),
        audit_action: AuditAction::CaseStatusChange,
    },
    TransitionRule {
        action: CaseAction::ReturnToReceiving,
        from: &[CaseStatus::InReview],
        roles: &[Role::CapitolExaminer],
        guard: Guard::Assignee,
        precondition: reason_given,
        mutate: return_to_receiving,
        to: Some(CaseStatus::Received),
        audit_action: AuditAction::CaseStatusChange,
    },
    TransitionRule {
        action: CaseAction::Approve,
        from: &[CaseStatus::ForApproval],
        roles: &[Role::CapitolApprover],
        guard: Guard::Anyone,
        precondition: always,
        mutate: no_change,
        to: Some(CaseStatus::ForNumbering),
        audit_action: AuditAction::CaseApproval,
    },
    TransitionRule {
        action: CaseAction::ReturnForCorrection,
        from: &[CaseStatus::ForApproval],
        roles: &[Role::CapitolApprover],
        guard: Guard::Anyone,
        precondition: reason_given,
        mutate: return_for_correction,
        to: Some(CaseStatus::Returned),
        audit_action: AuditAction::CaseRejection,
    },
    TransitionRule {
        action: CaseAction::MarkNumbered,
        from: &[CaseStatus::ForNumbering],
        roles: &[Role::CapitolNumberer],
        guard: Guard::Anyone,
        precondition: number_available,
        mutate: mark_numbered,
        to: Some(CaseStatus::ForRelease),
        audit_action: AuditAction::CaseStatusChange,
    },
    TransitionRule {
        action: CaseAction::Release,
        from: &[CaseStatus::ForRelease],
        roles: &[Role::CapitolReleaser],
        guard: Guard::Anyone,
        precondition: always,
        mutate: release,
        to: Some(CaseStatus::Released),
        audit_action: AuditAction::CaseRelease,
    },
    TransitionRule {
        action: CaseAction::AddRemark,
        from: TRACKED,
        roles: REMARKERS,
        guard: Guard::Anyone,
        precondition: remark_present,
        mutate: add_remark,
        to: None,
        audit_action: AuditAction::CaseRemark,
    },
];

/// Returns every rule for an action.
pub fn rules_for(action: CaseAction) -> impl Iterator<Item = &'static TransitionRule> {
    TRANSITIONS.iter().filter(move |rule| rule.action == action)
}

fn trimmed_reason(command: &Command) -> Option<&str> {
    match command {
        Command::ReturnToLgu { reason }
        | Command::ReturnToReceiving { reason }
        | Command::ReturnForCorrection { reason } => Some(reason.trim()),
        _ => None,
    }
}

// Preconditions

const fn always(_: &Case, _: &Command, _: &WorkflowFacts) -> Result<(), String> {
    Ok(())
}

fn reason_given(_: &Case, command: &Command, _: &WorkflowFacts) -> Result<(), String> {
    match trimmed_reason(command) {
        Some(reason) if !reason.is_empty() => Ok(()),
        _ => Err(String::from("a return reason is required")),
    }
}

fn unassigned_with_reason(
    case: &Case,
    command: &Command,
    facts: &WorkflowFacts,
) -> Result<(), String> {
    if case.assigned_to.is_some() {
        return Err(String::from(
            "the case is assigned and cannot be returned right now",
        ));
    }
    reason_given(case, command, facts)
}

fn details_complete(case: &Case, _: &Command, _: &WorkflowFacts) -> Result<(), String> {
    if case.details_complete() {
        Ok(())
    } else {
        Err(String::from("client details are incomplete"))
    }
}

fn details_present(_: &Case, command: &Command, _: &WorkflowFacts) -> Result<(), String> {
    match command {
        Command::UpdateDetails { client, .. }
            if !client.clone().normalized().name.trim().is_empty() =>
        {
            Ok(())
        }
        _ => Err(String::from("client name is required")),
    }
}

fn document_present(_: &Case, command: &Command, _: &WorkflowFacts) -> Result<(), String> {
    match command {
        Command::RecordDocumentUpload {
            document_type,
            storage_ref,
        } if !document_type.trim().is_empty() && !storage_ref.trim().is_empty() => Ok(()),
        _ => Err(String::from("document type and storage reference are required")),
    }
}

fn never_submitted(case: &Case, _: &Command, _: &WorkflowFacts) -> Result<(), String> {
    if case.tracking_id.is_none() && case.lgu_submitted_at.is_none() {
        Ok(())
    } else {
        Err(String::from("only unsubmitted drafts can be deleted"))
    }
}

fn assignable(case: &Case, command: &Command, _: &WorkflowFacts) -> Result<(), String> {
    if case.assigned_to.is_some() {
        return Err(String::from("the case is already assigned"));
    }
    match command {
        Command::Assign { examiner }
            if examiner.role == Role::CapitolExaminer && examiner.is_active() =>
        {
            Ok(())
        }
        _ => Err(String::from("the assignee must be an active Capitol Examiner")),
    }
}

fn number_available(_: &Case, command: &Command, facts: &WorkflowFacts) -> Result<(), String> {
    let Command::MarkNumbered { numbering_number } = command else {
        return Err(String::from("a number is required"));
    };
    if numbering_number.trim().is_empty() {
        return Err(String::from("a number is required"));
    }
    if facts.numbering_number_taken {
        return Err(format!(
            "number '{}' is already used by another case",
            numbering_number.trim()
        ));
    }
    Ok(())
}

fn remark_present(_: &Case, command: &Command, _: &WorkflowFacts) -> Result<(), String> {
    match command {
        Command::AddRemark { text } if !text.trim().is_empty() => Ok(()),
        _ => Err(String::from("remark text is required")),
    }
}

// Mutations

fn no_change(_: &mut Case, _: &Command, _: &RequestContext) -> Outcome {
    Outcome::default()
}

fn update_details(case: &mut Case, command: &Command, _: &RequestContext) -> Outcome {
    if let Command::UpdateDetails { client, case_type } = command {
        case.client = client.clone().normalized();
        case.case_type = *case_type;
    }
    Outcome::default().detail("step", "1")
}

fn record_document(case: &mut Case, command: &Command, _: &RequestContext) -> Outcome {
    let Command::RecordDocumentUpload {
        document_type,
        storage_ref,
    } = command
    else {
        return Outcome::default();
    };
    let document_type = mark_uploaded(&mut case.checklist, document_type);
    Outcome::default()
        .detail("step", "2")
        .detail("items", case.checklist.len().to_string())
        .detail("document_type", document_type.clone())
        .effect(Effect::StoreDocument {
            document_type,
            storage_ref: storage_ref.trim().to_string(),
        })
}

fn delete_draft(_: &mut Case, _: &Command, _: &RequestContext) -> Outcome {
    Outcome::default()
        .detail("deleted", "true")
        .effect(Effect::DeleteDraft)
}

fn finalize(case: &mut Case, _: &Command, ctx: &RequestContext) -> Outcome {
    case.lgu_submitted_at = Some(ctx.now);
    let outcome = Outcome::default()
        .detail("step", "3")
        .detail("finalized", "true");
    if case.tracking_id.is_none() {
        outcome.effect(Effect::IssueTrackingId)
    } else {
        outcome
    }
}

fn receive(case: &mut Case, _: &Command, ctx: &RequestContext) -> Outcome {
    case.received_at = Some(ctx.now);
    case.received_by = Some(ctx.actor.staff_pk);
    Outcome::default()
}

fn record_return(case: &mut Case, command: &Command, ctx: &RequestContext) -> String {
    let reason = trimmed_reason(command).unwrap_or_default().to_string();
    case.return_reason = Some(reason.clone());
    case.returned_at = Some(ctx.now);
    case.returned_by = Some(ctx.actor.staff_pk);
    reason
}

fn return_to_lgu(case: &mut Case, command: &Command, ctx: &RequestContext) -> Outcome {
    let reason = record_return(case, command, ctx);
    case.lgu_submitted_at = None;
    Outcome::default().detail("reason", reason)
}

fn assign(case: &mut Case, command: &Command, ctx: &RequestContext) -> Outcome {
    let Command::Assign { examiner } = command else {
        return Outcome::default();
    };
    case.assigned_to = Some(examiner.staff_pk);
    case.assigned_at = Some(ctx.now);
    Outcome::default().detail("assigned_to", examiner.email.clone())
}

fn return_to_receiving(case: &mut Case, command: &Command, ctx: &RequestContext) -> Outcome {
    let reason = record_return(case, command, ctx);
    case.clear_assignment();
    Outcome::default()
        .detail("reason", reason)
        .detail("to", Role::CapitolReceiving.as_str())
}

fn return_for_correction(case: &mut Case, command: &Command, ctx: &RequestContext) -> Outcome {
    let reason = record_return(case, command, ctx);
    case.clear_assignment();
    Outcome::default().detail("reason", reason)
}

fn mark_numbered(case: &mut Case, command: &Command, _: &RequestContext) -> Outcome {
    let Command::MarkNumbered { numbering_number } = command else {
        return Outcome::default();
    };
    let number = numbering_number.trim().to_string();
    case.numbering_number = Some(number.clone());
    Outcome::default().detail("number", number)
}

fn release(case: &mut Case, _: &Command, ctx: &RequestContext) -> Outcome {
    case.released_at = Some(ctx.now);
    Outcome::default()
}

fn add_remark(_: &mut Case, command: &Command, _: &RequestContext) -> Outcome {
    let Command::AddRemark { text } = command else {
        return Outcome::default();
    };
    let text = text.trim().to_string();
    let audited: String = text.chars().take(MAX_REMARK_AUDIT_CHARS).collect();
    Outcome::default()
        .detail("text", audited)
        .effect(Effect::StoreRemark { text })
}
