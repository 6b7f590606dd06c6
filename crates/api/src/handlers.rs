// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case workflow handlers.
//!
//! Every write runs in one transaction: load the case, authorize, look up
//! the facts the engine needs, apply the command, allocate a tracking ID if
//! one is due, compare-and-swap the case row, perform the side effects, and
//! append the audit entry. Notifications go out only after commit.

use legaltrack::{
    CaseAction, Command, Effect, RequestContext, TransitionResult, WorkflowFacts, apply, authorize,
    is_action_available,
};
use legaltrack_audit::{AuditEvent, AuditTarget};
use legaltrack_domain::{
    Case, CaseTab, CaseType, StaffActor, can_view, public_status_label, work_queue,
};
use legaltrack_persistence::{
    CaseDocumentRecord, CaseRemarkRecord, IdentifierKind, Persistence, format_optional,
    format_timestamp,
};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::error::{ApiError, TransitionCode, translate_core_error, translate_domain_error};
use crate::notify::{Notification, Notifier, dispatch};
use crate::request_response::{
    AddRemarkRequest, AuditEntryInfo, CaseActionRequest, CaseDetailResponse, CaseInfo,
    CreateDraftRequest, ListCasesResponse, RecordDocumentRequest, TimelineResponse,
    TrackingResponse, TransitionResponse, UpdateDraftRequest,
};

/// How a request names a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseLocator {
    /// Submitted cases are addressed by tracking ID.
    Tracking(String),
    /// Any case, including one never submitted, by its draft ID.
    Draft(Uuid),
}

impl CaseLocator {
    /// Parses a draft ID from a path segment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `draft_id` is not a UUID.
    pub fn draft(draft_id: &str) -> Result<Self, ApiError> {
        Uuid::parse_str(draft_id.trim())
            .map(Self::Draft)
            .map_err(|_| ApiError::invalid_input("draft_id", "not a valid draft identifier"))
    }

    fn load(&self, persistence: &mut Persistence) -> Result<Case, ApiError> {
        let found: Option<Case> = match self {
            Self::Tracking(tracking_id) => {
                persistence.get_case_by_tracking_id(tracking_id.trim())?
            }
            Self::Draft(draft_id) => persistence.get_case_by_draft_id(*draft_id)?,
        };
        found.ok_or_else(|| ApiError::not_found("Case", self.to_string()))
    }
}

impl std::fmt::Display for CaseLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tracking(tracking_id) => write!(f, "{tracking_id}"),
            Self::Draft(draft_id) => write!(f, "draft {draft_id}"),
        }
    }
}

/// Creates a draft owned by the acting staff member.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `ctx` - The acting staff member and request time
/// * `request` - Client details and optional case type
///
/// # Errors
///
/// Returns `UnauthorizedRole` for roles that cannot submit, and
/// `PreconditionFailed` if no client name can be derived.
pub fn create_draft(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &CreateDraftRequest,
) -> Result<TransitionResponse, ApiError> {
    let case_type: Option<CaseType> = parse_case_type(request.case_type.as_deref())?;
    let result: TransitionResult =
        legaltrack::create_draft(ctx, Uuid::new_v4(), request.client.clone(), case_type)
            .map_err(translate_core_error)?;

    let response: TransitionResponse = persistence.transaction(|p: &mut Persistence| {
        let case_id: i64 = p.insert_case(&result.case)?;
        let mut case: Case = result.case.clone();
        case.case_id = Some(case_id);

        let mut event: AuditEvent = result.audit_event.clone();
        event.target = AuditTarget::Case {
            reference: case.reference(),
            case_id: Some(case_id),
        };
        let event_id: i64 = p.persist_audit_event(&event)?;

        Ok::<_, ApiError>(TransitionResponse {
            code: TransitionCode::Ok.as_str().to_string(),
            action: CaseAction::CreateDraft.as_str().to_string(),
            previous_status: result.previous_status,
            case: Some(case_info(&case)?),
            event_id,
            message: format!("Created {}", case.reference()),
        })
    })?;

    info!(
        staff_id = %ctx.actor.staff_id,
        draft_id = ?response.case.as_ref().map(|c| c.draft_id.clone()),
        "Created draft"
    );
    Ok(response)
}

/// Replaces the client details of a draft or returned case.
///
/// # Errors
///
/// Returns an error if the actor does not own the case, the case is no
/// longer editable, or the new details have no client name.
pub fn update_draft(
    persistence: &mut Persistence,
    config: &WorkflowConfig,
    notifier: &dyn Notifier,
    ctx: &RequestContext,
    locator: &CaseLocator,
    request: &UpdateDraftRequest,
) -> Result<TransitionResponse, ApiError> {
    let case_type: Option<CaseType> = parse_case_type(request.case_type.as_deref())?;
    let command: Command = Command::UpdateDetails {
        client: request.client.clone(),
        case_type,
    };
    execute_case_command(persistence, config, notifier, ctx, locator, command.action(), |_, _| {
        Ok(command)
    })
}

/// Records a document already accepted by document storage.
///
/// # Errors
///
/// Returns an error if the actor does not own the case, the case is no
/// longer editable, or either field is blank.
pub fn record_document(
    persistence: &mut Persistence,
    config: &WorkflowConfig,
    notifier: &dyn Notifier,
    ctx: &RequestContext,
    locator: &CaseLocator,
    request: &RecordDocumentRequest,
) -> Result<TransitionResponse, ApiError> {
    let command: Command = Command::RecordDocumentUpload {
        document_type: request.document_type.trim().to_string(),
        storage_ref: request.storage_ref.clone(),
    };
    execute_case_command(persistence, config, notifier, ctx, locator, command.action(), |_, _| {
        Ok(command)
    })
}

/// Submits a draft, or resubmits a returned case.
///
/// The first submission allocates the tracking ID.
///
/// # Errors
///
/// Returns an error if the transition is not allowed, or
/// `AllocationExhausted` if no tracking ID could be allocated.
pub fn finalize_draft(
    persistence: &mut Persistence,
    config: &WorkflowConfig,
    notifier: &dyn Notifier,
    ctx: &RequestContext,
    locator: &CaseLocator,
) -> Result<TransitionResponse, ApiError> {
    execute_case_command(
        persistence,
        config,
        notifier,
        ctx,
        locator,
        CaseAction::Finalize,
        |_, _| Ok(Command::Finalize),
    )
}

/// Deletes a draft that was never submitted.
///
/// # Errors
///
/// Returns an error if the case was ever submitted or the actor does not
/// own it.
pub fn delete_draft(
    persistence: &mut Persistence,
    config: &WorkflowConfig,
    notifier: &dyn Notifier,
    ctx: &RequestContext,
    locator: &CaseLocator,
) -> Result<TransitionResponse, ApiError> {
    execute_case_command(
        persistence,
        config,
        notifier,
        ctx,
        locator,
        CaseAction::DeleteDraft,
        |_, _| Ok(Command::DeleteDraft),
    )
}

/// Attaches an internal remark.
///
/// # Errors
///
/// Returns an error if the actor may not remark on the case or the text is
/// blank.
pub fn add_remark(
    persistence: &mut Persistence,
    config: &WorkflowConfig,
    notifier: &dyn Notifier,
    ctx: &RequestContext,
    locator: &CaseLocator,
    request: &AddRemarkRequest,
) -> Result<TransitionResponse, ApiError> {
    let command: Command = Command::AddRemark {
        text: request.text.clone(),
    };
    execute_case_command(persistence, config, notifier, ctx, locator, command.action(), |_, _| {
        Ok(command)
    })
}

/// Performs a named workflow action on a case.
///
/// # Errors
///
/// Returns `InvalidInput` for unknown action codes, and otherwise whatever
/// the transition reports.
pub fn perform_case_action(
    persistence: &mut Persistence,
    config: &WorkflowConfig,
    notifier: &dyn Notifier,
    ctx: &RequestContext,
    locator: &CaseLocator,
    request: &CaseActionRequest,
) -> Result<TransitionResponse, ApiError> {
    let action: CaseAction =
        CaseAction::from_str(request.action.trim()).map_err(translate_domain_error)?;
    let reason: String = request.reason.clone().unwrap_or_default();

    execute_case_command(
        persistence,
        config,
        notifier,
        ctx,
        locator,
        action,
        |p: &mut Persistence, _: &Case| match action {
            CaseAction::Receive => Ok(Command::Receive),
            CaseAction::SubmitForApproval => Ok(Command::SubmitForApproval),
            CaseAction::Approve => Ok(Command::Approve),
            CaseAction::Release => Ok(Command::Release),
            CaseAction::Finalize => Ok(Command::Finalize),
            CaseAction::ReturnToLgu => Ok(Command::ReturnToLgu { reason }),
            CaseAction::ReturnToReceiving => Ok(Command::ReturnToReceiving { reason }),
            CaseAction::ReturnForCorrection => Ok(Command::ReturnForCorrection { reason }),
            CaseAction::MarkNumbered => Ok(Command::MarkNumbered {
                numbering_number: request.numbering_number.clone().unwrap_or_default(),
            }),
            CaseAction::Assign => {
                let examiner: StaffActor = load_examiner(p, request.examiner_id)?;
                Ok(Command::Assign { examiner })
            }
            CaseAction::CreateDraft
            | CaseAction::AddRemark
            | CaseAction::UpdateDetails
            | CaseAction::RecordDocument
            | CaseAction::DeleteDraft => Err(ApiError::invalid_input(
                "action",
                format!("'{action}' has its own endpoint"),
            )),
        },
    )
}

/// Runs one command against one case inside a single transaction.
///
/// `build` is called after the actor has been authorized for `action`, so
/// lookups it performs cannot leak information to unauthorized callers.
fn execute_case_command<F>(
    persistence: &mut Persistence,
    config: &WorkflowConfig,
    notifier: &dyn Notifier,
    ctx: &RequestContext,
    locator: &CaseLocator,
    action: CaseAction,
    build: F,
) -> Result<TransitionResponse, ApiError>
where
    F: FnOnce(&mut Persistence, &Case) -> Result<Command, ApiError>,
{
    let (response, notifications) = persistence.transaction(|p: &mut Persistence| {
        let case: Case = locator.load(p)?;
        authorize(&ctx.actor, &case, action).map_err(translate_core_error)?;
        let command: Command = build(p, &case)?;
        let facts: WorkflowFacts = workflow_facts(p, &case, &command)?;
        let result: TransitionResult =
            apply(&facts, ctx, &case, command).map_err(translate_core_error)?;

        let case_id: i64 = case.case_id.ok_or_else(|| ApiError::Internal {
            message: String::from("stored case has no key"),
        })?;
        let result: TransitionResult =
            store_transition(p, config, ctx, case_id, case.version, result)?;
        perform_effects(p, ctx, case_id, &result.effects)?;
        let event_id: i64 = p.persist_audit_event(&result.audit_event)?;

        let notifications: Vec<Notification> = result
            .status_change()
            .map(|(from, to)| Notification::CaseTransitioned {
                case_id,
                tracking_id: result.case.tracking_id.clone(),
                action,
                from,
                to,
                actor_staff_pk: ctx.actor.staff_pk,
            })
            .into_iter()
            .collect();

        let deleted: bool = result.effects.contains(&Effect::DeleteDraft);
        let response: TransitionResponse = TransitionResponse {
            code: TransitionCode::Ok.as_str().to_string(),
            action: action.as_str().to_string(),
            case: if deleted {
                None
            } else {
                Some(case_info(&result.case)?)
            },
            previous_status: result.previous_status,
            event_id,
            message: format!("{action} on {}", result.case.reference()),
        };
        Ok::<_, ApiError>((response, notifications))
    })?;

    info!(
        staff_id = %ctx.actor.staff_id,
        action = action.as_str(),
        event_id = response.event_id,
        "Case action committed"
    );
    dispatch(notifier, &notifications);
    Ok(response)
}

/// Writes the transitioned case: delete, allocate-and-update, or plain
/// compare-and-swap update.
fn store_transition(
    p: &mut Persistence,
    config: &WorkflowConfig,
    ctx: &RequestContext,
    case_id: i64,
    expected_version: i64,
    mut result: TransitionResult,
) -> Result<TransitionResult, ApiError> {
    if result.effects.contains(&Effect::DeleteDraft) {
        p.delete_case(case_id, expected_version)?;
        return Ok(result);
    }

    if result.needs_tracking_id() {
        let scope = config
            .tracking_scope(ctx.now)
            .map_err(translate_domain_error)?;
        let issued: TransitionResult = p.allocate_identifier(
            IdentifierKind::TrackingId,
            &scope,
            config.allocation_attempts,
            |p: &mut Persistence, tracking_id: &str| {
                let mut attempt: TransitionResult = result.clone();
                attempt.issue_tracking_id(tracking_id.to_string());
                attempt.case.version = p.update_case(&attempt.case, expected_version)?;
                Ok(attempt)
            },
        )?;
        info!(case_id, tracking_id = ?issued.case.tracking_id, "Issued tracking ID");
        return Ok(issued);
    }

    result.case.version = p.update_case(&result.case, expected_version)?;
    Ok(result)
}

fn perform_effects(
    p: &mut Persistence,
    ctx: &RequestContext,
    case_id: i64,
    effects: &[Effect],
) -> Result<(), ApiError> {
    let at: String = format_timestamp(ctx.now)?;
    for effect in effects {
        match effect {
            Effect::StoreDocument {
                document_type,
                storage_ref,
            } => {
                p.store_case_document(
                    case_id,
                    document_type,
                    storage_ref,
                    ctx.actor.staff_pk,
                    &at,
                )?;
            }
            Effect::StoreRemark { text } => {
                p.insert_case_remark(case_id, text, ctx.actor.staff_pk, &at)?;
            }
            Effect::IssueTrackingId | Effect::DeleteDraft => {}
        }
    }
    Ok(())
}

fn workflow_facts(
    p: &mut Persistence,
    case: &Case,
    command: &Command,
) -> Result<WorkflowFacts, ApiError> {
    let mut facts: WorkflowFacts = WorkflowFacts::default();
    if let Command::MarkNumbered { numbering_number } = command
        && !numbering_number.trim().is_empty()
    {
        facts.numbering_number_taken =
            p.numbering_number_taken(numbering_number.trim(), case.case_id)?;
    }
    Ok(facts)
}

fn load_examiner(p: &mut Persistence, examiner_id: Option<i64>) -> Result<StaffActor, ApiError> {
    let not_assignable = || ApiError::PreconditionFailed {
        action: CaseAction::Assign.as_str().to_string(),
        message: String::from("the assignee must be an active Capitol Examiner"),
    };
    let examiner_id: i64 = examiner_id.ok_or_else(not_assignable)?;
    p.get_staff_by_pk(examiner_id)?
        .map(|record| record.actor)
        .ok_or_else(not_assignable)
}

/// Returns a case with its documents, remarks, and the actions the actor
/// may take.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the case does not exist or the actor may
/// not see it.
pub fn get_case(
    persistence: &mut Persistence,
    actor: &StaffActor,
    locator: &CaseLocator,
) -> Result<CaseDetailResponse, ApiError> {
    let case: Case = load_visible(persistence, actor, locator)?;
    let case_id: i64 = case.case_id.unwrap_or_default();
    let documents: Vec<CaseDocumentRecord> = persistence.list_case_documents(case_id)?;
    let remarks: Vec<CaseRemarkRecord> = persistence.list_case_remarks(case_id)?;
    let available_actions: Vec<String> = CaseAction::ALL
        .into_iter()
        .filter(|action| *action != CaseAction::CreateDraft)
        .filter(|action| is_action_available(actor, &case, *action))
        .map(|action| action.as_str().to_string())
        .collect();

    debug!(case = %locator, staff_id = %actor.staff_id, "Loaded case");
    Ok(CaseDetailResponse {
        case: case_info(&case)?,
        documents,
        remarks,
        available_actions,
    })
}

/// Lists the actor's work queue, optionally narrowed to one tab.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown tab.
pub fn list_cases(
    persistence: &mut Persistence,
    actor: &StaffActor,
    tab: Option<&str>,
) -> Result<ListCasesResponse, ApiError> {
    let tab_name: Option<&str> = tab.map(str::trim).filter(|t| !t.is_empty());
    let tab: Option<CaseTab> = tab_name
        .map(CaseTab::from_str)
        .transpose()
        .map_err(translate_domain_error)?;

    let cases: Vec<Case> = match work_queue(actor, tab) {
        Some(filter) => persistence.list_cases(&filter)?,
        None => Vec::new(),
    };

    Ok(ListCasesResponse {
        tab: tab_name.map(str::to_string),
        cases: cases.iter().map(case_info).collect::<Result<_, _>>()?,
    })
}

/// Returns a case's audit timeline, oldest first.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the case does not exist or the actor may
/// not see it.
pub fn get_case_history(
    persistence: &mut Persistence,
    actor: &StaffActor,
    locator: &CaseLocator,
) -> Result<TimelineResponse, ApiError> {
    let case: Case = load_visible(persistence, actor, locator)?;
    let events: Vec<AuditEvent> =
        persistence.get_case_timeline(case.case_id.unwrap_or_default())?;

    Ok(TimelineResponse {
        reference: case.reference(),
        entries: events.iter().map(audit_entry_info).collect::<Result<_, _>>()?,
    })
}

/// Public tracking lookup: only the status label is revealed.
///
/// A case is trackable only while it stands submitted by the LGU; a case
/// returned to the LGU disappears until it is resubmitted.
///
/// # Errors
///
/// Returns `ResourceNotFound` for unknown tracking IDs and for cases not
/// currently submitted.
pub fn track_case(
    persistence: &mut Persistence,
    tracking_id: &str,
) -> Result<TrackingResponse, ApiError> {
    let tracking_id: String = tracking_id.trim().to_uppercase();
    let case: Case = persistence
        .get_case_by_tracking_id(&tracking_id)?
        .filter(|case| case.lgu_submitted_at.is_some())
        .ok_or_else(|| ApiError::not_found("Case", tracking_id.clone()))?;

    Ok(TrackingResponse {
        tracking_id,
        status_label: public_status_label(case.status.as_str()).to_string(),
    })
}

fn load_visible(
    persistence: &mut Persistence,
    actor: &StaffActor,
    locator: &CaseLocator,
) -> Result<Case, ApiError> {
    let case: Case = locator.load(persistence)?;
    if can_view(actor, &case) {
        Ok(case)
    } else {
        Err(ApiError::not_found("Case", locator.to_string()))
    }
}

fn parse_case_type(case_type: Option<&str>) -> Result<Option<CaseType>, ApiError> {
    case_type
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(CaseType::from_str)
        .transpose()
        .map_err(translate_domain_error)
}

/// Converts a case into its response shape.
///
/// # Errors
///
/// Returns an error if a timestamp cannot be formatted.
pub fn case_info(case: &Case) -> Result<CaseInfo, ApiError> {
    Ok(CaseInfo {
        case_id: case.case_id,
        draft_id: case.draft_id.to_string(),
        tracking_id: case.tracking_id.clone(),
        status: case.status,
        status_label: case.status.public_label().to_string(),
        client: case.client.clone(),
        client_display_name: case.client.display_name(),
        case_type: case.case_type,
        checklist: case.checklist.clone(),
        submitted_by: case.submitted_by,
        assigned_to: case.assigned_to,
        assigned_at: format_optional(case.assigned_at)?,
        received_at: format_optional(case.received_at)?,
        received_by: case.received_by,
        returned_at: format_optional(case.returned_at)?,
        returned_by: case.returned_by,
        return_reason: case.return_reason.clone(),
        released_at: format_optional(case.released_at)?,
        numbering_number: case.numbering_number.clone(),
        lgu_submitted_at: format_optional(case.lgu_submitted_at)?,
        created_at: format_timestamp(case.created_at)?,
        updated_at: format_timestamp(case.updated_at)?,
        version: case.version,
    })
}

/// Converts an audit event into its response shape.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn audit_entry_info(event: &AuditEvent) -> Result<AuditEntryInfo, ApiError> {
    Ok(AuditEntryInfo {
        event_id: event.event_id,
        action: event.action.as_str().to_string(),
        actor_staff_pk: event.actor.as_ref().map(|a| a.staff_pk),
        actor_staff_id: event.actor.as_ref().map(|a| a.staff_id.clone()),
        actor_role: event.actor.as_ref().map(|a| a.role),
        target_reference: event.target.reference().map(str::to_string),
        details: event.details.clone(),
        created_at: format_timestamp(event.created_at)?,
    })
}
