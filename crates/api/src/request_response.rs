// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Timestamps cross the boundary as RFC 3339 strings.

use legaltrack_domain::{AccountStatus, CaseStatus, CaseType, ChecklistItem, ClientDetails, Role};
use legaltrack_persistence::{CaseDocumentRecord, CaseRemarkRecord};
use serde::{Deserialize, Serialize};

/// API request to start a new draft.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateDraftRequest {
    pub client: ClientDetails,
    /// Case type code, e.g. `land_first_time`.
    pub case_type: Option<String>,
}

/// API request to replace the client details of an editable case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateDraftRequest {
    pub client: ClientDetails,
    pub case_type: Option<String>,
}

/// API request recording that document storage accepted a file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordDocumentRequest {
    pub document_type: String,
    /// Opaque reference issued by document storage.
    pub storage_ref: String,
}

/// API request for a workflow transition on a submitted case.
///
/// Only the fields the chosen action needs are read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseActionRequest {
    /// Action code, e.g. `receive` or `return_for_correction`.
    pub action: String,
    /// Required by the return actions.
    #[serde(default)]
    pub reason: Option<String>,
    /// Staff key of the examiner, required by `assign`.
    #[serde(default)]
    pub examiner_id: Option<i64>,
    /// Required by `mark_numbered`.
    #[serde(default)]
    pub numbering_number: Option<String>,
}

/// API request to attach an internal remark.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddRemarkRequest {
    pub text: String,
}

/// A case as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInfo {
    pub case_id: Option<i64>,
    pub draft_id: String,
    pub tracking_id: Option<String>,
    pub status: CaseStatus,
    /// Status label shown to the public.
    pub status_label: String,
    pub client: ClientDetails,
    pub client_display_name: String,
    pub case_type: Option<CaseType>,
    pub checklist: Vec<ChecklistItem>,
    pub submitted_by: i64,
    pub assigned_to: Option<i64>,
    pub assigned_at: Option<String>,
    pub received_at: Option<String>,
    pub received_by: Option<i64>,
    pub returned_at: Option<String>,
    pub returned_by: Option<i64>,
    pub return_reason: Option<String>,
    pub released_at: Option<String>,
    pub numbering_number: Option<String>,
    pub lgu_submitted_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
}

/// API response for a single case, with what the actor may do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDetailResponse {
    pub case: CaseInfo,
    pub documents: Vec<CaseDocumentRecord>,
    pub remarks: Vec<CaseRemarkRecord>,
    /// Action codes the actor could perform right now.
    pub available_actions: Vec<String>,
}

/// API response for any successful case write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionResponse {
    /// Always `OK`.
    pub code: String,
    pub action: String,
    /// `None` when the case no longer exists (draft deletion).
    pub case: Option<CaseInfo>,
    pub previous_status: CaseStatus,
    pub event_id: i64,
    pub message: String,
}

/// API response for a work-queue listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCasesResponse {
    pub tab: Option<String>,
    pub cases: Vec<CaseInfo>,
}

/// One audit entry as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntryInfo {
    pub event_id: Option<i64>,
    pub action: String,
    pub actor_staff_pk: Option<i64>,
    pub actor_staff_id: Option<String>,
    pub actor_role: Option<Role>,
    pub target_reference: Option<String>,
    pub details: std::collections::BTreeMap<String, String>,
    pub created_at: String,
}

/// API response for a case timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub reference: String,
    pub entries: Vec<AuditEntryInfo>,
}

/// API response for the global audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogResponse {
    pub entries: Vec<AuditEntryInfo>,
}

/// API response for the public tracking lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingResponse {
    pub tracking_id: String,
    pub status_label: String,
}

/// API request to create a staff account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateStaffRequest {
    pub email: String,
    pub full_name: String,
    /// Role code, e.g. `capitol_examiner`.
    pub role: String,
    /// Required for LGU Admin accounts.
    #[serde(default)]
    pub lgu_municipality: Option<String>,
}

/// API response for a created staff account.
///
/// The temporary password goes out only through the activation notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStaffResponse {
    pub staff_pk: i64,
    pub staff_id: String,
    pub email: String,
    pub role: Role,
    pub account_status: AccountStatus,
    pub message: String,
}

/// API request to activate an account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivateAccountRequest {
    pub nonce: String,
    pub new_password: String,
    pub confirmation: String,
}

/// API request to edit a staff profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateStaffRequest {
    pub full_name: String,
    #[serde(default)]
    pub lgu_municipality: Option<String>,
}

/// A staff account as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffInfo {
    pub staff_pk: i64,
    pub staff_id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub account_status: AccountStatus,
    pub lgu_municipality: Option<String>,
}

/// API response for any staff account change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffStatusResponse {
    pub staff: StaffInfo,
    pub message: String,
}

/// API response listing staff accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStaffResponse {
    pub staff: Vec<StaffInfo>,
}

/// An examiner and the number of cases they have in review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExaminerLoad {
    pub staff: StaffInfo,
    pub in_review: i64,
}

/// API response listing assignable examiners, least loaded first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListExaminersResponse {
    pub examiners: Vec<ExaminerLoad>,
}

/// Outcome reported by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginOutcome {
    Success,
    Failure,
    Logout,
}

/// API request recording a login outcome.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginEventRequest {
    /// The email the attempt was made with.
    pub email: String,
    pub outcome: LoginOutcome,
    /// Why a failed attempt failed.
    #[serde(default)]
    pub reason: Option<String>,
}

/// API request submitting support feedback. Name and email are optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub message: String,
}

/// API response for stored feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub feedback_id: i64,
    pub message: String,
}

/// API response for a write that returns only an audit reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    pub event_id: i64,
    pub message: String,
}
