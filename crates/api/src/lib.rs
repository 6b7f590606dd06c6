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

//! Request-level orchestration for LegalTrack.
//!
//! Each public function here is one request: it resolves what it needs from
//! persistence, runs the pure workflow engine, and commits the result and
//! its audit entries in a single transaction.

mod accounts;
mod auth;
mod config;
mod error;
mod handlers;
mod notify;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use accounts::{
    ACTIVATION_LINK_MAX_AGE, DEFAULT_AUDIT_LOG_LIMIT, MAX_AUDIT_LOG_LIMIT, MAX_FEEDBACK_CHARS,
    activate_account, bootstrap_super_admin, create_staff, deactivate_staff, list_audit_log,
    list_examiners, list_staff, reactivate_staff, record_login_event, resend_activation,
    submit_feedback, update_staff,
};
pub use auth::{AuthenticationService, AuthorizationService};
pub use config::{ConfigError, DEFAULT_ALLOCATION_ATTEMPTS, WorkflowConfig};
pub use error::{
    ApiError, AuthError, TransitionCode, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    CaseLocator, add_remark, audit_entry_info, case_info, create_draft, delete_draft,
    finalize_draft, get_case, get_case_history, list_cases, perform_case_action,
    record_document, track_case, update_draft,
};
pub use notify::{MemoryNotifier, Notification, Notifier, NotifyError, TracingNotifier, dispatch};
pub use password_policy::{
    PasswordPolicy, PasswordPolicyError, TEMPORARY_PASSWORD_LENGTH, generate_activation_nonce,
    generate_temporary_password, hash_password,
};
pub use request_response::{
    ActivateAccountRequest, AddRemarkRequest, AuditEntryInfo, AuditLogResponse,
    CaseActionRequest, CaseDetailResponse, CaseInfo, CreateDraftRequest, CreateStaffRequest,
    CreateStaffResponse, ExaminerLoad, FeedbackRequest, FeedbackResponse, ListCasesResponse,
    ListExaminersResponse, ListStaffResponse, LoginEventRequest, LoginOutcome,
    RecordDocumentRequest, StaffInfo, StaffStatusResponse, TimelineResponse, TrackingResponse,
    TransitionResponse, UpdateDraftRequest, UpdateStaffRequest, WriteResponse,
};

// Re-exported so callers can build a request context without depending on
// the engine crate directly.
pub use legaltrack::RequestContext;
