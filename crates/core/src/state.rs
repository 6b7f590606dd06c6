// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use legaltrack_audit::{AuditEvent, AuditTarget};
use legaltrack_domain::{Case, CaseStatus, StaffActor};
use time::OffsetDateTime;

/// Request-scoped inputs: who is acting, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub actor: StaffActor,
    pub now: OffsetDateTime,
}

impl RequestContext {
    /// Creates a new request context.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated staff member
    /// * `now` - The request time
    #[must_use]
    pub const fn new(actor: StaffActor, now: OffsetDateTime) -> Self {
        Self { actor, now }
    }
}

/// Facts about the wider world that a precondition may need.
///
/// The engine is pure; the caller looks these up inside the same
/// transaction before calling `apply`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowFacts {
    /// Another case already holds the requested numbering number
    /// (case-insensitive).
    pub numbering_number_taken: bool,
}

/// Side effects a transition asks the caller to perform in the same
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Allocate a tracking ID and write it via `TransitionResult::issue_tracking_id`.
    IssueTrackingId,
    /// Store the document reference row.
    StoreDocument {
        document_type: String,
        storage_ref: String,
    },
    /// Store the remark row.
    StoreRemark { text: String },
    /// Delete the draft and its dependent rows.
    DeleteDraft,
}

/// The result of a successful transition.
///
/// The new case and its audit event succeed or fail together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// Status before the transition.
    pub previous_status: CaseStatus,
    /// The case after the transition.
    pub case: Case,
    /// The audit entry to append.
    pub audit_event: AuditEvent,
    /// Side effects to perform before commit.
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    /// Returns `(from, to)` if the status changed.
    #[must_use]
    pub fn status_change(&self) -> Option<(CaseStatus, CaseStatus)> {
        (self.previous_status != self.case.status).then_some((self.previous_status, self.case.status))
    }

    /// Returns true if the caller must allocate a tracking ID.
    #[must_use]
    pub fn needs_tracking_id(&self) -> bool {
        self.effects.contains(&Effect::IssueTrackingId) && self.case.tracking_id.is_none()
    }

    /// Writes an allocated tracking ID into the case and the audit target.
    ///
    /// A case that already has a tracking ID keeps it.
    pub fn issue_tracking_id(&mut self, tracking_id: String) {
        if self.case.tracking_id.is_some() {
            return;
        }
        self.case.tracking_id = Some(tracking_id);
        self.audit_event.target = AuditTarget::Case {
            reference: self.case.reference(),
            case_id: self.case.case_id,
        };
    }
}
