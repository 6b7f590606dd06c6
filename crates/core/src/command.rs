// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use legaltrack_domain::{CaseType, ClientDetails, DomainError, StaffActor};
use std::str::FromStr;

/// A command represents staff intent against an existing case as data only.
///
/// Commands are the only way to request case changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the client details of a case that is still editable.
    UpdateDetails {
        client: ClientDetails,
        case_type: Option<CaseType>,
    },
    /// Record that a document was stored by the document collaborator.
    RecordDocumentUpload {
        document_type: String,
        /// Opaque reference issued by document storage.
        storage_ref: String,
    },
    /// Delete a draft that was never submitted.
    DeleteDraft,
    /// Submit a draft, or resubmit a returned case.
    Finalize,
    /// Mark physical receipt.
    Receive,
    /// Send a case back to the LGU before review starts.
    ReturnToLgu { reason: String },
    /// Assign a received case to an examiner.
    Assign {
        /// The examiner, as loaded by the caller.
        examiner: StaffActor,
    },
    SubmitForApproval,
    /// Examiner hands the case back to Receiving.
    ReturnToReceiving { reason: String },
    Approve,
    /// Approver sends the case back to the LGU.
    ReturnForCorrection { reason: String },
    /// Record the official number.
    MarkNumbered { numbering_number: String },
    Release,
    /// Attach an internal remark.
    AddRemark { text: String },
}

impl Command {
    /// Returns the action kind used to look up transition rules.
    #[must_use]
    pub const fn action(&self) -> CaseAction {
        match self {
            Self::UpdateDetails { .. } => CaseAction::UpdateDetails,
            Self::RecordDocumentUpload { .. } => CaseAction::RecordDocument,
            Self::DeleteDraft => CaseAction::DeleteDraft,
            Self::Finalize => CaseAction::Finalize,
            Self::Receive => CaseAction::Receive,
            Self::ReturnToLgu { .. } => CaseAction::ReturnToLgu,
            Self::Assign { .. } => CaseAction::Assign,
            Self::SubmitForApproval => CaseAction::SubmitForApproval,
            Self::ReturnToReceiving { .. } => CaseAction::ReturnToReceiving,
            Self::Approve => CaseAction::Approve,
            Self::ReturnForCorrection { .. } => CaseAction::ReturnForCorrection,
            Self::MarkNumbered { .. } => CaseAction::MarkNumbered,
            Self::Release => CaseAction::Release,
            Self::AddRemark { .. } => CaseAction::AddRemark,
        }
    }
}

/// The kind of action a command requests, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseAction {
    CreateDraft,
    UpdateDetails,
    RecordDocument,
    DeleteDraft,
    Finalize,
    Receive,
    ReturnToLgu,
    Assign,
    SubmitForApproval,
    ReturnToReceiving,
    Approve,
    ReturnForCorrection,
    MarkNumbered,
    Release,
    AddRemark,
}

impl CaseAction {
    pub const ALL: [Self; 15] = [
        Self::CreateDraft,
        Self::UpdateDetails,
        Self::RecordDocument,
        Self::DeleteDraft,
        Self::Finalize,
        Self::Receive,
        Self::ReturnToLgu,
        Self::Assign,
        Self::SubmitForApproval,
        Self::ReturnToReceiving,
        Self::Approve,
        Self::ReturnForCorrection,
        Self::MarkNumbered,
        Self::Release,
        Self::AddRemark,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateDraft => "create_draft",
            Self::UpdateDetails => "update_details",
            Self::RecordDocument => "record_document",
            Self::DeleteDraft => "delete_draft",
            Self::Finalize => "finalize",
            Self::Receive => "receive",
            Self::ReturnToLgu => "return_to_lgu",
            Self::Assign => "assign",
            Self::SubmitForApproval => "submit_for_approval",
            Self::ReturnToReceiving => "return_to_receiving",
            Self::Approve => "approve",
            Self::ReturnForCorrection => "return_for_correction",
            Self::MarkNumbered => "mark_numbered",
            Self::Release => "release",
            Self::AddRemark => "add_remark",
        }
    }
}

impl FromStr for CaseAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| DomainError::InvalidCaseAction(s.to_string()))
    }
}

impl std::fmt::Display for CaseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
