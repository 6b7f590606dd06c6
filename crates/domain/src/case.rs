// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The case record.
//!
//! A `Case` is mutated only by the workflow engine. Every workflow timestamp
//! and actor reference is written by exactly one transition kind.

use crate::case_status::CaseStatus;
use crate::case_type::{CaseType, ChecklistItem, seed_checklist};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Client (applicant) details captured in the first wizard step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientDetails {
    /// Legacy single-line name; derived from the name parts when blank.
    pub name: String,
    /// Legacy single-line contact; derived from number and email when blank.
    pub contact: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub suffix: String,
    pub number: String,
    pub email: String,
}

impl ClientDetails {
    /// Returns the preferred display name: `Last, First Middle Suffix`.
    ///
    /// Falls back to the single-line name when no parts are present.
    #[must_use]
    pub fn display_name(&self) -> String {
        let last = self.last_name.trim();
        let first = self.first_name.trim();
        let middle = self.middle_name.trim();
        let suffix = self.suffix.trim();

        if [last, first, middle, suffix].iter().all(|p| p.is_empty()) {
            return self.name.trim().to_string();
        }

        let main = [last, first]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let rest = [middle, suffix]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if rest.is_empty() {
            main
        } else if main.is_empty() {
            rest
        } else {
            format!("{main} {rest}")
        }
    }

    /// Returns the preferred contact line.
    #[must_use]
    pub fn display_contact(&self) -> String {
        let email = self.email.trim();
        let number = self.number.trim();
        match (number.is_empty(), email.is_empty()) {
            (false, false) => format!("{number} / {email}"),
            (false, true) => number.to_string(),
            (true, false) => email.to_string(),
            (true, true) => self.contact.trim().to_string(),
        }
    }

    /// Fills the legacy single-line fields from the structured ones.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.name.trim().is_empty() {
            self.name = self.display_name();
        }
        if self.contact.trim().is_empty() {
            self.contact = self.display_contact();
        }
        self
    }
}

/// A legal-document processing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// Storage key; `None` until first persisted.
    pub case_id: Option<i64>,
    pub draft_id: Uuid,
    /// Issued once at first finalization and never changed afterward.
    pub tracking_id: Option<String>,
    pub status: CaseStatus,
    pub client: ClientDetails,
    pub case_type: Option<CaseType>,
    pub checklist: Vec<ChecklistItem>,
    /// Owning LGU staff key.
    pub submitted_by: i64,
    pub assigned_to: Option<i64>,
    pub assigned_at: Option<OffsetDateTime>,
    pub received_at: Option<OffsetDateTime>,
    pub received_by: Option<i64>,
    pub returned_at: Option<OffsetDateTime>,
    pub returned_by: Option<i64>,
    pub return_reason: Option<String>,
    pub released_at: Option<OffsetDateTime>,
    pub numbering_number: Option<String>,
    pub lgu_submitted_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    /// Optimistic concurrency counter.
    pub version: i64,
}

impl Case {
    /// Creates a new draft owned by `submitted_by`.
    ///
    /// The checklist is seeded from the case type.
    ///
    /// # Arguments
    ///
    /// * `draft_id` - The opaque draft identifier
    /// * `submitted_by` - The owning staff key
    /// * `client` - Client details
    /// * `case_type` - The case type, if chosen
    /// * `now` - Creation time
    #[must_use]
    pub fn new_draft(
        draft_id: Uuid,
        submitted_by: i64,
        client: ClientDetails,
        case_type: Option<CaseType>,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            case_id: None,
            draft_id,
            tracking_id: None,
            status: CaseStatus::Draft,
            client: client.normalized(),
            case_type,
            checklist: seed_checklist(case_type),
            submitted_by,
            assigned_to: None,
            assigned_at: None,
            received_at: None,
            received_by: None,
            returned_at: None,
            returned_by: None,
            return_reason: None,
            released_at: None,
            numbering_number: None,
            lgu_submitted_at: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Returns the audit target reference for this case.
    ///
    /// Tracked cases are `Case: <tracking_id>`; drafts are `Draft: <draft_id>`.
    #[must_use]
    pub fn reference(&self) -> String {
        self.tracking_id.as_ref().map_or_else(
            || format!("Draft: {}", self.draft_id),
            |tracking_id| format!("Case: {tracking_id}"),
        )
    }

    /// Returns true once the details step has enough to submit.
    #[must_use]
    pub fn details_complete(&self) -> bool {
        !self.client.name.trim().is_empty()
    }

    /// Returns true if `staff_pk` owns this case.
    #[must_use]
    pub const fn is_owned_by(&self, staff_pk: i64) -> bool {
        self.submitted_by == staff_pk
    }

    /// Returns true if `staff_pk` is the current assignee.
    #[must_use]
    pub fn is_assigned_to(&self, staff_pk: i64) -> bool {
        self.assigned_to == Some(staff_pk)
    }

    /// Clears the review assignment.
    pub const fn clear_assignment(&mut self) {
        self.assigned_to = None;
        self.assigned_at = None;
    }
}
