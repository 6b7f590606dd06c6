// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use legaltrack_domain::{ClientDetails, Role, StaffActor};
use legaltrack_persistence::{NewStaff, Persistence, format_timestamp};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    CaseActionRequest, CaseLocator, CreateDraftRequest, CreateStaffRequest, MemoryNotifier,
    RequestContext, TransitionResponse, WorkflowConfig, create_draft, finalize_draft,
    perform_case_action,
};

pub fn test_now() -> OffsetDateTime {
    datetime!(2025-01-15 09:00 UTC)
}

pub fn ctx(actor: &StaffActor) -> RequestContext {
    RequestContext::new(actor.clone(), test_now())
}

/// One database, one configuration, one recording notifier.
pub struct Harness {
    pub persistence: Persistence,
    pub config: WorkflowConfig,
    pub notifier: MemoryNotifier,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(WorkflowConfig::default())
    }

    pub fn with_config(config: WorkflowConfig) -> Self {
        Self::with_persistence(Persistence::new_in_memory().unwrap(), config)
    }

    pub fn with_persistence(persistence: Persistence, config: WorkflowConfig) -> Self {
        Self {
            persistence,
            config,
            notifier: MemoryNotifier::new(),
        }
    }

    /// Inserts a staff account without going through bcrypt.
    pub fn staff(&mut self, staff_id: &str, role: Role) -> StaffActor {
        let new_staff: NewStaff = NewStaff {
            email: format!("{}@example.gov.ph", staff_id.to_lowercase()),
            full_name: format!("Staff {staff_id}"),
            role,
            lgu_municipality: (role == Role::LguAdmin).then(|| String::from("Tagum City")),
            password_hash: String::from("$2b$04$not-a-real-hash"),
            activation_nonce: format!("nonce-{staff_id}"),
            created_at: test_now(),
        };
        let staff_pk: i64 = self.persistence.insert_staff(staff_id, &new_staff).unwrap();
        self.persistence
            .activate_staff(
                staff_pk,
                "$2b$04$not-a-real-hash",
                &format_timestamp(test_now()).unwrap(),
            )
            .unwrap();
        self.persistence
            .get_staff_by_pk(staff_pk)
            .unwrap()
            .unwrap()
            .actor
    }

    pub fn create_draft(&mut self, owner: &StaffActor) -> TransitionResponse {
        create_draft(&mut self.persistence, &ctx(owner), &draft_request()).unwrap()
    }

    /// Creates and finalizes a draft, returning the tracking ID.
    pub fn submitted_case(&mut self, owner: &StaffActor) -> String {
        let draft: TransitionResponse = self.create_draft(owner);
        let locator: CaseLocator = draft_locator(&draft);
        finalize_draft(
            &mut self.persistence,
            &self.config,
            &self.notifier,
            &ctx(owner),
            &locator,
        )
        .unwrap()
        .case
        .unwrap()
        .tracking_id
        .unwrap()
    }

    pub fn act(
        &mut self,
        actor: &StaffActor,
        tracking_id: &str,
        request: &CaseActionRequest,
    ) -> Result<TransitionResponse, crate::ApiError> {
        perform_case_action(
            &mut self.persistence,
            &self.config,
            &self.notifier,
            &ctx(actor),
            &CaseLocator::Tracking(tracking_id.to_string()),
            request,
        )
    }
}

pub fn test_client() -> ClientDetails {
    ClientDetails {
        first_name: String::from("Maria"),
        last_name: String::from("Santos"),
        number: String::from("09171234567"),
        ..ClientDetails::default()
    }
}

pub fn draft_request() -> CreateDraftRequest {
    CreateDraftRequest {
        client: test_client(),
        case_type: Some(String::from("land_first_time")),
    }
}

pub fn examiner_request(email: &str) -> CreateStaffRequest {
    CreateStaffRequest {
        email: email.to_string(),
        full_name: String::from("Ana Cruz"),
        role: String::from("capitol_examiner"),
        lgu_municipality: None,
    }
}

pub fn draft_locator(response: &TransitionResponse) -> CaseLocator {
    CaseLocator::draft(&response.case.as_ref().unwrap().draft_id).unwrap()
}

/// Builds an action request with no payload.
pub fn action(name: &str) -> CaseActionRequest {
    CaseActionRequest {
        action: name.to_string(),
        reason: None,
        examiner_id: None,
        numbering_number: None,
    }
}

pub fn action_with_reason(name: &str, reason: &str) -> CaseActionRequest {
    CaseActionRequest {
        reason: Some(reason.to_string()),
        ..action(name)
    }
}

pub fn assign_to(examiner: &StaffActor) -> CaseActionRequest {
    CaseActionRequest {
        examiner_id: Some(examiner.staff_pk),
        ..action("assign")
    }
}

pub fn mark_numbered(number: &str) -> CaseActionRequest {
    CaseActionRequest {
        numbering_number: Some(number.to_string()),
        ..action("mark_numbered")
    }
}
