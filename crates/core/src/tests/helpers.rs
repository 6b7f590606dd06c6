// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, RequestContext, TransitionResult, WorkflowFacts, apply, create_draft};
use legaltrack_domain::{AccountStatus, Case, CaseStatus, ClientDetails, Role, StaffActor};
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

pub const LGU_OWNER: i64 = 1;
pub const LGU_OTHER: i64 = 2;
pub const RECEIVING: i64 = 3;
pub const EXAMINER: i64 = 4;
pub const APPROVER: i64 = 5;
pub const NUMBERER: i64 = 6;
pub const RELEASER: i64 = 7;
pub const OTHER_EXAMINER: i64 = 8;
pub const SUPER_ADMIN: i64 = 9;

pub fn test_now() -> OffsetDateTime {
    datetime!(2025-01-15 09:00 UTC)
}

pub fn create_test_staff(staff_pk: i64, role: Role) -> StaffActor {
    StaffActor::new(
        staff_pk,
        format!("{}-{staff_pk:04}", role.staff_id_prefix()),
        format!("staff{staff_pk}@example.gov.ph"),
        format!("Staff {staff_pk}"),
        role,
        AccountStatus::Active,
    )
}

pub fn lgu() -> StaffActor {
    create_test_staff(LGU_OWNER, Role::LguAdmin)
}

pub fn receiving() -> StaffActor {
    create_test_staff(RECEIVING, Role::CapitolReceiving)
}

pub fn examiner() -> StaffActor {
    create_test_staff(EXAMINER, Role::CapitolExaminer)
}

pub fn approver() -> StaffActor {
    create_test_staff(APPROVER, Role::CapitolApprover)
}

pub fn numberer() -> StaffActor {
    create_test_staff(NUMBERER, Role::CapitolNumberer)
}

pub fn releaser() -> StaffActor {
    create_test_staff(RELEASER, Role::CapitolReleaser)
}

pub fn ctx(actor: StaffActor) -> RequestContext {
    RequestContext::new(actor, test_now())
}

pub fn test_client() -> ClientDetails {
    ClientDetails {
        first_name: String::from("Maria"),
        last_name: String::from("Santos"),
        number: String::from("09171234567"),
        ..ClientDetails::default()
    }
}

pub fn create_test_draft() -> Case {
    let mut case = create_draft(&ctx(lgu()), Uuid::new_v4(), test_client(), None)
        .unwrap()
        .case;
    case.case_id = Some(100);
    case
}

/// Applies a command with default facts and unwraps the result.
pub fn step(case: &Case, actor: StaffActor, command: Command) -> TransitionResult {
    apply(&WorkflowFacts::default(), &ctx(actor), case, command).unwrap()
}

/// Finalizes a draft and issues the given tracking ID.
pub fn finalize_with(case: &Case, tracking_id: &str) -> Case {
    let mut result = step(case, lgu(), Command::Finalize);
    if result.needs_tracking_id() {
        result.issue_tracking_id(tracking_id.to_string());
    }
    result.case
}

/// Walks a fresh draft forward until it reaches `target`.
pub fn create_case_in(target: CaseStatus) -> Case {
    let mut case = create_test_draft();
    if target == CaseStatus::Draft {
        return case;
    }
    case = finalize_with(&case, "PAS25010001");
    let path: Vec<(CaseStatus, StaffActor, Command)> = vec![
        (CaseStatus::Received, receiving(), Command::Receive),
        (
            CaseStatus::InReview,
            receiving(),
            Command::Assign {
                examiner: examiner(),
            },
        ),
        (CaseStatus::ForApproval, examiner(), Command::SubmitForApproval),
        (CaseStatus::ForNumbering, approver(), Command::Approve),
        (
            CaseStatus::ForRelease,
            numberer(),
            Command::MarkNumbered {
                numbering_number: String::from("NUM-0001"),
            },
        ),
        (CaseStatus::Released, releaser(), Command::Release),
    ];

    for (status, actor, command) in path {
        if case.status == target {
            break;
        }
        case = step(&case, actor, command).case;
        assert_eq!(case.status, status);
    }
    assert_eq!(case.status, target, "cannot walk to {target}");
    case
}
