// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use legaltrack_domain::{Case, CaseStatus, Role, SequenceScope, parse_timezone};

use super::{
    create_test_draft, create_test_new_staff, insert_test_case, insert_test_staff, test_now,
};
use crate::{IdentifierKind, Persistence, PersistenceError};

fn tracking_scope() -> SequenceScope {
    SequenceScope::tracking(test_now(), parse_timezone("Asia/Manila").unwrap(), 4).unwrap()
}

/// Stores a fresh case under `tracking_id`.
fn write_case(
    p: &mut Persistence,
    owner: i64,
    tracking_id: &str,
) -> Result<i64, PersistenceError> {
    let mut case: Case = create_test_draft(owner);
    case.tracking_id = Some(tracking_id.to_string());
    case.status = CaseStatus::NotReceived;
    p.insert_case(&case)
}

#[test]
fn test_first_allocation_in_a_month_starts_at_one() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);

    let case_id: i64 = persistence
        .allocate_identifier(IdentifierKind::TrackingId, &tracking_scope(), 3, |p, id| {
            write_case(p, owner, id)
        })
        .unwrap();

    let case: Case = persistence.get_case_by_id(case_id).unwrap().unwrap();
    assert_eq!(case.tracking_id.as_deref(), Some("PAS25010001"));
}

#[test]
fn test_allocation_continues_from_highest_existing() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);
    insert_test_case(&mut persistence, owner, Some("PAS25010001"), CaseStatus::NotReceived);
    insert_test_case(&mut persistence, owner, Some("PAS25010007"), CaseStatus::Released);
    // Other months and malformed values do not count.
    insert_test_case(&mut persistence, owner, Some("PAS24120042"), CaseStatus::Released);
    insert_test_case(&mut persistence, owner, Some("PAS2501X"), CaseStatus::Released);

    let case_id: i64 = persistence
        .allocate_identifier(IdentifierKind::TrackingId, &tracking_scope(), 3, |p, id| {
            write_case(p, owner, id)
        })
        .unwrap();

    let case: Case = persistence.get_case_by_id(case_id).unwrap().unwrap();
    assert_eq!(case.tracking_id.as_deref(), Some("PAS25010008"));
}

#[test]
fn test_collision_is_retried() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);
    let mut candidates: Vec<String> = Vec::new();

    let case_id: i64 = persistence
        .allocate_identifier(
            IdentifierKind::TrackingId,
            &tracking_scope(),
            3,
            |p: &mut Persistence, tracking_id: &str| {
                candidates.push(tracking_id.to_string());
                if candidates.len() == 1 {
                    // Another request commits the same number first.
                    let mut racer: Case = create_test_draft(owner);
                    racer.tracking_id = Some(tracking_id.to_string());
                    racer.status = CaseStatus::NotReceived;
                    p.insert_case(&racer)?;
                    return Err(PersistenceError::UniqueViolation(String::from(
                        "UNIQUE constraint failed: cases.tracking_id",
                    )));
                }
                write_case(p, owner, tracking_id)
            },
        )
        .unwrap();

    // The racer's row was inside the failed savepoint, so the retry sees the
    // same maximum and reuses the number.
    assert_eq!(candidates, vec!["PAS25010001", "PAS25010001"]);
    let case: Case = persistence.get_case_by_id(case_id).unwrap().unwrap();
    assert_eq!(case.tracking_id.as_deref(), Some("PAS25010001"));
    assert!(persistence.get_case_by_tracking_id("PAS25010002").unwrap().is_none());
}

#[test]
fn test_real_unique_violation_exhausts_attempts() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);
    let mut calls: u32 = 0;

    let result = persistence.allocate_identifier(
        IdentifierKind::TrackingId,
        &tracking_scope(),
        3,
        |p: &mut Persistence, tracking_id: &str| {
            calls += 1;
            write_case(p, owner, tracking_id)?;
            write_case(p, owner, tracking_id)
        },
    );

    assert_eq!(calls, 3);
    assert_eq!(
        result,
        Err(PersistenceError::AllocationExhausted {
            prefix: String::from("PAS2501"),
            attempts: 3,
        })
    );
    // Every attempt was rolled back.
    assert!(persistence.get_case_by_tracking_id("PAS25010001").unwrap().is_none());
}

#[test]
fn test_other_errors_are_not_retried() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let mut calls: u32 = 0;

    let result: Result<(), PersistenceError> = persistence.allocate_identifier(
        IdentifierKind::TrackingId,
        &tracking_scope(),
        3,
        |_: &mut Persistence, _: &str| {
            calls += 1;
            Err(PersistenceError::UniqueViolation(String::from(
                "UNIQUE constraint failed: cases.draft_id",
            )))
        },
    );

    assert_eq!(calls, 1);
    assert!(result.unwrap_err().is_unique_violation_on("draft_id"));
}

#[test]
fn test_overflow_fails_without_wrapping() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);
    insert_test_case(&mut persistence, owner, Some("PAS25019999"), CaseStatus::NotReceived);
    let mut calls: u32 = 0;

    let result = persistence.allocate_identifier(
        IdentifierKind::TrackingId,
        &tracking_scope(),
        3,
        |p: &mut Persistence, tracking_id: &str| {
            calls += 1;
            write_case(p, owner, tracking_id)
        },
    );

    assert_eq!(calls, 0);
    assert!(matches!(result, Err(PersistenceError::SequenceOverflow(_))));
}

#[test]
fn test_staff_ids_allocated_per_role() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    insert_test_staff(&mut persistence, "EXM-0001", Role::CapitolExaminer);
    insert_test_staff(&mut persistence, "APR-0004", Role::CapitolApprover);

    let staff_pk: i64 = persistence
        .allocate_identifier(
            IdentifierKind::StaffId,
            &SequenceScope::staff(Role::CapitolExaminer),
            3,
            |p: &mut Persistence, staff_id: &str| {
                p.insert_staff(
                    staff_id,
                    &create_test_new_staff(
                        "second.examiner@example.gov.ph",
                        Role::CapitolExaminer,
                    ),
                )
            },
        )
        .unwrap();

    let record = persistence.get_staff_by_pk(staff_pk).unwrap().unwrap();
    assert_eq!(record.actor.staff_id, "EXM-0002");
    assert_eq!(
        persistence
            .identifiers_with_prefix(IdentifierKind::StaffId, "APR-")
            .unwrap(),
        vec![String::from("APR-0004")]
    );
}

#[test]
fn test_duplicate_email_is_not_an_identifier_collision() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    insert_test_staff(&mut persistence, "EXM-0001", Role::CapitolExaminer);
    let mut calls: u32 = 0;

    let result = persistence.allocate_identifier(
        IdentifierKind::StaffId,
        &SequenceScope::staff(Role::CapitolExaminer),
        3,
        |p: &mut Persistence, staff_id: &str| {
            calls += 1;
            p.insert_staff(
                staff_id,
                &create_test_new_staff("EXM-0001@example.gov.ph", Role::CapitolExaminer),
            )
        },
    );

    assert_eq!(calls, 1);
    assert!(result.unwrap_err().is_unique_violation_on("email"));
}
