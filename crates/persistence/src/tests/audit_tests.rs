// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::RunQueryDsl;
use legaltrack::{Command, RequestContext, TransitionResult, WorkflowFacts, apply};
use legaltrack_audit::{Actor, AuditAction, AuditEvent, AuditTarget};
use legaltrack_domain::{Case, CaseStatus, Role};
use time::Duration;

use super::{insert_test_case, insert_test_staff, test_now};
use crate::{BackendConnection, Persistence, format_timestamp};

fn case_event(case: &Case, action: AuditAction, minutes: i64) -> AuditEvent {
    AuditEvent::new(
        None,
        action,
        AuditTarget::Case {
            reference: case.reference(),
            case_id: case.case_id,
        },
        test_now() + Duration::minutes(minutes),
    )
}

fn execute_raw(persistence: &mut Persistence, sql: &str) -> Result<usize, diesel::result::Error> {
    match &mut persistence.conn {
        BackendConnection::Sqlite(conn) => diesel::sql_query(sql).execute(conn),
        BackendConnection::Mysql(conn) => diesel::sql_query(sql).execute(conn),
    }
}

#[test]
fn test_transition_event_round_trips() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);
    let receiving_pk: i64 =
        insert_test_staff(&mut persistence, "REC-0001", Role::CapitolReceiving);
    persistence
        .activate_staff(receiving_pk, "hash", &format_timestamp(test_now()).unwrap())
        .unwrap();
    let receiving = persistence.get_staff_by_pk(receiving_pk).unwrap().unwrap().actor;
    let case: Case =
        insert_test_case(&mut persistence, owner, Some("PAS25010001"), CaseStatus::NotReceived);

    let result: TransitionResult = apply(
        &WorkflowFacts::default(),
        &RequestContext::new(receiving, test_now()),
        &case,
        Command::Receive,
    )
    .unwrap();
    let event_id: i64 = persistence.persist_audit_event(&result.audit_event).unwrap();

    let timeline: Vec<AuditEvent> = persistence.get_case_timeline(case.case_id.unwrap()).unwrap();
    assert_eq!(timeline.len(), 1);

    let mut expected: AuditEvent = result.audit_event;
    expected.event_id = Some(event_id);
    assert_eq!(timeline[0], expected);
    assert_eq!(
        timeline[0].actor,
        Some(Actor::new(receiving_pk, String::from("REC-0001"), Role::CapitolReceiving))
    );
    assert_eq!(timeline[0].detail("new_status"), Some("received"));
}

#[test]
fn test_timeline_is_oldest_first_and_scoped_to_the_case() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);
    let case: Case =
        insert_test_case(&mut persistence, owner, Some("PAS25010001"), CaseStatus::NotReceived);
    let other: Case =
        insert_test_case(&mut persistence, owner, Some("PAS25010002"), CaseStatus::NotReceived);

    persistence
        .persist_audit_event(&case_event(&case, AuditAction::CaseCreate, 0))
        .unwrap();
    persistence
        .persist_audit_event(&case_event(&other, AuditAction::CaseCreate, 1))
        .unwrap();
    persistence
        .persist_audit_event(&case_event(&case, AuditAction::CaseReceipt, 2))
        .unwrap();
    persistence
        .persist_audit_event(&case_event(&case, AuditAction::CaseRemark, 3))
        .unwrap();

    let timeline: Vec<AuditEvent> = persistence.get_case_timeline(case.case_id.unwrap()).unwrap();
    let actions: Vec<AuditAction> = timeline.iter().map(|e| e.action).collect();

    assert_eq!(
        actions,
        vec![
            AuditAction::CaseCreate,
            AuditAction::CaseReceipt,
            AuditAction::CaseRemark
        ]
    );
}

#[test]
fn test_list_audit_events_filters_and_limits() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    for minute in 0..3 {
        persistence
            .persist_audit_event(&AuditEvent::new(
                None,
                AuditAction::LoginFailed,
                AuditTarget::None,
                test_now() + Duration::minutes(minute),
            ))
            .unwrap();
    }
    persistence
        .persist_audit_event(&AuditEvent::new(
            None,
            AuditAction::SupportFeedback,
            AuditTarget::None,
            test_now(),
        ))
        .unwrap();

    let failures = persistence
        .list_audit_events(Some(AuditAction::LoginFailed), 2)
        .unwrap();
    let everything = persistence.list_audit_events(None, 100).unwrap();

    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|e| e.action == AuditAction::LoginFailed));
    assert!(failures[0].event_id > failures[1].event_id);
    assert_eq!(everything.len(), 4);
    assert_eq!(everything[0].action, AuditAction::SupportFeedback);
}

#[test]
fn test_user_target_round_trips() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let staff_pk: i64 = insert_test_staff(&mut persistence, "EXM-0001", Role::CapitolExaminer);
    let staff = persistence.get_staff_by_pk(staff_pk).unwrap().unwrap().actor;

    let event: AuditEvent = AuditEvent::new(
        None,
        AuditAction::ActivationEmailSent,
        AuditTarget::user(&staff),
        test_now(),
    )
    .with_detail("staff_id", "EXM-0001");
    persistence.persist_audit_event(&event).unwrap();

    let stored = persistence.list_audit_events(None, 1).unwrap();
    assert_eq!(
        stored[0].target,
        AuditTarget::User {
            reference: String::from("User: exm-0001@example.gov.ph"),
            staff_pk,
        }
    );
    assert_eq!(stored[0].detail("staff_id"), Some("EXM-0001"));
}

#[test]
fn test_audit_rows_cannot_be_updated_or_deleted() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let event_id: i64 = persistence
        .persist_audit_event(&AuditEvent::new(
            None,
            AuditAction::Login,
            AuditTarget::None,
            test_now(),
        ))
        .unwrap();

    let update = execute_raw(
        &mut persistence,
        &format!("UPDATE audit_events SET action = 'logout' WHERE event_id = {event_id}"),
    );
    let delete = execute_raw(
        &mut persistence,
        &format!("DELETE FROM audit_events WHERE event_id = {event_id}"),
    );

    assert!(update.is_err(), "UPDATE on audit_events must be rejected");
    assert!(delete.is_err(), "DELETE on audit_events must be rejected");
    let stored = persistence.list_audit_events(None, 10).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].action, AuditAction::Login);
}

#[test]
fn test_audit_history_survives_draft_deletion() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);
    let draft: Case = insert_test_case(&mut persistence, owner, None, CaseStatus::Draft);
    let case_id: i64 = draft.case_id.unwrap();

    persistence
        .persist_audit_event(&case_event(&draft, AuditAction::CaseCreate, 0))
        .unwrap();
    persistence.delete_case(case_id, 0).unwrap();
    persistence
        .persist_audit_event(&case_event(&draft, AuditAction::CaseUpdate, 1))
        .unwrap();

    let timeline: Vec<AuditEvent> = persistence.get_case_timeline(case_id).unwrap();
    assert_eq!(timeline.len(), 2);
    assert!(
        timeline[0]
            .target
            .reference()
            .is_some_and(|r| r.starts_with("Draft: "))
    );
}

#[test]
fn test_feedback_listed_newest_first() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let at: String = format_timestamp(test_now()).unwrap();

    persistence
        .insert_feedback(None, None, "The upload page times out.", &at)
        .unwrap();
    let second: i64 = persistence
        .insert_feedback(
            Some("Ana Reyes"),
            Some("ana@example.com"),
            "Please add a search box.",
            &at,
        )
        .unwrap();

    let feedback = persistence.list_feedback().unwrap();
    assert_eq!(feedback.len(), 2);
    assert_eq!(feedback[0].feedback_id, second);
    assert_eq!(feedback[0].name.as_deref(), Some("Ana Reyes"));
    assert!(!feedback[0].resolved);
    assert_eq!(feedback[1].email, None);
}
