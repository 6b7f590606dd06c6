// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use legaltrack_domain::{Case, CaseFilter, CaseStatus, Role};

use super::{create_test_draft, insert_test_staff};
use crate::{Persistence, PersistenceError};

fn all_cases(persistence: &mut Persistence) -> Vec<Case> {
    persistence
        .list_cases(&CaseFilter {
            include_drafts: true,
            ..CaseFilter::default()
        })
        .unwrap()
}

#[test]
fn test_transaction_commits_on_ok() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);

    let case_id: i64 = persistence
        .transaction(|p: &mut Persistence| p.insert_case(&create_test_draft(owner)))
        .unwrap();

    assert!(persistence.get_case_by_id(case_id).unwrap().is_some());
}

#[test]
fn test_transaction_rolls_back_every_write_on_error() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);

    let result: Result<(), PersistenceError> = persistence.transaction(|p: &mut Persistence| {
        p.insert_case(&create_test_draft(owner))?;
        p.insert_case(&create_test_draft(owner))?;
        Err(PersistenceError::Other(String::from("audit write failed")))
    });

    assert!(result.is_err());
    assert!(all_cases(&mut persistence).is_empty());
}

#[test]
fn test_nested_failure_rolls_back_only_the_savepoint() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);

    let outer_case: i64 = persistence
        .transaction(|p: &mut Persistence| {
            let kept: i64 = p.insert_case(&create_test_draft(owner))?;

            let inner: Result<i64, PersistenceError> = p.transaction(|p: &mut Persistence| {
                p.insert_case(&create_test_draft(owner))?;
                Err(PersistenceError::Other(String::from("inner failure")))
            });
            assert!(inner.is_err());

            Ok::<_, PersistenceError>(kept)
        })
        .unwrap();

    let cases: Vec<Case> = all_cases(&mut persistence);
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].case_id, Some(outer_case));
}

#[test]
fn test_transaction_error_type_can_wrap_persistence_errors() {
    #[derive(Debug)]
    enum RequestError {
        Storage(PersistenceError),
        Rejected,
    }

    impl From<PersistenceError> for RequestError {
        fn from(err: PersistenceError) -> Self {
            Self::Storage(err)
        }
    }

    let mut persistence = Persistence::new_in_memory().unwrap();
    let owner: i64 = insert_test_staff(&mut persistence, "LGU-0001", Role::LguAdmin);

    let result: Result<(), RequestError> = persistence.transaction(|p: &mut Persistence| {
        let case_id: i64 = p.insert_case(&create_test_draft(owner))?;
        let mut case: Case = p.get_case_by_id(case_id)?.ok_or(RequestError::Rejected)?;
        case.status = CaseStatus::NotReceived;
        p.update_case(&case, 5)?;
        Ok(())
    });

    assert!(matches!(
        result,
        Err(RequestError::Storage(
            PersistenceError::ConcurrentModification { .. }
        ))
    ));
    assert!(all_cases(&mut persistence).is_empty());
}
