// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for multi-database support.
//!
//! These tests validate that the persistence layer works correctly
//! across different database backends (`SQLite`, MariaDB/MySQL).
//!
//! ## Purpose
//!
//! The purpose of these tests is to ensure:
//! 1. Migrations apply cleanly on all supported backends
//! 2. Foreign key constraints are enforced correctly
//! 3. Unique constraints work as expected
//! 4. Transactions and rollback behavior is consistent
//! 5. Backend-specific behavior is documented and tested
//!
//! ## Test Execution
//!
//! - `SQLite` tests run normally via `cargo test`
//! - MariaDB/MySQL tests are marked `#[ignore]` and run only via `cargo xtask test-mariadb`
//!
//! ## Infrastructure Requirements
//!
//! `MariaDB` tests require:
//! - `DATABASE_URL` environment variable (set by xtask)
//! - `LEGALTRACK_TEST_BACKEND=mariadb` environment variable
//! - Running `MariaDB` instance (provisioned by xtask)
//!
//! Tests fail fast if required infrastructure is missing.
//!
//! ## What These Tests Validate
//!
//! These tests focus on **infrastructure and schema compatibility**, not business logic:
//! - Schema creation and migration application
//! - Database constraint enforcement (FK, UNIQUE, append-only triggers)
//! - Transaction semantics
//! - Backend-specific SQL compatibility
//!
//! Business logic and domain rules are validated by the standard test suite
//! running against `SQLite`. These backend validation tests ensure the
//! persistence layer works correctly on additional databases.
//!
//! ## Adding New Backend Validation Tests
//!
//! When adding a new test:
//! 1. Mark it with `#[ignore]`
//! 2. Call `verify_mariadb_test_environment()` first
//! 3. Use raw SQL to test schema-level behavior
//! 4. Clean up test data if needed (or use transactions)
//! 5. Document what backend-specific behavior is being validated

use diesel::MysqlConnection;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use legaltrack_domain::{Case, CaseStatus, Role, SequenceScope};
use std::env;
use uuid::Uuid;

use super::{create_test_draft, create_test_new_staff};
use crate::backend::mysql;
use crate::{IdentifierKind, Persistence, PersistenceError};

/// Result type for COUNT queries.
#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Helper to get the `MariaDB` connection URL from environment.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set, indicating missing infrastructure.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// Helper to verify we're running in the `MariaDB` test environment.
///
/// # Panics
///
/// Panics if `LEGALTRACK_TEST_BACKEND` is not set to `mariadb`.
fn verify_mariadb_test_environment() {
    let backend = env::var("LEGALTRACK_TEST_BACKEND").expect(
        "LEGALTRACK_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "LEGALTRACK_TEST_BACKEND must be 'mariadb'");
}

/// A short token that keeps rows from different test runs apart.
fn unique_token() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

/// Inserts a staff row through the persistence API and returns its key.
fn insert_staff(persistence: &mut Persistence, role: Role) -> i64 {
    let token: String = unique_token();
    persistence
        .insert_staff(
            &format!("T{token}-0001"),
            &create_test_new_staff(&format!("{token}@example.gov.ph"), role),
        )
        .expect("Failed to insert staff")
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_connection() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = MysqlConnection::establish(&url);
    assert!(
        result.is_ok(),
        "Failed to connect to MariaDB: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_apply_cleanly() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = mysql::initialize_database(&url);
    assert!(
        result.is_ok(),
        "Failed to initialize MariaDB and run migrations: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_foreign_key_enforcement() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    let result = mysql::verify_foreign_key_enforcement(&mut conn);
    assert!(
        result.is_ok(),
        "Foreign key enforcement verification failed: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_case_requires_existing_submitter() {
    verify_mariadb_test_environment();
    let mut persistence =
        Persistence::new_with_mysql(&get_mariadb_url()).expect("Failed to open MariaDB");

    let result = persistence.insert_case(&create_test_draft(999_999_999));

    assert!(
        result.is_err(),
        "Inserting a case for a missing staff member should fail due to foreign key constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_staff_email_unique_constraint() {
    verify_mariadb_test_environment();
    let mut persistence =
        Persistence::new_with_mysql(&get_mariadb_url()).expect("Failed to open MariaDB");
    let token: String = unique_token();
    let email: String = format!("{token}@example.gov.ph");

    persistence
        .insert_staff(
            &format!("A{token}-0001"),
            &create_test_new_staff(&email, Role::CapitolApprover),
        )
        .expect("Failed to insert staff");
    let duplicate = persistence.insert_staff(
        &format!("B{token}-0001"),
        &create_test_new_staff(&email.to_uppercase(), Role::CapitolApprover),
    );

    assert!(
        matches!(duplicate, Err(PersistenceError::UniqueViolation(_))),
        "Duplicate email should fail due to UNIQUE constraint, got {duplicate:?}"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_case_version_check() {
    verify_mariadb_test_environment();
    let mut persistence =
        Persistence::new_with_mysql(&get_mariadb_url()).expect("Failed to open MariaDB");
    let owner: i64 = insert_staff(&mut persistence, Role::LguAdmin);

    let case_id: i64 = persistence
        .insert_case(&create_test_draft(owner))
        .expect("Failed to insert case");
    let mut case: Case = persistence
        .get_case_by_id(case_id)
        .expect("Failed to load case")
        .expect("Case should exist");
    case.status = CaseStatus::NotReceived;

    assert_eq!(persistence.update_case(&case, 0), Ok(1));
    assert!(matches!(
        persistence.update_case(&case, 0),
        Err(PersistenceError::ConcurrentModification { .. })
    ));
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_identifier_collision_is_recognised() {
    verify_mariadb_test_environment();
    let mut persistence =
        Persistence::new_with_mysql(&get_mariadb_url()).expect("Failed to open MariaDB");
    let owner: i64 = insert_staff(&mut persistence, Role::LguAdmin);
    let scope = SequenceScope::new(format!("Z{}", unique_token()), 4).expect("valid scope");

    let result: Result<i64, PersistenceError> = persistence.allocate_identifier(
        IdentifierKind::TrackingId,
        &scope,
        2,
        |p: &mut Persistence, tracking_id: &str| {
            for _ in 0..2 {
                let mut case: Case = create_test_draft(owner);
                case.tracking_id = Some(tracking_id.to_string());
                p.insert_case(&case)?;
            }
            Ok(0)
        },
    );

    assert!(
        matches!(result, Err(PersistenceError::AllocationExhausted { attempts: 2, .. })),
        "MariaDB duplicate-key messages must name the tracking_id key, got {result:?}"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_audit_events_are_append_only() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    diesel::sql_query(
        "INSERT INTO audit_events (action, target_kind, details_json, created_at)
         VALUES ('login', 'none', '{}', '2025-01-15T09:00:00Z')",
    )
    .execute(&mut conn)
    .expect("Failed to insert audit event");

    let update = diesel::sql_query("UPDATE audit_events SET action = 'logout'").execute(&mut conn);
    let delete = diesel::sql_query("DELETE FROM audit_events").execute(&mut conn);

    assert!(update.is_err(), "UPDATE on audit_events must be rejected");
    assert!(delete.is_err(), "DELETE on audit_events must be rejected");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_transaction_rollback() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();
    let token: String = unique_token();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    conn.begin_test_transaction()
        .expect("Failed to begin transaction");

    diesel::sql_query(format!(
        "INSERT INTO feedback (message, created_at)
         VALUES ('rollback {token}', '2025-01-15T09:00:00Z')"
    ))
    .execute(&mut conn)
    .expect("Failed to insert feedback");

    let count_query: String =
        format!("SELECT COUNT(*) as count FROM feedback WHERE message = 'rollback {token}'");

    let count: i64 = diesel::sql_query(&count_query)
        .get_result::<CountResult>(&mut conn)
        .map(|r| r.count)
        .expect("Failed to count feedback");

    assert_eq!(count, 1, "Feedback should exist within transaction");

    // Transaction will rollback when conn is dropped (test transaction mode)
    drop(conn);

    let mut new_conn = mysql::initialize_database(&url).expect("Failed to reconnect to MariaDB");

    let count_after: i64 = diesel::sql_query(&count_query)
        .get_result::<CountResult>(&mut new_conn)
        .map(|r| r.count)
        .expect("Failed to count feedback after rollback");

    assert_eq!(
        count_after, 0,
        "Feedback should not exist after transaction rollback"
    );
}
