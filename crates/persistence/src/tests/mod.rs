// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod allocation_tests;
mod audit_tests;
mod backend_validation_tests;
mod transaction_tests;

use legaltrack_domain::{Case, CaseStatus, CaseType, ClientDetails, Role};
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

use crate::{NewStaff, Persistence};

pub fn test_now() -> OffsetDateTime {
    datetime!(2025-01-15 09:00 UTC)
}

pub fn create_test_new_staff(email: &str, role: Role) -> NewStaff {
    NewStaff {
        email: String::from(email),
        full_name: String::from("Juan Dela Cruz"),
        role,
        lgu_municipality: (role == Role::LguAdmin).then(|| String::from("Tagum City")),
        password_hash: String::from("$2b$04$not-a-real-hash"),
        activation_nonce: format!("nonce-{email}"),
        created_at: test_now(),
    }
}

/// Inserts a staff row and returns its key.
pub fn insert_test_staff(persistence: &mut Persistence, staff_id: &str, role: Role) -> i64 {
    let email: String = format!("{}@example.gov.ph", staff_id.to_lowercase());
    persistence
        .insert_staff(staff_id, &create_test_new_staff(&email, role))
        .expect("Failed to insert staff")
}

pub fn create_test_client() -> ClientDetails {
    ClientDetails {
        first_name: String::from("Maria"),
        last_name: String::from("Santos"),
        number: String::from("09171234567"),
        ..ClientDetails::default()
    }
}

pub fn create_test_draft(submitted_by: i64) -> Case {
    Case::new_draft(
        Uuid::new_v4(),
        submitted_by,
        create_test_client(),
        Some(CaseType::LandFirstTime),
        test_now(),
    )
}

/// Inserts a case with the given status and tracking ID, returning it as
/// stored.
pub fn insert_test_case(
    persistence: &mut Persistence,
    submitted_by: i64,
    tracking_id: Option<&str>,
    status: CaseStatus,
) -> Case {
    let mut case: Case = create_test_draft(submitted_by);
    case.tracking_id = tracking_id.map(String::from);
    case.status = status;
    let case_id: i64 = persistence.insert_case(&case).expect("Failed to insert case");
    persistence
        .get_case_by_id(case_id)
        .expect("Failed to load case")
        .expect("Case should exist")
}
