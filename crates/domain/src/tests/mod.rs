// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::{AccountStatus, Case, CaseStatus, ClientDetails, Role, StaffActor};
use time::macros::datetime;
use uuid::Uuid;

pub fn create_test_actor(staff_pk: i64, role: Role) -> StaffActor {
    StaffActor::new(
        staff_pk,
        format!("{}-{staff_pk:04}", role.staff_id_prefix()),
        format!("staff{staff_pk}@example.gov.ph"),
        format!("Staff {staff_pk}"),
        role,
        AccountStatus::Active,
    )
}

pub fn create_test_case(owner: i64) -> Case {
    let client = ClientDetails {
        first_name: String::from("Maria"),
        last_name: String::from("Santos"),
        ..ClientDetails::default()
    };
    Case::new_draft(
        Uuid::new_v4(),
        owner,
        client,
        None,
        datetime!(2025-01-15 09:00 UTC),
    )
}

pub fn create_submitted_test_case(owner: i64) -> Case {
    let mut case = create_test_case(owner);
    case.tracking_id = Some(String::from("PAS25010001"));
    case.status = CaseStatus::NotReceived;
    case.lgu_submitted_at = Some(datetime!(2025-01-15 10:00 UTC));
    case
}
