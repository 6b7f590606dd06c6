// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff account queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use legaltrack_domain::{AccountStatus, Role, StaffActor};
use tracing::debug;

use crate::data_models::StaffRecord;
use crate::diesel_schema::staff;
use crate::error::PersistenceError;

/// Diesel Queryable struct for staff rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = staff)]
struct StaffRow {
    staff_pk: i64,
    staff_id: String,
    email: String,
    full_name: String,
    role: String,
    account_status: String,
    lgu_municipality: Option<String>,
    password_hash: String,
    activation_nonce: Option<String>,
    activation_sent_at: Option<String>,
    activated_at: Option<String>,
    created_at: String,
}

impl TryFrom<StaffRow> for StaffRecord {
    type Error = PersistenceError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse()?;
        let account_status: AccountStatus = row.account_status.parse()?;
        let mut actor: StaffActor = StaffActor::new(
            row.staff_pk,
            row.staff_id,
            row.email,
            row.full_name,
            role,
            account_status,
        );
        actor.lgu_municipality = row.lgu_municipality;

        Ok(Self {
            actor,
            password_hash: row.password_hash,
            activation_nonce: row.activation_nonce,
            activation_sent_at: row.activation_sent_at,
            activated_at: row.activated_at,
            created_at: row.created_at,
        })
    }
}

fn first_staff(
    result: Result<StaffRow, diesel::result::Error>,
) -> Result<Option<StaffRecord>, PersistenceError> {
    match result {
        Ok(row) => StaffRecord::try_from(row).map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

backend_fn! {
/// Retrieves a staff account by its numeric key.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if the account is not found.
pub fn get_staff_by_pk(
    conn: &mut _,
    staff_pk: i64,
) -> Result<Option<StaffRecord>, PersistenceError> {
    debug!(staff_pk, "Looking up staff by pk");

    first_staff(
        staff::table
            .filter(staff::staff_pk.eq(staff_pk))
            .select(StaffRow::as_select())
            .first(conn),
    )
}
}

backend_fn! {
/// Retrieves a staff account by email.
///
/// Emails are compared lowercased; they are stored lowercased.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if the account is not found.
pub fn get_staff_by_email(
    conn: &mut _,
    email: &str,
) -> Result<Option<StaffRecord>, PersistenceError> {
    let normalized: String = email.trim().to_lowercase();

    debug!("Looking up staff by email: {}", normalized);

    first_staff(
        staff::table
            .filter(staff::email.eq(&normalized))
            .select(StaffRow::as_select())
            .first(conn),
    )
}
}

backend_fn! {
/// Retrieves a pending account by its activation nonce.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if no account holds the nonce.
pub fn get_staff_by_activation_nonce(
    conn: &mut _,
    nonce: &str,
) -> Result<Option<StaffRecord>, PersistenceError> {
    first_staff(
        staff::table
            .filter(staff::activation_nonce.eq(nonce))
            .select(StaffRow::as_select())
            .first(conn),
    )
}
}

backend_fn! {
/// Lists every staff account ordered by staff ID.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_staff(conn: &mut _) -> Result<Vec<StaffRecord>, PersistenceError> {
    let rows: Vec<StaffRow> = staff::table
        .order(staff::staff_id.asc())
        .select(StaffRow::as_select())
        .load(conn)?;

    rows.into_iter().map(StaffRecord::try_from).collect()
}
}

backend_fn! {
/// Returns every staff ID beginning with `prefix`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn staff_ids_with_prefix(conn: &mut _, prefix: &str) -> Result<Vec<String>, PersistenceError> {
    Ok(staff::table
        .filter(staff::staff_id.like(format!("{prefix}%")))
        .select(staff::staff_id)
        .load(conn)?)
}
}
