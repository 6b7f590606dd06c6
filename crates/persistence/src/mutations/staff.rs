// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff account mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use legaltrack_domain::AccountStatus;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{NewStaff, format_timestamp};
use crate::diesel_schema::staff;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a pending staff account under an allocated staff ID.
///
/// The email is stored lowercased. The activation nonce is recorded as sent
/// at creation time.
///
/// # Returns
///
/// The new staff key.
///
/// # Errors
///
/// Returns `UniqueViolation` if the staff ID or email is taken.
pub fn insert_staff(
    conn: &mut _,
    staff_id: &str,
    new_staff: &NewStaff,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(new_staff.created_at)?;

    diesel::insert_into(staff::table)
        .values((
            staff::staff_id.eq(staff_id),
            staff::email.eq(new_staff.email.trim().to_lowercase()),
            staff::full_name.eq(&new_staff.full_name),
            staff::role.eq(new_staff.role.as_str()),
            staff::account_status.eq(AccountStatus::Pending.as_str()),
            staff::lgu_municipality.eq(new_staff.lgu_municipality.as_deref()),
            staff::password_hash.eq(&new_staff.password_hash),
            staff::activation_nonce.eq(&new_staff.activation_nonce),
            staff::activation_sent_at.eq(&created_at),
            staff::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    let staff_pk: i64 = conn.get_last_insert_rowid()?;

    info!(staff_pk, staff_id, role = new_staff.role.as_str(), "Created staff account");

    Ok(staff_pk)
}
}

backend_fn! {
/// Sets the account status of a staff member.
///
/// # Errors
///
/// Returns `NotFound` if no account matched.
pub fn set_account_status(
    conn: &mut _,
    staff_pk: i64,
    status: AccountStatus,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(staff::table)
        .filter(staff::staff_pk.eq(staff_pk))
        .set(staff::account_status.eq(status.as_str()))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("staff {staff_pk}")));
    }

    info!(staff_pk, status = status.as_str(), "Updated account status");

    Ok(())
}
}

backend_fn! {
/// Activates a pending account, replacing the temporary password hash and
/// consuming the nonce.
///
/// # Errors
///
/// Returns `NotFound` if no account matched.
pub fn activate_staff(
    conn: &mut _,
    staff_pk: i64,
    password_hash: &str,
    activated_at: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(staff::table)
        .filter(staff::staff_pk.eq(staff_pk))
        .set((
            staff::account_status.eq(AccountStatus::Active.as_str()),
            staff::password_hash.eq(password_hash),
            staff::activation_nonce.eq(None::<String>),
            staff::activated_at.eq(activated_at),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("staff {staff_pk}")));
    }

    info!(staff_pk, "Activated staff account");

    Ok(())
}
}

backend_fn! {
/// Replaces the temporary password and activation nonce of a pending
/// account and restarts its activation window.
///
/// # Errors
///
/// Returns `NotFound` if no pending account matched.
pub fn reissue_activation(
    conn: &mut _,
    staff_pk: i64,
    password_hash: &str,
    activation_nonce: &str,
    sent_at: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(staff::table)
        .filter(staff::staff_pk.eq(staff_pk))
        .filter(staff::account_status.eq(AccountStatus::Pending.as_str()))
        .set((
            staff::password_hash.eq(password_hash),
            staff::activation_nonce.eq(activation_nonce),
            staff::activation_sent_at.eq(sent_at),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("pending staff {staff_pk}")));
    }

    info!(staff_pk, "Reissued activation");

    Ok(())
}
}

backend_fn! {
/// Updates the editable profile fields of a staff account.
///
/// # Errors
///
/// Returns `NotFound` if no account matched.
pub fn update_staff_profile(
    conn: &mut _,
    staff_pk: i64,
    full_name: &str,
    lgu_municipality: Option<&str>,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(staff::table)
        .filter(staff::staff_pk.eq(staff_pk))
        .set((
            staff::full_name.eq(full_name),
            staff::lgu_municipality.eq(lgu_municipality),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("staff {staff_pk}")));
    }

    info!(staff_pk, "Updated staff profile");

    Ok(())
}
}
