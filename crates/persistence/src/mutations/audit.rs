// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log and feedback appends.
//!
//! Audit rows are insert-only. The schema backs this up with triggers that
//! abort any `UPDATE` or `DELETE` on `audit_events`.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use legaltrack_audit::{AuditEvent, AuditTarget};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::{audit_events, feedback};
use crate::error::PersistenceError;

backend_fn! {
/// Appends an audit event.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event to persist
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(conn: &mut _, event: &AuditEvent) -> Result<i64, PersistenceError> {
    let (target_kind, target_case_id, target_staff_pk): (&str, Option<i64>, Option<i64>) =
        match &event.target {
            AuditTarget::Case { case_id, .. } => ("case", *case_id, None),
            AuditTarget::User { staff_pk, .. } => ("user", None, Some(*staff_pk)),
            AuditTarget::None => ("none", None, None),
        };

    let details_json: String = serde_json::to_string(&event.details)?;
    let created_at: String = format_timestamp(event.created_at)?;

    diesel::insert_into(audit_events::table)
        .values((
            audit_events::actor_staff_pk.eq(event.actor.as_ref().map(|a| a.staff_pk)),
            audit_events::actor_staff_id.eq(event.actor.as_ref().map(|a| a.staff_id.clone())),
            audit_events::actor_role.eq(event.actor.as_ref().map(|a| a.role.as_str())),
            audit_events::action.eq(event.action.as_str()),
            audit_events::target_kind.eq(target_kind),
            audit_events::target_reference.eq(event.target.reference()),
            audit_events::target_case_id.eq(target_case_id),
            audit_events::target_staff_pk.eq(target_staff_pk),
            audit_events::details_json.eq(details_json),
            audit_events::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;

    debug!(event_id, action = event.action.as_str(), "Appended audit event");

    Ok(event_id)
}
}

backend_fn! {
/// Stores a support feedback message.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_feedback(
    conn: &mut _,
    name: Option<&str>,
    email: Option<&str>,
    message: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(feedback::table)
        .values((
            feedback::name.eq(name),
            feedback::email.eq(email),
            feedback::message.eq(message),
            feedback::created_at.eq(created_at),
        ))
        .execute(conn)?;

    Ok(conn.get_last_insert_rowid()?)
}
}
