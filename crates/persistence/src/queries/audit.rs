// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log queries.
//!
//! The audit log is read-only from here; nothing in this crate updates or
//! deletes audit rows.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use legaltrack_audit::{Actor, AuditAction, AuditEvent, AuditTarget};
use legaltrack_domain::Role;
use std::collections::BTreeMap;
use tracing::debug;

use crate::data_models::{FeedbackRecord, parse_timestamp};
use crate::diesel_schema::{audit_events, feedback};
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    actor_staff_pk: Option<i64>,
    actor_staff_id: Option<String>,
    actor_role: Option<String>,
    action: String,
    target_kind: String,
    target_reference: Option<String>,
    target_case_id: Option<i64>,
    target_staff_pk: Option<i64>,
    details_json: String,
    created_at: String,
}

impl TryFrom<AuditEventRow> for AuditEvent {
    type Error = PersistenceError;

    fn try_from(row: AuditEventRow) -> Result<Self, Self::Error> {
        let actor: Option<Actor> = match (row.actor_staff_pk, row.actor_staff_id, row.actor_role) {
            (Some(staff_pk), Some(staff_id), Some(role)) => {
                let role: Role = role.parse()?;
                Some(Actor::new(staff_pk, staff_id, role))
            }
            _ => None,
        };

        let action: AuditAction = row
            .action
            .parse()
            .map_err(PersistenceError::ReconstructionError)?;

        let target: AuditTarget = match (row.target_kind.as_str(), row.target_reference) {
            ("case", Some(reference)) => AuditTarget::Case {
                reference,
                case_id: row.target_case_id,
            },
            ("user", Some(reference)) => AuditTarget::User {
                reference,
                staff_pk: row.target_staff_pk.unwrap_or_default(),
            },
            ("none", _) => AuditTarget::None,
            (kind, _) => {
                return Err(PersistenceError::ReconstructionError(format!(
                    "bad audit target kind '{kind}' on event {}",
                    row.event_id
                )));
            }
        };

        let details: BTreeMap<String, String> = serde_json::from_str(&row.details_json)?;

        Ok(Self {
            event_id: Some(row.event_id),
            actor,
            action,
            target,
            details,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

backend_fn! {
/// Retrieves the audit timeline for a case, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn get_case_timeline(conn: &mut _, case_id: i64) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::target_case_id.eq(case_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    debug!(case_id, count = rows.len(), "Loaded case timeline");

    rows.into_iter().map(AuditEvent::try_from).collect()
}
}

backend_fn! {
/// Lists audit events newest first, optionally restricted to one kind.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_audit_events(
    conn: &mut _,
    action: Option<AuditAction>,
    limit: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let mut query = audit_events::table
        .select(AuditEventRow::as_select())
        .into_boxed();
    if let Some(action) = action {
        query = query.filter(audit_events::action.eq(action.as_str()));
    }

    let rows: Vec<AuditEventRow> = query
        .order(audit_events::event_id.desc())
        .limit(limit)
        .load(conn)?;

    rows.into_iter().map(AuditEvent::try_from).collect()
}
}

backend_fn! {
/// Lists support feedback, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_feedback(conn: &mut _) -> Result<Vec<FeedbackRecord>, PersistenceError> {
    let rows: Vec<(i64, Option<String>, Option<String>, String, i32, String)> = feedback::table
        .order(feedback::feedback_id.desc())
        .select((
            feedback::feedback_id,
            feedback::name,
            feedback::email,
            feedback::message,
            feedback::resolved,
            feedback::created_at,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(feedback_id, name, email, message, resolved, created_at)| FeedbackRecord {
                feedback_id,
                name,
                email,
                message,
                resolved: resolved != 0,
                created_at,
            },
        )
        .collect())
}
}
