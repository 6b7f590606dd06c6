// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case mutations.
//!
//! Every update to an existing case is a compare-and-swap on `version`:
//! the row is written only if it still carries the version the caller
//! loaded, and the version is bumped by one.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use legaltrack_domain::Case;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::{format_optional, format_timestamp};
use crate::diesel_schema::{case_documents, case_remarks, cases};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new case at version 0.
///
/// # Returns
///
/// The storage key assigned to the case.
///
/// # Errors
///
/// Returns an error if the insert fails, including a unique violation on
/// `draft_id` or `tracking_id`.
pub fn insert_case(conn: &mut _, case: &Case) -> Result<i64, PersistenceError> {
    let checklist_json: String = serde_json::to_string(&case.checklist)?;

    diesel::insert_into(cases::table)
        .values((
            cases::draft_id.eq(case.draft_id.to_string()),
            cases::tracking_id.eq(case.tracking_id.as_deref()),
            cases::status.eq(case.status.as_str()),
            cases::client_name.eq(&case.client.name),
            cases::client_contact.eq(&case.client.contact),
            cases::client_first_name.eq(&case.client.first_name),
            cases::client_last_name.eq(&case.client.last_name),
            cases::client_middle_name.eq(&case.client.middle_name),
            cases::client_suffix.eq(&case.client.suffix),
            cases::client_number.eq(&case.client.number),
            cases::client_email.eq(&case.client.email),
            cases::case_type.eq(case.case_type.map(|t| t.as_str())),
            cases::checklist_json.eq(checklist_json),
            cases::submitted_by.eq(case.submitted_by),
            cases::created_at.eq(format_timestamp(case.created_at)?),
            cases::updated_at.eq(format_timestamp(case.updated_at)?),
            cases::version.eq(0_i64),
        ))
        .execute(conn)?;

    let case_id: i64 = conn.get_last_insert_rowid()?;

    info!(case_id, draft_id = %case.draft_id, "Inserted case");

    Ok(case_id)
}
}

backend_fn! {
/// Writes every mutable field of `case` if the stored version still equals
/// `expected_version`.
///
/// # Returns
///
/// The new version.
///
/// # Errors
///
/// Returns `ConcurrentModification` if the row has moved on (or vanished),
/// and `UniqueViolation` if `tracking_id` or `numbering_number` collides.
pub fn update_case(
    conn: &mut _,
    case: &Case,
    expected_version: i64,
) -> Result<i64, PersistenceError> {
    let case_id: i64 = case
        .case_id
        .ok_or_else(|| PersistenceError::Other(String::from("cannot update an unsaved case")))?;
    let checklist_json: String = serde_json::to_string(&case.checklist)?;
    let next_version: i64 = expected_version + 1;

    let updated: usize = diesel::update(cases::table)
        .filter(cases::case_id.eq(case_id))
        .filter(cases::version.eq(expected_version))
        .set((
            cases::tracking_id.eq(case.tracking_id.as_deref()),
            cases::status.eq(case.status.as_str()),
            cases::client_name.eq(&case.client.name),
            cases::client_contact.eq(&case.client.contact),
            cases::client_first_name.eq(&case.client.first_name),
            cases::client_last_name.eq(&case.client.last_name),
            cases::client_middle_name.eq(&case.client.middle_name),
            cases::client_suffix.eq(&case.client.suffix),
            cases::client_number.eq(&case.client.number),
            cases::client_email.eq(&case.client.email),
            cases::case_type.eq(case.case_type.map(|t| t.as_str())),
            cases::checklist_json.eq(checklist_json),
            cases::assigned_to.eq(case.assigned_to),
            cases::assigned_at.eq(format_optional(case.assigned_at)?),
            cases::received_at.eq(format_optional(case.received_at)?),
            cases::received_by.eq(case.received_by),
            cases::returned_at.eq(format_optional(case.returned_at)?),
            cases::returned_by.eq(case.returned_by),
            cases::return_reason.eq(case.return_reason.as_deref()),
            cases::released_at.eq(format_optional(case.released_at)?),
            cases::numbering_number.eq(case.numbering_number.as_deref()),
            cases::lgu_submitted_at.eq(format_optional(case.lgu_submitted_at)?),
            cases::updated_at.eq(format_timestamp(case.updated_at)?),
            cases::version.eq(next_version),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ConcurrentModification {
            case_id,
            expected_version,
        });
    }

    debug!(case_id, version = next_version, "Updated case");

    Ok(next_version)
}
}

backend_fn! {
/// Deletes a case row if it is still at `expected_version`.
///
/// Documents and remarks go with it via `ON DELETE CASCADE`. Audit rows are
/// untouched.
///
/// # Errors
///
/// Returns `ConcurrentModification` if no row matched.
pub fn delete_case(
    conn: &mut _,
    case_id: i64,
    expected_version: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        cases::table
            .filter(cases::case_id.eq(case_id))
            .filter(cases::version.eq(expected_version)),
    )
    .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::ConcurrentModification {
            case_id,
            expected_version,
        });
    }

    info!(case_id, "Deleted draft case");

    Ok(())
}
}

backend_fn! {
/// Records a document reference, replacing any earlier upload of the same
/// document type.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn store_case_document(
    conn: &mut _,
    case_id: i64,
    document_type: &str,
    storage_ref: &str,
    uploaded_by: i64,
    uploaded_at: &str,
) -> Result<(), PersistenceError> {
    diesel::delete(
        case_documents::table
            .filter(case_documents::case_id.eq(case_id))
            .filter(case_documents::document_type.eq(document_type)),
    )
    .execute(conn)?;

    diesel::insert_into(case_documents::table)
        .values((
            case_documents::case_id.eq(case_id),
            case_documents::document_type.eq(document_type),
            case_documents::storage_ref.eq(storage_ref),
            case_documents::uploaded_by.eq(uploaded_by),
            case_documents::uploaded_at.eq(uploaded_at),
        ))
        .execute(conn)?;

    debug!(case_id, document_type, "Stored case document");

    Ok(())
}
}

backend_fn! {
/// Stores an internal remark.
///
/// # Returns
///
/// The remark ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_case_remark(
    conn: &mut _,
    case_id: i64,
    text: &str,
    created_by: i64,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(case_remarks::table)
        .values((
            case_remarks::case_id.eq(case_id),
            case_remarks::text.eq(text),
            case_remarks::created_by.eq(created_by),
            case_remarks::created_at.eq(created_at),
        ))
        .execute(conn)?;

    Ok(conn.get_last_insert_rowid()?)
}
}
