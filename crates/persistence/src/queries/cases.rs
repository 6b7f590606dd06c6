// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case queries.
//!
//! Cases are stored one row per case with the checklist as a JSON column.
//! Documents and remarks live in their own tables keyed by `case_id`.

use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel::{MysqlConnection, SqliteConnection};
use legaltrack_domain::{Case, CaseFilter, CaseStatus, CaseType, ChecklistItem, ClientDetails};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::data_models::{CaseDocumentRecord, CaseRemarkRecord, parse_optional, parse_timestamp};
use crate::diesel_schema::{case_documents, case_remarks, cases};
use crate::error::PersistenceError;

diesel::define_sql_function! {
    fn lower(x: Nullable<Text>) -> Nullable<Text>;
}

/// Diesel Queryable struct for case rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = cases)]
struct CaseRow {
    case_id: i64,
    draft_id: String,
    tracking_id: Option<String>,
    status: String,
    client_name: String,
    client_contact: String,
    client_first_name: String,
    client_last_name: String,
    client_middle_name: String,
    client_suffix: String,
    client_number: String,
    client_email: String,
    case_type: Option<String>,
    checklist_json: String,
    submitted_by: i64,
    assigned_to: Option<i64>,
    assigned_at: Option<String>,
    received_at: Option<String>,
    received_by: Option<i64>,
    returned_at: Option<String>,
    returned_by: Option<i64>,
    return_reason: Option<String>,
    released_at: Option<String>,
    numbering_number: Option<String>,
    lgu_submitted_at: Option<String>,
    created_at: String,
    updated_at: String,
    version: i64,
}

impl TryFrom<CaseRow> for Case {
    type Error = PersistenceError;

    fn try_from(row: CaseRow) -> Result<Self, Self::Error> {
        let draft_id: Uuid = Uuid::parse_str(&row.draft_id).map_err(|e| {
            PersistenceError::ReconstructionError(format!("bad draft_id '{}': {e}", row.draft_id))
        })?;
        let status: CaseStatus = row.status.parse()?;
        let case_type: Option<CaseType> = row
            .case_type
            .as_deref()
            .map(str::parse::<CaseType>)
            .transpose()?;
        let checklist: Vec<ChecklistItem> = serde_json::from_str(&row.checklist_json)?;

        Ok(Self {
            case_id: Some(row.case_id),
            draft_id,
            tracking_id: row.tracking_id,
            status,
            client: ClientDetails {
                name: row.client_name,
                contact: row.client_contact,
                first_name: row.client_first_name,
                last_name: row.client_last_name,
                middle_name: row.client_middle_name,
                suffix: row.client_suffix,
                number: row.client_number,
                email: row.client_email,
            },
            case_type,
            checklist,
            submitted_by: row.submitted_by,
            assigned_to: row.assigned_to,
            assigned_at: parse_optional(row.assigned_at.as_deref())?,
            received_at: parse_optional(row.received_at.as_deref())?,
            received_by: row.received_by,
            returned_at: parse_optional(row.returned_at.as_deref())?,
            returned_by: row.returned_by,
            return_reason: row.return_reason,
            released_at: parse_optional(row.released_at.as_deref())?,
            numbering_number: row.numbering_number,
            lgu_submitted_at: parse_optional(row.lgu_submitted_at.as_deref())?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            version: row.version,
        })
    }
}

fn first_case(
    result: Result<CaseRow, diesel::result::Error>,
) -> Result<Option<Case>, PersistenceError> {
    match result {
        Ok(row) => Case::try_from(row).map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

backend_fn! {
/// Retrieves a case by its storage key.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if no such case exists.
pub fn get_case_by_id(conn: &mut _, case_id: i64) -> Result<Option<Case>, PersistenceError> {
    debug!(case_id, "Looking up case by id");

    first_case(
        cases::table
            .filter(cases::case_id.eq(case_id))
            .select(CaseRow::as_select())
            .first(conn),
    )
}
}

backend_fn! {
/// Retrieves a case by tracking ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if no such case exists.
pub fn get_case_by_tracking_id(
    conn: &mut _,
    tracking_id: &str,
) -> Result<Option<Case>, PersistenceError> {
    debug!(tracking_id, "Looking up case by tracking id");

    first_case(
        cases::table
            .filter(cases::tracking_id.eq(tracking_id))
            .select(CaseRow::as_select())
            .first(conn),
    )
}
}

backend_fn! {
/// Retrieves a case by draft ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if no such case exists.
pub fn get_case_by_draft_id(
    conn: &mut _,
    draft_id: Uuid,
) -> Result<Option<Case>, PersistenceError> {
    debug!(%draft_id, "Looking up case by draft id");

    first_case(
        cases::table
            .filter(cases::draft_id.eq(draft_id.to_string()))
            .select(CaseRow::as_select())
            .first(conn),
    )
}
}

backend_fn! {
/// Lists cases matching a work-queue filter, most recently updated first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_cases(conn: &mut _, filter: &CaseFilter) -> Result<Vec<Case>, PersistenceError> {
    let mut query = cases::table.select(CaseRow::as_select()).into_boxed();

    if let Some(statuses) = &filter.statuses {
        let names: Vec<&'static str> = statuses.iter().map(CaseStatus::as_str).collect();
        query = query.filter(cases::status.eq_any(names));
    }
    if !filter.include_drafts {
        query = query.filter(cases::tracking_id.is_not_null());
    }
    if let Some(owner) = filter.submitted_by {
        query = query.filter(cases::submitted_by.eq(owner));
    }
    if let Some(assignee) = filter.assigned_to {
        query = query.filter(cases::assigned_to.eq(assignee));
    }

    let rows: Vec<CaseRow> = query
        .order((cases::updated_at.desc(), cases::case_id.desc()))
        .load(conn)?;

    debug!(count = rows.len(), "Listed cases");

    rows.into_iter().map(Case::try_from).collect()
}
}

backend_fn! {
/// Counts in-review cases per assigned examiner.
///
/// Examiners with no in-review case are absent from the map.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn in_review_load_by_assignee(conn: &mut _) -> Result<HashMap<i64, i64>, PersistenceError> {
    let assignees: Vec<Option<i64>> = cases::table
        .filter(cases::status.eq(CaseStatus::InReview.as_str()))
        .select(cases::assigned_to)
        .load(conn)?;

    let mut loads: HashMap<i64, i64> = HashMap::new();
    for assignee in assignees.into_iter().flatten() {
        *loads.entry(assignee).or_default() += 1;
    }
    Ok(loads)
}
}

backend_fn! {
/// Returns every tracking ID beginning with `prefix`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn tracking_ids_with_prefix(
    conn: &mut _,
    prefix: &str,
) -> Result<Vec<String>, PersistenceError> {
    let ids: Vec<Option<String>> = cases::table
        .filter(cases::tracking_id.like(format!("{prefix}%")))
        .select(cases::tracking_id)
        .load(conn)?;
    Ok(ids.into_iter().flatten().collect())
}
}

backend_fn! {
/// Returns true if a case other than `excluding` holds `number`,
/// compared case-insensitively.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn numbering_number_taken(
    conn: &mut _,
    number: &str,
    excluding: Option<i64>,
) -> Result<bool, PersistenceError> {
    let wanted: String = number.trim().to_lowercase();
    let mut query = cases::table
        .filter(lower(cases::numbering_number).eq(wanted))
        .select(cases::case_id)
        .into_boxed();
    if let Some(case_id) = excluding {
        query = query.filter(cases::case_id.ne(case_id));
    }
    let holders: Vec<i64> = query.limit(1).load(conn)?;
    Ok(!holders.is_empty())
}
}

backend_fn! {
/// Lists stored documents for a case.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_case_documents(
    conn: &mut _,
    case_id: i64,
) -> Result<Vec<CaseDocumentRecord>, PersistenceError> {
    let rows: Vec<(String, String, i64, String)> = case_documents::table
        .filter(case_documents::case_id.eq(case_id))
        .order(case_documents::document_id.asc())
        .select((
            case_documents::document_type,
            case_documents::storage_ref,
            case_documents::uploaded_by,
            case_documents::uploaded_at,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(document_type, storage_ref, uploaded_by, uploaded_at)| CaseDocumentRecord {
            document_type,
            storage_ref,
            uploaded_by,
            uploaded_at,
        })
        .collect())
}
}

backend_fn! {
/// Lists remarks for a case, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_case_remarks(
    conn: &mut _,
    case_id: i64,
) -> Result<Vec<CaseRemarkRecord>, PersistenceError> {
    let rows: Vec<(i64, String, i64, String)> = case_remarks::table
        .filter(case_remarks::case_id.eq(case_id))
        .order(case_remarks::remark_id.asc())
        .select((
            case_remarks::remark_id,
            case_remarks::text,
            case_remarks::created_by,
            case_remarks::created_at,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(remark_id, text, created_by, created_at)| CaseRemarkRecord {
            remark_id,
            text,
            created_by,
            created_at,
        })
        .collect())
}
}
