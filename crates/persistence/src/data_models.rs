// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use legaltrack_domain::{Role, StaffActor};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;

/// A staff account as stored, including credential and activation data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRecord {
    pub actor: StaffActor,
    pub password_hash: String,
    pub activation_nonce: Option<String>,
    pub activation_sent_at: Option<String>,
    pub activated_at: Option<String>,
    pub created_at: String,
}

/// Values for a new staff row. The staff ID is supplied by the allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaff {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub lgu_municipality: Option<String>,
    pub password_hash: String,
    pub activation_nonce: String,
    pub created_at: OffsetDateTime,
}

/// A stored document reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDocumentRecord {
    pub document_type: String,
    pub storage_ref: String,
    pub uploaded_by: i64,
    pub uploaded_at: String,
}

/// A stored internal remark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRemarkRecord {
    pub remark_id: i64,
    pub text: String,
    pub created_by: i64,
    pub created_at: String,
}

/// A stored support feedback message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub feedback_id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: String,
    pub resolved: bool,
    pub created_at: String,
}

/// Formats a timestamp for a text column.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Formats an optional timestamp.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_optional(at: Option<OffsetDateTime>) -> Result<Option<String>, PersistenceError> {
    at.map(format_timestamp).transpose()
}

/// Parses a timestamp stored by `format_timestamp`.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(text, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("bad timestamp '{text}': {e}")))
}

/// Parses an optional stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_optional(text: Option<&str>) -> Result<Option<OffsetDateTime>, PersistenceError> {
    text.map(parse_timestamp).transpose()
}
