// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Every failure a caller can see is an `ApiError`, and every `ApiError`
//! maps onto exactly one `TransitionCode`.

use crate::password_policy::PasswordPolicyError;
use legaltrack::CoreError;
use legaltrack_domain::DomainError;
use legaltrack_persistence::PersistenceError;
use tracing::error;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller could not be resolved to an active staff account.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller's role does not permit the operation.
    Unauthorized {
        /// The operation that was attempted.
        action: String,
        /// The role required for this operation.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// The response code surfaced to callers for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionCode {
    Ok,
    UnauthorizedRole,
    InvalidState,
    PreconditionFailed,
    AllocationExhausted,
    NotFound,
    Internal,
}

impl TransitionCode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::UnauthorizedRole => "UNAUTHORIZED_ROLE",
            Self::InvalidState => "INVALID_STATE",
            Self::PreconditionFailed => "PRECONDITION_FAILED",
            Self::AllocationExhausted => "ALLOCATION_EXHAUSTED",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for TransitionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller is not a known, active staff member.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role, ownership, or assignment does not permit the action.
    UnauthorizedRole {
        /// The action that was attempted.
        action: String,
        /// A human-readable description.
        message: String,
    },
    /// The action is not valid from the current state, or another request
    /// changed the record first.
    InvalidState {
        /// The action that was attempted.
        action: String,
        /// A human-readable description.
        message: String,
    },
    /// A precondition of the action does not hold.
    PreconditionFailed {
        /// The action that was attempted.
        action: String,
        /// A human-readable description.
        message: String,
    },
    /// No free identifier could be allocated.
    AllocationExhausted {
        /// A human-readable description.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found or is not visible to the actor.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the response code for this error.
    #[must_use]
    pub const fn code(&self) -> TransitionCode {
        match self {
            Self::AuthenticationFailed { .. } | Self::UnauthorizedRole { .. } => {
                TransitionCode::UnauthorizedRole
            }
            Self::InvalidState { .. } => TransitionCode::InvalidState,
            Self::PreconditionFailed { .. }
            | Self::InvalidInput { .. }
            | Self::PasswordPolicyViolation { .. } => TransitionCode::PreconditionFailed,
            Self::AllocationExhausted { .. } => TransitionCode::AllocationExhausted,
            Self::ResourceNotFound { .. } => TransitionCode::NotFound,
            Self::Internal { .. } => TransitionCode::Internal,
        }
    }

    pub(crate) fn not_found(resource_type: &str, message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::UnauthorizedRole { action, message }
            | Self::InvalidState { action, message }
            | Self::PreconditionFailed { action, message } => {
                write!(f, "{action}: {message}")
            }
            Self::AllocationExhausted { message } => {
                write!(f, "Identifier allocation failed: {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::UnauthorizedRole {
                message: format!("'{action}' requires {required_role} role"),
                action,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// Domain errors reaching the API boundary come from parsing caller input.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidRole(_) => ApiError::invalid_input("role", err.to_string()),
        DomainError::InvalidAccountStatus(_) => {
            ApiError::invalid_input("account_status", err.to_string())
        }
        DomainError::InvalidCaseStatus { .. } => ApiError::invalid_input("status", err.to_string()),
        DomainError::InvalidCaseType(_) => ApiError::invalid_input("case_type", err.to_string()),
        DomainError::InvalidCaseAction(_) => ApiError::invalid_input("action", err.to_string()),
        DomainError::InvalidCaseTab(_) => ApiError::invalid_input("tab", err.to_string()),
        DomainError::InvalidTimezone(_) => ApiError::invalid_input("timezone", err.to_string()),
        DomainError::MissingField(field) | DomainError::FieldTooLong { field, .. } => {
            ApiError::invalid_input(field, err.to_string())
        }
        DomainError::SequenceOverflow { .. } => ApiError::AllocationExhausted {
            message: err.to_string(),
        },
        DomainError::InvalidTimestamp(_) | DomainError::InvalidSequenceWidth { .. } => {
            ApiError::Internal {
                message: err.to_string(),
            }
        }
    }
}

/// Translates a workflow engine error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::CaseNotFound => ApiError::not_found("Case", "no such case"),
        CoreError::UnauthorizedRole { action, role } => ApiError::UnauthorizedRole {
            action: action.to_string(),
            message: format!("{role} may not perform this action on this case"),
        },
        CoreError::InvalidState { action, status } => ApiError::InvalidState {
            action: action.to_string(),
            message: format!("not allowed while the case is '{status}'"),
        },
        CoreError::PreconditionFailed { action, reason } => ApiError::PreconditionFailed {
            action: action.to_string(),
            message: reason,
        },
    }
}

/// Translates a persistence error into an API error.
///
/// A lost compare-and-swap means another request moved the case first and
/// is reported as `INVALID_STATE`. A duplicate numbering number that slipped
/// past the engine's precondition is caught by the unique index and reported
/// as `PRECONDITION_FAILED`. Everything unexpected is `INTERNAL`.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    if err.is_unique_violation_on("numbering_number") {
        return ApiError::PreconditionFailed {
            action: String::from("mark_numbered"),
            message: String::from("numbering number is already in use"),
        };
    }

    match err {
        PersistenceError::ConcurrentModification {
            case_id,
            expected_version,
        } => ApiError::InvalidState {
            action: String::from("update"),
            message: format!(
                "case {case_id} was changed by another request (expected version {expected_version})"
            ),
        },
        PersistenceError::AllocationExhausted { prefix, attempts } => {
            ApiError::AllocationExhausted {
                message: format!("no free identifier under {prefix} after {attempts} attempts"),
            }
        }
        PersistenceError::SequenceOverflow(message) => ApiError::AllocationExhausted { message },
        PersistenceError::NotFound(message) => ApiError::not_found("Record", message),
        other => {
            error!(error = %other, "Persistence failure");
            ApiError::Internal {
                message: other.to_string(),
            }
        }
    }
}
