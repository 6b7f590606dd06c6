// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Out-of-band notifications.
//!
//! Notifications are handed to a `Notifier` only after the request's
//! transaction has committed. Delivery is best-effort: a failure is logged
//! and never undoes the committed change.

use legaltrack::CaseAction;
use legaltrack_domain::CaseStatus;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

/// Something worth telling a person about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A staff account was created and needs activating.
    ActivationIssued {
        staff_pk: i64,
        staff_id: String,
        email: String,
        full_name: String,
        activation_nonce: String,
        /// Shown once in the activation message; only its hash is stored.
        temporary_password: String,
    },
    /// A case changed status.
    CaseTransitioned {
        case_id: i64,
        tracking_id: Option<String>,
        action: CaseAction,
        from: CaseStatus,
        to: CaseStatus,
        actor_staff_pk: i64,
    },
}

impl Notification {
    /// Short name for logs. Never includes credentials.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ActivationIssued { .. } => "activation_issued",
            Self::CaseTransitioned { .. } => "case_transitioned",
        }
    }
}

/// Notification delivery failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Delivers notifications.
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to the log. Used when no mail relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        match notification {
            Notification::ActivationIssued {
                staff_pk,
                staff_id,
                email,
                ..
            } => {
                info!(staff_pk, staff_id = %staff_id, email = %email, "Activation issued");
            }
            Notification::CaseTransitioned {
                case_id,
                tracking_id,
                action,
                from,
                to,
                ..
            } => {
                info!(
                    case_id,
                    tracking_id = tracking_id.as_deref().unwrap_or_default(),
                    action = action.as_str(),
                    from = from.as_str(),
                    to = to.as_str(),
                    "Case transitioned"
                );
            }
        }
        Ok(())
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    delivered: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything delivered so far.
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        Ok(())
    }
}

/// Hands committed notifications to `notifier`, logging failures.
pub fn dispatch(notifier: &dyn Notifier, notifications: &[Notification]) {
    for notification in notifications {
        if let Err(err) = notifier.notify(notification) {
            warn!(error = %err, kind = notification.kind(), "Notification not delivered");
        }
    }
}
