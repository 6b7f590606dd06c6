// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod case;
mod case_status;
mod case_type;
mod error;
mod role;
mod sequence;
mod visibility;

#[cfg(test)]
mod tests;

pub use case::{Case, ClientDetails};
pub use case_status::{CaseStatus, public_status_label};
pub use case_type::{CaseType, ChecklistItem, ENDORSEMENT_LETTER, mark_uploaded, seed_checklist};
pub use error::DomainError;
pub use role::{AccountStatus, Role, StaffActor};
pub use sequence::{
    DEFAULT_OFFICE_TIMEZONE, DEFAULT_TRACKING_WIDTH, MAX_SEQUENCE_WIDTH, STAFF_ID_WIDTH,
    SequenceScope, TRACKING_PREFIX, parse_timezone,
};
pub use visibility::{CaseFilter, CaseTab, can_view, work_queue};

// Re-exported so downstream crates agree on the time zone type.
pub use chrono_tz::Tz;
