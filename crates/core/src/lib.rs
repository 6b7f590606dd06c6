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

mod apply;
mod command;
mod error;
mod state;
mod transition;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, authorize, create_draft, is_action_available};
pub use command::{CaseAction, Command};
pub use error::CoreError;
pub use state::{Effect, RequestContext, TransitionResult, WorkflowFacts};
pub use transition::{Guard, MAX_REMARK_AUDIT_CHARS, TRANSITIONS, TransitionRule, rules_for};
