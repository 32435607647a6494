// TVD - Time-Travel VM Debugger
// Copyright (C) 2026 TVD contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! TVD Session - the stepping-session controller
//!
//! This crate owns navigation through a linear execution history: it tracks
//! when the history is stale against edited source text, drives continuous
//! execution with location-based breakpoints, and resolves cursor positions
//! to history indices and back. The step-execution engine behind it is an
//! opaque [`tvd_common::StepEngine`]; the editing surface and inspection UI
//! sit on the other side of [`SessionController`]'s operations, the
//! [`events`] mapping and the [`markers`] it emits.

mod config;
mod controller;
mod error;
/// Editor-facing input mapping (key chords, cursor clicks, text edits)
pub mod events;
/// Diagnostic markers emitted towards the editing surface
pub mod markers;
mod resolve;
mod run_loop;
mod store;

pub use config::SessionConfig;
pub use controller::{
    NavigationState, SessionController, SessionState, SessionStats, StepOutcome, StopReason,
    TickOutcome,
};
pub use error::SessionError;
pub use events::{EventResponse, Key, KeyEvent};
pub use markers::{Marker, MarkerSeverity};
pub use resolve::{breakpoint_satisfied, locate, most_recent_core};
pub use run_loop::RunLoop;
pub use store::ExecutionHistoryStore;
