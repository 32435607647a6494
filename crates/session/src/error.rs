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

//! Session error taxonomy.
//!
//! Every error is scoped to the current evaluation attempt and clears on the
//! next successful `evaluate`; none is fatal. A stale navigation attempt is
//! deliberately absent: stepping while dirty is not a failure, it is coerced
//! into an evaluate-first and reported as such.

use thiserror::Error;

use tvd_common::SyntaxError;

/// Failure of a session operation.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The submitted text failed to parse. The session moves to `Errored`;
    /// the previously published history stays untouched and the user must
    /// edit and re-evaluate.
    #[error("{0}")]
    Syntax(SyntaxError),
    /// The engine failed while stepping an accepted program. Any run loop
    /// stops; the last good history is retained and stays navigable.
    #[error("engine step failed: {0}")]
    Engine(String),
    /// A navigation operation was attempted while the session is errored.
    /// Only `evaluate` and `edit_text` recover from that state.
    #[error("session is errored; edit or re-evaluate to recover")]
    Errored,
    /// `evaluate` was re-entered while an evaluation was still pending.
    #[error("an evaluation is already in progress")]
    Busy,
}
