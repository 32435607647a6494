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

//! The step-execution engine interface.
//!
//! The session controller drives an opaque engine through four synchronous
//! operations. Engines are expected to return quickly (one VM step per
//! call); an engine that could block must be wrapped with a timeout by its
//! integrator and report the timeout as [`EngineError::Internal`].

use thiserror::Error;

use crate::types::{HistoryEntry, SyntaxError};

/// Failure reported by a step-execution engine.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The submitted text failed to parse. Recoverable: the previously
    /// recorded history is left untouched.
    #[error("{0}")]
    Syntax(SyntaxError),
    /// The engine itself failed. Recoverable: the last good history is
    /// retained and stays navigable.
    #[error("engine failure: {0}")]
    Internal(String),
}

/// A deterministic, single-threaded step-execution engine.
///
/// Identical input text always produces an identical, order-stable history.
/// All operations are synchronous; any may fail with
/// [`EngineError::Internal`] on internal engine failure.
pub trait StepEngine: std::fmt::Debug + Send {
    /// Submit program text. On success the engine resets its recorded
    /// history to the single initial state for this input. On a parse
    /// failure the previous history is left untouched.
    fn set_input(&mut self, source: &str) -> Result<(), EngineError>;

    /// Advance execution by one step, recording the resulting state.
    /// Returns `false` when execution is exhausted (the latest recorded
    /// state is an interruption) and no step was taken.
    fn step_forward(&mut self) -> Result<bool, EngineError>;

    /// Rewind execution by one step. Returns `false` when already at the
    /// initial state.
    fn step_backward(&mut self) -> Result<bool, EngineError>;

    /// Snapshot of the full recorded history, oldest first. Never empty
    /// after a successful [`StepEngine::set_input`].
    fn history(&self) -> Result<Vec<HistoryEntry>, EngineError>;
}
