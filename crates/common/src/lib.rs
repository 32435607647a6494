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

//! TVD Common - Shared functionality for TVD components
//!
//! This crate holds the data model shared by the execution engine and the
//! stepping-session controller: source spans and line/column indexing,
//! recorded machine states, breakpoints, syntax errors, and the engine
//! interface the session drives.

/// Common types used throughout TVD including spans, history entries, breakpoints and syntax errors
pub mod types;

/// The step-execution engine interface consumed by the session controller
pub mod engine;
/// Logging setup and utilities for consistent logging across TVD components
pub mod logging;

pub use engine::*;
pub use types::*;
