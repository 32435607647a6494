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

//! Shared data types for TVD components.

/// Breakpoints driving continuous-run mode
pub mod breakpoint;
/// Recorded machine states published by the execution engine
pub mod history;
/// Byte spans and line/column indexing into source text
pub mod span;
/// Parse failures reported by the execution engine
pub mod syntax_error;

pub use breakpoint::*;
pub use history::*;
pub use span::*;
pub use syntax_error::*;
