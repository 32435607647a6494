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

//! Session configuration.

use std::time::Duration;

/// The program a fresh session starts with when the embedder supplies none.
pub const DEFAULT_SOURCE: &str = "let a = 1;\n(prim \"debugPrint\") \"Hello, VM!\";\na + 1;\n";

/// Configuration for a stepping session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Delay between run-loop step attempts.
    pub tick_interval: Duration,
    /// Initial source text.
    pub initial_source: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { tick_interval: Duration::from_millis(10), initial_source: DEFAULT_SOURCE.to_string() }
    }
}
