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

//! Logging setup shared by all TVD components.
//!
//! Log verbosity is controlled through `RUST_LOG`; the provided default
//! directive applies when the variable is unset.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TEST_LOGGING: Once = Once::new();

/// Initialize logging for a TVD process.
///
/// Reads `RUST_LOG` when set, otherwise falls back to `default_directive`
/// (e.g. `"info"` or `"tvd_session=debug"`). Safe to call once per process;
/// a second call is a no-op because the global subscriber is already set.
pub fn init(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}

/// Ensure logging is initialized exactly once for tests.
///
/// Tests run in one process, so this guards the subscriber installation with
/// a [`Once`]. Pass `None` for the quiet default.
pub fn ensure_test_logging(directive: Option<&str>) {
    let directive = directive.unwrap_or("warn").to_string();
    TEST_LOGGING.call_once(move || {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}
