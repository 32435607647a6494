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

//! Test utilities for integration tests

/// Initialization utilities for tests
pub mod init {
    /// Initialize logging for a test; safe to call from every test.
    pub fn init_test_environment() {
        tvd_common::logging::ensure_test_logging(None);
    }
}

/// Session construction helpers
pub mod session {
    use std::sync::Arc;

    use eyre::{eyre, Result};
    use parking_lot::Mutex;

    use tvd_common::Breakpoint;
    use tvd_engine::VmEngine;
    use tvd_session::{SessionConfig, SessionController, StepOutcome, TickOutcome};

    /// A session over the reference engine with the default configuration.
    pub fn new_session() -> SessionController {
        SessionController::new(Box::new(VmEngine::new()), SessionConfig::default())
    }

    /// A session with `source` already evaluated.
    pub fn evaluated_session(source: &str) -> Result<SessionController> {
        let mut session = new_session();
        session.edit_text(source);
        session.evaluate(Breakpoint::None)?;
        Ok(session)
    }

    /// An evaluated session behind the shared handle the run loop uses.
    pub fn shared_session(source: &str) -> Result<Arc<Mutex<SessionController>>> {
        Ok(Arc::new(Mutex::new(evaluated_session(source)?)))
    }

    /// Step the session forward until the engine is exhausted.
    pub fn step_to_completion(session: &mut SessionController) -> Result<()> {
        for _ in 0..1000 {
            match session.step_forward()? {
                StepOutcome::Stepped | StepOutcome::Reevaluated => {}
                StepOutcome::NoOp => return Ok(()),
            }
        }
        Err(eyre!("execution did not complete within 1000 steps"))
    }

    /// Tick a running session until its run loop would stop.
    pub fn tick_to_stop(
        session: &mut SessionController,
        generation: u64,
    ) -> Result<tvd_session::StopReason> {
        for _ in 0..1000 {
            if let TickOutcome::Stopped(reason) = session.run_tick(generation) {
                return Ok(reason);
            }
        }
        Err(eyre!("run did not stop within 1000 ticks"))
    }
}
