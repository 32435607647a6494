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

//! Continuous execution driver.
//!
//! The run loop is a background task ticking the shared session at the
//! configured interval. All decisions live in
//! [`SessionController::run_tick`]; the loop only sleeps, locks, ticks and
//! exits when told to. The session lock is never held across the sleep, so
//! editing and navigation stay responsive while a run is in flight.
//!
//! Cancellation is cooperative through the generation token: `pause` and any
//! new evaluation bump the session's generation, and the next tick of a loop
//! carrying the old token comes back [`StopReason::Cancelled`].

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use tvd_common::Breakpoint;

use crate::controller::{SessionController, StopReason, TickOutcome};
use crate::error::SessionError;

/// Drives a shared [`SessionController`] forward on a tokio task.
#[derive(Debug, Clone)]
pub struct RunLoop {
    session: Arc<Mutex<SessionController>>,
    interval: std::time::Duration,
}

impl RunLoop {
    /// A run loop over `session`, ticking at the session's configured
    /// interval.
    pub fn new(session: Arc<Mutex<SessionController>>) -> Self {
        let interval = session.lock().config().tick_interval;
        Self { session, interval }
    }

    /// The shared session this loop drives.
    pub fn session(&self) -> &Arc<Mutex<SessionController>> {
        &self.session
    }

    /// Start continuous execution towards `breakpoint` and spawn the
    /// ticking task. Returns `None` without spawning when the session
    /// declined to run (absent breakpoint).
    pub fn start(
        &self,
        breakpoint: Breakpoint,
    ) -> Result<Option<JoinHandle<StopReason>>, SessionError> {
        let generation = self.session.lock().run(breakpoint)?;
        Ok(generation.map(|generation| self.spawn(generation)))
    }

    /// Spawn a ticking task for an already-running session. The caller
    /// must pass the generation returned by the `run` or `evaluate` that
    /// put the session in the running state.
    pub fn spawn(&self, generation: u64) -> JoinHandle<StopReason> {
        let session = Arc::clone(&self.session);
        let interval = self.interval;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let outcome = session.lock().run_tick(generation);
                match outcome {
                    TickOutcome::Stepped | TickOutcome::Held => {}
                    TickOutcome::Stopped(reason) => {
                        debug!(generation, ?reason, "run loop stopped");
                        return reason;
                    }
                }
            }
        })
    }

    /// Stop the running session. The spawned task observes the stop on its
    /// next tick and exits with [`StopReason::Cancelled`].
    pub fn pause(&self) {
        self.session.lock().pause();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use tvd_engine::VmEngine;

    fn shared_session() -> Arc<Mutex<SessionController>> {
        let mut session =
            SessionController::new(Box::new(VmEngine::new()), SessionConfig::default());
        session.evaluate(Breakpoint::None).expect("default source evaluates");
        Arc::new(Mutex::new(session))
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_to_completion() {
        let session = shared_session();
        let run_loop = RunLoop::new(Arc::clone(&session));

        let handle = run_loop.start(Breakpoint::Unconditional).unwrap().expect("task spawned");
        let reason = handle.await.unwrap();

        assert_eq!(reason, StopReason::Exhausted);
        let session = session.lock();
        assert!(!session.is_running());
        assert!(session.completed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_breakpoint() {
        let session = shared_session();
        let run_loop = RunLoop::new(Arc::clone(&session));

        let breakpoint = Breakpoint::AtPosition { line: 3, column: 1 };
        let handle = run_loop.start(breakpoint).unwrap().expect("task spawned");
        let reason = handle.await.unwrap();

        assert_eq!(reason, StopReason::BreakpointHit);
        assert!(!session.lock().completed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_breakpoint_spawns_nothing() {
        let run_loop = RunLoop::new(shared_session());
        assert!(run_loop.start(Breakpoint::None).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels() {
        let session = shared_session();
        let run_loop = RunLoop::new(Arc::clone(&session));

        let handle = run_loop.start(Breakpoint::Unconditional).unwrap().expect("task spawned");
        run_loop.pause();
        let reason = handle.await.unwrap();

        assert_eq!(reason, StopReason::Cancelled);
        assert!(!session.lock().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_holds_while_dirty() {
        let session = shared_session();
        let run_loop = RunLoop::new(Arc::clone(&session));

        let handle = run_loop.start(Breakpoint::Unconditional).unwrap().expect("task spawned");
        session.lock().edit_text("let b = 2;\nb;\n");

        // the loop holds while the text is dirty instead of stepping stale
        // history or exiting
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        {
            let session = session.lock();
            assert!(session.is_running());
            assert!(!handle.is_finished());
            assert_eq!(session.state(), crate::SessionState::Dirty);
        }

        // pausing is the only way out while dirty
        run_loop.pause();
        assert_eq!(handle.await.unwrap(), StopReason::Cancelled);
    }
}
