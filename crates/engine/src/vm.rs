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

//! The reference [`StepEngine`] implementation.
//!
//! [`VmEngine`] records one full machine state per step in a bounded ring:
//! stepping forward clones the latest state and advances the clone, stepping
//! backward drops the latest recorded state. Rewinding is therefore exact
//! replay, never re-execution.

use std::collections::VecDeque;

use tracing::{debug, trace};

use tvd_common::{EngineError, HistoryEntry, InterruptionState, StepEngine};

use crate::machine::Machine;
use crate::parser::parse;

/// Upper bound on recorded states; the oldest entries are dropped first.
pub const MAX_HISTORY_LENGTH: usize = 100;

/// One recorded state in the engine's internal history.
#[derive(Debug, Clone)]
enum State {
    Core(Machine),
    Interruption(InterruptionState),
}

impl State {
    fn render(&self) -> HistoryEntry {
        match self {
            Self::Core(machine) => HistoryEntry::Core(machine.render()),
            Self::Interruption(int) => HistoryEntry::Interruption(int.clone()),
        }
    }
}

/// Reference step-execution engine over the small-step [`Machine`].
#[derive(Debug, Default)]
pub struct VmEngine {
    history: VecDeque<State>,
}

impl VmEngine {
    /// An engine with no input accepted yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StepEngine for VmEngine {
    fn set_input(&mut self, source: &str) -> Result<(), EngineError> {
        match parse(source) {
            Ok(prog) => {
                debug!(decs = prog.decs.len(), "input accepted");
                self.history.clear();
                self.history.push_back(State::Core(Machine::new(prog)));
                Ok(())
            }
            Err(err) => {
                debug!(%err, "input rejected");
                Err(EngineError::Syntax(err))
            }
        }
    }

    fn step_forward(&mut self) -> Result<bool, EngineError> {
        let Some(latest) = self.history.back() else {
            return Ok(false);
        };
        match latest {
            State::Interruption(_) => Ok(false),
            State::Core(machine) => {
                let mut next = machine.clone();
                let state = match next.step() {
                    Ok(()) => State::Core(next),
                    Err(interrupt) => State::Interruption(interrupt.render()),
                };
                if self.history.len() >= MAX_HISTORY_LENGTH {
                    self.history.pop_front();
                }
                trace!(len = self.history.len() + 1, "stepped forward");
                self.history.push_back(state);
                Ok(true)
            }
        }
    }

    fn step_backward(&mut self) -> Result<bool, EngineError> {
        if self.history.len() > 1 {
            self.history.pop_back();
            trace!(len = self.history.len(), "stepped backward");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn history(&self) -> Result<Vec<HistoryEntry>, EngineError> {
        Ok(self.history.iter().map(State::render).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvd_common::SyntaxErrorKind;

    const DEFAULT: &str = "let a = 1;\n(prim \"debugPrint\") \"Hello, VM!\";\na + 1;\n";

    fn accepted(source: &str) -> VmEngine {
        let mut engine = VmEngine::new();
        engine.set_input(source).expect("accepts input");
        engine
    }

    #[test]
    fn test_set_input_records_initial_state() {
        let engine = accepted(DEFAULT);
        let history = engine.history().unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].as_core().is_some());
    }

    #[test]
    fn test_set_input_parse_failure_keeps_history() {
        let mut engine = accepted(DEFAULT);
        engine.step_forward().unwrap();
        let before = engine.history().unwrap();

        let err = engine.set_input("(1 + 2").unwrap_err();
        match err {
            EngineError::Syntax(err) => assert_eq!(err.kind, SyntaxErrorKind::UnrecognizedEof),
            other => panic!("expected syntax error, got {other:?}"),
        }
        assert_eq!(engine.history().unwrap(), before);
    }

    #[test]
    fn test_forward_to_completion() {
        let mut engine = accepted(DEFAULT);
        while engine.step_forward().unwrap() {}

        let history = engine.history().unwrap();
        let last = history.last().unwrap();
        match last.as_interruption() {
            Some(InterruptionState::Done { value, .. }) => {
                assert_eq!(value.as_deref(), Some("2"));
            }
            other => panic!("expected Done, got {other:?}"),
        }
        // exhausted: no further step, history unchanged
        assert!(!engine.step_forward().unwrap());
        assert_eq!(engine.history().unwrap().len(), history.len());
    }

    #[test]
    fn test_forward_backward_round_trip() {
        let mut engine = accepted(DEFAULT);
        for _ in 0..3 {
            engine.step_forward().unwrap();
        }
        let before = engine.history().unwrap();

        assert!(engine.step_forward().unwrap());
        assert!(engine.step_backward().unwrap());
        assert_eq!(engine.history().unwrap(), before);
    }

    #[test]
    fn test_backward_stops_at_initial_state() {
        let mut engine = accepted(DEFAULT);
        engine.step_forward().unwrap();
        assert!(engine.step_backward().unwrap());
        assert!(!engine.step_backward().unwrap());
        assert_eq!(engine.history().unwrap().len(), 1);
    }

    #[test]
    fn test_step_without_input() {
        let mut engine = VmEngine::new();
        assert!(!engine.step_forward().unwrap());
        assert!(!engine.step_backward().unwrap());
        assert!(engine.history().unwrap().is_empty());
    }

    #[test]
    fn test_runtime_error_ends_history() {
        let mut engine = accepted("nope;");
        while engine.step_forward().unwrap() {}
        let history = engine.history().unwrap();
        let last = history.last().unwrap().as_interruption().expect("interruption");
        assert!(last.is_error());
        assert!(last.detail().unwrap().contains("unbound variable"));
    }

    #[test]
    fn test_history_ring_is_bounded() {
        // a program with far more than MAX_HISTORY_LENGTH steps
        let source = "let x = 1;\n".to_string() + &"x + 1;\n".repeat(60);
        let mut engine = accepted(&source);
        while engine.step_forward().unwrap() {
            assert!(engine.history().unwrap().len() <= MAX_HISTORY_LENGTH);
        }
        assert_eq!(engine.history().unwrap().len(), MAX_HISTORY_LENGTH);
    }

    #[test]
    fn test_debug_output_exactly_once() {
        let mut engine = accepted(DEFAULT);
        while engine.step_forward().unwrap() {}
        let history = engine.history().unwrap();
        let last_core = history
            .iter()
            .rev()
            .find_map(|entry| entry.as_core())
            .expect("a core state");
        assert_eq!(last_core.debug_print_out, vec!["Hello, VM!".to_string()]);
    }
}
