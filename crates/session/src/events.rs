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

//! Editor input mapping.
//!
//! Translates key chords and cursor clicks from an editing surface into
//! session operations. The surface stays dumb: it forwards raw events and
//! acts on the [`EventResponse`], spawning a run loop when
//! [`EventResponse::RunRequested`] comes back and falling through to its
//! default behavior on [`EventResponse::NotHandled`].
//!
//! The bindings follow the surface conventions this session model grew up
//! with: plain arrows move the history selection, modified arrows step the
//! engine, the modified enter chord toggles continuous execution, escape
//! pauses, and a modified click runs to the clicked position when it is not
//! in the recorded history yet.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tvd_common::{Breakpoint, Position};

use crate::controller::SessionController;

/// The keys the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Selection back / step backward with the modifier.
    ArrowLeft,
    /// Selection forward / step forward with the modifier.
    ArrowRight,
    /// Toggle continuous execution with the modifier.
    Enter,
    /// Pause continuous execution.
    Escape,
}

/// A key chord forwarded by the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The pressed key.
    pub key: Key,
    /// Whether the platform modifier (ctrl/cmd) was held.
    pub modifier: bool,
    /// Whether focus was inside the text editor. Plain arrows belong to
    /// the editor cursor there.
    pub in_editor: bool,
    /// The editor cursor position, when focus is inside the editor.
    pub cursor: Option<Position>,
}

/// What the surface should do with a forwarded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// The session consumed the event.
    Handled,
    /// Not a session binding; the surface keeps its default behavior.
    NotHandled,
    /// The session entered the running state; the surface must spawn a run
    /// loop carrying this generation.
    RunRequested(u64),
}

/// Map a key chord onto the session.
pub fn on_key(session: &mut SessionController, event: KeyEvent) -> EventResponse {
    match (event.key, event.modifier) {
        (Key::Escape, _) => {
            if session.is_running() {
                session.pause();
                EventResponse::Handled
            } else {
                EventResponse::NotHandled
            }
        }
        (Key::Enter, true) => toggle_run(session, event.cursor),
        (Key::Enter, false) => EventResponse::NotHandled,
        (Key::ArrowRight, true) => {
            if let Err(err) = session.step_forward() {
                debug!(%err, "step forward refused");
            }
            EventResponse::Handled
        }
        (Key::ArrowLeft, true) => {
            if let Err(err) = session.step_backward() {
                debug!(%err, "step backward refused");
            }
            EventResponse::Handled
        }
        (Key::ArrowRight, false) if !event.in_editor => {
            if let Some(selected) = session.selected_index() {
                session.set_committed_index(selected + 1);
            }
            EventResponse::Handled
        }
        (Key::ArrowLeft, false) if !event.in_editor => {
            if let Some(selected) = session.selected_index() {
                session.set_committed_index(selected.saturating_sub(1));
            }
            EventResponse::Handled
        }
        // plain arrows inside the editor move the text cursor
        _ => EventResponse::NotHandled,
    }
}

/// Forward a text edit from the editor to the session.
///
/// The session only records the new text and recomputes staleness; a run in
/// flight holds on its next tick instead of stepping the stale history.
pub fn on_text_changed(session: &mut SessionController, text: impl Into<String>) {
    session.edit_text(text);
}

/// Map a cursor click in the editor onto the session.
///
/// A plain click selects the history entry with the narrowest span covering
/// the position. A modified click walks to the next visit of the position,
/// and when the position has no recorded visit yet (and execution is not
/// over), starts a run with a breakpoint there.
pub fn on_cursor_click(
    session: &mut SessionController,
    position: Position,
    modifier: bool,
) -> EventResponse {
    if session.dirty() || session.store().is_empty() {
        return EventResponse::NotHandled;
    }
    if session.select_by_source_position(position, modifier).is_some() {
        return EventResponse::Handled;
    }
    if modifier && !session.completed() {
        match session.run(Breakpoint::at(position)) {
            Ok(Some(generation)) => return EventResponse::RunRequested(generation),
            Ok(None) => {}
            Err(err) => debug!(%err, "run to position refused"),
        }
    }
    EventResponse::NotHandled
}

fn toggle_run(session: &mut SessionController, cursor: Option<Position>) -> EventResponse {
    if session.is_running() {
        session.pause();
        return EventResponse::Handled;
    }
    let breakpoint = cursor.map_or(Breakpoint::Unconditional, Breakpoint::at);
    match session.run(breakpoint) {
        Ok(Some(generation)) => EventResponse::RunRequested(generation),
        Ok(None) => EventResponse::Handled,
        Err(err) => {
            // surfaced through the session error and its marker
            debug!(%err, "run refused");
            EventResponse::Handled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::controller::{SessionState, StopReason, TickOutcome};
    use tvd_engine::VmEngine;

    fn evaluated() -> SessionController {
        let mut session =
            SessionController::new(Box::new(VmEngine::new()), SessionConfig::default());
        session.evaluate(Breakpoint::None).expect("default source evaluates");
        session
    }

    fn chord(key: Key, modifier: bool) -> KeyEvent {
        KeyEvent { key, modifier, in_editor: false, cursor: None }
    }

    fn run_to_stop(session: &mut SessionController, generation: u64) {
        for _ in 0..1000 {
            if matches!(session.run_tick(generation), TickOutcome::Stopped(_)) {
                return;
            }
        }
        panic!("run never stopped");
    }

    #[test]
    fn test_modified_arrows_step() {
        let mut session = evaluated();
        assert_eq!(on_key(&mut session, chord(Key::ArrowRight, true)), EventResponse::Handled);
        assert_eq!(session.store().len(), 2);
        assert_eq!(on_key(&mut session, chord(Key::ArrowLeft, true)), EventResponse::Handled);
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_plain_arrows_move_selection() {
        let mut session = evaluated();
        on_key(&mut session, chord(Key::ArrowRight, true));
        on_key(&mut session, chord(Key::ArrowRight, true));
        session.set_committed_index(0);

        on_key(&mut session, chord(Key::ArrowRight, false));
        assert_eq!(session.selected_index(), Some(1));
        on_key(&mut session, chord(Key::ArrowLeft, false));
        assert_eq!(session.selected_index(), Some(0));
        // clamped at the initial state
        on_key(&mut session, chord(Key::ArrowLeft, false));
        assert_eq!(session.selected_index(), Some(0));
    }

    #[test]
    fn test_plain_arrows_in_editor_fall_through() {
        let mut session = evaluated();
        let event = KeyEvent { key: Key::ArrowRight, modifier: false, in_editor: true, cursor: None };
        assert_eq!(on_key(&mut session, event), EventResponse::NotHandled);
    }

    #[test]
    fn test_modified_enter_toggles_run() {
        let mut session = evaluated();
        let response = on_key(&mut session, chord(Key::Enter, true));
        let EventResponse::RunRequested(generation) = response else {
            panic!("expected a run request, got {response:?}");
        };
        assert!(session.is_running());

        // second chord pauses
        assert_eq!(on_key(&mut session, chord(Key::Enter, true)), EventResponse::Handled);
        assert!(!session.is_running());
        assert_eq!(session.run_tick(generation), TickOutcome::Stopped(StopReason::Cancelled));
    }

    #[test]
    fn test_escape_pauses_only_when_running() {
        let mut session = evaluated();
        assert_eq!(on_key(&mut session, chord(Key::Escape, false)), EventResponse::NotHandled);

        session.run(Breakpoint::Unconditional).unwrap();
        assert_eq!(on_key(&mut session, chord(Key::Escape, false)), EventResponse::Handled);
        assert!(!session.is_running());
    }

    #[test]
    fn test_click_selects_visited_position() {
        let mut session = evaluated();
        let generation = session.run(Breakpoint::Unconditional).unwrap().expect("run starts");
        run_to_stop(&mut session, generation);

        // line 3 is "a + 1;", visited during the run
        let response = on_cursor_click(&mut session, Position::new(3, 1), false);
        assert_eq!(response, EventResponse::Handled);
        assert!(session.selected_index().is_some());
    }

    #[test]
    fn test_modified_click_runs_to_unvisited_position() {
        let mut session = evaluated();
        // only the initial state is recorded; line 3 has no visit yet
        let response = on_cursor_click(&mut session, Position::new(3, 1), true);
        let EventResponse::RunRequested(generation) = response else {
            panic!("expected a run request, got {response:?}");
        };
        run_to_stop(&mut session, generation);
        assert!(!session.completed());
        assert_eq!(session.breakpoint(), Breakpoint::AtPosition { line: 3, column: 1 });
    }

    #[test]
    fn test_click_ignored_while_dirty() {
        let mut session = evaluated();
        session.edit_text("2;\n");
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(
            on_cursor_click(&mut session, Position::new(1, 1), false),
            EventResponse::NotHandled
        );
    }
}
