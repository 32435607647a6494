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

//! The stepping-session controller.
//!
//! [`SessionController`] is the single owner of the engine and of all
//! session state: the editable source text, the text the published history
//! was recorded against, the navigation cursor, the active breakpoint and
//! the run flag. Everything an editing surface does funnels through the
//! operations here; the controller never calls back out, it only updates
//! state that the surface reads after each operation.
//!
//! The central invariant is staleness: the published history describes
//! `last_evaluated`, not the current text. As soon as the two differ
//! meaningfully the session is dirty, span-based lookups are refused, and
//! every step request is coerced into an evaluate-first.

use tracing::{debug, info, warn};

use tvd_common::{
    Breakpoint, EngineError, FrameInfo, HistoryEntry, LineIndex, Position, StepEngine, SyntaxError,
};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::resolve::{breakpoint_satisfied, locate, most_recent_core};
use crate::store::ExecutionHistoryStore;

/// Coarse session state, in priority order.
///
/// Dirty wins over everything: an errored or running session whose text has
/// been edited reports `Dirty`, because the next meaningful action in every
/// case is a re-evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Text was edited since the last evaluation; history is stale.
    Dirty,
    /// The last evaluation or step failed; history is the last good one.
    Errored,
    /// A run loop is driving execution forward.
    Running,
    /// History matches the text and the session is idle.
    Clean,
}

/// What a step request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The engine advanced or rewound by one state.
    Stepped,
    /// The session was dirty, so the request re-evaluated the current text
    /// instead of stepping stale history.
    Reevaluated,
    /// The engine was already at the corresponding end of its history.
    NoOp,
}

/// Why a run loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `pause` was called, or a newer evaluation superseded the run.
    Cancelled,
    /// The engine reported no further steps.
    Exhausted,
    /// A stepped-to state satisfied the position breakpoint.
    BreakpointHit,
    /// The engine failed; the error is recorded on the session.
    Errored,
}

/// Outcome of a single run-loop tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is dirty; the loop keeps ticking without stepping until
    /// the text is evaluated again or the run is cancelled.
    Held,
    /// One step was taken; keep going.
    Stepped,
    /// The run is over; the loop must exit.
    Stopped(StopReason),
}

/// Counters accumulated over the lifetime of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Evaluations attempted, including rejected ones.
    pub evaluations: u64,
    /// Forward steps taken, run-loop ticks included.
    pub forward_steps: u64,
    /// Backward steps taken.
    pub backward_steps: u64,
    /// Position breakpoints hit by a run loop.
    pub breakpoint_hits: u64,
}

/// Navigation cursor over the published history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    /// The durably selected index. Always clamped to the history length.
    pub committed: usize,
    /// A transient override (hover previews). Cleared by any commit.
    pub preview: Option<usize>,
}

/// Owner of one stepping session over an opaque [`StepEngine`].
#[derive(Debug)]
pub struct SessionController {
    engine: Box<dyn StepEngine>,
    config: SessionConfig,
    /// The text as currently edited.
    source: String,
    /// The text the published history was recorded against.
    last_evaluated: String,
    /// Line index of `last_evaluated`. Rebuilt on every evaluation.
    line_index: LineIndex,
    store: ExecutionHistoryStore,
    nav: NavigationState,
    breakpoint: Breakpoint,
    running: bool,
    /// Bumped on every evaluation and pause; a run loop carrying a stale
    /// generation observes the bump and exits.
    generation: u64,
    error: Option<SessionError>,
    /// Re-entrance guard for `evaluate`.
    busy: bool,
    stats: SessionStats,
}

impl SessionController {
    /// A session over `engine`, with the configured initial text already
    /// set but not yet evaluated (a fresh session starts dirty).
    pub fn new(engine: Box<dyn StepEngine>, config: SessionConfig) -> Self {
        let source = config.initial_source.clone();
        Self {
            engine,
            config,
            source,
            last_evaluated: String::new(),
            line_index: LineIndex::default(),
            store: ExecutionHistoryStore::new(),
            nav: NavigationState::default(),
            breakpoint: Breakpoint::None,
            running: false,
            generation: 0,
            error: None,
            busy: false,
            stats: SessionStats::default(),
        }
    }

    /// The current source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the source text. Never touches the engine: the session
    /// merely becomes dirty if the change is meaningful. Any hover preview
    /// is dropped, since it may describe spans of the replaced text.
    pub fn edit_text(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.nav.preview = None;
    }

    /// Whether the source text differs meaningfully from the text the
    /// published history was recorded against. Trailing whitespace is not
    /// meaningful.
    pub fn dirty(&self) -> bool {
        normalize(&self.source) != normalize(&self.last_evaluated)
    }

    /// Whether the recorded execution cannot advance further: the session
    /// is dirty, nothing was evaluated yet, or the latest entry is an
    /// interruption.
    pub fn completed(&self) -> bool {
        if self.dirty() {
            return true;
        }
        let history = self.store.snapshot();
        history.last().map_or(true, |entry| entry.is_interruption())
    }

    /// Coarse session state. See [`SessionState`] for the priority order.
    pub fn state(&self) -> SessionState {
        if self.dirty() {
            SessionState::Dirty
        } else if self.error.is_some() {
            SessionState::Errored
        } else if self.running {
            SessionState::Running
        } else {
            SessionState::Clean
        }
    }

    /// The published execution history store.
    pub fn store(&self) -> &ExecutionHistoryStore {
        &self.store
    }

    /// Line index of the last evaluated text.
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// The error from the last failed operation, if any. Cleared by the
    /// next successful evaluation.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// The syntax error to surface against the editor, if the last
    /// evaluation was rejected.
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match self.error.as_ref() {
            Some(SessionError::Syntax(err)) => Some(err),
            _ => None,
        }
    }

    /// The active breakpoint.
    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// Whether a run loop is (or should be) driving this session.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The current run generation. Ticks carrying an older generation are
    /// rejected.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Counters accumulated since the session was created.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Submit the current text to the engine and publish its history.
    ///
    /// The text is committed as evaluated before the engine is consulted,
    /// so a rejected text leaves the session errored rather than dirty and
    /// the error clears as soon as the user edits. On success the
    /// navigation cursor resets to the initial state and, when `breakpoint`
    /// is not [`Breakpoint::None`], the session enters the running state;
    /// the returned generation is then the token a run loop must carry.
    pub fn evaluate(&mut self, breakpoint: Breakpoint) -> Result<Option<u64>, SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        self.busy = true;
        let result = self.evaluate_inner(breakpoint);
        self.busy = false;
        result
    }

    fn evaluate_inner(&mut self, breakpoint: Breakpoint) -> Result<Option<u64>, SessionError> {
        // Any in-flight run is superseded, successful or not.
        self.generation += 1;
        self.running = false;
        self.stats.evaluations += 1;

        self.last_evaluated = self.source.clone();
        self.line_index = LineIndex::new(&self.source);

        match self.engine.set_input(&self.source) {
            Ok(()) => {
                let history = self.refresh_history()?;
                info!(entries = history, %breakpoint, "text evaluated");
                self.nav = NavigationState::default();
                self.error = None;
                self.breakpoint = breakpoint;
                if breakpoint.is_none() {
                    Ok(None)
                } else {
                    self.running = true;
                    Ok(Some(self.generation))
                }
            }
            Err(err) => {
                // Previously published history stays as-is and navigable.
                let err = session_error(err);
                debug!(%err, "evaluation rejected");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Start (or restart) continuous execution towards `breakpoint`.
    ///
    /// A dirty or completed session is re-evaluated first; otherwise the
    /// run resumes from the current end of history. Returns the generation
    /// for the run loop, or `None` when `breakpoint` is absent.
    pub fn run(&mut self, breakpoint: Breakpoint) -> Result<Option<u64>, SessionError> {
        if breakpoint.is_none() {
            warn!("run requested without a breakpoint");
            return Ok(None);
        }
        if self.dirty() || self.completed() {
            return self.evaluate(breakpoint);
        }
        if self.error.is_some() {
            return Err(SessionError::Errored);
        }
        self.generation += 1;
        self.breakpoint = breakpoint;
        self.running = true;
        debug!(%breakpoint, generation = self.generation, "run resumed");
        Ok(Some(self.generation))
    }

    /// Stop continuous execution. Idempotent; history and the navigation
    /// cursor are left where they are.
    pub fn pause(&mut self) {
        if self.running {
            debug!("run paused");
        }
        self.running = false;
        self.generation += 1;
    }

    /// Advance execution by one recorded state.
    ///
    /// A dirty session is re-evaluated instead of stepping stale history.
    /// An errored session refuses until the text is edited or re-evaluated.
    pub fn step_forward(&mut self) -> Result<StepOutcome, SessionError> {
        if self.dirty() {
            self.evaluate(Breakpoint::None)?;
            return Ok(StepOutcome::Reevaluated);
        }
        if self.error.is_some() {
            return Err(SessionError::Errored);
        }
        match self.engine.step_forward() {
            Ok(true) => {
                self.stats.forward_steps += 1;
                let len = self.refresh_history()?;
                self.nav = NavigationState { committed: len.saturating_sub(1), preview: None };
                Ok(StepOutcome::Stepped)
            }
            Ok(false) => Ok(StepOutcome::NoOp),
            Err(err) => Err(self.record_engine_error(err)),
        }
    }

    /// Rewind execution by one recorded state. The engine forgets the
    /// dropped state; stepping forward again re-executes it.
    pub fn step_backward(&mut self) -> Result<StepOutcome, SessionError> {
        if self.dirty() {
            self.evaluate(Breakpoint::None)?;
            return Ok(StepOutcome::Reevaluated);
        }
        if self.error.is_some() {
            return Err(SessionError::Errored);
        }
        match self.engine.step_backward() {
            Ok(true) => {
                self.stats.backward_steps += 1;
                let len = self.refresh_history()?;
                self.nav = NavigationState { committed: len.saturating_sub(1), preview: None };
                Ok(StepOutcome::Stepped)
            }
            Ok(false) => Ok(StepOutcome::NoOp),
            Err(err) => Err(self.record_engine_error(err)),
        }
    }

    /// One tick of a run loop carrying `generation`.
    ///
    /// The tick refuses to step stale history: while the session is dirty
    /// the run holds rather than stops. The hold ends when the run is
    /// paused or a new evaluation supersedes this generation.
    pub fn run_tick(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation || !self.running {
            return TickOutcome::Stopped(StopReason::Cancelled);
        }
        if self.error.is_some() {
            self.running = false;
            return TickOutcome::Stopped(StopReason::Errored);
        }
        if self.dirty() {
            return TickOutcome::Held;
        }
        match self.engine.step_forward() {
            Ok(true) => {
                self.stats.forward_steps += 1;
                match self.refresh_history() {
                    Ok(len) => {
                        self.nav =
                            NavigationState { committed: len.saturating_sub(1), preview: None };
                    }
                    Err(_) => {
                        self.running = false;
                        return TickOutcome::Stopped(StopReason::Errored);
                    }
                }
                let history = self.store.snapshot();
                let hit = history.last().is_some_and(|entry| {
                    breakpoint_satisfied(&self.breakpoint, entry, &self.line_index)
                });
                if hit {
                    info!(breakpoint = %self.breakpoint, "breakpoint hit");
                    self.stats.breakpoint_hits += 1;
                    self.running = false;
                    TickOutcome::Stopped(StopReason::BreakpointHit)
                } else {
                    TickOutcome::Stepped
                }
            }
            Ok(false) => {
                debug!("execution exhausted");
                self.running = false;
                TickOutcome::Stopped(StopReason::Exhausted)
            }
            Err(err) => {
                self.record_engine_error(err);
                self.running = false;
                TickOutcome::Stopped(StopReason::Errored)
            }
        }
    }

    /// The navigation cursor.
    pub fn navigation(&self) -> NavigationState {
        self.nav
    }

    /// The effective selection: the preview when set, the committed index
    /// otherwise, clamped to the published history. `None` while nothing is
    /// published.
    pub fn selected_index(&self) -> Option<usize> {
        let len = self.store.len();
        if len == 0 {
            return None;
        }
        Some(self.nav.preview.unwrap_or(self.nav.committed).min(len - 1))
    }

    /// The entry at the effective selection.
    pub fn selected_entry(&self) -> Option<HistoryEntry> {
        let history = self.store.snapshot();
        self.selected_index().map(|i| history[i].clone())
    }

    /// A frame from the selected entry's stack: `frame_index` counts from
    /// the outermost frame, `None` means the innermost. Interruption
    /// entries carry no stack, so inspection falls back to the nearest
    /// in-progress state at or before the selection.
    pub fn selected_frame(&self, frame_index: Option<usize>) -> Option<FrameInfo> {
        let history = self.store.snapshot();
        let (_, core) = most_recent_core(&history, self.selected_index()?)?;
        match frame_index {
            Some(i) => core.stack.get(i).cloned(),
            None => core.stack.last().cloned(),
        }
    }

    /// Commit the navigation cursor to `index`, clamped to the published
    /// history. Clears any preview. Works on stale and errored history;
    /// inspection of the last good history is always allowed.
    pub fn set_committed_index(&mut self, index: usize) {
        let len = self.store.len();
        self.nav = NavigationState {
            committed: if len == 0 { 0 } else { index.min(len - 1) },
            preview: None,
        };
    }

    /// Set or clear the transient preview override, clamped likewise.
    pub fn set_preview_index(&mut self, index: Option<usize>) {
        let len = self.store.len();
        self.nav.preview = match index {
            Some(i) if len > 0 => Some(i.min(len - 1)),
            _ => None,
        };
    }

    /// Commit the selection to the history entry for a source position.
    ///
    /// By default the entry with the narrowest covering span wins; with
    /// `next_visit` the search starts just after the current selection and
    /// wraps, walking successive visits of the same position. Refused (and
    /// the selection left unchanged) while the session is dirty, since the
    /// position refers to text the history knows nothing about.
    pub fn select_by_source_position(
        &mut self,
        position: Position,
        next_visit: bool,
    ) -> Option<usize> {
        if self.dirty() {
            return None;
        }
        let history = self.store.snapshot();
        let found = locate(&history, &self.line_index, position, next_visit, self.selected_index());
        if let Some(index) = found {
            debug!(%position, index, "position resolved");
            self.nav = NavigationState { committed: index, preview: None };
        }
        found
    }

    /// Re-publish the engine's history. A failure here is an engine
    /// failure and is recorded on the session like any other.
    fn refresh_history(&mut self) -> Result<usize, SessionError> {
        match self.engine.history() {
            Ok(entries) => {
                let len = entries.len();
                self.store.publish(entries);
                Ok(len)
            }
            Err(err) => Err(self.record_engine_error(err)),
        }
    }

    fn record_engine_error(&mut self, err: EngineError) -> SessionError {
        let err = session_error(err);
        warn!(%err, "engine step failed");
        self.error = Some(err.clone());
        self.running = false;
        err
    }
}

fn session_error(err: EngineError) -> SessionError {
    match err {
        EngineError::Syntax(err) => SessionError::Syntax(err),
        EngineError::Internal(message) => SessionError::Engine(message),
    }
}

/// Text comparison for the dirty check: per-line trailing whitespace and
/// trailing blank lines are not meaningful.
fn normalize(text: &str) -> String {
    let mut out: String =
        text.lines().map(|line| line.trim_end()).collect::<Vec<_>>().join("\n");
    while out.ends_with('\n') {
        out.pop();
    }
    out
}
