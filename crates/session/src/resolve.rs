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

//! Mapping between source positions and history indices.
//!
//! All lookups here are pure functions over a published history snapshot and
//! the [`LineIndex`] of the text that history was recorded against. They are
//! only meaningful while the session is not dirty.

use tvd_common::{Breakpoint, CoreState, HistoryEntry, LineIndex, Position};

/// Find the history entry to select for a cursor position.
///
/// In the default mode every matching entry competes and the one with the
/// narrowest source span wins; ties go to the earliest index. With
/// `next_visit` the scan instead starts just after `selected` and wraps
/// around once, returning the first entry covering the position, so repeated
/// queries at the same position walk through successive visits.
///
/// Returns `None` when no recorded state maps to the position.
pub fn locate(
    history: &[HistoryEntry],
    index: &LineIndex,
    position: Position,
    next_visit: bool,
    selected: Option<usize>,
) -> Option<usize> {
    if next_visit {
        let start = selected.map_or(0, |i| i + 1);
        return (0..history.len())
            .map(|offset| (start + offset) % history.len().max(1))
            .find(|&i| covers(&history[i], index, position));
    }

    let mut best: Option<(usize, usize)> = None;
    for (i, entry) in history.iter().enumerate() {
        let Some(span) = entry.source_span() else { continue };
        if !index.span_covers(span, position) {
            continue;
        }
        if best.map_or(true, |(_, width)| span.width() < width) {
            best = Some((i, span.width()));
        }
    }
    best.map(|(i, _)| i)
}

fn covers(entry: &HistoryEntry, index: &LineIndex, position: Position) -> bool {
    entry.source_span().is_some_and(|span| index.span_covers(span, position))
}

/// Whether a freshly recorded entry satisfies the active breakpoint.
///
/// Only [`Breakpoint::AtPosition`] can match; an unconditional breakpoint
/// means "run to completion" and never stops early.
pub fn breakpoint_satisfied(
    breakpoint: &Breakpoint,
    entry: &HistoryEntry,
    index: &LineIndex,
) -> bool {
    match breakpoint {
        Breakpoint::None | Breakpoint::Unconditional => false,
        Breakpoint::AtPosition { line, column } => {
            covers(entry, index, Position::new(*line, *column))
        }
    }
}

/// The nearest in-progress state at or before `at`, with its index.
///
/// Interruption entries carry no machine state, so inspection at the end of
/// a completed run falls back to the state just before the interruption.
pub fn most_recent_core(history: &[HistoryEntry], at: usize) -> Option<(usize, &CoreState)> {
    history
        .iter()
        .enumerate()
        .take(at.checked_add(1)?)
        .rev()
        .find_map(|(i, entry)| entry.as_core().map(|core| (i, core)))
}
