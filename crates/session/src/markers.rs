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

//! Diagnostic markers for the editing surface.
//!
//! [`source_markers`] derives the full marker set from the session after
//! every state change; the surface replaces its previous markers wholesale.
//! A dirty session gets no markers at all, since every span the session
//! knows refers to text that no longer exists.

use serde::{Deserialize, Serialize};

use tvd_common::{InterruptionState, Position};

use crate::controller::SessionController;
use crate::resolve::most_recent_core;

/// Severity of a marker, with the editor protocol's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerSeverity {
    /// An informational location highlight.
    Info,
    /// A blocking error.
    Error,
}

impl MarkerSeverity {
    /// The numeric severity used by editor marker protocols.
    pub fn code(&self) -> u8 {
        match self {
            Self::Info => 2,
            Self::Error => 8,
        }
    }
}

/// One diagnostic marker, positioned in the current editor text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Marker severity.
    pub severity: MarkerSeverity,
    /// Inclusive start position.
    pub start: Position,
    /// Inclusive end position.
    pub end: Position,
    /// Headline shown on hover.
    pub message: String,
    /// Marker origin label; `[i]` names the history index a location
    /// marker points at.
    pub source: Option<String>,
}

/// Derive the current marker set for `session`.
///
/// At most one marker is produced: the syntax error when the last
/// evaluation was rejected, otherwise the source location of the selected
/// history entry. A completed run selects no location (there is nothing
/// left to point at), and a runtime failure is marked as an error at the
/// failing span.
pub fn source_markers(session: &SessionController) -> Vec<Marker> {
    if session.dirty() {
        return Vec::new();
    }

    if let Some(err) = session.syntax_error() {
        let (start, end) = session.line_index().span_range(err.span);
        let details = err.details();
        let message = match details.code {
            Some(code) => format!("{}\n{code}", details.message),
            None => details.message,
        };
        return vec![Marker {
            severity: MarkerSeverity::Error,
            start,
            end,
            message,
            source: None,
        }];
    }

    let Some(selected) = session.selected_index() else {
        return Vec::new();
    };
    let history = session.store().snapshot();

    match history[selected].as_interruption() {
        Some(InterruptionState::Done { .. }) => return Vec::new(),
        Some(InterruptionState::Error { message, source }) => {
            let span = (*source).or_else(|| {
                most_recent_core(&history, selected)
                    .and_then(|(_, core)| core.cont_source)
            });
            if let Some(span) = span {
                let (start, end) = session.line_index().span_range(span);
                return vec![Marker {
                    severity: MarkerSeverity::Error,
                    start,
                    end,
                    message: message.clone(),
                    source: None,
                }];
            }
            return Vec::new();
        }
        _ => {}
    }

    let Some((index, core)) = most_recent_core(&history, selected) else {
        return Vec::new();
    };
    let Some(span) = core.cont_source else {
        return Vec::new();
    };
    let (start, end) = session.line_index().span_range(span);
    vec![Marker {
        severity: MarkerSeverity::Info,
        start,
        end,
        message: "Source location".to_string(),
        source: Some(format!("[{index}]")),
    }]
}
