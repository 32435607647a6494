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

//! Recorded machine states.
//!
//! A [`HistoryEntry`] is one state recorded by the execution engine after a
//! single step: either an in-progress [`CoreState`] or a terminal
//! [`InterruptionState`]. Entries are immutable once recorded and are always
//! published as a whole sequence, never patched in place.
//!
//! The serialized form keeps the engine's wire discriminators
//! (`state_type`, `cont_type`, `interruption_type`, `frame_cont_type`) so
//! inspection UIs built against the engine schema keep working. Unknown
//! discriminators deserialize to the `Other` arms rather than failing, so a
//! newer engine schema degrades instead of breaking the session.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Span;

/// One recorded machine state produced by a single engine step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state_type", content = "value")]
pub enum HistoryEntry {
    /// An in-progress machine state.
    Core(CoreState),
    /// A terminal or suspended state; stepping forward past one is refused.
    Interruption(InterruptionState),
}

impl HistoryEntry {
    /// The source span this state maps back to, when known.
    pub fn source_span(&self) -> Option<Span> {
        match self {
            Self::Core(core) => core.cont_source,
            Self::Interruption(int) => int.source(),
        }
    }

    /// The core payload, when this is an in-progress state.
    pub fn as_core(&self) -> Option<&CoreState> {
        match self {
            Self::Core(core) => Some(core),
            Self::Interruption(_) => None,
        }
    }

    /// The interruption payload, when this is a terminal state.
    pub fn as_interruption(&self) -> Option<&InterruptionState> {
        match self {
            Self::Core(_) => None,
            Self::Interruption(int) => Some(int),
        }
    }

    /// Whether this entry ends the recorded execution.
    pub fn is_interruption(&self) -> bool {
        matches!(self, Self::Interruption(_))
    }
}

/// An in-progress machine state: the current continuation, the frame stack,
/// and the debug output accumulated so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreState {
    /// What the machine is about to do next.
    pub cont: Continuation,
    /// Pending frames, innermost last.
    pub stack: Vec<FrameInfo>,
    /// Output of the `debugPrint` primitive, accumulated monotonically
    /// across all states recorded from the same evaluation.
    pub debug_print_out: Vec<String>,
    /// Span of the source fragment the continuation derives from.
    pub cont_source: Option<Span>,
}

/// A descriptor of the machine's current continuation.
///
/// The payload is a rendered summary, not live machine state; the engine
/// keeps the real continuation to itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cont_type", content = "detail")]
pub enum Continuation {
    /// Executing a declaration sequence; payload is the number remaining.
    Decs(usize),
    /// Evaluating an expression.
    #[serde(rename = "Exp_")]
    Exp(String),
    /// Returning a computed value to the innermost frame.
    Value(String),
    /// Returning the value of a just-bound `let` variable.
    LetVarRet(String),
    /// A continuation kind this build does not know.
    #[serde(other)]
    Other,
}

/// One pending frame on the machine stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    /// Discriminator of the suspended computation.
    #[serde(rename = "frame_cont_type")]
    pub kind: FrameKind,
    /// Span of the source fragment the frame derives from.
    pub source: Option<Span>,
}

/// Discriminator for the suspended computation held by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Remaining declarations of an enclosing sequence.
    Decs,
    /// A `let` binding waiting for its right-hand side.
    Let,
    /// A binary operator waiting for its left operand.
    BinOp1,
    /// A binary operator waiting for its right operand.
    BinOp2,
    /// An application waiting for its function value.
    App1,
    /// An application waiting for its argument value.
    App2,
    /// A frame kind this build does not know.
    Other,
}

impl FrameKind {
    /// The wire discriminator for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decs => "Decs",
            Self::Let => "Let",
            Self::BinOp1 => "BinOp1",
            Self::BinOp2 => "BinOp2",
            Self::App1 => "App1",
            Self::App2 => "App2",
            Self::Other => "Other",
        }
    }
}

impl Serialize for FrameKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FrameKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "Decs" => Self::Decs,
            "Let" => Self::Let,
            "BinOp1" => Self::BinOp1,
            "BinOp2" => Self::BinOp2,
            "App1" => Self::App1,
            "App2" => Self::App2,
            _ => Self::Other,
        })
    }
}

/// A terminal or suspended machine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "interruption_type")]
pub enum InterruptionState {
    /// The program ran to completion.
    Done {
        /// The final value, rendered.
        value: Option<String>,
        /// Span execution completed at, when known.
        source: Option<Span>,
    },
    /// A runtime failure (unbound variable, type error, unknown primitive).
    Error {
        /// Failure message.
        message: String,
        /// Span of the failing source fragment, when known.
        source: Option<Span>,
    },
    /// An interruption kind this build does not know.
    #[serde(other)]
    Other,
}

impl InterruptionState {
    /// Whether the program ran to completion.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }

    /// Whether the interruption is a runtime failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The source span execution stopped at, when known.
    pub fn source(&self) -> Option<Span> {
        match self {
            Self::Done { source, .. } | Self::Error { source, .. } => *source,
            Self::Other => None,
        }
    }

    /// The rendered payload: final value for `Done`, message for `Error`.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Done { value, .. } => value.as_deref(),
            Self::Error { message, .. } => Some(message),
            Self::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_core() -> HistoryEntry {
        HistoryEntry::Core(CoreState {
            cont: Continuation::Exp("a + 1".to_string()),
            stack: vec![FrameInfo { kind: FrameKind::Decs, source: Some(Span::new(0, 10)) }],
            debug_print_out: vec!["Hello, VM!".to_string()],
            cont_source: Some(Span::new(45, 50)),
        })
    }

    #[test]
    fn test_source_span_accessor() {
        assert_eq!(sample_core().source_span(), Some(Span::new(45, 50)));

        let done = HistoryEntry::Interruption(InterruptionState::Done {
            value: Some("2".to_string()),
            source: None,
        });
        assert_eq!(done.source_span(), None);
        assert!(done.is_interruption());
        assert!(!sample_core().is_interruption());
    }

    #[test]
    fn test_wire_tags() {
        let json = serde_json::to_value(sample_core()).unwrap();
        assert_eq!(json["state_type"], "Core");
        assert_eq!(json["value"]["cont"]["cont_type"], "Exp_");
        assert_eq!(json["value"]["stack"][0]["frame_cont_type"], "Decs");
        assert_eq!(json["value"]["debug_print_out"][0], "Hello, VM!");

        let done =
            HistoryEntry::Interruption(InterruptionState::Done { value: None, source: None });
        let json = serde_json::to_value(done).unwrap();
        assert_eq!(json["state_type"], "Interruption");
        assert_eq!(json["value"]["interruption_type"], "Done");
    }

    #[test]
    fn test_unknown_discriminators_become_other() {
        let int: InterruptionState =
            serde_json::from_str(r#"{"interruption_type":"Breakpoint"}"#).unwrap();
        assert_eq!(int, InterruptionState::Other);
        assert_eq!(int.source(), None);

        let kind: FrameKind = serde_json::from_str(r#""Catch""#).unwrap();
        assert_eq!(kind, FrameKind::Other);
    }

    #[test]
    fn test_round_trip() {
        let entry = sample_core();
        let json = serde_json::to_string(&entry).unwrap();
        let back: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }
}
