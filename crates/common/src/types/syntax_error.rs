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

//! Parse failures reported by the execution engine.
//!
//! The kinds follow the engine's parser taxonomy; [`SyntaxError::details`]
//! renders the message/detail pair shown next to the editor marker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Span;

/// Classification of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntaxErrorKind {
    /// A character sequence that forms no token.
    InvalidToken,
    /// Input ended where more tokens were expected.
    #[serde(rename = "UnrecognizedEOF")]
    UnrecognizedEof,
    /// A token that cannot appear at this point.
    UnrecognizedToken,
    /// A well-formed token left over after a complete parse.
    ExtraToken,
    /// Any other failure the parser reports.
    Other,
}

/// A parse failure, positioned against the text that was submitted.
///
/// Supersedes any history for the evaluation attempt that produced it; the
/// previously published history stays untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxError {
    /// What went wrong.
    #[serde(rename = "syntax_error_type")]
    pub kind: SyntaxErrorKind,
    /// Byte range of the offending input.
    pub span: Span,
    /// The offending token text, when one was read.
    pub token: Option<String>,
    /// Token descriptions the parser would have accepted here.
    pub expected: Vec<String>,
    /// Raw parser message for kinds the taxonomy does not cover.
    pub message: Option<String>,
}

/// Human-readable rendering of a [`SyntaxError`].
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxErrorDetails {
    /// Headline shown to the user.
    pub message: String,
    /// Secondary detail line (expected-token list), when available.
    pub code: Option<String>,
}

impl SyntaxError {
    /// Render the message/detail pair shown next to an editor marker.
    pub fn details(&self) -> SyntaxErrorDetails {
        let expected = || {
            if self.expected.is_empty() {
                None
            } else {
                Some(format!("expected: {}", self.expected.join(", ")))
            }
        };
        match self.kind {
            SyntaxErrorKind::InvalidToken => {
                SyntaxErrorDetails { message: "Unexpected token".to_string(), code: None }
            }
            SyntaxErrorKind::UnrecognizedEof => SyntaxErrorDetails {
                message: "Unexpected end of file".to_string(),
                code: expected(),
            },
            SyntaxErrorKind::UnrecognizedToken => SyntaxErrorDetails {
                message: format!("Unexpected token '{}'", self.token.as_deref().unwrap_or("")),
                code: expected(),
            },
            SyntaxErrorKind::ExtraToken => SyntaxErrorDetails {
                message: format!("Extra token: '{}'", self.token.as_deref().unwrap_or("")),
                code: None,
            },
            SyntaxErrorKind::Other => SyntaxErrorDetails {
                message: self
                    .message
                    .clone()
                    .unwrap_or_else(|| "(Unexpected error)".to_string()),
                code: None,
            },
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self.details();
        write!(f, "{} at {}", details.message, self.span)?;
        if let Some(code) = details.code {
            write!(f, " ({code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}
