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

//! Stopping conditions for continuous-run mode.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// A stopping condition for continuous-run mode.
///
/// `None` means single-step only: the run loop is never started for it.
/// `Unconditional` runs until the engine reports exhaustion or an error.
/// `AtPosition` runs until a stepped-to state's span covers the position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Breakpoint {
    /// No breakpoint; single-step only.
    #[default]
    None,
    /// Run until the program completes or fails.
    Unconditional,
    /// Run until execution reaches this source position.
    AtPosition {
        /// Line number, 1-based.
        line: usize,
        /// Column number, 1-based.
        column: usize,
    },
}

impl Breakpoint {
    /// Breakpoint at an editor position.
    pub fn at(position: Position) -> Self {
        Self::AtPosition { line: position.line, column: position.column }
    }

    /// Whether this is the absent breakpoint.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "-"),
            Self::Unconditional => write!(f, "*"),
            Self::AtPosition { line, column } => write!(f, "{line}:{column}"),
        }
    }
}

impl FromStr for Breakpoint {
    type Err = String;

    /// Parses a breakpoint from a string.
    /// Format:
    /// - empty or `-` - no breakpoint
    /// - `*` - unconditional run
    /// - `<line>:<column>` - position breakpoint, 1-based
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "" | "-" => Ok(Self::None),
            "*" => Ok(Self::Unconditional),
            _ => {
                let (line, column) = trimmed
                    .split_once(':')
                    .ok_or_else(|| format!("expected <line>:<column>, got: {s}"))?;
                let line =
                    line.trim().parse::<usize>().map_err(|e| format!("invalid line: {e}"))?;
                let column =
                    column.trim().parse::<usize>().map_err(|e| format!("invalid column: {e}"))?;
                if line == 0 || column == 0 {
                    return Err("line and column are 1-based".to_string());
                }
                Ok(Self::AtPosition { line, column })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_empty() {
        assert_eq!(Breakpoint::from_str("").unwrap(), Breakpoint::None);
        assert_eq!(Breakpoint::from_str("  ").unwrap(), Breakpoint::None);
        assert_eq!(Breakpoint::from_str("-").unwrap(), Breakpoint::None);
    }

    #[test]
    fn test_from_str_unconditional() {
        assert_eq!(Breakpoint::from_str("*").unwrap(), Breakpoint::Unconditional);
    }

    #[test]
    fn test_from_str_position() {
        assert_eq!(
            Breakpoint::from_str("3:1").unwrap(),
            Breakpoint::AtPosition { line: 3, column: 1 }
        );
        assert_eq!(
            Breakpoint::from_str(" 12 : 40 ").unwrap(),
            Breakpoint::AtPosition { line: 12, column: 40 }
        );
    }

    #[test]
    fn test_from_str_invalid() {
        assert!(Breakpoint::from_str("3").is_err());
        assert!(Breakpoint::from_str("a:b").is_err());
        assert!(Breakpoint::from_str("0:1").is_err());
        assert!(Breakpoint::from_str("1:0").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for bp in [
            Breakpoint::None,
            Breakpoint::Unconditional,
            Breakpoint::AtPosition { line: 3, column: 1 },
        ] {
            assert_eq!(Breakpoint::from_str(&bp.to_string()).unwrap(), bp);
        }
    }

    #[test]
    fn test_at_position_helper() {
        let bp = Breakpoint::at(Position::new(3, 1));
        assert_eq!(bp, Breakpoint::AtPosition { line: 3, column: 1 });
        assert!(!bp.is_none());
        assert!(Breakpoint::None.is_none());
    }
}
