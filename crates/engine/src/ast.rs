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

//! Abstract syntax for the reference language.
//!
//! Every node carries the span of the source fragment it was parsed from;
//! the machine threads these spans into the recorded history so states map
//! back onto source locations.

use std::fmt;

use tvd_common::Span;

/// A parsed program: a sequence of declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Prog {
    /// Declarations in source order.
    pub decs: Vec<Dec>,
}

/// One top-level declaration, spanning up to its terminating `;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dec {
    /// What the declaration does.
    pub kind: DecKind,
    /// Source range of the declaration without the terminator.
    pub span: Span,
}

/// Declaration payload.
#[derive(Debug, Clone, PartialEq)]
pub enum DecKind {
    /// `let <name> = <exp>;`
    Let {
        /// Bound variable name.
        name: String,
        /// Right-hand side.
        exp: Exp,
    },
    /// A bare expression statement.
    Exp(Exp),
}

/// An expression with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Exp {
    /// Expression payload.
    pub kind: ExpKind,
    /// Source range of the expression.
    pub span: Span,
}

/// Expression payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpKind {
    /// Integer literal.
    Int(i64),
    /// String literal (unescaped).
    Text(String),
    /// Variable reference.
    Var(String),
    /// Primitive reference: `prim "<name>"`.
    Prim(String),
    /// Binary arithmetic.
    Bin {
        /// Operator.
        op: BinOp,
        /// Left operand.
        lhs: Box<Exp>,
        /// Right operand.
        rhs: Box<Exp>,
    },
    /// Function application by juxtaposition: `<fun> <arg>`.
    App {
        /// Applied function expression.
        fun: Box<Exp>,
        /// Argument expression.
        arg: Box<Exp>,
    },
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
        }
    }
}

impl Exp {
    /// A short single-line rendering used for continuation summaries.
    pub fn summary(&self) -> String {
        match &self.kind {
            ExpKind::Int(n) => n.to_string(),
            ExpKind::Text(s) => format!("{s:?}"),
            ExpKind::Var(x) => x.clone(),
            ExpKind::Prim(name) => format!("prim {name:?}"),
            ExpKind::Bin { op, lhs, rhs } => {
                format!("{} {op} {}", lhs.summary(), rhs.summary())
            }
            ExpKind::App { fun, arg } => format!("({}) {}", fun.summary(), arg.summary()),
        }
    }
}
