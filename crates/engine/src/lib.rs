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

//! TVD Engine - reference step-execution engine
//!
//! A small-step interpreter for a tiny `let`/expression language with a
//! `(prim "debugPrint")` primitive, exposed through the
//! [`tvd_common::StepEngine`] interface. Every step records a full machine
//! state, so execution can be replayed and rewound entry by entry.

pub mod ast;
pub use ast::*;

pub mod lexer;
pub use lexer::*;

pub mod parser;
pub use parser::*;

pub mod machine;
pub use machine::*;

pub mod vm;
pub use vm::*;
