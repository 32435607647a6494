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

//! The small-step abstract machine.
//!
//! A [`Machine`] holds a continuation, a frame stack and an environment, and
//! advances by exactly one transition per [`Machine::step`]. Stepping out of
//! the final state yields an [`Interrupt`]; the machine itself is left
//! untouched, so the caller decides what to record. [`Machine::render`]
//! projects the live state into the published [`CoreState`] schema.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use tvd_common::{Continuation, CoreState, FrameInfo, FrameKind, InterruptionState, Span};

use crate::ast::{BinOp, Dec, DecKind, Exp, ExpKind, Prog};

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The unit value, produced by effectful primitives.
    Unit,
    /// Integer.
    Int(i64),
    /// String.
    Text(String),
    /// A primitive by name, not yet applied.
    Prim(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "()"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Prim(name) => write!(f, "prim {name:?}"),
        }
    }
}

/// The machine's continuation: what it is about to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Cont {
    /// Execute a sequence of declarations.
    Decs(VecDeque<Dec>),
    /// Evaluate an expression.
    Exp(Exp),
    /// Return a computed value to the innermost frame.
    Value(Value),
    /// Return the value of a just-bound `let` variable.
    LetVarRet(String),
}

/// A suspended computation waiting for the current continuation's value.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// What resumes when a value arrives.
    pub cont: FrameCont,
    /// Span of the source fragment the frame derives from.
    pub span: Span,
}

/// Frame payload.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameCont {
    /// Remaining declarations of the enclosing sequence.
    Decs(VecDeque<Dec>),
    /// A `let` binding waiting for its right-hand side.
    Let(String),
    /// A binary operator waiting for its left operand.
    BinOp1(BinOp, Exp),
    /// A binary operator waiting for its right operand.
    BinOp2(BinOp, Value),
    /// An application waiting for its function value.
    App1(Exp),
    /// An application waiting for its argument value.
    App2(Value),
}

impl FrameCont {
    fn kind(&self) -> FrameKind {
        match self {
            Self::Decs(_) => FrameKind::Decs,
            Self::Let(_) => FrameKind::Let,
            Self::BinOp1(..) => FrameKind::BinOp1,
            Self::BinOp2(..) => FrameKind::BinOp2,
            Self::App1(_) => FrameKind::App1,
            Self::App2(_) => FrameKind::App2,
        }
    }
}

/// Why the machine stopped instead of stepping.
#[derive(Debug, Clone, PartialEq)]
pub enum Interrupt {
    /// The program ran to completion with this value.
    Done(Value),
    /// A runtime failure.
    Error {
        /// Failure message.
        message: String,
        /// Span of the failing source fragment, when known.
        span: Option<Span>,
    },
}

impl Interrupt {
    /// Project into the published interruption schema.
    pub fn render(&self) -> InterruptionState {
        match self {
            Self::Done(value) => {
                InterruptionState::Done { value: Some(value.to_string()), source: None }
            }
            Self::Error { message, span } => {
                InterruptionState::Error { message: message.clone(), source: *span }
            }
        }
    }
}

/// The live machine state for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    cont: Cont,
    cont_span: Option<Span>,
    stack: Vec<Frame>,
    env: HashMap<String, Value>,
    debug_output: Vec<String>,
    last_value: Value,
}

impl Machine {
    /// The initial state for a parsed program, before any step.
    pub fn new(prog: Prog) -> Self {
        Self {
            cont: Cont::Decs(prog.decs.into()),
            cont_span: None,
            stack: Vec::new(),
            env: HashMap::new(),
            debug_output: Vec::new(),
            last_value: Value::Unit,
        }
    }

    /// Advance by exactly one transition.
    ///
    /// `Err` means the machine cannot step: the program is done or a runtime
    /// failure occurred. The machine state is unchanged in that case.
    pub fn step(&mut self) -> Result<(), Interrupt> {
        match std::mem::replace(&mut self.cont, Cont::Value(Value::Unit)) {
            Cont::Decs(mut decs) => match decs.pop_front() {
                None => {
                    self.cont = Cont::Decs(decs);
                    Err(Interrupt::Done(self.last_value.clone()))
                }
                Some(dec) => {
                    self.cont_span = Some(dec.span);
                    match dec.kind {
                        DecKind::Exp(exp) => {
                            self.stack.push(Frame { cont: FrameCont::Decs(decs), span: dec.span });
                            self.cont = Cont::Exp(exp);
                        }
                        DecKind::Let { name, exp } => {
                            self.stack.push(Frame { cont: FrameCont::Decs(decs), span: dec.span });
                            self.stack.push(Frame { cont: FrameCont::Let(name), span: dec.span });
                            self.cont = Cont::Exp(exp);
                        }
                    }
                    Ok(())
                }
            },
            Cont::Exp(exp) => {
                self.cont_span = Some(exp.span);
                match exp.kind {
                    ExpKind::Int(value) => self.cont = Cont::Value(Value::Int(value)),
                    ExpKind::Text(text) => self.cont = Cont::Value(Value::Text(text)),
                    ExpKind::Prim(name) => self.cont = Cont::Value(Value::Prim(name)),
                    ExpKind::Var(name) => match self.env.get(&name) {
                        Some(value) => self.cont = Cont::Value(value.clone()),
                        None => {
                            self.cont = Cont::Exp(Exp { kind: ExpKind::Var(name.clone()), span: exp.span });
                            return Err(Interrupt::Error {
                                message: format!("unbound variable '{name}'"),
                                span: Some(exp.span),
                            });
                        }
                    },
                    ExpKind::Bin { op, lhs, rhs } => {
                        self.stack.push(Frame { cont: FrameCont::BinOp1(op, *rhs), span: exp.span });
                        self.cont = Cont::Exp(*lhs);
                    }
                    ExpKind::App { fun, arg } => {
                        self.stack.push(Frame { cont: FrameCont::App1(*arg), span: exp.span });
                        self.cont = Cont::Exp(*fun);
                    }
                }
                Ok(())
            }
            Cont::Value(value) => match self.stack.pop() {
                None => {
                    self.cont = Cont::Value(value.clone());
                    Err(Interrupt::Done(value))
                }
                Some(frame) => {
                    let result = self.apply_frame(frame.clone(), value.clone());
                    if result.is_err() {
                        // restore so a failed machine still renders coherently
                        self.stack.push(frame);
                        self.cont = Cont::Value(value);
                    }
                    result
                }
            },
            Cont::LetVarRet(name) => {
                let value = self.env.get(&name).cloned().unwrap_or(Value::Unit);
                self.cont = Cont::Value(value);
                Ok(())
            }
        }
    }

    fn apply_frame(&mut self, frame: Frame, value: Value) -> Result<(), Interrupt> {
        match frame.cont {
            FrameCont::Decs(decs) => {
                self.last_value = value;
                self.cont = Cont::Decs(decs);
                self.cont_span = Some(frame.span);
            }
            FrameCont::Let(name) => {
                self.env.insert(name.clone(), value);
                self.cont = Cont::LetVarRet(name);
                self.cont_span = Some(frame.span);
            }
            FrameCont::BinOp1(op, rhs) => {
                self.stack.push(Frame { cont: FrameCont::BinOp2(op, value), span: frame.span });
                self.cont = Cont::Exp(rhs);
            }
            FrameCont::BinOp2(op, lhs) => {
                let result = Self::arith(op, &lhs, &value, frame.span)?;
                self.cont = Cont::Value(result);
                self.cont_span = Some(frame.span);
            }
            FrameCont::App1(arg) => {
                self.stack.push(Frame { cont: FrameCont::App2(value), span: frame.span });
                self.cont = Cont::Exp(arg);
            }
            FrameCont::App2(fun) => {
                let result = self.apply(fun, value, frame.span)?;
                self.cont = Cont::Value(result);
                self.cont_span = Some(frame.span);
            }
        }
        Ok(())
    }

    fn arith(op: BinOp, lhs: &Value, rhs: &Value, span: Span) -> Result<Value, Interrupt> {
        match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                let result = match op {
                    BinOp::Add => a.checked_add(*b),
                    BinOp::Sub => a.checked_sub(*b),
                    BinOp::Mul => a.checked_mul(*b),
                };
                result.map(Value::Int).ok_or(Interrupt::Error {
                    message: format!("arithmetic overflow in '{lhs} {op} {rhs}'"),
                    span: Some(span),
                })
            }
            _ => Err(Interrupt::Error {
                message: format!("type mismatch: cannot evaluate '{lhs} {op} {rhs}'"),
                span: Some(span),
            }),
        }
    }

    fn apply(&mut self, fun: Value, arg: Value, span: Span) -> Result<Value, Interrupt> {
        match fun {
            Value::Prim(name) if name == "debugPrint" => {
                let text = match arg {
                    Value::Text(text) => text,
                    other => other.to_string(),
                };
                self.debug_output.push(text);
                Ok(Value::Unit)
            }
            Value::Prim(name) => Err(Interrupt::Error {
                message: format!("unknown primitive '{name}'"),
                span: Some(span),
            }),
            other => Err(Interrupt::Error {
                message: format!("'{other}' is not a function"),
                span: Some(span),
            }),
        }
    }

    /// Project the live state into the published [`CoreState`] schema.
    pub fn render(&self) -> CoreState {
        let cont = match &self.cont {
            Cont::Decs(decs) => Continuation::Decs(decs.len()),
            Cont::Exp(exp) => Continuation::Exp(exp.summary()),
            Cont::Value(value) => Continuation::Value(value.to_string()),
            Cont::LetVarRet(name) => Continuation::LetVarRet(name.clone()),
        };
        CoreState {
            cont,
            stack: self
                .stack
                .iter()
                .map(|frame| FrameInfo { kind: frame.cont.kind(), source: Some(frame.span) })
                .collect(),
            debug_print_out: self.debug_output.clone(),
            cont_source: self.cont_span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn machine(source: &str) -> Machine {
        Machine::new(parse(source).expect("parses"))
    }

    /// Run to interruption, returning every rendered state plus the interrupt.
    fn run(mut m: Machine) -> (Vec<CoreState>, Interrupt) {
        let mut states = vec![m.render()];
        for _ in 0..10_000 {
            match m.step() {
                Ok(()) => states.push(m.render()),
                Err(interrupt) => return (states, interrupt),
            }
        }
        panic!("machine did not terminate");
    }

    #[test]
    fn test_initial_state() {
        let m = machine("1 + 2;");
        let core = m.render();
        assert_eq!(core.cont, Continuation::Decs(1));
        assert!(core.stack.is_empty());
        assert!(core.cont_source.is_none());
    }

    #[test]
    fn test_arithmetic_done_value() {
        let (_, interrupt) = run(machine("1 + 2 * 3;"));
        assert_eq!(interrupt, Interrupt::Done(Value::Int(7)));
    }

    #[test]
    fn test_let_binding_and_use() {
        let (states, interrupt) = run(machine("let a = 1;\na + 1;\n"));
        assert_eq!(interrupt, Interrupt::Done(Value::Int(2)));
        // the LetVarRet continuation must appear after the binding
        assert!(states
            .iter()
            .any(|s| matches!(&s.cont, Continuation::LetVarRet(name) if name == "a")));
    }

    #[test]
    fn test_debug_print_accumulates_once() {
        let source = "let a = 1;\n(prim \"debugPrint\") \"Hello, VM!\";\na + 1;\n";
        let (states, interrupt) = run(machine(source));
        assert_eq!(interrupt, Interrupt::Done(Value::Int(2)));
        let last = states.last().unwrap();
        let count =
            last.debug_print_out.iter().filter(|line| *line == "Hello, VM!").count();
        assert_eq!(count, 1);
        // output is monotone: once printed, every later state carries it
        let first_with = states.iter().position(|s| !s.debug_print_out.is_empty()).unwrap();
        assert!(states[first_with..].iter().all(|s| s.debug_print_out.len() == 1));
    }

    #[test]
    fn test_unbound_variable_error() {
        let (_, interrupt) = run(machine("b + 1;"));
        match interrupt {
            Interrupt::Error { message, span } => {
                assert!(message.contains("unbound variable 'b'"));
                assert_eq!(span, Some(Span::new(0, 1)));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch_error() {
        let (_, interrupt) = run(machine("1 + \"x\";"));
        assert!(matches!(interrupt, Interrupt::Error { .. }));
    }

    #[test]
    fn test_not_a_function_error() {
        let (_, interrupt) = run(machine("1 2;"));
        match interrupt {
            Interrupt::Error { message, .. } => assert!(message.contains("not a function")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_primitive_error() {
        let (_, interrupt) = run(machine("(prim \"nope\") 1;"));
        match interrupt {
            Interrupt::Error { message, .. } => assert!(message.contains("unknown primitive")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_step_leaves_machine_renderable() {
        let mut m = machine("b;");
        while m.step().is_ok() {}
        // stepping again keeps failing with the same interrupt
        assert!(m.step().is_err());
        let core = m.render();
        assert!(core.cont_source.is_some());
    }

    #[test]
    fn test_empty_program_is_done_unit() {
        let (_, interrupt) = run(machine(""));
        assert_eq!(interrupt, Interrupt::Done(Value::Unit));
    }

    #[test]
    fn test_frame_spans_point_at_source() {
        let source = "let a = 1;\na + 1;\n";
        let mut m = machine(source);
        m.step().expect("first step");
        let core = m.render();
        // Decs frame and Let frame both carry the "let a = 1" span
        assert_eq!(core.stack.len(), 2);
        assert_eq!(core.stack[1].kind, FrameKind::Let);
        assert_eq!(core.stack[1].source, Some(Span::new(0, 9)));
    }
}
