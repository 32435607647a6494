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

//! Recursive-descent parser for the reference language.
//!
//! Grammar:
//!
//! ```text
//! prog := dec* EOF
//! dec  := "let" Ident "=" exp ";" | exp ";"
//! exp  := term (("+" | "-") term)*
//! term := app ("*" app)*
//! app  := atom atom*                       // application by juxtaposition
//! atom := Int | Text | Ident | "prim" Text | "(" exp ")"
//! ```
//!
//! Failures carry the lalrpop-style taxonomy of
//! [`tvd_common::SyntaxErrorKind`]: `UnrecognizedEof` when input ends early
//! (e.g. an unmatched `(`), `UnrecognizedToken` with an expected-token list,
//! `ExtraToken` for a closing token with no opener, `InvalidToken` from the
//! lexer.

use tvd_common::{Span, SyntaxError, SyntaxErrorKind};

use crate::ast::{BinOp, Dec, DecKind, Exp, ExpKind, Prog};
use crate::lexer::{tokenize, Token, TokenKind};

/// Parse `source` into a program.
pub fn parse(source: &str) -> Result<Prog, SyntaxError> {
    let tokens = tokenize(source)?;
    Parser { tokens, pos: 0, eof: source.len() }.prog()
}

const ATOM_EXPECTED: &[&str] = &["an integer", "a string", "an identifier", "\"prim\"", "\"(\""];

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    eof: usize,
}

impl Parser {
    fn prog(mut self) -> Result<Prog, SyntaxError> {
        let mut decs = Vec::new();
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::RParen {
                // a closer with no opener cannot start a declaration
                return Err(SyntaxError {
                    kind: SyntaxErrorKind::ExtraToken,
                    span: token.span,
                    token: Some(token.kind.display_text()),
                    expected: Vec::new(),
                    message: None,
                });
            }
            decs.push(self.dec()?);
        }
        Ok(Prog { decs })
    }

    fn dec(&mut self) -> Result<Dec, SyntaxError> {
        if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Let)) {
            let let_span = self.expect(&TokenKind::Let, &["\"let\""])?;
            let name = self.expect_ident()?;
            self.expect(&TokenKind::Eq, &["\"=\""])?;
            let exp = self.exp()?;
            self.expect(&TokenKind::Semi, &["\";\""])?;
            let span = let_span.merge(exp.span);
            Ok(Dec { kind: DecKind::Let { name, exp }, span })
        } else {
            let exp = self.exp()?;
            self.expect(&TokenKind::Semi, &["\";\""])?;
            let span = exp.span;
            Ok(Dec { kind: DecKind::Exp(exp), span })
        }
    }

    fn exp(&mut self) -> Result<Exp, SyntaxError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.term()?;
            let span = lhs.span.merge(rhs.span);
            lhs = Exp { kind: ExpKind::Bin { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, span };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Exp, SyntaxError> {
        let mut lhs = self.app()?;
        while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Star)) {
            self.advance();
            let rhs = self.app()?;
            let span = lhs.span.merge(rhs.span);
            lhs = Exp {
                kind: ExpKind::Bin { op: BinOp::Mul, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span,
            };
        }
        Ok(lhs)
    }

    fn app(&mut self) -> Result<Exp, SyntaxError> {
        let mut fun = self.atom()?;
        while self.peek().is_some_and(|t| Self::starts_atom(&t.kind)) {
            let arg = self.atom()?;
            let span = fun.span.merge(arg.span);
            fun = Exp { kind: ExpKind::App { fun: Box::new(fun), arg: Box::new(arg) }, span };
        }
        Ok(fun)
    }

    fn atom(&mut self) -> Result<Exp, SyntaxError> {
        let token = self.advance().ok_or_else(|| self.eof_error(ATOM_EXPECTED))?;
        match token.kind {
            TokenKind::Int(value) => Ok(Exp { kind: ExpKind::Int(value), span: token.span }),
            TokenKind::Text(text) => Ok(Exp { kind: ExpKind::Text(text), span: token.span }),
            TokenKind::Ident(name) => Ok(Exp { kind: ExpKind::Var(name), span: token.span }),
            TokenKind::Prim => {
                let name_token =
                    self.advance().ok_or_else(|| self.eof_error(&["a string"]))?;
                match name_token.kind {
                    TokenKind::Text(name) => Ok(Exp {
                        kind: ExpKind::Prim(name),
                        span: token.span.merge(name_token.span),
                    }),
                    _ => Err(Self::unexpected(&name_token, &["a string"])),
                }
            }
            TokenKind::LParen => {
                let mut inner = self.exp()?;
                let close = self.expect(&TokenKind::RParen, &["\")\""])?;
                inner.span = token.span.merge(close);
                Ok(inner)
            }
            _ => Err(Self::unexpected(&token, ATOM_EXPECTED)),
        }
    }

    fn starts_atom(kind: &TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Int(_)
                | TokenKind::Text(_)
                | TokenKind::Ident(_)
                | TokenKind::Prim
                | TokenKind::LParen
        )
    }

    fn expect_ident(&mut self) -> Result<String, SyntaxError> {
        let token = self.advance().ok_or_else(|| self.eof_error(&["an identifier"]))?;
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            _ => Err(Self::unexpected(&token, &["an identifier"])),
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &[&str]) -> Result<Span, SyntaxError> {
        let token = self.advance().ok_or_else(|| self.eof_error(expected))?;
        if &token.kind == kind {
            Ok(token.span)
        } else {
            Err(Self::unexpected(&token, expected))
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eof_error(&self, expected: &[&str]) -> SyntaxError {
        SyntaxError {
            kind: SyntaxErrorKind::UnrecognizedEof,
            span: Span::new(self.eof, self.eof),
            token: None,
            expected: expected.iter().map(|s| s.to_string()).collect(),
            message: None,
        }
    }

    fn unexpected(token: &Token, expected: &[&str]) -> SyntaxError {
        SyntaxError {
            kind: SyntaxErrorKind::UnrecognizedToken,
            span: token.span,
            token: Some(token.kind.display_text()),
            expected: expected.iter().map(|s| s.to_string()).collect(),
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = "let a = 1;\n(prim \"debugPrint\") \"Hello, VM!\";\na + 1;\n";

    #[test]
    fn test_parse_default_program() {
        let prog = parse(DEFAULT).expect("parses");
        assert_eq!(prog.decs.len(), 3);
        assert!(matches!(&prog.decs[0].kind, DecKind::Let { name, .. } if name == "a"));
        match &prog.decs[1].kind {
            DecKind::Exp(exp) => match &exp.kind {
                ExpKind::App { fun, arg } => {
                    assert!(matches!(&fun.kind, ExpKind::Prim(name) if name == "debugPrint"));
                    assert!(matches!(&arg.kind, ExpKind::Text(text) if text == "Hello, VM!"));
                }
                other => panic!("expected application, got {other:?}"),
            },
            other => panic!("expected expression dec, got {other:?}"),
        }
    }

    #[test]
    fn test_dec_spans_cover_source() {
        let prog = parse(DEFAULT).unwrap();
        // "let a = 1"
        assert_eq!(prog.decs[0].span, Span::new(0, 9));
        // "a + 1" on line 3
        assert_eq!(prog.decs[2].span, Span::new(45, 50));
    }

    #[test]
    fn test_operator_precedence() {
        let prog = parse("1 + 2 * 3;").unwrap();
        let DecKind::Exp(exp) = &prog.decs[0].kind else { panic!() };
        let ExpKind::Bin { op, rhs, .. } = &exp.kind else { panic!() };
        assert_eq!(*op, BinOp::Add);
        assert!(matches!(&rhs.kind, ExpKind::Bin { op: BinOp::Mul, .. }));
    }

    #[test]
    fn test_unmatched_paren_is_unrecognized_eof() {
        let err = parse("(1 + 2").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnrecognizedEof);
        assert!(err.expected.contains(&"\")\"".to_string()));
    }

    #[test]
    fn test_missing_semicolon_at_eof() {
        let err = parse("1 + 2").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnrecognizedEof);
        assert!(err.expected.contains(&"\";\"".to_string()));
    }

    #[test]
    fn test_unexpected_token_reports_expectation() {
        let err = parse("let = 3;").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnrecognizedToken);
        assert_eq!(err.token.as_deref(), Some("="));
        assert!(err.expected.contains(&"an identifier".to_string()));
    }

    #[test]
    fn test_stray_closer_is_extra_token() {
        let err = parse("1 + 2; )").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::ExtraToken);
        assert_eq!(err.token.as_deref(), Some(")"));
    }

    #[test]
    fn test_empty_program() {
        assert!(parse("").unwrap().decs.is_empty());
        assert!(parse("  \n ").unwrap().decs.is_empty());
    }
}
