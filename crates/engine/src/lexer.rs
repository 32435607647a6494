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

//! Tokenizer for the reference language.

use tvd_common::{Span, SyntaxError, SyntaxErrorKind};

/// A lexical token with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token payload.
    pub kind: TokenKind,
    /// Source range of the token text.
    pub span: Span,
}

/// Token payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `let`
    Let,
    /// `prim`
    Prim,
    /// Identifier.
    Ident(String),
    /// Integer literal.
    Int(i64),
    /// String literal, already unescaped.
    Text(String),
    /// `=`
    Eq,
    /// `;`
    Semi,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `(`
    LParen,
    /// `)`
    RParen,
}

impl TokenKind {
    /// The token text shown in error messages.
    pub fn display_text(&self) -> String {
        match self {
            Self::Let => "let".to_string(),
            Self::Prim => "prim".to_string(),
            Self::Ident(name) => name.clone(),
            Self::Int(n) => n.to_string(),
            Self::Text(s) => format!("{s:?}"),
            Self::Eq => "=".to_string(),
            Self::Semi => ";".to_string(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
        }
    }
}

/// Tokenize `source`.
///
/// Fails with [`SyntaxErrorKind::InvalidToken`] on a character that starts
/// no token, and with [`SyntaxErrorKind::UnrecognizedEof`] on an
/// unterminated string literal.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
            }
            b'=' => {
                i += 1;
                tokens.push(Token { kind: TokenKind::Eq, span: Span::new(start, i) });
            }
            b';' => {
                i += 1;
                tokens.push(Token { kind: TokenKind::Semi, span: Span::new(start, i) });
            }
            b'+' => {
                i += 1;
                tokens.push(Token { kind: TokenKind::Plus, span: Span::new(start, i) });
            }
            b'-' => {
                i += 1;
                tokens.push(Token { kind: TokenKind::Minus, span: Span::new(start, i) });
            }
            b'*' => {
                i += 1;
                tokens.push(Token { kind: TokenKind::Star, span: Span::new(start, i) });
            }
            b'(' => {
                i += 1;
                tokens.push(Token { kind: TokenKind::LParen, span: Span::new(start, i) });
            }
            b')' => {
                i += 1;
                tokens.push(Token { kind: TokenKind::RParen, span: Span::new(start, i) });
            }
            b'"' => {
                let (text, end) = lex_string(source, start)?;
                tokens.push(Token { kind: TokenKind::Text(text), span: Span::new(start, end) });
                i = end;
            }
            b'0'..=b'9' => {
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let text = &source[start..i];
                let value = text.parse::<i64>().map_err(|_| SyntaxError {
                    kind: SyntaxErrorKind::InvalidToken,
                    span: Span::new(start, i),
                    token: Some(text.to_string()),
                    expected: Vec::new(),
                    message: Some("integer literal out of range".to_string()),
                })?;
                tokens.push(Token { kind: TokenKind::Int(value), span: Span::new(start, i) });
            }
            _ if b.is_ascii_alphabetic() || b == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let kind = match &source[start..i] {
                    "let" => TokenKind::Let,
                    "prim" => TokenKind::Prim,
                    name => TokenKind::Ident(name.to_string()),
                };
                tokens.push(Token { kind, span: Span::new(start, i) });
            }
            _ => {
                // consume one whole character, not one byte
                let ch_len = source[start..].chars().next().map_or(1, char::len_utf8);
                return Err(SyntaxError {
                    kind: SyntaxErrorKind::InvalidToken,
                    span: Span::new(start, start + ch_len),
                    token: Some(source[start..start + ch_len].to_string()),
                    expected: Vec::new(),
                    message: None,
                });
            }
        }
    }

    Ok(tokens)
}

/// Lex a string literal starting at the opening quote. Returns the
/// unescaped text and the offset one past the closing quote.
fn lex_string(source: &str, start: usize) -> Result<(String, usize), SyntaxError> {
    let bytes = source.as_bytes();
    let mut text = String::new();
    let mut i = start + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Ok((text, i + 1)),
            b'\\' => {
                let escape = bytes.get(i + 1).copied();
                match escape {
                    Some(b'"') => text.push('"'),
                    Some(b'\\') => text.push('\\'),
                    Some(b'n') => text.push('\n'),
                    Some(b't') => text.push('\t'),
                    _ => {
                        return Err(SyntaxError {
                            kind: SyntaxErrorKind::InvalidToken,
                            span: Span::new(i, (i + 2).min(bytes.len())),
                            token: escape.map(|b| format!("\\{}", b as char)),
                            expected: Vec::new(),
                            message: Some("unknown escape sequence".to_string()),
                        })
                    }
                }
                i += 2;
            }
            _ => {
                let ch = source[i..].chars().next().unwrap_or('\u{fffd}');
                text.push(ch);
                i += ch.len_utf8();
            }
        }
    }

    Err(SyntaxError {
        kind: SyntaxErrorKind::UnrecognizedEof,
        span: Span::new(source.len(), source.len()),
        token: None,
        expected: vec!["\"\\\"\"".to_string()],
        message: Some("unterminated string literal".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_default_program() {
        let tokens = tokenize("let a = 1;\n(prim \"debugPrint\") \"Hello, VM!\";\na + 1;\n")
            .expect("tokenizes");
        let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &TokenKind::Let,
                &TokenKind::Ident("a".to_string()),
                &TokenKind::Eq,
                &TokenKind::Int(1),
                &TokenKind::Semi,
                &TokenKind::LParen,
                &TokenKind::Prim,
                &TokenKind::Text("debugPrint".to_string()),
                &TokenKind::RParen,
                &TokenKind::Text("Hello, VM!".to_string()),
                &TokenKind::Semi,
                &TokenKind::Ident("a".to_string()),
                &TokenKind::Plus,
                &TokenKind::Int(1),
                &TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn test_token_spans() {
        let tokens = tokenize("let a = 1;").unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(4, 5));
        assert_eq!(tokens[3].span, Span::new(8, 9));
    }

    #[test]
    fn test_invalid_character() {
        let err = tokenize("let a = @;").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::InvalidToken);
        assert_eq!(err.span, Span::new(8, 9));
        assert_eq!(err.token.as_deref(), Some("@"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("\"oops").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnrecognizedEof);
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r#""a\"b\\c\n""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Text("a\"b\\c\n".to_string()));
    }
}
