//! Data-literal parser
//!
//! Parses the located object literal with a small recursive-descent grammar
//! instead of evaluating it. Only data is accepted: strings (optionally
//! joined with `+`), templates without substitutions, numbers, booleans,
//! `null`/`undefined`, arrays and objects. Anything that would need code to
//! run (calls, identifiers, spreads, methods) is rejected with its position.

use crate::core::error::{LiteralError, Position};
use crate::extract::lexer::{tokenize_range, Token, TokenKind};

/// Deepest object/array/parenthesis nesting the parser accepts
const MAX_DEPTH: usize = 128;

/// A parsed data literal
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    /// Number as written in the source
    Number(String),
    Str(String),
    Array(Vec<Value>),
    /// Members in source order; duplicates are kept
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Short description used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Parse a whole string as a single literal
#[allow(dead_code)]
pub fn parse(text: &str) -> Result<Value, LiteralError> {
    parse_range(text, 0, text.len())
}

/// Parse `source[start..end]` as a single literal, reporting positions
/// relative to the whole source
pub fn parse_range(source: &str, start: usize, end: usize) -> Result<Value, LiteralError> {
    let tokens = tokenize_range(source, start, end)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        end,
        depth: 0,
    };

    let value = parser.parse_value()?;
    if let Some(token) = parser.peek() {
        return Err(parser.error_at(format!("unexpected `{}` after literal", token.text), token));
    }

    Ok(value)
}

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token<'src>>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token<'src>, LiteralError> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(self.error_at_end("unexpected end of literal")),
        }
    }

    fn at_punct(&self, c: char) -> bool {
        self.peek().is_some_and(|t| t.is_punct(c))
    }

    fn expect_punct(&mut self, c: char) -> Result<(), LiteralError> {
        let token = self.next()?;
        if token.is_punct(c) {
            Ok(())
        } else {
            Err(self.error_at(format!("expected `{}`, found `{}`", c, token.text), &token))
        }
    }

    fn error_at(&self, message: impl Into<String>, token: &Token<'_>) -> LiteralError {
        LiteralError::syntax(message, Position::locate(self.source, token.start))
    }

    fn error_at_end(&self, message: impl Into<String>) -> LiteralError {
        LiteralError::syntax(message, Position::locate(self.source, self.end))
    }

    fn parse_value(&mut self) -> Result<Value, LiteralError> {
        let token = self.next()?;

        match &token.kind {
            TokenKind::Str(s) => self.parse_concatenation(s.clone()),
            TokenKind::Template {
                cooked,
                substitutions: false,
            } => self.parse_concatenation(cooked.clone()),
            TokenKind::Template { .. } => {
                Err(self.error_at("template substitutions are not supported", &token))
            }
            TokenKind::Number => Ok(Value::Number(token.text.to_string())),
            TokenKind::Punct('-') if self.peek().is_some_and(|t| t.kind == TokenKind::Number) => {
                let number = self.next()?;
                Ok(Value::Number(format!("-{}", number.text)))
            }
            TokenKind::Punct('{' | '[' | '(') => self.parse_nested(&token),
            TokenKind::Ident => match token.text {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                "undefined" => Ok(Value::Undefined),
                other => Err(self.error_at(
                    format!(
                        "unsupported expression `{}`: only data literals are accepted",
                        other
                    ),
                    &token,
                )),
            },
            _ => Err(self.error_at(format!("unexpected `{}`", token.text), &token)),
        }
    }

    /// Object, array or parenthesized value opened by `open`
    fn parse_nested(&mut self, open: &Token<'src>) -> Result<Value, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_at("literal is nested too deeply", open));
        }

        self.depth += 1;
        let value = match open.kind {
            TokenKind::Punct('{') => self.parse_object(),
            TokenKind::Punct('[') => self.parse_array(),
            _ => self
                .parse_value()
                .and_then(|value| self.expect_punct(')').map(|_| value)),
        };
        self.depth -= 1;

        value
    }

    /// String literals joined with `+`
    fn parse_concatenation(&mut self, mut value: String) -> Result<Value, LiteralError> {
        while self.at_punct('+') {
            self.pos += 1;
            let token = self.next()?;
            match &token.kind {
                TokenKind::Str(s)
                | TokenKind::Template {
                    cooked: s,
                    substitutions: false,
                } => value.push_str(s),
                _ => {
                    return Err(self.error_at(
                        format!("only string literals can be concatenated, found `{}`", token.text),
                        &token,
                    ))
                }
            }
        }
        Ok(Value::Str(value))
    }

    fn parse_object(&mut self) -> Result<Value, LiteralError> {
        let mut members = Vec::new();

        loop {
            if self.at_punct('}') {
                self.pos += 1;
                break;
            }

            if self.at_punct('.') {
                let token = self.next()?;
                return Err(self.error_at("spread properties are not supported", &token));
            }

            let key = self.parse_key()?;

            match self.peek().cloned() {
                Some(t) if t.is_punct(':') => self.pos += 1,
                Some(t) if t.is_punct(',') || t.is_punct('}') => {
                    return Err(
                        self.error_at(format!("shorthand property `{}` is not supported", key), &t)
                    );
                }
                Some(t) if t.is_punct('(') || t.kind == TokenKind::Ident => {
                    return Err(self.error_at(format!("method `{}` is not supported", key), &t));
                }
                Some(t) => {
                    return Err(self.error_at(format!("expected `:`, found `{}`", t.text), &t));
                }
                None => return Err(self.error_at_end("unexpected end of literal")),
            }

            let value = self.parse_value()?;
            members.push((key, value));

            let token = self.next()?;
            if token.is_punct('}') {
                break;
            }
            if !token.is_punct(',') {
                return Err(self.error_at(
                    format!("expected `,` or `}}`, found `{}`", token.text),
                    &token,
                ));
            }
        }

        Ok(Value::Object(members))
    }

    fn parse_key(&mut self) -> Result<String, LiteralError> {
        let token = self.next()?;

        match &token.kind {
            TokenKind::Ident => Ok(token.text.to_string()),
            TokenKind::Str(s) => Ok(s.clone()),
            TokenKind::Number => Ok(canonical_number_key(token.text)),
            TokenKind::Punct('[') => {
                let inner = self.next()?;
                let key = match &inner.kind {
                    TokenKind::Str(s)
                    | TokenKind::Template {
                        cooked: s,
                        substitutions: false,
                    } => s.clone(),
                    _ => {
                        return Err(self.error_at(
                            "computed keys must be string literals",
                            &inner,
                        ))
                    }
                };
                self.expect_punct(']')?;
                Ok(key)
            }
            _ => Err(self.error_at(format!("invalid property key `{}`", token.text), &token)),
        }
    }

    fn parse_array(&mut self) -> Result<Value, LiteralError> {
        let mut items = Vec::new();

        loop {
            if self.at_punct(']') {
                self.pos += 1;
                break;
            }
            if let Some(t) = self.peek().filter(|t| t.is_punct(',')) {
                return Err(self.error_at("array holes are not supported", t));
            }

            items.push(self.parse_value()?);

            let token = self.next()?;
            if token.is_punct(']') {
                break;
            }
            if !token.is_punct(',') {
                return Err(self.error_at(
                    format!("expected `,` or `]`, found `{}`", token.text),
                    &token,
                ));
            }
        }

        Ok(Value::Array(items))
    }
}

/// Numeric keys become the string form of their value (`0x10` -> `16`)
fn canonical_number_key(text: &str) -> String {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();

    let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find(|(prefix, _)| lower.starts_with(prefix));

    let parsed = match radix {
        Some((prefix, radix)) => u64::from_str_radix(&lower[prefix.len()..], radix)
            .ok()
            .map(|n| n.to_string()),
        None => lower
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(|n| n.to_string()),
    };

    parsed.unwrap_or(digits)
}
