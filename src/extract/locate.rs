//! Locating the default-exported object literal
//!
//! Two strategies:
//! - `Syntax` walks the token stream, so comments and strings never match
//!   and nested objects are captured whole. `export default name` is
//!   resolved to the module-level `const|let|var name = { ... }`.
//! - `Pattern` is the legacy non-greedy regex. It stops at the first `}`
//!   after `export default {`, so nested braces cut the literal short.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{LexError, Position};
use crate::extract::lexer::{Lexer, Token, TokenKind};

/// `export default {...}` up to the first closing brace, optional `;`
pub static EXPORT_DEFAULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+default\s+(\{[\s\S]*?\});?").expect("Invalid EXPORT_DEFAULT_RE regex")
});

/// How to find the literal in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocateStrategy {
    #[default]
    Syntax,
    Pattern,
}

impl std::str::FromStr for LocateStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "syntax" | "tokens" => Ok(LocateStrategy::Syntax),
            "pattern" | "regex" => Ok(LocateStrategy::Pattern),
            _ => Err(format!("Unknown locate strategy: {}", s)),
        }
    }
}

/// Byte range of the located literal, braces included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedLiteral<'src> {
    pub text: &'src str,
    pub start: usize,
    pub end: usize,
}

impl<'src> LocatedLiteral<'src> {
    fn new(src: &'src str, start: usize, end: usize) -> Self {
        Self {
            text: &src[start..end],
            start,
            end,
        }
    }
}

/// Find the first default-exported object literal in `src`
pub fn locate(src: &str, strategy: LocateStrategy) -> Result<Option<LocatedLiteral<'_>>, LexError> {
    match strategy {
        LocateStrategy::Syntax => locate_by_syntax(src),
        LocateStrategy::Pattern => Ok(locate_by_pattern(src)),
    }
}

fn locate_by_pattern(src: &str) -> Option<LocatedLiteral<'_>> {
    EXPORT_DEFAULT_RE
        .captures(src)
        .and_then(|caps| caps.get(1))
        .map(|m| LocatedLiteral::new(src, m.start(), m.end()))
}

fn locate_by_syntax(src: &str) -> Result<Option<LocatedLiteral<'_>>, LexError> {
    let mut stream = TokenStream::new(src);
    let mut i = 0;

    while stream.fill(i)? {
        let at_export = stream.depths[i] == 0 && stream.tokens[i].is_ident("export");
        if !at_export || !stream.get(i + 1)?.is_some_and(|t| t.is_ident("default")) {
            i += 1;
            continue;
        }

        let target = stream.skip_parens(i + 2)?;
        let Some(token) = stream.get(target)?.cloned() else {
            return Ok(None);
        };

        return if token.is_punct('{') {
            stream.balanced_literal(target).map(Some)
        } else if token.kind == TokenKind::Ident {
            // only declarations before the export can initialize it
            match find_declaration(&stream.tokens[..i], &stream.depths, token.text) {
                Some(open) => stream.balanced_literal(open).map(Some),
                None => Ok(None),
            }
        } else {
            // function, class, call expression, ...
            Ok(None)
        };
    }

    Ok(None)
}

/// Tokens pulled from the lexer on demand, with the brace depth before each
///
/// Lexing stops as soon as the literal is found, so code after the default
/// export is never tokenized.
struct TokenStream<'src> {
    src: &'src str,
    lexer: Lexer<'src>,
    tokens: Vec<Token<'src>>,
    depths: Vec<usize>,
    depth: usize,
}

impl<'src> TokenStream<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            src,
            lexer: Lexer::new(src),
            tokens: Vec::new(),
            depths: Vec::new(),
            depth: 0,
        }
    }

    /// Lex up to token `idx`; false when the input ends first
    fn fill(&mut self, idx: usize) -> Result<bool, LexError> {
        while self.tokens.len() <= idx {
            let Some(token) = self.lexer.next().transpose()? else {
                return Ok(false);
            };

            self.depths.push(self.depth);
            match token.kind {
                TokenKind::Punct('{') => self.depth += 1,
                TokenKind::Punct('}') => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
            self.tokens.push(token);
        }
        Ok(true)
    }

    fn get(&mut self, idx: usize) -> Result<Option<&Token<'src>>, LexError> {
        if self.fill(idx)? {
            Ok(self.tokens.get(idx))
        } else {
            Ok(None)
        }
    }

    fn skip_parens(&mut self, mut idx: usize) -> Result<usize, LexError> {
        while self.get(idx)?.is_some_and(|t| t.is_punct('(')) {
            idx += 1;
        }
        Ok(idx)
    }

    /// Span from the `{` at `open` to its matching `}`
    fn balanced_literal(&mut self, open: usize) -> Result<LocatedLiteral<'src>, LexError> {
        let src = self.src;
        let start = self.tokens[open].start;
        let mut depth = 0usize;
        let mut idx = open;

        while let Some(token) = self.get(idx)? {
            match token.kind {
                TokenKind::Punct('{') => depth += 1,
                TokenKind::Punct('}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(LocatedLiteral::new(src, start, token.end));
                    }
                }
                _ => {}
            }
            idx += 1;
        }

        Err(LexError::new(
            "unterminated object literal",
            Position::locate(src, start),
        ))
    }
}

fn skip_parens(tokens: &[Token<'_>], mut idx: usize) -> usize {
    while tokens.get(idx).is_some_and(|t| t.is_punct('(')) {
        idx += 1;
    }
    idx
}

/// Index of the `{` initializing module-level `const|let|var name`
fn find_declaration(tokens: &[Token<'_>], depths: &[usize], name: &str) -> Option<usize> {
    let declarations = tokens.iter().enumerate().filter(|(k, t)| {
        depths[*k] == 0 && (t.is_ident("const") || t.is_ident("let") || t.is_ident("var"))
    });

    for (k, _) in declarations {
        if !tokens.get(k + 1).is_some_and(|t| t.is_ident(name)) {
            continue;
        }

        // skip an optional type annotation up to `=`
        let mut depth = 0usize;
        let mut idx = k + 2;
        while let Some(token) = tokens.get(idx) {
            match token.kind {
                TokenKind::Punct('{') => depth += 1,
                TokenKind::Punct('}') => depth = depth.saturating_sub(1),
                TokenKind::Punct(';') if depth == 0 => break,
                TokenKind::Punct('=')
                    if depth == 0 && !tokens.get(idx + 1).is_some_and(|t| t.is_punct('>')) =>
                {
                    let open = skip_parens(tokens, idx + 1);
                    if tokens.get(open).is_some_and(|t| t.is_punct('{')) {
                        return Some(open);
                    }
                    break;
                }
                _ => {}
            }
            idx += 1;
        }
    }

    None
}
