//! Tokenizer for the JavaScript/TypeScript subset the extractor needs
//!
//! The lexer understands enough of the language to never mistake the inside
//! of a string, template, comment or regular expression for code:
//! - identifiers and numbers
//! - `'`/`"` strings with escape decoding
//! - template literals, including nested `${ ... }` substitutions
//! - regular-expression literals (decided from the previous token)
//! - single-character punctuation
//!
//! Offsets in tokens and positions in errors are relative to the full source
//! text, even when only a range of it is tokenized.

use crate::core::error::{LexError, Position};

/// The kind of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    /// String literal with escapes decoded
    Str(String),
    /// Template literal; `cooked` only covers the literal text parts
    Template { cooked: String, substitutions: bool },
    Regex,
    Punct(char),
}

/// A token with its byte span in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == name
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }
}

/// Keywords after which a `/` starts a regular expression
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "instanceof",
    "in",
    "of",
    "new",
    "delete",
    "void",
    "throw",
    "case",
    "do",
    "else",
    "yield",
    "await",
];

/// Deepest `${ ... }` nesting accepted inside template literals
const MAX_TEMPLATE_DEPTH: usize = 64;

pub struct Lexer<'src> {
    src: &'src str,
    pos: usize,
    end: usize,
    regex_allowed: bool,
    /// Previous token when it was punctuation, with its end offset
    prev_punct: Option<(char, usize)>,
    /// `regex_allowed` as it was before the previous token
    prev_regex_allowed: bool,
    template_depth: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self::with_range(src, 0, src.len())
    }

    /// Tokenize only `src[start..end]`, keeping offsets absolute
    pub fn with_range(src: &'src str, start: usize, end: usize) -> Self {
        let end = end.min(src.len());
        Self {
            src,
            pos: start.min(end),
            end,
            regex_allowed: true,
            prev_punct: None,
            prev_regex_allowed: true,
            template_depth: 0,
        }
    }

    fn rest(&self) -> &'src str {
        &self.src[self.pos..self.end]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>, offset: usize) -> LexError {
        LexError::new(message, Position::locate(self.src, offset))
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        // hashbang line
        if self.pos == 0 && self.rest().starts_with("#!") {
            self.skip_line();
        }

        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                self.skip_line();
            } else if rest.starts_with("/*") {
                let start = self.pos;
                match rest[2..].find("*/") {
                    Some(idx) => self.pos += idx + 4,
                    None => return Err(self.error("unterminated block comment", start)),
                }
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn skip_line(&mut self) {
        match self.rest().find('\n') {
            Some(idx) => self.pos += idx + 1,
            None => self.pos = self.end,
        }
    }

    fn next_token(&mut self) -> Option<Result<Token<'src>, LexError>> {
        if let Err(e) = self.skip_trivia() {
            self.pos = self.end;
            return Some(Err(e));
        }

        let start = self.pos;
        let c = self.peek()?;

        let kind = match c {
            '"' | '\'' => self.lex_string(c),
            '`' => self.lex_template(),
            '/' if self.regex_allowed => self.lex_regex(),
            c if is_ident_start(c) => {
                self.lex_ident();
                Ok(TokenKind::Ident)
            }
            c if c.is_ascii_digit() => {
                self.lex_number();
                Ok(TokenKind::Number)
            }
            '.' if self.peek_second().is_some_and(|n| n.is_ascii_digit()) => {
                self.lex_number();
                Ok(TokenKind::Number)
            }
            _ => {
                self.bump();
                Ok(TokenKind::Punct(c))
            }
        };

        let kind = match kind {
            Ok(kind) => kind,
            Err(e) => {
                self.pos = self.end;
                return Some(Err(e));
            }
        };

        let text = &self.src[start..self.pos];
        let regex_allowed = match &kind {
            TokenKind::Ident => EXPRESSION_KEYWORDS.contains(&text),
            TokenKind::Punct(')' | ']' | '}') => false,
            TokenKind::Punct(c @ ('+' | '-')) => !self.is_postfix_update(*c, start),
            TokenKind::Punct(_) => true,
            _ => false,
        };
        self.prev_regex_allowed = self.regex_allowed;
        self.regex_allowed = regex_allowed;
        self.prev_punct = match kind {
            TokenKind::Punct(c) => Some((c, self.pos)),
            _ => None,
        };

        Some(Ok(Token {
            kind,
            text,
            start,
            end: self.pos,
        }))
    }

    /// `c` at `start` completes a postfix `++`/`--` after an operand
    fn is_postfix_update(&self, c: char, start: usize) -> bool {
        self.prev_punct == Some((c, start)) && !self.prev_regex_allowed
    }

    fn lex_ident(&mut self) {
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let is_hex = self.src[start..self.pos].starts_with("0x")
                || self.src[start..self.pos].starts_with("0X");
            let exponent_sign = (c == '+' || c == '-') && (prev == 'e' || prev == 'E') && !is_hex;
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                prev = c;
                self.bump();
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self, quote: char) -> Result<TokenKind, LexError> {
        let start = self.pos;
        self.bump();
        let mut cooked = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(self.error("unterminated string literal", start));
                }
                Some('\\') => self.lex_escape(&mut cooked)?,
                Some(c) if c == quote => return Ok(TokenKind::Str(cooked)),
                Some(c) => cooked.push(c),
            }
        }
    }

    fn lex_template(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        self.bump();
        let mut cooked = String::new();
        let mut substitutions = false;

        loop {
            match self.bump() {
                None => return Err(self.error("unterminated template literal", start)),
                Some('\\') => self.lex_escape(&mut cooked)?,
                Some('`') => {
                    return Ok(TokenKind::Template {
                        cooked,
                        substitutions,
                    })
                }
                Some('$') if self.peek() == Some('{') => {
                    self.bump();
                    substitutions = true;
                    if self.template_depth >= MAX_TEMPLATE_DEPTH {
                        return Err(self.error("template literal is nested too deeply", start));
                    }
                    self.template_depth += 1;
                    let skipped = self.skip_substitution(start);
                    self.template_depth -= 1;
                    skipped?;
                }
                Some(c) => cooked.push(c),
            }
        }
    }

    /// Consume tokens up to the `}` closing a template substitution
    fn skip_substitution(&mut self, template_start: usize) -> Result<(), LexError> {
        self.regex_allowed = true;
        let mut depth = 0usize;

        loop {
            match self.next_token() {
                None => return Err(self.error("unterminated template literal", template_start)),
                Some(Err(e)) => return Err(e),
                Some(Ok(tok)) => match tok.kind {
                    TokenKind::Punct('{') => depth += 1,
                    TokenKind::Punct('}') if depth == 0 => return Ok(()),
                    TokenKind::Punct('}') => depth -= 1,
                    _ => {}
                },
            }
        }
    }

    fn lex_regex(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        self.bump();
        let mut in_class = false;

        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(self.error("unterminated regular expression literal", start));
                }
                Some('\\') => {
                    self.bump();
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }

        // flags
        self.lex_ident();
        Ok(TokenKind::Regex)
    }

    /// Decode one escape sequence; the backslash is already consumed
    fn lex_escape(&mut self, out: &mut String) -> Result<(), LexError> {
        let escape_start = self.pos - 1;
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape sequence", escape_start));
        };

        match c {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !self.peek().is_some_and(|n| n.is_ascii_digit()) => out.push('\0'),
            // legacy octal escapes are a syntax error in modules
            '0'..='9' => return Err(self.error("invalid escape sequence", escape_start)),
            'x' => {
                let code = self.read_hex(2, escape_start)?;
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'u' => {
                let code = self.read_unicode_escape(escape_start)?;
                out.push(self.combine_surrogates(code, escape_start)?);
            }
            // line continuations
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }

        Ok(())
    }

    fn read_hex(&mut self, digits: usize, escape_start: usize) -> Result<u32, LexError> {
        let rest = self.rest();
        let hex = rest.get(..digits).filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()));
        match hex.and_then(|h| u32::from_str_radix(h, 16).ok()) {
            Some(code) => {
                self.pos += digits;
                Ok(code)
            }
            None => Err(self.error("invalid escape sequence", escape_start)),
        }
    }

    fn read_unicode_escape(&mut self, escape_start: usize) -> Result<u32, LexError> {
        if self.peek() != Some('{') {
            return self.read_hex(4, escape_start);
        }

        self.bump();
        let rest = self.rest();
        let close = rest
            .find('}')
            .ok_or_else(|| self.error("invalid escape sequence", escape_start))?;
        let hex = &rest[..close];
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error("invalid escape sequence", escape_start));
        }
        let code = u32::from_str_radix(hex, 16)
            .ok()
            .filter(|code| *code <= 0x10FFFF)
            .ok_or_else(|| self.error("invalid escape sequence", escape_start))?;
        self.pos += close + 1;
        Ok(code)
    }

    /// Join a `\uD83D\uDE00` style surrogate pair into one character
    fn combine_surrogates(&mut self, high: u32, escape_start: usize) -> Result<char, LexError> {
        if (0xD800..0xDC00).contains(&high) && self.rest().starts_with("\\u") {
            let checkpoint = self.pos;
            self.pos += 2;
            let low = self.read_unicode_escape(escape_start)?;
            if (0xDC00..0xE000).contains(&low) {
                let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                return Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            self.pos = checkpoint;
        }
        Ok(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize all of `src`
#[allow(dead_code)]
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(src).collect()
}

/// Tokenize `src[start..end]`
pub fn tokenize_range(src: &str, start: usize, end: usize) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::with_range(src, start, end).collect()
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(src: &str) -> Vec<&str> {
        tokenize(src).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            texts("export default { a: 'x' };"),
            vec!["export", "default", "{", "a", ":", "'x'", "}", ";"]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let src = "// export default { a }\n/* { } */ x";
        assert_eq!(texts(src), vec!["x"]);
    }

    #[test]
    fn test_hashbang_is_skipped() {
        assert_eq!(texts("#!/usr/bin/env node\nfoo"), vec!["foo"]);
    }

    #[test]
    fn test_string_escapes() {
        let toks = kinds(r#""a\n\"b\x41B\u{43}\\""#);
        assert_eq!(toks, vec![TokenKind::Str("a\n\"bABC\\".to_string())]);
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let toks = kinds(r"'\uD83D\uDE00'");
        assert_eq!(toks, vec![TokenKind::Str("😀".to_string())]);
    }

    #[test]
    fn test_line_continuation() {
        let toks = kinds("'ab\\\ncd'");
        assert_eq!(toks, vec![TokenKind::Str("abcd".to_string())]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("x = 'abc").unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
        assert_eq!(err.position, Position { line: 1, column: 5 });
    }

    #[test]
    fn test_newline_in_string_is_error() {
        assert!(tokenize("'ab\ncd'").is_err());
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = tokenize("a /* b").unwrap_err();
        assert_eq!(err.message, "unterminated block comment");
    }

    #[test]
    fn test_invalid_hex_escape() {
        let err = tokenize(r"'\xZZ'").unwrap_err();
        assert_eq!(err.message, "invalid escape sequence");
    }

    #[test]
    fn test_legacy_octal_escapes_are_rejected() {
        for src in [r"'\01'", r"'\1'", r"'\8'", r"`\07`"] {
            let err = tokenize(src).unwrap_err();
            assert_eq!(err.message, "invalid escape sequence", "{}", src);
        }
        assert_eq!(kinds(r"'\0'"), vec![TokenKind::Str("\0".to_string())]);
    }

    #[test]
    fn test_deeply_nested_templates_are_rejected() {
        let depth = MAX_TEMPLATE_DEPTH + 1;
        let src = format!("{}x{}", "`${".repeat(depth), "}`".repeat(depth));
        let err = tokenize(&src).unwrap_err();
        assert_eq!(err.message, "template literal is nested too deeply");

        let depth = MAX_TEMPLATE_DEPTH;
        let src = format!("{}x{}", "`${".repeat(depth), "}`".repeat(depth));
        assert_eq!(tokenize(&src).unwrap().len(), 1);
    }

    #[test]
    fn test_template_without_substitution() {
        assert_eq!(
            kinds("`a\\tb`"),
            vec![TokenKind::Template {
                cooked: "a\tb".to_string(),
                substitutions: false
            }]
        );
    }

    #[test]
    fn test_template_with_nested_braces() {
        let src = "`x${ {a: '}'}.a }y` z";
        let toks = tokenize(src).unwrap();
        assert_eq!(toks.len(), 2);
        assert_eq!(
            toks[0].kind,
            TokenKind::Template {
                cooked: "xy".to_string(),
                substitutions: true
            }
        );
        assert!(toks[1].is_ident("z"));
    }

    #[test]
    fn test_regex_literal_vs_division() {
        let toks = tokenize("a = /}{/g; b = c / d / e").unwrap();
        assert_eq!(toks[2].kind, TokenKind::Regex);
        assert_eq!(toks[2].text, "/}{/g");

        let slashes = toks.iter().filter(|t| t.is_punct('/')).count();
        assert_eq!(slashes, 2);
    }

    #[test]
    fn test_regex_with_slash_in_class() {
        let toks = tokenize("return /[/]x/.test(s)").unwrap();
        assert_eq!(toks[1].kind, TokenKind::Regex);
        assert_eq!(toks[1].text, "/[/]x/");
    }

    #[test]
    fn test_postfix_update_is_followed_by_division() {
        let toks = tokenize("const half = count++ / 2; x-- / y / z").unwrap();
        assert!(toks.iter().all(|t| t.kind != TokenKind::Regex));
        assert_eq!(toks.iter().filter(|t| t.is_punct('/')).count(), 3);
    }

    #[test]
    fn test_prefix_update_still_allows_regex() {
        let toks = tokenize("a = b + +/x/.source.length").unwrap();
        assert!(toks.iter().any(|t| t.kind == TokenKind::Regex));

        let toks = tokenize("++/x/.lastIndex").unwrap();
        assert_eq!(toks[2].kind, TokenKind::Regex);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            texts("1 2.5 .5 1e-3 0xFF 1_000"),
            vec!["1", "2.5", ".5", "1e-3", "0xFF", "1_000"]
        );
        assert!(kinds("0xE-1").contains(&TokenKind::Punct('-')));
    }

    #[test]
    fn test_unicode_identifiers() {
        let toks = tokenize("图标 $x _y").unwrap();
        assert!(toks.iter().all(|t| t.kind == TokenKind::Ident));
        assert_eq!(toks[0].text, "图标");
    }

    #[test]
    fn test_range_offsets_are_absolute() {
        let src = "const a = 1;\n{ b: 'c' }";
        let start = src.find('{').unwrap();
        let toks = tokenize_range(src, start, src.len()).unwrap();
        assert_eq!(toks[0].start, start);
        assert_eq!(toks[1].text, "b");
    }

    #[test]
    fn test_range_error_position_is_absolute() {
        let src = "line one\n{ b: 'c }";
        let start = src.find('{').unwrap();
        let err = tokenize_range(src, start, src.len()).unwrap_err();
        assert_eq!(err.position, Position { line: 2, column: 6 });
    }
}
