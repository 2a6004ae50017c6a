//! Error types for the preview pipeline

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A 1-indexed line/column location in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Compute the position of a byte offset within `text`
    pub fn locate(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text[..floor_char_boundary(text, offset)];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Tokenizer failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at {position}")]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl LexError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Failure to turn located literal text into a symbol map
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("{message} at {position}")]
    Syntax { message: String, position: Position },

    #[error("default export is not an object literal")]
    NotAnObject,

    #[error("value for `{key}` is not a string")]
    NonStringValue { key: String },
}

impl LiteralError {
    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        LiteralError::Syntax {
            message: message.into(),
            position,
        }
    }
}

/// Every way a preview invocation can stop
#[derive(Error, Debug)]
pub enum PreviewError {
    /// No file is active in the host
    #[error("No active editor found.")]
    NoActiveTarget,

    /// The active file is not a TypeScript or JavaScript source
    #[error("Please open a TypeScript or JavaScript file containing the SVG object.")]
    UnsupportedFileType { path: PathBuf },

    /// No default-exported object literal could be located
    #[error("No object found exported as default in the file.")]
    Extraction,

    /// The located literal is malformed or not a string map
    #[error("{0}")]
    Evaluation(#[from] LiteralError),

    /// The source file could not be read
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PreviewError {
    /// Informational outcomes halt the pipeline without counting as failures
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            PreviewError::NoActiveTarget | PreviewError::UnsupportedFileType { .. }
        )
    }
}

impl From<LexError> for PreviewError {
    fn from(err: LexError) -> Self {
        PreviewError::Evaluation(LiteralError::Lex(err))
    }
}
