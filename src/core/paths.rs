//! Path utilities
//!
//! Source dialect detection and display normalization for the active file.

use std::path::Path;

/// The two source dialects a symbol map can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDialect {
    TypeScript,
    JavaScript,
}

impl SourceDialect {
    /// Detect the dialect from the path suffix (`.ts` or `.js`, case-sensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.len() > 3 && name.ends_with(".ts") {
            Some(SourceDialect::TypeScript)
        } else if name.len() > 3 && name.ends_with(".js") {
            Some(SourceDialect::JavaScript)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceDialect::TypeScript => "TypeScript",
            SourceDialect::JavaScript => "JavaScript",
        }
    }
}

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
