//! Preview flow - active file to rendered gallery
//!
//! Steps:
//! 1. Resolve the active file and check its dialect (informational stops)
//! 2. Read the source text
//! 3. Extract the default-exported symbol map
//! 4. Render and hand the document to the display (stdout or a file)

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::core::error::PreviewError;
use crate::core::file_reader::{read_source, FileReadConfig};
use crate::core::model::SymbolMap;
use crate::core::paths::{normalize_path, SourceDialect};
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::core::util::show_info;
use crate::extract::extract_symbol_map;
use crate::extract::locate::LocateStrategy;

/// Prefix of every user-facing failure
const FAILURE_PREFIX: &str = "Error reading SVG map";

/// Options shared by the preview and extract commands
#[derive(Debug, Clone, Default)]
pub struct PreviewOptions {
    pub strategy: LocateStrategy,
    pub read: FileReadConfig,
    pub render: RenderConfig,
}

/// A rendered preview ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub title: String,
    pub format: OutputFormat,
    pub body: String,
}

/// Check that a file is active and is a supported source file
pub fn resolve_target(active_file: Option<&Path>) -> Result<(&Path, SourceDialect), PreviewError> {
    let path = active_file.ok_or(PreviewError::NoActiveTarget)?;
    let dialect = SourceDialect::from_path(path).ok_or_else(|| PreviewError::UnsupportedFileType {
        path: path.to_path_buf(),
    })?;
    Ok((path, dialect))
}

/// Steps 1-3: the symbol map of the active file
pub fn load_symbol_map(
    active_file: Option<&Path>,
    options: &PreviewOptions,
) -> Result<SymbolMap, PreviewError> {
    let (path, dialect) = resolve_target(active_file)?;
    debug!("{} source: {}", dialect.name(), normalize_path(path));

    let source = read_source(path, &options.read)?;
    extract_symbol_map(&source, options.strategy)
}

/// Steps 1-4 without displaying
pub fn build_preview(
    active_file: Option<&Path>,
    options: &PreviewOptions,
) -> Result<RenderedDocument, PreviewError> {
    let map = load_symbol_map(active_file, options)?;
    let body = Renderer::with_config(options.render.clone()).render(&map);

    Ok(RenderedDocument {
        title: options.render.title.clone(),
        format: options.render.format,
        body,
    })
}

/// Run the preview command
pub fn run_preview(
    active_file: Option<&Path>,
    output: Option<&Path>,
    options: &PreviewOptions,
) -> Result<()> {
    let document = match build_preview(active_file, options) {
        Ok(document) => document,
        Err(e) if e.is_informational() => {
            show_info(&e.to_string());
            return Ok(());
        }
        Err(e) => return Err(e).context(FAILURE_PREFIX),
    };

    info!("rendered \"{}\" as {:?}", document.title, document.format);
    display(&document.body, output)
}

/// Run the extract command: print the raw symbol map as JSON
pub fn run_extract(
    active_file: Option<&Path>,
    output: Option<&Path>,
    options: &PreviewOptions,
) -> Result<()> {
    let map = match load_symbol_map(active_file, options) {
        Ok(map) => map,
        Err(e) if e.is_informational() => {
            show_info(&e.to_string());
            return Ok(());
        }
        Err(e) => return Err(e).context(FAILURE_PREFIX),
    };

    let json = if options.render.pretty {
        serde_json::to_string_pretty(&map)
    } else {
        serde_json::to_string(&map)
    }
    .context("Failed to serialize symbol map")?;

    display(&json, output)
}

/// Write a document to the output file, or stdout when none is given
fn display(body: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, body)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("wrote {}", normalize_path(path));
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(body.as_bytes())?;
            if !body.ends_with('\n') {
                handle.write_all(b"\n")?;
            }
            handle.flush()?;
        }
    }
    Ok(())
}
