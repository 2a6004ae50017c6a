//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::file_reader::FileReadConfig;
use crate::core::render::{OutputFormat, RenderConfig, DEFAULT_TITLE};
use crate::flows::preview::PreviewOptions;

/// svgview - preview the default-exported SVG map of a TypeScript/JavaScript file.
#[derive(Parser, Debug)]
#[command(name = "svgview")]
#[command(
    author,
    version,
    about,
    long_about = r#"svgview reads a TypeScript or JavaScript file whose default export is an
object literal mapping symbol names to image URLs, and renders the mapping as
a gallery of labeled image tiles.

The literal is parsed as data; nothing in the file is executed.

Output formats:
- html: a self-contained gallery document (default)
- json: a single JSON array of {name, url, src} tiles
- jsonl: one tile object per line
- md: a Markdown table with image links

Examples:
    svgview preview src/icons.ts > preview.html
    svgview preview src/icons.js --output preview.html --title "Icons"
    svgview --format md preview src/icons.ts
    svgview extract src/icons.ts --pretty
"#
)]
pub struct Cli {
    /// Output format (html/json/jsonl/md).
    #[arg(
        long,
        global = true,
        env = "SVGVIEW_FORMAT",
        default_value = "html",
        value_name = "FORMAT",
        long_help = "Select the output format of the preview.\n\n\
Supported values:\n\
- html (default)\n\
- json\n\
- jsonl\n\
- md (markdown)\n\n\
Unknown values fall back to html. The extract command always prints JSON."
    )]
    pub format: String,

    /// How to locate the default export (syntax/pattern).
    #[arg(
        long,
        global = true,
        env = "SVGVIEW_LOCATE",
        default_value = "syntax",
        value_name = "STRATEGY",
        long_help = "Select how the default-exported object literal is located.\n\n\
Supported values:\n\
- syntax (default): tokenize the file; comments and strings never match,\n\
  nested objects are captured whole and `export default name` is resolved\n\
- pattern: the legacy regular expression, which stops at the first `}`"
    )]
    pub locate: String,

    /// Maximum source file size in bytes.
    #[arg(
        long,
        global = true,
        default_value_t = crate::core::file_reader::DEFAULT_MAX_FILE_SIZE,
        value_name = "BYTES"
    )]
    pub max_file_size: u64,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (errors only).
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        long_help = "Only log errors. The rendered document and user-facing messages are still\n\
printed."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log each pipeline step to stderr. RUST_LOG overrides this when set."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on html/md formats."
    )]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the active file's symbol map as a gallery.
    #[command(
        long_about = "Read the active file, extract its default-exported symbol map and render\n\
one tile per entry. Protocol-relative URLs (//host/...) are given an https: scheme;\n\
other values are used as written.\n\n\
If no file is given and SVGVIEW_ACTIVE_FILE is unset, or the file is not a .ts/.js\n\
source, an informational message is printed and nothing is read.\n\n\
Examples:\n\
  svgview preview src/icons.ts\n\
  svgview preview src/icons.ts --output preview.html\n"
    )]
    Preview {
        /// Active file (TypeScript or JavaScript).
        #[arg(value_name = "FILE", env = "SVGVIEW_ACTIVE_FILE")]
        file: Option<PathBuf>,

        /// Write the document to a file instead of stdout.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Document title.
        #[arg(long, default_value = DEFAULT_TITLE, value_name = "TITLE")]
        title: String,
    },

    /// Print the raw symbol map as JSON.
    #[command(
        long_about = "Extract the default-exported symbol map and print it as a JSON object,\n\
in source order, with values exactly as written (no URL rewriting).\n\n\
Example:\n\
  svgview extract src/icons.ts --pretty\n"
    )]
    Extract {
        /// Active file (TypeScript or JavaScript).
        #[arg(value_name = "FILE", env = "SVGVIEW_ACTIVE_FILE")]
        file: Option<PathBuf>,

        /// Write the JSON to a file instead of stdout.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Log level implied by -q / -v
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }

    fn preview_options(&self, title: Option<&str>) -> PreviewOptions {
        let format: OutputFormat = self.format.parse().unwrap_or_default();
        let mut render = RenderConfig::with_pretty(format, self.pretty);
        if let Some(title) = title {
            render = render.with_title(title);
        }

        PreviewOptions {
            strategy: self.locate.parse().unwrap_or_default(),
            read: FileReadConfig {
                max_file_size: self.max_file_size,
            },
            render,
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        crate::core::util::disable_color();
    }

    match &cli.command {
        Commands::Preview {
            file,
            output,
            title,
        } => {
            let options = cli.preview_options(Some(title.as_str()));
            crate::flows::preview::run_preview(file.as_deref(), output.as_deref(), &options)
        }

        Commands::Extract { file, output } => {
            let options = cli.preview_options(None);
            crate::flows::preview::run_extract(file.as_deref(), output.as_deref(), &options)
        }
    }
}
