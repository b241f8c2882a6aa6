//! deptui - Terminal Dependency Annotation Viewer
//!
//! ## Usage
//!
//! ```bash
//! deptui <treebank_file>
//! deptui -f procon <treebank_file>          # Force format
//! deptui -o - <treebank_file>               # Re-serialize to stdout
//! ```
//!
//! ## Supported Formats
//!
//! - Tabular (.conll, .conllu, .conllx)
//! - Annotated (.procon)
//!
//! ## Keys
//!
//! - `h/j/k/l`: Scroll
//! - `n/p`: Next/previous sentence
//! - click: Select, `a`: Add, `d`: Remove
//! - `:w`: Write, `:q`: Quit, `?`: Help

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use deptui::controller::run_app;
use deptui::formats::{parse_file_with_options, write_document, write_file, Document, FileFormat};
use deptui::layout::{LayoutOptions, DEFAULT_SPACING};
use deptui::logging;
use deptui::state::AppState;
use deptui::ui::glyphs;

/// Runs CLI mode: write every parsed sentence back out in its native format.
fn run_cli_mode(document: &Document, output: &str) -> Result<()> {
    if output == "-" {
        // Write to stdout
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_document(&document.sentences, document.line_ending, &mut handle)?;
        handle.flush()?;
    } else {
        // Write to file
        write_file(&document.sentences, document.line_ending, output)
            .with_context(|| format!("Cannot write {}", output))?;
        eprintln!("Wrote {} sentences to {}", document.sentence_count(), output);
    }
    Ok(())
}

/// File format specification for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Tabular format (CoNLL-U style)
    Conll,
    /// Tabular format with annotation lines
    Procon,
    /// Auto-detect from extension and content
    Auto,
}

impl From<FormatArg> for Option<FileFormat> {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Conll => Some(FileFormat::Conll),
            FormatArg::Procon => Some(FileFormat::Procon),
            FormatArg::Auto => None,
        }
    }
}

/// deptui - A terminal viewer and editor for dependency annotations
///
/// When run without -o/--output, opens an interactive TUI viewer.
/// With -o/--output, runs in CLI mode and writes output to file (or stdout with "-").
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Treebank file to display (CoNLL or ProCon format)
    file: PathBuf,

    /// Force a specific file format (overrides auto-detection)
    #[arg(short = 'f', long = "format", value_enum, default_value = "auto")]
    format: FormatArg,

    /// Output file (enables CLI mode). Use "-" for stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Blank cells between neighbouring tokens
    #[arg(short = 's', long = "spacing", default_value_t = DEFAULT_SPACING)]
    spacing: usize,

    /// Draw arcs with ASCII characters instead of box-drawing characters
    #[arg(long = "ascii")]
    ascii: bool,

    /// Directory for the log file (default: <temp dir>/deptui)
    #[arg(long = "log-dir")]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _logging = logging::init(args.log_dir.clone());

    let forced_format: Option<FileFormat> = args.format.into();
    let document = parse_file_with_options(&args.file, forced_format)
        .with_context(|| format!("Cannot load {}", args.file.display()))?;

    if let Some(output) = args.output {
        // CLI mode: output to file/stdout
        for problem in &document.diagnostics {
            eprintln!("warning: {}", problem);
        }
        run_cli_mode(&document, &output)?;
    } else {
        let options = LayoutOptions { spacing: args.spacing };
        let state = AppState::new(document, options, glyphs::select(!args.ascii));
        run_app(state)?;
    }

    Ok(())
}
