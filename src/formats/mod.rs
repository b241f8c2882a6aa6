//! Treebank file parsing and writing.
//!
//! Supports:
//! - Tabular sentences (.conll, .conllu, .conllx): blocks of tab-separated rows
//! - Annotated sentences (.procon): tabular blocks followed by annotation lines
//!
//! Format detection priority:
//! 1. Explicit format specification (-f option)
//! 2. File extension
//! 3. Content-based detection
//!
//! Parsing is lenient: a broken block is reported as a diagnostic together
//! with whatever was read before the problem, and reading resumes at the next
//! blank line. Only an unreadable or empty file, or a file yielding no
//! sentence at all, is an error for the caller.

pub mod conll;
pub mod procon;

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::model::Sentence;

/// Minimum number of tab-separated fields in a tabular row.
pub const MIN_FIELDS: usize = 10;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Conll,
    Procon,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Conll => write!(f, "CoNLL"),
            FileFormat::Procon => write!(f, "ProCon"),
        }
    }
}

/// Errors raised while reading one sentence.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Read error: {0}")]
    Io(#[from] io::Error),

    #[error("Line {line}: expected at least 10 tab-separated fields, found {fields}: '{text}'")]
    MalformedRecord { line: usize, fields: usize, text: String },

    #[error("Line {line}: unrecognized annotation '{text}'")]
    UnrecognizedAnnotationLine { line: usize, text: String },
}

/// A failed read, together with what was parsed before the failure.
#[derive(Debug)]
pub struct ReadError<T> {
    pub partial: Option<T>,
    pub error: FormatError,
}

impl<T> ReadError<T> {
    pub fn new(partial: Option<T>, error: FormatError) -> Self {
        Self { partial, error }
    }

    /// Converts the partial result, keeping the error.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ReadError<U> {
        ReadError {
            partial: self.partial.map(f),
            error: self.error,
        }
    }
}

impl<T> From<io::Error> for ReadError<T> {
    fn from(err: io::Error) -> Self {
        Self::new(None, FormatError::Io(err))
    }
}

/// Result of reading one sentence: `Ok(None)` is the end of input.
pub type ReadResult<T> = Result<Option<T>, ReadError<T>>;

/// Errors that can occur while loading a whole file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] io::Error),

    #[error("Empty file")]
    EmptyFile,

    #[error("No sentences found ({diagnostics} block(s) could not be parsed)")]
    NoSentences { diagnostics: usize },
}

/// Result type for loading operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Line terminator of a file, restored when writing it back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Reads lines one at a time, tracking the line number.
///
/// Line terminators (`\n`, `\r\n`) are stripped; everything else is kept so
/// that rows can be written back unchanged. The first terminator seen decides
/// the file's [`LineEnding`].
pub struct LineSource<R> {
    inner: R,
    line_no: usize,
    line_ending: Option<LineEnding>,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line_no: 0,
            line_ending: None,
        }
    }

    /// Returns the next line, or `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        if self.line_ending.is_none() && line.ends_with('\n') {
            self.line_ending = Some(if line.ends_with("\r\n") {
                LineEnding::CrLf
            } else {
                LineEnding::Lf
            });
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Terminator of the first terminated line read so far.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending.unwrap_or_default()
    }

    /// Number of the line most recently returned (1-based).
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Discards lines up to and including the next blank line.
    pub fn skip_block(&mut self) -> io::Result<()> {
        while let Some(line) = self.next_line()? {
            if line.trim().is_empty() {
                break;
            }
        }
        Ok(())
    }
}

/// Reads one sentence in the given format.
pub fn read_sentence<R: BufRead>(source: &mut LineSource<R>, format: FileFormat) -> ReadResult<Sentence> {
    match format {
        FileFormat::Conll => conll::read_conll_sentence(source)
            .map(|s| s.map(Sentence::Tabular))
            .map_err(|e| e.map(Sentence::Tabular)),
        FileFormat::Procon => procon::read_procon_sentence(source)
            .map(|s| s.map(Sentence::Annotated))
            .map_err(|e| e.map(Sentence::Annotated)),
    }
}

/// All sentences of one file plus the problems met while reading them.
#[derive(Debug)]
pub struct Document {
    pub sentences: Vec<Sentence>,
    pub format: FileFormat,
    pub diagnostics: Vec<FormatError>,
    pub path: Option<PathBuf>,
    pub line_ending: LineEnding,
}

impl Document {
    /// Returns the number of sentences.
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Short summary of the diagnostics for the status bar.
    pub fn diagnostics_summary(&self) -> Option<String> {
        let first = self.diagnostics.first()?;
        Some(format!("{} parse problem(s); first: {}", self.diagnostics.len(), first))
    }
}

/// Reads every sentence from a reader.
///
/// Partial sentences with at least one token are kept. I/O errors abort.
pub fn read_document<R: BufRead>(reader: R, format: FileFormat) -> ParseResult<Document> {
    let mut source = LineSource::new(reader);
    let mut sentences = Vec::new();
    let mut diagnostics = Vec::new();

    loop {
        match read_sentence(&mut source, format) {
            Ok(Some(sentence)) => sentences.push(sentence),
            Ok(None) => break,
            Err(ReadError { partial, error }) => match error {
                FormatError::Io(err) => return Err(ParseError::IoError(err)),
                error => {
                    warn!(%error, "sentence only partially read");
                    if let Some(sentence) = partial.filter(|s| !s.is_empty()) {
                        sentences.push(sentence);
                    }
                    diagnostics.push(error);
                    source.skip_block()?;
                }
            },
        }
    }

    if sentences.is_empty() {
        return Err(ParseError::NoSentences {
            diagnostics: diagnostics.len(),
        });
    }

    Ok(Document {
        sentences,
        format,
        diagnostics,
        path: None,
        line_ending: source.line_ending(),
    })
}

/// Parses a whole document held in memory.
pub fn parse_str(content: &str, format: FileFormat) -> ParseResult<Document> {
    read_document(content.as_bytes(), format)
}

/// Detects format from file extension.
pub fn detect_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FileFormat> {
    let ext = path.as_ref().extension().and_then(OsStr::to_str)?;
    match ext.to_lowercase().as_str() {
        "conll" | "conllu" | "conllx" => Some(FileFormat::Conll),
        "procon" => Some(FileFormat::Procon),
        _ => None,
    }
}

/// Detects the file format by examining the content.
///
/// A file is annotated if any non-tabular line matches the annotation grammar.
pub fn detect_format_from_content(content: &str) -> FileFormat {
    let annotated = content.lines().map(str::trim).any(|line| {
        !line.is_empty()
            && !line.starts_with('#')
            && line.split('\t').count() < MIN_FIELDS
            && procon::parse_annotation(line).is_some()
    });
    if annotated {
        FileFormat::Procon
    } else {
        FileFormat::Conll
    }
}

/// Parses a treebank file with optional format specification.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    forced_format: Option<FileFormat>,
) -> ParseResult<Document> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    if content.trim().is_empty() {
        return Err(ParseError::EmptyFile);
    }

    let format = forced_format
        .or_else(|| detect_format_from_extension(path))
        .unwrap_or_else(|| detect_format_from_content(&content));

    let mut document = parse_str(&content, format)?;
    document.path = Some(path.to_path_buf());
    info!(
        path = %path.display(),
        %format,
        sentences = document.sentence_count(),
        problems = document.diagnostics.len(),
        "loaded document"
    );
    Ok(document)
}

/// Parses a treebank file, automatically detecting the format.
pub fn parse_file<P: AsRef<Path>>(path: P) -> ParseResult<Document> {
    parse_file_with_options(path, None)
}

/// Writes sentences in their native format, each followed by a blank line.
///
/// Every line is terminated with `line_ending`.
pub fn write_document<W: Write>(sentences: &[Sentence], line_ending: LineEnding, writer: &mut W) -> io::Result<()> {
    let mut buffer = Vec::new();
    for sentence in sentences {
        buffer.clear();
        sentence.output(&mut buffer)?;
        writeln!(buffer)?;
        for line in buffer.split_inclusive(|&b| b == b'\n') {
            match line.strip_suffix(b"\n") {
                Some(body) => {
                    writer.write_all(body)?;
                    writer.write_all(line_ending.as_str().as_bytes())?;
                }
                None => writer.write_all(line)?,
            }
        }
    }
    Ok(())
}

/// Writes sentences to a file, replacing its content.
pub fn write_file<P: AsRef<Path>>(sentences: &[Sentence], line_ending: LineEnding, path: P) -> io::Result<()> {
    let mut writer = io::BufWriter::new(File::create(path)?);
    write_document(sentences, line_ending, &mut writer)?;
    writer.flush()
}
