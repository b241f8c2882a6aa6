//! Annotated sentence codec.
//!
//! An annotated sentence is a tabular block directly followed by annotation
//! lines, one arc per line, up to the next blank line:
//! ```text
//! 1	Prices	price	...
//! 2	rose	rise	...
//! p1,2
//! peff2
//! ```
//!
//! Two line shapes are recognized:
//! - relation `<label><headID>,<dependentID>` with label `p` or `c`
//! - effect `<label><headID>` with label `peff`, `neff`, `pac` or `nac`
//!
//! Annotation arcs form the secondary layer (drawn above the tokens); the
//! tabular head/relation columns stay the primary layer.

use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::conll::{read_conll_sentence, ConllSentence};
use super::{FormatError, LineSource, ReadError, ReadResult};
use crate::model::{sort_for_display, ArcId, Dependency, SentenceError, SentenceResult, Token};

/// Labels of the relation shape.
pub const RELATION_LABELS: [&str; 2] = ["p", "c"];
/// Labels of the effect shape.
pub const EFFECT_LABELS: [&str; 4] = ["peff", "neff", "pac", "nac"];

fn relation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([pc])(\d+),(\d+)$").expect("valid relation pattern"))
}

fn effect_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([pn](?:eff|ac))(\d+)$").expect("valid effect pattern"))
}

/// Returns true if the label belongs to the annotation alphabet.
pub fn is_annotation_label(label: &str) -> bool {
    RELATION_LABELS.contains(&label) || EFFECT_LABELS.contains(&label)
}

/// One annotation line, kept with its format-native IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: String,
    pub head_id: String,
    /// `None` for the effect shape
    pub dependent_id: Option<String>,
}

impl Annotation {
    fn line(&self) -> String {
        match &self.dependent_id {
            Some(dependent_id) => format!("{}{},{}", self.name, self.head_id, dependent_id),
            None => format!("{}{}", self.name, self.head_id),
        }
    }
}

/// Matches one (trimmed) line against the two annotation shapes.
pub fn parse_annotation(line: &str) -> Option<Annotation> {
    if let Some(caps) = relation_regex().captures(line) {
        return Some(Annotation {
            name: caps[1].to_string(),
            head_id: caps[2].to_string(),
            dependent_id: Some(caps[3].to_string()),
        });
    }
    effect_regex().captures(line).map(|caps| Annotation {
        name: caps[1].to_string(),
        head_id: caps[2].to_string(),
        dependent_id: None,
    })
}

/// A tabular sentence plus its annotation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSentence {
    conll: ConllSentence,
    /// Annotations in file order, each with its instance key
    annotations: Vec<(u64, Annotation)>,
    next_key: u64,
}

/// Reads one annotated sentence.
///
/// The tabular reader stops at the first non-tabular line, which becomes the
/// first annotation line. An unrecognized line aborts the sentence; the
/// annotations matched before it are kept in the partial result.
pub fn read_procon_sentence<R: BufRead>(source: &mut LineSource<R>) -> ReadResult<AnnotatedSentence> {
    let (conll, mut pending) = match read_conll_sentence(source) {
        Ok(None) => return Ok(None),
        Ok(Some(conll)) => (conll, None),
        Err(ReadError {
            partial: Some(conll),
            error: FormatError::MalformedRecord { text, .. },
        }) if !conll.is_empty() => (conll, Some(text)),
        Err(err) => return Err(err.map(AnnotatedSentence::new)),
    };

    let mut sentence = AnnotatedSentence::new(conll);
    while let Some(line) = pending {
        let text = line.trim();
        if text.is_empty() {
            break;
        }
        match parse_annotation(text) {
            Some(annotation) => sentence.push(annotation),
            None => {
                let error = FormatError::UnrecognizedAnnotationLine {
                    line: source.line_no(),
                    text: text.to_string(),
                };
                return Err(ReadError::new(Some(sentence), error));
            }
        }
        pending = source.next_line()?;
    }

    Ok(Some(sentence))
}

impl AnnotatedSentence {
    /// Wraps a tabular sentence with an empty annotation layer.
    pub fn new(conll: ConllSentence) -> Self {
        Self {
            conll,
            annotations: Vec::new(),
            next_key: 0,
        }
    }

    /// The underlying tabular sentence.
    pub fn conll(&self) -> &ConllSentence {
        &self.conll
    }

    /// Annotations in storage order.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().map(|(_, a)| a)
    }

    fn push(&mut self, annotation: Annotation) {
        self.annotations.push((self.next_key, annotation));
        self.next_key += 1;
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.conll.tokens()
    }

    pub fn primary_dependencies(&self) -> Vec<Dependency> {
        self.conll.primary_dependencies()
    }

    /// Annotation arcs, sorted for display.
    ///
    /// An endpoint that names no token falls back to the other endpoint; an
    /// annotation with neither endpoint resolvable is not drawn.
    pub fn secondary_dependencies(&self) -> Vec<Dependency> {
        let mut deps: Vec<Dependency> = self
            .annotations
            .iter()
            .filter_map(|(key, a)| {
                let head = self.conll.resolve_index(&a.head_id);
                let dependent = match &a.dependent_id {
                    Some(id) => self.conll.resolve_index(id),
                    None => head,
                };
                let (head, dependent) = match (head, dependent) {
                    (Some(h), Some(d)) => (h, d),
                    (Some(h), None) => (h, h),
                    (None, Some(d)) => (d, d),
                    (None, None) => {
                        debug!(annotation = %a.line(), "annotation names no token, not drawn");
                        return None;
                    }
                };
                Some(Dependency::new(ArcId::Annotation(*key), a.name.as_str(), head, dependent))
            })
            .collect();
        sort_for_display(&mut deps);
        deps
    }

    fn check_id(&self, id: &str) -> SentenceResult<()> {
        if self.conll.tokens().iter().any(|t| t.id == id) {
            Ok(())
        } else {
            Err(SentenceError::InvalidReference { id: id.to_string() })
        }
    }

    /// Appends an annotation arc, or updates the tabular layer for labels
    /// outside the annotation alphabet.
    ///
    /// Effect labels only use `head_id`.
    pub fn add_dependency(&mut self, name: &str, head_id: &str, dependent_id: Option<&str>) -> SentenceResult<()> {
        if !is_annotation_label(name) {
            return self.conll.add_dependency(name, head_id, dependent_id);
        }
        let dependent_id = match dependent_id {
            _ if EFFECT_LABELS.contains(&name) => None,
            Some(id) => Some(id),
            None => {
                return Err(SentenceError::MissingDependent {
                    label: name.to_string(),
                })
            }
        };
        self.check_id(head_id)?;
        if let Some(id) = dependent_id {
            self.check_id(id)?;
        }
        self.push(Annotation {
            name: name.to_string(),
            head_id: head_id.to_string(),
            dependent_id: dependent_id.map(str::to_string),
        });
        Ok(())
    }

    /// Removes exactly the given arc instance.
    pub fn remove_dependency(&mut self, dep: &Dependency) -> SentenceResult<()> {
        match dep.id {
            ArcId::Row(_) => self.conll.remove_dependency(dep),
            ArcId::Annotation(key) => {
                let pos = self
                    .annotations
                    .iter()
                    .position(|(k, _)| *k == key)
                    .ok_or(SentenceError::UnknownDependency)?;
                self.annotations.remove(pos);
                Ok(())
            }
        }
    }

    pub fn output<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.conll.output(writer)?;
        for (_, annotation) in &self.annotations {
            writeln!(writer, "{}", annotation.line())?;
        }
        Ok(())
    }
}
