//! Data model for dependency annotations.
//!
//! This module contains the domain types the rest of the crate works on:
//! - `Token`: one row of a sentence (format-native ID, surface form, lemma)
//! - `Dependency`: a labeled arc between two token positions
//! - `Sentence`: the tokens plus two independently stored dependency layers
//!
//! A sentence comes in two variants. A tabular sentence only has the primary
//! layer (read from the head/relation columns). An annotated sentence wraps a
//! tabular one and adds a secondary layer parsed from trailing annotation lines.
//! Both are mutated in place through `add_dependency` / `remove_dependency`.

use std::io::{self, Write};

use thiserror::Error;

use crate::formats::conll::ConllSentence;
use crate::formats::procon::AnnotatedSentence;

/// A single token of a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Format-native identifier (e.g. "1", "2", ...)
    pub id: String,
    /// Surface form
    pub text: String,
    /// Lemma
    pub lemma: String,
}

impl Token {
    /// Creates a new token.
    pub fn new(id: impl Into<String>, text: impl Into<String>, lemma: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            lemma: lemma.into(),
        }
    }
}

/// Stable identity of one arc instance.
///
/// Two arcs with the same label and endpoints are still different instances
/// when their `ArcId`s differ, so removal never hits the wrong duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArcId {
    /// Primary-layer arc stored in the tabular row with this index
    Row(usize),
    /// Secondary-layer arc with this per-sentence serial number
    Annotation(u64),
}

/// A labeled, directed arc between two token positions.
///
/// Indices are 0-based positions into the owning sentence's tokens.
/// `head_index == dependent_index` marks a self-referential (effect) arc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub id: ArcId,
    pub name: String,
    pub head_index: usize,
    pub dependent_index: usize,
}

impl Dependency {
    /// Creates a new dependency.
    pub fn new(id: ArcId, name: impl Into<String>, head_index: usize, dependent_index: usize) -> Self {
        Self {
            id,
            name: name.into(),
            head_index,
            dependent_index,
        }
    }

    /// Distance between head and dependent in token positions.
    pub fn span(&self) -> usize {
        self.head_index.abs_diff(self.dependent_index)
    }

    /// Returns true for an arc whose head and dependent are the same token.
    pub fn is_self_referential(&self) -> bool {
        self.head_index == self.dependent_index
    }
}

/// Sorts arcs so that short ones end up nearest the token line.
///
/// Primary key is the span, ties are broken by dependent index. The sort is
/// stable, so arcs equal in both keys keep their storage order.
pub fn sort_for_display(deps: &mut [Dependency]) {
    deps.sort_by_key(|d| (d.span(), d.dependent_index));
}

/// Errors raised by sentence mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SentenceError {
    #[error("no token with ID {id}")]
    InvalidReference { id: String },

    #[error("relation '{label}' needs a dependent ID")]
    MissingDependent { label: String },

    #[error("dependency no longer exists in this sentence")]
    UnknownDependency,
}

/// Result type for sentence mutations.
pub type SentenceResult<T> = Result<T, SentenceError>;

/// One sentence, in either of the two supported variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Sentence {
    /// Plain tabular sentence
    Tabular(ConllSentence),
    /// Tabular sentence decorated with a secondary annotation layer
    Annotated(AnnotatedSentence),
}

impl Sentence {
    /// Returns the tokens in order.
    pub fn tokens(&self) -> Vec<Token> {
        match self {
            Sentence::Tabular(s) => s.tokens(),
            Sentence::Annotated(s) => s.tokens(),
        }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        match self {
            Sentence::Tabular(s) => s.len(),
            Sentence::Annotated(s) => s.conll().len(),
        }
    }

    /// Returns true if the sentence has no tokens.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arcs rendered below the token line, sorted for display.
    pub fn primary_dependencies(&self) -> Vec<Dependency> {
        match self {
            Sentence::Tabular(s) => s.primary_dependencies(),
            Sentence::Annotated(s) => s.primary_dependencies(),
        }
    }

    /// Arcs rendered above the token line, sorted for display.
    pub fn secondary_dependencies(&self) -> Vec<Dependency> {
        match self {
            Sentence::Tabular(_) => Vec::new(),
            Sentence::Annotated(s) => s.secondary_dependencies(),
        }
    }

    /// Inserts or overwrites an arc, addressed by format-native token IDs.
    ///
    /// On error the sentence is left untouched.
    pub fn add_dependency(&mut self, name: &str, head_id: &str, dependent_id: Option<&str>) -> SentenceResult<()> {
        match self {
            Sentence::Tabular(s) => s.add_dependency(name, head_id, dependent_id),
            Sentence::Annotated(s) => s.add_dependency(name, head_id, dependent_id),
        }
    }

    /// Removes the given arc instance.
    pub fn remove_dependency(&mut self, dep: &Dependency) -> SentenceResult<()> {
        match self {
            Sentence::Tabular(s) => s.remove_dependency(dep),
            Sentence::Annotated(s) => s.remove_dependency(dep),
        }
    }

    /// Serializes the sentence back to its native format.
    pub fn output<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Sentence::Tabular(s) => s.output(writer),
            Sentence::Annotated(s) => s.output(writer),
        }
    }

    /// Serializes the sentence into a string.
    pub fn to_native_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.output(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(id: u64, head: usize, dependent: usize) -> Dependency {
        Dependency::new(ArcId::Annotation(id), "x", head, dependent)
    }

    #[test]
    fn test_span_and_self_reference() {
        let d = dep(0, 4, 1);
        assert_eq!(d.span(), 3);
        assert!(!d.is_self_referential());
        assert!(dep(1, 2, 2).is_self_referential());
    }

    #[test]
    fn test_sort_by_span_then_dependent() {
        let mut deps = vec![dep(0, 0, 3), dep(1, 3, 2), dep(2, 1, 0), dep(3, 2, 2)];
        sort_for_display(&mut deps);
        let order: Vec<_> = deps.iter().map(|d| d.id).collect();
        assert_eq!(
            order,
            vec![
                ArcId::Annotation(3),
                ArcId::Annotation(2),
                ArcId::Annotation(1),
                ArcId::Annotation(0),
            ]
        );
    }

    #[test]
    fn test_sort_ignores_label_text() {
        let mut a = vec![dep(0, 0, 2), dep(1, 0, 1)];
        let mut b = a.clone();
        b[0].name = "a much longer label".to_string();
        sort_for_display(&mut a);
        sort_for_display(&mut b);
        let ids_a: Vec<_> = a.iter().map(|d| d.id).collect();
        let ids_b: Vec<_> = b.iter().map(|d| d.id).collect();
        assert_eq!(ids_a, ids_b);
    }
}
