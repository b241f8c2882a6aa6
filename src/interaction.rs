//! Pointer hit-testing and the edit protocol.
//!
//! - `hit_test`: finds the drawable under a canvas cell (legs, then labels, then brackets)
//! - `AddCommand`: the `LABEL HEAD [DEPENDENT]` prompt grammar
//! - `Command`: the `:` command-line grammar
//! - `add_dependency` / `remove_selected`: sentence mutations driven by the UI
//!
//! Callers rebuild the diagram and drop the selection after every successful
//! mutation; drawable indices are only valid for the diagram they came from.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::layout::{Diagram, Target};
use crate::model::{Dependency, Sentence, SentenceError};

/// Errors reported to the user by edit operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error(transparent)]
    Sentence(#[from] SentenceError),

    #[error("Nothing selected")]
    NothingSelected,

    #[error("Selection is not a dependency")]
    NotADependency,

    #[error("Expected LABEL HEAD [DEPENDENT], got '{0}'")]
    BadAddCommand(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Result type for edit operations.
pub type EditResult<T> = Result<T, EditError>;

/// Index of the topmost drawable covering the canvas cell.
///
/// Higher z wins; among equal z the drawable listed last wins. A bracket's
/// legs cover their cells above any label, the same way they are painted.
pub fn hit_test(diagram: &Diagram, x: usize, y: usize) -> Option<usize> {
    diagram
        .drawables
        .iter()
        .enumerate()
        .filter_map(|(idx, d)| d.z_at(x, y).map(|z| (idx, z)))
        .max_by_key(|&(_, z)| z)
        .map(|(idx, _)| idx)
}

/// Arguments of an add-dependency request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCommand {
    pub label: String,
    pub head_id: String,
    pub dependent_id: Option<String>,
}

fn add_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\S+)\s+(\S+)(?:\s+(\S+))?\s*$").expect("valid add pattern"))
}

impl AddCommand {
    /// Parses `LABEL HEAD [DEPENDENT]`.
    pub fn parse(text: &str) -> EditResult<Self> {
        let caps = add_regex()
            .captures(text)
            .ok_or_else(|| EditError::BadAddCommand(text.trim().to_string()))?;
        Ok(Self {
            label: caps[1].to_string(),
            head_id: caps[2].to_string(),
            dependent_id: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }
}

/// A command typed after `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit { force: bool },
    Write(Option<PathBuf>),
    WriteQuit,
    NextSentence,
    PreviousSentence,
    /// 1-based sentence number
    GotoSentence(usize),
    Help,
    Add(AddCommand),
    Remove,
}

impl Command {
    pub fn parse(text: &str) -> EditResult<Self> {
        let text = text.trim();
        let (name, rest) = match text.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (text, ""),
        };
        let command = match (name, rest.is_empty()) {
            ("q" | "quit", true) => Command::Quit { force: false },
            ("q!" | "quit!", true) => Command::Quit { force: true },
            ("w" | "write", true) => Command::Write(None),
            ("w" | "write", false) => Command::Write(Some(PathBuf::from(rest))),
            ("wq" | "x", true) => Command::WriteQuit,
            ("n" | "next", true) => Command::NextSentence,
            ("p" | "prev", true) => Command::PreviousSentence,
            ("h" | "help", true) => Command::Help,
            ("a" | "add", false) => Command::Add(AddCommand::parse(rest)?),
            ("d" | "rm" | "delete", true) => Command::Remove,
            _ => match text.parse::<usize>() {
                Ok(n) => Command::GotoSentence(n),
                Err(_) => return Err(EditError::UnknownCommand(text.to_string())),
            },
        };
        Ok(command)
    }
}

/// Applies an add request; the sentence is untouched on error.
pub fn add_dependency(sentence: &mut Sentence, cmd: &AddCommand) -> EditResult<()> {
    sentence.add_dependency(&cmd.label, &cmd.head_id, cmd.dependent_id.as_deref())?;
    Ok(())
}

/// Removes the dependency behind the selected drawable.
pub fn remove_selected(sentence: &mut Sentence, diagram: &Diagram, selection: Option<usize>) -> EditResult<Dependency> {
    let drawable = selection
        .and_then(|idx| diagram.get(idx))
        .ok_or(EditError::NothingSelected)?;
    let dep = drawable.dependency().ok_or(EditError::NotADependency)?.clone();
    sentence.remove_dependency(&dep)?;
    Ok(dep)
}

/// One-line description of a selected drawable for the status bar.
pub fn describe(sentence: &Sentence, diagram: &Diagram, selection: usize) -> Option<String> {
    let tokens = sentence.tokens();
    let name = |index: usize| {
        tokens
            .get(index)
            .map(|t| format!("{}({})", t.text, t.id))
            .unwrap_or_else(|| "?".to_string())
    };
    let text = match diagram.get(selection)?.target.as_ref()? {
        Target::Token(index) => {
            let token = tokens.get(*index)?;
            format!("Token {} '{}' (lemma '{}')", token.id, token.text, token.lemma)
        }
        Target::Dependency(dep) if dep.is_self_referential() => {
            format!("{} on {}", dep.name, name(dep.head_index))
        }
        Target::Dependency(dep) => {
            format!("{}: {} -> {}", dep.name, name(dep.head_index), name(dep.dependent_index))
        }
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{parse_str, FileFormat};
    use crate::layout::{DrawableKind, LayoutOptions, BRACKET_Z, LABEL_Z};

    const CAT: &str = "\
1\tThe\tthe\t_\t_\t_\t2\tdet\t_\t_
2\tcat\tcat\t_\t_\t_\t3\tnsubj\t_\t_
3\tsat\tsit\t_\t_\t_\t0\troot\t_\t_
p2,3
p2,3
";

    fn sentence() -> Sentence {
        parse_str(CAT, FileFormat::Procon).unwrap().sentences.remove(0)
    }

    fn layout(sentence: &Sentence) -> Diagram {
        Diagram::build(sentence, LayoutOptions::default())
    }

    fn find(diagram: &Diagram, pred: impl Fn(&crate::layout::Drawable) -> bool) -> usize {
        diagram.drawables.iter().position(pred).unwrap()
    }

    #[test]
    fn test_hit_test_prefers_labels() {
        let s = sentence();
        let diagram = layout(&s);
        let label = find(&diagram, |d| {
            matches!(&d.kind, DrawableKind::Label { text, .. } if text == "nsubj")
        });
        let rect = diagram.drawables[label].rect;
        let hit = hit_test(&diagram, rect.x, rect.y).unwrap();
        assert_eq!(hit, label);
        assert_eq!(diagram.drawables[hit].z, LABEL_Z);

        // a corner cell only belongs to the bracket
        let bracket = find(&diagram, |d| {
            d.z == BRACKET_Z && d.dependency().map(|dep| dep.name.as_str()) == Some("nsubj")
        });
        let rect = diagram.drawables[bracket].rect;
        assert_eq!(hit_test(&diagram, rect.x, rect.y), Some(bracket));
    }

    #[test]
    fn test_hit_test_selects_bracket_by_its_leg() {
        let s = sentence();
        let diagram = layout(&s);
        // nsubj runs in the second lane below; its dependent leg crosses det's corner
        let nsubj = find(&diagram, |d| {
            d.z == BRACKET_Z && d.dependency().map(|dep| dep.name.as_str()) == Some("nsubj")
        });
        let det = find(&diagram, |d| {
            d.z == BRACKET_Z && d.dependency().map(|dep| dep.name.as_str()) == Some("det")
        });
        let first_lane = diagram.id_row + 1;
        assert!(diagram.drawables[det].rect.contains(7, first_lane));
        assert_eq!(diagram.drawables[nsubj].rect.y, first_lane + 1);
        assert_eq!(hit_test(&diagram, 7, first_lane), Some(nsubj));
        // elsewhere on det's row the det bracket is still hit
        assert_eq!(hit_test(&diagram, 6, first_lane), Some(det));
    }

    #[test]
    fn test_hit_test_tokens_and_empty_cells() {
        let s = sentence();
        let diagram = layout(&s);
        let hit = hit_test(&diagram, 7, diagram.text_row).unwrap();
        assert_eq!(diagram.drawables[hit].target, Some(Target::Token(1)));
        assert_eq!(hit_test(&diagram, 4, diagram.text_row), None);
        assert_eq!(hit_test(&diagram, 500, 500), None);
    }

    #[test]
    fn test_add_command_grammar() {
        assert_eq!(
            AddCommand::parse(" obj 3 1 ").unwrap(),
            AddCommand {
                label: "obj".to_string(),
                head_id: "3".to_string(),
                dependent_id: Some("1".to_string()),
            }
        );
        assert_eq!(AddCommand::parse("peff 2").unwrap().dependent_id, None);
        assert!(matches!(AddCommand::parse("obj"), Err(EditError::BadAddCommand(_))));
        assert!(AddCommand::parse("a b c d").is_err());
    }

    #[test]
    fn test_command_grammar() {
        assert_eq!(Command::parse("q").unwrap(), Command::Quit { force: false });
        assert_eq!(Command::parse("q!").unwrap(), Command::Quit { force: true });
        assert_eq!(Command::parse("w").unwrap(), Command::Write(None));
        assert_eq!(
            Command::parse("w out.conllu").unwrap(),
            Command::Write(Some(PathBuf::from("out.conllu")))
        );
        assert_eq!(Command::parse("12").unwrap(), Command::GotoSentence(12));
        assert!(matches!(Command::parse("add c 1 2").unwrap(), Command::Add(_)));
        assert!(matches!(Command::parse("frobnicate"), Err(EditError::UnknownCommand(_))));
    }

    #[test]
    fn test_add_with_bad_reference_leaves_sentence() {
        let mut s = sentence();
        let before = s.clone();
        let cmd = AddCommand::parse("obj 9 1").unwrap();
        assert_eq!(
            add_dependency(&mut s, &cmd),
            Err(EditError::Sentence(SentenceError::InvalidReference { id: "9".to_string() }))
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_remove_selected_dependency() {
        let mut s = sentence();
        let diagram = layout(&s);
        let above: Vec<usize> = diagram
            .drawables
            .iter()
            .enumerate()
            .filter(|(_, d)| d.z == BRACKET_Z && d.dependency().is_some_and(|dep| dep.name == "p"))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(above.len(), 2);

        let removed = remove_selected(&mut s, &diagram, Some(above[1])).unwrap();
        assert_eq!(s.secondary_dependencies().len(), 1);
        assert_ne!(s.secondary_dependencies()[0], removed);
    }

    #[test]
    fn test_remove_without_dependency_selection() {
        let mut s = sentence();
        let diagram = layout(&s);
        assert_eq!(remove_selected(&mut s, &diagram, None), Err(EditError::NothingSelected));

        let token = find(&diagram, |d| d.target == Some(Target::Token(0)));
        assert_eq!(
            remove_selected(&mut s, &diagram, Some(token)),
            Err(EditError::NotADependency)
        );
    }

    #[test]
    fn test_describe_selection() {
        let s = sentence();
        let diagram = layout(&s);
        let token = find(&diagram, |d| d.target == Some(Target::Token(1)));
        assert_eq!(describe(&s, &diagram, token).unwrap(), "Token 2 'cat' (lemma 'cat')");

        let nsubj = find(&diagram, |d| d.dependency().is_some_and(|dep| dep.name == "nsubj"));
        assert_eq!(describe(&s, &diagram, nsubj).unwrap(), "nsubj: sat(3) -> cat(2)");

        let root = find(&diagram, |d| d.dependency().is_some_and(|dep| dep.name == "root"));
        assert_eq!(describe(&s, &diagram, root).unwrap(), "root on sat(3)");
    }
}
