//! Tabular (CoNLL) sentence codec.
//!
//! ## Format
//!
//! One sentence is a block of rows terminated by a blank line or end of input.
//! Each row has at least ten tab-separated fields:
//! ```text
//! # text = The cat sat
//! 1	The	the	DET	DT	_	2	det	_	_
//! 2	cat	cat	NOUN	NN	_	3	nsubj	_	_
//! 3	sat	sit	VERB	VBD	_	0	root	_	_
//! ```
//!
//! Only the ID, FORM, LEMMA, HEAD and DEPREL columns are interpreted; all
//! fields are kept verbatim so that output reproduces the input. Comment
//! lines (`#`) are accepted before the first row of a block.
//!
//! ## Lenient Resolution
//!
//! A head or ID that does not name a token of the sentence (including the
//! root head `0`) resolves to the row's own index, so the arc is drawn as a
//! self-referential stub instead of being rejected.

use std::io::{self, BufRead, Write};

use super::{FormatError, LineSource, ReadError, ReadResult, MIN_FIELDS};
use crate::model::{sort_for_display, ArcId, Dependency, SentenceError, SentenceResult, Token};

const ID: usize = 0;
const FORM: usize = 1;
const LEMMA: usize = 2;
const HEAD: usize = 6;
const DEPREL: usize = 7;

/// Head value written for arcs without a head.
pub const ROOT_ID: &str = "0";
/// Relation value written when an arc is removed.
pub const EMPTY_FIELD: &str = "_";

/// A sentence stored as its raw tabular rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConllSentence {
    comments: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Reads one tabular sentence.
///
/// Leading blank lines are skipped. A row with too few fields aborts the
/// sentence; the rows read so far are returned as the partial result so a
/// decorating codec can take over the offending line.
pub fn read_conll_sentence<R: BufRead>(source: &mut LineSource<R>) -> ReadResult<ConllSentence> {
    let mut sentence = ConllSentence::default();

    while let Some(line) = source.next_line()? {
        if line.trim().is_empty() {
            if sentence.is_blank() {
                continue;
            }
            break;
        }

        if sentence.rows.is_empty() && line.starts_with('#') {
            sentence.comments.push(line);
            continue;
        }

        let row: Vec<String> = line.split('\t').map(str::to_string).collect();
        if row.len() < MIN_FIELDS {
            let error = FormatError::MalformedRecord {
                line: source.line_no(),
                fields: row.len(),
                text: line,
            };
            return Err(ReadError::new(Some(sentence), error));
        }
        sentence.rows.push(row);
    }

    if sentence.is_blank() {
        return Ok(None);
    }
    Ok(Some(sentence))
}

impl ConllSentence {
    fn is_blank(&self) -> bool {
        self.rows.is_empty() && self.comments.is_empty()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the sentence has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Comment lines preceding the rows.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.rows
            .iter()
            .map(|f| Token::new(f[ID].as_str(), f[FORM].as_str(), f[LEMMA].as_str()))
            .collect()
    }

    /// Maps a format-native ID to a token index (`index = id - 1`).
    pub fn resolve_index(&self, id: &str) -> Option<usize> {
        id.trim()
            .parse::<usize>()
            .ok()?
            .checked_sub(1)
            .filter(|&index| index < self.rows.len())
    }

    fn row_with_id(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|f| f[ID] == id)
    }

    /// One arc per row, from the HEAD and DEPREL columns, sorted for display.
    pub fn primary_dependencies(&self) -> Vec<Dependency> {
        let mut deps: Vec<Dependency> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let head_index = self.resolve_index(&f[HEAD]).unwrap_or(i);
                let dependent_index = self.resolve_index(&f[ID]).unwrap_or(i);
                Dependency::new(ArcId::Row(i), f[DEPREL].as_str(), head_index, dependent_index)
            })
            .collect();
        sort_for_display(&mut deps);
        deps
    }

    /// Sets the head and relation of the dependent's row.
    ///
    /// Without a dependent, `head_id` names the dependent and the arc gets the
    /// root head. Both IDs are checked before anything is written.
    pub fn add_dependency(&mut self, name: &str, head_id: &str, dependent_id: Option<&str>) -> SentenceResult<()> {
        let (head_id, dependent_id) = match dependent_id {
            Some(dependent_id) => (head_id, dependent_id),
            None => (ROOT_ID, head_id),
        };

        let row = self
            .row_with_id(dependent_id)
            .ok_or_else(|| SentenceError::InvalidReference {
                id: dependent_id.to_string(),
            })?;
        if head_id != ROOT_ID && self.row_with_id(head_id).is_none() {
            return Err(SentenceError::InvalidReference {
                id: head_id.to_string(),
            });
        }

        let fields = &mut self.rows[row];
        fields[HEAD] = head_id.to_string();
        fields[DEPREL] = name.to_string();
        Ok(())
    }

    /// Detaches the row the arc was read from.
    pub fn remove_dependency(&mut self, dep: &Dependency) -> SentenceResult<()> {
        match dep.id {
            ArcId::Row(row) if row < self.rows.len() => {
                let fields = &mut self.rows[row];
                fields[HEAD] = ROOT_ID.to_string();
                fields[DEPREL] = EMPTY_FIELD.to_string();
                Ok(())
            }
            _ => Err(SentenceError::UnknownDependency),
        }
    }

    pub fn output<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for comment in &self.comments {
            writeln!(writer, "{}", comment)?;
        }
        for fields in &self.rows {
            writeln!(writer, "{}", fields.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAT: &str = "\
# text = The cat sat
1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_
2\tcat\tcat\tNOUN\tNN\t_\t3\tnsubj\t_\t_
3\tsat\tsit\tVERB\tVBD\t_\t0\troot\t_\t_
";

    fn read(content: &str) -> ReadResult<ConllSentence> {
        let mut source = LineSource::new(content.as_bytes());
        read_conll_sentence(&mut source)
    }

    fn output(sentence: &ConllSentence) -> String {
        let mut buf = Vec::new();
        sentence.output(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_parse_tokens() {
        let sentence = read(CAT).unwrap().unwrap();
        assert_eq!(sentence.len(), 3);
        assert_eq!(sentence.comments(), ["# text = The cat sat"]);
        let tokens = sentence.tokens();
        assert_eq!(tokens[1], Token::new("2", "cat", "cat"));
        assert_eq!(tokens[2].lemma, "sit");
    }

    #[test]
    fn test_round_trip() {
        let sentence = read(CAT).unwrap().unwrap();
        assert_eq!(output(&sentence), CAT);
    }

    #[test]
    fn test_primary_dependencies_sorted_and_lenient() {
        let sentence = read(CAT).unwrap().unwrap();
        let deps = sentence.primary_dependencies();
        // root resolves to a stub on its own token and sorts first
        assert_eq!(deps[0], Dependency::new(ArcId::Row(2), "root", 2, 2));
        assert_eq!(deps[1], Dependency::new(ArcId::Row(0), "det", 1, 0));
        assert_eq!(deps[2], Dependency::new(ArcId::Row(1), "nsubj", 2, 1));
    }

    #[test]
    fn test_out_of_range_head_falls_back_to_own_row() {
        let content = "\
1\ta\ta\t_\t_\t_\t9\tdep\t_\t_
x\tb\tb\t_\t_\t_\t1\tdep\t_\t_
";
        let sentence = read(content).unwrap().unwrap();
        let deps = sentence.primary_dependencies();
        assert!(deps.contains(&Dependency::new(ArcId::Row(0), "dep", 0, 0)));
        // unparsable ID: dependent is the row itself
        assert!(deps.contains(&Dependency::new(ArcId::Row(1), "dep", 0, 1)));
    }

    #[test]
    fn test_blank_lines_and_end_of_input() {
        let mut source = LineSource::new("\n\n1\ta\ta\t_\t_\t_\t0\troot\t_\t_\n\n\n".as_bytes());
        assert_eq!(read_conll_sentence(&mut source).unwrap().unwrap().len(), 1);
        assert!(read_conll_sentence(&mut source).unwrap().is_none());
    }

    #[test]
    fn test_short_row_keeps_partial() {
        let content = "1\ta\ta\t_\t_\t_\t0\troot\t_\t_\np1,1\n";
        let err = read(content).unwrap_err();
        assert_eq!(err.partial.unwrap().len(), 1);
        match err.error {
            FormatError::MalformedRecord { line, fields, text } => {
                assert_eq!(line, 2);
                assert_eq!(fields, 1);
                assert_eq!(text, "p1,1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_add_dependency_overwrites_row() {
        let mut sentence = read(CAT).unwrap().unwrap();
        sentence.add_dependency("obj", "3", Some("1")).unwrap();
        assert!(output(&sentence).contains("1\tThe\tthe\tDET\tDT\t_\t3\tobj\t_\t_\n"));
    }

    #[test]
    fn test_add_root_dependency() {
        let mut sentence = read(CAT).unwrap().unwrap();
        sentence.add_dependency("root", "2", None).unwrap();
        assert!(output(&sentence).contains("2\tcat\tcat\tNOUN\tNN\t_\t0\troot\t_\t_\n"));
    }

    #[test]
    fn test_add_with_unknown_id_leaves_sentence_unchanged() {
        let mut sentence = read(CAT).unwrap().unwrap();
        let before = sentence.clone();
        assert_eq!(
            sentence.add_dependency("obj", "7", Some("1")),
            Err(SentenceError::InvalidReference { id: "7".to_string() })
        );
        assert_eq!(
            sentence.add_dependency("obj", "1", Some("4")),
            Err(SentenceError::InvalidReference { id: "4".to_string() })
        );
        assert_eq!(sentence, before);
    }

    #[test]
    fn test_remove_dependency_detaches_row() {
        let mut sentence = read(CAT).unwrap().unwrap();
        let nsubj = sentence
            .primary_dependencies()
            .into_iter()
            .find(|d| d.name == "nsubj")
            .unwrap();
        sentence.remove_dependency(&nsubj).unwrap();
        assert!(output(&sentence).contains("2\tcat\tcat\tNOUN\tNN\t_\t0\t_\t_\t_\n"));

        let stale = Dependency::new(ArcId::Row(10), "x", 0, 0);
        assert_eq!(sentence.remove_dependency(&stale), Err(SentenceError::UnknownDependency));
    }
}
