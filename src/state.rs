//! Application state.
//!
//! `AppState` owns the loaded document and everything derived from the
//! current sentence. Every mutation of the sentence goes through here and is
//! followed by a rebuild of the diagram and canvas, which also drops the
//! selection.

use std::ops::Range;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::formats::conll::ConllSentence;
use crate::formats::{write_file, Document};
use crate::interaction::{self, AddCommand, Command, EditError};
use crate::layout::{Diagram, LayoutOptions};
use crate::model::Sentence;
use crate::ui::canvas::Canvas;
use crate::ui::glyphs::Glyphs;

/// Columns scrolled by one horizontal step.
pub const HORIZONTAL_STEP: usize = 5;

/// The part of the canvas currently visible in the diagram panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// First visible canvas row
    pub first_row: usize,
    /// First visible canvas column
    pub first_col: usize,
    /// Number of visible rows
    pub visible_rows: usize,
    /// Number of visible columns
    pub visible_cols: usize,
    /// Screen column of the panel's top-left cell
    pub origin_x: u16,
    /// Screen row of the panel's top-left cell
    pub origin_y: u16,
}

impl Viewport {
    /// Returns the range of visible rows.
    pub fn row_range(&self) -> Range<usize> {
        self.first_row..self.first_row + self.visible_rows
    }

    /// Returns the range of visible columns.
    pub fn col_range(&self) -> Range<usize> {
        self.first_col..self.first_col + self.visible_cols
    }

    /// Maps a screen position to canvas coordinates; `None` outside the panel.
    pub fn screen_to_canvas(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        let dx = column.checked_sub(self.origin_x)? as usize;
        let dy = row.checked_sub(self.origin_y)? as usize;
        if dx >= self.visible_cols || dy >= self.visible_rows {
            return None;
        }
        Some((self.first_col + dx, self.first_row + dy))
    }
}

/// Application mode for handling different input states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Command input mode (after pressing ':')
    Command(String),
    /// Add-dependency prompt (after pressing 'a')
    AddDependency(String),
}

/// The complete application state.
#[derive(Debug)]
pub struct AppState {
    pub document: Document,
    /// Index of the displayed sentence
    pub current: usize,
    pub options: LayoutOptions,
    pub glyphs: Glyphs,
    pub diagram: Diagram,
    pub canvas: Canvas,
    pub viewport: Viewport,
    /// Index of the selected drawable in `diagram`
    pub selection: Option<usize>,
    pub mode: AppMode,
    pub show_help: bool,
    pub should_quit: bool,
    /// Set by edits, cleared by a successful write
    pub modified: bool,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(document: Document, options: LayoutOptions, glyphs: Glyphs) -> Self {
        let status_message = document.diagnostics_summary();
        let diagram = Diagram::build(&Sentence::Tabular(ConllSentence::default()), options);
        let canvas = Canvas::paint(&diagram, &glyphs);
        let mut state = Self {
            document,
            current: 0,
            options,
            glyphs,
            diagram,
            canvas,
            viewport: Viewport::default(),
            selection: None,
            mode: AppMode::Normal,
            show_help: false,
            should_quit: false,
            modified: false,
            status_message,
        };
        state.rebuild();
        state
    }

    pub fn sentence_count(&self) -> usize {
        self.document.sentence_count()
    }

    pub fn current_sentence(&self) -> Option<&Sentence> {
        self.document.sentences.get(self.current)
    }

    /// Lays out the current sentence again and drops the selection.
    pub fn rebuild(&mut self) {
        self.diagram = match self.document.sentences.get(self.current) {
            Some(sentence) => Diagram::build(sentence, self.options),
            None => Diagram::build(&Sentence::Tabular(ConllSentence::default()), self.options),
        };
        self.canvas = Canvas::paint(&self.diagram, &self.glyphs);
        self.selection = None;
        self.clamp_viewport();
    }

    /// Updates the panel position and size after a resize.
    pub fn update_viewport(&mut self, origin_x: u16, origin_y: u16, visible_rows: usize, visible_cols: usize) {
        self.viewport.origin_x = origin_x;
        self.viewport.origin_y = origin_y;
        self.viewport.visible_rows = visible_rows;
        self.viewport.visible_cols = visible_cols;
        self.clamp_viewport();
    }

    fn clamp_viewport(&mut self) {
        let max_col = self.diagram.width.saturating_sub(self.viewport.visible_cols);
        let max_row = self.diagram.height.saturating_sub(self.viewport.visible_rows);
        self.viewport.first_col = self.viewport.first_col.min(max_col);
        self.viewport.first_row = self.viewport.first_row.min(max_row);
    }

    /// Scrolls by a signed number of columns and rows.
    pub fn scroll_by(&mut self, cols: isize, rows: isize) {
        self.viewport.first_col = self.viewport.first_col.saturating_add_signed(cols);
        self.viewport.first_row = self.viewport.first_row.saturating_add_signed(rows);
        self.clamp_viewport();
    }

    pub fn scroll_left(&mut self) {
        self.scroll_by(-(HORIZONTAL_STEP as isize), 0);
    }

    pub fn scroll_right(&mut self) {
        self.scroll_by(HORIZONTAL_STEP as isize, 0);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_by(0, -1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_by(0, 1);
    }

    /// Shows sentence `index` (0-based) with scroll and selection reset.
    fn show_sentence(&mut self, index: usize) {
        self.current = index;
        self.viewport.first_col = 0;
        self.viewport.first_row = 0;
        self.rebuild();
        self.status_message = Some(format!("Sentence {}/{}", index + 1, self.sentence_count()));
    }

    pub fn next_sentence(&mut self) {
        if self.current + 1 < self.sentence_count() {
            self.show_sentence(self.current + 1);
        } else {
            self.status_message = Some("Already at the last sentence".to_string());
        }
    }

    pub fn previous_sentence(&mut self) {
        if self.current > 0 {
            self.show_sentence(self.current - 1);
        } else {
            self.status_message = Some("Already at the first sentence".to_string());
        }
    }

    /// Jumps to a 1-based sentence number.
    pub fn goto_sentence(&mut self, number: usize) {
        if number > 0 && number <= self.sentence_count() {
            self.show_sentence(number - 1);
        } else {
            self.status_message = Some(format!("Invalid sentence: {}", number));
        }
    }

    /// Selects whatever lies under a screen position; clicking empty space clears the selection.
    pub fn click(&mut self, column: u16, row: u16) {
        let Some((x, y)) = self.viewport.screen_to_canvas(column, row) else {
            return;
        };
        self.selection = interaction::hit_test(&self.diagram, x, y);
        self.status_message = self
            .selection
            .zip(self.current_sentence())
            .and_then(|(idx, sentence)| interaction::describe(sentence, &self.diagram, idx));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.status_message = None;
    }

    fn report(&mut self, error: EditError) {
        warn!(%error, "edit rejected");
        self.status_message = Some(error.to_string());
    }

    /// Removes the selected dependency from the current sentence.
    pub fn remove_selected(&mut self) {
        let Some(sentence) = self.document.sentences.get_mut(self.current) else {
            return;
        };
        match interaction::remove_selected(sentence, &self.diagram, self.selection) {
            Ok(dep) => {
                info!(sentence = self.current + 1, relation = %dep.name, "dependency removed");
                self.modified = true;
                self.rebuild();
                self.status_message = Some(format!("Removed {}", dep.name));
            }
            Err(error) => self.report(error),
        }
    }

    /// Adds a dependency to the current sentence.
    pub fn add_dependency(&mut self, cmd: &AddCommand) -> Result<(), EditError> {
        let sentence = self
            .document
            .sentences
            .get_mut(self.current)
            .ok_or(EditError::NothingSelected)?;
        interaction::add_dependency(sentence, cmd)?;
        info!(
            sentence = self.current + 1,
            label = %cmd.label,
            head = %cmd.head_id,
            dependent = cmd.dependent_id.as_deref().unwrap_or("-"),
            "dependency added"
        );
        self.modified = true;
        self.rebuild();
        self.status_message = Some(format!("Added {}", cmd.label));
        Ok(())
    }

    /// Writes every sentence to `path`, or to the file the document came from.
    pub fn write(&mut self, path: Option<PathBuf>) -> bool {
        let Some(path) = path.or_else(|| self.document.path.clone()) else {
            self.status_message = Some("No file name".to_string());
            return false;
        };
        match write_file(&self.document.sentences, self.document.line_ending, &path) {
            Ok(()) => {
                info!(path = %path.display(), sentences = self.sentence_count(), "document written");
                self.modified = false;
                self.status_message = Some(format!(
                    "Wrote {} sentences to {}",
                    self.sentence_count(),
                    path.display()
                ));
                true
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "write failed");
                self.status_message = Some(format!("Write failed: {}", err));
                false
            }
        }
    }

    /// Requests exit; refuses while there are unsaved edits unless forced.
    pub fn quit(&mut self, force: bool) {
        if self.modified && !force {
            self.status_message = Some("Unsaved changes (use :w to write or :q! to discard)".to_string());
        } else {
            self.should_quit = true;
        }
    }

    pub fn show_help(&mut self) {
        self.show_help = true;
    }

    pub fn dismiss_help(&mut self) {
        self.show_help = false;
    }

    /// Enters command mode.
    pub fn enter_command_mode(&mut self) {
        self.mode = AppMode::Command(String::new());
    }

    /// Opens the add-dependency prompt.
    pub fn enter_add_mode(&mut self) {
        self.mode = AppMode::AddDependency(String::new());
        self.status_message = None;
    }

    /// Handles a character typed into the command line or prompt.
    pub fn input_char(&mut self, c: char) {
        if let AppMode::Command(ref mut text) | AppMode::AddDependency(ref mut text) = self.mode {
            text.push(c);
        }
    }

    /// Handles backspace; an emptied command line returns to normal mode.
    pub fn input_backspace(&mut self) {
        match self.mode {
            AppMode::Command(ref mut text) => {
                text.pop();
                if text.is_empty() {
                    self.mode = AppMode::Normal;
                }
            }
            AppMode::AddDependency(ref mut text) => {
                text.pop();
            }
            AppMode::Normal => {}
        }
    }

    /// Leaves the command line or prompt without acting.
    pub fn cancel_input(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Submits the command line or prompt.
    pub fn submit_input(&mut self) {
        match std::mem::take(&mut self.mode) {
            AppMode::Command(text) => self.execute_command(&text),
            AppMode::AddDependency(text) => {
                let result = AddCommand::parse(&text).and_then(|cmd| self.add_dependency(&cmd));
                if let Err(error) = result {
                    self.report(error);
                    self.mode = AppMode::AddDependency(text);
                }
            }
            AppMode::Normal => {}
        }
    }

    /// Executes a `:` command.
    pub fn execute_command(&mut self, text: &str) {
        let command = match Command::parse(text) {
            Ok(command) => command,
            Err(error) => return self.report(error),
        };
        match command {
            Command::Quit { force } => self.quit(force),
            Command::Write(path) => {
                self.write(path);
            }
            Command::WriteQuit => {
                if self.write(None) {
                    self.should_quit = true;
                }
            }
            Command::NextSentence => self.next_sentence(),
            Command::PreviousSentence => self.previous_sentence(),
            Command::GotoSentence(n) => self.goto_sentence(n),
            Command::Help => self.show_help(),
            Command::Add(cmd) => {
                if let Err(error) = self.add_dependency(&cmd) {
                    self.report(error);
                }
            }
            Command::Remove => self.remove_selected(),
        }
    }
}
