//! TUI rendering module.
//!
//! This module handles all visual rendering using ratatui:
//! - The diagram panel: a scrolled window onto the painted canvas, with the
//!   selected label or arc highlighted
//! - Status bar with mode, message and position info
//! - Command line and add prompt
//! - Help popup

pub mod canvas;
pub mod glyphs;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::layout::{Drawable, DrawableKind, LabelRole, Side, Target};
use crate::state::{AppMode, AppState};
use canvas::WIDE_CONTINUATION;

/// Height of the status bar.
const STATUS_BAR_HEIGHT: u16 = 1;

/// Key bindings shown in the help popup.
const HELP: &[(&str, &str)] = &[
    ("h/l, ←/→", "Scroll left/right"),
    ("j/k, ↑/↓, wheel", "Scroll up/down"),
    ("n/p", "Next/previous sentence"),
    ("click", "Select the token, relation label or arc under the pointer"),
    ("Esc", "Clear the selection"),
    ("a", "Add a dependency: LABEL HEAD [DEPENDENT]; without DEPENDENT the HEAD token is attached to the root, or gets an effect label"),
    ("d/x/Delete", "Remove the selected dependency"),
    (":N", "Go to sentence N"),
    (":w [PATH]", "Write all sentences (default: the input file)"),
    (":q, :q!, :wq", "Quit, quit discarding changes, write and quit"),
    ("?, :h", "Show this help"),
];

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let (diagram_area, status_area) = split_main(area);

    render_diagram_panel(frame, state, diagram_area);
    render_status_bar(frame, state, status_area);

    if state.show_help {
        render_help(frame, area);
    }
}

fn split_main(area: Rect) -> (Rect, Rect) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(STATUS_BAR_HEIGHT)])
        .split(area);
    (main_layout[0], main_layout[1])
}

fn diagram_block(title: String) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title)
}

/// Screen area the canvas is drawn into (inside the panel border).
pub fn diagram_inner_area(terminal_area: Rect) -> Rect {
    let (diagram_area, _) = split_main(terminal_area);
    diagram_block(String::new()).inner(diagram_area)
}

/// Style of a cell painted by `drawable`.
fn drawable_style(drawable: &Drawable, selected: Option<&Target>) -> Style {
    let style = match &drawable.kind {
        DrawableKind::Label { role, .. } => match role {
            LabelRole::TokenText => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            LabelRole::TokenId => Style::default().fg(Color::DarkGray),
            LabelRole::Relation(Side::Below) => Style::default().fg(Color::Yellow),
            LabelRole::Relation(Side::Above) => Style::default().fg(Color::Magenta),
        },
        DrawableKind::Bracket { side: Side::Below, .. } => Style::default().fg(Color::Blue),
        DrawableKind::Bracket { side: Side::Above, .. } => Style::default().fg(Color::Cyan),
    };
    if selected.is_some() && drawable.target.as_ref() == selected {
        style.fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

/// Builds the visible lines of the canvas, merging runs of equal style.
fn diagram_lines(state: &AppState) -> Vec<Line<'static>> {
    let canvas = &state.canvas;
    let selected = state
        .selection
        .and_then(|idx| state.diagram.get(idx))
        .and_then(|d| d.target.as_ref());

    let end_row = state.viewport.row_range().end.min(canvas.height());
    let start_col = state.viewport.first_col.min(canvas.width());
    let end_col = state.viewport.col_range().end.min(canvas.width());

    let mut lines = Vec::with_capacity(end_row.saturating_sub(state.viewport.first_row));
    for y in state.viewport.first_row..end_row {
        let mut spans: Vec<Span> = Vec::new();
        let mut run = String::new();
        let mut run_style = Style::default();

        for (x, cell) in canvas.row(y)[start_col..end_col].iter().enumerate() {
            let ch = match cell.ch {
                // half of a wide character cut by the left edge
                WIDE_CONTINUATION if x == 0 => ' ',
                WIDE_CONTINUATION => continue,
                ch => ch,
            };
            let style = cell
                .owner
                .and_then(|idx| state.diagram.get(idx))
                .map(|d| drawable_style(d, selected))
                .unwrap_or_default();
            if style != run_style && !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), run_style));
            }
            run_style = style;
            run.push(ch);
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, run_style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Renders the diagram panel.
fn render_diagram_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let file = state
        .document
        .path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "[stdin]".to_string());
    let title = format!(
        "{}{} ({}) [Sentence {}/{}]",
        file,
        if state.modified { " [+]" } else { "" },
        state.document.format,
        state.current + 1,
        state.sentence_count()
    );

    let paragraph = Paragraph::new(diagram_lines(state)).block(diagram_block(title));
    frame.render_widget(paragraph, area);
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let (mode_str, input_str) = match &state.mode {
        AppMode::Normal => ("NORMAL", None),
        AppMode::Command(cmd) => ("COMMAND", Some(format!(":{}", cmd))),
        AppMode::AddDependency(text) => ("ADD", Some(format!("LABEL HEAD [DEPENDENT]: {}", text))),
    };

    let position_info = format!(
        "Col {}-{}/{} ",
        state.viewport.first_col + 1,
        state.viewport.col_range().end.min(state.diagram.width),
        state.diagram.width
    );

    // Show warning or status message if present
    let message = state.status_message.as_deref().unwrap_or("");

    let left_content = match input_str {
        Some(input) if message.is_empty() => format!(" {} | {} ", mode_str, input),
        Some(input) => format!(" {} | {} | {} ", mode_str, input, message),
        None => format!(" {} | {} ", mode_str, message),
    };

    let left_len = crate::text::display_width(&left_content);
    let status_line = Line::from(vec![
        Span::styled(left_content, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(
            " ".repeat((area.width as usize).saturating_sub(left_len + position_info.len())),
            Style::default().bg(Color::Cyan),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let paragraph = Paragraph::new(status_line);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

/// Help entries with descriptions wrapped to `width` cells.
fn help_lines(width: usize) -> Vec<Line<'static>> {
    let key_width = HELP
        .iter()
        .map(|(key, _)| crate::text::display_width(key))
        .max()
        .unwrap_or(0);
    let desc_width = width.saturating_sub(key_width + 2).max(10);
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    for (key, desc) in HELP {
        for (i, part) in textwrap::wrap(desc, desc_width).into_iter().enumerate() {
            let key_cell = if i == 0 { *key } else { "" };
            let pad = key_width - crate::text::display_width(key_cell);
            lines.push(Line::from(vec![
                Span::styled(format!("{}{}", key_cell, " ".repeat(pad)), key_style),
                Span::raw("  "),
                Span::raw(part.into_owned()),
            ]));
        }
    }
    lines
}

fn render_help(frame: &mut Frame, area: Rect) {
    let area = centered_rect(70, 70, area);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Help (press any key to close)");
    let inner_width = block.inner(area).width as usize;
    let paragraph = Paragraph::new(help_lines(inner_width)).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{parse_str, FileFormat};
    use crate::layout::LayoutOptions;
    use ratatui::{backend::TestBackend, Terminal};

    const CAT: &str = "\
1\tThe\tthe\t_\t_\t_\t2\tdet\t_\t_
2\tcat\tcat\t_\t_\t_\t3\tnsubj\t_\t_
3\tsat\tsit\t_\t_\t_\t0\troot\t_\t_
";

    fn state(width: u16, height: u16) -> AppState {
        let doc = parse_str(CAT, FileFormat::Conll).unwrap();
        let mut state = AppState::new(doc, LayoutOptions::default(), glyphs::select(true));
        let inner = diagram_inner_area(Rect::new(0, 0, width, height));
        state.update_viewport(inner.x, inner.y, inner.height as usize, inner.width as usize);
        state
    }

    fn screen_text(terminal: &Terminal<TestBackend>, row: u16) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer.content[row as usize * width..(row as usize + 1) * width]
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_diagram_inner_area() {
        let inner = diagram_inner_area(Rect::new(0, 0, 100, 50));
        // 100 - 2 (borders) = 98 cols
        // 50 - 1 (status) - 2 (borders) = 47 rows
        assert_eq!((inner.x, inner.y), (1, 1));
        assert_eq!((inner.height, inner.width), (47, 98));
    }

    #[test]
    fn test_render_diagram_and_status() {
        let state = state(40, 10);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|frame| render(frame, &state)).unwrap();

        assert!(screen_text(&terminal, 0).contains("[stdin] (CoNLL) [Sentence 1/1]"));
        assert!(screen_text(&terminal, 1).starts_with("│The   cat   sat"));
        assert!(screen_text(&terminal, 9).starts_with(" NORMAL"));
    }

    #[test]
    fn test_selected_drawable_is_highlighted() {
        let mut state = state(40, 10);
        let cat = state
            .diagram
            .drawables
            .iter()
            .position(|d| d.target == Some(Target::Token(1)))
            .unwrap();
        state.selection = Some(cat);
        let style = drawable_style(&state.diagram.drawables[cat], Some(&Target::Token(1)));
        assert_eq!(style.bg, Some(Color::White));

        // the ID label of the same token shares the highlight
        let id = state
            .diagram
            .drawables
            .iter()
            .rposition(|d| d.target == Some(Target::Token(1)))
            .unwrap();
        assert_ne!(id, cat);
        assert_eq!(drawable_style(&state.diagram.drawables[id], Some(&Target::Token(1))).bg, Some(Color::White));

        let lines = diagram_lines(&state);
        assert!(lines[0].spans.iter().any(|s| s.content == "cat" && s.style.bg == Some(Color::White)));
    }

    #[test]
    fn test_scrolled_lines_start_at_first_col() {
        let mut state = state(12, 10);
        state.scroll_right();
        let lines = diagram_lines(&state);
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(first, " cat   sat");
    }

    #[test]
    fn test_help_lines_wrap() {
        let narrow = help_lines(40);
        assert!(narrow.len() > HELP.len());
        let wide = help_lines(400);
        assert_eq!(wide.len(), HELP.len());
    }
}
