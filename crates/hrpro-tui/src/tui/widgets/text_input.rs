// Text entry overlay: names to add or a file path to import.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::centered_rect;
use crate::tui::{InputMode, ViewState};

const DIALOG_WIDTH: u16 = 60;
const DIALOG_HEIGHT: u16 = 12;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", dialog_title(state.input_mode)),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    // Keep the tail of long input visible; the cursor sits on the last line.
    let visible_rows = DIALOG_HEIGHT.min(dialog_area.height).saturating_sub(3) as usize;
    let buffer_lines: Vec<&str> = state.input_buffer.split('\n').collect();
    let skip = buffer_lines.len().saturating_sub(visible_rows.max(1));
    let last = buffer_lines.len() - 1;

    let mut lines: Vec<Line> = buffer_lines
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, text)| {
            let mut spans = vec![Span::raw(text.to_string())];
            if i == last {
                spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
            }
            Line::from(spans)
        })
        .collect();
    lines.push(Line::from(Span::styled(
        entry_summary(state),
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

fn dialog_title(mode: InputMode) -> &'static str {
    match mode {
        InputMode::AddNames => "Add names",
        InputMode::ImportPath => "Import file",
        InputMode::Normal => "",
    }
}

/// Footer line: how many names are pending, or what the path should be.
pub fn entry_summary(state: &ViewState) -> String {
    match state.input_mode {
        InputMode::AddNames => {
            let count = state
                .input_buffer
                .lines()
                .filter(|line| !line.trim().is_empty())
                .count();
            format!("{count} name(s) ready")
        }
        _ => "CSV uses the first column; a \"name\" header is skipped".to_string(),
    }
}
