// Participant list widget.
//
// Numbered rows in roster order. The selected row is highlighted and kept in
// view; names that appear more than once are tinted so duplicates are easy to
// spot before deduplicating.

use std::collections::HashMap;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let names = &state.snapshot.names;
    let title = format!("Participants ({})", names.len());

    if names.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::raw(""),
            Line::raw("  No participants yet."),
            Line::raw("  Press a to type names, i to import a CSV,"),
            Line::raw("  m for a sample list, or paste a list here."),
        ])
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2).max(1);
    let offset = state.selected.saturating_sub(visible_rows - 1);
    let counts = name_counts(names);
    let number_width = names.len().to_string().len();

    let items: Vec<ListItem> = names
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(i, name)| {
            let duplicate = counts.get(name.as_str()).copied().unwrap_or(0) > 1;
            let mut style = if duplicate {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            if i == state.selected {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:>width$}. ", i + 1, width = number_width),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(name.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn name_counts(names: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }
    counts
}
