// Winner history widget: every settled draw, numbered in draw order.
//
// The snapshot keeps the newest winner first; numbering counts from the
// oldest so "#1" is always the first prize of the session.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use super::clamp_scroll;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let history = &state.snapshot.history;
    let title = format!("Winners ({})", history.len());

    if history.is_empty() {
        let paragraph = Paragraph::new("  No winners yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_rows = (area.height as usize).saturating_sub(2);
    let offset = state.scroll_offset.get("history").copied().unwrap_or(0);
    let offset = clamp_scroll(offset, history.len(), visible_rows);

    let items: Vec<ListItem> = format_history(history)
        .into_iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows.max(1))
        .map(|(i, (number, name))| {
            // Newest entry stands out
            let name_style = if i == 0 {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {number} "), Style::default().fg(Color::DarkGray)),
                Span::styled(name, name_style),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

/// Pair each entry (newest first) with its draw number, oldest = "#1".
pub fn format_history(history: &[String]) -> Vec<(String, String)> {
    let total = history.len();
    history
        .iter()
        .enumerate()
        .map(|(i, name)| (format!("#{}", total - i), name.clone()))
        .collect()
}
