// Roster summary side panel: totals and what the other tabs will see.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let duplicate_style = if snapshot.duplicate_count > 0 {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let mut lines = vec![
        stat_line("Total", snapshot.names.len().to_string(), Style::default()),
        stat_line("Unique", unique_count(state).to_string(), Style::default()),
        stat_line(
            "Duplicates",
            snapshot.duplicate_count.to_string(),
            duplicate_style,
        ),
        Line::raw(""),
        stat_line(
            "Still eligible",
            snapshot.eligible_count.to_string(),
            Style::default(),
        ),
        stat_line(
            "Groups of",
            format!(
                "{} -> {} groups",
                snapshot.group_size, snapshot.projected_group_count
            ),
            Style::default(),
        ),
    ];

    if snapshot.duplicate_count > 0 {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            " Press d to remove duplicates.",
            Style::default().fg(Color::Yellow),
        )));
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Summary"));
    frame.render_widget(paragraph, area);
}

fn unique_count(state: &ViewState) -> usize {
    state
        .snapshot
        .names
        .len()
        .saturating_sub(state.snapshot.duplicate_count)
}

fn stat_line(label: &str, value: String, value_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label}: "), Style::default().fg(Color::Gray)),
        Span::styled(value, value_style),
    ])
}
