// Status bar widget: tab indicator, roster size, AI availability.

use hrpro_core::protocol::TabId;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [tab bar] | [participant count] [duplicate warning] | [AI indicator]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = tab_spans(state.active_tab);

    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!("{} participants", state.snapshot.names.len()),
        Style::default().fg(Color::White),
    ));

    if state.snapshot.duplicate_count > 0 {
        spans.push(Span::styled(
            format!(" ({} duplicates)", state.snapshot.duplicate_count),
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    let (label, color) = llm_indicator(state.snapshot.llm_enabled);
    spans.push(Span::styled(label, Style::default().fg(color)));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the AI indicator label and its color.
pub fn llm_indicator(enabled: bool) -> (&'static str, Color) {
    if enabled {
        ("● AI on", Color::Green)
    } else {
        ("● AI off", Color::DarkGray)
    }
}

/// Build tab indicator spans with the active tab highlighted.
/// E.g. "[1:Participants] [2:Prize Draw] [3:Groups]"
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, tab) in TabId::ALL.iter().enumerate() {
        let style = if *tab == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, tab.title()), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
