// Grouping settings side panel: target size, projection, naming mode.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let label = |text: &str| Span::styled(format!(" {text}: "), Style::default().fg(Color::Gray));

    let mut lines = vec![
        Line::from(vec![
            label("Group size"),
            Span::styled(
                format!("{}", snapshot.group_size),
                Style::default().fg(Color::White),
            ),
            Span::styled("  (+/-)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            label("Participants"),
            Span::raw(snapshot.names.len().to_string()),
        ]),
        Line::from(vec![
            label("Will create"),
            Span::raw(format!("{} groups", snapshot.projected_group_count)),
        ]),
        Line::raw(""),
        Line::from(vec![label("Team names"), naming_mode(state)]),
    ];

    if snapshot.generated_names && !snapshot.llm_enabled {
        lines.push(Line::from(Span::styled(
            " AI is off; numbered names are used.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    if !snapshot.groups.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            " Press e to export as CSV.",
            Style::default().fg(Color::Cyan),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Settings"));
    frame.render_widget(paragraph, area);
}

fn naming_mode(state: &ViewState) -> Span<'static> {
    if state.snapshot.generated_names {
        Span::styled("generated", Style::default().fg(Color::Green))
    } else {
        Span::styled("numbered", Style::default().fg(Color::White))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::test_support::render_to_string;
    use hrpro_core::protocol::AppSnapshot;

    fn render_snapshot(snapshot: AppSnapshot) -> String {
        let mut state = ViewState::default();
        state.apply_snapshot(snapshot);
        render_to_string(50, 12, |frame| render(frame, frame.area(), &state))
    }

    #[test]
    fn shows_size_and_projection() {
        let screen = render_snapshot(AppSnapshot {
            names: (1..=10).map(|i| format!("P{i}")).collect(),
            group_size: 4,
            projected_group_count: 3,
            ..AppSnapshot::default()
        });
        assert!(screen.contains("Group size: 4"));
        assert!(screen.contains("Participants: 10"));
        assert!(screen.contains("Will create: 3 groups"));
        assert!(screen.contains("Team names: numbered"));
    }

    #[test]
    fn generated_names_without_ai_explains_fallback() {
        let screen = render_snapshot(AppSnapshot {
            generated_names: true,
            llm_enabled: false,
            ..AppSnapshot::default()
        });
        assert!(screen.contains("Team names: generated"));
        assert!(screen.contains("AI is off"));
    }

    #[test]
    fn generated_names_with_ai_has_no_warning() {
        let screen = render_snapshot(AppSnapshot {
            generated_names: true,
            llm_enabled: true,
            ..AppSnapshot::default()
        });
        assert!(!screen.contains("AI is off"));
        assert!(!screen.contains("export"));
    }
}
