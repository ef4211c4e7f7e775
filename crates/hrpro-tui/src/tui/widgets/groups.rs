// Groups widget: every group with its numbered members.

use hrpro_core::grouping::Group;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::clamp_scroll;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let title = if snapshot.grouping_pending {
        format!("Groups ({}) - generating team names...", snapshot.groups.len())
    } else {
        format!("Groups ({})", snapshot.groups.len())
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if snapshot.groups.is_empty() {
        let message = if snapshot.grouping_pending {
            "  Splitting the roster..."
        } else {
            "  No groups yet. Press g to split the roster."
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let lines = group_lines(&snapshot.groups);
    let visible_rows = (area.height as usize).saturating_sub(2);
    let offset = state.scroll_offset.get("groups").copied().unwrap_or(0);
    let offset = clamp_scroll(offset, lines.len(), visible_rows);

    let visible: Vec<Line> = lines.into_iter().skip(offset).take(visible_rows).collect();
    frame.render_widget(Paragraph::new(visible).block(block), area);
}

/// One header line per group followed by its members, blank line between.
fn group_lines(groups: &[Group]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {}", group.name),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ({})", group.members.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        for (n, member) in group.members.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("   {}. ", n + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(member.name.clone()),
            ]));
        }
    }
    lines
}
