// Notice line widget: the most recent message from the app loop.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match &state.notice {
        Some(message) => Line::from(vec![
            Span::styled(" » ", Style::default().fg(Color::Cyan)),
            Span::styled(message.clone(), Style::default().fg(notice_color(message))),
        ]),
        None => Line::default(),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Failures and refusals stand out from routine confirmations.
fn notice_color(message: &str) -> Color {
    let lower = message.to_lowercase();
    let flagged = ["failed", "cannot", "empty", "失敗", "無法", "空的"];
    if flagged.iter().any(|word| lower.contains(word)) {
        Color::Yellow
    } else {
        Color::White
    }
}
