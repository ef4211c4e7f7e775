// Draw stage widget: the shuffling name, the winner, and the congratulation.

use hrpro_core::draw::DrawPhase;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let mut lines = stage_lines(state);

    // Footer: pool size and repeat mode
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("Eligible: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{} of {}", snapshot.eligible_count, snapshot.names.len()),
            Style::default().fg(Color::White),
        ),
        Span::styled("  |  Repeat winners: ", Style::default().fg(Color::Gray)),
        Span::styled(
            if snapshot.allow_repeat { "allowed" } else { "off" },
            Style::default().fg(if snapshot.allow_repeat {
                Color::Cyan
            } else {
                Color::White
            }),
        ),
    ]));

    if let Some(hint) = exhausted_hint(state) {
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::Yellow))));
    }

    // Vertically center inside the border
    let inner_height = (area.height as usize).saturating_sub(2);
    let padding = inner_height.saturating_sub(lines.len()) / 2;
    let mut padded = vec![Line::raw(""); padding];
    padded.extend(lines);

    let paragraph = Paragraph::new(padded)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Prize Draw"));
    frame.render_widget(paragraph, area);
}

/// Headline, name, and message lines for the current phase.
fn stage_lines(state: &ViewState) -> Vec<Line<'static>> {
    let name_style = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);

    match state.snapshot.draw_phase {
        DrawPhase::Idle => vec![
            Line::styled("Ready to draw", Style::default().fg(Color::Gray)),
            Line::raw(""),
            Line::styled("?", name_style(Color::DarkGray)),
            Line::raw(""),
            Line::styled("Press Space to start", Style::default().fg(Color::DarkGray)),
        ],
        DrawPhase::Animating => vec![
            Line::styled("Drawing...", Style::default().fg(Color::Gray)),
            Line::raw(""),
            Line::styled(
                state.stage_name().unwrap_or("...").to_string(),
                name_style(Color::Yellow),
            ),
        ],
        DrawPhase::Settled => {
            let winner = state.stage_name().unwrap_or_default().to_string();
            let message = match &state.snapshot.congratulation {
                Some(text) => Line::styled(text.clone(), Style::default().fg(Color::White)),
                None => Line::styled(
                    "Preparing a congratulation...",
                    Style::default().fg(Color::DarkGray),
                ),
            };
            vec![
                Line::styled("Winner!", Style::default().fg(Color::Green)),
                Line::raw(""),
                Line::styled(winner, name_style(Color::Green)),
                Line::raw(""),
                message,
            ]
        }
    }
}

/// Shown once no-repeat mode has used up every participant.
fn exhausted_hint(state: &ViewState) -> Option<&'static str> {
    let snapshot = &state.snapshot;
    let exhausted = !snapshot.allow_repeat
        && !snapshot.names.is_empty()
        && snapshot.eligible_count == 0
        && snapshot.draw_phase != DrawPhase::Animating;
    exhausted.then_some("Everyone has won. Press R to reset or t to allow repeats.")
}
