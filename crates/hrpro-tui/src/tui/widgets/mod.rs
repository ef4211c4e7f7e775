// TUI widget modules for each dashboard panel.

pub mod draw_stage;
pub mod group_settings;
pub mod groups;
pub mod help_bar;
pub mod notice;
pub mod quit_confirm;
pub mod roster_list;
pub mod roster_summary;
pub mod status_bar;
pub mod text_input;
pub mod winner_history;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Compute a centered rectangle of the given size within `area`.
///
/// If the area is too small, the rectangle is clamped to the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

/// Clamp a stored scroll offset so the last page stays full.
pub fn clamp_scroll(offset: usize, total: usize, visible_rows: usize) -> usize {
    offset.min(total.saturating_sub(visible_rows))
}
