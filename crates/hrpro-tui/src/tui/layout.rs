// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones shared by all three tabs:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Main Panel (65%)         | Side Panel (35%)       |
// |                          |                        |
// +-------------------------+------------------------+
// | Notice Line (1 row)                               |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: tab bar, participant count, LLM indicator.
    pub status_bar: Rect,
    /// Left side of the middle section: tab-switched content area.
    pub main_panel: Rect,
    /// Right side of the middle section: per-tab summary or history.
    pub side_panel: Rect,
    /// Last message from the app loop.
    pub notice: Rect,
    /// Bottom row: keyboard shortcut hints for the active tab.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | notice(1) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(5),    // middle section (main + side)
            Constraint::Length(1), // notice line
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let notice = vertical[2];
    let help_bar = vertical[3];

    // Horizontal: main panel (65%) | side panel (35%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(middle);

    AppLayout {
        status_bar,
        main_panel: horizontal[0],
        side_panel: horizontal[1],
        notice,
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
