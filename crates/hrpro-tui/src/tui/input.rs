// Keyboard and paste handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app loop, or into local ViewState mutations (tab switching, selection,
// scrolling, text entry).

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use hrpro_core::protocol::{TabId, UserCommand};

use super::{InputMode, ViewState};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app loop. Returns `None` when the key press was handled locally by
/// mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.input_mode != InputMode::Normal {
        return handle_text_input(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::List;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::Draw;
            None
        }
        KeyCode::Char('3') => {
            view_state.active_tab = TabId::Groups;
            None
        }
        KeyCode::Tab => {
            view_state.active_tab = cycle_tab(view_state.active_tab, 1);
            None
        }
        KeyCode::BackTab => {
            view_state.active_tab = cycle_tab(view_state.active_tab, TabId::ALL.len() - 1);
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => match view_state.active_tab {
            TabId::List => handle_list_key(key_event, view_state),
            TabId::Draw => handle_draw_key(key_event, view_state),
            TabId::Groups => handle_groups_key(key_event, view_state),
        },
    }
}

/// Handle a bracketed paste.
///
/// In name entry the text is appended to the buffer; on the participant tab
/// a paste outside any input mode adds the names directly.
pub fn handle_paste(text: &str, view_state: &mut ViewState) -> Option<UserCommand> {
    if view_state.confirm_quit {
        return None;
    }
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    match view_state.input_mode {
        InputMode::AddNames => {
            view_state.input_buffer.push_str(&text);
            None
        }
        InputMode::ImportPath => {
            let first_line = text.lines().next().unwrap_or_default().trim();
            view_state.input_buffer.push_str(first_line);
            None
        }
        InputMode::Normal => {
            if view_state.active_tab == TabId::List && !text.trim().is_empty() {
                Some(UserCommand::AddNames(text))
            } else {
                None
            }
        }
    }
}

/// Handle key events while in quit confirmation mode.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None, // Block all other input
    }
}

/// Handle key events while typing names or an import path.
///
/// - Printable characters are appended to the buffer
/// - Backspace removes the last character
/// - Enter submits (empty input is dropped), Esc cancels
fn handle_text_input(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input_mode = InputMode::Normal;
            view_state.input_buffer.clear();
            None
        }
        KeyCode::Enter => {
            let mode = std::mem::take(&mut view_state.input_mode);
            let text = std::mem::take(&mut view_state.input_buffer);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            match mode {
                InputMode::AddNames => Some(UserCommand::AddNames(text)),
                InputMode::ImportPath => Some(UserCommand::ImportFile(PathBuf::from(trimmed))),
                InputMode::Normal => None,
            }
        }
        KeyCode::Backspace => {
            view_state.input_buffer.pop();
            None
        }
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            view_state.input_buffer.push(c);
            None
        }
        _ => None,
    }
}

fn handle_list_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let count = view_state.snapshot.names.len();
    match key_event.code {
        KeyCode::Char('a') => {
            enter_input_mode(view_state, InputMode::AddNames);
            None
        }
        KeyCode::Char('i') => {
            enter_input_mode(view_state, InputMode::ImportPath);
            None
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            (count > 0).then_some(UserCommand::RemoveParticipant(view_state.selected))
        }
        KeyCode::Char('d') => Some(UserCommand::Deduplicate),
        KeyCode::Char('m') => Some(UserCommand::LoadSample),
        KeyCode::Char('C') => Some(UserCommand::ClearRoster),
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.selected = (view_state.selected + 1).min(count.saturating_sub(1));
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected = view_state.selected.saturating_sub(1);
            None
        }
        KeyCode::Home | KeyCode::Char('g') => {
            view_state.selected = 0;
            None
        }
        KeyCode::End | KeyCode::Char('G') => {
            view_state.selected = count.saturating_sub(1);
            None
        }
        _ => None,
    }
}

fn handle_draw_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(UserCommand::StartDraw),
        KeyCode::Char('R') => Some(UserCommand::ResetDraw),
        KeyCode::Char('t') => Some(UserCommand::ToggleRepeat),
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, "history");
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, "history");
            None
        }
        _ => None,
    }
}

fn handle_groups_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('g') | KeyCode::Enter => Some(UserCommand::RunGrouping),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(UserCommand::AdjustGroupSize(1)),
        KeyCode::Char('-') => Some(UserCommand::AdjustGroupSize(-1)),
        KeyCode::Char('n') => Some(UserCommand::ToggleGeneratedNames),
        KeyCode::Char('e') => Some(UserCommand::ExportGroups),
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, "groups");
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, "groups");
            None
        }
        _ => None,
    }
}

fn enter_input_mode(view_state: &mut ViewState, mode: InputMode) {
    view_state.input_mode = mode;
    view_state.input_buffer.clear();
}

fn cycle_tab(current: TabId, step: usize) -> TabId {
    let idx = TabId::ALL.iter().position(|t| *t == current).unwrap_or(0);
    TabId::ALL[(idx + step) % TabId::ALL.len()]
}

fn scroll_up(view_state: &mut ViewState, key: &str) {
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_sub(1);
}

fn scroll_down(view_state: &mut ViewState, key: &str) {
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_add(1);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
