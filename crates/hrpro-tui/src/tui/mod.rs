// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the latest `AppSnapshot` plus
// purely local state (active tab, selection, text input). The app loop pushes
// `UiUpdate` messages over an mpsc channel; the TUI applies them to
// `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream};
use futures_util::StreamExt;
use hrpro_core::draw::DrawPhase;
use hrpro_core::protocol::{AppSnapshot, TabId, UiUpdate, UserCommand};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{info, warn};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// What keystrokes are currently feeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing (or pasting) names to append to the roster.
    AddNames,
    /// Typing the path of a CSV file to import.
    ImportPath,
}

/// TUI-local state that mirrors the application state for rendering.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Latest state pushed by the app loop.
    pub snapshot: AppSnapshot,
    /// Name shown by the latest shuffle tick while a draw animates.
    pub shuffle_name: Option<String>,
    /// Last notice from the app loop.
    pub notice: Option<String>,
    pub active_tab: TabId,
    /// Selected row in the participant list.
    pub selected: usize,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
    pub input_mode: InputMode,
    pub input_buffer: String,
    /// Whether the quit confirmation overlay is showing.
    pub confirm_quit: bool,
}

impl ViewState {
    /// Apply a full state snapshot from the app loop.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.selected = self.selected.min(snapshot.names.len().saturating_sub(1));
        if snapshot.draw_phase != DrawPhase::Animating {
            self.shuffle_name = None;
        }
        self.snapshot = snapshot;
    }

    /// Name to show on the draw stage right now.
    pub fn stage_name(&self) -> Option<&str> {
        match self.snapshot.draw_phase {
            DrawPhase::Animating => self
                .shuffle_name
                .as_deref()
                .or(self.snapshot.display_name.as_deref()),
            DrawPhase::Settled => self.snapshot.winner.as_deref(),
            DrawPhase::Idle => None,
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::ShuffleName(name) => {
            state.shuffle_name = Some(name);
        }
        UiUpdate::Notice(message) => {
            state.notice = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let area = frame.area();
    let layout = build_layout(area);

    widgets::status_bar::render(frame, layout.status_bar, state);
    match state.active_tab {
        TabId::List => {
            widgets::roster_list::render(frame, layout.main_panel, state);
            widgets::roster_summary::render(frame, layout.side_panel, state);
        }
        TabId::Draw => {
            widgets::draw_stage::render(frame, layout.main_panel, state);
            widgets::winner_history::render(frame, layout.side_panel, state);
        }
        TabId::Groups => {
            widgets::groups::render(frame, layout.main_panel, state);
            widgets::group_settings::render(frame, layout.side_panel, state);
        }
    }
    widgets::notice::render(frame, layout.notice, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.input_mode != InputMode::Normal {
        widgets::text_input::render(frame, area, state);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, area);
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (raw mode, alternate screen, bracketed paste).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, terminal input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();
    if let Err(e) = crossterm::execute!(std::io::stdout(), EnableBracketedPaste) {
        warn!("Bracketed paste unavailable: {}", e);
    }

    // 2. Set panic hook to restore terminal on crash.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    // ~30fps render interval
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            // UI updates from the app loop
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break Ok(()),
                }
            }

            // Terminal input
            maybe_event = event_stream.next() => {
                let command = match maybe_event {
                    Some(Ok(Event::Key(key_event))) => input::handle_key(key_event, &mut view_state),
                    Some(Ok(Event::Paste(text))) => input::handle_paste(&text, &mut view_state),
                    Some(Ok(_)) => None,
                    Some(Err(e)) => break Err(anyhow::Error::from(e).context("terminal input error")),
                    None => break Ok(()),
                };
                if let Some(command) = command {
                    let quit = command == UserCommand::Quit;
                    let _ = cmd_tx.send(command).await;
                    if quit {
                        info!("Quit requested from TUI");
                        break Ok(());
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::from(e).context("failed to draw frame"));
                }
            }
        }
    };

    // Restore terminal
    let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
    ratatui::restore();

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
