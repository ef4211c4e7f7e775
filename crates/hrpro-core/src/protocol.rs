// Message types shared between the app loop, the LLM task, and the TUI.

use std::path::PathBuf;

use crate::draw::DrawPhase;
use crate::grouping::Group;

// ---------------------------------------------------------------------------
// LLM streaming events
// ---------------------------------------------------------------------------

/// Events emitted by a streaming LLM request.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmEvent {
    Token {
        text: String,
    },
    Complete {
        full_text: String,
        input_tokens: u32,
        output_tokens: u32,
        stop_reason: Option<String>,
    },
    Error {
        message: String,
    },
}

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabId {
    #[default]
    List,
    Draw,
    Groups,
}

impl TabId {
    pub const ALL: [TabId; 3] = [TabId::List, TabId::Draw, TabId::Groups];

    pub fn title(&self) -> &'static str {
        match self {
            TabId::List => "Participants",
            TabId::Draw => "Prize Draw",
            TabId::Groups => "Groups",
        }
    }
}

/// Commands sent from the TUI to the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Append raw text (one name per line) to the roster.
    AddNames(String),
    RemoveParticipant(usize),
    Deduplicate,
    LoadSample,
    ClearRoster,
    ImportFile(PathBuf),
    StartDraw,
    ResetDraw,
    ToggleRepeat,
    RunGrouping,
    /// Adjust the target group size by `delta`, clamped to at least 1.
    AdjustGroupSize(i64),
    ToggleGeneratedNames,
    ExportGroups,
    Quit,
}

// ---------------------------------------------------------------------------
// app -> TUI
// ---------------------------------------------------------------------------

/// Everything the TUI renders, captured after each state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshot {
    pub names: Vec<String>,
    pub duplicate_count: usize,
    pub draw_phase: DrawPhase,
    pub display_name: Option<String>,
    pub winner: Option<String>,
    pub congratulation: Option<String>,
    /// Most recent winner first.
    pub history: Vec<String>,
    pub eligible_count: usize,
    pub allow_repeat: bool,
    pub groups: Vec<Group>,
    pub group_size: usize,
    pub generated_names: bool,
    pub grouping_pending: bool,
    pub projected_group_count: usize,
    pub llm_enabled: bool,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        AppSnapshot {
            names: Vec::new(),
            duplicate_count: 0,
            draw_phase: DrawPhase::Idle,
            display_name: None,
            winner: None,
            congratulation: None,
            history: Vec::new(),
            eligible_count: 0,
            allow_repeat: false,
            groups: Vec::new(),
            group_size: 4,
            generated_names: false,
            grouping_pending: false,
            projected_group_count: 0,
            llm_enabled: false,
        }
    }
}

/// Updates sent from the app loop to the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
    /// Display-only name during the draw animation.
    ShuffleName(String),
    /// One-line message for the status bar.
    Notice(String),
}
