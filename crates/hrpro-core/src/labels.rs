// Localized display strings: fallback group names, fallback congratulations,
// CSV export headers, and status-line notices.

use std::fmt;

use serde::Deserialize;

use crate::draw::DrawRejection;
use crate::grouping::GroupingRejection;

/// Display language for user-facing generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh-TW")]
    TraditionalChinese,
}

impl Locale {
    /// Deterministic group name for the 0-based `index`.
    pub fn fallback_group_name(&self, index: usize) -> String {
        let n = index + 1;
        match self {
            Locale::English => format!("Group {n}"),
            Locale::TraditionalChinese => format!("第 {n} 組"),
        }
    }

    /// Deterministic congratulation used when the naming service is unavailable.
    pub fn fallback_congratulation(&self, name: &str) -> String {
        match self {
            Locale::English => format!("Congratulations {name}!"),
            Locale::TraditionalChinese => format!("恭喜 {name} 獲得大獎！太幸運了！"),
        }
    }

    /// Column headers for the grouping CSV export.
    pub fn export_header(&self) -> [&'static str; 2] {
        match self {
            Locale::English => ["Group", "Name"],
            Locale::TraditionalChinese => ["組別", "姓名"],
        }
    }

    /// File name prefix for the grouping CSV export.
    pub fn export_prefix(&self) -> &'static str {
        match self {
            Locale::English => "groups",
            Locale::TraditionalChinese => "分組結果",
        }
    }
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// One-line outcome of a user command, rendered per locale by
/// [`Locale::notice`]. Error details carried as `String` are passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NamesAdded(usize),
    DuplicatesRemoved(usize),
    SampleLoaded(usize),
    RosterCleared,
    Imported { count: usize, path: String },
    ImportFailed(String),
    DrawRejected(DrawRejection),
    DrawReset,
    RepeatLocked,
    GroupingRejected(GroupingRejection),
    GeneratingNames,
    GroupsCreated(usize),
    Exported(String),
    ExportFailed(String),
}

impl Locale {
    pub fn notice(&self, notice: &Notice) -> String {
        match self {
            Locale::English => english_notice(notice),
            Locale::TraditionalChinese => chinese_notice(notice),
        }
    }
}

fn english_notice(notice: &Notice) -> String {
    match notice {
        Notice::NamesAdded(n) => format!("Added {n} names"),
        Notice::DuplicatesRemoved(n) => format!("Removed {n} duplicate names"),
        Notice::SampleLoaded(n) => format!("Loaded {n} sample names"),
        Notice::RosterCleared => "Participant list cleared".to_string(),
        Notice::Imported { count, path } => format!("Imported {count} names from {path}"),
        Notice::ImportFailed(e) => format!("Import failed: {e}"),
        Notice::DrawRejected(rejection) => rejection.to_string(),
        Notice::DrawReset => "Draw reset. Everyone is back in the pool.".to_string(),
        Notice::RepeatLocked => "Cannot change repeat mode while drawing.".to_string(),
        Notice::GroupingRejected(rejection) => rejection.to_string(),
        Notice::GeneratingNames => "Generating team names...".to_string(),
        Notice::GroupsCreated(n) => format!("Created {n} groups"),
        Notice::Exported(path) => format!("Exported to {path}"),
        Notice::ExportFailed(e) => format!("Export failed: {e}"),
    }
}

fn chinese_notice(notice: &Notice) -> String {
    match notice {
        Notice::NamesAdded(n) => format!("已新增 {n} 位成員"),
        Notice::DuplicatesRemoved(n) => format!("已移除 {n} 個重複姓名"),
        Notice::SampleLoaded(n) => format!("已載入 {n} 位範例成員"),
        Notice::RosterCleared => "名單已清空".to_string(),
        Notice::Imported { count, path } => format!("已從 {path} 匯入 {count} 位成員"),
        Notice::ImportFailed(e) => format!("匯入失敗：{e}"),
        Notice::DrawRejected(DrawRejection::EmptyRoster) => "名單是空的，請先新增成員。".to_string(),
        Notice::DrawRejected(DrawRejection::PoolExhausted) => {
            "所有人都已中獎。請重置抽籤或允許重複中獎。".to_string()
        }
        Notice::DrawRejected(DrawRejection::AlreadyDrawing) => "抽籤進行中。".to_string(),
        Notice::DrawReset => "抽籤已重置，所有人重新加入抽獎池。".to_string(),
        Notice::RepeatLocked => "抽籤進行中，無法切換重複中獎模式。".to_string(),
        Notice::GroupingRejected(GroupingRejection::EmptyRoster) => {
            "沒有成員可分組，請先新增成員。".to_string()
        }
        Notice::GeneratingNames => "正在產生隊名...".to_string(),
        Notice::GroupsCreated(n) => format!("已建立 {n} 個組別"),
        Notice::Exported(path) => format!("已匯出至 {path}"),
        Notice::ExportFailed(e) => format!("匯出失敗：{e}"),
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::English => write!(f, "en"),
            Locale::TraditionalChinese => write!(f, "zh-TW"),
        }
    }
}
