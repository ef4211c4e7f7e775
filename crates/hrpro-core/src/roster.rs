// Roster store: participant ingestion from free text or CSV, duplicate
// detection, and deduplication.
//
// Every edit rebuilds the roster wholesale from a list of names. Identifiers
// are `{stamp}-{index}` where the stamp strictly increases per store, so an
// identifier is never handed out twice.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Header token dropped from imported lists (compared case-insensitively).
const HEADER_TOKEN: &str = "name";

/// Names loaded by [`RosterStore::load_sample`].
pub const SAMPLE_NAMES: &[&str] = &[
    "陳小明", "林美玲", "張大強", "李曉芬", "王家豪", "吳淑芬",
    "劉得華", "蔡依林", "周杰倫", "郭雪芙", "許光漢", "柯佳嬿",
];

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// Opaque participant identifier, unique within a roster store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    fn new(stamp: i64, index: usize) -> Self {
        ParticipantId(format!("{stamp}-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single entrant in the draw or grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// Ordered participant list; insertion order is input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    /// Build a roster from already-cleaned names, assigning ids from `stamp`.
    pub fn from_names<I, S>(names: I, stamp: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let participants = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Participant {
                id: ParticipantId::new(stamp, index),
                name: name.into(),
            })
            .collect();
        Roster { participants }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Participant> {
        self.participants.get(index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.participants.iter().map(|p| p.name.as_str())
    }

    /// Number of entries whose exact name already appeared earlier.
    pub fn duplicate_count(&self) -> usize {
        let unique: HashSet<&str> = self.names().collect();
        self.len() - unique.len()
    }

    /// Keep the first occurrence of each exact name, preserving order.
    ///
    /// Identifiers are reassigned from `stamp`; they are not stable across
    /// deduplication.
    pub fn deduplicated(&self, stamp: i64) -> Roster {
        let mut seen = HashSet::new();
        let names: Vec<&str> = self.names().filter(|n| seen.insert(*n)).collect();
        Roster::from_names(names, stamp)
    }

    /// Names joined by newlines, the same shape `parse_names` accepts.
    pub fn to_text(&self) -> String {
        self.names().collect::<Vec<_>>().join("\n")
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split free text into participant names.
///
/// Lines are trimmed; empty lines and a `name` header token are dropped.
pub fn parse_names(raw: &str) -> Vec<String> {
    raw.trim_start_matches('\u{feff}')
        .lines()
        .filter_map(clean_name)
        .collect()
}

/// Read participant names from CSV, taking the first field of every line.
///
/// Quoting is off so a stray `"` can never join lines into one record; one
/// layer of surrounding quotes is stripped from the field instead. Rows that
/// fail to decode are skipped with a warning rather than aborting the whole
/// import.
pub fn parse_csv_names<R: Read>(rdr: R) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(rdr);

    let mut names = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                if let Some(name) = record.get(0).map(unquote_field).and_then(clean_name) {
                    names.push(name);
                }
            }
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
            }
        }
    }
    names
}

/// Drop a surrounding `"` pair, or a lone stray quote at either end.
fn unquote_field(raw: &str) -> &str {
    let field = raw.trim_start_matches('\u{feff}').trim();
    match (field.strip_prefix('"'), field.strip_suffix('"')) {
        (Some(_), Some(_)) if field.len() >= 2 => &field[1..field.len() - 1],
        (Some(_), Some(_)) => "",
        (Some(rest), None) => rest,
        (None, Some(rest)) => rest,
        _ => field,
    }
}

fn clean_name(raw: &str) -> Option<String> {
    let name = raw.trim().trim_start_matches('\u{feff}').trim();
    if name.is_empty() || name.eq_ignore_ascii_case(HEADER_TOKEN) {
        None
    } else {
        Some(name.to_string())
    }
}

// ---------------------------------------------------------------------------
// RosterStore
// ---------------------------------------------------------------------------

/// Owner of the canonical roster and its identifier stamps.
#[derive(Debug, Default)]
pub struct RosterStore {
    roster: Roster,
    last_stamp: i64,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Current names, one per line.
    pub fn names_text(&self) -> String {
        self.roster.to_text()
    }

    /// Replace the roster with the names parsed from `raw`.
    pub fn replace_text(&mut self, raw: &str) -> &Roster {
        let names = parse_names(raw);
        self.rebuild(names)
    }

    /// Append the names parsed from `raw` to the existing list.
    pub fn append_text(&mut self, raw: &str) -> &Roster {
        let mut names: Vec<String> = self.roster.names().map(str::to_string).collect();
        names.extend(parse_names(raw));
        self.rebuild(names)
    }

    /// Remove the participant at `index`. Returns `false` when out of range.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.roster.len() {
            return false;
        }
        let names: Vec<String> = self
            .roster
            .names()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, n)| n.to_string())
            .collect();
        self.rebuild(names);
        true
    }

    /// Replace the roster with names read from CSV.
    pub fn import_csv<R: Read>(&mut self, rdr: R) -> &Roster {
        let names = parse_csv_names(rdr);
        self.rebuild(names)
    }

    /// Replace the roster with names read from the CSV or text file at `path`.
    pub fn import_file(&mut self, path: &Path) -> Result<&Roster, RosterError> {
        let file = std::fs::File::open(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Importing roster from {}", path.display());
        Ok(self.import_csv(file))
    }

    /// Collapse duplicate names in place.
    pub fn deduplicate(&mut self) -> &Roster {
        let before = self.roster.len();
        let stamp = self.next_stamp();
        self.roster = self.roster.deduplicated(stamp);
        info!(
            "Removed {} duplicate names ({} remaining)",
            before - self.roster.len(),
            self.roster.len()
        );
        &self.roster
    }

    pub fn clear(&mut self) {
        self.roster = Roster::default();
    }

    /// Replace the roster with the built-in sample list.
    pub fn load_sample(&mut self) -> &Roster {
        self.rebuild(SAMPLE_NAMES.iter().map(|s| s.to_string()).collect())
    }

    fn rebuild(&mut self, names: Vec<String>) -> &Roster {
        let stamp = self.next_stamp();
        self.roster = Roster::from_names(names, stamp);
        debug!("Roster rebuilt with {} participants", self.roster.len());
        &self.roster
    }

    /// Millisecond timestamp, bumped past the previous stamp when the clock
    /// has not advanced.
    fn next_stamp(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let stamp = now.max(self.last_stamp + 1);
        self.last_stamp = stamp;
        stamp
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
