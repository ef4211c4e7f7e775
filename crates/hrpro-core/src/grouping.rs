// Grouping engine: uniform shuffle, contiguous chunking, and group naming.
//
// A run is split in two so the naming call can happen off the event loop:
// `plan` shuffles and chunks immediately, `finish` attaches names and
// publishes the groups. Every completed run replaces the previous groups.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::labels::Locale;
use crate::naming::Namer;
use crate::roster::{Participant, Roster};

/// A named subset of the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub members: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupingRejection {
    #[error("No participants to group. Add participants first.")]
    EmptyRoster,
}

/// `ceil(total / group_size)`; a zero size is treated as one.
pub fn group_count(total: usize, group_size: usize) -> usize {
    total.div_ceil(group_size.max(1))
}

/// Shuffle uniformly (Fisher-Yates) and cut into chunks of at most
/// `group_size`, in order. Only the last chunk may be short.
pub fn partition<R: Rng + ?Sized>(
    participants: &[Participant],
    group_size: usize,
    rng: &mut R,
) -> Vec<Vec<Participant>> {
    let mut shuffled = participants.to_vec();
    shuffled.shuffle(rng);
    shuffled
        .chunks(group_size.max(1))
        .map(<[Participant]>::to_vec)
        .collect()
}

/// Attach names to chunks. `names` are used positionally; a missing or blank
/// entry falls back to the localized `Group {n}`.
pub fn assemble(chunks: Vec<Vec<Participant>>, names: &[String], locale: Locale) -> Vec<Group> {
    chunks
        .into_iter()
        .enumerate()
        .map(|(index, members)| {
            let name = names
                .get(index)
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| locale.fallback_group_name(index));
            Group {
                id: format!("group-{index}"),
                name,
                members,
            }
        })
        .collect()
}

/// One-shot grouping: shuffle, chunk, and optionally ask `namer` for names.
pub async fn group<R: Rng + ?Sized>(
    roster: &Roster,
    group_size: usize,
    namer: Option<&dyn Namer>,
    locale: Locale,
    rng: &mut R,
) -> Vec<Group> {
    let chunks = partition(roster.participants(), group_size, rng);
    let names = match namer {
        Some(namer) if !chunks.is_empty() => namer.generate_team_names(chunks.len()).await,
        _ => Vec::new(),
    };
    assemble(chunks, &names, locale)
}

// ---------------------------------------------------------------------------
// GroupingEngine
// ---------------------------------------------------------------------------

/// A shuffled run waiting for its names.
#[derive(Debug, Clone)]
struct PendingRun {
    generation: u64,
    chunks: Vec<Vec<Participant>>,
}

/// Returned by [`GroupingEngine::plan`]; tells the caller how many names to
/// request and which generation to report back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingPlan {
    pub generation: u64,
    pub group_count: usize,
    pub wants_names: bool,
}

#[derive(Debug, Clone)]
pub struct GroupingEngine {
    group_size: usize,
    use_generated_names: bool,
    locale: Locale,
    groups: Vec<Group>,
    pending: Option<PendingRun>,
    generation: u64,
}

impl GroupingEngine {
    pub fn new(group_size: usize, use_generated_names: bool, locale: Locale) -> Self {
        GroupingEngine {
            group_size: group_size.max(1),
            use_generated_names,
            locale,
            groups: Vec::new(),
            pending: None,
            generation: 0,
        }
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn set_group_size(&mut self, size: usize) {
        self.group_size = size.max(1);
    }

    pub fn use_generated_names(&self) -> bool {
        self.use_generated_names
    }

    pub fn set_use_generated_names(&mut self, enabled: bool) {
        self.use_generated_names = enabled;
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of groups a run over `total` participants would produce.
    pub fn projected_group_count(&self, total: usize) -> usize {
        group_count(total, self.group_size)
    }

    /// Shuffle and chunk `roster`. Supersedes any run still waiting for names.
    pub fn plan<R: Rng + ?Sized>(
        &mut self,
        roster: &Roster,
        rng: &mut R,
    ) -> Result<GroupingPlan, GroupingRejection> {
        if roster.is_empty() {
            return Err(GroupingRejection::EmptyRoster);
        }

        let chunks = partition(roster.participants(), self.group_size, rng);
        self.generation += 1;
        let plan = GroupingPlan {
            generation: self.generation,
            group_count: chunks.len(),
            wants_names: self.use_generated_names,
        };
        self.pending = Some(PendingRun {
            generation: self.generation,
            chunks,
        });

        debug!(
            "Planned {} groups of up to {} (gen: {})",
            plan.group_count, self.group_size, plan.generation
        );
        Ok(plan)
    }

    /// Publish the pending run for `generation` with the given names.
    /// Returns `false` when the run was superseded.
    pub fn finish(&mut self, generation: u64, names: &[String]) -> bool {
        match self.pending.take() {
            Some(run) if run.generation == generation => {
                self.groups = assemble(run.chunks, names, self.locale);
                info!("Created {} groups", self.groups.len());
                true
            }
            other => {
                self.pending = other;
                debug!("Discarding stale group names (gen: {})", generation);
                false
            }
        }
    }

    /// Drop the pending run, if any, so its names can never publish.
    /// Returns whether a run was pending.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(run) => {
                self.generation += 1;
                debug!("Cancelled pending grouping run (gen: {})", run.generation);
                true
            }
            None => false,
        }
    }

    /// Synchronous run without generated names.
    pub fn run_now<R: Rng + ?Sized>(
        &mut self,
        roster: &Roster,
        rng: &mut R,
    ) -> Result<&[Group], GroupingRejection> {
        let plan = self.plan(roster, rng)?;
        self.finish(plan.generation, &[]);
        Ok(&self.groups)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
