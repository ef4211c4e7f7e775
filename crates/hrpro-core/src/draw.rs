// Draw engine: winner selection with or without replacement.
//
// Idle -> Animating -> Settled, with reset and roster changes returning to
// Idle from any state. Each draw is identified by a generation number; tick
// requests and congratulation results carrying an older generation are
// ignored, so a cancelled animation can never commit a winner.

use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::roster::{Participant, ParticipantId, Roster};

/// Where the engine is in the draw cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPhase {
    Idle,
    Animating,
    Settled,
}

/// Shuffle animation cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSettings {
    /// Number of ticks per draw; the last tick commits the winner.
    pub ticks: u32,
    pub interval: Duration,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        AnimationSettings {
            ticks: 20,
            interval: Duration::from_millis(100),
        }
    }
}

/// Reasons a draw request does not proceed. These are shown to the user,
/// not treated as failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawRejection {
    #[error("The roster is empty. Add participants first.")]
    EmptyRoster,
    #[error("Everyone has already won. Reset the draw or allow repeat winners.")]
    PoolExhausted,
    #[error("A draw is already in progress.")]
    AlreadyDrawing,
}

/// Handle for one animation run. The scheduler replays `generation` on every
/// tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawTicket {
    pub generation: u64,
    pub ticks: u32,
    pub interval: Duration,
}

/// Result of applying a single animation tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Display-only name shown while shuffling.
    Shuffle(String),
    /// Final tick: the committed winner.
    Settled(Participant),
    /// Tick belonged to a cancelled or finished draw and was ignored.
    Stale,
}

#[derive(Debug, Clone)]
pub struct DrawEngine {
    roster: Vec<Participant>,
    pool: Vec<Participant>,
    /// Most recent winner first.
    history: Vec<Participant>,
    current_winner: Option<Participant>,
    display_name: Option<String>,
    congratulation: Option<String>,
    allow_repeat: bool,
    phase: DrawPhase,
    ticks_remaining: u32,
    settings: AnimationSettings,
    generation: u64,
}

impl DrawEngine {
    pub fn new(roster: &Roster, allow_repeat: bool, settings: AnimationSettings) -> Self {
        let participants = roster.participants().to_vec();
        DrawEngine {
            pool: participants.clone(),
            roster: participants,
            history: Vec::new(),
            current_winner: None,
            display_name: None,
            congratulation: None,
            allow_repeat,
            phase: DrawPhase::Idle,
            ticks_remaining: 0,
            settings,
            generation: 0,
        }
    }

    // -- Accessors --

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn allow_repeat(&self) -> bool {
        self.allow_repeat
    }

    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    pub fn pool(&self) -> &[Participant] {
        &self.pool
    }

    pub fn history(&self) -> &[Participant] {
        &self.history
    }

    pub fn current_winner(&self) -> Option<&Participant> {
        self.current_winner.as_ref()
    }

    /// Name currently on screen: the shuffling name while animating, the
    /// winner once settled.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn congratulation(&self) -> Option<&str> {
        self.congratulation.as_deref()
    }

    /// Participants a draw would choose from right now.
    pub fn eligible(&self) -> &[Participant] {
        if self.allow_repeat {
            &self.roster
        } else {
            &self.pool
        }
    }

    pub fn eligible_len(&self) -> usize {
        self.eligible().len()
    }

    // -- Transitions --

    /// Begin a draw. On success the caller schedules `ticket.ticks` calls to
    /// [`DrawEngine::tick`] spaced by `ticket.interval`.
    pub fn start_draw(&mut self) -> Result<DrawTicket, DrawRejection> {
        if self.phase == DrawPhase::Animating {
            return Err(DrawRejection::AlreadyDrawing);
        }
        if self.eligible().is_empty() {
            return Err(if self.roster.is_empty() {
                DrawRejection::EmptyRoster
            } else {
                DrawRejection::PoolExhausted
            });
        }

        self.generation += 1;
        self.phase = DrawPhase::Animating;
        self.ticks_remaining = self.settings.ticks.max(1);
        self.current_winner = None;
        self.congratulation = None;

        debug!(
            "Draw started (gen: {}, eligible: {})",
            self.generation,
            self.eligible_len()
        );

        Ok(DrawTicket {
            generation: self.generation,
            ticks: self.ticks_remaining,
            interval: self.settings.interval,
        })
    }

    /// Apply one animation tick for the draw identified by `generation`.
    ///
    /// The eligible pool is read at every tick, never captured at start.
    pub fn tick<R: Rng + ?Sized>(&mut self, generation: u64, rng: &mut R) -> TickOutcome {
        if generation != self.generation || self.phase != DrawPhase::Animating {
            debug!(
                "Discarding stale draw tick (tick gen: {}, current gen: {})",
                generation, self.generation
            );
            return TickOutcome::Stale;
        }

        let len = self.eligible_len();
        if len == 0 {
            warn!("Eligible pool emptied during animation, abandoning draw");
            self.phase = DrawPhase::Idle;
            self.display_name = None;
            return TickOutcome::Stale;
        }

        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        let index = rng.gen_range(0..len);

        if self.ticks_remaining > 0 {
            let name = self.eligible()[index].name.clone();
            self.display_name = Some(name.clone());
            return TickOutcome::Shuffle(name);
        }

        let winner = self.eligible()[index].clone();
        self.history.insert(0, winner.clone());
        if !self.allow_repeat {
            self.pool.retain(|p| p.id != winner.id);
        }
        self.display_name = Some(winner.name.clone());
        self.current_winner = Some(winner.clone());
        self.phase = DrawPhase::Settled;

        info!(
            "Winner #{}: {} ({} left in pool)",
            self.history.len(),
            winner.name,
            self.eligible_len()
        );
        TickOutcome::Settled(winner)
    }

    /// Run a whole draw without a scheduler: start, then apply every tick.
    pub fn draw_now<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Participant, DrawRejection> {
        let ticket = self.start_draw()?;
        for _ in 0..ticket.ticks {
            if let TickOutcome::Settled(winner) = self.tick(ticket.generation, rng) {
                return Ok(winner);
            }
        }
        // Unreachable while ticks >= 1; treat as exhausted rather than panic.
        Err(DrawRejection::PoolExhausted)
    }

    /// Clear history, refill the pool from the roster, return to Idle.
    /// Any pending tick or congratulation becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.pool = self.roster.clone();
        self.history.clear();
        self.current_winner = None;
        self.display_name = None;
        self.congratulation = None;
        self.ticks_remaining = 0;
        self.phase = DrawPhase::Idle;
    }

    /// Adopt a new roster. Equivalent to a reset against the new list.
    pub fn set_roster(&mut self, roster: &Roster) {
        self.roster = roster.participants().to_vec();
        self.reset();
        debug!("Draw engine adopted roster of {}", self.roster.len());
    }

    /// Toggle repeat winners. Refused while a draw is animating, since the
    /// eligible set must not change mid-draw.
    pub fn set_allow_repeat(&mut self, allow: bool) -> bool {
        if self.phase == DrawPhase::Animating {
            return false;
        }
        self.allow_repeat = allow;
        true
    }

    pub fn set_settings(&mut self, settings: AnimationSettings) {
        self.settings = settings;
    }

    /// Attach a congratulation for the settled winner. Ignored unless the
    /// draw identified by `generation` is still the settled one and its
    /// winner is `winner_id`.
    pub fn attach_congratulation(
        &mut self,
        generation: u64,
        winner_id: &ParticipantId,
        message: String,
    ) -> bool {
        let matches = generation == self.generation
            && self.phase == DrawPhase::Settled
            && self
                .current_winner
                .as_ref()
                .is_some_and(|w| &w.id == winner_id);
        if !matches {
            debug!("Discarding stale congratulation (gen: {})", generation);
            return false;
        }
        self.congratulation = Some(message);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn roster(names: &[&str]) -> Roster {
        Roster::from_names(names.iter().copied(), 1)
    }

    fn engine(names: &[&str], allow_repeat: bool) -> DrawEngine {
        DrawEngine::new(&roster(names), allow_repeat, AnimationSettings::default())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn new_engine_is_idle_with_full_pool() {
        let e = engine(&["A", "B"], false);
        assert_eq!(e.phase(), DrawPhase::Idle);
        assert_eq!(e.pool().len(), 2);
        assert!(e.history().is_empty());
        assert!(e.current_winner().is_none());
    }

    #[test]
    fn start_draw_transitions_to_animating() {
        let mut e = engine(&["A", "B"], false);
        let ticket = e.start_draw().unwrap();
        assert_eq!(e.phase(), DrawPhase::Animating);
        assert_eq!(ticket.ticks, 20);
        assert_eq!(ticket.interval, Duration::from_millis(100));
        assert_eq!(ticket.generation, e.generation());
    }

    #[test]
    fn start_draw_rejected_while_animating() {
        let mut e = engine(&["A", "B"], false);
        e.start_draw().unwrap();
        assert_eq!(e.start_draw(), Err(DrawRejection::AlreadyDrawing));
    }

    #[test]
    fn start_draw_rejected_on_empty_roster() {
        let mut e = engine(&[], false);
        assert_eq!(e.start_draw(), Err(DrawRejection::EmptyRoster));
        assert_eq!(e.phase(), DrawPhase::Idle);
    }

    #[test]
    fn ticks_shuffle_then_settle() {
        let mut e = engine(&["A", "B", "C"], false);
        let mut rng = rng();
        let ticket = e.start_draw().unwrap();

        for _ in 0..ticket.ticks - 1 {
            match e.tick(ticket.generation, &mut rng) {
                TickOutcome::Shuffle(name) => {
                    assert!(["A", "B", "C"].contains(&name.as_str()));
                    assert_eq!(e.display_name(), Some(name.as_str()));
                }
                other => panic!("expected shuffle, got {other:?}"),
            }
            assert!(e.history().is_empty(), "shuffle must not commit");
        }

        let winner = match e.tick(ticket.generation, &mut rng) {
            TickOutcome::Settled(w) => w,
            other => panic!("expected settle, got {other:?}"),
        };
        assert_eq!(e.phase(), DrawPhase::Settled);
        assert_eq!(e.history(), &[winner.clone()]);
        assert_eq!(e.pool().len(), 2);
        assert!(!e.pool().iter().any(|p| p.id == winner.id));
        assert_eq!(e.display_name(), Some(winner.name.as_str()));
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut e = engine(&["A", "B", "C"], false);
        let mut rng = rng();
        let first = e.draw_now(&mut rng).unwrap();
        let second = e.draw_now(&mut rng).unwrap();
        assert_eq!(e.history()[0], second);
        assert_eq!(e.history()[1], first);
    }

    #[test]
    fn three_draws_exhaust_pool_then_reject() {
        let mut e = engine(&["A", "B", "C"], false);
        let mut rng = rng();
        for _ in 0..3 {
            e.draw_now(&mut rng).unwrap();
        }
        assert!(e.pool().is_empty());
        let before = e.history().to_vec();

        assert_eq!(e.start_draw(), Err(DrawRejection::PoolExhausted));
        assert_eq!(e.history(), before.as_slice());
        assert_eq!(e.phase(), DrawPhase::Settled);

        let ids: HashSet<_> = e.history().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn repeat_mode_uses_full_roster() {
        let mut e = engine(&["A"], true);
        let mut rng = rng();
        for _ in 0..5 {
            e.draw_now(&mut rng).unwrap();
        }
        assert_eq!(e.history().len(), 5);
        assert_eq!(e.eligible_len(), 1);
        assert_eq!(e.pool().len(), 1, "pool untouched in repeat mode");
    }

    #[test]
    fn reset_restores_pool_and_clears_history() {
        let mut e = engine(&["A", "B"], false);
        let mut rng = rng();
        e.draw_now(&mut rng).unwrap();
        e.reset();
        assert_eq!(e.phase(), DrawPhase::Idle);
        assert_eq!(e.pool(), e.roster());
        assert!(e.history().is_empty());
        assert!(e.current_winner().is_none());

        e.reset();
        assert_eq!(e.pool(), e.roster());
        assert!(e.history().is_empty());
    }

    #[test]
    fn reset_during_animation_makes_ticks_stale() {
        let mut e = engine(&["A", "B"], false);
        let mut rng = rng();
        let ticket = e.start_draw().unwrap();
        e.tick(ticket.generation, &mut rng);
        e.reset();

        for _ in 0..ticket.ticks {
            assert_eq!(e.tick(ticket.generation, &mut rng), TickOutcome::Stale);
        }
        assert!(e.history().is_empty());
        assert_eq!(e.pool().len(), 2);
    }

    #[test]
    fn roster_change_mid_animation_never_settles_old_draw() {
        let mut e = engine(&["A", "B"], false);
        let mut rng = rng();
        let ticket = e.start_draw().unwrap();

        e.set_roster(&roster(&["X", "Y", "Z"]));
        for _ in 0..ticket.ticks {
            assert_eq!(e.tick(ticket.generation, &mut rng), TickOutcome::Stale);
        }
        assert_eq!(e.phase(), DrawPhase::Idle);
        assert_eq!(e.pool().len(), 3);
        assert!(e.history().is_empty());
    }

    #[test]
    fn toggle_repeat_refused_while_animating() {
        let mut e = engine(&["A", "B"], false);
        e.start_draw().unwrap();
        assert!(!e.set_allow_repeat(true));
        assert!(!e.allow_repeat());
    }

    #[test]
    fn congratulation_attaches_only_to_current_winner() {
        let mut e = engine(&["A", "B"], false);
        let mut rng = rng();
        let winner = e.draw_now(&mut rng).unwrap();
        let generation = e.generation();

        assert!(e.attach_congratulation(generation, &winner.id, "Yay".into()));
        assert_eq!(e.congratulation(), Some("Yay"));

        e.reset();
        assert!(!e.attach_congratulation(generation, &winner.id, "Late".into()));
        assert!(e.congratulation().is_none());
    }

    #[test]
    fn new_draw_clears_previous_congratulation() {
        let mut e = engine(&["A", "B"], false);
        let mut rng = rng();
        let winner = e.draw_now(&mut rng).unwrap();
        e.attach_congratulation(e.generation(), &winner.id, "Yay".into());
        let old_generation = e.generation();

        e.start_draw().unwrap();
        assert!(e.congratulation().is_none());
        assert!(!e.attach_congratulation(old_generation, &winner.id, "Late".into()));
    }

    #[test]
    fn single_tick_setting_settles_immediately() {
        let mut e = DrawEngine::new(
            &roster(&["A"]),
            false,
            AnimationSettings {
                ticks: 1,
                interval: Duration::from_millis(1),
            },
        );
        let mut rng = rng();
        let ticket = e.start_draw().unwrap();
        assert!(matches!(
            e.tick(ticket.generation, &mut rng),
            TickOutcome::Settled(_)
        ));
    }
}
