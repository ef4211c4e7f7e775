// Integration tests for the roster, draw, grouping, and export engines.
//
// These exercise the public API the way the app loop drives it: rosters come
// from a `RosterStore`, draws and grouping runs use a seeded RNG, and naming
// goes through the `Namer` trait.

use std::collections::HashSet;

use async_trait::async_trait;
use hrpro_core::draw::{AnimationSettings, DrawEngine, DrawPhase, DrawRejection, TickOutcome};
use hrpro_core::export::groups_to_csv_string;
use hrpro_core::grouping::{self, GroupingEngine};
use hrpro_core::labels::Locale;
use hrpro_core::naming::Namer;
use hrpro_core::roster::{Roster, RosterStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ===========================================================================
// Test helpers
// ===========================================================================

fn roster_of(names: &[&str]) -> Roster {
    let mut store = RosterStore::new();
    store.replace_text(&names.join("\n")).clone()
}

fn numbered_roster(n: usize) -> Roster {
    Roster::from_names((1..=n).map(|i| format!("Employee {i}")), 42)
}

fn quick_settings() -> AnimationSettings {
    AnimationSettings {
        ticks: 3,
        interval: std::time::Duration::from_millis(1),
    }
}

/// Namer whose backing service always fails and returns nothing usable.
struct BrokenNamer;

#[async_trait]
impl Namer for BrokenNamer {
    async fn generate_team_names(&self, _count: usize) -> Vec<String> {
        Vec::new()
    }

    async fn generate_congratulation(&self, name: &str) -> String {
        Locale::English.fallback_congratulation(name)
    }
}

/// Namer that only manages part of the list.
struct PartialNamer;

#[async_trait]
impl Namer for PartialNamer {
    async fn generate_team_names(&self, _count: usize) -> Vec<String> {
        vec!["Comets".into(), String::new()]
    }

    async fn generate_congratulation(&self, name: &str) -> String {
        format!("Well done, {name}")
    }
}

// ===========================================================================
// Roster
// ===========================================================================

#[test]
fn deduplicate_is_idempotent_and_never_grows() {
    let inputs: [&[&str]; 4] = [
        &["Ann", "Ann", "Bo", "Ann", "Cy", "Bo"],
        &["Solo"],
        &["A", "B", "C"],
        &["X", "X", "X", "X"],
    ];
    for names in inputs {
        let mut store = RosterStore::new();
        let original_len = store.replace_text(&names.join("\n")).len();

        let once: Vec<String> = store
            .deduplicate()
            .names()
            .map(str::to_string)
            .collect();
        let twice: Vec<String> = store
            .deduplicate()
            .names()
            .map(str::to_string)
            .collect();

        assert_eq!(once, twice, "dedupe should be idempotent for {names:?}");
        assert!(once.len() <= original_len);
        assert_eq!(store.roster().duplicate_count(), 0);
    }
}

#[test]
fn import_drops_blank_rows_and_header() {
    let csv = "Name,Department\nAlice,HR\n\n  Bob  ,IT\nCarol\n";
    let mut store = RosterStore::new();
    let roster = store.import_csv(csv.as_bytes());
    let names: Vec<&str> = roster.names().collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
}

// ===========================================================================
// Draw
// ===========================================================================

#[test]
fn draws_without_repeats_are_distinct_and_shrink_pool() {
    let n = 8;
    let roster = numbered_roster(n);
    let mut engine = DrawEngine::new(&roster, false, quick_settings());
    let mut rng = StdRng::seed_from_u64(2024);

    for k in 1..=n {
        engine.draw_now(&mut rng).expect("draw should succeed");
        assert_eq!(engine.history().len(), k);
        assert_eq!(engine.pool().len(), n - k);

        let ids: HashSet<&str> = engine.history().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), k, "winners must be distinct by id");
    }
}

#[test]
fn three_draws_empty_pool_and_fourth_is_rejected() {
    let roster = roster_of(&["A", "B", "C"]);
    let mut engine = DrawEngine::new(&roster, false, quick_settings());
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..3 {
        engine.draw_now(&mut rng).unwrap();
    }
    assert!(engine.pool().is_empty());

    let history_before = engine.history().to_vec();
    assert_eq!(engine.draw_now(&mut rng), Err(DrawRejection::PoolExhausted));
    assert_eq!(engine.history(), history_before.as_slice());
}

#[test]
fn draws_with_repeats_use_full_roster() {
    let roster = roster_of(&["A", "B"]);
    let mut engine = DrawEngine::new(&roster, true, quick_settings());
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..20 {
        engine.draw_now(&mut rng).unwrap();
        assert_eq!(engine.eligible_len(), 2);
    }
    let ids: HashSet<&str> = engine.history().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(engine.history().len(), 20);
    assert!(ids.len() < 20, "repeat winners are expected with two names");
}

#[test]
fn reset_restores_pool_from_any_state() {
    let roster = numbered_roster(5);
    let mut rng = StdRng::seed_from_u64(3);

    // Settled
    let mut engine = DrawEngine::new(&roster, false, quick_settings());
    engine.draw_now(&mut rng).unwrap();
    engine.draw_now(&mut rng).unwrap();
    engine.reset();
    assert_eq!(engine.pool(), roster.participants());
    assert!(engine.history().is_empty());
    assert_eq!(engine.phase(), DrawPhase::Idle);

    // Mid-animation
    let ticket = engine.start_draw().unwrap();
    engine.tick(ticket.generation, &mut rng);
    engine.reset();
    assert_eq!(engine.pool(), roster.participants());
    assert!(engine.history().is_empty());
}

#[test]
fn roster_change_cancels_pending_animation() {
    let mut store = RosterStore::new();
    store.replace_text("A\nB\nC");
    let mut engine = DrawEngine::new(store.roster(), false, quick_settings());
    let mut rng = StdRng::seed_from_u64(5);

    let ticket = engine.start_draw().unwrap();
    engine.tick(ticket.generation, &mut rng);

    engine.set_roster(store.append_text("D"));
    for _ in 0..ticket.ticks {
        assert_eq!(engine.tick(ticket.generation, &mut rng), TickOutcome::Stale);
    }
    assert!(engine.history().is_empty());
    assert_eq!(engine.pool().len(), 4);
}

// ===========================================================================
// Grouping
// ===========================================================================

#[test]
fn grouping_sizes_and_membership_hold_for_many_shapes() {
    let mut rng = StdRng::seed_from_u64(99);
    for n in 1..=13 {
        let roster = numbered_roster(n);
        for size in 1..=6 {
            let mut engine = GroupingEngine::new(size, false, Locale::English);
            let groups = engine.run_now(&roster, &mut rng).unwrap().to_vec();

            assert_eq!(groups.len(), n.div_ceil(size), "n={n} size={size}");
            let (last, full) = groups.split_last().unwrap();
            assert!(full.iter().all(|g| g.members.len() == size));
            assert!((1..=size).contains(&last.members.len()));

            let mut members: Vec<&str> = groups
                .iter()
                .flat_map(|g| g.members.iter().map(|m| m.id.as_str()))
                .collect();
            members.sort_unstable();
            let mut expected: Vec<&str> = roster.participants().iter().map(|p| p.id.as_str()).collect();
            expected.sort_unstable();
            assert_eq!(members, expected);
        }
    }
}

#[tokio::test]
async fn broken_namer_yields_numbered_groups() {
    let mut rng = StdRng::seed_from_u64(1);
    let groups = grouping::group(
        &numbered_roster(6),
        2,
        Some(&BrokenNamer),
        Locale::English,
        &mut rng,
    )
    .await;
    let labels: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(labels, vec!["Group 1", "Group 2", "Group 3"]);
}

#[tokio::test]
async fn partial_names_are_filled_positionally() {
    let mut rng = StdRng::seed_from_u64(1);
    let groups = grouping::group(
        &numbered_roster(6),
        2,
        Some(&PartialNamer),
        Locale::TraditionalChinese,
        &mut rng,
    )
    .await;
    let labels: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(labels, vec!["Comets", "第 2 組", "第 3 組"]);
}

// ===========================================================================
// Export
// ===========================================================================

#[test]
fn export_lists_every_member_once() {
    let roster = roster_of(&["A", "B", "C", "D"]);
    let mut rng = StdRng::seed_from_u64(4);
    let mut engine = GroupingEngine::new(2, false, Locale::English);
    let groups = engine.run_now(&roster, &mut rng).unwrap();

    let csv = groups_to_csv_string(groups, Locale::English).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("\u{feff}Group,Name"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 4);
    for name in ["A", "B", "C", "D"] {
        let needle = format!(",\"{name}\"");
        assert_eq!(rows.iter().filter(|r| r.ends_with(&needle)).count(), 1);
    }
}
