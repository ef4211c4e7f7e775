// Application state and orchestration logic.
//
// The central event loop owns the roster, draw, and grouping engines. It
// handles user commands from the TUI and internal events from spawned tasks
// (animation ticks, congratulation and team-name results), and pushes UI
// updates to the TUI render loop.

use std::path::PathBuf;
use std::sync::Arc;

use hrpro_core::config::Config;
use hrpro_core::draw::{DrawEngine, DrawTicket, TickOutcome};
use hrpro_core::export::export_to_dir;
use hrpro_core::grouping::{GroupingEngine, GroupingPlan};
use hrpro_core::labels::Notice;
use hrpro_core::naming::Namer;
use hrpro_core::protocol::{AppSnapshot, UiUpdate, UserCommand};
use hrpro_core::roster::{Participant, ParticipantId, RosterStore};
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Internal events
// ---------------------------------------------------------------------------

/// Events produced by tasks spawned from the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    AnimationTick {
        generation: u64,
    },
    Congratulation {
        generation: u64,
        winner_id: ParticipantId,
        message: String,
    },
    TeamNames {
        generation: u64,
        names: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub roster: RosterStore,
    pub draw: DrawEngine,
    pub grouping: GroupingEngine,
    namer: Arc<dyn Namer>,
    llm_enabled: bool,
    export_dir: PathBuf,
    event_tx: mpsc::Sender<AppEvent>,
    animation_task: Option<JoinHandle<()>>,
    congratulation_task: Option<JoinHandle<()>>,
    naming_task: Option<JoinHandle<()>>,
    rng: StdRng,
}

impl AppState {
    pub fn new(
        config: Config,
        namer: Arc<dyn Namer>,
        llm_enabled: bool,
        event_tx: mpsc::Sender<AppEvent>,
        rng: StdRng,
    ) -> Self {
        let roster = RosterStore::new();
        let draw = DrawEngine::new(
            roster.roster(),
            config.draw.allow_repeat,
            config.animation_settings(),
        );
        let grouping = GroupingEngine::new(
            config.grouping.group_size,
            config.grouping.generated_names,
            config.general.locale,
        );
        let export_dir = config.export_dir();

        AppState {
            config,
            roster,
            draw,
            grouping,
            namer,
            llm_enabled,
            export_dir,
            event_tx,
            animation_task: None,
            congratulation_task: None,
            naming_task: None,
            rng,
        }
    }

    /// Override where exports are written.
    pub fn set_export_dir(&mut self, dir: PathBuf) {
        self.export_dir = dir;
    }

    /// Build a full snapshot of the current state for the TUI.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let roster = self.roster.roster();
        AppSnapshot {
            names: roster.names().map(str::to_string).collect(),
            duplicate_count: roster.duplicate_count(),
            draw_phase: self.draw.phase(),
            display_name: self.draw.display_name().map(str::to_string),
            winner: self.draw.current_winner().map(|w| w.name.clone()),
            congratulation: self.draw.congratulation().map(str::to_string),
            history: self.draw.history().iter().map(|p| p.name.clone()).collect(),
            eligible_count: self.draw.eligible_len(),
            allow_repeat: self.draw.allow_repeat(),
            groups: self.grouping.groups().to_vec(),
            group_size: self.grouping.group_size(),
            generated_names: self.grouping.use_generated_names(),
            grouping_pending: self.grouping.is_pending(),
            projected_group_count: self.grouping.projected_group_count(roster.len()),
            llm_enabled: self.llm_enabled,
        }
    }

    /// Abort the animation and congratulation tasks. Anything they already
    /// queued is discarded by the generation check.
    pub fn cancel_draw_tasks(&mut self) {
        if let Some(handle) = self.animation_task.take() {
            handle.abort();
            debug!("Cancelled draw animation task");
        }
        if let Some(handle) = self.congratulation_task.take() {
            handle.abort();
            debug!("Cancelled congratulation task");
        }
    }

    /// Push the current roster into the draw engine after any roster edit.
    /// A grouping run still waiting on team names was planned from the old
    /// roster, so it is dropped.
    fn roster_changed(&mut self) {
        self.cancel_draw_tasks();
        if let Some(handle) = self.naming_task.take() {
            handle.abort();
            debug!("Cancelled team-name task");
        }
        self.grouping.cancel_pending();
        self.draw.set_roster(self.roster.roster());
    }

    /// Spawn the task that paces animation ticks for `ticket`.
    fn spawn_animation(&mut self, ticket: DrawTicket) {
        self.cancel_draw_tasks();
        let tx = self.event_tx.clone();
        self.animation_task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(ticket.interval);
            // The first tick completes immediately.
            interval.tick().await;
            for _ in 0..ticket.ticks {
                interval.tick().await;
                let event = AppEvent::AnimationTick {
                    generation: ticket.generation,
                };
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }));
    }

    /// Ask the namer for a congratulation for the settled `winner`.
    fn spawn_congratulation(&mut self, winner: Participant) {
        let generation = self.draw.generation();
        let namer = Arc::clone(&self.namer);
        let tx = self.event_tx.clone();
        self.congratulation_task = Some(tokio::spawn(async move {
            let message = namer.generate_congratulation(&winner.name).await;
            let _ = tx
                .send(AppEvent::Congratulation {
                    generation,
                    winner_id: winner.id,
                    message,
                })
                .await;
        }));
    }

    /// Ask the namer for team names for a planned grouping run.
    fn spawn_team_names(&mut self, plan: GroupingPlan) {
        if let Some(handle) = self.naming_task.take() {
            handle.abort();
            debug!("Cancelled superseded team-name task");
        }
        let namer = Arc::clone(&self.namer);
        let tx = self.event_tx.clone();
        self.naming_task = Some(tokio::spawn(async move {
            let names = namer.generate_team_names(plan.group_count).await;
            let _ = tx
                .send(AppEvent::TeamNames {
                    generation: plan.generation,
                    names,
                })
                .await;
        }));
    }

    fn cancel_all_tasks(&mut self) {
        self.cancel_draw_tasks();
        if let Some(handle) = self.naming_task.take() {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Internal events from spawned animation and naming tasks
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut event_rx: mpsc::Receiver<AppEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    send_snapshot(&state, &ui_tx).await;

    // AppState holds a sender, so this channel never closes while the loop
    // runs; the guard only matters if a caller wires it differently.
    let mut events_open = true;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Internal events ---
            event = event_rx.recv(), if events_open => {
                match event {
                    Some(event) => {
                        handle_app_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        info!("Event channel closed");
                        events_open = false;
                    }
                }
            }
        }
    }

    // Cleanup
    state.cancel_all_tasks();
    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

async fn send_notice(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>, notice: Notice) {
    let message = state.config.general.locale.notice(&notice);
    let _ = ui_tx.send(UiUpdate::Notice(message)).await;
}

/// Handle an event from a spawned task.
async fn handle_app_event(state: &mut AppState, event: AppEvent, ui_tx: &mpsc::Sender<UiUpdate>) {
    match event {
        AppEvent::AnimationTick { generation } => {
            match state.draw.tick(generation, &mut state.rng) {
                TickOutcome::Shuffle(name) => {
                    let _ = ui_tx.send(UiUpdate::ShuffleName(name)).await;
                }
                TickOutcome::Settled(winner) => {
                    state.animation_task = None;
                    state.spawn_congratulation(winner);
                    send_snapshot(state, ui_tx).await;
                }
                TickOutcome::Stale => {}
            }
        }
        AppEvent::Congratulation {
            generation,
            winner_id,
            message,
        } => {
            if state
                .draw
                .attach_congratulation(generation, &winner_id, message)
            {
                state.congratulation_task = None;
                send_snapshot(state, ui_tx).await;
            }
        }
        AppEvent::TeamNames { generation, names } => {
            if state.grouping.finish(generation, &names) {
                state.naming_task = None;
                let count = state.grouping.groups().len();
                send_snapshot(state, ui_tx).await;
                send_notice(state, ui_tx, Notice::GroupsCreated(count)).await;
            }
        }
    }
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        // --- Roster ---
        UserCommand::AddNames(text) => {
            let before = state.roster.roster().len();
            let after = state.roster.append_text(&text).len();
            state.roster_changed();
            info!("Added {} names", after - before);
            send_snapshot(state, ui_tx).await;
            send_notice(state, ui_tx, Notice::NamesAdded(after - before)).await;
        }
        UserCommand::RemoveParticipant(index) => {
            if state.roster.remove_at(index) {
                state.roster_changed();
                send_snapshot(state, ui_tx).await;
            } else {
                debug!("Remove ignored, index {} out of range", index);
            }
        }
        UserCommand::Deduplicate => {
            let before = state.roster.roster().len();
            let after = state.roster.deduplicate().len();
            state.roster_changed();
            send_snapshot(state, ui_tx).await;
            send_notice(state, ui_tx, Notice::DuplicatesRemoved(before - after)).await;
        }
        UserCommand::LoadSample => {
            let count = state.roster.load_sample().len();
            state.roster_changed();
            send_snapshot(state, ui_tx).await;
            send_notice(state, ui_tx, Notice::SampleLoaded(count)).await;
        }
        UserCommand::ClearRoster => {
            state.roster.clear();
            state.roster_changed();
            send_snapshot(state, ui_tx).await;
            send_notice(state, ui_tx, Notice::RosterCleared).await;
        }
        UserCommand::ImportFile(path) => match state.roster.import_file(&path) {
            Ok(roster) => {
                let count = roster.len();
                state.roster_changed();
                send_snapshot(state, ui_tx).await;
                let path = path.display().to_string();
                send_notice(state, ui_tx, Notice::Imported { count, path }).await;
            }
            Err(e) => {
                warn!("Import failed: {}", e);
                send_notice(state, ui_tx, Notice::ImportFailed(e.to_string())).await;
            }
        },

        // --- Draw ---
        UserCommand::StartDraw => match state.draw.start_draw() {
            Ok(ticket) => {
                state.spawn_animation(ticket);
                send_snapshot(state, ui_tx).await;
            }
            Err(rejection) => {
                send_notice(state, ui_tx, Notice::DrawRejected(rejection)).await;
            }
        },
        UserCommand::ResetDraw => {
            state.cancel_draw_tasks();
            state.draw.reset();
            info!("Draw reset");
            send_snapshot(state, ui_tx).await;
            send_notice(state, ui_tx, Notice::DrawReset).await;
        }
        UserCommand::ToggleRepeat => {
            let allow = !state.draw.allow_repeat();
            if state.draw.set_allow_repeat(allow) {
                send_snapshot(state, ui_tx).await;
            } else {
                send_notice(state, ui_tx, Notice::RepeatLocked).await;
            }
        }

        // --- Grouping ---
        UserCommand::RunGrouping => {
            let plan = match state.grouping.plan(state.roster.roster(), &mut state.rng) {
                Ok(plan) => plan,
                Err(rejection) => {
                    send_notice(state, ui_tx, Notice::GroupingRejected(rejection)).await;
                    return;
                }
            };
            if plan.wants_names && state.llm_enabled {
                state.spawn_team_names(plan);
                send_snapshot(state, ui_tx).await;
                send_notice(state, ui_tx, Notice::GeneratingNames).await;
            } else {
                state.grouping.finish(plan.generation, &[]);
                send_snapshot(state, ui_tx).await;
                send_notice(state, ui_tx, Notice::GroupsCreated(plan.group_count)).await;
            }
        }
        UserCommand::AdjustGroupSize(delta) => {
            let size = (state.grouping.group_size() as i64)
                .saturating_add(delta)
                .max(1);
            state.grouping.set_group_size(size as usize);
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::ToggleGeneratedNames => {
            let enabled = !state.grouping.use_generated_names();
            state.grouping.set_use_generated_names(enabled);
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::ExportGroups => {
            let today = chrono::Local::now().date_naive();
            match export_to_dir(
                &state.export_dir,
                state.grouping.groups(),
                state.config.general.locale,
                today,
            ) {
                Ok(path) => {
                    let path = path.display().to_string();
                    send_notice(state, ui_tx, Notice::Exported(path)).await;
                }
                Err(e) => {
                    warn!("Export failed: {}", e);
                    send_notice(state, ui_tx, Notice::ExportFailed(e.to_string())).await;
                }
            }
        }

        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
