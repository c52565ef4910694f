use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use tauri::{AppHandle, Emitter, Runtime, Wry};
use tokio::{sync::Mutex, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::models::{Project, Replay};

use super::state::{PlayerState, TickOutcome};

/// Cadence of the ticker task driving progress events and auto-advance
/// checks. The advance interval itself lives in [`PlayerState`].
const TICK_INTERVAL_MS: u64 = 100;

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub project_id: Option<String>,
    pub step_index: usize,
    pub step_count: usize,
    pub playing: bool,
    pub auto_advance_ms: u64,
    /// Elapsed fraction of the current interval, `0.0` when paused.
    pub progress: f64,
    pub current_step: Option<Replay>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct PlayerProgressEvent {
    step_index: usize,
    step_count: usize,
    progress: f64,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct PlaybackFinishedEvent {
    project_id: String,
    step_count: usize,
}

struct Ticker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    /// Identifies which spawn owns the slot entry; a ticker only clears
    /// the slot on exit when the entry is still its own.
    generation: u64,
}

/// Drives one replay session: owns the cursor state exclusively and the
/// single ticker task that auto-advances it. At most one ticker exists
/// at a time; pausing or closing cancels it and joins the task so no
/// tick can fire against a disposed session, and a ticker that stops on
/// its own removes its slot entry on the way out.
pub struct PlayerController<R: Runtime = Wry> {
    state: Arc<Mutex<PlayerState>>,
    app_handle: AppHandle<R>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    generation: Arc<AtomicU64>,
    tick_interval: Duration,
}

// Not derived: that would demand R: Clone, which runtimes don't provide.
impl<R: Runtime> Clone for PlayerController<R> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            app_handle: self.app_handle.clone(),
            ticker: self.ticker.clone(),
            generation: self.generation.clone(),
            tick_interval: self.tick_interval,
        }
    }
}

impl<R: Runtime> PlayerController<R> {
    pub fn new(app_handle: AppHandle<R>) -> Self {
        Self {
            state: Arc::new(Mutex::new(PlayerState::new())),
            app_handle,
            ticker: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
        }
    }

    pub async fn get_snapshot(&self) -> PlayerSnapshot {
        let state = self.state.lock().await;
        snapshot_of(&state, Instant::now())
    }

    /// Open a replay session for `project`, replacing any session that
    /// was open before.
    pub async fn open(&self, project: &Project, auto_advance_ms: u64) -> Result<PlayerSnapshot> {
        self.cancel_ticker().await?;

        let snapshot = {
            let mut state = self.state.lock().await;
            state.open(project, auto_advance_ms)?;
            snapshot_of(&state, Instant::now())
        };

        info!(
            "opened replay session for project {} ({} steps)",
            project.id,
            project.replays.len()
        );
        self.emit_state_changed(&snapshot);
        Ok(snapshot)
    }

    /// Tear down the session. Must be called when the detail view goes
    /// away; the outstanding ticker is cancelled and joined.
    pub async fn close(&self) -> Result<()> {
        self.cancel_ticker().await?;

        let snapshot = {
            let mut state = self.state.lock().await;
            state.close();
            snapshot_of(&state, Instant::now())
        };
        self.emit_state_changed(&snapshot);
        Ok(())
    }

    pub async fn next(&self) -> PlayerSnapshot {
        let snapshot = {
            let mut state = self.state.lock().await;
            let now = Instant::now();
            state.next(now);
            snapshot_of(&state, now)
        };
        self.emit_state_changed(&snapshot);
        snapshot
    }

    pub async fn previous(&self) -> PlayerSnapshot {
        let snapshot = {
            let mut state = self.state.lock().await;
            let now = Instant::now();
            state.previous(now);
            snapshot_of(&state, now)
        };
        self.emit_state_changed(&snapshot);
        snapshot
    }

    pub async fn jump(&self, index: usize) -> Result<PlayerSnapshot> {
        let snapshot = {
            let mut state = self.state.lock().await;
            let now = Instant::now();
            state.jump(index, now)?;
            snapshot_of(&state, now)
        };
        self.emit_state_changed(&snapshot);
        Ok(snapshot)
    }

    /// Start or pause autoplay. Starting applies `auto_advance_ms` as
    /// the interval and spawns the ticker; pausing cancels it.
    pub async fn toggle_play(&self, auto_advance_ms: u64) -> Result<PlayerSnapshot> {
        let (snapshot, playing) = {
            let mut state = self.state.lock().await;
            let now = Instant::now();
            let playing = state.toggle_play(now, auto_advance_ms)?;
            (snapshot_of(&state, now), playing)
        };

        if playing {
            self.spawn_ticker().await?;
        } else {
            self.cancel_ticker().await?;
        }

        self.emit_state_changed(&snapshot);
        Ok(snapshot)
    }

    async fn spawn_ticker(&self) -> Result<()> {
        self.cancel_ticker().await?;

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let state = self.state.clone();
        let app_handle = self.app_handle.clone();
        let slot = self.ticker.clone();
        let tick_interval = self.tick_interval;

        // Held until the new entry is stored, so the task's exit path
        // below cannot observe the slot before it is populated.
        let mut ticker_guard = self.ticker.lock().await;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let now = Instant::now();
                        let (outcome, snapshot) = {
                            let mut guard = state.lock().await;
                            let outcome = guard.advance_on_tick(now);
                            (outcome, snapshot_of(&guard, now))
                        };

                        match outcome {
                            TickOutcome::Idle => break,
                            TickOutcome::Playing { progress } => {
                                let _ = app_handle.emit("player-progress", PlayerProgressEvent {
                                    step_index: snapshot.step_index,
                                    step_count: snapshot.step_count,
                                    progress,
                                });
                            }
                            TickOutcome::Advanced => {
                                let _ = app_handle.emit("player-state-changed", snapshot);
                            }
                            TickOutcome::Finished => {
                                let _ = app_handle.emit("player-state-changed", snapshot.clone());
                                if let Some(project_id) = snapshot.project_id.clone() {
                                    let _ = app_handle.emit("playback-finished", PlaybackFinishedEvent {
                                        project_id,
                                        step_count: snapshot.step_count,
                                    });
                                }
                                info!("autoplay reached the end of the sequence");
                                break;
                            }
                        }
                    }
                    _ = token.cancelled() => break,
                }
            }

            // Clear our own entry on exit. A cancelled ticker finds the
            // slot already taken (or replaced by a newer generation) and
            // leaves it alone.
            let mut entry = slot.lock().await;
            if entry.as_ref().map(|t| t.generation) == Some(generation) {
                *entry = None;
            }
        });

        *ticker_guard = Some(Ticker {
            cancel,
            handle,
            generation,
        });
        Ok(())
    }

    async fn cancel_ticker(&self) -> Result<()> {
        // Take the entry in its own statement so the slot lock is
        // released before joining; the exiting task locks the slot too.
        let ticker = self.ticker.lock().await.take();
        if let Some(ticker) = ticker {
            ticker.cancel.cancel();
            ticker.handle.await.context("ticker task failed to join")?;
        }
        Ok(())
    }

    fn emit_state_changed(&self, snapshot: &PlayerSnapshot) {
        let _ = self.app_handle.emit("player-state-changed", snapshot.clone());
    }
}

fn snapshot_of(state: &PlayerState, now: Instant) -> PlayerSnapshot {
    PlayerSnapshot {
        project_id: state.project_id().map(|id| id.to_string()),
        step_index: state.index(),
        step_count: state.step_count(),
        playing: state.is_playing(),
        auto_advance_ms: state.auto_advance_ms(),
        progress: state.progress(now),
        current_step: state.current_step().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tauri::test::{mock_builder, mock_context, noop_assets, MockRuntime};

    use crate::player::state::DEFAULT_AUTO_ADVANCE_MS;

    use super::*;

    fn mock_app() -> tauri::App<MockRuntime> {
        mock_builder()
            .build(mock_context(noop_assets()))
            .expect("mock app should build")
    }

    fn session_project(step_count: usize) -> Project {
        Project {
            id: "p1".to_string(),
            title: "Project".to_string(),
            description: String::new(),
            thumbnail: String::new(),
            demo_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            tags: Vec::new(),
            stars: 0,
            views: 0,
            replays: (0..step_count)
                .map(|i| Replay {
                    id: format!("r{i}"),
                    timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    prompt: format!("prompt {i}"),
                    model: "GPT-4".to_string(),
                    mcp: Vec::new(),
                    files: Vec::new(),
                })
                .collect(),
            cursor_rules: None,
        }
    }

    #[tokio::test]
    async fn test_ticker_slot_clears_after_autoplay_finishes() {
        let app = mock_app();
        let controller = PlayerController::new(app.handle().clone());

        // Two steps at 40 ms: the 100 ms ticks carry playback to the
        // end well inside the wait below.
        controller.open(&session_project(2), 40).await.unwrap();
        controller.toggle_play(40).await.unwrap();

        time::sleep(Duration::from_millis(400)).await;

        assert!(controller.ticker.lock().await.is_none());
        let snapshot = controller.get_snapshot().await;
        assert!(!snapshot.playing);
        assert_eq!(snapshot.step_index, 1);
    }

    #[tokio::test]
    async fn test_pause_cancels_and_clears_the_ticker() {
        let app = mock_app();
        let controller = PlayerController::new(app.handle().clone());

        controller
            .open(&session_project(3), DEFAULT_AUTO_ADVANCE_MS)
            .await
            .unwrap();
        controller.toggle_play(DEFAULT_AUTO_ADVANCE_MS).await.unwrap();
        assert!(controller.ticker.lock().await.is_some());

        let snapshot = controller.toggle_play(DEFAULT_AUTO_ADVANCE_MS).await.unwrap();
        assert!(!snapshot.playing);
        assert!(controller.ticker.lock().await.is_none());
    }

    #[tokio::test]
    async fn test_toggle_play_uses_the_supplied_interval() {
        let app = mock_app();
        let controller = PlayerController::new(app.handle().clone());

        controller
            .open(&session_project(3), DEFAULT_AUTO_ADVANCE_MS)
            .await
            .unwrap();
        let snapshot = controller.toggle_play(5_000).await.unwrap();
        assert!(snapshot.playing);
        assert_eq!(snapshot.auto_advance_ms, 5_000);
        controller.close().await.unwrap();
    }
}
