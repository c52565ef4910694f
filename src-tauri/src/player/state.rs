//! Playback cursor state machine.
//!
//! Pure state: all timing decisions take `now` as an argument so the
//! transitions can be tested without sleeping. The controller feeds it
//! real instants and turns its outcomes into events.

use std::time::Instant;

use crate::error::{Error, Result};
use crate::models::{Project, Replay};

/// Default auto-advance interval between steps.
pub const DEFAULT_AUTO_ADVANCE_MS: u64 = 3_000;

/// What the ticker should do after one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No session open or playback paused; the ticker should exit.
    Idle,
    /// Still inside the current interval; `progress` is the elapsed
    /// fraction in `0.0..1.0`.
    Playing { progress: f64 },
    /// The interval elapsed and the cursor moved to the next step.
    Advanced,
    /// The interval elapsed at the last step; playback stopped without
    /// wrapping around.
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    project_id: Option<String>,
    steps: Vec<Replay>,
    index: usize,
    playing: bool,
    auto_advance_ms: u64,
    /// Start of the current auto-advance interval. Re-anchored on every
    /// advance and on every manual move while playing, so a manual jump
    /// always gets a full interval before the next automatic one.
    play_anchor: Option<Instant>,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session over `project`'s replay sequence. Cursor starts at
    /// the first step, paused.
    pub fn open(&mut self, project: &Project, auto_advance_ms: u64) -> Result<()> {
        if project.replays.is_empty() {
            return Err(Error::InvalidState(format!(
                "project '{}' has an empty replay sequence",
                project.id
            )));
        }
        if auto_advance_ms == 0 {
            return Err(Error::InvalidArgument(
                "auto-advance interval must be greater than zero".to_string(),
            ));
        }

        *self = Self {
            project_id: Some(project.id.clone()),
            steps: project.replays.clone(),
            index: 0,
            playing: false,
            auto_advance_ms,
            play_anchor: None,
        };
        Ok(())
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.project_id.is_some()
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn auto_advance_ms(&self) -> u64 {
        self.auto_advance_ms
    }

    pub fn current_step(&self) -> Option<&Replay> {
        self.steps.get(self.index)
    }

    /// Elapsed fraction of the current interval, `0.0` when paused.
    pub fn progress(&self, now: Instant) -> f64 {
        match (self.playing, self.play_anchor) {
            (true, Some(anchor)) => {
                let elapsed = now.saturating_duration_since(anchor).as_millis() as f64;
                (elapsed / self.auto_advance_ms as f64).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Step back one step. No-op at the first step.
    pub fn previous(&mut self, now: Instant) {
        if self.index > 0 {
            self.index -= 1;
            self.reanchor(now);
        }
    }

    /// Step forward one step. No-op at the last step.
    pub fn next(&mut self, now: Instant) {
        if self.index + 1 < self.steps.len() {
            self.index += 1;
            self.reanchor(now);
        }
    }

    /// Jump straight to `index`.
    pub fn jump(&mut self, index: usize, now: Instant) -> Result<()> {
        if index >= self.steps.len() {
            return Err(Error::InvalidArgument(format!(
                "step index {index} out of range (sequence has {} steps)",
                self.steps.len()
            )));
        }
        self.index = index;
        self.reanchor(now);
        Ok(())
    }

    /// Pause if playing; otherwise start playing with `auto_advance_ms`
    /// as the interval, restarting from the first step when the cursor
    /// already sits at the end. The interval is taken fresh on every
    /// start so a settings change applies to the next play, not just
    /// the next open. Returns the new `playing` flag.
    pub fn toggle_play(&mut self, now: Instant, auto_advance_ms: u64) -> Result<bool> {
        if !self.is_open() {
            return Err(Error::InvalidState("no replay session open".to_string()));
        }

        if self.playing {
            self.playing = false;
            self.play_anchor = None;
        } else {
            if auto_advance_ms == 0 {
                return Err(Error::InvalidArgument(
                    "auto-advance interval must be greater than zero".to_string(),
                ));
            }
            self.auto_advance_ms = auto_advance_ms;
            if self.index + 1 == self.steps.len() {
                self.index = 0;
            }
            self.playing = true;
            self.play_anchor = Some(now);
        }
        Ok(self.playing)
    }

    /// One ticker step: advance when the interval has elapsed, stop at
    /// the end of the sequence.
    pub fn advance_on_tick(&mut self, now: Instant) -> TickOutcome {
        let anchor = match (self.playing, self.play_anchor) {
            (true, Some(anchor)) => anchor,
            _ => return TickOutcome::Idle,
        };

        let elapsed_ms = now.saturating_duration_since(anchor).as_millis() as u64;
        if elapsed_ms < self.auto_advance_ms {
            return TickOutcome::Playing {
                progress: self.progress(now),
            };
        }

        if self.index + 1 < self.steps.len() {
            self.index += 1;
            self.play_anchor = Some(now);
            TickOutcome::Advanced
        } else {
            self.playing = false;
            self.play_anchor = None;
            TickOutcome::Finished
        }
    }

    // Manual navigation during playback restarts the current interval
    // instead of leaving a nearly-expired deadline armed.
    fn reanchor(&mut self, now: Instant) {
        if self.playing {
            self.play_anchor = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn project(step_count: usize) -> Project {
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

    fn open_state(step_count: usize) -> PlayerState {
        let mut state = PlayerState::new();
        state.open(&project(step_count), DEFAULT_AUTO_ADVANCE_MS).unwrap();
        state
    }

    const INTERVAL: Duration = Duration::from_millis(DEFAULT_AUTO_ADVANCE_MS);

    #[test]
    fn test_open_starts_at_first_step_paused() {
        let state = open_state(3);
        assert_eq!(state.index(), 0);
        assert!(!state.is_playing());
        assert_eq!(state.current_step().unwrap().id, "r0");
    }

    #[test]
    fn test_open_rejects_empty_sequence() {
        let mut state = PlayerState::new();
        let empty = project(0);
        let err = state.open(&empty, DEFAULT_AUTO_ADVANCE_MS).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert!(!state.is_open());
    }

    #[test]
    fn test_open_rejects_zero_interval() {
        let mut state = PlayerState::new();
        let err = state.open(&project(2), 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_navigation_saturates_at_the_bounds() {
        let now = Instant::now();
        let mut state = open_state(3);

        state.previous(now);
        assert_eq!(state.index(), 0);

        state.next(now);
        state.next(now);
        assert_eq!(state.index(), 2);
        state.next(now);
        assert_eq!(state.index(), 2);
    }

    #[test]
    fn test_index_stays_in_bounds_under_arbitrary_navigation() {
        let now = Instant::now();
        let mut state = open_state(4);

        // A deterministic scramble of forward/backward moves.
        let moves = [1, 1, -1, 1, 1, 1, 1, -1, -1, -1, -1, -1, 1, -1, 1, 1];
        for step in moves {
            if step > 0 {
                state.next(now);
            } else {
                state.previous(now);
            }
            assert!(state.index() < state.step_count());
        }
    }

    #[test]
    fn test_jump_within_range() {
        let now = Instant::now();
        let mut state = open_state(4);
        state.jump(2, now).unwrap();
        assert_eq!(state.index(), 2);
    }

    #[test]
    fn test_jump_out_of_range_is_an_error() {
        let now = Instant::now();
        let mut state = open_state(4);
        let err = state.jump(4, now).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn test_toggle_play_from_the_end_restarts() {
        let now = Instant::now();
        let mut state = open_state(3);
        state.jump(2, now).unwrap();

        let playing = state.toggle_play(now, DEFAULT_AUTO_ADVANCE_MS).unwrap();
        assert!(playing);
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn test_toggle_play_mid_sequence_keeps_the_cursor() {
        let now = Instant::now();
        let mut state = open_state(3);
        state.jump(1, now).unwrap();

        assert!(state.toggle_play(now, DEFAULT_AUTO_ADVANCE_MS).unwrap());
        assert_eq!(state.index(), 1);

        assert!(!state.toggle_play(now, DEFAULT_AUTO_ADVANCE_MS).unwrap());
        assert!(!state.is_playing());
    }

    #[test]
    fn test_toggle_play_applies_the_latest_interval() {
        let start = Instant::now();
        let mut state = open_state(3);
        assert_eq!(state.auto_advance_ms(), DEFAULT_AUTO_ADVANCE_MS);

        // The interval was changed after the session opened; starting
        // playback picks up the new value, not the one baked in at open.
        state.toggle_play(start, 5_000).unwrap();
        assert_eq!(state.auto_advance_ms(), 5_000);

        let outcome = state.advance_on_tick(start + INTERVAL);
        assert!(matches!(outcome, TickOutcome::Playing { .. }));
        assert_eq!(state.index(), 0);

        assert_eq!(
            state.advance_on_tick(start + Duration::from_millis(5_000)),
            TickOutcome::Advanced
        );
        assert_eq!(state.index(), 1);
    }

    #[test]
    fn test_toggle_play_rejects_zero_interval() {
        let start = Instant::now();
        let mut state = open_state(3);
        let err = state.toggle_play(start, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(!state.is_playing());
        // Pausing ignores the interval argument entirely.
        state.toggle_play(start, 5_000).unwrap();
        assert!(!state.toggle_play(start, 0).unwrap());
    }

    #[test]
    fn test_toggle_play_without_session_is_an_error() {
        let mut state = PlayerState::new();
        let err = state.toggle_play(Instant::now(), DEFAULT_AUTO_ADVANCE_MS).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_autoplay_advances_once_per_interval_and_terminates() {
        let start = Instant::now();
        let mut state = open_state(3);
        state.toggle_play(start, DEFAULT_AUTO_ADVANCE_MS).unwrap();

        // Mid-interval: still playing, no advance.
        let outcome = state.advance_on_tick(start + INTERVAL / 2);
        assert!(matches!(outcome, TickOutcome::Playing { .. }));
        assert_eq!(state.index(), 0);

        assert_eq!(state.advance_on_tick(start + INTERVAL), TickOutcome::Advanced);
        assert_eq!(state.index(), 1);

        assert_eq!(state.advance_on_tick(start + INTERVAL * 2), TickOutcome::Advanced);
        assert_eq!(state.index(), 2);

        // Terminal step: stops, no wraparound.
        assert_eq!(state.advance_on_tick(start + INTERVAL * 3), TickOutcome::Finished);
        assert_eq!(state.index(), 2);
        assert!(!state.is_playing());

        assert_eq!(state.advance_on_tick(start + INTERVAL * 4), TickOutcome::Idle);
    }

    #[test]
    fn test_manual_navigation_resets_the_advance_deadline() {
        let start = Instant::now();
        let mut state = open_state(3);
        state.toggle_play(start, DEFAULT_AUTO_ADVANCE_MS).unwrap();

        // Almost due, then a manual move re-anchors the interval.
        let almost_due = start + INTERVAL - Duration::from_millis(10);
        state.next(almost_due);
        assert_eq!(state.index(), 1);

        // The previously armed deadline must not fire.
        let outcome = state.advance_on_tick(start + INTERVAL);
        assert!(matches!(outcome, TickOutcome::Playing { .. }));
        assert_eq!(state.index(), 1);

        // A full interval after the manual move, it advances.
        assert_eq!(
            state.advance_on_tick(almost_due + INTERVAL),
            TickOutcome::Advanced
        );
        assert_eq!(state.index(), 2);
    }

    #[test]
    fn test_progress_tracks_the_current_interval() {
        let start = Instant::now();
        let mut state = open_state(2);
        assert_eq!(state.progress(start), 0.0);

        state.toggle_play(start, DEFAULT_AUTO_ADVANCE_MS).unwrap();
        let half = state.progress(start + INTERVAL / 2);
        assert!((half - 0.5).abs() < 0.01);
        assert_eq!(state.progress(start + INTERVAL * 2), 1.0);

        state.toggle_play(start, DEFAULT_AUTO_ADVANCE_MS).unwrap();
        assert_eq!(state.progress(start + INTERVAL), 0.0);
    }

    #[test]
    fn test_pause_disarms_the_ticker() {
        let start = Instant::now();
        let mut state = open_state(3);
        state.toggle_play(start, DEFAULT_AUTO_ADVANCE_MS).unwrap();
        state.toggle_play(start, DEFAULT_AUTO_ADVANCE_MS).unwrap();

        assert_eq!(state.advance_on_tick(start + INTERVAL * 2), TickOutcome::Idle);
        assert_eq!(state.index(), 0);
    }
}
