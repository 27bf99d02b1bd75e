//! Fixed-tick frame scheduler
//!
//! Drives [`tick`] at a fixed rate through three seams: where input comes
//! from ([`InputSource`]), where frames go ([`RenderSink`]) and how wall-clock
//! time is spent between ticks ([`Pacer`]).

use std::collections::VecDeque;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::RunError;
use crate::sim::{
    Autopilot, DecisionStats, GamePhase, GameState, OverlayKind, PlayerMode, Rect, TickInput,
    TickStatus, tick,
};

/// Discrete input from the player or the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Activate,
    Quit,
}

/// Events are drained once per tick
pub trait InputSource {
    fn poll(&mut self, state: &GameState) -> Vec<InputEvent>;
}

/// Receives one snapshot per simulated tick
pub trait RenderSink {
    fn present(&mut self, frame: &Frame) -> std::io::Result<()>;
}

/// Called once per tick, after the frame is presented
pub trait Pacer {
    fn wait(&mut self);
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn poll(&mut self, state: &GameState) -> Vec<InputEvent> {
        (**self).poll(state)
    }
}

impl<T: RenderSink + ?Sized> RenderSink for Box<T> {
    fn present(&mut self, frame: &Frame) -> std::io::Result<()> {
        (**self).present(frame)
    }
}

impl<T: Pacer + ?Sized> Pacer for Box<T> {
    fn wait(&mut self) {
        (**self).wait()
    }
}

/// Collapse a tick's events into one [`TickInput`]
pub fn fold_events(events: &[InputEvent]) -> TickInput {
    TickInput {
        activate: events.contains(&InputEvent::Activate),
        quit: events.contains(&InputEvent::Quit),
    }
}

/// Everything a renderer needs to draw one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub phase: GamePhase,
    pub player: Rect,
    pub player_mode: PlayerMode,
    /// Degrees, nose-up capped
    pub rotation: f32,
    /// Upper and lower box of each pair, left to right
    pub pipes: Vec<[Rect; 2]>,
    pub floor: Rect,
    /// Texture scroll offset
    pub floor_x: f32,
    pub overlay: Option<OverlayKind>,
    pub score: u32,
    pub best: u32,
}

impl Frame {
    pub fn capture(state: &GameState) -> Self {
        let overlay = match state.phase {
            GamePhase::Splash => Some(state.welcome.kind),
            GamePhase::Play => None,
            GamePhase::GameOver => Some(state.game_over.kind),
        };
        Self {
            tick: state.time_ticks,
            phase: state.phase,
            player: state.player.rect(),
            player_mode: state.player.mode,
            rotation: state.player.visible_rotation(),
            pipes: state
                .pipes
                .iter()
                .map(|pair| [pair.upper_rect(), pair.lower_rect()])
                .collect(),
            floor: state.floor.rect(),
            floor_x: state.floor.x,
            overlay,
            score: state.score.value,
            best: state.score.best,
        }
    }
}

/// Discards every frame
#[derive(Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn present(&mut self, _frame: &Frame) -> std::io::Result<()> {
        Ok(())
    }
}

/// Writes each frame as one line of JSON
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for JsonLinesSink<W> {
    fn present(&mut self, frame: &Frame) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")
    }
}

/// Returns immediately; for headless runs and tests
#[derive(Debug, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn wait(&mut self) {}
}

/// Sleeps to hold a fixed tick rate
///
/// Falling more than [`FixedPacer::MAX_LAG_TICKS`] behind drops the backlog
/// instead of running ticks back to back to catch up.
#[derive(Debug)]
pub struct FixedPacer {
    period: Duration,
    deadline: Option<Instant>,
}

impl FixedPacer {
    pub const MAX_LAG_TICKS: u32 = 5;

    pub fn new(tick_rate: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / tick_rate.max(1),
            deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Pacer for FixedPacer {
    fn wait(&mut self) {
        let now = Instant::now();
        let deadline = self.deadline.unwrap_or(now) + self.period;
        if deadline > now {
            thread::sleep(deadline - now);
            self.deadline = Some(deadline);
        } else if now - deadline > self.period * Self::MAX_LAG_TICKS {
            log::warn!("Tick loop fell behind by {:?}, resyncing", now - deadline);
            self.deadline = Some(now);
        } else {
            self.deadline = Some(deadline);
        }
    }
}

/// Replays a fixed list of `(tick, event)` pairs
///
/// Ticks count polls, starting at 0.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: VecDeque<(u64, InputEvent)>,
    polls: u64,
}

impl ScriptedInput {
    pub fn new(mut script: Vec<(u64, InputEvent)>) -> Self {
        script.sort_by_key(|(at, _)| *at);
        Self {
            script: script.into(),
            polls: 0,
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _state: &GameState) -> Vec<InputEvent> {
        let mut events = Vec::new();
        while let Some(&(at, event)) = self.script.front() {
            if at > self.polls {
                break;
            }
            self.script.pop_front();
            events.push(event);
        }
        self.polls += 1;
        events
    }
}

/// Taps through the menus so headless runs keep playing
///
/// Starts each run after a short splash, restarts once the crashed bird has
/// landed, and optionally flaps on a fixed cadence during Play.
#[derive(Debug)]
pub struct AutoTap {
    splash_delay: u32,
    flap_every: Option<u32>,
    game_limit: Option<u32>,
    waited: u32,
    games: u32,
}

impl AutoTap {
    pub const DEFAULT_SPLASH_DELAY: u32 = 15;

    pub fn new() -> Self {
        Self {
            splash_delay: Self::DEFAULT_SPLASH_DELAY,
            flap_every: None,
            game_limit: None,
            waited: 0,
            games: 0,
        }
    }

    pub fn with_splash_delay(mut self, ticks: u32) -> Self {
        self.splash_delay = ticks;
        self
    }

    /// Flap every `ticks` ticks during Play
    pub fn with_flap_every(mut self, ticks: u32) -> Self {
        self.flap_every = Some(ticks.max(1));
        self
    }

    /// Quit after this many finished games
    pub fn with_game_limit(mut self, games: u32) -> Self {
        self.game_limit = Some(games);
        self
    }
}

impl Default for AutoTap {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for AutoTap {
    fn poll(&mut self, state: &GameState) -> Vec<InputEvent> {
        match state.phase {
            GamePhase::Splash => {
                self.waited += 1;
                if self.waited > self.splash_delay {
                    self.waited = 0;
                    return vec![InputEvent::Activate];
                }
            }
            GamePhase::Play => {
                if let Some(every) = self.flap_every {
                    self.waited += 1;
                    if self.waited % every == 0 {
                        return vec![InputEvent::Activate];
                    }
                }
            }
            GamePhase::GameOver => {
                if state.player.landed(&state.floor) {
                    self.games += 1;
                    self.waited = 0;
                    if self.game_limit.is_some_and(|limit| self.games >= limit) {
                        return vec![InputEvent::Quit];
                    }
                    return vec![InputEvent::Activate];
                }
            }
        }
        Vec::new()
    }
}

/// What a finished run looked like
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Ticks simulated (a quit tick does not count)
    pub ticks: u64,
    /// Final score of each game that ended in a crash
    pub scores: Vec<u32>,
    pub best_score: u32,
    /// Stopped by a quit event rather than the tick limit
    pub quit: bool,
    pub stats: Option<DecisionStats>,
}

impl RunSummary {
    pub fn games(&self) -> usize {
        self.scores.len()
    }
}

/// Owns the loop's seams and, optionally, the autopilot
pub struct Runner<I, S, P> {
    input: I,
    sink: S,
    pacer: P,
    autopilot: Option<Autopilot>,
    max_ticks: Option<u64>,
}

impl<I: InputSource, S: RenderSink, P: Pacer> Runner<I, S, P> {
    pub fn new(input: I, sink: S, pacer: P) -> Self {
        Self {
            input,
            sink,
            pacer,
            autopilot: None,
            max_ticks: None,
        }
    }

    pub fn with_autopilot(mut self, autopilot: Autopilot) -> Self {
        self.autopilot = Some(autopilot);
        self
    }

    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn autopilot(&self) -> Option<&Autopilot> {
        self.autopilot.as_ref()
    }

    /// Tick until quit or the tick limit
    pub fn run(&mut self, state: &mut GameState) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();

        loop {
            if self.max_ticks.is_some_and(|max| summary.ticks >= max) {
                log::info!("Tick limit reached");
                break;
            }

            let events = self.input.poll(state);
            let input = fold_events(&events);
            match tick(state, &input, self.autopilot.as_mut()) {
                TickStatus::Quit => {
                    summary.quit = true;
                    break;
                }
                TickStatus::Transition(change) if change.to == GamePhase::GameOver => {
                    summary.scores.push(state.score.value);
                }
                TickStatus::Transition(_) | TickStatus::Continue => {}
            }
            summary.ticks += 1;

            self.sink.present(&Frame::capture(state))?;
            self.pacer.wait();
        }

        summary.best_score = state.score.best;
        summary.stats = self.autopilot.as_ref().map(Autopilot::stats);
        log::info!(
            "Run finished: {} ticks, {} games, best score {}",
            summary.ticks,
            summary.games(),
            summary.best_score
        );
        Ok(summary)
    }
}
