//! Game state and entity types
//!
//! Everything the tick loop mutates lives in one owned [`GameState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision;
use super::geometry::Rect;
use super::pipes::{PipePair, Pipes};
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::{PhysicsSettings, Settings};

/// Current phase of the game cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Welcome screen, bird bobbing in place
    Splash,
    /// Active run
    Play,
    /// Crashed; waiting for the bird to land and a tap
    GameOver,
}

/// How the player moves each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerMode {
    /// Idle bobbing on the splash screen
    ShowMeHow,
    /// Gravity and flaps
    Normal,
    /// Tumbling to the floor after a hit
    Crashed,
}

/// The bird
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner of the box
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: Vec2,
    pub mode: PlayerMode,
    pub crashed: bool,
    /// Degrees, cosmetic
    pub rotation: f32,
    /// Skip gravity on the tick after a flap
    flapped: bool,
    idle_phase: f32,
    rest_y: f32,
    min_y: f32,
    max_y: f32,
    physics: PhysicsSettings,
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        let size = Vec2::new(settings.player.width, settings.player.height);
        let x = (settings.window.width * settings.player.x_ratio).floor();
        let y = (settings.window.height - size.y) / 2.0;
        Self {
            pos: Vec2::new(x, y),
            vel_y: 0.0,
            size,
            mode: PlayerMode::ShowMeHow,
            crashed: false,
            rotation: 0.0,
            flapped: false,
            idle_phase: 0.0,
            rest_y: y,
            min_y: -2.0 * size.y,
            max_y: settings.window.viewport_height() - size.y * 0.75,
            physics: settings.physics,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn rect(&self) -> Rect {
        Rect {
            min: self.pos,
            size: self.size,
        }
    }

    /// Rotation as drawn (nose-up is capped)
    pub fn visible_rotation(&self) -> f32 {
        self.rotation.min(ROTATION_MAX)
    }

    /// Switch mode and load that mode's starting velocity
    pub fn set_mode(&mut self, mode: PlayerMode) {
        self.mode = mode;
        self.flapped = false;
        match mode {
            PlayerMode::ShowMeHow => {
                self.vel_y = 0.0;
                self.rest_y = self.pos.y;
                self.idle_phase = 0.0;
            }
            PlayerMode::Normal => {
                // Runs open with a hop
                self.vel_y = -self.physics.flap_impulse;
                self.rotation = FLAP_ROTATION;
            }
            PlayerMode::Crashed => {
                self.vel_y = self.physics.crash_initial_vel;
                self.crashed = true;
            }
        }
    }

    /// Override vertical velocity with the upward impulse
    pub fn flap(&mut self) {
        if self.mode != PlayerMode::Normal || self.pos.y <= self.min_y {
            return;
        }
        self.vel_y = -self.physics.flap_impulse;
        self.flapped = true;
        self.rotation = FLAP_ROTATION;
    }

    /// Advance one tick
    pub fn tick(&mut self) {
        match self.mode {
            PlayerMode::ShowMeHow => {
                self.idle_phase += self.physics.idle_speed;
                self.pos.y = self.rest_y + self.physics.idle_amplitude * self.idle_phase.sin();
            }
            PlayerMode::Normal => self.fall(
                self.physics.gravity,
                self.physics.max_fall_speed,
                NORMAL_ROTATION_SPEED,
            ),
            PlayerMode::Crashed => self.fall(
                self.physics.crash_gravity,
                self.physics.crash_max_fall_speed,
                CRASH_ROTATION_SPEED,
            ),
        }
    }

    fn fall(&mut self, gravity: f32, max_fall: f32, rotation_speed: f32) {
        if !self.flapped {
            self.vel_y = (self.vel_y + gravity).clamp(-self.physics.flap_impulse, max_fall);
        }
        self.flapped = false;
        self.pos.y = (self.pos.y + self.vel_y).clamp(self.min_y, self.max_y);
        self.rotation = (self.rotation + rotation_speed).max(ROTATION_MIN);
    }

    /// Box touches the floor or any pipe; marks the player crashed on a hit
    pub fn collided(&mut self, pipes: &Pipes, floor: &Floor) -> bool {
        let rect = self.rect();
        let hit = collision::hits_floor(&rect, floor)
            || pipes.iter().any(|pipe| collision::hits_pipe(&rect, pipe));
        if hit {
            self.crashed = true;
        }
        hit
    }

    /// True exactly once per pipe, when x first passes its trailing edge
    pub fn crossed(&self, pipe: &mut PipePair) -> bool {
        if pipe.scored || self.pos.x <= pipe.right() {
            return false;
        }
        pipe.scored = true;
        true
    }

    pub fn landed(&self, floor: &Floor) -> bool {
        collision::is_landed(&self.rect(), floor)
    }
}

/// Scrolling ground strip
#[derive(Debug, Clone, Serialize)]
pub struct Floor {
    /// Texture scroll offset in (-wrap, 0]
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    speed: f32,
    wrap: f32,
    stopped: bool,
}

impl Floor {
    pub fn new(settings: &Settings) -> Self {
        let y = settings.window.viewport_height();
        Self {
            x: 0.0,
            y,
            width: settings.window.width,
            height: settings.window.height - y,
            speed: settings.floor.speed,
            wrap: settings.floor.wrap,
            stopped: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, self.y, self.width, self.height)
    }

    pub fn tick(&mut self) {
        if !self.stopped {
            self.x = -((-self.x + self.speed) % self.wrap);
        }
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// Pipes crossed this run, plus the best run this session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub value: u32,
    pub best: u32,
}

impl Score {
    pub fn add(&mut self) {
        self.value += 1;
        self.best = self.best.max(self.value);
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverlayKind {
    Welcome,
    GameOver,
}

/// A transient centred message
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Overlay {
    pub kind: OverlayKind,
    pub pos: Vec2,
    /// Ticks shown so far
    pub ticks: u32,
}

impl Overlay {
    pub fn new(kind: OverlayKind, settings: &Settings) -> Self {
        let pos = match kind {
            OverlayKind::Welcome => {
                Vec2::new(settings.window.width / 2.0, settings.window.height * 0.12)
            }
            OverlayKind::GameOver => {
                Vec2::new(settings.window.width / 2.0, settings.window.height * 0.2)
            }
        };
        Self { kind, pos, ticks: 0 }
    }

    pub fn tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub phase: GamePhase,
    pub player: Player,
    pub pipes: Pipes,
    pub floor: Floor,
    pub score: Score,
    pub welcome: Overlay,
    pub game_over: Overlay,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Game cycles started (Splash entries)
    pub cycle: u32,
}

impl GameState {
    /// Validate the settings and open the first cycle at Splash
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let pipes = Pipes::new(&settings, cycle_seed(settings.seed, 0));
        let mut state = Self {
            phase: GamePhase::Splash,
            player: Player::new(&settings),
            pipes,
            floor: Floor::new(&settings),
            score: Score::default(),
            welcome: Overlay::new(OverlayKind::Welcome, &settings),
            game_over: Overlay::new(OverlayKind::GameOver, &settings),
            time_ticks: 0,
            cycle: 0,
            settings,
        };
        state.player.set_mode(PlayerMode::ShowMeHow);
        log::info!("Game ready (seed {})", state.settings.seed);
        Ok(state)
    }

    /// Replace every entity with a fresh one and return to Splash
    ///
    /// The session best score survives.
    pub fn begin_cycle(&mut self) {
        self.cycle += 1;
        self.player = Player::new(&self.settings);
        self.player.set_mode(PlayerMode::ShowMeHow);
        self.pipes = Pipes::new(&self.settings, cycle_seed(self.settings.seed, self.cycle));
        self.floor = Floor::new(&self.settings);
        self.score.reset();
        self.welcome.reset();
        self.game_over.reset();
        self.phase = GamePhase::Splash;
    }
}

/// Per-cycle pipe seed: varied across cycles, reproducible within a run
fn cycle_seed(seed: u64, cycle: u32) -> u64 {
    (cycle as u64).wrapping_mul(2654435761).wrapping_add(seed)
}
