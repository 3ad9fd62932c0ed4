//! Game state and session lifecycle
//!
//! A `Session` is one run: physics world, player, platforms, camera and score.
//! Restarting builds a brand new session and drops the old one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::physics::PhysicsWorld;
use super::platforms::PlatformStream;
use super::player::Player;
use super::policy::CollisionPolicy;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::world_to_screen_y;

/// Top-level screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen; also where Escape pauses to
    MainMenu,
    /// Active gameplay
    Playing,
    /// Player fell off the bottom; score is frozen
    GameOver,
    /// Terminal: the run loop stops
    Quit,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::MainMenu => "main-menu",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "game-over",
            GamePhase::Quit => "quit",
        }
    }
}

/// One play-through
pub struct Session {
    /// Seed this session's platform layout was generated from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub physics: PhysicsWorld,
    pub player: Player,
    pub platforms: PlatformStream,
    pub(crate) policy: CollisionPolicy,
    /// Vertical scroll in pixels; never decreases
    pub camera_offset: f32,
    /// Floor of the highest y reached; never decreases
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl Session {
    /// Build a fresh world, player and initial platform set
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut physics = PhysicsWorld::new(tuning.gravity);
        let player = Player::spawn(&mut physics, tuning);
        let platforms = PlatformStream::new(&mut physics, &mut rng, tuning);
        let policy = CollisionPolicy::new(&player);

        Self {
            seed,
            rng,
            physics,
            player,
            platforms,
            policy,
            camera_offset: 0.0,
            score: 0,
            time_ticks: 0,
        }
    }

    pub fn player_position(&self) -> Vec2 {
        self.player.position(&self.physics)
    }

    /// The player dropped more than a sprite height below world zero
    pub fn has_fallen(&self) -> bool {
        self.player_position().y * PIXELS_PER_METER < -PLAYER_SPRITE_HEIGHT
    }

    /// Scroll up so the player stays in the upper half of the window
    pub fn follow_camera(&mut self) {
        let player_screen_y = world_to_screen_y(self.player_position().y, self.camera_offset);
        let midline = SCREEN_HEIGHT / 2.0;
        if player_screen_y < midline {
            self.camera_offset += midline - player_screen_y;
        }
    }

    /// Raise the score to the player's current height if it is a new best
    pub fn update_score(&mut self) {
        let height = self.player_position().y.floor();
        if height > self.score as f32 {
            self.score = height as u64;
        }
    }
}

/// Complete game state: current phase plus the live session
pub struct GameState {
    pub phase: GamePhase,
    pub session: Session,
    pub tuning: Tuning,
    /// Produces the seed of each new session
    seeds: Pcg32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut seeds = Pcg32::seed_from_u64(seed);
        let session = Session::new(seeds.random(), &tuning);
        log::info!("Session created with seed {}", session.seed);
        Self {
            phase: GamePhase::MainMenu,
            session,
            tuning,
            seeds,
        }
    }

    /// Replace the session wholesale with a freshly built one
    pub fn restart(&mut self) {
        self.session = Session::new(self.seeds.random(), &self.tuning);
        log::info!("Session restarted with seed {}", self.session.seed);
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if phase != self.phase {
            log::info!("{} -> {}", self.phase.as_str(), phase.as_str());
            self.phase = phase;
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase != GamePhase::Quit
    }
}
