//! Fixed timestep simulation tick
//!
//! Drives the phase state machine and, while playing, advances the session in
//! a strict order: input, physics step (with collision callbacks), cooldowns,
//! camera, platform streaming, score, sensor flags.

use glam::Vec2;

use super::autopilot;
use super::player::Direction;
use super::state::{GamePhase, GameState, Session};
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Enter: start, resume or restart
    pub confirm: bool,
    /// Escape: pause to the menu, or quit from the menu/game-over screens
    pub cancel: bool,
    /// Window closed
    pub quit: bool,
    /// Held steering keys
    pub left: bool,
    pub right: bool,
    /// Held jump key
    pub jump: bool,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

/// Advance the game by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.quit {
        state.set_phase(GamePhase::Quit);
        return;
    }

    match state.phase {
        GamePhase::MainMenu => {
            if input.confirm {
                state.set_phase(GamePhase::Playing);
            } else if input.cancel {
                state.set_phase(GamePhase::Quit);
            }
        }
        GamePhase::Playing => {
            if input.cancel {
                state.set_phase(GamePhase::MainMenu);
                return;
            }
            if state.session.has_fallen() {
                log::info!("Game over - final score {}", state.session.score);
                state.set_phase(GamePhase::GameOver);
                return;
            }
            let input = if input.idle_mode {
                autopilot::steer(&state.session, input)
            } else {
                input.clone()
            };
            play(&mut state.session, &input, &state.tuning);
        }
        GamePhase::GameOver => {
            if input.confirm {
                state.restart();
                state.set_phase(GamePhase::Playing);
            } else if input.cancel {
                state.set_phase(GamePhase::Quit);
            }
        }
        GamePhase::Quit => {}
    }
}

/// One playing tick of a session
fn play(session: &mut Session, input: &TickInput, tuning: &Tuning) {
    // Lift-off until the camera starts scrolling
    if session.camera_offset == 0.0 && tuning.launch_impulse > 0.0 {
        session
            .physics
            .apply_impulse(session.player.body, Vec2::new(0.0, tuning.launch_impulse));
    }

    let direction = Direction::from_keys(input.left, input.right);
    session
        .player
        .move_horizontal(&mut session.physics, direction, tuning.player_max_speed);
    if input.jump {
        session.player.jump(&mut session.physics, tuning);
    }

    session.policy.step(&mut session.physics, &mut session.player);
    session.player.update();

    session.follow_camera();

    let player_y = session.player_position().y;
    session
        .platforms
        .prune(&mut session.physics, session.camera_offset);
    session
        .platforms
        .extend(&mut session.physics, &mut session.rng, player_y, tuning);

    session.update_score();
    session.platforms.update_sensors(&mut session.physics, player_y);
    session.time_ticks += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_tuning() -> Tuning {
        Tuning {
            launch_impulse: 0.0,
            ..Tuning::default()
        }
    }

    fn press_confirm() -> TickInput {
        TickInput {
            confirm: true,
            ..Default::default()
        }
    }

    fn press_cancel() -> TickInput {
        TickInput {
            cancel: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_menu_to_playing() {
        let mut state = GameState::new(1, quiet_tuning());
        assert_eq!(state.phase, GamePhase::MainMenu);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::MainMenu);
        assert_eq!(state.session.time_ticks, 0);
        tick(&mut state, &press_confirm());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_escape_pauses_and_resumes_same_session() {
        let mut state = GameState::new(2, quiet_tuning());
        tick(&mut state, &press_confirm());
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        let seed = state.session.seed;
        let ticks = state.session.time_ticks;

        tick(&mut state, &press_cancel());
        assert_eq!(state.phase, GamePhase::MainMenu);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.session.time_ticks, ticks);

        tick(&mut state, &press_confirm());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.session.seed, seed);
    }

    #[test]
    fn test_escape_from_menu_quits() {
        let mut state = GameState::new(3, quiet_tuning());
        tick(&mut state, &press_cancel());
        assert_eq!(state.phase, GamePhase::Quit);
        assert!(!state.is_running());

        // Quit is terminal
        tick(&mut state, &press_confirm());
        assert_eq!(state.phase, GamePhase::Quit);
    }

    #[test]
    fn test_window_close_quits_from_any_phase() {
        for phase in [GamePhase::MainMenu, GamePhase::Playing, GamePhase::GameOver] {
            let mut state = GameState::new(4, quiet_tuning());
            state.phase = phase;
            tick(
                &mut state,
                &TickInput {
                    quit: true,
                    ..Default::default()
                },
            );
            assert_eq!(state.phase, GamePhase::Quit);
        }
    }

    #[test]
    fn test_fall_ends_game_and_freezes_score() {
        let mut state = GameState::new(5, quiet_tuning());
        tick(&mut state, &press_confirm());
        tick(&mut state, &TickInput::default());
        let score = state.session.score;
        assert!(score > 0);

        let x = state.session.player_position().x;
        state
            .session
            .physics
            .set_position(state.session.player.body, Vec2::new(x, -5.0));
        let ticks = state.session.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.session.score, score);
        assert_eq!(state.session.time_ticks, ticks);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.session.score, score);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = GameState::new(6, quiet_tuning());
        tick(&mut state, &press_confirm());
        let old_seed = state.session.seed;
        state.phase = GamePhase::GameOver;
        tick(&mut state, &press_confirm());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_ne!(state.session.seed, old_seed);
        assert_eq!(state.session.time_ticks, 0);
    }

    #[test]
    fn test_launch_lifts_player_at_start() {
        let mut state = GameState::new(7, Tuning::default());
        tick(&mut state, &press_confirm());
        let start_y = state.session.player_position().y;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.session.player_position().y > start_y);
    }

    #[test]
    fn test_steering_moves_player() {
        let mut state = GameState::new(8, quiet_tuning());
        tick(&mut state, &press_confirm());
        let start_x = state.session.player_position().x;
        for _ in 0..10 {
            tick(
                &mut state,
                &TickInput {
                    right: true,
                    ..Default::default()
                },
            );
        }
        assert!(state.session.player_position().x > start_x);
    }

    #[test]
    fn test_session_invariants_hold_over_long_run() {
        let mut state = GameState::new(99, Tuning::default());
        tick(&mut state, &press_confirm());
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        let mut last_camera = 0.0;
        let mut last_score = 0;
        let mut best_height = f32::MIN;
        for _ in 0..1200 {
            tick(&mut state, &input);
            if state.phase != GamePhase::Playing {
                break;
            }
            let session = &state.session;
            assert!(session.platforms.len() >= state.tuning.min_platforms);
            assert!(session.camera_offset >= last_camera);
            assert!(session.score >= last_score);
            best_height = best_height.max(session.player_position().y);
            assert_eq!(session.score, best_height.floor().max(0.0) as u64);
            last_camera = session.camera_offset;
            last_score = session.score;
        }
    }

    #[test]
    fn test_platforms_stay_ahead_of_fast_climb() {
        // Autopilot keeps re-grounding on pass-through platforms, so the climb
        // speeds up until the player clears a whole window in one tick
        for seed in [0, 4] {
            let mut state = GameState::new(seed, Tuning::default());
            tick(&mut state, &press_confirm());
            let input = TickInput {
                idle_mode: true,
                ..Default::default()
            };

            for _ in 0..6000 {
                tick(&mut state, &input);
                if state.phase != GamePhase::Playing {
                    break;
                }
                let session = &state.session;
                let player_y = session.player_position().y;
                let top = session.platforms.highest_y();
                assert!(
                    top - state.tuning.spawn_proximity >= player_y,
                    "seed {seed}: top {top} not ahead of player at {player_y}"
                );
                assert!(session.platforms.len() >= state.tuning.min_platforms);
                assert_eq!(session.physics.body_count(), session.platforms.len() + 1);
            }
        }
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(1234, Tuning::default());
        let mut b = GameState::new(1234, Tuning::default());
        let inputs = [
            press_confirm(),
            TickInput {
                right: true,
                jump: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..30 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }
        assert_eq!(a.session.time_ticks, b.session.time_ticks);
        assert_eq!(a.session.score, b.session.score);
        assert_eq!(a.session.player_position(), b.session.player_position());
        assert_eq!(a.session.platforms.len(), b.session.platforms.len());
    }
}
