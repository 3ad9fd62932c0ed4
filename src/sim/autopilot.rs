//! Idle/demo mode: steers the player from platform to platform

use super::state::Session;
use super::tick::TickInput;

/// Horizontal distance (world units) treated as "lined up"
const DEADZONE: f32 = 0.3;

/// Replace the steering and jump fields of `input` with autopilot choices
pub fn steer(session: &Session, input: &TickInput) -> TickInput {
    let pos = session.player_position();
    let rising = session.physics.velocity(session.player.body).y > 0.0;

    // Climb toward the lowest platform above; when falling, aim for the
    // highest platform below so there is something to land on
    let target = if rising {
        session
            .platforms
            .iter()
            .filter(|p| p.y() > pos.y)
            .min_by(|a, b| a.y().total_cmp(&b.y()))
    } else {
        session
            .platforms
            .iter()
            .filter(|p| p.y() <= pos.y)
            .max_by(|a, b| a.y().total_cmp(&b.y()))
    };

    let dx = target.map(|p| p.pos.x - pos.x).unwrap_or(0.0);
    TickInput {
        left: dx < -DEADZONE,
        right: dx > DEADZONE,
        jump: true,
        ..input.clone()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_always_holds_jump() {
        let session = Session::new(1, &Tuning::default());
        let input = steer(&session, &TickInput::default());
        assert!(input.jump);
        assert!(!(input.left && input.right));
    }

    #[test]
    fn test_steers_toward_platform_below_when_falling() {
        let mut session = Session::new(2, &Tuning::default());
        let top = session.platforms.highest_y();
        let target = session
            .platforms
            .iter()
            .find(|p| p.y() == top)
            .map(|p| p.pos)
            .unwrap_or_default();

        // Park the player above the top platform, far to one side
        let x = if target.x > 6.0 { 1.0 } else { 12.0 };
        session
            .physics
            .set_position(session.player.body, Vec2::new(x, top + 2.0));
        session
            .physics
            .set_velocity(session.player.body, Vec2::new(0.0, -1.0));

        let input = steer(&session, &TickInput::default());
        assert_eq!(input.right, target.x > x);
        assert_eq!(input.left, target.x < x);
    }

    #[test]
    fn test_preserves_menu_keys() {
        let session = Session::new(3, &Tuning::default());
        let input = steer(
            &session,
            &TickInput {
                cancel: true,
                idle_mode: true,
                ..Default::default()
            },
        );
        assert!(input.cancel);
        assert!(input.idle_mode);
    }
}
