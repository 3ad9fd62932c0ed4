//! Shape generation for 2D primitives
//!
//! Everything is emitted in screen pixels (origin top-left, y down); the
//! pipeline maps pixels to clip space.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{GamePhase, GameState, Session};
use crate::world_to_screen;

/// Stars per screen height of the parallax backdrop
const STAR_COUNT: u32 = 40;
/// Backdrop scrolls at this fraction of the camera speed
const STAR_PARALLAX: f32 = 0.3;

/// Two triangles covering an axis-aligned rectangle centered on `center`
pub fn rect(center: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let min = center - size / 2.0;
    let max = center + size / 2.0;
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// Whether any part of a rectangle overlaps the window
fn on_screen(center: Vec2, size: Vec2) -> bool {
    center.y + size.y / 2.0 >= 0.0 && center.y - size.y / 2.0 <= SCREEN_HEIGHT
}

/// Cheap integer hash used to scatter backdrop stars
fn hash(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

fn starfield(camera_offset: f32, out: &mut Vec<Vertex>) {
    let scroll = camera_offset * STAR_PARALLAX;
    let first_band = (scroll / SCREEN_HEIGHT).floor() as i64;
    for band in first_band..=first_band + 1 {
        for i in 0..STAR_COUNT {
            let seed = hash((band as u32).wrapping_mul(STAR_COUNT).wrapping_add(i));
            let x = (seed % SCREEN_WIDTH as u32) as f32;
            let y_in_band = (hash(seed) % SCREEN_HEIGHT as u32) as f32;
            // Bands stack upward as the camera climbs
            let y = SCREEN_HEIGHT - (band as f32 * SCREEN_HEIGHT + y_in_band) + scroll;
            let size = if seed % 7 == 0 { 3.0 } else { 2.0 };
            let center = Vec2::new(x, y);
            if on_screen(center, Vec2::splat(size)) {
                out.extend_from_slice(&rect(center, Vec2::splat(size), colors::STAR));
            }
        }
    }
}

/// Platforms and player for a live session
pub fn session_vertices(session: &Session) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((session.platforms.len() + 2) * 6 + STAR_COUNT as usize * 12);
    starfield(session.camera_offset, &mut vertices);

    let platform_size = Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT);
    for platform in session.platforms.iter() {
        let center = world_to_screen(platform.pos, session.camera_offset);
        if on_screen(center, platform_size) {
            vertices.extend_from_slice(&rect(center, platform_size, colors::PLATFORM));
        }
    }

    let sprite = Vec2::new(PLAYER_SPRITE_WIDTH, PLAYER_SPRITE_HEIGHT);
    let player = world_to_screen(session.player_position(), session.camera_offset);
    vertices.extend_from_slice(&rect(player, sprite, colors::PLAYER));
    let visor = Vec2::new(sprite.x * 0.6, sprite.y * 0.25);
    vertices.extend_from_slice(&rect(
        player - Vec2::new(0.0, sprite.y * 0.15),
        visor,
        colors::PLAYER_VISOR,
    ));
    vertices
}

/// Geometry and clear color for the current frame
///
/// Menus draw nothing but a black background; their text is DOM overlay.
pub fn build_scene(state: &GameState) -> (Vec<Vertex>, [f32; 4]) {
    match state.phase {
        GamePhase::Playing => (session_vertices(&state.session), colors::BACKGROUND),
        GamePhase::MainMenu | GamePhase::GameOver | GamePhase::Quit => {
            (Vec::new(), colors::MENU_BACKGROUND)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_rect_covers_bounds() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0), [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 8.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 12.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 17.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 23.0);
    }

    #[test]
    fn test_menu_draws_nothing() {
        let state = GameState::new(1, Tuning::default());
        let (verts, clear) = build_scene(&state);
        assert!(verts.is_empty());
        assert_eq!(clear, colors::MENU_BACKGROUND);
    }

    #[test]
    fn test_playing_draws_player_and_visible_platforms() {
        let mut state = GameState::new(2, Tuning::default());
        state.phase = GamePhase::Playing;
        let (verts, clear) = build_scene(&state);
        assert_eq!(clear, colors::BACKGROUND);

        let platform_quads = verts.iter().filter(|v| v.color == colors::PLATFORM).count() / 6;
        let visible = state
            .session
            .platforms
            .iter()
            .filter(|p| {
                on_screen(
                    world_to_screen(p.pos, 0.0),
                    Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
                )
            })
            .count();
        assert_eq!(platform_quads, visible);
        assert!(visible > 0);
        assert_eq!(verts.iter().filter(|v| v.color == colors::PLAYER).count(), 6);
    }

    #[test]
    fn test_stars_stay_on_screen() {
        let mut out = Vec::new();
        starfield(12_345.0, &mut out);
        assert!(!out.is_empty());
        assert!(out.iter().all(|v| v.position[1] >= -3.0 && v.position[1] <= SCREEN_HEIGHT + 3.0));
    }
}
