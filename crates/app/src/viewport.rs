//! Camera math: keep the player centered without ever showing past the
//! world edge.

use thornvale_core::Vec2px;

/// Top-left corner of the visible window in world pixels.
pub fn camera_origin(player_center: Vec2px, view: Vec2px, world: Vec2px) -> Vec2px {
    Vec2px {
        x: clamp_axis(player_center.x - view.x / 2.0, view.x, world.x),
        y: clamp_axis(player_center.y - view.y / 2.0, view.y, world.y),
    }
}

fn clamp_axis(origin: f32, view: f32, world: f32) -> f32 {
    if world <= view {
        // World smaller than the window: pin to the start, let the caller
        // letterbox the rest.
        return 0.0;
    }
    origin.clamp(0.0, world - view)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Vec2px = Vec2px { x: 320.0, y: 240.0 };
    const WORLD: Vec2px = Vec2px { x: 768.0, y: 512.0 };

    #[test]
    fn camera_centers_on_the_player_mid_world() {
        let origin = camera_origin(Vec2px { x: 400.0, y: 260.0 }, VIEW, WORLD);
        assert_eq!(origin, Vec2px { x: 240.0, y: 140.0 });
    }

    #[test]
    fn camera_clamps_at_the_world_edges() {
        let origin = camera_origin(Vec2px { x: 10.0, y: 10.0 }, VIEW, WORLD);
        assert_eq!(origin, Vec2px { x: 0.0, y: 0.0 });
        let origin = camera_origin(Vec2px { x: 760.0, y: 500.0 }, VIEW, WORLD);
        assert_eq!(origin, Vec2px { x: 448.0, y: 272.0 });
    }

    #[test]
    fn tiny_worlds_pin_to_origin() {
        let origin = camera_origin(Vec2px { x: 50.0, y: 50.0 }, VIEW, Vec2px { x: 100.0, y: 100.0 });
        assert_eq!(origin, Vec2px { x: 0.0, y: 0.0 });
    }
}
