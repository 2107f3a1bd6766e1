use crate::config::{SimulationConfig, Viewport};
use crate::dots::Dot;

/// How close (beyond the radius) a dot gets to a wall before it turns around.
pub const WALL_EPSILON: f32 = 2.0;

/// Direction flips owed by one dot, applied after the frame is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

/// Distance a dot covers in one tick; `tick_rate` ticks add up to
/// `speed * speed_multiplier` per second whatever the rate.
pub fn tick_speed(speed: u32, config: &SimulationConfig) -> f32 {
    speed as f32 * config.speed_multiplier / config.tick_rate as f32
}

/// Moves every dot one tick and records which ones reached a wall.
///
/// Positions are not clamped: a fast dot can overshoot for a tick before the
/// flip in `bounces` takes it back.
pub fn advance(dots: &mut [Dot], config: &SimulationConfig, viewport: Viewport, bounces: &mut Vec<Bounce>) {
    bounces.clear();
    bounces.reserve(dots.len());
    for dot in dots.iter_mut() {
        let step = tick_speed(dot.speed, config);
        dot.x += dot.dir_x * step;
        dot.y += dot.dir_y * step;

        bounces.push(Bounce {
            x: hits_wall(dot.x, dot.dir_x, viewport.width, config.point_radius),
            y: hits_wall(dot.y, dot.dir_y, viewport.height, config.point_radius),
        });
    }
}

pub fn apply_bounces(dots: &mut [Dot], bounces: &[Bounce]) {
    for (dot, bounce) in dots.iter_mut().zip(bounces) {
        if bounce.x {
            dot.dir_x = -dot.dir_x;
        }
        if bounce.y {
            dot.dir_y = -dot.dir_y;
        }
    }
}

// 壁に近く、かつ壁へ向かっているときだけ反転する
// Near a wall and heading into it. A dot already moving away is left alone.
fn hits_wall(pos: f32, dir: f32, extent: f32, radius: f32) -> bool {
    let near_far = (extent - radius) - pos <= WALL_EPSILON;
    let near_origin = pos - radius <= WALL_EPSILON;
    (near_far && dir > 0.0) || (near_origin && dir < 0.0)
}
