//! Held-key input to velocities.

use glam::Vec2;

use crate::components::{BallTag, MovementSpeed, PaddleTag, Velocity};
use crate::context::AppContext;
use crate::input::Key;

/// Recompute paddle velocity from held keys and launch the ball on Space.
///
/// The paddle's velocity is zeroed every frame, then Left/A and Right/D add
/// `-speed` / `+speed`. While the level has not started, Space sends every
/// ball upward at its own speed, inheriting the paddle's horizontal
/// velocity, and marks the level started.
pub fn handle_player_input(ctx: &mut AppContext) {
    let left = ctx.input.is_key_down(Key::Left) || ctx.input.is_key_down(Key::A);
    let right = ctx.input.is_key_down(Key::Right) || ctx.input.is_key_down(Key::D);

    let mut paddle_vx = 0.0;
    for paddle in ctx.world.view::<(PaddleTag, Velocity, MovementSpeed)>() {
        let Some(speed) = ctx.world.try_get::<MovementSpeed>(paddle).map(|s| s.0) else {
            continue;
        };
        let mut vx = 0.0;
        if left {
            vx -= speed;
        }
        if right {
            vx += speed;
        }
        if let Some(velocity) = ctx.world.try_get_mut::<Velocity>(paddle) {
            velocity.0 = Vec2::new(vx, 0.0);
        }
        paddle_vx = vx;
    }

    if ctx.data.level_started || !ctx.input.is_key_down(Key::Space) {
        return;
    }

    for ball in ctx.world.view::<(BallTag, Velocity, MovementSpeed)>() {
        let Some(speed) = ctx.world.try_get::<MovementSpeed>(ball).map(|s| s.0) else {
            continue;
        };
        if let Some(velocity) = ctx.world.try_get_mut::<Velocity>(ball) {
            velocity.0 = Vec2::new(paddle_vx, -speed);
        }
    }
    ctx.data.level_started = true;
    tracing::info!(level = ctx.data.level_number, "ball launched");
}
