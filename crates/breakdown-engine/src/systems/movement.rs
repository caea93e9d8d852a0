//! Velocity integration.

use crate::components::{Ball, Paddle, Velocity};
use crate::context::AppContext;

/// Advance paddles, and balls once the level has started, by
/// `velocity * dt`.
pub fn movement_system(ctx: &mut AppContext, dt: f32) {
    for e in ctx.world.view::<(Paddle, Velocity)>() {
        let Some(v) = ctx.world.try_get::<Velocity>(e).map(|v| v.0) else {
            continue;
        };
        if let Some(paddle) = ctx.world.try_get_mut::<Paddle>(e) {
            paddle.shape.position += v * dt;
        }
    }

    if !ctx.data.level_started {
        return;
    }

    for e in ctx.world.view::<(Ball, Velocity)>() {
        let Some(v) = ctx.world.try_get::<Velocity>(e).map(|v| v.0) else {
            continue;
        };
        if let Some(ball) = ctx.world.try_get_mut::<Ball>(e) {
            ball.shape.center += v * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::factory;
    use glam::Vec2;

    #[test]
    fn ball_waits_for_launch() {
        let mut ctx = AppContext::headless(ConfigManager::new());
        let p = factory::create_player(&mut ctx);
        let b = factory::create_ball(&mut ctx);
        ctx.world.get_mut::<Velocity>(p).unwrap().0 = Vec2::new(100.0, 0.0);
        ctx.world.get_mut::<Velocity>(b).unwrap().0 = Vec2::new(0.0, -450.0);

        movement_system(&mut ctx, 0.5);
        assert_eq!(ctx.world.get::<Paddle>(p).unwrap().shape.position.x, 690.0);
        assert_eq!(ctx.world.get::<Ball>(b).unwrap().shape.center.y, 635.0);

        ctx.data.level_started = true;
        movement_system(&mut ctx, 0.5);
        assert_eq!(ctx.world.get::<Ball>(b).unwrap().shape.center.y, 410.0);
    }
}
