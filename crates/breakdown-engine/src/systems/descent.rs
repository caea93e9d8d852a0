//! Brick descent.

use crate::components::{Brick, BrickTag};
use crate::context::AppContext;

/// Move every brick down by `speed * dt`. Does nothing until the level has
/// started.
pub fn descent_system(ctx: &mut AppContext, speed: f32, dt: f32) {
    if !ctx.data.level_started || speed == 0.0 {
        return;
    }
    let dy = speed * dt;
    for e in ctx.world.view::<(BrickTag, Brick)>() {
        if let Some(brick) = ctx.world.try_get_mut::<Brick>(e) {
            brick.shape.position.y += dy;
        }
    }
}
