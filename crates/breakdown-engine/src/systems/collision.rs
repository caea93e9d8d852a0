//! Collision detection and response.
//!
//! One pass per frame, in this order:
//!
//! 1. Paddles are hard-clamped inside the window.
//! 2. Descent levels only: a brick touching the window bottom or the paddle
//!    loses the level immediately.
//! 3. Before launch the ball is re-pinned on top of the paddle and nothing
//!    else runs.
//! 4. Balls reflect off the left, right and top walls. Touching the bottom
//!    only raises a flag.
//! 5. Balls hitting a paddle leave at an angle set by where they struck.
//! 6. Balls hitting a brick bounce off the axis of least penetration and
//!    damage it. Only the first overlapping brick (in creation order) is hit
//!    per ball per frame.
//! 7. The bottom flag loses the level unless step 6 just won it.
//!
//! Bricks are snapshotted as `(id, bounds)` before step 6; every id is
//! re-checked with `is_alive` before use because an earlier ball may have
//! destroyed it.

use breakdown_ecs::prelude::*;
use glam::Vec2;

use crate::assets::sounds;
use crate::components::*;
use crate::context::AppContext;
use crate::factory::score_text;
use crate::systems::FrameOutcome;

/// Largest paddle deflection from straight up, reached at the paddle edges.
pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

/// Result of testing one ball against the window edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// Bounced off the left, right or top wall.
    pub bounced: bool,
    /// Reached the bottom edge.
    pub bottom: bool,
}

/// Reflect `velocity` off the left, right and top walls, clamping the ball
/// back inside by its radius.
pub fn reflect_off_walls(ball: &mut CircleShape, velocity: &mut Vec2, window: Vec2) -> WallContact {
    let r = ball.radius;
    let mut contact = WallContact::default();

    if ball.center.x - r < 0.0 {
        ball.center.x = r;
        velocity.x = -velocity.x;
        contact.bounced = true;
    } else if ball.center.x + r > window.x {
        ball.center.x = window.x - r;
        velocity.x = -velocity.x;
        contact.bounced = true;
    }

    if ball.center.y - r < 0.0 {
        ball.center.y = r;
        velocity.y = -velocity.y;
        contact.bounced = true;
    }

    contact.bottom = ball.center.y + r > window.y;
    contact
}

/// Velocity after striking `paddle` at horizontal position `ball_x`.
///
/// The offset from the paddle centre, as a fraction of its half-width
/// clamped to `[-1, 1]`, scales [`MAX_BOUNCE_ANGLE_DEG`]; straight up is
/// rotated by that angle and scaled to `speed`.
pub fn paddle_bounce(ball_x: f32, paddle: &RectShape, speed: f32) -> Vec2 {
    let rel = ((ball_x - paddle.position.x) / paddle.half_width()).clamp(-1.0, 1.0);
    let angle = (rel * MAX_BOUNCE_ANGLE_DEG).to_radians();
    Vec2::from_angle(angle).rotate(Vec2::NEG_Y) * speed
}

/// Bounce the ball off `brick` if their boxes overlap.
///
/// A wider-than-tall overlap is a top/bottom hit: `vy` flips and the ball is
/// pushed out vertically by the overlap height. Otherwise `vx` flips and the
/// ball is pushed out horizontally. Speed is restored to `speed` afterwards.
/// Returns whether a hit happened.
pub fn bounce_off_brick(ball: &mut CircleShape, velocity: &mut Vec2, speed: f32, brick: &Aabb) -> bool {
    let Some(overlap) = ball.bounds().intersection(brick) else {
        return false;
    };
    let brick_center = brick.center();

    if overlap.width() > overlap.height() {
        velocity.y = -velocity.y;
        if ball.center.y < brick_center.y {
            ball.center.y -= overlap.height();
        } else {
            ball.center.y += overlap.height();
        }
    } else {
        velocity.x = -velocity.x;
        if ball.center.x < brick_center.x {
            ball.center.x -= overlap.width();
        } else {
            ball.center.x += overlap.width();
        }
    }

    *velocity = velocity.normalize_or_zero() * speed;
    true
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

/// Clamp every window-confined paddle inside `[0, width]`.
pub fn confine_paddles(world: &mut World, width: f32) {
    for e in world.view::<(Paddle, ConfineToWindow)>() {
        let Some(pads) = world.try_get::<ConfineToWindow>(e).copied() else {
            continue;
        };
        let Some(paddle) = world.try_get_mut::<Paddle>(e) else {
            continue;
        };
        let half = paddle.shape.half_width();
        if paddle.shape.position.x - half < 0.0 {
            paddle.shape.position.x = pads.pad_left + half;
        }
        if paddle.shape.position.x + half > width {
            paddle.shape.position.x = width - (pads.pad_right + half);
        }
    }
}

fn first_paddle(world: &World) -> Option<RectShape> {
    let e = world.first::<(PaddleTag, Paddle)>()?;
    world.try_get::<Paddle>(e).map(|p| p.shape)
}

/// Whether any brick has reached the window bottom or the paddle.
pub fn bricks_breached(world: &World, height: f32) -> bool {
    let paddle = first_paddle(world).map(|p| p.bounds());
    world.view::<(BrickTag, Brick)>().iter().any(|e| {
        world.try_get::<Brick>(e).is_some_and(|brick| {
            let bounds = brick.shape.bounds();
            bounds.max.y >= height || paddle.is_some_and(|p| bounds.intersects(&p))
        })
    })
}

/// Place every ball at rest on top of the paddle.
pub fn pin_balls_to_paddle(world: &mut World) {
    let Some(paddle) = first_paddle(world) else {
        return;
    };
    for e in world.view::<(BallTag, Ball)>() {
        if let Some(ball) = world.try_get_mut::<Ball>(e) {
            ball.shape.center = Vec2::new(paddle.position.x, paddle.top() - ball.shape.radius);
        }
    }
}

/// Add `points` to the HUD score and refresh its text.
pub fn award_points(world: &mut World, points: u32) {
    let Some(hud) = world.first::<(ScoreHudTag, CurrentScore)>() else {
        tracing::warn!(points, "no score display to credit");
        return;
    };
    let Some(score) = world.try_get_mut::<CurrentScore>(hud) else {
        return;
    };
    score.0 += points;
    let total = score.0;
    if let Some(text) = world.try_get_mut::<UiText>(hud) {
        text.text = score_text(total);
    }
}

/// Apply one hit to `brick`. Destroys it at zero health, credits its score
/// and reports a win when it was the last brick.
fn damage_brick(ctx: &mut AppContext, brick: EntityId) -> FrameOutcome {
    let kind = ctx.world.try_get::<BrickType>(brick).copied().unwrap_or(BrickType::Normal);
    let Some(health) = ctx.world.try_get_mut::<BrickHealth>(brick) else {
        return FrameOutcome::Continue;
    };
    health.current = health.current.saturating_sub(1);

    if health.current > 0 {
        if let (Some(color), Some(shape)) = (
            kind.damaged_color(),
            ctx.world.try_get_mut::<Brick>(brick),
        ) {
            shape.shape.color = color;
        }
        ctx.play_sound(sounds::BRICK_HIT);
        return FrameOutcome::Continue;
    }

    let points = ctx.world.try_get::<BrickScore>(brick).map_or(0, |s| s.0);
    if let Err(e) = ctx.world.destroy(brick) {
        tracing::warn!(error = %e, "brick vanished before destruction");
        return FrameOutcome::Continue;
    }
    award_points(&mut ctx.world, points);
    ctx.play_sound(kind.break_sound());
    tracing::debug!(%brick, ?kind, points, "brick destroyed");

    if !ctx.world.view::<BrickTag>().is_empty() {
        FrameOutcome::Continue
    } else if ctx.data.is_last_level() {
        FrameOutcome::GameComplete
    } else {
        FrameOutcome::LevelWon
    }
}

fn ball_state(world: &World, e: EntityId) -> Option<(CircleShape, Vec2, f32)> {
    Some((
        world.try_get::<Ball>(e)?.shape,
        world.try_get::<Velocity>(e)?.0,
        world.try_get::<MovementSpeed>(e)?.0,
    ))
}

fn store_ball(world: &mut World, e: EntityId, shape: CircleShape, velocity: Vec2) {
    if let Some(ball) = world.try_get_mut::<Ball>(e) {
        ball.shape = shape;
    }
    if let Some(v) = world.try_get_mut::<Velocity>(e) {
        v.0 = velocity;
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Run the full collision pass. `descent_active` enables the brick breach
/// check used by levels whose bricks move.
pub fn collision_system(ctx: &mut AppContext, descent_active: bool) -> FrameOutcome {
    let window = ctx.settings.window_size();
    confine_paddles(&mut ctx.world, window.x);

    if descent_active && bricks_breached(&ctx.world, window.y) {
        tracing::info!(level = ctx.data.level_number, "bricks reached the paddle");
        return FrameOutcome::LevelLost;
    }

    if !ctx.data.level_started {
        pin_balls_to_paddle(&mut ctx.world);
        return FrameOutcome::Continue;
    }

    let balls = ctx.world.view::<(BallTag, Ball, Velocity, MovementSpeed)>();
    let mut ball_lost = false;

    // Walls.
    for e in &balls {
        let Some((mut shape, mut velocity, _)) = ball_state(&ctx.world, e) else {
            continue;
        };
        let contact = reflect_off_walls(&mut shape, &mut velocity, window);
        store_ball(&mut ctx.world, e, shape, velocity);
        if contact.bounced {
            ctx.play_sound(sounds::WALL_HIT);
        }
        ball_lost |= contact.bottom;
    }

    // Paddle.
    let paddles = ctx.world.view::<(PaddleTag, Paddle)>();
    for e in &balls {
        let Some((mut shape, _, speed)) = ball_state(&ctx.world, e) else {
            continue;
        };
        let hit = paddles.iter().find_map(|p| {
            let paddle = ctx.world.try_get::<Paddle>(p)?.shape;
            shape.bounds().intersects(&paddle.bounds()).then_some(paddle)
        });
        if let Some(paddle) = hit {
            let velocity = paddle_bounce(shape.center.x, &paddle, speed);
            shape.center.y = paddle.top() - shape.radius;
            store_ball(&mut ctx.world, e, shape, velocity);
            ctx.play_sound(sounds::PADDLE_HIT);
        }
    }

    // Bricks.
    let bricks: Vec<(EntityId, Aabb)> = ctx
        .world
        .view::<(BrickTag, Brick)>()
        .iter()
        .filter_map(|b| Some((b, ctx.world.try_get::<Brick>(b)?.shape.bounds())))
        .collect();

    let mut outcome = FrameOutcome::Continue;
    for e in &balls {
        for &(brick, bounds) in &bricks {
            if !ctx.world.is_alive(brick) {
                continue;
            }
            let Some((mut shape, mut velocity, speed)) = ball_state(&ctx.world, e) else {
                break;
            };
            if !bounce_off_brick(&mut shape, &mut velocity, speed, &bounds) {
                continue;
            }
            store_ball(&mut ctx.world, e, shape, velocity);
            let result = damage_brick(ctx, brick);
            if result != FrameOutcome::Continue {
                outcome = result;
            }
            break;
        }
    }

    if outcome != FrameOutcome::Continue {
        tracing::info!(level = ctx.data.level_number, ?outcome, "level finished");
        return outcome;
    }
    if ball_lost {
        tracing::info!(level = ctx.data.level_number, "ball lost");
        return FrameOutcome::LevelLost;
    }
    FrameOutcome::Continue
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
