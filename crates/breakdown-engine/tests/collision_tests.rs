//! Collision pass through the full context: walls, paddle, bricks, scoring
//! and level outcome routing.
//!
//! Every test builds a headless context with the default asset keys so that
//! sounds and the score text are present, then places the ball by hand and
//! runs a single collision pass.

use breakdown_engine::factory;
use breakdown_engine::prelude::*;
use breakdown_engine::systems::collision_system;
use glam::Vec2;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const BRICK: Vec2 = Vec2::new(120.0, 40.0);

struct Rig {
    ctx: AppContext,
    audio: RecordingAudio,
    paddle: EntityId,
    ball: EntityId,
    score: EntityId,
}

fn rig() -> Rig {
    let audio = RecordingAudio::new();
    let mut ctx = AppContext::new(
        ConfigManager::new(),
        ResourceManager::with_default_assets("assets"),
        Box::new(audio.clone()),
        Box::new(HeadlessInput::default()),
    );
    let paddle = factory::create_player(&mut ctx);
    let ball = factory::create_ball(&mut ctx);
    let score = factory::create_score_display(&mut ctx, 32, Color::WHITE, Vec2::new(640.0, 700.0));
    ctx.data.level_started = true;
    Rig {
        ctx,
        audio,
        paddle,
        ball,
        score,
    }
}

impl Rig {
    fn place_ball(&mut self, center: Vec2, velocity: Vec2) {
        self.ctx.world.get_mut::<Ball>(self.ball).unwrap().shape.center = center;
        self.ctx.world.get_mut::<Velocity>(self.ball).unwrap().0 = velocity;
    }

    fn move_paddle(&mut self, x: f32) {
        self.ctx.world.get_mut::<Paddle>(self.paddle).unwrap().shape.position.x = x;
    }

    fn ball_center(&self) -> Vec2 {
        self.ctx.world.get::<Ball>(self.ball).unwrap().shape.center
    }

    fn ball_velocity(&self) -> Vec2 {
        self.ctx.world.get::<Velocity>(self.ball).unwrap().0
    }

    fn score(&self) -> u32 {
        self.ctx.world.get::<CurrentScore>(self.score).unwrap().0
    }

    fn brick(&mut self, kind: BrickType, top_left: Vec2) -> EntityId {
        factory::create_brick(&mut self.ctx, kind, BRICK, top_left)
    }
}

// ---------------------------------------------------------------------------
// Walls and paddle
// ---------------------------------------------------------------------------

#[test]
fn left_wall_reflects_and_plays_sound() {
    let mut rig = rig();
    rig.brick(BrickType::Normal, Vec2::new(600.0, 10.0));
    rig.place_ball(Vec2::new(5.0, 300.0), Vec2::new(-300.0, -200.0));

    assert_eq!(collision_system(&mut rig.ctx, false), FrameOutcome::Continue);
    assert_eq!(rig.ball_center(), Vec2::new(25.0, 300.0));
    assert_eq!(rig.ball_velocity(), Vec2::new(300.0, -200.0));
    assert_eq!(rig.audio.sounds_played(), vec![sounds::WALL_HIT.to_owned()]);
}

#[test]
fn paddle_centre_sends_ball_straight_up() {
    let mut rig = rig();
    rig.brick(BrickType::Normal, Vec2::new(600.0, 10.0));
    // Paddle spans y 660..680; ball bottom dips 5px into it.
    rig.place_ball(Vec2::new(640.0, 640.0), Vec2::new(120.0, 450.0));

    collision_system(&mut rig.ctx, false);
    assert_eq!(rig.ball_velocity(), Vec2::new(0.0, -450.0));
    assert_eq!(rig.ball_center().y, 635.0);
    assert!(rig.audio.sounds_played().contains(&sounds::PADDLE_HIT.to_owned()));
}

#[test]
fn paddle_edge_bounce_keeps_ball_speed() {
    let mut rig = rig();
    rig.brick(BrickType::Normal, Vec2::new(600.0, 10.0));
    rig.place_ball(Vec2::new(590.0, 640.0), Vec2::new(0.0, 450.0));

    collision_system(&mut rig.ctx, false);
    let v = rig.ball_velocity();
    assert!(v.x < 0.0 && v.y < 0.0);
    assert!((v.length() - 450.0).abs() < 1e-3);
}

#[test]
fn paddle_is_clamped_before_anything_else() {
    let mut rig = rig();
    rig.move_paddle(-300.0);
    collision_system(&mut rig.ctx, false);
    let paddle = rig.ctx.world.get::<Paddle>(rig.paddle).unwrap().shape;
    assert_eq!(paddle.position.x, 71.0);
}

// ---------------------------------------------------------------------------
// Bricks
// ---------------------------------------------------------------------------

#[test]
fn strong_brick_takes_two_hits() {
    let mut rig = rig();
    let strong = rig.brick(BrickType::Strong, Vec2::new(580.0, 200.0));
    rig.brick(BrickType::Normal, Vec2::new(20.0, 10.0));

    // Brick spans y 200..240; hit its underside.
    rig.place_ball(Vec2::new(640.0, 260.0), Vec2::new(0.0, -450.0));
    assert_eq!(collision_system(&mut rig.ctx, false), FrameOutcome::Continue);
    assert_eq!(rig.ctx.world.get::<BrickHealth>(strong).unwrap().current, 1);
    assert_eq!(
        rig.ctx.world.get::<Brick>(strong).unwrap().shape.color,
        palette::STRONG_DAMAGED
    );
    assert_eq!(rig.ball_velocity(), Vec2::new(0.0, 450.0));
    assert_eq!(rig.ball_center().y, 265.0);
    assert_eq!(rig.score(), 0);

    rig.place_ball(Vec2::new(640.0, 260.0), Vec2::new(0.0, -450.0));
    assert_eq!(collision_system(&mut rig.ctx, false), FrameOutcome::Continue);
    assert!(!rig.ctx.world.is_alive(strong));
    assert_eq!(rig.score(), 10);
    assert_eq!(
        rig.ctx.world.get::<UiText>(rig.score).unwrap().text,
        "Score: 10"
    );

    let played = rig.audio.sounds_played();
    assert!(played.contains(&sounds::BRICK_HIT.to_owned()));
    assert!(played.contains(&sounds::STRONG_BRICK_BREAK.to_owned()));
}

#[test]
fn side_hit_reflects_horizontally() {
    let mut rig = rig();
    rig.brick(BrickType::Gold, Vec2::new(600.0, 200.0));
    rig.brick(BrickType::Normal, Vec2::new(20.0, 10.0));
    // Ball's right edge 4px into the brick's left side.
    rig.place_ball(Vec2::new(579.0, 220.0), Vec2::new(300.0, -200.0));

    collision_system(&mut rig.ctx, false);
    let v = rig.ball_velocity();
    assert!(v.x < 0.0);
    assert!((v.length() - 450.0).abs() < 1e-3);
    assert_eq!(rig.ball_center().x, 575.0);
    assert_eq!(rig.score(), 20);
}

#[test]
fn only_first_overlapping_brick_is_hit() {
    let mut rig = rig();
    let a = rig.brick(BrickType::Normal, Vec2::new(500.0, 100.0));
    let b = rig.brick(BrickType::Normal, Vec2::new(625.0, 100.0));
    rig.place_ball(Vec2::new(622.0, 150.0), Vec2::new(0.0, -450.0));

    assert_eq!(collision_system(&mut rig.ctx, false), FrameOutcome::Continue);
    assert!(!rig.ctx.world.is_alive(a));
    assert!(rig.ctx.world.is_alive(b));
    assert_eq!(rig.score(), 5);
}

#[test]
fn brick_broken_by_one_ball_is_skipped_by_the_next() {
    let mut rig = rig();
    let brick = rig.brick(BrickType::Normal, Vec2::new(600.0, 100.0));
    rig.brick(BrickType::Normal, Vec2::new(20.0, 10.0));
    let second = factory::create_ball(&mut rig.ctx);

    // Both balls poke 5px into the brick's underside.
    rig.place_ball(Vec2::new(660.0, 160.0), Vec2::new(0.0, -450.0));
    {
        let world = &mut rig.ctx.world;
        world.get_mut::<Ball>(second).unwrap().shape.center = Vec2::new(660.0, 160.0);
        world.get_mut::<Velocity>(second).unwrap().0 = Vec2::new(0.0, -450.0);
    }

    assert_eq!(collision_system(&mut rig.ctx, false), FrameOutcome::Continue);
    assert!(!rig.ctx.world.is_alive(brick));
    assert_eq!(rig.score(), 5);
    assert_eq!(rig.ball_velocity(), Vec2::new(0.0, 450.0));

    let world = &rig.ctx.world;
    assert_eq!(world.get::<Velocity>(second).unwrap().0, Vec2::new(0.0, -450.0));
    assert_eq!(world.get::<Ball>(second).unwrap().shape.center, Vec2::new(660.0, 160.0));
    assert_eq!(world.count::<BrickTag>(), 1);
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[test]
fn last_brick_routes_by_level() {
    let mut first = rig();
    first.ctx.data.total_levels = 2;
    first.brick(BrickType::Normal, Vec2::new(580.0, 200.0));
    first.place_ball(Vec2::new(640.0, 260.0), Vec2::new(0.0, -450.0));
    assert_eq!(collision_system(&mut first.ctx, false), FrameOutcome::LevelWon);

    let mut last = rig();
    last.ctx.data.total_levels = 2;
    last.ctx.data.level_number = 2;
    last.brick(BrickType::Normal, Vec2::new(580.0, 200.0));
    last.place_ball(Vec2::new(640.0, 260.0), Vec2::new(0.0, -450.0));
    assert_eq!(collision_system(&mut last.ctx, false), FrameOutcome::GameComplete);
}

#[test]
fn ball_at_bottom_loses() {
    let mut rig = rig();
    rig.brick(BrickType::Normal, Vec2::new(20.0, 10.0));
    rig.move_paddle(200.0);
    rig.place_ball(Vec2::new(900.0, 710.0), Vec2::new(0.0, 450.0));
    assert_eq!(collision_system(&mut rig.ctx, false), FrameOutcome::LevelLost);
}

#[test]
fn win_beats_loss_in_the_same_frame() {
    let mut rig = rig();
    rig.move_paddle(200.0);
    rig.brick(BrickType::Normal, Vec2::new(600.0, 660.0));
    rig.place_ball(Vec2::new(640.0, 700.0), Vec2::new(0.0, 450.0));
    assert_eq!(collision_system(&mut rig.ctx, false), FrameOutcome::GameComplete);
}

#[test]
fn descending_brick_at_window_bottom_loses() {
    let mut rig = rig();
    rig.ctx.data.level_started = false;
    rig.brick(BrickType::Normal, Vec2::new(20.0, 680.0));
    assert_eq!(collision_system(&mut rig.ctx, true), FrameOutcome::LevelLost);
    // Static levels never check.
    assert_eq!(collision_system(&mut rig.ctx, false), FrameOutcome::Continue);
}
