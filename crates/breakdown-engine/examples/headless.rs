//! Headless demo -- plays level 1 with a simple autopilot and reports how it
//! ended.
//!
//! Run with:
//!   cargo run --example headless -p breakdown-engine
//!
//! Set `RUST_LOG=info` to see level and state transitions.

use breakdown_engine::prelude::*;

const MAX_FRAMES: u64 = 60 * 120;

/// Hold Left or Right to keep the paddle under the ball.
fn steer(input: &HeadlessInput, ctx: &AppContext) {
    let ball = ctx.world.first::<BallTag>().and_then(|b| ctx.world.try_get::<Ball>(b));
    let paddle = ctx.world.first::<PaddleTag>().and_then(|p| ctx.world.try_get::<Paddle>(p));
    input.release(Key::Left);
    input.release(Key::Right);
    if let (Some(ball), Some(paddle)) = (ball, paddle) {
        let offset = ball.shape.center.x - paddle.shape.position.x;
        if offset < -20.0 {
            input.hold(Key::Left);
        } else if offset > 20.0 {
            input.hold(Key::Right);
        }
    }
}

fn current_score(ctx: &AppContext) -> Option<u32> {
    let hud = ctx.world.first::<(ScoreHudTag, CurrentScore)>()?;
    ctx.world.try_get::<CurrentScore>(hud).map(|s| s.0)
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config");
    let mut config = ConfigManager::with_root(root);
    for id in configs::ALL {
        config.load_config(id, format!("{root}/{id}.toml"))?;
    }

    let input = HeadlessInput::default();
    let audio = RecordingAudio::new();
    let ctx = AppContext::new(
        config,
        ResourceManager::with_default_assets("assets"),
        Box::new(audio.clone()),
        Box::new(input.clone()),
    );
    let tick = TickConfig {
        headless: true,
        ..Default::default()
    };
    let mut game = GameLoop::new(ctx, tick, DrawList::new(), StateId::Menu);

    // Press Play, then launch.
    input.click(game.context().settings.window_center());
    game.frame();
    input.hold(Key::Space);
    game.frame();
    input.release(Key::Space);

    let mut score = 0;
    let mut outcome = None;
    while game.frame_count() < MAX_FRAMES {
        steer(&input, game.context());
        if !game.frame() {
            break;
        }
        if let Some(StateId::Transition(kind)) = game.states().active_kind() {
            outcome = Some(kind);
            break;
        }
        score = current_score(game.context()).unwrap_or(score);
    }

    println!(
        "frames: {}  sim time: {:.1}s  score: {}  outcome: {:?}  sounds: {}",
        game.frame_count(),
        game.sim_time(),
        score,
        outcome,
        audio.sounds_played().len(),
    );
    Ok(())
}
