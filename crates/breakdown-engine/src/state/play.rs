//! The game itself.
//!
//! Entering builds the level (paddle, ball, bricks, score display) and
//! starts the music; exiting destroys every gameplay and HUD entity.
//! Pause is pushed on top, so a paused game keeps all of its entities.

use glam::Vec2;

use crate::assets::configs;
use crate::components::{Color, HudTag, RenderableTag};
use crate::context::AppContext;
use crate::factory;
use crate::input::Key;
use crate::render::RenderTarget;
use crate::state::{start_music, StateId, StateRequest, TransitionKind};
use crate::systems::{self, render, FrameOutcome};

pub const SCORE_SIZE: u32 = 32;
/// Score display sits this far above the window bottom.
pub const SCORE_BOTTOM_OFFSET: f32 = 20.0;

#[derive(Debug)]
pub struct PlayState {
    descent_speed: f32,
    show_debug: bool,
}

impl PlayState {
    pub fn enter(ctx: &mut AppContext) -> Self {
        ctx.data.level_started = false;

        ctx.config.ensure_loaded(configs::LEVELS);
        let level = ctx.data.level_number;
        let descent_speed = if ctx.config.is_loaded(configs::LEVELS) {
            factory::load_level(ctx, level)
        } else {
            factory::create_bricks(ctx);
            0.0
        };

        factory::create_player(ctx);
        factory::create_ball(ctx);

        let size = ctx.settings.window_size();
        factory::create_score_display(
            ctx,
            SCORE_SIZE,
            Color::WHITE,
            Vec2::new(size.x / 2.0, size.y - SCORE_BOTTOM_OFFSET),
        );

        start_music(ctx);
        tracing::info!(level = ctx.data.level_number, descent_speed, "level started");
        Self {
            descent_speed,
            show_debug: false,
        }
    }

    pub fn descent_speed(&self) -> f32 {
        self.descent_speed
    }

    pub fn show_debug(&self) -> bool {
        self.show_debug
    }

    pub fn exit(&mut self, ctx: &mut AppContext) {
        let gameplay = ctx.world.destroy_all(ctx.world.view::<RenderableTag>());
        let hud = ctx.world.destroy_all(ctx.world.view::<HudTag>());
        tracing::debug!(gameplay, hud, "play torn down");
    }

    /// Run one simulation frame. A finished level requests the matching
    /// Transition screen instead of descending.
    pub fn update(&mut self, ctx: &mut AppContext, dt: f32) -> Option<StateRequest> {
        systems::handle_player_input(ctx);
        systems::movement_system(ctx, dt);

        let kind = match systems::collision_system(ctx, self.descent_speed > 0.0) {
            FrameOutcome::Continue => {
                systems::descent_system(ctx, self.descent_speed, dt);
                return None;
            }
            FrameOutcome::LevelLost => TransitionKind::LevelLoss,
            FrameOutcome::LevelWon => TransitionKind::LevelWin,
            FrameOutcome::GameComplete => TransitionKind::GameWin,
        };
        Some(StateRequest::Replace(StateId::Transition(kind)))
    }

    pub fn render(&self, ctx: &AppContext, target: &mut dyn RenderTarget) {
        render::render_game(ctx, target, self.show_debug);
        render::render_ui::<HudTag>(ctx, target);
    }

    pub fn on_key_press(&mut self, _ctx: &mut AppContext, key: Key) -> Option<StateRequest> {
        match key {
            Key::P => Some(StateRequest::Push(StateId::Pause)),
            Key::F12 => {
                self.show_debug = !self.show_debug;
                tracing::warn!(enabled = self.show_debug, "debug overlay toggled");
                None
            }
            _ => None,
        }
    }
}
