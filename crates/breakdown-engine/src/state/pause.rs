//! Pause overlay, pushed on top of Play.

use glam::Vec2;

use crate::assets::{fonts, music};
use crate::components::{ButtonAction, Color, PauseUiTag};
use crate::context::AppContext;
use crate::factory;
use crate::input::{Key, MouseButton};
use crate::render::RenderTarget;
use crate::state::{music_playing, StateId, StateRequest};
use crate::systems::{render, ui};

#[derive(Debug)]
pub struct PauseState {
    /// Music was playing on entry and was paused here.
    paused_music: bool,
}

impl PauseState {
    pub fn enter(ctx: &mut AppContext) -> Self {
        let center = ctx.settings.window_center();
        factory::create_title_text::<PauseUiTag>(ctx, fonts::MAIN_FONT, "Paused", 100, Color::RED, center);
        factory::create_button::<PauseUiTag>(
            ctx,
            fonts::MAIN_FONT,
            "Resume",
            center + Vec2::new(0.0, 130.0),
            ButtonAction::Resume,
            factory::DEFAULT_BUTTON_SIZE,
        );
        factory::create_button::<PauseUiTag>(
            ctx,
            fonts::MAIN_FONT,
            "Settings",
            center + Vec2::new(0.0, 250.0),
            ButtonAction::OpenSettings,
            factory::DEFAULT_BUTTON_SIZE,
        );

        let paused_music = music_playing(ctx);
        if paused_music {
            ctx.audio.pause_music(music::MAIN_SONG);
        }
        Self { paused_music }
    }

    pub fn exit(&mut self, ctx: &mut AppContext) {
        if self.paused_music && !ctx.settings.music_muted {
            ctx.audio.play_music(music::MAIN_SONG, true);
        }
        ctx.world.destroy_all(ctx.world.view::<PauseUiTag>());
    }

    pub fn update(&mut self, ctx: &mut AppContext) -> Option<StateRequest> {
        ui::hover_system::<PauseUiTag>(ctx);
        None
    }

    pub fn render(&self, ctx: &AppContext, target: &mut dyn RenderTarget) {
        render::render_ui::<PauseUiTag>(ctx, target);
    }

    pub fn on_key_press(&mut self, _ctx: &mut AppContext, key: Key) -> Option<StateRequest> {
        (key == Key::P).then_some(StateRequest::Pop)
    }

    pub fn on_mouse_press(&mut self, ctx: &mut AppContext, button: MouseButton, position: Vec2) -> Option<StateRequest> {
        ui::click_system::<PauseUiTag>(ctx, button, position)
            .into_iter()
            .find_map(|action| match action {
                ButtonAction::Resume => Some(StateRequest::Pop),
                ButtonAction::OpenSettings => Some(StateRequest::Push(StateId::Settings { from_pause: true })),
                _ => None,
            })
    }
}
