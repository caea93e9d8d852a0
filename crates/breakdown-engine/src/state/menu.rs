//! Main menu: title plus Play and Settings buttons.

use glam::Vec2;

use crate::assets::fonts;
use crate::components::{palette, ButtonAction, MenuUiTag};
use crate::context::AppContext;
use crate::factory;
use crate::input::MouseButton;
use crate::render::RenderTarget;
use crate::state::{StateId, StateRequest};
use crate::systems::{render, ui};

pub const TITLE: &str = "Breakdown";
pub const TITLE_SIZE: u32 = 120;

#[derive(Debug)]
pub struct MenuState;

impl MenuState {
    pub fn enter(ctx: &mut AppContext) -> Self {
        let center = ctx.settings.window_center();
        factory::create_title_text::<MenuUiTag>(
            ctx,
            fonts::SCORE_FONT,
            TITLE,
            TITLE_SIZE,
            palette::TITLE,
            center - Vec2::new(0.0, 150.0),
        );
        factory::create_button::<MenuUiTag>(
            ctx,
            fonts::MAIN_FONT,
            "Play",
            center,
            ButtonAction::Play,
            factory::DEFAULT_BUTTON_SIZE,
        );
        factory::create_button::<MenuUiTag>(
            ctx,
            fonts::MAIN_FONT,
            "Settings",
            center + Vec2::new(0.0, 150.0),
            ButtonAction::OpenSettings,
            factory::DEFAULT_BUTTON_SIZE,
        );
        Self
    }

    pub fn exit(&mut self, ctx: &mut AppContext) {
        let removed = ctx.world.destroy_all(ctx.world.view::<MenuUiTag>());
        tracing::debug!(removed, "menu torn down");
    }

    pub fn update(&mut self, ctx: &mut AppContext) -> Option<StateRequest> {
        ui::hover_system::<MenuUiTag>(ctx);
        None
    }

    pub fn render(&self, ctx: &AppContext, target: &mut dyn RenderTarget) {
        render::render_ui::<MenuUiTag>(ctx, target);
    }

    pub fn on_mouse_press(&mut self, ctx: &mut AppContext, button: MouseButton, position: Vec2) -> Option<StateRequest> {
        ui::click_system::<MenuUiTag>(ctx, button, position)
            .into_iter()
            .find_map(|action| match action {
                ButtonAction::Play => Some(StateRequest::Replace(StateId::Play)),
                ButtonAction::OpenSettings => Some(StateRequest::Replace(StateId::Settings { from_pause: false })),
                _ => None,
            })
    }
}
