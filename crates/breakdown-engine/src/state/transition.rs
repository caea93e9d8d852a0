//! End-of-level screen: lost, won, or finished the game.

use glam::Vec2;

use crate::assets::{fonts, music};
use crate::components::{ButtonAction, Color, TransitionUiTag};
use crate::context::AppContext;
use crate::factory;
use crate::input::MouseButton;
use crate::render::RenderTarget;
use crate::state::{music_playing, StateId, StateRequest, TransitionKind};
use crate::systems::{render, ui};

impl TransitionKind {
    pub fn message(self) -> &'static str {
        match self {
            TransitionKind::LevelLoss => "Oops! Level lost.",
            TransitionKind::LevelWin => "Level Complete!",
            TransitionKind::GameWin => "You beat the game! Woo!",
        }
    }

    pub fn color(self) -> Color {
        match self {
            TransitionKind::LevelLoss => Color::RED,
            TransitionKind::LevelWin => Color::GREEN,
            TransitionKind::GameWin => Color::YELLOW,
        }
    }

    /// The first button's label and action.
    pub fn primary_action(self) -> (&'static str, ButtonAction) {
        match self {
            TransitionKind::LevelLoss => ("Try Again", ButtonAction::TryAgain),
            TransitionKind::LevelWin => ("Next Level", ButtonAction::NextLevel),
            TransitionKind::GameWin => ("Restart", ButtonAction::Restart),
        }
    }
}

#[derive(Debug)]
pub struct TransitionState {
    kind: TransitionKind,
}

impl TransitionState {
    pub fn enter(ctx: &mut AppContext, kind: TransitionKind) -> Self {
        if music_playing(ctx) {
            ctx.audio.stop_music(music::MAIN_SONG);
        }

        let center = ctx.settings.window_center();
        factory::create_title_text::<TransitionUiTag>(
            ctx,
            fonts::MAIN_FONT,
            kind.message(),
            100,
            kind.color(),
            center - Vec2::new(0.0, 200.0),
        );

        let (label, action) = kind.primary_action();
        let buttons = [
            (label, action, -70.0),
            ("Main Menu", ButtonAction::MainMenu, 50.0),
            ("Quit", ButtonAction::Quit, 200.0),
        ];
        for (label, action, dy) in buttons {
            factory::create_button::<TransitionUiTag>(
                ctx,
                fonts::MAIN_FONT,
                label,
                center + Vec2::new(0.0, dy),
                action,
                factory::DEFAULT_BUTTON_SIZE,
            );
        }
        Self { kind }
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn exit(&mut self, ctx: &mut AppContext) {
        ctx.world.destroy_all(ctx.world.view::<TransitionUiTag>());
    }

    pub fn update(&mut self, ctx: &mut AppContext) -> Option<StateRequest> {
        ui::hover_system::<TransitionUiTag>(ctx);
        None
    }

    pub fn render(&self, ctx: &AppContext, target: &mut dyn RenderTarget) {
        render::render_ui::<TransitionUiTag>(ctx, target);
    }

    pub fn on_mouse_press(&mut self, ctx: &mut AppContext, button: MouseButton, position: Vec2) -> Option<StateRequest> {
        let action = ui::click_system::<TransitionUiTag>(ctx, button, position)
            .into_iter()
            .next()?;
        let data = &mut ctx.data;
        let request = match action {
            ButtonAction::TryAgain => {
                data.level_started = false;
                StateRequest::Replace(StateId::Play)
            }
            ButtonAction::NextLevel => {
                data.level_started = false;
                if data.level_number < data.total_levels {
                    data.level_number += 1;
                }
                StateRequest::Replace(StateId::Play)
            }
            ButtonAction::Restart => {
                data.reset();
                StateRequest::Replace(StateId::Play)
            }
            ButtonAction::MainMenu => {
                data.reset();
                StateRequest::Replace(StateId::Menu)
            }
            ButtonAction::Quit => StateRequest::Quit,
            _ => return None,
        };
        tracing::info!(?action, level = ctx.data.level_number, "transition choice");
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::resources::ResourceManager;

    fn ctx() -> AppContext {
        let mut ctx = AppContext::headless(ConfigManager::new());
        ctx.resources = ResourceManager::with_default_assets("assets");
        ctx
    }

    #[test]
    fn kind_selects_text_and_primary_button() {
        let mut ctx = ctx();
        TransitionState::enter(&mut ctx, TransitionKind::LevelWin);
        let texts: Vec<String> = ctx
            .world
            .view::<TransitionUiTag>()
            .iter()
            .filter_map(|e| ctx.world.try_get::<crate::components::UiText>(e).map(|t| t.text.clone()))
            .collect();
        assert_eq!(texts, vec!["Level Complete!", "Next Level", "Main Menu", "Quit"]);
    }

    #[test]
    fn next_level_advances_up_to_total() {
        let mut ctx = ctx();
        ctx.data.total_levels = 2;
        let center = ctx.settings.window_center();
        let primary = center + Vec2::new(0.0, -70.0);

        let mut state = TransitionState::enter(&mut ctx, TransitionKind::LevelWin);
        let request = state.on_mouse_press(&mut ctx, MouseButton::Left, primary);
        assert_eq!(request, Some(StateRequest::Replace(StateId::Play)));
        assert_eq!(ctx.data.level_number, 2);

        state.on_mouse_press(&mut ctx, MouseButton::Left, primary);
        assert_eq!(ctx.data.level_number, 2);
    }

    #[test]
    fn main_menu_resets_progress() {
        let mut ctx = ctx();
        ctx.data.level_number = 3;
        ctx.data.total_levels = 5;
        let mut state = TransitionState::enter(&mut ctx, TransitionKind::LevelLoss);
        let at = ctx.settings.window_center() + Vec2::new(0.0, 50.0);
        assert_eq!(
            state.on_mouse_press(&mut ctx, MouseButton::Left, at),
            Some(StateRequest::Replace(StateId::Menu))
        );
        assert_eq!(ctx.data.level_number, 1);
        assert_eq!(ctx.data.total_levels, 5);
    }
}
