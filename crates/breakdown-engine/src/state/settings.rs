//! Settings screen: music and sound-effect mute toggles plus Back.

use glam::Vec2;

use crate::assets::{fonts, textures};
use crate::components::{ButtonAction, Color, SettingsUiTag, ToggleCondition, UiToggle};
use crate::context::AppContext;
use crate::factory;
use crate::input::MouseButton;
use crate::render::RenderTarget;
use crate::state::{StateId, StateRequest};
use crate::systems::{render, ui};

const LABEL_SIZE: u32 = 36;
const BACK_SIZE: Vec2 = Vec2::new(150.0, 50.0);

#[derive(Debug)]
pub struct SettingsState {
    from_pause: bool,
}

impl SettingsState {
    pub fn enter(ctx: &mut AppContext, from_pause: bool) -> Self {
        let center = ctx.settings.window_center();

        let toggles = [
            ("Mute Music", ButtonAction::ToggleMusicMute, ToggleCondition::MusicMuted, -100.0),
            ("Mute SFX", ButtonAction::ToggleSfxMute, ToggleCondition::SfxMuted, 0.0),
        ];
        for (label, action, condition, dy) in toggles {
            let Some(button) = factory::create_labeled_button::<SettingsUiTag>(
                ctx,
                textures::BUTTON_BACKGROUND,
                center + Vec2::new(0.0, dy),
                action,
                fonts::SCORE_FONT,
                label,
                LABEL_SIZE,
                Color::WHITE,
            ) else {
                continue;
            };
            let mut toggle = UiToggle::new(condition);
            toggle.active = condition.is_on(&ctx.settings);
            if let Err(e) = ctx.world.attach(button, toggle) {
                tracing::warn!(error = %e, label, "toggle not attached");
            }
        }

        factory::create_button::<SettingsUiTag>(
            ctx,
            fonts::SCORE_FONT,
            "Back",
            center + Vec2::new(0.0, 150.0),
            ButtonAction::Back,
            BACK_SIZE,
        );
        Self { from_pause }
    }

    pub fn from_pause(&self) -> bool {
        self.from_pause
    }

    pub fn exit(&mut self, ctx: &mut AppContext) {
        ctx.world.destroy_all(ctx.world.view::<SettingsUiTag>());
    }

    pub fn update(&mut self, ctx: &mut AppContext) -> Option<StateRequest> {
        ui::hover_system::<SettingsUiTag>(ctx);
        ui::refresh_toggles::<SettingsUiTag>(ctx);
        None
    }

    pub fn render(&self, ctx: &AppContext, target: &mut dyn RenderTarget) {
        render::render_ui::<SettingsUiTag>(ctx, target);
    }

    pub fn on_mouse_press(&mut self, ctx: &mut AppContext, button: MouseButton, position: Vec2) -> Option<StateRequest> {
        let mut request = None;
        for action in ui::click_system::<SettingsUiTag>(ctx, button, position) {
            match action {
                ButtonAction::ToggleMusicMute => {
                    ctx.settings.toggle_music_mute();
                    if ctx.settings.music_muted && super::music_playing(ctx) {
                        ctx.audio.pause_music(crate::assets::music::MAIN_SONG);
                    }
                }
                ButtonAction::ToggleSfxMute => ctx.settings.toggle_sfx_mute(),
                ButtonAction::Back if self.from_pause => request = Some(StateRequest::Pop),
                ButtonAction::Back => request = Some(StateRequest::Replace(StateId::Menu)),
                _ => {}
            }
        }
        ui::refresh_toggles::<SettingsUiTag>(ctx);
        request
    }
}
