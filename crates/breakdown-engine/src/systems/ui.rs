//! Mouse interaction with UI entities.
//!
//! Every function is generic over the owning state's tag so a state only
//! ever touches its own widgets.

use breakdown_ecs::prelude::*;
use glam::Vec2;

use crate::components::{ButtonAction, Hovered, UiAction, UiBounds, UiToggle};
use crate::context::AppContext;
use crate::input::MouseButton;

/// Mark `T`-tagged widgets under the current mouse position as [`Hovered`].
pub fn hover_system<T: Component>(ctx: &mut AppContext) {
    let mouse = ctx.input.mouse_position();
    update_hover_at::<T>(&mut ctx.world, mouse);
}

/// Attach or detach [`Hovered`] on every `T`-tagged widget depending on
/// whether `position` is inside its bounds.
pub fn update_hover_at<T: Component>(world: &mut World, position: Vec2) {
    for e in world.view::<(UiBounds, T)>() {
        let Some(inside) = world.try_get::<UiBounds>(e).map(|b| b.0.contains(position)) else {
            continue;
        };
        let hovered = world.has::<Hovered>(e);
        if inside && !hovered {
            if let Err(err) = world.attach(e, Hovered) {
                tracing::warn!(error = %err, "failed to mark hover");
            }
        } else if !inside && hovered {
            world.detach::<Hovered>(e);
        }
    }
}

/// Actions of the `T`-tagged widgets under a left click at `position`.
///
/// Hover is refreshed at the click position first, so a click works even
/// if no hover pass ran since the mouse last moved. Other buttons yield
/// nothing.
pub fn click_system<T: Component>(ctx: &mut AppContext, button: MouseButton, position: Vec2) -> Vec<ButtonAction> {
    if button != MouseButton::Left {
        return Vec::new();
    }
    update_hover_at::<T>(&mut ctx.world, position);

    let world = &ctx.world;
    let actions: Vec<ButtonAction> = world
        .view::<(Hovered, UiAction, T)>()
        .iter()
        .filter_map(|e| world.try_get::<UiAction>(e).map(|a| a.0))
        .collect();
    if !actions.is_empty() {
        tracing::debug!(?actions, %position, "ui click");
    }
    actions
}

/// Sync every `T`-tagged toggle with the settings flag it mirrors.
pub fn refresh_toggles<T: Component>(ctx: &mut AppContext) {
    let settings = ctx.settings.clone();
    for e in ctx.world.view::<(UiToggle, T)>() {
        if let Some(toggle) = ctx.world.try_get_mut::<UiToggle>(e) {
            toggle.active = toggle.condition.is_on(&settings);
        }
    }
}
