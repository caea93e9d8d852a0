//! Render systems: world state to [`DrawCommand`]s.
//!
//! Z-order is paddles, then bricks, then balls, so the ball stays visible
//! when it overlaps a brick. UI is drawn after gameplay by the active state.

use breakdown_ecs::prelude::*;

use crate::assets::textures;
use crate::components::*;
use crate::context::AppContext;
use crate::render::{DrawCommand, RenderTarget};

/// Draw every renderable paddle, brick and ball. With `show_debug` each
/// one also gets a bounding-box outline.
pub fn render_game(ctx: &AppContext, target: &mut dyn RenderTarget, show_debug: bool) {
    let world = &ctx.world;
    let mut outlines = Vec::new();

    for e in world.view::<(RenderableTag, Paddle)>() {
        if let Some(p) = world.try_get::<Paddle>(e) {
            target.draw(rect(&p.shape));
            outlines.push(p.shape.bounds());
        }
    }
    for e in world.view::<(RenderableTag, Brick)>() {
        if let Some(b) = world.try_get::<Brick>(e) {
            target.draw(rect(&b.shape));
            outlines.push(b.shape.bounds());
        }
    }
    for e in world.view::<(RenderableTag, Ball)>() {
        if let Some(b) = world.try_get::<Ball>(e) {
            target.draw(DrawCommand::Circle {
                center: b.shape.center,
                radius: b.shape.radius,
                color: b.shape.color,
            });
            outlines.push(b.shape.bounds());
        }
    }

    if show_debug {
        for bounds in outlines {
            target.draw(DrawCommand::Outline {
                bounds,
                color: palette::DEBUG_BOUNDS,
            });
        }
    }
}

/// Draw every UI entity tagged `T`: shapes, sprites, toggle marks, then
/// text on top.
pub fn render_ui<T: Component>(ctx: &AppContext, target: &mut dyn RenderTarget) {
    let world = &ctx.world;

    for e in world.view::<(T, UiShape)>() {
        let Some(ui) = world.try_get::<UiShape>(e) else {
            continue;
        };
        let mut shape = ui.shape;
        if let (true, Some(hover)) = (world.has::<Hovered>(e), ui.hover_color) {
            shape.color = hover;
        }
        target.draw(rect(&shape));
    }

    for e in world.view::<(T, GuiSprite)>() {
        let Some(sprite) = world.try_get::<GuiSprite>(e) else {
            continue;
        };
        target.draw(DrawCommand::Sprite {
            texture: sprite.texture.clone(),
            top_left: sprite.top_left,
            size: sprite.size,
        });
    }

    let mark = ctx.resources.texture(textures::BUTTON_RED_X).is_some();
    for e in world.view::<(T, UiToggle, UiBounds)>() {
        let (Some(toggle), Some(bounds)) = (world.try_get::<UiToggle>(e), world.try_get::<UiBounds>(e)) else {
            continue;
        };
        if toggle.active && mark {
            target.draw(DrawCommand::Sprite {
                texture: textures::BUTTON_RED_X.to_owned(),
                top_left: bounds.0.min,
                size: bounds.0.size(),
            });
        }
    }

    for e in world.view::<(T, UiText)>() {
        let Some(text) = world.try_get::<UiText>(e) else {
            continue;
        };
        let color = match (world.has::<Hovered>(e), text.hover_color) {
            (true, Some(hover)) => hover,
            _ => text.color,
        };
        target.draw(DrawCommand::Text {
            text: text.text.clone(),
            font: text.font.clone(),
            size: text.size,
            position: text.position,
            anchor: text.anchor,
            color,
        });
    }
}

fn rect(shape: &RectShape) -> DrawCommand {
    DrawCommand::Rect {
        center: shape.position,
        size: shape.size,
        color: shape.color,
    }
}
