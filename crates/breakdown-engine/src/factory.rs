//! Entity construction: paddle, ball, bricks, HUD and UI widgets.
//!
//! Gameplay values come from the config tables (see [`assets::configs`]);
//! every key has a hard-coded default used when the table, section or key
//! is missing. UI builders take the state's tag type as a generic parameter
//! so the owning state can tear its entities down with a single view.
//!
//! [`assets::configs`]: crate::assets::configs

use breakdown_ecs::prelude::*;
use glam::Vec2;

use crate::assets::{configs, fonts};
use crate::components::*;
use crate::config::ConfigManager;
use crate::context::AppContext;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Paddle centre sits this far above the window bottom.
pub const PADDLE_BOTTOM_OFFSET: f32 = 50.0;

/// Procedural layout: first brick's top-left corner.
pub const PROCEDURAL_START: Vec2 = Vec2::new(20.0, 10.0);
pub const PROCEDURAL_BRICK_SIZE: Vec2 = Vec2::new(120.0, 40.0);
pub const PROCEDURAL_SPACING: f32 = 5.0;
pub const PROCEDURAL_ROWS: usize = 3;

/// Level grid: top-left corner of cell (0, 0).
pub const GRID_START: Vec2 = Vec2::new(10.0, 10.0);
pub const GRID_PADDING: f32 = 5.0;
pub const GRID_BRICK_WIDTH: f32 = 120.0;
pub const GRID_BRICK_HEIGHT: f32 = 40.0;

pub const DEFAULT_BUTTON_SIZE: Vec2 = Vec2::new(250.0, 100.0);
pub const BUTTON_FONT_SIZE: u32 = 50;
/// Gap between a label's right edge and its button.
pub const LABEL_PADDING: f32 = 10.0;

// ---------------------------------------------------------------------------
// Gameplay entities
// ---------------------------------------------------------------------------

/// Create the paddle at the bottom centre of the window.
pub fn create_player(ctx: &mut AppContext) -> EntityId {
    ctx.config.ensure_loaded(configs::PLAYER);
    let cfg = &ctx.config;
    let speed = cfg.value_or(configs::PLAYER, "player", "movementSpeed", 350.0f32);
    let width = cfg.value_or(configs::PLAYER, "player", "paddleWidth", 140.0f32);
    let height = cfg.value_or(configs::PLAYER, "player", "paddleHeight", 20.0f32);
    let color = cfg.get_color(configs::PLAYER, "player", "paddleRGB");

    let position = Vec2::new(
        ctx.settings.target_width / 2.0,
        ctx.settings.target_height - PADDLE_BOTTOM_OFFSET,
    );

    let entity = ctx
        .world
        .spawn()
        .with(PaddleTag)
        .with(RenderableTag)
        .with(MovementSpeed(speed))
        .with(Velocity::default())
        .with(Paddle {
            shape: RectShape::new(position, Vec2::new(width, height), color),
        })
        .with(ConfineToWindow::default())
        .id();

    tracing::info!(%entity, "player paddle created");
    entity
}

/// Create the ball resting on top of the paddle.
///
/// The start position is derived from the live paddle shape, so the paddle
/// must exist first. Without one the ball starts at the origin.
pub fn create_ball(ctx: &mut AppContext) -> EntityId {
    ctx.config.ensure_loaded(configs::BALL);
    let cfg = &ctx.config;
    let radius = cfg.value_or(configs::BALL, "ball", "ballRadius", 25.0f32);
    let speed = cfg.value_or(configs::BALL, "ball", "ballSpeed", 450.0f32);
    let color = cfg.get_color(configs::BALL, "ball", "ballRGB");

    let start = match ctx
        .world
        .first::<(PaddleTag, Paddle)>()
        .and_then(|p| ctx.world.try_get::<Paddle>(p))
    {
        Some(paddle) => Vec2::new(paddle.shape.position.x, paddle.shape.top() - radius),
        None => {
            tracing::warn!("no paddle to rest the ball on");
            Vec2::ZERO
        }
    };

    let entity = ctx
        .world
        .spawn()
        .with(BallTag)
        .with(RenderableTag)
        .with(Ball {
            shape: CircleShape::new(start, radius, color),
        })
        .with(Velocity::default())
        .with(MovementSpeed(speed))
        .id();

    tracing::info!(%entity, "ball created");
    entity
}

/// Create one brick of `kind` with its top-left corner at `top_left`.
pub fn create_brick(ctx: &mut AppContext, kind: BrickType, size: Vec2, top_left: Vec2) -> EntityId {
    ctx.config.ensure_loaded(configs::BRICKS);
    let cfg = &ctx.config;
    let section = kind.section();
    let score = cfg.value_or(configs::BRICKS, section, "scoreValue", kind.default_score());
    let mut health = cfg.value_or(configs::BRICKS, section, "healthMax", kind.default_health());
    let color = cfg.get_color(configs::BRICKS, section, &format!("{section}RGB"));

    if health == 0 {
        tracing::warn!(section, "brick health resolved to 0, clamping to 1");
        health = 1;
    }

    ctx.world
        .spawn()
        .with(BrickTag)
        .with(RenderableTag)
        .with(kind)
        .with(Brick {
            shape: RectShape::from_top_left(top_left, size, color),
        })
        .with(BrickScore(score))
        .with(BrickHealth::full(health))
        .id()
}

/// Fill the top of the window with three staggered rows of bricks.
///
/// Odd rows are offset by half a brick and hold one brick fewer. Returns the
/// number of bricks created.
pub fn create_bricks(ctx: &mut AppContext) -> usize {
    let step = PROCEDURAL_BRICK_SIZE + Vec2::splat(PROCEDURAL_SPACING);
    let available = ctx.settings.target_width - PROCEDURAL_START.x;
    let per_row = ((available + PROCEDURAL_SPACING) / step.x).max(0.0) as usize;

    let mut created = 0;
    for row in 0..PROCEDURAL_ROWS {
        let (offset, count) = if row % 2 == 1 {
            (step.x / 2.0, per_row.saturating_sub(1))
        } else {
            (0.0, per_row)
        };
        for col in 0..count {
            let kind = if col % 3 == 0 {
                BrickType::Strong
            } else if col % 5 == 0 {
                BrickType::Gold
            } else {
                BrickType::Normal
            };
            let top_left = Vec2::new(
                PROCEDURAL_START.x + offset + col as f32 * step.x,
                PROCEDURAL_START.y + row as f32 * step.y,
            );
            create_brick(ctx, kind, PROCEDURAL_BRICK_SIZE, top_left);
            created += 1;
        }
    }
    tracing::info!(bricks = created, "procedural bricks created");
    created
}

/// Build level `level` from section `level_<n>` of the `Levels` table and
/// return its descent speed.
///
/// A missing section or empty layout logs an error, creates nothing and
/// returns `0.0`.
pub fn load_level(ctx: &mut AppContext, level: u32) -> f32 {
    ctx.config.ensure_loaded(configs::LEVELS);
    let section = format!("level_{level}");
    let layout = ctx.config.get_string_array(configs::LEVELS, &section, "layout");
    if layout.is_empty() {
        tracing::error!(level, section = %section, "level layout missing");
        return 0.0;
    }

    let cfg = &ctx.config;
    let descent = cfg.value_or(configs::LEVELS, &section, "descentSpeed", 0.0f32);
    let size = Vec2::new(
        cfg.value_or(configs::LEVELS, &section, "brickWidth", GRID_BRICK_WIDTH),
        cfg.value_or(configs::LEVELS, &section, "brickHeight", GRID_BRICK_HEIGHT),
    );
    let step = size + Vec2::splat(GRID_PADDING);

    let mut created = 0;
    for (row, line) in layout.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            let Some(kind) = BrickType::from_grid_char(c) else {
                continue;
            };
            let top_left = GRID_START + Vec2::new(col as f32 * step.x, row as f32 * step.y);
            create_brick(ctx, kind, size, top_left);
            created += 1;
        }
    }

    tracing::info!(level, bricks = created, descent, "level loaded");
    descent
}

/// Number of consecutive `level_1..level_N` sections with a non-empty
/// layout. Always at least 1.
pub fn count_levels(config: &ConfigManager) -> u32 {
    let mut count = 0;
    while !config
        .get_string_array(configs::LEVELS, &format!("level_{}", count + 1), "layout")
        .is_empty()
    {
        count += 1;
    }
    count.max(1)
}

// ---------------------------------------------------------------------------
// HUD
// ---------------------------------------------------------------------------

/// Create the score display, centred on `position`, starting at zero.
///
/// Without the score font the entity still exists and keeps score; it just
/// has no text.
pub fn create_score_display(ctx: &mut AppContext, size: u32, color: Color, position: Vec2) -> EntityId {
    let text = ctx
        .resources
        .require_font(fonts::SCORE_FONT, "score display")
        .map(|_| UiText {
            text: score_text(0),
            font: fonts::SCORE_FONT.to_owned(),
            size,
            color,
            hover_color: None,
            position,
            anchor: TextAnchor::Center,
        });

    let entity = ctx
        .world
        .spawn()
        .with(HudTag)
        .with(ScoreHudTag)
        .with(CurrentScore(0))
        .with_opt(text)
        .id();
    tracing::info!(%entity, "score display created");
    entity
}

/// Text shown by the score display.
pub fn score_text(score: u32) -> String {
    format!("Score: {score}")
}

// ---------------------------------------------------------------------------
// UI widgets
// ---------------------------------------------------------------------------

/// A text button: background rectangle, label, bounds and action, tagged
/// with `T`. The label is omitted if `font` is missing.
pub fn create_button<T: Component + Default>(
    ctx: &mut AppContext,
    font: &str,
    label: &str,
    position: Vec2,
    action: ButtonAction,
    size: Vec2,
) -> EntityId {
    let shape = RectShape::new(position, size, palette::BUTTON);
    let text = ctx
        .resources
        .require_font(font, "button label")
        .map(|_| UiText {
            text: label.to_owned(),
            font: font.to_owned(),
            size: BUTTON_FONT_SIZE,
            color: palette::BUTTON_TEXT,
            hover_color: Some(palette::BUTTON_TEXT_HOVER),
            position,
            anchor: TextAnchor::Center,
        });

    ctx.world
        .spawn()
        .with(T::default())
        .with(UiShape {
            shape,
            hover_color: Some(palette::BUTTON_HOVER),
        })
        .with_opt(text)
        .with(UiBounds(shape.bounds()))
        .with(UiAction(action))
        .id()
}

/// A textured button with its top-left corner at `top_left`. `None` if the
/// texture is missing.
pub fn create_gui_button<T: Component + Default>(
    ctx: &mut AppContext,
    texture: &str,
    top_left: Vec2,
    action: ButtonAction,
) -> Option<EntityId> {
    let size = ctx.resources.require_texture(texture, "gui button")?.size;
    let entity = ctx
        .world
        .spawn()
        .with(T::default())
        .with(GuiButtonTag)
        .with(GuiSprite {
            texture: texture.to_owned(),
            top_left,
            size,
        })
        .with(UiBounds(Aabb::from_top_left(top_left, size)))
        .with(UiAction(action))
        .id();
    tracing::debug!(%entity, texture, "gui button created");
    Some(entity)
}

fn label_for(bounds: &Aabb, font: &str, text: &str, size: u32, color: Color) -> UiText {
    UiText {
        text: text.to_owned(),
        font: font.to_owned(),
        size,
        color,
        hover_color: None,
        position: Vec2::new(bounds.min.x - LABEL_PADDING, bounds.center().y),
        anchor: TextAnchor::RightCenter,
    }
}

/// A separate label entity placed to the left of `button`.
pub fn create_button_label<T: Component + Default>(
    ctx: &mut AppContext,
    button: EntityId,
    font: &str,
    text: &str,
    size: u32,
    color: Color,
) -> Option<EntityId> {
    ctx.resources.require_font(font, "button label")?;
    let bounds = match ctx.world.get::<UiBounds>(button) {
        Ok(b) => b.0,
        Err(e) => {
            tracing::warn!(error = %e, "cannot label button");
            return None;
        }
    };
    let label = label_for(&bounds, font, text, size, color);
    Some(ctx.world.spawn().with(T::default()).with(label).id())
}

/// A textured button carrying its own label to the left. The label is
/// omitted if `font` is missing; `None` if the texture is missing.
#[allow(clippy::too_many_arguments)]
pub fn create_labeled_button<T: Component + Default>(
    ctx: &mut AppContext,
    texture: &str,
    top_left: Vec2,
    action: ButtonAction,
    font: &str,
    text: &str,
    size: u32,
    color: Color,
) -> Option<EntityId> {
    let button = create_gui_button::<T>(ctx, texture, top_left, action)?;
    if ctx.resources.require_font(font, "button label").is_some() {
        let bounds = Aabb::from_top_left(top_left, ctx.world.get::<GuiSprite>(button).ok()?.size);
        let label = label_for(&bounds, font, text, size, color);
        ctx.world.attach(button, label).ok()?;
    }
    Some(button)
}

/// A centred, non-interactive line of text. `None` if the font is missing.
pub fn create_title_text<T: Component + Default>(
    ctx: &mut AppContext,
    font: &str,
    text: &str,
    size: u32,
    color: Color,
    position: Vec2,
) -> Option<EntityId> {
    ctx.resources.require_font(font, "title text")?;
    let entity = ctx
        .world
        .spawn()
        .with(T::default())
        .with(UiText {
            text: text.to_owned(),
            font: font.to_owned(),
            size,
            color,
            hover_color: None,
            position,
            anchor: TextAnchor::Center,
        })
        .id();
    Some(entity)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
