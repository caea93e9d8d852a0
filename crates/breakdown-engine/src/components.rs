//! Component types for gameplay and UI entities.
//!
//! Everything here is plain data. Shapes carry their own authoritative
//! position; there is no separate transform. Rectangles are positioned by
//! their centre, circles by their centre.

use breakdown_ecs::impl_component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::sounds;
use crate::context::AppSettings;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    /// Opaque colour from three channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Fixed palette used by the UI.
pub mod palette {
    use super::Color;

    pub const BUTTON: Color = Color::BLUE;
    pub const BUTTON_HOVER: Color = Color::rgb(100, 100, 255);
    pub const BUTTON_TEXT: Color = Color::rgb(200, 200, 200);
    pub const BUTTON_TEXT_HOVER: Color = Color::WHITE;
    pub const TITLE: Color = Color::rgb(250, 250, 250);
    pub const DEBUG_BOUNDS: Color = Color::rgb(255, 0, 255);
    /// Tint of a Strong brick that has taken a hit.
    pub const STRONG_DAMAGED: Color = Color::rgb(76, 144, 142);
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Axis-aligned bounding box in window coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Self {
        Self {
            min: top_left,
            max: top_left + size,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Whether `point` lies inside (min-inclusive, max-exclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Overlap of two boxes, `None` unless it has positive area.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min.x < max.x && min.y < max.y).then_some(Aabb { min, max })
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.intersection(other).is_some()
    }
}

/// Filled rectangle positioned by its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectShape {
    pub position: Vec2,
    pub size: Vec2,
    pub color: Color,
}

impl RectShape {
    pub fn new(position: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            position,
            size,
            color,
        }
    }

    /// Build from a top-left corner instead of a centre.
    pub fn from_top_left(top_left: Vec2, size: Vec2, color: Color) -> Self {
        Self::new(top_left + size / 2.0, size, color)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position, self.size)
    }

    pub fn half_width(&self) -> f32 {
        self.size.x / 2.0
    }

    pub fn top(&self) -> f32 {
        self.position.y - self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y / 2.0
    }
}

/// Filled circle positioned by its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl CircleShape {
    pub fn new(center: Vec2, radius: f32, color: Color) -> Self {
        Self {
            center,
            radius,
            color,
        }
    }

    /// The bounding square, used for paddle and brick intersection tests.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.center, Vec2::splat(self.radius * 2.0))
    }
}

// ---------------------------------------------------------------------------
// Gameplay components
// ---------------------------------------------------------------------------

/// The player's paddle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub shape: RectShape,
}

/// The ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub shape: CircleShape,
}

/// A brick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub shape: RectShape,
}

/// Velocity in px/s.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

/// Speed magnitude in px/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementSpeed(pub f32);

/// Keeps an entity inside the window horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfineToWindow {
    pub pad_left: f32,
    pub pad_right: f32,
}

impl Default for ConfineToWindow {
    fn default() -> Self {
        Self {
            pad_left: 1.0,
            pad_right: 1.0,
        }
    }
}

/// Brick variant. Selects the config section its score, health and colour
/// are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrickType {
    Normal,
    Strong,
    Gold,
    Custom1,
    Custom2,
}

impl BrickType {
    /// Section name in the `Bricks` config table.
    pub fn section(self) -> &'static str {
        match self {
            BrickType::Normal => "normal",
            BrickType::Strong => "strong",
            BrickType::Gold => "gold",
            BrickType::Custom1 => "custom_1",
            BrickType::Custom2 => "custom_2",
        }
    }

    /// Map a level-grid character to a brick type. `None` means an empty
    /// cell; unknown letters become Normal bricks.
    pub fn from_grid_char(c: char) -> Option<BrickType> {
        match c {
            '.' | ' ' => None,
            'N' => Some(BrickType::Normal),
            'S' => Some(BrickType::Strong),
            'G' => Some(BrickType::Gold),
            'X' => Some(BrickType::Custom1),
            'Y' => Some(BrickType::Custom2),
            _ => Some(BrickType::Normal),
        }
    }

    pub fn default_score(self) -> u32 {
        match self {
            BrickType::Normal => 5,
            BrickType::Strong => 10,
            BrickType::Gold => 20,
            BrickType::Custom1 | BrickType::Custom2 => 0,
        }
    }

    pub fn default_health(self) -> u32 {
        match self {
            BrickType::Normal | BrickType::Gold => 1,
            BrickType::Strong => 2,
            BrickType::Custom1 | BrickType::Custom2 => 0,
        }
    }

    /// Colour shown after a non-destroying hit, if this type has one.
    pub fn damaged_color(self) -> Option<Color> {
        match self {
            BrickType::Strong => Some(palette::STRONG_DAMAGED),
            _ => None,
        }
    }

    /// Sound played when a brick of this type is destroyed.
    pub fn break_sound(self) -> &'static str {
        match self {
            BrickType::Strong => sounds::STRONG_BRICK_BREAK,
            BrickType::Gold => sounds::GOLD_BRICK_BREAK,
            _ => sounds::NORM_BRICK_BREAK,
        }
    }
}

/// Points awarded when the brick is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickScore(pub u32);

/// Remaining and maximum hits. `current` stays in `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickHealth {
    pub current: u32,
    pub max: u32,
}

impl BrickHealth {
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }
}

/// Running score held by the HUD score entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrentScore(pub u32);

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

macro_rules! tags {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
            pub struct $name;
        )+
    };
}

tags!(
    PaddleTag,
    BallTag,
    BrickTag,
    /// Gameplay entities drawn by the game renderer; torn down with Play.
    RenderableTag,
    HudTag,
    ScoreHudTag,
    MenuUiTag,
    SettingsUiTag,
    PauseUiTag,
    TransitionUiTag,
    GuiButtonTag,
    /// Mouse is currently over the entity's bounds.
    Hovered,
);

// ---------------------------------------------------------------------------
// UI components
// ---------------------------------------------------------------------------

/// Background rectangle of a text button.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiShape {
    pub shape: RectShape,
    pub hover_color: Option<Color>,
}

/// Where a text's position sits relative to the text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    #[default]
    Center,
    /// Position is the middle of the right edge; used for labels left of a
    /// button.
    RightCenter,
}

/// A line of text drawn with a named font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiText {
    pub text: String,
    pub font: String,
    pub size: u32,
    pub color: Color,
    pub hover_color: Option<Color>,
    pub position: Vec2,
    pub anchor: TextAnchor,
}

/// A textured quad positioned by its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiSprite {
    pub texture: String,
    pub top_left: Vec2,
    pub size: Vec2,
}

/// Clickable / hoverable area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiBounds(pub Aabb);

/// Button roles. The state that owns a button decides what each one does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonAction {
    Play,
    OpenSettings,
    Back,
    ToggleMusicMute,
    ToggleSfxMute,
    Resume,
    TryAgain,
    NextLevel,
    Restart,
    MainMenu,
    Quit,
}

/// The action fired when the entity is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiAction(pub ButtonAction);

/// Settings flag a toggle button reflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleCondition {
    MusicMuted,
    SfxMuted,
}

impl ToggleCondition {
    pub fn is_on(self, settings: &AppSettings) -> bool {
        match self {
            ToggleCondition::MusicMuted => settings.music_muted,
            ToggleCondition::SfxMuted => settings.sfx_muted,
        }
    }
}

/// Toggle button state; `active` is refreshed from settings every frame and
/// drives the check marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiToggle {
    pub condition: ToggleCondition,
    pub active: bool,
}

impl UiToggle {
    pub fn new(condition: ToggleCondition) -> Self {
        Self {
            condition,
            active: false,
        }
    }
}

impl_component!(
    Paddle,
    Ball,
    Brick,
    Velocity,
    MovementSpeed,
    ConfineToWindow,
    BrickType,
    BrickScore,
    BrickHealth,
    CurrentScore,
    PaddleTag,
    BallTag,
    BrickTag,
    RenderableTag,
    HudTag,
    ScoreHudTag,
    MenuUiTag,
    SettingsUiTag,
    PauseUiTag,
    TransitionUiTag,
    GuiButtonTag,
    Hovered,
    UiShape,
    UiText,
    GuiSprite,
    UiBounds,
    UiAction,
    UiToggle,
);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
