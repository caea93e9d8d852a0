//! Renderer-facing interface.
//!
//! Render systems never talk to a graphics API. They emit [`DrawCommand`]s
//! into a [`RenderTarget`] in z-order (first drawn is bottom-most); a host
//! backend rasterises them, and [`DrawList`] simply records them for tests
//! and headless runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{Aabb, Color, TextAnchor};

// ---------------------------------------------------------------------------
// DrawCommand
// ---------------------------------------------------------------------------

/// One primitive to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Filled rectangle positioned by its centre.
    Rect { center: Vec2, size: Vec2, color: Color },
    /// Filled circle.
    Circle { center: Vec2, radius: f32, color: Color },
    /// Unfilled rectangle, used by the debug overlay.
    Outline { bounds: Aabb, color: Color },
    /// Textured quad positioned by its top-left corner.
    Sprite { texture: String, top_left: Vec2, size: Vec2 },
    Text {
        text: String,
        font: String,
        size: u32,
        position: Vec2,
        anchor: TextAnchor,
        color: Color,
    },
}

/// Something that accepts draw commands for one frame at a time.
pub trait RenderTarget {
    /// Start a new frame, discarding the previous one.
    fn clear(&mut self);

    fn draw(&mut self, command: DrawCommand);
}

// ---------------------------------------------------------------------------
// DrawList
// ---------------------------------------------------------------------------

/// Records the commands of the most recent frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every text string drawn this frame, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of debug outlines drawn this frame.
    pub fn outline_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Outline { .. }))
            .count()
    }
}

impl RenderTarget for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
