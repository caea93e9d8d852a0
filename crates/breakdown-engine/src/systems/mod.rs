//! Per-frame systems.
//!
//! During Play the systems run in a fixed order each frame:
//!
//! 1. [`input`]: held keys to paddle velocity, launch key to ball velocity.
//! 2. [`movement`]: `position += velocity * dt`.
//! 3. [`collision`]: walls, paddle, bricks, scoring, win/loss detection.
//! 4. [`descent`]: bricks drift down once the level has started.
//!
//! [`render`] and [`ui`] run outside that pipeline, driven by whichever
//! state is active.

pub mod collision;
pub mod descent;
pub mod input;
pub mod movement;
pub mod render;
pub mod ui;

pub use collision::collision_system;
pub use descent::descent_system;
pub use input::handle_player_input;
pub use movement::movement_system;

/// What the collision pass decided about the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Keep playing.
    Continue,
    /// Ball reached the bottom, or a descending brick reached the paddle or
    /// the bottom.
    LevelLost,
    /// Last brick destroyed and another level follows.
    LevelWon,
    /// Last brick of the last level destroyed.
    GameComplete,
}
