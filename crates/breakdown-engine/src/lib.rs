//! Breakdown Engine -- Breakout simulation core on top of [`breakdown_ecs`].
//!
//! The crate holds everything between the entity store and a host window:
//!
//! - [`factory`] builds the paddle, ball, bricks, HUD and UI widgets from
//!   the config tables.
//! - [`systems`] run the per-frame pipeline (input, movement, collision,
//!   descent) and the render / UI passes.
//! - [`state`] is the screen state machine (menu, settings, play, pause,
//!   transition).
//! - [`tick`] drives it all at a fixed timestep.
//!
//! Windowing, audio and rendering are reached only through the
//! [`InputSource`](input::InputSource), [`AudioSink`](audio::AudioSink) and
//! [`RenderTarget`](render::RenderTarget) traits. Headless implementations of
//! each ship with the crate.
//!
//! # Quick Start
//!
//! ```
//! use breakdown_engine::prelude::*;
//!
//! let input = HeadlessInput::default();
//! let ctx = AppContext::new(
//!     ConfigManager::new(),
//!     ResourceManager::with_default_assets("assets"),
//!     Box::new(NullAudio::default()),
//!     Box::new(input.clone()),
//! );
//! let mut game = GameLoop::new(ctx, TickConfig::default(), DrawList::new(), StateId::Play);
//!
//! input.hold(Key::Space);
//! game.run_frames(2);
//! assert!(game.context().data.level_started);
//! ```

#![deny(unsafe_code)]

pub mod assets;
pub mod audio;
pub mod components;
pub mod config;
pub mod context;
pub mod factory;
pub mod input;
pub mod render;
pub mod resources;
pub mod state;
pub mod systems;
pub mod tick;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the ECS crate for convenience.
pub use breakdown_ecs;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use breakdown_ecs::prelude::*;

    pub use crate::assets::{configs, fonts, music, sounds, textures};
    pub use crate::audio::{AudioEvent, AudioSink, MusicStatus, NullAudio, RecordingAudio, SoundHandle};
    pub use crate::components::*;
    pub use crate::config::{ConfigError, ConfigManager};
    pub use crate::context::{AppContext, AppData, AppSettings};
    pub use crate::input::{HeadlessInput, InputEvent, InputSource, Key, MouseButton};
    pub use crate::render::{DrawCommand, DrawList, RenderTarget};
    pub use crate::resources::ResourceManager;
    pub use crate::state::{GameState, StateId, StateManager, StateRequest, TransitionKind};
    pub use crate::systems::FrameOutcome;
    pub use crate::tick::{FrameDiagnostics, GameLoop, TickConfig};
}
