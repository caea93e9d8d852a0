//! Fixed-timestep frame loop.
//!
//! The [`GameLoop`] drives the game one frame at a time. Each frame:
//!
//! 1. Pending window events are drained and dispatched: global bindings
//!    first, then the active state. A quit stops the frame early.
//! 2. The active state updates with the fixed `dt`.
//! 3. Unless headless, the render target is cleared and the active state
//!    draws into it.
//! 4. The frame counter advances.
//!
//! # Example
//!
//! ```
//! use breakdown_engine::prelude::*;
//!
//! let ctx = AppContext::headless(ConfigManager::new());
//! let mut game = GameLoop::new(ctx, TickConfig::default(), DrawList::new(), StateId::Menu);
//!
//! game.run_frames(10);
//! assert_eq!(game.frame_count(), 10);
//! assert_eq!(game.states().active_kind(), Some(StateId::Menu));
//! ```

use std::time::{Duration, Instant};

use crate::context::AppContext;
use crate::render::RenderTarget;
use crate::state::{StateId, StateManager};

// ---------------------------------------------------------------------------
// TickConfig
// ---------------------------------------------------------------------------

/// Configuration for the frame loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Fixed time step in seconds per frame. Must be positive and finite.
    pub fixed_dt: f32,
    /// Headless mode: update only, never render.
    pub headless: bool,
}

impl Default for TickConfig {
    /// 60 Hz, rendering on.
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            headless: false,
        }
    }
}

// ---------------------------------------------------------------------------
// FrameDiagnostics
// ---------------------------------------------------------------------------

/// Timing for the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameDiagnostics {
    pub update_time: Duration,
    pub render_time: Duration,
    /// Window events dispatched this frame.
    pub events_processed: usize,
}

// ---------------------------------------------------------------------------
// GameLoop
// ---------------------------------------------------------------------------

/// Owns the context, the state stack and the render target.
pub struct GameLoop<R: RenderTarget> {
    ctx: AppContext,
    states: StateManager,
    target: R,
    config: TickConfig,
    frame_counter: u64,
    last_diagnostics: FrameDiagnostics,
}

impl<R: RenderTarget> std::fmt::Debug for GameLoop<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLoop")
            .field("states", &self.states)
            .field("config", &self.config)
            .field("frame_counter", &self.frame_counter)
            .finish_non_exhaustive()
    }
}

impl<R: RenderTarget> GameLoop<R> {
    /// Build the loop and enter `initial`.
    ///
    /// # Panics
    ///
    /// Panics if `config.fixed_dt` is not positive and finite.
    pub fn new(mut ctx: AppContext, config: TickConfig, target: R, initial: StateId) -> Self {
        assert!(
            config.fixed_dt > 0.0 && config.fixed_dt.is_finite(),
            "fixed_dt must be positive and finite, got {}",
            config.fixed_dt
        );
        let mut states = StateManager::new();
        states.push(initial, &mut ctx);
        Self {
            ctx,
            states,
            target,
            config,
            frame_counter: 0,
            last_diagnostics: FrameDiagnostics::default(),
        }
    }

    /// Whether the window is open and some state is active.
    pub fn is_running(&self) -> bool {
        self.ctx.input.is_open() && !self.states.is_empty()
    }

    /// Run one frame. Returns [`is_running`](Self::is_running) afterwards.
    pub fn frame(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        let update_start = Instant::now();
        let mut events_processed = 0;
        while let Some(event) = self.ctx.input.poll_event() {
            events_processed += 1;
            self.states.handle_event(&mut self.ctx, event);
            if !self.is_running() {
                tracing::info!(frame = self.frame_counter, "quit requested");
                self.frame_counter += 1;
                return false;
            }
        }

        self.states.update(&mut self.ctx, self.config.fixed_dt);
        let update_time = update_start.elapsed();

        let render_start = Instant::now();
        if !self.config.headless {
            self.target.clear();
            self.states.render(&self.ctx, &mut self.target);
        }
        let render_time = render_start.elapsed();

        self.frame_counter += 1;
        self.last_diagnostics = FrameDiagnostics {
            update_time,
            render_time,
            events_processed,
        };
        tracing::trace!(frame = self.frame_counter, ?update_time, ?render_time, "frame");
        self.is_running()
    }

    /// Run up to `count` frames, stopping early if the game quits. Returns
    /// the number of frames run.
    pub fn run_frames(&mut self, count: u64) -> u64 {
        let mut ran = 0;
        while ran < count && self.is_running() {
            self.frame();
            ran += 1;
        }
        ran
    }

    /// Run until the window closes or `max_frames` have run.
    pub fn run_until_closed(&mut self, max_frames: u64) -> u64 {
        self.run_frames(max_frames)
    }

    // -- accessors ----------------------------------------------------------

    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    /// Simulated seconds: `frame_count * fixed_dt`.
    pub fn sim_time(&self) -> f64 {
        self.frame_counter as f64 * f64::from(self.config.fixed_dt)
    }

    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_dt
    }

    pub fn is_headless(&self) -> bool {
        self.config.headless
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Mutable access for setup and tests.
    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.ctx
    }

    pub fn states(&self) -> &StateManager {
        &self.states
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn last_diagnostics(&self) -> &FrameDiagnostics {
        &self.last_diagnostics
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use crate::input::{HeadlessInput, InputEvent, Key};
    use crate::audio::NullAudio;
    use crate::render::DrawList;
    use crate::resources::ResourceManager;

    fn game(input: HeadlessInput, config: TickConfig) -> GameLoop<DrawList> {
        let ctx = AppContext::new(
            ConfigManager::new(),
            ResourceManager::with_default_assets("assets"),
            Box::new(NullAudio::default()),
            Box::new(input),
        );
        GameLoop::new(ctx, config, DrawList::new(), StateId::Menu)
    }

    #[test]
    fn new_loop_starts_at_zero() {
        let g = game(HeadlessInput::default(), TickConfig::default());
        assert_eq!(g.frame_count(), 0);
        assert_eq!(g.sim_time(), 0.0);
        assert!(g.is_running());
        assert_eq!(g.states().depth(), 1);
    }

    #[test]
    fn default_config_is_60hz() {
        let config = TickConfig::default();
        assert!((config.fixed_dt - 1.0 / 60.0).abs() < f32::EPSILON);
        assert!(!config.headless);
    }

    #[test]
    #[should_panic(expected = "fixed_dt must be positive")]
    fn zero_dt_panics() {
        game(
            HeadlessInput::default(),
            TickConfig {
                fixed_dt: 0.0,
                ..Default::default()
            },
        );
    }

    #[test]
    #[should_panic(expected = "fixed_dt must be positive")]
    fn nan_dt_panics() {
        game(
            HeadlessInput::default(),
            TickConfig {
                fixed_dt: f32::NAN,
                ..Default::default()
            },
        );
    }

    #[test]
    fn frames_advance_counter_and_time() {
        let mut g = game(
            HeadlessInput::default(),
            TickConfig {
                fixed_dt: 0.5,
                ..Default::default()
            },
        );
        assert_eq!(g.run_frames(4), 4);
        assert_eq!(g.frame_count(), 4);
        assert_eq!(g.sim_time(), 2.0);
    }

    #[test]
    fn rendering_fills_target_unless_headless() {
        let mut g = game(HeadlessInput::default(), TickConfig::default());
        g.frame();
        assert!(g.target().texts().contains(&"Breakdown"));

        let mut h = game(
            HeadlessInput::default(),
            TickConfig {
                headless: true,
                ..Default::default()
            },
        );
        h.frame();
        assert!(h.target().is_empty());
    }

    #[test]
    fn close_event_stops_the_loop() {
        let input = HeadlessInput::default();
        let mut g = game(input.clone(), TickConfig::default());
        input.push_event(InputEvent::KeyPressed(Key::F12));
        input.push_event(InputEvent::Closed);
        assert!(!g.frame());
        assert!(!g.is_running());
        assert_eq!(g.run_frames(5), 0);
    }

    #[test]
    fn diagnostics_count_events() {
        let input = HeadlessInput::default();
        let mut g = game(input.clone(), TickConfig::default());
        input.tap(Key::P);
        input.tap(Key::Space);
        g.frame();
        assert_eq!(g.last_diagnostics().events_processed, 2);
    }
}
