//! Game state machine.
//!
//! The set of screens is closed, so [`GameState`] is an enum and every hook
//! is a single `match`. States never switch themselves: handlers return a
//! [`StateRequest`] which the [`StateManager`] applies once the handler has
//! returned, so no state is ever torn down while one of its own methods is
//! still running.
//!
//! Each state owns the entities carrying its tag and destroys them in
//! [`GameState::exit`]. Pushing keeps the state below alive (Pause over
//! Play); replacing exits the old state before entering the new one.

mod menu;
mod pause;
mod play;
mod settings;
mod transition;

pub use menu::MenuState;
pub use pause::PauseState;
pub use play::PlayState;
pub use settings::SettingsState;
pub use transition::TransitionState;

use glam::Vec2;

use crate::assets::music;
use crate::audio::MusicStatus;
use crate::context::AppContext;
use crate::input::{InputEvent, Key, MouseButton};
use crate::render::RenderTarget;

// ---------------------------------------------------------------------------
// Identifiers and requests
// ---------------------------------------------------------------------------

/// Why the Transition screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    LevelLoss,
    LevelWin,
    GameWin,
}

/// Which state to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    Menu,
    /// `from_pause` makes Back pop to the paused game instead of returning
    /// to the menu.
    Settings { from_pause: bool },
    Play,
    Pause,
    Transition(TransitionKind),
}

/// A change to the state stack, applied after the requesting handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRequest {
    Push(StateId),
    Pop,
    Replace(StateId),
    Quit,
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// One screen on the stack.
#[derive(Debug)]
pub enum GameState {
    Menu(MenuState),
    Settings(SettingsState),
    Play(PlayState),
    Pause(PauseState),
    Transition(TransitionState),
}

impl GameState {
    /// Construct the state named by `id`, creating its entities.
    pub fn enter(id: StateId, ctx: &mut AppContext) -> Self {
        tracing::info!(state = ?id, "entering state");
        match id {
            StateId::Menu => GameState::Menu(MenuState::enter(ctx)),
            StateId::Settings { from_pause } => GameState::Settings(SettingsState::enter(ctx, from_pause)),
            StateId::Play => GameState::Play(PlayState::enter(ctx)),
            StateId::Pause => GameState::Pause(PauseState::enter(ctx)),
            StateId::Transition(kind) => GameState::Transition(TransitionState::enter(ctx, kind)),
        }
    }

    pub fn id(&self) -> StateId {
        match self {
            GameState::Menu(_) => StateId::Menu,
            GameState::Settings(s) => StateId::Settings {
                from_pause: s.from_pause(),
            },
            GameState::Play(_) => StateId::Play,
            GameState::Pause(_) => StateId::Pause,
            GameState::Transition(t) => StateId::Transition(t.kind()),
        }
    }

    /// Destroy the state's entities and release what it holds.
    pub fn exit(&mut self, ctx: &mut AppContext) {
        tracing::info!(state = ?self.id(), "exiting state");
        match self {
            GameState::Menu(s) => s.exit(ctx),
            GameState::Settings(s) => s.exit(ctx),
            GameState::Play(s) => s.exit(ctx),
            GameState::Pause(s) => s.exit(ctx),
            GameState::Transition(s) => s.exit(ctx),
        }
    }

    pub fn update(&mut self, ctx: &mut AppContext, dt: f32) -> Option<StateRequest> {
        match self {
            GameState::Menu(s) => s.update(ctx),
            GameState::Settings(s) => s.update(ctx),
            GameState::Play(s) => s.update(ctx, dt),
            GameState::Pause(s) => s.update(ctx),
            GameState::Transition(s) => s.update(ctx),
        }
    }

    /// Overlays draw on top of the state below instead of replacing it.
    pub fn is_overlay(&self) -> bool {
        matches!(self, GameState::Pause(_))
    }

    pub fn render(&self, ctx: &AppContext, target: &mut dyn RenderTarget) {
        match self {
            GameState::Menu(s) => s.render(ctx, target),
            GameState::Settings(s) => s.render(ctx, target),
            GameState::Play(s) => s.render(ctx, target),
            GameState::Pause(s) => s.render(ctx, target),
            GameState::Transition(s) => s.render(ctx, target),
        }
    }

    pub fn on_key_press(&mut self, ctx: &mut AppContext, key: Key) -> Option<StateRequest> {
        match self {
            GameState::Play(s) => s.on_key_press(ctx, key),
            GameState::Pause(s) => s.on_key_press(ctx, key),
            GameState::Menu(_) | GameState::Settings(_) | GameState::Transition(_) => None,
        }
    }

    pub fn on_mouse_press(
        &mut self,
        ctx: &mut AppContext,
        button: MouseButton,
        position: Vec2,
    ) -> Option<StateRequest> {
        match self {
            GameState::Menu(s) => s.on_mouse_press(ctx, button, position),
            GameState::Settings(s) => s.on_mouse_press(ctx, button, position),
            GameState::Pause(s) => s.on_mouse_press(ctx, button, position),
            GameState::Transition(s) => s.on_mouse_press(ctx, button, position),
            GameState::Play(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// StateManager
// ---------------------------------------------------------------------------

/// The state stack. Only the top state receives updates and events. Render
/// also draws whatever an overlay on top sits over, so Pause shows the
/// frozen game.
#[derive(Debug, Default)]
pub struct StateManager {
    stack: Vec<GameState>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Id of the top state.
    pub fn active_kind(&self) -> Option<StateId> {
        self.stack.last().map(GameState::id)
    }

    pub fn active(&self) -> Option<&GameState> {
        self.stack.last()
    }

    /// Enter `id` on top of the current state, which is suspended.
    pub fn push(&mut self, id: StateId, ctx: &mut AppContext) {
        let state = GameState::enter(id, ctx);
        self.stack.push(state);
    }

    /// Exit the top state, resuming the one below. Returns false if the
    /// stack was empty.
    pub fn pop(&mut self, ctx: &mut AppContext) -> bool {
        match self.stack.pop() {
            Some(mut state) => {
                state.exit(ctx);
                true
            }
            None => {
                tracing::warn!("pop on an empty state stack");
                false
            }
        }
    }

    /// Exit the top state, then enter `id` in its place.
    pub fn replace(&mut self, id: StateId, ctx: &mut AppContext) {
        if let Some(mut old) = self.stack.pop() {
            old.exit(ctx);
        }
        self.push(id, ctx);
    }

    /// Exit every state, top first.
    pub fn clear(&mut self, ctx: &mut AppContext) {
        while let Some(mut state) = self.stack.pop() {
            state.exit(ctx);
        }
    }

    pub fn apply(&mut self, request: StateRequest, ctx: &mut AppContext) {
        tracing::debug!(?request, "state request");
        match request {
            StateRequest::Push(id) => self.push(id, ctx),
            StateRequest::Pop => {
                self.pop(ctx);
            }
            StateRequest::Replace(id) => self.replace(id, ctx),
            StateRequest::Quit => ctx.input.close(),
        }
    }

    /// Update the top state and apply whatever it requests.
    pub fn update(&mut self, ctx: &mut AppContext, dt: f32) {
        let request = self.stack.last_mut().and_then(|s| s.update(ctx, dt));
        if let Some(request) = request {
            self.apply(request, ctx);
        }
    }

    pub fn render(&self, ctx: &AppContext, target: &mut dyn RenderTarget) {
        let overlays = self.stack.iter().rev().take_while(|s| s.is_overlay()).count();
        let base = self.stack.len().saturating_sub(overlays + 1);
        for state in &self.stack[base..] {
            state.render(ctx, target);
        }
    }

    /// Dispatch one window event: global bindings first, then the top state.
    pub fn handle_event(&mut self, ctx: &mut AppContext, event: InputEvent) {
        let request = match event {
            InputEvent::Closed | InputEvent::KeyPressed(Key::Escape) => Some(StateRequest::Quit),
            InputEvent::KeyPressed(Key::M) => {
                toggle_music(ctx);
                None
            }
            InputEvent::KeyPressed(key) => self.stack.last_mut().and_then(|s| s.on_key_press(ctx, key)),
            InputEvent::MousePressed { button, position } => self
                .stack
                .last_mut()
                .and_then(|s| s.on_mouse_press(ctx, button, position)),
        };
        if let Some(request) = request {
            self.apply(request, ctx);
        }
    }
}

// ---------------------------------------------------------------------------
// Music helpers
// ---------------------------------------------------------------------------

pub(crate) fn music_playing(ctx: &AppContext) -> bool {
    ctx.audio.music_status(music::MAIN_SONG) == MusicStatus::Playing
}

/// Pause and mute if playing, otherwise (re)start and unmute.
fn toggle_music(ctx: &mut AppContext) {
    if music_playing(ctx) {
        ctx.audio.pause_music(music::MAIN_SONG);
        ctx.settings.music_muted = true;
    } else if ctx.resources.music(music::MAIN_SONG).is_some() {
        ctx.audio.play_music(music::MAIN_SONG, true);
        ctx.settings.music_muted = false;
    } else {
        return;
    }
    tracing::info!(muted = ctx.settings.music_muted, "music toggled");
}

/// Start the main song unless muted or missing.
pub(crate) fn start_music(ctx: &mut AppContext) {
    if ctx.settings.music_muted {
        return;
    }
    if ctx.resources.music(music::MAIN_SONG).is_none() {
        tracing::debug!("main song missing, playing in silence");
        return;
    }
    ctx.audio.play_music(music::MAIN_SONG, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioEvent, RecordingAudio};
    use crate::config::ConfigManager;
    use crate::input::HeadlessInput;
    use crate::render::{DrawCommand, DrawList};
    use crate::resources::ResourceManager;

    fn ctx(audio: RecordingAudio) -> AppContext {
        AppContext::new(
            ConfigManager::new(),
            ResourceManager::with_default_assets("assets"),
            Box::new(audio),
            Box::new(HeadlessInput::default()),
        )
    }

    #[test]
    fn replace_exits_before_entering() {
        let mut ctx = ctx(RecordingAudio::new());
        let mut states = StateManager::new();
        states.push(StateId::Menu, &mut ctx);
        let menu_entities = ctx.world.entity_count();
        assert!(menu_entities > 0);

        states.replace(StateId::Settings { from_pause: false }, &mut ctx);
        assert_eq!(states.depth(), 1);
        assert_eq!(states.active_kind(), Some(StateId::Settings { from_pause: false }));
        assert!(ctx.world.view::<crate::components::MenuUiTag>().is_empty());
    }

    #[test]
    fn pause_draws_over_the_frozen_game() {
        let mut ctx = ctx(RecordingAudio::new());
        let mut states = StateManager::new();
        states.push(StateId::Play, &mut ctx);
        states.push(StateId::Pause, &mut ctx);

        let mut list = DrawList::new();
        states.render(&ctx, &mut list);
        assert_eq!(list.texts(), vec!["Score: 0", "Paused", "Resume", "Settings"]);
        let first_text = list
            .commands()
            .iter()
            .position(|c| matches!(c, DrawCommand::Text { .. }));
        assert!(first_text.is_some_and(|i| i > 0), "game shapes come before the overlay");

        // Settings is opaque even when opened from Pause.
        states.push(StateId::Settings { from_pause: true }, &mut ctx);
        let mut list = DrawList::new();
        states.render(&ctx, &mut list);
        assert!(!list.texts().contains(&"Paused"));
        assert!(!list.texts().contains(&"Score: 0"));
    }

    #[test]
    fn escape_and_close_quit() {
        let input = HeadlessInput::default();
        let mut ctx = AppContext::new(
            ConfigManager::new(),
            ResourceManager::new(),
            Box::new(RecordingAudio::new()),
            Box::new(input.clone()),
        );
        let mut states = StateManager::new();
        states.push(StateId::Menu, &mut ctx);
        states.handle_event(&mut ctx, InputEvent::KeyPressed(Key::Escape));
        assert!(!ctx.input.is_open());
        // The stack itself is left alone; the loop stops on the closed window.
        assert_eq!(states.depth(), 1);
    }

    #[test]
    fn m_toggles_music_and_mute_flag() {
        let audio = RecordingAudio::new();
        let mut ctx = ctx(audio.clone());
        let mut states = StateManager::new();
        states.push(StateId::Menu, &mut ctx);

        states.handle_event(&mut ctx, InputEvent::KeyPressed(Key::M));
        assert!(music_playing(&ctx));
        assert!(!ctx.settings.music_muted);

        states.handle_event(&mut ctx, InputEvent::KeyPressed(Key::M));
        assert!(!music_playing(&ctx));
        assert!(ctx.settings.music_muted);
        assert!(audio
            .events()
            .contains(&AudioEvent::MusicPause { key: music::MAIN_SONG.to_owned() }));
    }

    #[test]
    fn pop_on_empty_stack_is_harmless() {
        let mut ctx = ctx(RecordingAudio::new());
        let mut states = StateManager::new();
        assert!(!states.pop(&mut ctx));
        states.apply(StateRequest::Replace(StateId::Menu), &mut ctx);
        assert_eq!(states.depth(), 1);
        states.clear(&mut ctx);
        assert!(states.is_empty());
        assert_eq!(ctx.world.entity_count(), 0);
    }
}
