//! The application context shared by every system and state.
//!
//! There is no global registry: the [`AppContext`] owns the entity store and
//! the collaborators, and is passed by `&mut` to whatever runs this frame.

use breakdown_ecs::world::World;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::configs;
use crate::audio::{AudioSink, NullAudio, SoundHandle};
use crate::config::ConfigManager;
use crate::factory;
use crate::input::{HeadlessInput, InputSource};
use crate::resources::ResourceManager;

// ---------------------------------------------------------------------------
// AppSettings
// ---------------------------------------------------------------------------

/// User-facing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub music_muted: bool,
    pub sfx_muted: bool,
    /// 0..=100.
    pub music_volume: f32,
    /// 0..=100.
    pub sfx_volume: f32,
    /// Logical window width in px.
    pub target_width: f32,
    /// Logical window height in px.
    pub target_height: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            music_muted: false,
            sfx_muted: false,
            music_volume: 100.0,
            sfx_volume: 100.0,
            target_width: 1280.0,
            target_height: 720.0,
        }
    }
}

impl AppSettings {
    /// Read the target resolution from the `WindowConfig` table's
    /// `[window]` section.
    pub fn from_config(config: &ConfigManager) -> Self {
        let defaults = Self::default();
        Self {
            target_width: config.value_or(configs::WINDOW, "window", "targetWidth", defaults.target_width),
            target_height: config.value_or(configs::WINDOW, "window", "targetHeight", defaults.target_height),
            ..defaults
        }
    }

    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.target_width, self.target_height)
    }

    pub fn window_center(&self) -> Vec2 {
        self.window_size() / 2.0
    }

    pub fn toggle_music_mute(&mut self) {
        self.music_muted = !self.music_muted;
        tracing::info!(muted = self.music_muted, "music mute toggled");
    }

    pub fn toggle_sfx_mute(&mut self) {
        self.sfx_muted = !self.sfx_muted;
        tracing::info!(muted = self.sfx_muted, "sfx mute toggled");
    }
}

// ---------------------------------------------------------------------------
// AppData
// ---------------------------------------------------------------------------

/// Progress through the game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppData {
    /// Set by the launch key; gates ball and brick motion.
    pub level_started: bool,
    /// 1-based.
    pub level_number: u32,
    pub total_levels: u32,
    /// Sound instances kept until playback ends.
    #[serde(skip)]
    pub active_sounds: Vec<SoundHandle>,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            level_started: false,
            level_number: 1,
            total_levels: 1,
            active_sounds: Vec::new(),
        }
    }
}

impl AppData {
    /// Back to level 1, not started. `total_levels` is kept.
    pub fn reset(&mut self) {
        self.level_started = false;
        self.level_number = 1;
        self.active_sounds.clear();
    }

    pub fn is_last_level(&self) -> bool {
        self.level_number >= self.total_levels
    }
}

// ---------------------------------------------------------------------------
// AppContext
// ---------------------------------------------------------------------------

/// Everything a system or state may touch.
pub struct AppContext {
    pub world: World,
    pub config: ConfigManager,
    pub resources: ResourceManager,
    pub settings: AppSettings,
    pub data: AppData,
    pub audio: Box<dyn AudioSink>,
    pub input: Box<dyn InputSource>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("world", &self.world)
            .field("settings", &self.settings)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build a context, reading window settings and counting levels from
    /// `config`.
    pub fn new(
        mut config: ConfigManager,
        resources: ResourceManager,
        audio: Box<dyn AudioSink>,
        input: Box<dyn InputSource>,
    ) -> Self {
        config.ensure_loaded(configs::WINDOW);
        config.ensure_loaded(configs::LEVELS);
        let settings = AppSettings::from_config(&config);
        let data = AppData {
            total_levels: factory::count_levels(&config),
            ..AppData::default()
        };
        tracing::info!(total_levels = data.total_levels, "context initialised");
        Self {
            world: World::new(),
            config,
            resources,
            settings,
            data,
            audio,
            input,
        }
    }

    /// In-memory context with no resources, silent audio and idle input.
    pub fn headless(config: ConfigManager) -> Self {
        Self::new(
            config,
            ResourceManager::new(),
            Box::new(NullAudio::default()),
            Box::new(HeadlessInput::default()),
        )
    }

    /// Play a sound effect, honouring the mute flag and volume.
    ///
    /// Finished instances are culled from the active list first.
    pub fn play_sound(&mut self, key: &str) {
        if self.settings.sfx_muted {
            return;
        }
        if self.resources.sound(key).is_none() {
            tracing::debug!(key, "sound missing, not playing");
            return;
        }
        let audio = &self.audio;
        self.data
            .active_sounds
            .retain(|handle| audio.is_sound_playing(*handle));
        let handle = self.audio.play_sound(key, self.settings.sfx_volume);
        self.data.active_sounds.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::sounds;
    use crate::audio::RecordingAudio;

    fn context_with(audio: RecordingAudio) -> AppContext {
        AppContext::new(
            ConfigManager::new(),
            ResourceManager::with_default_assets("assets"),
            Box::new(audio),
            Box::new(HeadlessInput::default()),
        )
    }

    #[test]
    fn settings_read_window_size() {
        let mut config = ConfigManager::new();
        config
            .load_config_str(configs::WINDOW, "[window]\ntargetWidth = 800\ntargetHeight = 600\n")
            .unwrap();
        let settings = AppSettings::from_config(&config);
        assert_eq!(settings.window_size(), Vec2::new(800.0, 600.0));
        assert_eq!(AppSettings::from_config(&ConfigManager::new()).target_width, 1280.0);
    }

    #[test]
    fn finished_sounds_are_culled_on_play() {
        let probe = RecordingAudio::new();
        let mut ctx = context_with(probe.clone());

        ctx.play_sound(sounds::WALL_HIT);
        ctx.play_sound(sounds::PADDLE_HIT);
        assert_eq!(ctx.data.active_sounds.len(), 2);

        probe.finish_sounds();
        ctx.play_sound(sounds::BRICK_HIT);
        assert_eq!(ctx.data.active_sounds.len(), 1);
    }

    #[test]
    fn muted_sfx_plays_nothing() {
        let probe = RecordingAudio::new();
        let mut ctx = context_with(probe.clone());
        ctx.settings.sfx_muted = true;
        ctx.play_sound(sounds::WALL_HIT);
        assert!(probe.sounds_played().is_empty());
    }

    #[test]
    fn missing_sound_is_skipped() {
        let mut ctx = AppContext::headless(ConfigManager::new());
        ctx.play_sound(sounds::WALL_HIT);
        assert!(ctx.data.active_sounds.is_empty());
    }

    #[test]
    fn reset_keeps_total_levels() {
        let mut data = AppData {
            level_started: true,
            level_number: 3,
            total_levels: 4,
            active_sounds: vec![SoundHandle(1)],
        };
        data.reset();
        assert_eq!(data.level_number, 1);
        assert!(!data.level_started);
        assert_eq!(data.total_levels, 4);
        assert!(data.active_sounds.is_empty());
    }
}
