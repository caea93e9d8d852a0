//! Resource registry: fonts, textures, sounds and music by key.
//!
//! The registry only records what a host has made available. Decoding and
//! GPU upload live with the host; the simulation only needs to know whether
//! a resource exists and, for textures, how big it is.

use std::collections::HashMap;
use std::path::PathBuf;

use glam::Vec2;

use crate::assets::{fonts, music, sounds, textures};

#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    pub path: PathBuf,
    /// Size in pixels.
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundInfo {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MusicInfo {
    pub path: PathBuf,
}

/// Registry of loaded resources.
#[derive(Debug, Default)]
pub struct ResourceManager {
    fonts: HashMap<String, FontInfo>,
    textures: HashMap<String, TextureInfo>,
    sounds: HashMap<String, SoundInfo>,
    music: HashMap<String, MusicInfo>,
}

impl ResourceManager {
    /// An empty registry: every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every canonical key with files under `root`, the way the
    /// shipped asset directory is laid out. Textures are 64x64.
    pub fn with_default_assets(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut resources = Self::new();
        resources.insert_font(fonts::MAIN_FONT, FontInfo { path: root.join("fonts/main.ttf") });
        resources.insert_font(fonts::SCORE_FONT, FontInfo { path: root.join("fonts/score.ttf") });
        for key in textures::ALL {
            resources.insert_texture(
                key,
                TextureInfo {
                    path: root.join(format!("textures/{key}.png")),
                    size: Vec2::splat(64.0),
                },
            );
        }
        for key in sounds::ALL {
            resources.insert_sound(key, SoundInfo { path: root.join(format!("sounds/{key}.wav")) });
        }
        resources.insert_music(
            music::MAIN_SONG,
            MusicInfo {
                path: root.join("music/main_song.ogg"),
            },
        );
        resources
    }

    pub fn insert_font(&mut self, key: &str, info: FontInfo) {
        self.fonts.insert(key.to_owned(), info);
    }

    pub fn insert_texture(&mut self, key: &str, info: TextureInfo) {
        self.textures.insert(key.to_owned(), info);
    }

    pub fn insert_sound(&mut self, key: &str, info: SoundInfo) {
        self.sounds.insert(key.to_owned(), info);
    }

    pub fn insert_music(&mut self, key: &str, info: MusicInfo) {
        self.music.insert(key.to_owned(), info);
    }

    pub fn font(&self, key: &str) -> Option<&FontInfo> {
        self.fonts.get(key)
    }

    pub fn texture(&self, key: &str) -> Option<&TextureInfo> {
        self.textures.get(key)
    }

    pub fn sound(&self, key: &str) -> Option<&SoundInfo> {
        self.sounds.get(key)
    }

    pub fn music(&self, key: &str) -> Option<&MusicInfo> {
        self.music.get(key)
    }

    /// Look up a font, logging an error naming `feature` when it is missing.
    pub fn require_font(&self, key: &str, feature: &str) -> Option<&FontInfo> {
        let font = self.font(key);
        if font.is_none() {
            tracing::error!(key, feature, "font missing, skipping");
        }
        font
    }

    /// Look up a texture, logging an error naming `feature` when it is missing.
    pub fn require_texture(&self, key: &str, feature: &str) -> Option<&TextureInfo> {
        let texture = self.texture(key);
        if texture.is_none() {
            tracing::error!(key, feature, "texture missing, skipping");
        }
        texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_assets_cover_every_key() {
        let resources = ResourceManager::with_default_assets("assets");
        assert!(resources.font(fonts::MAIN_FONT).is_some());
        assert!(resources.font(fonts::SCORE_FONT).is_some());
        for key in textures::ALL {
            assert_eq!(resources.texture(key).unwrap().size, Vec2::splat(64.0));
        }
        for key in sounds::ALL {
            assert!(resources.sound(key).is_some());
        }
        assert!(resources.music(music::MAIN_SONG).is_some());
    }

    #[test]
    fn empty_registry_misses() {
        let resources = ResourceManager::new();
        assert!(resources.require_font(fonts::MAIN_FONT, "title").is_none());
        assert!(resources.require_texture(textures::BUTTON_RED_X, "toggle").is_none());
    }
}
