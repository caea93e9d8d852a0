//! Audio playback interface.
//!
//! Sound effects are fire-and-forget: the sink hands back a [`SoundHandle`]
//! which the caller keeps in [`AppData::active_sounds`] until playback ends,
//! and every new play first culls handles that have finished. Music is a
//! single named stream with play / pause / stop and a status query.
//!
//! [`AppData::active_sounds`]: crate::context::AppData::active_sounds

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Handle to one playing sound instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u64);

/// Playback state of a music stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicStatus {
    #[default]
    Stopped,
    Paused,
    Playing,
}

/// Audio backend.
pub trait AudioSink {
    /// Start a sound effect at `volume` (0..=100).
    fn play_sound(&mut self, key: &str, volume: f32) -> SoundHandle;

    fn is_sound_playing(&self, handle: SoundHandle) -> bool;

    /// Start or resume a music stream.
    fn play_music(&mut self, key: &str, looping: bool);

    fn pause_music(&mut self, key: &str);

    fn stop_music(&mut self, key: &str);

    fn music_status(&self, key: &str) -> MusicStatus;
}

// ---------------------------------------------------------------------------
// NullAudio
// ---------------------------------------------------------------------------

/// Discards everything. Sounds finish immediately; music never plays.
#[derive(Debug, Default)]
pub struct NullAudio {
    next_handle: u64,
}

impl AudioSink for NullAudio {
    fn play_sound(&mut self, _key: &str, _volume: f32) -> SoundHandle {
        self.next_handle += 1;
        SoundHandle(self.next_handle)
    }

    fn is_sound_playing(&self, _handle: SoundHandle) -> bool {
        false
    }

    fn play_music(&mut self, _key: &str, _looping: bool) {}

    fn pause_music(&mut self, _key: &str) {}

    fn stop_music(&mut self, _key: &str) {}

    fn music_status(&self, _key: &str) -> MusicStatus {
        MusicStatus::Stopped
    }
}

// ---------------------------------------------------------------------------
// RecordingAudio
// ---------------------------------------------------------------------------

/// One call made on a [`RecordingAudio`].
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    Sound { key: String, volume: f32 },
    MusicPlay { key: String, looping: bool },
    MusicPause { key: String },
    MusicStop { key: String },
}

#[derive(Debug, Default)]
struct Recording {
    events: Vec<AudioEvent>,
    playing: HashSet<SoundHandle>,
    music: HashMap<String, MusicStatus>,
    next_handle: u64,
}

/// Headless sink that records every call and tracks music status.
///
/// Clones share the same recording, so a test can keep one clone while the
/// context owns the other. Sounds stay "playing" until
/// [`finish_sounds`](Self::finish_sounds) is called.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, oldest first.
    pub fn events(&self) -> Vec<AudioEvent> {
        self.inner.borrow().events.clone()
    }

    /// Keys of every sound effect played so far.
    pub fn sounds_played(&self) -> Vec<String> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                AudioEvent::Sound { key, .. } => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of sound instances still playing.
    pub fn playing_count(&self) -> usize {
        self.inner.borrow().playing.len()
    }

    /// Mark every playing sound as finished.
    pub fn finish_sounds(&self) {
        self.inner.borrow_mut().playing.clear();
    }
}

impl AudioSink for RecordingAudio {
    fn play_sound(&mut self, key: &str, volume: f32) -> SoundHandle {
        let mut rec = self.inner.borrow_mut();
        rec.next_handle += 1;
        let handle = SoundHandle(rec.next_handle);
        rec.playing.insert(handle);
        rec.events.push(AudioEvent::Sound {
            key: key.to_owned(),
            volume,
        });
        handle
    }

    fn is_sound_playing(&self, handle: SoundHandle) -> bool {
        self.inner.borrow().playing.contains(&handle)
    }

    fn play_music(&mut self, key: &str, looping: bool) {
        let mut rec = self.inner.borrow_mut();
        rec.music.insert(key.to_owned(), MusicStatus::Playing);
        rec.events.push(AudioEvent::MusicPlay {
            key: key.to_owned(),
            looping,
        });
    }

    fn pause_music(&mut self, key: &str) {
        let mut rec = self.inner.borrow_mut();
        if rec.music.get(key) == Some(&MusicStatus::Playing) {
            rec.music.insert(key.to_owned(), MusicStatus::Paused);
        }
        rec.events.push(AudioEvent::MusicPause { key: key.to_owned() });
    }

    fn stop_music(&mut self, key: &str) {
        let mut rec = self.inner.borrow_mut();
        rec.music.insert(key.to_owned(), MusicStatus::Stopped);
        rec.events.push(AudioEvent::MusicStop { key: key.to_owned() });
    }

    fn music_status(&self, key: &str) -> MusicStatus {
        self.inner
            .borrow()
            .music
            .get(key)
            .copied()
            .unwrap_or_default()
    }
}
