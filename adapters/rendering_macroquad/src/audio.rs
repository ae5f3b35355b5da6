//! Sound playback for the Macroquad rendering backend.
//!
//! Device calls only exist when the `audio` feature is enabled. Without it,
//! or when the capability is disabled, every call is a no-op.

use std::time::Duration;

use mcbean_rendering::{AudioCapability, AudioCue, FadeEnvelope};

use crate::manifest::AudioSources;

const MUSIC_FADE: Duration = Duration::from_millis(2_000);

/// What to do with the music once a fade reaches silence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AfterFade {
    Restart,
    Stop,
}

/// Device-facing music operation produced by the director.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum MusicAction {
    Volume(f32),
    Restart(f32),
    Stop,
}

/// Turns fade cues into a schedule of music operations.
#[derive(Clone, Debug)]
pub(crate) struct MusicDirector {
    envelope: FadeEnvelope,
    after_fade: Option<AfterFade>,
}

impl MusicDirector {
    pub(crate) fn new(volume: f32) -> Self {
        Self {
            envelope: FadeEnvelope::new(volume),
            after_fade: None,
        }
    }

    pub(crate) fn volume(&self) -> f32 {
        self.envelope.volume()
    }

    /// Starts a fade for the music cues; effect cues are ignored.
    pub(crate) fn cue(&mut self, cue: AudioCue) {
        let after = match cue {
            AudioCue::FadeOutAndRestart => AfterFade::Restart,
            AudioCue::FadeOutAndStop => AfterFade::Stop,
            AudioCue::Shot | AudioCue::RoundComplete => return,
        };
        self.envelope.start(MUSIC_FADE);
        self.after_fade = Some(after);
    }

    /// Advances the fade and returns the operation to perform, if any.
    pub(crate) fn advance(&mut self, dt: Duration) -> Option<MusicAction> {
        let after = self.after_fade?;
        self.envelope.advance(dt);
        if !self.envelope.is_finished() {
            return Some(MusicAction::Volume(self.envelope.volume()));
        }

        self.after_fade = None;
        match after {
            AfterFade::Restart => {
                self.envelope.reset();
                Some(MusicAction::Restart(self.envelope.volume()))
            }
            AfterFade::Stop => Some(MusicAction::Stop),
        }
    }
}

/// Capability left once the device has been probed: sound stays enabled only
/// when it was requested and at least one clip could be loaded.
pub(crate) fn effective_capability(
    requested: AudioCapability,
    device_ready: bool,
) -> AudioCapability {
    if requested.is_enabled() && device_ready {
        AudioCapability::Enabled
    } else {
        AudioCapability::Disabled
    }
}

/// Loaded clips plus the music fade state.
pub(crate) struct SoundBoard {
    capability: AudioCapability,
    clips: Option<device::Clips>,
    director: MusicDirector,
}

impl SoundBoard {
    /// Loads clips when `capability` allows sound. Missing clips are logged and
    /// stay silent; when none load, the board turns the capability off.
    pub(crate) async fn load(sources: &AudioSources, capability: AudioCapability) -> Self {
        let clips = if capability.is_enabled() {
            device::Clips::load(sources).await
        } else {
            None
        };
        let capability = effective_capability(capability, clips.is_some());
        tracing::info!(?capability, "audio ready");
        Self {
            capability,
            clips,
            director: MusicDirector::new(sources.music_volume),
        }
    }

    /// Capability after loading; `Disabled` when muted or when no clip loaded.
    pub(crate) fn capability(&self) -> AudioCapability {
        self.capability
    }

    /// Plays the background music once from the beginning.
    pub(crate) fn start_music(&self) {
        if let Some(clips) = &self.clips {
            clips.play_music(self.director.volume());
        }
    }

    /// Plays effects and starts fades requested by a frame.
    pub(crate) fn handle(&mut self, cues: &[AudioCue]) {
        for &cue in cues {
            if let Some(clips) = &self.clips {
                clips.play_effect(cue);
            }
            self.director.cue(cue);
        }
    }

    /// Moves any music fade forward by `dt`.
    pub(crate) fn update(&mut self, dt: Duration) {
        let Some(action) = self.director.advance(dt) else {
            return;
        };
        if let MusicAction::Volume(volume) | MusicAction::Restart(volume) = action {
            tracing::trace!(volume, "music volume");
        }
        if let Some(clips) = &self.clips {
            clips.apply(action);
        }
    }
}

#[cfg(feature = "audio")]
mod device {
    use std::path::Path;

    use macroquad::audio::{self, PlaySoundParams, Sound};
    use mcbean_rendering::AudioCue;

    use super::MusicAction;
    use crate::manifest::AudioSources;

    pub(super) struct Clips {
        music: Option<Sound>,
        shot: Option<Sound>,
        round_complete: Option<Sound>,
    }

    impl Clips {
        pub(super) async fn load(sources: &AudioSources) -> Option<Self> {
            let clips = Self {
                music: load(sources.music.as_deref()).await,
                shot: load(sources.shot.as_deref()).await,
                round_complete: load(sources.round_complete.as_deref()).await,
            };
            if clips.music.is_none() && clips.shot.is_none() && clips.round_complete.is_none() {
                tracing::warn!("no sound could be loaded; audio disabled");
                return None;
            }
            Some(clips)
        }

        pub(super) fn play_music(&self, volume: f32) {
            if let Some(music) = self.music {
                audio::play_sound(music, music_params(volume));
            }
        }

        pub(super) fn play_effect(&self, cue: AudioCue) {
            let clip = match cue {
                AudioCue::Shot => self.shot,
                AudioCue::RoundComplete => self.round_complete,
                AudioCue::FadeOutAndRestart | AudioCue::FadeOutAndStop => None,
            };
            if let Some(clip) = clip {
                audio::play_sound_once(clip);
            }
        }

        pub(super) fn apply(&self, action: MusicAction) {
            let Some(music) = self.music else {
                return;
            };
            match action {
                MusicAction::Volume(volume) => audio::set_sound_volume(music, volume),
                MusicAction::Restart(volume) => {
                    audio::stop_sound(music);
                    self.play_music(volume);
                }
                MusicAction::Stop => audio::stop_sound(music),
            }
        }
    }

    /// The soundtrack plays through once per start or restart.
    pub(super) fn music_params(volume: f32) -> PlaySoundParams {
        PlaySoundParams {
            looped: false,
            volume,
        }
    }

    async fn load(path: Option<&Path>) -> Option<Sound> {
        let path = path?;
        match audio::load_sound(&path.to_string_lossy()).await {
            Ok(sound) => {
                tracing::debug!(path = %path.display(), "loaded sound");
                Some(sound)
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), ?error, "sound unavailable");
                None
            }
        }
    }
}

#[cfg(not(feature = "audio"))]
mod device {
    use mcbean_rendering::AudioCue;

    use super::MusicAction;
    use crate::manifest::AudioSources;

    pub(super) enum Clips {}

    impl Clips {
        pub(super) async fn load(_sources: &AudioSources) -> Option<Self> {
            tracing::info!("built without the `audio` feature; sound is disabled");
            None
        }

        pub(super) fn play_music(&self, _volume: f32) {
            match *self {}
        }

        pub(super) fn play_effect(&self, _cue: AudioCue) {
            match *self {}
        }

        pub(super) fn apply(&self, _action: MusicAction) {
            match *self {}
        }
    }
}
