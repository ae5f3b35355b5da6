use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use mcbean_core::SpriteSize;
use mcbean_rendering::SpriteKey;
use serde::Deserialize;
use thiserror::Error;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const MANIFEST_FILE_NAME: &str = "manifest.toml";
const DEFAULT_MUSIC_VOLUME: f32 = 0.7;

/// Errors raised while reading an asset manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read asset manifest at {}", .path.display())]
    Read {
        /// Manifest location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The manifest is not valid TOML or has the wrong shape.
    #[error("failed to parse asset manifest toml contents")]
    Parse(#[from] toml::de::Error),
    /// The manifest declares a format revision this build does not understand.
    #[error("unsupported asset manifest version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Declared version.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
    /// A sprite table names a key that does not exist.
    #[error("unknown sprite key `{name}` in manifest")]
    UnknownSpriteKey {
        /// Offending table name.
        name: String,
    },
}

/// Where to find and how to pixelate one sprite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteSource {
    /// Role of the sprite.
    pub key: SpriteKey,
    /// Source image path.
    pub path: PathBuf,
    /// Exact output size.
    pub size: SpriteSize,
    /// Mosaic block side in pixels.
    pub block: u32,
}

/// Audio clip locations. Missing clips are silent.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSources {
    /// Looping background music.
    pub music: Option<PathBuf>,
    /// Gunshot effect.
    pub shot: Option<PathBuf>,
    /// Round transition effect.
    pub round_complete: Option<PathBuf>,
    /// Music volume in `0.0..=1.0`.
    pub music_volume: f32,
}

/// Font file locations. Missing fonts use the backend's built-in face.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontSources {
    /// Face used for headlines.
    pub title: Option<PathBuf>,
    /// Face used for HUD and menu text.
    pub body: Option<PathBuf>,
}

/// Every asset the game loads at startup, with paths already resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetManifest {
    sprites: Vec<SpriteSource>,
    audio: AudioSources,
    fonts: FontSources,
}

impl AssetManifest {
    /// Built-in asset layout rooted at `base`.
    #[must_use]
    pub fn defaults(base: &Path) -> Self {
        let sprites = SpriteKey::ALL
            .into_iter()
            .map(|key| default_sprite(key, base))
            .collect();
        Self {
            sprites,
            audio: AudioSources {
                music: Some(base.join("background_sound.mp3")),
                shot: Some(base.join("shoot.mp3")),
                round_complete: Some(base.join("bullet_change.mp3")),
                music_volume: DEFAULT_MUSIC_VOLUME,
            },
            fonts: FontSources::default(),
        }
    }

    /// Reads the manifest at `path`, resolving entries relative to its directory.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&contents, &base)
    }

    /// Reads `manifest.toml` from `assets_dir`, falling back to [`Self::defaults`].
    #[must_use]
    pub fn load_or_default(assets_dir: &Path) -> Self {
        let path = assets_dir.join(MANIFEST_FILE_NAME);
        if !path.exists() {
            tracing::info!(path = %path.display(), "no asset manifest, using built-in layout");
            return Self::defaults(assets_dir);
        }
        match Self::load(&path) {
            Ok(manifest) => manifest,
            Err(error) => {
                tracing::warn!(%error, "ignoring asset manifest");
                Self::defaults(assets_dir)
            }
        }
    }

    /// Parses manifest `contents`, resolving paths against `base`.
    ///
    /// Sprite tables that are absent keep their built-in entries.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] for malformed TOML, an unsupported version or
    /// an unknown sprite key.
    pub fn parse(contents: &str, base: &Path) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(contents)?;
        if raw.version != SUPPORTED_MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion {
                found: raw.version,
                expected: SUPPORTED_MANIFEST_VERSION,
            });
        }

        let mut overrides = HashMap::new();
        for (name, entry) in raw.sprites {
            let key = parse_sprite_key(&name)?;
            let _ = overrides.insert(key, entry);
        }

        let mut manifest = Self::defaults(base);
        for source in &mut manifest.sprites {
            if let Some(entry) = overrides.remove(&source.key) {
                source.path = base.join(entry.path);
                source.size = SpriteSize::new(
                    entry.width.unwrap_or(source.size.width),
                    entry.height.unwrap_or(source.size.height),
                );
                source.block = entry.block.unwrap_or(source.block);
            }
        }

        let audio = raw.audio;
        let resolve = |path: Option<String>, fallback: Option<PathBuf>| {
            path.map(|path| base.join(path)).or(fallback)
        };
        manifest.audio = AudioSources {
            music: resolve(audio.music, manifest.audio.music.take()),
            shot: resolve(audio.shot, manifest.audio.shot.take()),
            round_complete: resolve(audio.round_complete, manifest.audio.round_complete.take()),
            music_volume: audio
                .music_volume
                .unwrap_or(DEFAULT_MUSIC_VOLUME)
                .clamp(0.0, 1.0),
        };
        manifest.fonts = FontSources {
            title: raw.fonts.title.map(|path| base.join(path)),
            body: raw.fonts.body.map(|path| base.join(path)),
        };

        Ok(manifest)
    }

    /// Sprite sources in canonical key order.
    #[must_use]
    pub fn sprites(&self) -> &[SpriteSource] {
        &self.sprites
    }

    /// Source for a single sprite key.
    #[must_use]
    pub fn sprite(&self, key: SpriteKey) -> Option<&SpriteSource> {
        self.sprites.iter().find(|source| source.key == key)
    }

    /// Audio clip locations.
    #[must_use]
    pub fn audio(&self) -> &AudioSources {
        &self.audio
    }

    /// Font file locations.
    #[must_use]
    pub fn fonts(&self) -> &FontSources {
        &self.fonts
    }
}

fn default_sprite(key: SpriteKey, base: &Path) -> SpriteSource {
    let (file, size, block) = match key {
        SpriteKey::PlayerIdle => ("huangdou.png", SpriteSize::new(125, 125), 3),
        SpriteKey::PlayerShooting => ("huangdou2.png", SpriteSize::new(125, 125), 3),
        SpriteKey::Backdrop => ("background2.jpg", SpriteSize::new(800, 600), 4),
    };
    SpriteSource {
        key,
        path: base.join(file),
        size,
        block,
    }
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey, ManifestError> {
    match name {
        "PlayerIdle" => Ok(SpriteKey::PlayerIdle),
        "PlayerShooting" => Ok(SpriteKey::PlayerShooting),
        "Backdrop" => Ok(SpriteKey::Backdrop),
        _ => Err(ManifestError::UnknownSpriteKey {
            name: name.to_owned(),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    version: u32,
    #[serde(default)]
    sprites: HashMap<String, RawSprite>,
    #[serde(default)]
    audio: RawAudio,
    #[serde(default)]
    fonts: RawFonts,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSprite {
    path: String,
    width: Option<u32>,
    height: Option<u32>,
    block: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAudio {
    music: Option<String>,
    shot: Option<String>,
    round_complete: Option<String>,
    music_volume: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFonts {
    title: Option<String>,
    body: Option<String>,
}
