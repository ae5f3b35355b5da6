#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! One-shot pixel-art conversion applied to sprite and backdrop images at startup.
//!
//! Every entry point has an infallible variant that logs the failure and
//! substitutes a placeholder, so asset loss degrades visuals without ever
//! stopping the game.

mod backdrop;
mod mosaic;

use std::path::{Path, PathBuf};

use image::DynamicImage;
use mcbean_core::{Sprite, SpriteSize};
use thiserror::Error;

pub use backdrop::{gradient_backdrop, pixelate_backdrop_image};
pub use mosaic::pixelate_image;

/// Solid color used when a sprite source cannot be decoded.
pub const PLACEHOLDER_COLOR: [u8; 4] = [255, 220, 0, 255];

/// Errors raised while converting an image file.
#[derive(Debug, Error)]
pub enum PixelateError {
    /// The source file could not be opened or decoded.
    #[error("failed to decode {}", .path.display())]
    Decode {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying decoder failure.
        #[source]
        source: image::ImageError,
    },
    /// The source decoded to an image without pixels.
    #[error("{} contains no pixels", .path.display())]
    Empty {
        /// Path that decoded to an empty image.
        path: PathBuf,
    },
}

/// Loads `path` and converts it into an outlined pixel-art sprite of exactly `size`.
///
/// # Errors
///
/// Returns [`PixelateError`] when the file cannot be decoded or is empty.
pub fn try_pixelate(path: &Path, size: SpriteSize, block: u32) -> Result<Sprite, PixelateError> {
    let image = open(path)?;
    Ok(pixelate_image(&image, size, block))
}

/// Same as [`try_pixelate`] but substitutes [`placeholder`] on failure.
#[must_use]
pub fn pixelate(path: &Path, size: SpriteSize, block: u32) -> Sprite {
    match try_pixelate(path, size, block) {
        Ok(sprite) => {
            tracing::debug!(path = %path.display(), ?size, block, "pixelated sprite");
            sprite
        }
        Err(error) => {
            tracing::warn!(%error, "using placeholder sprite");
            placeholder(size)
        }
    }
}

/// Loads `path` and converts it into an opaque mosaic backdrop of exactly `size`.
///
/// # Errors
///
/// Returns [`PixelateError`] when the file cannot be decoded or is empty.
pub fn try_pixelate_backdrop(
    path: &Path,
    size: SpriteSize,
    block: u32,
) -> Result<Sprite, PixelateError> {
    let image = open(path)?;
    Ok(pixelate_backdrop_image(&image, size, block))
}

/// Same as [`try_pixelate_backdrop`] but substitutes [`gradient_backdrop`] on failure.
#[must_use]
pub fn pixelate_backdrop(path: &Path, size: SpriteSize, block: u32) -> Sprite {
    match try_pixelate_backdrop(path, size, block) {
        Ok(sprite) => {
            tracing::debug!(path = %path.display(), ?size, block, "pixelated backdrop");
            sprite
        }
        Err(error) => {
            tracing::warn!(%error, "using gradient backdrop");
            gradient_backdrop(size)
        }
    }
}

/// Solid yellow stand-in for a sprite that failed to load.
#[must_use]
pub fn placeholder(size: SpriteSize) -> Sprite {
    Sprite::filled(size, PLACEHOLDER_COLOR)
}

fn open(path: &Path) -> Result<DynamicImage, PixelateError> {
    let image = image::open(path).map_err(|source| PixelateError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if image.width() == 0 || image.height() == 0 {
        return Err(PixelateError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(image)
}
