use std::collections::HashMap;

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::{
    color::WHITE,
    texture::{self, FilterMode, Texture2D},
};
use mcbean_core::Sprite;
use mcbean_rendering::{RenderingError, SpriteKey, SpriteSheet};

/// GPU textures uploaded from the pre-rendered sprite sheet.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Uploads every sprite in `sheet`. Requires a live rendering context.
    pub(crate) fn from_sheet(sheet: &SpriteSheet) -> Result<Self> {
        Self::from_sheet_with_loader(sheet, upload)
    }

    fn from_sheet_with_loader(
        sheet: &SpriteSheet,
        mut loader: impl FnMut(SpriteKey, &Sprite) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::new();
        for (key, sprite) in sheet.iter() {
            let texture =
                loader(key, sprite).with_context(|| format!("failed to upload sprite {key:?}"))?;
            let _ = textures.insert(key, texture);
        }
        Ok(Self { textures })
    }

    /// Returns whether the atlas contains the provided key.
    pub(crate) fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    /// Draws `key` with its top-left corner at `origin`.
    pub(crate) fn draw_top_left(&self, key: SpriteKey, origin: Vec2) {
        if let Some(texture) = self.textures.get(&key) {
            texture::draw_texture(*texture, origin.x, origin.y, WHITE);
        }
    }

    /// Draws `key` centered on `center` at its native size.
    pub(crate) fn draw_centered(&self, key: SpriteKey, center: Vec2) {
        if let Some(texture) = self.textures.get(&key) {
            let origin = centered_origin(center, texture.width(), texture.height());
            texture::draw_texture(*texture, origin.x, origin.y, WHITE);
        }
    }
}

/// Top-left corner that centers a `width` by `height` box on `center`,
/// snapped to whole pixels so mosaic blocks stay crisp.
pub(crate) fn centered_origin(center: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        center.x.trunc() - (width / 2.0).floor(),
        center.y.trunc() - (height / 2.0).floor(),
    )
}

pub(crate) fn texture_dimensions(
    key: SpriteKey,
    sprite: &Sprite,
) -> Result<(u16, u16), RenderingError> {
    let too_large = || RenderingError::SpriteTooLarge {
        key,
        size: sprite.size(),
    };
    let width = u16::try_from(sprite.width()).map_err(|_| too_large())?;
    let height = u16::try_from(sprite.height()).map_err(|_| too_large())?;
    Ok((width, height))
}

fn upload(key: SpriteKey, sprite: &Sprite) -> Result<Texture2D> {
    let (width, height) = texture_dimensions(key, sprite)?;
    let texture = Texture2D::from_rgba8(width, height, sprite.as_bytes());
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcbean_core::SpriteSize;
    use std::cell::RefCell;

    fn sheet() -> SpriteSheet {
        let mut sheet = SpriteSheet::new();
        for key in SpriteKey::ALL {
            let _ = sheet.insert(key, Sprite::filled(SpriteSize::new(2, 2), [0; 4]));
        }
        sheet
    }

    #[test]
    fn atlas_uploads_sprites_in_canonical_order() {
        let order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_sheet_with_loader(&sheet(), |key, _| {
            order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        assert_eq!(order.borrow().as_slice(), &SpriteKey::ALL);
        for key in SpriteKey::ALL {
            assert!(atlas.contains(key));
        }
    }

    #[test]
    fn loader_failures_are_reported_with_the_key() {
        let error = SpriteAtlas::from_sheet_with_loader(&sheet(), |key, _| {
            if key == SpriteKey::Backdrop {
                anyhow::bail!("no gpu");
            }
            Ok(Texture2D::empty())
        })
        .unwrap_err();
        assert!(format!("{error:#}").contains("Backdrop"));
    }

    #[test]
    fn partial_sheets_still_load() {
        let mut partial = SpriteSheet::new();
        let _ = partial.insert(
            SpriteKey::PlayerIdle,
            Sprite::filled(SpriteSize::new(1, 1), [0; 4]),
        );
        let atlas = SpriteAtlas::from_sheet_with_loader(&partial, |_, _| Ok(Texture2D::empty()))
            .expect("partial sheet loads");
        assert!(atlas.contains(SpriteKey::PlayerIdle));
        assert!(!atlas.contains(SpriteKey::Backdrop));
    }

    #[test]
    fn oversized_sprites_are_rejected() {
        let sprite = Sprite::filled(SpriteSize::new(70_000, 1), [0; 4]);
        assert_eq!(
            texture_dimensions(SpriteKey::Backdrop, &sprite),
            Err(RenderingError::SpriteTooLarge {
                key: SpriteKey::Backdrop,
                size: SpriteSize::new(70_000, 1),
            })
        );
        let small = Sprite::filled(SpriteSize::new(125, 125), [0; 4]);
        assert_eq!(texture_dimensions(SpriteKey::PlayerIdle, &small), Ok((125, 125)));
    }

    #[test]
    fn centered_origin_snaps_to_pixels() {
        assert_eq!(
            centered_origin(Vec2::new(400.0, 450.0), 125.0, 125.0),
            Vec2::new(338.0, 388.0)
        );
        assert_eq!(
            centered_origin(Vec2::new(10.0, 10.0), 4.0, 4.0),
            Vec2::new(8.0, 8.0)
        );
    }
}
