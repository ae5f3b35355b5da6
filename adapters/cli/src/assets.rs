use mcbean_rendering::{SpriteKey, SpriteSheet};
use mcbean_rendering_macroquad::AssetManifest;
use mcbean_system_pixelate::{pixelate, pixelate_backdrop};

/// Pixelates every sprite listed in `manifest`. Unreadable images become placeholders.
pub(crate) fn build_sprite_sheet(manifest: &AssetManifest) -> SpriteSheet {
    let mut sheet = SpriteSheet::new();
    for source in manifest.sprites() {
        let sprite = match source.key {
            SpriteKey::Backdrop => pixelate_backdrop(&source.path, source.size, source.block),
            SpriteKey::PlayerIdle | SpriteKey::PlayerShooting => {
                pixelate(&source.path, source.size, source.block)
            }
        };
        let _ = sheet.insert(source.key, sprite);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcbean_core::SpriteSize;
    use mcbean_system_pixelate::{gradient_backdrop, placeholder};
    use std::path::Path;

    #[test]
    fn missing_art_still_fills_every_slot() {
        let manifest = AssetManifest::defaults(Path::new("no/such/assets"));
        let sheet = build_sprite_sheet(&manifest);

        assert!(sheet.is_complete());
        assert_eq!(
            sheet.get(SpriteKey::PlayerIdle),
            Some(&placeholder(SpriteSize::new(125, 125)))
        );
        assert_eq!(
            sheet.get(SpriteKey::Backdrop),
            Some(&gradient_backdrop(SpriteSize::new(800, 600)))
        );
    }
}
