//! Outlined mosaic conversion for character sprites.

use image::{imageops::FilterType, DynamicImage, RgbaImage};
use mcbean_core::{Sprite, SpriteSize};

const TRANSPARENT_MEAN_ALPHA: f32 = 50.0;
const OPAQUE_ALPHA: u8 = 128;
const OUTLINE: [u8; 4] = [0, 0, 0, 255];

/// Converts a decoded image into an outlined pixel-art sprite of exactly `size`.
///
/// The source is shrunk to fit (never enlarged), collapsed into `block`-sized
/// squares sampled at their centers, centered on a transparent canvas, and
/// every opaque pixel that touches transparency or the canvas border turns
/// black. A `block` of zero is treated as one.
#[must_use]
pub fn pixelate_image(image: &DynamicImage, size: SpriteSize, block: u32) -> Sprite {
    let block = block.max(1);
    let mut canvas = vec![0u8; size.area() * 4];
    if size.area() == 0 || image.width() == 0 || image.height() == 0 {
        return Sprite::from_rgba(size, canvas).unwrap_or_else(|| Sprite::filled(size, [0; 4]));
    }

    let source = fit_within(image.to_rgba8(), size);
    let mosaic = mosaic(&source, block);

    let offset_x = (size.width - mosaic.width()) / 2;
    let offset_y = (size.height - mosaic.height()) / 2;
    for (x, y, pixel) in mosaic.enumerate_pixels() {
        let index = canvas_index(size, x + offset_x, y + offset_y);
        canvas[index..index + 4].copy_from_slice(&pixel.0);
    }

    outline(&mut canvas, size);
    Sprite::from_rgba(size, canvas).unwrap_or_else(|| Sprite::filled(size, [0; 4]))
}

fn fit_within(source: RgbaImage, size: SpriteSize) -> RgbaImage {
    let (width, height) = source.dimensions();
    let scale = (size.width as f32 / width as f32)
        .min(size.height as f32 / height as f32)
        .min(1.0);
    if scale >= 1.0 {
        return source;
    }
    let fitted_width = ((width as f32 * scale).round() as u32).clamp(1, size.width);
    let fitted_height = ((height as f32 * scale).round() as u32).clamp(1, size.height);
    image::imageops::resize(&source, fitted_width, fitted_height, FilterType::Lanczos3)
}

fn mosaic(source: &RgbaImage, block: u32) -> RgbaImage {
    let (width, height) = source.dimensions();
    let mut output = RgbaImage::new(width, height);

    for block_y in (0..height).step_by(block as usize) {
        for block_x in (0..width).step_by(block as usize) {
            let x_end = (block_x + block).min(width);
            let y_end = (block_y + block).min(height);

            let mut alpha_sum = 0u32;
            for y in block_y..y_end {
                for x in block_x..x_end {
                    alpha_sum += u32::from(source.get_pixel(x, y).0[3]);
                }
            }
            let count = (x_end - block_x) * (y_end - block_y);
            let mean_alpha = alpha_sum as f32 / count as f32;

            let color = if mean_alpha < TRANSPARENT_MEAN_ALPHA {
                [0; 4]
            } else {
                let center_x = (block_x + block / 2).min(width - 1);
                let center_y = (block_y + block / 2).min(height - 1);
                enhance(source.get_pixel(center_x, center_y).0)
            };

            for y in block_y..y_end {
                for x in block_x..x_end {
                    output.get_pixel_mut(x, y).0 = color;
                }
            }
        }
    }
    output
}

/// Stretches contrast about mid-grey for colors that are neither near black
/// nor near white. Greyish colors are stretched harder.
pub(crate) fn enhance(rgba: [u8; 4]) -> [u8; 4] {
    let [r, g, b, a] = rgba;
    let channels = [f32::from(r), f32::from(g), f32::from(b)];
    let brightness = channels.iter().sum::<f32>() / 3.0;
    if brightness <= 30.0 || brightness >= 225.0 {
        return rgba;
    }

    let max = channels.iter().copied().fold(f32::MIN, f32::max);
    let min = channels.iter().copied().fold(f32::MAX, f32::min);
    let factor = if max - min < 50.0 { 1.15 } else { 1.05 };
    let stretch = |channel: f32| ((channel - 128.0) * factor + 128.0).clamp(0.0, 255.0) as u8;

    [
        stretch(channels[0]),
        stretch(channels[1]),
        stretch(channels[2]),
        a,
    ]
}

fn outline(canvas: &mut [u8], size: SpriteSize) {
    let alpha = |x: u32, y: u32| canvas[canvas_index(size, x, y) + 3];
    let mut edges = Vec::new();

    for y in 0..size.height {
        for x in 0..size.width {
            if alpha(x, y) <= OPAQUE_ALPHA {
                continue;
            }
            let on_border = x == 0 || y == 0 || x + 1 == size.width || y + 1 == size.height;
            let touches_transparency = on_border
                || alpha(x - 1, y) < OPAQUE_ALPHA
                || alpha(x + 1, y) < OPAQUE_ALPHA
                || alpha(x, y - 1) < OPAQUE_ALPHA
                || alpha(x, y + 1) < OPAQUE_ALPHA;
            if touches_transparency {
                edges.push(canvas_index(size, x, y));
            }
        }
    }

    for index in edges {
        canvas[index..index + 4].copy_from_slice(&OUTLINE);
    }
}

fn canvas_index(size: SpriteSize, x: u32, y: u32) -> usize {
    (y as usize * size.width as usize + x as usize) * 4
}
