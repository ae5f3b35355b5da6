//! Opaque mosaic used as the scenery behind every phase.

use image::{imageops::FilterType, DynamicImage, RgbImage};
use mcbean_core::{Sprite, SpriteSize};

const EDGE_DEVIATION: f32 = 15.0;
const SKY: [u8; 3] = [135, 206, 235];
const MIDDLE: [u8; 3] = [200, 180, 150];
const GROUND: [u8; 3] = [238, 214, 175];

/// Stretches `image` to exactly `size` and collapses it into opaque blocks.
///
/// Flat blocks take their center color; busy blocks, whose mean channel
/// deviation exceeds 15, take the per-channel median so edges stay crisp.
#[must_use]
pub fn pixelate_backdrop_image(image: &DynamicImage, size: SpriteSize, block: u32) -> Sprite {
    let block = block.max(1);
    if size.area() == 0 || image.width() == 0 || image.height() == 0 {
        return gradient_backdrop(size);
    }

    let mut source = image.to_rgb8();
    if source.dimensions() != (size.width, size.height) {
        source = image::imageops::resize(&source, size.width, size.height, FilterType::CatmullRom);
    }

    let mut pixels = vec![0u8; size.area() * 4];
    for block_y in (0..size.height).step_by(block as usize) {
        for block_x in (0..size.width).step_by(block as usize) {
            let x_end = (block_x + block).min(size.width);
            let y_end = (block_y + block).min(size.height);
            let color = block_color(&source, block_x..x_end, block_y..y_end, block);

            for y in block_y..y_end {
                for x in block_x..x_end {
                    let index = (y as usize * size.width as usize + x as usize) * 4;
                    pixels[index..index + 4].copy_from_slice(&[color[0], color[1], color[2], 255]);
                }
            }
        }
    }

    Sprite::from_rgba(size, pixels).unwrap_or_else(|| gradient_backdrop(size))
}

fn block_color(
    source: &RgbImage,
    columns: std::ops::Range<u32>,
    rows: std::ops::Range<u32>,
    block: u32,
) -> [u8; 3] {
    let mut channels: [Vec<u8>; 3] = Default::default();
    for y in rows.clone() {
        for x in columns.clone() {
            let pixel = source.get_pixel(x, y).0;
            for (channel, value) in channels.iter_mut().zip(pixel) {
                channel.push(value);
            }
        }
    }

    let spread = channels.iter().map(|values| deviation(values)).sum::<f32>() / 3.0;
    if spread > EDGE_DEVIATION {
        return [
            median(&mut channels[0]),
            median(&mut channels[1]),
            median(&mut channels[2]),
        ];
    }

    let (width, height) = source.dimensions();
    let center_x = (columns.start + block / 2).min(width - 1);
    let center_y = (rows.start + block / 2).min(height - 1);
    source.get_pixel(center_x, center_y).0
}

fn deviation(values: &[u8]) -> f32 {
    let count = values.len() as f32;
    let mean = values.iter().map(|&v| f32::from(v)).sum::<f32>() / count;
    let variance = values
        .iter()
        .map(|&v| (f32::from(v) - mean).powi(2))
        .sum::<f32>()
        / count;
    variance.sqrt()
}

fn median(values: &mut [u8]) -> u8 {
    values.sort_unstable();
    let middle = values.len() / 2;
    if values.len() % 2 == 0 {
        ((u16::from(values[middle - 1]) + u16::from(values[middle])) / 2) as u8
    } else {
        values[middle]
    }
}

/// Vertical sky, middle and ground bands drawn when the backdrop image is missing.
///
/// The sky band darkens linearly by up to 30% towards the horizon.
#[must_use]
pub fn gradient_backdrop(size: SpriteSize) -> Sprite {
    let sky_end = size.height * 2 / 5;
    let middle_end = size.height * 7 / 10;
    let sky_height = size.height as f32 * 0.4;

    let mut pixels = Vec::with_capacity(size.area() * 4);
    for y in 0..size.height {
        let color = if y < sky_end {
            let shade = 1.0 - (y as f32 / sky_height) * 0.3;
            SKY.map(|channel| (f32::from(channel) * shade) as u8)
        } else if y < middle_end {
            MIDDLE
        } else {
            GROUND
        };
        for _ in 0..size.width {
            pixels.extend_from_slice(&[color[0], color[1], color[2], 255]);
        }
    }

    Sprite::from_rgba(size, pixels).unwrap_or_else(|| Sprite::filled(size, [0, 0, 0, 255]))
}
