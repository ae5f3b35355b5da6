//! Immutable RGBA bitmaps produced once at startup.

/// Pixel dimensions of a sprite or canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SpriteSize {
    /// Creates a new size descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by the size.
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Row-major RGBA8 bitmap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    size: SpriteSize,
    pixels: Vec<u8>,
}

impl Sprite {
    /// Wraps raw RGBA bytes. Returns `None` when the buffer length does not
    /// match the dimensions.
    #[must_use]
    pub fn from_rgba(size: SpriteSize, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != size.area() * 4 {
            return None;
        }
        Some(Self { size, pixels })
    }

    /// Creates a sprite filled with a single color.
    #[must_use]
    pub fn filled(size: SpriteSize, rgba: [u8; 4]) -> Self {
        let pixels = rgba.iter().copied().cycle().take(size.area() * 4).collect();
        Self { size, pixels }
    }

    /// Dimensions of the sprite.
    #[must_use]
    pub const fn size(&self) -> SpriteSize {
        self.size
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height
    }

    /// Color at the provided pixel, or `None` outside the bitmap.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let offset = (y as usize * self.size.width as usize + x as usize) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(rgba)
    }

    /// Raw RGBA bytes in row-major order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}
