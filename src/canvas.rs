//! Canvas background color.

/// Background color the destination canvas is filled with before the
/// resampled content is drawn.
///
/// The fill is half transparent: see [`Background::fill_rgba`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Background {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Background {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Background {
    /// Alpha of the canvas fill, roughly 50%.
    pub const FILL_ALPHA: u8 = 127;

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA value written to every canvas pixel.
    pub const fn fill_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, Self::FILL_ALPHA]
    }
}

impl From<[u8; 3]> for Background {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}
