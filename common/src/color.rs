/// Lowest valid palette index.
pub const MIN_COLOR: usize = 0;
/// Highest valid palette index.
pub const MAX_COLOR: usize = 9;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RgbaColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl RgbaColor {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Transparent black, used as "no emission".
    pub const NONE: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// A neutral grey with the given intensity in every channel.
    pub const fn grey(intensity: f32) -> Self {
        Self::rgb(intensity, intensity, intensity)
    }
}

/// The colours a node can cycle through, indexed by its color index.
pub const PALETTE: [RgbaColor; MAX_COLOR + 1] = [
    RgbaColor::WHITE,
    RgbaColor::rgb(0.05, 0.05, 0.9),
    RgbaColor::rgb(0.05, 0.9, 0.05),
    RgbaColor::rgb(0.9, 0.05, 0.05),
    RgbaColor::rgb(0.9, 0.9, 0.0),
    RgbaColor::rgb(0.1, 0.8, 0.7),
    RgbaColor::rgb(0.7, 0.2, 0.7),
    RgbaColor::rgb(0.7, 0.7, 0.7),
    RgbaColor::rgb(0.4, 0.4, 0.4),
    RgbaColor::BLACK,
];

/// Looks up a palette colour. Out of range indices are clamped to the last entry.
pub fn palette_color(index: usize) -> RgbaColor {
    PALETTE[index.min(MAX_COLOR)]
}

/// Steps a palette index one slot forwards or backwards, wrapping at both ends.
pub fn step_color_index(index: usize, forward: bool) -> usize {
    let len = MAX_COLOR - MIN_COLOR + 1;
    let offset = index.saturating_sub(MIN_COLOR) % len;
    let next = if forward { (offset + 1) % len } else { (offset + len - 1) % len };
    MIN_COLOR + next
}
