//! Color value types and the conversions between them.
//!
//! Three channel depths are supported, each with a straight and a
//! premultiplied variant:
//!
//! | Straight | Premultiplied | Channels |
//! |----------|---------------|----------|
//! | [`Color32`] | [`PColor32`] | 4 x `u8`, sRGB |
//! | [`Color64`] | [`PColor64`] | 4 x `u16`, sRGB |
//! | [`ColorF`]  | [`PColorF`]  | 4 x `f32`, linear light |
//!
//! Packed storage layouts (`Rgb565`, `Argb1555`, `Rgb24`, ...) live in
//! [`packed`] and only convert to and from [`Color32`]/[`Color64`]/[`ColorF`].
//!
//! ## Blending
//!
//! All straight-alpha blends follow the same rules: an opaque source
//! overwrites, a fully transparent source leaves the background alone, an
//! opaque background takes the simple `back + (src - back) * a` path and
//! anything else goes through full Porter-Duff "over". The
//! [`WorkingColorSpace`] decides whether the math runs on sRGB-encoded
//! integers or on linear light.

mod blend;
mod color32;
mod color64;
mod color_f;
pub mod packed;
pub mod transfer;

pub use color_f::{ColorF, PColorF};
pub use color32::{Color32, PColor32};
pub use color64::{Color64, PColor64};
pub use packed::{Argb1555, Rgb24, Rgb48, Rgb555, Rgb565, RgbF96};

/// Color space in which blending and grayscale conversion are performed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WorkingColorSpace {
    /// sRGB for integer formats, linear for floating-point formats.
    #[default]
    Default,
    /// Blend sRGB-encoded values directly. Fast, the traditional behavior.
    Srgb,
    /// Decode to linear light before blending. Physically correct.
    Linear,
}

impl WorkingColorSpace {
    /// Resolve [`WorkingColorSpace::Default`] against a pixel format's gamma.
    pub fn resolve(self, linear_format: bool) -> WorkingColorSpace {
        match self {
            WorkingColorSpace::Default if linear_format => WorkingColorSpace::Linear,
            WorkingColorSpace::Default => WorkingColorSpace::Srgb,
            other => other,
        }
    }

    #[inline]
    pub(crate) fn is_linear(self) -> bool {
        self == WorkingColorSpace::Linear
    }
}

/// Rec. 601 luma on sRGB-encoded 8-bit channels (0.299, 0.587, 0.114).
#[inline]
pub(crate) fn srgb_luma8(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        return r;
    }
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114 + 500) / 1000) as u8
}

#[inline]
pub(crate) fn srgb_luma16(r: u16, g: u16, b: u16) -> u16 {
    if r == g && g == b {
        return r;
    }
    ((u64::from(r) * 299 + u64::from(g) * 587 + u64::from(b) * 114 + 500) / 1000) as u16
}

/// Rec. 709 luminance on linear channels.
#[inline]
pub(crate) fn linear_luma(r: f32, g: f32, b: f32) -> f32 {
    if r == g && g == b {
        return r;
    }
    r * 0.2126 + g * 0.7152 + b * 0.0722
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_space_resolves_by_gamma() {
        assert_eq!(
            WorkingColorSpace::Default.resolve(true),
            WorkingColorSpace::Linear
        );
        assert_eq!(
            WorkingColorSpace::Default.resolve(false),
            WorkingColorSpace::Srgb
        );
        assert_eq!(
            WorkingColorSpace::Srgb.resolve(true),
            WorkingColorSpace::Srgb
        );
    }

    #[test]
    fn luma_of_gray_is_identity() {
        for v in [0u8, 1, 77, 128, 254, 255] {
            assert_eq!(srgb_luma8(v, v, v), v);
        }
        assert_eq!(srgb_luma16(40000, 40000, 40000), 40000);
        assert_eq!(linear_luma(0.3, 0.3, 0.3), 0.3);
    }

    #[test]
    fn luma_weights() {
        assert_eq!(srgb_luma8(255, 0, 0), 76);
        assert_eq!(srgb_luma8(0, 255, 0), 150);
        assert_eq!(srgb_luma8(0, 0, 255), 29);
    }
}
