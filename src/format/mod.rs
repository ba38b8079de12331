//! Pixel format descriptors.
//!
//! [`PixelFormatInfo`] is the capability record the rest of the crate keys
//! its behavior on. [`KnownPixelFormat`] names the built-in layouts, and
//! [`CustomPixelFormat`] pairs a descriptor with caller-supplied pixel
//! callbacks.

mod custom;
mod known;

pub use custom::{
    ColorFGetter, ColorFSetter, Color32Getter, Color32Setter, Color64Getter, Color64Setter,
    CustomPixelFormat, IndexGetter, IndexSetter,
};
pub use known::KnownPixelFormat;

use crate::error::BitmapError;

bitflags::bitflags! {
    /// Capability bits of a [`PixelFormatInfo`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PixelFormatFlags: u16 {
        const HAS_ALPHA = 1 << 0;
        const INDEXED = 1 << 1;
        const PREMULTIPLIED = 1 << 2;
        const GRAYSCALE = 1 << 3;
        const SINGLE_BIT_ALPHA = 1 << 4;
        /// Color channels are stored in linear light.
        const LINEAR_GAMMA = 1 << 5;
        /// 16-bit channels; [`crate::Color64`] preserves the full precision.
        const PREFERS_64 = 1 << 6;
        /// Floating-point channels; [`crate::ColorF`] preserves the full precision.
        const PREFERS_128 = 1 << 7;
        const CUSTOM = 1 << 8;
    }
}

/// Compact description of a pixel layout: bit depth plus capabilities.
///
/// The `with_*` setters keep the flags consistent: premultiplied and
/// single-bit alpha imply alpha, indexed formats never carry alpha, and
/// clearing alpha clears both alpha refinements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelFormatInfo {
    bits_per_pixel: u8,
    flags: PixelFormatFlags,
}

impl PixelFormatInfo {
    /// A format with `bits_per_pixel` bits and no capabilities set.
    ///
    /// Fails unless `1 <= bits_per_pixel <= 128`.
    pub fn new(bits_per_pixel: u32) -> Result<Self, BitmapError> {
        if !(1..=128).contains(&bits_per_pixel) {
            return Err(BitmapError::InvalidArgument(std::format!(
                "bits per pixel must be in 1..=128, got {bits_per_pixel}"
            )));
        }
        Ok(Self::from_parts(bits_per_pixel as u8, PixelFormatFlags::empty()))
    }

    pub(crate) const fn from_parts(bits_per_pixel: u8, flags: PixelFormatFlags) -> Self {
        Self {
            bits_per_pixel,
            flags,
        }
    }

    pub const fn with_alpha(self, value: bool) -> Self {
        if value {
            self.set(PixelFormatFlags::HAS_ALPHA)
                .clear(PixelFormatFlags::INDEXED)
        } else {
            self.clear(PixelFormatFlags::HAS_ALPHA)
                .clear(PixelFormatFlags::PREMULTIPLIED)
                .clear(PixelFormatFlags::SINGLE_BIT_ALPHA)
        }
    }

    /// Indexed formats are limited to 16 bits per pixel; a wider format
    /// ignores the request.
    pub const fn with_indexed(self, value: bool) -> Self {
        if !value {
            return self.clear(PixelFormatFlags::INDEXED);
        }
        if self.bits_per_pixel > 16 {
            return self;
        }
        self.with_alpha(false).set(PixelFormatFlags::INDEXED)
    }

    pub const fn with_premultiplied(self, value: bool) -> Self {
        if value {
            self.with_alpha(true).set(PixelFormatFlags::PREMULTIPLIED)
        } else {
            self.clear(PixelFormatFlags::PREMULTIPLIED)
        }
    }

    pub const fn with_single_bit_alpha(self, value: bool) -> Self {
        if value {
            self.with_alpha(true).set(PixelFormatFlags::SINGLE_BIT_ALPHA)
        } else {
            self.clear(PixelFormatFlags::SINGLE_BIT_ALPHA)
        }
    }

    pub const fn with_grayscale(self, value: bool) -> Self {
        self.toggle(PixelFormatFlags::GRAYSCALE, value)
    }

    pub const fn with_linear_gamma(self, value: bool) -> Self {
        self.toggle(PixelFormatFlags::LINEAR_GAMMA, value)
    }

    pub const fn with_prefers_64(self, value: bool) -> Self {
        self.toggle(PixelFormatFlags::PREFERS_64, value)
    }

    pub const fn with_prefers_128(self, value: bool) -> Self {
        self.toggle(PixelFormatFlags::PREFERS_128, value)
    }

    pub(crate) const fn with_custom(self, value: bool) -> Self {
        self.toggle(PixelFormatFlags::CUSTOM, value)
    }

    const fn toggle(self, flag: PixelFormatFlags, value: bool) -> Self {
        if value { self.set(flag) } else { self.clear(flag) }
    }

    const fn set(self, flag: PixelFormatFlags) -> Self {
        Self::from_parts(self.bits_per_pixel, self.flags.union(flag))
    }

    const fn clear(self, flag: PixelFormatFlags) -> Self {
        Self::from_parts(self.bits_per_pixel, self.flags.difference(flag))
    }

    #[inline]
    pub const fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel as u32
    }

    #[inline]
    pub const fn flags(&self) -> PixelFormatFlags {
        self.flags
    }

    #[inline]
    pub const fn has_alpha(&self) -> bool {
        self.flags.contains(PixelFormatFlags::HAS_ALPHA)
    }

    #[inline]
    pub const fn is_indexed(&self) -> bool {
        self.flags.contains(PixelFormatFlags::INDEXED)
    }

    #[inline]
    pub const fn has_premultiplied_alpha(&self) -> bool {
        self.flags.contains(PixelFormatFlags::PREMULTIPLIED)
    }

    #[inline]
    pub const fn is_grayscale(&self) -> bool {
        self.flags.contains(PixelFormatFlags::GRAYSCALE)
    }

    #[inline]
    pub const fn has_single_bit_alpha(&self) -> bool {
        self.flags.contains(PixelFormatFlags::SINGLE_BIT_ALPHA)
    }

    /// Alpha with more than two levels.
    #[inline]
    pub const fn has_multi_level_alpha(&self) -> bool {
        self.has_alpha() && !self.has_single_bit_alpha()
    }

    #[inline]
    pub const fn linear_gamma(&self) -> bool {
        self.flags.contains(PixelFormatFlags::LINEAR_GAMMA)
    }

    #[inline]
    pub const fn prefers_64(&self) -> bool {
        self.flags.contains(PixelFormatFlags::PREFERS_64)
    }

    #[inline]
    pub const fn prefers_128(&self) -> bool {
        self.flags.contains(PixelFormatFlags::PREFERS_128)
    }

    #[inline]
    pub const fn is_custom(&self) -> bool {
        self.flags.contains(PixelFormatFlags::CUSTOM)
    }

    /// Number of palette entries the format can address, for indexed formats.
    pub const fn max_palette_size(&self) -> Option<usize> {
        if self.is_indexed() {
            Some(1 << self.bits_per_pixel)
        } else {
            None
        }
    }

    /// Bytes needed to store `width` pixels (rounded up to a whole byte).
    #[inline]
    pub const fn byte_width(&self, width: usize) -> usize {
        (width * self.bits_per_pixel as usize).div_ceil(8)
    }

    /// Whether pixels start on byte boundaries.
    #[inline]
    pub const fn is_byte_aligned(&self) -> bool {
        self.bits_per_pixel % 8 == 0
    }

    /// Pixels per byte for sub-byte formats, 1 otherwise.
    #[inline]
    pub const fn pixels_per_byte(&self) -> usize {
        if self.bits_per_pixel < 8 {
            8 / self.bits_per_pixel as usize
        } else {
            1
        }
    }

    /// Whether storing a color needs blending against the back color.
    #[inline]
    pub(crate) const fn blends_on_store(&self) -> bool {
        !self.has_multi_level_alpha()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_depth_is_validated() {
        assert!(PixelFormatInfo::new(0).is_err());
        assert!(PixelFormatInfo::new(129).is_err());
        assert_eq!(PixelFormatInfo::new(128).unwrap().bits_per_pixel(), 128);
    }

    #[test]
    fn premultiplied_implies_alpha() {
        let info = PixelFormatInfo::new(32).unwrap().with_premultiplied(true);
        assert!(info.has_alpha());
        assert!(info.has_multi_level_alpha());
        let cleared = info.with_alpha(false);
        assert!(!cleared.has_premultiplied_alpha());
    }

    #[test]
    fn indexed_and_alpha_are_exclusive() {
        let info = PixelFormatInfo::new(8).unwrap().with_alpha(true).with_indexed(true);
        assert!(info.is_indexed());
        assert!(!info.has_alpha());
        let info = info.with_single_bit_alpha(true);
        assert!(info.has_alpha());
        assert!(!info.is_indexed());
        assert!(!info.has_multi_level_alpha());
    }

    #[test]
    fn wide_formats_cannot_be_indexed() {
        let info = PixelFormatInfo::new(24).unwrap().with_indexed(true);
        assert!(!info.is_indexed());
    }

    #[test]
    fn byte_width_rounds_up() {
        let info = PixelFormatInfo::new(1).unwrap();
        assert_eq!(info.byte_width(1), 1);
        assert_eq!(info.byte_width(8), 1);
        assert_eq!(info.byte_width(9), 2);
        assert_eq!(PixelFormatInfo::new(4).unwrap().byte_width(3), 2);
        assert_eq!(PixelFormatInfo::new(24).unwrap().byte_width(3), 9);
    }
}
