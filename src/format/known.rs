use super::{PixelFormatFlags as F, PixelFormatInfo};

/// Built-in pixel layouts.
///
/// Multi-byte channels are stored in native byte order. Byte-ordered RGB
/// layouts store blue first, matching a little-endian `0xAARRGGBB` word.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KnownPixelFormat {
    /// 1 bit palette index, most significant bit first.
    Format1bppIndexed,
    /// 4 bit palette index, high nibble first.
    Format4bppIndexed,
    Format8bppIndexed,
    Format8bppGrayScale,
    /// 16-bit gray (native endian).
    Format16bppGrayScale,
    /// 32-bit float gray in linear light.
    Format32bppGrayScale,
    Format16bppRgb555,
    Format16bppRgb565,
    Format16bppArgb1555,
    /// B, G, R bytes.
    Format24bppRgb,
    /// B, G, R, X. The fourth byte is padding and written as 0xFF.
    Format32bppRgb,
    /// B, G, R, A.
    Format32bppArgb,
    /// B, G, R, A with premultiplied color channels.
    Format32bppPArgb,
    /// 16-bit B, G, R.
    Format48bppRgb,
    /// 16-bit B, G, R, A.
    Format64bppArgb,
    Format64bppPArgb,
    /// `f32` R, G, B in linear light.
    Format96bppRgb,
    /// `f32` R, G, B, A in linear light.
    Format128bppRgba,
    Format128bppPRgba,
}

impl KnownPixelFormat {
    pub const ALL: [KnownPixelFormat; 19] = [
        Self::Format1bppIndexed,
        Self::Format4bppIndexed,
        Self::Format8bppIndexed,
        Self::Format8bppGrayScale,
        Self::Format16bppGrayScale,
        Self::Format32bppGrayScale,
        Self::Format16bppRgb555,
        Self::Format16bppRgb565,
        Self::Format16bppArgb1555,
        Self::Format24bppRgb,
        Self::Format32bppRgb,
        Self::Format32bppArgb,
        Self::Format32bppPArgb,
        Self::Format48bppRgb,
        Self::Format64bppArgb,
        Self::Format64bppPArgb,
        Self::Format96bppRgb,
        Self::Format128bppRgba,
        Self::Format128bppPRgba,
    ];

    /// Capability record for this layout.
    pub const fn info(self) -> PixelFormatInfo {
        let (bpp, flags) = match self {
            Self::Format1bppIndexed => (1, F::INDEXED),
            Self::Format4bppIndexed => (4, F::INDEXED),
            Self::Format8bppIndexed => (8, F::INDEXED),
            Self::Format8bppGrayScale => (8, F::GRAYSCALE),
            Self::Format16bppGrayScale => (16, F::GRAYSCALE.union(F::PREFERS_64)),
            Self::Format32bppGrayScale => (
                32,
                F::GRAYSCALE.union(F::PREFERS_128).union(F::LINEAR_GAMMA),
            ),
            Self::Format16bppRgb555 | Self::Format16bppRgb565 => (16, F::empty()),
            Self::Format16bppArgb1555 => (16, F::HAS_ALPHA.union(F::SINGLE_BIT_ALPHA)),
            Self::Format24bppRgb => (24, F::empty()),
            Self::Format32bppRgb => (32, F::empty()),
            Self::Format32bppArgb => (32, F::HAS_ALPHA),
            Self::Format32bppPArgb => (32, F::HAS_ALPHA.union(F::PREMULTIPLIED)),
            Self::Format48bppRgb => (48, F::PREFERS_64),
            Self::Format64bppArgb => (64, F::HAS_ALPHA.union(F::PREFERS_64)),
            Self::Format64bppPArgb => (
                64,
                F::HAS_ALPHA.union(F::PREMULTIPLIED).union(F::PREFERS_64),
            ),
            Self::Format96bppRgb => (96, F::PREFERS_128.union(F::LINEAR_GAMMA)),
            Self::Format128bppRgba => (
                128,
                F::HAS_ALPHA.union(F::PREFERS_128).union(F::LINEAR_GAMMA),
            ),
            Self::Format128bppPRgba => (
                128,
                F::HAS_ALPHA
                    .union(F::PREMULTIPLIED)
                    .union(F::PREFERS_128)
                    .union(F::LINEAR_GAMMA),
            ),
        };
        PixelFormatInfo::from_parts(bpp, flags)
    }

    #[inline]
    pub const fn bits_per_pixel(self) -> u32 {
        self.info().bits_per_pixel()
    }

    #[inline]
    pub const fn is_indexed(self) -> bool {
        self.info().is_indexed()
    }

    /// Bytes per pixel for byte-aligned layouts, `None` for 1 and 4 bpp.
    pub const fn bytes_per_pixel(self) -> Option<usize> {
        let bpp = self.bits_per_pixel();
        if bpp % 8 == 0 {
            Some(bpp as usize / 8)
        } else {
            None
        }
    }
}
