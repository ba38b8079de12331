//! Packed pixel layouts and their bit-level codecs.
//!
//! Widening replicates the top bits of a channel into the freed low bits
//! (`R8 = (R5 << 3) | (R5 >> 2)`), so full intensity stays full intensity.
//! Narrowing truncates. A down-then-up round trip is lossy.

use bytemuck::{Pod, Zeroable};

use super::{Color32, Color64, ColorF};

/// Multipliers that replicate an N-bit value across 8 bits, paired with
/// [`SHIFT_TABLE`]: `(v * MUL_TABLE[n]) >> SHIFT_TABLE[n]`.
const MUL_TABLE: [u32; 9] = [
    0,    // 0 bits
    0xff, // 1 bit:  0b11111111
    0x55, // 2 bits: 0b01010101
    0x49, // 3 bits: 0b01001001
    0x11, // 4 bits: 0b00010001
    0x21, // 5 bits: 0b00100001
    0x41, // 6 bits: 0b01000001
    0x81, // 7 bits: 0b10000001
    0x01, // 8 bits: 0b00000001
];

const SHIFT_TABLE: [u32; 9] = [0, 0, 0, 1, 0, 2, 4, 6, 0];

/// Scale an N-bit channel (N <= 8) to the full 8-bit range.
#[inline]
pub(crate) const fn expand_to_u8(v: u32, bits: usize) -> u8 {
    ((v * MUL_TABLE[bits]) >> SHIFT_TABLE[bits]) as u8
}

// ── 16-bit RGB ──────────────────────────────────────────────────────

/// 16 bits: `x RRRRR GGGGG BBBBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Pod, Zeroable)]
#[repr(transparent)]
pub struct Rgb555(pub u16);

impl Rgb555 {
    /// Alpha is ignored; callers blend beforehand.
    #[inline]
    pub const fn from_color32(c: Color32) -> Self {
        Rgb555(((c.r as u16 >> 3) << 10) | ((c.g as u16 >> 3) << 5) | (c.b as u16 >> 3))
    }

    #[inline]
    pub const fn to_color32(self) -> Color32 {
        let v = self.0 as u32;
        Color32::from_rgb(
            expand_to_u8((v >> 10) & 0x1F, 5),
            expand_to_u8((v >> 5) & 0x1F, 5),
            expand_to_u8(v & 0x1F, 5),
        )
    }
}

/// 16 bits: `RRRRR GGGGGG BBBBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Pod, Zeroable)]
#[repr(transparent)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    #[inline]
    pub const fn from_color32(c: Color32) -> Self {
        Rgb565(((c.r as u16 >> 3) << 11) | ((c.g as u16 >> 2) << 5) | (c.b as u16 >> 3))
    }

    #[inline]
    pub const fn to_color32(self) -> Color32 {
        let v = self.0 as u32;
        Color32::from_rgb(
            expand_to_u8((v >> 11) & 0x1F, 5),
            expand_to_u8((v >> 5) & 0x3F, 6),
            expand_to_u8(v & 0x1F, 5),
        )
    }
}

/// 16 bits: `A RRRRR GGGGG BBBBB` with a single transparency bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Pod, Zeroable)]
#[repr(transparent)]
pub struct Argb1555(pub u16);

impl Argb1555 {
    pub const TRANSPARENT: Argb1555 = Argb1555(0);

    /// The alpha bit is set for any non-zero alpha.
    #[inline]
    pub const fn from_color32(c: Color32) -> Self {
        let alpha = if c.a == 0 { 0 } else { 0x8000 };
        Argb1555(alpha | Rgb555::from_color32(c).0)
    }

    #[inline]
    pub const fn to_color32(self) -> Color32 {
        let c = Rgb555(self.0 & 0x7FFF).to_color32();
        if self.0 & 0x8000 == 0 {
            c.with_alpha(0)
        } else {
            c
        }
    }
}

// ── Byte-aligned RGB ────────────────────────────────────────────────

/// 24 bits, stored B, G, R.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct Rgb24 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Rgb24 {
    #[inline]
    pub const fn from_color32(c: Color32) -> Self {
        Rgb24 {
            b: c.b,
            g: c.g,
            r: c.r,
        }
    }

    #[inline]
    pub const fn to_color32(self) -> Color32 {
        Color32::from_rgb(self.r, self.g, self.b)
    }
}

/// 48 bits, 16 bits per channel, stored B, G, R.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct Rgb48 {
    pub b: u16,
    pub g: u16,
    pub r: u16,
}

impl Rgb48 {
    #[inline]
    pub const fn from_color64(c: Color64) -> Self {
        Rgb48 {
            b: c.b,
            g: c.g,
            r: c.r,
        }
    }

    #[inline]
    pub const fn to_color64(self) -> Color64 {
        Color64::from_rgb(self.r, self.g, self.b)
    }
}

/// 96 bits, linear `f32` channels, stored R, G, B.
#[derive(Clone, Copy, PartialEq, Default, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct RgbF96 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbF96 {
    #[inline]
    pub const fn from_color_f(c: ColorF) -> Self {
        RgbF96 {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }

    #[inline]
    pub const fn to_color_f(self) -> ColorF {
        ColorF::from_rgb(self.r, self.g, self.b)
    }
}
