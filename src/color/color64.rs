use core::fmt;

use bytemuck::{Pod, Zeroable};

use super::blend;
use super::transfer::{linear_to_srgb_u16, srgb_u16_to_linear};
use super::{Color32, ColorF, PColor32, WorkingColorSpace};

/// 64-bit straight-alpha sRGB color, 16 bits per channel.
///
/// Field order matches a little-endian `0xAAAARRRRGGGGBBBB` value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Color64 {
    pub b: u16,
    pub g: u16,
    pub r: u16,
    pub a: u16,
}

impl Color64 {
    pub const TRANSPARENT: Color64 = Color64::new(0, 0, 0, 0);
    pub const BLACK: Color64 = Color64::new(u16::MAX, 0, 0, 0);

    #[inline]
    pub const fn new(a: u16, r: u16, g: u16, b: u16) -> Self {
        Self { b, g, r, a }
    }

    #[inline]
    pub const fn from_rgb(r: u16, g: u16, b: u16) -> Self {
        Self::new(u16::MAX, r, g, b)
    }

    /// Widen by replicating each 8-bit channel into both bytes (`c * 257`).
    #[inline]
    pub const fn from_color32(c: Color32) -> Self {
        Self::new(
            c.a as u16 * 257,
            c.r as u16 * 257,
            c.g as u16 * 257,
            c.b as u16 * 257,
        )
    }

    /// Narrow by keeping the high byte of each channel.
    #[inline]
    pub const fn to_color32(self) -> Color32 {
        Color32::new(
            (self.a >> 8) as u8,
            (self.r >> 8) as u8,
            (self.g >> 8) as u8,
            (self.b >> 8) as u8,
        )
    }

    #[inline]
    pub const fn to_argb(self) -> u64 {
        (self.a as u64) << 48 | (self.r as u64) << 32 | (self.g as u64) << 16 | self.b as u64
    }

    #[inline]
    pub const fn from_argb(v: u64) -> Self {
        Self::new((v >> 48) as u16, (v >> 32) as u16, (v >> 16) as u16, v as u16)
    }

    #[inline]
    pub const fn to_opaque(self) -> Self {
        Self {
            a: u16::MAX,
            ..self
        }
    }

    #[inline]
    pub fn to_premultiplied(self) -> PColor64 {
        match self.a {
            u16::MAX => PColor64::new(u16::MAX, self.r, self.g, self.b),
            0 => PColor64::TRANSPARENT,
            a => {
                let a64 = u64::from(a);
                let m = |c: u16| ((u64::from(c) * a64 + 32767) / 65535) as u16;
                PColor64::new(a, m(self.r), m(self.g), m(self.b))
            }
        }
    }

    #[inline]
    pub fn to_color_f(self) -> ColorF {
        ColorF::new(
            f32::from(self.a) / 65535.0,
            srgb_u16_to_linear(self.r),
            srgb_u16_to_linear(self.g),
            srgb_u16_to_linear(self.b),
        )
    }

    pub fn blend_with_background(self, back: Color64, space: WorkingColorSpace) -> Color64 {
        match self.a {
            u16::MAX => self,
            0 => back.to_opaque(),
            _ if space.is_linear() => {
                blend::over_opaque_f(self.to_color_f(), back.to_color_f()).to_color64()
            }
            _ => blend::over_opaque64(self, back),
        }
    }

    pub fn blend_with(self, dst: Color64, space: WorkingColorSpace) -> Color64 {
        match (self.a, dst.a) {
            (u16::MAX, _) => self,
            (0, _) => dst,
            (_, 0) => self,
            (_, u16::MAX) => self.blend_with_background(dst, space),
            _ if space.is_linear() => blend::over_f(self.to_color_f(), dst.to_color_f()).to_color64(),
            _ => blend::over64(self, dst),
        }
    }

    pub fn brightness(self, space: WorkingColorSpace) -> u16 {
        if space.is_linear() {
            let f = self.to_color_f();
            linear_to_srgb_u16(super::linear_luma(f.r, f.g, f.b))
        } else {
            super::srgb_luma16(self.r, self.g, self.b)
        }
    }
}

impl fmt::Debug for Color64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color64(#{:016X})", self.to_argb())
    }
}

impl From<Color32> for Color64 {
    fn from(c: Color32) -> Self {
        Color64::from_color32(c)
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGBA<u16>> for Color64 {
    fn from(c: rgb::RGBA<u16>) -> Self {
        Color64::new(c.a, c.r, c.g, c.b)
    }
}

#[cfg(feature = "rgb")]
impl From<Color64> for rgb::RGBA<u16> {
    fn from(c: Color64) -> Self {
        rgb::RGBA::new(c.r, c.g, c.b, c.a)
    }
}

/// 64-bit premultiplied-alpha sRGB color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct PColor64 {
    pub b: u16,
    pub g: u16,
    pub r: u16,
    pub a: u16,
}

impl PColor64 {
    pub const TRANSPARENT: PColor64 = PColor64::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(a: u16, r: u16, g: u16, b: u16) -> Self {
        Self { b, g, r, a }
    }

    #[inline]
    pub fn to_straight(self) -> Color64 {
        match self.a {
            u16::MAX => Color64::new(u16::MAX, self.r, self.g, self.b),
            0 => Color64::TRANSPARENT,
            a => {
                let a64 = u64::from(a);
                let d = |c: u16| ((u64::from(c) * 65535 + a64 / 2) / a64).min(65535) as u16;
                Color64::new(a, d(self.r), d(self.g), d(self.b))
            }
        }
    }

    #[inline]
    pub const fn to_pcolor32(self) -> PColor32 {
        PColor32::new(
            (self.a >> 8) as u8,
            (self.r >> 8) as u8,
            (self.g >> 8) as u8,
            (self.b >> 8) as u8,
        )
    }

    #[inline]
    pub fn blend_with(self, dst: PColor64) -> PColor64 {
        match self.a {
            u16::MAX => self,
            0 => dst,
            _ => blend::over_premultiplied64(self, dst),
        }
    }
}

impl fmt::Debug for PColor64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PColor64(#{:04X}{:04X}{:04X}{:04X})",
            self.a, self.r, self.g, self.b
        )
    }
}
