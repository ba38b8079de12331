use core::fmt;
use core::str::FromStr;

use bytemuck::{Pod, Zeroable};

use super::blend;
use super::transfer::{linear_to_srgb_u8, srgb_u8_to_linear};
use super::{Color64, ColorF, PColor64, PColorF, WorkingColorSpace};
use crate::error::BitmapError;

/// 32-bit straight-alpha sRGB color.
///
/// The field order matches the in-memory layout of a little-endian
/// `0xAARRGGBB` value, so a `Color32` can be reinterpreted as a `u32`
/// (see [`Color32::to_argb`]) and read directly out of `Format32bppArgb`
/// rows.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Color32 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Color32 {
    pub const TRANSPARENT: Color32 = Color32::new(0, 0, 0, 0);
    pub const BLACK: Color32 = Color32::new(255, 0, 0, 0);
    pub const WHITE: Color32 = Color32::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r, a }
    }

    /// Opaque color from red, green and blue.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(255, r, g, b)
    }

    #[inline]
    pub const fn from_gray(v: u8) -> Self {
        Self::new(255, v, v, v)
    }

    /// From a packed `0xAARRGGBB` value.
    #[inline]
    pub const fn from_argb(argb: u32) -> Self {
        Self::new(
            (argb >> 24) as u8,
            (argb >> 16) as u8,
            (argb >> 8) as u8,
            argb as u8,
        )
    }

    /// Packed `0xAARRGGBB` value.
    #[inline]
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    #[inline]
    pub const fn to_opaque(self) -> Self {
        self.with_alpha(255)
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    #[inline]
    pub fn to_premultiplied(self) -> PColor32 {
        match self.a {
            255 => PColor32::new(255, self.r, self.g, self.b),
            0 => PColor32::TRANSPARENT,
            a => {
                let a32 = u32::from(a);
                let m = |c: u8| ((u32::from(c) * a32 + 127) / 255) as u8;
                PColor32::new(a, m(self.r), m(self.g), m(self.b))
            }
        }
    }

    #[inline]
    pub fn to_color64(self) -> Color64 {
        Color64::from_color32(self)
    }

    #[inline]
    pub fn to_pcolor64(self) -> PColor64 {
        self.to_color64().to_premultiplied()
    }

    /// Decode to linear light.
    #[inline]
    pub fn to_color_f(self) -> ColorF {
        ColorF::new(
            f32::from(self.a) / 255.0,
            srgb_u8_to_linear(self.r),
            srgb_u8_to_linear(self.g),
            srgb_u8_to_linear(self.b),
        )
    }

    #[inline]
    pub fn to_pcolor_f(self) -> PColorF {
        self.to_color_f().to_premultiplied()
    }

    /// Blend this color over `back`, which is treated as opaque.
    pub fn blend_with_background(self, back: Color32, space: WorkingColorSpace) -> Color32 {
        match self.a {
            255 => self,
            0 => back.to_opaque(),
            _ if space.is_linear() => blend::over_opaque_f(self.to_color_f(), back.to_color_f())
                .to_color32(),
            _ => blend::over_opaque32(self, back),
        }
    }

    /// Porter-Duff "over": this color composited onto `dst`.
    pub fn blend_with(self, dst: Color32, space: WorkingColorSpace) -> Color32 {
        match (self.a, dst.a) {
            (255, _) => self,
            (0, _) => dst,
            (_, 0) => self,
            (_, 255) => self.blend_with_background(dst, space),
            _ if space.is_linear() => {
                blend::over_f(self.to_color_f(), dst.to_color_f()).to_color32()
            }
            _ => blend::over32(self, dst),
        }
    }

    /// Perceived brightness of the color channels, ignoring alpha.
    pub fn brightness(self, space: WorkingColorSpace) -> u8 {
        if space.is_linear() {
            let f = self.to_color_f();
            linear_to_srgb_u8(super::linear_luma(f.r, f.g, f.b))
        } else {
            super::srgb_luma8(self.r, self.g, self.b)
        }
    }

    /// Grayscale equivalent, preserving alpha.
    pub fn to_gray(self, space: WorkingColorSpace) -> Color32 {
        let v = self.brightness(space);
        Color32::new(self.a, v, v, v)
    }
}

impl fmt::Debug for Color32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color32(#{:08X})", self.to_argb())
    }
}

impl From<u32> for Color32 {
    fn from(argb: u32) -> Self {
        Color32::from_argb(argb)
    }
}

impl From<Color32> for u32 {
    fn from(c: Color32) -> Self {
        c.to_argb()
    }
}

/// Parses `RRGGBB` or `AARRGGBB`, with or without a leading `#`.
impl FromStr for Color32 {
    type Err = BitmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || BitmapError::InvalidArgument(std::format!("invalid color {s:?}"));
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Color32::from_argb(0xFF00_0000 | value)),
            8 => Ok(Color32::from_argb(value)),
            _ => Err(invalid()),
        }
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGBA8> for Color32 {
    fn from(c: rgb::RGBA8) -> Self {
        Color32::new(c.a, c.r, c.g, c.b)
    }
}

#[cfg(feature = "rgb")]
impl From<Color32> for rgb::RGBA8 {
    fn from(c: Color32) -> Self {
        rgb::RGBA8::new(c.r, c.g, c.b, c.a)
    }
}

/// 32-bit premultiplied-alpha sRGB color. Same layout as [`Color32`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct PColor32 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl PColor32 {
    pub const TRANSPARENT: PColor32 = PColor32::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r, a }
    }

    #[inline]
    pub const fn from_argb(argb: u32) -> Self {
        Self::new(
            (argb >> 24) as u8,
            (argb >> 16) as u8,
            (argb >> 8) as u8,
            argb as u8,
        )
    }

    #[inline]
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Whether no color channel exceeds alpha.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.r <= self.a && self.g <= self.a && self.b <= self.a
    }

    /// Divide the color channels by alpha. Transparent yields `Color32::TRANSPARENT`.
    #[inline]
    pub fn to_straight(self) -> Color32 {
        match self.a {
            255 => Color32::new(255, self.r, self.g, self.b),
            0 => Color32::TRANSPARENT,
            a => {
                let a32 = u32::from(a);
                let d = |c: u8| ((u32::from(c) * 255 + a32 / 2) / a32).min(255) as u8;
                Color32::new(a, d(self.r), d(self.g), d(self.b))
            }
        }
    }

    #[inline]
    pub fn to_pcolor64(self) -> PColor64 {
        PColor64::new(
            u16::from(self.a) * 257,
            u16::from(self.r) * 257,
            u16::from(self.g) * 257,
            u16::from(self.b) * 257,
        )
    }

    /// Premultiplied "over" of this color onto `dst`.
    #[inline]
    pub fn blend_with(self, dst: PColor32) -> PColor32 {
        match self.a {
            255 => self,
            0 => dst,
            _ => blend::over_premultiplied32(self, dst),
        }
    }
}

impl fmt::Debug for PColor32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PColor32(#{:08X})", self.to_argb())
    }
}
