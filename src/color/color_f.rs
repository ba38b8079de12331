use bytemuck::{Pod, Zeroable};

use super::blend;
use super::transfer::{linear_to_srgb_u8, linear_to_srgb_u16, unit_to_u8, unit_to_u16};
use super::{Color32, Color64, PColor32, PColor64};

/// 128-bit straight-alpha color with `f32` channels in linear light.
///
/// Channels are not clamped on construction, so out-of-range (HDR)
/// values survive storage in floating-point formats. Conversion to the
/// integer colors clamps to `[0, max]` and rounds to nearest.
#[derive(Clone, Copy, PartialEq, Default, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct ColorF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorF {
    pub const TRANSPARENT: ColorF = ColorF::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: ColorF = ColorF::new(1.0, 0.0, 0.0, 0.0);
    pub const WHITE: ColorF = ColorF::new(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(a: f32, r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(1.0, r, g, b)
    }

    #[inline]
    pub fn from_color32(c: Color32) -> Self {
        c.to_color_f()
    }

    #[inline]
    pub fn from_color64(c: Color64) -> Self {
        c.to_color_f()
    }

    /// Encode to sRGB 8-bit, clamping and rounding every channel.
    #[inline]
    pub fn to_color32(self) -> Color32 {
        Color32::new(
            unit_to_u8(self.a),
            linear_to_srgb_u8(self.r),
            linear_to_srgb_u8(self.g),
            linear_to_srgb_u8(self.b),
        )
    }

    #[inline]
    pub fn to_color64(self) -> Color64 {
        Color64::new(
            unit_to_u16(self.a),
            linear_to_srgb_u16(self.r),
            linear_to_srgb_u16(self.g),
            linear_to_srgb_u16(self.b),
        )
    }

    /// Clamp every channel into `[0, 1]`. NaN becomes 0.
    #[inline]
    pub fn clip(self) -> Self {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self::new(c(self.a), c(self.r), c(self.g), c(self.b))
    }

    #[inline]
    pub const fn to_opaque(self) -> Self {
        Self { a: 1.0, ..self }
    }

    #[inline]
    pub fn to_premultiplied(self) -> PColorF {
        if self.a >= 1.0 {
            return PColorF::new(self.a, self.r, self.g, self.b);
        }
        if self.a <= 0.0 {
            return PColorF::TRANSPARENT;
        }
        PColorF::new(self.a, self.r * self.a, self.g * self.a, self.b * self.a)
    }

    pub fn blend_with_background(self, back: ColorF) -> ColorF {
        if self.a >= 1.0 {
            return self;
        }
        if self.a <= 0.0 {
            return back.to_opaque();
        }
        blend::over_opaque_f(self, back)
    }

    pub fn blend_with(self, dst: ColorF) -> ColorF {
        if self.a >= 1.0 {
            return self;
        }
        if self.a <= 0.0 {
            return dst;
        }
        if dst.a <= 0.0 {
            return self;
        }
        if dst.a >= 1.0 {
            return blend::over_opaque_f(self, dst);
        }
        blend::over_f(self, dst)
    }

    /// Linear luminance (Rec. 709 weights).
    #[inline]
    pub fn brightness(self) -> f32 {
        super::linear_luma(self.r, self.g, self.b)
    }
}

impl From<Color32> for ColorF {
    fn from(c: Color32) -> Self {
        c.to_color_f()
    }
}

impl From<ColorF> for Color32 {
    fn from(c: ColorF) -> Self {
        c.to_color32()
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGBA<f32>> for ColorF {
    fn from(c: rgb::RGBA<f32>) -> Self {
        ColorF::new(c.a, c.r, c.g, c.b)
    }
}

#[cfg(feature = "rgb")]
impl From<ColorF> for rgb::RGBA<f32> {
    fn from(c: ColorF) -> Self {
        rgb::RGBA::new(c.r, c.g, c.b, c.a)
    }
}

/// 128-bit premultiplied-alpha color in linear light.
#[derive(Clone, Copy, PartialEq, Default, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct PColorF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl PColorF {
    pub const TRANSPARENT: PColorF = PColorF::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(a: f32, r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_straight(self) -> ColorF {
        if self.a >= 1.0 {
            return ColorF::new(self.a, self.r, self.g, self.b);
        }
        if self.a <= 0.0 {
            return ColorF::TRANSPARENT;
        }
        ColorF::new(self.a, self.r / self.a, self.g / self.a, self.b / self.a)
    }

    #[inline]
    pub fn to_pcolor32(self) -> PColor32 {
        self.to_straight().to_color32().to_premultiplied()
    }

    #[inline]
    pub fn to_pcolor64(self) -> PColor64 {
        self.to_straight().to_color64().to_premultiplied()
    }

    #[inline]
    pub fn blend_with(self, dst: PColorF) -> PColorF {
        if self.a >= 1.0 {
            return self;
        }
        if self.a <= 0.0 {
            return dst;
        }
        blend::over_premultiplied_f(self, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color32_roundtrip_through_linear_is_exact() {
        for v in 0..=255u8 {
            let c = Color32::new(v, v, 255 - v, v / 2);
            assert_eq!(ColorF::from_color32(c).to_color32(), c, "value {v}");
        }
    }

    #[test]
    fn to_color32_clamps_and_rounds() {
        let c = ColorF::new(2.0, -1.0, 1.5, 0.5).to_color32();
        assert_eq!(c.a, 255);
        assert_eq!(c.r, 0);
        assert_eq!(c.g, 255);
        assert_eq!(c.b, 188);
    }

    #[test]
    fn premultiplied_transparent_is_zero() {
        let p = ColorF::new(0.0, 0.3, 0.3, 0.3).to_premultiplied();
        assert_eq!(p, PColorF::TRANSPARENT);
        assert_eq!(PColorF::new(0.0, 0.1, 0.1, 0.1).to_straight(), ColorF::TRANSPARENT);
    }

    #[test]
    fn blend_identities() {
        let back = ColorF::new(0.4, 0.1, 0.2, 0.3);
        let solid = ColorF::from_rgb(0.9, 0.8, 0.7);
        assert_eq!(solid.blend_with(back), solid);
        assert_eq!(ColorF::TRANSPARENT.blend_with(back), back);
    }

    #[test]
    fn clip_handles_nan() {
        let c = ColorF::new(f32::NAN, 2.0, -3.0, 0.25).clip();
        assert_eq!(c, ColorF::new(0.0, 1.0, 0.0, 0.25));
    }
}
