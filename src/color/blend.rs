//! Channel-level blending kernels shared by the color types.

use super::{Color32, Color64, ColorF, PColor32, PColor64, PColorF};

// ── 8-bit sRGB ──────────────────────────────────────────────────────

#[inline]
fn mix8(src: u8, dst: u8, a: u32) -> u8 {
    ((u32::from(src) * a + u32::from(dst) * (255 - a) + 127) / 255) as u8
}

/// `src` over an opaque `back`.
#[inline]
pub(crate) fn over_opaque32(src: Color32, back: Color32) -> Color32 {
    let a = u32::from(src.a);
    Color32::new(
        255,
        mix8(src.r, back.r, a),
        mix8(src.g, back.g, a),
        mix8(src.b, back.b, a),
    )
}

/// `src` over a semi-transparent `dst`.
#[inline]
pub(crate) fn over32(src: Color32, dst: Color32) -> Color32 {
    let ws = u32::from(src.a) * 255;
    let wd = u32::from(dst.a) * (255 - u32::from(src.a));
    let total = ws + wd;
    if total == 0 {
        return Color32::TRANSPARENT;
    }
    let ch = |s: u8, d: u8| ((u32::from(s) * ws + u32::from(d) * wd + total / 2) / total) as u8;
    Color32::new(
        ((total + 127) / 255) as u8,
        ch(src.r, dst.r),
        ch(src.g, dst.g),
        ch(src.b, dst.b),
    )
}

#[inline]
pub(crate) fn over_premultiplied32(src: PColor32, dst: PColor32) -> PColor32 {
    let inv = 255 - u32::from(src.a);
    let add = |s: u8, d: u8| (u32::from(s) + (u32::from(d) * inv + 127) / 255).min(255) as u8;
    PColor32::new(
        add(src.a, dst.a),
        add(src.r, dst.r),
        add(src.g, dst.g),
        add(src.b, dst.b),
    )
}

// ── 16-bit sRGB ─────────────────────────────────────────────────────

#[inline]
fn mix16(src: u16, dst: u16, a: u64) -> u16 {
    ((u64::from(src) * a + u64::from(dst) * (65535 - a) + 32767) / 65535) as u16
}

#[inline]
pub(crate) fn over_opaque64(src: Color64, back: Color64) -> Color64 {
    let a = u64::from(src.a);
    Color64::new(
        u16::MAX,
        mix16(src.r, back.r, a),
        mix16(src.g, back.g, a),
        mix16(src.b, back.b, a),
    )
}

#[inline]
pub(crate) fn over64(src: Color64, dst: Color64) -> Color64 {
    let ws = u64::from(src.a) * 65535;
    let wd = u64::from(dst.a) * (65535 - u64::from(src.a));
    let total = ws + wd;
    if total == 0 {
        return Color64::TRANSPARENT;
    }
    let ch =
        |s: u16, d: u16| ((u64::from(s) * ws + u64::from(d) * wd + total / 2) / total) as u16;
    Color64::new(
        ((total + 32767) / 65535) as u16,
        ch(src.r, dst.r),
        ch(src.g, dst.g),
        ch(src.b, dst.b),
    )
}

#[inline]
pub(crate) fn over_premultiplied64(src: PColor64, dst: PColor64) -> PColor64 {
    let inv = 65535 - u64::from(src.a);
    let add =
        |s: u16, d: u16| (u64::from(s) + (u64::from(d) * inv + 32767) / 65535).min(65535) as u16;
    PColor64::new(
        add(src.a, dst.a),
        add(src.r, dst.r),
        add(src.g, dst.g),
        add(src.b, dst.b),
    )
}

// ── Float (linear) ──────────────────────────────────────────────────

#[inline]
pub(crate) fn over_opaque_f(src: ColorF, back: ColorF) -> ColorF {
    let a = src.a;
    let inv = 1.0 - a;
    ColorF::new(
        1.0,
        src.r * a + back.r * inv,
        src.g * a + back.g * inv,
        src.b * a + back.b * inv,
    )
}

#[inline]
pub(crate) fn over_f(src: ColorF, dst: ColorF) -> ColorF {
    let wd = dst.a * (1.0 - src.a);
    let out_a = src.a + wd;
    if out_a <= 0.0 {
        return ColorF::TRANSPARENT;
    }
    let ch = |s: f32, d: f32| (s * src.a + d * wd) / out_a;
    ColorF::new(out_a, ch(src.r, dst.r), ch(src.g, dst.g), ch(src.b, dst.b))
}

#[inline]
pub(crate) fn over_premultiplied_f(src: PColorF, dst: PColorF) -> PColorF {
    let inv = 1.0 - src.a;
    PColorF::new(
        src.a + dst.a * inv,
        src.r + dst.r * inv,
        src.g + dst.g * inv,
        src.b + dst.b * inv,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_red_over_opaque_blue() {
        let src = Color32::new(128, 255, 0, 0);
        let back = Color32::from_rgb(0, 0, 255);
        let c = over_opaque32(src, back);
        assert_eq!(c, Color32::new(255, 128, 0, 127));
    }

    #[test]
    fn complex_alpha_accumulates() {
        let src = Color32::new(128, 255, 0, 0);
        let dst = Color32::new(128, 0, 0, 255);
        let c = over32(src, dst);
        // 128 + 128 * 127 / 255 = 191.75
        assert_eq!(c.a, 192);
        assert!(c.r > c.b, "source must dominate: {c:?}");
    }

    #[test]
    fn premultiplied_over_matches_straight_for_opaque_dst() {
        let src = Color32::new(100, 200, 50, 10);
        let dst = Color32::from_rgb(20, 40, 250);
        let straight = over_opaque32(src, dst);
        let pre = over_premultiplied32(src.to_premultiplied(), dst.to_premultiplied());
        let back = pre.to_straight();
        assert_eq!(back.a, 255);
        for (x, y) in [(straight.r, back.r), (straight.g, back.g), (straight.b, back.b)] {
            assert!(x.abs_diff(y) <= 1, "{straight:?} vs {back:?}");
        }
    }

    #[test]
    fn float_over_transparent_is_source() {
        let src = ColorF::new(0.5, 0.2, 0.4, 0.6);
        let c = over_f(src, ColorF::TRANSPARENT);
        assert!((c.a - 0.5).abs() < 1e-6);
        assert!((c.r - 0.2).abs() < 1e-6);
    }
}
