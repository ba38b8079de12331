//! Per-format pixel encoders and decoders.
//!
//! Every known layout has a zero-sized codec implementing [`PixelCodec`];
//! custom layouts go through [`CustomPixelFormat`]'s callbacks. Codecs work
//! on one row's bytes and trust the row cursor for bounds: `x` is always a
//! valid pixel of `row`.

mod custom;
mod float;
mod gray;
mod indexed;
mod packed16;
mod rgb;
mod wide;

use std::sync::Arc;

use bytemuck::Pod;

use crate::color::{Color32, Color64, ColorF, PColor32, PColor64, PColorF, WorkingColorSpace};
use crate::error::BitmapError;
use crate::format::KnownPixelFormat;
use crate::palette::Palette;

/// Per-row state a codec needs besides the bytes.
#[derive(Clone, Copy)]
pub(crate) struct CodecContext<'a> {
    pub palette: Option<&'a Palette>,
    /// Always opaque.
    pub back_color: Color32,
    pub alpha_threshold: u8,
    /// Already resolved against the format's gamma.
    pub color_space: WorkingColorSpace,
    /// Physical row width in pixels.
    pub width: usize,
    /// Physical row index.
    pub y: usize,
}

type Res<T> = Result<T, BitmapError>;

pub(crate) trait PixelCodec: Send + Sync {
    fn get_color32(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<Color32>;
    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, ctx: &CodecContext<'_>) -> Res<()>;

    fn get_pcolor32(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<PColor32> {
        Ok(self.get_color32(row, x, ctx)?.to_premultiplied())
    }

    fn set_pcolor32(
        &self,
        row: &mut [u8],
        x: usize,
        c: PColor32,
        ctx: &CodecContext<'_>,
    ) -> Res<()> {
        self.set_color32(row, x, c.to_straight(), ctx)
    }

    fn get_color64(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<Color64> {
        Ok(self.get_color32(row, x, ctx)?.to_color64())
    }

    fn set_color64(&self, row: &mut [u8], x: usize, c: Color64, ctx: &CodecContext<'_>) -> Res<()> {
        self.set_color32(row, x, c.to_color32(), ctx)
    }

    fn get_pcolor64(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<PColor64> {
        Ok(self.get_color64(row, x, ctx)?.to_premultiplied())
    }

    fn set_pcolor64(
        &self,
        row: &mut [u8],
        x: usize,
        c: PColor64,
        ctx: &CodecContext<'_>,
    ) -> Res<()> {
        self.set_color64(row, x, c.to_straight(), ctx)
    }

    fn get_color_f(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<ColorF> {
        Ok(self.get_color32(row, x, ctx)?.to_color_f())
    }

    fn set_color_f(&self, row: &mut [u8], x: usize, c: ColorF, ctx: &CodecContext<'_>) -> Res<()> {
        self.set_color32(row, x, c.to_color32(), ctx)
    }

    fn get_pcolor_f(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<PColorF> {
        Ok(self.get_color_f(row, x, ctx)?.to_premultiplied())
    }

    fn set_pcolor_f(
        &self,
        row: &mut [u8],
        x: usize,
        c: PColorF,
        ctx: &CodecContext<'_>,
    ) -> Res<()> {
        self.set_color_f(row, x, c.to_straight(), ctx)
    }

    fn get_color_index(&self, _row: &[u8], _x: usize, _ctx: &CodecContext<'_>) -> Res<u32> {
        Err(not_indexed())
    }

    fn set_color_index(
        &self,
        _row: &mut [u8],
        _x: usize,
        _index: u32,
        _ctx: &CodecContext<'_>,
    ) -> Res<()> {
        Err(not_indexed())
    }
}

pub(crate) fn not_indexed() -> BitmapError {
    BitmapError::InvalidState("color index access requires an indexed pixel format".into())
}

/// Codec for a built-in layout.
pub(crate) fn known_codec(format: KnownPixelFormat) -> Arc<dyn PixelCodec> {
    use KnownPixelFormat as K;
    match format {
        K::Format1bppIndexed => Arc::new(indexed::Indexed1),
        K::Format4bppIndexed => Arc::new(indexed::Indexed4),
        K::Format8bppIndexed => Arc::new(indexed::Indexed8),
        K::Format8bppGrayScale => Arc::new(gray::Gray8),
        K::Format16bppGrayScale => Arc::new(gray::Gray16),
        K::Format32bppGrayScale => Arc::new(float::GrayF32),
        K::Format16bppRgb555 => Arc::new(packed16::Rgb555Codec),
        K::Format16bppRgb565 => Arc::new(packed16::Rgb565Codec),
        K::Format16bppArgb1555 => Arc::new(packed16::Argb1555Codec),
        K::Format24bppRgb => Arc::new(rgb::Rgb24Codec),
        K::Format32bppRgb => Arc::new(rgb::Rgb32),
        K::Format32bppArgb => Arc::new(rgb::Argb32),
        K::Format32bppPArgb => Arc::new(rgb::PArgb32),
        K::Format48bppRgb => Arc::new(wide::Rgb48Codec),
        K::Format64bppArgb => Arc::new(wide::Argb64),
        K::Format64bppPArgb => Arc::new(wide::PArgb64),
        K::Format96bppRgb => Arc::new(float::RgbF96Codec),
        K::Format128bppRgba => Arc::new(float::RgbaF128),
        K::Format128bppPRgba => Arc::new(float::PRgbaF128),
    }
}

// ── Shared helpers ──────────────────────────────────────────────────

#[inline]
pub(crate) fn read_px<T: Pod>(row: &[u8], x: usize) -> T {
    let n = size_of::<T>();
    bytemuck::pod_read_unaligned(&row[x * n..(x + 1) * n])
}

#[inline]
pub(crate) fn write_px<T: Pod>(row: &mut [u8], x: usize, value: T) {
    let n = size_of::<T>();
    row[x * n..(x + 1) * n].copy_from_slice(bytemuck::bytes_of(&value));
}

/// Flatten a color for a format that cannot store it: opaque colors pass,
/// colors below the alpha threshold become the back color, the rest is
/// blended onto the back color.
#[inline]
pub(crate) fn flatten32(c: Color32, ctx: &CodecContext<'_>) -> Color32 {
    match c.a {
        255 => c,
        a if a < ctx.alpha_threshold => ctx.back_color,
        _ => c.blend_with_background(ctx.back_color, ctx.color_space),
    }
}

#[inline]
pub(crate) fn flatten64(c: Color64, ctx: &CodecContext<'_>) -> Color64 {
    match c.a {
        u16::MAX => c,
        a if ((a >> 8) as u8) < ctx.alpha_threshold => ctx.back_color.to_color64(),
        _ => c.blend_with_background(ctx.back_color.to_color64(), ctx.color_space),
    }
}

#[inline]
pub(crate) fn flatten_f(c: ColorF, ctx: &CodecContext<'_>) -> ColorF {
    if c.a >= 1.0 {
        return c;
    }
    if c.a * 255.0 < f32::from(ctx.alpha_threshold) {
        return ctx.back_color.to_color_f();
    }
    c.blend_with_background(ctx.back_color.to_color_f())
}
