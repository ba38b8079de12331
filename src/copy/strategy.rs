//! Per-row pixel loops for each copy strategy.

use std::sync::Arc;

use super::raw::{self, RawPlan};
use crate::color::{Color32, WorkingColorSpace};
use crate::data::{BitmapDataInfo, Row, RowMut};
use crate::dithering::DitheringSession;
use crate::error::BitmapError;
use crate::format::KnownPixelFormat;
use crate::quantizing::QuantizingSession;

/// Color type moved by a direct copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Repr {
    /// Palette indexes, when both sides share a palette.
    Index,
    Color32,
    PColor32,
    Color64,
    PColor64,
    ColorF,
    PColorF,
}

impl Repr {
    /// The narrowest color type that keeps everything both formats can hold.
    pub(super) fn select<S, T>(source: &S, target: &T) -> Repr
    where
        S: BitmapDataInfo + ?Sized,
        T: BitmapDataInfo + ?Sized,
    {
        let src = source.pixel_format();
        let dst = target.pixel_format();
        if src.is_indexed() && dst.is_indexed() {
            if let (Some(a), Some(b)) = (source.palette(), target.palette()) {
                if Arc::ptr_eq(a, b) || a.entries() == b.entries() {
                    return Repr::Index;
                }
            }
        }
        let premultiplied = dst.has_premultiplied_alpha();
        if dst.prefers_128() || (src.prefers_128() && dst.bits_per_pixel() > 32) {
            return if premultiplied { Repr::PColorF } else { Repr::ColorF };
        }
        if dst.prefers_64() && (src.prefers_64() || src.prefers_128()) {
            return if premultiplied {
                Repr::PColor64
            } else {
                Repr::Color64
            };
        }
        if premultiplied {
            Repr::PColor32
        } else {
            Repr::Color32
        }
    }
}

/// How partially transparent source pixels are composited.
#[derive(Clone, Copy, Debug)]
pub(super) struct Blend {
    pub space: WorkingColorSpace,
    /// Blended results with lower alpha are not written.
    pub threshold: u8,
    /// Blend premultiplied values directly (`Format32bppPArgb` in sRGB).
    pub premultiplied: bool,
}

impl Blend {
    pub(super) fn for_target<T: BitmapDataInfo + ?Sized>(target: &T) -> Self {
        let info = target.pixel_format();
        let space = target.working_color_space().resolve(info.linear_gamma());
        Self {
            space,
            threshold: if info.has_multi_level_alpha() {
                0
            } else {
                target.alpha_threshold()
            },
            premultiplied: target.known_format() == Some(KnownPixelFormat::Format32bppPArgb)
                && !space.is_linear(),
        }
    }

    /// `color` composited onto the target pixel, or `None` when nothing
    /// should be written.
    #[inline]
    fn over(&self, color: Color32, dst: &RowMut<'_>, x: usize) -> Result<Option<Color32>, BitmapError> {
        match color.a {
            255 => Ok(Some(color)),
            0 => Ok(None),
            _ => {
                let blended = color.blend_with(dst.get_color32(x)?, self.space);
                Ok((blended.a >= self.threshold).then_some(blended))
            }
        }
    }
}

pub(super) enum Strategy<'s> {
    Raw(RawPlan),
    Direct(Repr),
    Draw(Blend),
    Quantize {
        session: &'s dyn QuantizingSession,
        draw: Option<Blend>,
        skip_transparent: bool,
    },
    Dither {
        quantizer: &'s dyn QuantizingSession,
        session: &'s dyn DitheringSession,
        draw: Option<Blend>,
        skip_transparent: bool,
    },
}

impl Strategy<'_> {
    pub(super) fn name(&self) -> &'static str {
        match self {
            Strategy::Raw(_) => "raw",
            Strategy::Direct(Repr::Index) => "direct (index)",
            Strategy::Direct(Repr::Color32) => "direct (Color32)",
            Strategy::Direct(Repr::PColor32) => "direct (PColor32)",
            Strategy::Direct(Repr::Color64) => "direct (Color64)",
            Strategy::Direct(Repr::PColor64) => "direct (PColor64)",
            Strategy::Direct(Repr::ColorF) => "direct (ColorF)",
            Strategy::Direct(Repr::PColorF) => "direct (PColorF)",
            Strategy::Draw(_) => "draw",
            Strategy::Quantize { .. } => "quantized",
            Strategy::Dither { .. } => "dithered",
        }
    }

    /// Whether rows must be processed in order on one thread.
    pub(super) fn is_sequential(&self) -> bool {
        matches!(self, Strategy::Dither { session, .. } if session.is_sequential())
    }

    /// Process source row `src` (row `y` of the copied area) into `dst`
    /// starting at target column `tx`.
    pub(super) fn process_row(
        &self,
        src: &Row<'_>,
        dst: &mut RowMut<'_>,
        tx: usize,
        y: usize,
    ) -> Result<(), BitmapError> {
        let width = src.width();
        match self {
            Strategy::Raw(plan) => raw::copy_row(plan, src, dst),
            Strategy::Direct(repr) => direct_row(*repr, src, dst, tx)?,
            Strategy::Draw(blend) if blend.premultiplied => {
                for x in 0..width {
                    let c = src.get_color32(x)?;
                    match c.a {
                        255 => dst.set_color32(tx + x, c)?,
                        0 => {}
                        _ => {
                            let blended = c.to_premultiplied().blend_with(dst.get_pcolor32(tx + x)?);
                            dst.set_pcolor32(tx + x, blended)?;
                        }
                    }
                }
            }
            Strategy::Draw(blend) => {
                for x in 0..width {
                    if let Some(c) = blend.over(src.get_color32(x)?, dst, tx + x)? {
                        dst.set_color32(tx + x, c)?;
                    }
                }
            }
            Strategy::Quantize {
                session,
                draw,
                skip_transparent,
            } => {
                let threshold = session.alpha_threshold();
                for x in 0..width {
                    let Some(c) = composite(src.get_color32(x)?, *draw, dst, tx + x)? else {
                        continue;
                    };
                    if *skip_transparent && c.a < threshold {
                        continue;
                    }
                    dst.set_color32(tx + x, session.quantize(c))?;
                }
            }
            Strategy::Dither {
                quantizer,
                session,
                draw,
                skip_transparent,
            } => {
                let threshold = quantizer.alpha_threshold();
                for x in 0..width {
                    let Some(c) = composite(src.get_color32(x)?, *draw, dst, tx + x)? else {
                        continue;
                    };
                    if *skip_transparent && c.a < threshold {
                        continue;
                    }
                    dst.set_color32(tx + x, session.dither(c, x, y))?;
                }
            }
        }
        Ok(())
    }
}

/// Source color after optional compositing onto the target pixel. Drawing
/// skips fully transparent pixels.
#[inline]
fn composite(
    color: Color32,
    draw: Option<Blend>,
    dst: &RowMut<'_>,
    x: usize,
) -> Result<Option<Color32>, BitmapError> {
    match draw {
        None => Ok(Some(color)),
        Some(_) if color.a == 0 => Ok(None),
        Some(_) if color.a == 255 => Ok(Some(color)),
        Some(blend) => Ok(Some(color.blend_with(dst.get_color32(x)?, blend.space))),
    }
}

fn direct_row(repr: Repr, src: &Row<'_>, dst: &mut RowMut<'_>, tx: usize) -> Result<(), BitmapError> {
    let width = src.width();
    match repr {
        Repr::Index => {
            for x in 0..width {
                dst.set_color_index(tx + x, src.get_color_index(x)?)?;
            }
        }
        Repr::Color32 => {
            for x in 0..width {
                dst.set_color32(tx + x, src.get_color32(x)?)?;
            }
        }
        Repr::PColor32 => {
            for x in 0..width {
                dst.set_pcolor32(tx + x, src.get_pcolor32(x)?)?;
            }
        }
        Repr::Color64 => {
            for x in 0..width {
                dst.set_color64(tx + x, src.get_color64(x)?)?;
            }
        }
        Repr::PColor64 => {
            for x in 0..width {
                dst.set_pcolor64(tx + x, src.get_pcolor64(x)?)?;
            }
        }
        Repr::ColorF => {
            for x in 0..width {
                dst.set_color_f(tx + x, src.get_color_f(x)?)?;
            }
        }
        Repr::PColorF => {
            for x in 0..width {
                dst.set_pcolor_f(tx + x, src.get_pcolor_f(x)?)?;
            }
        }
    }
    Ok(())
}
