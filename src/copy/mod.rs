//! The copy engine: moving pixels between bitmap data of any formats.
//!
//! [`CopyRequest`] copies or draws a rectangle of one bitmap data onto
//! another. The engine picks the cheapest strategy that produces the
//! requested result:
//!
//! | Strategy | When |
//! |----------|------|
//! | raw | same built-in format and layout, no quantizer or ditherer |
//! | direct | any other plain copy; the color width follows the formats |
//! | draw | drawing a source that has alpha |
//! | quantized | a quantizer is given |
//! | dithered | a ditherer is given (with the target's own colors if no quantizer) |
//!
//! Areas at least [`PARALLEL_WIDTH_THRESHOLD`] pixels wide are split into
//! row partitions and processed on the rayon pool, unless the context asks
//! for sequential work or the dithering session needs ordered input.
//! Cancellation is reported as [`Completion::Cancelled`], not as an error;
//! rows already written stay written.
//!
//! [`CloneRequest`] builds a new bitmap data from a region of an existing
//! one through the same paths.

mod clone;
mod dispatch;
mod raw;
mod strategy;

pub use clone::CloneRequest;
pub use dispatch::PARALLEL_WIDTH_THRESHOLD;

use strategy::{Blend, Repr, Strategy};

use crate::context::{Completion, OperationContext, Parallelism};
use crate::data::{BitmapDataInfo, ClippedBitmapData, ReadableBitmapData, WritableBitmapData};
use crate::dithering::Ditherer;
use crate::error::BitmapError;
use crate::geometry::{Point, Rect};
use crate::quantizing::{PredefinedColorsQuantizer, Quantizer, QuantizingSession};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Overwrite target pixels.
    Copy,
    /// Alpha-blend source pixels onto the target.
    Draw,
}

/// A pending copy or draw of one bitmap data onto another.
///
/// ```
/// use zenblit::{BitmapDataBuilder, Color32, CopyRequest, KnownPixelFormat,
///     OperationContext, Point, Rect, WritableBitmapData};
///
/// let mut src = BitmapDataBuilder::new(16, 16, KnownPixelFormat::Format32bppArgb).allocate()?;
/// src.clear(Color32::new(128, 255, 0, 0))?;
/// let mut dst = BitmapDataBuilder::new(32, 32, KnownPixelFormat::Format24bppRgb)
///     .with_back_color(Color32::WHITE)
///     .allocate()?;
///
/// let done = CopyRequest::draw(&src, &mut dst)
///     .with_source_rect(Rect::new(0, 0, 8, 8))
///     .with_target(Point::new(4, 4))
///     .execute(&OperationContext::unstoppable())?;
/// assert!(done.is_finished());
/// # Ok::<(), zenblit::BitmapError>(())
/// ```
pub struct CopyRequest<'a> {
    source: &'a dyn ReadableBitmapData,
    target: &'a mut dyn WritableBitmapData,
    mode: Mode,
    source_rect: Option<Rect>,
    target_location: Point,
    quantizer: Option<&'a dyn Quantizer>,
    ditherer: Option<&'a dyn Ditherer>,
    skip_transparent: bool,
    parallelism: Option<Parallelism>,
}

impl<'a> CopyRequest<'a> {
    fn new(
        source: &'a dyn ReadableBitmapData,
        target: &'a mut dyn WritableBitmapData,
        mode: Mode,
    ) -> Self {
        Self {
            source,
            target,
            mode,
            source_rect: None,
            target_location: Point::default(),
            quantizer: None,
            ditherer: None,
            skip_transparent: false,
            parallelism: None,
        }
    }

    /// Overwrite the target area with source pixels.
    pub fn copy(source: &'a dyn ReadableBitmapData, target: &'a mut dyn WritableBitmapData) -> Self {
        Self::new(source, target, Mode::Copy)
    }

    /// Blend source pixels onto the target with their alpha.
    pub fn draw(source: &'a dyn ReadableBitmapData, target: &'a mut dyn WritableBitmapData) -> Self {
        Self::new(source, target, Mode::Draw)
    }

    /// Area of the source to copy. Defaults to the whole source.
    pub fn with_source_rect(mut self, rect: Rect) -> Self {
        self.source_rect = Some(rect);
        self
    }

    /// Target position of the source area's top-left pixel.
    pub fn with_target(mut self, location: Point) -> Self {
        self.target_location = location;
        self
    }

    pub fn with_quantizer(mut self, quantizer: &'a dyn Quantizer) -> Self {
        self.quantizer = Some(quantizer);
        self
    }

    /// Dither with `ditherer`. Without a quantizer the target's own color
    /// set is used.
    pub fn with_ditherer(mut self, ditherer: &'a dyn Ditherer) -> Self {
        self.ditherer = Some(ditherer);
        self
    }

    /// When quantizing, leave target pixels alone where the source is
    /// below the quantizer's alpha threshold.
    pub fn skip_transparent(mut self, skip: bool) -> Self {
        self.skip_transparent = skip;
        self
    }

    /// Overrides the context's parallelism for this request.
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Clip the areas to both bitmaps and run the copy.
    ///
    /// An area that clips to nothing finishes immediately. A quantizer or
    /// ditherer that declines to start a session is an
    /// `ExternalContractViolation` unless the context was cancelled.
    pub fn execute(self, ctx: &OperationContext<'_>) -> Result<Completion, BitmapError> {
        if self.source.is_disposed() || self.target.is_disposed() {
            return Err(BitmapError::disposed());
        }
        let src_bounds = self.source.bounds();
        let mut src_rect = match self.source_rect {
            Some(rect) => src_bounds.intersect(rect),
            None => src_bounds,
        };
        let at = self.target_location;
        let dst_rect = self
            .target
            .bounds()
            .intersect(Rect::new(at.x, at.y, src_rect.width, src_rect.height));
        if src_rect.is_empty() || dst_rect.is_empty() {
            log::trace!("copy area is empty after clipping");
            return Ok(Completion::Finished);
        }
        src_rect.width = dst_rect.width;
        src_rect.height = dst_rect.height;

        let source = ClippedBitmapData::new(self.source, src_rect)?;
        let target = self.target;
        let parallelism = self.parallelism.unwrap_or(ctx.parallelism());
        let options = Options {
            mode: self.mode,
            skip_transparent: self.skip_transparent,
            parallelism,
        };

        if self.quantizer.is_some() || self.ditherer.is_some() {
            let fallback;
            let quantizer: &dyn Quantizer = match self.quantizer {
                Some(q) => q,
                None => {
                    fallback = PredefinedColorsQuantizer::for_target(&*target);
                    &fallback
                }
            };
            let Some(session) = quantizer.initialize(&source, ctx) else {
                return missing_session(ctx, "quantizer");
            };
            return quantized_copy(
                &source,
                target,
                at,
                &*session,
                self.ditherer,
                options,
                ctx,
            );
        }

        let strategy = if self.mode == Mode::Draw && has_alpha(&source) {
            Strategy::Draw(Blend::for_target(&*target))
        } else if let Some(plan) = raw::plan(&source, &*target, at.x) {
            Strategy::Raw(plan)
        } else {
            Strategy::Direct(Repr::select(&source, &*target))
        };
        dispatch::run(&source, target, at, &strategy, parallelism, ctx)
    }
}

#[derive(Clone, Copy, Debug)]
struct Options {
    mode: Mode,
    skip_transparent: bool,
    parallelism: Parallelism,
}

/// Copy through an already initialized quantizing session.
fn quantized_copy(
    source: &ClippedBitmapData<'_>,
    target: &mut dyn WritableBitmapData,
    at: Point,
    quantizer: &dyn QuantizingSession,
    ditherer: Option<&dyn Ditherer>,
    options: Options,
    ctx: &OperationContext<'_>,
) -> Result<Completion, BitmapError> {
    let draw = (options.mode == Mode::Draw).then(|| Blend::for_target(&*target));
    let dithering = match ditherer {
        Some(ditherer) => match ditherer.initialize(source, quantizer, ctx) {
            Some(session) => Some(session),
            None => return missing_session(ctx, "ditherer"),
        },
        None => None,
    };
    let strategy = match &dithering {
        Some(session) => Strategy::Dither {
            quantizer,
            session: &**session,
            draw,
            skip_transparent: options.skip_transparent,
        },
        None => Strategy::Quantize {
            session: quantizer,
            draw,
            skip_transparent: options.skip_transparent,
        },
    };
    dispatch::run(source, target, at, &strategy, options.parallelism, ctx)
}

fn has_alpha<T: BitmapDataInfo + ?Sized>(data: &T) -> bool {
    data.pixel_format().has_alpha() || data.palette().is_some_and(|p| p.has_alpha())
}

/// A session factory returned nothing: fine if we were cancelled meanwhile.
fn missing_session(ctx: &OperationContext<'_>, what: &str) -> Result<Completion, BitmapError> {
    match ctx.check() {
        Err(reason) => {
            log::trace!("{what} session not created: cancelled");
            Ok(Completion::Cancelled(reason))
        }
        Ok(()) => Err(BitmapError::ExternalContractViolation(std::format!(
            "{what} returned no session"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::color::Color32;
    use crate::data::BitmapDataBuilder;
    use crate::format::KnownPixelFormat;
    use crate::palette::Palette;
    use crate::{BitmapData, OwnedBuffer};

    /// Deterministic non-trivial content written through the color API.
    fn pattern(format: KnownPixelFormat, palette: Option<&Arc<Palette>>) -> BitmapData<OwnedBuffer> {
        let mut builder = BitmapDataBuilder::new(24, 6, format);
        if let Some(palette) = palette {
            builder = builder.with_palette(Arc::clone(palette));
        }
        let mut bitmap = builder.allocate().unwrap();
        for y in 0..6 {
            for x in 0..24 {
                let v = (x * 37 + y * 91) as u8;
                let a = if x % 5 == 0 { 255 } else { v | 0x80 };
                bitmap
                    .set_color32(x, y, Color32::new(a, v, v.wrapping_mul(3), 255 - v))
                    .unwrap();
            }
        }
        bitmap
    }

    fn blank(format: KnownPixelFormat, palette: Option<&Arc<Palette>>) -> BitmapData<OwnedBuffer> {
        let mut builder = BitmapDataBuilder::new(24, 6, format);
        if let Some(palette) = palette {
            builder = builder.with_palette(Arc::clone(palette));
        }
        builder.allocate().unwrap()
    }

    #[test]
    fn raw_and_direct_copies_agree() {
        let shared = [
            Arc::new(Palette::black_and_white()),
            Arc::new(Palette::grayscale16()),
            Arc::new(Palette::grayscale256()),
        ];
        let ctx = OperationContext::unstoppable();
        let area = Rect::new(8, 1, 16, 4);
        let at = Point::new(0, 2);
        for format in KnownPixelFormat::ALL {
            let palette = match format.bits_per_pixel() {
                1 if format.is_indexed() => Some(&shared[0]),
                4 if format.is_indexed() => Some(&shared[1]),
                8 if format.is_indexed() => Some(&shared[2]),
                _ => None,
            };
            let src = pattern(format, palette);

            let mut via_raw = blank(format, palette);
            let view = ClippedBitmapData::new(&src, area).unwrap();
            assert!(raw::plan(&view, &via_raw, at.x).is_some(), "{format:?}");
            CopyRequest::copy(&src, &mut via_raw)
                .with_source_rect(area)
                .with_target(at)
                .execute(&ctx)
                .unwrap();

            let mut via_direct = blank(format, palette);
            let strategy = Strategy::Direct(Repr::select(&view, &via_direct));
            let done = dispatch::run(
                &view,
                &mut via_direct,
                at,
                &strategy,
                Parallelism::Sequential,
                &ctx,
            )
            .unwrap();
            assert!(done.is_finished());
            assert_eq!(
                via_raw.bytes().unwrap(),
                via_direct.bytes().unwrap(),
                "{format:?}"
            );
        }
    }

    /// Copy `area` of `src` to `at` twice, by bytes and pixel by pixel,
    /// into two equal targets, and return both target buffers.
    fn both_paths<S, T>(
        src: &BitmapData<S>,
        target: impl Fn() -> BitmapData<T>,
        area: Rect,
        at: Point,
    ) -> (Vec<u8>, Vec<u8>)
    where
        S: crate::PixelBuffer,
        T: crate::PixelBuffer,
    {
        let ctx = OperationContext::unstoppable();
        let view = ClippedBitmapData::new(src, area).unwrap();

        let mut via_raw = target();
        let plan = raw::plan(&view, &via_raw, at.x).expect("raw copy applies");
        dispatch::run(&view, &mut via_raw, at, &Strategy::Raw(plan), Parallelism::Sequential, &ctx)
            .unwrap();

        let mut via_direct = target();
        let strategy = Strategy::Direct(Repr::select(&view, &via_direct));
        dispatch::run(&view, &mut via_direct, at, &strategy, Parallelism::Sequential, &ctx)
            .unwrap();
        (
            via_raw.bytes().unwrap().to_vec(),
            via_direct.bytes().unwrap().to_vec(),
        )
    }

    #[test]
    fn raw_copies_normalize_unused_bits() {
        let area = Rect::new(1, 0, 3, 2);
        let at = Point::new(1, 1);

        // Padding byte left at zero or garbage by whoever filled the memory.
        let rgb32 = BitmapDataBuilder::new(4, 2, KnownPixelFormat::Format32bppRgb)
            .wrap(vec![0x0014_1312u32, 0x7716_1514, 0x0018_1716, 0x0011_2233, 0, 1, 2, 3])
            .unwrap();
        let (raw, direct) = both_paths(
            &rgb32,
            || {
                BitmapDataBuilder::new(4, 3, KnownPixelFormat::Format32bppRgb)
                    .allocate()
                    .unwrap()
            },
            area,
            at,
        );
        assert_eq!(raw, direct);
        assert_eq!(&raw[20..24], &[0x14, 0x15, 0x16, 0xFF]);

        // Top bit set in the unused position.
        let rgb555 = BitmapDataBuilder::new(4, 2, KnownPixelFormat::Format16bppRgb555)
            .wrap(vec![0x8421u16, 0xFFFF, 0x8000, 0x7FFF, 0x8001, 0x0001, 0xC000, 0x1234])
            .unwrap();
        let (raw, direct) = both_paths(
            &rgb555,
            || {
                BitmapDataBuilder::new(4, 3, KnownPixelFormat::Format16bppRgb555)
                    .allocate()
                    .unwrap()
            },
            area,
            at,
        );
        assert_eq!(raw, direct);

        // Transparent pixels that still carry color bits.
        let argb1555 = BitmapDataBuilder::new(4, 2, KnownPixelFormat::Format16bppArgb1555)
            .wrap(vec![0x7FFFu16, 0x1234, 0x8000, 0xFC00, 0x0001, 0x83E0, 0x0000, 0x7C1F])
            .unwrap();
        let (raw, direct) = both_paths(
            &argb1555,
            || {
                BitmapDataBuilder::new(4, 3, KnownPixelFormat::Format16bppArgb1555)
                    .allocate()
                    .unwrap()
            },
            area,
            at,
        );
        assert_eq!(raw, direct);
    }

    #[test]
    fn raw_copies_keep_target_row_padding() {
        // 13 pixels at 1bpp: the last 3 bits of every second byte are padding.
        let palette = Arc::new(Palette::black_and_white());
        let src = BitmapDataBuilder::new(13, 2, KnownPixelFormat::Format1bppIndexed)
            .with_palette(Arc::clone(&palette))
            .wrap(vec![0x00u8, 0xAF, 0xFF, 0x57])
            .unwrap();
        let (raw, direct) = both_paths(
            &src,
            || {
                BitmapDataBuilder::new(13, 2, KnownPixelFormat::Format1bppIndexed)
                    .with_palette(Arc::clone(&palette))
                    .wrap(vec![0x00u8, 0x02, 0x00, 0x05])
                    .unwrap()
            },
            Rect::new(8, 0, 5, 2),
            Point::new(8, 0),
        );
        assert_eq!(raw, direct);
        assert_eq!(raw, vec![0x00, 0xAA, 0x00, 0x55]);
    }

    #[test]
    fn area_is_clipped_to_both_sides() {
        let mut src = blank(KnownPixelFormat::Format32bppArgb, None);
        src.clear(Color32::WHITE).unwrap();
        let mut dst = BitmapDataBuilder::new(4, 4, KnownPixelFormat::Format32bppArgb)
            .allocate()
            .unwrap();
        CopyRequest::copy(&src, &mut dst)
            .with_source_rect(Rect::new(20, 4, 100, 100))
            .with_target(Point::new(2, 3))
            .execute(&OperationContext::unstoppable())
            .unwrap();
        assert_eq!(dst.get_color32(1, 3).unwrap(), Color32::TRANSPARENT);
        assert_eq!(dst.get_color32(2, 3).unwrap(), Color32::WHITE);
        assert_eq!(dst.get_color32(3, 3).unwrap(), Color32::WHITE);
        assert_eq!(dst.get_color32(2, 2).unwrap(), Color32::TRANSPARENT);

        let done = CopyRequest::copy(&src, &mut dst)
            .with_target(Point::new(4, 0))
            .execute(&OperationContext::unstoppable())
            .unwrap();
        assert!(done.is_finished());
    }

    struct Declines;

    impl Quantizer for Declines {
        fn initialize(
            &self,
            _source: &dyn ReadableBitmapData,
            _ctx: &OperationContext<'_>,
        ) -> Option<std::boxed::Box<dyn QuantizingSession>> {
            None
        }
    }

    #[test]
    fn missing_session_is_a_contract_violation() {
        let src = blank(KnownPixelFormat::Format24bppRgb, None);
        let mut dst = blank(KnownPixelFormat::Format24bppRgb, None);
        let err = CopyRequest::copy(&src, &mut dst)
            .with_quantizer(&Declines)
            .execute(&OperationContext::unstoppable())
            .unwrap_err();
        assert!(matches!(err, BitmapError::ExternalContractViolation(_)));
    }

    #[test]
    fn disposed_data_is_rejected() {
        let mut src = blank(KnownPixelFormat::Format24bppRgb, None);
        src.dispose();
        let mut dst = blank(KnownPixelFormat::Format24bppRgb, None);
        let err = CopyRequest::copy(&src, &mut dst)
            .execute(&OperationContext::unstoppable())
            .unwrap_err();
        assert!(matches!(err, BitmapError::InvalidState(_)));
    }
}
