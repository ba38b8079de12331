use std::sync::Arc;

use super::{Quantizer, QuantizingSession};
use crate::color::{Argb1555, Color32, Rgb555, Rgb565, WorkingColorSpace};
use crate::context::OperationContext;
use crate::data::{BitmapDataInfo, ReadableBitmapData};
use crate::format::KnownPixelFormat;
use crate::palette::Palette;

#[derive(Clone, Debug)]
enum Kind {
    Palette(Arc<Palette>),
    Argb8888,
    Rgb888,
    Rgb565,
    Rgb555,
    Argb1555,
    Grayscale,
    BlackAndWhite { white_threshold: u8 },
}

/// Quantizer with a fixed color set: a palette, or the colors a pixel
/// format can represent.
///
/// The source is never inspected, so initialization is free and the
/// results are the same for every image.
///
/// ```
/// use zenblit::{Color32, PredefinedColorsQuantizer};
///
/// let quantizer = PredefinedColorsQuantizer::rgb565(Color32::BLACK);
/// # let _ = quantizer;
/// ```
#[derive(Clone, Debug)]
pub struct PredefinedColorsQuantizer {
    kind: Kind,
    back_color: Color32,
    alpha_threshold: u8,
    color_space: WorkingColorSpace,
}

impl PredefinedColorsQuantizer {
    fn with_kind(kind: Kind, back_color: Color32, alpha_threshold: u8) -> Self {
        Self {
            kind,
            back_color: back_color.to_opaque(),
            alpha_threshold,
            color_space: WorkingColorSpace::Default,
        }
    }

    /// Nearest entry of `palette`, using the palette's back color, alpha
    /// threshold and working color space.
    pub fn from_palette(palette: Arc<Palette>) -> Self {
        let back_color = palette.back_color();
        let alpha_threshold = palette.alpha_threshold();
        let color_space = palette.working_color_space();
        Self::with_kind(Kind::Palette(palette), back_color, alpha_threshold)
            .with_working_color_space(color_space)
    }

    /// Full 32-bit color; alpha below the threshold becomes transparent.
    pub fn argb8888(back_color: Color32, alpha_threshold: u8) -> Self {
        Self::with_kind(Kind::Argb8888, back_color, alpha_threshold)
    }

    pub fn rgb888(back_color: Color32) -> Self {
        Self::with_kind(Kind::Rgb888, back_color, 0)
    }

    pub fn rgb565(back_color: Color32) -> Self {
        Self::with_kind(Kind::Rgb565, back_color, 0)
    }

    pub fn rgb555(back_color: Color32) -> Self {
        Self::with_kind(Kind::Rgb555, back_color, 0)
    }

    pub fn argb1555(back_color: Color32, alpha_threshold: u8) -> Self {
        Self::with_kind(Kind::Argb1555, back_color, alpha_threshold)
    }

    /// 256 shades of gray.
    pub fn grayscale(back_color: Color32) -> Self {
        Self::with_kind(Kind::Grayscale, back_color, 0)
    }

    /// Black for brightness below `white_threshold`, white otherwise.
    pub fn black_and_white(back_color: Color32, white_threshold: u8) -> Self {
        Self::with_kind(Kind::BlackAndWhite { white_threshold }, back_color, 0)
    }

    /// The colors `target` can store, with its back color and alpha threshold.
    pub fn for_target<T: BitmapDataInfo + ?Sized>(target: &T) -> Self {
        let info = target.pixel_format();
        let back = target.back_color();
        let threshold = target.alpha_threshold();
        let quantizer = match (target.known_format(), target.palette()) {
            (_, Some(palette)) => return Self::from_palette(Arc::clone(palette)),
            (Some(KnownPixelFormat::Format16bppRgb565), _) => Self::rgb565(back),
            (Some(KnownPixelFormat::Format16bppRgb555), _) => Self::rgb555(back),
            (Some(KnownPixelFormat::Format16bppArgb1555), _) => Self::argb1555(back, threshold),
            _ if info.is_grayscale() => Self::grayscale(back),
            _ if info.has_alpha() => Self::argb8888(back, threshold),
            _ => Self::rgb888(back),
        };
        quantizer.with_working_color_space(target.working_color_space())
    }

    pub fn with_working_color_space(mut self, space: WorkingColorSpace) -> Self {
        self.color_space = space;
        self
    }

    fn session(&self) -> PredefinedSession {
        let palette = match &self.kind {
            Kind::Palette(palette) => Some(Arc::clone(palette)),
            Kind::BlackAndWhite { .. } => Some(Arc::new(
                Palette::black_and_white().with_back_color(self.back_color),
            )),
            Kind::Grayscale => Some(Arc::new(
                Palette::grayscale256().with_back_color(self.back_color),
            )),
            _ => None,
        };
        PredefinedSession {
            kind: self.kind.clone(),
            palette,
            back_color: self.back_color,
            alpha_threshold: self.alpha_threshold,
            color_space: self.color_space.resolve(false),
        }
    }
}

impl Quantizer for PredefinedColorsQuantizer {
    fn initialize(
        &self,
        _source: &dyn ReadableBitmapData,
        _ctx: &OperationContext<'_>,
    ) -> Option<Box<dyn QuantizingSession>> {
        Some(Box::new(self.session()))
    }
}

struct PredefinedSession {
    kind: Kind,
    palette: Option<Arc<Palette>>,
    back_color: Color32,
    alpha_threshold: u8,
    color_space: WorkingColorSpace,
}

impl PredefinedSession {
    #[inline]
    fn opaque(&self, c: Color32) -> Color32 {
        c.blend_with_background(self.back_color, self.color_space)
    }
}

impl QuantizingSession for PredefinedSession {
    fn palette(&self) -> Option<&Arc<Palette>> {
        self.palette.as_ref()
    }

    fn back_color(&self) -> Color32 {
        self.back_color
    }

    fn alpha_threshold(&self) -> u8 {
        self.alpha_threshold
    }

    fn working_color_space(&self) -> WorkingColorSpace {
        self.color_space
    }

    fn quantize(&self, c: Color32) -> Color32 {
        match &self.kind {
            Kind::Palette(palette) => palette.nearest_color(c),
            Kind::Argb8888 if c.a < self.alpha_threshold => Color32::TRANSPARENT,
            Kind::Argb8888 => c,
            Kind::Rgb888 => self.opaque(c),
            Kind::Rgb565 => Rgb565::from_color32(self.opaque(c)).to_color32(),
            Kind::Rgb555 => Rgb555::from_color32(self.opaque(c)).to_color32(),
            Kind::Argb1555 if c.a < self.alpha_threshold => Argb1555::TRANSPARENT.to_color32(),
            Kind::Argb1555 => Argb1555::from_color32(self.opaque(c)).to_color32(),
            Kind::Grayscale => self.opaque(c).to_gray(self.color_space),
            Kind::BlackAndWhite { white_threshold } => {
                if self.opaque(c).brightness(self.color_space) >= *white_threshold {
                    Color32::WHITE
                } else {
                    Color32::BLACK
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BitmapDataBuilder;

    fn session(q: &PredefinedColorsQuantizer) -> Box<dyn QuantizingSession> {
        let source = BitmapDataBuilder::new(1, 1, KnownPixelFormat::Format32bppArgb)
            .allocate()
            .unwrap();
        q.initialize(&source, &OperationContext::unstoppable()).unwrap()
    }

    #[test]
    fn rgb565_drops_low_bits() {
        let s = session(&PredefinedColorsQuantizer::rgb565(Color32::BLACK));
        assert_eq!(s.quantize(Color32::from_rgb(255, 255, 255)), Color32::WHITE);
        let q = s.quantize(Color32::from_rgb(0x13, 0x13, 0x13));
        assert_eq!(q, Color32::from_rgb(0x10, 0x10, 0x10));
        assert!(s.palette().is_none());
    }

    #[test]
    fn transparency_follows_threshold() {
        let s = session(&PredefinedColorsQuantizer::argb1555(Color32::WHITE, 128));
        assert_eq!(s.quantize(Color32::new(100, 255, 0, 0)).a, 0);
        assert_eq!(s.quantize(Color32::new(200, 255, 0, 0)).a, 255);

        let s = session(&PredefinedColorsQuantizer::rgb888(Color32::WHITE));
        assert_eq!(s.quantize(Color32::TRANSPARENT), Color32::WHITE);
    }

    #[test]
    fn black_and_white_results_are_palette_entries() {
        let s = session(&PredefinedColorsQuantizer::black_and_white(Color32::BLACK, 128));
        let palette = Arc::clone(s.palette().unwrap());
        for v in [0u8, 100, 127, 128, 200, 255] {
            let q = s.quantize(Color32::from_gray(v));
            assert!(palette.entries().contains(&q));
            assert_eq!(q == Color32::WHITE, v >= 128);
        }
    }

    #[test]
    fn target_shapes_the_quantizer() {
        let target = BitmapDataBuilder::new(2, 2, KnownPixelFormat::Format4bppIndexed)
            .allocate()
            .unwrap();
        let q = PredefinedColorsQuantizer::for_target(&target);
        let s = session(&q);
        assert!(Arc::ptr_eq(s.palette().unwrap(), target.palette().unwrap()));

        let gray = BitmapDataBuilder::new(2, 2, KnownPixelFormat::Format8bppGrayScale)
            .allocate()
            .unwrap();
        let s = session(&PredefinedColorsQuantizer::for_target(&gray));
        let q = s.quantize(Color32::from_rgb(255, 0, 0));
        assert_eq!((q.r, q.g, q.b), (76, 76, 76));
    }
}
