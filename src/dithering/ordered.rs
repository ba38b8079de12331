use super::{Ditherer, DitheringSession};
use crate::color::Color32;
use crate::context::OperationContext;
use crate::data::ReadableBitmapData;
use crate::quantizing::QuantizingSession;

/// 8x8 Bayer threshold matrix, values `0..64`.
const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Ordered dithering with an 8x8 Bayer matrix.
///
/// Each pixel is offset by a position-dependent amount before quantizing.
/// Stateless, so parallel copies stay parallel.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrderedDitherer {
    strength: Option<f32>,
}

impl OrderedDitherer {
    pub fn bayer8x8() -> Self {
        Self::default()
    }

    /// Peak-to-peak offset in 8-bit channel units. Without it the strength
    /// is the widest gap between the levels the quantizer produces for a
    /// gray ramp.
    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = Some(strength.clamp(0.0, 255.0));
        self
    }
}

impl Ditherer for OrderedDitherer {
    fn initialize<'a>(
        &self,
        _source: &dyn ReadableBitmapData,
        quantizer: &'a dyn QuantizingSession,
        _ctx: &OperationContext<'_>,
    ) -> Option<Box<dyn DitheringSession + 'a>> {
        let strength = self.strength.unwrap_or_else(|| calibrate(quantizer));
        log::debug!("ordered dithering with strength {strength}");
        Some(Box::new(OrderedSession {
            quantizer,
            strength,
        }))
    }
}

/// Widest gap between consecutive output levels of any channel when
/// quantizing black to white; 0 when every level survives.
fn calibrate(quantizer: &dyn QuantizingSession) -> f32 {
    let mut seen = [[false; 256]; 3];
    for v in 0..=255u8 {
        let q = quantizer.quantize(Color32::from_gray(v));
        seen[0][q.r as usize] = true;
        seen[1][q.g as usize] = true;
        seen[2][q.b as usize] = true;
    }
    let mut widest = 0;
    for channel in &seen {
        let mut prev: Option<usize> = None;
        for (level, _) in channel.iter().enumerate().filter(|(_, hit)| **hit) {
            if let Some(p) = prev {
                widest = widest.max(level - p);
            }
            prev = Some(level);
        }
    }
    if widest <= 1 { 0.0 } else { widest as f32 }
}

struct OrderedSession<'a> {
    quantizer: &'a dyn QuantizingSession,
    strength: f32,
}

impl DitheringSession for OrderedSession<'_> {
    fn is_sequential(&self) -> bool {
        false
    }

    fn dither(&self, color: Color32, x: usize, y: usize) -> Color32 {
        if self.strength == 0.0 || color.a < self.quantizer.alpha_threshold() {
            return self.quantizer.quantize(color);
        }
        let m = f32::from(BAYER8[y % 8][x % 8]);
        let offset = ((m + 0.5) / 64.0 - 0.5) * self.strength;
        let shift = |v: u8| (f32::from(v) + offset).round().clamp(0.0, 255.0) as u8;
        self.quantizer.quantize(Color32::new(
            color.a,
            shift(color.r),
            shift(color.g),
            shift(color.b),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BitmapDataBuilder;
    use crate::format::KnownPixelFormat;
    use crate::quantizing::{PredefinedColorsQuantizer, Quantizer};

    #[test]
    fn matrix_is_a_permutation() {
        let mut seen = [false; 64];
        for row in BAYER8 {
            for v in row {
                assert!(!seen[v as usize]);
                seen[v as usize] = true;
            }
        }
    }

    #[test]
    fn half_gray_becomes_half_white() {
        let source = BitmapDataBuilder::new(8, 8, KnownPixelFormat::Format24bppRgb)
            .allocate()
            .unwrap();
        let ctx = OperationContext::unstoppable();
        let q = PredefinedColorsQuantizer::black_and_white(Color32::BLACK, 128)
            .initialize(&source, &ctx)
            .unwrap();
        let d = OrderedDitherer::bayer8x8()
            .initialize(&source, &*q, &ctx)
            .unwrap();
        assert!(!d.is_sequential());
        let mut white = 0;
        for y in 0..8 {
            for x in 0..8 {
                if d.dither(Color32::from_gray(128), x, y) == Color32::WHITE {
                    white += 1;
                }
            }
        }
        assert_eq!(white, 32);
        assert_eq!(d.dither(Color32::WHITE, 0, 0), Color32::WHITE);
        assert_eq!(d.dither(Color32::BLACK, 7, 0), Color32::BLACK);
    }

    #[test]
    fn lossless_quantizer_needs_no_dithering() {
        let source = BitmapDataBuilder::new(1, 1, KnownPixelFormat::Format24bppRgb)
            .allocate()
            .unwrap();
        let q = PredefinedColorsQuantizer::rgb888(Color32::BLACK)
            .initialize(&source, &OperationContext::unstoppable())
            .unwrap();
        assert_eq!(calibrate(&*q), 0.0);
    }
}
