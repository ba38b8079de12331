use std::sync::{Mutex, PoisonError};

use super::{Ditherer, DitheringSession};
use crate::color::Color32;
use crate::color::transfer::{linear_to_srgb_u8, srgb_u8_to_linear};
use crate::context::OperationContext;
use crate::data::ReadableBitmapData;
use crate::quantizing::QuantizingSession;

/// An error diffusion kernel.
///
/// Each entry sends `error * weight / divisor` to the pixel at `(dx, dy)`
/// from the current one. Kernels whose weights sum to less than the
/// divisor deliberately drop part of the error.
#[derive(Clone, Copy, Debug)]
pub struct Kernel {
    /// `(dx, dy, weight)`; `dy >= 0`, and `dx > 0` when `dy == 0`.
    pub entries: &'static [(i32, i32, u8)],
    pub divisor: u8,
    /// Largest `dy` in `entries`.
    pub max_dy: usize,
}

/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
    max_dy: 1,
};

/// Diffuses 6/8 of the error.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),
        (2, 0, 1),
        (-1, 1, 1),
        (0, 1, 1),
        (1, 1, 1),
        (0, 2, 1),
    ],
    divisor: 8,
    max_dy: 2,
};

/// ```text
///    X   2
///    1   1
/// ```
pub const SIERRA_LITE: Kernel = Kernel {
    entries: &[(1, 0, 2), (-1, 1, 1), (0, 1, 1)],
    divisor: 4,
    max_dy: 1,
};

/// Error diffusion dithering.
///
/// The quantization error of each pixel is pushed to its unprocessed
/// neighbors, so sessions are sequential: copies using them run on one
/// thread, top to bottom. Pixels below the quantizer's alpha threshold
/// neither receive nor spread error.
#[derive(Clone, Copy, Debug)]
pub struct ErrorDiffusionDitherer {
    kernel: Kernel,
}

impl ErrorDiffusionDitherer {
    pub fn new(kernel: Kernel) -> Self {
        Self { kernel }
    }

    pub fn floyd_steinberg() -> Self {
        Self::new(FLOYD_STEINBERG)
    }

    pub fn atkinson() -> Self {
        Self::new(ATKINSON)
    }

    pub fn sierra_lite() -> Self {
        Self::new(SIERRA_LITE)
    }
}

impl Default for ErrorDiffusionDitherer {
    fn default() -> Self {
        Self::floyd_steinberg()
    }
}

impl Ditherer for ErrorDiffusionDitherer {
    fn initialize<'a>(
        &self,
        source: &dyn ReadableBitmapData,
        quantizer: &'a dyn QuantizingSession,
        _ctx: &OperationContext<'_>,
    ) -> Option<Box<dyn DitheringSession + 'a>> {
        let width = source.width();
        Some(Box::new(DiffusionSession {
            quantizer,
            kernel: self.kernel,
            linear: quantizer.working_color_space().resolve(false).is_linear(),
            width,
            errors: Mutex::new(ErrorBuffer::new(width, self.kernel.max_dy + 1)),
        }))
    }
}

/// Accumulated error for the current row and the rows below it.
struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    /// Row index of `rows[0]`.
    y: usize,
}

impl ErrorBuffer {
    fn new(width: usize, depth: usize) -> Self {
        Self {
            rows: vec![vec![[0.0; 3]; width]; depth],
            y: 0,
        }
    }

    /// Make `rows[0]` hold row `y`. Moving backwards starts a new pass.
    fn seek(&mut self, y: usize) {
        if y < self.y || y - self.y >= self.rows.len() {
            for row in &mut self.rows {
                row.fill([0.0; 3]);
            }
        } else {
            for _ in self.y..y {
                self.rows.rotate_left(1);
                if let Some(last) = self.rows.last_mut() {
                    last.fill([0.0; 3]);
                }
            }
        }
        self.y = y;
    }
}

struct DiffusionSession<'a> {
    quantizer: &'a dyn QuantizingSession,
    kernel: Kernel,
    linear: bool,
    width: usize,
    errors: Mutex<ErrorBuffer>,
}

impl DiffusionSession<'_> {
    /// Working channel values: 0..=255 sRGB, or 0..=1 linear light.
    fn channels(&self, c: Color32) -> [f32; 3] {
        if self.linear {
            [c.r, c.g, c.b].map(srgb_u8_to_linear)
        } else {
            [c.r, c.g, c.b].map(f32::from)
        }
    }

    fn to_color(&self, a: u8, ch: [f32; 3]) -> Color32 {
        let [r, g, b] = if self.linear {
            ch.map(linear_to_srgb_u8)
        } else {
            ch.map(|v| v.round().clamp(0.0, 255.0) as u8)
        };
        Color32::new(a, r, g, b)
    }

    fn max_channel(&self) -> f32 {
        if self.linear { 1.0 } else { 255.0 }
    }
}

impl DitheringSession for DiffusionSession<'_> {
    fn is_sequential(&self) -> bool {
        true
    }

    fn dither(&self, color: Color32, x: usize, y: usize) -> Color32 {
        if color.a < self.quantizer.alpha_threshold() || x >= self.width {
            return self.quantizer.quantize(color);
        }
        let mut errors = self.errors.lock().unwrap_or_else(PoisonError::into_inner);
        errors.seek(y);

        let max = self.max_channel();
        let pending = errors.rows[0][x];
        let mut wanted = self.channels(color);
        for (v, e) in wanted.iter_mut().zip(pending) {
            *v = (*v + e).clamp(0.0, max);
        }
        let result = self.quantizer.quantize(self.to_color(color.a, wanted));
        if result.a == 0 {
            return result;
        }

        let got = self.channels(result);
        let divisor = f32::from(self.kernel.divisor);
        for &(dx, dy, weight) in self.kernel.entries {
            let nx = x as i64 + i64::from(dx);
            if nx < 0 || nx as usize >= self.width {
                continue;
            }
            let Some(row) = errors.rows.get_mut(dy as usize) else {
                continue;
            };
            let share = f32::from(weight) / divisor;
            let cell = &mut row[nx as usize];
            for c in 0..3 {
                cell[c] += (wanted[c] - got[c]) * share;
            }
        }
        result
    }
}
