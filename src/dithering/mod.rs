//! Ditherer contract: spreading quantization error to hide banding.
//!
//! A [`DitheringSession`] wraps an active
//! [`QuantizingSession`](crate::quantizing::QuantizingSession) and returns
//! a quantized color for each `(color, x, y)`. Coordinates are relative to
//! the area being copied. Sessions that keep state between pixels report
//! [`DitheringSession::is_sequential`], and the copy engine then feeds them
//! rows top to bottom, pixels left to right, on one thread.

mod error_diffusion;
mod ordered;

pub use error_diffusion::{ATKINSON, ErrorDiffusionDitherer, FLOYD_STEINBERG, Kernel, SIERRA_LITE};
pub use ordered::OrderedDitherer;

use crate::color::Color32;
use crate::context::OperationContext;
use crate::data::ReadableBitmapData;
use crate::quantizing::QuantizingSession;

/// Produces dithering sessions.
pub trait Ditherer: Send + Sync {
    /// Prepare a session for `source` on top of `quantizer`.
    ///
    /// `None` is treated like a quantizer returning `None`.
    fn initialize<'a>(
        &self,
        source: &dyn ReadableBitmapData,
        quantizer: &'a dyn QuantizingSession,
        ctx: &OperationContext<'_>,
    ) -> Option<Box<dyn DitheringSession + 'a>>;
}

/// Quantizes colors with position-dependent error spreading.
pub trait DitheringSession: Send + Sync {
    /// Whether pixels must arrive in row-major order from one thread.
    fn is_sequential(&self) -> bool;

    fn dither(&self, color: Color32, x: usize, y: usize) -> Color32;
}
