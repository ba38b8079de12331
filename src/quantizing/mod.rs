//! Quantizer contract: reducing arbitrary colors to a restricted set.
//!
//! A [`Quantizer`] is configuration; [`Quantizer::initialize`] looks at the
//! source about to be copied and returns a [`QuantizingSession`] that maps
//! colors. Sessions are shared by every worker of a parallel copy, so
//! [`QuantizingSession::quantize`] takes `&self`.
//!
//! Optimizing quantizers (median cut, octree, ...) can implement the
//! contract outside this crate; [`PredefinedColorsQuantizer`] covers fixed
//! palettes and pixel-format-shaped color reduction.

mod predefined;

use std::sync::Arc;

pub use predefined::PredefinedColorsQuantizer;

use crate::color::{Color32, WorkingColorSpace};
use crate::context::OperationContext;
use crate::data::ReadableBitmapData;
use crate::palette::Palette;

/// Produces quantizing sessions.
pub trait Quantizer: Send + Sync {
    /// Prepare a session for `source`.
    ///
    /// `None` means the session could not be created. The copy engine
    /// reports that as cancellation when `ctx` was stopped, and as
    /// [`BitmapError::ExternalContractViolation`](crate::BitmapError::ExternalContractViolation)
    /// otherwise.
    fn initialize(
        &self,
        source: &dyn ReadableBitmapData,
        ctx: &OperationContext<'_>,
    ) -> Option<Box<dyn QuantizingSession>>;
}

/// Maps colors to the quantizer's color set.
pub trait QuantizingSession: Send + Sync {
    /// The color set, when it is a palette. Every color returned by
    /// [`QuantizingSession::quantize`] is then an entry of it.
    fn palette(&self) -> Option<&Arc<Palette>>;

    /// Opaque color partially transparent input is blended onto.
    fn back_color(&self) -> Color32;

    /// Input alpha below this counts as transparent. 0 when the result
    /// never has transparency.
    fn alpha_threshold(&self) -> u8;

    fn working_color_space(&self) -> WorkingColorSpace {
        WorkingColorSpace::Default
    }

    fn quantize(&self, color: Color32) -> Color32;
}
