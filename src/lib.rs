//! # zenblit
//!
//! Pixel-format-agnostic bitmap access and compositing.
//!
//! ## What's in the box
//!
//! - **Colors**: 32-bit, 64-bit and floating-point colors, straight and
//!   premultiplied, with sRGB or linear blending ([`color`]).
//! - **Bitmap data**: row cursors and per-pixel access over any of 19
//!   built-in pixel formats or a caller-defined one, backed by a `Vec`,
//!   a borrowed slice, an [`imgref::ImgVec`](https://docs.rs/imgref) or
//!   foreign memory with a stride ([`BitmapData`], [`BitmapDataBuilder`]).
//! - **Copy engine**: copying and alpha-blended drawing between any two
//!   formats, with byte copies when layouts match, optional quantizing
//!   and dithering, and row-parallel execution on rayon ([`CopyRequest`],
//!   [`CloneRequest`]).
//!
//! ## Non-Goals
//!
//! - Image file codecs
//! - Resampling, rotation and other geometric transforms
//! - Optimizing quantizers (median cut, octree); bring your own through
//!   the [`Quantizer`] trait
//!
//! ## Usage
//!
//! ```
//! use zenblit::{BitmapDataBuilder, Color32, CopyRequest, ErrorDiffusionDitherer,
//!     KnownPixelFormat, OperationContext, ReadableBitmapData, WritableBitmapData};
//!
//! let mut photo = BitmapDataBuilder::new(320, 200, KnownPixelFormat::Format32bppArgb)
//!     .allocate()?;
//! photo.clear(Color32::from_rgb(90, 140, 200))?;
//!
//! let mut mono = BitmapDataBuilder::new(320, 200, KnownPixelFormat::Format1bppIndexed)
//!     .allocate()?;
//! let ditherer = ErrorDiffusionDitherer::floyd_steinberg();
//! let done = CopyRequest::copy(&photo, &mut mono)
//!     .with_ditherer(&ditherer)
//!     .execute(&OperationContext::unstoppable())?;
//! assert!(done.is_finished());
//! assert!(mono.get_color_index(0, 0)? <= 1);
//! # Ok::<(), zenblit::BitmapError>(())
//! ```
//!
//! ## Cancellation
//!
//! Long-running operations take an [`OperationContext`] wrapping any
//! [`enough::Stop`]. A stop request ends the operation between rows with
//! [`Completion::Cancelled`]; it is never reported as an error.

#![forbid(unsafe_code)]

mod buffer;
mod codec;
pub mod color;
mod context;
mod copy;
mod data;
pub mod dithering;
mod error;
mod format;
mod geometry;
mod limits;
mod palette;
mod pool;
pub mod quantizing;

pub use buffer::{BackingKind, NativeBuffer, OwnedBuffer, PixelBuffer};
pub use color::{
    Argb1555, Color32, Color64, ColorF, PColor32, PColor64, PColorF, Rgb24, Rgb48, Rgb555,
    Rgb565, RgbF96, WorkingColorSpace,
};
pub use context::{Completion, OperationContext, Parallelism, Progress};
pub use copy::{CloneRequest, CopyRequest, PARALLEL_WIDTH_THRESHOLD};
pub use data::{
    BitmapData, BitmapDataBuilder, BitmapDataInfo, ClippedBitmapData, CustomRow, CustomRowMut,
    RawLayout, ReadWriteBitmapData, ReadableBitmapData, Row, RowMut, WritableBitmapData,
};
pub use dithering::{Ditherer, DitheringSession, ErrorDiffusionDitherer, OrderedDitherer};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::BitmapError;
pub use format::{
    Color32Getter, Color32Setter, Color64Getter, Color64Setter, ColorFGetter, ColorFSetter,
    CustomPixelFormat, IndexGetter, IndexSetter, KnownPixelFormat, PixelFormatFlags,
    PixelFormatInfo,
};
pub use geometry::{Point, Rect};
pub use limits::Limits;
pub use palette::{MAX_PALETTE_SIZE, Palette};
pub use pool::{BufferPool, SharedBufferPool};
pub use quantizing::{PredefinedColorsQuantizer, Quantizer, QuantizingSession};
