//! Byte-for-byte row copies between identical layouts.

use std::sync::Arc;

use crate::data::{BitmapDataInfo, ClippedBitmapData, Row, RowMut, WritableBitmapData};
use crate::format::KnownPixelFormat;

/// Byte range of one row to move, valid for every row of the area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct RawPlan {
    /// Offset into the source's physical row.
    pub src_start: usize,
    /// Offset into the target's physical row.
    pub dst_start: usize,
    pub len: usize,
    /// Bits of the last byte that hold pixels; the rest is row padding
    /// and keeps the target's value.
    pub tail_mask: u8,
    pub fixup: Fixup,
}

/// Bits that a per-pixel write never stores as read, rewritten after the
/// bytes are moved so both copy paths leave the same memory behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Fixup {
    None,
    /// The unused fourth byte of `Format32bppRgb` is written as 0xFF.
    OpaquePadding,
    /// The unused top bit of `Format16bppRgb555` is written as 0.
    ClearTopBit,
    /// Transparent `Format16bppArgb1555` pixels are written as all zeros.
    ClearTransparent,
}

impl Fixup {
    fn for_format(format: KnownPixelFormat) -> Self {
        match format {
            KnownPixelFormat::Format32bppRgb => Fixup::OpaquePadding,
            KnownPixelFormat::Format16bppRgb555 => Fixup::ClearTopBit,
            KnownPixelFormat::Format16bppArgb1555 => Fixup::ClearTransparent,
            _ => Fixup::None,
        }
    }

    fn apply(self, bytes: &mut [u8]) {
        match self {
            Fixup::None => {}
            Fixup::OpaquePadding => {
                for px in bytes.chunks_exact_mut(4) {
                    px[3] = 0xFF;
                }
            }
            Fixup::ClearTopBit => {
                for px in bytes.chunks_exact_mut(2) {
                    let v = u16::from_ne_bytes([px[0], px[1]]) & 0x7FFF;
                    px.copy_from_slice(&v.to_ne_bytes());
                }
            }
            Fixup::ClearTransparent => {
                for px in bytes.chunks_exact_mut(2) {
                    if u16::from_ne_bytes([px[0], px[1]]) & 0x8000 == 0 {
                        px.fill(0);
                    }
                }
            }
        }
    }
}

/// Decide whether `source` may be copied to `target` at `target_x` by
/// moving bytes.
///
/// Requires memory-backed data of the same built-in format on both sides,
/// the same backing kind above 32 bits per pixel, the same palette
/// instance for indexed formats, and for sub-byte formats left edges on
/// byte boundaries and right edges that either are too or end both rows.
pub(super) fn plan(
    source: &ClippedBitmapData<'_>,
    target: &dyn WritableBitmapData,
    target_x: usize,
) -> Option<RawPlan> {
    let src = source.raw_layout()?;
    let dst = target.raw_layout()?;
    let format = source.known_format()?;
    if target.known_format()? != format {
        return None;
    }
    let info = format.info();
    let bpp = info.bits_per_pixel() as usize;
    if bpp > 32 && src.kind != dst.kind {
        return None;
    }
    if info.is_indexed() {
        match (source.palette(), target.palette()) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => {}
            _ => return None,
        }
    }

    let width = source.width();
    let dst_x = dst.x_offset + target_x;
    let src_bit = src.x_offset * bpp;
    let dst_bit = dst_x * bpp;
    if src_bit % 8 != 0 || dst_bit % 8 != 0 {
        return None;
    }
    if (width * bpp) % 8 != 0
        && (src.x_offset + width != src.physical_width || dst_x + width != dst.physical_width)
    {
        return None;
    }
    let tail_mask = match (width * bpp) % 8 {
        0 => 0xFF,
        bits => 0xFFu8 << (8 - bits),
    };
    Some(RawPlan {
        src_start: src_bit / 8,
        dst_start: dst_bit / 8,
        len: info.byte_width(width),
        tail_mask,
        fixup: Fixup::for_format(format),
    })
}

#[inline]
pub(super) fn copy_row(plan: &RawPlan, src: &Row<'_>, dst: &mut RowMut<'_>) {
    let from = &src.bytes()[plan.src_start..plan.src_start + plan.len];
    let to = &mut dst.bytes_mut()[plan.dst_start..plan.dst_start + plan.len];
    let padding = to.last().map_or(0, |b| b & !plan.tail_mask);
    to.copy_from_slice(from);
    if let Some(last) = to.last_mut() {
        *last = (*last & plan.tail_mask) | padding;
    }
    plan.fixup.apply(to);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BitmapDataBuilder;
    use crate::geometry::Rect;
    use crate::palette::Palette;

    fn one_bpp(width: usize, palette: &Arc<Palette>) -> crate::BitmapData<crate::OwnedBuffer> {
        BitmapDataBuilder::new(width, 2, KnownPixelFormat::Format1bppIndexed)
            .with_palette(Arc::clone(palette))
            .allocate()
            .unwrap()
    }

    #[test]
    fn sub_byte_edges() {
        let palette = Arc::new(Palette::black_and_white());
        let src = one_bpp(16, &palette);
        let dst = one_bpp(16, &palette);

        let aligned = ClippedBitmapData::new(&src, Rect::new(8, 0, 8, 2)).unwrap();
        assert_eq!(
            plan(&aligned, &dst, 0),
            Some(RawPlan {
                src_start: 1,
                dst_start: 0,
                len: 1,
                tail_mask: 0xFF,
                fixup: Fixup::None,
            })
        );

        let unaligned = ClippedBitmapData::new(&src, Rect::new(3, 0, 8, 2)).unwrap();
        assert_eq!(plan(&unaligned, &dst, 0), None);

        // Ragged right edge only when it ends both rows.
        let ragged = ClippedBitmapData::new(&src, Rect::new(8, 0, 5, 2)).unwrap();
        assert_eq!(plan(&ragged, &dst, 8), None);
        let src13 = one_bpp(13, &palette);
        let dst13 = one_bpp(13, &palette);
        let tail = ClippedBitmapData::new(&src13, Rect::new(8, 0, 5, 2)).unwrap();
        assert_eq!(
            plan(&tail, &dst13, 8).map(|p| (p.len, p.tail_mask)),
            Some((1, 0b1111_1000))
        );
    }

    #[test]
    fn indexed_needs_same_palette_instance() {
        let a = Arc::new(Palette::black_and_white());
        let b = Arc::new(Palette::black_and_white());
        let src = one_bpp(8, &a);
        let dst = one_bpp(8, &b);
        let view = ClippedBitmapData::new(&src, Rect::from_size(8, 2)).unwrap();
        assert_eq!(plan(&view, &dst, 0), None);
    }

    #[test]
    fn different_formats_are_not_raw() {
        let src = BitmapDataBuilder::new(4, 4, KnownPixelFormat::Format32bppArgb)
            .allocate()
            .unwrap();
        let dst = BitmapDataBuilder::new(4, 4, KnownPixelFormat::Format32bppPArgb)
            .allocate()
            .unwrap();
        let view = ClippedBitmapData::new(&src, Rect::from_size(4, 4)).unwrap();
        assert_eq!(plan(&view, &dst, 0), None);
    }

    #[cfg(feature = "imgref")]
    #[test]
    fn wide_formats_need_same_backing() {
        let src = BitmapDataBuilder::new(2, 2, KnownPixelFormat::Format64bppArgb)
            .wrap(imgref::ImgVec::new(vec![0u64; 4], 2, 2))
            .unwrap();
        let dst = BitmapDataBuilder::new(2, 2, KnownPixelFormat::Format64bppArgb)
            .allocate()
            .unwrap();
        let view = ClippedBitmapData::new(&src, Rect::from_size(2, 2)).unwrap();
        assert_eq!(plan(&view, &dst, 0), None);

        let narrow = BitmapDataBuilder::new(2, 2, KnownPixelFormat::Format32bppArgb)
            .wrap(imgref::ImgVec::new(vec![0u32; 4], 2, 2))
            .unwrap();
        let narrow_dst = BitmapDataBuilder::new(2, 2, KnownPixelFormat::Format32bppArgb)
            .allocate()
            .unwrap();
        let view = ClippedBitmapData::new(&narrow, Rect::from_size(2, 2)).unwrap();
        assert!(plan(&view, &narrow_dst, 0).is_some());
    }
}
