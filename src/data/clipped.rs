use std::sync::Arc;

use super::row::Row;
use super::{BitmapDataInfo, RawLayout, ReadableBitmapData};
use crate::buffer::BackingKind;
use crate::color::{Color32, WorkingColorSpace};
use crate::error::BitmapError;
use crate::format::{KnownPixelFormat, PixelFormatInfo};
use crate::geometry::Rect;
use crate::palette::Palette;

/// Read-only view of a rectangle of other bitmap data.
///
/// Coordinates are relative to the rectangle; pixel `(0, 0)` of the view
/// is pixel `(rect.x, rect.y)` of the source.
pub struct ClippedBitmapData<'a> {
    source: &'a dyn ReadableBitmapData,
    rect: Rect,
}

impl<'a> ClippedBitmapData<'a> {
    /// Clip `rect` to the source bounds. An empty result is `InvalidArgument`.
    pub fn new(source: &'a dyn ReadableBitmapData, rect: Rect) -> Result<Self, BitmapError> {
        let rect = source.bounds().intersect(rect);
        if rect.is_empty() {
            return Err(BitmapError::InvalidArgument(
                "clipping rectangle does not overlap the bitmap data".into(),
            ));
        }
        Ok(Self { source, rect })
    }

    /// The clipped rectangle in source coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl BitmapDataInfo for ClippedBitmapData<'_> {
    fn width(&self) -> usize {
        self.rect.width
    }

    fn height(&self) -> usize {
        self.rect.height
    }

    fn pixel_format(&self) -> PixelFormatInfo {
        self.source.pixel_format()
    }

    fn known_format(&self) -> Option<KnownPixelFormat> {
        self.source.known_format()
    }

    fn palette(&self) -> Option<&Arc<Palette>> {
        self.source.palette()
    }

    fn back_color(&self) -> Color32 {
        self.source.back_color()
    }

    fn alpha_threshold(&self) -> u8 {
        self.source.alpha_threshold()
    }

    fn working_color_space(&self) -> WorkingColorSpace {
        self.source.working_color_space()
    }

    fn row_size(&self) -> usize {
        self.source.row_size()
    }

    fn backing_kind(&self) -> BackingKind {
        self.source.backing_kind()
    }

    fn is_disposed(&self) -> bool {
        self.source.is_disposed()
    }

    fn raw_layout(&self) -> Option<RawLayout> {
        self.source.raw_layout().map(|layout| RawLayout {
            x_offset: layout.x_offset + self.rect.x,
            ..layout
        })
    }
}

impl ReadableBitmapData for ClippedBitmapData<'_> {
    fn row(&self, y: usize) -> Result<Row<'_>, BitmapError> {
        if y >= self.rect.height {
            return Err(BitmapError::out_of_range("y", y, self.rect.height));
        }
        Ok(self.source.row(y + self.rect.y)?.clip(self.rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BitmapDataBuilder, WritableBitmapData};

    #[test]
    fn coordinates_are_rebased() {
        let mut bitmap = BitmapDataBuilder::new(8, 8, KnownPixelFormat::Format32bppArgb)
            .allocate()
            .unwrap();
        let red = Color32::from_rgb(255, 0, 0);
        bitmap.set_color32(3, 5, red).unwrap();
        bitmap.set_color32(4, 6, Color32::WHITE).unwrap();

        let clipped = ClippedBitmapData::new(&bitmap, Rect::new(2, 4, 10, 3)).unwrap();
        assert_eq!(clipped.width(), 6);
        assert_eq!(clipped.height(), 3);
        assert_eq!(clipped.get_color32(1, 1).unwrap(), red);
        assert!(clipped.get_color32(6, 0).is_err());
        assert!(clipped.get_color32(0, 3).is_err());

        let mut row = clipped.row(1).unwrap();
        assert!(row.move_next_row());
        assert_eq!(row.index(), 2);
        assert_eq!(row.get_color32(2).unwrap(), Color32::WHITE);
        assert!(!row.move_next_row());
        assert_eq!(clipped.raw_layout().unwrap().x_offset, 2);
    }

    #[test]
    fn raw_reads_start_at_the_clip_edge() {
        let bitmap = BitmapDataBuilder::new(16, 1, KnownPixelFormat::Format1bppIndexed)
            .wrap(vec![0x0Fu8, 0xF0])
            .unwrap();
        let aligned = ClippedBitmapData::new(&bitmap, Rect::new(8, 0, 8, 1)).unwrap();
        assert_eq!(aligned.row(0).unwrap().read_raw::<u8>(0).unwrap(), 0xF0);
        assert!(aligned.row(0).unwrap().read_raw::<u8>(1).is_err());

        let unaligned = ClippedBitmapData::new(&bitmap, Rect::new(3, 0, 8, 1)).unwrap();
        assert!(matches!(
            unaligned.row(0).unwrap().read_raw::<u8>(0),
            Err(BitmapError::InvalidState(_))
        ));
        assert_eq!(unaligned.get_color_index(1, 0).unwrap(), 1);
    }

    #[test]
    fn nested_clips_accumulate() {
        let mut bitmap = BitmapDataBuilder::new(10, 10, KnownPixelFormat::Format8bppGrayScale)
            .allocate()
            .unwrap();
        bitmap.set_color32(5, 5, Color32::WHITE).unwrap();
        let outer = ClippedBitmapData::new(&bitmap, Rect::new(2, 2, 6, 6)).unwrap();
        let inner = ClippedBitmapData::new(&outer, Rect::new(1, 1, 4, 4)).unwrap();
        assert_eq!(inner.get_color32(2, 2).unwrap(), Color32::WHITE);
        assert_eq!(inner.raw_layout().unwrap().x_offset, 3);
    }
}
