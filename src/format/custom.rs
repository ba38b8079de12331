use std::sync::Arc;
use core::fmt;

use super::PixelFormatInfo;
use crate::color::{Color32, Color64, ColorF};
use crate::data::{CustomRow, CustomRowMut};
use crate::error::BitmapError;

pub type Color32Getter =
    Arc<dyn Fn(&CustomRow<'_>, usize) -> Result<Color32, BitmapError> + Send + Sync>;
pub type Color32Setter =
    Arc<dyn Fn(&mut CustomRowMut<'_>, usize, Color32) -> Result<(), BitmapError> + Send + Sync>;
pub type Color64Getter =
    Arc<dyn Fn(&CustomRow<'_>, usize) -> Result<Color64, BitmapError> + Send + Sync>;
pub type Color64Setter =
    Arc<dyn Fn(&mut CustomRowMut<'_>, usize, Color64) -> Result<(), BitmapError> + Send + Sync>;
pub type ColorFGetter =
    Arc<dyn Fn(&CustomRow<'_>, usize) -> Result<ColorF, BitmapError> + Send + Sync>;
pub type ColorFSetter =
    Arc<dyn Fn(&mut CustomRowMut<'_>, usize, ColorF) -> Result<(), BitmapError> + Send + Sync>;
pub type IndexGetter = Arc<dyn Fn(&CustomRow<'_>, usize) -> Result<u32, BitmapError> + Send + Sync>;
pub type IndexSetter =
    Arc<dyn Fn(&mut CustomRowMut<'_>, usize, u32) -> Result<(), BitmapError> + Send + Sync>;

/// A caller-defined pixel layout.
///
/// The row cursor keeps doing positioning and bounds checks; the callbacks
/// only turn the raw bytes of one row into colors and back. At least one
/// color pair is required for non-indexed formats, and indexed formats
/// need the index pair. Missing color depths are served by converting
/// through the ones that are present, preferring the widest.
///
/// ```
/// use zenblit::{BitmapDataBuilder, Color32, CustomPixelFormat, PixelFormatInfo};
/// use zenblit::{ReadableBitmapData, WritableBitmapData};
///
/// // 8-bit "red only" layout.
/// let info = PixelFormatInfo::new(8)?;
/// let format = CustomPixelFormat::new(info).with_color32(
///     |row, x| Ok(Color32::from_rgb(row.read_raw::<u8>(x)?, 0, 0)),
///     |row, x, c| row.write_raw::<u8>(x, c.r),
/// );
/// let mut bitmap = BitmapDataBuilder::custom(4, 4, format).allocate()?;
/// bitmap.set_color32(1, 1, Color32::from_rgb(200, 10, 10))?;
/// assert_eq!(bitmap.get_color32(1, 1)?, Color32::from_rgb(200, 0, 0));
/// # Ok::<(), zenblit::BitmapError>(())
/// ```
#[derive(Clone)]
pub struct CustomPixelFormat {
    info: PixelFormatInfo,
    pub(crate) color32: Option<(Color32Getter, Color32Setter)>,
    pub(crate) color64: Option<(Color64Getter, Color64Setter)>,
    pub(crate) color_f: Option<(ColorFGetter, ColorFSetter)>,
    pub(crate) index: Option<(IndexGetter, IndexSetter)>,
}

impl CustomPixelFormat {
    pub fn new(info: PixelFormatInfo) -> Self {
        Self {
            info: info.with_custom(true),
            color32: None,
            color64: None,
            color_f: None,
            index: None,
        }
    }

    pub fn with_color32(
        mut self,
        get: impl Fn(&CustomRow<'_>, usize) -> Result<Color32, BitmapError> + Send + Sync + 'static,
        set: impl Fn(&mut CustomRowMut<'_>, usize, Color32) -> Result<(), BitmapError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.color32 = Some((Arc::new(get), Arc::new(set)));
        self
    }

    pub fn with_color64(
        mut self,
        get: impl Fn(&CustomRow<'_>, usize) -> Result<Color64, BitmapError> + Send + Sync + 'static,
        set: impl Fn(&mut CustomRowMut<'_>, usize, Color64) -> Result<(), BitmapError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.color64 = Some((Arc::new(get), Arc::new(set)));
        self
    }

    pub fn with_color_f(
        mut self,
        get: impl Fn(&CustomRow<'_>, usize) -> Result<ColorF, BitmapError> + Send + Sync + 'static,
        set: impl Fn(&mut CustomRowMut<'_>, usize, ColorF) -> Result<(), BitmapError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.color_f = Some((Arc::new(get), Arc::new(set)));
        self
    }

    /// Index callbacks for an indexed custom layout. Colors are resolved
    /// through the bitmap data's palette.
    pub fn with_color_index(
        mut self,
        get: impl Fn(&CustomRow<'_>, usize) -> Result<u32, BitmapError> + Send + Sync + 'static,
        set: impl Fn(&mut CustomRowMut<'_>, usize, u32) -> Result<(), BitmapError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.index = Some((Arc::new(get), Arc::new(set)));
        self
    }

    #[inline]
    pub fn info(&self) -> PixelFormatInfo {
        self.info
    }

    pub(crate) fn validate(&self) -> Result<(), BitmapError> {
        if self.info.is_indexed() {
            if self.index.is_none() {
                return Err(BitmapError::InvalidArgument(
                    "indexed custom format needs color index callbacks".into(),
                ));
            }
        } else if self.color32.is_none() && self.color64.is_none() && self.color_f.is_none() {
            return Err(BitmapError::InvalidArgument(
                "custom format needs at least one pair of color callbacks".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for CustomPixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPixelFormat")
            .field("info", &self.info)
            .field("color32", &self.color32.is_some())
            .field("color64", &self.color64.is_some())
            .field("color_f", &self.color_f.is_some())
            .field("index", &self.index.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_are_required() {
        let info = PixelFormatInfo::new(16).unwrap();
        assert!(CustomPixelFormat::new(info).validate().is_err());
        let indexed = CustomPixelFormat::new(info.with_indexed(true)).with_color32(
            |_, _| Ok(Color32::BLACK),
            |_, _, _| Ok(()),
        );
        assert!(indexed.validate().is_err());
    }

    #[test]
    fn custom_flag_is_set() {
        let format = CustomPixelFormat::new(PixelFormatInfo::new(8).unwrap());
        assert!(format.info().is_custom());
    }
}
