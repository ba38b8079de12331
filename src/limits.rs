use crate::error::BitmapError;

/// Caps checked by [`BitmapDataBuilder`](crate::BitmapDataBuilder). The
/// buffer size applies only to buffers the builder allocates itself.
///
/// Unset fields do not limit anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<usize>,
    pub max_height: Option<usize>,
    /// Width times height.
    pub max_pixels: Option<usize>,
    /// Size of the whole buffer, row padding included.
    pub max_buffer_bytes: Option<usize>,
}

impl Limits {
    pub const fn unlimited() -> Self {
        Self {
            max_width: None,
            max_height: None,
            max_pixels: None,
            max_buffer_bytes: None,
        }
    }

    pub fn with_max_pixels(mut self, pixels: usize) -> Self {
        self.max_pixels = Some(pixels);
        self
    }

    pub fn with_max_buffer_bytes(mut self, bytes: usize) -> Self {
        self.max_buffer_bytes = Some(bytes);
        self
    }

    pub(crate) fn check_dimensions(&self, width: usize, height: usize) -> Result<(), BitmapError> {
        exceeds("width", width, self.max_width)?;
        exceeds("height", height, self.max_height)?;
        exceeds("pixel count", width.saturating_mul(height), self.max_pixels)
    }

    /// Check a `width` x `height` allocation of `buffer_bytes` bytes.
    pub(crate) fn check_allocation(
        &self,
        width: usize,
        height: usize,
        buffer_bytes: usize,
    ) -> Result<(), BitmapError> {
        self.check_dimensions(width, height)?;
        exceeds("buffer size", buffer_bytes, self.max_buffer_bytes)
    }
}

fn exceeds(what: &str, value: usize, limit: Option<usize>) -> Result<(), BitmapError> {
    match limit {
        Some(limit) if value > limit => Err(BitmapError::LimitExceeded(std::format!(
            "{what} {value} exceeds limit {limit}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitmapDataBuilder, KnownPixelFormat};

    #[test]
    fn unlimited_by_default() {
        assert_eq!(Limits::default(), Limits::unlimited());
        assert!(Limits::default().check_allocation(1 << 20, 1 << 20, usize::MAX).is_ok());
    }

    #[test]
    fn buffer_size_counts_bytes_not_pixels() {
        let limits = Limits::unlimited().with_max_buffer_bytes(300);
        // 10x10 at 24bpp is exactly 300 bytes.
        assert!(
            BitmapDataBuilder::new(10, 10, KnownPixelFormat::Format24bppRgb)
                .with_limits(&limits)
                .allocate()
                .is_ok()
        );
        assert!(matches!(
            BitmapDataBuilder::new(10, 10, KnownPixelFormat::Format32bppArgb)
                .with_limits(&limits)
                .allocate(),
            Err(BitmapError::LimitExceeded(_))
        ));
    }

    #[test]
    fn pixel_limit_rejects() {
        let limits = Limits::unlimited().with_max_pixels(100);
        assert!(limits.check_allocation(10, 10, 0).is_ok());
        assert!(matches!(
            limits.check_allocation(10, 11, 0),
            Err(BitmapError::LimitExceeded(_))
        ));
    }
}
