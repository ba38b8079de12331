use super::{CodecContext, PixelCodec, Res, flatten32, flatten64, read_px, write_px};
use crate::color::{Color32, Color64};

/// 8-bit luma.
pub(crate) struct Gray8;

/// 16-bit luma, native endian.
pub(crate) struct Gray16;

impl PixelCodec for Gray8 {
    fn get_color32(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color32> {
        Ok(Color32::from_gray(row[x]))
    }

    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, ctx: &CodecContext<'_>) -> Res<()> {
        row[x] = flatten32(c, ctx).brightness(ctx.color_space);
        Ok(())
    }
}

impl PixelCodec for Gray16 {
    fn get_color32(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<Color32> {
        Ok(self.get_color64(row, x, ctx)?.to_color32())
    }

    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, ctx: &CodecContext<'_>) -> Res<()> {
        self.set_color64(row, x, c.to_color64(), ctx)
    }

    fn get_color64(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color64> {
        let v: u16 = read_px(row, x);
        Ok(Color64::from_rgb(v, v, v))
    }

    fn set_color64(&self, row: &mut [u8], x: usize, c: Color64, ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, flatten64(c, ctx).brightness(ctx.color_space));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ctx;
    use super::*;

    #[test]
    fn gray8_stores_luma() {
        let mut row = [0u8; 2];
        let c = ctx(None);
        Gray8.set_color32(&mut row, 1, Color32::from_rgb(255, 0, 0), &c).unwrap();
        assert_eq!(row[1], 76);
        assert_eq!(Gray8.get_color32(&row, 1, &c).unwrap(), Color32::from_gray(76));
    }

    #[test]
    fn gray16_keeps_full_precision() {
        let mut row = [0u8; 4];
        let c = ctx(None);
        Gray16.set_color64(&mut row, 1, Color64::from_rgb(1234, 1234, 1234), &c).unwrap();
        assert_eq!(u16::from_ne_bytes([row[2], row[3]]), 1234);
    }

    #[test]
    fn transparent_input_becomes_back_color() {
        let mut row = [0xFFu8; 1];
        let c = ctx(None);
        Gray8.set_color32(&mut row, 0, Color32::TRANSPARENT, &c).unwrap();
        assert_eq!(row[0], 0);
    }
}
