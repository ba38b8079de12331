use super::{CodecContext, PixelCodec, Res, flatten32, read_px, write_px};
use crate::color::{Color32, PColor32, PColor64, Rgb24};

pub(crate) struct Rgb24Codec;
pub(crate) struct Rgb32;
pub(crate) struct Argb32;
pub(crate) struct PArgb32;

impl PixelCodec for Rgb24Codec {
    fn get_color32(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color32> {
        Ok(read_px::<Rgb24>(row, x).to_color32())
    }

    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, Rgb24::from_color32(flatten32(c, ctx)));
        Ok(())
    }
}

impl PixelCodec for Rgb32 {
    fn get_color32(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color32> {
        Ok(read_px::<Color32>(row, x).to_opaque())
    }

    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, flatten32(c, ctx).to_opaque());
        Ok(())
    }
}

impl PixelCodec for Argb32 {
    fn get_color32(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color32> {
        Ok(read_px(row, x))
    }

    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, _ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, c);
        Ok(())
    }
}

impl PixelCodec for PArgb32 {
    fn get_color32(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color32> {
        Ok(read_px::<PColor32>(row, x).to_straight())
    }

    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, _ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, c.to_premultiplied());
        Ok(())
    }

    fn get_pcolor32(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<PColor32> {
        Ok(read_px(row, x))
    }

    fn set_pcolor32(
        &self,
        row: &mut [u8],
        x: usize,
        c: PColor32,
        _ctx: &CodecContext<'_>,
    ) -> Res<()> {
        write_px(row, x, c);
        Ok(())
    }

    fn get_pcolor64(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<PColor64> {
        Ok(read_px::<PColor32>(row, x).to_pcolor64())
    }

    fn set_pcolor64(
        &self,
        row: &mut [u8],
        x: usize,
        c: PColor64,
        _ctx: &CodecContext<'_>,
    ) -> Res<()> {
        write_px(row, x, c.to_pcolor32());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ctx;
    use super::*;

    #[test]
    fn rgb32_pads_with_opaque_alpha() {
        let mut row = [0u8; 4];
        Rgb32
            .set_color32(&mut row, 0, Color32::from_rgb(1, 2, 3), &ctx(None))
            .unwrap();
        assert_eq!(row, [3, 2, 1, 0xFF]);
    }

    #[test]
    fn pargb_stores_premultiplied() {
        let mut row = [0u8; 4];
        let c = ctx(None);
        PArgb32
            .set_color32(&mut row, 0, Color32::new(128, 255, 0, 0), &c)
            .unwrap();
        assert_eq!(row, [0, 0, 128, 128]);
        assert_eq!(
            PArgb32.get_color32(&row, 0, &c).unwrap(),
            Color32::new(128, 255, 0, 0)
        );
    }

    #[test]
    fn argb32_keeps_alpha() {
        let mut row = [0u8; 8];
        let c = ctx(None);
        let color = Color32::new(1, 2, 3, 4);
        Argb32.set_color32(&mut row, 1, color, &c).unwrap();
        assert_eq!(Argb32.get_color32(&row, 1, &c).unwrap(), color);
    }
}
