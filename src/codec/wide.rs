use super::{CodecContext, PixelCodec, Res, flatten64, read_px, write_px};
use crate::color::{Color32, Color64, PColor32, PColor64, Rgb48};

pub(crate) struct Rgb48Codec;
pub(crate) struct Argb64;
pub(crate) struct PArgb64;

/// 32-bit access on 16-bit formats goes through `Color64`.
macro_rules! via_color64 {
    () => {
        fn get_color32(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<Color32> {
            Ok(self.get_color64(row, x, ctx)?.to_color32())
        }

        fn set_color32(
            &self,
            row: &mut [u8],
            x: usize,
            c: Color32,
            ctx: &CodecContext<'_>,
        ) -> Res<()> {
            self.set_color64(row, x, c.to_color64(), ctx)
        }
    };
}

impl PixelCodec for Rgb48Codec {
    via_color64!();

    fn get_color64(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color64> {
        Ok(read_px::<Rgb48>(row, x).to_color64())
    }

    fn set_color64(&self, row: &mut [u8], x: usize, c: Color64, ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, Rgb48::from_color64(flatten64(c, ctx)));
        Ok(())
    }
}

impl PixelCodec for Argb64 {
    via_color64!();

    fn get_color64(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color64> {
        Ok(read_px(row, x))
    }

    fn set_color64(&self, row: &mut [u8], x: usize, c: Color64, _ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, c);
        Ok(())
    }
}

impl PixelCodec for PArgb64 {
    via_color64!();

    fn get_color64(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color64> {
        Ok(read_px::<PColor64>(row, x).to_straight())
    }

    fn set_color64(&self, row: &mut [u8], x: usize, c: Color64, _ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, c.to_premultiplied());
        Ok(())
    }

    fn get_pcolor64(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<PColor64> {
        Ok(read_px(row, x))
    }

    fn set_pcolor64(
        &self,
        row: &mut [u8],
        x: usize,
        c: PColor64,
        _ctx: &CodecContext<'_>,
    ) -> Res<()> {
        write_px(row, x, c);
        Ok(())
    }

    fn get_pcolor32(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<PColor32> {
        Ok(read_px::<PColor64>(row, x).to_pcolor32())
    }

    fn set_pcolor32(
        &self,
        row: &mut [u8],
        x: usize,
        c: PColor32,
        _ctx: &CodecContext<'_>,
    ) -> Res<()> {
        write_px(row, x, c.to_pcolor64());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::ctx;
    use super::*;

    #[test]
    fn argb64_is_lossless() {
        let mut row = [0u8; 16];
        let c = ctx(None);
        let color = Color64::new(0x1234, 0x5678, 0x9ABC, 0xDEF0);
        Argb64.set_color64(&mut row, 1, color, &c).unwrap();
        assert_eq!(Argb64.get_color64(&row, 1, &c).unwrap(), color);
    }

    #[test]
    fn rgb48_flattens_alpha() {
        let mut row = [0u8; 6];
        let c = ctx(None);
        Rgb48Codec
            .set_color64(&mut row, 0, Color64::new(0, 65535, 65535, 65535), &c)
            .unwrap();
        assert_eq!(Rgb48Codec.get_color64(&row, 0, &c).unwrap(), Color64::BLACK);
    }

    #[test]
    fn pargb64_narrow_access() {
        let mut row = [0u8; 8];
        let c = ctx(None);
        let p = Color32::new(77, 200, 100, 0).to_premultiplied();
        PArgb64.set_pcolor32(&mut row, 0, p, &c).unwrap();
        assert_eq!(PArgb64.get_pcolor32(&row, 0, &c).unwrap(), p);
    }
}
