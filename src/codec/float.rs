use super::{CodecContext, PixelCodec, Res, flatten_f, read_px, write_px};
use crate::color::{Color32, Color64, ColorF, PColorF, RgbF96};

/// `f32` linear luminance.
pub(crate) struct GrayF32;
pub(crate) struct RgbF96Codec;
pub(crate) struct RgbaF128;
pub(crate) struct PRgbaF128;

/// 32- and 64-bit access on float formats goes through `ColorF`.
macro_rules! via_color_f {
    () => {
        fn get_color32(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<Color32> {
            Ok(self.get_color_f(row, x, ctx)?.to_color32())
        }

        fn set_color32(
            &self,
            row: &mut [u8],
            x: usize,
            c: Color32,
            ctx: &CodecContext<'_>,
        ) -> Res<()> {
            self.set_color_f(row, x, c.to_color_f(), ctx)
        }

        fn get_color64(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<Color64> {
            Ok(self.get_color_f(row, x, ctx)?.to_color64())
        }

        fn set_color64(
            &self,
            row: &mut [u8],
            x: usize,
            c: Color64,
            ctx: &CodecContext<'_>,
        ) -> Res<()> {
            self.set_color_f(row, x, c.to_color_f(), ctx)
        }
    };
}

impl PixelCodec for GrayF32 {
    via_color_f!();

    fn get_color_f(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<ColorF> {
        let v: f32 = read_px(row, x);
        Ok(ColorF::from_rgb(v, v, v))
    }

    fn set_color_f(&self, row: &mut [u8], x: usize, c: ColorF, ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, flatten_f(c, ctx).brightness());
        Ok(())
    }
}

impl PixelCodec for RgbF96Codec {
    via_color_f!();

    fn get_color_f(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<ColorF> {
        Ok(read_px::<RgbF96>(row, x).to_color_f())
    }

    fn set_color_f(&self, row: &mut [u8], x: usize, c: ColorF, ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, RgbF96::from_color_f(flatten_f(c, ctx)));
        Ok(())
    }
}

impl PixelCodec for RgbaF128 {
    via_color_f!();

    fn get_color_f(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<ColorF> {
        Ok(read_px(row, x))
    }

    fn set_color_f(&self, row: &mut [u8], x: usize, c: ColorF, _ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, c);
        Ok(())
    }
}

impl PixelCodec for PRgbaF128 {
    via_color_f!();

    fn get_color_f(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<ColorF> {
        Ok(read_px::<PColorF>(row, x).to_straight())
    }

    fn set_color_f(&self, row: &mut [u8], x: usize, c: ColorF, _ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, c.to_premultiplied());
        Ok(())
    }

    fn get_pcolor_f(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<PColorF> {
        Ok(read_px(row, x))
    }

    fn set_pcolor_f(
        &self,
        row: &mut [u8],
        x: usize,
        c: PColorF,
        _ctx: &CodecContext<'_>,
    ) -> Res<()> {
        write_px(row, x, c);
        Ok(())
    }
}
