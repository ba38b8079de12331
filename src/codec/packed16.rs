use super::{CodecContext, PixelCodec, Res, flatten32, read_px, write_px};
use crate::color::{Argb1555, Color32, Rgb555, Rgb565};

pub(crate) struct Rgb555Codec;
pub(crate) struct Rgb565Codec;
pub(crate) struct Argb1555Codec;

impl PixelCodec for Rgb555Codec {
    fn get_color32(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color32> {
        Ok(read_px::<Rgb555>(row, x).to_color32())
    }

    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, Rgb555::from_color32(flatten32(c, ctx)));
        Ok(())
    }
}

impl PixelCodec for Rgb565Codec {
    fn get_color32(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color32> {
        Ok(read_px::<Rgb565>(row, x).to_color32())
    }

    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, ctx: &CodecContext<'_>) -> Res<()> {
        write_px(row, x, Rgb565::from_color32(flatten32(c, ctx)));
        Ok(())
    }
}

impl PixelCodec for Argb1555Codec {
    fn get_color32(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<Color32> {
        Ok(read_px::<Argb1555>(row, x).to_color32())
    }

    /// Below the alpha threshold the pixel is stored fully transparent
    /// (all bits zero); otherwise the color is flattened and stored opaque.
    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, ctx: &CodecContext<'_>) -> Res<()> {
        let value = if c.a < ctx.alpha_threshold || c.a == 0 {
            Argb1555::TRANSPARENT
        } else {
            Argb1555::from_color32(flatten32(c, ctx))
        };
        write_px(row, x, value);
        Ok(())
    }
}
