use super::indexed::{lookup, nearest};
use super::{CodecContext, PixelCodec, Res, not_indexed};
use crate::color::{Color32, Color64, ColorF};
use crate::data::{CustomRow, CustomRowMut};
use crate::error::BitmapError;
use crate::format::CustomPixelFormat;

/// Callback dispatch. Missing depths convert through whatever the format
/// provides, widest first; indexed layouts go through the palette.
impl PixelCodec for CustomPixelFormat {
    fn get_color32(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<Color32> {
        let view = CustomRow::new(row, ctx);
        if let Some((get, _)) = &self.color32 {
            return get(&view, x);
        }
        if let Some((get, _)) = &self.color64 {
            return Ok(get(&view, x)?.to_color32());
        }
        if let Some((get, _)) = &self.color_f {
            return Ok(get(&view, x)?.to_color32());
        }
        lookup(self.get_color_index(row, x, ctx)?, ctx)
    }

    fn set_color32(&self, row: &mut [u8], x: usize, c: Color32, ctx: &CodecContext<'_>) -> Res<()> {
        let mut view = CustomRowMut::new(row, ctx);
        if let Some((_, set)) = &self.color32 {
            return set(&mut view, x, c);
        }
        if let Some((_, set)) = &self.color64 {
            return set(&mut view, x, c.to_color64());
        }
        if let Some((_, set)) = &self.color_f {
            return set(&mut view, x, c.to_color_f());
        }
        if !self.info().is_indexed() {
            return Err(BitmapError::InvalidState(
                "custom pixel format has no color callbacks".into(),
            ));
        }
        let index = nearest(c, ctx)?;
        self.set_color_index(row, x, index, ctx)
    }

    fn get_color64(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<Color64> {
        let view = CustomRow::new(row, ctx);
        if let Some((get, _)) = &self.color64 {
            return get(&view, x);
        }
        if let Some((get, _)) = &self.color_f {
            return Ok(get(&view, x)?.to_color64());
        }
        Ok(self.get_color32(row, x, ctx)?.to_color64())
    }

    fn set_color64(&self, row: &mut [u8], x: usize, c: Color64, ctx: &CodecContext<'_>) -> Res<()> {
        if let Some((_, set)) = &self.color64 {
            return set(&mut CustomRowMut::new(row, ctx), x, c);
        }
        if let Some((_, set)) = &self.color_f {
            return set(&mut CustomRowMut::new(row, ctx), x, c.to_color_f());
        }
        self.set_color32(row, x, c.to_color32(), ctx)
    }

    fn get_color_f(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<ColorF> {
        let view = CustomRow::new(row, ctx);
        if let Some((get, _)) = &self.color_f {
            return get(&view, x);
        }
        if let Some((get, _)) = &self.color64 {
            return Ok(get(&view, x)?.to_color_f());
        }
        Ok(self.get_color32(row, x, ctx)?.to_color_f())
    }

    fn set_color_f(&self, row: &mut [u8], x: usize, c: ColorF, ctx: &CodecContext<'_>) -> Res<()> {
        if let Some((_, set)) = &self.color_f {
            return set(&mut CustomRowMut::new(row, ctx), x, c);
        }
        if let Some((_, set)) = &self.color64 {
            return set(&mut CustomRowMut::new(row, ctx), x, c.to_color64());
        }
        self.set_color32(row, x, c.to_color32(), ctx)
    }

    fn get_color_index(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<u32> {
        match &self.index {
            Some((get, _)) if self.info().is_indexed() => get(&CustomRow::new(row, ctx), x),
            _ => Err(not_indexed()),
        }
    }

    fn set_color_index(
        &self,
        row: &mut [u8],
        x: usize,
        index: u32,
        ctx: &CodecContext<'_>,
    ) -> Res<()> {
        match &self.index {
            Some((_, set)) if self.info().is_indexed() => {
                set(&mut CustomRowMut::new(row, ctx), x, index)
            }
            _ => Err(not_indexed()),
        }
    }
}
