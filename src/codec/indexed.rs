use super::{CodecContext, PixelCodec, Res};
use crate::color::Color32;
use crate::error::BitmapError;
use crate::palette::Palette;

pub(crate) struct Indexed1;
pub(crate) struct Indexed4;
pub(crate) struct Indexed8;

fn palette<'a>(ctx: &CodecContext<'a>) -> Res<&'a Palette> {
    ctx.palette
        .ok_or_else(|| BitmapError::InvalidState("indexed bitmap data without a palette".into()))
}

/// Palette entry for a stored index.
pub(crate) fn lookup(index: u32, ctx: &CodecContext<'_>) -> Res<Color32> {
    let palette = palette(ctx)?;
    palette
        .get(index as usize)
        .ok_or_else(|| BitmapError::out_of_range("color index", index as usize, palette.len()))
}

/// Nearest palette index for a color, used by every indexed setter.
pub(crate) fn nearest(c: Color32, ctx: &CodecContext<'_>) -> Res<u32> {
    Ok(palette(ctx)?.nearest_index(c) as u32)
}

/// Read a sub-byte index, most significant bits first.
#[inline]
fn read_bits(row: &[u8], x: usize, bits: usize) -> u32 {
    let per_byte = 8 / bits;
    let byte = row[x / per_byte];
    let shift = 8 - bits * (x % per_byte + 1);
    u32::from((byte >> shift) & ((1u8 << bits) - 1))
}

#[inline]
fn write_bits(row: &mut [u8], x: usize, bits: usize, value: u32) {
    let per_byte = 8 / bits;
    let shift = 8 - bits * (x % per_byte + 1);
    let mask = ((1u8 << bits) - 1) << shift;
    let byte = &mut row[x / per_byte];
    *byte = (*byte & !mask) | (((value as u8) << shift) & mask);
}

macro_rules! indexed_codec {
    ($name:ident, $read:expr, $write:expr) => {
        impl PixelCodec for $name {
            fn get_color32(&self, row: &[u8], x: usize, ctx: &CodecContext<'_>) -> Res<Color32> {
                lookup($read(row, x), ctx)
            }

            fn set_color32(
                &self,
                row: &mut [u8],
                x: usize,
                c: Color32,
                ctx: &CodecContext<'_>,
            ) -> Res<()> {
                let index = nearest(c, ctx)?;
                $write(row, x, index);
                Ok(())
            }

            fn get_color_index(&self, row: &[u8], x: usize, _ctx: &CodecContext<'_>) -> Res<u32> {
                Ok($read(row, x))
            }

            fn set_color_index(
                &self,
                row: &mut [u8],
                x: usize,
                index: u32,
                _ctx: &CodecContext<'_>,
            ) -> Res<()> {
                $write(row, x, index);
                Ok(())
            }
        }
    };
}

indexed_codec!(
    Indexed1,
    |row: &[u8], x| read_bits(row, x, 1),
    |row: &mut [u8], x, v| write_bits(row, x, 1, v)
);
indexed_codec!(
    Indexed4,
    |row: &[u8], x| read_bits(row, x, 4),
    |row: &mut [u8], x, v| write_bits(row, x, 4, v)
);
indexed_codec!(
    Indexed8,
    |row: &[u8], x: usize| u32::from(row[x]),
    |row: &mut [u8], x: usize, v: u32| row[x] = v as u8
);
