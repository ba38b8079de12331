#![no_main]
use libfuzzer_sys::fuzz_target;
use zenblit::*;

/// Pulls small numbers off the front of the input.
struct Input<'a>(&'a [u8]);

impl Input<'_> {
    fn byte(&mut self) -> u8 {
        match self.0.split_first() {
            Some((&b, rest)) => {
                self.0 = rest;
                b
            }
            None => 0,
        }
    }

    fn below(&mut self, n: usize) -> usize {
        self.byte() as usize % n
    }

    fn format(&mut self) -> KnownPixelFormat {
        KnownPixelFormat::ALL[self.below(KnownPixelFormat::ALL.len())]
    }

    fn rect(&mut self) -> Rect {
        Rect::new(self.below(48), self.below(48), self.below(48), self.below(48))
    }
}

fn filled(input: &mut Input<'_>, w: usize, h: usize, format: KnownPixelFormat) -> Option<BitmapData<OwnedBuffer>> {
    let mut bitmap = BitmapDataBuilder::new(w, h, format).allocate().ok()?;
    for y in 0..h {
        for x in 0..w {
            let c = Color32::new(input.byte(), input.byte(), input.byte(), input.byte());
            bitmap.set_color32(x, y, c).ok()?;
        }
    }
    Some(bitmap)
}

fuzz_target!(|data: &[u8]| {
    let mut input = Input(data);
    let (src_format, dst_format) = (input.format(), input.format());
    let (sw, sh) = (1 + input.below(40), 1 + input.below(8));
    let (dw, dh) = (1 + input.below(40), 1 + input.below(8));
    let source_rect = input.rect();
    let at = Point::new(input.below(48), input.below(48));
    let flags = input.byte();

    let Some(src) = filled(&mut input, sw, sh, src_format) else {
        return;
    };
    let Ok(mut dst) = BitmapDataBuilder::new(dw, dh, dst_format).allocate() else {
        return;
    };

    let quantizer = PredefinedColorsQuantizer::for_target(&dst);
    let ordered = OrderedDitherer::bayer8x8();
    let diffusion = ErrorDiffusionDitherer::sierra_lite();
    let mut request = if flags & 1 != 0 {
        CopyRequest::draw(&src, &mut dst)
    } else {
        CopyRequest::copy(&src, &mut dst)
    }
    .with_source_rect(source_rect)
    .with_target(at)
    .skip_transparent(flags & 2 != 0);
    if flags & 4 != 0 {
        request = request.with_quantizer(&quantizer);
    }
    match (flags >> 3) & 3 {
        1 => request = request.with_ditherer(&ordered),
        2 => request = request.with_ditherer(&diffusion),
        _ => {}
    }
    let done = request
        .execute(&OperationContext::unstoppable())
        .expect("copy between valid bitmaps must succeed");
    assert!(done.is_finished());
});
