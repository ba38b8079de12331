#![no_main]
use libfuzzer_sys::fuzz_target;
use zenblit::*;

// Wide enough to take the parallel path; content comes from the input.
const WIDTH: usize = PARALLEL_WIDTH_THRESHOLD + 28;
const HEIGHT: usize = 12;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let format = KnownPixelFormat::ALL[data[0] as usize % KnownPixelFormat::ALL.len()];
    let draw = data[1] & 1 != 0;
    let dither = data[1] & 2 != 0;
    let pixels = &data[2..];

    let Ok(mut src) = BitmapDataBuilder::new(WIDTH, HEIGHT, KnownPixelFormat::Format32bppArgb).allocate() else {
        return;
    };
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let i = (y * WIDTH + x) * 4;
            let px = |k: usize| pixels[(i + k) % pixels.len()];
            src.set_color32(x, y, Color32::new(px(0), px(1), px(2), px(3)))
                .expect("in bounds");
        }
    }

    let ordered = OrderedDitherer::bayer8x8();
    let run = |parallelism: Parallelism| {
        let mut dst = BitmapDataBuilder::new(WIDTH, HEIGHT, format)
            .allocate()
            .expect("valid size");
        let request = if draw {
            CopyRequest::draw(&src, &mut dst)
        } else {
            CopyRequest::copy(&src, &mut dst)
        };
        let request = if dither { request.with_ditherer(&ordered) } else { request };
        request
            .with_parallelism(parallelism)
            .execute(&OperationContext::unstoppable())
            .expect("copy succeeds");
        dst.into_buffer().expect("not disposed").into_vec()
    };
    assert_eq!(run(Parallelism::Sequential), run(Parallelism::Auto));
});
