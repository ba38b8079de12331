use zenblit::*;

#[test]
fn straight_roundtrip_stays_within_rounding() {
    for a in 1..=255u8 {
        let bound = 255.0 / (2.0 * f32::from(a)) + 0.5;
        for v in (0..=255u8).step_by(5) {
            let c = Color32::new(a, v, 255 - v, v / 3);
            let back = c.to_premultiplied().to_straight();
            assert_eq!(back.a, a);
            for (x, y) in [(c.r, back.r), (c.g, back.g), (c.b, back.b)] {
                let diff = f32::from(x.abs_diff(y));
                assert!(diff <= bound, "{c:?} -> {back:?}");
            }
        }
    }
    assert_eq!(
        Color32::new(255, 1, 2, 3).to_premultiplied().to_straight(),
        Color32::new(255, 1, 2, 3)
    );
}

#[test]
fn blend_identities_hold_at_every_depth() {
    let backs = [
        Color32::new(128, 10, 200, 30),
        Color32::WHITE,
        Color32::TRANSPARENT,
    ];
    let solid = Color32::from_rgb(1, 2, 3);
    for back in backs {
        for space in [WorkingColorSpace::Srgb, WorkingColorSpace::Linear] {
            assert_eq!(solid.blend_with(back, space), solid);
            assert_eq!(Color32::TRANSPARENT.blend_with(back, space), back);

            let solid64 = solid.to_color64();
            assert_eq!(solid64.blend_with(back.to_color64(), space), solid64);
            assert_eq!(
                Color64::TRANSPARENT.blend_with(back.to_color64(), space),
                back.to_color64()
            );
        }
        let solid_f = solid.to_color_f();
        assert_eq!(solid_f.blend_with(back.to_color_f()), solid_f);
    }
}

#[test]
fn complex_blend_accumulates_alpha() {
    let src = Color32::new(128, 255, 0, 0);
    let dst = Color32::new(128, 0, 0, 255);
    let out = src.blend_with(dst, WorkingColorSpace::Srgb);
    // 128 + 128 * 127 / 255
    assert!((191..=192).contains(&out.a), "{out:?}");
    assert!(out.r > out.b);
}

#[test]
fn gray_uses_luma_weights() {
    let red = Color32::from_rgb(255, 0, 0);
    assert_eq!(red.to_gray(WorkingColorSpace::Srgb), Color32::from_gray(76));
    let green = Color32::from_rgb(0, 255, 0);
    assert_eq!(green.brightness(WorkingColorSpace::Srgb), 150);
    // Linear luma weighs green even more.
    assert!(green.brightness(WorkingColorSpace::Linear) > 200);
    for v in [0u8, 1, 127, 128, 254, 255] {
        let gray = Color32::from_gray(v);
        assert_eq!(gray.to_gray(WorkingColorSpace::Srgb), gray);
        assert_eq!(gray.to_gray(WorkingColorSpace::Linear), gray);
    }
}

#[test]
fn wide_colors_narrow_by_shifting() {
    let c = Color64::new(0xFFFF, 0x12FF, 0x0001, 0x8080);
    assert_eq!(c.to_color32(), Color32::new(0xFF, 0x12, 0x00, 0x80));
    let c = Color32::new(0x80, 0x12, 0x34, 0x56);
    assert_eq!(c.to_color64().to_color32(), c);
}

#[test]
fn packed_layouts_replicate_bits() {
    let c = Rgb565::from_color32(Color32::from_rgb(0xFF, 0x80, 0x08));
    assert_eq!(c.to_color32(), Color32::from_rgb(0xFF, 0x82, 0x08));
    assert_eq!(
        Argb1555::from_color32(Color32::new(255, 0, 0, 0xFF)).to_color32(),
        Color32::from_rgb(0, 0, 0xFF)
    );
    assert_eq!(Argb1555::TRANSPARENT.to_color32().a, 0);
}

#[test]
fn hex_strings_parse() {
    let c: Color32 = "#80FF8000".parse().unwrap();
    assert_eq!(c, Color32::new(0x80, 0xFF, 0x80, 0x00));
    assert_eq!(c.to_argb(), 0x80FF_8000);
    assert!(matches!(
        "#GG0000".parse::<Color32>(),
        Err(BitmapError::InvalidArgument(_))
    ));
}

#[cfg(feature = "rgb")]
#[test]
fn rgb_crate_interop() {
    let c = Color32::new(10, 20, 30, 40);
    let px: rgb::RGBA8 = c.into();
    assert_eq!(px, rgb::RGBA8::new(20, 30, 40, 10));
    assert_eq!(Color32::from(px), c);

    let f = ColorF::new(0.5, 0.25, 0.0, 1.0);
    let px: rgb::RGBA<f32> = f.into();
    assert_eq!(ColorF::from(px), f);
}
