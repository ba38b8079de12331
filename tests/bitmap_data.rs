use std::sync::Arc;

use zenblit::*;

fn indexed(format: KnownPixelFormat, palette: Palette) -> BitmapData<OwnedBuffer> {
    BitmapDataBuilder::new(8, 2, format)
        .with_palette(Arc::new(palette))
        .allocate()
        .unwrap()
}

#[test]
fn color_index_bounds() {
    let three = Palette::new(vec![Color32::BLACK, Color32::WHITE, Color32::from_rgb(255, 0, 0)])
        .unwrap();
    let mut bitmap = indexed(KnownPixelFormat::Format4bppIndexed, three);
    for i in 0..3 {
        bitmap.set_color_index(5, 1, i).unwrap();
        assert_eq!(bitmap.get_color_index(5, 1).unwrap(), i);
    }
    assert!(matches!(
        bitmap.set_color_index(5, 1, 3),
        Err(BitmapError::IndexOutOfRange { index: 3, limit: 3, .. })
    ));
    assert_eq!(bitmap.get_color32(5, 1).unwrap(), Color32::from_rgb(255, 0, 0));

    let mut mono = indexed(KnownPixelFormat::Format1bppIndexed, Palette::black_and_white());
    mono.set_color_index(0, 0, 1).unwrap();
    assert!(matches!(
        mono.set_color_index(0, 0, 2),
        Err(BitmapError::IndexOutOfRange { limit: 2, .. })
    ));

    let mut full = indexed(KnownPixelFormat::Format8bppIndexed, Palette::grayscale256());
    full.set_color_index(7, 1, 255).unwrap();
    assert!(full.set_color_index(7, 1, 256).is_err());
}

#[test]
fn index_access_needs_indexed_format() {
    let mut rgb = BitmapDataBuilder::new(2, 2, KnownPixelFormat::Format24bppRgb)
        .allocate()
        .unwrap();
    assert!(matches!(rgb.get_color_index(0, 0), Err(BitmapError::InvalidState(_))));
    assert!(matches!(rgb.set_color_index(0, 0, 0), Err(BitmapError::InvalidState(_))));
}

#[test]
fn pixel_coordinates_are_checked() {
    let mut bitmap = BitmapDataBuilder::new(3, 2, KnownPixelFormat::Format32bppArgb)
        .allocate()
        .unwrap();
    assert!(matches!(
        bitmap.set_color32(3, 0, Color32::WHITE),
        Err(BitmapError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        bitmap.get_color32(0, 2),
        Err(BitmapError::IndexOutOfRange { .. })
    ));
}

#[test]
fn raw_access_stays_inside_the_row() {
    // 3 pixels of 24bpp: 9 bytes per row.
    let mut bitmap = BitmapDataBuilder::new(3, 2, KnownPixelFormat::Format24bppRgb)
        .allocate()
        .unwrap();
    bitmap.write_raw::<u32>(1, 1, 0xAABB_CCDD).unwrap();
    assert_eq!(bitmap.read_raw::<u32>(1, 1).unwrap(), 0xAABB_CCDD);
    assert_eq!(bitmap.read_raw::<u8>(8, 1).unwrap(), 0);
    assert!(matches!(
        bitmap.read_raw::<u32>(2, 1),
        Err(BitmapError::IndexOutOfRange { .. })
    ));
    assert!(bitmap.read_raw::<u8>(9, 0).is_err());
    assert!(bitmap.write_raw::<u16>(4, 0, 1).is_err());
}

#[test]
fn colors_without_alpha_support() {
    let mut rgb = BitmapDataBuilder::new(2, 1, KnownPixelFormat::Format24bppRgb)
        .with_back_color(Color32::WHITE)
        .allocate()
        .unwrap();
    rgb.set_color32(0, 0, Color32::new(128, 0, 0, 0)).unwrap();
    let c = rgb.get_color32(0, 0).unwrap();
    assert!(c.is_opaque());
    assert!((126..=128).contains(&c.r), "{c:?}");

    let mut argb1555 = BitmapDataBuilder::new(2, 1, KnownPixelFormat::Format16bppArgb1555)
        .with_alpha_threshold(100)
        .allocate()
        .unwrap();
    argb1555
        .set_color32(0, 0, Color32::new(99, 255, 255, 255))
        .unwrap();
    argb1555
        .set_color32(1, 0, Color32::new(100, 255, 255, 255))
        .unwrap();
    assert_eq!(argb1555.get_color32(0, 0).unwrap().a, 0);
    assert_eq!(argb1555.get_color32(1, 0).unwrap().a, 255);
}

#[test]
fn indexed_rows_store_nearest_entry() {
    let mut bitmap = indexed(KnownPixelFormat::Format8bppIndexed, Palette::grayscale16());
    bitmap.set_color32(0, 0, Color32::from_gray(0x12)).unwrap();
    assert_eq!(bitmap.get_color_index(0, 0).unwrap(), 1);
    assert_eq!(bitmap.get_color32(0, 0).unwrap(), Color32::from_gray(0x11));
}

#[test]
fn row_cursor_walks_down() {
    let mut bitmap = BitmapDataBuilder::new(2, 3, KnownPixelFormat::Format8bppGrayScale)
        .allocate()
        .unwrap();
    {
        let mut row = bitmap.row_mut(0).unwrap();
        loop {
            let y = row.index() as u8;
            row.set_color32(1, Color32::from_gray(y * 40)).unwrap();
            if !row.move_next_row() {
                break;
            }
        }
        assert_eq!(row.index(), 2);
    }
    let mut row = bitmap.first_row().unwrap();
    assert_eq!(row.get_color32(1).unwrap(), Color32::from_gray(0));
    assert!(row.move_next_row());
    assert!(row.move_next_row());
    assert_eq!(row.get_color32(1).unwrap(), Color32::from_gray(80));
    assert!(!row.move_next_row());
}

#[test]
fn color_formats_keep_opaque_primaries() {
    let colors = [
        Color32::BLACK,
        Color32::WHITE,
        Color32::from_rgb(255, 0, 0),
        Color32::from_rgb(0, 0, 255),
    ];
    for format in KnownPixelFormat::ALL {
        if format.info().is_grayscale() || format == KnownPixelFormat::Format1bppIndexed {
            continue;
        }
        let mut builder = BitmapDataBuilder::new(4, 1, format);
        if format.is_indexed() {
            builder = builder.with_palette(Arc::new(Palette::system_4bpp()));
        }
        let mut bitmap = builder.allocate().unwrap();
        for (x, c) in colors.iter().enumerate() {
            bitmap.set_color32(x, 0, *c).unwrap();
        }
        for (x, c) in colors.iter().enumerate() {
            assert_eq!(bitmap.get_color32(x, 0).unwrap(), *c, "{format:?}");
        }
    }
}

#[test]
fn gray_formats_keep_grays() {
    for format in [
        KnownPixelFormat::Format8bppGrayScale,
        KnownPixelFormat::Format16bppGrayScale,
        KnownPixelFormat::Format32bppGrayScale,
    ] {
        let mut bitmap = BitmapDataBuilder::new(3, 1, format).allocate().unwrap();
        for (x, v) in [0u8, 77, 255].into_iter().enumerate() {
            bitmap.set_color32(x, 0, Color32::from_gray(v)).unwrap();
            assert_eq!(bitmap.get_color32(x, 0).unwrap(), Color32::from_gray(v), "{format:?}");
        }
    }
}

#[test]
fn clear_fills_every_pixel() {
    let mut bitmap = BitmapDataBuilder::new(5, 3, KnownPixelFormat::Format4bppIndexed)
        .allocate()
        .unwrap();
    let red = Color32::from_rgb(255, 0, 0);
    bitmap.clear(red).unwrap();
    for y in 0..3 {
        for x in 0..5 {
            assert_eq!(bitmap.get_color32(x, y).unwrap(), red);
        }
    }
}

#[test]
fn compatible_data_keeps_the_layout() {
    let palette = Arc::new(Palette::grayscale16());
    let bitmap = BitmapDataBuilder::new(4, 4, KnownPixelFormat::Format4bppIndexed)
        .with_palette(Arc::clone(&palette))
        .allocate()
        .unwrap();
    let other = bitmap.create_compatible(9, 2).unwrap();
    assert_eq!((other.width(), other.height()), (9, 2));
    assert_eq!(other.known_format(), Some(KnownPixelFormat::Format4bppIndexed));
    assert!(Arc::ptr_eq(other.palette().unwrap(), &palette));
}

#[test]
fn disposed_data_refuses_access() {
    let pool = Arc::new(SharedBufferPool::new(4));
    let mut bitmap = BitmapDataBuilder::new(16, 16, KnownPixelFormat::Format32bppArgb)
        .with_pool(pool.clone())
        .allocate()
        .unwrap();
    bitmap.dispose();
    assert!(bitmap.is_disposed());
    assert_eq!(pool.available(), 1);
    assert!(matches!(bitmap.get_color32(0, 0), Err(BitmapError::InvalidState(_))));
    assert!(matches!(
        bitmap.set_color32(0, 0, Color32::WHITE),
        Err(BitmapError::InvalidState(_))
    ));
}

#[test]
fn foreign_memory_with_padding() {
    let mut memory = vec![0u8; 2 * 16];
    {
        let mut bitmap = BitmapDataBuilder::new(3, 2, KnownPixelFormat::Format32bppArgb)
            .wrap(NativeBuffer::new(&mut memory, 16))
            .unwrap();
        assert_eq!(bitmap.backing_kind(), BackingKind::Native);
        bitmap.set_color32(2, 1, Color32::from_argb(0x11223344)).unwrap();
    }
    assert_eq!(&memory[16 + 8..16 + 12], &[0x44, 0x33, 0x22, 0x11]);
}

#[cfg(feature = "imgref")]
#[test]
fn imgvec_backing() {
    let img = imgref::ImgVec::new(vec![0x8040_2010u32; 6], 3, 2);
    let mut bitmap = BitmapDataBuilder::new(3, 2, KnownPixelFormat::Format32bppArgb)
        .wrap(img)
        .unwrap();
    assert_eq!(bitmap.backing_kind(), BackingKind::Array2D);
    assert_eq!(bitmap.get_color32(2, 1).unwrap(), Color32::from_argb(0x8040_2010));
    bitmap.set_color32(0, 0, Color32::WHITE).unwrap();
    let img = bitmap.into_buffer().unwrap();
    assert_eq!(img.buf()[0], 0xFFFF_FFFF);
}

#[test]
fn clone_region_converts() {
    let mut bitmap = BitmapDataBuilder::new(6, 6, KnownPixelFormat::Format32bppArgb)
        .allocate()
        .unwrap();
    bitmap.set_color32(4, 5, Color32::from_rgb(0, 255, 0)).unwrap();
    let clone = bitmap
        .clone_region(Rect::new(3, 3, 3, 3))
        .with_format(KnownPixelFormat::Format16bppRgb565)
        .execute(&OperationContext::unstoppable())
        .unwrap()
        .unwrap();
    assert_eq!((clone.width(), clone.height()), (3, 3));
    assert_eq!(clone.get_color32(1, 2).unwrap(), Color32::from_rgb(0, 255, 0));
    assert_eq!(clone.get_color32(0, 0).unwrap(), Color32::BLACK);
}
