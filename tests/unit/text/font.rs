use super::*;
use crate::foundation::core::Size;
use crate::render::headless::HeadlessSink;

#[test]
fn builtin_atlas_has_glyph_grid_geometry() {
    let img = FontAtlas::builtin_image();
    assert_eq!((img.width, img.height), (240, 72));
    assert_eq!(img.pixels.len(), 240 * 72);
    // 'A' (code 33) has coverage; space (code 0) has none.
    let cell = |code: u32| {
        let x0 = (code % 24) * 10;
        let y0 = (code / 24) * 18;
        (y0..y0 + 18)
            .flat_map(|y| (x0..x0 + 10).map(move |x| (x, y)))
            .filter(|&(x, y)| img.pixels[(y * 240 + x) as usize] > 0)
            .count()
    };
    assert!(cell(33) > 0);
    assert_eq!(cell(0), 0);
}

#[test]
fn glyph_crops_follow_the_grid() {
    let mut sink = HeadlessSink::new(Size::new(10, 10));
    let font = FontAtlas::upload(&mut sink, &FontAtlas::builtin_image()).unwrap();
    assert_eq!((font.glyph_width(), font.glyph_height()), (10, 18));

    assert_eq!(font.glyph_crop(b' '), Some(IRect::new(0, 0, 10, 18)));
    assert_eq!(font.glyph_crop(b'8'), Some(IRect::new(0, 18, 10, 18)));
    assert_eq!(font.glyph_crop(0x7f), Some(IRect::new(230, 54, 10, 18)));
    assert_eq!(font.glyph_crop(0x1f), None);
    assert_eq!(font.glyph_crop(0x80), None);
}

#[test]
fn tiny_atlas_is_rejected() {
    let mut sink = HeadlessSink::new(Size::new(1, 1));
    let img = DecodedImage::new(23, 4, PixelFormat::Alpha8, vec![0; 92]).unwrap();
    assert!(FontAtlas::upload(&mut sink, &img).is_err());
}
