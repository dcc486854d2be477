use super::*;
use crate::foundation::core::Size;
use crate::render::headless::HeadlessSink;

fn setup() -> (HeadlessSink, FontAtlas) {
    let mut sink = HeadlessSink::new(Size::new(100, 54));
    let font = FontAtlas::upload(&mut sink, &FontAtlas::builtin_image()).unwrap();
    (sink, font)
}

#[test]
fn spaces_and_unknown_bytes_are_not_drawn() {
    let (mut sink, font) = setup();
    let probe = sink.probe();
    draw_row(&mut sink, &font, b"a b\x01c\0zzz", 0);
    // a, b, c: the NUL ends the row.
    assert_eq!(probe.stats().draws, 3);
}

#[test]
fn overlay_lights_pixels_on_the_right_rows() {
    let (mut sink, font) = setup();
    let probe = sink.probe();
    let mut buf = LogLineBuffer::new(10, 3);
    buf.append("HELLO");

    draw_overlay(&mut sink, &font, &buf, None);
    sink.swap_buffers().unwrap();

    let front = probe.front().unwrap();
    // Newest row is the bottom one (rows 36..54); the top two rows are blank.
    let lit = |y0: u32, y1: u32| {
        (y0..y1)
            .flat_map(|y| (0..100).map(move |x| (x, y)))
            .filter(|&(x, y)| front.get_pixel(x, y).0[0] > 0)
            .count()
    };
    assert_eq!(lit(0, 36), 0);
    assert!(lit(36, 54) > 0);
}

#[test]
fn banner_takes_the_top_row() {
    let (mut sink, font) = setup();
    let probe = sink.probe();
    let buf = LogLineBuffer::new(10, 3);

    draw_overlay(&mut sink, &font, &buf, Some("WARN"));
    sink.swap_buffers().unwrap();

    let front = probe.front().unwrap();
    let lit_top = (0..18)
        .flat_map(|y| (0..100).map(move |x| (x, y)))
        .filter(|&(x, y)| front.get_pixel(x, y).0[0] > 0)
        .count();
    assert!(lit_top > 0);
}
