use super::*;

#[test]
fn shine_starts_a_full_width_left_of_the_logo() {
    assert_eq!(shine_offset(Duration::ZERO, 256), 256);
}

#[test]
fn shine_offset_is_a_sawtooth() {
    // Half a period: 128 px at 4 px per 16.667 ms.
    let half = SHINE_STEP * 32;
    let off = shine_offset(half, 256);
    assert!((127..=129).contains(&off), "offset {off}");

    // Always within [0, width].
    for ms in (0..5_000).step_by(37) {
        let off = shine_offset(Duration::from_millis(ms), 200);
        assert!((0..=200).contains(&off), "offset {off} at {ms} ms");
    }
    assert_eq!(shine_offset(Duration::from_secs(3), 0), 0);
}

#[test]
fn builtin_mask_has_cutouts() {
    let mask = builtin_mask();
    assert_eq!(mask.format, PixelFormat::Rgba8888);
    assert_eq!(mask.pixels.len(), (mask.width * mask.height * 4) as usize);
    let alphas: Vec<u8> = mask.pixels.chunks_exact(4).map(|p| p[3]).collect();
    assert!(alphas.contains(&0));
    assert!(alphas.contains(&0xff));
    // The border is solid.
    assert_eq!(alphas[0], 0xff);
}

#[test]
fn builtin_shine_is_brightest_in_the_middle() {
    let shine = builtin_shine(4);
    assert_eq!(shine.format, PixelFormat::Rgb565);
    assert_eq!(shine.width, SHINE_WIDTH);
    let px = |x: usize| u16::from_ne_bytes([shine.pixels[x * 2], shine.pixels[x * 2 + 1]]);
    assert!(px(128) > px(0));
    assert!(px(128) > px(255));
}
