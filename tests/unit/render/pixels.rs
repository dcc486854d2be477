use super::*;

#[test]
fn rgb565_keeps_primary_colors() {
    let rgba = [255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255];
    let packed = pack_rgba8(PixelFormat::Rgb565, &rgba);
    assert_eq!(packed.len(), 6);
    let back = unpack_to_rgba8(PixelFormat::Rgb565, 3, 1, &packed).unwrap();
    assert_eq!(back, rgba.to_vec());
}

#[test]
fn rgba4444_drops_low_nibbles() {
    let packed = pack_rgba8(PixelFormat::Rgba4444, &[0x12, 0x34, 0x56, 0x78]);
    let back = unpack_to_rgba8(PixelFormat::Rgba4444, 1, 1, &packed).unwrap();
    assert_eq!(back, vec![0x11, 0x33, 0x55, 0x77]);
}

#[test]
fn alpha8_expands_to_white_coverage() {
    let back = unpack_to_rgba8(PixelFormat::Alpha8, 2, 1, &[0, 200]).unwrap();
    assert_eq!(back, vec![255, 255, 255, 0, 255, 255, 255, 200]);
}

#[test]
fn short_buffers_are_rejected() {
    assert!(unpack_to_rgba8(PixelFormat::Rgba8888, 2, 2, &[0; 15]).is_err());
}
