use super::*;

#[test]
fn parses_geometry_and_parts() {
    let d = AnimationDescriptor::parse("480 800 30\np 1 0 part0\np 0 5 part1\n");
    assert_eq!((d.width, d.height, d.fps), (480, 800, 30));
    assert_eq!(d.parts.len(), 2);
    assert_eq!(d.parts[0].repeat_count, 1);
    assert_eq!(d.parts[0].pause_frames, 0);
    assert_eq!(d.parts[0].path, "part0");
    assert!(!d.parts[0].caches_textures());
    assert_eq!(d.parts[1].repeat_count, 0);
    assert!(d.parts[1].is_infinite());
    assert_eq!(d.parts[1].pause_frames, 5);
    assert!(d.skipped_lines.is_empty());
    d.validate().unwrap();
    assert_eq!(d.frame_rate().unwrap().num(), 30);
}

#[test]
fn malformed_lines_are_recorded_not_fatal() {
    let d = AnimationDescriptor::parse("\n480 800\np x 0 part0\np 2 0 part1/\nhello\n320 240 15");
    assert_eq!((d.width, d.height, d.fps), (320, 240, 15));
    assert_eq!(d.parts.len(), 1);
    assert_eq!(d.parts[0].path, "part1");
    let lines: Vec<usize> = d.skipped_lines.iter().map(|(n, _)| *n).collect();
    assert_eq!(lines, vec![2, 3, 5]);
}

#[test]
fn missing_geometry_or_fps_is_invalid() {
    assert!(AnimationDescriptor::parse("p 1 0 part0\n").validate().is_err());
    assert!(AnimationDescriptor::parse("480 800 0\n").validate().is_err());
    assert!(matches!(
        AnimationDescriptor::parse("0 800 30\n").validate(),
        Err(BootError::Validation(_))
    ));
}

#[test]
fn oversized_canvas_is_invalid() {
    let d = AnimationDescriptor::parse("2147483648 4 10\np 1 0 p0\n");
    assert_eq!(d.width, 1 << 31);
    assert!(matches!(d.validate(), Err(BootError::Validation(_))));
    AnimationDescriptor::parse("2147483647 4 10\n").validate().unwrap();
}
