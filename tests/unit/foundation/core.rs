use std::time::Duration;

use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::per_second(12).unwrap().num(), 12);
}

#[test]
fn whole_rates_never_divide_by_zero() {
    assert_eq!(Fps::whole(12), Fps::per_second(12).unwrap());
    assert_eq!((Fps::whole(0).num(), Fps::whole(0).den()), (1, 1));
    assert_eq!(Fps::whole(0).frame_duration(), Duration::from_secs(1));
}

#[test]
fn frame_duration_matches_rate() {
    assert_eq!(
        Fps::per_second(5).unwrap().frame_duration(),
        Duration::from_millis(200)
    );
    assert_eq!(
        Fps::per_second(12).unwrap().frame_duration(),
        Duration::from_nanos(83_333_333)
    );
}

#[test]
fn centered_rect_splits_slack_evenly() {
    let r = IRect::centered(Size::new(480, 800), Size::new(320, 200));
    assert_eq!(r, IRect::new(80, 300, 320, 200));
}

#[test]
fn centered_rect_saturates_oversized_inputs() {
    let screen = Size::new(64, 64);
    let r = IRect::centered(screen, Size::new(1 << 31, 4));
    assert_eq!(r.width, i32::MAX);
    assert_eq!(r.y, 30);
    assert!(r.x < 0);
    let r = IRect::centered(screen, Size::new(u32::MAX, u32::MAX));
    let visible = r.intersect(screen.to_rect());
    assert!(visible.width <= 64 && visible.height <= 64);
    assert!(screen.to_rect().subtract(r).len() <= 4);
}

#[test]
fn subtract_produces_border_bands() {
    let screen = Size::new(100, 80).to_rect();
    let hole = IRect::new(20, 10, 60, 50);
    let bands = screen.subtract(hole);
    assert_eq!(bands.len(), 4);

    let area: i32 = bands.iter().map(|r| r.width * r.height).sum();
    assert_eq!(area, 100 * 80 - 60 * 50);
    for b in &bands {
        assert!(b.intersect(hole).is_empty());
    }
}

#[test]
fn subtract_full_cover_is_empty() {
    let screen = Size::new(64, 64).to_rect();
    assert!(screen.subtract(screen).is_empty());
    assert!(screen.subtract(IRect::new(-10, -10, 100, 100)).is_empty());
}

#[test]
fn subtract_disjoint_hole_keeps_everything() {
    let screen = Size::new(10, 10).to_rect();
    let bands = screen.subtract(IRect::new(20, 20, 5, 5));
    assert_eq!(bands.as_slice(), &[screen]);
}
