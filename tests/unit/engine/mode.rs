use super::*;

#[test]
fn silent_selects_by_archive_presence() {
    assert_eq!(select_mode(DisplayThreshold::SILENT, true), Mode::Movie);
    assert_eq!(select_mode(DisplayThreshold::SILENT, false), Mode::Logo);
}

#[test]
fn any_visible_overlay_selects_text() {
    for raw in 2..8 {
        let t = DisplayThreshold::new(raw).unwrap();
        assert_eq!(select_mode(t, true), Mode::Text);
        assert_eq!(select_mode(t, false), Mode::Text);
    }
}

#[test]
fn default_state_is_silent_without_switch() {
    let s = ModeState::default();
    assert_eq!(s.threshold, DisplayThreshold::SILENT);
    assert!(!s.switch_requested);
}
