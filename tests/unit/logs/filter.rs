use super::*;
use crate::logs::entry::LogPriority;

fn e(tag: &str, msg: &str) -> LogEntry {
    LogEntry::new(0, 0, 0, LogPriority::Info, tag, msg)
}

#[test]
fn threshold_modes() {
    assert_eq!(DisplayThreshold::SILENT.overlay(), OverlayMode::Silent);
    assert_eq!(DisplayThreshold::FATAL_ONLY.overlay(), OverlayMode::Curated);
    assert_eq!(DisplayThreshold::VERBOSE.overlay(), OverlayMode::Verbose);
    assert_eq!(DisplayThreshold::new(5).unwrap().overlay(), OverlayMode::Verbose);
    assert!(DisplayThreshold::new(1).is_err());
    assert!(DisplayThreshold::new(9).is_err());
    assert_eq!(DisplayThreshold::default(), DisplayThreshold::SILENT);
}

#[test]
fn stepping_clamps_and_wraps() {
    let t = DisplayThreshold::SILENT;
    assert_eq!(t.raised(), DisplayThreshold::FATAL_ONLY);
    assert_eq!(t.raised().raised(), DisplayThreshold::SILENT);
    assert_eq!(t.lowered(), DisplayThreshold::FATAL_ONLY);
    assert_eq!(DisplayThreshold::VERBOSE.lowered(), DisplayThreshold::VERBOSE);
    assert_eq!(DisplayThreshold::new(4).unwrap().raised().get(), 5);
}

#[test]
fn threshold_serde_validates() {
    let t: DisplayThreshold = serde_json::from_str("7").unwrap();
    assert_eq!(t, DisplayThreshold::FATAL_ONLY);
    assert!(serde_json::from_str::<DisplayThreshold>("12").is_err());
    assert_eq!(serde_json::to_string(&DisplayThreshold::SILENT).unwrap(), "8");
}

#[test]
fn curated_allow_list() {
    let mut c = LogClassifier::default();
    let t = DisplayThreshold::FATAL_ONLY;

    assert_eq!(
        c.classify(&e("SystemServer", "anything"), t),
        Disposition::Append("SystemServer: anything".into())
    );
    assert_eq!(c.classify(&e("installd", "unrelated"), t), Disposition::Drop);
    assert_eq!(c.classify(&e("RandomTag", "Start proc"), t), Disposition::Drop);
    assert!(matches!(
        c.classify(&e("ActivityManager", "Start proc com.android.phone"), t),
        Disposition::Append(_)
    ));
}

#[test]
fn progress_rule_replaces_only_its_own_row() {
    let mut c = LogClassifier::default();
    let t = DisplayThreshold::FATAL_ONLY;

    assert!(matches!(
        c.classify(&e("installd", "DexInv: --- BEGIN 'a.apk'"), t),
        Disposition::Append(_)
    ));
    assert_eq!(
        c.classify(&e("installd", "DexInv: --- BEGIN 'b.apk'"), t),
        Disposition::ReplaceLast("installd: DexInv: --- BEGIN 'b.apk'".into())
    );
    c.classify(&e("SystemServer", "x"), t);
    assert!(matches!(
        c.classify(&e("installd", "DexInv: --- BEGIN 'c.apk'"), t),
        Disposition::Append(_)
    ));
}

#[test]
fn two_runtime_starts_raise_the_banner() {
    let mut c = LogClassifier::default();
    let t = DisplayThreshold::FATAL_ONLY;
    let start = e("AndroidRuntime", ">>>>>> START com.android.internal.os.ZygoteInit <<<<<<");

    assert!(matches!(c.classify(&start, t), Disposition::Append(_)));
    assert_eq!(c.banner(), None);
    c.classify(&start, t);
    assert_eq!(c.boot_loops(), 2);
    assert!(c.banner().unwrap().contains("boot loop"));
}

#[test]
fn verbose_mode_filters_by_priority() {
    let mut c = LogClassifier::default();
    let t = DisplayThreshold::new(5).unwrap();
    let mut warn = e("Any", "careful");
    warn.priority = LogPriority::Warn;
    let info = e("Any", "chatter");

    assert_eq!(c.classify(&warn, t), Disposition::Append("Any: careful".into()));
    assert_eq!(c.classify(&info, t), Disposition::Drop);
    // Markers are still counted even when filtered out by priority.
    c.classify(&e("AndroidRuntime", ">>>>>> START"), t);
    assert_eq!(c.boot_loops(), 1);
}

#[test]
fn silent_drops_everything() {
    let mut c = LogClassifier::default();
    assert_eq!(
        c.classify(&e("SystemServer", "x"), DisplayThreshold::SILENT),
        Disposition::Drop
    );
}
