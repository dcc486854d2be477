use super::*;
use crate::logs::entry::LogPriority;

fn entry(sec: u32) -> LogEntry {
    LogEntry::new(0, sec, 0, LogPriority::Info, "tag", "msg")
}

#[test]
fn memory_source_follows_its_script() {
    let mut src = MemoryLogSource::new("mem")
        .entry(entry(1))
        .would_block()
        .entry(entry(2))
        .fail();
    assert_eq!(src.name(), "mem");
    assert_eq!(src.read_entry().unwrap().unwrap().sec, 1);
    assert!(src.read_entry().unwrap().is_none());
    assert_eq!(src.read_entry().unwrap().unwrap().sec, 2);
    assert!(matches!(src.read_entry(), Err(BootError::Device(_))));
    // Exhausted scripts read as would-block.
    assert!(src.read_entry().unwrap().is_none());
}

#[test]
fn closures_are_factories() {
    let mut calls = 0;
    let mut factory = move || {
        calls += 1;
        vec![Box::new(MemoryLogSource::with_entries("a", [entry(calls)])) as Box<dyn LogSource>]
    };
    let mut first = factory.open_sources();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].read_entry().unwrap().unwrap().sec, 1);
    let mut second = factory.open_sources();
    assert_eq!(second[0].read_entry().unwrap().unwrap().sec, 2);
}

#[test]
fn device_factory_skips_missing_devices() {
    let mut factory = DeviceLogFactory::new(vec![PathBuf::from("/nonexistent/bootanim/log/main")]);
    assert!(factory.open_sources().is_empty());
}

#[test]
fn device_source_reports_eof() {
    let dir = std::env::temp_dir().join(format!("bootanim-logsrc-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("empty");
    std::fs::write(&path, b"").unwrap();

    let mut src = DeviceLogSource::open(&path, 0).unwrap();
    assert!(matches!(src.read_entry(), Err(BootError::Device(_))));
    let _ = std::fs::remove_dir_all(&dir);
}
