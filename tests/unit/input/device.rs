use super::*;
use crate::input::event::{KEY_VOLUMEDOWN, KEY_VOLUMEUP};

#[test]
fn bitmask_parses_64_bit_words() {
    // Keys 114 and 115 live in word 1, bits 50 and 51.
    let mask = KeyBitmask::parse("c000000000000 0\n", 64).unwrap();
    assert!(mask.has(KEY_VOLUMEDOWN));
    assert!(mask.has(KEY_VOLUMEUP));
    assert!(!mask.has(116));
    assert!(!mask.has(1));
}

#[test]
fn bitmask_parses_32_bit_words() {
    let mask = KeyBitmask::parse("40000 0 0 0", 32).unwrap();
    assert!(mask.has(KEY_VOLUMEDOWN));
    assert!(!mask.has(KEY_VOLUMEUP));
}

#[test]
fn bitmask_rejects_garbage() {
    assert!(KeyBitmask::parse("zz", 64).is_err());
    assert!(KeyBitmask::parse("0", 16).is_err());
    assert!(!KeyBitmask::parse("", 64).unwrap().has(KEY_VOLUMEUP));
}

#[test]
fn scripted_device_replays_then_idles() {
    let mut dev = ScriptedInputDevice::new()
        .idle(1)
        .key_down(KEY_VOLUMEUP)
        .fail();
    assert_eq!(dev.read_event().unwrap(), None);
    assert_eq!(
        dev.read_event().unwrap(),
        Some(InputEvent::key_down(KEY_VOLUMEUP))
    );
    assert!(dev.read_event().is_err());
    assert_eq!(dev.read_event().unwrap(), None);
}

#[test]
fn sysfs_probe_reads_capabilities() {
    let root = std::env::temp_dir().join(format!("bootanim-sysfs-{}", std::process::id()));
    let caps = root.join("event3").join("device").join("capabilities");
    std::fs::create_dir_all(&caps).unwrap();
    std::fs::write(caps.join("key"), "0\n").unwrap();

    let probe = SysfsProbe::new(&root);
    let mask = probe.key_bits(Path::new("/dev/input/event3")).unwrap();
    assert!(!mask.has(KEY_VOLUMEUP));
    assert!(probe.key_bits(Path::new("/dev/input/event9")).is_err());
    let _ = std::fs::remove_dir_all(&root);
}
