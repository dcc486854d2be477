use super::*;
use crate::archive::{CompressionMethod, MemoryArchive};
use crate::foundation::error::BootError;

fn sample() -> MemoryArchive {
    MemoryArchive::new()
        .stored("desc.txt", b"480 800 30\np 1 0 part0\np 0 5 part1\n")
        .stored("part0/", b"")
        .stored("part0/002.png", b"two")
        .stored("part0/001.png", b"one")
        .raw("part0/003.png", CompressionMethod::Deflated, b"zz", 3)
        .stored("part1/000.png", b"loop")
        .stored("other/000.png", b"stray")
}

#[test]
fn resolves_stored_frames_sorted_by_name() {
    let archive = sample();
    let desc = load_descriptor(&archive).unwrap();

    let names: Vec<_> = desc.parts[0].frames.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["001.png", "002.png"]);
    assert_eq!(archive.bytes(desc.parts[0].frames[0].span.clone()).unwrap(), b"one");
    assert_eq!(desc.parts[1].frames.len(), 1);
    assert!(desc.parts.iter().flat_map(|p| &p.frames).all(|f| f.texture.is_none()));
    assert_eq!(desc.frame_count(), 3);
}

#[test]
fn compressed_entries_are_never_frames() {
    let archive = MemoryArchive::new()
        .stored("desc.txt", b"10 10 1\np 1 0 a\n")
        .deflated("a/000.png", b"frame")
        .unwrap();
    let desc = load_descriptor(&archive).unwrap();
    assert!(desc.parts[0].frames.is_empty());
}

#[test]
fn parts_sharing_a_path_share_frames() {
    let archive = MemoryArchive::new()
        .stored("desc.txt", b"10 10 1\np 1 0 a\np 2 0 a/\n")
        .stored("a/000.png", b"x");
    let desc = load_descriptor(&archive).unwrap();
    assert_eq!(desc.parts[0].frames.len(), 1);
    assert_eq!(desc.parts[1].frames.len(), 1);
}

#[test]
fn missing_or_invalid_manifest_fails() {
    let no_desc = MemoryArchive::new().stored("a/000.png", b"x");
    assert!(matches!(load_descriptor(&no_desc), Err(BootError::Archive(_))));

    let bad = MemoryArchive::new().stored("desc.txt", b"p 1 0 a\n");
    assert!(matches!(load_descriptor(&bad), Err(BootError::Validation(_))));
}
