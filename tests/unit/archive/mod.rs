use super::*;

#[test]
fn entry_path_parts() {
    let e = ArchiveEntry {
        name: "part0/frame001.png".into(),
        method: CompressionMethod::Stored,
        span: 0..0,
        uncompressed_len: 0,
    };
    assert_eq!(e.directory(), "part0");
    assert_eq!(e.leaf(), "frame001.png");

    let dir = ArchiveEntry {
        name: "part0/".into(),
        ..e.clone()
    };
    assert_eq!(dir.directory(), "part0");
    assert_eq!(dir.leaf(), "");

    let root = ArchiveEntry {
        name: "desc.txt".into(),
        ..e
    };
    assert_eq!(root.directory(), "");
    assert_eq!(root.leaf(), "desc.txt");
}

#[test]
fn stored_entries_are_borrowed() {
    let a = MemoryArchive::new().stored("a", b"hello").stored("b", b"world");
    let bytes = a.read_entry("b").unwrap();
    assert!(matches!(bytes, Cow::Borrowed(_)));
    assert_eq!(&*bytes, b"world");
    assert_eq!(a.bytes(a.find("a").unwrap().span.clone()).unwrap(), b"hello");
}

#[test]
fn deflated_entries_are_inflated() {
    let text = b"480 800 30\np 1 0 part0\n".repeat(8);
    let a = MemoryArchive::new().deflated("desc.txt", &text).unwrap();
    assert!(!a.find("desc.txt").unwrap().is_stored());
    assert_eq!(&*a.read_entry("desc.txt").unwrap(), text.as_slice());
}

#[test]
fn inflation_ignores_an_inflated_length_claim() {
    let text = b"480 800 30\np 1 0 part0\n";
    let packed = MemoryArchive::new().deflated("d", text).unwrap();
    let span = packed.find("d").unwrap().span.clone();
    let raw = packed.bytes(span).unwrap().to_vec();

    let a = MemoryArchive::new().raw("desc.txt", CompressionMethod::Deflated, &raw, u64::from(u32::MAX));
    let out = a.read_entry("desc.txt").unwrap();
    assert_eq!(&*out, text);
    assert!(matches!(out, Cow::Owned(ref v) if v.capacity() < 1 << 20));
}

#[test]
fn unreadable_entries_fail() {
    let a = MemoryArchive::new().raw("x", CompressionMethod::Other(12), b"??", 2);
    assert!(matches!(a.read_entry("x"), Err(BootError::Archive(_))));
    assert!(matches!(a.read_entry("missing"), Err(BootError::Archive(_))));
    assert!(a.bytes(0..100).is_err());
}

#[test]
fn method_ids_round_trip() {
    assert_eq!(CompressionMethod::from_zip(0), CompressionMethod::Stored);
    assert_eq!(CompressionMethod::from_zip(8), CompressionMethod::Deflated);
    assert_eq!(CompressionMethod::from_zip(14).zip_id(), 14);
}
