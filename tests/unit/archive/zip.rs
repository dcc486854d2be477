use super::*;

#[test]
fn reads_back_what_it_writes() {
    let desc = b"480 800 30\np 1 0 part0\n";
    let bytes = write_zip([
        ("desc.txt", &desc[..], CompressionMethod::Deflated),
        ("part0/000.png", &b"frame-a"[..], CompressionMethod::Stored),
        ("part0/001.png", &b"frame-b"[..], CompressionMethod::Stored),
    ])
    .unwrap();

    let zip = ZipArchive::from_bytes("test.zip", bytes).unwrap();
    let names: Vec<_> = zip.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["desc.txt", "part0/000.png", "part0/001.png"]);

    let frame = zip.find("part0/001.png").unwrap();
    assert!(frame.is_stored());
    assert_eq!(zip.bytes(frame.span.clone()).unwrap(), b"frame-b");
    assert_eq!(zip.find("desc.txt").unwrap().method, CompressionMethod::Deflated);
    assert_eq!(&*zip.read_entry("desc.txt").unwrap(), &desc[..]);
}

#[test]
fn tolerates_a_trailing_comment() {
    let mut bytes = write_stored_zip([("a", &b"1"[..])]).unwrap();
    let n = bytes.len();
    // Patch the comment length and append the comment.
    bytes[n - 2..].copy_from_slice(&5u16.to_le_bytes());
    bytes.extend_from_slice(b"hello");
    let zip = ZipArchive::from_bytes("c.zip", bytes).unwrap();
    assert_eq!(&*zip.read_entry("a").unwrap(), b"1");
}

#[test]
fn empty_archive_has_no_entries() {
    let zip = ZipArchive::from_bytes("e.zip", write_stored_zip([]).unwrap()).unwrap();
    assert!(zip.entries().is_empty());
}

#[test]
fn crc_matches_the_reference_value() {
    let bytes = write_stored_zip([("x", &b"123456789"[..])]).unwrap();
    // CRC-32 of "123456789" sits at offset 14 of the local header.
    assert_eq!(&bytes[14..18], &0xCBF4_3926u32.to_le_bytes());
}

#[test]
fn rejects_garbage_and_truncation() {
    assert!(matches!(
        ZipArchive::from_bytes("g", b"not a zip at all, definitely".to_vec()),
        Err(BootError::Archive(_))
    ));

    let bytes = write_stored_zip([("a", &b"payload"[..])]).unwrap();
    // Drop the local header and data but keep the directory.
    let cut = bytes[20..].to_vec();
    assert!(ZipArchive::from_bytes("t", cut).is_err());
}

#[test]
fn open_first_skips_missing_and_broken_candidates() {
    let dir = std::env::temp_dir().join(format!("bootanim-zip-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let broken = dir.join("broken.zip");
    let good = dir.join("good.zip");
    std::fs::write(&broken, b"junk").unwrap();
    std::fs::write(&good, write_stored_zip([("desc.txt", &b"1 1 1\n"[..])]).unwrap()).unwrap();

    let found = ZipArchive::open_first(&[dir.join("missing.zip"), broken, good.clone()]).unwrap();
    assert_eq!(found.location(), good.display().to_string());
    assert!(ZipArchive::open_first(&[dir.join("missing.zip")]).is_none());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unsupported_methods_cannot_be_written() {
    assert!(write_zip([("a", &b""[..], CompressionMethod::Other(12))]).is_err());
}
