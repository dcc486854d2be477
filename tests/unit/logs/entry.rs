use super::*;

fn record(hdr_size: u16, sec: u32, nsec: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    out.extend_from_slice(&hdr_size.to_le_bytes());
    out.extend_from_slice(&42i32.to_le_bytes());
    out.extend_from_slice(&43i32.to_le_bytes());
    out.extend_from_slice(&sec.to_le_bytes());
    out.extend_from_slice(&nsec.to_le_bytes());
    if hdr_size > 20 {
        out.resize(usize::from(hdr_size), 0);
    }
    out.extend_from_slice(payload);
    out
}

#[test]
fn decodes_v1_record() {
    let rec = record(0, 12, 345, b"\x04SystemServer\0Entered the Android system server!\n\0");
    let e = LogEntry::decode(&rec, 1).unwrap();
    assert_eq!(e.source_id, 1);
    assert_eq!(e.timestamp(), (12, 345));
    assert_eq!(e.priority, LogPriority::Info);
    assert_eq!(e.tag, "SystemServer");
    assert_eq!(e.message, "Entered the Android system server!");
    assert_eq!(
        e.display_line(),
        "SystemServer: Entered the Android system server!"
    );
}

#[test]
fn decodes_v2_header_size() {
    let rec = record(24, 1, 2, b"\x06installd\0DexInv: --- BEGIN\0");
    let e = LogEntry::decode(&rec, 0).unwrap();
    assert_eq!(e.priority, LogPriority::Error);
    assert_eq!(e.tag, "installd");
    assert_eq!(e.message, "DexInv: --- BEGIN");
}

#[test]
fn unterminated_message_takes_the_rest() {
    let rec = record(0, 0, 0, b"\x03tag\0hello");
    assert_eq!(LogEntry::decode(&rec, 0).unwrap().message, "hello");
}

#[test]
fn rejects_malformed_records() {
    assert!(LogEntry::decode(&[0u8; 10], 0).is_err());

    let mut truncated = record(0, 0, 0, b"\x03tag\0msg\0");
    truncated.truncate(truncated.len() - 2);
    assert!(LogEntry::decode(&truncated, 0).is_err());

    let rec = record(0, 0, 0, b"\x03no-terminator");
    assert!(matches!(LogEntry::decode(&rec, 0), Err(BootError::Device(_))));

    let rec = record(0, 0, 0, b"");
    assert!(LogEntry::decode(&rec, 0).is_err());
}

#[test]
fn priority_mapping() {
    assert_eq!(LogPriority::from_raw(7), LogPriority::Fatal);
    assert_eq!(LogPriority::from_raw(200), LogPriority::Unknown);
    assert!(LogPriority::Warn > LogPriority::Info);
    assert_eq!(LogPriority::Silent.level(), 8);
}
