// tests/unit_dcf.rs
use granary::dcf::{self, DcfRecord};
use std::io::Write;

#[test]
fn parses_multiple_records_separated_by_blank_lines() {
    let text = "\
Package: alpha
Version: 1.0.0
Maintainer: A. Dev <a@example.org>

Package: beta
Version: 0.2.1
Maintainer: B. Dev <b@example.org>
";
    let records = dcf::parse_str(text);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("Package"), Some("alpha"));
    assert_eq!(records[1].get("Version"), Some("0.2.1"));
}

#[test]
fn continuation_lines_fold_into_the_previous_field() {
    let text = "\
Package: alpha
Description: A package that does one thing
  and does it well.
Version: 1.0.0
";
    let records = dcf::parse_str(text);
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].get("Description"),
        Some("A package that does one thing\nand does it well.")
    );
    assert_eq!(records[0].get("Version"), Some("1.0.0"));
}

#[test]
fn lines_without_a_colon_are_dropped() {
    let text = "Package: alpha\ngarbage line\nVersion: 1.0.0\n";
    let records = dcf::parse_str(text);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("Version"), Some("1.0.0"));
}

#[test]
fn values_keep_embedded_colons() {
    let records = dcf::parse_str("URL: https://example.org/repo\n");
    assert_eq!(records[0].get("URL"), Some("https://example.org/repo"));
}

#[test]
fn required_field_error_names_file_and_field() {
    let record = dcf::parse_str("Package: alpha\n").remove(0);
    let err = record
        .required(std::path::Path::new("pkg-index.dcf"), "Maintainer")
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Maintainer"), "{msg}");
    assert!(msg.contains("pkg-index.dcf"), "{msg}");
}

#[test]
fn parse_single_merges_records_later_fields_winning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meta.dcf");
    std::fs::write(&path, "A: 1\nB: 2\n\nB: 3\nC: 4\n").unwrap();
    let record = dcf::parse_single(&path).unwrap();
    assert_eq!(record.get("A"), Some("1"));
    assert_eq!(record.get("B"), Some("3"));
    assert_eq!(record.get("C"), Some("4"));
}

#[test]
fn read_field_returns_none_for_missing_file_or_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.dcf");
    assert_eq!(dcf::read_field(&path, "Snapshot Date"), None);
    std::fs::write(&path, "Other: x\n").unwrap();
    assert_eq!(dcf::read_field(&path, "Snapshot Date"), None);
    assert_eq!(dcf::read_field(&path, "Other").as_deref(), Some("x"));
}

#[test]
fn decode_lenient_prefers_valid_utf8() {
    assert_eq!(dcf::decode_lenient("caf\u{e9}".as_bytes(), "latin1"), "caf\u{e9}");
}

#[test]
fn decode_lenient_falls_back_to_declared_latin1() {
    // 0xE9 is é in Latin-1 but invalid as a standalone UTF-8 byte.
    let bytes = [b'c', b'a', b'f', 0xE9];
    assert_eq!(dcf::decode_lenient(&bytes, "latin1"), "caf\u{e9}");
    assert_eq!(dcf::decode_lenient(&bytes, "ISO-8859-1"), "caf\u{e9}");
}

#[test]
fn decode_lenient_is_lossy_for_unknown_encodings() {
    let bytes = [b'c', b'a', b'f', 0xE9];
    assert_eq!(dcf::decode_lenient(&bytes, "utf-8"), "caf\u{fffd}");
}

#[test]
fn read_with_encoding_decodes_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(&[b'o', b'k', b' ', 0xE9, b'\n']).unwrap();
    drop(f);
    assert_eq!(
        dcf::read_with_encoding(&path, "latin1").unwrap(),
        "ok \u{e9}\n"
    );
}

#[test]
fn record_insert_overwrites() {
    let mut record = DcfRecord::default();
    record.insert("Status", "OK");
    record.insert("Status", "ERROR");
    assert_eq!(record.get("Status"), Some("ERROR"));
}
