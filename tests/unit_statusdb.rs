// tests/unit_statusdb.rs
use granary::stage::Stage;
use granary::statusdb::{PropagationDb, StatusDb};
use granary::status::RawStatus;
use std::path::PathBuf;

fn write_db(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("build-status.db");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn loads_cells_keyed_by_package_node_and_stage() {
    let (_dir, path) = write_db(
        "alpha#lamb1#buildsrc: OK\n\
         alpha#lamb1#checksrc: WARNINGS\n\
         alpha#mule2#buildsrc: ERROR\n",
    );
    let db = StatusDb::load(&path).unwrap();
    assert_eq!(db.len(), 3);
    assert_eq!(
        db.status("alpha", "lamb1", Stage::CheckSrc),
        Some(RawStatus::Warnings)
    );
    assert_eq!(
        db.status("alpha", "mule2", Stage::BuildSrc),
        Some(RawStatus::Error)
    );
}

#[test]
fn blank_and_comment_lines_are_skipped() {
    let (_dir, path) = write_db("# header\n\nalpha#lamb1#buildsrc: OK\n");
    let db = StatusDb::load(&path).unwrap();
    assert_eq!(db.len(), 1);
}

#[test]
fn unrecognized_status_degrades_to_unknown() {
    let (_dir, path) = write_db("alpha#lamb1#buildsrc: EXPLODED\n");
    let db = StatusDb::load(&path).unwrap();
    assert_eq!(
        db.status("alpha", "lamb1", Stage::BuildSrc),
        Some(RawStatus::Unknown)
    );
}

#[test]
fn missing_cell_reads_as_unknown() {
    let (_dir, path) = write_db("alpha#lamb1#buildsrc: OK\n");
    let db = StatusDb::load(&path).unwrap();
    assert_eq!(db.status("beta", "lamb1", Stage::BuildSrc), None);
    assert_eq!(
        db.status_or_unknown("beta", "lamb1", Stage::BuildSrc),
        RawStatus::Unknown
    );
}

#[test]
fn malformed_key_is_fatal() {
    let (_dir, path) = write_db("alpha#lamb1: OK\n");
    let err = StatusDb::load(&path).unwrap_err();
    assert!(err.to_string().contains("build-status.db"), "{err}");

    let (_dir, path) = write_db("alpha#lamb1#deploy: OK\n");
    assert!(StatusDb::load(&path).is_err());
}

#[test]
fn missing_database_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    assert!(StatusDb::load(&dir.path().join("build-status.db")).is_err());
}

#[test]
fn propagation_db_groups_targets_per_package() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("propagation-status.db");
    std::fs::write(
        &path,
        "alpha#source: YES\nalpha#win.binary: NO, too new\nbeta#source: YES\n",
    )
    .unwrap();
    let db = PropagationDb::load(&path).unwrap();
    assert_eq!(
        db.for_package("alpha"),
        [
            ("source".to_string(), "YES".to_string()),
            ("win.binary".to_string(), "NO, too new".to_string()),
        ]
    );
    assert!(db.for_package("gamma").is_empty());
}

#[test]
fn propagation_db_drops_malformed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("propagation-status.db");
    std::fs::write(&path, "not a record\nalpha#source: YES\nno-hash: YES\n").unwrap();
    let db = PropagationDb::load(&path).unwrap();
    assert_eq!(db.for_package("alpha").len(), 1);
    assert!(db.for_package("no-hash").is_empty());
}
