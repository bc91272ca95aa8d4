// tests/unit_node.rs
use granary::node;
use std::path::Path;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

const REGISTRY: &str = "\
Node: lamb1
OS: Linux (Ubuntu 24.04)
Arch: x86_64
Platform: x86_64-linux-gnu
PkgType: source

Node: mule2
OS: Windows Server 2022
Arch: x64
Platform: mingw32
PkgType: win.binary
Encoding: latin1
Note: rebooted during the run
";

#[test]
fn node_list_entries_may_carry_a_package_filter() {
    let parsed = node::parse_node_list("lamb1 mule2:alpha,Beta");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0], ("lamb1".to_string(), None));
    assert_eq!(
        parsed[1],
        (
            "mule2".to_string(),
            Some(vec!["alpha".to_string(), "Beta".to_string()])
        )
    );
}

#[test]
fn registry_defaults_encoding_and_keeps_the_note() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodes.dcf");
    write(&path, REGISTRY);
    let registry = node::load_registry(&path).unwrap();

    assert_eq!(registry["lamb1"].encoding, "utf-8");
    assert_eq!(registry["lamb1"].note, None);
    assert_eq!(registry["mule2"].encoding, "latin1");
    assert_eq!(
        registry["mule2"].note.as_deref(),
        Some("rebooted during the run")
    );
}

#[test]
fn registry_missing_required_field_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodes.dcf");
    write(&path, "Node: lamb1\nOS: Linux\n");
    assert!(node::load_registry(&path).is_err());
}

#[test]
fn unknown_listed_node_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("nodes.dcf");
    write(&registry, REGISTRY);
    let err = node::load_nodes(dir.path(), &registry, "lamb1 ghost9").unwrap_err();
    assert!(err.to_string().contains("ghost9"), "{err}");
}

#[test]
fn missing_node_info_only_degrades_the_summary() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("nodes.dcf");
    write(&registry, REGISTRY);
    let nodes = node::load_nodes(dir.path(), &registry, "lamb1").unwrap();
    assert_eq!(nodes.len(), 1);
    assert!(nodes[0].r_version.is_empty());
    assert_eq!(nodes[0].r_installed_packages, 0);
}

#[test]
fn node_metadata_is_read_from_the_uploaded_files() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("nodes.dcf");
    write(&registry, REGISTRY);
    let info = dir.path().join("products-in/lamb1/NodeInfo");
    write(&info.join("R-version.txt"), "R version 4.5.1 (2026-06-14)\n");
    write(
        &info.join("R-instpkgs.txt"),
        "Package LibPath Version Built\n\
         alpha /opt/R/lib 1.0.0 4.5.1\n\
         utils /opt/R/lib 4.5.1 4.5.1\n",
    );

    let nodes = node::load_nodes(dir.path(), &registry, "lamb1").unwrap();
    assert_eq!(nodes[0].r_version, "R version 4.5.1 (2026-06-14)");
    assert_eq!(nodes[0].r_installed_packages, 2);
}

#[test]
fn binary_stage_follows_the_package_type() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("nodes.dcf");
    write(&registry, REGISTRY);
    let nodes = node::load_nodes(dir.path(), &registry, "lamb1 mule2").unwrap();
    assert!(!nodes[0].has_buildbin());
    assert!(nodes[1].has_buildbin());
}

#[test]
fn package_filter_restricts_supports() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("nodes.dcf");
    write(&registry, REGISTRY);
    let nodes = node::load_nodes(dir.path(), &registry, "mule2:alpha").unwrap();
    assert!(nodes[0].supports("alpha"));
    assert!(!nodes[0].supports("Beta"));
}
