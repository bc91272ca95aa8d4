// tests/unit_stage.rs
use granary::stage::{BuildType, Stage, Timeouts};

#[test]
fn stage_ids_round_trip() {
    for stage in Stage::ALL {
        assert_eq!(Stage::from_id(stage.id()), Some(stage));
    }
    assert_eq!(Stage::from_id("deploy"), None);
}

#[test]
fn buildtype_parse_accepts_known_names_only() {
    assert_eq!(BuildType::parse("standard").unwrap(), BuildType::Standard);
    assert_eq!(BuildType::parse("long-tests").unwrap(), BuildType::LongTests);
    assert_eq!(BuildType::parse("workflows").unwrap(), BuildType::Workflows);
    assert_eq!(BuildType::parse("books").unwrap(), BuildType::Books);
    assert_eq!(BuildType::parse("cran").unwrap(), BuildType::Cran);
    assert!(BuildType::parse("nightly").is_err());
}

#[test]
fn stage_catalog_per_buildtype() {
    assert_eq!(
        BuildType::Standard.stages(),
        &[Stage::BuildSrc, Stage::CheckSrc, Stage::BuildBin]
    );
    assert_eq!(
        BuildType::LongTests.stages(),
        &[Stage::Install, Stage::BuildSrc, Stage::CheckSrc]
    );
    assert_eq!(BuildType::Workflows.stages(), &[Stage::BuildSrc]);
    assert_eq!(BuildType::Books.stages(), &[Stage::BuildSrc]);
}

#[test]
fn install_never_applies_outside_long_tests() {
    for buildtype in [
        BuildType::Standard,
        BuildType::Workflows,
        BuildType::Books,
        BuildType::Cran,
        BuildType::DataExperiment,
    ] {
        assert!(!buildtype.stage_applies(Stage::Install, true));
        assert!(!buildtype.stage_applies(Stage::Install, false));
    }
    assert!(BuildType::LongTests.stage_applies(Stage::Install, false));
}

#[test]
fn buildbin_requires_a_binary_building_node() {
    assert!(BuildType::Standard.stage_applies(Stage::BuildBin, true));
    assert!(!BuildType::Standard.stage_applies(Stage::BuildBin, false));
    // Workflows never run BUILD BIN regardless of the node.
    assert!(!BuildType::Workflows.stage_applies(Stage::BuildBin, true));
}

#[test]
fn buildsrc_always_applies() {
    for buildtype in [
        BuildType::Standard,
        BuildType::LongTests,
        BuildType::Workflows,
        BuildType::Books,
        BuildType::Cran,
        BuildType::DataExperiment,
    ] {
        assert!(buildtype.stage_applies(Stage::BuildSrc, false));
    }
}

#[test]
fn default_timeouts_depend_on_buildtype() {
    assert_eq!(BuildType::Standard.default_timeout_secs(), 2400);
    assert_eq!(BuildType::DataExperiment.default_timeout_secs(), 4800);
    assert_eq!(BuildType::Workflows.default_timeout_secs(), 7200);
    assert_eq!(BuildType::LongTests.default_timeout_secs(), 21600);
}

#[test]
fn timeout_resolution_layers_overrides() {
    let lookup = |name: &str| match name {
        "GRANARY_CMD_TIMEOUT" => Some("3600".to_string()),
        "GRANARY_CHECK_TIMEOUT" => Some("5400".to_string()),
        _ => None,
    };
    let timeouts = Timeouts::resolve(BuildType::Standard, lookup);
    assert_eq!(timeouts.minutes(Stage::BuildSrc), 60);
    assert_eq!(timeouts.minutes(Stage::CheckSrc), 90);
    assert_eq!(timeouts.minutes(Stage::BuildBin), 60);
}

#[test]
fn unparsable_timeout_override_falls_back() {
    let lookup = |name: &str| match name {
        "GRANARY_CMD_TIMEOUT" => Some("soon".to_string()),
        _ => None,
    };
    let timeouts = Timeouts::resolve(BuildType::Standard, lookup);
    assert_eq!(timeouts.minutes(Stage::BuildSrc), 40);
}

#[test]
fn only_long_tests_skip_raw_results() {
    assert!(!BuildType::LongTests.has_raw_results());
    assert!(BuildType::Standard.has_raw_results());
}

#[test]
fn dep_graph_only_for_standard_builds() {
    assert!(BuildType::Standard.has_dep_graph());
    assert!(!BuildType::Workflows.has_dep_graph());
    assert!(!BuildType::LongTests.has_dep_graph());
}
