// tests/unit_messages.rs
use granary::messages::{join_labels, Explanations};
use granary::stage::{BuildType, Stage, Timeouts};

fn timeouts_with(lookup: &[(&str, &str)]) -> Timeouts {
    let table: Vec<(String, String)> = lookup
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    Timeouts::resolve(BuildType::Standard, move |name| {
        table
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    })
}

#[test]
fn join_grammar_is_exact_for_small_n() {
    assert_eq!(join_labels(&["BUILD"], "or"), "BUILD");
    assert_eq!(join_labels(&["BUILD", "CHECK"], "or"), "BUILD or CHECK");
    assert_eq!(
        join_labels(&["INSTALL", "BUILD", "CHECK"], "or"),
        "INSTALL, BUILD or CHECK"
    );
    assert_eq!(
        join_labels(&["INSTALL", "BUILD", "CHECK", "BUILD BIN"], "and"),
        "INSTALL, BUILD, CHECK and BUILD BIN"
    );
}

#[test]
fn timeout_message_with_uniform_timeouts_states_value_once() {
    let timeouts = timeouts_with(&[("GRANARY_CMD_TIMEOUT", "2400")]);
    let ex = Explanations::compose(&[Stage::BuildSrc, Stage::CheckSrc], &timeouts, false);
    assert_eq!(
        ex.timeout,
        "BUILD or CHECK of package took more than 40 minutes"
    );
}

#[test]
fn timeout_message_with_differing_timeouts_lists_all_respectively() {
    let timeouts = timeouts_with(&[
        ("GRANARY_BUILD_TIMEOUT", "2400"),
        ("GRANARY_CHECK_TIMEOUT", "4800"),
    ]);
    let ex = Explanations::compose(&[Stage::BuildSrc, Stage::CheckSrc], &timeouts, false);
    assert_eq!(
        ex.timeout,
        "BUILD or CHECK of package took more than 40 or 80 minutes, respectively"
    );
}

#[test]
fn timeout_message_single_stage() {
    let timeouts = timeouts_with(&[("GRANARY_CMD_TIMEOUT", "7200")]);
    let ex = Explanations::compose(&[Stage::BuildSrc], &timeouts, false);
    assert_eq!(ex.timeout, "BUILD of package took more than 120 minutes");
}

#[test]
fn error_message_extracts_check_clause() {
    let timeouts = Timeouts::for_buildtype(BuildType::Standard);
    let ex = Explanations::compose(
        &[Stage::BuildSrc, Stage::CheckSrc, Stage::BuildBin],
        &timeouts,
        false,
    );
    assert_eq!(
        ex.error,
        "Bad DESCRIPTION file, or BUILD or BUILD BIN of package failed, \
         or CHECK produced errors"
    );
}

#[test]
fn error_message_for_check_only() {
    let timeouts = Timeouts::for_buildtype(BuildType::Standard);
    let ex = Explanations::compose(&[Stage::CheckSrc], &timeouts, false);
    assert_eq!(
        ex.error,
        "Bad DESCRIPTION file, or CHECK of package produced errors"
    );
}

#[test]
fn error_message_without_check() {
    let timeouts = Timeouts::for_buildtype(BuildType::Workflows);
    let ex = Explanations::compose(&[Stage::BuildSrc], &timeouts, false);
    assert_eq!(ex.error, "Bad DESCRIPTION file, or BUILD of package failed");
}

#[test]
fn warnings_message_requires_active_check_stage() {
    let timeouts = Timeouts::for_buildtype(BuildType::Standard);
    let with_check = Explanations::compose(&[Stage::BuildSrc, Stage::CheckSrc], &timeouts, false);
    assert_eq!(
        with_check.warnings.as_deref(),
        Some("CHECK of package produced warnings")
    );
    let without_check = Explanations::compose(&[Stage::BuildSrc], &timeouts, false);
    assert_eq!(without_check.warnings, None);
}

#[test]
fn ok_message_uses_and_under_compact_layout() {
    let timeouts = Timeouts::for_buildtype(BuildType::Standard);
    let stages = [Stage::BuildSrc, Stage::CheckSrc];
    let full = Explanations::compose(&stages, &timeouts, false);
    assert_eq!(full.ok, "BUILD or CHECK of package went OK");
    let compact = Explanations::compose(&stages, &timeouts, true);
    assert_eq!(compact.ok, "BUILD and CHECK of package went OK");
}

#[test]
fn na_message_lists_all_stages() {
    let timeouts = Timeouts::for_buildtype(BuildType::Standard);
    let ex = Explanations::compose(
        &[Stage::BuildSrc, Stage::CheckSrc, Stage::BuildBin],
        &timeouts,
        false,
    );
    assert_eq!(
        ex.na,
        "BUILD, CHECK or BUILD BIN result is not available because of an \
         anomaly in the Build System"
    );
}

#[test]
fn skipped_message_covers_check_and_buildbin_only() {
    let timeouts = Timeouts::for_buildtype(BuildType::Standard);
    let ex = Explanations::compose(
        &[Stage::BuildSrc, Stage::CheckSrc, Stage::BuildBin],
        &timeouts,
        false,
    );
    assert_eq!(
        ex.skipped.as_deref(),
        Some("CHECK or BUILD BIN of package was skipped because the BUILD step failed")
    );
    let build_only = Explanations::compose(&[Stage::BuildSrc], &timeouts, false);
    assert_eq!(build_only.skipped, None);
}

#[test]
fn timeout_message_covers_install_for_long_tests() {
    let timeouts = Timeouts::for_buildtype(BuildType::LongTests);
    let ex = Explanations::compose(BuildType::LongTests.stages(), &timeouts, false);
    assert_eq!(
        ex.timeout,
        "INSTALL, BUILD or CHECK of package took more than 360 minutes"
    );
}
