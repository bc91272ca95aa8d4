//! Raw build artifacts: locating per-stage outputs under the central
//! directory, mirroring them into the report's `raw-results` subtree, and
//! rendering them as escaped HTML.

use crate::config::ReportConfig;
use crate::dcf::{self, DcfRecord};
use crate::error::{ReportError, Result};
use crate::html;
use crate::node::NodeSpec;
use crate::stage::Stage;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Fixed text substituted wherever an expected raw output is missing.
pub const APOLOGY: &str = "Due to an anomaly in the Build System, this output \
is not available. We apologize for the inconvenience.";

/// Rendered output is cut after this many lines.
const MAX_OUTPUT_LINES: usize = 99_999;

/// `products-in/<node>/<stage>/<pkg>.<stage>-<suffix>` under the central
/// directory.
fn incoming_path(central: &Path, node: &str, stage: Stage, pkg: &str, suffix: &str) -> PathBuf {
    central
        .join("products-in")
        .join(node)
        .join(stage.id())
        .join(format!("{pkg}.{}-{suffix}", stage.id()))
}

/// `<pkg>/raw-results/<node>/<stage>-<suffix>` under the report root.
fn outgoing_path(report: &Path, pkg: &str, node: &str, stage: Stage, suffix: &str) -> PathBuf {
    report
        .join(pkg)
        .join("raw-results")
        .join(node)
        .join(format!("{}-{suffix}", stage.id()))
}

fn rcheck_path(central: &Path, node: &str, pkg: &str) -> PathBuf {
    central
        .join("products-in")
        .join(node)
        .join(Stage::CheckSrc.id())
        .join(format!("{pkg}.Rcheck"))
}

fn copy_into(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    fs::copy(src, dest).map_err(|e| ReportError::io(src, e))?;
    Ok(())
}

/// Renders a raw file as escaped HTML, decoded per the node's encoding
/// and truncated after [`MAX_OUTPUT_LINES`] lines.
pub fn file_contents_html(path: &Path, encoding: &str) -> Result<String> {
    let text = dcf::read_with_encoding(path, encoding)?;
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i >= MAX_OUTPUT_LINES {
            out.push_str("... [output truncated]\n");
            break;
        }
        out.push_str(&html::escape(line));
        out.push('\n');
    }
    Ok(out)
}

/// Parses the per-cell `summary.dcf`, mirroring it into `raw-results`
/// unless suppressed. `None` when the build system never produced one.
pub fn summary_record(
    config: &ReportConfig,
    pkg: &str,
    node: &str,
    stage: Stage,
) -> Result<Option<DcfRecord>> {
    let src = incoming_path(&config.central, node, stage, pkg, "summary.dcf");
    if !src.is_file() {
        return Ok(None);
    }
    if !config.no_raw_results && config.buildtype.has_raw_results() {
        let dest = outgoing_path(&config.report_path, pkg, node, stage, "summary.dcf");
        copy_into(&src, &dest)?;
    }
    Ok(Some(dcf::parse_single(&src)?))
}

/// The cell's command output as escaped HTML, mirrored into `raw-results`
/// unless suppressed. Missing output degrades to the apology string.
pub fn command_output(
    config: &ReportConfig,
    spec: &NodeSpec,
    pkg: &str,
    stage: Stage,
) -> Result<String> {
    let src = incoming_path(&config.central, &spec.hostname, stage, pkg, "out.txt");
    if !src.is_file() {
        return Ok(html::escape(APOLOGY));
    }
    if !config.no_raw_results && config.buildtype.has_raw_results() {
        let dest = outgoing_path(&config.report_path, pkg, &spec.hostname, stage, "out.txt");
        copy_into(&src, &dest)?;
    }
    file_contents_html(&src, &spec.encoding)
}

/// `00install.out` from the package's `.Rcheck` directory, when present.
/// Returns the path shown as the section heading plus the escaped text.
pub fn installation_output(
    config: &ReportConfig,
    spec: &NodeSpec,
    pkg: &str,
) -> Option<(String, String)> {
    let path = rcheck_path(&config.central, &spec.hostname, pkg).join("00install.out");
    if !path.is_file() {
        return None;
    }
    let contents = file_contents_html(&path, &spec.encoding).ok()?;
    Some((format!("{pkg}.Rcheck/00install.out"), contents))
}

/// Test outputs gathered from the `tests*` directories of the package's
/// `.Rcheck` tree.
#[derive(Debug, Default)]
pub struct TestsOutput {
    /// `(display path, escaped contents)`, sorted case-insensitively by
    /// file name.
    pub files: Vec<(String, String)>,
    /// Test-output file names whose base name collides with an earlier
    /// one; surfaced to end users as a data-integrity warning.
    pub duplicates: Vec<String>,
    /// True when the `.Rcheck` tree itself is missing.
    pub missing: bool,
}

/// Collects `*.Rout*` files from every `tests*` directory under the
/// package's `.Rcheck` tree.
pub fn tests_output(config: &ReportConfig, spec: &NodeSpec, pkg: &str) -> Result<TestsOutput> {
    let rcheck = rcheck_path(&config.central, &spec.hostname, pkg);
    if !rcheck.is_dir() {
        return Ok(TestsOutput {
            missing: true,
            ..TestsOutput::default()
        });
    }

    // `(.*)\.Rout.*` matches both `foo.Rout` and `foo.Rout.fail`.
    let rout = Regex::new(r"^(.*)\.Rout")?;
    let mut out = TestsOutput::default();
    let mut seen: Vec<String> = Vec::new();
    let mut found: Vec<(String, PathBuf)> = Vec::new();

    for entry in WalkDir::new(&rcheck).min_depth(1).max_depth(1) {
        let entry = entry?;
        let dir_name = entry.file_name().to_string_lossy().to_string();
        if !entry.file_type().is_dir() || !dir_name.starts_with("tests") {
            continue;
        }
        for file in WalkDir::new(entry.path()).min_depth(1).max_depth(1) {
            let file = file?;
            if !file.file_type().is_file() {
                continue;
            }
            let file_name = file.file_name().to_string_lossy().to_string();
            let Some(m) = rout.captures(&file_name) else {
                continue;
            };
            let base = m.get(1).map(|g| g.as_str().to_string()).unwrap_or_default();
            if seen.contains(&base) {
                out.duplicates.push(file_name);
                continue;
            }
            seen.push(base);
            found.push((
                format!("{pkg}.Rcheck/{dir_name}/{file_name}"),
                file.path().to_path_buf(),
            ));
        }
    }

    found.sort_by_key(|(display, _)| display.to_lowercase());
    for (display, path) in found {
        out.files.push((display, file_contents_html(&path, &spec.encoding)?));
    }
    out.duplicates.sort_by_key(|name| name.to_lowercase());
    Ok(out)
}

/// The `<pkg>-Ex.timings` table from the `.Rcheck` tree, when present.
pub fn example_timings(
    config: &ReportConfig,
    spec: &NodeSpec,
    pkg: &str,
) -> Option<(String, String)> {
    let path = rcheck_path(&config.central, &spec.hostname, pkg).join(format!("{pkg}-Ex.timings"));
    if !path.is_file() {
        return None;
    }
    let contents = file_contents_html(&path, &spec.encoding).ok()?;
    Some((format!("{pkg}.Rcheck/{pkg}-Ex.timings"), contents))
}

/// Generates `<pkg>/raw-results/info.dcf`: a copy of the package's git
/// log record followed by the identifying index fields, with the
/// maintainer address obfuscated.
pub fn write_info_dcf(config: &ReportConfig, pkg: &crate::content::PackageInfo) -> Result<()> {
    let dir = config.report_path.join(&pkg.name).join("raw-results");
    fs::create_dir_all(&dir).map_err(|e| ReportError::io(&dir, e))?;
    let dest = dir.join("info.dcf");

    let mut text = String::new();
    let gitlog = config.gitlog_file(&pkg.name);
    if gitlog.is_file() {
        text.push_str(dcf::read_lenient(&gitlog)?.trim_end());
        text.push('\n');
    }
    let or_na = |s: &str| if s.is_empty() { "NA".to_string() } else { s.to_string() };
    text.push_str(&format!("Package: {}\n", or_na(&pkg.name)));
    text.push_str(&format!("Version: {}\n", or_na(&pkg.version)));
    text.push_str(&format!("Maintainer: {}\n", or_na(&pkg.maintainer)));
    let email = pkg
        .maintainer_email
        .as_deref()
        .unwrap_or("NA")
        .replace('@', " at ");
    text.push_str(&format!("MaintainerEmail: {email}\n"));

    fs::write(&dest, text).map_err(|e| ReportError::io(&dest, e))
}
