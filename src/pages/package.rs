//! Per-package pages: the package's node × stage matrix with its VCS and
//! propagation summary, plus one detail page per (node, stage) cell.

use crate::config::ReportConfig;
use crate::console;
use crate::content::{PackageInfo, QuickStats, ReportContent};
use crate::error::Result;
use crate::html::{self, Chrome};
use crate::node::Node;
use crate::pages;
use crate::rawres;
use crate::stage::Stage;
use crate::status::RawStatus;
use std::fmt::Write;

/// Emits every package's page family, mirroring raw results unless
/// suppressed.
pub fn emit_all(config: &ReportConfig, content: &ReportContent, chrome: &Chrome) -> Result<()> {
    console::begin("package-reports", "Package reports");
    let chrome = chrome.at_depth("../");

    for pkg in &content.pkgs {
        emit_package_index(config, content, &chrome, pkg)?;

        if !config.no_raw_results && config.buildtype.has_raw_results() {
            // The info record accompanies the mirrored raw results.
            if pkg.all_statuses().next().is_some() {
                rawres::write_info_dcf(config, pkg)?;
            }
        }

        for node in &content.nodes {
            if !node.supports(&pkg.name) {
                continue;
            }
            for stage in &content.stages {
                let Some(status) = pkg.status(node.hostname(), *stage) else {
                    continue;
                };
                if matches!(status, RawStatus::Skipped | RawStatus::Na) {
                    continue;
                }
                emit_status_page(config, &chrome, pkg, node, *stage)?;
            }
        }
    }

    console::end("package-reports", "Package reports");
    Ok(())
}

/// `<pkg>/index.html`: all nodes × stages for one package.
fn emit_package_index(
    config: &ReportConfig,
    content: &ReportContent,
    chrome: &Chrome,
    pkg: &PackageInfo,
) -> Result<()> {
    let title = format!("All results for package {}", pkg.name);
    let mut body = String::new();

    body.push_str("<h2>Summary</h2>\n<table class=\"matrix\">\n");
    let mut row = |key: &str, value: &str| {
        if !value.is_empty() {
            let _ = writeln!(
                body,
                "<tr><th>{}</th><td>{}</td></tr>",
                html::escape(key),
                html::escape(value)
            );
        }
    };
    row("Package", &pkg.name);
    row("Version", &pkg.version);
    row("Maintainer", &pkg.maintainer);
    row("Status", pkg.package_status.as_deref().unwrap_or(""));
    row("git URL", &pkg.git_url);
    row("git branch", &pkg.git_branch);
    row("Last commit", &pkg.git_last_commit);
    row("Last commit date", &pkg.git_last_commit_date);
    if let Some(propagation) = &content.propagation {
        for (target, status) in propagation.for_package(&pkg.name) {
            row(&format!("Propagation ({target})"), status);
        }
    }
    body.push_str("</table>\n");

    if content.is_skipped(&pkg.name) {
        body.push_str("<p class=\"warning\">This package was skipped for the current run.</p>\n");
    }

    body.push_str("<h2>Results</h2>\n<table class=\"matrix\">\n<tr><th>Node</th>");
    for stage in &content.stages {
        let _ = write!(body, "<th>{}</th>", stage.label());
    }
    body.push_str("</tr>\n");
    for node in &content.nodes {
        if !node.supports(&pkg.name) {
            continue;
        }
        let _ = write!(body, "<tr><td>{}</td>", html::escape(node.hostname()));
        for stage in &content.stages {
            match pkg.status(node.hostname(), *stage) {
                Some(status) => {
                    let href = match status {
                        RawStatus::Skipped | RawStatus::Na => None,
                        _ => Some(format!("{}-{}.html", node.hostname(), stage.id())),
                    };
                    body.push_str(&html::status_cell(status, href.as_deref()));
                }
                None => body.push_str("<td class=\"status status-unsupported\"></td>"),
            }
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</table>\n");

    body.push_str(&rev_deps_block(content, pkg));
    body.push_str(&developer_notes(config, pkg));
    body.push_str(&pages::legend(content));

    let path = config.report_path.join(&pkg.name).join("index.html");
    pages::write_page(&path, &html::page(chrome, &title, &body))
}

/// Reverse-dependency summary, for build types that track the graph.
fn rev_deps_block(content: &ReportContent, pkg: &PackageInfo) -> String {
    if content.rev_deps.is_none() {
        return String::new();
    }
    let rev_pkgs = content.rev_dep_packages(&pkg.name);
    let mut out = String::from("<h2>Reverse dependencies</h2>\n");
    if rev_pkgs.is_empty() {
        let _ = writeln!(
            out,
            "<p>No other tracked package depends on {}.</p>",
            html::escape(&pkg.name)
        );
        return out;
    }
    let _ = writeln!(
        out,
        "<p>{} tracked package(s) depend on {} and would be affected by a breakage:</p>",
        rev_pkgs.len(),
        html::escape(&pkg.name)
    );
    out.push_str("<p>");
    for (i, dep) in rev_pkgs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(
            out,
            "<a href=\"../{0}/index.html\">{0}</a>",
            html::escape(&dep.name)
        );
    }
    out.push_str("</p>\n");

    // Quick stats restricted to the reverse-dependency subset.
    let owned: Vec<PackageInfo> = rev_pkgs.into_iter().cloned().collect();
    let stats = QuickStats::compute(&owned);
    out.push_str("<table class=\"matrix\">\n<tr><th>Node</th><th>Stage</th><th>OK</th><th>WARNINGS</th><th>ERROR</th><th>TIMEOUT</th><th>NA</th></tr>\n");
    for node in &content.nodes {
        for stage in &content.stages {
            let counts = stats.get(node.hostname(), *stage);
            if counts.total() == 0 {
                continue;
            }
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                html::escape(node.hostname()),
                stage.label(),
                counts.ok,
                counts.warnings,
                counts.errors,
                counts.timeouts,
                counts.na,
            );
        }
    }
    out.push_str("</table>\n");
    out
}

/// Note to the package's developers, shown when the run publishes an R
/// environment file they can reproduce failures with.
fn developer_notes(config: &ReportConfig, pkg: &PackageInfo) -> String {
    if config.r_environ.is_none() {
        return String::new();
    }
    format!(
        "<p class=\"ntd\">To the developers/maintainers of {0}: use the published \
         <a href=\"../{1}\">{1}</a> file to reproduce errors and warnings shown on \
         this page.</p>\n",
        html::escape(&pkg.name),
        crate::config::R_ENVIRON_OUT
    )
}

/// `<pkg>/<host>-<stage>.html`: one cell's summary, command output and
/// (for CHECK) the install/test/timing extracts.
fn emit_status_page(
    config: &ReportConfig,
    chrome: &Chrome,
    pkg: &PackageInfo,
    node: &Node,
    stage: Stage,
) -> Result<()> {
    let host = node.hostname();
    console::info(
        "package-reports",
        &format!("Write {}/{host}-{}.html", pkg.name, stage.id()),
    );

    let title = format!("{} results for {} on {host}", stage.title_word(), pkg.name);
    let mut body = String::new();

    if let Some(note) = &node.spec.note {
        let _ = writeln!(body, "<p class=\"warning\">{}</p>", html::escape(note));
    }

    body.push_str("<h2>Summary</h2>\n");
    match rawres::summary_record(config, &pkg.name, host, stage)? {
        Some(summary) => {
            body.push_str("<table class=\"matrix\">\n");
            let fields: Vec<(&str, &str)> = SUMMARY_FIELDS
                .iter()
                .filter_map(|key| summary.get(key).map(|v| (*key, v)))
                .collect();
            for (key, value) in fields {
                let _ = writeln!(
                    body,
                    "<tr><th>{}</th><td>{}</td></tr>",
                    html::escape(key),
                    html::escape(value)
                );
            }
            body.push_str("</table>\n");
        }
        None => {
            let _ = writeln!(body, "<p>{}</p>", html::escape(rawres::APOLOGY));
        }
    }

    body.push_str("<h2>Command output</h2>\n");
    let _ = writeln!(
        body,
        "<pre class=\"output\">{}</pre>",
        rawres::command_output(config, &node.spec, &pkg.name, stage)?
    );

    if stage == Stage::CheckSrc {
        if let Some((heading, contents)) =
            rawres::installation_output(config, &node.spec, &pkg.name)
        {
            let _ = writeln!(body, "<h2>Installation output: {}</h2>", html::escape(&heading));
            let _ = writeln!(body, "<pre class=\"output\">{contents}</pre>");
        }

        if config.buildtype.has_raw_results() {
            let tests = rawres::tests_output(config, &node.spec, &pkg.name)?;
            if tests.missing {
                body.push_str("<h2>Tests output</h2>\n");
                let _ = writeln!(body, "<p>{}</p>", html::escape(rawres::APOLOGY));
            } else if !tests.files.is_empty() {
                body.push_str("<h2>Tests output</h2>\n");
                if !tests.duplicates.is_empty() {
                    let _ = writeln!(
                        body,
                        "<p class=\"warning\">Duplicate test output file names were \
                         ignored: {}</p>",
                        html::escape(&tests.duplicates.join(", "))
                    );
                }
                for (heading, contents) in &tests.files {
                    let _ = writeln!(body, "<h3>{}</h3>", html::escape(heading));
                    let _ = writeln!(body, "<pre class=\"output\">{contents}</pre>");
                }
            }

            if let Some((heading, contents)) =
                rawres::example_timings(config, &node.spec, &pkg.name)
            {
                let _ = writeln!(body, "<h2>Example timings: {}</h2>", html::escape(&heading));
                let _ = writeln!(body, "<pre class=\"output\">{contents}</pre>");
            }
        }
    }

    body.push_str(&developer_notes(config, pkg));

    let path = config
        .report_path
        .join(&pkg.name)
        .join(format!("{host}-{}.html", stage.id()));
    pages::write_page(&path, &html::page(chrome, &title, &body))
}

/// Summary fields rendered in a stable order when present.
const SUMMARY_FIELDS: [&str; 8] = [
    "Package",
    "Version",
    "Command",
    "StartedAt",
    "EndedAt",
    "EllapsedTime",
    "RetCode",
    "Status",
];
