//! Page emitters: pure projections of [`ReportContent`] rendered to HTML
//! files. Each page family lives in its own submodule; this module holds
//! the fragments they share.

pub mod main;
pub mod node;
pub mod package;

use crate::config::ReportConfig;
use crate::content::{PackageInfo, ReportContent};
use crate::error::{ReportError, Result};
use crate::html::{self, Chrome};
use crate::node::Node;
use crate::stage::Stage;
use crate::status::RawStatus;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Builds the chrome shared by every page of this run. Optional asset
/// names are the staged file names recorded by the runner.
#[must_use]
pub fn chrome(config: &ReportConfig, content: &ReportContent) -> Chrome {
    Chrome {
        motd: content.motd.clone(),
        version: content.version.clone(),
        timestamp: content.timestamp.clone(),
        prefix: "",
        extra_css: config
            .css_file
            .as_deref()
            .and_then(file_name),
        js: config.js_file.as_deref().and_then(file_name),
        bgimg: config.bgimg_file.as_deref().and_then(file_name),
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Writes a page, creating parent directories as needed.
pub fn write_page(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| ReportError::io(path, e))
}

/// The explanation legend shown on every matrix page.
#[must_use]
pub fn legend(content: &ReportContent) -> String {
    let ex = &content.explanations;
    let mut rows = vec![
        (RawStatus::Timeout, ex.timeout.clone()),
        (RawStatus::Error, ex.error.clone()),
    ];
    if let Some(warnings) = &ex.warnings {
        rows.push((RawStatus::Warnings, warnings.clone()));
    }
    rows.push((RawStatus::Ok, ex.ok.clone()));
    rows.push((RawStatus::Na, ex.na.clone()));
    if let Some(skipped) = &ex.skipped {
        rows.push((RawStatus::Skipped, skipped.clone()));
    }

    let mut out = String::from("<h2>Status legend</h2>\n<table class=\"matrix legend\">\n");
    for (status, message) in rows {
        let _ = writeln!(
            out,
            "<tr>{}<td>{}</td></tr>",
            html::status_cell(status, None),
            html::escape(&message)
        );
    }
    out.push_str("</table>\n");
    out
}

/// Per-node quick statistics block.
#[must_use]
pub fn quickstats_block(content: &ReportContent, nodes: &[&Node]) -> String {
    let mut out = String::from("<h2>Quick stats</h2>\n<table class=\"matrix\">\n");
    out.push_str("<tr><th>Node</th><th>Stage</th><th>OK</th><th>WARNINGS</th><th>ERROR</th><th>TIMEOUT</th><th>NA</th></tr>\n");
    for node in nodes {
        for stage in &content.stages {
            let counts = content.quickstats.get(node.hostname(), *stage);
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

/// Relative link from a root-level page to a package's detail page for
/// one cell, when that page exists.
fn cell_link(pkg: &PackageInfo, node: &Node, stage: Stage, status: RawStatus) -> Option<String> {
    match status {
        RawStatus::Skipped | RawStatus::Na => None,
        _ => Some(format!(
            "{}/{}-{}.html",
            pkg.name,
            node.hostname(),
            stage.id()
        )),
    }
}

/// The packages × nodes matrix shared by the global and per-node pages.
/// `compact` collapses each node to a single overall glyph.
#[must_use]
pub fn packages_table(content: &ReportContent, nodes: &[&Node], compact: bool) -> String {
    let mut out = String::from("<table class=\"matrix\">\n");

    if compact {
        out.push_str("<tr><th>Package</th>");
        for node in nodes {
            let _ = write!(out, "<th>{}</th>", html::escape(node.hostname()));
        }
        out.push_str("</tr>\n");
        for pkg in &content.pkgs {
            let skipped = content.is_skipped(&pkg.name);
            let row_class = if skipped { " class=\"skipped\"" } else { "" };
            let _ = write!(
                out,
                "<tr{row_class}><td class=\"pkg\"><a href=\"{0}/index.html\">{0}</a></td>",
                html::escape(&pkg.name)
            );
            for node in nodes {
                if pkg.status(node.hostname(), Stage::BuildSrc).is_none() {
                    out.push_str("<td class=\"status status-unsupported\"></td>");
                    continue;
                }
                let overall = pkg.overall_on(node.hostname(), skipped);
                let href = format!("{}/index.html", pkg.name);
                out.push_str(&html::overall_cell(overall, Some(&href)));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</table>\n");
        return out;
    }

    out.push_str("<tr><th>Package</th><th>Node</th>");
    for stage in &content.stages {
        let _ = write!(out, "<th>{}</th>", stage.label());
    }
    out.push_str("</tr>\n");

    for pkg in &content.pkgs {
        let skipped = content.is_skipped(&pkg.name);
        let row_class = if skipped { " class=\"skipped\"" } else { "" };
        let supporting: Vec<&&Node> = nodes
            .iter()
            .filter(|n| pkg.status(n.hostname(), Stage::BuildSrc).is_some())
            .collect();
        if supporting.is_empty() {
            let _ = writeln!(
                out,
                "<tr{row_class}><td class=\"pkg\"><a href=\"{0}/index.html\">{0}</a></td>\
                 <td colspan=\"{1}\">not built on the selected nodes</td></tr>",
                html::escape(&pkg.name),
                content.stages.len() + 1
            );
            continue;
        }
        for (i, node) in supporting.iter().enumerate() {
            out.push_str(&format!("<tr{row_class}>"));
            if i == 0 {
                let _ = write!(
                    out,
                    "<td class=\"pkg\" rowspan=\"{}\"><a href=\"{1}/index.html\">{1}</a></td>",
                    supporting.len(),
                    html::escape(&pkg.name)
                );
            }
            let _ = write!(out, "<td>{}</td>", html::escape(node.hostname()));
            for stage in &content.stages {
                match pkg.status(node.hostname(), *stage) {
                    Some(status) => {
                        let href = cell_link(pkg, node, *stage, status);
                        out.push_str(&html::status_cell(status, href.as_deref()));
                    }
                    None => out.push_str("<td class=\"status status-unsupported\"></td>"),
                }
            }
            out.push_str("</tr>\n");
        }
    }
    out.push_str("</table>\n");
    out
}
