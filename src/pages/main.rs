//! The global page: all packages × all nodes × all stages, in a compact
//! (`index.html`) or full (`long-report.html`) layout.

use crate::config::ReportConfig;
use crate::console;
use crate::content::ReportContent;
use crate::error::Result;
use crate::html::{self, Chrome};
use crate::node::Node;
use crate::pages;
use std::fmt::Write;
use std::path::PathBuf;

/// Emits the global page and returns its path.
pub fn emit(config: &ReportConfig, content: &ReportContent, chrome: &Chrome) -> Result<PathBuf> {
    console::begin("main-report", "Global page");

    let title = if content.version.is_empty() {
        "Multiple platform build/check report".to_string()
    } else {
        format!(
            "Multiple platform build/check report for {}",
            content.version
        )
    };

    let nodes: Vec<&Node> = content.nodes.iter().collect();
    let mut body = String::new();
    body.push_str(&nodes_block(content));
    if let Some(snapshot) = &content.snapshot {
        let _ = writeln!(
            body,
            "<p>Snapshot taken at {}.</p>",
            html::escape(snapshot)
        );
    }
    body.push_str(&pages::quickstats_block(content, &nodes));
    body.push_str(&pages::legend(content));
    body.push_str("<h2>Results</h2>\n");
    body.push_str(&pages::packages_table(content, &nodes, config.compact));

    let file = if config.compact {
        "index.html"
    } else {
        "long-report.html"
    };
    let path = config.report_path.join(file);
    pages::write_page(&path, &html::page(chrome, &title, &body))?;

    console::end("main-report", "Global page");
    Ok(path)
}

/// The participating-node summary with links to the per-node pages.
fn nodes_block(content: &ReportContent) -> String {
    let mut out = String::from("<h2>Nodes</h2>\n<table class=\"matrix\">\n");
    out.push_str(
        "<tr><th>Hostname</th><th>OS</th><th>Arch</th><th>Platform</th><th>R version</th><th>Installed pkgs</th></tr>\n",
    );
    for node in &content.nodes {
        let host = html::escape(node.hostname());
        let _ = writeln!(
            out,
            "<tr><td><a href=\"{host}-index.html\">{host}</a> \
             (<a href=\"{host}-NodeInfo.html\">info</a>)</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"{host}-R-instpkgs.html\">{}</a></td></tr>",
            html::escape(&node.spec.os),
            html::escape(&node.spec.arch),
            html::escape(&node.spec.platform),
            html::escape(&node.r_version),
            node.r_installed_packages,
        );
    }
    out.push_str("</table>\n");
    out
}
