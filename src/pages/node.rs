//! Per-node pages: the node's package × stage matrix, the node-info page
//! and the installed-packages page.

use crate::config::ReportConfig;
use crate::console;
use crate::content::ReportContent;
use crate::error::Result;
use crate::html::{self, Chrome};
use crate::node::{self, Node};
use crate::pages;
use std::fmt::Write;

/// System commands whose versions are reported on the node-info page,
/// with the R configuration variables shown alongside each.
const SYS_COMMANDS: [(&str, &[&str]); 5] = [
    ("C compiler", &["CC", "CFLAGS", "CPICFLAGS"]),
    ("C++ compiler", &["CXX", "CXXFLAGS", "CXXPICFLAGS"]),
    ("C++17 compiler", &["CXX17", "CXX17FLAGS", "CXX17PICFLAGS", "CXX17STD"]),
    ("JAVA", &[]),
    ("pandoc", &[]),
];

/// Emits every per-node page family.
pub fn emit_all(config: &ReportConfig, content: &ReportContent, chrome: &Chrome) -> Result<()> {
    for node in &content.nodes {
        console::begin("node-report", &format!("Node {}", node.hostname()));
        emit_node_info(config, chrome, node)?;
        emit_installed_packages(config, chrome, node)?;
        emit_node_index(config, content, chrome, node)?;
        console::end("node-report", &format!("Node {}", node.hostname()));
    }
    Ok(())
}

/// `<host>-index.html`: all packages × stages for one node.
fn emit_node_index(
    config: &ReportConfig,
    content: &ReportContent,
    chrome: &Chrome,
    node: &Node,
) -> Result<()> {
    let title = format!("All results on {}", node.hostname());
    let nodes = [node];
    let mut body = String::new();
    body.push_str(&pages::quickstats_block(content, &nodes));
    body.push_str(&pages::legend(content));
    body.push_str("<h2>Results</h2>\n");
    body.push_str(&pages::packages_table(content, &nodes, false));

    let path = config
        .report_path
        .join(format!("{}-index.html", node.hostname()));
    pages::write_page(&path, &html::page(chrome, &title, &body))
}

/// `<host>-NodeInfo.html`: platform summary plus compiler and tool
/// versions from the node's `NodeInfo` uploads.
fn emit_node_info(config: &ReportConfig, chrome: &Chrome, node: &Node) -> Result<()> {
    let host = node.hostname();
    console::info("node-info", &format!("Write {host}-NodeInfo.html"));

    let mut body = String::from("<h2>Summary</h2>\n<table class=\"matrix\">\n");
    let mut row = |key: &str, value: &str| {
        let _ = writeln!(
            body,
            "<tr><th>{}</th><td>{}</td></tr>",
            html::escape(key),
            html::escape(value)
        );
    };
    row("Hostname", host);
    row("OS", &node.spec.os);
    row("Arch", &node.spec.arch);
    row("Platform", &node.spec.platform);
    row("R version", &node.r_version);
    if config.r_environ.is_some() {
        row("R environment variables", crate::config::R_ENVIRON_OUT);
    }
    body.push_str("</table>\n");

    let r_config = node::read_r_config(&config.central, host);
    for (name, r_vars) in SYS_COMMANDS {
        let probe = r_vars.first().copied().unwrap_or(name);
        let Some(version) = node::read_command_version(&config.central, &node.spec, probe) else {
            continue;
        };
        let _ = writeln!(body, "<h2>{}</h2>", html::escape(name));
        let _ = writeln!(
            body,
            "<pre class=\"output\">{}</pre>",
            html::escape(&version)
        );
        if let Some(r_config) = &r_config {
            let vals: Vec<(&str, &str)> = r_vars
                .iter()
                .filter_map(|var| r_config.get(var).map(|v| (*var, v)))
                .collect();
            if !vals.is_empty() {
                body.push_str("<table class=\"matrix\">\n");
                for (var, val) in vals {
                    let _ = writeln!(
                        body,
                        "<tr><th>{var}</th><td>{}</td></tr>",
                        html::escape(val)
                    );
                }
                body.push_str("</table>\n");
            }
        }
    }

    let title = format!("More about {host}");
    let path = config.report_path.join(format!("{host}-NodeInfo.html"));
    pages::write_page(&path, &html::page(chrome, &title, &body))?;
    console::ok();
    Ok(())
}

/// `<host>-R-instpkgs.html`: the node's installed R packages.
fn emit_installed_packages(config: &ReportConfig, chrome: &Chrome, node: &Node) -> Result<()> {
    let host = node.hostname();
    console::info("node-instpkgs", &format!("Write {host}-R-instpkgs.html"));

    let packages = node::read_installed_packages(&config.central, &node.spec).unwrap_or_default();
    let mut body = String::from("<table class=\"matrix\">\n");
    body.push_str("<tr><th>Name</th><th>LibPath</th><th>Version</th><th>Built</th></tr>\n");
    for pkg in &packages {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            html::escape(&pkg.name),
            html::escape(&pkg.lib_path),
            html::escape(&pkg.version),
            html::escape(&pkg.built),
        );
    }
    body.push_str("</table>\n");

    let title = format!("R packages installed on {host}");
    let path = config.report_path.join(format!("{host}-R-instpkgs.html"));
    pages::write_page(&path, &html::page(chrome, &title, &body))?;
    console::ok();
    Ok(())
}
