//! Shared HTML building blocks: escaping, the page skeleton, status
//! glyph cells, and the embedded static assets.
//!
//! Pages are assembled with `format!`/`write!` into plain strings; all
//! text originating from package metadata or node output is untrusted and
//! goes through [`escape`].

use crate::status::RawStatus;
use std::fmt::Write;

/// Escapes text for inclusion in HTML body or attribute context.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page chrome shared by every emitted page: header/footer text plus the
/// asset links, with `prefix` pointing back at the report root ("" for
/// root pages, "../" for package pages).
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub motd: String,
    pub version: String,
    pub timestamp: String,
    pub prefix: &'static str,
    /// File names (relative to the report root) of staged optional
    /// assets.
    pub extra_css: Option<String>,
    pub js: Option<String>,
    pub bgimg: Option<String>,
}

impl Chrome {
    #[must_use]
    pub fn at_depth(&self, prefix: &'static str) -> Chrome {
        let mut chrome = self.clone();
        chrome.prefix = prefix;
        chrome
    }
}

/// Wraps a page body in the shared skeleton.
#[must_use]
pub fn page(chrome: &Chrome, title: &str, body: &str) -> String {
    let prefix = chrome.prefix;
    let mut head = String::new();
    let _ = write!(
        head,
        "<link rel=\"stylesheet\" href=\"{prefix}report.css\">"
    );
    if let Some(css) = &chrome.extra_css {
        let _ = write!(
            head,
            "\n<link rel=\"stylesheet\" href=\"{prefix}{}\">",
            escape(css)
        );
    }
    if let Some(js) = &chrome.js {
        let _ = write!(head, "\n<script src=\"{prefix}{}\"></script>", escape(js));
    }
    let body_attr = match &chrome.bgimg {
        Some(img) => format!(
            " style=\"background-image: url('{prefix}{}')\"",
            escape(img)
        ),
        None => String::new(),
    };
    let motd = if chrome.motd.is_empty() {
        String::new()
    } else {
        format!("\n<p class=\"motd\">{}</p>", escape(&chrome.motd))
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         {head}\n\
         </head>\n\
         <body{body_attr}>\n\
         <div class=\"header\">\n\
         <h1>{title}</h1>{motd}\n\
         <p class=\"timestamp\">This page was generated on {timestamp}.</p>\n\
         </div>\n\
         {body}\n\
         <div class=\"footer\">granary report{version}</div>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
        timestamp = escape(&chrome.timestamp),
        version = if chrome.version.is_empty() {
            String::new()
        } else {
            format!(" &mdash; {}", escape(&chrome.version))
        },
    )
}

/// One status glyph cell, optionally linking to a detail page.
#[must_use]
pub fn status_cell(status: RawStatus, href: Option<&str>) -> String {
    let label = status.as_str();
    match href {
        Some(href) => format!(
            "<td class=\"status {}\"><a href=\"{}\">{label}</a></td>",
            status.css_class(),
            escape(href)
        ),
        None => format!("<td class=\"status {}\">{label}</td>", status.css_class()),
    }
}

/// Same glyph styling for a derived overall status.
#[must_use]
pub fn overall_cell(status: crate::status::OverallStatus, href: Option<&str>) -> String {
    let label = status.as_str();
    match href {
        Some(href) => format!(
            "<td class=\"status {}\"><a href=\"{}\">{label}</a></td>",
            status.css_class(),
            escape(href)
        ),
        None => format!("<td class=\"status {}\">{label}</td>", status.css_class()),
    }
}

/// Access rules published next to the report tree.
pub const HTACCESS: &str = "RewriteEngine on\n\
RewriteCond %{HTTP_USER_AGENT} (AhrefsBot|MJ12bot|SemrushBot) [NC]\n\
RewriteRule .* - [F]\n";

/// Base stylesheet written to `report.css`. An operator-supplied
/// stylesheet can be layered on top of it.
pub const STYLESHEET: &str = "\
body { font-family: sans-serif; margin: 1.5em; background: #fcfcfc; color: #222; }
a { color: #1a4a8a; }
.header h1 { margin-bottom: 0.2em; }
.motd { background: #fff6d6; border: 1px solid #e0c96a; padding: 0.5em; }
.timestamp { color: #777; font-size: 0.85em; }
.footer { margin-top: 2em; color: #777; font-size: 0.85em; border-top: 1px solid #ddd; }
table.matrix { border-collapse: collapse; }
table.matrix th, table.matrix td { border: 1px solid #ccc; padding: 0.25em 0.6em; }
table.matrix th { background: #eef2f7; text-align: left; }
tr.skipped td.pkg { text-decoration: line-through; color: #888; }
td.status { text-align: center; font-weight: bold; }
td.status a { text-decoration: none; color: inherit; }
.status-ok { background: #c9e8c9; }
.status-warnings { background: #f4e6b2; }
.status-error, .status-timeout { background: #f0bcbc; }
.status-na, .status-unknown { background: #e4e4e4; color: #666; }
.status-skipped { background: #e4e4e4; color: #999; }
table.legend td.status { width: 7em; }
pre.output { background: #f4f4f4; border: 1px solid #ddd; padding: 0.8em; overflow-x: auto; }
.warning { color: #a33; }
.summary dt { font-weight: bold; }
";

/// Embedded status icons, published as `<name>.svg` in the report root.
pub const ICONS: [(&str, &str); 3] = [
    (
        "ok",
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 16 16\" width=\"16\" height=\"16\"><circle cx=\"8\" cy=\"8\" r=\"7\" fill=\"#3a9a3a\"/></svg>\n",
    ),
    (
        "warnings",
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 16 16\" width=\"16\" height=\"16\"><circle cx=\"8\" cy=\"8\" r=\"7\" fill=\"#d8a825\"/></svg>\n",
    ),
    (
        "error",
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 16 16\" width=\"16\" height=\"16\"><circle cx=\"8\" cy=\"8\" r=\"7\" fill=\"#c23b3b\"/></svg>\n",
    ),
];
