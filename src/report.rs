//! Top-level run: verifies the required inputs, stages the output
//! directory and its static assets, assembles the content aggregate and
//! emits every page family.

use crate::config::{ReportConfig, R_ENVIRON_OUT};
use crate::console;
use crate::content::ReportContent;
use crate::error::{ReportError, Result};
use crate::html;
use crate::pages;
use std::fs;
use std::path::Path;

/// Runs report generation with the current wall-clock timestamp.
pub fn run(config: &ReportConfig) -> Result<()> {
    let now = chrono::Local::now().format("%a %b %e %H:%M:%S %Y").to_string();
    run_at(config, now)
}

/// Runs report generation with an injected timestamp; identical inputs
/// then produce byte-identical pages.
pub fn run_at(config: &ReportConfig, timestamp: String) -> Result<()> {
    // The status database is the one input we refuse to run without, and
    // the check happens before anything is written.
    let db_file = config.build_status_db_file();
    if !db_file.is_file() {
        return Err(ReportError::MissingInput(db_file));
    }

    console::info("report", &format!("STARTING report at {timestamp}"));
    stage_output_dir(config)?;

    let content = ReportContent::assemble_at(config, timestamp)?;
    let chrome = pages::chrome(config, &content);

    pages::node::emit_all(config, &content, &chrome)?;
    pages::package::emit_all(config, &content, &chrome)?;
    pages::main::emit(config, &content, &chrome)?;

    console::info("report", "DONE.");
    Ok(())
}

/// Recreates the report directory and stages everything that is not a
/// generated page: input copies, access rules, the stylesheet, icons and
/// operator-supplied assets.
fn stage_output_dir(config: &ReportConfig) -> Result<()> {
    let out = &config.report_path;
    console::info("report", &format!("remake dir {}", out.display()));
    if out.exists() {
        fs::remove_dir_all(out).map_err(|e| ReportError::io(out, e))?;
    }
    fs::create_dir_all(out).map_err(|e| ReportError::io(out, e))?;

    // Input snapshots published next to the pages.
    copy_to_dir(&config.pkg_index_file(), out, true)?;
    copy_to_dir(&config.skipped_index_file(), out, true)?;
    copy_to_dir(&config.build_status_db_file(), out, true)?;
    copy_to_dir(&config.propagation_status_db_file(), out, false)?;

    write_asset(&out.join(".htaccess"), html::HTACCESS)?;
    write_asset(&out.join("report.css"), html::STYLESHEET)?;
    for (name, svg) in html::ICONS {
        write_asset(&out.join(format!("{name}.svg")), svg)?;
    }

    if let Some(css) = &config.css_file {
        copy_to_dir(css, out, true)?;
    }
    if let Some(bgimg) = &config.bgimg_file {
        copy_to_dir(bgimg, out, true)?;
    }
    if let Some(js) = &config.js_file {
        copy_to_dir(js, out, true)?;
    }
    if let Some(r_environ) = &config.r_environ {
        let dest = out.join(R_ENVIRON_OUT);
        console::info("report", &format!("cp {} {}", r_environ.display(), dest.display()));
        fs::copy(r_environ, &dest).map_err(|e| ReportError::io(r_environ, e))?;
    }
    Ok(())
}

fn copy_to_dir(src: &Path, dir: &Path, required: bool) -> Result<()> {
    if !src.is_file() {
        if required {
            return Err(ReportError::MissingInput(src.to_path_buf()));
        }
        return Ok(());
    }
    let name = src
        .file_name()
        .ok_or_else(|| ReportError::MissingInput(src.to_path_buf()))?;
    console::info("report", &format!("cp {} {}/", src.display(), dir.display()));
    fs::copy(src, dir.join(name)).map_err(|e| ReportError::io(src, e))?;
    Ok(())
}

fn write_asset(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| ReportError::io(path, e))
}
