//! Run configuration: CLI flags plus environment-provided paths, built
//! once per run and passed to every component. No ambient globals.

use crate::error::{ReportError, Result};
use crate::stage::{BuildType, Timeouts};
use std::env;
use std::path::PathBuf;

pub const PKG_INDEX_FILE: &str = "pkg-index.dcf";
pub const SKIPPED_INDEX_FILE: &str = "skipped-index.dcf";
pub const BUILD_STATUS_DB_FILE: &str = "build-status.db";
pub const PROPAGATION_STATUS_DB_FILE: &str = "propagation-status.db";
pub const DEP_GRAPH_FILE: &str = "pkg-dep-graph.txt";
pub const NODES_FILE: &str = "nodes.dcf";

/// Name under which the optional R environment file is republished in the
/// report tree.
pub const R_ENVIRON_OUT: &str = "Renviron";

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Compact global page (`--simple-layout`).
    pub compact: bool,
    /// Accepted for compatibility with older drivers; report generation
    /// currently ignores it.
    pub no_alphabet_dispatch: bool,
    /// Suppress the mirrored raw-results subtree (`--no-raw-results`).
    pub no_raw_results: bool,

    pub buildtype: BuildType,
    /// Central directory holding every upstream input.
    pub central: PathBuf,
    /// Output directory; recreated on every run.
    pub report_path: PathBuf,
    /// Raw `GRANARY_NODES` value (participating nodes, in order).
    pub node_list: String,

    pub css_file: Option<PathBuf>,
    pub bgimg_file: Option<PathBuf>,
    pub js_file: Option<PathBuf>,
    pub r_environ: Option<PathBuf>,
    pub motd: String,
    /// Release label shown in page titles; may be empty.
    pub version: String,
    pub timeouts: Timeouts,
}

fn required_env(name: &str) -> Result<String> {
    // An empty value counts as unset, matching the upstream drivers.
    match env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ReportError::MissingEnv(name.to_string())),
    }
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

impl ReportConfig {
    /// Builds the configuration from the process environment and the
    /// parsed CLI flags.
    ///
    /// # Errors
    /// Missing required variables (`GRANARY_CENTRAL`,
    /// `GRANARY_REPORT_PATH`, `GRANARY_NODES`) or an unknown
    /// `GRANARY_BUILDTYPE` abort before any output is produced.
    pub fn from_env(
        compact: bool,
        no_alphabet_dispatch: bool,
        no_raw_results: bool,
    ) -> Result<ReportConfig> {
        let buildtype = match optional_env("GRANARY_BUILDTYPE") {
            Some(raw) => BuildType::parse(&raw)?,
            None => BuildType::Standard,
        };
        Ok(ReportConfig {
            compact,
            no_alphabet_dispatch,
            no_raw_results,
            buildtype,
            central: PathBuf::from(required_env("GRANARY_CENTRAL")?),
            report_path: PathBuf::from(required_env("GRANARY_REPORT_PATH")?),
            node_list: required_env("GRANARY_NODES")?,
            css_file: optional_env("GRANARY_REPORT_CSS").map(PathBuf::from),
            bgimg_file: optional_env("GRANARY_REPORT_BGIMG").map(PathBuf::from),
            js_file: optional_env("GRANARY_REPORT_JS").map(PathBuf::from),
            r_environ: optional_env("GRANARY_R_ENVIRON").map(PathBuf::from),
            motd: optional_env("GRANARY_REPORT_MOTD").unwrap_or_default(),
            version: optional_env("GRANARY_VERSION").unwrap_or_default(),
            timeouts: Timeouts::resolve(buildtype, |name| optional_env(name)),
        })
    }

    #[must_use]
    pub fn pkg_index_file(&self) -> PathBuf {
        self.central.join(PKG_INDEX_FILE)
    }

    #[must_use]
    pub fn skipped_index_file(&self) -> PathBuf {
        self.central.join(SKIPPED_INDEX_FILE)
    }

    #[must_use]
    pub fn build_status_db_file(&self) -> PathBuf {
        self.central.join(BUILD_STATUS_DB_FILE)
    }

    #[must_use]
    pub fn propagation_status_db_file(&self) -> PathBuf {
        self.central.join(PROPAGATION_STATUS_DB_FILE)
    }

    #[must_use]
    pub fn dep_graph_file(&self) -> PathBuf {
        self.central.join(DEP_GRAPH_FILE)
    }

    #[must_use]
    pub fn nodes_file(&self) -> PathBuf {
        self.central.join(NODES_FILE)
    }

    #[must_use]
    pub fn gitlog_file(&self, pkg: &str) -> PathBuf {
        self.central.join("gitlog").join(format!("git-log-{pkg}.dcf"))
    }

    #[must_use]
    pub fn vcs_meta_file(&self) -> PathBuf {
        self.central.join("gitlog").join("vcs-meta.dcf")
    }
}
