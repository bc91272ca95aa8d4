//! Report data assembly: joins the package index, the skipped list, the
//! status database, the dependency graph and the node metadata into the
//! immutable aggregate every page is rendered from.

use crate::config::ReportConfig;
use crate::console;
use crate::dcf;
use crate::depgraph;
use crate::error::Result;
use crate::messages::Explanations;
use crate::node::{self, Node};
use crate::stage::Stage;
use crate::status::{overall_status, OverallStatus, RawStatus};
use crate::statusdb::{PropagationDb, StatusDb};
use std::collections::HashMap;

/// Everything known about one package for this run. Immutable after
/// assembly.
#[derive(Debug, Clone)]
pub struct PackageInfo {
    pub name: String,
    pub maintainer: String,
    pub version: String,
    pub package_status: Option<String>,
    pub maintainer_email: Option<String>,
    pub git_url: String,
    pub git_branch: String,
    pub git_last_commit: String,
    pub git_last_commit_date: String,
    /// Raw status per `(hostname, stage)` cell; only applicable cells are
    /// present.
    results: HashMap<(String, Stage), RawStatus>,
}

impl PackageInfo {
    #[must_use]
    pub fn status(&self, hostname: &str, stage: Stage) -> Option<RawStatus> {
        self.results.get(&(hostname.to_string(), stage)).copied()
    }

    /// All raw statuses across every node and stage.
    pub fn all_statuses(&self) -> impl Iterator<Item = RawStatus> + '_ {
        self.results.values().copied()
    }

    /// Raw statuses restricted to one node.
    pub fn node_statuses<'a>(&'a self, hostname: &'a str) -> impl Iterator<Item = RawStatus> + 'a {
        self.results
            .iter()
            .filter(move |((host, _), _)| host == hostname)
            .map(|(_, status)| *status)
    }

    /// Overall status across the whole matrix.
    #[must_use]
    pub fn overall(&self, is_skipped: bool) -> OverallStatus {
        overall_status(self.all_statuses(), is_skipped)
    }

    /// Overall status restricted to one node.
    #[must_use]
    pub fn overall_on(&self, hostname: &str, is_skipped: bool) -> OverallStatus {
        overall_status(self.node_statuses(hostname), is_skipped)
    }
}

/// Per-(node, stage) tallies of raw statuses, shown in page headers.
#[derive(Debug, Clone, Default)]
pub struct QuickStats {
    counts: HashMap<(String, Stage), StatusCounts>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCounts {
    pub ok: usize,
    pub warnings: usize,
    pub errors: usize,
    pub timeouts: usize,
    pub na: usize,
}

impl StatusCounts {
    fn add(&mut self, status: RawStatus) {
        match status {
            RawStatus::Ok => self.ok += 1,
            RawStatus::Warnings => self.warnings += 1,
            RawStatus::Error => self.errors += 1,
            RawStatus::Timeout => self.timeouts += 1,
            RawStatus::Na => self.na += 1,
            RawStatus::Skipped | RawStatus::Unknown => {}
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.ok + self.warnings + self.errors + self.timeouts + self.na
    }
}

impl QuickStats {
    /// Tallies statuses over a package subset (the whole corpus for page
    /// headers, a reverse-dependency subset for package pages).
    #[must_use]
    pub fn compute(packages: &[PackageInfo]) -> QuickStats {
        let mut counts: HashMap<(String, Stage), StatusCounts> = HashMap::new();
        for pkg in packages {
            for ((host, stage), status) in &pkg.results {
                counts
                    .entry((host.clone(), *stage))
                    .or_default()
                    .add(*status);
            }
        }
        QuickStats { counts }
    }

    #[must_use]
    pub fn get(&self, hostname: &str, stage: Stage) -> StatusCounts {
        self.counts
            .get(&(hostname.to_string(), stage))
            .copied()
            .unwrap_or_default()
    }
}

/// The root aggregate built once per run.
#[derive(Debug, Clone)]
pub struct ReportContent {
    pub nodes: Vec<Node>,
    pub pkgs: Vec<PackageInfo>,
    pub skipped_pkgs: Vec<String>,
    pub stages: Vec<Stage>,
    pub explanations: Explanations,
    pub quickstats: QuickStats,
    /// Inner reverse dependencies, for build types that track them.
    pub rev_deps: Option<HashMap<String, Vec<String>>>,
    pub propagation: Option<PropagationDb>,
    pub snapshot: Option<String>,
    pub motd: String,
    pub version: String,
    /// Generation timestamp embedded in every page.
    pub timestamp: String,
}

impl ReportContent {
    /// Assembles the aggregate with the current wall-clock timestamp.
    pub fn assemble(config: &ReportConfig) -> Result<ReportContent> {
        let now = chrono::Local::now().format("%a %b %e %H:%M:%S %Y").to_string();
        ReportContent::assemble_at(config, now)
    }

    /// Assembles the aggregate with an injected timestamp, so identical
    /// inputs produce byte-identical pages.
    pub fn assemble_at(config: &ReportConfig, timestamp: String) -> Result<ReportContent> {
        let nodes = node::load_nodes(&config.central, &config.nodes_file(), &config.node_list)?;

        // Tracked packages: index entries plus skipped ones, merged and
        // sorted case-insensitively.
        let index_file = config.pkg_index_file();
        let mut index: HashMap<String, dcf::DcfRecord> = HashMap::new();
        for record in dcf::parse_file(&index_file)? {
            let name = record.required(&index_file, "Package")?.to_string();
            record.required(&index_file, "Version")?;
            record.required(&index_file, "Maintainer")?;
            index.insert(name, record);
        }

        let mut skipped_pkgs = Vec::new();
        for record in dcf::parse_file(&config.skipped_index_file())? {
            if let Some(name) = record.get("Package") {
                skipped_pkgs.push(name.to_string());
            }
        }

        let mut names: Vec<String> = index.keys().cloned().collect();
        for name in &skipped_pkgs {
            if !index.contains_key(name) {
                names.push(name.clone());
            }
        }
        names.sort_by_key(|name| name.to_lowercase());

        let rev_deps = if config.buildtype.has_dep_graph() {
            let graph_file = config.dep_graph_file();
            console::info("assemble", &format!("Loading {} ...", graph_file.display()));
            let graph = depgraph::load(&graph_file)?;
            Some(depgraph::inner_reverse_deps(&names, &graph))
        } else {
            None
        };

        let db = StatusDb::load(&config.build_status_db_file())?;

        let propagation_file = config.propagation_status_db_file();
        let propagation = if propagation_file.is_file() {
            Some(PropagationDb::load(&propagation_file)?)
        } else {
            None
        };

        let stages: Vec<Stage> = config.buildtype.stages().to_vec();

        console::info("assemble", "Getting info for all packages ...");
        let mut pkgs = Vec::with_capacity(names.len());
        for name in &names {
            console::info("assemble", &format!("Getting info for {name} ..."));
            pkgs.push(assemble_package(config, &nodes, &stages, &index, &db, name));
        }

        let quickstats = QuickStats::compute(&pkgs);
        let snapshot = dcf::read_field(&config.vcs_meta_file(), "Snapshot Date");
        if let Some(date) = &snapshot {
            console::info("assemble", &format!("Snapshot taken at {date}"));
        }

        let explanations = Explanations::compose(&stages, &config.timeouts, config.compact);

        Ok(ReportContent {
            nodes,
            pkgs,
            skipped_pkgs,
            stages,
            explanations,
            quickstats,
            rev_deps,
            propagation,
            snapshot,
            motd: config.motd.clone(),
            version: config.version.clone(),
            timestamp,
        })
    }

    #[must_use]
    pub fn is_skipped(&self, pkg: &str) -> bool {
        self.skipped_pkgs.iter().any(|p| p == pkg)
    }

    #[must_use]
    pub fn node(&self, hostname: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.hostname() == hostname)
    }

    /// Packages from the reverse-dependency list of `pkg`, in list order.
    #[must_use]
    pub fn rev_dep_packages(&self, pkg: &str) -> Vec<&PackageInfo> {
        let Some(rev_deps) = &self.rev_deps else {
            return Vec::new();
        };
        let Some(names) = rev_deps.get(pkg) else {
            return Vec::new();
        };
        names
            .iter()
            .filter_map(|name| self.pkgs.iter().find(|p| &p.name == name))
            .collect()
    }
}

fn assemble_package(
    config: &ReportConfig,
    nodes: &[Node],
    stages: &[Stage],
    index: &HashMap<String, dcf::DcfRecord>,
    db: &StatusDb,
    name: &str,
) -> PackageInfo {
    let record = index.get(name);
    let field = |key: &str| -> String {
        record
            .and_then(|r| r.get(key))
            .unwrap_or_default()
            .to_string()
    };

    // VCS metadata comes from the per-package git log record; a missing
    // record only leaves the fields empty.
    let gitlog = config.gitlog_file(name);
    let git = dcf::parse_single(&gitlog).unwrap_or_default();
    let git_field = |key: &str| git.get(key).unwrap_or_default().to_string();

    let mut results = HashMap::new();
    for node in nodes {
        if !node.supports(name) {
            continue;
        }
        for stage in stages {
            if config.buildtype.stage_applies(*stage, node.has_buildbin()) {
                results.insert(
                    (node.hostname().to_string(), *stage),
                    db.status_or_unknown(name, node.hostname(), *stage),
                );
            }
        }
    }

    PackageInfo {
        name: name.to_string(),
        maintainer: field("Maintainer"),
        version: field("Version"),
        package_status: record
            .and_then(|r| r.get("PackageStatus"))
            .map(ToString::to_string),
        maintainer_email: record
            .and_then(|r| r.get("MaintainerEmail"))
            .map(ToString::to_string),
        git_url: git_field("git_url"),
        git_branch: git_field("git_branch"),
        git_last_commit: git_field("git_last_commit"),
        git_last_commit_date: git_field("git_last_commit_date"),
        results,
    }
}
