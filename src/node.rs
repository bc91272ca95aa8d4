//! Worker node registry and per-node metadata.
//!
//! The participating nodes for a run come from `GRANARY_NODES`
//! (space-separated `hostname` or `hostname:pkgA,pkgB` entries, where the
//! optional list restricts which packages the node builds). Their static
//! metadata (OS, arch, platform, package type, encoding) lives in the
//! central `nodes.dcf` registry; everything else is read from the
//! `NodeInfo` files each node uploads.

use crate::dcf::{self, DcfRecord};
use crate::error::{ReportError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Static registry entry for one node.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub hostname: String,
    pub os: String,
    pub arch: String,
    pub platform: String,
    pub pkg_type: String,
    pub encoding: String,
    /// Optional operator note rendered on the node's status pages.
    pub note: Option<String>,
}

impl NodeSpec {
    fn from_record(record: &DcfRecord, file: &Path) -> Result<NodeSpec> {
        Ok(NodeSpec {
            hostname: record.required(file, "Node")?.to_string(),
            os: record.required(file, "OS")?.to_string(),
            arch: record.required(file, "Arch")?.to_string(),
            platform: record.required(file, "Platform")?.to_string(),
            pkg_type: record.required(file, "PkgType")?.to_string(),
            encoding: record
                .get("Encoding")
                .unwrap_or("utf-8")
                .to_string(),
            note: record.get("Note").map(ToString::to_string),
        })
    }
}

/// One participating node, ready for report generation.
#[derive(Debug, Clone)]
pub struct Node {
    pub spec: NodeSpec,
    pub r_version: String,
    pub r_installed_packages: usize,
    /// Restricts which packages this node builds; `None` means all.
    supported: Option<Vec<String>>,
}

impl Node {
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.spec.hostname
    }

    /// Nodes producing anything other than plain source tarballs run the
    /// optional BUILD BIN stage.
    #[must_use]
    pub fn has_buildbin(&self) -> bool {
        self.spec.pkg_type != "source"
    }

    #[must_use]
    pub fn supports(&self, pkg: &str) -> bool {
        match &self.supported {
            None => true,
            Some(list) => list.iter().any(|p| p == pkg),
        }
    }
}

/// Loads the `nodes.dcf` registry, keyed by hostname.
pub fn load_registry(path: &Path) -> Result<HashMap<String, NodeSpec>> {
    let mut registry = HashMap::new();
    for record in dcf::parse_file(path)? {
        let spec = NodeSpec::from_record(&record, path)?;
        registry.insert(spec.hostname.clone(), spec);
    }
    Ok(registry)
}

/// Parses the `GRANARY_NODES` value into (hostname, package filter)
/// pairs, preserving order.
#[must_use]
pub fn parse_node_list(raw: &str) -> Vec<(String, Option<Vec<String>>)> {
    raw.split_whitespace()
        .map(|entry| match entry.split_once(':') {
            Some((host, pkgs)) => {
                let filter = pkgs
                    .split(',')
                    .filter(|p| !p.is_empty())
                    .map(ToString::to_string)
                    .collect();
                (host.to_string(), Some(filter))
            }
            None => (entry.to_string(), None),
        })
        .collect()
}

/// Resolves the participating node list against the registry and reads
/// each node's `NodeInfo` metadata. A listed node missing from the
/// registry is fatal; missing `NodeInfo` files only degrade the node's
/// summary.
pub fn load_nodes(central: &Path, registry_file: &Path, node_list: &str) -> Result<Vec<Node>> {
    let registry = load_registry(registry_file)?;
    let mut nodes = Vec::new();
    for (hostname, supported) in parse_node_list(node_list) {
        let spec = registry
            .get(&hostname)
            .cloned()
            .ok_or_else(|| ReportError::UnknownNode(hostname.clone()))?;
        let r_version = read_r_version(central, &hostname).unwrap_or_default();
        let r_installed_packages = read_installed_packages(central, &spec)
            .map(|pkgs| pkgs.len())
            .unwrap_or(0);
        nodes.push(Node {
            spec,
            r_version,
            r_installed_packages,
            supported,
        });
    }
    Ok(nodes)
}

/// `products-in/<node>/NodeInfo` under the central directory.
#[must_use]
pub fn node_info_dir(central: &Path, hostname: &str) -> PathBuf {
    central.join("products-in").join(hostname).join("NodeInfo")
}

/// First line of the node's `R-version.txt`, if uploaded.
#[must_use]
pub fn read_r_version(central: &Path, hostname: &str) -> Option<String> {
    let path = node_info_dir(central, hostname).join("R-version.txt");
    let text = dcf::read_lenient(&path).ok()?;
    text.lines().next().map(|l| l.trim().to_string())
}

/// One row of the node's installed-package table.
#[derive(Debug, Clone)]
pub struct InstalledPackage {
    pub name: String,
    pub lib_path: String,
    pub version: String,
    pub built: String,
}

/// Parses the node's `R-instpkgs.txt` (whitespace-separated columns
/// `Name LibPath Version Built`; the header row is skipped).
#[must_use]
pub fn read_installed_packages(central: &Path, spec: &NodeSpec) -> Option<Vec<InstalledPackage>> {
    let path = node_info_dir(central, &spec.hostname).join("R-instpkgs.txt");
    let text = dcf::read_with_encoding(&path, &spec.encoding).ok()?;
    let mut packages = Vec::new();
    for line in text.lines() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        // The header row is "LibPath Version Built" (three columns).
        if cols.len() < 4 || cols[1] == "LibPath" {
            continue;
        }
        packages.push(InstalledPackage {
            name: cols[0].to_string(),
            lib_path: cols[1].to_string(),
            version: cols[2].to_string(),
            built: cols[3].to_string(),
        });
    }
    Some(packages)
}

/// The node's `R-config.txt` (single DCF record of R configuration
/// variables such as `CC` or `CXXFLAGS`).
#[must_use]
pub fn read_r_config(central: &Path, hostname: &str) -> Option<DcfRecord> {
    let path = node_info_dir(central, hostname).join("R-config.txt");
    dcf::parse_single(&path).ok()
}

/// Full contents of the node's `<cmd>-version.txt`, if uploaded.
#[must_use]
pub fn read_command_version(central: &Path, spec: &NodeSpec, cmd: &str) -> Option<String> {
    let path = node_info_dir(central, &spec.hostname).join(format!("{cmd}-version.txt"));
    let text = dcf::read_with_encoding(&path, &spec.encoding).ok()?;
    let trimmed = text.trim_end().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}
