//! The package dependency graph and the "inner" reverse-dependency
//! lookup: for each tracked package, which other tracked packages depend
//! on it ("packages affected if I break").

use crate::error::Result;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Direct dependencies per package, as uploaded by the designated node.
pub type DepGraph = HashMap<String, Vec<String>>;

/// Loads a `pkg: dep1 dep2 ...` graph file.
pub fn load(path: &Path) -> Result<DepGraph> {
    let text = crate::dcf::read_lenient(path)?;
    let mut graph = DepGraph::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((pkg, deps)) = line.split_once(':') else {
            continue;
        };
        let deps: Vec<String> = deps
            .split_whitespace()
            .map(ToString::to_string)
            .collect();
        graph.insert(pkg.trim().to_string(), deps);
    }
    Ok(graph)
}

/// Computes, for every tracked package, the sorted list of other tracked
/// packages that directly depend on it. Dependencies and dependers
/// outside `tracked` are ignored.
#[must_use]
pub fn inner_reverse_deps(tracked: &[String], graph: &DepGraph) -> HashMap<String, Vec<String>> {
    let tracked_set: HashSet<&str> = tracked.iter().map(String::as_str).collect();
    let mut reverse: HashMap<String, HashSet<String>> = HashMap::new();

    for (depender, deps) in graph {
        if !tracked_set.contains(depender.as_str()) {
            continue;
        }
        for dep in deps {
            if dep != depender && tracked_set.contains(dep.as_str()) {
                reverse
                    .entry(dep.clone())
                    .or_default()
                    .insert(depender.clone());
            }
        }
    }

    let mut result = HashMap::new();
    for pkg in tracked {
        let mut dependers: Vec<String> = reverse
            .remove(pkg)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        dependers.sort_by_key(|name| name.to_lowercase());
        result.insert(pkg.clone(), dependers);
    }
    result
}
