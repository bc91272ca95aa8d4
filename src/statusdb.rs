//! The build-status and propagation-status databases uploaded by the
//! build system.
//!
//! `build-status.db` is the one input the report cannot exist without:
//! one line per `(package, node, stage)` cell of the build matrix, in the
//! form `pkg#node#stage: STATUS`. `propagation-status.db` is optional and
//! uses `pkg#target: STATUS` lines.

use crate::error::{ReportError, Result};
use crate::stage::Stage;
use crate::status::RawStatus;
use std::collections::HashMap;
use std::path::Path;

/// Composite key space for per-cell statuses: `(package, hostname,
/// stage)`.
pub type StatusKey = (String, String, Stage);

/// In-memory copy of `build-status.db`.
#[derive(Debug, Clone, Default)]
pub struct StatusDb {
    entries: HashMap<StatusKey, RawStatus>,
}

impl StatusDb {
    /// Loads the database.
    ///
    /// # Errors
    /// A missing file or a line that does not parse as
    /// `pkg#node#stage: STATUS` is fatal; an unrecognized status string is
    /// not (it degrades to `unknown`).
    pub fn load(path: &Path) -> Result<StatusDb> {
        let text = crate::dcf::read_lenient(path)?;
        let mut entries = HashMap::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = || ReportError::Malformed {
                what: "build-status.db",
                line: i + 1,
                text: line.to_string(),
            };
            let (key, value) = line.split_once(':').ok_or_else(malformed)?;
            let mut parts = key.split('#');
            let (pkg, node, stage_id) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(p), Some(n), Some(s), None) => (p, n, s),
                _ => return Err(malformed()),
            };
            let stage = Stage::from_id(stage_id.trim()).ok_or_else(malformed)?;
            entries.insert(
                (pkg.trim().to_string(), node.trim().to_string(), stage),
                RawStatus::parse(value),
            );
        }
        Ok(StatusDb { entries })
    }

    /// Exact cell lookup; `None` when the build system never reported the
    /// cell.
    #[must_use]
    pub fn status(&self, pkg: &str, node: &str, stage: Stage) -> Option<RawStatus> {
        self.entries
            .get(&(pkg.to_string(), node.to_string(), stage))
            .copied()
    }

    /// Cell lookup with the degrade-to-`unknown` policy applied.
    #[must_use]
    pub fn status_or_unknown(&self, pkg: &str, node: &str, stage: Stage) -> RawStatus {
        self.status(pkg, node, stage).unwrap_or(RawStatus::Unknown)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// In-memory copy of the optional `propagation-status.db`: for each
/// package, the (target, status) pairs reported by the propagation
/// pipeline.
#[derive(Debug, Clone, Default)]
pub struct PropagationDb {
    entries: HashMap<String, Vec<(String, String)>>,
}

impl PropagationDb {
    pub fn load(path: &Path) -> Result<PropagationDb> {
        let text = crate::dcf::read_lenient(path)?;
        let mut entries: HashMap<String, Vec<(String, String)>> = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            // Propagation is an optional overlay; malformed lines are
            // dropped rather than failing the run.
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let Some((pkg, target)) = key.split_once('#') else {
                continue;
            };
            entries
                .entry(pkg.trim().to_string())
                .or_default()
                .push((target.trim().to_string(), value.trim().to_string()));
        }
        Ok(PropagationDb { entries })
    }

    #[must_use]
    pub fn for_package(&self, pkg: &str) -> &[(String, String)] {
        self.entries.get(pkg).map(Vec::as_slice).unwrap_or(&[])
    }
}
