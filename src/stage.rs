//! The stage catalog: the closed set of build stages, which of them a
//! given build-matrix type runs, and the per-stage command timeouts.
//!
//! Every downstream glyph, message and page depends on the stage list
//! returned here, so the catalog is deterministic and does no I/O.

use crate::error::{ReportError, Result};
use std::fmt;

/// One phase of a package's build/check pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Install,
    BuildSrc,
    CheckSrc,
    BuildBin,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Install,
        Stage::BuildSrc,
        Stage::CheckSrc,
        Stage::BuildBin,
    ];

    /// Stable identifier used in file names and the status database.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Stage::Install => "install",
            Stage::BuildSrc => "buildsrc",
            Stage::CheckSrc => "checksrc",
            Stage::BuildBin => "buildbin",
        }
    }

    /// Display label used in tables and explanation sentences.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Stage::Install => "INSTALL",
            Stage::BuildSrc => "BUILD",
            Stage::CheckSrc => "CHECK",
            Stage::BuildBin => "BUILD BIN",
        }
    }

    /// Capitalized word used in page titles ("Check results for ...").
    #[must_use]
    pub fn title_word(self) -> &'static str {
        match self {
            Stage::Install => "Install",
            Stage::BuildSrc => "Build",
            Stage::CheckSrc => "Check",
            Stage::BuildBin => "Build Bin",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Stage> {
        Stage::ALL.into_iter().find(|s| s.id() == id)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The run configuration selecting which package corpus and stage set
/// apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildType {
    Standard,
    LongTests,
    Workflows,
    Books,
    Cran,
    DataExperiment,
}

impl BuildType {
    pub fn parse(s: &str) -> Result<BuildType> {
        match s {
            "standard" => Ok(BuildType::Standard),
            "long-tests" => Ok(BuildType::LongTests),
            "workflows" => Ok(BuildType::Workflows),
            "books" => Ok(BuildType::Books),
            "cran" => Ok(BuildType::Cran),
            "data-experiment" => Ok(BuildType::DataExperiment),
            other => Err(ReportError::BadBuildType(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BuildType::Standard => "standard",
            BuildType::LongTests => "long-tests",
            BuildType::Workflows => "workflows",
            BuildType::Books => "books",
            BuildType::Cran => "cran",
            BuildType::DataExperiment => "data-experiment",
        }
    }

    /// Ordered stage list displayed for this build type.
    #[must_use]
    pub fn stages(self) -> &'static [Stage] {
        match self {
            BuildType::LongTests => &[Stage::Install, Stage::BuildSrc, Stage::CheckSrc],
            BuildType::Workflows | BuildType::Books => &[Stage::BuildSrc],
            BuildType::Standard | BuildType::Cran | BuildType::DataExperiment => {
                &[Stage::BuildSrc, Stage::CheckSrc, Stage::BuildBin]
            }
        }
    }

    /// Whether cross-package dependency reporting applies to this type.
    #[must_use]
    pub fn has_dep_graph(self) -> bool {
        matches!(self, BuildType::Standard)
    }

    /// Raw results are mirrored next to the pages for every type except
    /// the long-tests variant.
    #[must_use]
    pub fn has_raw_results(self) -> bool {
        !matches!(self, BuildType::LongTests)
    }

    /// Default per-command timeout in seconds.
    #[must_use]
    pub fn default_timeout_secs(self) -> u64 {
        match self {
            BuildType::DataExperiment => 4800,
            BuildType::Workflows => 7200,
            BuildType::LongTests => 21600,
            _ => 2400,
        }
    }

    /// Whether `stage` produces a result for a package on a node of this
    /// build type. `install` only exists for the long-tests variant,
    /// `checksrc` only outside workflows/books, `buildbin` only on nodes
    /// that build binaries, `buildsrc` always.
    #[must_use]
    pub fn stage_applies(self, stage: Stage, node_has_buildbin: bool) -> bool {
        if !self.stages().contains(&stage) {
            return false;
        }
        match stage {
            Stage::Install => self == BuildType::LongTests,
            Stage::CheckSrc => !matches!(self, BuildType::Workflows | BuildType::Books),
            Stage::BuildBin => node_has_buildbin,
            Stage::BuildSrc => true,
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-stage command timeouts, in seconds.
///
/// Defaults come from the build type and can be overridden through a
/// lookup function (the binary passes the process environment; tests
/// pass a closed table).
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    secs: [u64; 4],
}

impl Timeouts {
    /// Build-type defaults with no overrides.
    #[must_use]
    pub fn for_buildtype(buildtype: BuildType) -> Timeouts {
        Timeouts {
            secs: [buildtype.default_timeout_secs(); 4],
        }
    }

    /// Resolves timeouts from defaults plus overrides.
    ///
    /// `lookup` is queried for `GRANARY_CMD_TIMEOUT` (base override) and
    /// then for per-stage `GRANARY_INSTALL_TIMEOUT`,
    /// `GRANARY_BUILD_TIMEOUT`, `GRANARY_CHECK_TIMEOUT` and
    /// `GRANARY_BUILDBIN_TIMEOUT`. Unparsable values fall back to the
    /// previous level.
    pub fn resolve<F>(buildtype: BuildType, lookup: F) -> Timeouts
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |name: &str, fallback: u64| -> u64 {
            lookup(name)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(fallback)
        };
        let base = parse("GRANARY_CMD_TIMEOUT", buildtype.default_timeout_secs());
        let vars = [
            "GRANARY_INSTALL_TIMEOUT",
            "GRANARY_BUILD_TIMEOUT",
            "GRANARY_CHECK_TIMEOUT",
            "GRANARY_BUILDBIN_TIMEOUT",
        ];
        let mut secs = [base; 4];
        for (slot, var) in secs.iter_mut().zip(vars) {
            *slot = parse(var, base);
        }
        Timeouts { secs }
    }

    /// Timeout for one stage, in whole minutes (truncated).
    #[must_use]
    pub fn minutes(&self, stage: Stage) -> u64 {
        self.secs(stage) / 60
    }

    #[must_use]
    pub fn secs(&self, stage: Stage) -> u64 {
        let idx = Stage::ALL.iter().position(|s| *s == stage).unwrap_or(0);
        self.secs[idx]
    }
}
