//! granary — static HTML status reports for a distributed package
//! build-and-check farm.
//!
//! The generator reads per-node, per-package build artifacts (DCF
//! metadata records, log files, timing files) uploaded by worker nodes
//! into a central directory, aggregates them, and emits a tree of HTML
//! pages: a global index, one page per node, one per package, and one
//! per (package, node, stage) cell of the build matrix.
//!
//! It is a single-pass batch job: every page is a pure projection of one
//! immutable [`content::ReportContent`] aggregate assembled at the start
//! of the run. There is no scheduler and no persistence; a failed run is
//! simply re-executed.

pub mod config;
pub mod console;
pub mod content;
pub mod dcf;
pub mod depgraph;
pub mod error;
pub mod html;
pub mod messages;
pub mod node;
pub mod pages;
pub mod rawres;
pub mod report;
pub mod stage;
pub mod status;
pub mod statusdb;
