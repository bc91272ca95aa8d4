//! Explanatory sentences for each status category, composed from the
//! build type's active stage labels.
//!
//! The grammar is deliberately rigid: for N labels, the first N-1 are
//! joined with ", " and the last is appended with " or " (or " and " for
//! the OK sentence under the compact layout); a single label is used
//! unadorned. The wording here appears verbatim in the report legend, so
//! changes are user-visible.

use crate::stage::{Stage, Timeouts};

/// The per-category explanation table shown in the report legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanations {
    pub timeout: String,
    pub error: String,
    /// Only present when CHECK is an active stage.
    pub warnings: Option<String>,
    pub ok: String,
    pub na: String,
    /// Only present when CHECK or BUILD BIN is an active stage.
    pub skipped: Option<String>,
}

/// Joins labels per the report grammar: `A`, `A or B`, `A, B or C`, ...
#[must_use]
pub fn join_labels(labels: &[&str], conjunction: &str) -> String {
    match labels {
        [] => String::new(),
        [single] => (*single).to_string(),
        [head @ .., last] => format!("{} {conjunction} {last}", head.join(", ")),
    }
}

fn timeout_message(stages: &[Stage], timeouts: &Timeouts) -> String {
    // Only stages that declare a timeout threshold are listed; all four
    // catalog stages do.
    let mut labels = Vec::new();
    let mut minutes = Vec::new();
    for stage in Stage::ALL {
        if stages.contains(&stage) {
            labels.push(stage.label());
            minutes.push(timeouts.minutes(stage));
        }
    }
    let mut msg = join_labels(&labels, "or");
    msg.push_str(" of package took more than ");
    let uniform = minutes.windows(2).all(|w| w[0] == w[1]);
    if uniform {
        msg.push_str(&minutes.first().copied().unwrap_or(0).to_string());
    } else {
        let strs: Vec<String> = minutes.iter().map(u64::to_string).collect();
        let refs: Vec<&str> = strs.iter().map(String::as_str).collect();
        msg.push_str(&join_labels(&refs, "or"));
    }
    msg.push_str(" minutes");
    if !uniform {
        msg.push_str(", respectively");
    }
    msg
}

fn error_message(stages: &[Stage]) -> String {
    let labels: Vec<&str> = stages.iter().map(|s| s.label()).collect();
    let msg = if labels == ["CHECK"] {
        "CHECK of package produced errors".to_string()
    } else {
        let check_active = labels.contains(&"CHECK");
        let others: Vec<&str> = labels.iter().copied().filter(|l| *l != "CHECK").collect();
        let mut msg = join_labels(&others, "or");
        msg.push_str(" of package failed");
        if check_active {
            msg.push_str(", or CHECK produced errors");
        }
        msg
    };
    format!("Bad DESCRIPTION file, or {msg}")
}

fn skipped_message(stages: &[Stage]) -> Option<String> {
    let mut labels = Vec::new();
    if stages.contains(&Stage::CheckSrc) {
        labels.push(Stage::CheckSrc.label());
    }
    if stages.contains(&Stage::BuildBin) {
        labels.push(Stage::BuildBin.label());
    }
    if labels.is_empty() {
        return None;
    }
    Some(format!(
        "{} of package was skipped because the BUILD step failed",
        join_labels(&labels, "or")
    ))
}

impl Explanations {
    /// Composes the explanation table for an ordered active stage list.
    #[must_use]
    pub fn compose(stages: &[Stage], timeouts: &Timeouts, compact: bool) -> Explanations {
        let labels: Vec<&str> = stages.iter().map(|s| s.label()).collect();
        let check_active = stages.contains(&Stage::CheckSrc);

        let ok_conjunction = if compact { "and" } else { "or" };
        let ok = format!(
            "{} of package went OK",
            join_labels(&labels, ok_conjunction)
        );
        let na = format!(
            "{} result is not available because of an anomaly in the Build System",
            join_labels(&labels, "or")
        );
        let warnings = check_active.then(|| "CHECK of package produced warnings".to_string());

        Explanations {
            timeout: timeout_message(stages, timeouts),
            error: error_message(stages),
            warnings,
            ok,
            na,
            skipped: skipped_message(stages),
        }
    }
}
