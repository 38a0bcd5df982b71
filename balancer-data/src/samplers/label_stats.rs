use std::fmt;

/// Whether a label takes part in balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStatus {
    Included,
    Ignored,
}

impl fmt::Display for LabelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelStatus::Included => f.write_str("included"),
            LabelStatus::Ignored => f.write_str("ignored"),
        }
    }
}

/// Per-label summary reported by `BalancedSampler::label_stats`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStats<L> {
    pub label: L,
    /// Number of dataset items carrying this label.
    pub count: usize,
    /// `count` divided by the dataset length.
    pub rate: f64,
    pub status: LabelStatus,
}

/// Renders stats as a fixed-width table, one row per label.
pub fn format_label_stats<L: fmt::Display>(stats: &[LabelStats<L>]) -> String {
    let mut table = format!("{:>8} {:>8} {:>8} {:>10}", "label", "count", "rate", "status");
    for row in stats {
        table.push('\n');
        table.push_str(&format!(
            "{:>8} {:>8} {:>8.4} {:>10}",
            row.label.to_string(),
            row.count,
            row.rate,
            row.status.to_string()
        ));
    }
    table
}
