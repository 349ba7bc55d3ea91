//! Per-image summary table, `;`-separated.

use crate::markers::stats::ratio_label;
use crate::surface::Surface;

pub const CSV_HEADER: [&str; 5] = [
    "Image names",
    "Total number of nuclei",
    "Number of tropomyosin positive nuclei",
    "Fusion index",
    "Fiber area ratio",
];

/// One row of the summary table.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub name: String,
    pub total: usize,
    pub positive: usize,
    pub positive_ratio: Option<f64>,
    pub fiber_area_ratio: f64,
}

impl SummaryRow {
    pub fn from_surface(surface: &Surface) -> Self {
        let stats = surface.markers().stats();
        Self {
            name: surface.name().to_string(),
            total: stats.total(),
            positive: stats.inside_count,
            positive_ratio: stats.positive_ratio(),
            fiber_area_ratio: stats.fiber_area_ratio,
        }
    }

    /// Fusion index as displayed: "NA" unless strictly positive.
    pub fn ratio_label(&self) -> String {
        ratio_label(self.positive_ratio)
    }
}

/// Render rows as CSV text with a header line; every line ends in `\n`.
pub fn summary_csv(rows: &[SummaryRow]) -> String {
    let mut out = CSV_HEADER.join(";");
    out.push('\n');
    for row in rows {
        let fields = [
            row.name.clone(),
            row.total.to_string(),
            row.positive.to_string(),
            row.ratio_label(),
            row.fiber_area_ratio.to_string(),
        ];
        out.push_str(&fields.join(";"));
        out.push('\n');
    }
    out
}
