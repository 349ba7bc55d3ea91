use crate::consts::RATIO_UNAVAILABLE_LABEL;

/// Aggregate counts of a [`MarkerStore`](super::MarkerStore) at one moment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MarkerStats {
    pub inside_count: usize,
    pub outside_count: usize,
    pub fiber_count: usize,
    /// Sum of fiber area ratios.
    pub fiber_area_ratio: f64,
}

impl MarkerStats {
    pub fn total(&self) -> usize {
        self.inside_count + self.outside_count
    }

    /// Fraction of nuclei classified inside a fiber; `None` when there are no nuclei.
    pub fn positive_ratio(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            None
        } else {
            Some(self.inside_count as f64 / total as f64)
        }
    }
}

/// Display form of a positive ratio.
///
/// Only a strictly positive ratio is shown as a number; an undefined ratio and
/// an exact zero both read "NA".
pub fn ratio_label(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) if r > 0.0 => format!("{r}"),
        _ => RATIO_UNAVAILABLE_LABEL.to_string(),
    }
}
