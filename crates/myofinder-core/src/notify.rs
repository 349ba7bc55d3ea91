//! "Markers changed" notifications for summary displays.

use std::sync::mpsc;

use serde::Serialize;

use crate::markers::stats::{ratio_label, MarkerStats};

/// Aggregate statistics sent to observers after every marker mutation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MarkerSnapshot {
    pub positive_count: usize,
    pub total: usize,
    /// `None` when there are no nuclei.
    pub positive_ratio: Option<f64>,
    pub fiber_area_ratio: f64,
}

impl MarkerSnapshot {
    pub fn ratio_label(&self) -> String {
        ratio_label(self.positive_ratio)
    }
}

impl From<MarkerStats> for MarkerSnapshot {
    fn from(stats: MarkerStats) -> Self {
        Self {
            positive_count: stats.inside_count,
            total: stats.total(),
            positive_ratio: stats.positive_ratio(),
            fiber_area_ratio: stats.fiber_area_ratio,
        }
    }
}

/// Receives marker snapshots.
pub trait MarkerObserver {
    fn markers_changed(&mut self, snapshot: &MarkerSnapshot);
}

impl<F> MarkerObserver for F
where
    F: FnMut(&MarkerSnapshot),
{
    fn markers_changed(&mut self, snapshot: &MarkerSnapshot) {
        (self)(snapshot)
    }
}

/// Forwards snapshots over an mpsc channel. A dropped receiver is ignored.
pub struct ChannelObserver(pub mpsc::Sender<MarkerSnapshot>);

impl MarkerObserver for ChannelObserver {
    fn markers_changed(&mut self, snapshot: &MarkerSnapshot) {
        let _ = self.0.send(*snapshot);
    }
}

#[derive(Default)]
pub struct NotificationBridge {
    observers: Vec<Box<dyn MarkerObserver>>,
}

impl NotificationBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl MarkerObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Hand `snapshot` to every observer, in subscription order.
    pub fn notify(&mut self, snapshot: &MarkerSnapshot) {
        for observer in &mut self.observers {
            observer.markers_changed(snapshot);
        }
    }
}

impl std::fmt::Debug for NotificationBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBridge")
            .field("observers", &self.observers.len())
            .finish()
    }
}
