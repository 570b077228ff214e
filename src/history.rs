use std::collections::VecDeque;

use crate::snapshot::MatchSnapshot;

pub const HISTORY_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedMetric {
    HomeXg,
    AwayXg,
    HomeSot,
    AwaySot,
    HomePossession,
    AwayPossession,
}

impl TrackedMetric {
    pub const ALL: [TrackedMetric; 6] = [
        TrackedMetric::HomeXg,
        TrackedMetric::AwayXg,
        TrackedMetric::HomeSot,
        TrackedMetric::AwaySot,
        TrackedMetric::HomePossession,
        TrackedMetric::AwayPossession,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TrackedMetric::HomeXg => "home xG",
            TrackedMetric::AwayXg => "away xG",
            TrackedMetric::HomeSot => "home SoT",
            TrackedMetric::AwaySot => "away SoT",
            TrackedMetric::HomePossession => "home poss",
            TrackedMetric::AwayPossession => "away poss",
        }
    }

    fn read(self, snapshot: &MatchSnapshot) -> f64 {
        match self {
            TrackedMetric::HomeXg => snapshot.home_xg,
            TrackedMetric::AwayXg => snapshot.away_xg,
            TrackedMetric::HomeSot => snapshot.home_sot as f64,
            TrackedMetric::AwaySot => snapshot.away_sot as f64,
            TrackedMetric::HomePossession => snapshot.home_possession,
            TrackedMetric::AwayPossession => snapshot.away_possession,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Last [`HISTORY_LEN`] values of each tracked metric, oldest first.
/// Kept by the caller for display; the model never reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricHistory {
    buffers: [VecDeque<f64>; 6],
}

impl MetricHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, metric: TrackedMetric, value: f64) {
        let buf = &mut self.buffers[metric.index()];
        buf.push_back(value);
        while buf.len() > HISTORY_LEN {
            buf.pop_front();
        }
    }

    pub fn record(&mut self, snapshot: &MatchSnapshot) {
        for metric in TrackedMetric::ALL {
            self.push(metric, metric.read(snapshot));
        }
    }

    pub fn values(&self, metric: TrackedMetric) -> &VecDeque<f64> {
        &self.buffers[metric.index()]
    }

    pub fn latest(&self, metric: TrackedMetric) -> Option<f64> {
        self.values(metric).back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.iter().all(VecDeque::is_empty)
    }

    pub fn clear(&mut self) {
        for buf in &mut self.buffers {
            buf.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut h = MetricHistory::new();
        for i in 0..15 {
            h.push(TrackedMetric::HomeXg, i as f64);
        }
        let v = h.values(TrackedMetric::HomeXg);
        assert_eq!(v.len(), HISTORY_LEN);
        assert_eq!(v.front().copied(), Some(5.0));
        assert_eq!(h.latest(TrackedMetric::HomeXg), Some(14.0));
        assert!(h.values(TrackedMetric::AwayXg).is_empty());
    }

    #[test]
    fn record_reads_every_metric() {
        let snap = MatchSnapshot {
            home_xg: 1.1,
            away_sot: 3,
            away_possession: 61.0,
            ..MatchSnapshot::default()
        };
        let mut h = MetricHistory::new();
        h.record(&snap);
        assert_eq!(h.latest(TrackedMetric::HomeXg), Some(1.1));
        assert_eq!(h.latest(TrackedMetric::AwaySot), Some(3.0));
        assert_eq!(h.latest(TrackedMetric::AwayPossession), Some(61.0));
        h.clear();
        assert!(h.is_empty());
    }
}
