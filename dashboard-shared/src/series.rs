//! Rolling sample windows with derived statistics.

use std::collections::VecDeque;

use crate::types::Channel;

/// Number of samples kept per channel, and the number of bars in a chart.
pub const SERIES_CAPACITY: usize = 60;

/// A fixed-capacity sample window that drops the oldest value when full.
///
/// Values are kept in insertion order, oldest first. Callers are expected to
/// filter out non-finite values before pushing.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingSeries {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl RollingSeries {
    /// Create a new window with the given capacity.
    ///
    /// # Panics
    /// Panics if capacity is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RollingSeries capacity must be > 0");
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest if the window is full.
    pub fn push(&mut self, value: f64) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    /// Compute min/max/avg in a single pass.
    pub fn stats(&self) -> SeriesStats {
        SeriesStats::scan(self.samples.iter().copied())
    }
}

impl Default for RollingSeries {
    fn default() -> Self {
        Self::new(SERIES_CAPACITY)
    }
}

/// Min/max/avg over a window. All `None` for an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeriesStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

impl SeriesStats {
    pub fn scan(values: impl IntoIterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min: Some(min),
            max: Some(max),
            avg: Some(sum / count as f64),
        }
    }
}

/// Current value plus window statistics for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatsView {
    pub current: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

/// The three per-channel windows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelSeries {
    temperature: RollingSeries,
    humidity: RollingSeries,
    light: RollingSeries,
}

impl ChannelSeries {
    pub fn get(&self, channel: Channel) -> &RollingSeries {
        match channel {
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
            Channel::Light => &self.light,
        }
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut RollingSeries {
        match channel {
            Channel::Temperature => &mut self.temperature,
            Channel::Humidity => &mut self.humidity,
            Channel::Light => &mut self.light,
        }
    }

    /// Derive the stats view for a channel from its window.
    pub fn view(&self, channel: Channel) -> StatsView {
        let series = self.get(channel);
        let stats = series.stats();
        StatsView {
            current: series.latest(),
            min: stats.min,
            max: stats.max,
            avg: stats.avg,
        }
    }
}
