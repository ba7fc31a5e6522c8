//! Chart series ring buffers

use std::collections::VecDeque;

use satlink_core::SimTime;

/// One plotted point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartPoint {
    pub time: SimTime,
    pub value: f64,
}

/// Bounded FIFO series.
/// INVARIANT: never more than `capacity` points, never two points with the
/// same time.
#[derive(Clone, Debug)]
pub struct ChartSeries {
    points: VecDeque<ChartPoint>,
    capacity: usize,
}

impl ChartSeries {
    pub fn new(capacity: usize) -> Self {
        ChartSeries {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a point, evicting the oldest beyond capacity.
    /// Returns false (and changes nothing) if the time is already present.
    pub fn push(&mut self, time: SimTime, value: f64) -> bool {
        if self.capacity == 0 || self.points.iter().any(|p| p.time == time) {
            return false;
        }
        self.points.push_back(ChartPoint { time, value });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
        true
    }

    pub fn points(&self) -> impl Iterator<Item = &ChartPoint> + '_ {
        self.points.iter()
    }

    pub fn last(&self) -> Option<&ChartPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Named series, in configuration order
#[derive(Clone, Debug)]
pub struct ChartSet {
    series: Vec<(String, ChartSeries)>,
}

impl ChartSet {
    pub fn new(channels: &[String], capacity: usize) -> Self {
        ChartSet {
            series: channels
                .iter()
                .map(|c| (c.clone(), ChartSeries::new(capacity)))
                .collect(),
        }
    }

    pub fn get(&self, channel: &str) -> Option<&ChartSeries> {
        self.series
            .iter()
            .find(|(name, _)| name == channel)
            .map(|(_, s)| s)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut ChartSeries)> + '_ {
        self.series.iter_mut().map(|(n, s)| (n.as_str(), s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChartSeries)> + '_ {
        self.series.iter().map(|(n, s)| (n.as_str(), s))
    }
}
