// src/aggregator/samples.rs
//! Wind speed series and running gust for the current window.

/// Round to two decimal places, half away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Median speed and gust of a non-empty window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reduction {
    pub median: f64,
    pub gust: f64,
}

/// Wind speed samples (m/s) collected since the last reset.
///
/// The series is append-only between clears. The gust is the running maximum
/// and is never lower than any sample currently held.
#[derive(Clone, Debug, Default)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    gust: Option<f64>,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round to hundredths, append, and raise the gust if needed.
    /// Returns the stored value.
    pub fn add_sample(&mut self, value: f64) -> f64 {
        let speed = round_to_hundredths(value);
        self.samples.push(speed);
        self.gust = Some(self.gust.map(|g| g.max(speed)).unwrap_or(speed));
        speed
    }

    /// Median and gust of the series; None when empty.
    pub fn reduce(&self) -> Option<Reduction> {
        let gust = self.gust?;
        let median = median(&self.samples)?;
        Some(Reduction {
            median: round_to_hundredths(median),
            gust,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn gust(&self) -> Option<f64> {
        self.gust
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<f64> {
        self.samples.last().copied()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.gust = None;
    }

    /// Drop the oldest `count` samples and recompute the gust from what is
    /// left. Used when a submission covered only part of the series.
    pub fn drain_front(&mut self, count: usize) {
        if count >= self.samples.len() {
            self.clear();
            return;
        }
        self.samples.drain(..count);
        self.gust = self.samples.iter().copied().reduce(f64::max);
    }
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
