// Streaming Aggregator - Running mean over an unbounded observation stream

use std::ops::Add;

/// Incremental mean. An empty aggregator reports 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StreamingAggregator {
    sum: f64,
    count: u64,
}

impl StreamingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, observation: f64) {
        self.sum += observation;
        self.count += 1;
    }

    pub fn value(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    pub fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }

    /// Combined aggregator; neither operand changes.
    pub fn merge(&self, other: &StreamingAggregator) -> StreamingAggregator {
        StreamingAggregator {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Add<f64> for StreamingAggregator {
    type Output = StreamingAggregator;

    fn add(mut self, observation: f64) -> StreamingAggregator {
        self.observe(observation);
        self
    }
}

impl Add for StreamingAggregator {
    type Output = StreamingAggregator;

    fn add(self, other: StreamingAggregator) -> StreamingAggregator {
        self.merge(&other)
    }
}
