// Layer3 Common Module - Tracker contract shared by every driving tracker

pub mod tracker;

pub use tracker::{StatTracker, BoxedEventTracker, BoxedMetricTracker};
