//! Measurement results.
//!
//! Bitstring ordering follows OpenQASM 3: the rightmost character is
//! classical bit 0. `"01"` means bit 0 read `1` and bit 1 read `0`.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Occurrence counts per observed classical bitstring.
///
/// Every key has the same width (the number of measured bits) and the
/// counts sum to the number of shots requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create counts from (bitstring, count) pairs; duplicates are summed.
    pub fn from_pairs(iter: impl IntoIterator<Item = (impl Into<String>, u64)>) -> Self {
        let mut counts = Self::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_default() += count;
    }

    /// Count for a bitstring; zero if never observed.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over (bitstring, count) pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The most frequently observed bitstring.
    ///
    /// Ties are broken by taking the lexicographically smallest bitstring,
    /// so the answer never depends on map iteration order.
    pub fn most_frequent(&self) -> Option<(&String, u64)> {
        self.counts
            .iter()
            .min_by(|a, b| by_count_desc(a, b))
            .map(|(k, &v)| (k, v))
    }

    /// Width of the observed bitstrings, if any were recorded.
    pub fn width(&self) -> Option<usize> {
        self.counts.keys().next().map(String::len)
    }

    /// Number of distinct bitstrings observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

fn by_count_desc(a: &(&String, &u64), b: &(&String, &u64)) -> Ordering {
    b.1.cmp(a.1).then_with(|| a.0.cmp(b.0))
}

/// Result of running a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement counts.
    pub counts: Counts,
    /// Number of shots executed.
    pub shots: u32,
    /// Wall-clock execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    /// When the backend finished the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Backend-specific metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ExecutionResult {
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
            completed_at: None,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_execution_time(mut self, time_ms: u64) -> Self {
        self.execution_time_ms = Some(time_ms);
        self
    }

    pub fn with_completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_basic() {
        let mut counts = Counts::new();
        counts.insert("00", 500);
        counts.insert("11", 400);
        counts.insert("11", 100);

        assert_eq!(counts.get("00"), 500);
        assert_eq!(counts.get("11"), 500);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.total_shots(), 1000);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_most_frequent() {
        let counts = Counts::from_pairs([("00", 100), ("11", 900)]);
        assert_eq!(counts.most_frequent(), Some((&"11".to_string(), 900)));
        assert_eq!(Counts::new().most_frequent(), None);
    }

    #[test]
    fn test_most_frequent_tie_is_lexicographic() {
        let counts = Counts::from_pairs([("110", 40), ("011", 40), ("101", 40), ("000", 10)]);
        let (best, count) = counts.most_frequent().unwrap();
        assert_eq!(best, "011");
        assert_eq!(count, 40);
    }

    #[test]
    fn test_width() {
        assert_eq!(Counts::from_pairs([("0110", 3)]).width(), Some(4));
        assert_eq!(Counts::new().width(), None);
    }

    #[test]
    fn test_execution_result_builders() {
        let counts = Counts::from_pairs([("00", 250), ("11", 750)]);
        let result = ExecutionResult::new(counts, 1000)
            .with_execution_time(3)
            .with_metadata(serde_json::json!({ "qubits": 2 }));

        assert_eq!(result.shots, 1000);
        assert_eq!(result.execution_time_ms, Some(3));
        assert!(result.completed_at.is_none());
        assert_eq!(result.metadata["qubits"], 2);
        assert_eq!(result.counts.most_frequent().unwrap().0, "11");
    }
}
