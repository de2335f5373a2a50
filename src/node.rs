//! Node-level data exchanged with the compositor.

use serde::{Deserialize, Serialize};

/// Joins reading segments inside a multi-syllable key, e.g. `"ke1-ji4"`.
pub const READING_SEPARATOR: &str = "-";

/// Score assigned to a node whose candidate the user picked manually. Nodes
/// at or above this score are treated as fixed and survive re-walks.
pub const SELECTED_CANDIDATE_SCORE: f64 = 99.0;

/// A (reading, surface text) pair. Equality is structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Number of reading segments in the key.
    pub fn segment_count(&self) -> usize {
        self.key
            .split(READING_SEPARATOR)
            .filter(|s| !s.is_empty())
            .count()
    }
}

/// A scored candidate from the language model.
#[derive(Debug, Clone, PartialEq)]
pub struct Unigram {
    pub key_value: KeyValue,
    pub score: f64,
}

impl Unigram {
    pub fn new(key_value: KeyValue, score: f64) -> Self {
        Self { key_value, score }
    }
}

/// A resolved segment of the composition, produced by the compositor's walk.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkedNode {
    /// Number of reading segments this node consumes.
    pub span_length: usize,
    /// The currently chosen candidate.
    pub current_pair: KeyValue,
    /// The node's effective score after any manual fix or override.
    pub score: f64,
    /// All candidates available at this span.
    pub candidates: Vec<Unigram>,
}

impl WalkedNode {
    pub fn new(span_length: usize, current_pair: KeyValue, score: f64, candidates: Vec<Unigram>) -> Self {
        Self { span_length, current_pair, score, candidates }
    }

    /// Highest raw unigram score among the candidates, 0 when none exist.
    pub fn highest_unigram_score(&self) -> f64 {
        if self.candidates.is_empty() {
            return 0.0;
        }
        self.candidates
            .iter()
            .map(|u| u.score)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Raw unigram score of a specific candidate value, if present.
    pub fn score_for(&self, value: &str) -> Option<f64> {
        self.candidates
            .iter()
            .find(|u| u.key_value.value == value)
            .map(|u| u.score)
    }
}
