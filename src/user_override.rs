//! User override suggestion model.
//!
//! Learns, per 3-gram context of resolved nodes, which surface text the user
//! prefers, and recalls it with exponential time decay. The cache is bounded
//! and evicts least-recently-observed contexts. The whole model is advisory:
//! malformed contexts degrade to the empty key and absent keys return empty
//! suggestions, never an error.

use std::num::NonZeroUsize;

use ahash::AHashMap;
use tracing::debug;

use crate::node::{KeyValue, Unigram, WalkedNode, READING_SEPARATOR};
use crate::textpos;

pub const DEFAULT_CAPACITY: usize = 500;
/// Six hours. An observation's influence halves every half-life and is
/// treated as zero after roughly twenty of them.
pub const DEFAULT_HALF_LIFE_SECS: f64 = 21_600.0;

const DECAY_FLOOR: f64 = 1.0 / 1_048_576.0;

/// Surface texts that end a clause; a node carrying one can never anchor a
/// context key.
const ENDING_PUNCTUATION: [&str; 8] = ["，", "。", "！", "？", "」", "』", "”", "’"];

#[derive(Debug, Clone, Default)]
struct OverrideRecord {
    count: u64,
    timestamp: f64,
}

/// Accumulated statistics for one context key.
#[derive(Debug, Clone, Default)]
struct Observation {
    count: u64,
    overrides: AHashMap<String, OverrideRecord>,
}

impl Observation {
    fn update(&mut self, candidate: &str, timestamp: f64) {
        self.count += 1;
        let record = self.overrides.entry(candidate.to_string()).or_default();
        record.count += 1;
        record.timestamp = timestamp;
    }
}

/// Capacity-bounded, time-decayed override memory.
pub struct UserOverrideModel {
    cache: lru::LruCache<String, Observation>,
    decay_exponent: f64,
    whitelist: Vec<String>,
}

impl UserOverrideModel {
    pub fn new(capacity: usize, half_life_secs: f64) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        let half_life = if half_life_secs > 0.0 { half_life_secs } else { DEFAULT_HALF_LIFE_SECS };
        Self {
            cache: lru::LruCache::new(capacity),
            decay_exponent: 0.5f64.ln() / half_life,
            whitelist: Vec::new(),
        }
    }

    /// Single characters allowed to anchor a context despite lacking a
    /// previous node, e.g. pronoun homophones.
    pub fn with_whitelist(mut self, whitelist: impl IntoIterator<Item = String>) -> Self {
        self.whitelist = whitelist.into_iter().collect();
        self
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Records that the user chose `candidate` in the context at `cursor`.
    pub fn observe(&mut self, walked: &[WalkedNode], cursor: usize, candidate: &str, timestamp: f64) {
        let key = self.convert_key(walked, cursor, false);
        if key.is_empty() {
            debug!(candidate, "override observation skipped, no usable context");
            return;
        }
        debug!(%key, candidate, "override observed");
        if let Some(observation) = self.cache.get_mut(&key) {
            observation.update(candidate, timestamp);
            return;
        }
        let mut observation = Observation::default();
        observation.update(candidate, timestamp);
        self.cache.push(key, observation);
    }

    /// Suggestions for the context at `cursor`, strictly descending by
    /// decayed score. Reading an entry does not touch its recency.
    pub fn suggest(&self, walked: &[WalkedNode], cursor: usize, timestamp: f64) -> Vec<Unigram> {
        let key = self.convert_key(walked, cursor, false);
        if key.is_empty() {
            return Vec::new();
        }
        let Some(observation) = self.cache.peek(&key) else {
            return Vec::new();
        };
        let reading = self.convert_key(walked, cursor, true);
        let mut suggestions: Vec<Unigram> = Vec::new();
        let mut ceiling = 0.0;
        for (value, record) in &observation.overrides {
            let score = Self::score(
                record.count,
                observation.count,
                record.timestamp,
                timestamp,
                self.decay_exponent,
            );
            // max-dominance filter: only strictly improving scores survive,
            // each new leader goes to the front
            if score <= ceiling {
                continue;
            }
            suggestions.insert(0, Unigram::new(KeyValue::new(reading.clone(), value.clone()), score));
            ceiling = score;
        }
        debug!(%key, count = suggestions.len(), "override suggestions");
        suggestions
    }

    /// Decayed preference score of one override event.
    ///
    /// `decay_exponent` is `ln(0.5) / half_life`; the result is exactly zero
    /// once the decay factor drops below 1/1048576.
    pub fn score(
        event_count: u64,
        total_count: u64,
        event_timestamp: f64,
        timestamp: f64,
        decay_exponent: f64,
    ) -> f64 {
        if total_count == 0 {
            return 0.0;
        }
        let decay = ((timestamp - event_timestamp) * decay_exponent).exp();
        if decay < DECAY_FLOOR {
            return 0.0;
        }
        (event_count as f64 / total_count as f64) * decay
    }

    /// Builds the 3-gram context key for the node window ending at `cursor`.
    ///
    /// Returns the empty string whenever the current node cannot safely
    /// carry an override: punctuation, internal-marker readings, a
    /// reading/visible-character count mismatch, or an unwhitelisted single
    /// character with no previous node.
    fn convert_key(&self, walked: &[WalkedNode], cursor: usize, reading_only: bool) -> String {
        let mut window: Vec<&WalkedNode> = Vec::new();
        let mut accumulated = 0usize;
        for node in walked {
            window.push(node);
            accumulated += node.span_length;
            if accumulated >= cursor {
                break;
            }
        }
        let Some(current) = window.last() else {
            return String::new();
        };
        let pair = &current.current_pair;
        if ENDING_PUNCTUATION.contains(&pair.value.as_str()) || pair.key.contains('_') {
            return String::new();
        }
        let visible = textpos::u8_len(&pair.value);
        if pair.key.split(READING_SEPARATOR).count() != visible {
            return String::new();
        }
        let ngram_at = |back: usize| -> String {
            let kv = window
                .len()
                .checked_sub(1 + back)
                .map(|i| &window[i].current_pair);
            match kv {
                Some(kv)
                    if !kv.value.is_empty()
                        && !kv.key.contains('_')
                        && !ENDING_PUNCTUATION.contains(&kv.value.as_str()) =>
                {
                    format!("({},{})", kv.key, kv.value)
                }
                _ => "()".to_string(),
            }
        };
        let previous = ngram_at(1);
        if visible == 1 && previous == "()" && !self.whitelist.iter().any(|w| w == &pair.value) {
            return String::new();
        }
        if reading_only {
            return pair.key.clone();
        }
        format!("{},{},{}", ngram_at(2), previous, pair.key)
    }
}

impl Default for UserOverrideModel {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_HALF_LIFE_SECS)
    }
}
