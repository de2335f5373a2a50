//! Shared test engines: a pinyin-like composer, a language model over a
//! small fixed lexicon, and a best-path compositor driven by that model.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use libphonabet_core::candidate::{CandidateController, CandidateLayout, CandidateWindow};
use libphonabet_core::dispatch::{ErrorKind, KeyHandler};
use libphonabet_core::engine::{
    Composer, Compositor, KeyHandlerDelegate, LangContext, LanguageModel,
};
use libphonabet_core::node::{KeyValue, Unigram, WalkedNode, READING_SEPARATOR};
use libphonabet_core::signal::InputSignal;
use libphonabet_core::state::InputState;
use libphonabet_core::user_override::UserOverrideModel;
use libphonabet_core::Config;

/// Fixed lexicon keyed by joined readings. Scores are log probabilities.
pub struct SampleLm {
    unigrams: HashMap<&'static str, Vec<(&'static str, f64)>>,
    associated: HashMap<&'static str, Vec<&'static str>>,
}

impl SampleLm {
    pub fn new() -> Self {
        let mut unigrams: HashMap<&'static str, Vec<(&'static str, f64)>> = HashMap::new();
        unigrams.insert("gao1", vec![("高", -7.17), ("膏", -10.0)]);
        unigrams.insert("ke1", vec![("科", -8.0), ("顆", -9.5)]);
        unigrams.insert("ji4", vec![("技", -8.5), ("記", -9.0)]);
        unigrams.insert("ke1-ji4", vec![("科技", -6.74)]);
        unigrams.insert("gao1-ke1-ji4", vec![("高科技", -9.84)]);
        unigrams.insert("gong1", vec![("公", -8.0)]);
        unigrams.insert("si1", vec![("司", -9.0)]);
        unigrams.insert("gong1-si1", vec![("公司", -6.3)]);
        unigrams.insert("de5", vec![("的", -3.7)]);
        unigrams.insert("nian2", vec![("年", -7.5)]);
        unigrams.insert("zhong1", vec![("中", -7.8), ("終", -9.2)]);
        unigrams.insert("nian2-zhong1", vec![("年中", -11.3), ("年終", -11.6)]);
        unigrams.insert("jiang3", vec![("獎", -9.0)]);
        unigrams.insert("jin1", vec![("金", -8.0)]);
        unigrams.insert("jiang3-jin1", vec![("獎金", -10.9)]);
        unigrams.insert("ni3", vec![("你", -6.0)]);
        unigrams.insert("hao3", vec![("好", -6.3)]);
        unigrams.insert("ni3-hao3", vec![("你好", -5.5)]);
        unigrams.insert("_punctuation_,", vec![("，", -9.9)]);
        unigrams.insert("_punctuation_list", vec![("…", -9.0), ("—", -9.5)]);
        // contraction: two readings, one visible character
        unigrams.insert("qian1", vec![("千", -8.0)]);
        unigrams.insert("wa3", vec![("瓦", -8.5)]);
        unigrams.insert("qian1-wa3", vec![("瓩", -7.0)]);
        let mut associated = HashMap::new();
        associated.insert("技", vec!["術", "師"]);
        Self { unigrams, associated }
    }
}

impl LanguageModel for SampleLm {
    fn unigrams_for(&self, key: &str) -> Vec<Unigram> {
        self.unigrams
            .get(key)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(value, score)| Unigram::new(KeyValue::new(key, *value), *score))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn associated_phrases_for(&self, key: &str) -> Vec<String> {
        self.associated
            .get(key)
            .map(|phrases| phrases.iter().map(|p| (*p).to_string()).collect())
            .unwrap_or_default()
    }
}

/// Lowercase letters spell the syllable, digits 1 through 5 end it with a
/// tone. Space reads as the neutral tone.
#[derive(Default)]
pub struct RomajiComposer {
    buffer: String,
}

impl Composer for RomajiComposer {
    fn input_validity_check(&self, ch: char) -> bool {
        ch.is_ascii_lowercase() || ('1'..='5').contains(&ch)
    }

    fn receive_key(&mut self, ch: char) {
        if ch == ' ' {
            self.buffer.push('5');
        } else {
            self.buffer.push(ch);
        }
    }

    fn has_tone_marker(&self, strict: bool) -> bool {
        let ends_with_tone = self.buffer.chars().last().map_or(false, |c| c.is_ascii_digit());
        if strict {
            self.buffer.chars().count() == 1 && ends_with_tone
        } else {
            ends_with_tone
        }
    }

    fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn do_backspace(&mut self) {
        self.buffer.pop();
    }

    fn get_composition(&self) -> String {
        self.buffer.clone()
    }

    fn get_inline_display(&self, _use_alt_romanization: bool) -> String {
        self.buffer.clone()
    }
}

const MAX_SPAN: usize = 6;
const FALLBACK_SCORE: f64 = -20.0;

#[derive(Clone)]
struct Override {
    start: usize,
    span: usize,
    pair: KeyValue,
    score: f64,
}

/// Best-path compositor over the sample lexicon. Spans up to six readings;
/// a reading no span covers resolves to itself at a penalty score.
pub struct ChainCompositor {
    lm: Arc<dyn LanguageModel>,
    readings: Vec<String>,
    cursor: usize,
    overrides: Vec<Override>,
}

impl ChainCompositor {
    pub fn new(lm: Arc<dyn LanguageModel>) -> Self {
        Self { lm, readings: Vec::new(), cursor: 0, overrides: Vec::new() }
    }

    fn key_of(&self, start: usize, span: usize) -> String {
        self.readings[start..start + span].join(READING_SEPARATOR)
    }

    fn node_at(&self, start: usize, span: usize) -> Option<WalkedNode> {
        let key = self.key_of(start, span);
        let mut candidates = self.lm.unigrams_for(&key);
        if candidates.is_empty() {
            if span != 1 {
                return None;
            }
            candidates = vec![Unigram::new(KeyValue::new(key.clone(), key.clone()), FALLBACK_SCORE)];
        }
        let override_entry = self
            .overrides
            .iter()
            .find(|o| o.start == start && o.span == span);
        let (current_pair, score) = match override_entry {
            Some(o) => (o.pair.clone(), o.score),
            None => {
                let best = candidates
                    .iter()
                    .max_by(|a, b| a.score.total_cmp(&b.score))
                    .cloned()?;
                (best.key_value, best.score)
            }
        };
        Some(WalkedNode::new(span, current_pair, score, candidates))
    }

    fn drop_overrides_covering(&mut self, index: usize) {
        self.overrides
            .retain(|o| !(o.start <= index && index < o.start + o.span));
        for o in &mut self.overrides {
            if o.start > index {
                o.start -= 1;
            }
        }
    }
}

impl Compositor for ChainCompositor {
    fn insert_reading(&mut self, reading: &str) {
        let at = self.cursor;
        self.overrides
            .retain(|o| o.start + o.span <= at || o.start >= at);
        for o in &mut self.overrides {
            if o.start >= at {
                o.start += 1;
            }
        }
        self.readings.insert(at, reading.to_string());
        self.cursor += 1;
    }

    fn remove_head_readings(&mut self, n: usize) {
        let n = n.min(self.readings.len());
        self.readings.drain(0..n);
        self.cursor = self.cursor.saturating_sub(n);
        self.overrides.retain(|o| o.start >= n);
        for o in &mut self.overrides {
            o.start -= n;
        }
    }

    fn delete_reading_at_rear_of_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let index = self.cursor - 1;
        self.readings.remove(index);
        self.cursor -= 1;
        self.drop_overrides_covering(index);
        true
    }

    fn delete_reading_at_front_of_cursor(&mut self) -> bool {
        if self.cursor >= self.readings.len() {
            return false;
        }
        let index = self.cursor;
        self.readings.remove(index);
        self.drop_overrides_covering(index);
        true
    }

    fn walk(&mut self) -> Vec<WalkedNode> {
        let n = self.readings.len();
        if n == 0 {
            return Vec::new();
        }
        // best[i] is the best total score of readings[i..]
        let mut best = vec![f64::NEG_INFINITY; n + 1];
        let mut choice = vec![0usize; n];
        best[n] = 0.0;
        for start in (0..n).rev() {
            for span in 1..=MAX_SPAN.min(n - start) {
                let Some(node) = self.node_at(start, span) else {
                    continue;
                };
                let total = node.score + best[start + span];
                if total > best[start] {
                    best[start] = total;
                    choice[start] = span;
                }
            }
        }
        let mut nodes = Vec::new();
        let mut position = 0usize;
        while position < n {
            let span = choice[position].max(1);
            if let Some(node) = self.node_at(position, span) {
                nodes.push(node);
            }
            position += span;
        }
        nodes
    }

    fn readings(&self) -> Vec<String> {
        self.readings.clone()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.readings.len());
    }

    fn length(&self) -> usize {
        self.readings.len()
    }

    fn width(&self) -> usize {
        self.readings.len()
    }

    fn clear(&mut self) {
        self.readings.clear();
        self.overrides.clear();
        self.cursor = 0;
    }

    fn fix_node_with_candidate(&mut self, pair: &KeyValue, at: usize) -> Option<WalkedNode> {
        let n = self.readings.len();
        for start in 0..n {
            for span in 1..=MAX_SPAN.min(n - start) {
                if !(start < at && at <= start + span) {
                    continue;
                }
                if self.key_of(start, span) != pair.key {
                    continue;
                }
                let node = self.node_at(start, span)?;
                self.overrides.retain(|o| {
                    o.start + o.span <= start || o.start >= start + span
                });
                self.overrides.push(Override {
                    start,
                    span,
                    pair: pair.clone(),
                    score: libphonabet_core::node::SELECTED_CANDIDATE_SCORE,
                });
                return Some(WalkedNode::new(span, pair.clone(), node.score, node.candidates));
            }
        }
        None
    }

    fn override_node_score_for_selected_candidate(&mut self, at: usize, value: &str, score: f64) {
        let n = self.readings.len();
        for start in 0..n {
            for span in 1..=MAX_SPAN.min(n - start) {
                if !(start < at && at <= start + span) {
                    continue;
                }
                let key = self.key_of(start, span);
                let offered = self
                    .lm
                    .unigrams_for(&key)
                    .iter()
                    .any(|u| u.key_value.value == value);
                if !offered {
                    continue;
                }
                self.overrides.retain(|o| {
                    o.start + o.span <= start || o.start >= start + span
                });
                self.overrides.push(Override {
                    start,
                    span,
                    pair: KeyValue::new(key, value),
                    score,
                });
                return;
            }
        }
    }

    fn nodes_ending_at(&self, index: usize) -> Vec<WalkedNode> {
        let mut nodes = Vec::new();
        for span in 1..=MAX_SPAN.min(index) {
            let start = index - span;
            if let Some(node) = self.node_at(start, span) {
                nodes.push(node);
            }
        }
        nodes
    }

    fn nodes_beginning_at(&self, index: usize) -> Vec<WalkedNode> {
        let n = self.readings.len();
        let mut nodes = Vec::new();
        if index >= n {
            return nodes;
        }
        for span in 1..=MAX_SPAN.min(n - index) {
            if let Some(node) = self.node_at(index, span) {
                nodes.push(node);
            }
        }
        nodes
    }
}

pub struct TestDelegate {
    window: CandidateWindow,
    accept_user_phrases: bool,
    written: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl KeyHandlerDelegate for TestDelegate {
    fn candidate_controller(&mut self) -> &mut dyn CandidateController {
        &mut self.window
    }

    fn did_request_write_user_phrase(&mut self, marked_text: &str, readings: &[String]) -> bool {
        if !self.accept_user_phrases {
            return false;
        }
        self.written
            .lock()
            .map(|mut w| w.push((marked_text.to_string(), readings.to_vec())))
            .is_ok()
    }
}

pub type Handler = KeyHandler<RomajiComposer, ChainCompositor>;

/// A handler plus the running state a platform layer would keep between key
/// events. `Committing` payloads and `Inputting` overflow land in
/// `committed`; every other emitted state replaces `state`.
pub struct Session {
    pub handler: Handler,
    pub state: InputState,
    pub committed: Vec<String>,
    pub errors: Vec<ErrorKind>,
    pub written_phrases: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_accepting_delegate(config, true)
    }

    pub fn with_accepting_delegate(config: Config, accept_user_phrases: bool) -> Self {
        let lm: Arc<dyn LanguageModel> = Arc::new(SampleLm::new());
        let ctx = LangContext::new(Arc::clone(&lm), UserOverrideModel::default());
        let mut handler =
            KeyHandler::new(RomajiComposer::default(), ChainCompositor::new(lm), ctx, config);
        let written = Arc::new(Mutex::new(Vec::new()));
        handler.set_delegate(Box::new(TestDelegate {
            window: CandidateWindow::new(CandidateLayout::Horizontal),
            accept_user_phrases,
            written: Arc::clone(&written),
        }));
        Self {
            handler,
            state: InputState::Empty,
            committed: Vec::new(),
            errors: Vec::new(),
            written_phrases: written,
        }
    }

    pub fn send(&mut self, input: &InputSignal) -> bool {
        let mut states = Vec::new();
        let mut errors = Vec::new();
        let consumed = {
            let mut on_state = |s: InputState| states.push(s);
            let mut on_error = |e: ErrorKind| errors.push(e);
            self.handler.handle(input, &self.state.clone(), &mut on_state, &mut on_error)
        };
        self.errors.extend(errors);
        for next in states {
            match next {
                InputState::Committing { text_to_commit } => self.committed.push(text_to_commit),
                other => {
                    if let InputState::Inputting { text_to_commit, .. } = &other {
                        if !text_to_commit.is_empty() {
                            self.committed.push(text_to_commit.clone());
                        }
                    }
                    self.state = other;
                }
            }
        }
        consumed
    }

    pub fn type_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.send(&InputSignal::from_char(ch));
        }
    }

    pub fn composing_buffer(&self) -> &str {
        self.state.composing_buffer()
    }
}
