//! Key-dispatch state machine.
//!
//! [`KeyHandler::handle`] is the single authoritative entry point: it takes
//! the current state and one input signal, drives the composer, compositor,
//! and override model, and always resolves to a state and/or error callback
//! plus a consumed flag. Submodules carry the mode-specific handlers:
//! composition, the candidate window, marking, and the state builders.

mod candidate;
mod composition;
mod input;
mod states;

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::candidate::CandidateController;
use crate::engine::{Composer, Compositor, KeyHandlerDelegate, LangContext};
use crate::node::{KeyValue, WalkedNode, SELECTED_CANDIDATE_SCORE};
use crate::textpos;
use crate::Config;

/// Score margin by which an override suggestion outbids the raw candidates.
const OVERRIDE_SCORE_EPSILON: f64 = 1e-6;

/// Error categories delivered through the error callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// User input rejected or an operation out of range; recoverable by the
    /// next keystroke.
    Normal,
    /// A request that cannot correspond to any engine state, e.g. candidate
    /// confirmation without a backing anchor.
    Structural,
}

/// The key-dispatch state machine.
///
/// Owns the live composer and compositor; both are rebuilt wholesale on a
/// language-mode switch by constructing a new handler around the other
/// mode's [`LangContext`].
pub struct KeyHandler<C: Composer, P: Compositor> {
    pub(crate) composer: C,
    pub(crate) compositor: P,
    pub(crate) ctx: LangContext,
    pub(crate) config: Config,
    pub(crate) walked: Vec<WalkedNode>,
    pub(crate) delegate: Option<Box<dyn KeyHandlerDelegate>>,
    /// Nesting level of the SCPC auto-select replay; bounded at one.
    pub(crate) replay_depth: u8,
}

impl<C: Composer, P: Compositor> KeyHandler<C, P> {
    pub fn new(composer: C, compositor: P, ctx: LangContext, config: Config) -> Self {
        Self {
            composer,
            compositor,
            ctx,
            config,
            walked: Vec::new(),
            delegate: None,
            replay_depth: 0,
        }
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn KeyHandlerDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn context(&self) -> &LangContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut LangContext {
        &mut self.ctx
    }

    /// Drops the pending syllable, the grid, and the walked nodes.
    pub fn clear(&mut self) {
        self.composer.clear();
        self.compositor.clear();
        self.walked.clear();
    }

    pub(crate) fn now() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    pub(crate) fn walk(&mut self) {
        self.walked = self.compositor.walk();
    }

    pub(crate) fn ctl(&mut self) -> Option<&mut dyn CandidateController> {
        self.delegate.as_deref_mut().map(|d| d.candidate_controller())
    }

    /// The reading position the candidate window anchors on: the node
    /// behind the cursor in rear-cursor mode, ahead of it otherwise.
    pub(crate) fn actual_candidate_cursor_index(&self) -> usize {
        let cursor = self.compositor.cursor();
        if self.config.use_rear_cursor_mode {
            cursor.min(self.compositor.length().saturating_sub(1))
        } else {
            cursor.max(1)
        }
    }

    fn fix_node_location(&self) -> usize {
        let shift = usize::from(self.config.use_rear_cursor_mode);
        (self.actual_candidate_cursor_index() + shift).min(self.compositor.length())
    }

    /// Candidates at the current cursor: anchors sorted by descending span
    /// so multi-character candidates come first, flattened in each anchor's
    /// own order, then optionally re-ranked by the override model.
    pub(crate) fn candidates_array(&mut self, fixed_order: bool) -> Vec<KeyValue> {
        let location = self.actual_candidate_cursor_index();
        let mut anchors = if self.config.use_rear_cursor_mode {
            self.compositor.nodes_beginning_at(location)
        } else {
            self.compositor.nodes_ending_at(location)
        };
        anchors.sort_by(|a, b| b.span_length.cmp(&a.span_length));
        let mut raw: Vec<KeyValue> = Vec::new();
        for anchor in &anchors {
            for unigram in &anchor.candidates {
                if !raw.contains(&unigram.key_value) {
                    raw.push(unigram.key_value.clone());
                }
            }
        }
        if fixed_order
            || self.config.use_scpc_typing_mode
            || !self.config.fetch_suggestions_from_user_override_model
        {
            return raw;
        }
        let suggested =
            self.ctx
                .override_model
                .suggest(&self.walked, self.compositor.cursor(), Self::now());
        if suggested.is_empty() {
            return raw;
        }
        let mut merged: Vec<KeyValue> = Vec::new();
        for unigram in suggested {
            if !merged.contains(&unigram.key_value) {
                merged.push(unigram.key_value);
            }
        }
        for pair in raw {
            if !merged.contains(&pair) {
                merged.push(pair);
            }
        }
        merged.sort_by(|a, b| textpos::u8_len(&b.value).cmp(&textpos::u8_len(&a.value)));
        merged
    }

    /// Applies a manual candidate choice: fixes the node, lets the override
    /// model observe it, re-walks, and optionally pushes the cursor past the
    /// fixed anchor. Returns false when no anchor offers the candidate.
    pub(crate) fn fix_node(&mut self, pair: &KeyValue, respect_cursor_pushing: bool) -> bool {
        let location = self.fix_node_location();
        let Some(selected) = self.compositor.fix_node_with_candidate(pair, location) else {
            debug!(?pair, location, "fix node failed, no backing anchor");
            return false;
        };
        if !self.config.use_scpc_typing_mode {
            // a span/character mismatch or a deeply penalized symbol entry
            // cannot safely feed the override model
            let attributable = selected.span_length == textpos::u8_len(&pair.value)
                && selected.score_for(&pair.value).map_or(true, |s| s > -12.0);
            if attributable {
                self.ctx
                    .override_model
                    .observe(&self.walked, location, &pair.value, Self::now());
            }
        }
        self.walk();
        if respect_cursor_pushing && self.config.move_cursor_after_selecting_candidate {
            let mut next_position = 0usize;
            for node in &self.walked {
                if next_position >= location {
                    break;
                }
                next_position += node.span_length;
            }
            if next_position <= self.compositor.length() {
                self.compositor.set_cursor(next_position);
            }
        }
        true
    }

    /// Commits the oldest resolved node once the grid outgrows the buffer
    /// limit, then re-walks. Returns the evicted text, possibly empty.
    pub(crate) fn commit_overflown_composition_and_walk(&mut self) -> String {
        let mut text_to_commit = String::new();
        if self.compositor.width() > self.config.composing_buffer_size {
            if let Some(head) = self.walked.first().cloned() {
                text_to_commit = head.current_pair.value.clone();
                self.compositor.remove_head_readings(head.span_length);
            }
        }
        self.walk();
        text_to_commit
    }

    /// Freezes nodes that fell behind the re-walk window at their current
    /// value, bounding future segmentation cost.
    pub(crate) fn mark_nodes_fixed_if_necessary(&mut self) {
        let window = (self.config.composing_buffer_size / 2).max(12);
        let width = self.compositor.width();
        if width <= window {
            return;
        }
        let frozen_zone = width - window;
        let mut position = 0usize;
        let mut changed = false;
        for node in self.walked.clone() {
            let end = position + node.span_length;
            if end > frozen_zone {
                break;
            }
            if node.score < SELECTED_CANDIDATE_SCORE {
                let _ = self.compositor.fix_node_with_candidate(&node.current_pair, end);
                changed = true;
            }
            position = end;
        }
        if changed {
            self.walk();
        }
    }

    /// Lets the override model promote its preferred candidate for the node
    /// at the cursor, then re-walks so the promotion takes effect.
    pub(crate) fn fetch_and_apply_suggestions(&mut self) {
        if self.config.use_scpc_typing_mode
            || !self.config.fetch_suggestions_from_user_override_model
        {
            return;
        }
        let suggestions =
            self.ctx
                .override_model
                .suggest(&self.walked, self.compositor.cursor(), Self::now());
        let Some(top) = suggestions.first() else {
            return;
        };
        let location = self.fix_node_location();
        let score = self.find_highest_unigram_score_at(location) + OVERRIDE_SCORE_EPSILON;
        debug!(value = %top.key_value.value, location, score, "applying override suggestion");
        self.compositor
            .override_node_score_for_selected_candidate(location, &top.key_value.value, score);
        self.walk();
    }

    /// Highest raw candidate score among anchors ending at `location`,
    /// never below zero.
    fn find_highest_unigram_score_at(&self, location: usize) -> f64 {
        self.compositor
            .nodes_ending_at(location)
            .iter()
            .map(WalkedNode::highest_unigram_score)
            .fold(0.0, f64::max)
    }
}
