//! Collaborator contracts.
//!
//! The dispatcher consumes the phonetic composer, the grid compositor, and
//! the language model through these traits; concrete engines live outside
//! this crate. `LangContext` bundles the per-language-mode models that the
//! dispatcher needs, replacing any process-wide singletons: switching
//! language mode means constructing a new `KeyHandler` around the other
//! mode's context.

use std::sync::Arc;

use crate::candidate::CandidateController;
use crate::node::{KeyValue, Unigram, WalkedNode};
use crate::user_override::UserOverrideModel;
use crate::Config;

/// Assembles raw key presses into one phonetic syllable.
pub trait Composer {
    /// Whether the composer would accept this key at all.
    fn input_validity_check(&self, ch: char) -> bool;
    fn receive_key(&mut self, ch: char);
    /// `strict` restricts the check to a composition that is nothing but a
    /// tone marker.
    fn has_tone_marker(&self, strict: bool) -> bool;
    fn is_empty(&self) -> bool;
    fn clear(&mut self);
    fn do_backspace(&mut self);
    /// The finished reading key used to index the language model.
    fn get_composition(&self) -> String;
    /// The in-progress composition as shown inline in the buffer.
    fn get_inline_display(&self, use_alt_romanization: bool) -> String;
}

/// The segmentation grid over inserted readings.
///
/// `cursor`, `length`, and `width` are in reading units; `width` can exceed
/// `length` when nodes span several readings.
pub trait Compositor {
    fn insert_reading(&mut self, reading: &str);
    /// Drops the oldest `n` readings, shifting everything left.
    fn remove_head_readings(&mut self, n: usize);
    /// Removes the reading behind the cursor. False when at column 0.
    fn delete_reading_at_rear_of_cursor(&mut self) -> bool;
    /// Removes the reading ahead of the cursor. False when at the end.
    fn delete_reading_at_front_of_cursor(&mut self) -> bool;
    /// Re-runs segmentation and returns the resolved node sequence.
    fn walk(&mut self) -> Vec<WalkedNode>;
    fn readings(&self) -> Vec<String>;
    fn cursor(&self) -> usize;
    fn set_cursor(&mut self, cursor: usize);
    fn length(&self) -> usize;
    fn width(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.length() == 0
    }
    fn clear(&mut self);
    /// Forces the node covering `at` to the given candidate, marking it
    /// selected. Returns the fixed node, or `None` when no span at `at`
    /// offers that candidate.
    fn fix_node_with_candidate(&mut self, pair: &KeyValue, at: usize) -> Option<WalkedNode>;
    /// Raises one candidate's score at `at` without marking the node as
    /// manually selected.
    fn override_node_score_for_selected_candidate(&mut self, at: usize, value: &str, score: f64);
    fn nodes_ending_at(&self, index: usize) -> Vec<WalkedNode>;
    fn nodes_beginning_at(&self, index: usize) -> Vec<WalkedNode>;
}

/// Merged read-only view of the language model data.
pub trait LanguageModel {
    fn unigrams_for(&self, key: &str) -> Vec<Unigram>;
    fn has_unigrams_for(&self, key: &str) -> bool {
        !self.unigrams_for(key).is_empty()
    }
    fn associated_phrases_for(&self, key: &str) -> Vec<String>;
    fn has_associated_phrases_for(&self, key: &str) -> bool {
        !self.associated_phrases_for(key).is_empty()
    }
}

/// Host-side services the dispatcher calls back into.
pub trait KeyHandlerDelegate {
    /// The active candidate window controller.
    fn candidate_controller(&mut self) -> &mut dyn CandidateController;
    /// Asked when the user confirms a `Marking` range. Returns whether the
    /// host accepted the phrase.
    fn did_request_write_user_phrase(&mut self, marked_text: &str, readings: &[String]) -> bool;
}

/// Per-language-mode model bundle.
pub struct LangContext {
    pub language_model: Arc<dyn LanguageModel>,
    pub override_model: UserOverrideModel,
}

impl LangContext {
    pub fn new(language_model: Arc<dyn LanguageModel>, override_model: UserOverrideModel) -> Self {
        Self { language_model, override_model }
    }

    /// Context with an override model sized per the configuration.
    pub fn from_config(language_model: Arc<dyn LanguageModel>, config: &Config) -> Self {
        let override_model =
            UserOverrideModel::new(config.override_capacity, config.override_half_life_secs)
                .with_whitelist(config.single_kanji_context_whitelist.iter().cloned());
        Self::new(language_model, override_model)
    }
}
