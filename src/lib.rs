//! libphonabet-core
//!
//! Decision core of a phonetic (Zhuyin/Pinyin) Chinese input method. Two
//! tightly coupled subsystems live here:
//!
//! - the **key-dispatch state machine** ([`KeyHandler`]): interprets raw key
//!   signals against the current [`InputState`] and produces the next state
//!   plus any text to commit;
//! - the **user-override model** ([`UserOverrideModel`]): a capacity-bounded,
//!   time-decayed memory of which candidate the user prefers in a given
//!   3-gram context, used to re-rank future candidates.
//!
//! The phonetic composer, the grid compositor (Viterbi-style segmentation),
//! and the language model are external collaborators consumed through the
//! traits in [`engine`]. The core performs no I/O and is single-threaded:
//! one key event is fully processed before the next is accepted.
//!
//! ```no_run
//! use libphonabet_core::Config;
//!
//! let config = Config::load_toml("phonabet.toml").unwrap_or_default();
//! assert!(config.composing_buffer_size > 0);
//! ```

pub mod candidate;
pub mod dispatch;
pub mod engine;
pub mod node;
pub mod signal;
pub mod state;
pub mod textpos;
pub mod user_override;

pub use candidate::{CandidateController, CandidateLayout, CandidateWindow};
pub use dispatch::{ErrorKind, KeyHandler};
pub use engine::{Composer, Compositor, KeyHandlerDelegate, LangContext, LanguageModel};
pub use node::{KeyValue, Unigram, WalkedNode, READING_SEPARATOR, SELECTED_CANDIDATE_SCORE};
pub use signal::{InputSignal, KeyCode, Modifiers};
pub use state::{InputState, MarkingData, NotEmptyData, SymbolNode};
pub use user_override::UserOverrideModel;

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Engine preferences.
///
/// Plain data, serializable to TOML. Every field has a sensible default so
/// partial configuration files work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reading-width limit of the composition; the oldest resolved node is
    /// committed once the grid grows past it.
    pub composing_buffer_size: usize,
    /// Longest marked range accepted as a user phrase.
    pub max_candidate_length: usize,
    /// Allows single-character user phrases (lowers the minimum marked
    /// length from 2 to 1).
    pub allow_boosting_single_kanji_as_user_phrase: bool,
    /// Candidate window anchors on the node behind the cursor instead of
    /// the node ahead of it.
    pub use_rear_cursor_mode: bool,
    /// Single-syllable-per-candidate mode: every syllable immediately opens
    /// (or auto-resolves) its own candidate choice.
    pub use_scpc_typing_mode: bool,
    /// Push the cursor past a candidate after manually selecting it.
    pub move_cursor_after_selecting_candidate: bool,
    /// Consult the override model when walking and when listing candidates.
    pub fetch_suggestions_from_user_override_model: bool,
    /// Keep the raw candidate order in the selection window, skipping
    /// suggestion re-ranking.
    pub use_fixed_candidate_order_on_selection: bool,
    /// In the candidate window: false = Tab pages, Shift+Tab pages back;
    /// true = Tab steps the highlight instead.
    pub specify_shift_tab_key_behavior: bool,
    /// In the candidate window: true = Space pages and Shift+Space steps
    /// the highlight; false = the reverse.
    pub specify_shift_space_key_behavior: bool,
    /// Space opens the candidate window (otherwise it commits the buffer
    /// when the cursor sits at the end).
    pub choose_candidate_using_space: bool,
    /// Esc drops the whole composition instead of only the pending syllable.
    pub esc_to_clear_input_buffer: bool,
    /// Look up half-width punctuation keys.
    pub half_width_punctuation_enabled: bool,
    /// Show the in-progress syllable romanized instead of as phonabets.
    pub show_romanization_in_composition_buffer: bool,
    /// Ctrl+Cmd+Enter dumps readings romanized instead of as phonabets.
    pub inline_dump_pinyin_in_lieu_of_zhuyin: bool,
    /// Chain an associated-phrase window after commits.
    pub associated_phrases_enabled: bool,
    /// Phonetic-layout name used as the punctuation synthetic-key prefix.
    pub keyboard_parser: String,
    /// Candidate selection key labels.
    pub candidate_keys: Vec<String>,
    /// Override cache capacity, in distinct contexts.
    pub override_capacity: usize,
    /// Override decay half-life, in seconds.
    pub override_half_life_secs: f64,
    /// Single characters allowed to anchor an override context without a
    /// previous node.
    pub single_kanji_context_whitelist: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            composing_buffer_size: 20,
            max_candidate_length: 10,
            allow_boosting_single_kanji_as_user_phrase: false,
            use_rear_cursor_mode: false,
            use_scpc_typing_mode: false,
            move_cursor_after_selecting_candidate: true,
            fetch_suggestions_from_user_override_model: true,
            use_fixed_candidate_order_on_selection: false,
            specify_shift_tab_key_behavior: false,
            specify_shift_space_key_behavior: true,
            choose_candidate_using_space: true,
            esc_to_clear_input_buffer: true,
            half_width_punctuation_enabled: false,
            show_romanization_in_composition_buffer: false,
            inline_dump_pinyin_in_lieu_of_zhuyin: false,
            associated_phrases_enabled: false,
            keyboard_parser: "Standard".to_string(),
            candidate_keys: (1..=9).map(|n| n.to_string()).collect(),
            override_capacity: user_override::DEFAULT_CAPACITY,
            override_half_life_secs: user_override::DEFAULT_HALF_LIFE_SECS,
            single_kanji_context_whitelist: ["你", "妳", "他", "她", "它", "牠", "祂"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Saves configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Shortest marked range accepted as a user phrase.
    pub fn min_candidate_length(&self) -> usize {
        if self.allow_boosting_single_kanji_as_user_phrase { 1 } else { 2 }
    }

    /// Prefix inserted into layout-specific punctuation keys, e.g.
    /// `"Standard_"`.
    pub fn punctuation_parser_prefix(&self) -> String {
        format!("{}_", self.keyboard_parser)
    }
}
