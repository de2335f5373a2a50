//! Phonetic composition: feeding keys to the composer and turning finished
//! syllables into grid readings.

use tracing::debug;

use crate::engine::{Composer, Compositor};
use crate::signal::InputSignal;
use crate::state::InputState;

use super::{ErrorKind, KeyHandler};

impl<C: Composer, P: Compositor> KeyHandler<C, P> {
    /// Attempts to treat the key as part of a phonetic syllable.
    ///
    /// `None` means the key is unrelated to composition and dispatch should
    /// continue; `Some(consumed)` terminates the call.
    pub(crate) fn handle_composition(
        &mut self,
        input: &InputSignal,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> Option<bool> {
        let skip_phonetic_handling = input.is_reserved_key()
            || input.is_numeric_pad()
            || input.is_control_hold()
            || input.is_alt_hold()
            || input.is_shift_hold()
            || input.is_command_hold();
        let mut key_consumed_by_reading = false;
        if !skip_phonetic_handling {
            if let Some(ch) = input.the_char() {
                if self.composer.input_validity_check(ch) {
                    self.composer.receive_key(ch);
                    key_consumed_by_reading = true;
                    if !self.composer.has_tone_marker(false) {
                        let inputting = self.build_inputting_state(String::new());
                        state_callback(inputting);
                        return Some(true);
                    }
                }
            }
        }

        let mut compose_reading = self.composer.has_tone_marker(false);
        if !self.composer.is_empty() && (input.is_space() || input.is_enter()) {
            compose_reading = true;
        }
        if compose_reading {
            // Space on a toneless syllable reads as the neutral tone.
            if input.is_space() && !self.composer.has_tone_marker(false) {
                self.composer.receive_key(' ');
            }
            let reading = self.composer.get_composition();
            if !self.ctx.language_model.has_unigrams_for(&reading) {
                debug!(%reading, "language model has no unigrams for reading");
                error_callback(ErrorKind::Normal);
                self.composer.clear();
                let next = if self.compositor.is_empty() {
                    InputState::EmptyDiscardingPrevious
                } else {
                    self.build_inputting_state(String::new())
                };
                state_callback(next);
                return Some(true);
            }

            self.compositor.insert_reading(&reading);
            let text_to_commit = self.commit_overflown_composition_and_walk();
            self.fetch_and_apply_suggestions();
            self.mark_nodes_fixed_if_necessary();
            self.composer.clear();

            let inputting = self.build_inputting_state(text_to_commit);
            let data = inputting.not_empty_data().cloned().unwrap_or_default();
            state_callback(inputting);

            if self.config.use_scpc_typing_mode {
                let choosing =
                    self.build_choosing_candidate_state(data, input.is_typing_vertical());
                let candidates = choosing.candidates().to_vec();
                if candidates.len() == 1 {
                    self.clear();
                    let text = candidates[0].value.clone();
                    state_callback(InputState::Committing { text_to_commit: text.clone() });
                    let follow_up = self
                        .config
                        .associated_phrases_enabled
                        .then(|| self.build_associated_phrases_state(&text, input.is_typing_vertical()))
                        .flatten();
                    state_callback(follow_up.unwrap_or(InputState::Empty));
                } else {
                    state_callback(choosing);
                }
            }
            return Some(true);
        }

        if key_consumed_by_reading {
            let inputting = self.build_inputting_state(String::new());
            state_callback(inputting);
            return Some(true);
        }
        None
    }

    /// Associated-phrase state keyed on the last visible character of the
    /// committed text, if the language model knows any follow-ups.
    pub(crate) fn build_associated_phrases_state(
        &mut self,
        committed: &str,
        is_typing_vertical: bool,
    ) -> Option<InputState> {
        let key: String = crate::textpos::u8_elements(committed).last()?.to_string();
        let phrases = self.ctx.language_model.associated_phrases_for(&key);
        if phrases.is_empty() {
            return None;
        }
        let candidates: Vec<crate::node::KeyValue> = phrases
            .into_iter()
            .map(|p| crate::node::KeyValue::new("", p))
            .collect();
        if let Some(ctl) = self.ctl() {
            ctl.reload(candidates.len());
        }
        Some(InputState::AssociatedPhrases {
            candidates,
            selected: crate::node::KeyValue::new("", key),
            is_typing_vertical,
        })
    }
}
