//! State builders and the remaining single-purpose key handlers: cursor
//! movement, marking, Esc, the Enter variants, Backspace/Delete, the symbol
//! menu, punctuation, and inline candidate rotation.

use tracing::debug;

use crate::engine::{Composer, Compositor};
use crate::node::{KeyValue, SELECTED_CANDIDATE_SCORE};
use crate::signal::InputSignal;
use crate::state::{InputState, MarkingData, NotEmptyData, SymbolNode};
use crate::textpos;

use super::{ErrorKind, KeyHandler};

/// Phonabet to ASCII, tone marks to digits. Keys containing an underscore
/// are IME-internal and never convert.
const PHONABET_TO_ASCII: [(&str, &str); 41] = [
    ("ㄅ", "b"), ("ㄆ", "p"), ("ㄇ", "m"), ("ㄈ", "f"), ("ㄉ", "d"),
    ("ㄊ", "t"), ("ㄋ", "n"), ("ㄌ", "l"), ("ㄍ", "g"), ("ㄎ", "k"),
    ("ㄏ", "h"), ("ㄐ", "j"), ("ㄑ", "q"), ("ㄒ", "x"), ("ㄓ", "Z"),
    ("ㄔ", "C"), ("ㄕ", "S"), ("ㄖ", "r"), ("ㄗ", "z"), ("ㄘ", "c"),
    ("ㄙ", "s"), ("ㄧ", "i"), ("ㄨ", "u"), ("ㄩ", "v"), ("ㄚ", "a"),
    ("ㄛ", "o"), ("ㄜ", "e"), ("ㄝ", "E"), ("ㄞ", "B"), ("ㄟ", "P"),
    ("ㄠ", "M"), ("ㄡ", "F"), ("ㄢ", "D"), ("ㄣ", "T"), ("ㄤ", "N"),
    ("ㄥ", "L"), ("ㄦ", "R"), ("ˊ", "2"), ("ˇ", "3"), ("ˋ", "4"),
    ("˙", "5"),
];

const TONE_MARKS: [char; 4] = ['ˊ', 'ˇ', 'ˋ', '˙'];

/// Replaces phonabets and tone marks with their ASCII spellings. Internal
/// marker keys come back empty.
pub(crate) fn cnv_phonabet_to_ascii(incoming: &str) -> String {
    if incoming.contains('_') {
        return String::new();
    }
    let mut out = incoming.to_string();
    for (phonabet, ascii) in PHONABET_TO_ASCII {
        out = out.replace(phonabet, ascii);
    }
    out
}

/// Textbook form of a zhuyin key: the neutral-tone mark moves to the front
/// of each syllable.
pub(crate) fn cnv_zhuyin_key_to_textbook_reading(key: &str, new_separator: &str) -> String {
    key.split(crate::node::READING_SEPARATOR)
        .map(|segment| {
            if let Some(stripped) = segment.strip_suffix('˙') {
                format!("˙{stripped}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(new_separator)
}

/// Reading annotation for one ruby segment: textbook phonabets, or the
/// romanized spelling when the romanization preference is on.
pub(crate) fn ruby_reading(key: &str, romanized: bool) -> String {
    if romanized {
        let restored = restore_tone_one_in_zhuyin_key(key, crate::node::READING_SEPARATOR);
        cnv_phonabet_to_ascii(&restored).replace(crate::node::READING_SEPARATOR, " ")
    } else {
        cnv_zhuyin_key_to_textbook_reading(key, " ")
    }
}

/// Appends the implicit first tone to syllables without any tone mark.
pub(crate) fn restore_tone_one_in_zhuyin_key(key: &str, separator: &str) -> String {
    key.split(separator)
        .map(|segment| {
            let has_tone = segment.chars().any(|c| TONE_MARKS.contains(&c))
                || segment.chars().last().map_or(false, |c| c.is_ascii_digit());
            if has_tone || segment.is_empty() {
                segment.to_string()
            } else {
                format!("{segment}1")
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

impl<C: Composer, P: Compositor> KeyHandler<C, P> {
    /// Builds the `Inputting` state from the walked nodes, splicing the live
    /// composition display in at the cursor.
    ///
    /// Two cursors run in parallel: a reading cursor counting consumed
    /// segments and a visual cursor counting UTF-16 units of output. When a
    /// node's visible length differs from its span the cursor cannot sit
    /// inside it, so it snaps to the node edge and the tooltip names the
    /// readings around the cursor instead.
    pub(crate) fn build_inputting_state(&mut self, text_to_commit: String) -> InputState {
        let readings = self.compositor.readings();
        let compositor_cursor = self.compositor.cursor();
        let mut composed = String::new();
        let mut composed_cursor = 0usize;
        let mut reading_cursor = 0usize;
        let mut tooltip = String::new();
        for node in &self.walked {
            let value = &node.current_pair.value;
            composed.push_str(value);
            // nodes wholly behind the cursor never interact with it
            if reading_cursor + node.span_length <= compositor_cursor {
                composed_cursor += textpos::u16_len(value);
                reading_cursor += node.span_length;
                continue;
            }
            let visible = textpos::u8_len(value);
            if visible == node.span_length {
                for element in textpos::u8_elements(value) {
                    if reading_cursor < compositor_cursor {
                        composed_cursor += textpos::u16_len(element);
                        reading_cursor += 1;
                    }
                }
            } else if reading_cursor < compositor_cursor {
                composed_cursor += textpos::u16_len(value);
                reading_cursor += node.span_length;
                reading_cursor = reading_cursor.min(compositor_cursor);
                let before = readings
                    .get(compositor_cursor.wrapping_sub(1))
                    .cloned()
                    .unwrap_or_default();
                let after = readings.get(compositor_cursor).cloned().unwrap_or_default();
                tooltip = if compositor_cursor == 0 {
                    format!("Cursor is in front of \"{after}\".")
                } else if compositor_cursor >= readings.len() {
                    format!("Cursor is to the rear of \"{before}\".")
                } else {
                    format!("Cursor is between \"{before}\" and \"{after}\".")
                };
            }
        }

        let inline = self
            .composer
            .get_inline_display(self.config.show_romanization_in_composition_buffer);
        let head = textpos::u16_sub_string(&composed, 0, composed_cursor);
        let tail = textpos::u16_sub_string(&composed, composed_cursor, textpos::u16_len(&composed));
        let mut composing_buffer = format!("{head}{inline}{tail}");
        // composing buffers must never carry unprintable characters to the
        // host
        composing_buffer.retain(|c| !c.is_control());
        let cursor_index = composed_cursor + textpos::u16_len(&inline);
        InputState::Inputting {
            data: NotEmptyData::new(composing_buffer, cursor_index),
            text_to_commit,
            tooltip,
        }
    }

    /// Builds the candidate window state and loads the controller.
    pub(crate) fn build_choosing_candidate_state(
        &mut self,
        data: NotEmptyData,
        is_typing_vertical: bool,
    ) -> InputState {
        let candidates = self.candidates_array(self.config.use_fixed_candidate_order_on_selection);
        if let Some(ctl) = self.ctl() {
            ctl.reload(candidates.len());
        }
        InputState::ChoosingCandidate { data, candidates, is_typing_vertical }
    }

    /// Candidate window over a symbol menu node's children.
    pub(crate) fn build_symbol_table_state(
        &mut self,
        node: SymbolNode,
        is_typing_vertical: bool,
    ) -> InputState {
        let candidates: Vec<KeyValue> = node
            .children
            .iter()
            .map(|child| KeyValue::new("", child.title.clone()))
            .collect();
        if let Some(ctl) = self.ctl() {
            ctl.reload(candidates.len());
        }
        InputState::SymbolTable {
            data: NotEmptyData::new("`", 1),
            node,
            candidates,
            is_typing_vertical,
        }
    }

    fn build_marking_state(
        &self,
        data: &NotEmptyData,
        marker_index: usize,
        tooltip_for_inputting: &str,
    ) -> MarkingData {
        let buffer = &data.composing_buffer;
        let (lo, hi) = {
            let a = data.cursor_index.min(marker_index);
            let b = data.cursor_index.max(marker_index);
            (textpos::u8_index_at(buffer, a), textpos::u8_index_at(buffer, b))
        };
        let all = self.compositor.readings();
        let readings = all
            .get(lo.min(all.len())..hi.min(all.len()))
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        MarkingData::new(data.clone(), marker_index, readings, tooltip_for_inputting)
    }

    /// Marking sub-mode: only Esc, Enter, and Shift+Left/Right are handled.
    pub(crate) fn handle_marking(
        &mut self,
        marking: &MarkingData,
        input: &InputSignal,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if input.is_esc() {
            state_callback(marking.converted_to_inputting());
            return true;
        }
        if input.is_enter() {
            let valid = marking.is_length_valid(
                self.config.min_candidate_length(),
                self.config.max_candidate_length,
            );
            if !valid {
                debug!("marked range length out of bounds");
                error_callback(ErrorKind::Normal);
                state_callback(InputState::Marking(marking.clone()));
                return true;
            }
            let marked_text = marking.marked_text();
            let readings = marking.readings.clone();
            let accepted = self
                .delegate
                .as_deref_mut()
                .map_or(false, |d| d.did_request_write_user_phrase(&marked_text, &readings));
            if !accepted {
                debug!("user phrase write request refused");
                error_callback(ErrorKind::Normal);
                state_callback(InputState::Marking(marking.clone()));
                return true;
            }
            state_callback(marking.converted_to_inputting());
            return true;
        }
        if input.is_shift_hold() && input.is_left() {
            if marking.marker_index == 0 {
                error_callback(ErrorKind::Normal);
                state_callback(InputState::Marking(marking.clone()));
                return true;
            }
            let marker =
                textpos::u16_prev_position(&marking.data.composing_buffer, marking.marker_index);
            if marker == marking.data.cursor_index {
                state_callback(marking.converted_to_inputting());
            } else {
                let next = self.build_marking_state(&marking.data, marker, &marking.tooltip_for_inputting);
                state_callback(InputState::Marking(next));
            }
            return true;
        }
        if input.is_shift_hold() && input.is_right() {
            let buffer_len = textpos::u16_len(&marking.data.composing_buffer);
            if marking.marker_index >= buffer_len {
                error_callback(ErrorKind::Normal);
                state_callback(InputState::Marking(marking.clone()));
                return true;
            }
            let marker =
                textpos::u16_next_position(&marking.data.composing_buffer, marking.marker_index);
            if marker == marking.data.cursor_index {
                state_callback(marking.converted_to_inputting());
            } else {
                let next = self.build_marking_state(&marking.data, marker, &marking.tooltip_for_inputting);
                state_callback(InputState::Marking(next));
            }
            return true;
        }
        false
    }

    pub(crate) fn handle_esc(
        &mut self,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
        _error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if !state.is_not_empty() {
            return false;
        }
        if self.config.esc_to_clear_input_buffer {
            self.clear();
            state_callback(InputState::EmptyDiscardingPrevious);
            return true;
        }
        if self.composer.is_empty() {
            state_callback(state.clone());
            return true;
        }
        self.composer.clear();
        if self.compositor.is_empty() {
            state_callback(InputState::EmptyDiscardingPrevious);
        } else {
            let inputting = self.build_inputting_state(String::new());
            state_callback(inputting);
        }
        true
    }

    pub(crate) fn handle_enter(
        &mut self,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
    ) -> bool {
        if !matches!(state, InputState::Inputting { .. }) {
            return false;
        }
        let buffer = state.composing_buffer().to_string();
        self.clear();
        state_callback(InputState::Committing { text_to_commit: buffer });
        state_callback(InputState::Empty);
        true
    }

    /// Ctrl+Cmd+Enter: commit the reading keys, space separated, optionally
    /// romanized.
    pub(crate) fn handle_reading_dump_enter(
        &mut self,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
    ) -> bool {
        if !matches!(state, InputState::Inputting { .. }) {
            return false;
        }
        let mut composed = self.compositor.readings().join("-");
        if self.config.inline_dump_pinyin_in_lieu_of_zhuyin {
            composed = restore_tone_one_in_zhuyin_key(&composed, "-");
            composed = cnv_phonabet_to_ascii(&composed);
        }
        let composed = composed.replace('-', " ");
        self.clear();
        state_callback(InputState::Committing { text_to_commit: composed });
        state_callback(InputState::Empty);
        true
    }

    /// Ctrl+Alt+Cmd+Enter: commit ruby markup pairing each node's value
    /// with its reading. Internal-marker keys pass their value bare.
    pub(crate) fn handle_ruby_composition_enter(
        &mut self,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
    ) -> bool {
        if !matches!(state, InputState::Inputting { .. }) {
            return false;
        }
        let mut composed = String::new();
        for node in &self.walked {
            let key = &node.current_pair.key;
            let value = &node.current_pair.value;
            if key.contains('_') {
                composed.push_str(value);
            } else {
                let reading = ruby_reading(key, self.config.inline_dump_pinyin_in_lieu_of_zhuyin);
                composed.push_str(&format!(
                    "<ruby>{value}<rp>(</rp><rt>{reading}</rt><rp>)</rp></ruby>"
                ));
            }
        }
        self.clear();
        state_callback(InputState::Committing { text_to_commit: composed });
        state_callback(InputState::Empty);
        true
    }

    pub(crate) fn handle_backspace(
        &mut self,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if !matches!(state, InputState::Inputting { .. }) {
            return false;
        }
        if self.composer.has_tone_marker(true) {
            // a lone tone marker clears as one unit
            self.composer.clear();
        } else if self.composer.is_empty() {
            if self.compositor.cursor() > 0 {
                self.compositor.delete_reading_at_rear_of_cursor();
                self.walk();
            } else {
                error_callback(ErrorKind::Normal);
                state_callback(state.clone());
                return true;
            }
        } else {
            self.composer.do_backspace();
        }
        if self.composer.is_empty() && self.compositor.is_empty() {
            state_callback(InputState::EmptyDiscardingPrevious);
        } else {
            let inputting = self.build_inputting_state(String::new());
            state_callback(inputting);
        }
        true
    }

    pub(crate) fn handle_delete(
        &mut self,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if !matches!(state, InputState::Inputting { .. }) {
            return false;
        }
        if !self.composer.is_empty() {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        if self.compositor.cursor() >= self.compositor.length() {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        self.compositor.delete_reading_at_front_of_cursor();
        self.walk();
        if self.compositor.is_empty() {
            state_callback(InputState::EmptyDiscardingPrevious);
        } else {
            let inputting = self.build_inputting_state(String::new());
            state_callback(inputting);
        }
        true
    }

    /// The arrow key pointing across the typing axis does nothing but must
    /// not leak to the host mid-composition.
    pub(crate) fn handle_absorbed_arrow_key(
        &mut self,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if !matches!(state, InputState::Inputting { .. }) {
            return false;
        }
        if !self.composer.is_empty() {
            error_callback(ErrorKind::Normal);
        }
        state_callback(state.clone());
        true
    }

    pub(crate) fn handle_home(
        &mut self,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if !matches!(state, InputState::Inputting { .. }) {
            return false;
        }
        if !self.composer.is_empty() {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        if self.compositor.cursor() == 0 {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        self.compositor.set_cursor(0);
        let inputting = self.build_inputting_state(String::new());
        state_callback(inputting);
        true
    }

    pub(crate) fn handle_end(
        &mut self,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if !matches!(state, InputState::Inputting { .. }) {
            return false;
        }
        if !self.composer.is_empty() {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        if self.compositor.cursor() >= self.compositor.length() {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        let length = self.compositor.length();
        self.compositor.set_cursor(length);
        let inputting = self.build_inputting_state(String::new());
        state_callback(inputting);
        true
    }

    /// Cursor forward; with Shift it opens a marking range instead.
    pub(crate) fn handle_forward(
        &mut self,
        input: &InputSignal,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        let InputState::Inputting { data, tooltip, .. } = state else {
            return false;
        };
        if !self.composer.is_empty() {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        if input.is_shift_hold() {
            if data.cursor_index < textpos::u16_len(&data.composing_buffer) {
                let marker = textpos::u16_next_position(&data.composing_buffer, data.cursor_index);
                let marking = self.build_marking_state(data, marker, tooltip);
                state_callback(InputState::Marking(marking));
            } else {
                error_callback(ErrorKind::Normal);
                state_callback(state.clone());
            }
            return true;
        }
        if self.compositor.cursor() < self.compositor.length() {
            let cursor = self.compositor.cursor() + 1;
            self.compositor.set_cursor(cursor);
            let inputting = self.build_inputting_state(String::new());
            state_callback(inputting);
        } else {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
        }
        true
    }

    /// Cursor backward; with Shift it opens a marking range instead.
    pub(crate) fn handle_backward(
        &mut self,
        input: &InputSignal,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        let InputState::Inputting { data, tooltip, .. } = state else {
            return false;
        };
        if !self.composer.is_empty() {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        if input.is_shift_hold() {
            if data.cursor_index > 0 {
                let marker = textpos::u16_prev_position(&data.composing_buffer, data.cursor_index);
                let marking = self.build_marking_state(data, marker, tooltip);
                state_callback(InputState::Marking(marking));
            } else {
                error_callback(ErrorKind::Normal);
                state_callback(state.clone());
            }
            return true;
        }
        if self.compositor.cursor() > 0 {
            let cursor = self.compositor.cursor() - 1;
            self.compositor.set_cursor(cursor);
            let inputting = self.build_inputting_state(String::new());
            state_callback(inputting);
        } else {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
        }
        true
    }

    /// Punctuation typed through a synthetic language-model key.
    pub(crate) fn handle_punctuation(
        &mut self,
        custom_punctuation: &str,
        state: &InputState,
        is_typing_vertical: bool,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if !self.ctx.language_model.has_unigrams_for(custom_punctuation) {
            return false;
        }
        if !self.composer.is_empty() {
            // a half-typed syllable blocks punctuation
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        self.compositor.insert_reading(custom_punctuation);
        let text_to_commit = self.commit_overflown_composition_and_walk();
        let inputting = self.build_inputting_state(text_to_commit);
        let data = inputting.not_empty_data().cloned().unwrap_or_default();
        state_callback(inputting);

        if self.config.use_scpc_typing_mode && self.composer.is_empty() {
            let choosing = self.build_choosing_candidate_state(data, is_typing_vertical);
            let candidates = choosing.candidates().to_vec();
            if candidates.len() == 1 {
                self.clear();
                state_callback(InputState::Committing {
                    text_to_commit: candidates[0].value.clone(),
                });
                state_callback(InputState::Empty);
            } else {
                state_callback(choosing);
            }
        }
        true
    }

    /// Tab / Shift+Space rotation through the candidates at the cursor
    /// without opening the window.
    pub(crate) fn handle_inline_candidate_rotation(
        &mut self,
        state: &InputState,
        reverse: bool,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if !matches!(state, InputState::Inputting { .. }) || !self.composer.is_empty() {
            if state.is_not_empty() || !self.composer.is_empty() {
                error_callback(ErrorKind::Normal);
                state_callback(state.clone());
                return true;
            }
            return false;
        }
        let candidates = self.candidates_array(true);
        if candidates.is_empty() {
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        let location = (self.actual_candidate_cursor_index()
            + usize::from(self.config.use_rear_cursor_mode))
        .min(self.compositor.length());
        let mut accumulated = 0usize;
        let mut current = None;
        for node in &self.walked {
            accumulated += node.span_length;
            if accumulated >= location {
                current = Some(node.clone());
                break;
            }
        }
        let Some(current) = current else {
            error_callback(ErrorKind::Structural);
            state_callback(state.clone());
            return true;
        };
        let index = if current.score < SELECTED_CANDIDATE_SCORE {
            // node never manually fixed: rotation starts at the edge,
            // skipping slot 0 when it already shows the current value
            if candidates[0] == current.current_pair {
                if reverse {
                    candidates.len() - 1
                } else {
                    1 % candidates.len()
                }
            } else {
                0
            }
        } else {
            let position = candidates
                .iter()
                .position(|c| *c == current.current_pair)
                .unwrap_or(0);
            if reverse {
                (position + candidates.len() - 1) % candidates.len()
            } else {
                (position + 1) % candidates.len()
            }
        };
        debug!(index, "inline candidate rotation");
        self.fix_node(&candidates[index].clone(), false);
        let inputting = self.build_inputting_state(String::new());
        state_callback(inputting);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phonabet_to_ascii_converts_and_rejects_markers() {
        assert_eq!(cnv_phonabet_to_ascii("ㄎㄜ"), "ke");
        assert_eq!(cnv_phonabet_to_ascii("ㄐㄧˋ"), "ji4");
        assert_eq!(cnv_phonabet_to_ascii("_punctuation_,"), "");
    }

    #[test]
    fn textbook_reading_moves_neutral_tone_to_front() {
        assert_eq!(cnv_zhuyin_key_to_textbook_reading("ㄉㄜ˙", " "), "˙ㄉㄜ");
        assert_eq!(
            cnv_zhuyin_key_to_textbook_reading("ㄋㄧㄢˊ-ㄓㄨㄥ", " "),
            "ㄋㄧㄢˊ ㄓㄨㄥ"
        );
    }

    #[test]
    fn ruby_reading_romanizes_when_requested() {
        assert_eq!(ruby_reading("ㄍㄜ-ㄎㄜ", false), "ㄍㄜ ㄎㄜ");
        assert_eq!(ruby_reading("ㄍㄜ-ㄎㄜ", true), "ge1 ke1");
        assert_eq!(ruby_reading("ㄉㄜ˙", false), "˙ㄉㄜ");
        assert_eq!(ruby_reading("ㄉㄜ˙", true), "de5");
    }

    #[test]
    fn tone_one_restoration_skips_toned_syllables() {
        assert_eq!(restore_tone_one_in_zhuyin_key("ㄓㄨㄥ-ㄐㄧˋ", "-"), "ㄓㄨㄥ1-ㄐㄧˋ");
        assert_eq!(restore_tone_one_in_zhuyin_key("gao1-ke2", "-"), "gao1-ke2");
    }
}
