//! Top-level dispatch: the stage-ordered `handle` entry point.

use tracing::debug;

use crate::engine::{Composer, Compositor};
use crate::signal::{InputSignal, KeyCode};
use crate::state::InputState;

use super::{ErrorKind, KeyHandler};

impl<C: Composer, P: Compositor> KeyHandler<C, P> {
    /// Processes one key event against the current state.
    ///
    /// Returns whether the IME consumed the key; `false` means the host
    /// should process it itself. Every consumed key resolves to at least
    /// one callback invocation before returning.
    pub fn handle(
        &mut self,
        input: &InputSignal,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if input.input_text().is_empty() && input.key_code() == KeyCode::None {
            return false;
        }

        // Unrecognized signals pass through unconsumed; while composing they
        // only beep, so a stray keystroke cannot corrupt the buffer.
        if input.is_invalid_input() {
            if !state.is_not_empty() && !matches!(state, InputState::AssociatedPhrases { .. }) {
                return false;
            }
            debug!(text = ?input.input_text(), "invalid input while composing");
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }

        // Hotkey combinations belong to the host while nothing is composed.
        let is_function_key = input.is_control_hotkey()
            || input.is_alt_hotkey()
            || input.is_command_hold()
            || input.is_numeric_pad();
        if !state.is_not_empty()
            && !matches!(state, InputState::AssociatedPhrases { .. })
            && is_function_key
        {
            return false;
        }

        // Caps Lock types literal Latin: drop the composition and commit the
        // key lowercased, leaving Shift and control characters to the OS.
        if input.is_caps_lock_on() {
            let skip = input.is_backspace()
                || input.is_enter()
                || input.is_absorbed_arrow_key()
                || input.is_extra_choose_candidate_key()
                || input.is_extra_choose_candidate_key_reverse()
                || input.is_cursor_forward()
                || input.is_cursor_backward();
            if !skip {
                self.clear();
                state_callback(InputState::Empty);
                if input.is_shift_hold() || input.the_char().map_or(true, char::is_control) {
                    return false;
                }
                state_callback(InputState::Committing {
                    text_to_commit: input.input_text().to_lowercase(),
                });
                state_callback(InputState::Empty);
                return true;
            }
        }
        if input.is_numeric_pad()
            && !(input.is_left()
                || input.is_right()
                || input.is_up()
                || input.is_down()
                || input.is_space()
                || input.the_char().map_or(true, char::is_control))
        {
            self.clear();
            state_callback(InputState::Empty);
            state_callback(InputState::Committing {
                text_to_commit: input.input_text().to_lowercase(),
            });
            state_callback(InputState::Empty);
            return true;
        }

        // Candidate window sub-mode.
        if matches!(
            state,
            InputState::ChoosingCandidate { .. } | InputState::SymbolTable { .. }
        ) {
            return self.handle_candidate(input, state, state_callback, error_callback);
        }
        if matches!(state, InputState::AssociatedPhrases { .. }) {
            if self.handle_candidate(input, state, state_callback, error_callback) {
                return true;
            }
            state_callback(InputState::Empty);
            return false;
        }

        // Marking sub-mode; unhandled keys fall back to Inputting and keep
        // dispatching against the converted state.
        let converted_state;
        let state: &InputState = if let InputState::Marking(marking) = state {
            if self.handle_marking(marking, input, state_callback, error_callback) {
                return true;
            }
            converted_state = marking.converted_to_inputting();
            state_callback(converted_state.clone());
            &converted_state
        } else {
            state
        };

        // Phonetic composition.
        if let Some(handled) = self.handle_composition(input, state_callback, error_callback) {
            return handled;
        }

        // Candidate window invocation.
        if state.is_not_empty() && self.composer.is_empty() {
            if input.is_alt_hold() && input.is_extra_choose_candidate_key() {
                return self.handle_inline_candidate_rotation(
                    state,
                    false,
                    state_callback,
                    error_callback,
                );
            }
            if input.is_space()
                && !self.config.choose_candidate_using_space
                && self.compositor.cursor() >= self.compositor.length()
            {
                // Space at the end of the buffer commits it plus the space.
                let buffer = state.composing_buffer().to_string();
                self.clear();
                state_callback(InputState::Committing { text_to_commit: format!("{buffer} ") });
                state_callback(InputState::Empty);
                return true;
            }
            let opens_window = input.is_extra_choose_candidate_key()
                || input.is_extra_choose_candidate_key_reverse()
                || input.is_page_up()
                || input.is_page_down()
                || (input.is_tab() && self.config.specify_shift_tab_key_behavior)
                || (input.is_space()
                    && self.config.choose_candidate_using_space
                    && !input.is_shift_hold());
            if opens_window {
                if let Some(data) = state.not_empty_data().cloned() {
                    let choosing =
                        self.build_choosing_candidate_state(data, input.is_typing_vertical());
                    state_callback(choosing);
                    return true;
                }
            }
        }

        if input.is_esc() {
            return self.handle_esc(state, state_callback, error_callback);
        }
        if input.is_tab() {
            return self.handle_inline_candidate_rotation(
                state,
                input.is_shift_hold(),
                state_callback,
                error_callback,
            );
        }
        if input.is_space() && input.is_shift_hold() && state.is_not_empty() {
            return self.handle_inline_candidate_rotation(
                state,
                input.is_command_hold(),
                state_callback,
                error_callback,
            );
        }
        // Ctrl and Shift+Alt turn the horizontal arrows into Home/End.
        if (input.is_left() || input.is_right())
            && (input.is_control_hold() || (input.is_shift_hold() && input.is_alt_hold()))
        {
            return if input.is_left() {
                self.handle_home(state, state_callback, error_callback)
            } else {
                self.handle_end(state, state_callback, error_callback)
            };
        }
        if input.is_cursor_forward() {
            return self.handle_forward(input, state, state_callback, error_callback);
        }
        if input.is_cursor_backward() {
            return self.handle_backward(input, state, state_callback, error_callback);
        }
        if input.is_absorbed_arrow_key() {
            return self.handle_absorbed_arrow_key(state, state_callback, error_callback);
        }
        if input.is_home() {
            return self.handle_home(state, state_callback, error_callback);
        }
        if input.is_end() {
            return self.handle_end(state, state_callback, error_callback);
        }
        if input.is_backspace() {
            return self.handle_backspace(state, state_callback, error_callback);
        }
        if input.is_delete() {
            return self.handle_delete(state, state_callback, error_callback);
        }
        if input.is_enter() {
            return if input.is_control_hold() && input.is_command_hold() {
                if input.is_alt_hold() {
                    self.handle_ruby_composition_enter(state, state_callback)
                } else {
                    self.handle_reading_dump_enter(state, state_callback)
                }
            } else {
                self.handle_enter(state, state_callback)
            };
        }
        if input.is_symbol_menu_physical_key() && !input.is_shift_hold() {
            if input.is_alt_hold() {
                // unified punctuation list, one synthetic key for the whole set
                if self.handle_punctuation(
                    "_punctuation_list",
                    state,
                    input.is_typing_vertical(),
                    state_callback,
                    error_callback,
                ) {
                    return true;
                }
            } else if self.composer.is_empty() {
                // a pending buffer is committed before the menu opens
                if !self.compositor.is_empty() {
                    self.handle_enter(state, state_callback);
                }
                let table = self.build_symbol_table_state(
                    crate::state::SymbolNode::root(),
                    input.is_typing_vertical(),
                );
                state_callback(table);
                return true;
            } else {
                error_callback(ErrorKind::Normal);
                state_callback(state.clone());
                return true;
            }
        }

        // Punctuation through synthetic language-model keys, the
        // layout-specific spelling first.
        if input.the_char().is_some() {
            let prefix = self.punctuation_name_prefix(input);
            let custom = format!(
                "{}{}{}",
                prefix,
                self.config.punctuation_parser_prefix(),
                input.input_text()
            );
            if self.handle_punctuation(&custom, state, input.is_typing_vertical(), state_callback, error_callback)
            {
                return true;
            }
            let plain = format!("{}{}", prefix, input.input_text());
            if self.handle_punctuation(&plain, state, input.is_typing_vertical(), state_callback, error_callback)
            {
                return true;
            }
        }

        // Uppercase Latin while composing commits through `_letter_` keys.
        if state.is_not_empty() && input.is_upper_case_ascii_letter() {
            let letter = format!("_letter_{}", input.input_text());
            if self.handle_punctuation(&letter, state, input.is_typing_vertical(), state_callback, error_callback)
            {
                return true;
            }
        }

        // Anything unmatched while composing is consumed with an error so
        // the host cannot mangle the buffer.
        if state.is_not_empty() || !self.composer.is_empty() {
            debug!(text = ?input.input_text(), "unhandled key consumed while composing");
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        false
    }

    pub(crate) fn punctuation_name_prefix(&self, input: &InputSignal) -> &'static str {
        if input.is_alt_hold() && input.is_control_hold() {
            "_alt_ctrl_punctuation_"
        } else if input.is_alt_hold() {
            "_alt_punctuation_"
        } else if input.is_control_hold() {
            "_ctrl_punctuation_"
        } else if self.config.half_width_punctuation_enabled {
            "_half_punctuation_"
        } else {
            "_punctuation_"
        }
    }
}
