//! Candidate window sub-mode: paging, highlighting, confirmation, and the
//! single-syllable auto-select shortcut.

use tracing::{debug, warn};

use crate::candidate::CandidateLayout;
use crate::engine::{Composer, Compositor};
use crate::signal::InputSignal;
use crate::state::InputState;

use super::{ErrorKind, KeyHandler};

impl<C: Composer, P: Compositor> KeyHandler<C, P> {
    /// Handles one key while a candidate-style window is open. Only called
    /// for `ChoosingCandidate`, `SymbolTable`, and `AssociatedPhrases`.
    pub(crate) fn handle_candidate(
        &mut self,
        input: &InputSignal,
        state: &InputState,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) -> bool {
        if self.delegate.is_none() {
            warn!("candidate window key without a delegate");
            error_callback(ErrorKind::Structural);
            state_callback(state.clone());
            return true;
        }
        let is_associated = matches!(state, InputState::AssociatedPhrases { .. });
        let candidates = state.candidates().to_vec();

        let cancels = input.is_backspace()
            || input.is_esc()
            || input.is_delete()
            || (input.is_shift_hold() && (input.is_cursor_forward() || input.is_cursor_backward()));
        if cancels {
            if is_associated || self.config.use_scpc_typing_mode || self.compositor.is_empty() {
                self.clear();
                state_callback(InputState::EmptyDiscardingPrevious);
            } else {
                let inputting = self.build_inputting_state(String::new());
                state_callback(inputting);
            }
            return true;
        }

        if input.is_enter() {
            if is_associated {
                self.clear();
                state_callback(InputState::EmptyDiscardingPrevious);
                return true;
            }
            match self.ctl().and_then(|c| c.selected_index()) {
                Some(index) if index < candidates.len() => {
                    self.confirm_candidate(state, index, state_callback, error_callback);
                }
                _ => {
                    error_callback(ErrorKind::Structural);
                    state_callback(state.clone());
                }
            }
            return true;
        }

        if input.is_tab() {
            let updated = if self.config.specify_shift_tab_key_behavior {
                if input.is_shift_hold() {
                    self.ctl().map_or(false, |c| c.highlight_previous())
                } else {
                    self.ctl().map_or(false, |c| c.highlight_next())
                }
            } else if input.is_shift_hold() {
                self.ctl().map_or(false, |c| c.show_previous_page())
            } else {
                self.ctl().map_or(false, |c| c.show_next_page())
            };
            if !updated {
                error_callback(ErrorKind::Normal);
            }
            state_callback(state.clone());
            return true;
        }

        if input.is_space() {
            let updated = if self.config.specify_shift_space_key_behavior {
                if input.is_shift_hold() {
                    self.ctl().map_or(false, |c| c.highlight_next())
                } else {
                    self.ctl().map_or(false, |c| c.show_next_page())
                }
            } else if input.is_shift_hold() {
                self.ctl().map_or(false, |c| c.show_next_page())
            } else {
                self.ctl().map_or(false, |c| c.highlight_next())
            };
            if !updated {
                error_callback(ErrorKind::Normal);
            }
            state_callback(state.clone());
            return true;
        }

        if input.is_page_down() || input.is_page_up() {
            let updated = if input.is_page_down() {
                self.ctl().map_or(false, |c| c.show_next_page())
            } else {
                self.ctl().map_or(false, |c| c.show_previous_page())
            };
            if !updated {
                error_callback(ErrorKind::Normal);
            }
            state_callback(state.clone());
            return true;
        }

        // Arrows: along the layout axis they move the highlight, across it
        // they page.
        let layout = self.ctl().map_or(CandidateLayout::Horizontal, |c| c.layout());
        if input.is_left() || input.is_right() || input.is_up() || input.is_down() {
            let updated = match layout {
                CandidateLayout::Horizontal => {
                    if input.is_left() {
                        self.ctl().map_or(false, |c| c.highlight_previous())
                    } else if input.is_right() {
                        self.ctl().map_or(false, |c| c.highlight_next())
                    } else if input.is_up() {
                        self.ctl().map_or(false, |c| c.show_previous_page())
                    } else {
                        self.ctl().map_or(false, |c| c.show_next_page())
                    }
                }
                CandidateLayout::Vertical => {
                    if input.is_up() {
                        self.ctl().map_or(false, |c| c.highlight_previous())
                    } else if input.is_down() {
                        self.ctl().map_or(false, |c| c.highlight_next())
                    } else if input.is_left() {
                        self.ctl().map_or(false, |c| c.show_previous_page())
                    } else {
                        self.ctl().map_or(false, |c| c.show_next_page())
                    }
                }
            };
            if !updated {
                error_callback(ErrorKind::Normal);
            }
            state_callback(state.clone());
            return true;
        }

        if input.is_home() || input.is_end() {
            let target = if input.is_home() { 0 } else { candidates.len().saturating_sub(1) };
            let already_there =
                candidates.is_empty() || self.ctl().and_then(|c| c.selected_index()) == Some(target);
            if already_there {
                error_callback(ErrorKind::Normal);
            } else if let Some(ctl) = self.ctl() {
                ctl.set_selected_index(target);
            }
            state_callback(state.clone());
            return true;
        }

        // Selection keys require Shift in an associated-phrase window, so
        // plain typing keeps flowing to the host.
        if is_associated && !input.is_shift_hold() {
            return false;
        }
        let match_text = if is_associated {
            input.input_text_ignoring_modifiers()
        } else {
            input.input_text()
        };
        if let Some(label_index) = self
            .config
            .candidate_keys
            .iter()
            .position(|label| label.eq_ignore_ascii_case(match_text))
        {
            if let Some(index) = self.ctl().and_then(|c| c.candidate_index_at_key_label(label_index)) {
                if index < candidates.len() {
                    debug!(index, "candidate selected by key label");
                    self.confirm_candidate(state, index, state_callback, error_callback);
                    return true;
                }
            }
            error_callback(ErrorKind::Normal);
            state_callback(state.clone());
            return true;
        }
        if is_associated {
            return false;
        }

        // SCPC: starting a fresh syllable (or a recognized punctuation or
        // letter key) auto-confirms the top candidate and replays the key.
        if self.config.use_scpc_typing_mode && self.should_auto_select(input) {
            if let Some(index) = self.ctl().and_then(|c| c.candidate_index_at_key_label(0)) {
                if index < candidates.len() {
                    self.confirm_candidate(state, index, state_callback, error_callback);
                }
            }
            self.clear();
            state_callback(InputState::EmptyDiscardingPrevious);
            if self.replay_depth >= 1 {
                warn!("auto-select replay nested beyond one level");
                error_callback(ErrorKind::Structural);
                return true;
            }
            self.replay_depth += 1;
            let _ = self.handle(
                input,
                &InputState::EmptyDiscardingPrevious,
                state_callback,
                error_callback,
            );
            self.replay_depth -= 1;
            return true;
        }

        error_callback(ErrorKind::Normal);
        state_callback(state.clone());
        true
    }

    fn should_auto_select(&self, input: &InputSignal) -> bool {
        let Some(ch) = input.the_char() else {
            return false;
        };
        if self.composer.input_validity_check(ch) {
            return true;
        }
        let prefix = self.punctuation_name_prefix(input);
        let custom = format!(
            "{}{}{}",
            prefix,
            self.config.punctuation_parser_prefix(),
            input.input_text()
        );
        let plain = format!("{}{}", prefix, input.input_text());
        if self.ctx.language_model.has_unigrams_for(&custom)
            || self.ctx.language_model.has_unigrams_for(&plain)
        {
            return true;
        }
        input.is_upper_case_ascii_letter()
            && self
                .ctx
                .language_model
                .has_unigrams_for(&format!("_letter_{}", input.input_text()))
    }

    /// Applies the confirmed candidate for whichever window is open.
    pub(crate) fn confirm_candidate(
        &mut self,
        state: &InputState,
        index: usize,
        state_callback: &mut dyn FnMut(InputState),
        error_callback: &mut dyn FnMut(ErrorKind),
    ) {
        match state {
            InputState::SymbolTable { node, .. } => {
                let Some(child) = node.children.get(index).cloned() else {
                    error_callback(ErrorKind::Structural);
                    state_callback(state.clone());
                    return;
                };
                if child.is_leaf() {
                    self.clear();
                    state_callback(InputState::Committing { text_to_commit: child.title });
                    state_callback(InputState::EmptyDiscardingPrevious);
                } else {
                    let submenu =
                        self.build_symbol_table_state(child, state.is_typing_vertical());
                    state_callback(submenu);
                }
            }
            InputState::AssociatedPhrases { candidates, is_typing_vertical, .. } => {
                let Some(pair) = candidates.get(index).cloned() else {
                    error_callback(ErrorKind::Structural);
                    state_callback(state.clone());
                    return;
                };
                self.clear();
                state_callback(InputState::Committing { text_to_commit: pair.value.clone() });
                let follow_up = self
                    .config
                    .associated_phrases_enabled
                    .then(|| self.build_associated_phrases_state(&pair.value, *is_typing_vertical))
                    .flatten();
                state_callback(follow_up.unwrap_or(InputState::Empty));
            }
            InputState::ChoosingCandidate { candidates, is_typing_vertical, .. } => {
                let Some(pair) = candidates.get(index).cloned() else {
                    error_callback(ErrorKind::Structural);
                    state_callback(state.clone());
                    return;
                };
                if self.config.use_scpc_typing_mode {
                    self.clear();
                    state_callback(InputState::Committing { text_to_commit: pair.value.clone() });
                    let follow_up = self
                        .config
                        .associated_phrases_enabled
                        .then(|| {
                            self.build_associated_phrases_state(&pair.value, *is_typing_vertical)
                        })
                        .flatten();
                    state_callback(follow_up.unwrap_or(InputState::Empty));
                    return;
                }
                if !self.fix_node(&pair, true) {
                    error_callback(ErrorKind::Structural);
                    state_callback(state.clone());
                    return;
                }
                let inputting = self.build_inputting_state(String::new());
                state_callback(inputting);
            }
            _ => {
                error_callback(ErrorKind::Structural);
                state_callback(state.clone());
            }
        }
    }
}
