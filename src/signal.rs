//! Input signal abstraction.
//!
//! Platform adapters translate native keyboard events into [`InputSignal`]
//! values before calling the dispatcher. The predicates here encode the
//! direction-key remapping that vertical typing requires: when typing
//! vertically, Down means "cursor forward" and Left opens the candidate
//! window, mirroring the horizontal arrangement rotated a quarter turn.

/// Recognized function keys. Plain printable keys carry [`KeyCode::None`]
/// and are identified by their text payload instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyCode {
    #[default]
    None,
    Enter,
    Tab,
    Space,
    Backspace,
    Esc,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

/// Modifier flags accompanying a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub command: bool,
    pub caps_lock: bool,
    pub numeric_pad: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
        command: false,
        caps_lock: false,
        numeric_pad: false,
    };

    pub fn shift_only() -> Self {
        Modifiers { shift: true, ..Self::NONE }
    }
}

/// One key event as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSignal {
    input_text: String,
    input_text_ignoring_modifiers: Option<String>,
    key_code: KeyCode,
    flags: Modifiers,
    is_typing_vertical: bool,
}

impl InputSignal {
    pub fn new(
        input_text: impl Into<String>,
        key_code: KeyCode,
        flags: Modifiers,
        is_typing_vertical: bool,
    ) -> Self {
        Self {
            input_text: input_text.into(),
            input_text_ignoring_modifiers: None,
            key_code,
            flags,
            is_typing_vertical,
        }
    }

    /// A printable character with no modifiers.
    pub fn from_char(ch: char) -> Self {
        let key_code = if ch == ' ' { KeyCode::Space } else { KeyCode::None };
        Self::new(ch.to_string(), key_code, Modifiers::NONE, false)
    }

    /// A shifted printable character, e.g. an uppercase Latin letter.
    pub fn from_shifted_char(ch: char) -> Self {
        Self::new(ch.to_string(), KeyCode::None, Modifiers::shift_only(), false)
    }

    /// A pure function key without a text payload.
    pub fn function(key_code: KeyCode) -> Self {
        Self::new(String::new(), key_code, Modifiers::NONE, false)
    }

    pub fn with_flags(mut self, flags: Modifiers) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_vertical(mut self, vertical: bool) -> Self {
        self.is_typing_vertical = vertical;
        self
    }

    /// Overrides the text seen when modifiers are ignored (used by the
    /// associated-phrase selection keys, which require Shift).
    pub fn with_text_ignoring_modifiers(mut self, text: impl Into<String>) -> Self {
        self.input_text_ignoring_modifiers = Some(text.into());
        self
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn input_text_ignoring_modifiers(&self) -> &str {
        self.input_text_ignoring_modifiers
            .as_deref()
            .unwrap_or(&self.input_text)
    }

    pub fn key_code(&self) -> KeyCode {
        self.key_code
    }

    pub fn flags(&self) -> Modifiers {
        self.flags
    }

    pub fn is_typing_vertical(&self) -> bool {
        self.is_typing_vertical
    }

    pub fn the_char(&self) -> Option<char> {
        self.input_text.chars().next()
    }

    /// True when the signal carries neither a printable payload nor a
    /// recognized function key; such signals never reach the handlers.
    pub fn is_invalid_input(&self) -> bool {
        self.key_code == KeyCode::None && self.the_char().map_or(true, char::is_control)
    }

    pub fn is_reserved_key(&self) -> bool {
        self.key_code != KeyCode::None
    }

    pub fn is_letter(&self) -> bool {
        self.the_char().map_or(false, char::is_alphabetic)
    }

    /// An uppercase ASCII letter typed with Shift held and no other
    /// modifier. The exact-flags requirement keeps shifted symbol keys from
    /// being misread as uppercase input.
    pub fn is_upper_case_ascii_letter(&self) -> bool {
        self.the_char().map_or(false, |c| c.is_ascii_uppercase())
            && self.flags == Modifiers::shift_only()
    }

    pub fn is_shift_hold(&self) -> bool {
        self.flags.shift
    }

    pub fn is_control_hold(&self) -> bool {
        self.flags.control
    }

    pub fn is_alt_hold(&self) -> bool {
        self.flags.alt
    }

    pub fn is_command_hold(&self) -> bool {
        self.flags.command
    }

    pub fn is_caps_lock_on(&self) -> bool {
        self.flags.caps_lock
    }

    pub fn is_numeric_pad(&self) -> bool {
        self.flags.numeric_pad
    }

    pub fn is_control_hotkey(&self) -> bool {
        self.flags.control && self.is_letter()
    }

    pub fn is_alt_hotkey(&self) -> bool {
        self.flags.alt && self.is_letter()
    }

    pub fn is_tab(&self) -> bool {
        self.key_code == KeyCode::Tab
    }

    pub fn is_enter(&self) -> bool {
        self.key_code == KeyCode::Enter
    }

    pub fn is_space(&self) -> bool {
        self.key_code == KeyCode::Space || self.input_text == " "
    }

    pub fn is_backspace(&self) -> bool {
        self.key_code == KeyCode::Backspace
    }

    pub fn is_esc(&self) -> bool {
        self.key_code == KeyCode::Esc
    }

    pub fn is_delete(&self) -> bool {
        self.key_code == KeyCode::Delete
    }

    pub fn is_home(&self) -> bool {
        self.key_code == KeyCode::Home
    }

    pub fn is_end(&self) -> bool {
        self.key_code == KeyCode::End
    }

    pub fn is_page_up(&self) -> bool {
        self.key_code == KeyCode::PageUp
    }

    pub fn is_page_down(&self) -> bool {
        self.key_code == KeyCode::PageDown
    }

    pub fn is_up(&self) -> bool {
        self.key_code == KeyCode::Up
    }

    pub fn is_down(&self) -> bool {
        self.key_code == KeyCode::Down
    }

    pub fn is_left(&self) -> bool {
        self.key_code == KeyCode::Left
    }

    pub fn is_right(&self) -> bool {
        self.key_code == KeyCode::Right
    }

    pub fn is_cursor_forward(&self) -> bool {
        if self.is_typing_vertical { self.is_down() } else { self.is_right() }
    }

    pub fn is_cursor_backward(&self) -> bool {
        if self.is_typing_vertical { self.is_up() } else { self.is_left() }
    }

    pub fn is_extra_choose_candidate_key(&self) -> bool {
        if self.is_typing_vertical { self.is_left() } else { self.is_down() }
    }

    pub fn is_extra_choose_candidate_key_reverse(&self) -> bool {
        if self.is_typing_vertical { self.is_right() } else { self.is_up() }
    }

    pub fn is_absorbed_arrow_key(&self) -> bool {
        if self.is_typing_vertical { self.is_right() } else { self.is_up() }
    }

    pub fn is_symbol_menu_physical_key(&self) -> bool {
        self.the_char() == Some('`')
    }
}
