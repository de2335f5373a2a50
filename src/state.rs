//! Editing states emitted by the dispatcher.
//!
//! Exactly one state is current at any time; the dispatcher builds a fresh
//! value per key event and hands it to the state callback. The platform
//! layer owns persistence of "current state" between events.

use crate::node::KeyValue;
use crate::textpos;

/// Fields shared by every state that carries a visible composition.
///
/// `cursor_index` addresses the buffer in UTF-16 code units, the unit the
/// host text protocols use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotEmptyData {
    pub composing_buffer: String,
    pub cursor_index: usize,
}

impl NotEmptyData {
    pub fn new(composing_buffer: impl Into<String>, cursor_index: usize) -> Self {
        let composing_buffer = composing_buffer.into();
        let cursor_index = cursor_index.min(textpos::u16_len(&composing_buffer));
        Self { composing_buffer, cursor_index }
    }
}

/// A range of the composing buffer selected for user-phrase handling.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkingData {
    pub data: NotEmptyData,
    /// The moving end of the selection, in UTF-16 code units.
    pub marker_index: usize,
    /// Reading segments spanned by the marked range.
    pub readings: Vec<String>,
    /// Tooltip of the `Inputting` state this marking was entered from,
    /// restored when the marking collapses.
    pub tooltip_for_inputting: String,
}

impl MarkingData {
    pub fn new(
        data: NotEmptyData,
        marker_index: usize,
        readings: Vec<String>,
        tooltip_for_inputting: impl Into<String>,
    ) -> Self {
        let marker_index = marker_index.min(textpos::u16_len(&data.composing_buffer));
        Self { data, marker_index, readings, tooltip_for_inputting: tooltip_for_inputting.into() }
    }

    /// `[min(cursor, marker), max(cursor, marker))` in UTF-16 code units.
    pub fn marked_range(&self) -> (usize, usize) {
        let a = self.data.cursor_index;
        let b = self.marker_index;
        (a.min(b), a.max(b))
    }

    pub fn marked_text(&self) -> String {
        let (lo, hi) = self.marked_range();
        textpos::u16_sub_string(&self.data.composing_buffer, lo, hi)
    }

    /// Whether the marked length is acceptable for a user phrase.
    pub fn is_length_valid(&self, min_len: usize, max_len: usize) -> bool {
        let n = textpos::u8_len(&self.marked_text());
        (min_len..=max_len).contains(&n)
    }

    /// The one-directional conversion back to `Inputting`.
    pub fn converted_to_inputting(&self) -> InputState {
        InputState::Inputting {
            data: self.data.clone(),
            text_to_commit: String::new(),
            tooltip: self.tooltip_for_inputting.clone(),
        }
    }
}

/// One node of the symbol menu tree: either a leaf symbol or a category
/// holding children.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolNode {
    pub title: String,
    pub children: Vec<SymbolNode>,
}

impl SymbolNode {
    pub fn leaf(title: impl Into<String>) -> Self {
        Self { title: title.into(), children: Vec::new() }
    }

    pub fn branch(title: impl Into<String>, children: Vec<SymbolNode>) -> Self {
        Self { title: title.into(), children }
    }

    /// A category whose children are the visible units of `symbols`.
    pub fn from_symbols(title: impl Into<String>, symbols: &str) -> Self {
        let children = textpos::u8_elements(symbols)
            .into_iter()
            .map(SymbolNode::leaf)
            .collect();
        Self { title: title.into(), children }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The default categorized symbol table.
    pub fn root() -> Self {
        SymbolNode::branch(
            "/",
            vec![
                SymbolNode::leaf("/"),
                SymbolNode::from_symbols("常用符號", "，、。．？！；：‧‥﹐﹒˙·‘’“”〝〞‵′〃～＄％＠＆＃＊"),
                SymbolNode::from_symbols("橫向括號", "（）「」〔〕｛｝〈〉『』《》【】﹙﹚﹛﹜"),
                SymbolNode::from_symbols("縱向括號", "︵︶﹁﹂︹︺︷︸︿﹀﹃﹄︽︾︻︼"),
                SymbolNode::from_symbols(
                    "希臘字母",
                    "αβγδεζηθικλμνξοπρστυφχψωΑΒΓΔΕΖΗΘΙΚΛΜΝΞΟΠΡΣΤΥΦΧΨΩ",
                ),
                SymbolNode::from_symbols("數學符號", "＋－×÷＝≠≒∞±√＜＞﹤﹥≦≧∩∪∫∮∵∴"),
                SymbolNode::from_symbols("貨幣單位", "$€¥¢£₽₨₩฿₺₹₴₪"),
                SymbolNode::from_symbols("特殊符號", "↑↓←→↖↗↙↘○●◎⊕⊙※△▲☆★◇◆□■▽▼§￥〒￠￡♀♂"),
                SymbolNode::from_symbols("單線表格", "├─┼┴┬┤┌┐╞╪╡│▕└┘╭╮╰╯"),
                SymbolNode::from_symbols("雙線表格", "╔╦╗╠═╬╣╓╥╖╒╤╕║╚╩╝"),
                SymbolNode::from_symbols("填色方塊", "＿ˍ▁▂▃▄▅▆▇█▏▎▍▌▋▊▉◢◣◥◤"),
                SymbolNode::from_symbols("線段", "﹣﹦≡｜∣∥–︱—︳╴¯￣﹉﹊﹍﹎﹋﹌∕﹨╱╲／＼"),
            ],
        )
    }
}

/// The closed set of editing states.
#[derive(Debug, Clone, PartialEq)]
pub enum InputState {
    /// IME inactive.
    Deactivated,
    /// No composition; any pending text from the prior state is committed.
    Empty,
    /// No composition; the prior state's pending text is discarded.
    EmptyDiscardingPrevious,
    /// Text to hand to the host application verbatim.
    Committing { text_to_commit: String },
    /// Normal composing state. `text_to_commit` carries overflow evicted
    /// from the front of the buffer.
    Inputting {
        data: NotEmptyData,
        text_to_commit: String,
        tooltip: String,
    },
    /// A range of the buffer is selected for user-phrase handling.
    Marking(MarkingData),
    /// The candidate window is open.
    ChoosingCandidate {
        data: NotEmptyData,
        candidates: Vec<KeyValue>,
        is_typing_vertical: bool,
    },
    /// Candidate window over a symbol menu node's children.
    SymbolTable {
        data: NotEmptyData,
        node: SymbolNode,
        candidates: Vec<KeyValue>,
        is_typing_vertical: bool,
    },
    /// Follow-up phrase selection after a commit; needs no composing buffer.
    AssociatedPhrases {
        candidates: Vec<KeyValue>,
        selected: KeyValue,
        is_typing_vertical: bool,
    },
}

impl InputState {
    pub fn inputting(composing_buffer: impl Into<String>, cursor_index: usize) -> Self {
        InputState::Inputting {
            data: NotEmptyData::new(composing_buffer, cursor_index),
            text_to_commit: String::new(),
            tooltip: String::new(),
        }
    }

    /// Whether this state carries a visible composition.
    pub fn is_not_empty(&self) -> bool {
        matches!(
            self,
            InputState::Inputting { .. }
                | InputState::Marking(_)
                | InputState::ChoosingCandidate { .. }
                | InputState::SymbolTable { .. }
        )
    }

    pub fn not_empty_data(&self) -> Option<&NotEmptyData> {
        match self {
            InputState::Inputting { data, .. }
            | InputState::ChoosingCandidate { data, .. }
            | InputState::SymbolTable { data, .. } => Some(data),
            InputState::Marking(marking) => Some(&marking.data),
            _ => None,
        }
    }

    pub fn composing_buffer(&self) -> &str {
        self.not_empty_data()
            .map(|d| d.composing_buffer.as_str())
            .unwrap_or("")
    }

    pub fn cursor_index(&self) -> usize {
        self.not_empty_data().map(|d| d.cursor_index).unwrap_or(0)
    }

    pub fn candidates(&self) -> &[KeyValue] {
        match self {
            InputState::ChoosingCandidate { candidates, .. }
            | InputState::SymbolTable { candidates, .. }
            | InputState::AssociatedPhrases { candidates, .. } => candidates,
            _ => &[],
        }
    }

    pub fn is_typing_vertical(&self) -> bool {
        match self {
            InputState::ChoosingCandidate { is_typing_vertical, .. }
            | InputState::SymbolTable { is_typing_vertical, .. }
            | InputState::AssociatedPhrases { is_typing_vertical, .. } => *is_typing_vertical,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_index_clamps_to_buffer_length() {
        let data = NotEmptyData::new("你好", 99);
        assert_eq!(data.cursor_index, 2);
    }

    #[test]
    fn marking_range_is_direction_independent() {
        let forward = MarkingData::new(NotEmptyData::new("你好嗎", 0), 2, vec![], "");
        let backward = MarkingData::new(NotEmptyData::new("你好嗎", 2), 0, vec![], "");
        assert_eq!(forward.marked_range(), (0, 2));
        assert_eq!(backward.marked_range(), (0, 2));
        assert_eq!(forward.marked_text(), "你好");
    }

    #[test]
    fn marking_length_validation() {
        let marking = MarkingData::new(NotEmptyData::new("你好嗎", 0), 2, vec![], "");
        assert!(marking.is_length_valid(2, 10));
        assert!(!marking.is_length_valid(3, 10));
        assert!(!marking.is_length_valid(1, 1));
    }

    #[test]
    fn marking_converts_back_to_inputting() {
        let marking = MarkingData::new(NotEmptyData::new("你好", 1), 2, vec![], "between");
        match marking.converted_to_inputting() {
            InputState::Inputting { data, tooltip, .. } => {
                assert_eq!(data.composing_buffer, "你好");
                assert_eq!(data.cursor_index, 1);
                assert_eq!(tooltip, "between");
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn symbol_root_categories_split_into_leaves() {
        let root = SymbolNode::root();
        assert!(!root.is_leaf());
        assert_eq!(root.children[0].title, "/");
        assert!(root.children[0].is_leaf());
        let brackets = &root.children[2];
        assert!(brackets.children.iter().all(SymbolNode::is_leaf));
        assert_eq!(brackets.children[0].title, "（");
    }
}
