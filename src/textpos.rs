//! Text position conversion between UTF-16 code units and visible units.
//!
//! Host text-editing protocols address cursor positions in UTF-16 code
//! units, while the engine reasons in visible characters (extended grapheme
//! clusters). These helpers convert between the two addressing schemes and
//! guarantee that cursor movement never lands inside a surrogate pair or a
//! multi-code-unit emoji.
//!
//! All functions clamp out-of-range input to valid bounds; none of them can
//! fail.

use unicode_segmentation::UnicodeSegmentation;

/// Visible units of a string, one per extended grapheme cluster.
pub fn u8_elements(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

/// Number of visible units in a string.
pub fn u8_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Number of UTF-16 code units in a string.
pub fn u16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// The visible-unit index containing the given UTF-16 offset.
///
/// Offsets at or beyond the end of the string map to the visible length.
pub fn u8_index_at(text: &str, u16_offset: usize) -> usize {
    let mut acc = 0;
    for (i, g) in text.graphemes(true).enumerate() {
        let end = acc + u16_len(g);
        if u16_offset < end {
            return i;
        }
        acc = end;
    }
    u8_len(text)
}

/// The UTF-16 offset of the visible unit at `u8_index`, clamped to the end.
pub fn u16_offset_of(text: &str, u8_index: usize) -> usize {
    text.graphemes(true).take(u8_index).map(u16_len).sum()
}

/// Next UTF-16 position after `index`, skipping an entire visible unit.
pub fn u16_next_position(text: &str, index: usize) -> usize {
    let len = u16_len(text);
    if index >= len {
        return len;
    }
    let mut start = 0;
    for g in text.graphemes(true) {
        let end = start + u16_len(g);
        if index < end {
            return end;
        }
        start = end;
    }
    len
}

/// Previous UTF-16 position before `index`, skipping an entire visible unit.
///
/// An `index` inside a visible unit snaps back to that unit's start.
pub fn u16_prev_position(text: &str, index: usize) -> usize {
    let mut prev = 0;
    let mut start = 0;
    for g in text.graphemes(true) {
        if start >= index {
            break;
        }
        prev = start;
        start += u16_len(g);
    }
    prev
}

/// Substring by UTF-16 offsets. Bounds are unordered and clamped.
pub fn u16_sub_string(text: &str, from: usize, to: usize) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();
    let len = units.len();
    let lo = from.min(to).min(len);
    let hi = from.max(to).min(len);
    String::from_utf16_lossy(&units[lo..hi])
}

/// Substring by visible-unit indices. Bounds are unordered and clamped.
pub fn u8_sub_string(text: &str, from: usize, to: usize) -> String {
    let lo = from.min(to);
    let hi = from.max(to);
    text.graphemes(true).skip(lo).take(hi - lo).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_count_visible_units() {
        assert_eq!(u8_len("高科技"), 3);
        assert_eq!(u16_len("高科技"), 3);
        // astral-plane emoji: one visible unit, two UTF-16 code units
        assert_eq!(u8_len("a👍b"), 3);
        assert_eq!(u16_len("a👍b"), 4);
    }

    #[test]
    fn next_prev_skip_surrogate_pairs_atomically() {
        let s = "a👍你";
        // boundaries: 0, 1, 3, 4
        assert_eq!(u16_next_position(s, 0), 1);
        assert_eq!(u16_next_position(s, 1), 3);
        assert_eq!(u16_next_position(s, 2), 3); // inside the pair
        assert_eq!(u16_next_position(s, 3), 4);
        assert_eq!(u16_next_position(s, 9), 4);
        assert_eq!(u16_prev_position(s, 4), 3);
        assert_eq!(u16_prev_position(s, 3), 1);
        assert_eq!(u16_prev_position(s, 2), 1); // inside the pair
        assert_eq!(u16_prev_position(s, 1), 0);
        assert_eq!(u16_prev_position(s, 0), 0);
    }

    #[test]
    fn next_prev_round_trip_on_interior_boundaries() {
        let s = "x👍👍y你";
        let boundaries = [1, 3, 5, 6];
        for &i in &boundaries {
            assert_eq!(u16_next_position(s, u16_prev_position(s, i)), i);
        }
    }

    #[test]
    fn index_mapping_round_trips() {
        let s = "高👍技";
        assert_eq!(u8_index_at(s, 0), 0);
        assert_eq!(u8_index_at(s, 1), 1);
        assert_eq!(u8_index_at(s, 2), 1);
        assert_eq!(u8_index_at(s, 3), 2);
        assert_eq!(u8_index_at(s, 99), 3);
        assert_eq!(u16_offset_of(s, 2), 3);
        assert_eq!(u16_offset_of(s, 9), 4);
    }

    #[test]
    fn substrings_clamp_and_accept_unordered_bounds() {
        assert_eq!(u16_sub_string("你好嗎", 1, 3), "好嗎");
        assert_eq!(u16_sub_string("你好嗎", 3, 1), "好嗎");
        assert_eq!(u16_sub_string("你好", 0, 99), "你好");
        assert_eq!(u8_sub_string("a👍b", 1, 2), "👍");
    }
}
