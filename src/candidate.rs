//! Candidate window control.
//!
//! The dispatcher never renders candidates; it drives a controller supplied
//! by the host delegate. [`CandidateWindow`] is a ready-made controller with
//! label-based paging for hosts (and tests) that do not need a custom one.

/// Orientation of the candidate window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateLayout {
    #[default]
    Horizontal,
    Vertical,
}

/// Host-side candidate window state the dispatcher reads and drives.
///
/// One page holds as many candidates as there are key labels. All movement
/// methods return `false` when the move is impossible, which the dispatcher
/// reports as a recoverable error.
pub trait CandidateController {
    fn layout(&self) -> CandidateLayout;
    /// Currently highlighted candidate, if any.
    fn selected_index(&self) -> Option<usize>;
    fn set_selected_index(&mut self, index: usize);
    fn total_count(&self) -> usize;
    /// Resets to a fresh list of `total` candidates, highlighting the first.
    fn reload(&mut self, total: usize);
    fn show_next_page(&mut self) -> bool;
    fn show_previous_page(&mut self) -> bool;
    fn highlight_next(&mut self) -> bool;
    fn highlight_previous(&mut self) -> bool;
    fn key_label_count(&self) -> usize;
    /// Absolute candidate index for a key label slot on the current page.
    fn candidate_index_at_key_label(&self, label_index: usize) -> Option<usize>;
}

/// Default paging controller keyed by the `1`–`9` labels.
#[derive(Debug, Clone)]
pub struct CandidateWindow {
    layout: CandidateLayout,
    key_labels: Vec<String>,
    total: usize,
    selected: Option<usize>,
}

impl CandidateWindow {
    pub fn new(layout: CandidateLayout) -> Self {
        let key_labels = (1..=9).map(|n| n.to_string()).collect();
        Self { layout, key_labels, total: 0, selected: None }
    }

    pub fn with_key_labels(mut self, labels: Vec<String>) -> Self {
        if !labels.is_empty() {
            self.key_labels = labels;
        }
        self
    }

    fn page_size(&self) -> usize {
        self.key_labels.len().max(1)
    }

    fn current_page(&self) -> usize {
        self.selected.unwrap_or(0) / self.page_size()
    }
}

impl Default for CandidateWindow {
    fn default() -> Self {
        Self::new(CandidateLayout::Horizontal)
    }
}

impl CandidateController for CandidateWindow {
    fn layout(&self) -> CandidateLayout {
        self.layout
    }

    fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    fn set_selected_index(&mut self, index: usize) {
        if index < self.total {
            self.selected = Some(index);
        }
    }

    fn total_count(&self) -> usize {
        self.total
    }

    fn reload(&mut self, total: usize) {
        self.total = total;
        self.selected = if total > 0 { Some(0) } else { None };
    }

    fn show_next_page(&mut self) -> bool {
        let next_start = (self.current_page() + 1) * self.page_size();
        if next_start >= self.total {
            return false;
        }
        self.selected = Some(next_start);
        true
    }

    fn show_previous_page(&mut self) -> bool {
        if self.current_page() == 0 {
            return false;
        }
        self.selected = Some((self.current_page() - 1) * self.page_size());
        true
    }

    fn highlight_next(&mut self) -> bool {
        match self.selected {
            Some(i) if i + 1 < self.total => {
                self.selected = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    fn highlight_previous(&mut self) -> bool {
        match self.selected {
            Some(i) if i > 0 => {
                self.selected = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    fn key_label_count(&self) -> usize {
        self.key_labels.len()
    }

    fn candidate_index_at_key_label(&self, label_index: usize) -> Option<usize> {
        if label_index >= self.page_size() {
            return None;
        }
        let index = self.current_page() * self.page_size() + label_index;
        (index < self.total).then_some(index)
    }
}
