//! Candidate menu of the table host.
//!
//! This module provides:
//! - `Candidate`: a text candidate with an optional comment
//! - `CandidateList`: the session menu with a global highlight and on-demand
//!   page construction

use crate::host::{Page, PageCandidate};

/// A single conversion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    /// Empty when there is nothing to annotate.
    pub comment: String,
}

impl Candidate {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Candidate {
            text: text.into(),
            comment: String::new(),
        }
    }

    pub fn with_comment<T: Into<String>, C: Into<String>>(text: T, comment: C) -> Self {
        Candidate {
            text: text.into(),
            comment: comment.into(),
        }
    }
}

/// Menu of candidates with a highlight addressed by global index.
///
/// Pages are not stored: whoever reads the menu picks the page size and asks
/// for the page covering the highlight.
#[derive(Debug, Clone, Default)]
pub struct CandidateList {
    /// All available candidates
    candidates: Vec<Candidate>,

    /// Highlighted candidate (global, 0-based)
    highlighted: usize,
}

impl CandidateList {
    /// Create a new empty candidate list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidates, moving the highlight back to the first one.
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.highlighted = 0;
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlighted_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.highlighted)
    }

    /// Move the highlight to `index`. Returns false when out of range.
    pub fn highlight(&mut self, index: usize) -> bool {
        if index < self.candidates.len() {
            self.highlighted = index;
            true
        } else {
            false
        }
    }

    /// Highlight the previous candidate.
    /// Returns true if the highlight moved.
    pub fn cursor_up(&mut self) -> bool {
        if self.highlighted > 0 {
            self.highlighted -= 1;
            true
        } else {
            false
        }
    }

    /// Highlight the next candidate, crossing page boundaries.
    /// Returns true if the highlight moved.
    pub fn cursor_down(&mut self) -> bool {
        self.highlight(self.highlighted + 1)
    }

    /// Move the highlight one page back, to the same slot on that page.
    pub fn page_up(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        if self.highlighted < page_size {
            return false;
        }
        self.highlighted -= page_size;
        true
    }

    /// Move the highlight one page forward. On a short last page the
    /// highlight lands on its last candidate.
    pub fn page_down(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        let next_page_start = (self.highlighted / page_size + 1) * page_size;
        if next_page_start >= self.candidates.len() {
            return false;
        }
        self.highlighted = (self.highlighted + page_size).min(self.candidates.len() - 1);
        true
    }

    /// Start of the page holding the highlight.
    pub fn page_start(&self, page_size: usize) -> usize {
        let page_size = page_size.max(1);
        self.highlighted / page_size * page_size
    }

    /// Build page `page_number` at `page_size`, or `None` past the end.
    pub fn create_page(&self, page_size: usize, page_number: usize) -> Option<Page> {
        if page_size == 0 {
            return None;
        }
        let start = page_number.checked_mul(page_size)?;
        if start >= self.candidates.len() {
            return None;
        }
        let end = (start + page_size).min(self.candidates.len());
        Some(Page {
            page_size,
            page_number,
            is_last_page: end == self.candidates.len(),
            candidates: self.candidates[start..end]
                .iter()
                .map(|c| PageCandidate {
                    text: c.text.clone(),
                    comment: c.comment.clone(),
                })
                .collect(),
        })
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.highlighted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(n: usize) -> CandidateList {
        let mut list = CandidateList::new();
        list.set_candidates((0..n).map(|i| Candidate::new(format!("c{i}"))).collect());
        list
    }

    #[test]
    fn test_create_page() {
        let list = list(12);
        let page = list.create_page(5, 1).unwrap();
        assert_eq!(page.page_number, 1);
        assert_eq!(page.candidates.len(), 5);
        assert_eq!(page.candidates[0].text, "c5");
        assert!(!page.is_last_page);

        let last = list.create_page(5, 2).unwrap();
        assert_eq!(last.candidates.len(), 2);
        assert!(last.is_last_page);

        assert!(list.create_page(5, 3).is_none());
        assert!(list.create_page(0, 0).is_none());
    }

    #[test]
    fn test_exact_last_page() {
        let page = list(10).create_page(5, 1).unwrap();
        assert!(page.is_last_page);
    }

    #[test]
    fn test_empty_list_has_no_page() {
        assert!(CandidateList::new().create_page(5, 0).is_none());
    }

    #[test]
    fn test_cursor_moves_across_pages() {
        let mut list = list(7);
        for _ in 0..5 {
            assert!(list.cursor_down());
        }
        assert_eq!(list.highlighted(), 5);
        assert_eq!(list.page_start(5), 5);
        assert!(list.cursor_down());
        assert!(!list.cursor_down());
        assert_eq!(list.highlighted(), 6);
        assert!(list.cursor_up());
        assert_eq!(list.highlighted(), 5);
    }

    #[test]
    fn test_page_down_and_up() {
        let mut list = list(12);
        list.highlight(2);
        assert!(list.page_down(5));
        assert_eq!(list.highlighted(), 7);
        assert!(list.page_down(5));
        assert_eq!(list.highlighted(), 11);
        assert!(!list.page_down(5));
        assert!(list.page_up(5));
        assert_eq!(list.highlighted(), 6);
        assert!(list.page_up(5));
        assert_eq!(list.highlighted(), 1);
        assert!(!list.page_up(5));
    }

    #[test]
    fn test_set_candidates_resets_highlight() {
        let mut list = list(6);
        list.highlight(4);
        list.set_candidates(vec![Candidate::new("x")]);
        assert_eq!(list.highlighted(), 0);
        assert_eq!(list.highlighted_candidate().unwrap().text, "x");
    }

    #[test]
    fn test_highlight_out_of_range() {
        let mut list = list(3);
        assert!(!list.highlight(3));
        assert_eq!(list.highlighted(), 0);
    }
}
