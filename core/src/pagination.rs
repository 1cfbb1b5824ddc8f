//! Client-side pagination over an already-fetched transaction list.
//!
//! Navigation never fails: out-of-range requests are clamped, both when they
//! are made and again whenever the view is derived, so a list that shrank
//! underneath a stored index still renders a valid page.

use std::num::NonZeroUsize;

use serde::Serialize;

use crate::types::Transaction;

pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Page sizes offered in the page-size picker.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [8, 10, 20, 50];

/// What happens to the page index when the page size changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSizePolicy {
    /// Keep the index if it is still valid, otherwise move to the last page.
    #[default]
    PreserveIndex,
    /// Always go back to the first page.
    ResetToFirst,
}

impl std::str::FromStr for PageSizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preserve" | "preserve-index" => Ok(Self::PreserveIndex),
            "reset" | "reset-to-first" => Ok(Self::ResetToFirst),
            other => Err(format!(
                "Unknown page size policy: '{other}'. Use 'preserve' or 'reset'."
            )),
        }
    }
}

impl std::fmt::Display for PageSizePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreserveIndex => write!(f, "preserve"),
            Self::ResetToFirst => write!(f, "reset"),
        }
    }
}

/// Current page index and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    page_index: usize,
    page_size: NonZeroUsize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    /// A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: NonZeroUsize::new(page_size).unwrap_or(NonZeroUsize::MIN),
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// `ceil(item_count / page_size)`, zero for an empty list.
    pub fn page_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.page_size.get())
    }

    /// The stored index clamped into `0..max(page_count, 1)`.
    pub fn effective_index(&self, item_count: usize) -> usize {
        let last = self.page_count(item_count).saturating_sub(1);
        self.page_index.min(last)
    }

    /// Jump to a page. Negative indices land on the first page, indices past
    /// the end on the last.
    pub fn go_to(&mut self, index: i64, item_count: usize) {
        self.page_index = usize::try_from(index.max(0)).unwrap_or(usize::MAX);
        self.reclamp(item_count);
    }

    pub fn next(&mut self, item_count: usize) {
        self.page_index = self.effective_index(item_count).saturating_add(1);
        self.reclamp(item_count);
    }

    pub fn previous(&mut self, item_count: usize) {
        self.page_index = self.effective_index(item_count).saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.page_index = 0;
    }

    pub fn last(&mut self, item_count: usize) {
        self.page_index = self.page_count(item_count).saturating_sub(1);
    }

    /// Change the page size and re-clamp the index according to `policy`.
    pub fn set_page_size(&mut self, page_size: usize, item_count: usize, policy: PageSizePolicy) {
        self.page_size = NonZeroUsize::new(page_size).unwrap_or(NonZeroUsize::MIN);
        match policy {
            PageSizePolicy::PreserveIndex => self.reclamp(item_count),
            PageSizePolicy::ResetToFirst => self.page_index = 0,
        }
    }

    /// Restore `page_index < max(page_count, 1)` after the item count changed.
    pub fn reclamp(&mut self, item_count: usize) {
        self.page_index = self.effective_index(item_count);
    }
}

/// Derived, render-ready view of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView<T = Transaction> {
    pub items: Vec<T>,
    /// Effective (clamped) zero-based index.
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total_items: usize,
    /// Offset of `items[0]` within the full list.
    pub offset: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

impl<T> PageView<T> {
    /// Human-readable position, e.g. `Page 2 of 3`. An empty list reads
    /// `Page 1 of 1`.
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count.max(1))
    }
}

/// Slice `items` according to `state`. Pure: the same inputs always yield
/// the same view, and `items` is never reordered.
pub fn page<T: Clone>(items: &[T], state: &PaginationState) -> PageView<T> {
    let total = items.len();
    let page_count = state.page_count(total);
    let page_index = state.effective_index(total);
    let size = state.page_size();

    let start = page_index.saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);

    PageView {
        items: items[start..end].to_vec(),
        page_index,
        page_size: size,
        page_count,
        total_items: total,
        offset: start,
        can_previous: page_index > 0,
        can_next: page_index + 1 < page_count,
    }
}
