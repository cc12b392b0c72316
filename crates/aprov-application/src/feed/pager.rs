//! Paging state shared by every appendable list.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use aprov_core::paging::Page;

/// What a fetch call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was fetched and applied.
    Loaded { page: u32, count: usize },
    /// Another fetch on the same list was in flight; this one was dropped.
    Skipped,
    /// Nothing left to load.
    Exhausted,
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Items fetched so far under one key, plus the cursor.
#[derive(Debug, Clone)]
pub struct PageState<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub has_next: bool,
    pub error: Option<String>,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            has_next: false,
            error: None,
        }
    }
}

impl<T> PageState<T> {
    /// 1 on reset, otherwise the page after the current one.
    pub fn target_page(&self, reset: bool) -> u32 {
        if reset { 1 } else { self.current_page + 1 }
    }

    /// Replaces (reset) or extends the list with `page`.
    pub fn apply(&mut self, page: Page<T>, page_number: u32, reset: bool) -> usize {
        let count = page.items.len();
        if reset {
            self.items = page.items;
        } else {
            self.items.extend(page.items);
        }
        self.current_page = page_number;
        self.has_next = page.has_next;
        self.error = None;
        count
    }

    /// Keeps the list as it is; only the message changes.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Single-flight flag: a second acquire while held fails instead of waiting.
#[derive(Debug, Default)]
pub struct InFlight(AtomicBool);

impl InFlight {
    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the flag on drop, including on early returns.
pub struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Counts overlapping runs; active while at least one is held.
#[derive(Debug, Default)]
pub struct ActiveCount(AtomicUsize);

impl ActiveCount {
    pub fn enter(&self) -> ActiveCountGuard<'_> {
        self.0.fetch_add(1, Ordering::AcqRel);
        ActiveCountGuard(&self.0)
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire) > 0
    }
}

pub struct ActiveCountGuard<'a>(&'a AtomicUsize);

impl Drop for ActiveCountGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
