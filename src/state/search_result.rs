//! Generation-tagged search result.
//!
//! A `SearchResult` lives as long as the grid it belongs to and is reset in
//! place for every scan. The scan (worker context) and the UI share it through
//! an `Arc`:
//!
//! - the generation is an atomic, so stale scans detect supersession without
//!   taking a lock
//! - everything else sits behind one `RwLock`, which makes the handoff between
//!   the publishing scan and UI-side navigation explicit
//!
//! State machine: `IDLE → UPDATING (start_updating) → IDLE (stop_updating)`.
//! Navigation is a no-op while updating.

use crate::model::navigation::Anchor;
use crate::model::{CellRef, ScanAbort, ScrollPolicy, SearchMatch};
use crate::state::ScanToken;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

// ===== Listener =====

/// Receives a notification after a scan's matches were published and the
/// initial selection was made. Carries no payload; re-read the result.
pub trait SearchResultListener: Send + Sync {
    /// Called on the UI context after `result` changed.
    fn search_result_updated(&self, result: &SearchResult);
}

impl<F> SearchResultListener for F
where
    F: Fn(&SearchResult) + Send + Sync,
{
    fn search_result_updated(&self, result: &SearchResult) {
        self(result)
    }
}

// ===== ResultState =====

struct ResultState {
    /// Discovery order: row-major, same-cell matches contiguous.
    matches: Arc<[SearchMatch]>,
    /// Index into `matches`; always derived by navigation.
    selected: Option<usize>,
    updating: bool,
    match_limit: Option<usize>,
    truncated: bool,
}

impl Default for ResultState {
    fn default() -> Self {
        Self {
            matches: empty_matches(),
            selected: None,
            updating: false,
            match_limit: None,
            truncated: false,
        }
    }
}

fn empty_matches() -> Arc<[SearchMatch]> {
    Arc::from(Vec::<SearchMatch>::new())
}

impl ResultState {
    fn selected_match(&self) -> Option<SearchMatch> {
        self.selected.and_then(|index| self.matches.get(index).copied())
    }

    fn clear(&mut self) {
        self.selected = None;
        self.matches = empty_matches();
        self.truncated = false;
    }

    fn select(&mut self, index: Option<usize>) -> Option<SearchMatch> {
        self.selected = index;
        self.selected_match()
    }

    /// Swap in a new match list, keeping the selection only if it survives.
    fn replace_matches(&mut self, matches: Vec<SearchMatch>, truncated: bool) {
        let previous = self.selected_match();
        self.matches = Arc::from(matches);
        self.truncated = truncated;
        self.selected =
            previous.and_then(|selected| self.matches.iter().position(|m| *m == selected));
    }
}

/// Nearest match at or after `from` in reading order, wrapping to the first
/// match in reading order.
///
/// Discovery order is row-major, so under `Horizontal` this is the first
/// accepted match in sequence. Ties (same cell) resolve to the lowest offset.
fn next_index(matches: &[SearchMatch], from: Anchor, policy: ScrollPolicy) -> Option<usize> {
    let key = |(_, m): &(usize, &SearchMatch)| policy.reading_key(m.row_index(), m.column_index());
    matches
        .iter()
        .enumerate()
        .filter(|(_, m)| policy.is_at_or_after(m.row_index(), m.column_index(), from))
        .min_by_key(key)
        .or_else(|| matches.iter().enumerate().min_by_key(key))
        .map(|(index, _)| index)
}

/// Nearest match at or before `from` in reading order, wrapping to the last
/// match in reading order. Ties resolve to the highest offset.
fn previous_index(matches: &[SearchMatch], from: Anchor, policy: ScrollPolicy) -> Option<usize> {
    let key = |(_, m): &(usize, &SearchMatch)| policy.reading_key(m.row_index(), m.column_index());
    matches
        .iter()
        .enumerate()
        .filter(|(_, m)| policy.is_at_or_before(m.row_index(), m.column_index(), from))
        .max_by_key(key)
        .or_else(|| matches.iter().enumerate().max_by_key(key))
        .map(|(index, _)| index)
}

// ===== SearchResult =====

/// Matches of the latest scan plus the user's selection among them.
///
/// Shared between the scan that fills it and the UI that navigates it.
pub struct SearchResult {
    generation: AtomicU64,
    allocated: AtomicU64,
    state: RwLock<ResultState>,
    listeners: Mutex<Vec<Arc<dyn SearchResultListener>>>,
}

impl Default for SearchResult {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("SearchResult")
            .field("generation", &self.generation())
            .field("matches", &state.matches.len())
            .field("selected", &state.selected)
            .field("updating", &state.updating)
            .field("match_limit", &state.match_limit)
            .field("truncated", &state.truncated)
            .finish()
    }
}

impl SearchResult {
    /// Empty, idle result at generation 0 with no match limit.
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            allocated: AtomicU64::new(0),
            state: RwLock::new(ResultState::default()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    // ----- Queries -----

    /// Number of published matches.
    pub fn size(&self) -> usize {
        self.state.read().matches.len()
    }

    /// True if no matches are published.
    pub fn is_empty(&self) -> bool {
        self.state.read().matches.is_empty()
    }

    /// Snapshot of the published matches in discovery order.
    pub fn matches(&self) -> Arc<[SearchMatch]> {
        Arc::clone(&self.state.read().matches)
    }

    /// The selected match, if any.
    pub fn selected(&self) -> Option<SearchMatch> {
        self.state.read().selected_match()
    }

    /// 1-based index of the selected match and the total match count.
    pub fn selected_position(&self) -> Option<(usize, usize)> {
        let state = self.state.read();
        state.selected.map(|index| (index + 1, state.matches.len()))
    }

    /// Generation of the scan that last started.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// True if `generation` is the one that last started.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// True while a scan is running.
    pub fn is_updating(&self) -> bool {
        self.state.read().updating
    }

    /// True if the last publish stopped at the match limit.
    pub fn is_truncated(&self) -> bool {
        self.state.read().truncated
    }

    /// Cap applied by later scans.
    pub fn match_limit(&self) -> Option<usize> {
        self.state.read().match_limit
    }

    /// Cap the number of matches later scans collect. `None` means unlimited.
    pub fn set_match_limit(&self, limit: Option<usize>) {
        self.state.write().match_limit = limit;
    }

    // ----- Lifecycle -----

    /// Drop the selection and all matches.
    pub fn clear(&self) {
        self.state.write().clear();
    }

    /// Allocate a generation greater than any handed out or started before.
    pub fn next_generation(&self) -> u64 {
        self.allocated.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Reset for a new scan tagged `generation`.
    ///
    /// Any scan still running with an older generation fails its next
    /// [`check_generation`](Self::check_generation).
    pub fn start_updating(&self, generation: u64) {
        let mut state = self.state.write();
        self.generation.store(generation, Ordering::Release);
        self.allocated.fetch_max(generation, Ordering::AcqRel);
        state.updating = true;
        state.clear();
        trace!(generation, "search result reset for new scan");
    }

    /// Allocate a generation, start updating with it and hand back its token.
    pub fn begin_scan(self: &Arc<Self>) -> ScanToken {
        let generation = self.next_generation();
        self.start_updating(generation);
        ScanToken::new(Arc::clone(self), generation)
    }

    /// Start updating for `generation` only if it is the newest allocated one.
    ///
    /// The generation must come from [`next_generation`](Self::next_generation).
    /// Returns false without touching the result when a newer generation was
    /// allocated (or started) in the meantime.
    pub fn try_start_updating(&self, generation: u64) -> bool {
        let mut state = self.state.write();
        if self.allocated.load(Ordering::Acquire) != generation || self.generation() >= generation {
            return false;
        }
        self.generation.store(generation, Ordering::Release);
        state.updating = true;
        state.clear();
        trace!(generation, "search result reset for new scan");
        true
    }

    /// Token for a scan of a pre-allocated `generation`, or `None` if the
    /// generation was superseded before the scan could start.
    pub fn start_scan(self: &Arc<Self>, generation: u64) -> Option<ScanToken> {
        self.try_start_updating(generation)
            .then(|| ScanToken::new(Arc::clone(self), generation))
    }

    /// Fails with `StaleGeneration` if `generation` is no longer current.
    pub fn check_generation(&self, generation: u64) -> Result<(), ScanAbort> {
        let current = self.generation();
        if current == generation {
            Ok(())
        } else {
            Err(ScanAbort::StaleGeneration {
                expected: generation,
                current,
            })
        }
    }

    /// Replace the match list in one step.
    pub fn set_matches(&self, matches: Vec<SearchMatch>) {
        self.state.write().replace_matches(matches, false);
    }

    /// Replace the match list if `generation` is still current.
    ///
    /// The check and the replacement happen under one lock, so a scan that was
    /// superseded after its last check can not overwrite the newer scan.
    pub fn publish(
        &self,
        generation: u64,
        matches: Vec<SearchMatch>,
        truncated: bool,
    ) -> Result<usize, ScanAbort> {
        let mut state = self.state.write();
        self.check_generation(generation)?;
        state.replace_matches(matches, truncated);
        Ok(state.matches.len())
    }

    /// Leave the updating state. Idempotent.
    pub fn stop_updating(&self) {
        self.state.write().updating = false;
    }

    /// Stop updating on behalf of the scan tagged `generation`.
    ///
    /// A superseded scan leaves the flag to the scan that replaced it.
    /// Returns true if the flag was cleared.
    pub fn finish(&self, generation: u64) -> bool {
        let mut state = self.state.write();
        if self.is_current(generation) {
            state.updating = false;
            true
        } else {
            false
        }
    }

    // ----- Per-cell lookup -----

    /// Matches for `cell` in offset order, or `None` if the cell has none.
    ///
    /// Iterates a snapshot of the current list. Relies on same-cell matches
    /// being contiguous: iteration stops at the first match for another cell.
    pub fn matches_for_cell(&self, cell: CellRef) -> Option<CellMatches> {
        let matches = self.matches();
        let first = matches.iter().position(|m| m.cell() == cell)?;
        Some(CellMatches {
            matches,
            next: first,
            cell,
        })
    }

    // ----- Navigation -----

    /// Select the first match at or after `(from_row, from_column)`, wrapping.
    pub fn select_first(
        &self,
        from_row: usize,
        from_column: usize,
        policy: ScrollPolicy,
    ) -> Option<SearchMatch> {
        let mut state = self.state.write();
        if state.updating {
            return None;
        }
        let index = next_index(&state.matches, Anchor::at(from_row, from_column), policy);
        state.select(index)
    }

    /// Select the match after the current selection in reading order, wrapping
    /// to the first match.
    pub fn select_next(&self, policy: ScrollPolicy) -> Option<SearchMatch> {
        let mut state = self.state.write();
        if state.updating {
            return None;
        }
        let from = match state.selected_match() {
            Some(m) => policy.step(Anchor::at(m.row_index(), m.column_index()), 1),
            None => Anchor::START,
        };
        let index = next_index(&state.matches, from, policy);
        state.select(index)
    }

    /// Select the match before the current selection in reading order,
    /// wrapping to the last match.
    pub fn select_previous(&self, policy: ScrollPolicy) -> Option<SearchMatch> {
        let mut state = self.state.write();
        if state.updating {
            return None;
        }
        let from = match state.selected_match() {
            Some(m) => policy.step(Anchor::at(m.row_index(), m.column_index()), -1),
            None => Anchor::END,
        };
        let index = previous_index(&state.matches, from, policy);
        state.select(index)
    }

    // ----- Listeners -----

    /// Register `listener` for change notifications.
    pub fn add_listener(&self, listener: impl SearchResultListener + 'static) {
        self.listeners.lock().push(Arc::new(listener));
    }

    /// Call every registered listener, in registration order.
    pub fn notify_listeners(&self) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.search_result_updated(self);
        }
    }
}

// ===== CellMatches =====

/// One-shot iterator over the matches of a single cell.
#[derive(Debug, Clone)]
pub struct CellMatches {
    matches: Arc<[SearchMatch]>,
    next: usize,
    cell: CellRef,
}

impl Iterator for CellMatches {
    type Item = SearchMatch;

    fn next(&mut self) -> Option<SearchMatch> {
        let candidate = *self.matches.get(self.next)?;
        if candidate.cell() != self.cell {
            self.next = self.matches.len();
            return None;
        }
        self.next += 1;
        Some(candidate)
    }
}

impl FusedIterator for CellMatches {}

// ===== Tests =====

#[cfg(test)]
#[path = "search_result_tests.rs"]
mod tests;
