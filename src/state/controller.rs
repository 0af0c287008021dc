//! Search controller.
//!
//! Bridges the two execution contexts:
//! - `update_result` hands a scan to the worker context through the
//!   single-slot [`ScanScheduler`]
//! - finished scans post a [`ScanCompletion`] back over a channel; the UI
//!   context picks it up in [`SearchController::dispatch_pending`] and makes
//!   the initial selection
//! - `move_cursor` runs synchronously on the UI context
//!
//! The controller holds the receiving end of the channel, so it is `Send` but
//! not `Sync`: only one thread can act as the UI context.

use crate::grid::{DataGrid, GridView};
use crate::matcher::{Matcher, SearchQuery};
use crate::model::{NavigationDirection, ScanAbort, ScheduleError, ScrollPolicy, SearchMatch};
use crate::state::{ScanScheduler, ScanToken, SearchResult};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Margin (pixels) around a newly selected cell when scrolling it into view.
pub const SCROLL_MARGIN: i32 = 100;

/// Summary of a scan that published its matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanCompletion {
    /// Generation of the scan.
    pub generation: u64,
    /// Number of matches published.
    pub match_count: usize,
    /// Whether the scan stopped at the match limit.
    pub truncated: bool,
}

/// Matches collected by one pass over the grid.
#[derive(Debug, Default)]
pub(crate) struct CollectedMatches {
    pub matches: Vec<SearchMatch>,
    pub truncated: bool,
}

/// Offset to resume matching from after a match at `start..end`.
///
/// Zero-width matches advance by one character so the scan always progresses.
fn resume_offset(text: &str, start: usize, end: usize) -> usize {
    if end > start {
        return end;
    }
    text.get(end..)
        .and_then(|rest| rest.chars().next())
        .map_or(text.len() + 1, |c| end + c.len_utf8())
}

/// Walk the grid row-major and collect every match of `query`.
///
/// Checks `token` before each match is appended and the grid's modification
/// count before each row.
pub(crate) fn collect_matches(
    grid: &dyn DataGrid,
    matcher: &dyn Matcher,
    query: &SearchQuery,
    token: &ScanToken,
    limit: Option<usize>,
) -> Result<CollectedMatches, ScanAbort> {
    let baseline = grid.modification_count();
    let mut collected = CollectedMatches::default();

    for row in 0..grid.row_count() {
        if grid.modification_count() != baseline {
            return Err(ScanAbort::StructuralConflict { row });
        }
        let cells = grid
            .row_cells(row)
            .ok_or(ScanAbort::StructuralConflict { row })?;

        for cell in cells {
            if cell.text.is_empty() {
                continue;
            }
            let mut offset = 0;
            while offset <= cell.text.len() {
                let Some((start, end)) = matcher.find_next(&cell.text, offset, query) else {
                    break;
                };
                if start < offset || end < start {
                    debug!(
                        cell = %cell.cell,
                        start,
                        end,
                        offset,
                        "matcher went backwards, skipping rest of cell"
                    );
                    break;
                }
                token.check()?;
                if limit.is_some_and(|limit| collected.matches.len() >= limit) {
                    collected.truncated = true;
                    return Ok(collected);
                }
                collected.matches.push(SearchMatch::new(cell.cell, start, end));
                offset = resume_offset(&cell.text, start, end);
            }
        }
    }

    Ok(collected)
}

/// Everything a scan needs on the worker context.
///
/// The generation is allocated on the submitting thread so that submission
/// order decides which scan is newest.
struct ScanJob {
    generation: u64,
    grid: Arc<dyn DataGrid>,
    matcher: Arc<dyn Matcher>,
    result: Arc<SearchResult>,
    query: SearchQuery,
    completions: Sender<ScanCompletion>,
}

impl ScanJob {
    fn run(self) {
        let generation = self.generation;
        let Some(token) = self.result.start_scan(generation) else {
            debug!(generation, "skipping scan superseded before it started");
            return;
        };
        debug!(generation, query = self.query.as_str(), "scan started");

        let published = {
            let _finish = token.finish_on_drop();
            collect_matches(
                self.grid.as_ref(),
                self.matcher.as_ref(),
                &self.query,
                &token,
                self.result.match_limit(),
            )
            .and_then(|collected| {
                let truncated = collected.truncated;
                self.result
                    .publish(generation, collected.matches, truncated)
                    .map(|match_count| ScanCompletion {
                        generation,
                        match_count,
                        truncated,
                    })
            })
        };

        match published {
            Ok(completion) => {
                info!(
                    generation,
                    matches = completion.match_count,
                    truncated = completion.truncated,
                    "scan published"
                );
                if self.completions.send(completion).is_err() {
                    debug!(generation, "controller dropped before scan completed");
                }
            }
            Err(abort) => debug!(generation, %abort, "scan aborted"),
        }
    }
}

/// Runs scans for one grid and applies their results on the UI context.
pub struct SearchController {
    grid: Arc<dyn DataGrid>,
    matcher: Arc<dyn Matcher>,
    result: Arc<SearchResult>,
    scheduler: ScanScheduler,
    completions_tx: Sender<ScanCompletion>,
    completions_rx: Receiver<ScanCompletion>,
}

impl SearchController {
    /// Controller scanning `grid` with `matcher` into `result`.
    pub fn new(
        grid: Arc<dyn DataGrid>,
        result: Arc<SearchResult>,
        matcher: Arc<dyn Matcher>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();
        Self {
            grid,
            matcher,
            result,
            scheduler: ScanScheduler::new("gridfind-scan"),
            completions_tx,
            completions_rx,
        }
    }

    /// The result scans publish into.
    pub fn result(&self) -> &Arc<SearchResult> {
        &self.result
    }

    /// The grid being searched.
    pub fn grid(&self) -> &Arc<dyn DataGrid> {
        &self.grid
    }

    /// Schedule a rescan of the grid for `query` on the worker context.
    ///
    /// Supersedes a previously scheduled scan that has not started yet. A scan
    /// that is already running aborts at its next generation check once the
    /// new scan starts. Scans start in submission order: an older scan that
    /// reaches the worker after a newer one was submitted does nothing.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` if the worker could not be started.
    pub fn update_result(&self, query: SearchQuery) -> Result<(), ScheduleError> {
        let job = self.scan_job(query);
        self.scheduler.submit(move || job.run())?;
        Ok(())
    }

    fn scan_job(&self, query: SearchQuery) -> ScanJob {
        ScanJob {
            generation: self.result.next_generation(),
            grid: Arc::clone(&self.grid),
            matcher: Arc::clone(&self.matcher),
            result: Arc::clone(&self.result),
            query,
            completions: self.completions_tx.clone(),
        }
    }

    /// Run the UI continuation of every scan that finished so far.
    ///
    /// Returns the number of continuations that were applied. Never blocks.
    pub fn dispatch_pending(&self, view: &mut dyn GridView) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.complete(completion, view) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until a current scan finishes (or `timeout` passes) and run its
    /// UI continuation.
    pub fn wait_and_dispatch(
        &self,
        view: &mut dyn GridView,
        timeout: Duration,
    ) -> Option<ScanCompletion> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.completions_rx.recv_timeout(remaining) {
                Ok(completion) => {
                    if self.complete(completion, view) {
                        return Some(completion);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    /// Move the selection to the next or previous match in row-major order.
    pub fn move_cursor(
        &self,
        direction: NavigationDirection,
        view: &mut dyn GridView,
    ) -> Option<SearchMatch> {
        let policy = ScrollPolicy::Horizontal;
        let old_selection = self.result.selected();
        let selection = match direction {
            NavigationDirection::Forward => self.result.select_next(policy),
            NavigationDirection::Backward => self.result.select_previous(policy),
        };
        update_selection(view, old_selection, selection);
        selection
    }

    fn complete(&self, completion: ScanCompletion, view: &mut dyn GridView) -> bool {
        if !self.result.is_current(completion.generation) {
            debug!(
                generation = completion.generation,
                "dropping continuation of superseded scan"
            );
            return false;
        }

        let (row, column) = view.cursor();
        view.cancel_edit_actions();
        view.clear_selection();
        view.repaint_all();

        let old_selection = self.result.selected();
        let selection = self.result.select_first(
            row.unwrap_or(0),
            column.unwrap_or(0),
            ScrollPolicy::Horizontal,
        );
        update_selection(view, old_selection, selection);
        self.result.notify_listeners();
        true
    }
}

/// Repaint the previously selected cell and bring the new one into view.
fn update_selection(
    view: &mut dyn GridView,
    old_selection: Option<SearchMatch>,
    selection: Option<SearchMatch>,
) {
    if let Some(old) = old_selection {
        let rect = view.cell_rect(old.cell());
        view.repaint(rect);
    }
    if let Some(new) = selection {
        let rect = view.cell_rect(new.cell());
        view.repaint(rect);
        view.scroll_rect_to_visible(rect.grow(SCROLL_MARGIN, SCROLL_MARGIN));
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
