//! Cancellation token for one scan generation.

use crate::model::ScanAbort;
use crate::state::SearchResult;
use std::sync::Arc;

/// Ties a scan to the generation it started with.
///
/// The token is the scan's only view of cancellation: once another scan
/// starts on the same result, [`check`](Self::check) fails.
#[derive(Debug, Clone)]
pub struct ScanToken {
    result: Arc<SearchResult>,
    generation: u64,
}

impl ScanToken {
    pub(crate) fn new(result: Arc<SearchResult>, generation: u64) -> Self {
        Self { result, generation }
    }

    /// Generation this token was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The result being scanned into.
    pub fn result(&self) -> &Arc<SearchResult> {
        &self.result
    }

    /// True until another scan starts on the result.
    pub fn is_current(&self) -> bool {
        self.result.is_current(self.generation)
    }

    /// Fails with `StaleGeneration` once another scan started.
    pub fn check(&self) -> Result<(), ScanAbort> {
        self.result.check_generation(self.generation)
    }

    /// Guard that stops the result updating when dropped, on every exit path
    /// including unwinding. Has no effect once the generation is stale.
    pub fn finish_on_drop(&self) -> FinishGuard<'_> {
        FinishGuard { token: self }
    }
}

/// Stops updating for its token's generation when dropped.
#[must_use = "dropping the guard immediately stops updating"]
#[derive(Debug)]
pub struct FinishGuard<'a> {
    token: &'a ScanToken,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.token.result.finish(self.token.generation);
    }
}
