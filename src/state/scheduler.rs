//! Single-slot background scheduler.
//!
//! Each scheduler owns one slot. Submitting a job marks the job previously in
//! the slot as superseded:
//! - a superseded job that has not started yet never runs
//! - a job that is already running is left alone; it is expected to notice
//!   supersession itself (scans do so through their generation check)

use crate::model::ScheduleError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::debug;

#[derive(Debug, Default)]
struct JobState {
    started: AtomicBool,
    superseded: AtomicBool,
}

/// Handle to a submitted job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    state: Arc<JobState>,
}

impl JobHandle {
    /// True once the job began running.
    pub fn is_started(&self) -> bool {
        self.state.started.load(Ordering::Acquire)
    }

    /// True once a later job was submitted to the same scheduler.
    pub fn is_superseded(&self) -> bool {
        self.state.superseded.load(Ordering::Acquire)
    }
}

/// Runs at most one pending job per instance on background threads.
#[derive(Debug)]
pub struct ScanScheduler {
    name: String,
    slot: Mutex<Option<JobHandle>>,
}

impl ScanScheduler {
    /// `name` is given to the worker threads.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: Mutex::new(None),
        }
    }

    /// Run `job` on a worker thread, superseding the previously submitted job.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::Spawn` if the worker thread can not be created.
    pub fn submit<F>(&self, job: F) -> Result<JobHandle, ScheduleError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = JobHandle {
            state: Arc::new(JobState::default()),
        };

        let mut slot = self.slot.lock();
        if let Some(previous) = slot.replace(handle.clone()) {
            previous.state.superseded.store(true, Ordering::Release);
            debug!(
                scheduler = %self.name,
                previous_started = previous.is_started(),
                "superseding previous job"
            );
        }

        let state = Arc::clone(&handle.state);
        thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || {
                if state.superseded.load(Ordering::Acquire) {
                    debug!("skipping job superseded before it started");
                    return;
                }
                state.started.store(true, Ordering::Release);
                job();
            })?;

        Ok(handle)
    }

    /// Handle of the most recently submitted job.
    pub fn current(&self) -> Option<JobHandle> {
        self.slot.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn submitted_job_runs() {
        let scheduler = ScanScheduler::new("test-scan");
        let (tx, rx) = mpsc::channel();

        scheduler
            .submit(move || tx.send(42).expect("receiver alive"))
            .expect("spawn");

        assert_eq!(rx.recv_timeout(TIMEOUT), Ok(42));
    }

    #[test]
    fn new_submission_supersedes_previous_handle() {
        let scheduler = ScanScheduler::new("test-scan");
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();

        let first = scheduler
            .submit(move || {
                started_tx.send(()).expect("receiver alive");
                release_rx.recv_timeout(TIMEOUT).expect("released");
                done_tx.send("first").expect("receiver alive");
            })
            .expect("spawn");
        started_rx.recv_timeout(TIMEOUT).expect("first job started");

        let second = scheduler.submit(|| {}).expect("spawn");

        assert!(first.is_started());
        assert!(first.is_superseded());
        assert!(!second.is_superseded());

        // A running job is not interrupted.
        release_tx.send(()).expect("job alive");
        assert_eq!(done_rx.recv_timeout(TIMEOUT), Ok("first"));
    }

    #[test]
    fn current_tracks_latest_submission() {
        let scheduler = ScanScheduler::new("test-scan");
        assert!(scheduler.current().is_none());

        let handle = scheduler.submit(|| {}).expect("spawn");
        let current = scheduler.current().expect("slot filled");

        assert!(Arc::ptr_eq(&current.state, &handle.state));
    }
}
