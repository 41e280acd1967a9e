use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crossbeam_utils::sync::Unparker;

use crate::task::state::*;
use crate::task::TaskId;

/// The state shared by every holder of a task.
///
/// A runnable, its join handle and any thread parked on it each keep an `Arc<Header>`, so the
/// header lives until the last of them lets go.
pub(crate) struct Header {
    /// The task identifier.
    id: TaskId,

    /// Lifecycle flags, see `crate::task::state`.
    state: AtomicUsize,

    /// Threads parked until the task finishes.
    ///
    /// The list is drained exactly once, when the task completes or is closed.
    waiters: Mutex<Vec<Unparker>>,
}

impl Header {
    /// Creates the header of a fresh task.
    pub(crate) fn new() -> Header {
        Header {
            id: TaskId::generate(),
            state: AtomicUsize::new(CREATED),
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Returns the task identifier.
    #[inline]
    pub(crate) fn id(&self) -> TaskId {
        self.id
    }

    /// Returns `true` if the task has completed or was closed.
    #[inline]
    pub(crate) fn is_finished(&self) -> bool {
        self.state.load(Ordering::Acquire) & FINISHED != 0
    }

    /// Returns `true` if the task body ran to the end.
    #[inline]
    pub(crate) fn is_completed(&self) -> bool {
        self.state.load(Ordering::Acquire) & COMPLETED != 0
    }

    /// Moves the task from `Created` to `Scheduled`.
    ///
    /// # Panics
    ///
    /// Panics if the task was already handed to a scheduler.
    pub(crate) fn mark_scheduled(&self) {
        if let Err(state) = self.state.compare_exchange(
            CREATED,
            SCHEDULED,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            panic!(
                "task {} scheduled twice (state: {:#b})",
                self.id, state
            );
        }
    }

    /// Marks the task as running.
    ///
    /// Tasks handed straight to `Schedule::schedule` skip the `Scheduled` step, so both `Created`
    /// and `Scheduled` are valid starting points.
    pub(crate) fn mark_running(&self) {
        let state = self.state.fetch_or(RUNNING, Ordering::AcqRel);
        debug_assert_eq!(state & (RUNNING | FINISHED), 0, "task {} ran twice", self.id);
    }

    /// Marks the task as completed and wakes every waiter.
    pub(crate) fn complete(&self) {
        self.finish(COMPLETED);
    }

    /// Marks the task as closed without having run, and wakes every waiter.
    pub(crate) fn close(&self) {
        self.finish(CLOSED);
    }

    fn finish(&self, flag: usize) {
        // The flag is published under the waiters lock so that `register` either sees it or ends
        // up in the list that gets drained here.
        let waiters = {
            let mut waiters = self.waiters.lock().unwrap();
            self.state.fetch_or(flag, Ordering::AcqRel);
            std::mem::take(&mut *waiters)
        };

        for unparker in waiters {
            unparker.unpark();
        }
    }

    /// Registers a thread to be unparked when the task finishes.
    ///
    /// Returns `false` without registering anything if the task has already finished.
    pub(crate) fn register(&self, unparker: &Unparker) -> bool {
        let mut waiters = self.waiters.lock().unwrap();
        if self.is_finished() {
            return false;
        }
        waiters.push(unparker.clone());
        true
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.load(Ordering::SeqCst);

        f.debug_struct("Header")
            .field("id", &self.id)
            .field("scheduled", &(state & SCHEDULED != 0))
            .field("running", &(state & RUNNING != 0))
            .field("completed", &(state & COMPLETED != 0))
            .field("closed", &(state & CLOSED != 0))
            .finish()
    }
}
