//! Blocking on tasks.
//!
//! Waiting for a task is delegated to the current thread's [`WaitHandler`]. Ordinary threads use
//! [`SleepWaitHandler`], which puts the thread to sleep until the task finishes. Pool workers use
//! [`PoolWaitHandler`], which keeps running other pool tasks in the meantime. That way a worker
//! waiting on a task that is still queued in its own pool does not deadlock, and the pool does
//! not lose a worker to a long wait.
//!
//! The handler is chosen per thread with [`set_thread_wait_handler`], based on the role of the
//! thread rather than on the task being waited for.
//!
//! # Examples
//!
//! A handler that counts how often the current thread had to wait:
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use async_sched::wait::{self, WaitHandler, WaitTask};
//! use async_sched::{task, thread_scheduler};
//!
//! struct Counting(AtomicUsize);
//!
//! impl WaitHandler for Counting {
//!     fn wait(&self, task: &WaitTask<'_>) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         task.block();
//!     }
//! }
//!
//! static COUNTING: Counting = Counting(AtomicUsize::new(0));
//!
//! let previous = wait::set_thread_wait_handler(&COUNTING);
//! let handle = task::spawn_on(thread_scheduler(), || std::thread::sleep(std::time::Duration::from_millis(10)));
//! handle.wait();
//! wait::set_thread_wait_handler(previous);
//!
//! assert!(COUNTING.0.load(Ordering::SeqCst) <= 1);
//! ```
//!
//! [`WaitHandler`]: trait.WaitHandler.html
//! [`SleepWaitHandler`]: struct.SleepWaitHandler.html
//! [`PoolWaitHandler`]: struct.PoolWaitHandler.html
//! [`set_thread_wait_handler`]: fn.set_thread_wait_handler.html

use std::cell::Cell;
use std::fmt;
use std::time::Duration;

use crossbeam_utils::sync::Parker;
use kv_log_macro::trace;
use log::log_enabled;

use crate::task::{Header, JoinHandle, TaskId};

pub use pool::PoolWaitHandler;
pub use sleep::SleepWaitHandler;

mod pool;
mod sleep;

/// A strategy for blocking the current thread until a task finishes.
///
/// A handler is called only when the task has not finished yet. It should return once
/// [`WaitTask::is_ready`] is `true`; if it returns earlier, the caller falls back to sleeping.
///
/// [`WaitTask::is_ready`]: struct.WaitTask.html#method.is_ready
pub trait WaitHandler: Sync {
    /// Blocks until `task` is ready.
    fn wait(&self, task: &WaitTask<'_>);
}

/// A task that a thread is waiting for, as seen by a [`WaitHandler`].
///
/// [`WaitHandler`]: trait.WaitHandler.html
pub struct WaitTask<'a> {
    header: &'a Header,

    /// The parker of the waiting thread.
    parker: &'a Parker,

    /// Set once the parker has been registered with the task.
    registered: Cell<bool>,
}

impl<'a> WaitTask<'a> {
    fn new(header: &'a Header, parker: &'a Parker) -> WaitTask<'a> {
        WaitTask {
            header,
            parker,
            registered: Cell::new(false),
        }
    }

    /// Returns the identifier of the task.
    pub fn id(&self) -> TaskId {
        self.header.id()
    }

    /// Returns `true` if the task has finished, either by completing or by being dropped.
    pub fn is_ready(&self) -> bool {
        self.header.is_finished()
    }

    /// Puts the current thread to sleep until the task is ready.
    pub fn block(&self) {
        while self.register() && !self.is_ready() {
            self.parker.park();
        }
    }

    /// Puts the current thread to sleep until the task is ready or `timeout` elapses.
    ///
    /// Returns `true` if the task is ready.
    pub fn block_timeout(&self, timeout: Duration) -> bool {
        if self.register() && !self.is_ready() {
            self.parker.park_timeout(timeout);
        }
        self.is_ready()
    }

    /// Makes sure the task unparks this thread when it finishes.
    ///
    /// Returns `false` if the task has already finished.
    fn register(&self) -> bool {
        if self.registered.get() {
            return true;
        }

        let registered = self.header.register(self.parker.unparker());
        self.registered.set(registered);
        registered
    }
}

impl fmt::Debug for WaitTask<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitTask")
            .field("header", self.header)
            .field("registered", &self.registered.get())
            .finish()
    }
}

thread_local! {
    /// The wait handler of the current thread.
    static HANDLER: Cell<&'static dyn WaitHandler> =
        Cell::new(&SleepWaitHandler as &'static dyn WaitHandler);
}

/// Sets the wait handler of the current thread and returns the previous one.
///
/// Every thread starts with [`SleepWaitHandler`]. Pool workers install [`PoolWaitHandler`] for
/// themselves.
///
/// [`SleepWaitHandler`]: struct.SleepWaitHandler.html
/// [`PoolWaitHandler`]: struct.PoolWaitHandler.html
pub fn set_thread_wait_handler(handler: &'static dyn WaitHandler) -> &'static dyn WaitHandler {
    HANDLER.with(|h| h.replace(handler))
}

/// Returns the wait handler of the current thread.
pub fn thread_wait_handler() -> &'static dyn WaitHandler {
    HANDLER.with(|h| h.get())
}

/// Blocks the current thread until the task behind `handle` finishes.
///
/// Returns immediately if it already has. This is the same as [`JoinHandle::wait`].
///
/// [`JoinHandle::wait`]: ../task/struct.JoinHandle.html#method.wait
pub fn wait_for_task<T>(handle: &JoinHandle<T>) {
    handle.wait();
}

pub(crate) fn wait_for_header(header: &Header) {
    thread_local! {
        // May hold a parker that can be reused for efficiency.
        //
        // Note that each wait needs its own parker. In particular, if a wait handler runs a task
        // that waits on another task, the nested wait must use a distinct parker instance.
        static CACHE: Cell<Option<Parker>> = Cell::new(None);
    }

    if header.is_finished() {
        return;
    }

    if log_enabled!(log::Level::Trace) {
        trace!("wait", {
            task_id: header.id().as_u64(),
        });
    }

    CACHE.with(|cache| {
        // Reuse a cached parker or create a new one for this wait.
        let parker = cache.take().unwrap_or_else(Parker::new);

        {
            let task = WaitTask::new(header, &parker);
            thread_wait_handler().wait(&task);

            // The handler may give up early; sleep for the rest.
            task.block();
        }

        // Save the parker for the next wait.
        cache.set(Some(parker));
    });
}
