use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use kv_log_macro::trace;
use log::log_enabled;

use crate::task::header::Header;
use crate::task::TaskId;

/// A run-once handle to a task that is ready to execute.
///
/// This is what schedulers receive. Running it consumes it, so a task body can only ever execute
/// once, on whichever thread calls [`run`].
///
/// Dropping a `Runnable` without running it closes the task: the body is dropped, and anyone
/// waiting on the task wakes up and observes it as cancelled.
///
/// [`run`]: #method.run
pub struct Runnable {
    header: Arc<Header>,
    body: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Runnable {
    pub(crate) fn new(header: Arc<Header>, body: Box<dyn FnOnce() + Send + 'static>) -> Runnable {
        Runnable {
            header,
            body: Some(body),
        }
    }

    /// Returns the identifier of the task.
    pub fn id(&self) -> TaskId {
        self.header.id()
    }

    pub(crate) fn header(&self) -> &Header {
        &self.header
    }

    /// Runs the task on the current thread.
    ///
    /// Panics raised by the task body are caught and handed to whoever joins the task, so this
    /// method only returns normally.
    pub fn run(mut self) {
        let body = match self.body.take() {
            Some(body) => body,
            None => return,
        };

        self.header.mark_running();
        set_current(self.header.id(), body);
        self.header.complete();

        if log_enabled!(log::Level::Trace) {
            trace!("completed", {
                task_id: self.header.id().as_u64(),
            });
        }
    }
}

impl Drop for Runnable {
    fn drop(&mut self) {
        if let Some(body) = self.body.take() {
            // Drop the closure first so everything it captured is gone by the time waiters wake.
            drop(body);
            self.header.close();

            if log_enabled!(log::Level::Trace) {
                trace!("dropped without running", {
                    task_id: self.header.id().as_u64(),
                });
            }
        }
    }
}

impl fmt::Debug for Runnable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runnable")
            .field("header", &*self.header)
            .finish()
    }
}

thread_local! {
    /// The task whose body is executing on this thread, if any.
    static CURRENT: Cell<Option<TaskId>> = Cell::new(None);
}

fn set_current<F, R>(id: TaskId, f: F) -> R
where
    F: FnOnce() -> R,
{
    struct ResetCurrent<'a>(&'a Cell<Option<TaskId>>, Option<TaskId>);

    impl Drop for ResetCurrent<'_> {
        fn drop(&mut self) {
            self.0.set(self.1);
        }
    }

    CURRENT.with(|current| {
        let _guard = ResetCurrent(current, current.replace(Some(id)));
        f()
    })
}

/// Returns the identifier of the task running on the current thread.
///
/// Returns `None` outside of a task body.
///
/// # Examples
///
/// ```
/// use async_sched::{inline_scheduler, task};
///
/// assert_eq!(task::current_id(), None);
///
/// let handle = task::spawn_on(inline_scheduler(), || task::current_id());
/// let id = handle.id();
/// assert_eq!(handle.join(), Some(Some(id)));
/// ```
pub fn current_id() -> Option<TaskId> {
    CURRENT.try_with(|current| current.get()).ok().flatten()
}
