use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use kv_log_macro::trace;
use log::log_enabled;

use crate::sched::{self, Schedule};
use crate::task::header::Header;
use crate::task::join_handle::Packet;
use crate::task::{current_id, JoinHandle, Runnable};

/// Creates a task without scheduling it.
///
/// Returns the [`Runnable`] that executes `f` and a [`JoinHandle`] for its result. This is the
/// entry point for producers that hand tasks to schedulers themselves.
///
/// # Examples
///
/// ```
/// use async_sched::{task, FifoScheduler, Schedule};
///
/// let fifo = FifoScheduler::new();
/// let (runnable, handle) = task::create(|| "hello");
///
/// fifo.schedule(runnable);
/// fifo.run_all_tasks();
/// assert_eq!(handle.join(), Some("hello"));
/// ```
///
/// [`Runnable`]: struct.Runnable.html
/// [`JoinHandle`]: struct.JoinHandle.html
pub fn create<F, T>(f: F) -> (Runnable, JoinHandle<T>)
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let header = Arc::new(Header::new());
    let packet = Arc::new(Packet::new());

    if log_enabled!(log::Level::Trace) {
        trace!("spawn", {
            task_id: header.id().as_u64(),
            parent_task_id: current_id().map(|id| id.as_u64()).unwrap_or(0),
        });
    }

    let body = {
        let packet = packet.clone();
        Box::new(move || packet.set(panic::catch_unwind(AssertUnwindSafe(f))))
    };

    let runnable = Runnable::new(header.clone(), body);
    (runnable, JoinHandle::new(header, packet))
}

/// Spawns a task onto the given scheduler.
///
/// # Examples
///
/// ```
/// use async_sched::{task, thread_scheduler};
///
/// let handle = task::spawn_on(thread_scheduler(), || 6 * 7);
/// assert_eq!(handle.join(), Some(42));
/// ```
pub fn spawn_on<S, F, T>(sched: &S, f: F) -> JoinHandle<T>
where
    S: Schedule + ?Sized,
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (runnable, handle) = create(f);
    sched::schedule_task(sched, runnable);
    handle
}

cfg_default! {
    /// Spawns a task onto the [default scheduler].
    ///
    /// # Examples
    ///
    /// ```
    /// use async_sched::task;
    ///
    /// let handle = task::spawn(|| 1 + 2);
    /// assert_eq!(handle.join(), Some(3));
    /// ```
    ///
    /// [default scheduler]: ../fn.default_scheduler.html
    pub fn spawn<F, T>(f: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        spawn_on(sched::default_scheduler(), f)
    }
}
