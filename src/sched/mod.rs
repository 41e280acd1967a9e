//! Schedulers.
//!
//! A scheduler is anything that implements [`Schedule`]: it accepts a [`Runnable`] and promises to
//! run it at some point. Nothing else is required, there is no common base type. Code that works
//! with any scheduler is written against the trait:
//!
//! ```
//! use async_sched::{task, Schedule};
//!
//! fn answer<S: Schedule + ?Sized>(sched: &S) -> i32 {
//!     task::spawn_on(sched, || 42).join().unwrap()
//! }
//!
//! assert_eq!(answer(async_sched::inline_scheduler()), 42);
//! assert_eq!(answer(async_sched::thread_scheduler()), 42);
//! ```
//!
//! The crate ships four strategies:
//!
//! * [`InlineScheduler`] runs tasks immediately on the calling thread.
//! * [`ThreadScheduler`] starts a new thread for every task.
//! * [`FifoScheduler`] queues tasks until a caller explicitly drains them.
//! * [`ThreadPool`] runs tasks on a fixed set of work-stealing worker threads.
//!
//! [`SchedulerRef`] erases the concrete type of a scheduler without taking ownership of it.
//!
//! [`Schedule`]: trait.Schedule.html
//! [`Runnable`]: ../task/struct.Runnable.html
//! [`InlineScheduler`]: struct.InlineScheduler.html
//! [`ThreadScheduler`]: struct.ThreadScheduler.html
//! [`FifoScheduler`]: struct.FifoScheduler.html
//! [`ThreadPool`]: struct.ThreadPool.html
//! [`SchedulerRef`]: struct.SchedulerRef.html

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::task::Runnable;

pub use fifo::FifoScheduler;
pub use inline::{inline_scheduler, InlineScheduler};
pub use pool::{Builder, ThreadPool};
pub use thread::{thread_scheduler, ThreadScheduler};

cfg_default! {
    pub use default::{default_scheduler, NUM_THREADS_ENV};
}

pub(crate) use pool::{is_worker, run_one_task};

mod fifo;
mod inline;
mod pool;
mod thread;

cfg_default! {
    mod default;
}

/// A scheduler.
///
/// Implementors accept a task and guarantee that it will eventually be [run], exactly once, by
/// exactly one thread. Scheduling never fails and never waits for the task to finish, except for
/// schedulers like [`InlineScheduler`] whose whole point is to run the task right away.
///
/// Every operation that makes a type a scheduler is checked at compile time: passing a type that
/// does not implement `Schedule` where a scheduler is expected is a type error.
///
/// # Examples
///
/// A scheduler that counts tasks before forwarding them:
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use async_sched::task::{self, Runnable};
/// use async_sched::{inline_scheduler, Schedule};
///
/// struct Counting(AtomicUsize);
///
/// impl Schedule for Counting {
///     fn schedule(&self, task: Runnable) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///         inline_scheduler().schedule(task);
///     }
/// }
///
/// let sched = Counting(AtomicUsize::new(0));
/// task::spawn_on(&sched, || ()).join();
/// assert_eq!(sched.0.load(Ordering::SeqCst), 1);
/// ```
///
/// [run]: ../task/struct.Runnable.html#method.run
/// [`InlineScheduler`]: struct.InlineScheduler.html
pub trait Schedule {
    /// Accepts a task for execution.
    fn schedule(&self, task: Runnable);
}

impl<S: Schedule + ?Sized> Schedule for &S {
    #[inline]
    fn schedule(&self, task: Runnable) {
        (**self).schedule(task)
    }
}

impl<S: Schedule + ?Sized> Schedule for Box<S> {
    #[inline]
    fn schedule(&self, task: Runnable) {
        (**self).schedule(task)
    }
}

impl<S: Schedule + ?Sized> Schedule for Rc<S> {
    #[inline]
    fn schedule(&self, task: Runnable) {
        (**self).schedule(task)
    }
}

impl<S: Schedule + ?Sized> Schedule for Arc<S> {
    #[inline]
    fn schedule(&self, task: Runnable) {
        (**self).schedule(task)
    }
}

/// Hands a freshly created task to a scheduler.
///
/// This is how producers submit work. Schedulers that forward tasks to other schedulers should
/// call [`Schedule::schedule`] directly instead.
///
/// # Panics
///
/// Panics if the task has already been handed to a scheduler through this function.
///
/// [`Schedule::schedule`]: trait.Schedule.html#tymethod.schedule
pub fn schedule_task<S: Schedule + ?Sized>(sched: &S, task: Runnable) {
    task.header().mark_scheduled();
    sched.schedule(task);
}

/// A non-owning, type-erased reference to a scheduler.
///
/// `SchedulerRef` is itself a scheduler that forwards every task to the scheduler it was built
/// from. It does not allocate and is as cheap to copy as a reference. The lifetime ties it to the
/// referenced scheduler, so it cannot outlive it.
///
/// # Examples
///
/// ```
/// use async_sched::{task, FifoScheduler, SchedulerRef};
///
/// let fifo = FifoScheduler::new();
/// let scheds = [
///     SchedulerRef::new(async_sched::inline_scheduler()),
///     SchedulerRef::new(&fifo),
/// ];
///
/// let handles: Vec<_> = scheds.iter().map(|s| task::spawn_on(s, || 1)).collect();
/// fifo.run_all_tasks();
///
/// let sum: i32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
/// assert_eq!(sum, 2);
/// ```
#[derive(Clone, Copy)]
pub struct SchedulerRef<'a> {
    sched: &'a (dyn Schedule + Sync),
}

impl<'a> SchedulerRef<'a> {
    /// Wraps a reference to a scheduler.
    #[inline]
    pub fn new<S: Schedule + Sync>(sched: &'a S) -> SchedulerRef<'a> {
        SchedulerRef { sched }
    }
}

impl Schedule for SchedulerRef<'_> {
    #[inline]
    fn schedule(&self, task: Runnable) {
        self.sched.schedule(task)
    }
}

impl fmt::Debug for SchedulerRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerRef")
            .field("sched", &(self.sched as *const (dyn Schedule + Sync) as *const ()))
            .finish()
    }
}
