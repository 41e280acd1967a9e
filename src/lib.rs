//! Pluggable task schedulers.
//!
//! This crate separates "a unit of work is ready to run" from "something decides when and where
//! it runs". Work is packaged as a [task], and any type implementing [`Schedule`] can run it:
//!
//! * [`inline_scheduler`] runs tasks immediately on the calling thread.
//! * [`thread_scheduler`] runs every task on a new thread.
//! * [`FifoScheduler`] queues tasks until some thread drains the queue.
//! * [`ThreadPool`] runs tasks on a fixed set of work-stealing worker threads.
//! * [`default_scheduler`] is a process-wide `ThreadPool` started on first use.
//!
//! Waiting on a task goes through the calling thread's [wait handler], which lets pool workers
//! keep running pool tasks while they wait instead of deadlocking the pool.
//!
//! # Examples
//!
//! Spawn a task on the default scheduler and wait for its result:
//!
//! ```
//! use async_sched::task;
//!
//! let handle = task::spawn(|| 1 + 2);
//! assert_eq!(handle.join(), Some(3));
//! ```
//!
//! Drive tasks from your own loop:
//!
//! ```
//! use async_sched::{task, FifoScheduler};
//!
//! let fifo = FifoScheduler::new();
//! let handle = task::spawn_on(&fifo, || "done");
//!
//! while fifo.try_run_one_task() {}
//! assert_eq!(handle.join(), Some("done"));
//! ```
//!
//! # Features
//!
//! With the `custom-default-scheduler` feature enabled, the crate does not define
//! [`default_scheduler`] or [`task::spawn`]. Applications that bring their own scheduler pass it
//! to [`task::spawn_on`] explicitly.
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade. Task and pool lifecycle events are emitted at the
//! `trace` level with structured key-values such as `task_id`.
//!
//! [task]: task/index.html
//! [`Schedule`]: trait.Schedule.html
//! [`inline_scheduler`]: fn.inline_scheduler.html
//! [`thread_scheduler`]: fn.thread_scheduler.html
//! [`FifoScheduler`]: struct.FifoScheduler.html
//! [`ThreadPool`]: struct.ThreadPool.html
//! [`default_scheduler`]: fn.default_scheduler.html
//! [wait handler]: wait/index.html
//! [`task::spawn`]: task/fn.spawn.html
//! [`task::spawn_on`]: task/fn.spawn_on.html
//! [`log`]: https://docs.rs/log

#![cfg_attr(feature = "docs", feature(doc_cfg))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![allow(clippy::module_inception)]
#![doc(test(attr(allow(unused_extern_crates, unused_variables))))]

#[macro_use]
mod utils;

pub mod sched;
pub mod task;
pub mod wait;

#[doc(inline)]
pub use sched::{
    inline_scheduler, schedule_task, thread_scheduler, Builder, FifoScheduler, InlineScheduler,
    Schedule, SchedulerRef, ThreadPool, ThreadScheduler,
};

cfg_default! {
    #[doc(inline)]
    pub use sched::{default_scheduler, NUM_THREADS_ENV};
}
