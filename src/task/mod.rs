//! Task handles.
//!
//! A task is a closure packaged for a scheduler. [`create`] splits it into two halves: a
//! [`Runnable`], which a scheduler eventually runs exactly once, and a [`JoinHandle`], which waits
//! for the result.
//!
//! # Examples
//!
//! Spawn a task and wait for its result:
//!
//! ```
//! use async_sched::task;
//!
//! let handle = task::spawn(|| 1 + 2);
//! assert_eq!(handle.join(), Some(3));
//! ```
//!
//! [`create`]: fn.create.html
//! [`Runnable`]: struct.Runnable.html
//! [`JoinHandle`]: struct.JoinHandle.html

pub use join_handle::JoinHandle;
pub use runnable::{current_id, Runnable};
pub use spawn::{create, spawn_on};
pub use task_id::TaskId;

cfg_default! {
    pub use spawn::spawn;
}

pub(crate) use header::Header;

mod header;
mod join_handle;
mod runnable;
mod spawn;
mod state;
mod task_id;
