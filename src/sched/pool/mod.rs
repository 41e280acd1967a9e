//! Work-stealing thread pool.
//!
//! API bindings between `crate::sched::pool` and the rest of the crate are very simple:
//!
//! * The exports are `ThreadPool`, its `Builder`, and `is_worker`/`run_one_task` for the wait
//!   protocol.
//! * The imports are the `crate::task::Runnable` type and the `crate::wait::PoolWaitHandler`
//!   that every worker installs for itself.

pub use builder::Builder;
pub use pool::ThreadPool;

pub(crate) use pool::{is_worker, run_one_task};

use sleepers::Sleepers;

mod builder;
mod pool;
mod sleepers;
