use std::thread;

use kv_log_macro::error;

use crate::sched::Schedule;
use crate::task::Runnable;
use crate::utils::abort_on_panic;

/// A scheduler that starts a dedicated thread for every task.
///
/// The thread runs that one task and exits. There is no pooling and no limit on how many such
/// threads exist at once, which makes this scheduler a good fit for long blocking work that would
/// otherwise tie up a pool worker.
///
/// The threads are detached and not waited for at process exit. Join the tasks you care about
/// before returning from `main`.
///
/// Use [`thread_scheduler`] to get the shared instance.
///
/// [`thread_scheduler`]: fn.thread_scheduler.html
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadScheduler {
    _private: (),
}

impl Schedule for ThreadScheduler {
    fn schedule(&self, task: Runnable) {
        let id = task.id();

        let res = thread::Builder::new()
            .name("async-sched/thread".to_string())
            .spawn(move || abort_on_panic(|| task.run()));

        // On failure the closure is dropped along with the task, which closes it and wakes its
        // waiters.
        if let Err(err) = res {
            error!("cannot start a task thread: {}", err, {
                task_id: id.as_u64(),
            });
        }
    }
}

/// Returns the scheduler that runs every task on its own new thread.
///
/// # Examples
///
/// ```
/// use std::thread;
///
/// use async_sched::{task, thread_scheduler};
///
/// let main = thread::current().id();
/// let handle = task::spawn_on(thread_scheduler(), move || thread::current().id() != main);
/// assert_eq!(handle.join(), Some(true));
/// ```
#[inline]
pub fn thread_scheduler() -> &'static ThreadScheduler {
    static INSTANCE: ThreadScheduler = ThreadScheduler { _private: () };
    &INSTANCE
}
