use crate::sched::Schedule;
use crate::task::Runnable;

/// A scheduler that runs tasks on the calling thread, before `schedule` returns.
///
/// No concurrency is involved: scheduling a task and running it are one continuous control flow.
/// This is useful for forcing deterministic execution or ordering a task strictly relative to its
/// caller.
///
/// Use [`inline_scheduler`] to get the shared instance.
///
/// [`inline_scheduler`]: fn.inline_scheduler.html
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineScheduler {
    _private: (),
}

impl Schedule for InlineScheduler {
    #[inline]
    fn schedule(&self, task: Runnable) {
        task.run();
    }
}

/// Returns the scheduler that runs tasks immediately on the calling thread.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// use async_sched::{inline_scheduler, task};
///
/// let flag = Arc::new(AtomicBool::new(false));
/// let f = flag.clone();
/// let _handle = task::spawn_on(inline_scheduler(), move || f.store(true, Ordering::SeqCst));
///
/// assert!(flag.load(Ordering::SeqCst));
/// ```
#[inline]
pub fn inline_scheduler() -> &'static InlineScheduler {
    static INSTANCE: InlineScheduler = InlineScheduler { _private: () };
    &INSTANCE
}
