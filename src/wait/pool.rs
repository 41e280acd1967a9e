use std::time::Duration;

use crossbeam_utils::Backoff;

use crate::sched;
use crate::wait::{WaitHandler, WaitTask};

/// Keeps a pool worker busy with other pool tasks while it waits.
///
/// Between checks of the awaited task, the worker runs tasks from its own queue, then from its
/// peers, then from the global queue of its pool. When there is nothing to run it backs off and
/// finally parks with a growing timeout, since new pool work does not wake it up.
///
/// On a thread that is not a pool worker this behaves like [`SleepWaitHandler`].
///
/// [`SleepWaitHandler`]: struct.SleepWaitHandler.html
#[derive(Debug, Default, Clone, Copy)]
pub struct PoolWaitHandler;

impl WaitHandler for PoolWaitHandler {
    fn wait(&self, task: &WaitTask<'_>) {
        /// Shortest park once spinning is over.
        const MIN_PARK: Duration = Duration::from_micros(10);
        /// Longest park, so that new pool work is picked up reasonably fast.
        const MAX_PARK: Duration = Duration::from_millis(1);

        if !sched::is_worker() {
            task.block();
            return;
        }

        let backoff = Backoff::new();
        let mut park = MIN_PARK;

        while !task.is_ready() {
            if sched::run_one_task() {
                backoff.reset();
                park = MIN_PARK;
                continue;
            }

            if !backoff.is_completed() {
                backoff.snooze();
            } else if !task.block_timeout(park) {
                park = (park * 2).min(MAX_PARK);
            }
        }
    }
}
