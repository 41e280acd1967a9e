use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

use crate::sched::Schedule;
use crate::task::Runnable;

/// A scheduler that holds tasks in a queue until a thread explicitly runs them.
///
/// This scheduler never starts threads. Tasks run only inside [`try_run_one_task`] or
/// [`run_all_tasks`], on the thread that calls them, which makes it a good fit for test harnesses
/// and single-threaded event loops.
///
/// Both scheduling and running are thread-safe. Tasks scheduled from one thread run in the order
/// they were scheduled.
///
/// Tasks still queued when the scheduler is dropped are dropped without running.
///
/// # Examples
///
/// ```
/// use async_sched::{task, FifoScheduler};
///
/// let fifo = FifoScheduler::new();
/// let a = task::spawn_on(&fifo, || 'a');
/// let b = task::spawn_on(&fifo, || 'b');
/// assert!(!a.is_ready());
///
/// fifo.run_all_tasks();
/// assert_eq!(a.join(), Some('a'));
/// assert_eq!(b.join(), Some('b'));
/// ```
///
/// [`try_run_one_task`]: #method.try_run_one_task
/// [`run_all_tasks`]: #method.run_all_tasks
pub struct FifoScheduler {
    /// Pending tasks, oldest first.
    queue: Mutex<VecDeque<Runnable>>,
}

impl FifoScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> FifoScheduler {
        FifoScheduler {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Runs the oldest pending task on the current thread.
    ///
    /// Returns `false` if there was nothing to run.
    pub fn try_run_one_task(&self) -> bool {
        // The task must run with the lock released, since it may schedule more work here.
        let task = self.queue.lock().unwrap().pop_front();

        match task {
            Some(task) => {
                task.run();
                true
            }
            None => false,
        }
    }

    /// Runs pending tasks on the current thread until the queue is empty.
    ///
    /// Tasks scheduled by the tasks being run are run as well.
    pub fn run_all_tasks(&self) {
        while self.try_run_one_task() {}
    }

    /// Returns the number of pending tasks.
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Returns `true` if no task is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Schedule for FifoScheduler {
    fn schedule(&self, task: Runnable) {
        self.queue.lock().unwrap().push_back(task);
    }
}

impl Default for FifoScheduler {
    fn default() -> FifoScheduler {
        FifoScheduler::new()
    }
}

impl fmt::Debug for FifoScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoScheduler")
            .field("pending", &self.len())
            .finish()
    }
}
