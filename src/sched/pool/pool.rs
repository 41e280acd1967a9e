use std::cell::Cell;
use std::fmt;
use std::io;
use std::iter;
use std::ptr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_deque::{Injector, Steal, Stealer, Worker};
use kv_log_macro::trace;

use crate::sched::pool::{Builder, Sleepers};
use crate::sched::Schedule;
use crate::task::Runnable;
use crate::utils::{abort_on_panic, random};
use crate::wait::{self, PoolWaitHandler};

/// State shared between a pool handle and its workers.
struct Shared {
    /// The global queue of tasks, fed by threads outside the pool.
    injector: Injector<Runnable>,

    /// Handles to local queues for stealing work from worker threads.
    stealers: Vec<Stealer<Runnable>>,

    /// Used for putting idle workers to sleep and notifying them when new tasks come in.
    sleepers: Sleepers,
}

/// A work-stealing thread pool.
///
/// The pool starts a fixed number of worker threads, each with its own task queue. A task
/// scheduled from one of the workers goes into that worker's queue; a task scheduled from any
/// other thread goes into a global queue. Idle workers take work from their own queue first
/// (newest task first), then steal from their peers (oldest task first), then take from the
/// global queue.
///
/// Dropping the pool shuts the workers down and joins them. Tasks that are already running finish,
/// but tasks still queued are dropped without running. Wait on the tasks you need before dropping
/// the pool. A pool dropped from one of its own tasks does not join its workers; they exit in the
/// background once their current task returns.
///
/// # Examples
///
/// ```
/// use async_sched::{task, ThreadPool};
///
/// let pool = ThreadPool::new(4);
/// let handles: Vec<_> = (0..10).map(|i| task::spawn_on(&pool, move || i * 2)).collect();
///
/// let sum: i32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
/// assert_eq!(sum, 90);
/// ```
pub struct ThreadPool {
    shared: Arc<Shared>,
    threads: Vec<thread::JoinHandle<()>>,
}

impl ThreadPool {
    /// Creates a thread pool with the given number of worker threads.
    ///
    /// Zero is treated as one.
    ///
    /// # Panics
    ///
    /// Panics if a worker thread cannot be started. Use [`Builder::spawn`] to handle that error.
    ///
    /// [`Builder::spawn`]: struct.Builder.html#method.spawn
    pub fn new(num_threads: usize) -> ThreadPool {
        Builder::new()
            .num_threads(num_threads)
            .spawn()
            .expect("cannot start a worker thread")
    }

    /// Returns a builder for configuring a new thread pool.
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn start(num_threads: usize, name: String) -> io::Result<ThreadPool> {
        let workers: Vec<Worker<Runnable>> =
            (0..num_threads).map(|_| Worker::new_lifo()).collect();
        let stealers = workers.iter().map(|w| w.stealer()).collect();

        let shared = Arc::new(Shared {
            injector: Injector::new(),
            stealers,
            sleepers: Sleepers::new(),
        });

        // If a spawn fails below, dropping `pool` shuts down the workers started so far.
        let mut pool = ThreadPool {
            shared: shared.clone(),
            threads: Vec::with_capacity(num_threads),
        };

        for (index, worker) in workers.into_iter().enumerate() {
            let proc = Processor {
                shared: shared.clone(),
                worker,
                index,
            };

            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || abort_on_panic(|| proc.run()))?;
            pool.threads.push(handle);
        }

        trace!("pool started", {
            num_threads: num_threads,
        });

        Ok(pool)
    }

    /// Returns the number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.shared.stealers.len()
    }

    /// Returns `true` if the current thread is one of this pool's workers.
    pub fn is_worker_thread(&self) -> bool {
        get_processor(|p| Arc::ptr_eq(&p.shared, &self.shared)).unwrap_or(false)
    }
}

impl Schedule for ThreadPool {
    fn schedule(&self, task: Runnable) {
        PROCESSOR.with(|proc| {
            // If the current thread is a worker of this pool, push the task into its local queue.
            // Otherwise, push it into the global queue.
            match unsafe { proc.get().as_ref() } {
                Some(proc) if Arc::ptr_eq(&proc.shared, &self.shared) => proc.worker.push(task),
                _ => self.shared.injector.push(task),
            }
        });
        self.shared.sleepers.notify_one();
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        trace!("pool shutting down", {
            num_threads: self.num_threads(),
        });

        self.shared.sleepers.shut_down();

        // Inside one of its own tasks, joining any worker may wait on a peer that is itself
        // waiting for this task. Detach them all instead; they exit once their current task
        // returns.
        if self.is_worker_thread() {
            self.threads.clear();
            return;
        }

        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("num_threads", &self.num_threads())
            .field("shut_down", &self.shared.sleepers.is_shut_down())
            .finish()
    }
}

/// The state of a worker thread.
struct Processor {
    /// The pool this worker belongs to.
    shared: Arc<Shared>,

    /// The local task queue.
    worker: Worker<Runnable>,

    /// Position of this worker in `shared.stealers`.
    index: usize,
}

thread_local! {
    /// The processor of the current thread, if it is a pool worker.
    static PROCESSOR: Cell<*const Processor> = Cell::new(ptr::null());
}

fn set_processor<F, R>(proc: *const Processor, f: F) -> R
where
    F: FnOnce() -> R,
{
    struct ResetProcessor<'a>(&'a Cell<*const Processor>);

    impl Drop for ResetProcessor<'_> {
        fn drop(&mut self) {
            self.0.set(ptr::null());
        }
    }

    PROCESSOR.with(|p| {
        p.set(proc);
        let _guard = ResetProcessor(p);

        f()
    })
}

fn get_processor<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&Processor) -> R,
{
    let res = PROCESSOR.try_with(|proc| unsafe { proc.get().as_ref().map(f) });

    match res {
        Ok(Some(val)) => Some(val),
        Ok(None) | Err(_) => None,
    }
}

/// Returns `true` if the current thread is a worker of any pool.
pub(crate) fn is_worker() -> bool {
    get_processor(|_| ()).is_some()
}

/// Runs one task from the current worker's pool, if the current thread is a worker.
///
/// Returns `false` if the current thread is not a pool worker or no task was found.
pub(crate) fn run_one_task() -> bool {
    match get_processor(|proc| proc.find_task()) {
        Some(Some(task)) => {
            task.run();
            true
        }
        _ => false,
    }
}

impl Processor {
    /// Runs the worker on the current thread until the pool shuts down.
    fn run(self) {
        trace!("worker started", {
            worker: self.index,
        });

        wait::set_thread_wait_handler(&PoolWaitHandler);
        set_processor(&self, || self.main_loop());

        trace!("worker stopped", {
            worker: self.index,
            dropped: self.worker.len(),
        });
    }

    fn main_loop(&self) {
        /// Number of yields when no runnable task is found.
        const YIELDS: u32 = 3;
        /// Number of short sleeps when no runnable task is found.
        const SLEEPS: u32 = 1;

        // The number of times the thread didn't find work in a row.
        let mut fails = 0;

        while !self.shared.sleepers.is_shut_down() {
            match self.find_task() {
                Some(task) => {
                    fails = 0;
                    task.run();
                }
                None => {
                    fails += 1;

                    // Yield the current thread or put it to sleep.
                    if fails <= YIELDS {
                        thread::yield_now();
                    } else if fails <= YIELDS + SLEEPS {
                        thread::sleep(Duration::from_micros(10));
                    } else {
                        self.shared.sleepers.wait();
                        fails = 0;
                    }
                }
            }
        }
    }

    /// Finds the next runnable task.
    fn find_task(&self) -> Option<Runnable> {
        // Pop a task from the local queue, if not empty.
        self.worker.pop().or_else(|| {
            // Otherwise, we need to look for a task elsewhere.
            iter::repeat_with(|| {
                // Try stealing a batch of tasks from one of the other workers.
                self.steal_from_others()
                    // Or try stealing a batch of tasks from the global queue.
                    .or_else(|| self.shared.injector.steal_batch_and_pop(&self.worker))
            })
            // Loop while no task was stolen and any steal operation needs to be retried.
            .find(|s| !s.is_retry())
            // Extract the stolen task, if there is one.
            .and_then(|s| s.success())
            .map(|task| {
                // A batch steal may have left more tasks in the local queue. Wake someone up to
                // steal them, this worker is about to be busy.
                if !self.worker.is_empty() {
                    self.shared.sleepers.notify_one();
                }
                task
            })
        })
    }

    /// Steals a batch of tasks from the other workers.
    fn steal_from_others(&self) -> Steal<Runnable> {
        let stealers = &self.shared.stealers;

        // Pick a random starting point in the list of local queues.
        let len = stealers.len();
        let start = random(len as u32) as usize;

        // Visit every other queue once, starting from the chosen point.
        (start..len)
            .chain(0..start)
            .filter(|&i| i != self.index)
            .map(|i| stealers[i].steal_batch_and_pop(&self.worker))
            .collect()
    }
}
