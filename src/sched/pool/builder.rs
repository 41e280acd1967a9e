use std::io;

use crate::sched::pool::ThreadPool;

/// Thread pool builder that configures the settings of a new [`ThreadPool`].
///
/// # Examples
///
/// ```
/// use async_sched::{task, ThreadPool};
///
/// let pool = ThreadPool::builder()
///     .num_threads(2)
///     .name("my-pool".to_string())
///     .spawn()
///     .expect("cannot start the pool");
///
/// assert_eq!(pool.num_threads(), 2);
/// assert_eq!(task::spawn_on(&pool, || 7).join(), Some(7));
/// ```
///
/// [`ThreadPool`]: struct.ThreadPool.html
#[derive(Debug, Default)]
pub struct Builder {
    pub(crate) num_threads: Option<usize>,
    pub(crate) name: Option<String>,
}

impl Builder {
    /// Creates a new builder.
    #[inline]
    pub fn new() -> Builder {
        Builder {
            num_threads: None,
            name: None,
        }
    }

    /// Configures the number of worker threads.
    ///
    /// Defaults to the number of CPUs. Zero is treated as one.
    #[inline]
    pub fn num_threads(mut self, num_threads: usize) -> Builder {
        self.num_threads = Some(num_threads);
        self
    }

    /// Configures the name given to the worker threads.
    #[inline]
    pub fn name(mut self, name: String) -> Builder {
        self.name = Some(name);
        self
    }

    /// Starts a thread pool with the configured settings.
    ///
    /// Fails if the operating system refuses to start a worker thread. Workers started before the
    /// failure are shut down again.
    pub fn spawn(self) -> io::Result<ThreadPool> {
        let num_threads = self.num_threads.unwrap_or_else(num_cpus::get).max(1);
        let name = self
            .name
            .unwrap_or_else(|| "async-sched/worker".to_string());

        ThreadPool::start(num_threads, name)
    }
}
