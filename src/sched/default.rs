use std::env;

use kv_log_macro::{trace, warn};
use once_cell::sync::Lazy;

use crate::sched::ThreadPool;

/// The environment variable that sets the number of threads of the default scheduler.
///
/// It is read once, when the default scheduler is first used. When it is unset or not a positive
/// integer, the number of CPUs is used instead.
pub const NUM_THREADS_ENV: &str = "ASYNC_SCHED_NUM_THREADS";

/// The default scheduler, started on first use and never shut down.
static DEFAULT: Lazy<ThreadPool> = Lazy::new(|| {
    let num_threads = num_threads();

    trace!("starting default scheduler", {
        num_threads: num_threads,
    });

    ThreadPool::builder()
        .num_threads(num_threads)
        .name("async-sched/default".to_string())
        .spawn()
        .expect("cannot start the default scheduler")
});

/// Returns the process-wide default scheduler.
///
/// This is a [`ThreadPool`] created the first time this function is called, from any thread. Its
/// size comes from the [`ASYNC_SCHED_NUM_THREADS`] environment variable, or the number of CPUs if
/// the variable is not set. The pool is never dropped.
///
/// Building with the `custom-default-scheduler` feature removes this function, so that an
/// application can provide a scheduler of its own choosing.
///
/// # Examples
///
/// ```
/// use async_sched::{default_scheduler, task};
///
/// let handle = task::spawn_on(default_scheduler(), || 1 + 2);
/// assert_eq!(handle.join(), Some(3));
/// ```
///
/// [`ThreadPool`]: struct.ThreadPool.html
/// [`ASYNC_SCHED_NUM_THREADS`]: constant.NUM_THREADS_ENV.html
pub fn default_scheduler() -> &'static ThreadPool {
    &DEFAULT
}

/// Computes the size of the default scheduler.
fn num_threads() -> usize {
    let value = env::var(NUM_THREADS_ENV).ok();

    match value.as_deref().map(parse_num_threads) {
        Some(Some(n)) => n,
        Some(None) => {
            warn!(
                "ignoring invalid value for {}: {:?}",
                NUM_THREADS_ENV,
                value.as_deref().unwrap_or_default()
            );
            num_cpus::get().max(1)
        }
        None => num_cpus::get().max(1),
    }
}

/// Parses a thread count, accepting only positive integers.
fn parse_num_threads(value: &str) -> Option<usize> {
    value.trim().parse().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod test {
    use super::parse_num_threads;

    #[test]
    fn parses_positive_counts() {
        assert_eq!(parse_num_threads("4"), Some(4));
        assert_eq!(parse_num_threads(" 16\n"), Some(16));
    }

    #[test]
    fn rejects_bad_counts() {
        assert_eq!(parse_num_threads("0"), None);
        assert_eq!(parse_num_threads("-2"), None);
        assert_eq!(parse_num_threads("many"), None);
        assert_eq!(parse_num_threads(""), None);
    }
}
