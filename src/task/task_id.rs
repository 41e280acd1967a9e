use std::fmt;

use crossbeam_utils::atomic::AtomicCell;

/// A unique identifier for a task.
///
/// # Examples
///
/// ```
/// use async_sched::{inline_scheduler, task};
///
/// let handle = task::spawn_on(inline_scheduler(), || 1 + 2);
/// println!("id = {}", handle.id());
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    /// Generates a new `TaskId`.
    pub(crate) fn generate() -> TaskId {
        static COUNTER: AtomicCell<u64> = AtomicCell::new(1u64);

        let id = COUNTER.fetch_add(1);
        if id > u64::max_value() / 2 {
            std::process::abort();
        }
        TaskId(id)
    }

    /// Returns the raw numeric value of this identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
