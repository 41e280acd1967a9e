//! Task lifecycle flags.
//!
//! A task moves through `Created -> Scheduled -> Running -> Completed` and never goes back. A task
//! whose runnable is dropped before it gets to run ends up in `CLOSED` instead of `COMPLETED`.

/// The task was created but not yet handed to a scheduler.
///
/// This is the empty state, no flag is set.
pub(crate) const CREATED: usize = 0;

/// Set once the task has been handed to a scheduler.
pub(crate) const SCHEDULED: usize = 1 << 0;

/// Set while the task body is executing.
pub(crate) const RUNNING: usize = 1 << 1;

/// Set when the task body has returned (or panicked) and its output is stored.
pub(crate) const COMPLETED: usize = 1 << 2;

/// Set when the runnable was dropped without running, for example because its scheduler was
/// destroyed with the task still queued.
pub(crate) const CLOSED: usize = 1 << 3;

/// Either terminal flag.
pub(crate) const FINISHED: usize = COMPLETED | CLOSED;
