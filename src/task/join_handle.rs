use std::fmt;
use std::panic;
use std::sync::{Arc, Mutex};
use std::thread;

use crate::task::header::Header;
use crate::task::TaskId;
use crate::wait;

/// The output slot a task body writes into and its join handle reads from.
pub(crate) struct Packet<T> {
    result: Mutex<Option<thread::Result<T>>>,
}

impl<T> Packet<T> {
    pub(crate) fn new() -> Packet<T> {
        Packet {
            result: Mutex::new(None),
        }
    }

    pub(crate) fn set(&self, result: thread::Result<T>) {
        *self.result.lock().unwrap() = Some(result);
    }

    fn take(&self) -> Option<thread::Result<T>> {
        self.result.lock().unwrap().take()
    }
}

/// A handle that awaits the result of a task.
///
/// Dropping a `JoinHandle` detaches the task: it still runs, and its output is discarded.
///
/// # Examples
///
/// ```
/// use async_sched::{task, ThreadPool};
///
/// let pool = ThreadPool::new(2);
/// let handle = task::spawn_on(&pool, || 1 + 2);
/// assert_eq!(handle.join(), Some(3));
/// ```
pub struct JoinHandle<T> {
    header: Arc<Header>,
    packet: Arc<Packet<T>>,
}

impl<T> JoinHandle<T> {
    pub(crate) fn new(header: Arc<Header>, packet: Arc<Packet<T>>) -> JoinHandle<T> {
        JoinHandle { header, packet }
    }

    /// Returns the identifier of the task.
    pub fn id(&self) -> TaskId {
        self.header.id()
    }

    /// Returns `true` if the task has either completed or been dropped without running.
    ///
    /// Once this returns `true`, [`wait`] and [`join`] do not block.
    ///
    /// [`wait`]: #method.wait
    /// [`join`]: #method.join
    pub fn is_ready(&self) -> bool {
        self.header.is_finished()
    }

    /// Returns `true` if the task was dropped by its scheduler without ever running.
    pub fn is_cancelled(&self) -> bool {
        self.header.is_finished() && !self.header.is_completed()
    }

    /// Blocks the current thread until the task finishes.
    ///
    /// How the thread blocks is decided by its [wait handler]. Pool workers keep running other
    /// pool tasks while they wait.
    ///
    /// [wait handler]: ../wait/index.html
    pub fn wait(&self) {
        wait::wait_for_header(&self.header);
    }

    /// Waits for the task and returns its output.
    ///
    /// Returns `None` if the task was dropped without running.
    ///
    /// # Panics
    ///
    /// If the task body panicked, the panic is resumed on the current thread.
    pub fn join(self) -> Option<T> {
        self.wait();

        match self.packet.take()? {
            Ok(val) => Some(val),
            Err(err) => panic::resume_unwind(err),
        }
    }
}

impl<T> fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinHandle")
            .field("header", &*self.header)
            .finish()
    }
}
