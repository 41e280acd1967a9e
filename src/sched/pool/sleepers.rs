use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

/// The place where idle worker threads go to sleep.
///
/// Similar to how thread parking works, if a notification comes up while no threads are sleeping,
/// the next thread that attempts to go to sleep will pick up the notification immediately.
///
/// Sleepers also carry the shutdown signal of the pool: once shut down, nobody goes to sleep here
/// anymore.
pub(crate) struct Sleepers {
    /// Sleeping threads and the wakeups handed out to them.
    sleep: Mutex<Sleep>,

    /// A condvar for notifying sleeping threads.
    wake: Condvar,

    /// Set to `true` if a notification came up while nobody was sleeping.
    notified: AtomicBool,

    /// Set to `true` when the pool is shutting down.
    shutdown: AtomicBool,
}

#[derive(Default)]
struct Sleep {
    /// How many threads are asleep and not yet notified.
    sleeping: usize,

    /// Notifications sent to sleeping threads but not yet consumed by them.
    wakeups: usize,
}

impl Sleepers {
    /// Creates a new `Sleepers`.
    pub(crate) fn new() -> Sleepers {
        Sleepers {
            sleep: Mutex::new(Sleep::default()),
            wake: Condvar::new(),
            notified: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Puts the current thread to sleep until notified or shut down.
    pub(crate) fn wait(&self) {
        let mut sleep = self.sleep.lock().unwrap();

        if self.shutdown.load(Ordering::SeqCst) || self.notified.swap(false, Ordering::SeqCst) {
            return;
        }

        sleep.sleeping += 1;
        loop {
            // The notifier has already taken this thread off the sleeping count.
            if sleep.wakeups > 0 {
                sleep.wakeups -= 1;
                return;
            }

            if self.shutdown.load(Ordering::SeqCst) {
                sleep.sleeping -= 1;
                return;
            }

            sleep = self.wake.wait(sleep).unwrap();
        }
    }

    /// Notifies one thread.
    pub(crate) fn notify_one(&self) {
        if !self.notified.load(Ordering::SeqCst) {
            let mut sleep = self.sleep.lock().unwrap();

            if sleep.sleeping > 0 {
                sleep.sleeping -= 1;
                sleep.wakeups += 1;
                self.wake.notify_one();
            } else {
                self.notified.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Wakes every sleeping thread and prevents new ones from going to sleep.
    pub(crate) fn shut_down(&self) {
        let _sleep = self.sleep.lock().unwrap();
        self.shutdown.store(true, Ordering::SeqCst);
        self.wake.notify_all();
    }

    /// Returns `true` once `shut_down` has been called.
    #[inline]
    pub(crate) fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}
