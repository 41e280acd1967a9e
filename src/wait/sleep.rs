use crate::wait::{WaitHandler, WaitTask};

/// Puts the waiting thread to sleep until the task finishes.
///
/// This is the wait handler of every thread that does not install another one.
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepWaitHandler;

impl WaitHandler for SleepWaitHandler {
    fn wait(&self, task: &WaitTask<'_>) {
        task.block();
    }
}
