//! Prints the scheduler's execution log on the standard output.

use async_sched::{task, ThreadPool};

fn main() {
    femme::start(log::LevelFilter::Trace).unwrap();

    let pool = ThreadPool::new(2);
    let handle = task::spawn_on(&pool, || {
        log::info!("Hello world!");
    });

    handle.join();
}
