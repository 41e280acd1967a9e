//! Drives tasks from a hand-written event loop.

use std::sync::Arc;

use async_sched::{task, FifoScheduler};

fn main() {
    let fifo = Arc::new(FifoScheduler::new());

    // Each tick schedules the next one until the countdown runs out.
    fn tick(fifo: Arc<FifoScheduler>, n: u32) {
        println!("tick {}", n);
        if n > 0 {
            let next = fifo.clone();
            task::spawn_on(&*fifo, move || tick(next, n - 1));
        }
    }

    let f = fifo.clone();
    task::spawn_on(&*fifo, move || tick(f, 5));

    let mut iterations = 0;
    while fifo.try_run_one_task() {
        iterations += 1;
    }
    println!("event loop ran {} tasks", iterations);
}
