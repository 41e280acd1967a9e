//! Computes Fibonacci numbers with one task per recursive call.
//!
//! Workers that wait on a child task keep running other pool tasks, so this finishes even with a
//! single worker thread.

use std::env;
use std::sync::Arc;
use std::time::Instant;

use async_sched::{task, ThreadPool};

fn fib(pool: &Arc<ThreadPool>, n: u64) -> u64 {
    if n < 2 {
        return n;
    }

    let p = pool.clone();
    let a = task::spawn_on(&**pool, move || fib(&p, n - 1));
    let b = fib(pool, n - 2);
    a.join().unwrap() + b
}

fn main() {
    let n = env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);

    let pool = Arc::new(ThreadPool::new(num_cpus::get()));
    let start = Instant::now();

    let p = pool.clone();
    let result = task::spawn_on(&*pool, move || fib(&p, n)).join();
    println!("fib({}) = {:?} in {:?}", n, result, start.elapsed());
}
