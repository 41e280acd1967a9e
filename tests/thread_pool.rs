use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::Duration;

use async_sched::{task, Schedule, ThreadPool};

// Runs `tasks` tasks on a pool of `threads` workers and checks every id shows up exactly once.
fn run_ids(threads: usize, tasks: usize) {
    let pool = ThreadPool::new(threads);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..tasks)
        .map(|i| {
            let seen = seen.clone();
            task::spawn_on(&pool, move || seen.lock().unwrap().push(i))
        })
        .collect();

    for h in handles {
        assert_eq!(h.join(), Some(()));
    }

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, (0..tasks).collect::<Vec<_>>());
}

#[test]
fn many_more_tasks_than_workers() {
    run_ids(4, 10_000);
}

#[test]
fn fewer_tasks_than_workers() {
    run_ids(8, 3);
}

#[test]
fn single_worker() {
    run_ids(1, 1000);
}

#[test]
fn zero_threads_means_one() {
    let pool = ThreadPool::new(0);
    assert_eq!(pool.num_threads(), 1);
    assert_eq!(task::spawn_on(&pool, || 1).join(), Some(1));
}

#[test]
fn tasks_spawned_from_workers() {
    let pool = Arc::new(ThreadPool::new(4));
    let count = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let pool2 = pool.clone();
            let count = count.clone();
            task::spawn_on(&*pool, move || {
                assert!(pool2.is_worker_thread());

                // Children go into this worker's local queue and may be stolen by others.
                let children: Vec<_> = (0..10)
                    .map(|_| {
                        let count = count.clone();
                        task::spawn_on(&*pool2, move || {
                            count.fetch_add(1, Ordering::SeqCst);
                        })
                    })
                    .collect();
                children
            })
        })
        .collect();

    for h in handles {
        for child in h.join().unwrap() {
            child.join();
        }
    }

    assert_eq!(count.load(Ordering::SeqCst), 1000);
    assert!(!pool.is_worker_thread());
}

#[test]
fn work_is_spread_across_workers() {
    let pool = ThreadPool::new(4);
    let barrier = Arc::new(Barrier::new(4));
    let threads = Arc::new(Mutex::new(HashSet::new()));

    // Each task blocks until all four run at the same time, which requires four distinct workers.
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let barrier = barrier.clone();
            let threads = threads.clone();
            task::spawn_on(&pool, move || {
                threads.lock().unwrap().insert(thread::current().id());
                barrier.wait();
            })
        })
        .collect();

    for h in handles {
        h.join();
    }
    assert_eq!(threads.lock().unwrap().len(), 4);
}

#[test]
fn panicking_task_does_not_kill_worker() {
    let pool = ThreadPool::new(1);

    let bad = task::spawn_on(&pool, || panic!("boom"));
    let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| bad.join()));
    assert!(res.is_err());

    assert_eq!(task::spawn_on(&pool, || 2).join(), Some(2));
}

#[test]
fn drop_with_queued_tasks() {
    struct Token {
        ran: bool,
        executed: Arc<AtomicUsize>,
        dropped: Arc<AtomicUsize>,
    }

    impl Drop for Token {
        fn drop(&mut self) {
            if !self.ran {
                self.dropped.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    const TASKS: usize = 1000;

    let executed = Arc::new(AtomicUsize::new(0));
    let dropped = Arc::new(AtomicUsize::new(0));
    let started = Arc::new(AtomicBool::new(false));

    let pool = ThreadPool::new(2);
    let mut handles = Vec::new();

    for _ in 0..TASKS {
        let mut token = Token {
            ran: false,
            executed: executed.clone(),
            dropped: dropped.clone(),
        };
        let started = started.clone();

        handles.push(task::spawn_on(&pool, move || {
            started.store(true, Ordering::SeqCst);
            token.ran = true;
            token.executed.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(1));
        }));
    }

    while !started.load(Ordering::SeqCst) {
        thread::yield_now();
    }
    drop(pool);

    let executed = executed.load(Ordering::SeqCst);
    let dropped = dropped.load(Ordering::SeqCst);
    assert!(executed >= 1);
    assert_eq!(executed + dropped, TASKS);

    // Every handle is settled: either completed or cancelled, never both.
    let completed = handles.iter().filter(|h| h.is_ready() && !h.is_cancelled()).count();
    let cancelled = handles.iter().filter(|h| h.is_cancelled()).count();
    assert_eq!(completed, executed);
    assert_eq!(cancelled, dropped);
}

#[test]
fn drop_from_worker_while_peer_waits() {
    let pool = Arc::new(ThreadPool::new(2));
    let slot = Arc::new(Mutex::new(None));
    let barrier = Arc::new(Barrier::new(2));
    let waiting = Arc::new(AtomicBool::new(false));
    let (handle_tx, handle_rx) = mpsc::channel::<task::JoinHandle<()>>();
    let (done_tx, done_rx) = mpsc::channel();

    // Both tasks meet at the barrier, so they run on different workers.
    let waiter = {
        let barrier = barrier.clone();
        let waiting = waiting.clone();
        task::spawn_on(&*pool, move || {
            barrier.wait();
            let handle = handle_rx.recv().unwrap();
            waiting.store(true, Ordering::SeqCst);
            handle.wait();
        })
    };

    let dropper = {
        let slot = slot.clone();
        task::spawn_on(&*pool, move || {
            barrier.wait();
            while !waiting.load(Ordering::SeqCst) {
                thread::yield_now();
            }
            thread::sleep(Duration::from_millis(10));

            // The last reference to the pool goes away inside one of its tasks.
            let pool: Arc<ThreadPool> = slot.lock().unwrap().take().unwrap();
            drop(pool);
            done_tx.send(()).unwrap();
        })
    };

    *slot.lock().unwrap() = Some(pool);
    handle_tx.send(dropper).unwrap();

    assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
    waiter.wait();
}

#[test]
fn drop_idle_pool() {
    let pool = ThreadPool::new(4);
    thread::sleep(Duration::from_millis(10));
    drop(pool);
}

#[test]
fn builder_names_threads() {
    let pool = ThreadPool::builder()
        .num_threads(2)
        .name("custom-worker".to_string())
        .spawn()
        .unwrap();

    let name = task::spawn_on(&pool, || thread::current().name().map(String::from));
    assert_eq!(name.join(), Some(Some("custom-worker".to_string())));
}

#[test]
fn schedule_runnable_directly() {
    let pool = ThreadPool::new(2);
    let (runnable, handle) = task::create(|| 10);
    pool.schedule(runnable);
    assert_eq!(handle.join(), Some(10));
}
