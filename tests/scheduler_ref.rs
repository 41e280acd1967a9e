use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_sched::task::{self, Runnable};
use async_sched::{inline_scheduler, FifoScheduler, Schedule, SchedulerRef, ThreadPool};

/// A scheduler that records task ids and runs them inline.
#[derive(Default)]
struct Recording {
    ids: Mutex<Vec<u64>>,
}

impl Schedule for Recording {
    fn schedule(&self, task: Runnable) {
        self.ids.lock().unwrap().push(task.id().as_u64());
        task.run();
    }
}

#[test]
fn forwards_to_unrelated_schedulers() {
    let recording = Recording::default();
    let fifo = FifoScheduler::new();

    let a = SchedulerRef::new(&recording);
    let b = SchedulerRef::new(&fifo);

    let h1 = task::spawn_on(&a, || 1);
    let h2 = task::spawn_on(&b, || 2);

    // The recording scheduler saw and ran its task.
    assert_eq!(*recording.ids.lock().unwrap(), [h1.id().as_u64()]);
    assert!(h1.is_ready());

    // The FIFO scheduler holds its task until drained.
    assert!(!h2.is_ready());
    assert_eq!(fifo.len(), 1);
    fifo.run_all_tasks();

    assert_eq!(h1.join(), Some(1));
    assert_eq!(h2.join(), Some(2));
}

#[test]
fn heterogeneous_collection() {
    let pool = ThreadPool::new(2);
    let fifo = FifoScheduler::new();
    let scheds = vec![
        SchedulerRef::new(inline_scheduler()),
        SchedulerRef::new(&pool),
        SchedulerRef::new(&fifo),
    ];

    let count = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = scheds
        .iter()
        .map(|s| {
            let count = count.clone();
            task::spawn_on(s, move || count.fetch_add(1, Ordering::SeqCst))
        })
        .collect();

    fifo.run_all_tasks();
    for h in handles {
        h.join();
    }
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn shared_across_threads() {
    fn assert_send_sync<T: Send + Sync + Copy>(_: T) {}

    let fifo = FifoScheduler::new();
    let r = SchedulerRef::new(&fifo);
    assert_send_sync(r);

    let count = Arc::new(AtomicUsize::new(0));
    crossbeam_utils::thread::scope(|s| {
        for _ in 0..4 {
            let count = count.clone();
            s.spawn(move |_| {
                task::spawn_on(&r, move || count.fetch_add(1, Ordering::SeqCst));
            });
        }
    })
    .unwrap();

    assert_eq!(fifo.len(), 4);
    fifo.run_all_tasks();
    assert_eq!(count.load(Ordering::SeqCst), 4);
}
