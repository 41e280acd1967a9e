use std::sync::{Arc, Mutex};
use std::thread;

use async_sched::{task, FifoScheduler};

#[test]
fn runs_in_submission_order() {
    let fifo = FifoScheduler::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let log = log.clone();
            task::spawn_on(&fifo, move || log.lock().unwrap().push(i))
        })
        .collect();

    // Nothing runs until the queue is drained.
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(fifo.len(), 100);

    fifo.run_all_tasks();

    assert_eq!(*log.lock().unwrap(), (0..100).collect::<Vec<_>>());
    assert!(fifo.is_empty());
    for h in handles {
        assert!(h.is_ready());
    }
}

#[test]
fn try_run_one_on_empty_queue() {
    let fifo = FifoScheduler::new();
    assert!(!fifo.try_run_one_task());
    assert!(!fifo.try_run_one_task());

    let handle = task::spawn_on(&fifo, || 5);
    assert!(fifo.try_run_one_task());
    assert!(!fifo.try_run_one_task());
    assert_eq!(handle.join(), Some(5));
}

#[test]
fn run_all_drains_tasks_scheduled_by_tasks() {
    let fifo = Arc::new(FifoScheduler::new());
    let log = Arc::new(Mutex::new(Vec::new()));

    {
        let fifo2 = fifo.clone();
        let log = log.clone();
        task::spawn_on(&*fifo, move || {
            log.lock().unwrap().push("outer");

            let log = log.clone();
            let fifo3 = fifo2.clone();
            task::spawn_on(&*fifo2, move || {
                log.lock().unwrap().push("inner");

                let log = log.clone();
                task::spawn_on(&*fifo3, move || log.lock().unwrap().push("innermost"));
            });
        });
    }

    fifo.run_all_tasks();
    assert_eq!(*log.lock().unwrap(), ["outer", "inner", "innermost"]);
    assert!(!fifo.try_run_one_task());
}

#[test]
fn concurrent_producers() {
    let fifo = Arc::new(FifoScheduler::new());
    let count = Arc::new(Mutex::new(0));

    let producers: Vec<_> = (0..4)
        .map(|_| {
            let fifo = fifo.clone();
            let count = count.clone();
            thread::spawn(move || {
                for _ in 0..250 {
                    let count = count.clone();
                    task::spawn_on(&*fifo, move || *count.lock().unwrap() += 1);
                }
            })
        })
        .collect();

    for p in producers {
        p.join().unwrap();
    }

    fifo.run_all_tasks();
    assert_eq!(*count.lock().unwrap(), 1000);
}

#[test]
fn concurrent_drains_run_each_task_once() {
    let fifo = Arc::new(FifoScheduler::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    for i in 0..1000 {
        let seen = seen.clone();
        task::spawn_on(&*fifo, move || seen.lock().unwrap().push(i));
    }

    let drainers: Vec<_> = (0..4)
        .map(|_| {
            let fifo = fifo.clone();
            thread::spawn(move || fifo.run_all_tasks())
        })
        .collect();

    for d in drainers {
        d.join().unwrap();
    }

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, (0..1000).collect::<Vec<_>>());
}

#[test]
fn dropping_scheduler_cancels_pending_tasks() {
    let fifo = FifoScheduler::new();
    let handle = task::spawn_on(&fifo, || 1);
    drop(fifo);

    assert!(handle.is_ready());
    assert!(handle.is_cancelled());
    assert_eq!(handle.join(), None);
}
