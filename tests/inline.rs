use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use async_sched::{inline_scheduler, task, InlineScheduler, Schedule};

#[test]
fn runs_before_schedule_returns() {
    let flag = Arc::new(AtomicBool::new(false));

    let f = flag.clone();
    let handle = task::spawn_on(inline_scheduler(), move || f.store(true, Ordering::SeqCst));

    assert!(flag.load(Ordering::SeqCst));
    assert!(handle.is_ready());
}

#[test]
fn runs_on_calling_thread() {
    let caller = thread::current().id();
    let handle = task::spawn_on(inline_scheduler(), move || thread::current().id() == caller);
    assert_eq!(handle.join(), Some(true));
}

#[test]
fn strict_ordering_with_caller() {
    thread_local! {
        static STEP: Cell<u32> = Cell::new(0);
    }

    STEP.with(|s| s.set(1));
    let (runnable, handle) = task::create(|| STEP.with(|s| s.replace(2)));
    inline_scheduler().schedule(runnable);
    STEP.with(|s| assert_eq!(s.get(), 2));

    assert_eq!(handle.join(), Some(1));
}

#[test]
fn nested_inline_tasks() {
    let handle = task::spawn_on(inline_scheduler(), || {
        task::spawn_on(inline_scheduler(), || 2).join().unwrap() * 3
    });
    assert_eq!(handle.join(), Some(6));
}

#[test]
fn singleton() {
    assert!(std::ptr::eq(inline_scheduler(), inline_scheduler()));

    // A standalone instance behaves the same way.
    let sched = InlineScheduler::default();
    assert_eq!(task::spawn_on(&sched, || 4).join(), Some(4));
}
