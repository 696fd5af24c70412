//! Deferred execution used by the time-based operators
//!
//! Operators receive a [`Scheduler`] explicitly instead of reaching for a
//! global timer. [`VirtualScheduler`] drives time by hand and is what the
//! tests use; [`TokioScheduler`] runs timers on a tokio `LocalSet`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Work deferred by a scheduler
pub type Task = Box<dyn FnOnce()>;

/// Identifies one scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Runs a task once after a delay. Scheduled tasks cannot be cancelled.
pub trait Scheduler {
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerId;
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerId {
        (**self).schedule_once(delay, task)
    }
}

impl<S: Scheduler + ?Sized> Scheduler for &S {
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerId {
        (**self).schedule_once(delay, task)
    }
}

#[derive(Default)]
struct VirtualClock {
    now: Duration,
    next_id: u64,
    // Keyed by (deadline, id): equal deadlines fire in scheduling order.
    queue: BTreeMap<(Duration, u64), Task>,
}

/// A manually advanced clock.
///
/// Nothing runs until [`advance`](Self::advance) or
/// [`run_until_idle`](Self::run_until_idle) is called. Clones share the same
/// clock.
#[derive(Clone, Default)]
pub struct VirtualScheduler {
    clock: Rc<RefCell<VirtualClock>>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this clock
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.clock.borrow().queue.len()
    }

    /// Move the clock forward by `by`, running every task that falls due on
    /// the way, including tasks scheduled by those tasks. Returns the number
    /// of tasks run. The clock saturates at `Duration::MAX`.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now().checked_add(by).unwrap_or(Duration::MAX);
        let ran = self.run_while(|deadline| deadline <= target);
        self.clock.borrow_mut().now = target;
        ran
    }

    /// Run every pending task, moving the clock to each deadline in turn
    pub fn run_until_idle(&self) -> usize {
        self.run_while(|_| true)
    }

    fn run_while<P>(&self, due: P) -> usize
    where
        P: Fn(Duration) -> bool,
    {
        let mut ran = 0;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let key = match clock.queue.keys().next() {
                    Some(&key) if due(key.0) => key,
                    _ => break,
                };
                clock.now = clock.now.max(key.0);
                clock.queue.remove(&key).map(|task| (key, task))
            };
            if let Some(((deadline, id), task)) = next {
                log::trace!("running timer#{} due at {:?}", id, deadline);
                task();
                ran += 1;
            }
        }
        ran
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerId {
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let deadline = clock.now.checked_add(delay).unwrap_or(Duration::MAX);
        clock.queue.insert((deadline, id), task);
        TimerId(id)
    }
}

impl fmt::Debug for VirtualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clock = self.clock.borrow();
        f.debug_struct("VirtualScheduler")
            .field("now", &clock.now)
            .field("pending", &clock.queue.len())
            .finish()
    }
}

/// Runs tasks on the current tokio `LocalSet` after `tokio::time::sleep`.
///
/// `schedule_once` panics when called outside a `LocalSet`.
#[derive(Clone, Debug, Default)]
pub struct TokioScheduler {
    next_id: Rc<Cell<u64>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) -> TimerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            log::trace!("running timer#{} after {:?}", id, delay);
            task();
        });
        TimerId(id)
    }
}
