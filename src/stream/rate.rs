//! Time-based combinators
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::core::EventStream;
use super::structural::StructuralStreamExt;
use crate::scheduler::Scheduler;

/// Extension trait providing the time-based combinators on [`EventStream`]
pub trait RateStreamExt<T: 'static> {
    /// Leading-edge throttle: republish a value immediately, then drop
    /// everything that arrives during the following `period`
    fn throttle<S>(&self, scheduler: &S, period: Duration) -> EventStream<T>
    where
        S: Scheduler + Clone + 'static;

    /// Trailing-edge debounce: republish a value only once `quiet` has passed
    /// without a newer upstream value
    fn debounce<S>(&self, scheduler: &S, quiet: Duration) -> EventStream<T>
    where
        T: Clone,
        S: Scheduler + Clone + 'static;
}

impl<T: 'static> RateStreamExt<T> for EventStream<T> {
    fn throttle<S>(&self, scheduler: &S, period: Duration) -> EventStream<T>
    where
        S: Scheduler + Clone + 'static,
    {
        let throttled = EventStream::new();
        let out = throttled.clone();
        let scheduler = scheduler.clone();
        let locked = Rc::new(Cell::new(false));
        self.subscribe(move |value| {
            if locked.get() {
                log::trace!("throttle: dropping value while locked");
                return;
            }
            locked.set(true);
            // Unlock is scheduled before publishing; a panicking subscriber
            // must not leave the gate locked.
            let unlock = locked.clone();
            scheduler.schedule_once(period, Box::new(move || unlock.set(false)));
            out.emit(value);
        });
        throttled
    }

    fn debounce<S>(&self, scheduler: &S, quiet: Duration) -> EventStream<T>
    where
        T: Clone,
        S: Scheduler + Clone + 'static,
    {
        let scheduler = scheduler.clone();
        self.flat_map_latest(move |value: &T| EventStream::later(&scheduler, quiet, value.clone()))
    }
}
