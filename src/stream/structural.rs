//! Structural combinators: one-to-one transforms, accumulation, and
//! combinators over several or dynamically created sources.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::core::EventStream;

/// Extension trait providing the structural combinators on [`EventStream`]
pub trait StructuralStreamExt<T: 'static> {
    /// Publish `f(v)` for every upstream value `v`
    fn map<U, F>(&self, f: F) -> EventStream<U>
    where
        U: 'static,
        F: Fn(&T) -> U + 'static;

    /// Republish the upstream values for which `predicate` holds
    fn filter<F>(&self, predicate: F) -> EventStream<T>
    where
        F: Fn(&T) -> bool + 'static;

    /// Fold every upstream value into an accumulator and publish each new
    /// accumulator value. The seed itself is never published.
    fn scan<A, F>(&self, seed: A, f: F) -> EventStream<A>
    where
        A: Clone + 'static,
        F: Fn(&A, &T) -> A + 'static;

    /// Republish the values of both streams as they arrive
    fn merge(&self, other: &EventStream<T>) -> EventStream<T>;

    /// Publish `f(latest_self, latest_other)` whenever either side publishes,
    /// once both sides have published at least once
    fn combine<U, R, F>(&self, other: &EventStream<U>, f: F) -> EventStream<R>
    where
        T: Clone,
        U: Clone + 'static,
        R: 'static,
        F: Fn(&T, &U) -> R + 'static;

    /// Publish `f(latest_self, v)` for every value `v` of `sampler`, once
    /// `self` has published at least once. Values of `self` alone never
    /// produce output.
    fn sampled_by<U, R, F>(&self, sampler: &EventStream<U>, f: F) -> EventStream<R>
    where
        T: Clone,
        U: 'static,
        R: 'static,
        F: Fn(&T, &U) -> R + 'static;

    /// Create an inner stream per upstream value and republish everything
    /// every inner stream ever publishes
    fn flat_map<U, F>(&self, f: F) -> EventStream<U>
    where
        U: 'static,
        F: Fn(&T) -> EventStream<U> + 'static;

    /// Like [`flat_map`](Self::flat_map), but only the inner stream created
    /// for the most recent upstream value is republished
    fn flat_map_latest<U, F>(&self, f: F) -> EventStream<U>
    where
        U: 'static,
        F: Fn(&T) -> EventStream<U> + 'static;

    /// Collect upstream values and publish them as one batch each time
    /// `closing` publishes
    fn buffer<U>(&self, closing: &EventStream<U>) -> EventStream<Vec<T>>
    where
        T: Clone,
        U: 'static;
}

impl<T: 'static> StructuralStreamExt<T> for EventStream<T> {
    fn map<U, F>(&self, f: F) -> EventStream<U>
    where
        U: 'static,
        F: Fn(&T) -> U + 'static,
    {
        let mapped = EventStream::new();
        let out = mapped.clone();
        self.subscribe(move |value| {
            out.publish(f(value));
        });
        mapped
    }

    fn filter<F>(&self, predicate: F) -> EventStream<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let filtered = EventStream::new();
        let out = filtered.clone();
        self.subscribe(move |value| {
            if predicate(value) {
                out.emit(value);
            }
        });
        filtered
    }

    fn scan<A, F>(&self, seed: A, f: F) -> EventStream<A>
    where
        A: Clone + 'static,
        F: Fn(&A, &T) -> A + 'static,
    {
        let accumulated = EventStream::new();
        let out = accumulated.clone();
        let acc = RefCell::new(seed);
        self.subscribe(move |value| {
            // `f` runs with the accumulator unborrowed.
            let current = acc.borrow().clone();
            let next = f(&current, value);
            *acc.borrow_mut() = next.clone();
            out.publish(next);
        });
        accumulated
    }

    fn merge(&self, other: &EventStream<T>) -> EventStream<T> {
        let merged = EventStream::new();
        let left = merged.clone();
        self.subscribe(move |value| left.emit(value));
        let right = merged.clone();
        other.subscribe(move |value| right.emit(value));
        merged
    }

    fn combine<U, R, F>(&self, other: &EventStream<U>, f: F) -> EventStream<R>
    where
        T: Clone,
        U: Clone + 'static,
        R: 'static,
        F: Fn(&T, &U) -> R + 'static,
    {
        let combined = EventStream::new();
        let latest: Rc<RefCell<(Option<T>, Option<U>)>> = Rc::new(RefCell::new((None, None)));
        let f = Rc::new(f);

        {
            let out = combined.clone();
            let latest = latest.clone();
            let f = f.clone();
            self.subscribe(move |value: &T| {
                let other_latest = {
                    let mut latest = latest.borrow_mut();
                    latest.0 = Some(value.clone());
                    latest.1.clone()
                };
                if let Some(other_value) = other_latest {
                    out.publish(f(value, &other_value));
                }
            });
        }

        {
            let out = combined.clone();
            other.subscribe(move |value: &U| {
                let self_latest = {
                    let mut latest = latest.borrow_mut();
                    latest.1 = Some(value.clone());
                    latest.0.clone()
                };
                if let Some(self_value) = self_latest {
                    out.publish(f(&self_value, value));
                }
            });
        }

        combined
    }

    fn sampled_by<U, R, F>(&self, sampler: &EventStream<U>, f: F) -> EventStream<R>
    where
        T: Clone,
        U: 'static,
        R: 'static,
        F: Fn(&T, &U) -> R + 'static,
    {
        let sampled = EventStream::new();
        let latest: Rc<RefCell<Option<T>>> = Rc::new(RefCell::new(None));

        {
            let latest = latest.clone();
            self.subscribe(move |value: &T| {
                *latest.borrow_mut() = Some(value.clone());
            });
        }

        let out = sampled.clone();
        sampler.subscribe(move |value: &U| {
            let current = latest.borrow().clone();
            match current {
                Some(self_value) => {
                    out.publish(f(&self_value, value));
                }
                None => log::trace!("sampled_by: no value to sample yet"),
            }
        });

        sampled
    }

    fn flat_map<U, F>(&self, f: F) -> EventStream<U>
    where
        U: 'static,
        F: Fn(&T) -> EventStream<U> + 'static,
    {
        let flattened = EventStream::new();
        let out = flattened.clone();
        self.subscribe(move |value| {
            let out = out.clone();
            f(value).subscribe(move |inner_value| out.emit(inner_value));
        });
        flattened
    }

    fn flat_map_latest<U, F>(&self, f: F) -> EventStream<U>
    where
        U: 'static,
        F: Fn(&T) -> EventStream<U> + 'static,
    {
        let flattened = EventStream::new();
        let out = flattened.clone();
        // Incremented once per upstream value; an inner stream only forwards
        // while its own generation is still the latest.
        let latest_generation = Rc::new(Cell::new(0u64));
        self.subscribe(move |value| {
            let inner = f(value);
            let generation = latest_generation.get().wrapping_add(1);
            latest_generation.set(generation);

            let out = out.clone();
            let latest_generation = latest_generation.clone();
            inner.subscribe(move |inner_value| {
                if latest_generation.get() == generation {
                    out.emit(inner_value);
                } else {
                    log::trace!(
                        "flat_map_latest: discarding value from superseded inner stream {}",
                        generation
                    );
                }
            });
        });
        flattened
    }

    fn buffer<U>(&self, closing: &EventStream<U>) -> EventStream<Vec<T>>
    where
        T: Clone,
        U: 'static,
    {
        let buffered = EventStream::new();
        let pending: Rc<RefCell<Vec<T>>> = Rc::new(RefCell::new(Vec::new()));

        {
            let pending = pending.clone();
            self.subscribe(move |value: &T| pending.borrow_mut().push(value.clone()));
        }

        let out = buffered.clone();
        closing.subscribe(move |_: &U| {
            let batch = std::mem::take(&mut *pending.borrow_mut());
            if !batch.is_empty() {
                out.publish(batch);
            }
        });

        buffered
    }
}
