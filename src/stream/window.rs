//! Count-based combinators
//!
//! A count of zero yields a stream that never publishes.

use std::cell::Cell;

use super::core::EventStream;
use super::structural::StructuralStreamExt;

/// Extension trait providing the count-based combinators on [`EventStream`]
pub trait WindowStreamExt<T: 'static> {
    /// Republish every `n`-th value, starting with the first
    fn throttle_with_count(&self, n: usize) -> EventStream<T>;

    /// Publish the last `n` values as a window on every value once `n`
    /// values have been seen. Consecutive windows overlap by `n - 1`.
    fn window_with_count(&self, n: usize) -> EventStream<Vec<T>>
    where
        T: Clone;

    /// Publish disjoint batches of exactly `n` values
    fn buffer_with_count(&self, n: usize) -> EventStream<Vec<T>>
    where
        T: Clone;
}

impl<T: 'static> WindowStreamExt<T> for EventStream<T> {
    fn throttle_with_count(&self, n: usize) -> EventStream<T> {
        if n == 0 {
            log::warn!("throttle_with_count(0) never publishes");
            return EventStream::new();
        }
        let index = Cell::new(0usize);
        self.filter(move |_| {
            let current = index.get();
            index.set(current.wrapping_add(1));
            current % n == 0
        })
    }

    fn window_with_count(&self, n: usize) -> EventStream<Vec<T>>
    where
        T: Clone,
    {
        if n == 0 {
            log::warn!("window_with_count(0) never publishes");
            return EventStream::new();
        }
        self.scan(Vec::with_capacity(n), move |window: &Vec<T>, value: &T| {
            let skip = (window.len() + 1).saturating_sub(n);
            let mut next: Vec<T> = window.iter().skip(skip).cloned().collect();
            next.push(value.clone());
            next
        })
        .filter(move |window| window.len() == n)
    }

    fn buffer_with_count(&self, n: usize) -> EventStream<Vec<T>>
    where
        T: Clone,
    {
        self.window_with_count(n).throttle_with_count(n)
    }
}
