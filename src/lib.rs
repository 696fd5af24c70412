//! kamo - push-based event streams with functional-reactive combinators
//!
//! An [`EventStream`] fans every published value out to its subscribers,
//! synchronously and in registration order. Operators build new streams
//! subscribed to their sources: structural ones (`map`, `filter`, `scan`,
//! `merge`, `combine`, `sampled_by`, `flat_map`, `flat_map_latest`), time-based
//! ones driven by an explicit [`Scheduler`] (`throttle`, `debounce`), and
//! count-based ones (`throttle_with_count`, `window_with_count`,
//! `buffer_with_count`).
//!
//! ```
//! use kamo::{EventStream, StructuralStreamExt};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let clicks: EventStream<u32> = EventStream::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! clicks
//!     .map(|x| x * 10)
//!     .filter(|x| *x > 10)
//!     .subscribe(move |x| sink.borrow_mut().push(*x));
//!
//! clicks.publish(1).publish(2).publish(3);
//! assert_eq!(*seen.borrow(), vec![20, 30]);
//! ```

pub mod bridge;
pub mod error;
pub mod pipe;
pub mod producer;
pub mod scheduler;
pub mod stream;
pub mod stream_configuration;
pub mod stream_performance_metrics;

pub use error::{AdapterError, AdapterResult, ConfigError, ConfigResult};
pub use producer::{
    Callback, FunctionAdapter, HandlerSlot, HandlerTable, Producer, SetterAdapter,
};
pub use scheduler::{Scheduler, Task, TimerId, TokioScheduler, VirtualScheduler};
pub use stream::{
    EventStream, RateStreamExt, StructuralStreamExt, Subscription, WindowStreamExt,
};
pub use stream_configuration::{StreamConfig, StreamSettings, MAX_SUBSCRIBER_CAPACITY};
pub use stream_performance_metrics::StreamMetrics;
