//! The publish/subscribe primitive every operator is built on.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::stream_configuration::{
    StreamConfig, TerminalPredicate, MAX_SUBSCRIBER_CAPACITY,
};
use crate::stream_performance_metrics::StreamMetrics;

struct Registration<T> {
    id: u64,
    active: Cell<bool>,
    callback: Box<dyn Fn(&T)>,
}

struct Inner<T> {
    subscribers: Vec<Rc<Registration<T>>>,
    next_id: u64,
    closed: bool,
    label: Option<String>,
    terminal: Option<TerminalPredicate<T>>,
    metrics: Option<StreamMetrics>,
}

impl<T> Inner<T> {
    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("anonymous")
    }
}

/// A discrete sequence of values with zero or more subscribers.
///
/// Cloning an `EventStream` yields another handle to the same stream. Values
/// published while nobody is subscribed are dropped; nothing is replayed.
pub struct EventStream<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for EventStream<T> {
    fn clone(&self) -> Self {
        EventStream {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventStream")
            .field("label", &inner.label())
            .field("subscribers", &inner.subscribers.len())
            .field("closed", &inner.closed)
            .finish()
    }
}

impl<T: 'static> EventStream<T> {
    /// Create an empty stream with the default configuration
    pub fn new() -> Self {
        Self::with_config(StreamConfig::default())
    }

    /// Create an empty stream from a configuration
    pub fn with_config(config: StreamConfig<T>) -> Self {
        let StreamConfig { settings, terminal } = config;
        EventStream {
            inner: Rc::new(RefCell::new(Inner {
                subscribers: Vec::with_capacity(
                    settings.subscriber_capacity.min(MAX_SUBSCRIBER_CAPACITY),
                ),
                next_id: 0,
                closed: false,
                label: settings.label,
                terminal,
                metrics: settings.metrics_enabled.then(StreamMetrics::new),
            })),
        }
    }

    /// Publish a value to every current subscriber, in registration order.
    ///
    /// Subscribers registered while this call is running do not receive the
    /// value. A panicking subscriber aborts the remaining deliveries and the
    /// panic propagates to the caller.
    pub fn publish(&self, value: T) -> &Self {
        self.emit(&value);
        self
    }

    /// Register a callback invoked with every value published from now on
    pub fn subscribe<F>(&self, callback: F) -> &Self
    where
        F: Fn(&T) + 'static,
    {
        self.register(Box::new(callback));
        self
    }

    /// Like [`subscribe`](Self::subscribe), but returns a handle that can
    /// remove the registration again
    pub fn listen<F>(&self, callback: F) -> Subscription<T>
    where
        F: Fn(&T) + 'static,
    {
        let registration = self.register(Box::new(callback));
        Subscription {
            stream: Rc::downgrade(&self.inner),
            registration,
        }
    }

    pub(crate) fn emit(&self, value: &T) {
        let terminal = {
            let inner = self.inner.borrow();
            if inner.closed {
                log::trace!("stream {} is closed, ignoring publish", inner.label());
                return;
            }
            inner.terminal.clone()
        };
        let closing = terminal.map_or(false, |is_terminal| is_terminal(value));

        let snapshot: Vec<Rc<Registration<T>>> = {
            let mut inner = self.inner.borrow_mut();
            if inner.closed {
                return;
            }
            // A terminal value empties the list before delivery so it stays
            // empty even if a subscriber panics.
            let snapshot = if closing {
                inner.closed = true;
                std::mem::take(&mut inner.subscribers)
            } else {
                inner.subscribers.clone()
            };
            if let Some(metrics) = inner.metrics.as_mut() {
                metrics.record_publish(snapshot.len());
            }
            log::trace!(
                "stream {} publishing to {} subscribers",
                inner.label(),
                snapshot.len()
            );
            snapshot
        };

        for registration in &snapshot {
            if !registration.active.get() {
                continue;
            }
            if let Some(metrics) = self.inner.borrow_mut().metrics.as_mut() {
                metrics.record_delivery();
            }
            (registration.callback)(value);
        }

        if closing {
            for registration in &snapshot {
                registration.active.set(false);
            }
            log::debug!(
                "stream {} closed by terminal value",
                self.inner.borrow().label()
            );
        }
    }

    fn register(&self, callback: Box<dyn Fn(&T)>) -> Weak<Registration<T>> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let registration = Rc::new(Registration {
            id,
            active: Cell::new(!inner.closed),
            callback,
        });
        if inner.closed {
            log::debug!(
                "stream {} is closed, subscription {} will never fire",
                inner.label(),
                id
            );
        } else {
            inner.subscribers.push(Rc::clone(&registration));
        }
        Rc::downgrade(&registration)
    }
}

impl<T> EventStream<T> {
    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Whether a terminal value has been published
    pub fn is_closed(&self) -> bool {
        self.inner.borrow().closed
    }

    pub fn label(&self) -> Option<String> {
        self.inner.borrow().label.clone()
    }

    /// Snapshot of the publish counters, if metrics are enabled
    pub fn metrics(&self) -> Option<StreamMetrics> {
        self.inner.borrow().metrics.clone()
    }

    /// Whether two handles refer to the same stream
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Registration of one callback on one stream
pub struct Subscription<T> {
    stream: Weak<RefCell<Inner<T>>>,
    registration: Weak<Registration<T>>,
}

impl<T> Subscription<T> {
    /// Whether the callback will still be invoked by future publishes
    pub fn is_active(&self) -> bool {
        self.registration
            .upgrade()
            .map_or(false, |registration| registration.active.get())
    }

    /// Remove the callback from its stream.
    ///
    /// Returns `false` when it was already removed or the stream is gone. A
    /// callback removed during a publish is skipped for the rest of that
    /// publish.
    pub fn unsubscribe(self) -> bool {
        let Some(registration) = self.registration.upgrade() else {
            return false;
        };
        let was_active = registration.active.replace(false);
        if let Some(stream) = self.stream.upgrade() {
            let mut inner = stream.borrow_mut();
            inner
                .subscribers
                .retain(|other| other.id != registration.id);
        }
        was_active
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
