//! Producer adapters: connect host event sources to new streams
//!
//! A host exposes events either through a single-slot handler (a settable
//! callback property) or through a registration function that takes a
//! callback plus extra arguments. Both shapes are expressed as closures
//! supplied by the caller; the adapter hands them a [`Callback`] that
//! publishes onto a fresh stream.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::error::{AdapterError, AdapterResult};
use crate::scheduler::Scheduler;
use crate::stream::EventStream;

/// Callback given to a host; every invocation publishes its argument
pub type Callback<T> = Rc<dyn Fn(T)>;

/// Something that can feed values into a stream
pub trait Producer<T> {
    /// Connect this producer to `stream`
    fn wire(self, stream: &EventStream<T>) -> AdapterResult<()>;
}

fn publisher<T: 'static>(stream: &EventStream<T>) -> Callback<T> {
    let stream = stream.clone();
    Rc::new(move |value| {
        stream.publish(value);
    })
}

/// Adapter for hosts that expose a single settable handler
pub struct SetterAdapter<F> {
    install: F,
}

impl<F> SetterAdapter<F> {
    /// `install` receives the callback and stores it in the host's slot
    pub fn new(install: F) -> Self {
        Self { install }
    }
}

impl<T, F> Producer<T> for SetterAdapter<F>
where
    T: 'static,
    F: FnOnce(Callback<T>) -> AdapterResult<()>,
{
    fn wire(self, stream: &EventStream<T>) -> AdapterResult<()> {
        (self.install)(publisher(stream))
    }
}

/// Adapter for hosts whose registration function takes a callback plus
/// extra arguments
pub struct FunctionAdapter<F, A> {
    register: F,
    args: A,
}

impl<F, A> FunctionAdapter<F, A> {
    pub fn new(register: F, args: A) -> Self {
        Self { register, args }
    }
}

impl<T, F, A> Producer<T> for FunctionAdapter<F, A>
where
    T: 'static,
    F: FnOnce(Callback<T>, A) -> AdapterResult<()>,
{
    fn wire(self, stream: &EventStream<T>) -> AdapterResult<()> {
        (self.register)(publisher(stream), self.args)
    }
}

impl<T: 'static> EventStream<T> {
    /// Create a stream fed by `producer`
    pub fn from_producer<P>(producer: P) -> AdapterResult<Self>
    where
        P: Producer<T>,
    {
        let stream = EventStream::new();
        producer.wire(&stream)?;
        Ok(stream)
    }

    /// Create a stream from a settable handler; see [`SetterAdapter`]
    pub fn from_setter<F>(install: F) -> AdapterResult<Self>
    where
        F: FnOnce(Callback<T>) -> AdapterResult<()>,
    {
        Self::from_producer(SetterAdapter::new(install))
    }

    /// Create a stream from a registration function; see [`FunctionAdapter`]
    pub fn from_function<F, A>(register: F, args: A) -> AdapterResult<Self>
    where
        F: FnOnce(Callback<T>, A) -> AdapterResult<()>,
    {
        Self::from_producer(FunctionAdapter::new(register, args))
    }

    /// Create a stream that takes over `slot`, replacing any handler already
    /// installed there
    pub fn from_slot(slot: &HandlerSlot<T>) -> Self {
        let stream = EventStream::new();
        slot.set(publisher(&stream));
        stream
    }

    /// Create a stream that publishes `value` once, `delay` after now
    pub fn later<S>(scheduler: &S, delay: Duration, value: T) -> Self
    where
        S: Scheduler + ?Sized,
    {
        let stream = EventStream::new();
        let out = stream.clone();
        let timer = scheduler.schedule_once(
            delay,
            Box::new(move || {
                out.publish(value);
            }),
        );
        log::trace!("later: {} scheduled in {:?}", timer, delay);
        stream
    }
}

/// A single-slot callback property, such as an `onclick` handler
pub struct HandlerSlot<T> {
    name: String,
    handler: Rc<RefCell<Option<Callback<T>>>>,
}

impl<T> Clone for HandlerSlot<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            handler: Rc::clone(&self.handler),
        }
    }
}

impl<T> fmt::Debug for HandlerSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerSlot")
            .field("name", &self.name)
            .field("is_set", &self.is_set())
            .finish()
    }
}

impl<T> HandlerSlot<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handler: Rc::new(RefCell::new(None)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Install `handler`, replacing the previous one
    pub fn set(&self, handler: Callback<T>) {
        *self.handler.borrow_mut() = Some(handler);
    }

    /// Install `handler` unless the slot is already occupied
    pub fn try_set(&self, handler: Callback<T>) -> AdapterResult<()> {
        let mut slot = self.handler.borrow_mut();
        if slot.is_some() {
            return Err(AdapterError::SlotOccupied(self.name.clone()));
        }
        *slot = Some(handler);
        Ok(())
    }

    pub fn clear(&self) {
        self.handler.borrow_mut().take();
    }

    pub fn is_set(&self) -> bool {
        self.handler.borrow().is_some()
    }

    /// Invoke the installed handler with `value`. Returns `false` when the
    /// slot is empty.
    pub fn fire(&self, value: T) -> bool {
        let handler = self.handler.borrow().clone();
        match handler {
            Some(handler) => {
                handler(value);
                true
            }
            None => {
                log::trace!("handler slot {} is empty, dropping event", self.name);
                false
            }
        }
    }
}

/// A host object exposing named handler slots
pub struct HandlerTable<T> {
    slots: HashMap<String, HandlerSlot<T>>,
}

impl<T> Default for HandlerTable<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<T> HandlerTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a handler slot, returning it
    pub fn declare(&mut self, name: &str) -> HandlerSlot<T> {
        self.slots
            .entry(name.to_string())
            .or_insert_with(|| HandlerSlot::new(name))
            .clone()
    }

    /// Look up a declared slot
    pub fn slot(&self, name: &str) -> AdapterResult<HandlerSlot<T>> {
        self.slots
            .get(name)
            .cloned()
            .ok_or_else(|| AdapterError::MissingMember(name.to_string()))
    }

    /// Fire the named slot
    pub fn fire(&self, name: &str, value: T) -> AdapterResult<bool> {
        Ok(self.slot(name)?.fire(value))
    }
}

impl<T: 'static> HandlerTable<T> {
    /// Create a stream fed by the named slot, replacing its current handler.
    /// Fails when the table has no such slot.
    pub fn stream(&self, name: &str) -> AdapterResult<EventStream<T>> {
        let slot = self.slot(name)?;
        EventStream::from_setter(move |callback| {
            slot.set(callback);
            Ok(())
        })
    }
}
