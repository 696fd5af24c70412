use std::rc::Rc;

use crate::stream::{EventStream, StructuralStreamExt};

/// A Pipe represents a reusable stream transformation from one type to another.
/// It's a function from EventStream<I> to EventStream<O>; every `apply` wires
/// a fresh chain onto the given source.
pub struct Pipe<I, O> {
    f: Rc<dyn Fn(&EventStream<I>) -> EventStream<O>>,
}

impl<I, O> Clone for Pipe<I, O> {
    fn clone(&self) -> Self {
        Pipe {
            f: Rc::clone(&self.f),
        }
    }
}

impl<I, O> Pipe<I, O> {
    /// Create a new pipe from a function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&EventStream<I>) -> EventStream<O> + 'static,
    {
        Pipe { f: Rc::new(f) }
    }

    /// Apply this pipe to a stream
    pub fn apply(&self, input: &EventStream<I>) -> EventStream<O> {
        (self.f)(input)
    }
}

/// Create a pipe that applies the given function to each value
pub fn map<I, O, F>(f: F) -> Pipe<I, O>
where
    F: Fn(&I) -> O + 'static,
    I: 'static,
    O: 'static,
{
    let f = Rc::new(f);
    Pipe::new(move |input: &EventStream<I>| {
        let f = f.clone();
        input.map(move |value| f(value))
    })
}

/// Create a pipe that filters values based on the predicate
pub fn filter<I, F>(predicate: F) -> Pipe<I, I>
where
    F: Fn(&I) -> bool + 'static,
    I: 'static,
{
    let predicate = Rc::new(predicate);
    Pipe::new(move |input: &EventStream<I>| {
        let predicate = predicate.clone();
        input.filter(move |value| predicate(value))
    })
}

/// Compose two pipes together
pub fn compose<I, M, O>(p1: Pipe<I, M>, p2: Pipe<M, O>) -> Pipe<I, O>
where
    I: 'static,
    M: 'static,
    O: 'static,
{
    Pipe::new(move |input| p2.apply(&p1.apply(input)))
}

/// Identity pipe that returns the source itself
pub fn identity<I>() -> Pipe<I, I>
where
    I: 'static,
{
    Pipe::new(|input: &EventStream<I>| input.clone())
}

/// Extension trait for pipes
pub trait PipeExt<I, O> {
    /// Compose this pipe with another pipe
    fn compose<P>(self, other: Pipe<O, P>) -> Pipe<I, P>
    where
        P: 'static;
}

impl<I, O> PipeExt<I, O> for Pipe<I, O>
where
    I: 'static,
    O: 'static,
{
    fn compose<P>(self, other: Pipe<O, P>) -> Pipe<I, P>
    where
        P: 'static,
    {
        compose(self, other)
    }
}

/// Extension trait to run a pipe from the source side
pub trait ThroughExt<I> {
    fn through<O>(&self, pipe: &Pipe<I, O>) -> EventStream<O>;
}

impl<I> ThroughExt<I> for EventStream<I> {
    fn through<O>(&self, pipe: &Pipe<I, O>) -> EventStream<O> {
        pipe.apply(self)
    }
}
