//! Interop between event streams and async `Stream`s
//!
//! Both directions are single-threaded: `from_async` spawns onto the current
//! tokio `LocalSet`.

use std::cell::RefCell;
use std::rc::Rc;

use futures_core::Stream;
use futures_util::{pin_mut, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::stream::{EventStream, Subscription};

/// Async view of every value published on `stream` after this call.
///
/// The async stream never ends on its own. Dropping it removes the
/// subscription on the next publish.
pub fn into_async<T>(stream: &EventStream<T>) -> UnboundedReceiverStream<T>
where
    T: Clone + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let subscription: Rc<RefCell<Option<Subscription<T>>>> = Rc::new(RefCell::new(None));
    let own_subscription = subscription.clone();
    let registered = stream.listen(move |value: &T| {
        if tx.send(value.clone()).is_err() {
            if let Some(subscription) = own_subscription.borrow_mut().take() {
                log::debug!("into_async: receiver dropped, unsubscribing");
                subscription.unsubscribe();
            }
        }
    });
    *subscription.borrow_mut() = Some(registered);
    UnboundedReceiverStream::new(rx)
}

/// Publish every item of `source` on a new event stream.
///
/// Items are published from a task on the current `LocalSet`; the handle
/// completes once `source` is exhausted.
pub fn from_async<S>(source: S) -> (EventStream<S::Item>, JoinHandle<()>)
where
    S: Stream + 'static,
    S::Item: 'static,
{
    let stream = EventStream::new();
    let out = stream.clone();
    let handle = tokio::task::spawn_local(async move {
        pin_mut!(source);
        let mut forwarded = 0usize;
        while let Some(item) = source.next().await {
            out.publish(item);
            forwarded += 1;
        }
        log::debug!("from_async: source finished after {} items", forwarded);
    });
    (stream, handle)
}
