use kamo::{EventStream, RateStreamExt, StructuralStreamExt, TokioScheduler, VirtualScheduler};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::LocalSet;
use tokio::time::sleep;

fn record<T: Clone + 'static>(stream: &EventStream<T>) -> Rc<RefCell<Vec<T>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    stream.subscribe(move |value: &T| sink.borrow_mut().push(value.clone()));
    seen
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn test_throttle_emits_leading_value_only() {
    let scheduler = VirtualScheduler::new();
    let source: EventStream<i32> = EventStream::new();
    let seen = record(&source.throttle(&scheduler, ms(1000)));

    source.publish(1).publish(2);
    assert_eq!(*seen.borrow(), vec![1]);

    scheduler.advance(ms(999));
    source.publish(3);
    assert_eq!(*seen.borrow(), vec![1]);

    scheduler.advance(ms(1));
    source.publish(4).publish(5);
    assert_eq!(*seen.borrow(), vec![1, 4]);
}

#[test]
fn test_throttle_window_starts_at_emitted_value() {
    let scheduler = VirtualScheduler::new();
    let source: EventStream<i32> = EventStream::new();
    let seen = record(&source.throttle(&scheduler, ms(100)));

    scheduler.advance(ms(50));
    source.publish(1);
    scheduler.advance(ms(60));
    source.publish(2);
    scheduler.advance(ms(40));
    source.publish(3);
    assert_eq!(*seen.borrow(), vec![1, 3]);
}

#[test]
fn test_debounce_emits_after_quiet_period() {
    let scheduler = VirtualScheduler::new();
    let source: EventStream<i32> = EventStream::new();
    let seen = record(&source.debounce(&scheduler, ms(1000)));

    source.publish(1);
    scheduler.advance(ms(500));
    source.publish(2);

    scheduler.advance(ms(999));
    assert!(seen.borrow().is_empty());

    scheduler.advance(ms(1));
    assert_eq!(*seen.borrow(), vec![2]);

    // The superseded timer for 1 has fired as well and was discarded
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_debounce_separate_bursts() {
    let scheduler = VirtualScheduler::new();
    let source: EventStream<&str> = EventStream::new();
    let seen = record(&source.debounce(&scheduler, ms(250)));

    source.publish("a").publish("ab");
    scheduler.advance(ms(300));
    source.publish("abc");
    scheduler.advance(ms(100));
    source.publish("abcd");
    scheduler.run_until_idle();

    assert_eq!(*seen.borrow(), vec!["ab", "abcd"]);
}

#[test]
fn test_double_click_detection() {
    let scheduler = VirtualScheduler::new();
    let clicks: EventStream<u32> = EventStream::new();
    let gestures = clicks
        .buffer(&clicks.debounce(&scheduler, ms(250)))
        .filter(|burst| burst.len() >= 2)
        .map(|burst| burst.len());
    let seen = record(&gestures);

    clicks.publish(1);
    scheduler.advance(ms(400));
    clicks.publish(2);
    scheduler.advance(ms(100));
    clicks.publish(3);
    scheduler.advance(ms(400));
    clicks.publish(4).publish(5).publish(6);
    scheduler.run_until_idle();

    assert_eq!(*seen.borrow(), vec![2, 3]);
}

#[tokio::test(start_paused = true)]
async fn test_throttle_with_tokio_scheduler() {
    let local = LocalSet::new();
    local
        .run_until(async {
            let scheduler = TokioScheduler::new();
            let source: EventStream<i32> = EventStream::new();
            let seen = record(&source.throttle(&scheduler, ms(1000)));

            source.publish(1).publish(2);
            sleep(ms(1001)).await;
            source.publish(3);

            assert_eq!(*seen.borrow(), vec![1, 3]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_debounce_with_tokio_scheduler() {
    let local = LocalSet::new();
    local
        .run_until(async {
            let scheduler = TokioScheduler::new();
            let source: EventStream<i32> = EventStream::new();
            let seen = record(&source.debounce(&scheduler, ms(1000)));

            source.publish(1);
            sleep(ms(500)).await;
            source.publish(2);
            sleep(ms(900)).await;
            assert!(seen.borrow().is_empty());

            sleep(ms(200)).await;
            assert_eq!(*seen.borrow(), vec![2]);
        })
        .await;
}
