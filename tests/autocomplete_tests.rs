//! End-to-end wiring of a search-as-you-type pipeline against fake hosts.

use kamo::{
    Callback, EventStream, HandlerSlot, RateStreamExt, StructuralStreamExt, VirtualScheduler,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// A search service whose requests complete when the test says so
#[derive(Default)]
struct SearchBackend {
    pending: RefCell<Vec<(String, Callback<Vec<String>>)>>,
    issued: RefCell<Vec<String>>,
}

impl SearchBackend {
    fn search(&self, done: Callback<Vec<String>>, query: String) {
        self.issued.borrow_mut().push(query.clone());
        self.pending.borrow_mut().push((query, done));
    }

    fn respond(&self, query: &str) {
        let request = {
            let mut pending = self.pending.borrow_mut();
            let index = pending
                .iter()
                .position(|(q, _)| q == query)
                .expect("no pending request for query");
            pending.remove(index)
        };
        let (query, done) = request;
        done(vec![format!("{} (language)", query), format!("{} belt", query)]);
    }
}

struct Page {
    input: HandlerSlot<String>,
    scheduler: VirtualScheduler,
    backend: Rc<SearchBackend>,
    candidates: Rc<RefCell<Vec<String>>>,
}

impl Page {
    fn new() -> Self {
        let input: HandlerSlot<String> = HandlerSlot::new("onkeyup");
        let scheduler = VirtualScheduler::new();
        let backend = Rc::new(SearchBackend::default());
        let candidates = Rc::new(RefCell::new(Vec::new()));

        let keyups = EventStream::from_slot(&input);
        let service = backend.clone();
        let rendered = candidates.clone();
        keyups
            .debounce(&scheduler, Duration::from_millis(1000))
            .map(|text: &String| text.trim().to_string())
            .filter(|text| text.len() >= 3)
            .scan((None, None), |(_, previous): &(Option<String>, Option<String>), text| {
                (previous.clone(), Some(text.clone()))
            })
            .filter(|(previous, current)| previous != current)
            .map(|(_, current)| current.clone().unwrap_or_default())
            .flat_map_latest(move |query| {
                let service = service.clone();
                EventStream::from_function(
                    move |done, query| {
                        service.search(done, query);
                        Ok(())
                    },
                    query.clone(),
                )
                .unwrap()
            })
            .subscribe(move |results: &Vec<String>| {
                *rendered.borrow_mut() = results.clone();
            });

        Page {
            input,
            scheduler,
            backend,
            candidates,
        }
    }

    fn type_text(&self, text: &str, pause_ms: u64) {
        self.input.fire(text.to_string());
        self.scheduler.advance(Duration::from_millis(pause_ms));
    }
}

#[test]
fn test_only_last_keystroke_before_quiet_period_is_searched() {
    let page = Page::new();
    page.type_text("r", 100);
    page.type_text("ru", 100);
    page.type_text("rus", 100);
    page.type_text("rust", 1000);

    assert_eq!(*page.backend.issued.borrow(), vec!["rust"]);
}

#[test]
fn test_short_queries_are_not_searched() {
    let page = Page::new();
    page.type_text("ru", 1500);
    assert!(page.backend.issued.borrow().is_empty());
}

#[test]
fn test_repeated_query_is_not_searched_again() {
    let page = Page::new();
    page.type_text("rust", 1200);
    page.type_text("rusty", 200);
    page.type_text("rust ", 1200);

    assert_eq!(*page.backend.issued.borrow(), vec!["rust"]);
}

#[test]
fn test_results_for_superseded_query_are_discarded() {
    let page = Page::new();
    page.type_text("rus", 1000);
    page.type_text("rust", 1000);
    assert_eq!(*page.backend.issued.borrow(), vec!["rus", "rust"]);

    // The older request completes late and must not be rendered
    page.backend.respond("rus");
    assert!(page.candidates.borrow().is_empty());

    page.backend.respond("rust");
    assert_eq!(
        *page.candidates.borrow(),
        vec!["rust (language)".to_string(), "rust belt".to_string()]
    );
}

#[test]
fn test_results_render_when_latest_answers_first() {
    let page = Page::new();
    page.type_text("cargo", 1000);
    page.type_text("crate", 1000);

    page.backend.respond("crate");
    page.backend.respond("cargo");
    assert_eq!(
        *page.candidates.borrow(),
        vec!["crate (language)".to_string(), "crate belt".to_string()]
    );
}
