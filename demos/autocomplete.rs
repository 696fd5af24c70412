use kamo::{EventStream, RateStreamExt, StructuralStreamExt, TokioScheduler};
use std::time::Duration;
use tokio::task::LocalSet;
use tokio::time::sleep;

/// Pretend search service answering after a delay proportional to the query
fn search(query: String) -> EventStream<Vec<String>> {
    let results = EventStream::new();
    let out = results.clone();
    let latency = Duration::from_millis(50 * query.len() as u64);
    tokio::task::spawn_local(async move {
        sleep(latency).await;
        out.publish(vec![format!("{} (language)", query), format!("{} belt", query)]);
    });
    results
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let local = LocalSet::new();
    local
        .run_until(async {
            let scheduler = TokioScheduler::new();
            let keyups: EventStream<String> = EventStream::new();

            keyups
                .debounce(&scheduler, Duration::from_millis(300))
                .filter(|text| text.len() >= 3)
                .flat_map_latest(|text| search(text.clone()))
                .subscribe(|candidates| println!("Candidates: {:?}", candidates));

            for text in ["r", "ru", "rus", "rust"] {
                println!("typed {:?}", text);
                keyups.publish(text.to_string());
                sleep(Duration::from_millis(100)).await;
            }
            sleep(Duration::from_millis(1000)).await;
        })
        .await;
}
