// tests/trigger_stream.rs
//
// Debounce timing over a raw notify channel, with Tokio's clock paused so the
// quiet periods are exact and instant.

mod common;
use crate::common::{init_tracing, remove_event, write_event};

use std::time::Duration;

use regex::Regex;
use tokio::sync::mpsc;
use notify::event::{AccessKind, AccessMode, EventKind};
use tokio::time::{advance, sleep, timeout, Instant};

use inl::errors::InlError;
use inl::watch::stream::NotifyMessage;
use inl::watch::{ChangeKind, EventFilter, TriggerStream};

const INTERVAL: Duration = Duration::from_millis(100);

fn default_filter() -> EventFilter {
    EventFilter::new(
        Regex::new(r"(^.*\.sw[px]$)|(/4913$)").unwrap(),
        Regex::new(".*").unwrap(),
    )
}

fn stream(filter: EventFilter) -> (mpsc::UnboundedSender<NotifyMessage>, TriggerStream) {
    init_tracing();
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, TriggerStream::new(rx, filter, INTERVAL))
}

#[tokio::test(start_paused = true)]
async fn burst_with_short_gaps_yields_one_trigger() {
    let (tx, mut stream) = stream(default_filter());
    let start = Instant::now();

    let producer = tx.clone();
    tokio::spawn(async move {
        for i in 0..5 {
            producer.send(Ok(write_event(&format!("/w/f{i}.rs")))).unwrap();
            sleep(Duration::from_millis(50)).await;
        }
    });

    let trigger = stream.next_trigger().await.unwrap();
    assert_eq!(trigger.count, 5);
    assert_eq!(trigger.first.path.to_str(), Some("/w/f0.rs"));
    assert_eq!(trigger.first.kind, ChangeKind::Write);
    // Last event at 200ms, then a full quiet period.
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn separated_events_yield_separate_triggers() {
    let (tx, mut stream) = stream(default_filter());

    let producer = tx.clone();
    tokio::spawn(async move {
        producer.send(Ok(write_event("/w/a.rs"))).unwrap();
        sleep(INTERVAL + Duration::from_millis(150)).await;
        producer.send(Ok(remove_event("/w/b.rs"))).unwrap();
    });

    let first = stream.next_trigger().await.unwrap();
    assert_eq!((first.first.path.to_str(), first.count), (Some("/w/a.rs"), 1));

    let second = stream.next_trigger().await.unwrap();
    assert_eq!((second.first.path.to_str(), second.count), (Some("/w/b.rs"), 1));
    assert_eq!(second.first.kind, ChangeKind::Remove);
}

#[tokio::test(start_paused = true)]
async fn excluded_events_never_start_a_burst() {
    let (tx, mut stream) = stream(default_filter());

    tx.send(Ok(write_event("/w/.main.rs.swp"))).unwrap();
    tx.send(Ok(write_event("/w/4913"))).unwrap();

    let result = timeout(Duration::from_secs(10), stream.next_trigger()).await;
    assert!(result.is_err(), "no trigger expected, got {result:?}");
}

#[tokio::test(start_paused = true)]
async fn excluded_events_never_extend_a_burst() {
    let (tx, mut stream) = stream(default_filter());
    let start = Instant::now();

    let producer = tx.clone();
    tokio::spawn(async move {
        producer.send(Ok(write_event("/w/a.rs"))).unwrap();
        sleep(Duration::from_millis(80)).await;
        producer.send(Ok(write_event("/w/.a.rs.swx"))).unwrap();
    });

    let trigger = stream.next_trigger().await.unwrap();
    assert_eq!(trigger.count, 1);
    let elapsed = start.elapsed();
    assert!(elapsed >= INTERVAL && elapsed < Duration::from_millis(150), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn include_pattern_selects_paths() {
    let filter = EventFilter::new(
        Regex::new(r"\.swp$").unwrap(),
        Regex::new(r"\.rs$").unwrap(),
    );
    let (tx, mut stream) = stream(filter);

    tx.send(Ok(write_event("/w/README.md"))).unwrap();
    tx.send(Ok(write_event("/w/src/lib.rs"))).unwrap();

    let trigger = stream.next_trigger().await.unwrap();
    assert_eq!(trigger.count, 1);
    assert_eq!(trigger.first.path.to_str(), Some("/w/src/lib.rs"));
}

#[tokio::test(start_paused = true)]
async fn rename_with_two_paths_counts_both() {
    let (tx, mut stream) = stream(default_filter());

    let event = notify::Event::new(notify::EventKind::Modify(notify::event::ModifyKind::Name(
        notify::event::RenameMode::Both,
    )))
    .add_path("/w/a.txt".into())
    .add_path("/w/b.txt".into());
    tx.send(Ok(event)).unwrap();

    let trigger = stream.next_trigger().await.unwrap();
    assert_eq!(trigger.count, 2);
    assert_eq!(trigger.first.kind, ChangeKind::Rename);
    assert_eq!(trigger.first.path.to_str(), Some("/w/a.txt"));
}

#[tokio::test(start_paused = true)]
async fn delivery_error_is_fatal() {
    let (tx, mut stream) = stream(default_filter());
    tx.send(Err(notify::Error::generic("event queue overflow"))).unwrap();

    let err = stream.next_trigger().await.unwrap_err();
    assert!(matches!(err, InlError::WatchDelivery(_)), "got {err:?}");
}

#[tokio::test(start_paused = true)]
async fn closed_channel_is_fatal() {
    let (tx, mut stream) = stream(default_filter());
    drop(tx);

    let err = stream.next_trigger().await.unwrap_err();
    assert!(matches!(err, InlError::WatchClosed), "got {err:?}");
}

#[tokio::test(start_paused = true)]
async fn flush_returns_queued_changes_without_waiting() {
    let (tx, mut stream) = stream(default_filter());
    assert!(stream.flush().unwrap().is_none());

    tx.send(Ok(write_event("/w/a.rs"))).unwrap();
    tx.send(Ok(write_event("/w/a.rs.swp"))).unwrap();
    tx.send(Ok(write_event("/w/b.rs"))).unwrap();

    let trigger = stream.flush().unwrap().expect("pending burst");
    assert_eq!(trigger.count, 2);
    assert_eq!(trigger.first.path.to_str(), Some("/w/a.rs"));
    assert!(stream.flush().unwrap().is_none());
}

fn access_event(kind: AccessKind, path: &str) -> notify::Event {
    notify::Event::new(EventKind::Access(kind)).add_path(path.into())
}

#[tokio::test(start_paused = true)]
async fn opens_and_reads_never_start_a_burst() {
    let (tx, mut stream) = stream(default_filter());

    // What listing a watched directory looks like from inotify.
    tx.send(Ok(access_event(AccessKind::Open(AccessMode::Any), "/w"))).unwrap();
    tx.send(Ok(access_event(AccessKind::Close(AccessMode::Read), "/w"))).unwrap();
    tx.send(Ok(access_event(AccessKind::Read, "/w/a.rs"))).unwrap();

    let result = timeout(Duration::from_secs(10), stream.next_trigger()).await;
    assert!(result.is_err(), "no trigger expected, got {result:?}");
    assert!(stream.flush().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn close_after_write_is_a_change() {
    let (tx, mut stream) = stream(default_filter());

    tx.send(Ok(access_event(AccessKind::Open(AccessMode::Any), "/w/a.rs"))).unwrap();
    tx.send(Ok(access_event(AccessKind::Close(AccessMode::Write), "/w/a.rs"))).unwrap();

    let trigger = stream.next_trigger().await.unwrap();
    assert_eq!(trigger.count, 1);
    assert_eq!(trigger.first.kind, ChangeKind::Write);
    assert_eq!(trigger.first.path.to_str(), Some("/w/a.rs"));
}

#[tokio::test(start_paused = true)]
async fn event_queued_after_the_deadline_opens_a_new_burst() {
    let (tx, mut stream) = stream(default_filter());

    tx.send(Ok(write_event("/w/a.rs"))).unwrap();
    // Absorb `a` without letting its deadline pass.
    let early = timeout(Duration::from_millis(1), stream.next_trigger()).await;
    assert!(early.is_err());

    // Step past the deadline with the next event already queued, so the
    // timer and the channel are ready at the same time.
    advance(INTERVAL).await;
    tx.send(Ok(write_event("/w/b.rs"))).unwrap();

    let first = stream.next_trigger().await.unwrap();
    assert_eq!((first.first.path.to_str(), first.count), (Some("/w/a.rs"), 1));
    let second = stream.next_trigger().await.unwrap();
    assert_eq!((second.first.path.to_str(), second.count), (Some("/w/b.rs"), 1));
}
