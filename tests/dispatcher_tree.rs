// tests/dispatcher_tree.rs

mod common;
use crate::common::{assert_about, init_tracing, secs, FakeBackend};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;

use filesettle::debounce::{settlement_channel, DebounceCoordinator};
use filesettle::errors::FilesettleError;
use filesettle::fs::mock::MockFileSystem;
use filesettle::fs::FileSystem;
use filesettle::types::{OpKind, RawEvent, SettledFile};
use filesettle::watch::{
    watch_channels, DirectoryTree, Dispatcher, EventClass, ExtensionFilter,
};

fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

fn sample_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/w/a.dat", b"a".to_vec());
    fs.add_file("/w/sub/b.dat", b"b".to_vec());
    fs.add_dir("/w/sub/deep");
    fs
}

struct Harness {
    fs: MockFileSystem,
    backend: FakeBackend,
    dispatcher: Dispatcher<FakeBackend>,
    rx: mpsc::Receiver<SettledFile>,
}

fn harness(fs: MockFileSystem) -> Harness {
    let backend = FakeBackend::new();
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());

    let mut tree = DirectoryTree::new(backend.clone(), shared);
    tree.initialize(Path::new("/w")).expect("initial walk");

    let (sink, rx) = settlement_channel();
    let coord = DebounceCoordinator::new("/w", secs(2), sink, CancellationToken::new());
    let dispatcher = Dispatcher::new(tree, ExtensionFilter::new([".dat"]), coord);

    Harness {
        fs,
        backend,
        dispatcher,
        rx,
    }
}

#[test]
fn initialize_registers_every_directory_including_root() {
    let backend = FakeBackend::new();
    let mut tree = DirectoryTree::new(backend.clone(), Arc::new(sample_fs()));

    let count = tree.initialize(Path::new("/w")).unwrap();

    assert_eq!(count, 3);
    assert_eq!(backend.registered(), vec![p("/w"), p("/w/sub"), p("/w/sub/deep")]);
    assert!(tree.is_watched(Path::new("/w/sub/deep")));
}

#[test]
fn initialize_fails_on_unreadable_tree() {
    let fs = sample_fs();
    fs.deny_read("/w/sub");
    let mut tree = DirectoryTree::new(FakeBackend::new(), Arc::new(fs));

    let err = tree.initialize(Path::new("/w")).unwrap_err();
    assert!(matches!(err, FilesettleError::WalkError { .. }));
}

#[test]
fn initialize_fails_on_missing_root() {
    let mut tree = DirectoryTree::new(FakeBackend::new(), Arc::new(MockFileSystem::new()));
    assert!(tree.initialize(Path::new("/missing")).is_err());
}

#[test]
fn initialize_fails_when_registration_is_refused() {
    let backend = FakeBackend::new();
    backend.refuse("/w/sub");
    let mut tree = DirectoryTree::new(backend, Arc::new(sample_fs()));

    assert!(matches!(
        tree.initialize(Path::new("/w")),
        Err(FilesettleError::IoError(_))
    ));
}

#[test]
fn classify_uses_a_fresh_status_check() {
    let fs = sample_fs();
    let tree = DirectoryTree::new(FakeBackend::new(), Arc::new(fs.clone()));

    assert_eq!(tree.classify(Path::new("/w/sub")), EventClass::Directory);
    assert_eq!(tree.classify(Path::new("/w/a.dat")), EventClass::File);

    fs.remove("/w/sub");
    assert_eq!(tree.classify(Path::new("/w/sub")), EventClass::File);
}

#[tokio::test(start_paused = true)]
async fn new_subdirectory_is_watched_and_its_files_settle() {
    init_tracing();
    let mut h = harness(sample_fs());
    let start = Instant::now();

    h.fs.add_dir("/w/new");
    h.dispatcher
        .handle_event(RawEvent::new("/w/new", OpKind::Create));
    assert!(h.dispatcher.tree().is_watched(Path::new("/w/new")));
    assert_eq!(h.backend.registered().last(), Some(&p("/w/new")));

    h.fs.add_file("/w/new/inner.dat", b"x".to_vec());
    h.dispatcher
        .handle_event(RawEvent::new("/w/new/inner.dat", OpKind::Create));
    assert_eq!(
        h.dispatcher.coordinator().pending_kind(Path::new("/w/new/inner.dat")),
        Some(OpKind::Create)
    );

    let settled = h.rx.recv().await.expect("settlement");
    assert_eq!(settled.path, p("/w/new/inner.dat"));
    assert_eq!(settled.root, p("/w"));
    assert_about(start.elapsed(), secs(2));
}

#[tokio::test(start_paused = true)]
async fn nested_directories_of_a_new_tree_are_not_walked() {
    let mut h = harness(sample_fs());

    h.fs.add_dir("/w/new/nested");
    h.dispatcher
        .handle_event(RawEvent::new("/w/new", OpKind::Create));

    assert!(h.dispatcher.tree().is_watched(Path::new("/w/new")));
    assert!(!h.dispatcher.tree().is_watched(Path::new("/w/new/nested")));
}

#[tokio::test(start_paused = true)]
async fn files_outside_the_suffix_list_are_ignored() {
    let mut h = harness(sample_fs());

    h.fs.add_file("/w/notes.txt", b"n".to_vec());
    h.dispatcher
        .handle_event(RawEvent::new("/w/notes.txt", OpKind::Create));

    assert_eq!(h.dispatcher.coordinator().pending_count(), 0);
    assert!(timeout(secs(10), h.rx.recv()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn removed_file_event_cancels_pending_countdown() {
    let mut h = harness(sample_fs());

    h.dispatcher
        .handle_event(RawEvent::new("/w/a.dat", OpKind::Write));
    h.fs.remove("/w/a.dat");
    h.dispatcher
        .handle_event(RawEvent::new("/w/a.dat", OpKind::Remove));

    assert_eq!(h.dispatcher.coordinator().pending_count(), 0);
    assert!(timeout(secs(10), h.rx.recv()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn vanished_directory_is_dropped_from_the_table() {
    let mut h = harness(sample_fs());

    h.fs.remove("/w/sub/deep");
    h.dispatcher
        .handle_event(RawEvent::new("/w/sub/deep", OpKind::Remove));

    assert!(!h.dispatcher.tree().is_watched(Path::new("/w/sub/deep")));
    assert_eq!(h.backend.unregistered(), vec![p("/w/sub/deep")]);
    assert!(h.dispatcher.last_error().is_none());
}

#[tokio::test(start_paused = true)]
async fn failed_dynamic_registration_is_recorded_not_fatal() {
    init_tracing();
    let mut h = harness(sample_fs());
    h.backend.refuse("/w/locked");

    h.fs.add_dir("/w/locked");
    h.dispatcher
        .handle_event(RawEvent::new("/w/locked", OpKind::Create));

    assert!(!h.dispatcher.tree().is_watched(Path::new("/w/locked")));
    assert!(matches!(
        h.dispatcher.last_error(),
        Some(FilesettleError::IoError(_))
    ));

    // Still routing file events afterwards.
    h.dispatcher
        .handle_event(RawEvent::new("/w/a.dat", OpKind::Write));
    assert_eq!(h.dispatcher.coordinator().pending_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn run_loop_routes_events_records_errors_and_releases_on_shutdown() {
    init_tracing();
    let Harness {
        backend,
        mut dispatcher,
        mut rx,
        ..
    } = harness(sample_fs());

    let (senders, streams) = watch_channels();
    let shutdown = CancellationToken::new();

    senders
        .events
        .send(RawEvent::new("/w/sub/b.dat", OpKind::Write))
        .unwrap();
    senders
        .errors
        .send(FilesettleError::ConfigError("queue overflow".to_string()))
        .unwrap();

    let loop_shutdown = shutdown.clone();
    let task = tokio::spawn(async move {
        dispatcher.run(streams, loop_shutdown).await;
        dispatcher
    });

    let settled = rx.recv().await.expect("settlement");
    assert_eq!(settled.path, p("/w/sub/b.dat"));

    shutdown.cancel();
    let dispatcher = timeout(secs(5), task).await.expect("loop stops").unwrap();

    assert!(matches!(
        dispatcher.last_error(),
        Some(FilesettleError::ConfigError(msg)) if msg == "queue overflow"
    ));
    assert_eq!(dispatcher.tree().watched().count(), 0);
    let mut released = backend.unregistered();
    released.sort();
    assert_eq!(released, vec![p("/w"), p("/w/sub"), p("/w/sub/deep")]);
}

#[tokio::test(start_paused = true)]
async fn run_loop_stops_when_event_stream_closes() {
    let Harness { mut dispatcher, .. } = harness(sample_fs());
    let (senders, streams) = watch_channels();
    drop(senders);

    timeout(secs(5), dispatcher.run(streams, CancellationToken::new()))
        .await
        .expect("loop stops on closed stream");
}
