// src/watch/mod.rs

//! File watching and change classification.
//!
//! This module is responsible for:
//! - Registering one watch per directory under the root, and keeping that set
//!   in sync as directories come and go ([`tree`]).
//! - Translating `notify` events into raw `{path, kind}` events ([`backend`]).
//! - Filtering file events by suffix ([`filter`]).
//! - The event loop that routes events into the debounce engine
//!   ([`dispatcher`]).
//! - The optional startup scan of pre-existing files ([`stock`]).
//!
//! It does **not** decide when a file is settled; that is the job of
//! [`crate::debounce`].

pub mod backend;
pub mod dispatcher;
pub mod filter;
pub mod path_utils;
pub mod stock;
pub mod tree;
pub mod watcher;

pub use backend::{watch_channels, NotifyBackend, WatchBackend, WatchSenders, WatchStreams};
pub use dispatcher::Dispatcher;
pub use filter::ExtensionFilter;
pub use stock::scan_stock;
pub use tree::{DirectoryTree, EventClass};
pub use watcher::{spawn_watcher, WatchOptions, WatcherHandle};
