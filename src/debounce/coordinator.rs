// src/debounce/coordinator.rs

//! Per-path debounce state machine.
//!
//! Every path is either *Idle* (absent from the pending map) or *Pending*
//! (present, with a countdown task sleeping towards its deadline).
//!
//! A reset does not touch the countdown task: it only moves the entry's
//! deadline. When the task wakes it re-reads the entry under the lock and
//! either sleeps again until the new deadline, settles, or exits because the
//! entry it was started for is gone. Each entry carries a generation number
//! so a task can never settle an entry that was cancelled and re-created
//! while it slept.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::types::{OpKind, SettledFile};
use crate::watch::path_utils::absolutize;

use super::sink::{Delivery, SettlementSink};

/// Pending state for one path.
#[derive(Debug)]
struct PendingChange {
    kind: OpKind,
    deadline: Instant,
    generation: u64,
    task: AbortHandle,
}

#[derive(Debug, Default)]
struct PendingState {
    entries: HashMap<PathBuf, PendingChange>,
    next_generation: u64,
}

struct Shared {
    root: PathBuf,
    window: Duration,
    sink: SettlementSink,
    shutdown: CancellationToken,
    state: Mutex<PendingState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PendingState> {
        // Critical sections are single map operations; a poisoned map is
        // still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// What a countdown task does after waking up.
enum Wake {
    SleepUntil(Instant),
    Settle(OpKind),
    Exit,
}

/// Owns the path → pending-change map and spawns one countdown task per
/// pending path.
///
/// Cheap to clone; all clones share the same map. Methods that start a
/// countdown must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct DebounceCoordinator {
    shared: Arc<Shared>,
}

impl fmt::Debug for DebounceCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebounceCoordinator")
            .field("root", &self.shared.root)
            .field("window", &self.shared.window)
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

impl DebounceCoordinator {
    pub fn new(
        root: impl Into<PathBuf>,
        window: Duration,
        sink: SettlementSink,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                root: root.into(),
                window,
                sink,
                shutdown,
                state: Mutex::new(PendingState::default()),
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.shared.window
    }

    /// Route a filtered live event into the state machine.
    pub fn observe(&self, path: PathBuf, kind: OpKind) {
        if kind.is_qualifying() {
            self.touch(path, kind);
        } else {
            self.cancel(&path, kind);
        }
    }

    /// Start a countdown for a file found by the startup stock scan.
    pub fn enqueue_backlog(&self, path: PathBuf) {
        self.touch(path, OpKind::Backlog);
    }

    /// Number of paths currently pending.
    pub fn pending_count(&self) -> usize {
        self.shared.lock().entries.len()
    }

    /// Last recorded operation kind for a pending path.
    pub fn pending_kind(&self, path: &Path) -> Option<OpKind> {
        self.shared.lock().entries.get(path).map(|e| e.kind)
    }

    /// Drop every pending countdown without emitting. Returns how many were
    /// discarded.
    pub fn drain(&self) -> usize {
        let entries = std::mem::take(&mut self.shared.lock().entries);
        for (path, entry) in &entries {
            entry.task.abort();
            debug!(path = ?path, kind = %entry.kind, "pending countdown discarded");
        }
        entries.len()
    }

    fn touch(&self, path: PathBuf, kind: OpKind) {
        let deadline = Instant::now() + self.shared.window;
        let mut state = self.shared.lock();

        if let Some(entry) = state.entries.get_mut(&path) {
            if entry.kind != kind {
                debug!(path = ?path, from = %entry.kind, to = %kind, "pending kind changed");
            }
            entry.kind = kind;
            entry.deadline = deadline;
            debug!(path = ?path, kind = %kind, "countdown reset");
            return;
        }

        let generation = state.next_generation;
        state.next_generation += 1;

        let task = tokio::spawn(countdown(
            Arc::clone(&self.shared),
            path.clone(),
            generation,
            deadline,
        ));

        state.entries.insert(
            path.clone(),
            PendingChange {
                kind,
                deadline,
                generation,
                task: task.abort_handle(),
            },
        );
        drop(state);

        info!(path = ?path, kind = %kind, window = ?self.shared.window, "countdown started");
    }

    fn cancel(&self, path: &Path, kind: OpKind) {
        let removed = self.shared.lock().entries.remove(path);
        match removed {
            Some(entry) => {
                entry.task.abort();
                info!(path = ?path, kind = %kind, was = %entry.kind, "countdown cancelled");
            }
            None => debug!(path = ?path, kind = %kind, "nothing pending to cancel"),
        }
    }
}

fn decide(shared: &Shared, path: &Path, generation: u64) -> Wake {
    let mut state = shared.lock();
    match state.entries.get(path) {
        Some(entry) if entry.generation == generation => {
            if entry.deadline > Instant::now() {
                return Wake::SleepUntil(entry.deadline);
            }
        }
        _ => return Wake::Exit,
    }
    match state.entries.remove(path) {
        Some(entry) => Wake::Settle(entry.kind),
        None => Wake::Exit,
    }
}

async fn countdown(shared: Arc<Shared>, path: PathBuf, generation: u64, mut deadline: Instant) {
    let kind = loop {
        tokio::time::sleep_until(deadline).await;
        match decide(&shared, &path, generation) {
            Wake::SleepUntil(next) => deadline = next,
            Wake::Settle(kind) => break kind,
            Wake::Exit => return,
        }
    };

    let abs = absolutize(&path);
    info!(path = ?abs, kind = %kind, "file settled");

    let settled = SettledFile {
        path: abs,
        root: shared.root.clone(),
    };
    if shared.sink.deliver(settled, &shared.shutdown).await == Delivery::Delivered {
        debug!(path = ?path, "settlement delivered");
    }
}
