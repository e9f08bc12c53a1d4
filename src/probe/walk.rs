//! Recursive directory probe.
//!
//! A dedicated producer thread walks the tree and feeds candidate paths
//! through a bounded channel. Workers on the current pool drain the channel
//! and stat each path. The producer blocks while the channel is full and
//! stops as soon as the token fires or every receiver is gone.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{SendTimeoutError, Sender};
use parking_lot::Mutex;
use rayon::iter::{ParallelBridge, ParallelIterator};
use walkdir::WalkDir;

use super::{stat, ActionResult, ProbeContext};
use crate::cancel::CancellationToken;

/// How long a blocked send waits before re-checking the token.
const SEND_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
struct WalkOutcome {
    /// Entries the walker could not read.
    skipped: u64,
    /// The root itself could not be read.
    root_failed: bool,
}

/// Walk `root` and stat every non-directory entry below it.
///
/// A root that cannot be read yields an empty result. Symlinks are not
/// followed during the walk.
pub fn probe_walk(ctx: &ProbeContext<'_>, root: &Path) -> ActionResult {
    let token = ctx.token;
    let cap = ctx.sample_cap;
    let (tx, rx) = crossbeam_channel::bounded::<PathBuf>(ctx.channel_capacity.max(1));
    let merged = Mutex::new(ActionResult::default());

    let outcome = thread::scope(|scope| {
        let producer = thread::Builder::new()
            .name("reclaim-walk".into())
            .spawn_scoped(scope, move || produce(root, &tx, token));

        let producer = match producer {
            Ok(handle) => handle,
            Err(err) => {
                tracing::error!("Failed to start walker for {}: {}", root.display(), err);
                return None;
            }
        };

        rx.into_iter().par_bridge().for_each(|path| {
            if token.is_cancelled() {
                return;
            }
            let outcome = stat(&path);
            merged.lock().record(&path, outcome, cap);
        });

        match producer.join() {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                tracing::error!("Walker for {} panicked", root.display());
                None
            }
        }
    });

    let Some(outcome) = outcome else {
        return ActionResult::default();
    };
    if outcome.root_failed || token.is_cancelled() {
        return ActionResult::default();
    }

    let mut result = merged.into_inner();
    result.skipped += outcome.skipped;
    tracing::debug!(
        root = %root.display(),
        files = result.file_count,
        bytes = result.size,
        skipped = result.skipped,
        "Walk complete"
    );
    result
}

fn produce(root: &Path, tx: &Sender<PathBuf>, token: &CancellationToken) -> WalkOutcome {
    let mut outcome = WalkOutcome::default();

    for entry in WalkDir::new(root).follow_links(false) {
        if token.is_cancelled() {
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 || err.path() == Some(root) => {
                tracing::warn!("Error walking {}: {}", root.display(), err);
                outcome.root_failed = true;
                break;
            }
            Err(err) => {
                tracing::trace!("Skipping entry under {}: {}", root.display(), err);
                outcome.skipped += 1;
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        if !send(tx, entry.into_path(), token) {
            break;
        }
    }

    outcome
}

/// Blocking send that gives up once the token fires or receivers are gone.
fn send(tx: &Sender<PathBuf>, path: PathBuf, token: &CancellationToken) -> bool {
    let mut item = path;
    loop {
        match tx.send_timeout(item, SEND_POLL) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(back)) => {
                if token.is_cancelled() {
                    return false;
                }
                item = back;
            }
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}
