//! Filesystem probes for rule actions.
//!
//! Every probe is read-only: it stats paths and reports what it found.
//! Entry-level I/O failures are counted as skipped and never abort a probe.

pub mod file;
pub mod glob;
pub mod resolve;
pub mod walk;

use std::fs;
use std::io;
use std::path::Path;

use crate::cancel::CancellationToken;
use crate::rules::Action;

pub use resolve::{resolve, Strategy};

/// Default maximum number of sample paths kept per item.
pub const DEFAULT_SAMPLE_CAP: usize = 500;

/// Default capacity of the walk producer/consumer channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Shared, read-only state threaded through one analysis.
#[derive(Debug, Clone, Copy)]
pub struct ProbeContext<'a> {
    pub token: &'a CancellationToken,
    /// Host identifier used to filter actions.
    pub os: &'a str,
    pub sample_cap: usize,
    pub channel_capacity: usize,
}

impl<'a> ProbeContext<'a> {
    pub fn new(token: &'a CancellationToken, os: &'a str) -> Self {
        Self {
            token,
            os,
            sample_cap: DEFAULT_SAMPLE_CAP,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_sample_cap(mut self, cap: usize) -> Self {
        self.sample_cap = cap;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }
}

/// Result of statting one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOutcome {
    /// A non-directory entry of the given size.
    Present(u64),
    /// Missing, or a directory.
    Absent,
    /// The stat failed for another reason (permissions, I/O).
    Skipped,
}

/// Stat `path`, following symlinks.
pub fn stat(path: &Path) -> StatOutcome {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => StatOutcome::Absent,
        Ok(meta) => StatOutcome::Present(meta.len()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => StatOutcome::Absent,
        Err(err) => {
            tracing::trace!("Skipping {}: {}", path.display(), err);
            StatOutcome::Skipped
        }
    }
}

/// What one action found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionResult {
    /// Total bytes of matched files
    pub size: u64,
    /// Number of matched files
    pub file_count: u64,
    /// Sample of matched paths, at most the sample cap
    pub paths: Vec<String>,
    /// Entries whose stat failed
    pub skipped: u64,
}

impl ActionResult {
    /// Account for one stat outcome, keeping at most `cap` sample paths.
    pub fn record(&mut self, path: &Path, outcome: StatOutcome, cap: usize) {
        match outcome {
            StatOutcome::Present(size) => {
                self.size += size;
                self.file_count += 1;
                if self.paths.len() < cap {
                    self.paths.push(path.to_string_lossy().into_owned());
                }
            }
            StatOutcome::Absent => {}
            StatOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Fold `other` into `self`; the path cap applies to the combined list.
    pub fn merge(&mut self, other: ActionResult, cap: usize) {
        self.size += other.size;
        self.file_count += other.file_count;
        self.skipped += other.skipped;

        let room = cap.saturating_sub(self.paths.len());
        self.paths.extend(other.paths.into_iter().take(room));
    }

    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }
}

/// Resolve an action's path and measure it with the matching strategy.
pub fn probe_action(ctx: &ProbeContext<'_>, action: &Action) -> ActionResult {
    if ctx.token.is_cancelled() {
        return ActionResult::default();
    }

    let resolved = resolve(&action.path);
    let strategy = Strategy::select(&action.search, &resolved);
    tracing::debug!(path = %resolved.display(), ?strategy, "Probing action");

    match strategy {
        Strategy::Glob => glob::probe_glob(ctx, &resolved),
        Strategy::Walk => walk::probe_walk(ctx, &resolved),
        Strategy::File => file::probe_file(ctx, &resolved),
    }
}
