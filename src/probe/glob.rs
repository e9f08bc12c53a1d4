//! Wildcard expansion and the glob probe.
//!
//! A pattern is split at its first component containing a glob
//! metacharacter. The literal prefix becomes the walk root and the full
//! pattern is matched against every entry below it, up to the pattern's
//! depth (unbounded when it contains `**`). `*`, `?` and `[...]` never match
//! a path separator. Braces are literal, so `{GUID}` directories match as
//! written. Symlinked directories are followed.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use parking_lot::Mutex;
use rayon::prelude::*;
use walkdir::WalkDir;

use super::{stat, ActionResult, ProbeContext};

const META_CHARS: &[char] = &['*', '?', '['];

fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}

enum Source {
    Literal(Option<PathBuf>),
    Walk {
        root: PathBuf,
        entries: walkdir::IntoIter,
        matcher: GlobMatcher,
        strip_dot: bool,
    },
}

/// Iterator over the existing paths matching a glob pattern.
pub struct GlobMatches {
    source: Source,
    skipped: u64,
}

impl GlobMatches {
    /// Prepare the expansion of `pattern`. Fails only on malformed patterns.
    pub fn new(pattern: &Path) -> Result<Self, globset::Error> {
        let text = pattern.to_string_lossy();
        let text = trim_trailing_separators(&text);

        let Some((base, depth)) = split_pattern(text) else {
            let path = PathBuf::from(text);
            let exists = fs::symlink_metadata(&path).is_ok();
            return Ok(Self {
                source: Source::Literal(exists.then_some(path)),
                skipped: 0,
            });
        };

        let matcher = GlobBuilder::new(&escape_braces(text))
            .literal_separator(true)
            .build()?
            .compile_matcher();

        let strip_dot = base.is_empty();
        let root = if strip_dot { "." } else { base };

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        if let Some(depth) = depth {
            walker = walker.max_depth(depth);
        }

        Ok(Self {
            source: Source::Walk {
                root: PathBuf::from(root),
                entries: walker.into_iter(),
                matcher,
                strip_dot,
            },
            skipped: 0,
        })
    }

    /// Entries below the base that could not be read so far.
    ///
    /// A missing or unreadable base is not counted.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl Iterator for GlobMatches {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        match &mut self.source {
            Source::Literal(path) => path.take(),
            Source::Walk {
                root,
                entries,
                matcher,
                strip_dot,
            } => {
                for entry in entries.by_ref() {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(err) => {
                            if err.depth() > 0 && err.path() != Some(root.as_path()) {
                                tracing::debug!("Skipping glob entry: {}", err);
                                self.skipped += 1;
                            }
                            continue;
                        }
                    };
                    let path = entry.path();
                    let candidate = if *strip_dot {
                        path.strip_prefix(".").unwrap_or(path)
                    } else {
                        path
                    };
                    if matcher.is_match(candidate) {
                        return Some(candidate.to_path_buf());
                    }
                }
                None
            }
        }
    }
}

/// Make `{` and `}` match themselves instead of opening an alternation.
fn escape_braces(text: &str) -> String {
    text.replace('{', "[{]").replace('}', "[}]")
}

fn trim_trailing_separators(text: &str) -> &str {
    let trimmed = text.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        text
    } else {
        trimmed
    }
}

/// Literal base directory and walk depth of a wildcard pattern.
///
/// Returns `None` if the pattern has no metacharacters. A depth of `None`
/// means unbounded.
fn split_pattern(text: &str) -> Option<(&str, Option<usize>)> {
    let mut offset = 0;
    let mut meta_at = None;
    let mut total = 0;
    let mut recursive = false;

    for component in text.split(is_separator) {
        if meta_at.is_none() && component.contains(META_CHARS) {
            meta_at = Some(offset);
        }
        if meta_at.is_some() {
            total += 1;
            recursive |= component.contains("**");
        } else {
            offset += component.len() + 1;
        }
    }

    let start = meta_at?;
    let mut base = &text[..start];
    if base.len() > 1 && base.ends_with(is_separator) && !base[..base.len() - 1].ends_with(':') {
        base = &base[..base.len() - 1];
    }

    Some((base, if recursive { None } else { Some(total) }))
}

/// Stat every match of `pattern` on the current worker pool.
///
/// Directories and failed stats are excluded. Match collection stops early
/// once the token fires.
pub fn probe_glob(ctx: &ProbeContext<'_>, pattern: &Path) -> ActionResult {
    let mut matches = match GlobMatches::new(pattern) {
        Ok(matches) => matches,
        Err(err) => {
            tracing::warn!("Error in glob {}: {}", pattern.display(), err);
            return ActionResult::default();
        }
    };

    let mut found = Vec::new();
    for path in matches.by_ref() {
        if ctx.token.is_cancelled() {
            return ActionResult::default();
        }
        found.push(path);
    }

    tracing::info!(path = %pattern.display(), matches = found.len(), "Processing glob");

    let merged = Mutex::new(ActionResult::default());
    found.par_iter().for_each(|path| {
        if ctx.token.is_cancelled() {
            return;
        }
        let outcome = stat(path);
        merged.lock().record(path, outcome, ctx.sample_cap);
    });

    let mut result = merged.into_inner();
    result.skipped += matches.skipped();
    result
}
