use std::path::Path;

use super::{stat, ActionResult, ProbeContext};

/// Measure a single path. Directories and missing paths contribute nothing.
pub fn probe_file(ctx: &ProbeContext<'_>, path: &Path) -> ActionResult {
    let mut result = ActionResult::default();
    result.record(path, stat(path), ctx.sample_cap);
    result
}
