//! Merges the results of one option's actions into a single item.

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::analyzer::types::{AnalyzeItem, CleanRequest};
use crate::detect::applies;
use crate::error::AnalyzeError;
use crate::probe::{probe_action, ActionResult, ProbeContext};
use crate::rules::Action;

/// Probe every action applicable to the host and merge what they found.
///
/// Actions run concurrently on the current pool. Each one is admitted only
/// while the token is live, and a token that fires at any point discards
/// the whole item.
pub fn analyze_actions(
    ctx: &ProbeContext<'_>,
    request: &CleanRequest,
    actions: &[Action],
) -> Result<AnalyzeItem, AnalyzeError> {
    let applicable: Vec<&Action> = actions
        .iter()
        .filter(|action| applies(&action.os, ctx.os))
        .collect();

    tracing::debug!(
        cleaner = %request.cleaner_id,
        option = %request.option_id,
        actions = applicable.len(),
        filtered = actions.len() - applicable.len(),
        "Analyzing option"
    );

    let merged = Mutex::new(ActionResult::default());
    applicable.par_iter().try_for_each(|action| {
        ctx.token.check()?;
        let found = probe_action(ctx, action);
        merged.lock().merge(found, ctx.sample_cap);
        Ok(())
    })?;
    ctx.token.check()?;

    let result = merged.into_inner();
    Ok(AnalyzeItem {
        cleaner_id: request.cleaner_id.clone(),
        option_id: request.option_id.clone(),
        size: result.size,
        file_count: result.file_count,
        paths: result.paths,
        skipped: result.skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationToken;
    use std::fs;
    use tempfile::TempDir;

    fn request() -> CleanRequest {
        CleanRequest::new("test", "files")
    }

    #[test]
    fn test_merges_all_strategies() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.log"), "x".repeat(10)).unwrap();
        fs::create_dir(tmp.path().join("cache")).unwrap();
        fs::write(tmp.path().join("cache/b"), "x".repeat(20)).unwrap();
        fs::write(tmp.path().join("history"), "x".repeat(30)).unwrap();

        let actions = vec![
            Action::new("glob", format!("{}/*.log", tmp.path().display())),
            Action::new("walk.files", tmp.path().join("cache").display().to_string()),
            Action::new("file", tmp.path().join("history").display().to_string()),
        ];

        let token = CancellationToken::new();
        let item = analyze_actions(&ProbeContext::new(&token, "linux"), &request(), &actions).unwrap();

        assert_eq!(item.cleaner_id, "test");
        assert_eq!(item.option_id, "files");
        assert_eq!(item.size, 60);
        assert_eq!(item.file_count, 3);
        assert_eq!(item.paths.len(), 3);
    }

    #[test]
    fn test_filters_other_hosts() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("only-on-windows.dat");
        fs::write(&file, "x".repeat(64)).unwrap();

        let actions = vec![Action::new("file", file.display().to_string()).with_os(&["windows"])];
        let token = CancellationToken::new();

        let on_linux = analyze_actions(&ProbeContext::new(&token, "linux"), &request(), &actions).unwrap();
        assert_eq!(on_linux.size, 0);
        assert_eq!(on_linux.file_count, 0);

        let on_windows =
            analyze_actions(&ProbeContext::new(&token, "windows"), &request(), &actions).unwrap();
        assert_eq!(on_windows.size, 64);
    }

    #[test]
    fn test_sample_cap_is_shared_across_actions() {
        let tmp = TempDir::new().unwrap();
        for dir in ["one", "two"] {
            fs::create_dir(tmp.path().join(dir)).unwrap();
            for i in 0..8 {
                fs::write(tmp.path().join(dir).join(format!("f{}", i)), "x").unwrap();
            }
        }
        let actions = vec![
            Action::new("walk.files", tmp.path().join("one").display().to_string()),
            Action::new("walk.files", tmp.path().join("two").display().to_string()),
        ];

        let token = CancellationToken::new();
        let ctx = ProbeContext::new(&token, "linux").with_sample_cap(5);
        let item = analyze_actions(&ctx, &request(), &actions).unwrap();

        assert_eq!(item.file_count, 16);
        assert_eq!(item.paths.len(), 5);
    }

    #[test]
    fn test_cancelled_returns_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a"), "x").unwrap();
        let actions = vec![Action::new("file", tmp.path().join("a").display().to_string())];

        let token = CancellationToken::new();
        token.cancel();
        let result = analyze_actions(&ProbeContext::new(&token, "linux"), &request(), &actions);

        assert_eq!(result, Err(AnalyzeError::Cancelled));
    }

    #[test]
    fn test_no_actions_is_empty_item() {
        let token = CancellationToken::new();
        let item = analyze_actions(&ProbeContext::new(&token, "linux"), &request(), &[]).unwrap();

        assert_eq!(item.size, 0);
        assert!(item.paths.is_empty());
    }
}
