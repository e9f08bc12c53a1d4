use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::analyzer::aggregate::analyze_actions;
use crate::analyzer::types::{AnalyzeItem, AnalyzeResponse, CleanRequest};
use crate::cancel::CancellationToken;
use crate::detect::current_os;
use crate::error::{AnalyzeError, Result};
use crate::probe::{ProbeContext, DEFAULT_CHANNEL_CAPACITY, DEFAULT_SAMPLE_CAP};
use crate::rules::{Action, RuleIndex};

/// Tuning knobs for an [`Analyzer`].
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Worker threads in the shared pool (0 = logical core count)
    pub workers: usize,
    /// Maximum sample paths per item
    pub sample_cap: usize,
    /// Capacity of each walk's producer channel
    pub channel_capacity: usize,
    /// Host identifier used to filter actions
    pub os: String,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            workers: 0,
            sample_cap: DEFAULT_SAMPLE_CAP,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            os: current_os().to_string(),
        }
    }
}

impl AnalyzeOptions {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_sample_cap(mut self, cap: usize) -> Self {
        self.sample_cap = cap;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Analyse as if running on `os`.
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }
}

/// Measures reclaimable space for batches of requests.
///
/// Every level of fan-out runs on one pool owned by the analyzer, so the
/// pool size bounds concurrent probes regardless of nesting.
pub struct Analyzer {
    pool: ThreadPool,
    options: AnalyzeOptions,
}

impl Analyzer {
    pub fn new(options: AnalyzeOptions) -> Result<Self> {
        let workers = if options.workers == 0 {
            num_cpus::get()
        } else {
            options.workers
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("reclaim-worker-{}", i))
            .build()?;

        Ok(Self { pool, options })
    }

    /// Number of threads in the shared pool.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn options(&self) -> &AnalyzeOptions {
        &self.options
    }

    /// Analyse `requests` against `index`.
    ///
    /// Requests naming an unknown cleaner or option are skipped. If the
    /// token is cancelled or its deadline passes before the batch finishes,
    /// the batch is abandoned and no partial response is returned.
    pub fn analyze(
        &self,
        token: &CancellationToken,
        requests: &[CleanRequest],
        index: &RuleIndex,
    ) -> std::result::Result<AnalyzeResponse, AnalyzeError> {
        token.check()?;

        let resolved: Vec<(&CleanRequest, &[Action])> = requests
            .iter()
            .filter_map(|request| {
                match index.actions(&request.cleaner_id, &request.option_id) {
                    Some(actions) => Some((request, actions)),
                    None => {
                        tracing::debug!(
                            cleaner = %request.cleaner_id,
                            option = %request.option_id,
                            "Skipping unknown selection"
                        );
                        None
                    }
                }
            })
            .collect();

        let ctx = ProbeContext::new(token, &self.options.os)
            .with_sample_cap(self.options.sample_cap)
            .with_channel_capacity(self.options.channel_capacity);

        let items: Vec<AnalyzeItem> = self.pool.install(|| {
            resolved
                .par_iter()
                .map(|(request, actions)| {
                    token.check()?;
                    analyze_actions(&ctx, request, actions)
                })
                .collect::<std::result::Result<Vec<_>, AnalyzeError>>()
        })?;
        token.check()?;

        let response = AnalyzeResponse::from_items(items);
        tracing::info!(
            requests = requests.len(),
            items = response.items.len(),
            total_size = response.total_size,
            total_files = response.total_files,
            "Analysis complete"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{CleanOption, Cleaner, Detection};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn cleaner(id: &str, option: &str, actions: Vec<Action>) -> Cleaner {
        Cleaner {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            running: false,
            detect: Detection::always(),
            options: vec![CleanOption {
                id: option.into(),
                label: option.into(),
                description: String::new(),
                warning: None,
                actions,
            }],
        }
    }

    fn analyzer() -> Analyzer {
        Analyzer::new(AnalyzeOptions::default().with_workers(2).with_os("linux")).unwrap()
    }

    #[test]
    fn test_workers_default_to_core_count() {
        let analyzer = Analyzer::new(AnalyzeOptions::default()).unwrap();
        assert_eq!(analyzer.workers(), num_cpus::get());
        assert_eq!(analyzer.options().sample_cap, DEFAULT_SAMPLE_CAP);
    }

    #[test]
    fn test_analyze_sums_requests() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a"), "x".repeat(100)).unwrap();
        fs::write(tmp.path().join("b"), "x".repeat(50)).unwrap();

        let index = RuleIndex::build(&[
            cleaner("one", "a", vec![Action::new("file", tmp.path().join("a").display().to_string())]),
            cleaner("two", "b", vec![Action::new("file", tmp.path().join("b").display().to_string())]),
        ]);
        let requests = vec![CleanRequest::new("one", "a"), CleanRequest::new("two", "b")];

        let response = analyzer()
            .analyze(&CancellationToken::new(), &requests, &index)
            .unwrap();

        assert_eq!(response.total_size, 150);
        assert_eq!(response.total_files, 2);
        assert_eq!(response.items.len(), 2);
    }

    #[test]
    fn test_unknown_requests_are_skipped() {
        let index = RuleIndex::build(&[cleaner("one", "a", Vec::new())]);
        let requests = vec![
            CleanRequest::new("missing", "a"),
            CleanRequest::new("one", "missing"),
            CleanRequest::new("one", "a"),
        ];

        let response = analyzer()
            .analyze(&CancellationToken::new(), &requests, &index)
            .unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].cleaner_id, "one");
    }

    #[test]
    fn test_empty_batch() {
        let response = analyzer()
            .analyze(&CancellationToken::new(), &[], &RuleIndex::default())
            .unwrap();
        assert_eq!(response, AnalyzeResponse::default());
    }

    #[test]
    fn test_cancelled_token_is_reported() {
        let token = CancellationToken::new();
        token.cancel();

        let result = analyzer().analyze(&token, &[], &RuleIndex::default());
        assert_eq!(result, Err(AnalyzeError::Cancelled));
    }

    #[test]
    fn test_expired_deadline_is_reported() {
        let token = CancellationToken::with_timeout(Duration::ZERO);

        let result = analyzer().analyze(&token, &[], &RuleIndex::default());
        assert_eq!(result, Err(AnalyzeError::DeadlineExceeded));
    }
}
