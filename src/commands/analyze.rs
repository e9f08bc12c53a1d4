//! Analyze command implementation.

use anyhow::{bail, Context, Result};
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::abort;
use crate::analyzer::{AnalyzeOptions, AnalyzeResponse, Analyzer, CleanRequest};
use crate::cancel::CancellationToken;
use crate::cli::AnalyzeArgs;
use crate::commands::rules::rules_dir;
use crate::config::Config;
use crate::rules::{RuleCatalog, RuleIndex};
use crate::signals::{install_abort_handlers, AbortWatcher};

/// Run the analyze command.
pub fn run(args: AnalyzeArgs, config: &Config, quiet: bool) -> Result<()> {
    let dir = rules_dir(args.rules_dir.clone(), config);
    let catalog = RuleCatalog::new(&dir);
    let cleaners = catalog
        .load_rules()
        .with_context(|| format!("Failed to load rules from {}", catalog.dir().display()))?;

    if let Err(err) = install_abort_handlers() {
        tracing::warn!("Failed to install signal handlers: {}", err);
    }
    let _watcher = AbortWatcher::spawn().context("Failed to start signal watcher")?;

    let cleaners = if args.installed {
        let token = CancellationToken::with_timeout(config.detection.timeout());
        let guard = abort::global().start_operation(token);
        catalog.filter_installed_until(cleaners, guard.token())?
    } else {
        cleaners
    };

    let index = RuleIndex::build(&cleaners);
    let requests = parse_selections(&args.selections, &index)?;

    let options = AnalyzeOptions::default()
        .with_workers(args.jobs.unwrap_or(config.analysis.workers))
        .with_sample_cap(config.analysis.sample_cap)
        .with_channel_capacity(config.analysis.walk_channel_capacity);
    let analyzer = Analyzer::new(options)?;

    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.analysis.timeout());

    tracing::info!(
        requests = requests.len(),
        workers = analyzer.workers(),
        timeout_secs = timeout.as_secs(),
        "Starting analysis"
    );

    let spinner = (!args.json && !quiet).then(|| start_spinner(requests.len()));

    let token = CancellationToken::with_timeout(timeout);
    let guard = abort::global().start_operation(token);
    let result = analyzer.analyze(guard.token(), &requests, &index);
    drop(guard);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let response = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    Ok(())
}

/// Turn `CLEANER:OPTION` and `CLEANER` selections into requests.
///
/// A bare cleaner expands to all of its options. Unknown names are passed
/// through or dropped; the analyzer skips them either way.
pub fn parse_selections(selections: &[String], index: &RuleIndex) -> Result<Vec<CleanRequest>> {
    let mut requests = Vec::new();

    for selection in selections {
        match selection.split_once(':') {
            Some((cleaner, option)) => {
                if cleaner.is_empty() || option.is_empty() {
                    bail!("Invalid selection '{}': expected CLEANER:OPTION", selection);
                }
                requests.push(CleanRequest::new(cleaner, option));
            }
            None => {
                if selection.is_empty() {
                    bail!("Empty selection");
                }
                if !index.contains_cleaner(selection) {
                    tracing::debug!(cleaner = %selection, "Skipping unknown cleaner");
                    continue;
                }
                let options = index.option_ids(selection);
                requests.extend(
                    options
                        .into_iter()
                        .map(|option| CleanRequest::new(selection.as_str(), option)),
                );
            }
        }
    }

    Ok(requests)
}

fn start_spinner(requests: usize) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(format!(
        "Analyzing {} option{}",
        requests,
        if requests == 1 { "" } else { "s" }
    ));
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn print_response(response: &AnalyzeResponse) {
    if response.items.is_empty() {
        println!("Nothing to analyze.");
        return;
    }

    let mut items: Vec<_> = response.items.iter().collect();
    items.sort_by(|a, b| {
        b.size
            .cmp(&a.size)
            .then_with(|| a.cleaner_id.cmp(&b.cleaner_id))
            .then_with(|| a.option_id.cmp(&b.option_id))
    });

    println!(
        "\n  {:<20} {:<20} {:>10} {:>12}",
        "CLEANER", "OPTION", "FILES", "SIZE"
    );
    println!("  {}", "─".repeat(66));

    for item in &items {
        println!(
            "  {:<20} {:<20} {:>10} {:>12}",
            item.cleaner_id,
            item.option_id,
            item.file_count,
            format_size(item.size, BINARY),
        );
        if item.skipped > 0 {
            println!("  {:<20} {} entries could not be read", "", item.skipped);
        }
    }

    println!(
        "\nTotal: {} in {} file{}",
        format_size(response.total_size, BINARY),
        response.total_files,
        if response.total_files == 1 { "" } else { "s" }
    );
}
