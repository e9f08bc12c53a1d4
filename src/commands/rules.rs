//! Rules command implementation.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::abort;
use crate::cancel::CancellationToken;
use crate::cli::RulesArgs;
use crate::config::Config;
use crate::rules::{Cleaner, RuleCatalog};

/// Run the rules command.
pub fn run(args: RulesArgs, config: &Config) -> Result<()> {
    let dir = rules_dir(args.rules_dir, config);
    let catalog = RuleCatalog::new(&dir);
    let cleaners = catalog
        .load_rules()
        .with_context(|| format!("Failed to load rules from {}", catalog.dir().display()))?;

    let cleaners = if args.all {
        cleaners
    } else {
        let token = CancellationToken::with_timeout(config.detection.timeout());
        let guard = abort::global().start_operation(token);
        catalog.filter_installed_until(cleaners, guard.token())?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cleaners)?);
    } else {
        print_cleaners_table(&cleaners);
    }

    Ok(())
}

/// Rule directory from the command line, falling back to the config.
pub fn rules_dir(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.unwrap_or_else(|| config.rules.dir.clone())
}

fn print_cleaners_table(cleaners: &[Cleaner]) {
    if cleaners.is_empty() {
        println!("No cleaners found.");
        return;
    }

    println!("\n  {:<20} {:<30} {:<}", "ID", "NAME", "OPTIONS");
    println!("  {}", "─".repeat(72));

    for cleaner in cleaners {
        let options: Vec<&str> = cleaner.options.iter().map(|o| o.id.as_str()).collect();
        println!(
            "  {:<20} {:<30} {}",
            cleaner.id,
            cleaner.name,
            options.join(", ")
        );
        for option in &cleaner.options {
            if let Some(warning) = &option.warning {
                println!("  {:<20} ! {}: {}", "", option.id, warning);
            }
        }
    }

    println!(
        "\n{} cleaner{}",
        cleaners.len(),
        if cleaners.len() == 1 { "" } else { "s" }
    );
}
