//! Common display utilities for CLI commands.

use colored::Colorize;
use wikidepth::ItemError;
use wikidepth_edgelist::Warning;

const MAX_DISPLAY_ITEMS: usize = 5;

/// Display skipped categories and pages, truncated to a few entries.
pub fn print_failures(failures: &[ItemError]) {
    if failures.is_empty() {
        return;
    }

    println!();
    println!("{} ({}):", "Skipped".yellow().bold(), failures.len());
    for failure in failures.iter().take(MAX_DISPLAY_ITEMS) {
        println!("  {} {failure}", "•".yellow());
    }
    if failures.len() > MAX_DISPLAY_ITEMS {
        println!("  ... and {} more", failures.len() - MAX_DISPLAY_ITEMS);
    }
}

/// Display unreadable cache lines, truncated to a few entries.
pub fn print_cache_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }

    println!();
    println!(
        "{} ({}):",
        "Unreadable cache lines".yellow().bold(),
        warnings.len()
    );
    for warning in warnings.iter().take(MAX_DISPLAY_ITEMS) {
        println!("  {} {warning}", "•".yellow());
    }
    if warnings.len() > MAX_DISPLAY_ITEMS {
        println!("  ... and {} more", warnings.len() - MAX_DISPLAY_ITEMS);
    }
}
