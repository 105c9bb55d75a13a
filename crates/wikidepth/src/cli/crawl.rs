//! `wikidepth crawl` command implementation.

use colored::Colorize;
use wikidepth::{crawl, Config, CrawlOptions};

use super::display::print_failures;

/// Run the crawl command.
pub fn run(config: &Config, options: &CrawlOptions) -> Result<(), wikidepth::Error> {
    println!(
        "{} {}...",
        "Crawling".cyan().bold(),
        options.seeds.join(", ")
    );
    if options.refresh_cache {
        println!("{}", "Rebuilding subcategory link cache".yellow());
    }

    let summary = crawl(config, options)?;

    println!();
    if let Some(built) = summary.cache_built {
        println!(
            "{} {} subcategory links ({} skipped)",
            "Cached".green().bold(),
            built.links,
            built.skipped
        );
    }
    println!(
        "{} {} categories, {} links",
        "Loaded".green().bold(),
        summary.categories,
        summary.edges
    );
    if summary.cache_warnings > 0 {
        println!(
            "{}: {} unreadable cache lines",
            "Skipped".yellow(),
            summary.cache_warnings
        );
    }

    println!(
        "{} {} subcategories -> {}",
        "Discovered".green().bold(),
        summary.subcategories,
        summary.subcategories_path.display()
    );

    match &summary.pages_path {
        Some(path) => println!(
            "{} {} of {} pages -> {}",
            "Wrote".green().bold(),
            summary.pages_written,
            summary.pages_discovered,
            path.display()
        ),
        None => println!("{}", "Pages skipped".dimmed()),
    }

    let d = summary.durations;
    println!(
        "{}: load {:.2?}, depths {:.2?}, aggregate {:.2?}, pages {:.2?}",
        "Duration".dimmed(),
        d.load,
        d.depths,
        d.aggregate,
        d.pages
    );

    print_failures(&summary.failures);

    Ok(())
}
