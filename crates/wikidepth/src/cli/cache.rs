//! `wikidepth cache` command implementation.

use colored::Colorize;
use wikidepth::cache::{load_cache, load_or_build};
use wikidepth::{Config, WikiDb};

use super::display::print_cache_warnings;

/// Run the cache command.
pub fn run(config: &Config, refresh: bool) -> Result<(), wikidepth::Error> {
    config.validate()?;

    let loaded = if refresh || !config.cache.exists() {
        println!(
            "{} {}...",
            "Fetching subcategory links from".cyan().bold(),
            config.database.display()
        );
        let db = WikiDb::open(&config.database, 1)?;
        let stats = db.stats()?;
        println!(
            "  {}: {} pages, {} subcategory links, {} page links",
            "Database".white().bold(),
            stats.page_count,
            stats.subcat_link_count,
            stats.page_link_count
        );
        load_or_build(&db, &config.cache, refresh)?
    } else {
        println!(
            "{} {}",
            "Cache is up to date:".cyan().bold(),
            config.cache.display()
        );
        load_cache(&config.cache)?
    };

    println!();
    if let Some(built) = loaded.built {
        println!(
            "{} {} links to {}",
            "Cached".green().bold(),
            built.links,
            config.cache.display()
        );
        if built.skipped > 0 {
            println!(
                "{}: {} links with unrepresentable titles",
                "Skipped".yellow(),
                built.skipped
            );
        }
    }
    println!(
        "{}: {} categories, {} links",
        "Contents".white().bold(),
        loaded.store.category_count().to_string().green(),
        loaded.store.edge_count()
    );

    print_cache_warnings(&loaded.warnings);

    Ok(())
}
