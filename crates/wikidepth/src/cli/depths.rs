//! `wikidepth depths` command implementation.

use std::collections::BTreeMap;

use colored::Colorize;
use wikidepth::graph::sorted_by_depth;
use wikidepth::{discover, Config, DepthOptions};

/// Maximum categories to display per depth level.
const MAX_PER_DEPTH: usize = 15;

/// Run the depths command.
pub fn run(
    config: &Config,
    seeds: &[String],
    options: &DepthOptions,
) -> Result<(), wikidepth::Error> {
    let discovery = discover(config, seeds, options, false)?;

    println!(
        "{} from {}:",
        "Subcategories".white().bold(),
        seeds.join(", ").cyan().bold()
    );
    println!();

    // Entries arrive sorted by depth, then title
    let mut by_depth: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
    for (category, depth) in sorted_by_depth(&discovery.depths) {
        by_depth.entry(depth).or_default().push(category);
    }

    for (depth, categories) in &by_depth {
        let label = if *depth == 0 { "seeds" } else { "subcategories" };
        println!(
            "  {} {} ({}):",
            format!("Depth {depth}").yellow(),
            label.dimmed(),
            categories.len()
        );

        for category in categories.iter().take(MAX_PER_DEPTH) {
            let children = discovery.store.children_of(category).count();
            println!(
                "    {} {} {}",
                "•".dimmed(),
                category.white(),
                format!("({children} children)").dimmed()
            );
        }

        if categories.len() > MAX_PER_DEPTH {
            println!(
                "    {} ... and {} more at depth {depth}",
                "•".dimmed(),
                categories.len() - MAX_PER_DEPTH
            );
        }
    }

    println!();
    println!(
        "{}: {} categories over {} depth levels",
        "Summary".dimmed(),
        discovery.depths.len().to_string().green(),
        by_depth.len()
    );
    if discovery.cache_warnings > 0 {
        println!(
            "{}: {} unreadable cache lines",
            "Skipped".yellow(),
            discovery.cache_warnings
        );
    }

    Ok(())
}
