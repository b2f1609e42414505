// Colored terminal output for trend tables and the taxonomy tree.
//
// The trend table goes to stderr so stdout stays a single JSON document.

use colored::Colorize;

use super::truncate_chars;
use crate::taxonomy::{category_code, Taxonomy};
use crate::trends::TrendRecord;

/// Display the trending topics as a ranked table on stderr.
pub fn display_trends(trends: &[TrendRecord], total_patterns: usize) {
    if trends.is_empty() {
        eprintln!(
            "{}",
            "No trending topics: no topic has incidents in two different weeks yet.".dimmed()
        );
        return;
    }

    eprintln!(
        "\n{}",
        format!(
            "=== Trending Topics (top {} of {}) ===",
            trends.len(),
            total_patterns
        )
        .bold()
    );
    eprintln!();

    eprintln!(
        "  {:>4}  {:<40} {:>6} {:>6}  {:>9}",
        "Rank".dimmed(),
        "Topic".dimmed(),
        "Prev".dimmed(),
        "Last".dimmed(),
        "Change".dimmed(),
    );
    eprintln!("  {}", "-".repeat(72).dimmed());

    for (i, trend) in trends.iter().enumerate() {
        eprintln!(
            "  {:>4}. {:<40} {:>6} {:>6}  {}",
            i + 1,
            truncate_chars(&trend.topic_name, 37),
            trend.prev_week_count,
            trend.last_week_count,
            colorize_change(trend.percent_change),
        );
    }
    eprintln!();
}

/// Print the category tree, marking child labels that have a canned summary.
pub fn display_taxonomy(taxonomy: &Taxonomy) {
    println!(
        "\n{}",
        format!(
            "=== Scam Taxonomy ({} categories, {} labels) ===",
            taxonomy.parents().len(),
            taxonomy.child_count()
        )
        .bold()
    );

    for parent in taxonomy.parents() {
        println!(
            "\n  {} {}",
            parent.bold(),
            format!("[{}]", category_code(parent)).dimmed()
        );
        for child in taxonomy.children(parent) {
            if taxonomy.template(child).is_some() {
                println!("    - {} {}", child, "(template)".cyan());
            } else {
                println!("    - {child}");
            }
        }
    }
    println!();
}

fn colorize_change(percent: f64) -> colored::ColoredString {
    let text = format!("{percent:>+8.2}%");
    if percent >= 100.0 {
        text.red().bold()
    } else if percent > 0.0 {
        text.bright_red()
    } else if percent < 0.0 {
        text.green()
    } else {
        text.normal()
    }
}
