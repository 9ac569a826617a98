use colored::Colorize;

use crate::models::{ImageRepo, Outcome};
use crate::order::order;
use crate::retention::{is_protected_at, PROTECTED_TAGS};

/// Render the combined fetch errors as a banner. Partial data may still have
/// been printed above it.
pub fn print_error_banner(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    eprintln!();
    for err in errors {
        eprintln!("{} {}", "ERROR:".red().bold(), err);
    }
}

/// Image cards: name, tag count, the latest slot and the most recent
/// previous tags.
pub fn print_images(images: &[ImageRepo]) {
    for repo in images {
        let ordered = order(&repo.tags);

        println!("\n{}", repo.image.bold());
        println!(
            "  {} {}",
            format!("docker pull {}", repo.image).dimmed(),
            format!("({} tags)", ordered.len()).dimmed()
        );

        match ordered.first() {
            Some(latest) => {
                println!("  {} {}", "latest:".green().bold(), latest.green());
                let previous: Vec<&str> =
                    ordered.iter().skip(1).take(3).map(String::as_str).collect();
                if !previous.is_empty() {
                    println!("  {} {}", "previous:".dimmed(), previous.join(", ").dimmed());
                }
                let remaining = ordered.len().saturating_sub(4);
                if remaining > 0 {
                    println!("  {}", format!("+{} more", remaining).dimmed());
                }
            }
            None => println!("  {}", "No tags".italic().dimmed()),
        }
    }

    println!("\n{} images.", images.len());
}

pub fn print_repositories(repositories: &[String]) {
    for repo in repositories {
        println!("  - {}", repo);
    }
    println!("\n{} repositories.", repositories.len());
}

/// Full ordered tag list for one image with the retention verdict per
/// position. Position 0 is always rendered as the latest slot.
pub fn print_tag_list(image: &str, ordered: &[String]) {
    println!("\nImage: {}", image.bold());
    println!("{}", "─".repeat(60));

    if ordered.is_empty() {
        println!("  {}", "No tags".italic().dimmed());
        return;
    }

    for (index, tag) in ordered.iter().enumerate() {
        let label = if is_protected_at(index) {
            "PROTECTED".yellow().bold().to_string()
        } else {
            "DELETABLE".green().to_string()
        };
        let slot = if index == 0 { " (latest)" } else { "" };
        println!("  [{}] {}{}", label, tag, slot.dimmed());
    }

    let deletable = ordered.len().saturating_sub(PROTECTED_TAGS);
    println!(
        "\n{} tags, {} deletable (three most recent are protected).",
        ordered.len(),
        deletable
    );
}

/// Show what a prune run is about to delete.
pub fn print_plan(image: &str, selected: &[String]) {
    println!(
        "\n{} ({}): {} {}",
        image.bold(),
        selected.len(),
        "TO DELETE".red().bold(),
        selected.join(", ")
    );
}

/// Failure-weighted outcome line for a bulk delete.
pub fn print_outcome(outcome: &Outcome) {
    if outcome.failed > 0 {
        println!(
            "\n{} Deleted {} tags. Failed: {}",
            "PARTIAL:".red().bold(),
            outcome.deleted,
            outcome.failed.to_string().red().bold()
        );
    } else {
        println!(
            "\n{} Successfully deleted {} tags",
            "OK:".green().bold(),
            outcome.deleted
        );
    }
}
