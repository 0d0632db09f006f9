//! Terminal output for the preview binary.

use console::style;

use crate::domain::Category;
use crate::orchestrator::ReleaseDecision;
use crate::skip::NoRelease;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display why no release will be made
pub fn display_skip(reason: &NoRelease) {
    println!("{} {}", style("•").dim(), reason);
}

/// Display the decided release: tag change, bump level and one count per section
pub fn display_decision(decision: &ReleaseDecision) {
    println!("\n{}", style("Release Decision:").bold());
    println!(
        "  From: {}  To: {}  ({})",
        style(&decision.previous_tag).red(),
        style(&decision.next_tag).green(),
        decision.bump
    );
    for category in Category::ALL {
        if let Some(commits) = decision.commits.get(category) {
            println!("  {:<15} {}", category.key(), commits.len());
        }
    }
}

/// Display the rendered release notes under a heading
pub fn display_notes(body: &str) {
    println!("\n{}", style("Release Notes:").bold().underlined());
    print!("{}", body);
}
