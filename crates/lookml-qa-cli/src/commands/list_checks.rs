//! List checks command implementation.

use lookml_qa_core::{Category, Config};
use lookml_qa_rules::{all_checks, Preset};

/// Runs the list-checks command.
pub fn run() {
    println!("Available checks:\n");
    println!("{:<4} {:<26} {:<15} Name", "#", "Id", "Category");
    println!("{}", "-".repeat(80));

    for (index, check) in all_checks(&Config::default()).iter().enumerate() {
        println!(
            "{:<4} {:<26} {:<15} {}",
            index + 1,
            check.id(),
            check.category().as_str(),
            check.name()
        );
    }

    println!("\nCategories: {}", category_list());

    println!("\nPresets:");
    for preset in [Preset::Full, Preset::Code, Preset::Design] {
        let count = preset.checks(&Config::default()).len();
        println!("  {:<8} - {count} checks", preset.to_string());
    }

    println!("\nUse --checks to select checks by id, name, category or glob, e.g.:");
    println!("  lookml-qa check --checks naming-conventions,data-types");
    println!("  lookml-qa check --checks visual-style");
    println!("  lookml-qa check --checks 'color-*'");
}

fn category_list() -> String {
    Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
