//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r##"# lookml-qa configuration

# Check preset: "full", "code" (no visual-style checks) or "design"
# (visual-style checks only)
preset = "full"

# Lowest status that makes `lookml-qa check` exit non-zero: "fail" or "warning"
fail_on = "fail"

[engine]
# Evaluate checks on a thread pool
parallel = false
# Maximum nesting depth accepted by the parser
max_depth = 64

# Per-check settings. Every check accepts `enabled = false`.

[checks.join-optimization]
max_joins = 10

[checks.documentation]
# Share of visible fields and explores that must be documented
min_coverage = 0.5

[checks.performance-metrics]
max_query_limit = 5000
max_elements = 25

[checks.code-complexity]
max_fields = 50
max_sql_lines = 20

# [checks.color-palette-compliance]
# palette = ["#1a73e8", "#12b5cb", "#e52592", "#e8710a"]

# [checks.reserved-colors]
# reserved = ["#ea4335", "#34a853", "#fbbc04"]

[checks.layout-standards]
layout = "newspaper"
grid_columns = 24
# Warn about newspaper elements without row, col, width and height
require_positions = true

[checks.typography-consistency]
max_font_sizes = 3
"##;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("lookml-qa.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created lookml-qa.toml");
    println!("\nNext steps:");
    println!("  1. Edit lookml-qa.toml to tune checks");
    println!("  2. Run: lookml-qa check");

    Ok(())
}
