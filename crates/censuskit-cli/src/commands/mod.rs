pub mod condition;
pub mod crosswalk;
pub mod inspect;
pub mod marginal;
pub mod matching;
pub mod query;

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table as ComfyTable};
use indicatif::{ProgressBar, ProgressStyle};

use censuskit_core::config::{read_config, read_config_file, CensusKitConfig};
use censuskit_core::query::provider::read_table_file;
use censuskit_core::table::{DistributionRow, JointDistributionTable};

/// Load censuskit.toml from an explicit path, else from the working directory.
pub fn load_config(explicit: Option<&Path>) -> Result<Option<CensusKitConfig>> {
    match explicit {
        Some(path) => {
            let config = read_config_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(read_config(Path::new("."))?),
    }
}

pub async fn load_table(path: &Path) -> Result<JointDistributionTable> {
    read_table_file(path)
        .await
        .with_context(|| format!("Failed to load joint table {}", path.display()))
}

pub fn spinner(prefix: &str, message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} [{prefix}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(prefix.to_string());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

pub fn distribution_table(rows: &[DistributionRow]) -> ComfyTable {
    let mut t = ComfyTable::new();
    t.set_header(vec!["Category", "Count", "Percent"]);
    for row in rows {
        t.add_row(vec![
            Cell::new(&row.category),
            Cell::new(row.value),
            Cell::new(format!("{:.1}%", row.percentage)),
        ]);
    }
    t
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
