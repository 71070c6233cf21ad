use anyhow::Result;
use comfy_table::{Cell, Table as ComfyTable};
use serde::Serialize;

use censuskit_core::category::Family;
use censuskit_core::config::CensusKitConfig;
use censuskit_core::table::Dimension;

use crate::args::{InspectArgs, OutputFormat};

#[derive(Serialize)]
struct AxisReport {
    dimension: Dimension,
    family: Family,
    categories: Vec<String>,
    unrecognized: Vec<String>,
}

#[derive(Serialize)]
struct InspectReport {
    cells: usize,
    grand_total: u64,
    source: String,
    location: serde_json::Value,
    axes: Vec<AxisReport>,
}

pub async fn run(args: &InspectArgs, config: Option<&CensusKitConfig>) -> Result<()> {
    let table = super::load_table(&args.table).await?;
    let matcher = config.map(CensusKitConfig::matcher).unwrap_or_default();

    let axes: Vec<AxisReport> = [Dimension::A, Dimension::B]
        .into_iter()
        .map(|dimension| AxisReport {
            dimension,
            family: table.family(dimension),
            categories: table
                .candidates(dimension)
                .into_iter()
                .map(|v| v.label)
                .collect(),
            unrecognized: table.unrecognized_labels(dimension, matcher.normalizer()),
        })
        .collect();

    let report = InspectReport {
        cells: table.cells().len(),
        grand_total: table.grand_total(),
        source: table.source().to_string(),
        location: table.location().clone(),
        axes,
    };

    match args.format {
        OutputFormat::Json => super::print_json(&report)?,
        OutputFormat::Table => {
            println!("Table: {}", args.table.display());
            if !report.source.is_empty() {
                println!("Source: {}", report.source);
            }
            println!("Cells: {}  Grand total: {}", report.cells, report.grand_total);
            println!();

            for axis in &report.axes {
                println!("━━━ Axis {} ({}) ━━━", axis.dimension, axis.family);
                let mut t = ComfyTable::new();
                t.set_header(vec!["Category", "Recognized"]);
                for category in &axis.categories {
                    let recognized = !axis.unrecognized.contains(category);
                    t.add_row(vec![
                        Cell::new(category),
                        Cell::new(if recognized { "YES" } else { "NO" }),
                    ]);
                }
                println!("{}", t);
                println!();
            }
        }
    }
    Ok(())
}
