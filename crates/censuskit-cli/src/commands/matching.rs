use anyhow::{bail, Result};
use comfy_table::{Cell, Table as ComfyTable};

use censuskit_core::category::Family;
use censuskit_core::config::CensusKitConfig;

use crate::args::{MatchArgs, OutputFormat};

pub async fn run(args: &MatchArgs, config: Option<&CensusKitConfig>) -> Result<()> {
    let candidates: Vec<String> = match &args.table {
        Some(path) => {
            let table = super::load_table(path).await?;
            let Some(dimension) = table.dimension_for(args.family) else {
                bail!("{} has no {} axis", path.display(), args.family);
            };
            table
                .candidates(dimension)
                .into_iter()
                .map(|v| v.label)
                .collect()
        }
        None if args.candidates.is_empty() => standard(args.family),
        None => args.candidates.clone(),
    };

    let matcher = config.map(CensusKitConfig::matcher).unwrap_or_default();
    let result = matcher.match_label(args.family, &args.target, candidates.as_slice())?;

    match args.format {
        OutputFormat::Json => super::print_json(&result)?,
        OutputFormat::Table => {
            let mut t = ComfyTable::new();
            t.set_header(vec!["Target", "Matched", "Score", "Strategy", "Explanation"]);
            let score = if result.is_exact() {
                format!("{:.2} (exact)", result.score)
            } else {
                format!("{:.2}", result.score)
            };
            t.add_row(vec![
                Cell::new(&args.target),
                Cell::new(&result.matched.label),
                Cell::new(score),
                Cell::new(format!("{:?}", result.strategy)),
                Cell::new(&result.explanation),
            ]);
            println!("{}", t);
        }
    }
    Ok(())
}

fn standard(family: Family) -> Vec<String> {
    family
        .standard_labels()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
