use anyhow::{bail, Result};
use comfy_table::{Cell, Table as ComfyTable};

use censuskit_core::config::CensusKitConfig;
use censuskit_core::matcher::build_crosswalk;

use crate::args::{CrosswalkArgs, OutputFormat};

pub async fn run(args: &CrosswalkArgs, config: Option<&CensusKitConfig>) -> Result<()> {
    let to: Vec<String> = match &args.table {
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
        None => args.to.clone(),
    };
    let from: Vec<String> = if args.from.is_empty() {
        args.family
            .standard_labels()
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        args.from.clone()
    };

    let matcher = config.map(CensusKitConfig::matcher).unwrap_or_default();
    let walk = build_crosswalk(&matcher, args.family, from.as_slice(), to.as_slice())?;

    let weak = walk.weak_entries(args.threshold);
    for entry in &weak {
        tracing::warn!(
            "'{}' maps weakly onto '{}' (score {:.2})",
            entry.from,
            entry.to,
            entry.score
        );
    }

    match args.format {
        OutputFormat::Json => super::print_json(&walk)?,
        OutputFormat::Table => {
            let mut t = ComfyTable::new();
            t.set_header(vec!["From", "To", "Score", "Explanation"]);
            for entry in &walk.entries {
                let score = if entry.score < args.threshold {
                    format!("{:.2} (weak)", entry.score)
                } else {
                    format!("{:.2}", entry.score)
                };
                t.add_row(vec![
                    Cell::new(&entry.from),
                    Cell::new(&entry.to),
                    Cell::new(score),
                    Cell::new(&entry.explanation),
                ]);
            }
            println!("{}", t);
            println!();

            let mut reverse = ComfyTable::new();
            reverse.set_header(vec!["Target", "Covers"]);
            for (target, sources) in walk.reverse() {
                reverse.add_row(vec![Cell::new(target), Cell::new(sources.join(", "))]);
            }
            println!("{}", reverse);

            if !weak.is_empty() {
                println!(
                    "{} of {} labels scored below {:.2}",
                    weak.len(),
                    walk.entries.len(),
                    args.threshold
                );
            }
        }
    }
    Ok(())
}
