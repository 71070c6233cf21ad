use anyhow::{bail, Result};

use censuskit_core::category::CategoryValue;
use censuskit_core::config::CensusKitConfig;
use censuskit_core::table::ConditionalDistribution;

use crate::args::{ConditionArgs, OutputFormat};

pub async fn run(args: &ConditionArgs, config: Option<&CensusKitConfig>) -> Result<()> {
    let table = super::load_table(&args.table).await?;

    // With --family the value is reconciled first; with --axis it must match exactly.
    let (dimension, label, explanation) = match (args.axis, args.family) {
        (Some(axis), _) => (axis, args.value.clone(), None),
        (None, Some(family)) => {
            let Some(dimension) = table.dimension_for(family) else {
                bail!(
                    "{} has no {} axis (axes are {} and {})",
                    args.table.display(),
                    family,
                    table.family(censuskit_core::Dimension::A),
                    table.family(censuskit_core::Dimension::B)
                );
            };
            let matcher = config.map(CensusKitConfig::matcher).unwrap_or_default();
            let result = matcher.match_value(
                &CategoryValue::new(family, args.value.as_str()),
                &table.candidates(dimension),
            )?;
            (dimension, result.matched.label, Some((result.score, result.explanation)))
        }
        (None, None) => bail!("Pass --axis a|b or --family <family> to pick the axis"),
    };

    if !table.contains(dimension, &label) {
        tracing::warn!("'{}' does not appear on axis {}", label, dimension);
    }
    let conditional = table.condition_on(dimension, &label);

    match args.format {
        OutputFormat::Json => super::print_json(&conditional)?,
        OutputFormat::Table => print_conditional(&conditional, explanation),
    }
    Ok(())
}

fn print_conditional(conditional: &ConditionalDistribution, explanation: Option<(f64, String)>) {
    println!(
        "Given {} = '{}'",
        conditional.condition.family, conditional.condition.label
    );
    if let Some((score, explanation)) = explanation {
        println!("Match: {} (score {:.2})", explanation, score);
    }
    if conditional.is_empty() {
        println!("No data for this value.");
        return;
    }
    println!("{}", super::distribution_table(&conditional.data));
    println!("Total: {}", conditional.total);
    if !conditional.data_source.is_empty() {
        println!("Source: {}", conditional.data_source);
    }
}
