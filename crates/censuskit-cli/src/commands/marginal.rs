use anyhow::Result;

use crate::args::{MarginalArgs, OutputFormat};

pub async fn run(args: &MarginalArgs) -> Result<()> {
    let table = super::load_table(&args.table).await?;
    let marginal = table.marginal(args.axis);

    match args.format {
        OutputFormat::Json => super::print_json(&marginal)?,
        OutputFormat::Table => {
            println!("Marginal over axis {} ({})", marginal.dimension, marginal.family);
            println!("{}", super::distribution_table(&marginal.data));
            println!("Total: {}", marginal.total);
        }
    }
    Ok(())
}
