use anyhow::{bail, Context, Result};
use comfy_table::{Cell, Table as ComfyTable};

use censuskit_core::config::CensusKitConfig;
use censuskit_core::query::{
    JsonFileProvider, QueryContext, QueryEngine, SourceSpec, SourceStatus, UnifiedResult,
    DEFAULT_MAX_CONCURRENCY,
};

use crate::args::{OutputFormat, QueryArgs};

pub async fn run(args: &QueryArgs, config: Option<&CensusKitConfig>) -> Result<()> {
    let (mut provider, mut specs) = match config {
        Some(config) => {
            for warning in config.missing_source_files() {
                tracing::warn!("{}", warning);
            }
            (config.provider(), config.source_specs()?)
        }
        None => (JsonFileProvider::new("."), Vec::new()),
    };

    // --table paths are relative to the CWD, not the config directory
    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    for (id, path) in args.parse_tables() {
        if !specs.iter().any(|s| s.id == id) {
            specs.push(SourceSpec::new(id.clone(), id.clone()));
        }
        provider = provider.with_path(id, cwd.join(path));
    }

    if !args.only.is_empty() {
        specs.retain(|s| args.only.contains(&s.id));
    }
    if specs.is_empty() {
        bail!(
            "No table sources to query.\n  \
             Register [sources.<id>] in censuskit.toml or pass --table id=path"
        );
    }

    let mut ctx = QueryContext::new();
    if let Some(location) = &args.location {
        let location: serde_json::Value =
            serde_json::from_str(location).context("--location must be valid JSON")?;
        ctx = ctx.with_location(location);
    }

    let matcher = config.map(CensusKitConfig::matcher).unwrap_or_default();
    let max_concurrency = args
        .max_concurrency
        .or_else(|| config.map(CensusKitConfig::max_concurrency))
        .unwrap_or(DEFAULT_MAX_CONCURRENCY);

    let engine = specs.into_iter().fold(
        QueryEngine::new(provider)
            .with_matcher(matcher)
            .with_max_concurrency(max_concurrency),
        |engine, spec| engine.with_source(spec),
    );

    let pb = super::spinner(
        "query",
        &format!(
            "Querying {} source(s) for {} '{}'...",
            engine.sources().len(),
            args.family,
            args.value
        ),
    );
    let result = engine.query(&ctx, args.family, &args.value).await;
    pb.finish_and_clear();

    match args.format {
        OutputFormat::Json => super::print_json(&result)?,
        OutputFormat::Table => print_result(&result),
    }

    Ok(())
}

fn print_result(result: &UnifiedResult) {
    println!("Query: {} = '{}'", result.family, result.target);
    println!(
        "Sources: {}/{} successful",
        result.summary.successful, result.summary.total
    );
    if let Some(name) = result
        .location
        .as_ref()
        .and_then(|l| l.get("county_name"))
        .and_then(|v| v.as_str())
    {
        println!("Location: {}", name);
    }
    println!();

    let mut overview = ComfyTable::new();
    overview.set_header(vec!["Source", "Status", "Matched", "Score", "Explanation"]);
    for (id, entry) in &result.sources {
        let status = match entry.status {
            SourceStatus::Success => "success",
            SourceStatus::NoData => "no data",
            SourceStatus::Error => "error",
        };
        let explanation = entry
            .error
            .as_deref()
            .or(entry.match_explanation.as_deref())
            .unwrap_or("");
        overview.add_row(vec![
            Cell::new(format!("{} ({})", entry.name, id)),
            Cell::new(status),
            Cell::new(entry.matched.as_deref().unwrap_or("-")),
            Cell::new(
                entry
                    .match_score
                    .map(|s| format!("{:.2}", s))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(explanation),
        ]);
    }
    println!("{}", overview);
    println!();

    for (id, entry) in result.successful() {
        println!("━━━ {} ({}) ━━━", entry.name, id);
        println!("{}", super::distribution_table(&entry.distribution));
        if let Some(source) = &entry.data_source {
            println!("Source: {}", source);
        }
        println!();
    }
}
