//! CLI logic for the stackdraft architecture diagram tool.
//!
//! Thin, non-interactive wrapper over the [`stackdraft`] engine: catalog
//! queries print to stdout, `generate` writes a render spec JSON file.

mod args;
mod config;

pub use args::{Args, Command};

use std::{fs, io};

use log::info;

use stackdraft::{AppConfig, Catalog, Category, Composer, Layer, Pipeline, StackdraftError};

/// Run the stackdraft CLI application.
///
/// Loads the catalog named by the global `--catalog` argument and
/// dispatches to the selected subcommand.
///
/// # Errors
///
/// Returns [`StackdraftError`] for catalog or configuration loading
/// failures, unknown or conflicting components during generation, and
/// output I/O failures. Validation diagnostics are program output, not
/// errors.
pub fn run(args: &Args) -> Result<(), StackdraftError> {
    let catalog = stackdraft_catalog::load_path(&args.catalog)?;
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::List {
            category,
            layer,
            core,
        } => list(&catalog, *category, *layer, *core),
        Command::Search { query } => search(&catalog, query),
        Command::Stats => stats(&catalog),
        Command::Validate { components } => validate(&catalog, components),
        Command::Generate {
            components,
            name,
            description,
            output,
            auto_resolve,
        } => generate(
            &catalog,
            app_config,
            components,
            name,
            description,
            output,
            *auto_resolve,
        ),
    }
}

fn list(
    catalog: &Catalog,
    category: Option<Category>,
    layer: Option<Layer>,
    core: bool,
) -> Result<(), StackdraftError> {
    let components = catalog
        .all()
        .filter(|c| category.is_none_or(|want| c.category() == want))
        .filter(|c| layer.is_none_or(|want| c.layer() == want))
        .filter(|c| !core || c.is_core());

    for component in components {
        let marker = if component.is_core() { "*" } else { " " };
        println!(
            "{marker} {:<28} {:<32} {}/{}",
            component.id(),
            component.name(),
            component.category(),
            component.layer()
        );
    }

    Ok(())
}

fn search(catalog: &Catalog, query: &str) -> Result<(), StackdraftError> {
    let matches = catalog.search(query);
    for component in &matches {
        println!("{:<28} {}", component.id(), component.description());
    }
    println!("{} match(es)", matches.len());
    Ok(())
}

fn stats(catalog: &Catalog) -> Result<(), StackdraftError> {
    let stats = catalog.statistics();

    println!("Components: {} ({} core)", stats.total, stats.core);
    println!("By category:");
    for (category, count) in &stats.by_category {
        println!("  {:<16} {count}", category.to_string());
    }
    println!("By layer:");
    for (layer, count) in &stats.by_layer {
        println!("  {:<16} {count}", layer.to_string());
    }

    Ok(())
}

fn validate(catalog: &Catalog, component_ids: &[String]) -> Result<(), StackdraftError> {
    let mut composer = Composer::new(catalog, "validation", "");
    let outcome = composer.add_components(component_ids.iter().map(String::as_str));

    for (id, err) in &outcome.failed {
        println!("NOT ADDED  {id}: {err}");
    }

    let problems = composer.validate();
    for problem in &problems {
        println!("PROBLEM    {problem}");
    }

    for suggestion in composer.suggestions() {
        println!("SUGGEST    {} ({})", suggestion.id(), suggestion.name());
    }

    if outcome.failed.is_empty() && problems.is_empty() {
        println!("Selection is valid ({} components)", composer.stack().len());
    }

    Ok(())
}

fn generate(
    catalog: &Catalog,
    app_config: AppConfig,
    component_ids: &[String],
    name: &str,
    description: &str,
    output: &str,
    auto_resolve: bool,
) -> Result<(), StackdraftError> {
    let pipeline = Pipeline::new(app_config);

    let ids: Vec<&str> = component_ids.iter().map(String::as_str).collect();
    let mut composer = pipeline.compose(catalog, name, description, &ids)?;

    if auto_resolve {
        // Resolution is single-pass; iterate to close transitive chains.
        loop {
            let (added, errors) = composer.auto_resolve_dependencies();
            for error in &errors {
                println!("UNRESOLVED {error}");
            }
            if added == 0 {
                break;
            }
        }
    }

    let architecture = pipeline.assemble(composer);
    let spec = pipeline.render_spec(&architecture);

    let json = serde_json::to_string_pretty(&spec).map_err(io::Error::other)?;
    fs::write(output, json)?;

    info!(
        output,
        nodes = spec.nodes.len(),
        edges = spec.edges.len(),
        complexity = architecture.complexity_score();
        "Render spec exported",
    );

    Ok(())
}
