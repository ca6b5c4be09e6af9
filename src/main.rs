// src/main.rs

use anyhow::{Context, Result};
use apkgraph::{
    ascii_tree, resolve, GraphExport, Index, IndexSource, LocalFileSource, RemoteSource,
    ResolveOptions,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "apkgraph")]
#[command(author, version, about = "Dependency graph visualizer for Alpine APK repositories", long_about = None)]
struct Cli {
    /// Name of the package to analyze
    #[arg(long)]
    package: String,

    /// URL of the repository, or path to a test repository file
    #[arg(long)]
    repository: String,

    /// Treat --repository as a local APKINDEX file
    #[arg(long)]
    test_mode: bool,

    /// Write the resolved graph for image rendering (Graphviz DOT, or JSON
    /// when the path ends in .json)
    #[arg(long, value_name = "PATH")]
    output_image: Option<PathBuf>,

    /// Display dependencies as an ASCII tree
    #[arg(long)]
    ascii_tree: bool,

    /// Maximum dependency analysis depth
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Substring used to highlight matching packages
    #[arg(long, value_name = "SUBSTRING")]
    filter_substring: Option<String>,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let source: Box<dyn IndexSource> = if cli.test_mode {
        info!("Test mode: reading index from {}", cli.repository);
        Box::new(LocalFileSource::new(&cli.repository))
    } else {
        Box::new(RemoteSource::new(&cli.repository)?)
    };

    let raw = source.fetch_raw_index()?;
    let index = Index::parse(&raw)?;
    info!("Parsed index with {} packages", index.len());

    // A root absent from the index is a diagnostic outcome, not a failure
    if !index.contains(&cli.package) {
        println!("Package '{}' not found in repository", cli.package);
        return Ok(());
    }

    let options = ResolveOptions {
        max_depth: cli.max_depth,
    };
    let result = resolve(&index, &cli.package, &options)?;
    info!(
        "Resolved {} nodes for '{}'",
        result.visited_count, cli.package
    );

    let mut rendered = false;

    if cli.ascii_tree {
        for line in ascii_tree(&result, cli.filter_substring.as_deref()) {
            println!("{line}");
        }
        if let Some(filter) = &cli.filter_substring {
            println!();
            println!("* = name contains '{filter}'");
        }
        rendered = true;
    }

    if let Some(path) = &cli.output_image {
        write_graph_export(&result, path)?;
        rendered = true;
    }

    if !rendered {
        print_direct_dependencies(&index, &cli.package);
    }

    if !result.missing.is_empty() {
        let names: Vec<&str> = result.missing.iter().map(String::as_str).collect();
        warn!(
            "{} referenced packages are missing from the index: {}",
            names.len(),
            names.join(", ")
        );
    }

    Ok(())
}

/// Write the exported graph structure for an external image renderer
fn write_graph_export(result: &apkgraph::ResolutionResult, path: &Path) -> Result<()> {
    let export = GraphExport::from_result(result);

    let content = if path.extension().is_some_and(|ext| ext == "json") {
        export.to_json()?
    } else {
        export.to_dot()
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write graph export to {}", path.display()))?;

    println!(
        "Graph written to {} ({} nodes, {} edges)",
        path.display(),
        export.nodes.len(),
        export.edges.len()
    );
    Ok(())
}

/// Flat direct-dependency listing, the default when no render flag is given
fn print_direct_dependencies(index: &Index, package: &str) {
    let Some(record) = index.get(package) else {
        return;
    };

    if let Some(description) = &record.description {
        info!("{} {}: {}", record.name, record.version, description);
    }

    if record.depends.is_empty() {
        println!("Package '{package}' has no dependencies");
        return;
    }

    println!("Direct dependencies for '{package}':");
    for dep in &record.depends {
        println!("  - {dep}");
    }
}
