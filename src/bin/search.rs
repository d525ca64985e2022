// CIP Search CLI Tool
// Command-line interface for querying a published CIP index

use cip_search::{load_index, QueryEngine, SearchOptions};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// CIP Search Tool - Look up CIP codes and programs
#[derive(Parser, Debug)]
#[command(name = "cip-search")]
#[command(about = "Search a CIP program index by code fragment or keywords", long_about = None)]
#[command(version)]
struct Args {
    /// Index document to load (file path or http(s) URL)
    #[arg(value_name = "INDEX")]
    index: String,

    /// Query: a code fragment ("14", "14.09", "14.0901") or keywords.
    /// An empty query browses the index.
    #[arg(value_name = "QUERY", default_value = "")]
    query: String,

    /// Only show STEM-eligible programs
    #[arg(short, long)]
    stem: bool,

    /// Maximum number of results to display
    #[arg(short, long, default_value = "10")]
    limit: usize,

    /// Show program definitions
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let index = load_index(&args.index).await?;
    let engine = QueryEngine::new(index.records);

    if args.verbose {
        let (total, stem_eligible) = engine.stats();
        println!(
            "Index loaded: {} programs, {} STEM-eligible\n",
            total, stem_eligible
        );
    }

    let options = SearchOptions::new(args.query)
        .stem_only(args.stem)
        .limit(args.limit);
    let results = engine.search(&options);

    if results.is_empty() {
        println!("No matches found.");
        return Ok(());
    }

    println!("Found {} matches:\n", results.len());

    for (idx, record) in results.iter().enumerate() {
        let marker = if record.eligible { "  [STEM]" } else { "" };
        println!("{}. {}  {}{}", idx + 1, record.code, record.title, marker);

        if args.verbose && !record.definition.is_empty() {
            println!("   {}", record.definition);
        }
    }

    Ok(())
}
