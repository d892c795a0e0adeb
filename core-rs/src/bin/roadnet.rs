//! roadnet - road network SPARQL CLI
//!
//! Runs the analytical query catalog against a SPARQL endpoint and converts
//! edge lists into the RDF graph those queries expect.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use roadnet_sparql::sparql::{DEFAULT_EDGE_LIMIT, DEFAULT_NODE_LIMIT};
use roadnet_sparql::{
    ClientConfig, EdgeListOptions, RdfConverter, ResultRow, ResultSet, RoadNetwork, SparqlClient,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roadnet")]
#[command(version)]
#[command(about = "Road network SPARQL client", long_about = None)]
struct Cli {
    /// SPARQL endpoint (overrides config file and ROADNET_SPARQL_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Client configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// Run raw SPARQL text (prefix with @ to read a file)
    Query {
        sparql: String,
    },
    /// List nodes by degree, highest first
    Nodes {
        #[arg(long, default_value_t = DEFAULT_NODE_LIMIT)]
        limit: u64,
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// List nodes whose degree lies within a range
    NodesByDegree {
        #[arg(long)]
        min: u64,
        #[arg(long)]
        max: u64,
        #[arg(long, default_value_t = DEFAULT_NODE_LIMIT)]
        limit: u64,
    },
    /// List edges, optionally from specific nodes
    Edges {
        #[arg(long, default_value_t = DEFAULT_EDGE_LIMIT)]
        limit: u64,
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// Source node ids
        #[arg(long = "node", value_delimiter = ',')]
        nodes: Vec<String>,
    },
    /// Edges around the given nodes
    Subgraph {
        #[arg(required = true)]
        nodes: Vec<String>,
        #[arg(long, default_value_t = 1)]
        depth: u32,
    },
    /// Node count per classification
    ClassificationStats,
    /// Node count per degree
    DegreeDistribution,
    /// Total nodes and degree aggregates
    Stats,
    /// SKOS classification hierarchy
    Hierarchy,
    /// Nodes with a single connection
    DeadEnds {
        #[arg(long, default_value_t = DEFAULT_NODE_LIMIT)]
        limit: u64,
    },
    /// Major and super hubs
    MajorHubs {
        #[arg(long, default_value_t = DEFAULT_NODE_LIMIT)]
        limit: u64,
    },
    /// Convert a SNAP edge list into Turtle and N-Triples
    Convert {
        input: PathBuf,
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        /// Maximum edges to process
        #[arg(long)]
        max_edges: Option<usize>,
        /// Probability of keeping each edge (0-1)
        #[arg(long, default_value_t = 1.0)]
        sample_rate: f64,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?
            .apply_env(),
        None => ClientConfig::from_env(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    Ok(config)
}

/// Column order follows first appearance across rows
fn columns(rows: &[ResultRow]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}

fn print_table(rows: &[ResultRow]) {
    if rows.is_empty() {
        println!("No results.");
        return;
    }

    let columns = columns(rows);
    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            rows.iter()
                .filter_map(|row| row.get(column))
                .map(str::len)
                .chain(std::iter::once(column.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column, width = width))
        .collect();
    println!("\n{}", header.join("  ").bold());
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| format!("{:<width$}", row.get(column).unwrap_or("-"), width = width))
            .collect();
        println!("{}", cells.join("  "));
    }

    println!("\nTotal: {} row(s)", rows.len());
}

fn print_rows(rows: &ResultSet, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(rows)?),
        OutputFormat::Table => print_table(rows),
    }
    Ok(())
}

fn read_query(sparql: &str) -> anyhow::Result<String> {
    match sparql.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading query file {}", path)),
        None => Ok(sparql.to_string()),
    }
}

fn convert(input: &Path, output_dir: &Path, options: EdgeListOptions) -> anyhow::Result<()> {
    let network = RoadNetwork::from_path(input, &options)?;

    let summary = network.summary();
    println!("\n=== Network Statistics ===");
    println!("Nodes: {}", summary.node_count);
    println!("Edges: {}", summary.edge_count);
    println!("Average degree: {:.2}", summary.avg_degree);
    println!("Max degree: {}", summary.max_degree);
    println!("\nDegree Distribution:");
    for (degree, count) in &summary.degree_distribution {
        println!("  Degree {}: {} nodes", degree, count);
    }

    let converter = RdfConverter::convert(&network)?;
    let output = converter.save(output_dir)?;

    println!("\n{} Conversion complete!", "✓".green());
    println!("  Turtle:    {}", output.turtle.display());
    println!("  N-Triples: {}", output.ntriples.display());
    println!("  Triples:   {}", output.triple_count);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Convert { input, output_dir, max_edges, sample_rate } = &cli.command {
        let options = EdgeListOptions {
            max_edges: *max_edges,
            sample_rate: *sample_rate,
        };
        return convert(input, output_dir, options);
    }

    let config = load_config(&cli)?;
    let client = SparqlClient::from_config(&config)?;

    let rows = match &cli.command {
        Commands::Query { sparql } => client.query(&read_query(sparql)?).await?,
        Commands::Nodes { limit, offset } => client.get_nodes(*limit, *offset).await?,
        Commands::NodesByDegree { min, max, limit } => {
            client.get_nodes_by_degree(*min, *max, *limit).await?
        }
        Commands::Edges { limit, offset, nodes } => client.get_edges(*limit, *offset, nodes.as_slice()).await?,
        Commands::Subgraph { nodes, depth } => client.get_subgraph(nodes.as_slice(), *depth).await?,
        Commands::ClassificationStats => client.get_classification_stats().await?,
        Commands::DegreeDistribution => client.get_degree_distribution().await?,
        Commands::Stats => vec![client.get_network_stats().await?],
        Commands::Hierarchy => client.get_concept_hierarchy().await?,
        Commands::DeadEnds { limit } => client.get_dead_ends(*limit).await?,
        Commands::MajorHubs { limit } => client.get_major_hubs(*limit).await?,
        Commands::Convert { .. } => unreachable!("handled above"),
    };

    print_rows(&rows, cli.format)
}
