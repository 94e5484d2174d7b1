//! Tricount CLI: count triangles in a graph file
//!
//! Reads a Matrix Market or edge-list file, builds the sparse adjacency and
//! runs one (or all) of the execution strategies.

use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tricount::{
    EdgePolicy, IndexBase, InputFormat, RunConfig, RunReport, StrategyKind, TriangleEngine,
};

#[derive(Parser)]
#[command(name = "tricount", version, about = "Triangle counting on sparse graphs")]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// YAML run configuration; flags override its values
    #[arg(long, global = true, env = "TRICOUNT_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum StrategyArg {
    Sequential,
    Dynamic,
    Static,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum PolicyArg {
    Preserve,
    Simplify,
    Reject,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum InputFormatArg {
    Auto,
    MatrixMarket,
    EdgeList,
}

#[derive(Args)]
struct GraphArgs {
    /// Input graph file (.mtx for Matrix Market, anything else an edge list)
    input: PathBuf,

    /// Worker threads for parallel strategies (1..=N)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Minimum outer vertices per dynamic chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Self-loop and duplicate handling
    #[arg(long)]
    policy: Option<PolicyArg>,

    /// Input encoding
    #[arg(long)]
    input_format: Option<InputFormatArg>,

    /// Index base of plain edge lists (0 or 1)
    #[arg(long)]
    base: Option<u32>,

    /// Fail unless the input holds exactly this many edges
    #[arg(long)]
    expected_edges: Option<usize>,

    /// Report per-vertex triangle counts
    #[arg(long)]
    per_vertex: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Count triangles with one strategy
    Count {
        #[command(flatten)]
        graph: GraphArgs,

        /// Execution strategy
        #[arg(short, long)]
        strategy: Option<StrategyArg>,
    },
    /// Run all strategies and check they agree
    Compare {
        #[command(flatten)]
        graph: GraphArgs,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Count { graph, strategy } => run_count(&cli, graph, *strategy),
        Commands::Compare { graph } => run_compare(&cli, graph),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(
    cli: &Cli,
    args: &GraphArgs,
    strategy: Option<StrategyArg>,
) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_yaml_file(path)?,
        None => RunConfig::default(),
    };

    if let Some(strategy) = strategy {
        config.strategy = match strategy {
            StrategyArg::Sequential => StrategyKind::Sequential,
            StrategyArg::Dynamic => StrategyKind::Dynamic,
            StrategyArg::Static => StrategyKind::Static,
        };
    }
    if let Some(threads) = args.threads {
        config.threads = Some(threads);
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(policy) = args.policy {
        config.edge_policy = match policy {
            PolicyArg::Preserve => EdgePolicy::Preserve,
            PolicyArg::Simplify => EdgePolicy::Simplify,
            PolicyArg::Reject => EdgePolicy::Reject,
        };
    }
    if let Some(format) = args.input_format {
        config.format = match format {
            InputFormatArg::Auto => InputFormat::Auto,
            InputFormatArg::MatrixMarket => InputFormat::MatrixMarket,
            InputFormatArg::EdgeList => InputFormat::EdgeList,
        };
    }
    if let Some(base) = args.base {
        config.edge_list_base = IndexBase::try_from(base)?;
    }
    if args.expected_edges.is_some() {
        config.expected_edges = args.expected_edges;
    }
    config.per_vertex |= args.per_vertex;

    Ok(config)
}

fn run_count(
    cli: &Cli,
    args: &GraphArgs,
    strategy: Option<StrategyArg>,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = TriangleEngine::new(build_config(cli, args, strategy)?);
    let report = engine.run(&args.input)?;

    match cli.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Table => print_report(&report),
    }
    Ok(())
}

fn run_compare(cli: &Cli, args: &GraphArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = TriangleEngine::new(build_config(cli, args, None)?);
    let loaded = engine.load(&args.input)?;
    let reports = engine.compare(&loaded)?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Table => {
            print_graph(&reports[0]);

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Strategy", "Threads", "Triangles", "Count (s)", "Busy (s)"]);
            for report in &reports {
                table.add_row(vec![
                    report.strategy.clone(),
                    report.threads.to_string(),
                    report.triangles.to_string(),
                    format!("{:.6}", report.count_seconds),
                    format!("{:.6}", report.busy_seconds),
                ]);
            }
            println!("{}", table);
        }
    }
    Ok(())
}

fn print_graph(report: &RunReport) {
    let graph = &report.graph;
    println!("Graph:      {}", report.source);
    println!("Vertices:   {}", graph.vertices);
    println!("Edges:      {} stored / {} read", graph.stored_edges, graph.input_edges);
    if graph.self_loops_dropped > 0 || graph.duplicates_dropped > 0 {
        println!(
            "Dropped:    {} self-loops, {} duplicates",
            graph.self_loops_dropped, graph.duplicates_dropped
        );
    }
    println!("Max degree: {}", graph.max_degree);
    println!("Read:       {:.6} s", report.read_seconds);
    println!("Build:      {:.6} s", report.build_seconds);
    println!();
}

fn print_report(report: &RunReport) {
    print_graph(report);

    if !report.partitions.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Thread", "Vertices", "Triangles", "Duration (s)"]);
        for partition in &report.partitions {
            table.add_row(vec![
                partition.thread.to_string(),
                format!("{}..{}", partition.start, partition.end),
                partition.triangles.to_string(),
                format!("{:.6}", partition.seconds),
            ]);
        }
        println!("{}", table);
    }

    if let Some(per_vertex) = &report.per_vertex {
        let mut table = Table::new();
        table.set_header(vec!["Vertex", "Triangles"]);
        for (vertex, count) in per_vertex.iter().enumerate().filter(|&(_, &count)| count > 0) {
            table.add_row(vec![vertex.to_string(), count.to_string()]);
        }
        println!("{}", table);
    }

    println!("Strategy:   {} ({} thread(s))", report.strategy, report.threads);
    println!("Duration:   {:.6} s", report.count_seconds);
    if report.busy_seconds != report.count_seconds {
        println!("Busy:       {:.6} s", report.busy_seconds);
    }
    println!("Triangles:  {}", report.triangles);
}
