use anyhow::{Context, Result};
use clap::Parser;
use scotus_citation_map::{
    data, layout, storage, ChartMode, CitationMap, Config,
};

#[derive(Parser, Debug)]
#[clap(
    name = "scotus-citation-map",
    about = "Degrees-of-separation maps of Supreme Court citation networks"
)]
struct Cli {
    /// Path to input JSON file (`opinion_clusters` or search `results`)
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "citation_map")]
    output_dir: String,

    /// Keep opinions and links below this many degrees of separation
    #[clap(long, default_value = "3")]
    max_degree: usize,

    /// Chart mode: dos, spaeth or genealogy
    #[clap(long, value_enum, default_value = "dos")]
    mode: ChartMode,

    /// Opacity for citations without their own
    #[clap(long, default_value = "0.5")]
    edge_opacity: f32,

    /// Number of authority lookups kept in memory
    #[clap(long, default_value = "256")]
    cache_capacity: usize,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let config = Config::new(
        args.max_degree,
        args.mode,
        args.edge_opacity,
        args.cache_capacity,
    );

    log::info!("Starting citation map ({} mode)", config.mode.as_str());
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load data
    let records = data::json::load_document(&args.input)
        .with_context(|| format!("failed to load {}", args.input))?;

    // 2. Build the graph and classify every opinion and link
    let map = CitationMap::build(records, &config)?;

    log::info!(
        "Built map with {} opinions and {} links, max degree {}",
        map.graph().node_count,
        map.graph().link_count(),
        map.max_degree()
    );

    // 3. Trim to the requested degree
    let trimmed = map.trim(config.max_degree)?;

    // 4. Lay out the chart
    let chart = layout::project(&map, &trimmed, &config);

    // 5. Save results
    storage::save_results(&map, &trimmed, &chart, &args.output_dir)?;

    log::info!("Map complete. Results saved to {}", args.output_dir);

    Ok(())
}
