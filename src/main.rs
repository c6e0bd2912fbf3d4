use anyhow::{Context, Result};
use clap::Parser;
use network_insights::analysis::{analyze_with_component, AnalysisResult};
use network_insights::config::{AnalysisOptions, EgoOptions, EgoSelection, LoaderOptions, SafetyLimits};
use network_insights::data::load_edge_list;
use network_insights::graph::CompressedGraph;
use network_insights::{storage, viz};

#[derive(Parser, Debug)]
#[clap(
    name = "network-insights",
    about = "Influence, bridge and community analysis of a collaboration network"
)]
struct Cli {
    /// Path to the edge list (two integer node ids per line)
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "insights_results")]
    output_dir: String,

    /// Number of sampled sources for betweenness centrality
    #[clap(long, default_value = "1000")]
    sample_size: usize,

    /// Seed for betweenness source sampling
    #[clap(long, default_value = "42")]
    seed: u64,

    /// Length of the ranked lists
    #[clap(long, default_value = "10")]
    top_k: usize,

    /// Keep merging communities until at most this many remain
    #[clap(long)]
    community_cap: Option<usize>,

    /// Refuse betweenness and community detection above this many nodes (0 = no limit)
    #[clap(long)]
    max_nodes: Option<usize>,

    /// Refuse betweenness and community detection above this many edges (0 = no limit)
    #[clap(long)]
    max_edges: Option<usize>,

    /// Maximum node count of the exported ego network
    #[clap(long, default_value = "200")]
    ego_cap: usize,

    /// Keep the lowest-id neighbors instead of the best-connected ones when capping
    #[clap(long)]
    ego_lowest_id: bool,

    /// Field delimiter (default: any whitespace)
    #[clap(long)]
    delimiter: Option<char>,

    /// Comment marker for skipped lines
    #[clap(long, default_value = "#")]
    comment_marker: String,

    /// Skip visualization data
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn print_report(result: &AnalysisResult) {
    println!("\nNETWORK OVERVIEW");
    println!("----------------");
    println!("Nodes: {}", result.node_count);
    println!("Edges: {}", result.edge_count);
    println!("Density: {:.6}", result.density);
    println!(
        "(largest of {} components; input had {} nodes and {} edges)",
        result.component_count, result.input_node_count, result.input_edge_count
    );

    if !result.top_influencers.is_empty() {
        println!("\nTOP {} MOST CONNECTED NODES", result.top_influencers.len());
        println!("-----------------------------");
        for (i, (node, score)) in result.top_influencers.iter().enumerate() {
            println!("{}. Node {} | Degree Centrality: {:.4}", i + 1, node, score);
        }
    }

    if !result.top_bridges.is_empty() {
        println!("\nTOP {} STRUCTURAL BRIDGE NODES", result.top_bridges.len());
        println!("--------------------------------");
        for (i, (node, score)) in result.top_bridges.iter().enumerate() {
            println!("{}. Node {} | Betweenness Centrality: {:.4}", i + 1, node, score);
        }
    }

    if let Some(stats) = &result.community_stats {
        println!("\nCOMMUNITY STRUCTURE");
        println!("-------------------");
        println!("Number of communities: {}", stats.count);
        println!("Largest community size: {}", stats.largest);
        println!("Median community size: {}", stats.median);
        if let Some(q) = result.modularity {
            println!("Modularity: {:.4}", q);
        }
    }

    for recovered in &result.recovered_errors {
        println!("\nSKIPPED {}: {}", recovered.metric, recovered.error);
    }
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
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    let loader = LoaderOptions {
        comment_marker: args.comment_marker.clone(),
        delimiter: args.delimiter,
    };
    let limits = SafetyLimits::with_overrides(args.max_nodes, args.max_edges);
    let options = AnalysisOptions::new(
        args.sample_size,
        Some(args.seed),
        args.top_k,
        args.community_cap,
        limits,
    );
    let ego_options = EgoOptions {
        cap: args.ego_cap,
        selection: if args.ego_lowest_id {
            EgoSelection::LowestId
        } else {
            EgoSelection::HighestDegree
        },
    };

    // 1. Load and clean the graph
    let edges = load_edge_list(&args.input, &loader)
        .with_context(|| format!("failed to load {}", args.input))?;
    let graph = CompressedGraph::from_edges(edges)?;

    log::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    // 2. Analyze the largest connected component
    let (component, result) = analyze_with_component(&graph, &options)?;

    print_report(&result);

    // 3. Save results
    storage::save_results(&result, &args.output_dir)?;

    // 4. Generate visualization data if requested
    if !args.skip_viz {
        viz::generate_visualizations(&component, &result, &ego_options, &args.output_dir)?;
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
