mod config;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use geojson::FeatureCollection;
use roadtour_core::prelude::*;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Overrides};

#[derive(Parser, Debug)]
#[command(name = "roadtour")]
#[command(about = "Travel-time optimal routes and tours over a road network", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Node table (osmid,y,x,highway)
    #[arg(long, global = true)]
    nodes: Option<PathBuf>,
    /// Edge table (u,v,osmid,oneway,reversed,length,maxspeed)
    #[arg(long, global = true)]
    edges: Option<PathBuf>,
    /// Speed in km/h for edges without maxspeed
    #[arg(long, global = true)]
    default_speed: Option<f64>,
    /// Print GeoJSON instead of JSON
    #[arg(long, global = true)]
    geojson: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shortest route between two nodes
    Route {
        /// Start node id
        #[arg(long, conflicts_with = "from_xy", required_unless_present = "from_xy")]
        from: Option<NodeId>,
        /// End node id
        #[arg(long, conflicts_with = "to_xy", required_unless_present = "to_xy")]
        to: Option<NodeId>,
        /// Start coordinate (x,y), snapped to the nearest node
        #[arg(long, value_parser = parse_xy, allow_hyphen_values = true)]
        from_xy: Option<(f64, f64)>,
        /// End coordinate (x,y), snapped to the nearest node
        #[arg(long, value_parser = parse_xy, allow_hyphen_values = true)]
        to_xy: Option<(f64, f64)>,
    },
    /// Closed tour visiting every given node once
    Tour {
        /// Node ids to visit
        #[arg(required = true, num_args = 1..)]
        visit: Vec<NodeId>,
        /// Compute the distance matrix on all cores
        #[arg(long)]
        parallel: bool,
    },
}

fn parse_xy(s: &str) -> Result<(f64, f64), String> {
    let Some((x, y)) = s.split_once(',') else {
        return Err("coordinate must be in format 'x,y'".to_string());
    };
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{part}': {e}"))
    };
    Ok((parse(x)?, parse(y)?))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn snap(graph: &RoadGraph, id: Option<NodeId>, xy: Option<(f64, f64)>) -> Result<NodeId> {
    match (id, xy) {
        (Some(id), _) => Ok(id),
        (None, Some((x, y))) => graph
            .nearest_node(x, y)
            .with_context(|| format!("No node near ({x}, {y})")),
        (None, None) => bail!("Either a node id or a coordinate is required"),
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_geojson(collection: &FeatureCollection) -> Result<()> {
    print_json(collection)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let parallel = matches!(cli.command, Commands::Tour { parallel: true, .. });
    let config = AppConfig::load(cli.config.as_deref())?.apply(Overrides {
        nodes: cli.nodes,
        edges: cli.edges,
        default_speed_kmh: cli.default_speed,
        parallel_matrix: parallel,
    })?;
    let Some(data) = &config.data else {
        bail!("Road network not configured");
    };

    let start = Instant::now();
    let graph = create_road_graph(data).context("Failed to build road graph")?;
    info!(
        "Loaded {} nodes and {} edges in {:.2}s",
        graph.node_count(),
        graph.edge_count(),
        start.elapsed().as_secs_f64()
    );

    match cli.command {
        Commands::Route {
            from,
            to,
            from_xy,
            to_xy,
        } => {
            let source = snap(&graph, from, from_xy)?;
            let goal = snap(&graph, to, to_xy)?;
            let mut router = Router::with_capacity(&graph, config.solver.cache_capacity);

            let Some(route) = router.route(source, goal)? else {
                info!("Node {goal} is unreachable from {source}");
                return print_json(&json!({
                    "source": source,
                    "goal": goal,
                    "reachable": false,
                }));
            };

            if cli.geojson {
                print_geojson(&route.to_geojson(&graph)?)
            } else {
                print_json(&json!({
                    "source": route.source,
                    "goal": route.goal,
                    "reachable": true,
                    "cost": route.cost,
                    "adjusted_cost": route.adjusted_cost(&graph, &config.delay),
                    "nodes": route.nodes,
                }))
            }
        }
        Commands::Tour { visit, .. } => {
            let start = Instant::now();
            let solver = TourSolver::new(config.delay)
                .with_parallel_matrix(config.solver.parallel_matrix);
            let result = if solver.parallel_matrix {
                solver.solve(&graph, &visit)?
            } else {
                let capacity = config.solver.cache_capacity.max(visit.len());
                let mut router = Router::with_capacity(&graph, capacity);
                solver.solve_with_router(&mut router, &visit)?
            };
            info!(
                "Tour over {} nodes solved in {:.3}s",
                visit.len(),
                start.elapsed().as_secs_f64()
            );

            if cli.geojson {
                print_geojson(&result.to_geojson(&graph)?)
            } else {
                print_json(&result)
            }
        }
    }
}
