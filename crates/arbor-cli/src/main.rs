//! Arbor CLI: load a behavior tree asset and drive it from the terminal.
//!
//! - `arbor run <tree>` - drive a tree for a number of host frames
//! - `arbor check <tree>...` - materialize trees without running them
//! - `arbor kinds` - list the node kinds a tree file may use

mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use arbor_bt::{instantiate_agent, Registry, TreeAsset, TreeTemplate};
use arbor_core::UpdateMode;
use arbor_tools::{SharedTraceSink, TreeSnapshot};

use config::{parse_assignment, RunConfig};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Behavior tree runner", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a tree for a number of frames
    Run {
        /// Tree asset (YAML, or JSON with a .json extension)
        tree: PathBuf,

        /// Agent/scheduler config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host frames to simulate
        #[arg(long, default_value_t = 10)]
        frames: u32,

        /// Seconds per frame
        #[arg(long, default_value_t = 0.1)]
        dt: f32,

        /// Blackboard entries, `key=value` (value parsed as JSON when possible)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        assignments: Vec<String>,

        /// Enable debug mode (breakpoints)
        #[arg(long)]
        debug: bool,

        /// Print a status snapshot after every drive
        #[arg(long)]
        snapshot: bool,

        /// Print the collected trace as JSON when done
        #[arg(long)]
        json: bool,
    },

    /// Check that tree assets materialize
    Check {
        #[arg(required = true)]
        trees: Vec<PathBuf>,
    },

    /// List registered node kinds
    Kinds,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let registry = Arc::new(Registry::with_builtins());

    match cli.command {
        Commands::Run {
            tree,
            config,
            frames,
            dt,
            assignments,
            debug,
            snapshot,
            json,
        } => {
            let options = RunOptions {
                frames,
                dt,
                debug,
                snapshot,
                json,
            };
            run_tree(&tree, config.as_deref(), &assignments, options, registry)
        }
        Commands::Check { trees } => check_trees(&trees, registry),
        Commands::Kinds => {
            for kind in registry.kinds() {
                println!("{kind}");
            }
            Ok(())
        }
    }
}

struct RunOptions {
    frames: u32,
    dt: f32,
    debug: bool,
    snapshot: bool,
    json: bool,
}

fn load_asset(path: &Path, registry: Arc<Registry>) -> Result<TreeAsset> {
    TreeAsset::load(path, registry).with_context(|| format!("failed to load {}", path.display()))
}

fn run_tree(
    tree: &Path,
    config: Option<&Path>,
    assignments: &[String],
    options: RunOptions,
    registry: Arc<Registry>,
) -> Result<()> {
    let mut run_config = match config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if options.debug {
        run_config.scheduler.debug_mode = true;
    }
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        run_config.blackboard.set(key, value);
    }

    let asset = load_asset(tree, registry)?;
    let mut agent = instantiate_agent(&asset, run_config.agent_ref(), run_config.scheduler)
        .with_context(|| format!("failed to build {}", tree.display()))?;
    agent.blackboard_mut().merge(&run_config.blackboard);

    let sink = SharedTraceSink::new();
    agent.set_trace_sink(sink.boxed());

    tracing::info!(
        tree = %tree.display(),
        agent = %agent.agent().name,
        mode = %run_config.scheduler.update_mode,
        frames = options.frames,
        "running tree"
    );

    let manual = run_config.scheduler.update_mode == UpdateMode::Manual;
    for frame in 0..options.frames {
        let drove = if manual {
            agent.update(options.dt);
            agent.tick()?;
            true
        } else {
            agent.update(options.dt)
        };
        if !drove {
            continue;
        }

        println!(
            "frame {frame:>4} t={:.3}s drive {:>4}: {}",
            agent.clock(),
            agent.drives(),
            agent.last_status()
        );
        for hit in agent.take_break_requests() {
            println!("  break: node #{} ({:?})", hit.node, hit.phase);
        }
        if options.snapshot {
            if let Some(tree) = agent.policy() {
                print!("{}", TreeSnapshot::capture(tree));
            }
        }
    }

    println!("blackboard: {}", serde_json::to_string(agent.blackboard())?);
    if options.json {
        println!("{}", serde_json::to_string_pretty(&sink.snapshot())?);
    }
    Ok(())
}

fn check_trees(trees: &[PathBuf], registry: Arc<Registry>) -> Result<()> {
    for path in trees {
        let asset = load_asset(path, registry.clone())?;
        let tree = asset
            .materialize()
            .with_context(|| format!("failed to build {}", path.display()))?;
        println!("ok: {} ({} nodes)", path.display(), tree.node_count());
    }
    Ok(())
}
