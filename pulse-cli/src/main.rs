//! Pulse CLI
//!
//! Parse crawl reports, compare snapshots and lay out space graphs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pulse_core::display::format_count;
use pulse_core::{
    calculate_vitals, sort_by_severity, sort_spaces, validate_value, Label, Snapshot, SortKey,
    SpaceFilter, Status, Trust,
};
use pulse_diff::diff_snapshots;
use pulse_graph::{create_graph, run_simulation, Edge, GraphNode, LayoutConfig};
use pulse_parser::{parse_crawl_with, ParseOptions};

#[derive(Parser)]
#[command(name = "pulse")]
#[command(author, version, about = "Pulse: agent ecosystem crawl toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a crawl report into snapshot JSON
    Parse {
        /// Crawl text file
        input: PathBuf,

        /// Write the snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Organisation names that mark an alert as affecting us
        #[arg(long = "org", env = "PULSE_ORG", value_delimiter = ',')]
        orgs: Vec<String>,
    },

    /// Compare two snapshots
    Diff {
        /// Current snapshot JSON
        current: PathBuf,

        /// Previous snapshot JSON (omit for a first crawl)
        previous: Option<PathBuf>,
    },

    /// Run the force layout and print node positions
    Layout {
        /// Snapshot JSON
        snapshot: PathBuf,

        /// Edge list JSON: [{"source": "...", "target": "..."}]
        #[arg(long)]
        edges: Option<PathBuf>,

        #[arg(long, default_value = "800")]
        width: f64,

        #[arg(long, default_value = "600")]
        height: f64,

        /// Maximum simulation steps
        #[arg(long, default_value = "200")]
        iterations: usize,
    },

    /// Check a snapshot JSON file against the snapshot contract
    Validate {
        snapshot: PathBuf,
    },

    /// List spaces with optional filtering and sorting
    Spaces {
        snapshot: PathBuf,

        #[arg(long, value_parser = parse_label::<Status>)]
        status: Option<Status>,

        #[arg(long, value_parser = parse_label::<Trust>)]
        trust: Option<Trust>,

        /// Case-insensitive text search over id, name and description
        #[arg(short, long)]
        search: Option<String>,

        /// Only spaces first seen in this crawl
        #[arg(long)]
        new_only: bool,

        #[arg(long, value_enum, default_value = "agents")]
        sort: SortArg,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },

    /// List security alerts, most severe first
    Alerts {
        snapshot: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Agents,
    Name,
    Status,
    Trust,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Agents => SortKey::Agents,
            SortArg::Name => SortKey::Name,
            SortArg::Status => SortKey::Status,
            SortArg::Trust => SortKey::Trust,
        }
    }
}

fn parse_label<L: Label>(raw: &str) -> Result<L, String> {
    L::from_label(raw).ok_or_else(|| format!("expected one of: {}", L::labels().join(", ")))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Parse { input, output, orgs } => run_parse(&input, output, orgs)?,
        Commands::Diff { current, previous } => run_diff(&current, previous.as_deref())?,
        Commands::Layout {
            snapshot,
            edges,
            width,
            height,
            iterations,
        } => {
            let config = LayoutConfig::default()
                .with_size(width, height)
                .with_max_iterations(iterations);
            run_layout(&snapshot, edges.as_deref(), config).await?;
        }
        Commands::Validate { snapshot } => run_validate(&snapshot)?,
        Commands::Spaces {
            snapshot,
            status,
            trust,
            search,
            new_only,
            sort,
            asc,
        } => {
            let filter = SpaceFilter {
                status,
                trust,
                search,
                new_only,
            };
            run_spaces(&snapshot, &filter, sort.into(), !asc)?;
        }
        Commands::Alerts { snapshot } => run_alerts(&snapshot)?,
    }

    Ok(())
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    Snapshot::load(path).with_context(|| format!("Failed to load snapshot {}", path.display()))
}

fn run_parse(input: &Path, output: Option<PathBuf>, orgs: Vec<String>) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read crawl {}", input.display()))?;

    let mut options = ParseOptions::default();
    if !orgs.is_empty() {
        options.org_names = orgs;
    }

    let snapshot = parse_crawl_with(&text, &options);
    let json = snapshot.to_json_pretty()?;

    match output {
        Some(path) => {
            fs::write(&path, json)?;
            info!("Snapshot saved to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_diff(current: &Path, previous: Option<&Path>) -> Result<()> {
    let current = load_snapshot(current)?;
    let previous = previous.map(load_snapshot).transpose()?;

    let diff = diff_snapshots(&current, previous.as_ref());
    if diff.is_quiet() {
        info!("No space, alert or protocol changes");
    }
    println!("{}", serde_json::to_string_pretty(&diff)?);
    Ok(())
}

async fn run_layout(snapshot: &Path, edges: Option<&Path>, config: LayoutConfig) -> Result<()> {
    let snapshot = load_snapshot(snapshot)?;
    let edges: Vec<Edge> = match edges {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read edges {}", path.display()))?;
            serde_json::from_str(&raw)?
        }
        None => Vec::new(),
    };

    // pairwise repulsion is quadratic, keep it off the async workers
    let state = tokio::task::spawn_blocking(move || {
        let state = create_graph(&snapshot.spaces, &edges, &config);
        run_simulation(state, &config)
    })
    .await
    .map_err(|e| anyhow!("Layout worker failed: {}", e))?;

    info!(
        "Laid out {} nodes, final energy {:.4}",
        state.nodes.len(),
        state.energy
    );

    let positions: Vec<_> = state.nodes.iter().map(GraphNode::position).collect();
    println!("{}", serde_json::to_string_pretty(&positions)?);
    Ok(())
}

fn run_validate(path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    let report = validate_value(&value);
    if report.valid {
        println!("✅ {} is a valid snapshot", path.display());
        return Ok(());
    }

    println!("❌ {} failed validation:", path.display());
    for error in &report.errors {
        println!("   - {}", error);
    }
    bail!("{} validation error(s)", report.errors.len())
}

fn run_spaces(path: &Path, filter: &SpaceFilter, key: SortKey, descending: bool) -> Result<()> {
    let snapshot = load_snapshot(path)?;
    let spaces = sort_spaces(&filter.apply(&snapshot.spaces), key, descending);

    for space in &spaces {
        println!(
            "{} {:<28} {:<10} {:<12} {:>8}{}",
            space.status.icon(),
            space.id,
            space.status.as_str(),
            space.trust.as_str(),
            format_count(space.agents),
            if space.is_new { "  new" } else { "" }
        );
    }

    let vitals = calculate_vitals(&spaces, &snapshot.security);
    println!(
        "\n📊 {} spaces ({} active) | agents claimed {} | verified {}",
        vitals.total_spaces,
        vitals.active_spaces,
        format_count(Some(vitals.total_agents_claimed)),
        format_count(Some(vitals.total_agents_verified))
    );
    Ok(())
}

fn run_alerts(path: &Path) -> Result<()> {
    let snapshot = load_snapshot(path)?;

    for alert in sort_by_severity(&snapshot.security) {
        let ours = if alert.affects_us { " ⚠️  affects us" } else { "" };
        println!("[{}] {}{}", alert.severity.as_str(), alert.title, ours);
        if !alert.summary.is_empty() {
            println!("    {}", alert.summary);
        }
        if let Some(status) = alert.our_status {
            println!("    our status: {}", status.as_str());
        }
    }
    Ok(())
}
