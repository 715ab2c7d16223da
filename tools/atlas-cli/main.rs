use atlas::prelude::*;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionCli {
    Tb,
    Bt,
    Lr,
    Rl,
}

impl From<DirectionCli> for Direction {
    fn from(value: DirectionCli) -> Self {
        match value {
            DirectionCli::Tb => Direction::TopToBottom,
            DirectionCli::Bt => Direction::BottomToTop,
            DirectionCli::Lr => Direction::LeftToRight,
            DirectionCli::Rl => Direction::RightToLeft,
        }
    }
}

/// Lay out `.pear` agent-system documents as positioned graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize and lay out a document, printing the graph as JSON
    Layout {
        /// Path to the .pear document
        document_path: String,

        /// A previously saved graph whose node positions should be kept
        #[arg(short, long)]
        previous: Option<String>,

        /// Layout configuration JSON (partial files override only the keys they name)
        #[arg(short, long)]
        config: Option<String>,

        /// Rank direction, overrides the configuration file
        #[arg(short, long, value_enum)]
        direction: Option<DirectionCli>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Also report the bounding box of the laid-out graph on stderr
        #[arg(long)]
        bounds: bool,
    },
    /// Print the sidebar outline of a document as JSON
    Outline {
        /// Path to the .pear document
        document_path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Layout {
            document_path,
            previous,
            config,
            direction,
            pretty,
            bounds,
        } => run_layout(document_path, previous, config, direction, pretty, bounds),
        Command::Outline { document_path } => {
            let document = load_document(&document_path);
            print_json(&outline(&document), true);
        }
    }
}

fn run_layout(
    document_path: String,
    previous_path: Option<String>,
    config_path: Option<String>,
    direction: Option<DirectionCli>,
    pretty: bool,
    report_bounds: bool,
) {
    let start = Instant::now();
    let document = load_document(&document_path);

    let mut config = match &config_path {
        Some(path) => LayoutConfig::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load layout config '{}': {}", path, e))
        }),
        None => LayoutConfig::default(),
    };
    if let Some(direction) = direction {
        config.direction = direction.into();
    }

    let atlas = Atlas::builder().with_config(config).build();
    let graph = match &previous_path {
        Some(path) => {
            let previous = load_previous_nodes(path);
            atlas.rerender(&document, &previous)
        }
        None => atlas.render(&document),
    };

    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        elapsed = ?start.elapsed(),
        "laid out '{}'",
        document_path
    );
    if report_bounds {
        let bounds = Bounds::of(&graph.nodes, atlas.config());
        eprintln!(
            "Bounds: x={} y={} width={} height={}",
            bounds.x, bounds.y, bounds.width, bounds.height
        );
    }
    print_json(&graph, pretty);
}

fn load_document(path: &str) -> Document {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read document '{}': {}", path, e)));
    Document::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load document '{}': {}", path, e)))
}

/// Accepts either a saved graph (`{"nodes": [...], "edges": [...]}`) or a bare node array.
fn load_previous_nodes(path: &str) -> Vec<Node> {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read layout '{}': {}", path, e)));
    serde_json::from_str::<Graph>(&json)
        .map(|g| g.nodes)
        .or_else(|_| serde_json::from_str::<Vec<Node>>(&json))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse layout '{}': {}", path, e)))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => exit_with_error(&format!("Failed to serialize output: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
