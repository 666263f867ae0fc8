use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lineage_core::{FamilySource, JsonFileSource, PersonId};
use lineage_graph::{FamilyGraph, Frame, TreeSettings, TreeView, check_generations};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Family tree layout from the command line", long_about = None)]
struct Args {
    /// Settings file; defaults to the user config directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out the bloodline around one person
    Render {
        /// Family snapshot (JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Id of the focal person
        #[arg(short, long)]
        focus: i64,

        /// Viewport used for centering, as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_viewport)]
        viewport: Option<(f32, f32)>,

        /// Write the frame here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Lay out every founder lineage side by side
    Forest {
        #[arg(short, long)]
        data: PathBuf,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Check generations against parents and spouses
    Audit {
        #[arg(short, long)]
        data: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    match args.command {
        Command::Render {
            data,
            focus,
            viewport,
            out,
        } => {
            let mut view = TreeView::new(JsonFileSource::new(data), settings);
            if let Some((width, height)) = viewport {
                view.set_viewport(width, height);
            }
            view.render_focused_on(PersonId(focus))?;
            write_frame(&view.frame(), out.as_deref())
        }
        Command::Forest { data, out } => {
            let mut view = TreeView::new(JsonFileSource::new(data), settings);
            view.render_whole_forest()?;
            write_frame(&view.frame(), out.as_deref())
        }
        Command::Audit { data } => audit(&data),
    }
}

fn load_settings(path: Option<&Path>) -> Result<TreeSettings> {
    match path {
        Some(path) => TreeSettings::load_from(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(TreeSettings::load()),
    }
}

fn parse_viewport(value: &str) -> Result<(f32, f32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let width: f32 = width
        .trim()
        .parse()
        .map_err(|e| format!("invalid width '{}': {}", width, e))?;
    let height: f32 = height
        .trim()
        .parse()
        .map_err(|e| format!("invalid height '{}': {}", height, e))?;
    if width <= 0.0 || height <= 0.0 {
        return Err(format!("viewport must be positive, got {}x{}", width, height));
    }
    Ok((width, height))
}

fn write_frame(frame: &Frame, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(frame).context("Failed to serialize frame")?;
    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} nodes to {}", frame.scene.nodes.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn audit(data: &Path) -> Result<()> {
    let snapshot = JsonFileSource::new(data)
        .load_snapshot()
        .with_context(|| format!("Failed to load family data from {}", data.display()))?;
    let graph = FamilyGraph::from_snapshot(snapshot);
    let issues = check_generations(&graph);

    if issues.is_empty() {
        println!("{} people checked, no generation issues.", graph.len());
        return Ok(());
    }
    for issue in &issues {
        println!("{}", issue);
    }
    println!("{} issues among {} people.", issues.len(), graph.len());
    Ok(())
}
