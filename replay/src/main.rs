mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use modeller::scene::{NodeKind, Scene};
use modeller::{DrawCommand, Viewer, ViewerConfig};

#[derive(Parser)]
#[command(name = "modeller-replay")]
#[command(about = "Replay a scripted input session against a headless modeller viewer")]
#[command(version)]
struct Cli {
    /// Input script (one command per line)
    script: PathBuf,

    /// Viewer config in JSON (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the viewport width
    #[arg(long)]
    width: Option<u32>,

    /// Override the viewport height
    #[arg(long)]
    height: Option<u32>,

    /// Log every pick, placement and handler run
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::from_path(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    config.validate()?;

    let text = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("failed to read script {}", cli.script.display()))?;
    let steps = script::parse_script(&text).with_context(|| format!("in {}", cli.script.display()))?;

    let mut viewer = Viewer::new(config);
    let mut redraws = 0;
    for step in &steps {
        if step.apply(&mut viewer) {
            redraws += 1;
        }
    }
    eprintln!("Replayed {} command(s), {} redraw(s) requested", steps.len(), redraws);

    print_scene(viewer.scene());

    let mut frame: Vec<DrawCommand> = Vec::new();
    viewer.render(&mut frame);
    println!("Draw commands: {}", frame.len());

    Ok(())
}

fn print_scene(scene: &Scene) {
    for &id in scene.root_nodes() {
        let Some(node) = scene.get_node(id) else {
            continue;
        };
        let kind = match node.kind() {
            NodeKind::Primitive { shape } => shape.to_string(),
            NodeKind::Composite { children } => format!("composite({})", children.len()),
        };
        let position = node.position();
        let depth = node
            .depth()
            .map(|d| format!("{:.3}", d))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:>3} {:<13} pos=({:.3}, {:.3}, {:.3}) scale={:.3} color={} selected={} depth={}",
            id,
            kind,
            position.x,
            position.y,
            position.z,
            node.scale_factor(),
            node.color_index(),
            node.is_selected(),
            depth
        );
    }

    if let Some(bounds) = scene.bounding() {
        println!(
            "Bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
        );
    }
}
