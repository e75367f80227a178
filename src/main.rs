use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use swarmfield::headless::{self, RenderJob};
use swarmfield::SceneConfig;

/// Cursor-following dot swarm over a field of drifting shapes.
#[derive(Parser, Debug)]
#[command(name = "swarmfield", version, about)]
struct Cli {
    /// JSON scene configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for every random draw (defaults to the clock).
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of swarm dots.
    #[arg(long, global = true)]
    dots: Option<u32>,

    /// Number of background shapes.
    #[arg(long, global = true)]
    shapes: Option<u32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a window (the default).
    Run,
    /// Render frames to PNG files without a window.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

impl Cli {
    fn scene_config(&self) -> anyhow::Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SceneConfig::default(),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(dots) = self.dots {
            config.swarm.get_or_insert_with(Default::default).count = dots;
        }
        if let Some(shapes) = self.shapes {
            config.field.get_or_insert_with(Default::default).count = shapes;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.scene_config()?;

    match cli.command {
        None | Some(Command::Run) => {
            swarmfield::window::run(config).context("window exited with an error")?;
        }
        Some(Command::Render(args)) => {
            let job = RenderJob {
                frames: args.frames,
                width: args.width,
                height: args.height,
                out_dir: args.out,
            };
            let written = headless::render(config, &job).context("headless render failed")?;
            println!("wrote {} frames to {}", written.len(), job.out_dir.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let cli = Cli::parse_from(["swarmfield", "--seed", "9", "--dots", "12", "--shapes", "3"]);
        let config = cli.scene_config().unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.swarm.unwrap().count, 12);
        assert_eq!(config.field.unwrap().count, 3);
    }

    #[test]
    fn render_subcommand_parses() {
        let cli = Cli::parse_from(["swarmfield", "render", "--frames", "10", "--out", "frames"]);
        match cli.command {
            Some(Command::Render(args)) => {
                assert_eq!(args.frames, 10);
                assert_eq!(args.width, 1280);
                assert_eq!(args.out, PathBuf::from("frames"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
