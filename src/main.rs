//! genteel-vdp - render and inspect VDP state snapshots
//!
//! Usage: genteel-vdp render --state vdp.json --out frame.png
//!        genteel-vdp info --state vdp.json

use clap::{Parser, Subcommand};
use genteel_vdp::debugger::Debuggable;
use genteel_vdp::vdp::FrameBuffer;
use genteel_vdp::{Config, Error, Result, Vdp};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "genteel-vdp")]
#[command(version)]
#[command(about = "Render and inspect Mega Drive/Genesis VDP snapshots", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the active display of a snapshot to a PNG
    Render {
        /// VDP snapshot (JSON)
        #[arg(short, long)]
        state: PathBuf,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output image
        #[arg(short, long, default_value = "frame.png")]
        out: PathBuf,
    },
    /// Print the decoded registers and status word of a snapshot
    Info {
        /// VDP snapshot (JSON)
        #[arg(short, long)]
        state: PathBuf,
    },
}

fn load_vdp(path: &Path, config: &Config) -> Result<Vdp> {
    let text = std::fs::read_to_string(path)?;
    let state: serde_json::Value = serde_json::from_str(&text)?;
    let mut vdp = Vdp::with_config(config);
    vdp.write_state(&state)?;
    // The snapshot carries its own region; the config wins
    vdp.apply_config(config);
    Ok(vdp)
}

fn render(state: &Path, config: Option<&Path>, out: &Path) -> Result<()> {
    let config = match config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    let vdp = load_vdp(state, &config)?;

    let mut frame = FrameBuffer::new();
    vdp.render_frame(&mut frame);

    let (w, h) = (frame.width() as u32, frame.height() as u32);
    let image = image::RgbImage::from_raw(w, h, frame.to_rgb())
        .ok_or_else(|| Error::InvalidState(format!("frame size {}x{}", w, h)))?;
    image.save(out)?;
    log::info!("Wrote {}x{} frame to {}", w, h, out.display());
    Ok(())
}

fn info(state: &Path) -> Result<()> {
    let vdp = load_vdp(state, &Config::default())?;
    let regs = serde_json::to_string_pretty(vdp.regs())?;
    println!("{}", regs);
    println!("status: {:#06x}", vdp.status());
    println!("line: {}  frame: {}", vdp.timing.line, vdp.timing.frame);
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let result = match &args.command {
        Command::Render { state, config, out } => render(state, config.as_deref(), out),
        Command::Info { state } => info(state),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
