//! rompler - stream one sample ROM voice to the default output device
//!
//! Run with: cargo run -- --rom path/to/rom.bin

mod app;
mod demo;
mod ui;

use std::path::PathBuf;

use clap::{crate_version, Parser};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use rompler_dsp::{SampleRom, SampleSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::Rompler;

#[derive(Parser)]
#[clap(
    version = crate_version!(),
    about = "Plays slices of a sample ROM through a single streaming voice."
)]
struct Cli {
    /// ROM blob to play. A small demo ROM is synthesized when omitted.
    #[arg(long)]
    rom: Option<PathBuf>,
    /// Slice to start on. Defaults to the first slice longer than a wavetable.
    #[arg(long)]
    slice: Option<u32>,
    /// Playback speed; negative values play backward.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    speed: f32,
    /// Pitch offset in semitones.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pitch: f32,
    /// Loop the section after the loop marker.
    #[arg(long = "loop")]
    looping: bool,
    /// Bounce between the loop marker and the end instead of wrapping.
    #[arg(long)]
    ping_pong: bool,
    /// Loop start, as a fraction of the play region.
    #[arg(long, default_value_t = 0.0)]
    loop_marker: f32,
    /// Copy up to this many MiB of the ROM into RAM before playing.
    #[arg(long)]
    mirror_mb: Option<usize>,
    /// Play with the gate held for this many seconds, print the final status
    /// and exit without the terminal UI.
    #[arg(long)]
    headless: Option<f32>,
}

fn setup_logging() {
    // the TUI owns stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_rom(cli: &Cli) -> EyreResult<SampleRom> {
    let mut rom = match &cli.rom {
        Some(path) => SampleRom::open(path)
            .wrap_err_with(|| format!("failed to open ROM {}", path.display()))?,
        None => {
            info!("no ROM given, using the demo ROM");
            demo::demo_rom().wrap_err("failed to build demo ROM")?
        }
    };

    if let Some(mb) = cli.mirror_mb {
        rom.mirror_in_ram(mb * 1024 * 1024)
            .wrap_err("failed to mirror ROM in RAM")?;
    }

    Ok(rom)
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    setup_logging();

    let cli = Cli::parse();
    let rom = load_rom(&cli)?;

    let slice = cli
        .slice
        .or_else(|| rom.first_sample_slice())
        .unwrap_or(0);
    if !rom.has_slice(slice) {
        color_eyre::eyre::bail!("slice {} not in ROM ({} slices)", slice, rom.slice_count());
    }

    let app = Rompler::new(rom)
        .slice(slice)
        .speed(cli.speed)
        .pitch(cli.pitch)
        .looping(cli.looping, cli.ping_pong)
        .loop_marker(cli.loop_marker);

    match cli.headless {
        Some(seconds) => app.run_headless(seconds),
        None => app.run(),
    }
}
