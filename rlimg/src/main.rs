//! rlimg: inspect images through rasterload.
//!
//! Decodes each input to the canonical bottom-up buffer and reports the
//! detected format, pixel layout, dimensions, and any load error.

mod batch;
mod info;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rlimg", version, about = "Inspect BMP, PNG and JPEG files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode images and display what they contain.
    Info(InfoArgs),
}

/// Arguments for the `info` subcommand.
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Input files, directories, or glob patterns.
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Reject images wider than this.
    #[arg(long, env = "RLIMG_MAX_WIDTH")]
    pub max_width: Option<u64>,

    /// Reject images taller than this.
    #[arg(long, env = "RLIMG_MAX_HEIGHT")]
    pub max_height: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Info(args) => info::run(args),
    }
}
