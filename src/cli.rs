use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "linegauge",
    about = "A single-line, in-place terminal progress bar",
    version
)]
pub struct Cli {
    /// File to read while displaying byte progress.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Padding columns outside the bar, both sides.
    #[arg(long, default_value_t = 2)]
    pub offset: usize,

    /// Override the probed terminal width.
    #[arg(long)]
    pub width: Option<usize>,

    /// Title prefixed to the bar line.
    #[arg(long)]
    pub title: Option<String>,

    /// Steps to simulate when no file is given.
    #[arg(long, default_value_t = 100)]
    pub steps: u64,
}
