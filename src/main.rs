mod cli;

use std::fs::File;
use std::io::Read;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use linegauge::{Bar, BarConfig};

use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.file {
        Some(path) => {
            let mut config = BarConfig::for_file(&path, cli.offset)?;
            if let Some(width) = cli.width {
                config.total_width = width;
            }
            if let Some(title) = cli.title {
                config.title = title;
            }
            let mut bar = Bar::new(config)?;

            let mut file = File::open(&path)?;
            let mut buf = [0u8; 8192];
            let mut read_total = 0u64;
            loop {
                let n = file.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                read_total += n as u64;
                bar.write(read_total);
            }
            bar.close();
        }
        None => {
            let mut config = BarConfig::sized_to_terminal(
                cli.title.unwrap_or_default(),
                cli.steps,
                cli.offset,
            );
            if let Some(width) = cli.width {
                config.total_width = width;
            }
            let mut bar = Bar::new(config)?;
            for step in 0..=cli.steps {
                bar.write(step);
                thread::sleep(Duration::from_millis(20));
            }
            bar.close();
        }
    }

    Ok(())
}
