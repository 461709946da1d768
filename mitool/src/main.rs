mod options;
mod progress;
mod show;
mod table;

use anyhow::Result;
use clap::Parser;
use options::Cli;

fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse() {
        Cli::Table(table) => table.run(),
        Cli::Show(show) => show.run(),
    }
}
