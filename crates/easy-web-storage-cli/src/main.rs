use std::path::PathBuf;

use clap::Parser;

use crate::{command::Command, logger::LoggerConfig};

mod command;
mod config;
mod logger;

#[derive(Parser, Debug)]
#[command(version, about, name = "ews")]
struct Args {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Sets the directory local values are stored in
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    /// Sets the storage area; only `local` persists between runs, `session` is rejected
    #[arg(short, long)]
    pub area: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let app_config = config::load_config(args.config, args.data_dir, args.area)?;

    logger::init_logger(LoggerConfig::from(&app_config));

    if let Some(output) = args.command.execute(&app_config)? {
        println!("{output}");
    }
    Ok(())
}
