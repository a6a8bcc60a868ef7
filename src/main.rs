use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use cutstock::CuttingConfig;
use cutstock::io::{self, cli::Cli};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match &args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            CuttingConfig::default()
        }
        Some(config_file) => io::read_config(config_file)?,
    };
    info!("[MAIN] Successfully parsed CuttingConfig: {config:?}");

    let instance = args.instance()?;
    let plan = cutstock::solve(&instance, &config)?;

    println!("{plan}");

    if let Some(output_file) = &args.output_file {
        io::write_json(&plan, output_file)?;
    }
    Ok(())
}
