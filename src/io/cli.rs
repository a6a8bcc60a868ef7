use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use log::LevelFilter;

use crate::instance::Instance;

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(group(ArgGroup::new("instance").required(true).args(["input_file", "stock_width"])))]
pub struct Cli {
    /// JSON instance with `stock_width`, `widths` and `demands`
    #[arg(short, long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,
    #[arg(long, value_name = "WIDTH", requires_all = ["widths", "demands"])]
    pub stock_width: Option<f64>,
    #[arg(long, value_name = "W1,W2,...", value_delimiter = ',', requires = "stock_width")]
    pub widths: Vec<f64>,
    #[arg(long, value_name = "D1,D2,...", value_delimiter = ',', requires = "stock_width")]
    pub demands: Vec<u64>,
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    /// Also write the cutting plan as JSON
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
}

impl Cli {
    /// The instance named on the command line, read from file or built from the inline values.
    pub fn instance(&self) -> Result<Instance> {
        match (&self.input_file, self.stock_width) {
            (Some(path), _) => super::read_instance(path),
            (None, Some(stock_width)) => {
                Ok(Instance::new(stock_width, self.widths.clone(), self.demands.clone())?)
            }
            (None, None) => anyhow::bail!("either --input-file or --stock-width is required"),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn inline_instance() {
        let cli = Cli::try_parse_from([
            "cutstock",
            "--stock-width",
            "15",
            "--widths",
            "4,6,7",
            "--demands",
            "80,50,100",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LevelFilter::Info);
        let instance = cli.instance().unwrap();
        assert_eq!(instance.widths(), &[4.0, 6.0, 7.0]);
        assert_eq!(instance.demands(), &[80, 50, 100]);
    }

    #[test]
    fn inline_instance_is_validated() {
        let cli = Cli::try_parse_from([
            "cutstock",
            "--stock-width",
            "15",
            "--widths",
            "4,6",
            "--demands",
            "80",
        ])
        .unwrap();
        let err = cli.instance().unwrap_err();
        assert!(err.to_string().contains("2 piece widths but 1 demands"));
    }

    #[test]
    fn file_and_options() {
        let cli = Cli::try_parse_from([
            "cutstock",
            "-i",
            "instance.json",
            "--output-file",
            "plan.json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.input_file, Some(PathBuf::from("instance.json")));
        assert_eq!(cli.output_file, Some(PathBuf::from("plan.json")));
        assert_eq!(cli.log_level, LevelFilter::Debug);
        assert!(cli.config_file.is_none());
    }

    #[test]
    fn an_instance_is_required() {
        assert!(Cli::try_parse_from(["cutstock"]).is_err());
        assert!(Cli::try_parse_from(["cutstock", "--stock-width", "10"]).is_err());
        let both = Cli::try_parse_from([
            "cutstock",
            "-i",
            "a.json",
            "--stock-width",
            "10",
            "--widths",
            "1",
            "--demands",
            "1",
        ]);
        assert!(both.is_err());
    }
}
