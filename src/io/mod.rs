use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use serde::Serialize;

use crate::config::CuttingConfig;
use crate::instance::Instance;

pub mod cli;

/// Start of the process, the zero of the log timestamps.
pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);

pub fn read_instance(path: &Path) -> Result<Instance> {
    let file = File::open(path)
        .with_context(|| format!("could not open instance file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("could not parse instance file: {}", path.display()))
}

pub fn read_config(path: &Path) -> Result<CuttingConfig> {
    let file = File::open(path)
        .with_context(|| format!("could not open config file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).context("incorrect config file format")
}

pub fn write_json(value: &impl Serialize, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create output file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("could not write output file: {}", path.display()))?;
    info!("[IO] output written to {}", path.display());
    Ok(())
}

pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    LazyLock::force(&EPOCH);
    fern::Dispatch::new()
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                min,
                sec,
                thread_name,
            );

            out.finish(format_args!("{prefix:<27}{message}"))
        })
        .level(level_filter)
        .chain(std::io::stderr())
        .apply()
        .context("could not initialize logger")
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn reads_instance_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("instance.json");
        std::fs::write(
            &path,
            r#"{"stock_width": 15, "widths": [4, 6, 7], "demands": [80, 50, 100]}"#,
        )
        .unwrap();
        let instance = read_instance(&path).unwrap();
        assert_eq!(instance.demands(), &[80, 50, 100]);
    }

    #[test]
    fn invalid_instance_file_names_the_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, r#"{"stock_width": 3, "widths": [4], "demands": [1]}"#).unwrap();
        let err = read_instance(&path).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
        assert!(format!("{err:#}").contains("exceeds the stock width"));
    }

    #[test]
    fn missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");
        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains("could not open config file"));
    }

    #[test]
    fn config_file_round_trip() {
        let config = CuttingConfig {
            max_iterations: 25,
            time_limit: Some(10.0),
            ..CuttingConfig::default()
        };
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        write_json(&config, &path).unwrap();
        assert_eq!(read_config(&path).unwrap(), config);
    }
}
