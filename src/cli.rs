use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::LoaderConfig;

/// Run the multi-channel image loader over a sample manifest.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct LoaderArgs {
    /// Manifest listing samples (.json, .csv or .parquet), each with an `img_path`.
    pub manifest: PathBuf,
    /// Loader config file, e.g. {"type": "LoadMultiChannelImage", "to_float32": true}.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Widen decoded buffers to float32 (overrides the config file).
    #[arg(long, default_value_t = false)]
    pub to_float32: bool,
    /// Skip samples whose image cannot be decoded instead of aborting.
    #[arg(long, default_value_t = false)]
    pub ignore_empty: bool,
    /// Directory that relative `img_path`s are resolved against.
    #[arg(long)]
    pub data_root: Option<PathBuf>,
    /// Print the summary as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl LoaderArgs {
    /// Config file values, with any flag given on the command line switched on.
    pub fn loader_config(&self) -> Result<LoaderConfig> {
        let base = match &self.config {
            Some(path) => LoaderConfig::from_json_file(path)?,
            None => LoaderConfig::default(),
        };
        Ok(LoaderConfig {
            to_float32: base.to_float32 || self.to_float32,
            ignore_empty: base.ignore_empty || self.ignore_empty,
        })
    }
}
