use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use rusty_loader::cli::LoaderArgs;
use rusty_loader::data::loader::load_manifest;
use rusty_loader::summary::LoadSummary;
use rusty_loader::transform::{ImageLoader, LoadOutcome};

fn main() -> Result<()> {
    env_logger::init();

    let args = LoaderArgs::parse();
    let loader = ImageLoader::new(args.loader_config()?);
    info!("using {loader}");

    let mut records = load_manifest(&args.manifest, args.data_root.as_deref())
        .with_context(|| format!("loading manifest {}", args.manifest.display()))?;

    let mut summary = LoadSummary::default();
    for (i, record) in records.iter_mut().enumerate() {
        let path = record
            .img_path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match loader
            .apply(record)
            .with_context(|| format!("sample {i}: {path}"))?
        {
            LoadOutcome::Loaded(record) => summary.record_loaded(record),
            LoadOutcome::Skipped => {
                warn!("sample {i}: could not decode {path}, dropping it");
                summary.record_skipped(record);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}
