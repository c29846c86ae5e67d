use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use package_subset::copier::check_roots;
use package_subset::{FolderCatalog, ManifestIndex, SubsetBuilder, SubsetConfig, SubsetContext};

/// Copy the part of a metadata source tree that a package manifest references.
#[derive(Parser)]
#[command(name = "package-subset", version)]
struct Cli {
    /// Source tree holding one directory per metadata category.
    #[arg(short, long)]
    source: PathBuf,

    /// Target tree; emptied before every run.
    #[arg(short, long)]
    target: PathBuf,

    /// Package manifest. Defaults to `package.xml` in the source tree.
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Layout configuration. Defaults to `package-subset.json` in the source tree.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("package_subset=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => SubsetConfig::from_path(path)?,
        None => SubsetConfig::discover(&cli.source),
    };
    let layout = config.into_layout();
    let catalog = FolderCatalog::with_overrides(&layout.folder_overrides);

    let manifest_path = cli
        .manifest
        .clone()
        .unwrap_or_else(|| cli.source.join("package.xml"));
    check_roots(&cli.source, &cli.target, &manifest_path)?;
    let manifest = ManifestIndex::load(&manifest_path, &catalog)?;

    let context = SubsetContext::new(&cli.source, &cli.target, &layout);
    let report = SubsetBuilder::new(context)
        .run(&manifest)
        .with_context(|| format!("failed to copy {} into {}", cli.source.display(), cli.target.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
