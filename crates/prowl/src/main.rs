mod config;
mod report;
mod runner;
mod targets;

use anyhow::Context;
use clap::Parser;
use config::ConfigLoader;
use prowl_engine::backend::Backend;
use prowl_h::backend::HeadlessBackend;
use runner::Runner;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prowl", version, about = "Unscripted page-exploration smoke tester")]
struct Args {
    /// YAML target list to explore
    #[arg(long, conflicts_with = "url")]
    targets: Option<PathBuf>,

    /// Single URL to explore ad hoc
    #[arg(long)]
    url: Option<String>,

    /// Launch the browser in visible mode (not headless)
    #[arg(long)]
    visible: bool,

    /// Result directory root (overrides the configured output_dir)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Config file (defaults to ./prowl.yaml, then ~/.prowl/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout stays clean for piping.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConfigLoader::load_default()
            .await
            .context("loading default config")?,
    };
    if let Some(out) = args.out {
        config.output_dir = out;
    }

    let targets = match (&args.targets, &args.url) {
        (Some(path), _) => targets::load(path)
            .await
            .with_context(|| format!("loading targets {}", path.display()))?,
        (None, Some(url)) => vec![targets::ad_hoc(url)?],
        (None, None) => anyhow::bail!("either --targets or --url is required"),
    };

    let mut backend = HeadlessBackend::new_with_visibility(args.visible);
    backend
        .launch()
        .await
        .context("launching headless browser")?;

    let runner = Runner::new(config);
    let outcome = runner.run(&mut backend, &targets).await;

    // Close before surfacing any run error so the browser never leaks.
    if let Err(e) = backend.close().await {
        tracing::warn!("Failed to close browser: {}", e);
    }

    let outcome = outcome.context("running targets")?;
    report::write(&outcome).await.context("writing report")?;

    let failed = outcome.results.iter().filter(|r| r.failure.is_some()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} targets failed to load", failed, outcome.results.len());
    }
    Ok(())
}
