use anyhow::Result;
use billboard_topten::{config::Config, pipeline, store};
use chrono::Local;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::from_env()?;
    info!(index = %config.index_url, out = %config.output_dir.display(), "configured");

    // ─── 3) scrape every listing page ────────────────────────────────
    let dataset = pipeline::scrape(&config)?;

    // ─── 4) persist ──────────────────────────────────────────────────
    let today = Local::now().date_naive();
    match store::save_dataset(
        &dataset,
        &config.output_dir,
        config.output_file.as_deref(),
        &today,
    )? {
        Some(path) => info!("Data saved to {}", path.display()),
        None => info!("No data to save."),
    }

    Ok(())
}
