use anyhow::Result;
use job_digest::app_log;
use job_digest::{DigestConfig, DigestPipeline};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging first
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("job_digest=info,warn")),
        )
        .init();

    let config = DigestConfig::from_env()?;
    config.log_warnings();

    let pipeline = DigestPipeline::from_config(config)?;
    let summary = pipeline.run().await?;

    app_log!(
        info,
        "Done: {} collected, {} unique, {} matched",
        summary.collected,
        summary.unique,
        summary.matched
    );
    Ok(())
}
