use anyhow::Result;
use keyed_translate::{config, driver, translation::OpenAiTranslator};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when the variables are already set)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("keyed_translate=info".parse()?),
        )
        .init();

    info!("Starting keyed translation batch");

    // Load configuration from environment
    let config = config::Config::from_env()?;
    info!(
        "Translating {} into {} languages from {} ({} requests/min)",
        config.source_language,
        config.target_languages.len(),
        config.languages_dir.display(),
        config.requests_per_minute
    );

    let translator = OpenAiTranslator::from_config(&config);
    let layout = driver::Layout::from_config(&config);

    let summary = driver::run_batch(&translator, &layout).await?;

    info!(
        "Batch finished: {} tasks completed, {} failed, {} keys added, {} entries translated ({} fallbacks), {} entry errors",
        summary.tasks_completed,
        summary.tasks_failed,
        summary.keys_added,
        summary.translated,
        summary.fallbacks,
        summary.entry_errors
    );
    info!(
        "Translation metrics: {}",
        serde_json::to_string(&translator.metrics())?
    );

    Ok(())
}
