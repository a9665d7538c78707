use bookwise_api::config::ApiConfig;
use bookwise_api::handlers::jobs::run_auto_completion;
use bookwise_core::time;
use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing_subscriber::FmtSubscriber;

/// One pass of the auto-completion job, intended to be fired from cron.
/// Overlapping invocations are safe; a failed run is simply retried on the
/// next fire.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create database connection pool
    let db_pool = bookwise_db::create_pool(&config.database_url).await?;

    let summary =
        run_auto_completion(&db_pool, &config.completion_settings(), time::riga_now()).await?;

    println!(
        "Auto-completion finished: processed={}, failed={}",
        summary.processed_count, summary.failed_count
    );

    Ok(())
}
