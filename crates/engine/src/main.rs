use examforge_common::config::AppConfig;
use examforge_common::db::DbPool;
use examforge_common::metrics::register_metrics;
use examforge_common::provider::create_provider;
use examforge_common::{telemetry, Repository};
use examforge_engine::PaperGenerator;
use std::io::Read;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Reads one generation request as JSON on stdin and writes the
/// generation result as JSON on stdout.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();
    info!("Starting ExamForge Engine v{}", examforge_common::VERSION);

    let config = AppConfig::load()?;
    register_metrics();

    let pool = DbPool::new(&config.database).await?;
    pool.ping().await?;
    let repository = Arc::new(Repository::new(pool));

    let provider = create_provider(&config.provider);
    info!(provider = provider.name(), "Text provider ready");

    let generator = PaperGenerator::new(
        repository.clone(),
        repository.clone(),
        repository,
        provider,
        config.enrichment.clone(),
    );

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let request = serde_json::from_str(&input)?;

    let user_id = match std::env::var("APP__USER_ID") {
        Ok(raw) => Uuid::parse_str(&raw)?,
        Err(_) => Uuid::new_v4(),
    };

    let result = generator.generate(user_id, &request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
