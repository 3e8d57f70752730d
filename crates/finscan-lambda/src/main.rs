use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use finscan_bedrock::process::BedrockProcessor;
use finscan_lambda::collaborators::S3Store;
use finscan_lambda::config::Config;
use finscan_lambda::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    info!(
        output_bucket = %config.output_bucket,
        model_id = %config.model_id,
        region = %config.region,
        pipeline = %config.strategy,
        "starting finscan"
    );

    let s3 = finscan_storage::client::build_client_with_region(&config.region).await;
    let bedrock = finscan_bedrock::client::build_client_with_region(&config.region).await;
    let processor = BedrockProcessor::new(
        bedrock,
        config.model_id.clone(),
        config.strategy.entity_types(),
    );

    let state = AppState {
        store: Arc::new(S3Store::new(s3)),
        processor: Arc::new(processor),
        output_bucket: config.output_bucket.clone(),
        strategy: config.strategy,
    };

    let app = finscan_lambda::app(state);

    match config.local_addr {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, "serving locally");
            axum::serve(listener, app).await?;
            Ok(())
        }
        None => lambda_http::run(app).await.map_err(|e| eyre::eyre!(e)),
    }
}
