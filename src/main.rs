use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use estateai::config::EstateAiConfig;
use estateai::models::Query;
use estateai::router::QueryRouter;
use estateai::services::{
    GoogleGeocodingClient, GooglePlacesClient, OpenAiClient, VancouverOpenDataClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = EstateAiConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("EstateAI {}", estateai::VERSION);
        eprintln!("Usage: estateai <natural language query>");
        eprintln!("Example: estateai \"what schools are near 2150 Balsam St, Vancouver?\"");
        return Ok(());
    }
    let query = Query::new(args.join(" "));

    let router = QueryRouter::new(
        Arc::new(GoogleGeocodingClient::new(&config)),
        Arc::new(GooglePlacesClient::new(&config)),
        Arc::new(VancouverOpenDataClient::new(&config)),
        Arc::new(OpenAiClient::new(&config)),
        &config,
    );

    match router.route(&query).await {
        Ok(envelope) => {
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}
