mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use courier_api::{ApiState, ApiStateInner, router};
use courier_core::RandomAcceptance;
use courier_greeting::{FallbackGreeter, GeminiGreeter, Greeter};
use courier_store::MemoryStore;
use courier_store::demo::{DEMO_USER_PASSWORD, DEMO_USER_PHONE};

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let greeter: Arc<dyn Greeter> = match &config.gemini_api_key {
        Some(key) => Arc::new(GeminiGreeter::new(key.clone()).with_model(config.gemini_model.clone())),
        None => {
            warn!("GEMINI_API_KEY not set; greetings use the fixed fallback");
            Arc::new(FallbackGreeter)
        }
    };

    let policy = Arc::new(RandomAcceptance::new(config.accept_probability));

    let state: ApiState = if config.demo {
        info!(
            "Demo mode: in-memory store, log in as {} / {}",
            DEMO_USER_PHONE, DEMO_USER_PASSWORD
        );
        Arc::new(ApiStateInner::demo(
            MemoryStore::demo(),
            greeter,
            policy,
            config.messenger.clone(),
        ))
    } else {
        if config.store_url.is_none() {
            info!("No COURIER_STORE_URL set; clients must send storeUrl on login");
        }
        Arc::new(ApiStateInner::new(
            config.store_url.clone(),
            greeter,
            policy,
            config.messenger.clone(),
        ))
    };

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Courier server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
