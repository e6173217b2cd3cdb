use std::sync::Arc;
use std::time::Duration;

use finbot::api::router::create_router;
use finbot::categorizer::Classifier;
use finbot::config::AppConfig;
use finbot::huggingface::ZeroShotClient;
use finbot::sheets::SheetsClient;
use finbot::{db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let metrics_handle = finbot::metrics::init_metrics();

    tracing::info!("Connecting to database...");
    let db = db::init_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let classifier: Option<Arc<dyn Classifier>> = match config.hf_api_token.clone() {
        Some(token) => {
            let client = ZeroShotClient::new(http.clone(), token)
                .with_model_url(config.hf_model_url.clone())
                .with_max_loading_wait(Duration::from_secs(config.model_loading_max_wait_secs));
            tracing::info!(
                model_url = %config.hf_model_url,
                labels = config.category_labels.as_slice().len(),
                "Zero-shot classifier configured"
            );
            Some(Arc::new(client) as Arc<dyn Classifier>)
        }
        None => {
            tracing::warn!("No HF_API_TOKEN — categorization endpoints will be unavailable");
            None
        }
    };

    let sheets = if config.has_sheets_source() {
        Some(SheetsClient::new(
            http.clone(),
            config.sheets_api_key.clone().unwrap_or_default(),
            config.spreadsheet_id.clone().unwrap_or_default(),
            config.sheet_range.clone(),
        ))
    } else {
        tracing::info!("Spreadsheet source disabled (SHEETS_API_KEY / SPREADSHEET_ID unset)");
        None
    };

    tracing::info!(
        initial_batch_size = config.initial_batch_size,
        max_batch_size = config.max_batch_size,
        retry_delay_secs = config.retry_delay_secs,
        "Categorizer settings loaded"
    );

    let state = AppState {
        db,
        config,
        metrics_handle,
        classifier,
        sheets,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
