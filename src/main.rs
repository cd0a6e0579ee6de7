/// API сервер пайплайна обработки сил и предсказаний

use axum::{
    http::Method,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use aqua_ml::{
    pipeline::{run_pipeline, PipelineOutput, PredictionOptions},
    preprocessing::{ForceProcessor, ProcessingOptions},
    types::DataTable,
};

#[derive(Debug, Deserialize)]
struct ProcessRequest {
    data: DataTable,
    options: ProcessingOptions,
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    data: DataTable,
    processing: ProcessingOptions,
    #[serde(default)]
    prediction: PredictionOptions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/process", post(process))
        .route("/api/predict", post(predict))
        .layer(cors);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], 8000));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://0.0.0.0:8000");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Aqua ML API (Rust)",
        "version": "0.1.0"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn process(Json(request): Json<ProcessRequest>) -> Result<Json<DataTable>, String> {
    tracing::info!(
        "Process request: {} rows, {} columns",
        request.data.n_rows(),
        request.data.n_cols()
    );

    match ForceProcessor::process(&request.data, &request.options) {
        Ok(processed) => Ok(Json(processed)),
        Err(e) => {
            tracing::warn!("Processing failed: {}", e);
            Err(e.to_string())
        }
    }
}

async fn predict(Json(request): Json<PredictRequest>) -> Result<Json<PipelineOutput>, String> {
    tracing::info!(
        "Predict request: {} rows, {} targets, {} models",
        request.data.n_rows(),
        request.prediction.targets.len(),
        request.prediction.models.len()
    );

    match run_pipeline(&request.data, &request.processing, &request.prediction) {
        Ok(output) => Ok(Json(output)),
        Err(e) => {
            tracing::warn!("Pipeline failed: {}", e);
            Err(e.to_string())
        }
    }
}
