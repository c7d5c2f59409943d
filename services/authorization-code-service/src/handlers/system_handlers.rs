use axum::Json;
use common::HealthResponse;

/// GET / - サービス情報
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "authorization-code-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health - ヘルスチェック
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
