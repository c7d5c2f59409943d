pub mod authorization_code_handlers;
pub mod system_handlers;

pub use authorization_code_handlers::*;
pub use system_handlers::*;

use axum::{
    routing::{get, post},
    Router,
};

pub const SEND_AUTHORIZATION_CODE_PATH: &str = "/api/v1/authorizationcode/send";

/// 全ルートを登録したルーター（状態なし）
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(SEND_AUTHORIZATION_CODE_PATH, post(send_authorization_code))
}
