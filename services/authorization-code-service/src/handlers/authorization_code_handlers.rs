use axum::{extract::rejection::JsonRejection, Json};

use crate::domain::{SendAuthorizationCodeRequest, SendAuthorizationCodeResponse};
use crate::error::ApiError;

/// POST /api/v1/authorizationcode/send - 認証コード送信
///
/// 本文のデコード失敗も検証失敗も Problem Details で返す。
pub async fn send_authorization_code(
    payload: Result<Json<SendAuthorizationCodeRequest>, JsonRejection>,
) -> Result<Json<SendAuthorizationCodeResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection, "rejected request body");
        ApiError::from(rejection)
    })?;

    let identifier_type = request.identifier_type.clone();
    let delivery_mode = request.delivery_mode.mode();

    match request.confirm() {
        Ok(response) => {
            tracing::info!(%identifier_type, ?delivery_mode, "authorization code sent");
            Ok(Json(response))
        }
        Err(failure) => {
            tracing::warn!(error = %failure, "authorization code request rejected");
            Err(failure.into())
        }
    }
}
