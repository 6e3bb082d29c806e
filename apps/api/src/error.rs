//! # API エラーハンドリング
//!
//! API で発生するエラーと、axum レスポンスへの変換を定義する。
//!
//! レスポンスボディは `kondate_shared::ErrorResponse`（RFC 9457）に統一する。
//! データベース起因のエラーは詳細をログに残し、クライアントには
//! 固定メッセージの 500 だけを返す。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kondate_infra::InfraError;
use kondate_shared::ErrorResponse;
use thiserror::Error;

/// API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// リクエストボディの形式が不正（JSON として解釈できない等）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 入力値がドメインの制約を満たさない
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 競合（同名の材料の重複追加など）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(detail))
            }
            ApiError::Validation(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::validation_error(detail),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(detail)),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, ErrorResponse::conflict(detail)),
            ApiError::Database(e) => {
                tracing::error!("データベースエラー: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
