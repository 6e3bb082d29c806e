//! RFC 9457 (Problem Details for HTTP APIs) 準拠のエラーレスポンス型。
//!
//! API が返すすべてのエラーはこの形式に統一する。
//! `type` はエラー種別を識別する URI で、クライアントはこの値で分岐できる。

use serde::{Deserialize, Serialize};

/// エラー種別 URI のベース。
const ERROR_TYPE_BASE: &str = "https://kondate.example.com/errors";

/// RFC 9457 準拠のエラーレスポンスボディ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// エラー種別を識別する URI。
    #[serde(rename = "type")]
    pub error_type: String,
    /// 人間向けのエラー種別の短い説明。
    pub title:      String,
    /// HTTP ステータスコード。
    pub status:     u16,
    /// このエラー固有の詳細メッセージ。
    pub detail:     String,
}

impl ErrorResponse {
    /// エラー種別のサフィックスと内容を指定してレスポンスを組み立てる。
    pub fn new(type_suffix: &str, title: &str, status: u16, detail: impl Into<String>) -> Self {
        Self {
            error_type: format!("{ERROR_TYPE_BASE}/{type_suffix}"),
            title:      title.to_string(),
            status,
            detail:     detail.into(),
        }
    }

    /// 400 Bad Request。リクエストの形式が不正な場合に使う。
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("bad-request", "Bad Request", 400, detail)
    }

    /// 400 Bad Request。入力値がドメインの制約を満たさない場合に使う。
    pub fn validation_error(detail: impl Into<String>) -> Self {
        Self::new("validation-error", "Validation Error", 400, detail)
    }

    /// 404 Not Found。
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("not-found", "Not Found", 404, detail)
    }

    /// 409 Conflict。
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new("conflict", "Conflict", 409, detail)
    }

    /// 500 Internal Server Error。内部の詳細はクライアントへ出さない。
    pub fn internal_error() -> Self {
        Self::new(
            "internal-error",
            "Internal Server Error",
            500,
            "内部エラーが発生しました",
        )
    }
}
