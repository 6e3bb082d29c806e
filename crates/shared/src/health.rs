//! ヘルスチェックのレスポンス型。

use serde::Serialize;

/// `GET /health` が返すレスポンスボディ。
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// サービスの状態。正常時は `"healthy"`。
    pub status:  String,
    /// サービスのバージョン (`CARGO_PKG_VERSION`)。
    pub version: String,
}

impl HealthResponse {
    /// 正常状態のレスポンスを組み立てる。
    pub fn healthy(version: &str) -> Self {
        Self {
            status:  "healthy".to_string(),
            version: version.to_string(),
        }
    }
}
