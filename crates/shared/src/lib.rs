//! kondate の各クレートから利用される共有コンポーネント。
//!
//! API レスポンスの共通型とオブザーバビリティ関連のユーティリティを提供する。

pub mod error_response;
pub mod health;
#[cfg(feature = "observability")]
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::HealthResponse;
