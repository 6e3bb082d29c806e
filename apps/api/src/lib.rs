//! # Kondate API ライブラリ
//!
//! レシピ管理 API のユースケースとハンドラを公開する。
//! 統合テストから内部モジュールへアクセスするために使う。

pub mod error;
pub mod handler;
pub mod usecase;
