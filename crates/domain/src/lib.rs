//! # Kondate ドメイン層
//!
//! レシピ管理のビジネスロジックを担うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（[`recipe::Recipe`],
//!   [`ingredient::Ingredient`]）
//! - **値オブジェクト**: バリデーション済みの不変オブジェクト
//!   （[`recipe::RecipeName`] など）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、外部サービス）に一切依存しない。
//! ID の採番はストレージ側（`BIGSERIAL`）で行うため、新規作成は
//! `NewRecipe` / `NewIngredient` のドラフト構造体を経由し、
//! 採番済みエンティティはリポジトリが返す。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`clock`] - テスト可能な時刻プロバイダ
//! - [`recipe`] - レシピエンティティと値オブジェクト
//! - [`ingredient`] - 材料エンティティと値オブジェクト

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod ingredient;
pub mod recipe;

pub use error::DomainError;
