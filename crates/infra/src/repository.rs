//! # リポジトリ実装
//!
//! 永続化を担当するリポジトリトレイトと、その PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケース層はトレイトにのみ依存する
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod ingredient_repository;
pub mod recipe_repository;

pub use ingredient_repository::{IngredientRepository, PostgresIngredientRepository};
pub use recipe_repository::{PostgresRecipeRepository, RecipeRepository};
