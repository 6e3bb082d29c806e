//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ロジックはユースケースに委譲

pub mod health;
pub mod recipe;

pub use health::health_check;
pub use recipe::{
    RecipeState,
    add_ingredient,
    create_recipe,
    delete_recipe,
    get_recipe,
    list_recipes,
    remove_ingredient,
    replace_recipe,
    update_recipe,
};
