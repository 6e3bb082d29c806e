//! # 材料
//!
//! レシピに属する材料を表現するドメインモデル。
//!
//! ## 設計方針
//!
//! - 材料は必ず 1 つのレシピ（[`crate::recipe::Recipe`]）に属する
//! - 同一レシピ内で材料名は一意。別レシピであれば同名を許容する
//! - 一意性の判定はストレージの一意制約
//!   （`(recipe_id, name)` の複合一意）に委ね、読み取り後の
//!   重複チェックは行わない

use chrono::{DateTime, Utc};

use crate::recipe::RecipeId;

define_i64_id! {
    /// 材料の一意識別子
    pub struct IngredientId;
}

define_validated_string! {
    /// 材料名（値オブジェクト）
    ///
    /// 1〜255 文字。前後の空白は除去される（DB: `VARCHAR(255)`）。
    pub struct IngredientName {
        label: "材料名",
        max_length: 255,
    }
}

// =========================================================================
// Ingredient（材料エンティティ）
// =========================================================================

/// 材料の新規作成パラメータ
///
/// ID 採番前のドラフト。リポジトリの `insert` に渡し、
/// 採番済みの [`Ingredient`] を受け取る。
pub struct NewIngredient {
    pub recipe_id: RecipeId,
    pub name:      IngredientName,
    pub now:       DateTime<Utc>,
}

/// 材料の DB 復元パラメータ
pub struct IngredientRecord {
    pub id:         IngredientId,
    pub recipe_id:  RecipeId,
    pub name:       IngredientName,
    pub created_at: DateTime<Utc>,
}

/// 材料エンティティ
///
/// 追加と削除のみを行い、更新操作は持たない。
///
/// # 不変条件
///
/// - `name` は検証済みの値オブジェクト
/// - `(recipe_id, name)` はレシピ内で一意（ストレージ制約で保証）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    id:         IngredientId,
    recipe_id:  RecipeId,
    name:       IngredientName,
    created_at: DateTime<Utc>,
}

impl Ingredient {
    /// データベースから材料を復元する
    pub fn from_db(record: IngredientRecord) -> Self {
        Self {
            id:         record.id,
            recipe_id:  record.recipe_id,
            name:       record.name,
            created_at: record.created_at,
        }
    }

    // --- ゲッター ---

    pub fn id(&self) -> &IngredientId {
        &self.id
    }

    pub fn recipe_id(&self) -> &RecipeId {
        &self.recipe_id
    }

    pub fn name(&self) -> &IngredientName {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
