//! # レシピ
//!
//! 料理のレシピを表現するドメインモデル。
//!
//! ## 設計方針
//!
//! - レシピは材料（[`crate::ingredient::Ingredient`]）を 0 件以上所有する
//! - 所有関係は材料側の `recipe_id` で表現し、レシピ削除時は
//!   ストレージの `ON DELETE CASCADE` で材料も削除される
//! - ID はストレージ採番（`BIGSERIAL`）のため、新規作成は [`NewRecipe`]
//!   ドラフトを経由し、採番済みエンティティはリポジトリが返す
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use kondate_domain::recipe::{NewRecipe, RecipeDescription, RecipeName};
//!
//! let draft = NewRecipe {
//!     name:        RecipeName::new("肉じゃが")?,
//!     description: RecipeDescription::new("定番の家庭料理")?,
//!     now:         chrono::Utc::now(),
//! };
//!
//! assert_eq!(draft.name.as_str(), "肉じゃが");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};

define_i64_id! {
    /// レシピの一意識別子
    pub struct RecipeId;
}

// =========================================================================
// RecipeName / RecipeDescription（値オブジェクト）
// =========================================================================

define_validated_string! {
    /// レシピ名（値オブジェクト）
    ///
    /// 1〜255 文字。前後の空白は除去される（DB: `VARCHAR(255)`）。
    pub struct RecipeName {
        label: "レシピ名",
        max_length: 255,
    }
}

define_validated_string! {
    /// レシピの説明（値オブジェクト）
    ///
    /// 1〜255 文字。前後の空白は除去される（DB: `VARCHAR(255)`）。
    pub struct RecipeDescription {
        label: "レシピの説明",
        max_length: 255,
    }
}

// =========================================================================
// Recipe（レシピエンティティ）
// =========================================================================

/// レシピの新規作成パラメータ
///
/// ID 採番前のドラフト。リポジトリの `insert` に渡し、
/// 採番済みの [`Recipe`] を受け取る。
pub struct NewRecipe {
    pub name:        RecipeName,
    pub description: RecipeDescription,
    pub now:         DateTime<Utc>,
}

/// レシピの DB 復元パラメータ
pub struct RecipeRecord {
    pub id:          RecipeId,
    pub name:        RecipeName,
    pub description: RecipeDescription,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

/// レシピエンティティ
///
/// # 不変条件
///
/// - `name` / `description` は検証済みの値オブジェクト
/// - `updated_at >= created_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    id:          RecipeId,
    name:        RecipeName,
    description: RecipeDescription,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

impl Recipe {
    /// データベースからレシピを復元する
    pub fn from_db(record: RecipeRecord) -> Self {
        Self {
            id:          record.id,
            name:        record.name,
            description: record.description,
            created_at:  record.created_at,
            updated_at:  record.updated_at,
        }
    }

    /// レシピ名を変更した新しいインスタンスを返す
    pub fn with_name(self, name: RecipeName, now: DateTime<Utc>) -> Self {
        Self {
            name,
            updated_at: now,
            ..self
        }
    }

    /// レシピの説明を変更した新しいインスタンスを返す
    pub fn with_description(self, description: RecipeDescription, now: DateTime<Utc>) -> Self {
        Self {
            description,
            updated_at: now,
            ..self
        }
    }

    // --- ゲッター ---

    pub fn id(&self) -> &RecipeId {
        &self.id
    }

    pub fn name(&self) -> &RecipeName {
        &self.name
    }

    pub fn description(&self) -> &RecipeDescription {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
