//! # RecipeRepository
//!
//! レシピの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - ID は `BIGSERIAL` で DB が採番するため、`insert` は
//!   `INSERT .. RETURNING` で採番済みエンティティを返す
//! - 材料の取得は [`super::IngredientRepository`] の責務とし、
//!   結合はユースケース層で行う

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kondate_domain::recipe::{
    NewRecipe,
    Recipe,
    RecipeDescription,
    RecipeId,
    RecipeName,
    RecipeRecord,
};
use sqlx::PgPool;

use crate::error::InfraError;

/// レシピリポジトリトレイト
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// 全レシピを ID 昇順で取得する
    async fn find_all(&self) -> Result<Vec<Recipe>, InfraError>;

    /// ID でレシピを検索する
    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, InfraError>;

    /// レシピを挿入し、採番済みのエンティティを返す
    async fn insert(&self, new_recipe: &NewRecipe) -> Result<Recipe, InfraError>;

    /// レシピを更新する（名前・説明・updated_at を反映）
    async fn update(&self, recipe: &Recipe) -> Result<(), InfraError>;

    /// レシピを削除する
    ///
    /// 所属する材料は DB の `ON DELETE CASCADE` で一緒に削除される。
    async fn delete(&self, id: &RecipeId) -> Result<(), InfraError>;
}

/// recipes テーブルの行
#[derive(sqlx::FromRow)]
struct RecipeRow {
    id:          i64,
    name:        String,
    description: String,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = InfraError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        // DB の NOT NULL + VARCHAR(255) 制約により通常は失敗しない
        let name = RecipeName::new(row.name)
            .map_err(|e| InfraError::Unexpected(format!("DB のレシピ名が不正: {e}")))?;
        let description = RecipeDescription::new(row.description)
            .map_err(|e| InfraError::Unexpected(format!("DB のレシピ説明が不正: {e}")))?;

        Ok(Recipe::from_db(RecipeRecord {
            id: RecipeId::from_i64(row.id),
            name,
            description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

/// PostgreSQL 実装の RecipeRepository
#[derive(Debug, Clone)]
pub struct PostgresRecipeRepository {
    pool: PgPool,
}

impl PostgresRecipeRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeRepository for PostgresRecipeRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Recipe>, InfraError> {
        let rows: Vec<RecipeRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM recipes
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Recipe::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, InfraError> {
        let row: Option<RecipeRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Recipe::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, new_recipe: &NewRecipe) -> Result<Recipe, InfraError> {
        let row: RecipeRow = sqlx::query_as(
            r#"
            INSERT INTO recipes (name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(new_recipe.name.as_str())
        .bind(new_recipe.description.as_str())
        .bind(new_recipe.now)
        .fetch_one(&self.pool)
        .await?;

        Recipe::try_from(row)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(recipe_id = %recipe.id()))]
    async fn update(&self, recipe: &Recipe) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE recipes
            SET name = $2, description = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(recipe.id().as_i64())
        .bind(recipe.name().as_str())
        .bind(recipe.description().as_str())
        .bind(recipe.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &RecipeId) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            DELETE FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
