//! # IngredientRepository
//!
//! 材料の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **制約を唯一の判定にする**: `insert` は事前の重複チェックを行わず、
//!   `(recipe_id, name)` の複合一意制約に違反したら
//!   [`InfraError::UniqueViolation`] を返す。読み取りと書き込みの間に
//!   割り込まれる競合が構造的に起きない
//! - **レシピスコープの検索**: 材料の参照・削除は常に所属レシピで
//!   絞り込み、別レシピの材料を誤って操作できないようにする

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kondate_domain::{
    ingredient::{Ingredient, IngredientId, IngredientName, IngredientRecord, NewIngredient},
    recipe::RecipeId,
};
use sqlx::PgPool;

use crate::error::InfraError;

/// 材料リポジトリトレイト
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// 材料を挿入し、採番済みのエンティティを返す
    ///
    /// 同一レシピ内の材料名重複は [`InfraError::UniqueViolation`]、
    /// 参照先レシピの不在は [`InfraError::ForeignKeyViolation`] として返る。
    async fn insert(&self, new_ingredient: &NewIngredient) -> Result<Ingredient, InfraError>;

    /// レシピ内で材料を検索する
    ///
    /// 別レシピに属する材料は見つからない扱いにする。
    async fn find_by_id_and_recipe(
        &self,
        id: &IngredientId,
        recipe_id: &RecipeId,
    ) -> Result<Option<Ingredient>, InfraError>;

    /// レシピに属する全材料を ID 昇順で取得する
    async fn find_by_recipe(&self, recipe_id: &RecipeId) -> Result<Vec<Ingredient>, InfraError>;

    /// 複数レシピの材料を一括取得する
    ///
    /// レシピ一覧の組み立てで 1 レシピずつ問い合わせる N+1 を避ける。
    async fn find_by_recipe_ids(
        &self,
        recipe_ids: &[RecipeId],
    ) -> Result<Vec<Ingredient>, InfraError>;

    /// 材料を削除する
    async fn delete(&self, id: &IngredientId) -> Result<(), InfraError>;
}

/// ingredients テーブルの行
#[derive(sqlx::FromRow)]
struct IngredientRow {
    id:         i64,
    recipe_id:  i64,
    name:       String,
    created_at: DateTime<Utc>,
}

impl TryFrom<IngredientRow> for Ingredient {
    type Error = InfraError;

    fn try_from(row: IngredientRow) -> Result<Self, Self::Error> {
        // DB の NOT NULL + VARCHAR(255) 制約により通常は失敗しない
        let name = IngredientName::new(row.name)
            .map_err(|e| InfraError::Unexpected(format!("DB の材料名が不正: {e}")))?;

        Ok(Ingredient::from_db(IngredientRecord {
            id: IngredientId::from_i64(row.id),
            recipe_id: RecipeId::from_i64(row.recipe_id),
            name,
            created_at: row.created_at,
        }))
    }
}

/// PostgreSQL 実装の IngredientRepository
#[derive(Debug, Clone)]
pub struct PostgresIngredientRepository {
    pool: PgPool,
}

impl PostgresIngredientRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngredientRepository for PostgresIngredientRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(recipe_id = %new_ingredient.recipe_id))]
    async fn insert(&self, new_ingredient: &NewIngredient) -> Result<Ingredient, InfraError> {
        let row: IngredientRow = sqlx::query_as(
            r#"
            INSERT INTO ingredients (recipe_id, name, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, recipe_id, name, created_at
            "#,
        )
        .bind(new_ingredient.recipe_id.as_i64())
        .bind(new_ingredient.name.as_str())
        .bind(new_ingredient.now)
        .fetch_one(&self.pool)
        .await?;

        Ingredient::try_from(row)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %recipe_id))]
    async fn find_by_id_and_recipe(
        &self,
        id: &IngredientId,
        recipe_id: &RecipeId,
    ) -> Result<Option<Ingredient>, InfraError> {
        let row: Option<IngredientRow> = sqlx::query_as(
            r#"
            SELECT id, recipe_id, name, created_at
            FROM ingredients
            WHERE id = $1 AND recipe_id = $2
            "#,
        )
        .bind(id.as_i64())
        .bind(recipe_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Ingredient::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%recipe_id))]
    async fn find_by_recipe(&self, recipe_id: &RecipeId) -> Result<Vec<Ingredient>, InfraError> {
        let rows: Vec<IngredientRow> = sqlx::query_as(
            r#"
            SELECT id, recipe_id, name, created_at
            FROM ingredients
            WHERE recipe_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(recipe_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Ingredient::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_recipe_ids(
        &self,
        recipe_ids: &[RecipeId],
    ) -> Result<Vec<Ingredient>, InfraError> {
        let ids: Vec<i64> = recipe_ids.iter().map(RecipeId::as_i64).collect();

        let rows: Vec<IngredientRow> = sqlx::query_as(
            r#"
            SELECT id, recipe_id, name, created_at
            FROM ingredients
            WHERE recipe_id = ANY($1)
            ORDER BY recipe_id ASC, id ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Ingredient::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &IngredientId) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            DELETE FROM ingredients
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresIngredientRepository>();
    }
}
