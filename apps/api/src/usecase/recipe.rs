//! レシピ管理ユースケース
//!
//! レシピと材料の CRUD を実装する。HTTP の関心はハンドラに置き、
//! ここでは必須チェック、存在確認、制約違反のマッピングを行う。

use std::{collections::HashMap, sync::Arc};

use kondate_domain::{
    clock::Clock,
    ingredient::{Ingredient, IngredientId, IngredientName, NewIngredient},
    recipe::{NewRecipe, Recipe, RecipeDescription, RecipeId, RecipeName},
};
use kondate_infra::{
    InfraError,
    repository::{IngredientRepository, RecipeRepository},
};

use crate::error::ApiError;

/// 材料の一意制約名。重複追加を 409 にマッピングする判定に使う。
const INGREDIENT_UNIQUE_CONSTRAINT: &str = "ingredients_recipe_id_name_key";

// --- 入力型 ---

/// レシピ作成の入力
pub struct CreateRecipeInput {
    pub name:        Option<String>,
    pub description: Option<String>,
}

/// レシピ全体更新の入力（PUT）
///
/// 全フィールド必須。欠けている場合はバリデーションエラーになる。
pub struct ReplaceRecipeInput {
    pub recipe_id:   RecipeId,
    pub name:        Option<String>,
    pub description: Option<String>,
}

/// レシピ部分更新の入力（PATCH）
///
/// `None` のフィールドは変更しない。
pub struct UpdateRecipeInput {
    pub recipe_id:   RecipeId,
    pub name:        Option<String>,
    pub description: Option<String>,
}

/// 材料追加の入力
pub struct AddIngredientInput {
    pub recipe_id: RecipeId,
    pub name:      Option<String>,
}

/// レシピと材料一覧の組
///
/// API のレスポンスはレシピ単体ではなく常にこの形で組み立てる。
#[derive(Debug)]
pub struct RecipeWithIngredients {
    pub recipe:      Recipe,
    pub ingredients: Vec<Ingredient>,
}

/// 必須フィールドの存在チェック
fn required_field(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("{field} は必須です")))
}

/// レシピ管理ユースケース
pub struct RecipeUseCaseImpl {
    recipe_repository:     Arc<dyn RecipeRepository>,
    ingredient_repository: Arc<dyn IngredientRepository>,
    clock:                 Arc<dyn Clock>,
}

impl RecipeUseCaseImpl {
    pub fn new(
        recipe_repository: Arc<dyn RecipeRepository>,
        ingredient_repository: Arc<dyn IngredientRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            recipe_repository,
            ingredient_repository,
            clock,
        }
    }

    /// レシピ一覧を取得する（ID 昇順）
    ///
    /// 材料は 1 クエリでまとめて取得し、レシピごとにグルーピングする。
    pub async fn list_recipes(&self) -> Result<Vec<RecipeWithIngredients>, ApiError> {
        let recipes = self.recipe_repository.find_all().await?;

        let recipe_ids: Vec<RecipeId> = recipes.iter().map(|r| *r.id()).collect();
        let ingredients = self
            .ingredient_repository
            .find_by_recipe_ids(&recipe_ids)
            .await?;

        let mut ingredients_by_recipe: HashMap<RecipeId, Vec<Ingredient>> = HashMap::new();
        for ingredient in ingredients {
            let recipe_id = *ingredient.recipe_id();
            ingredients_by_recipe
                .entry(recipe_id)
                .or_default()
                .push(ingredient);
        }

        let recipes = recipes
            .into_iter()
            .map(|recipe| {
                let ingredients = ingredients_by_recipe
                    .remove(recipe.id())
                    .unwrap_or_default();
                RecipeWithIngredients {
                    recipe,
                    ingredients,
                }
            })
            .collect();

        Ok(recipes)
    }

    /// レシピを 1 件取得する
    pub async fn get_recipe(&self, recipe_id: &RecipeId) -> Result<RecipeWithIngredients, ApiError> {
        let recipe = self
            .recipe_repository
            .find_by_id(recipe_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("レシピが見つかりません: {recipe_id}")))?;

        let ingredients = self.ingredient_repository.find_by_recipe(recipe_id).await?;

        Ok(RecipeWithIngredients {
            recipe,
            ingredients,
        })
    }

    /// レシピを作成する
    pub async fn create_recipe(
        &self,
        input: CreateRecipeInput,
    ) -> Result<RecipeWithIngredients, ApiError> {
        let name = RecipeName::new(required_field(input.name, "name")?)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let description = RecipeDescription::new(required_field(input.description, "description")?)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let now = self.clock.now();

        let recipe = self
            .recipe_repository
            .insert(&NewRecipe {
                name,
                description,
                now,
            })
            .await?;

        Ok(RecipeWithIngredients {
            recipe,
            ingredients: Vec::new(),
        })
    }

    /// レシピ全体を更新する（PUT）
    ///
    /// 存在確認を先に行うため、レシピが無い場合は入力が不正でも 404 になる。
    pub async fn replace_recipe(
        &self,
        input: ReplaceRecipeInput,
    ) -> Result<RecipeWithIngredients, ApiError> {
        let recipe = self
            .recipe_repository
            .find_by_id(&input.recipe_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("レシピが見つかりません: {}", input.recipe_id))
            })?;

        let name = RecipeName::new(required_field(input.name, "name")?)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let description = RecipeDescription::new(required_field(input.description, "description")?)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let now = self.clock.now();

        let recipe = recipe.with_name(name, now).with_description(description, now);
        self.recipe_repository.update(&recipe).await?;

        let ingredients = self
            .ingredient_repository
            .find_by_recipe(&input.recipe_id)
            .await?;

        Ok(RecipeWithIngredients {
            recipe,
            ingredients,
        })
    }

    /// レシピを部分更新する（PATCH）
    pub async fn update_recipe(
        &self,
        input: UpdateRecipeInput,
    ) -> Result<RecipeWithIngredients, ApiError> {
        let recipe = self
            .recipe_repository
            .find_by_id(&input.recipe_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("レシピが見つかりません: {}", input.recipe_id))
            })?;

        let now = self.clock.now();

        let recipe = match input.name {
            Some(name) => {
                let name =
                    RecipeName::new(name).map_err(|e| ApiError::Validation(e.to_string()))?;
                recipe.with_name(name, now)
            }
            None => recipe,
        };

        let recipe = match input.description {
            Some(description) => {
                let description = RecipeDescription::new(description)
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
                recipe.with_description(description, now)
            }
            None => recipe,
        };

        self.recipe_repository.update(&recipe).await?;

        let ingredients = self
            .ingredient_repository
            .find_by_recipe(&input.recipe_id)
            .await?;

        Ok(RecipeWithIngredients {
            recipe,
            ingredients,
        })
    }

    /// レシピを削除する
    ///
    /// 材料は外部キーのカスケードで一緒に削除される。
    pub async fn delete_recipe(&self, recipe_id: &RecipeId) -> Result<(), ApiError> {
        let _recipe = self
            .recipe_repository
            .find_by_id(recipe_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("レシピが見つかりません: {recipe_id}")))?;

        self.recipe_repository.delete(recipe_id).await?;

        Ok(())
    }

    /// レシピに材料を追加する
    ///
    /// 1. 材料名のバリデーション（レシピの存在確認より先）
    /// 2. レシピの存在確認
    /// 3. 挿入。確認後にレシピが消えた場合は FK 違反を 404 に、
    ///    同名材料の重複は一意制約違反を 409 にマッピングする
    pub async fn add_ingredient(&self, input: AddIngredientInput) -> Result<Ingredient, ApiError> {
        let name = IngredientName::new(required_field(input.name, "name")?)
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let recipe = self
            .recipe_repository
            .find_by_id(&input.recipe_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("レシピが見つかりません: {}", input.recipe_id))
            })?;

        let now = self.clock.now();
        let new_ingredient = NewIngredient {
            recipe_id: *recipe.id(),
            name,
            now,
        };

        let ingredient = self
            .ingredient_repository
            .insert(&new_ingredient)
            .await
            .map_err(|e| match e {
                InfraError::UniqueViolation { ref constraint }
                    if constraint == INGREDIENT_UNIQUE_CONSTRAINT =>
                {
                    ApiError::Conflict("この材料は既に登録されています".to_string())
                }
                InfraError::ForeignKeyViolation { .. } => {
                    ApiError::NotFound(format!("レシピが見つかりません: {}", input.recipe_id))
                }
                other => ApiError::Database(other),
            })?;

        Ok(ingredient)
    }

    /// レシピから材料を削除する
    ///
    /// レシピの存在確認を行ってから、レシピ ID でスコープして材料を
    /// 検索する。別レシピの材料 ID を指定しても見つからない扱いになり、
    /// 404 を返す。
    pub async fn remove_ingredient(
        &self,
        recipe_id: &RecipeId,
        ingredient_id: &IngredientId,
    ) -> Result<(), ApiError> {
        let _recipe = self
            .recipe_repository
            .find_by_id(recipe_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("レシピが見つかりません: {recipe_id}")))?;

        let _ingredient = self
            .ingredient_repository
            .find_by_id_and_recipe(ingredient_id, recipe_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("材料が見つかりません: {ingredient_id}")))?;

        self.ingredient_repository.delete(ingredient_id).await?;

        Ok(())
    }
}
