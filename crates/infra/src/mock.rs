//! # テスト用モックストア
//!
//! ユースケース・ハンドラテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! kondate-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Mutex,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use kondate_domain::{
    ingredient::{Ingredient, IngredientId, IngredientRecord, NewIngredient},
    recipe::{NewRecipe, Recipe, RecipeId, RecipeRecord},
};

use crate::{
    error::InfraError,
    repository::{IngredientRepository, RecipeRepository},
};

// ===== MockRecipeStore =====

/// レシピと材料を 1 つの Mutex で保持するインメモリストア
///
/// [`RecipeRepository`] と [`IngredientRepository`] の両方を実装する。
/// 両テーブルを同じストアに置くことで、本番スキーマの制約と同じ挙動を
/// 再現する:
///
/// - レシピ削除時の材料カスケード削除（`ON DELETE CASCADE`）
/// - `(recipe_id, name)` 複合一意制約 → [`InfraError::UniqueViolation`]
/// - 参照先レシピの不在 → [`InfraError::ForeignKeyViolation`]
///
/// ID は `BIGSERIAL` の代わりにアトミックカウンタで 1 から採番する。
pub struct MockRecipeStore {
    state:   Mutex<StoreState>,
    next_id: AtomicI64,
}

#[derive(Default)]
struct StoreState {
    recipes:     Vec<Recipe>,
    ingredients: Vec<Ingredient>,
}

impl MockRecipeStore {
    pub fn new() -> Self {
        Self {
            state:   Mutex::new(StoreState::default()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for MockRecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeRepository for MockRecipeStore {
    async fn find_all(&self) -> Result<Vec<Recipe>, InfraError> {
        let state = self.state.lock().unwrap();
        let mut recipes = state.recipes.clone();
        recipes.sort_by_key(|r| *r.id());
        Ok(recipes)
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .recipes
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }

    async fn insert(&self, new_recipe: &NewRecipe) -> Result<Recipe, InfraError> {
        let recipe = Recipe::from_db(RecipeRecord {
            id:          RecipeId::from_i64(self.allocate_id()),
            name:        new_recipe.name.clone(),
            description: new_recipe.description.clone(),
            created_at:  new_recipe.now,
            updated_at:  new_recipe.now,
        });
        self.state.lock().unwrap().recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), InfraError> {
        let mut state = self.state.lock().unwrap();
        if let Some(pos) = state.recipes.iter().position(|r| r.id() == recipe.id()) {
            state.recipes[pos] = recipe.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &RecipeId) -> Result<(), InfraError> {
        let mut state = self.state.lock().unwrap();
        state.recipes.retain(|r| r.id() != id);
        // ON DELETE CASCADE と同じ挙動
        state.ingredients.retain(|i| i.recipe_id() != id);
        Ok(())
    }
}

#[async_trait]
impl IngredientRepository for MockRecipeStore {
    async fn insert(&self, new_ingredient: &NewIngredient) -> Result<Ingredient, InfraError> {
        let mut state = self.state.lock().unwrap();

        if !state
            .recipes
            .iter()
            .any(|r| r.id() == &new_ingredient.recipe_id)
        {
            return Err(InfraError::ForeignKeyViolation {
                constraint: "ingredients_recipe_id_fkey".to_string(),
            });
        }

        let duplicate = state.ingredients.iter().any(|i| {
            i.recipe_id() == &new_ingredient.recipe_id && i.name() == &new_ingredient.name
        });
        if duplicate {
            return Err(InfraError::UniqueViolation {
                constraint: "ingredients_recipe_id_name_key".to_string(),
            });
        }

        let ingredient = Ingredient::from_db(IngredientRecord {
            id:         IngredientId::from_i64(self.allocate_id()),
            recipe_id:  new_ingredient.recipe_id,
            name:       new_ingredient.name.clone(),
            created_at: new_ingredient.now,
        });
        state.ingredients.push(ingredient.clone());
        Ok(ingredient)
    }

    async fn find_by_id_and_recipe(
        &self,
        id: &IngredientId,
        recipe_id: &RecipeId,
    ) -> Result<Option<Ingredient>, InfraError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .ingredients
            .iter()
            .find(|i| i.id() == id && i.recipe_id() == recipe_id)
            .cloned())
    }

    async fn find_by_recipe(&self, recipe_id: &RecipeId) -> Result<Vec<Ingredient>, InfraError> {
        let mut ingredients: Vec<Ingredient> = self
            .state
            .lock()
            .unwrap()
            .ingredients
            .iter()
            .filter(|i| i.recipe_id() == recipe_id)
            .cloned()
            .collect();
        ingredients.sort_by_key(|i| *i.id());
        Ok(ingredients)
    }

    async fn find_by_recipe_ids(
        &self,
        recipe_ids: &[RecipeId],
    ) -> Result<Vec<Ingredient>, InfraError> {
        let mut ingredients: Vec<Ingredient> = self
            .state
            .lock()
            .unwrap()
            .ingredients
            .iter()
            .filter(|i| recipe_ids.contains(i.recipe_id()))
            .cloned()
            .collect();
        ingredients.sort_by_key(|i| (*i.recipe_id(), *i.id()));
        Ok(ingredients)
    }

    async fn delete(&self, id: &IngredientId) -> Result<(), InfraError> {
        let mut state = self.state.lock().unwrap();
        state.ingredients.retain(|i| i.id() != id);
        Ok(())
    }
}
