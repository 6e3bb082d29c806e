//! # レシピハンドラ
//!
//! レシピと材料の管理 API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /recipes` - レシピ一覧
//! - `POST /recipes` - レシピ作成
//! - `GET /recipes/{recipe_id}` - レシピ取得
//! - `PUT /recipes/{recipe_id}` - レシピ全体更新
//! - `PATCH /recipes/{recipe_id}` - レシピ部分更新
//! - `DELETE /recipes/{recipe_id}` - レシピ削除
//! - `POST /recipes/{recipe_id}/ingredients` - 材料追加
//! - `DELETE /recipes/{recipe_id}/ingredients/{ingredient_id}` - 材料削除

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use kondate_domain::{
    ingredient::{Ingredient, IngredientId},
    recipe::RecipeId,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    usecase::{
        AddIngredientInput, CreateRecipeInput, RecipeUseCaseImpl, RecipeWithIngredients,
        ReplaceRecipeInput, UpdateRecipeInput,
    },
};

/// レシピ API の共有状態
pub struct RecipeState {
    pub usecase: RecipeUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// レシピ作成リクエスト
///
/// 必須チェックはユースケース側で行うため、フィールドは Option で受ける。
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name:        Option<String>,
    pub description: Option<String>,
}

/// レシピ更新リクエスト（PUT / PATCH 共用）
///
/// PUT では全フィールド必須、PATCH では任意。判定はユースケース側で行う。
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub name:        Option<String>,
    pub description: Option<String>,
}

/// 材料追加リクエスト
#[derive(Debug, Deserialize)]
pub struct AddIngredientRequest {
    pub name: Option<String>,
}

/// レシピ DTO
///
/// タイムスタンプは API には公開しない。
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RecipeDto {
    pub id:          i64,
    pub name:        String,
    pub description: String,
    pub ingredients: Vec<IngredientDto>,
}

/// 材料 DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct IngredientDto {
    pub id:   i64,
    pub name: String,
}

impl From<RecipeWithIngredients> for RecipeDto {
    fn from(value: RecipeWithIngredients) -> Self {
        Self {
            id:          value.recipe.id().as_i64(),
            name:        value.recipe.name().as_str().to_string(),
            description: value.recipe.description().as_str().to_string(),
            ingredients: value.ingredients.iter().map(IngredientDto::from).collect(),
        }
    }
}

impl From<&Ingredient> for IngredientDto {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id:   ingredient.id().as_i64(),
            name: ingredient.name().as_str().to_string(),
        }
    }
}

// --- ハンドラ ---

/// GET /recipes
///
/// レシピ一覧を ID 昇順で取得する。各レシピには材料一覧が含まれる。
#[tracing::instrument(skip_all)]
pub async fn list_recipes(
    State(state): State<Arc<RecipeState>>,
) -> Result<impl IntoResponse, ApiError> {
    let recipes = state.usecase.list_recipes().await?;

    let items: Vec<RecipeDto> = recipes.into_iter().map(RecipeDto::from).collect();

    Ok((StatusCode::OK, Json(items)))
}

/// POST /recipes
///
/// レシピを作成する。
///
/// ## レスポンス
///
/// - `201 Created`: 作成されたレシピ（材料は空配列）
/// - `400 Bad Request`: ボディ不正、バリデーションエラー
#[tracing::instrument(skip_all)]
pub async fn create_recipe(
    State(state): State<Arc<RecipeState>>,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let recipe = state
        .usecase
        .create_recipe(CreateRecipeInput {
            name:        req.name,
            description: req.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RecipeDto::from(recipe))))
}

/// GET /recipes/{recipe_id}
///
/// レシピを 1 件取得する。
///
/// ## レスポンス
///
/// - `200 OK`: レシピと材料一覧
/// - `404 Not Found`: レシピが存在しない
#[tracing::instrument(skip_all, fields(%recipe_id))]
pub async fn get_recipe(
    State(state): State<Arc<RecipeState>>,
    Path(recipe_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let recipe = state
        .usecase
        .get_recipe(&RecipeId::from_i64(recipe_id))
        .await?;

    Ok((StatusCode::OK, Json(RecipeDto::from(recipe))))
}

/// PUT /recipes/{recipe_id}
///
/// レシピ全体を更新する。`name` と `description` の両方が必須。
///
/// ## レスポンス
///
/// - `200 OK`: 更新後のレシピ
/// - `400 Bad Request`: ボディ不正、必須フィールド欠落、バリデーションエラー
/// - `404 Not Found`: レシピが存在しない
#[tracing::instrument(skip_all, fields(%recipe_id))]
pub async fn replace_recipe(
    State(state): State<Arc<RecipeState>>,
    Path(recipe_id): Path<i64>,
    payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let recipe = state
        .usecase
        .replace_recipe(ReplaceRecipeInput {
            recipe_id:   RecipeId::from_i64(recipe_id),
            name:        req.name,
            description: req.description,
        })
        .await?;

    Ok((StatusCode::OK, Json(RecipeDto::from(recipe))))
}

/// PATCH /recipes/{recipe_id}
///
/// レシピを部分更新する。指定されなかったフィールドは変更しない。
///
/// ## レスポンス
///
/// - `200 OK`: 更新後のレシピ
/// - `400 Bad Request`: ボディ不正、バリデーションエラー
/// - `404 Not Found`: レシピが存在しない
#[tracing::instrument(skip_all, fields(%recipe_id))]
pub async fn update_recipe(
    State(state): State<Arc<RecipeState>>,
    Path(recipe_id): Path<i64>,
    payload: Result<Json<UpdateRecipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let recipe = state
        .usecase
        .update_recipe(UpdateRecipeInput {
            recipe_id:   RecipeId::from_i64(recipe_id),
            name:        req.name,
            description: req.description,
        })
        .await?;

    Ok((StatusCode::OK, Json(RecipeDto::from(recipe))))
}

/// DELETE /recipes/{recipe_id}
///
/// レシピを削除する。材料は外部キーのカスケードで一緒に消える。
///
/// ## レスポンス
///
/// - `204 No Content`: 削除成功
/// - `404 Not Found`: レシピが存在しない
#[tracing::instrument(skip_all, fields(%recipe_id))]
pub async fn delete_recipe(
    State(state): State<Arc<RecipeState>>,
    Path(recipe_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .usecase
        .delete_recipe(&RecipeId::from_i64(recipe_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /recipes/{recipe_id}/ingredients
///
/// レシピに材料を追加する。
///
/// ## レスポンス
///
/// - `200 OK`: 追加された材料
/// - `400 Bad Request`: ボディ不正、バリデーションエラー
/// - `404 Not Found`: レシピが存在しない
/// - `409 Conflict`: 同名の材料が既に存在する
#[tracing::instrument(skip_all, fields(%recipe_id))]
pub async fn add_ingredient(
    State(state): State<Arc<RecipeState>>,
    Path(recipe_id): Path<i64>,
    payload: Result<Json<AddIngredientRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let ingredient = state
        .usecase
        .add_ingredient(AddIngredientInput {
            recipe_id: RecipeId::from_i64(recipe_id),
            name:      req.name,
        })
        .await?;

    Ok((StatusCode::OK, Json(IngredientDto::from(&ingredient))))
}

/// DELETE /recipes/{recipe_id}/ingredients/{ingredient_id}
///
/// レシピから材料を削除する。
///
/// 材料はパスで指定したレシピに属している必要がある。
/// 別のレシピの材料 ID を指定した場合は 404 を返す。
///
/// ## レスポンス
///
/// - `204 No Content`: 削除成功
/// - `404 Not Found`: 材料が存在しない、または別のレシピに属している
#[tracing::instrument(skip_all, fields(%recipe_id, %ingredient_id))]
pub async fn remove_ingredient(
    State(state): State<Arc<RecipeState>>,
    Path((recipe_id, ingredient_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .usecase
        .remove_ingredient(
            &RecipeId::from_i64(recipe_id),
            &IngredientId::from_i64(ingredient_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
        routing::{delete, get, post},
    };
    use chrono::{DateTime, Utc};
    use kondate_domain::clock::FixedClock;
    use kondate_infra::mock::MockRecipeStore;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    // --- ヘルパー ---

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn create_test_app() -> Router {
        let store = Arc::new(MockRecipeStore::new());
        let usecase = RecipeUseCaseImpl::new(
            store.clone(),
            store,
            Arc::new(FixedClock::new(fixed_now())),
        );
        let state = Arc::new(RecipeState { usecase });

        Router::new()
            .route("/recipes", get(list_recipes).post(create_recipe))
            .route(
                "/recipes/{recipe_id}",
                get(get_recipe)
                    .put(replace_recipe)
                    .patch(update_recipe)
                    .delete(delete_recipe),
            )
            .route("/recipes/{recipe_id}/ingredients", post(add_ingredient))
            .route(
                "/recipes/{recipe_id}/ingredients/{ingredient_id}",
                delete(remove_ingredient),
            )
            .with_state(state)
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn response_body<T: serde::de::DeserializeOwned>(
        response: axum::http::Response<Body>,
    ) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_recipe_via_api(app: &Router, name: &str, description: &str) -> RecipeDto {
        let request = json_request(
            Method::POST,
            "/recipes",
            serde_json::json!({"name": name, "description": description}),
        );

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        response_body(response).await
    }

    async fn add_ingredient_via_api(app: &Router, recipe_id: i64, name: &str) -> IngredientDto {
        let request = json_request(
            Method::POST,
            &format!("/recipes/{recipe_id}/ingredients"),
            serde_json::json!({"name": name}),
        );

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response_body(response).await
    }

    // --- レシピ CRUD ---

    #[tokio::test]
    async fn test_post_レシピを作成すると201と空の材料一覧が返る() {
        // Given
        let sut = create_test_app();

        let request = json_request(
            Method::POST,
            "/recipes",
            serde_json::json!({"name": "肉じゃが", "description": "定番の家庭料理"}),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: RecipeDto = response_body(response).await;
        assert_eq!(body.name, "肉じゃが");
        assert_eq!(body.description, "定番の家庭料理");
        assert!(body.ingredients.is_empty());
    }

    #[tokio::test]
    async fn test_post_nameが無いと400が返る() {
        // Given
        let sut = create_test_app();

        let request = json_request(
            Method::POST,
            "/recipes",
            serde_json::json!({"description": "説明だけ"}),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_post_ボディがjsonでないと400が返る() {
        // Given
        let sut = create_test_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/recipes")
            .header("content-type", "application/json")
            .body(Body::from("これは JSON ではない"))
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_レシピを取得すると材料も含まれる() {
        // Given
        let sut = create_test_app();
        let recipe = create_recipe_via_api(&sut, "カレーライス", "スパイスから作る").await;
        add_ingredient_via_api(&sut, recipe.id, "じゃがいも").await;
        add_ingredient_via_api(&sut, recipe.id, "玉ねぎ").await;

        // When
        let response = sut
            .oneshot(empty_request(Method::GET, &format!("/recipes/{}", recipe.id)))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body: RecipeDto = response_body(response).await;
        assert_eq!(body.id, recipe.id);
        assert_eq!(body.ingredients.len(), 2);
        assert_eq!(body.ingredients[0].name, "じゃがいも");
        assert_eq!(body.ingredients[1].name, "玉ねぎ");
    }

    #[tokio::test]
    async fn test_get_存在しないレシピで404が返る() {
        // Given
        let sut = create_test_app();

        // When
        let response = sut
            .oneshot(empty_request(Method::GET, "/recipes/999"))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_名前と説明を更新すると200が返る() {
        // Given
        let sut = create_test_app();
        let recipe = create_recipe_via_api(&sut, "更新前", "更新前の説明").await;

        let request = json_request(
            Method::PUT,
            &format!("/recipes/{}", recipe.id),
            serde_json::json!({"name": "更新後", "description": "更新後の説明"}),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body: RecipeDto = response_body(response).await;
        assert_eq!(body.name, "更新後");
        assert_eq!(body.description, "更新後の説明");
    }

    #[tokio::test]
    async fn test_put_descriptionが無いと400が返る() {
        // Given
        let sut = create_test_app();
        let recipe = create_recipe_via_api(&sut, "肉じゃが", "定番の家庭料理").await;

        let request = json_request(
            Method::PUT,
            &format!("/recipes/{}", recipe.id),
            serde_json::json!({"name": "名前だけ"}),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_nameだけ更新するとdescriptionは変わらない() {
        // Given
        let sut = create_test_app();
        let recipe = create_recipe_via_api(&sut, "更新前", "元の説明").await;

        let request = json_request(
            Method::PATCH,
            &format!("/recipes/{}", recipe.id),
            serde_json::json!({"name": "更新後"}),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body: RecipeDto = response_body(response).await;
        assert_eq!(body.name, "更新後");
        assert_eq!(body.description, "元の説明");
    }

    #[tokio::test]
    async fn test_delete_レシピを削除すると204が返り再削除は404() {
        // Given
        let sut = create_test_app();
        let recipe = create_recipe_via_api(&sut, "削除予定", "一時的なレシピ").await;
        let uri = format!("/recipes/{}", recipe.id);

        // When: 1 回目の削除
        let response = sut
            .clone()
            .oneshot(empty_request(Method::DELETE, &uri))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        // When: 2 回目の削除
        let response = sut
            .oneshot(empty_request(Method::DELETE, &uri))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // --- 材料 ---

    #[tokio::test]
    async fn test_post_材料を追加すると200が返る() {
        // Given
        let sut = create_test_app();
        let recipe = create_recipe_via_api(&sut, "肉じゃが", "定番の家庭料理").await;

        let request = json_request(
            Method::POST,
            &format!("/recipes/{}/ingredients", recipe.id),
            serde_json::json!({"name": "じゃがいも"}),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then: 作成でも 200 を返す（201 ではない）
        assert_eq!(response.status(), StatusCode::OK);
        let body: IngredientDto = response_body(response).await;
        assert_eq!(body.name, "じゃがいも");
    }

    #[tokio::test]
    async fn test_post_同じ材料を2回追加すると409が返る() {
        // Given
        let sut = create_test_app();
        let recipe = create_recipe_via_api(&sut, "肉じゃが", "定番の家庭料理").await;
        add_ingredient_via_api(&sut, recipe.id, "じゃがいも").await;

        let request = json_request(
            Method::POST,
            &format!("/recipes/{}/ingredients", recipe.id),
            serde_json::json!({"name": "じゃがいも"}),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_post_存在しないレシピへの材料追加は404が返る() {
        // Given
        let sut = create_test_app();

        let request = json_request(
            Method::POST,
            "/recipes/999/ingredients",
            serde_json::json!({"name": "じゃがいも"}),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_材料名が空ならレシピが存在しなくても400が返る() {
        // Given: バリデーションが存在確認より先に行われる
        let sut = create_test_app();

        let request = json_request(
            Method::POST,
            "/recipes/999/ingredients",
            serde_json::json!({"name": ""}),
        );

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_材料を削除すると204が返る() {
        // Given
        let sut = create_test_app();
        let recipe = create_recipe_via_api(&sut, "肉じゃが", "定番の家庭料理").await;
        let ingredient = add_ingredient_via_api(&sut, recipe.id, "じゃがいも").await;

        // When
        let response = sut
            .oneshot(empty_request(
                Method::DELETE,
                &format!("/recipes/{}/ingredients/{}", recipe.id, ingredient.id),
            ))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_別レシピの材料を指定すると404が返る() {
        // Given: 材料はレシピ B に属している
        let sut = create_test_app();
        let recipe_a = create_recipe_via_api(&sut, "肉じゃが", "定番の家庭料理").await;
        let recipe_b = create_recipe_via_api(&sut, "カレーライス", "スパイスから作る").await;
        let ingredient = add_ingredient_via_api(&sut, recipe_b.id, "じゃがいも").await;

        // When: レシピ A のパスで削除を試みる
        let response = sut
            .oneshot(empty_request(
                Method::DELETE,
                &format!("/recipes/{}/ingredients/{}", recipe_a.id, ingredient.id),
            ))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_一覧は各レシピの材料を含みid昇順で返る() {
        // Given
        let sut = create_test_app();
        let first = create_recipe_via_api(&sut, "肉じゃが", "定番の家庭料理").await;
        let second = create_recipe_via_api(&sut, "カレーライス", "スパイスから作る").await;
        add_ingredient_via_api(&sut, second.id, "じゃがいも").await;

        // When
        let response = sut
            .oneshot(empty_request(Method::GET, "/recipes"))
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body: Vec<RecipeDto> = response_body(response).await;
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].id, first.id);
        assert!(body[0].ingredients.is_empty());
        assert_eq!(body[1].id, second.id);
        assert_eq!(body[1].ingredients.len(), 1);
    }
}
