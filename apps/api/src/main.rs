//! # Kondate API サーバー
//!
//! レシピと材料を管理する REST API サーバー。
//!
//! ## 役割
//!
//! - **レシピ管理**: レシピの作成・取得・更新・削除
//! - **材料管理**: レシピへの材料の追加・削除
//! - **データ永続化**: PostgreSQL へのエンティティ保存
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `LOG_FORMAT` | No | ログ出力形式（`json` / `pretty`、デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p kondate-api
//!
//! # 本番環境
//! API_PORT=3000 DATABASE_URL=postgres://... cargo run -p kondate-api --release
//! ```

mod config;
mod error;
mod handler;
mod usecase;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{delete, get, post},
};
use config::ApiConfig;
use handler::{
    RecipeState,
    add_ingredient,
    create_recipe,
    delete_recipe,
    get_recipe,
    health_check,
    list_recipes,
    remove_ingredient,
    replace_recipe,
    update_recipe,
};
use kondate_domain::clock::{Clock, SystemClock};
use kondate_infra::{
    db,
    repository::{
        IngredientRepository,
        PostgresIngredientRepository,
        PostgresRecipeRepository,
        RecipeRepository,
    },
};
use kondate_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use usecase::RecipeUseCaseImpl;

/// API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    init_tracing(TracingConfig::from_env("api"));

    // 設定読み込み
    let config = ApiConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成し、マイグレーションを適用
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("データベース接続に失敗しました");
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .expect("マイグレーションの適用に失敗しました");
    tracing::info!("マイグレーションを適用しました");

    // 依存コンポーネントを初期化
    let recipe_repository: Arc<dyn RecipeRepository> =
        Arc::new(PostgresRecipeRepository::new(pool.clone()));
    let ingredient_repository: Arc<dyn IngredientRepository> =
        Arc::new(PostgresIngredientRepository::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let usecase = RecipeUseCaseImpl::new(recipe_repository, ingredient_repository, clock);
    let state = Arc::new(RecipeState { usecase });

    // ルーター構築
    let app = Router::new()
        .route("/health", get(health_check))
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
        .layer(TraceLayer::new_for_http());

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
