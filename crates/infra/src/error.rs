//! # インフラ層エラー定義
//!
//! データベースとの通信で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **制約違反の分類**: `From<sqlx::Error>` がドライバのエラーフラグを
//!   検査し、一意制約違反と外部キー制約違反を専用バリアントに変換する。
//!   リポジトリ実装は `?` で伝播するだけでよい
//! - **バックエンド非依存**: モックリポジトリも同じバリアントを構築する
//!   ため、ユースケース層は実 DB とモックを区別せずに扱える

use thiserror::Error;

/// インフラ層で発生するエラー
///
/// API 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum InfraError {
    /// データベースエラー
    ///
    /// SQL クエリの実行失敗、接続エラーなど。
    /// 制約違反は `UniqueViolation` / `ForeignKeyViolation` に分類される。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 一意制約違反
    ///
    /// `constraint` には違反した制約名
    /// （例: `ingredients_recipe_id_name_key`）が入る。
    /// ユースケース層で制約名を判定し、適切な競合エラーに変換する。
    #[error("一意制約違反: {constraint}")]
    UniqueViolation {
        /// 違反した制約名
        constraint: String,
    },

    /// 外部キー制約違反
    ///
    /// 参照先の行が存在しない場合に発生する。
    /// 存在確認と挿入の間に参照先が削除された競合の検出に使う。
    #[error("外部キー制約違反: {constraint}")]
    ForeignKeyViolation {
        /// 違反した制約名
        constraint: String,
    },

    /// 予期しないエラー
    ///
    /// DB に格納された値の復元失敗など、上記に分類できないエラー。
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl From<sqlx::Error> for InfraError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return Self::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKeyViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        Self::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_制約違反以外のsqlxエラーはdatabaseに変換される() {
        let err: InfraError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, InfraError::Database(_)));
    }

    #[test]
    fn test_displayは制約名を含む() {
        let err = InfraError::UniqueViolation {
            constraint: "ingredients_recipe_id_name_key".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "一意制約違反: ingredients_recipe_id_name_key"
        );
    }

    #[test]
    fn test_databaseバリアントはsourceを保持する() {
        use std::error::Error;

        let err: InfraError = sqlx::Error::RowNotFound.into();
        assert!(err.source().is_some());
    }
}
