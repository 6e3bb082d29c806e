//! トレーシングの初期化。
//!
//! ログ出力の形式は環境変数 `LOG_FORMAT` で切り替える。
//! 本番環境では `json`、ローカル開発では `pretty` を想定している。

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// ログの出力形式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 構造化 JSON。ログ基盤への転送向け。
    Json,
    /// 人間が読みやすい形式。ローカル開発向け。
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列から出力形式を解釈する。未知の値は既定値にフォールバックする。
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("不明な LOG_FORMAT \"{other}\" が指定されたため pretty を使用します");
                Self::default()
            }
        }
    }

    /// 環境変数 `LOG_FORMAT` から出力形式を読み取る。
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

/// トレーシング初期化の設定。
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// ログに付与するサービス名。
    pub service_name: String,
    /// ログの出力形式。
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    /// サービス名を指定し、出力形式は環境変数から読み取る。
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// グローバルの tracing サブスクライバを初期化する。
///
/// フィルタは `RUST_LOG` に従い、未設定時は `info,kondate=debug` を使う。
/// プロセス起動時に一度だけ呼ぶこと。
pub fn init_tracing(config: TracingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kondate=debug"));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!(service = %config.service_name, "tracing を初期化しました");
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parseは大文字小文字を区別しない() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("Pretty"), LogFormat::Pretty);
    }

    #[test]
    fn test_parseは未知の値をprettyにフォールバックする() {
        assert_eq!(LogFormat::parse("yaml"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(""), LogFormat::Pretty);
    }

    #[test]
    fn test_from_envはサービス名と形式を保持する() {
        let config = TracingConfig::new("api", LogFormat::Json);

        assert_eq!(config.service_name, "api");
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
