//! ログ初期化
//!
//! 診断ログは tracing で標準エラーへ。進捗表示（println!）とは分ける。
//! RUST_LOG があればそれを優先し、なければ設定値、--verbose なら debug。

use crate::error::{CatalogMatchError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init(level: &str, verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { level };
        EnvFilter::new(format!("catalog_match={level},catalog_match_common={level}"))
    });

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| CatalogMatchError::Config(format!("ログ初期化エラー: {}", e)))
}
