//! 商品名翻訳（CLI版）
//!
//! - ai_cli: AI CLIを呼び出す翻訳バックエンド
//! - cache: 翻訳キャッシュの永続化（--cache-dir 指定時のみ）
//!
//! 既定ではキャッシュはサービス1つのメモリ上にだけあり、実行をまたいで残らない。

pub mod ai_cli;
pub mod cache;

pub use ai_cli::AiCliTranslator;
pub use cache::TranslationCacheFile;

use catalog_match_common::{TranslationBackend, TranslationService};
use std::path::Path;

/// 翻訳サービスを作る
///
/// `cache_dir` がある場合だけ、そこにあるキャッシュファイルを取り込む。
pub fn build_service<B: TranslationBackend>(
    backend: B,
    cache_dir: Option<&Path>,
    target_language: &str,
) -> TranslationService<B> {
    let mut service = TranslationService::new(backend);

    if let Some(folder) = cache_dir {
        let cache = TranslationCacheFile::load(folder, target_language);
        tracing::debug!(entries = cache.len(), folder = %folder.display(), "translation cache loaded");
        service.seed_cache(cache.entries());
    }

    service
}

/// 翻訳サービスのキャッシュをファイルに書き戻す
pub fn persist_cache<B: TranslationBackend>(
    service: &TranslationService<B>,
    folder: &Path,
    target_language: &str,
) -> crate::error::Result<()> {
    let mut cache = TranslationCacheFile::new(target_language);
    for (text, translated) in service.cache_entries() {
        cache.insert(text.clone(), translated.clone());
    }
    cache.save(folder)?;
    tracing::debug!(entries = cache.len(), "translation cache saved");
    Ok(())
}
