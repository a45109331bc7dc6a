//! 商品名翻訳の境界
//!
//! 照合コアが必要とするのは `translate(text) -> text` だけ。
//! 実際の翻訳処理は TranslationBackend として外から渡す。
//!
//! - 成功した翻訳はメモ化する（失敗はキャッシュしない）
//! - 失敗しても原文を返して処理を続ける（fail-open）
//! - キャッシュは1インスタンス専用。並行実行で共有する場合は外側で排他すること

use crate::types::Catalog;
use std::collections::HashMap;

/// キャッシュ情報に含めるキーの最大数
const CACHE_SAMPLE_SIZE: usize = 10;

/// 翻訳処理本体
pub trait TranslationBackend {
    /// 失敗時は理由を返す
    fn translate(&self, text: &str) -> Result<String, String>;
}

impl<F> TranslationBackend for F
where
    F: Fn(&str) -> Result<String, String>,
{
    fn translate(&self, text: &str) -> Result<String, String> {
        self(text)
    }
}

/// 翻訳結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    Failed { original: String, reason: String },
}

impl TranslationOutcome {
    /// 後続処理で使う文字列（失敗時は原文）
    pub fn text(&self) -> &str {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Failed { original, .. } => original,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            TranslationOutcome::Translated(text) => text,
            TranslationOutcome::Failed { original, .. } => original,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TranslationOutcome::Failed { .. })
    }

    /// 失敗時の警告メッセージ
    pub fn warning(&self) -> Option<String> {
        match self {
            TranslationOutcome::Translated(_) => None,
            TranslationOutcome::Failed { original, reason } => {
                Some(format!("翻訳失敗: {} -> {}", original, reason))
            }
        }
    }
}

/// キャッシュ情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    pub cache_size: usize,
    /// 先頭10件の原文（辞書順）
    pub cached_translations: Vec<String>,
}

/// メモ化付き翻訳サービス
#[derive(Debug)]
pub struct TranslationService<B> {
    backend: B,
    cache: HashMap<String, String>,
    use_cache: bool,
}

impl<B: TranslationBackend> TranslationService<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: HashMap::new(),
            use_cache: true,
        }
    }

    /// キャッシュの有効/無効を切り替え
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 1件翻訳
    ///
    /// 空文字・空白のみは backend を呼ばずに空文字を返す。
    pub fn translate(&mut self, text: &str) -> TranslationOutcome {
        if text.trim().is_empty() {
            return TranslationOutcome::Translated(String::new());
        }

        if self.use_cache {
            if let Some(cached) = self.cache.get(text) {
                return TranslationOutcome::Translated(cached.clone());
            }
        }

        match self.backend.translate(text) {
            Ok(translated) => {
                if self.use_cache {
                    self.cache.insert(text.to_string(), translated.clone());
                }
                TranslationOutcome::Translated(translated)
            }
            Err(reason) => TranslationOutcome::Failed {
                original: text.to_string(),
                reason,
            },
        }
    }

    /// 要素ごとに翻訳し、1件ごとに (完了件数, 全件数) を通知
    pub fn translate_batch<S, F>(&mut self, texts: &[S], mut progress: F) -> Vec<TranslationOutcome>
    where
        S: AsRef<str>,
        F: FnMut(usize, usize),
    {
        let total = texts.len();
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let outcome = self.translate(text.as_ref());
                progress(i + 1, total);
                outcome
            })
            .collect()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_info(&self) -> CacheInfo {
        let mut keys: Vec<String> = self.cache.keys().cloned().collect();
        keys.sort();
        keys.truncate(CACHE_SAMPLE_SIZE);
        CacheInfo {
            cache_size: self.cache.len(),
            cached_translations: keys,
        }
    }

    /// 永続化されたキャッシュを取り込む
    pub fn seed_cache<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.cache.extend(entries);
    }

    pub fn cache_entries(&self) -> &HashMap<String, String> {
        &self.cache
    }
}

/// カタログの name_en を翻訳結果で埋める
///
/// 失敗した行は原文のまま、警告を warnings に追加する。
pub fn translate_catalog<B, F>(
    service: &mut TranslationService<B>,
    catalog: &mut Catalog,
    progress: F,
    warnings: &mut Vec<String>,
) where
    B: TranslationBackend,
    F: FnMut(usize, usize),
{
    let names: Vec<String> = catalog.iter().map(|r| r.name.clone()).collect();
    let outcomes = service.translate_batch(&names, progress);

    for (record, outcome) in catalog.records.iter_mut().zip(outcomes) {
        if let Some(warning) = outcome.warning() {
            warnings.push(warning);
        }
        record.name_en = outcome.into_text();
    }
}
