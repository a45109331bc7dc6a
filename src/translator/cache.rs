//! 翻訳キャッシュファイル
//!
//! 原文をキーにして翻訳結果を保存する。--cache-dir を指定した実行だけが使う。
//! 破損・バージョン不一致のファイルは空として扱う。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = ".translation-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationCacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 翻訳先言語（異なる言語のキャッシュは使わない）
    target_language: String,
    /// 原文 → 翻訳結果
    entries: HashMap<String, String>,
}

impl TranslationCacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn new(target_language: &str) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            target_language: target_language.to_string(),
            entries: HashMap::new(),
        }
    }

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み
    pub fn load(folder: &Path, target_language: &str) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::new(target_language);
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::new(target_language),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, TranslationCacheFile>(reader) {
            Ok(cache) => {
                if cache.version != Self::CURRENT_VERSION {
                    tracing::warn!(path = %cache_path.display(), "キャッシュバージョン不一致、再生成します");
                    return Self::new(target_language);
                }
                if cache.target_language != target_language {
                    tracing::info!(
                        cached = %cache.target_language,
                        requested = target_language,
                        "翻訳先言語が異なるためキャッシュを使いません"
                    );
                    return Self::new(target_language);
                }
                cache
            }
            Err(e) => {
                tracing::warn!(path = %cache_path.display(), error = %e, "キャッシュが壊れています");
                Self::new(target_language)
            }
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（存在しなければ false）
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(cache_path)?;
        Ok(true)
    }

    pub fn get(&self, text: &str) -> Option<&str> {
        self.entries.get(text).map(String::as_str)
    }

    pub fn insert(&mut self, text: String, translated: String) {
        self.entries.insert(text, translated);
    }

    pub fn entries(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.entries.iter().map(|(k, v)| (k.clone(), v.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
