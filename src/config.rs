use crate::ai_provider::AiProvider;
use crate::error::{CatalogMatchError, Result};
use catalog_match_common::analysis::DEFAULT_TOP_N;
use catalog_match_common::matcher::{DEFAULT_MAX_TOKEN_DIFF, DEFAULT_SIMILARITY_THRESHOLD};
use catalog_match_common::MatchOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub similarity_threshold: f64,
    pub max_token_diff: usize,
    pub top_n: usize,
    /// 照合前に商品名を翻訳する
    pub translate: bool,
    pub ai_provider: AiProvider,
    pub source_language: String,
    pub target_language: String,
    /// 翻訳呼び出し前のランダム待機（ミリ秒）
    pub translation_delay_min_ms: u64,
    pub translation_delay_max_ms: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_token_diff: DEFAULT_MAX_TOKEN_DIFF,
            top_n: DEFAULT_TOP_N,
            translate: false,
            ai_provider: AiProvider::Claude,
            source_language: "zh-TW".into(),
            target_language: "en".into(),
            translation_delay_min_ms: 100,
            translation_delay_max_ms: 300,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// 設定ファイル → 環境変数の順に読み込み
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides()
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CatalogMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("catalog-match").join("config.json"))
    }

    fn apply_env_overrides(mut self) -> Result<Self> {
        if let Some(threshold) = parse_optional_env("CATALOG_MATCH_THRESHOLD")? {
            self.similarity_threshold = threshold;
        }

        if let Some(diff) = parse_optional_env("CATALOG_MATCH_MAX_TOKEN_DIFF")? {
            self.max_token_diff = diff;
        }

        if let Ok(level) = std::env::var("CATALOG_MATCH_LOG_LEVEL") {
            self.log_level = level;
        }

        Ok(self)
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions::new(self.similarity_threshold, self.max_token_diff)
    }

    /// 待機時間の範囲（min > max の設定は入れ替える）
    pub fn translation_delay_range(&self) -> (u64, u64) {
        let (a, b) = (self.translation_delay_min_ms, self.translation_delay_max_ms);
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        if threshold.is_nan() {
            return Err(CatalogMatchError::Config("しきい値が数値ではありません".into()));
        }
        self.similarity_threshold = threshold;
        self.save()
    }

    pub fn set_max_token_diff(&mut self, diff: usize) -> Result<()> {
        self.max_token_diff = diff;
        self.save()
    }

    pub fn set_provider(&mut self, provider: AiProvider) -> Result<()> {
        self.ai_provider = provider;
        self.save()
    }
}

fn parse_optional_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| CatalogMatchError::Config(format!("{key} の値が不正です: {e}"))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(CatalogMatchError::Config(format!("{key}: {err}"))),
    }
}
