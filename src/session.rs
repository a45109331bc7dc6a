//! 照合セッション
//!
//! 2つのカタログ・翻訳サービス・直近の照合結果を1か所で保持する。
//! CLIの1回の実行につき1セッション。プロセス全体の共有状態は持たない。

use crate::error::{CatalogMatchError, Result};
use crate::loader::{self, LoadedCatalog};
use catalog_match_common::{
    analyze_with_top, translate_catalog, AnalysisSummary, CancelToken, Catalog, MatchOptions,
    MatchSet, ProductMatcher, TranslationBackend, TranslationService,
};
use std::path::Path;

/// 照合の実行段階（進捗表示用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    TranslateA,
    TranslateB,
    Match,
}

impl RunPhase {
    pub fn label(&self) -> &'static str {
        match self {
            RunPhase::TranslateA => "カタログA翻訳",
            RunPhase::TranslateB => "カタログB翻訳",
            RunPhase::Match => "照合",
        }
    }
}

/// 照合リクエスト
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRequest {
    pub options: MatchOptions,
    /// 照合前に商品名を翻訳する
    pub translate: bool,
}

impl Default for MatchRequest {
    fn default() -> Self {
        Self {
            options: MatchOptions::default(),
            translate: false,
        }
    }
}

/// 照合の実行結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRun {
    pub match_count: usize,
    /// 読み込み時の指摘・翻訳失敗・設定の注意
    pub warnings: Vec<String>,
}

pub struct Session<B> {
    catalog_a: Option<LoadedCatalog>,
    catalog_b: Option<LoadedCatalog>,
    translator: TranslationService<B>,
    last_matches: MatchSet,
}

impl<B: TranslationBackend> Session<B> {
    pub fn new(translator: TranslationService<B>) -> Self {
        Self {
            catalog_a: None,
            catalog_b: None,
            translator,
            last_matches: MatchSet::new(),
        }
    }

    pub fn load_a(&mut self, path: &Path) -> Result<&LoadedCatalog> {
        let loaded = loader::read_catalog(path)?;
        Ok(self.catalog_a.insert(loaded))
    }

    pub fn load_b(&mut self, path: &Path) -> Result<&LoadedCatalog> {
        let loaded = loader::read_catalog(path)?;
        Ok(self.catalog_b.insert(loaded))
    }

    pub fn set_catalog_a(&mut self, catalog: LoadedCatalog) {
        self.catalog_a = Some(catalog);
    }

    pub fn set_catalog_b(&mut self, catalog: LoadedCatalog) {
        self.catalog_b = Some(catalog);
    }

    pub fn catalog_a(&self) -> Option<&LoadedCatalog> {
        self.catalog_a.as_ref()
    }

    pub fn catalog_b(&self) -> Option<&LoadedCatalog> {
        self.catalog_b.as_ref()
    }

    /// 照合を実行し、結果をセッションに保持する
    ///
    /// 読み込んだカタログ自体は変更しない（翻訳はコピーに対して行う）。
    /// 中断された場合は直前の結果をそのまま残す。
    pub fn run_match<F>(
        &mut self,
        request: &MatchRequest,
        mut progress: F,
        cancel: Option<&CancelToken>,
    ) -> Result<MatchRun>
    where
        F: FnMut(RunPhase, usize, usize),
    {
        request.options.validate()?;

        let loaded_a = self
            .catalog_a
            .as_ref()
            .ok_or_else(|| CatalogMatchError::CatalogNotLoaded("A".into()))?;
        let loaded_b = self
            .catalog_b
            .as_ref()
            .ok_or_else(|| CatalogMatchError::CatalogNotLoaded("B".into()))?;

        let mut warnings = Vec::new();
        if !request.options.threshold_in_recommended_range() {
            let message = format!(
                "類似度しきい値 {} は推奨範囲 0.1-1.0 の外です",
                request.options.similarity_threshold
            );
            tracing::warn!("{}", message);
            warnings.push(message);
        }
        warnings.extend(loaded_a.findings.iter().map(|f| format!("A: {}", f)));
        warnings.extend(loaded_b.findings.iter().map(|f| format!("B: {}", f)));

        let mut catalog_a: Catalog = loaded_a.catalog.clone();
        let mut catalog_b: Catalog = loaded_b.catalog.clone();

        if request.translate {
            let before = warnings.len();
            translate_catalog(
                &mut self.translator,
                &mut catalog_a,
                |done, total| progress(RunPhase::TranslateA, done, total),
                &mut warnings,
            );
            translate_catalog(
                &mut self.translator,
                &mut catalog_b,
                |done, total| progress(RunPhase::TranslateB, done, total),
                &mut warnings,
            );
            for warning in &warnings[before..] {
                tracing::warn!("{}", warning);
            }
            tracing::info!(cache_size = self.translator.cache_info().cache_size, "translation finished");
        }

        let matcher = ProductMatcher::new(request.options);
        let matches = matcher.match_catalogs_with(
            &catalog_a,
            &catalog_b,
            |done, total| progress(RunPhase::Match, done, total),
            cancel,
        )?;

        tracing::info!(
            a = catalog_a.len(),
            b = catalog_b.len(),
            matches = matches.len(),
            threshold = request.options.similarity_threshold,
            "matching finished"
        );

        self.last_matches = matches;
        Ok(MatchRun {
            match_count: self.last_matches.len(),
            warnings,
        })
    }

    pub fn last_matches(&self) -> &MatchSet {
        &self.last_matches
    }

    /// 直近の照合結果を集計
    pub fn analysis(&self, top_n: usize) -> AnalysisSummary {
        analyze_with_top(&self.last_matches, top_n)
    }

    pub fn translator(&self) -> &TranslationService<B> {
        &self.translator
    }
}
