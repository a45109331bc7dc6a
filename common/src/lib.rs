//! Catalog Match Common Library
//!
//! 2社の商品カタログを国別に照合するコア処理。I/Oを持たない。
//!
//! 単語分割 → Jaccard類似度 → 照合 → 集計 の順に依存する。

pub mod types;
pub mod error;
pub mod tokenizer;
pub mod similarity;
pub mod matcher;
pub mod analysis;
pub mod quality;
pub mod translate;
pub mod format;
pub mod export;

pub use types::{Catalog, MatchRecord, MatchSet, ProductRecord, MATCH_COLUMNS, REQUIRED_COLUMNS};
pub use error::{Error, Result};
pub use tokenizer::{tokenize, TokenSet};
pub use similarity::jaccard;
pub use matcher::{CancelToken, MatchOptions, ProductMatcher};
pub use analysis::{analyze, analyze_with_top, AnalysisSummary, CountryStat, SimilarityBucket};
pub use quality::{validate_catalog, QualityReport};
pub use translate::{
    translate_catalog, CacheInfo, TranslationBackend, TranslationOutcome, TranslationService,
};
