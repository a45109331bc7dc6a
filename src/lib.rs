//! catalog-match
//!
//! 2社の商品カタログ（CSV / Excel）を読み込み、国ごとに商品名の
//! Jaccard類似度で最良候補を選び、結果をCSV / Excelに書き出す。
//! 照合アルゴリズム本体は catalog-match-common にある。

pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;
pub mod report;
pub mod session;
pub mod translator;
