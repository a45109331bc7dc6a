//! カタログのデータ品質チェック
//!
//! 問題があっても照合は止めない。見つかった問題を文字列で返すだけ。

use crate::types::Catalog;
use std::collections::HashMap;

/// 品質チェックの集計値
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityReport {
    /// 2回目以降に現れた重複IDの件数
    pub duplicate_ids: usize,
    pub empty_names: usize,
    pub negative_prices: usize,
}

impl QualityReport {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for record in catalog.iter() {
            *seen.entry(record.id.as_str()).or_default() += 1;
        }

        Self {
            duplicate_ids: seen.values().map(|n| n - 1).sum(),
            empty_names: catalog.iter().filter(|r| r.name.trim().is_empty()).count(),
            negative_prices: catalog.iter().filter(|r| r.price < 0.0).count(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.duplicate_ids == 0 && self.empty_names == 0 && self.negative_prices == 0
    }
}

/// カタログの問題点を人が読める形で列挙
pub fn validate_catalog(catalog: &Catalog) -> Vec<String> {
    if catalog.is_empty() {
        return vec!["データが空です".to_string()];
    }

    let report = QualityReport::from_catalog(catalog);
    if report.is_clean() {
        return Vec::new();
    }

    let mut issues = Vec::new();

    if report.duplicate_ids > 0 {
        issues.push(format!("重複した商品IDが {} 件あります", report.duplicate_ids));
    }
    if report.empty_names > 0 {
        issues.push(format!("商品名が空の行が {} 件あります", report.empty_names));
    }
    if report.negative_prices > 0 {
        issues.push(format!("価格が負の行が {} 件あります", report.negative_prices));
    }

    issues
}
