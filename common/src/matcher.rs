//! 商品照合エンジン
//!
//! A社の商品ごとに、同じ国のB社商品だけを候補として走査し、
//! Jaccard類似度が最も高い1件をしきい値で絞り込んで出力する。
//!
//! ## 処理フロー
//! 1. B社カタログを国ごとにグループ化し、単語集合を事前計算
//! 2. A社商品ごとに同じ国の候補を走査
//! 3. 単語数の差が max_token_diff を超える候補はスキップ
//! 4. 最高スコアの候補を保持（同点は先に見つかった候補）
//! 5. 最高スコアがしきい値以上なら MatchRecord を出力
//!
//! 同点時の採用はB社カタログの行順に依存する。

use crate::error::{Error, Result};
use crate::similarity::jaccard;
use crate::tokenizer::{tokenize, TokenSet};
use crate::types::{Catalog, MatchRecord, MatchSet, ProductRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 既定の類似度しきい値
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.2;

/// 既定の最大単語数差
pub const DEFAULT_MAX_TOKEN_DIFF: usize = 5;

/// 照合オプション
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// この値以上の類似度のみ出力
    pub similarity_threshold: f64,
    /// 単語数の差がこれを超える候補は比較しない
    pub max_token_diff: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_token_diff: DEFAULT_MAX_TOKEN_DIFF,
        }
    }
}

impl MatchOptions {
    pub fn new(similarity_threshold: f64, max_token_diff: usize) -> Self {
        Self {
            similarity_threshold,
            max_token_diff,
        }
    }

    /// NaN のしきい値だけを拒否する（範囲外の値はそのまま使う）
    pub fn validate(&self) -> Result<()> {
        if self.similarity_threshold.is_nan() {
            return Err(Error::Config("similarity threshold is NaN".into()));
        }
        Ok(())
    }

    /// 画面上の推奨範囲 (0.1-1.0) に収まっているか
    pub fn threshold_in_recommended_range(&self) -> bool {
        (0.1..=1.0).contains(&self.similarity_threshold)
    }
}

/// 照合の中断フラグ
///
/// A社の1件ごとに確認される。
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 単語集合を事前計算したB社候補
struct Candidate<'a> {
    record: &'a ProductRecord,
    tokens: TokenSet,
}

/// 商品照合器
#[derive(Debug, Clone, Default)]
pub struct ProductMatcher {
    options: MatchOptions,
}

impl ProductMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// 進捗通知・中断なしで照合する
    pub fn match_catalogs(&self, catalog_a: &Catalog, catalog_b: &Catalog) -> MatchSet {
        let mut set = MatchSet::new();
        let index = index_by_country(catalog_b);
        for a in catalog_a.iter() {
            if let Some(record) = self.best_match_in(a, &index) {
                set.push(record);
            }
        }
        set
    }

    /// 照合を実行する
    ///
    /// # Arguments
    /// * `progress` - A社1件処理するごとに (完了件数, 全件数) で呼ばれる
    /// * `cancel` - 中断フラグ（A社1件ごとに確認）
    pub fn match_catalogs_with<F>(
        &self,
        catalog_a: &Catalog,
        catalog_b: &Catalog,
        mut progress: F,
        cancel: Option<&CancelToken>,
    ) -> Result<MatchSet>
    where
        F: FnMut(usize, usize),
    {
        self.options.validate()?;

        let total = catalog_a.len();
        let mut set = MatchSet::new();
        if catalog_a.is_empty() || catalog_b.is_empty() {
            progress(total, total);
            return Ok(set);
        }

        let index = index_by_country(catalog_b);

        for (i, a) in catalog_a.iter().enumerate() {
            if cancel.is_some_and(|c| c.is_cancelled()) {
                return Err(Error::Cancelled { completed: i, total });
            }

            if let Some(record) = self.best_match_in(a, &index) {
                set.push(record);
            }

            progress(i + 1, total);
        }

        Ok(set)
    }

    fn best_match_in(
        &self,
        a: &ProductRecord,
        index: &HashMap<&str, Vec<Candidate<'_>>>,
    ) -> Option<MatchRecord> {
        let pool = index.get(a.country.as_str())?;
        self.best_among(a, pool)
    }

    fn best_among(&self, a: &ProductRecord, pool: &[Candidate<'_>]) -> Option<MatchRecord> {
        let tokens_a = tokenize(&a.name_en);
        let mut best: Option<(&ProductRecord, f64)> = None;

        for candidate in pool {
            if tokens_a.len().abs_diff(candidate.tokens.len()) > self.options.max_token_diff {
                continue;
            }

            let score = jaccard(&tokens_a, &candidate.tokens);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((candidate.record, score)),
            }
        }

        let (b, score) = best?;
        if score >= self.options.similarity_threshold {
            Some(MatchRecord::from_pair(a, b, score))
        } else {
            None
        }
    }
}

/// B社カタログを国ごとに分ける（各国内の行順は維持）
fn index_by_country(catalog: &Catalog) -> HashMap<&str, Vec<Candidate<'_>>> {
    let mut index: HashMap<&str, Vec<Candidate<'_>>> = HashMap::new();
    for record in catalog.iter() {
        index
            .entry(record.country.as_str())
            .or_default()
            .push(Candidate {
                record,
                tokens: tokenize(&record.name_en),
            });
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name_en: &str, country: &str, price: f64) -> ProductRecord {
        ProductRecord::new(id, name_en, country, price)
    }

    fn catalog(records: Vec<ProductRecord>) -> Catalog {
        Catalog::new("test", records)
    }

    #[test]
    fn test_best_candidate_same_country() {
        let a = catalog(vec![product("1", "blue sky tour", "JP", 100.0)]);
        let b = catalog(vec![
            product("2", "blue sky trip", "JP", 120.0),
            product("3", "red sea dive", "JP", 50.0),
        ]);

        let matcher = ProductMatcher::new(MatchOptions::new(0.2, 5));
        let set = matcher.match_catalogs(&a, &b);

        assert_eq!(set.len(), 1);
        assert_eq!(set[0].b_id, "2");
        assert_eq!(set[0].similarity, 0.5);
        assert_eq!(set[0].price_diff, 20.0);
    }

    #[test]
    fn test_other_country_is_never_candidate() {
        let a = catalog(vec![product("1", "blue sky tour", "JP", 100.0)]);
        let b = catalog(vec![product("2", "blue sky tour", "KR", 120.0)]);

        let set = ProductMatcher::default().match_catalogs(&a, &b);
        assert!(set.is_empty());
    }

    #[test]
    fn test_country_comparison_is_case_sensitive() {
        let a = catalog(vec![product("1", "blue sky tour", "JP", 100.0)]);
        let b = catalog(vec![product("2", "blue sky tour", "jp", 120.0)]);

        let set = ProductMatcher::default().match_catalogs(&a, &b);
        assert!(set.is_empty());
    }

    #[test]
    fn test_token_diff_prunes_high_similarity_pair() {
        // 3語 vs 6語、類似度 0.5 だが max_token_diff=0 で除外
        let a = catalog(vec![product("1", "blue sky tour", "JP", 100.0)]);
        let b = catalog(vec![product("2", "blue sky tour extra long name", "JP", 100.0)]);

        let strict = ProductMatcher::new(MatchOptions::new(0.2, 0));
        assert!(strict.match_catalogs(&a, &b).is_empty());

        let loose = ProductMatcher::new(MatchOptions::new(0.2, 3));
        let set = loose.match_catalogs(&a, &b);
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].similarity, 0.5);
    }

    #[test]
    fn test_tie_keeps_first_seen_candidate() {
        let a = catalog(vec![product("1", "kyoto walk", "JP", 10.0)]);
        let b = catalog(vec![
            product("first", "kyoto tour", "JP", 20.0),
            product("second", "kyoto trip", "JP", 30.0),
        ]);

        let set = ProductMatcher::default().match_catalogs(&a, &b);
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].b_id, "first");
    }

    #[test]
    fn test_below_threshold_is_dropped() {
        let a = catalog(vec![product("1", "a b c d e", "JP", 10.0)]);
        let b = catalog(vec![product("2", "a x y z w", "JP", 10.0)]);

        let matcher = ProductMatcher::new(MatchOptions::new(0.2, 5));
        // 1/9 < 0.2
        assert!(matcher.match_catalogs(&a, &b).is_empty());
    }

    #[test]
    fn test_b_records_can_be_reused() {
        let a = catalog(vec![
            product("1", "blue sky tour", "JP", 100.0),
            product("2", "blue sky tours", "JP", 90.0),
        ]);
        let b = catalog(vec![product("9", "blue sky trip", "JP", 120.0)]);

        let set = ProductMatcher::default().match_catalogs(&a, &b);
        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|m| m.b_id == "9"));
    }

    #[test]
    fn test_blank_names_need_non_positive_threshold() {
        let a = catalog(vec![product("1", "", "JP", 10.0)]);
        let b = catalog(vec![product("2", "  ", "JP", 10.0)]);

        assert!(ProductMatcher::default().match_catalogs(&a, &b).is_empty());

        let zero = ProductMatcher::new(MatchOptions::new(0.0, 5));
        let set = zero.match_catalogs(&a, &b);
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].similarity, 0.0);
    }

    #[test]
    fn test_empty_catalogs() {
        let empty = catalog(vec![]);
        let some = catalog(vec![product("1", "tour", "JP", 1.0)]);
        let matcher = ProductMatcher::default();

        assert!(matcher.match_catalogs(&empty, &some).is_empty());
        assert!(matcher.match_catalogs(&some, &empty).is_empty());
    }

    #[test]
    fn test_invariants_on_mixed_catalogs() {
        let a = catalog(vec![
            product("a1", "tokyo tower night view", "JP", 30.0),
            product("a2", "seoul food market tour", "KR", 40.0),
            product("a3", "bangkok temple day trip", "TH", 25.0),
            product("a4", "osaka castle", "JP", 15.0),
        ]);
        let b = catalog(vec![
            product("b1", "tokyo tower view", "JP", 35.0),
            product("b2", "seoul market food walk", "KR", 38.0),
            product("b3", "osaka castle ticket", "JP", 18.0),
            product("b4", "bangkok temple trip", "VN", 20.0),
        ]);

        let threshold = 0.3;
        let set = ProductMatcher::new(MatchOptions::new(threshold, 5)).match_catalogs(&a, &b);

        assert!(set.len() <= a.len());
        for m in &set {
            assert!(m.similarity >= threshold);
            let a_rec = a.iter().find(|r| r.id == m.a_id).unwrap();
            let b_rec = b.iter().find(|r| r.id == m.b_id).unwrap();
            assert_eq!(a_rec.country, b_rec.country);
        }
        assert!(set.iter().all(|m| m.a_id != "a3"));
    }

    #[test]
    fn test_progress_reports_each_record() {
        let a = catalog(vec![
            product("1", "x", "JP", 1.0),
            product("2", "y", "JP", 1.0),
            product("3", "z", "JP", 1.0),
        ]);
        let b = catalog(vec![product("9", "x", "JP", 1.0)]);

        let mut calls = Vec::new();
        let set = ProductMatcher::default()
            .match_catalogs_with(&a, &b, |done, total| calls.push((done, total)), None)
            .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_cancel_stops_run() {
        let a = catalog(vec![product("1", "x", "JP", 1.0), product("2", "y", "JP", 1.0)]);
        let b = catalog(vec![product("9", "x", "JP", 1.0)]);
        let token = CancelToken::new();
        let handle = token.clone();

        let result = ProductMatcher::default().match_catalogs_with(
            &a,
            &b,
            |done, _| {
                if done == 1 {
                    handle.cancel();
                }
            },
            Some(&token),
        );

        assert!(matches!(
            result,
            Err(Error::Cancelled { completed: 1, total: 2 })
        ));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let matcher = ProductMatcher::new(MatchOptions::new(f64::NAN, 5));
        let a = catalog(vec![product("1", "x", "JP", 1.0)]);
        let result = matcher.match_catalogs_with(&a, &a, |_, _| {}, None);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_exact_name_in_other_country_is_ignored() {
        let matcher = ProductMatcher::default();
        let a = catalog(vec![product("1", "blue sky tour", "JP", 100.0)]);
        let b = catalog(vec![
            product("kr", "blue sky tour", "KR", 100.0),
            product("jp", "blue sky", "JP", 100.0),
        ]);

        let set = matcher.match_catalogs(&a, &b);
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].b_id, "jp");
    }
}
