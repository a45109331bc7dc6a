//! 照合結果の集計
//!
//! MatchSet から件数・平均・類似度分布・国別集計・上位N件を計算する。
//! 空の MatchSet でもエラーにせず、平均は 0.0 を返す。

use crate::types::{MatchRecord, MatchSet};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// 上位表示の既定件数
pub const DEFAULT_TOP_N: usize = 10;

/// 「高類似度」とみなす境界（これより大きい）
pub const HIGH_SIMILARITY_BOUND: f64 = 0.8;

/// 類似度の区分（半開区間）
///
/// 0.2 未満と、ちょうど 1.0 はどの区分にも入らない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBucket {
    /// [0.2, 0.4)
    Low,
    /// [0.4, 0.6)
    Medium,
    /// [0.6, 0.8)
    High,
    /// [0.8, 1.0)
    VeryHigh,
}

impl SimilarityBucket {
    pub const ALL: [SimilarityBucket; 4] = [
        SimilarityBucket::Low,
        SimilarityBucket::Medium,
        SimilarityBucket::High,
        SimilarityBucket::VeryHigh,
    ];

    /// (下限, 上限)。下限を含み上限を含まない
    pub fn range(&self) -> (f64, f64) {
        match self {
            SimilarityBucket::Low => (0.2, 0.4),
            SimilarityBucket::Medium => (0.4, 0.6),
            SimilarityBucket::High => (0.6, 0.8),
            SimilarityBucket::VeryHigh => (0.8, 1.0),
        }
    }

    pub fn classify(score: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| {
            let (min, max) = bucket.range();
            score >= min && score < max
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            SimilarityBucket::Low => "低類似度",
            SimilarityBucket::Medium => "中類似度",
            SimilarityBucket::High => "高類似度",
            SimilarityBucket::VeryHigh => "極高類似度",
        }
    }
}

impl std::fmt::Display for SimilarityBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (min, max) = self.range();
        write!(f, "{} [{:.1}, {:.1})", self.label(), min, max)
    }
}

/// 国別集計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryStat {
    pub country: String,
    pub count: usize,
    pub avg_similarity: f64,
    pub avg_price_diff: f64,
}

impl CountryStat {
    /// 表示用に小数3桁へ丸めたコピー（元の値は変えない）
    pub fn rounded(&self) -> Self {
        Self {
            country: self.country.clone(),
            count: self.count,
            avg_similarity: round_to(self.avg_similarity, 3),
            avg_price_diff: round_to(self.avg_price_diff, 3),
        }
    }
}

/// 集計結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub total_matches: usize,
    pub unique_countries: usize,
    pub avg_similarity: f64,
    pub avg_price_diff: f64,
    /// 区分順（Low → VeryHigh）の件数
    pub similarity_distribution: Vec<(SimilarityBucket, usize)>,
    /// 国名順
    pub country_stats: Vec<CountryStat>,
    pub top_matches: Vec<MatchRecord>,
}

impl AnalysisSummary {
    pub fn bucket_count(&self, bucket: SimilarityBucket) -> usize {
        self.similarity_distribution
            .iter()
            .find(|(b, _)| *b == bucket)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }
}

/// 既定の上位件数で集計
pub fn analyze(matches: &[MatchRecord]) -> AnalysisSummary {
    analyze_with_top(matches, DEFAULT_TOP_N)
}

/// 上位件数を指定して集計
pub fn analyze_with_top(matches: &[MatchRecord], top_n: usize) -> AnalysisSummary {
    let total_matches = matches.len();
    let unique_countries = matches
        .iter()
        .map(|m| m.country.as_str())
        .collect::<HashSet<_>>()
        .len();

    let similarity_distribution = SimilarityBucket::ALL
        .into_iter()
        .map(|bucket| {
            let count = matches
                .iter()
                .filter(|m| SimilarityBucket::classify(m.similarity) == Some(bucket))
                .count();
            (bucket, count)
        })
        .collect();

    AnalysisSummary {
        total_matches,
        unique_countries,
        avg_similarity: mean(matches.iter().map(|m| m.similarity)),
        avg_price_diff: mean(matches.iter().map(|m| m.price_diff)),
        similarity_distribution,
        country_stats: country_stats(matches),
        top_matches: top_matches(matches, top_n),
    }
}

/// 国別に件数・平均類似度・平均価格差を集計（国名順）
pub fn country_stats(matches: &[MatchRecord]) -> Vec<CountryStat> {
    let mut groups: BTreeMap<&str, Vec<&MatchRecord>> = BTreeMap::new();
    for m in matches {
        groups.entry(m.country.as_str()).or_default().push(m);
    }

    groups
        .into_iter()
        .map(|(country, rows)| CountryStat {
            country: country.to_string(),
            count: rows.len(),
            avg_similarity: mean(rows.iter().map(|m| m.similarity)),
            avg_price_diff: mean(rows.iter().map(|m| m.price_diff)),
        })
        .collect()
}

/// 類似度の高い順に最大 n 件（同点は元の順序）
pub fn top_matches(matches: &[MatchRecord], n: usize) -> MatchSet {
    let mut sorted: Vec<&MatchRecord> = matches.iter().collect();
    sorted.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.into_iter().take(n).cloned().collect()
}

/// 類似度が bound より大きい件数
pub fn high_similarity_count(matches: &[MatchRecord], bound: f64) -> usize {
    matches.iter().filter(|m| m.similarity > bound).count()
}

/// 価格差ヒストグラムの1区間
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// 価格差を [最小, 最大] の等幅区間に振り分ける（グラフ描画用）
///
/// 最後の区間だけ上限を含む。最小 == 最大なら1区間にまとめる。
pub fn price_diff_histogram(matches: &[MatchRecord], bins: usize) -> Vec<HistogramBin> {
    if matches.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (min, max) = matches.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| {
        (lo.min(m.price_diff), hi.max(m.price_diff))
    });

    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: matches.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for m in matches {
        let idx = (((m.price_diff - min) / width) as usize).min(bins - 1);
        histogram[idx].count += 1;
    }

    histogram
}

fn mean<I: Iterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// 小数 digits 桁に丸める
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
