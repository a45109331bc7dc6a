//! 端末向けの結果表示

use crate::loader::CatalogInfo;
use catalog_match_common::analysis::{
    high_similarity_count, price_diff_histogram, round_to, HIGH_SIMILARITY_BOUND,
};
use catalog_match_common::format::{format_number, format_percentage};
use catalog_match_common::{AnalysisSummary, MatchRecord, ProductRecord};

const HISTOGRAM_BINS: usize = 5;

pub fn print_catalog_info(label: &str, info: &CatalogInfo) {
    println!("{}:", label);
    println!("  行数: {}", format_number(info.total_rows as f64, 0));
    println!("  列数: {}", info.total_columns);
    println!("  国数: {}", info.unique_countries);
    if let (Some(min), Some(max), Some(mean)) = (info.price_min, info.price_max, info.price_mean) {
        println!(
            "  価格: 最小 {} / 最大 {} / 平均 {}",
            format_number(min, 2),
            format_number(max, 2),
            format_number(mean, 2)
        );
    }
    if info.total_missing() > 0 {
        println!("  欠損値:");
        for (column, count) in info.missing_values.iter().filter(|(_, n)| *n > 0) {
            println!("    {}: {}", column, count);
        }
    }
}

pub fn print_preview(records: &[ProductRecord]) {
    println!("  プレビュー:");
    for r in records {
        println!(
            "    [{}] {} | {} | {}",
            r.id,
            r.name,
            r.country,
            format_number(r.price, 2)
        );
    }
}

pub fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("⚠ 警告 ({}件):", warnings.len());
    for w in warnings {
        println!("  - {}", w);
    }
}

pub fn print_summary(summary: &AnalysisSummary, matches: &[MatchRecord]) {
    println!("照合結果:");
    println!("  照合件数: {}", format_number(summary.total_matches as f64, 0));
    println!("  国数: {}", summary.unique_countries);
    println!("  平均類似度: {:.3}", summary.avg_similarity);
    println!("  平均価格差: {}", format_number(summary.avg_price_diff, 2));

    let high = high_similarity_count(matches, HIGH_SIMILARITY_BOUND);
    let ratio = if summary.total_matches == 0 {
        0.0
    } else {
        high as f64 / summary.total_matches as f64
    };
    println!(
        "  高類似度 (>{}): {}件 ({})",
        HIGH_SIMILARITY_BOUND,
        high,
        format_percentage(ratio, 1)
    );

    if summary.is_empty() {
        return;
    }

    println!("\n類似度分布:");
    for (bucket, count) in &summary.similarity_distribution {
        let (min, max) = bucket.range();
        println!("  {} [{:.1}, {:.1}): {}", bucket.label(), min, max, count);
    }

    println!("\n国別集計:");
    for stat in &summary.country_stats {
        let stat = stat.rounded();
        println!(
            "  {}: {}件 / 平均類似度 {} / 平均価格差 {}",
            stat.country,
            stat.count,
            stat.avg_similarity,
            format_number(stat.avg_price_diff, 2)
        );
    }

    let histogram = price_diff_histogram(matches, HISTOGRAM_BINS);
    if !histogram.is_empty() {
        println!("\n価格差分布:");
        for bin in &histogram {
            println!(
                "  {} 〜 {}: {}",
                format_number(bin.lower, 2),
                format_number(bin.upper, 2),
                bin.count
            );
        }
    }

    if !summary.top_matches.is_empty() {
        println!("\n上位 {} 件:", summary.top_matches.len());
        for (i, m) in summary.top_matches.iter().enumerate() {
            println!(
                "  {:>2}. [{}] {} ⇔ {} (類似度 {}, 価格差 {})",
                i + 1,
                m.country,
                m.a_name_en,
                m.b_name_en,
                round_to(m.similarity, 3),
                format_number(m.price_diff, 2)
            );
        }
    }
}
