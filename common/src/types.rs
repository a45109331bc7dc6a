//! カタログと照合結果の型定義
//!
//! - ProductRecord: 1社分のカタログの1行
//! - Catalog: 1社分のカタログ（行順を保持）
//! - MatchRecord: A社商品1件とB社の最良候補1件のペア
//!
//! serde名は入出力ファイルの列名と一致させている。

use serde::{Deserialize, Serialize};

/// 入力カタログの必須列
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "product_id",
    "product_name",
    "product_location_country",
    "price",
];

/// 照合結果の出力列（出力順）
pub const MATCH_COLUMNS: [&str; 11] = [
    "product_location_country",
    "vendor_A_product_id",
    "vendor_A_product_name",
    "vendor_A_product_name_en",
    "vendor_A_price",
    "vendor_B_product_id",
    "vendor_B_product_name",
    "vendor_B_product_name_en",
    "vendor_B_price",
    "jaccard_score",
    "price_diff",
];

/// 商品レコード
///
/// 欠損値の補完は読み込み時に一度だけ行う（文字列は空、価格は0）。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "product_id")]
    pub id: String,

    #[serde(rename = "product_name")]
    pub name: String,

    /// 英語名（翻訳しない場合は name と同じ）
    #[serde(rename = "product_name_en", default)]
    pub name_en: String,

    #[serde(rename = "product_location_country")]
    pub country: String,

    pub price: f64,
}

impl ProductRecord {
    /// name_en を name で初期化して生成
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
        price: f64,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            name_en: name.clone(),
            name,
            country: country.into(),
            price,
        }
    }

    /// 英語名を差し替え
    pub fn with_name_en(mut self, name_en: impl Into<String>) -> Self {
        self.name_en = name_en.into();
        self
    }
}

/// 1社分のカタログ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// 表示用ラベル（ファイル名など）
    pub label: String,
    pub records: Vec<ProductRecord>,
}

impl Catalog {
    pub fn new(label: impl Into<String>, records: Vec<ProductRecord>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductRecord> {
        self.records.iter()
    }

    /// 国の種類数
    pub fn country_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.country.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len()
    }

    /// 先頭 n 件
    pub fn preview(&self, n: usize) -> &[ProductRecord] {
        &self.records[..n.min(self.records.len())]
    }
}

/// 照合結果の1行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "product_location_country")]
    pub country: String,

    #[serde(rename = "vendor_A_product_id")]
    pub a_id: String,

    #[serde(rename = "vendor_A_product_name")]
    pub a_name: String,

    #[serde(rename = "vendor_A_product_name_en")]
    pub a_name_en: String,

    #[serde(rename = "vendor_A_price")]
    pub a_price: f64,

    #[serde(rename = "vendor_B_product_id")]
    pub b_id: String,

    #[serde(rename = "vendor_B_product_name")]
    pub b_name: String,

    #[serde(rename = "vendor_B_product_name_en")]
    pub b_name_en: String,

    #[serde(rename = "vendor_B_price")]
    pub b_price: f64,

    /// Jaccard類似度 (0.0-1.0)
    #[serde(rename = "jaccard_score")]
    pub similarity: f64,

    /// b_price - a_price
    pub price_diff: f64,
}

impl MatchRecord {
    /// A社商品とB社商品からレコードを生成（price_diff はここで確定）
    pub fn from_pair(a: &ProductRecord, b: &ProductRecord, similarity: f64) -> Self {
        Self {
            country: a.country.clone(),
            a_id: a.id.clone(),
            a_name: a.name.clone(),
            a_name_en: a.name_en.clone(),
            a_price: a.price,
            b_id: b.id.clone(),
            b_name: b.name.clone(),
            b_name_en: b.name_en.clone(),
            b_price: b.price,
            similarity,
            price_diff: b.price - a.price,
        }
    }
}

/// 1回の照合実行の結果（A社1件につき最大1行）
pub type MatchSet = Vec<MatchRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_record_new_copies_name_to_name_en() {
        let record = ProductRecord::new("1", "blue sky tour", "JP", 100.0);
        assert_eq!(record.name_en, "blue sky tour");
    }

    #[test]
    fn test_match_record_price_diff() {
        let a = ProductRecord::new("1", "blue sky tour", "JP", 100.0);
        let b = ProductRecord::new("2", "blue sky trip", "JP", 120.0);
        let record = MatchRecord::from_pair(&a, &b, 0.5);

        assert_eq!(record.price_diff, 20.0);
        assert_eq!(record.country, "JP");
        assert_eq!(record.b_id, "2");
    }

    #[test]
    fn test_match_record_serialize_uses_export_columns() {
        let record = MatchRecord {
            country: "JP".to_string(),
            similarity: 0.5,
            ..Default::default()
        };

        let json = serde_json::to_string(&record).expect("シリアライズ失敗");
        assert!(json.contains("\"product_location_country\":\"JP\""));
        assert!(json.contains("\"jaccard_score\":0.5"));
        assert!(json.contains("\"vendor_B_price\""));
    }

    #[test]
    fn test_catalog_preview_clips() {
        let catalog = Catalog::new(
            "a",
            vec![
                ProductRecord::new("1", "x", "JP", 1.0),
                ProductRecord::new("2", "y", "KR", 2.0),
            ],
        );

        assert_eq!(catalog.preview(10).len(), 2);
        assert_eq!(catalog.preview(1)[0].id, "1");
        assert_eq!(catalog.country_count(), 2);
    }
}
