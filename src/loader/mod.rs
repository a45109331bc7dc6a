//! カタログファイルの読み込み
//!
//! 1. 拡張子で形式を判定（csv / xlsx / xls）
//! 2. 表として読み込み（CSVは文字コードを順に試す）
//! 3. 必須列を大文字小文字を区別せず検証
//! 4. 列名を標準化し、必須列以外を捨てて ProductRecord に変換
//!
//! 欠損値の補完はここで一度だけ行う（文字列は空、価格は 0）。

pub mod decode;
pub mod results;
pub mod spreadsheet;

use crate::error::{CatalogMatchError, Result};
use catalog_match_common::{validate_catalog, Catalog, ProductRecord, REQUIRED_COLUMNS};
use std::collections::HashSet;
use std::path::Path;

pub const SUPPORTED_FORMATS: &[&str] = &["csv", "xlsx", "xls"];

/// 入力ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            _ => Err(CatalogMatchError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// 列名と文字列セルの表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// 列名（大文字小文字無視）の位置
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.trim())
            .unwrap_or("")
    }
}

/// 読み込んだカタログの基本情報
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogInfo {
    pub total_rows: usize,
    /// 元ファイルの列数（標準化前）
    pub total_columns: usize,
    /// 必須列ごとの欠損件数（価格は数値化できなかった行も含む）
    pub missing_values: Vec<(String, usize)>,
    pub unique_countries: usize,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub price_mean: Option<f64>,
}

impl CatalogInfo {
    pub fn total_missing(&self) -> usize {
        self.missing_values.iter().map(|(_, n)| n).sum()
    }
}

/// 読み込み済みカタログ
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub info: CatalogInfo,
    /// データ品質の指摘（照合は止めない）
    pub findings: Vec<String>,
}

/// ファイルを表として読み込む
pub fn read_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(CatalogMatchError::FileNotFound(path.display().to_string()));
    }

    match FileFormat::from_path(path)? {
        FileFormat::Csv => {
            let bytes = std::fs::read(path)?;
            let (text, _) = decode::decode_csv_bytes(&bytes, &path.display().to_string())?;
            parse_csv_text(&text)
        }
        FileFormat::Xlsx | FileFormat::Xls => spreadsheet::read_first_sheet(path),
    }
}

/// CSVテキストを表に変換
pub fn parse_csv_text(text: &str) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

/// 足りない必須列を返す（大文字小文字無視）
pub fn validate_columns<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    let present: HashSet<String> = headers
        .iter()
        .map(|h| h.as_ref().trim().to_lowercase())
        .collect();

    REQUIRED_COLUMNS
        .iter()
        .filter(|col| !present.contains(**col))
        .map(|col| col.to_string())
        .collect()
}

/// 表をカタログに変換する
pub fn standardize(table: &RawTable, label: &str) -> Result<LoadedCatalog> {
    let missing = validate_columns(&table.headers);
    if !missing.is_empty() {
        return Err(CatalogMatchError::MissingColumns {
            file: label.to_string(),
            columns: missing,
        });
    }

    let [id_col, name_col, country_col, price_col] = REQUIRED_COLUMNS.map(|col| {
        // validate_columns 済みなので必ず見つかる
        table.column_index(col).unwrap_or(usize::MAX)
    });

    let mut missing_counts = [0usize; 4];
    let mut invalid_prices = 0usize;
    let mut records = Vec::with_capacity(table.rows.len());

    for row in 0..table.rows.len() {
        let id = table.cell(row, id_col);
        let name = table.cell(row, name_col);
        let country = table.cell(row, country_col);
        let price_text = table.cell(row, price_col);

        for (i, value) in [id, name, country, price_text].iter().enumerate() {
            if value.is_empty() {
                missing_counts[i] += 1;
            }
        }

        let price = if price_text.is_empty() {
            0.0
        } else {
            match price_text.parse::<f64>() {
                Ok(p) if p.is_finite() => p,
                _ => {
                    invalid_prices += 1;
                    0.0
                }
            }
        };

        records.push(ProductRecord::new(id, name, country, price));
    }

    let catalog = Catalog::new(label, records);

    let mut findings = validate_catalog(&catalog);
    for (col, count) in REQUIRED_COLUMNS.iter().zip(missing_counts) {
        if count > 0 {
            findings.push(format!("{} に欠損値が {} 件あります", col, count));
        }
    }
    if invalid_prices > 0 {
        findings.push(format!("数値に変換できない価格が {} 件あります（0として扱います）", invalid_prices));
    }

    let mut missing_values: Vec<(String, usize)> = REQUIRED_COLUMNS
        .iter()
        .zip(missing_counts)
        .map(|(col, n)| (col.to_string(), n))
        .collect();
    missing_values[3].1 += invalid_prices;

    let info = catalog_info(&catalog, table.headers.len(), missing_values);

    Ok(LoadedCatalog {
        catalog,
        info,
        findings,
    })
}

fn catalog_info(catalog: &Catalog, total_columns: usize, missing_values: Vec<(String, usize)>) -> CatalogInfo {
    let prices: Vec<f64> = catalog.iter().map(|r| r.price).collect();
    let price_min = prices.iter().copied().reduce(f64::min);
    let price_max = prices.iter().copied().reduce(f64::max);
    let price_mean = if prices.is_empty() {
        None
    } else {
        Some(prices.iter().sum::<f64>() / prices.len() as f64)
    };

    CatalogInfo {
        total_rows: catalog.len(),
        total_columns,
        missing_values,
        unique_countries: catalog.country_count(),
        price_min,
        price_max,
        price_mean,
    }
}

/// ファイルを読み込んでカタログに変換
pub fn read_catalog(path: &Path) -> Result<LoadedCatalog> {
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let table = read_table(path)?;
    let loaded = standardize(&table, &label)?;

    tracing::info!(
        file = %label,
        rows = loaded.info.total_rows,
        countries = loaded.info.unique_countries,
        "catalog loaded"
    );
    for finding in &loaded.findings {
        tracing::warn!(file = %label, "{}", finding);
    }

    Ok(loaded)
}
