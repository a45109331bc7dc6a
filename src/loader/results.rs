//! 出力済み照合結果（CSV / Excel）の再読み込み

use super::{read_table, RawTable};
use crate::error::{CatalogMatchError, Result};
use catalog_match_common::{MatchRecord, MatchSet, MATCH_COLUMNS};
use std::path::Path;

/// 照合結果ファイルを読み込む
pub fn read_match_set(path: &Path) -> Result<MatchSet> {
    let table = read_table(path)?;
    table_to_match_set(&table, &path.display().to_string())
}

pub fn table_to_match_set(table: &RawTable, source: &str) -> Result<MatchSet> {
    let mut indices = [0usize; 11];
    let mut missing = Vec::new();
    for (i, col) in MATCH_COLUMNS.iter().enumerate() {
        match table.column_index(col) {
            Some(idx) => indices[i] = idx,
            None => missing.push(col.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(CatalogMatchError::MissingColumns {
            file: source.to_string(),
            columns: missing,
        });
    }

    let number = |row: usize, i: usize| -> Result<f64> {
        let text = table.cell(row, indices[i]);
        if text.is_empty() {
            return Ok(0.0);
        }
        text.parse::<f64>().map_err(|_| {
            CatalogMatchError::CsvParse(format!(
                "{} {}行目 {}: 数値ではありません: {}",
                source,
                row + 2,
                MATCH_COLUMNS[i],
                text
            ))
        })
    };
    let text = |row: usize, i: usize| table.cell(row, indices[i]).to_string();

    (0..table.rows.len())
        .map(|row| {
            Ok(MatchRecord {
                country: text(row, 0),
                a_id: text(row, 1),
                a_name: text(row, 2),
                a_name_en: text(row, 3),
                a_price: number(row, 4)?,
                b_id: text(row, 5),
                b_name: text(row, 6),
                b_name_en: text(row, 7),
                b_price: number(row, 8)?,
                similarity: number(row, 9)?,
                price_diff: number(row, 10)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns() {
        let table = RawTable {
            headers: vec!["product_location_country".into()],
            rows: vec![],
        };
        let err = table_to_match_set(&table, "r.csv").unwrap_err();
        assert!(matches!(err, CatalogMatchError::MissingColumns { .. }));
    }

    #[test]
    fn test_bad_number() {
        let mut row: Vec<String> = vec!["x".into(); 11];
        row[4] = "1".into();
        row[8] = "2".into();
        row[9] = "high".into();
        let table = RawTable {
            headers: MATCH_COLUMNS.iter().map(|s| s.to_string()).collect(),
            rows: vec![row],
        };
        let err = table_to_match_set(&table, "r.csv").unwrap_err();
        assert!(err.to_string().contains("jaccard_score"));
    }
}
