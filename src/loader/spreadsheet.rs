//! Excel (xlsx/xls) の読み込み
//!
//! 先頭シートのみを対象とし、1行目をヘッダーとして扱う。

use super::RawTable;
use crate::error::{CatalogMatchError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

pub fn read_first_sheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CatalogMatchError::ExcelRead(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CatalogMatchError::ExcelRead(format!("{}: シートがありません", path.display())))?
        .map_err(|e| CatalogMatchError::ExcelRead(format!("{}: {}", path.display(), e)))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };

    let rows = rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    Ok(RawTable { headers, rows })
}

/// セル値を文字列化（整数値の浮動小数は小数点なしで表す）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
