//! CSV出力
//!
//! Excelで文字化けしないよう UTF-8 BOM を付ける。

use crate::error::{CatalogMatchError, Result};
use catalog_match_common::MatchRecord;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// BOM付きCSVのバイト列を生成
pub fn match_csv_bytes(results: &[MatchRecord]) -> Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(true)
            .quote_style(::csv::QuoteStyle::Necessary)
            .from_writer(&mut buffer);

        if results.is_empty() {
            writer
                .write_record(catalog_match_common::MATCH_COLUMNS)
                .map_err(|e| CatalogMatchError::CsvExport(e.to_string()))?;
        }
        for record in results {
            writer
                .serialize(record)
                .map_err(|e| CatalogMatchError::CsvExport(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| CatalogMatchError::CsvExport(e.to_string()))?;
    }
    Ok(buffer)
}

pub fn write_match_csv(results: &[MatchRecord], output_path: &Path) -> Result<()> {
    let bytes = match_csv_bytes(results)?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}
