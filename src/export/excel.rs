//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを作り、ファイルに保存する。

use crate::error::{CatalogMatchError, Result};
use catalog_match_common::export::excel_core::generate_match_excel_buffer;
use catalog_match_common::MatchRecord;
use std::path::Path;

pub fn generate_excel(results: &[MatchRecord], output_path: &Path) -> Result<()> {
    let buffer = generate_match_excel_buffer(results)
        .map_err(|e| CatalogMatchError::ExcelGeneration(e.to_string()))?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
