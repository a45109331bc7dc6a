//! Excel生成（共通ライブラリ）
//!
//! 照合結果を1シートの表として書き出す。数値列は数値セルで書く。

use crate::error::{Error, Result};
use crate::types::{MatchRecord, MATCH_COLUMNS};
use rust_xlsxwriter::*;

/// 出力シート名
pub const MATCH_SHEET_NAME: &str = "照合結果";

/// 列幅（文字数単位）
const TEXT_COL_WIDTH: f64 = 28.0;
const NUMBER_COL_WIDTH: f64 = 14.0;

fn is_numeric_column(col: u16) -> bool {
    matches!(col, 4 | 8 | 9 | 10)
}

/// 照合結果をExcelバッファに生成
pub fn generate_match_excel_buffer(records: &[MatchRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(MATCH_SHEET_NAME)
        .map_err(|e| Error::Excel(format!("シート名設定エラー: {}", e)))?;

    for (col, name) in MATCH_COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *name, &header_format)
            .map_err(|e| Error::Excel(format!("ヘッダー書き込みエラー: {}", e)))?;
        let width = if is_numeric_column(col) { NUMBER_COL_WIDTH } else { TEXT_COL_WIDTH };
        worksheet
            .set_column_width(col, width)
            .map_err(|e| Error::Excel(format!("列幅設定エラー: {}", e)))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        let texts = [
            (0u16, record.country.as_str()),
            (1, record.a_id.as_str()),
            (2, record.a_name.as_str()),
            (3, record.a_name_en.as_str()),
            (5, record.b_id.as_str()),
            (6, record.b_name.as_str()),
            (7, record.b_name_en.as_str()),
        ];
        for (col, value) in texts {
            worksheet
                .write_string(row, col, value)
                .map_err(|e| Error::Excel(format!("値書き込みエラー: {}", e)))?;
        }

        let numbers = [
            (4u16, record.a_price),
            (8, record.b_price),
            (9, record.similarity),
            (10, record.price_diff),
        ];
        for (col, value) in numbers {
            worksheet
                .write_number(row, col, value)
                .map_err(|e| Error::Excel(format!("数値書き込みエラー: {}", e)))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| Error::Excel(format!("ウィンドウ枠固定エラー: {}", e)))?;

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(|e| Error::Excel(format!("Excel保存エラー: {}", e)))
}
