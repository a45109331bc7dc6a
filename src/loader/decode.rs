//! CSVバイト列の文字コード判定
//!
//! UTF-8 → Big5 → GBK の固定順で試し、最初に不正バイトなしで
//! デコードできたものを採用する。

use crate::error::{CatalogMatchError, Result};
use encoding_rs::{Encoding, BIG5, GBK, UTF_8};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 試行する文字コード（この順番で試す）
pub const FALLBACK_ENCODINGS: [&Encoding; 3] = [UTF_8, BIG5, GBK];

/// デコード結果と採用した文字コード
pub fn decode_csv_bytes(bytes: &[u8], source: &str) -> Result<(String, &'static Encoding)> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    for encoding in FALLBACK_ENCODINGS {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            tracing::debug!(source, encoding = encoding.name(), "decoded csv");
            return Ok((text.into_owned(), encoding));
        }
        tracing::debug!(source, encoding = encoding.name(), "decode failed, trying next");
    }

    Err(CatalogMatchError::Encoding(source.to_string()))
}
