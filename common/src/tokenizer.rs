//! 商品名の単語分割

use std::collections::HashSet;

/// 小文字化した単語の集合
pub type TokenSet = HashSet<String>;

/// 商品名を空白で分割して小文字の単語集合にする
///
/// 記号の除去や語幹処理はしない。空文字・空白のみは空集合。
pub fn tokenize(text: &str) -> TokenSet {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
