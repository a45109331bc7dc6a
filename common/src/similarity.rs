//! Jaccard類似度

use crate::tokenizer::TokenSet;

/// |A ∩ B| / |A ∪ B|（両方空なら 0.0）
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
