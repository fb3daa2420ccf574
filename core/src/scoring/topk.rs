use super::ScoredDoc;
use std::cmp::Ordering;

/// Keep the `k` best entries, highest score first.
///
/// Ties keep the order in which the scorer produced them. Selection runs in
/// O(n + k log k).
pub fn top_k(scored: Vec<ScoredDoc>, k: usize) -> Vec<ScoredDoc> {
    if k == 0 {
        return Vec::new();
    }
    let rank = |a: &(usize, ScoredDoc), b: &(usize, ScoredDoc)| -> Ordering {
        b.1.score.total_cmp(&a.1.score).then(a.0.cmp(&b.0))
    };

    let mut ranked: Vec<(usize, ScoredDoc)> = scored.into_iter().enumerate().collect();
    if ranked.len() > k {
        ranked.select_nth_unstable_by(k - 1, rank);
        ranked.truncate(k);
    }
    ranked.sort_unstable_by(rank);
    ranked.into_iter().map(|(_, doc)| doc).collect()
}
