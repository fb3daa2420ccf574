/// Tokenize text into (term, position) pairs by splitting on whitespace.
///
/// Terms are kept verbatim: no case folding, stemming or stopword removal.
/// Positions are 0-based offsets into the token sequence.
pub fn tokenize(text: &str) -> Vec<(String, usize)> {
    text.split_whitespace()
        .enumerate()
        .map(|(pos, term)| (term.to_string(), pos))
        .collect()
}
