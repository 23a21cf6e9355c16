//! Plain-text splitting and similarity helpers shared by the analyzer and
//! the comparative scorer.

/// Splits content into trimmed, non-empty paragraphs (blank-line separated).
pub fn paragraphs(content: &str) -> Vec<&str> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Splits content into trimmed, non-empty sentences on `.`, `!`, `?`.
pub fn sentences(content: &str) -> Vec<&str> {
    content
        .split(|c| c == '.' || c == '!' || c == '?')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Mean word count across the given units; 0.0 for an empty slice.
pub fn avg_words(units: &[&str]) -> f64 {
    if units.is_empty() {
        return 0.0;
    }
    units.iter().map(|u| word_count(u)).sum::<usize>() as f64 / units.len() as f64
}

/// Bounded score for how close two magnitudes are: `1 − |a−b| / max(a,b,1)`.
///
/// The denominator floor keeps the result in [0, 1] and avoids division by
/// zero when both sides are empty.
pub fn closeness(a: f64, b: f64) -> f64 {
    let denom = a.max(b).max(1.0);
    1.0 - (a - b).abs() / denom
}

/// Word-level longest-common-subsequence similarity ratio in [0, 1].
///
/// `2·LCS / (len_a + len_b)`, case-insensitive. Identical texts score 1.0;
/// an empty side scores 0.0.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let xs: Vec<&str> = a_lower.split_whitespace().collect();
    let ys: Vec<&str> = b_lower.split_whitespace().collect();
    if xs.is_empty() || ys.is_empty() {
        return 0.0;
    }

    // Single-row LCS table; texts here are paragraph-sized.
    let mut prev = vec![0usize; ys.len() + 1];
    let mut row = vec![0usize; ys.len() + 1];
    for x in &xs {
        for (j, y) in ys.iter().enumerate() {
            row[j + 1] = if x == y {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    let lcs = prev[ys.len()] as f64;
    2.0 * lcs / (xs.len() + ys.len()) as f64
}

/// Non-overlapping occurrences of `needle` in `haystack`, case-insensitive.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.to_lowercase().matches(&needle.to_lowercase()).count()
}
