//! Regex families and keyword buckets for the corpus analyzer.

use once_cell::sync::Lazy;
use regex::Regex;

static PERCENTAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+%").unwrap());

static CURRENCY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$[\d,]+(?:\.\d+)?(?:\s*(?:million|billion|thousand))?").unwrap());

static NUMBER_WITH_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:,\d+)*(?:\.\d+)?\s*(?:million|billion|thousand|times|x|percent|users|customers|companies)\b",
    )
    .unwrap()
});

/// Extracts data-point substrings via the three pattern families:
/// percentages, currency amounts, and number-with-unit phrases.
pub fn extract_data_points(content: &str) -> Vec<String> {
    let mut points = Vec::new();
    for re in [&*PERCENTAGE, &*CURRENCY, &*NUMBER_WITH_UNIT] {
        points.extend(re.find_iter(content).map(|m| m.as_str().to_string()));
    }
    points
}

/// Future-tense keywords that mark a conclusion as forward-looking.
pub const FUTURE_KEYWORDS: &[&str] = &["will", "future", "next", "coming"];

pub fn contains_future_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    FUTURE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

const TECH_KEYWORDS: &[&str] = &["ai", "machine learning", "automation", "cloud", "api", "software", "platform"];
const BUSINESS_KEYWORDS: &[&str] = &["revenue", "growth", "sales", "marketing", "customer", "business", "startup"];
const DATA_KEYWORDS: &[&str] = &["data", "analytics", "metrics", "analysis", "insights", "statistics"];
const SAAS_KEYWORDS: &[&str] = &["saas", "subscription", "arr", "churn", "retention", "pricing"];

/// Keyword-bucket topic tagging. Each bucket contributes at most one tag.
pub fn extract_topics(content: &str) -> Vec<String> {
    let lower = content.to_lowercase();
    let mut topics = Vec::new();
    for (tag, keywords) in [
        ("technology", TECH_KEYWORDS),
        ("business", BUSINESS_KEYWORDS),
        ("data", DATA_KEYWORDS),
        ("SaaS", SAAS_KEYWORDS),
    ] {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            topics.push(tag.to_string());
        }
    }
    topics
}
