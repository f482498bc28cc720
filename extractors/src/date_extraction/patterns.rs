use regex::Regex;
use std::sync::LazyLock;

const ENGLISH_MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

/// Date-shaped spans, in the order they are scanned
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let sources = [
        // 3/4/25, 15/03/2024
        r"\b\d{1,2}/\d{1,2}/(?:\d{4}|\d{2})\b".to_string(),
        // 2024-03-15
        r"\b\d{4}-\d{2}-\d{2}\b".to_string(),
        // Jan 5, 2024 / January 5th 2024
        format!(r"(?i)\b{ENGLISH_MONTH}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b"),
        // 5 January 2024 / 5th of Jan 2024
        format!(r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{ENGLISH_MONTH}\.?,?\s+\d{{4}}\b"),
        // 5 Απριλίου 2024; the parser rejects Greek words that are not months
        r"\b\d{1,2}\s+\p{Greek}{3,}\.?\s+\d{4}\b".to_string(),
    ];

    sources
        .iter()
        .map(|source| Regex::new(source).expect("date pattern must compile"))
        .collect()
});

/// Every regex match in `text`, in pattern order. Duplicates are kept.
pub(crate) fn regex_candidates(text: &str) -> Vec<String> {
    DATE_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.find_iter(text).map(|m| m.as_str().to_string()))
        .collect()
}
