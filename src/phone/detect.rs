//! Phone column detection over a loaded [`Table`].
//!
//! Ordered cascade, first decision wins:
//! 1. header keyword match
//! 2. fuzzy header match against "phone"
//! 3. first column whose first non-blank cell looks numeric
//! 4. first column
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use crate::sheet::Table;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use strsim::levenshtein;
use tracing::debug;

/// Header keywords, in priority order.
pub const KEYWORDS: &[&str] = &["phone", "mobile", "contact", "cell"];

/// Target word for fuzzy header matching.
pub const FUZZY_TARGET: &str = "phone";

/// Minimum similarity for a fuzzy header match.
pub const FUZZY_THRESHOLD: f64 = 0.8;

/// Which cascade step picked the column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DetectionRule {
    Keyword { keyword: &'static str },
    Fuzzy { score: f64 },
    ContentSniff,
    Fallback,
}

/// The chosen phone column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSelection {
    pub index: usize,
    pub name: String,
    #[serde(flatten)]
    pub rule: DetectionRule,
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[\d\-\+\s\(\)]+$").expect("numeric sample pattern is valid")
    })
}

/// Levenshtein similarity in `0.0..=1.0`, normalized by the longer string.
///
/// Two empty strings are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - (levenshtein(a, b) as f64 / max_len as f64)
}

/// Pick the phone column. Returns `None` only for a table with no columns.
pub fn detect_phone_column(table: &Table) -> Option<ColumnSelection> {
    let headers = table.headers();
    if headers.is_empty() {
        return None;
    }
    let lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let select = |index: usize, rule: DetectionRule| {
        debug!(column = %headers[index], ?rule, "phone column selected");
        Some(ColumnSelection {
            index,
            name: headers[index].clone(),
            rule,
        })
    };

    // 1) keyword
    for &keyword in KEYWORDS {
        if let Some(index) = lower.iter().position(|h| h.contains(keyword)) {
            return select(index, DetectionRule::Keyword { keyword });
        }
    }

    // 2) fuzzy; strict `>` keeps the leftmost column on ties
    let mut best: Option<(usize, f64)> = None;
    for (index, header) in lower.iter().enumerate() {
        let score = similarity(header, FUZZY_TARGET);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((index, score));
        }
    }
    if let Some((index, score)) = best {
        if score >= FUZZY_THRESHOLD {
            return select(index, DetectionRule::Fuzzy { score });
        }
    }

    // 3) content sniff
    for index in 0..headers.len() {
        let sample = table.column(index).find(|cell| !cell.trim().is_empty());
        if sample.is_some_and(|s| numeric_pattern().is_match(s)) {
            return select(index, DetectionRule::ContentSniff);
        }
    }

    // 4) fallback
    select(0, DetectionRule::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_similarity_values() {
        assert_eq!(similarity("phone", "phone"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("phone", "xxxxx"), 0.0);
        assert!((similarity("phne", "phone") - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_keyword_any_position() {
        for headers in [
            vec!["Phone", "Name", "City"],
            vec!["Name", "phone_number", "City"],
            vec!["Name", "City", "Work PHONE"],
        ] {
            let t = table(&headers, &[]);
            let sel = detect_phone_column(&t).unwrap();
            assert!(sel.name.to_lowercase().contains("phone"));
            assert_eq!(sel.rule, DetectionRule::Keyword { keyword: "phone" });
        }
    }

    #[test]
    fn test_keyword_priority_beats_position() {
        // "mobile" is left of "phone" but "phone" has higher priority.
        let t = table(&["Mobile", "Phone"], &[]);
        assert_eq!(detect_phone_column(&t).unwrap().index, 1);

        let t = table(&["Cell", "Contact No"], &[]);
        assert_eq!(
            detect_phone_column(&t).unwrap().rule,
            DetectionRule::Keyword { keyword: "contact" }
        );
    }

    #[test]
    fn test_fuzzy_match() {
        let t = table(&["Name", "Phne"], &[&["Ali", "x"]]);
        let sel = detect_phone_column(&t).unwrap();
        assert_eq!(sel.index, 1);
        assert!(matches!(sel.rule, DetectionRule::Fuzzy { .. }));
    }

    #[test]
    fn test_fuzzy_tie_goes_to_leftmost() {
        // both score 0.8
        let t = table(&["Phne", "Phoe"], &[]);
        let sel = detect_phone_column(&t).unwrap();
        assert_eq!(sel.index, 0);
        assert!(matches!(sel.rule, DetectionRule::Fuzzy { .. }));
    }

    #[test]
    fn test_trailing_space_counts_against_fuzzy_score() {
        // "phne " scores 0.6, so the numeric column wins
        let t = table(&["Phne ", "Other"], &[&["Ali", "03001234567"]]);
        let sel = detect_phone_column(&t).unwrap();
        assert_eq!(sel.index, 1);
        assert_eq!(sel.rule, DetectionRule::ContentSniff);
    }

    #[test]
    fn test_fuzzy_below_threshold_falls_through() {
        // "phn" scores 0.6
        let t = table(&["Name", "Phn"], &[&["Ali", "0300 1234567"]]);
        let sel = detect_phone_column(&t).unwrap();
        assert_eq!(sel.index, 1);
        assert_eq!(sel.rule, DetectionRule::ContentSniff);
    }

    #[test]
    fn test_content_sniff_skips_blank_cells() {
        let t = table(
            &["Name", "Number"],
            &[&["", "  "], &["Ali", "(0300) 123-4567"]],
        );
        let sel = detect_phone_column(&t).unwrap();
        assert_eq!(sel.index, 1);
        assert_eq!(sel.rule, DetectionRule::ContentSniff);
    }

    #[test]
    fn test_fallback_first_column() {
        let t = table(&["Name", "City"], &[&["Ali", "Lahore"]]);
        let sel = detect_phone_column(&t).unwrap();
        assert_eq!(sel.index, 0);
        assert_eq!(sel.rule, DetectionRule::Fallback);
    }

    #[test]
    fn test_no_columns() {
        let t = table(&[], &[]);
        assert!(detect_phone_column(&t).is_none());
    }
}
