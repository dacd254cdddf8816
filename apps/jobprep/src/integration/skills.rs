//! Skill sets and the pluggable similarity metric used for record linkage.
//!
//! Default: `JaccardSimilarity` (|A ∩ B| / |A ∪ B|, 0 when either side is empty).

use std::collections::HashSet;

pub type SkillSet = HashSet<String>;

/// Splits a comma-separated skill list into a set of trimmed tokens.
/// A missing or blank field yields the empty set; empty tokens are dropped.
pub fn parse_skill_set(raw: Option<&str>) -> SkillSet {
    match raw {
        Some(text) => text
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
        None => SkillSet::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A similarity metric over two skill sets. Implementations must return a
/// value in [0, 1] and must be symmetric.
pub trait SkillSimilarity {
    fn similarity(&self, a: &SkillSet, b: &SkillSet) -> f64;

    /// Short label for logs and reports.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// JaccardSimilarity — default metric
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct JaccardSimilarity;

impl SkillSimilarity for JaccardSimilarity {
    fn similarity(&self, a: &SkillSet, b: &SkillSet) -> f64 {
        jaccard(a, b)
    }

    fn name(&self) -> &'static str {
        "jaccard"
    }
}

pub fn jaccard(a: &SkillSet, b: &SkillSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(raw: &str) -> SkillSet {
        parse_skill_set(Some(raw))
    }

    #[test]
    fn test_parse_trims_tokens() {
        let s = set("SQL,  Python ,Data Science");
        assert_eq!(s.len(), 3);
        assert!(s.contains("Python"));
        assert!(s.contains("Data Science"));
    }

    #[test]
    fn test_parse_missing_or_blank_is_empty() {
        assert!(parse_skill_set(None).is_empty());
        assert!(parse_skill_set(Some("")).is_empty());
        assert!(parse_skill_set(Some("  ,  ")).is_empty());
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let s = set("SQL, sql");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_jaccard_three_of_four() {
        let a = set("SQL, Python, JavaScript, Data Science");
        let b = set("SQL, Python, Data Science");
        assert!((jaccard(&a, &b) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_jaccard_one_of_five() {
        let a = set("Java, JavaScript, SQL");
        let b = set("SQL, Python, Data Science");
        assert!((jaccard(&a, &b) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_jaccard_is_symmetric() {
        let pairs = [
            ("SQL, CSS, AI", "AI, Python"),
            ("Java", "Java, C++, Go"),
            ("HTML, CSS", "Rust"),
        ];
        for (x, y) in pairs {
            let (a, b) = (set(x), set(y));
            assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        }
    }

    #[test]
    fn test_jaccard_self_is_one() {
        let a = set("Python, Machine Learning, TensorFlow");
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn test_jaccard_empty_side_is_zero() {
        let a = set("Python");
        let empty = SkillSet::new();
        assert_eq!(jaccard(&a, &empty), 0.0);
        assert_eq!(jaccard(&empty, &a), 0.0);
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }

    #[test]
    fn test_jaccard_bounded() {
        let a = set("A, B, C, D");
        for other in ["A", "A, B", "E, F", "A, B, C, D, E"] {
            let score = jaccard(&a, &set(other));
            assert!((0.0..=1.0).contains(&score), "Score was {score}");
        }
    }

    #[test]
    fn test_metric_label_is_jaccard() {
        assert_eq!(JaccardSimilarity.name(), "jaccard");
    }
}
