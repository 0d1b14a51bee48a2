// src/glossary.rs
// Glossary Store - ordered proper-noun list fed into the transcription prompt

use serde::{Deserialize, Serialize};

/// Default proper nouns the app ships with. Users add and remove terms at
/// runtime; the list is session-scoped and never persisted.
const DEFAULT_TERMS: &[&str] = &[
    "Microsoft",
    "Power Apps",
    "Power Automate",
    "Power BI",
    "Copilot",
    "Copilot Studio",
    "Loop",
    "Word",
    "Excel",
    "PowerPoint",
    "Outlook",
    "Calendar",
];

/// Ordered set of unique terms. Matching is exact and case-sensitive;
/// insertion order is preserved for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glossary {
    terms: Vec<String>,
}

impl Glossary {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Glossary pre-seeded with the product defaults.
    pub fn with_defaults() -> Self {
        Self {
            terms: DEFAULT_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Append a term. Whitespace is trimmed first; empty or already-present
    /// terms are a no-op. Returns whether the glossary changed.
    pub fn add(&mut self, term: &str) -> bool {
        let trimmed = term.trim();
        if trimmed.is_empty() || self.terms.iter().any(|t| t == trimmed) {
            return false;
        }
        self.terms.push(trimmed.to_string());
        true
    }

    /// Remove an exact match. Absent terms are a no-op. Returns whether the
    /// glossary changed.
    pub fn remove(&mut self, term: &str) -> bool {
        let before = self.terms.len();
        self.terms.retain(|t| t != term);
        self.terms.len() != before
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_appends() {
        let mut glossary = Glossary::new();
        assert!(glossary.add("  Copilot  "));
        assert_eq!(glossary.terms(), &["Copilot".to_string()]);
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut glossary = Glossary::new();
        assert!(glossary.add("Copilot"));
        assert!(!glossary.add("Copilot"));
        assert_eq!(glossary.len(), 1, "Duplicate add must not grow the list");
    }

    #[test]
    fn test_add_empty_is_noop() {
        let mut glossary = Glossary::new();
        assert!(!glossary.add(""));
        assert!(!glossary.add("   "));
        assert!(glossary.is_empty());
    }

    #[test]
    fn test_case_sensitive_distinctness() {
        let mut glossary = Glossary::new();
        glossary.add("Copilot");
        glossary.add("Copilot Studio");
        assert!(glossary.add("copilot"), "Different case is a distinct term");
        assert_eq!(
            glossary.terms(),
            &[
                "Copilot".to_string(),
                "Copilot Studio".to_string(),
                "copilot".to_string()
            ]
        );
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut glossary = Glossary::new();
        glossary.add("Copilot");
        glossary.add("Copilot Studio");
        glossary.add("copilot");
        assert!(glossary.remove("Copilot"));
        assert_eq!(
            glossary.terms(),
            &["Copilot Studio".to_string(), "copilot".to_string()]
        );
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut glossary = Glossary::new();
        glossary.add("Loop");
        assert!(!glossary.remove("Excel"));
        assert_eq!(glossary.len(), 1);
    }

    #[test]
    fn test_defaults_are_unique() {
        let glossary = Glossary::with_defaults();
        let mut deduped = glossary.terms().to_vec();
        deduped.dedup();
        assert_eq!(deduped.len(), glossary.len());
    }
}
