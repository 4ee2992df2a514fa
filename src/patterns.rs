//! Keyword heuristics that run alongside the statistical model.
//!
//! A `PatternSet` is an ordered list of phrases checked by case-insensitive
//! substring containment. Matching is deliberately blunt: "free" fires
//! inside "freedom". The blend step tolerates single stray hits, and two or
//! more hits are treated as a strong spam signal in their own right.

use serde::{Deserialize, Serialize};

/// Ordered spam phrase list. Order is part of the contract: matched
/// phrases are always reported in list order, not text order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PatternSet(Vec<String>);

/// Outcome of scanning one text: how many phrases hit, and which.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternScan {
    pub score: u32,
    pub matched: Vec<String>,
}

impl Default for PatternSet {
    fn default() -> Self {
        PatternSet(
            [
                "free",
                "win",
                "winner",
                "cash",
                "prize",
                "urgent",
                "offer",
                "credit",
                "guarantee",
                "instant",
                "limited",
                "discount",
                "congratulations",
                "earn",
                "money",
                "dollar",
                "$$$",
                "work from home",
                "no experience",
                "bitcoin",
                "investment",
                "loan",
                "debt",
                "weight loss",
                "viagra",
                "casino",
                "lottery",
                "subscribe",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
    }
}

impl PatternSet {
    pub fn new(patterns: Vec<String>) -> Self {
        PatternSet(patterns)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Scan `text` against every phrase in list order. The text is
    /// lowercased once; each phrase is lowercased for the comparison but
    /// reported with its configured casing.
    pub fn scan(&self, text: &str) -> PatternScan {
        let lowered = text.to_lowercase();
        let mut matched = Vec::new();
        for pattern in &self.0 {
            if lowered.contains(&pattern.to_lowercase()) {
                matched.push(pattern.clone());
            }
        }
        PatternScan {
            score: matched.len() as u32,
            matched,
        }
    }
}
