//! TF-IDF vectorization over the tokenizer's unigram and bigram terms.
//!
//! Fitting builds a pruned vocabulary from the training documents and a
//! smoothed inverse-document-frequency weight per term. Transforming a
//! text yields a sparse L2-normalized vector; terms outside the fitted
//! vocabulary contribute nothing, so prediction never grows the feature
//! space.

use crate::config::TrainingConfig;
use crate::tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    /// Term to feature index. Indices are dense, 0..len, assigned in
    /// sorted term order so a fit over the same corpus is reproducible.
    vocabulary: HashMap<String, usize>,
    /// Smoothed IDF weight per feature index.
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Build the vocabulary and IDF table from the training documents.
    ///
    /// Pruning, in order: terms must appear in at least `min_df` documents
    /// and in at most `max_df` of them (as a fraction); if more than
    /// `max_features` terms survive, the ones with the highest total count
    /// across the corpus are kept, ties broken alphabetically.
    pub fn fit(documents: &[String], training: &TrainingConfig) -> TfidfVectorizer {
        let n_docs = documents.len();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut corpus_freq: HashMap<String, u64> = HashMap::new();

        for document in documents {
            let mut seen: HashSet<String> = HashSet::new();
            for term in tokenizer::terms(document) {
                *corpus_freq.entry(term.clone()).or_insert(0) += 1;
                seen.insert(term);
            }
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let max_doc_count = training.max_df * n_docs as f64;
        let mut kept: Vec<(String, usize)> = doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= training.min_df && (*df as f64) <= max_doc_count)
            .collect();

        if kept.len() > training.max_features {
            kept.sort_by(|a, b| {
                corpus_freq[&b.0]
                    .cmp(&corpus_freq[&a.0])
                    .then_with(|| a.0.cmp(&b.0))
            });
            kept.truncate(training.max_features);
        }
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (index, (term, df)) in kept.into_iter().enumerate() {
            idf.push(((1 + n_docs) as f64 / (1 + df) as f64).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        TfidfVectorizer { vocabulary, idf }
    }

    /// Map one text to a sparse vector of `(feature index, weight)` pairs,
    /// sorted by index. Weights are raw term count times IDF, then the
    /// whole vector is L2-normalized. An all-zero vector stays all-zero.
    pub fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in tokenizer::terms(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut features: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();
        features.sort_by_key(|&(index, _)| index);

        let norm = features
            .iter()
            .map(|&(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for feature in &mut features {
                feature.1 /= norm;
            }
        }
        features
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }
}
