//! Multinomial Naive Bayes over sparse TF-IDF vectors.
//!
//! Everything stays in log space until the final squash, so long inputs
//! cannot underflow the probabilities to zero. Smoothing keeps terms that
//! one class never saw from vetoing that class outright.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultinomialNb {
    log_prior_spam: f64,
    log_prior_ham: f64,
    /// Per-feature log likelihood, indexed by the vectorizer's feature
    /// index. Both vectors always have the same length.
    log_prob_spam: Vec<f64>,
    log_prob_ham: Vec<f64>,
}

impl MultinomialNb {
    /// Fit from sparse training vectors and their labels.
    ///
    /// `features` and `labels` run in parallel, every sparse index must be
    /// below `n_features`, and both classes must be present; the caller
    /// checks those before fitting.
    pub fn fit(
        features: &[Vec<(usize, f64)>],
        labels: &[bool],
        n_features: usize,
        smoothing: f64,
    ) -> MultinomialNb {
        let mut spam_docs = 0usize;
        let mut ham_docs = 0usize;
        let mut spam_counts = vec![0.0f64; n_features];
        let mut ham_counts = vec![0.0f64; n_features];

        for (vector, &is_spam) in features.iter().zip(labels) {
            if is_spam {
                spam_docs += 1;
            } else {
                ham_docs += 1;
            }
            let counts = if is_spam {
                &mut spam_counts
            } else {
                &mut ham_counts
            };
            for &(index, weight) in vector {
                counts[index] += weight;
            }
        }

        let total_docs = (spam_docs + ham_docs) as f64;
        let spam_denom = spam_counts.iter().sum::<f64>() + smoothing * n_features as f64;
        let ham_denom = ham_counts.iter().sum::<f64>() + smoothing * n_features as f64;

        MultinomialNb {
            log_prior_spam: (spam_docs as f64 / total_docs).ln(),
            log_prior_ham: (ham_docs as f64 / total_docs).ln(),
            log_prob_spam: spam_counts
                .iter()
                .map(|count| ((count + smoothing) / spam_denom).ln())
                .collect(),
            log_prob_ham: ham_counts
                .iter()
                .map(|count| ((count + smoothing) / ham_denom).ln())
                .collect(),
        }
    }

    /// Score one sparse vector. Returns the verdict and the spam
    /// probability; a dead tie in the joint log likelihoods counts as ham.
    pub fn predict(&self, features: &[(usize, f64)]) -> (bool, f64) {
        let mut jll_spam = self.log_prior_spam;
        let mut jll_ham = self.log_prior_ham;
        for &(index, weight) in features {
            jll_spam += weight * self.log_prob_spam[index];
            jll_ham += weight * self.log_prob_ham[index];
        }
        // Equivalent to exp(spam) / (exp(spam) + exp(ham)) but safe when
        // the raw likelihoods are far below the exp underflow range.
        let probability_spam = 1.0 / (1.0 + (jll_ham - jll_spam).exp());
        (jll_spam > jll_ham, probability_spam)
    }

    pub fn n_features(&self) -> usize {
        self.log_prob_spam.len()
    }
}
