//! The trained model: a fitted vectorizer and classifier that are always
//! trained, persisted, and loaded as one unit, so the classifier can never
//! meet a feature space it was not fitted against.

use crate::bayes::MultinomialNb;
use crate::config::TrainingConfig;
use crate::corpus::TrainingExample;
use crate::error::{ClassifyError, ModelStoreError, TrainingError};
use crate::vectorizer::TfidfVectorizer;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpamModel {
    vectorizer: TfidfVectorizer,
    classifier: MultinomialNb,
}

/// Confusion counts from scoring a labeled holdout.
#[derive(Debug, Clone, Default)]
pub struct EvalReport {
    pub examples: usize,
    pub correct: usize,
    pub actual_spam: usize,
    pub predicted_spam: usize,
    pub true_positives: usize,
}

impl EvalReport {
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.examples)
    }

    /// Of everything predicted spam, how much really was.
    pub fn spam_precision(&self) -> f64 {
        ratio(self.true_positives, self.predicted_spam)
    }

    /// Of the real spam, how much was caught.
    pub fn spam_recall(&self) -> f64 {
        ratio(self.true_positives, self.actual_spam)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl SpamModel {
    /// Fit the vectorizer and classifier on the given examples. Both
    /// classes must be present, and pruning must leave a non-empty
    /// vocabulary; otherwise nothing useful can be learned.
    pub fn train(
        examples: &[TrainingExample],
        training: &TrainingConfig,
    ) -> Result<SpamModel, TrainingError> {
        if !examples.iter().any(|e| e.is_spam) {
            return Err(TrainingError::MissingClass("spam"));
        }
        if !examples.iter().any(|e| !e.is_spam) {
            return Err(TrainingError::MissingClass("ham"));
        }

        let documents: Vec<String> = examples.iter().map(|e| e.text.clone()).collect();
        let vectorizer = TfidfVectorizer::fit(&documents, training);
        if vectorizer.vocabulary_size() == 0 {
            return Err(TrainingError::EmptyVocabulary);
        }

        let features: Vec<Vec<(usize, f64)>> = documents
            .iter()
            .map(|document| vectorizer.transform(document))
            .collect();
        let labels: Vec<bool> = examples.iter().map(|e| e.is_spam).collect();
        let classifier = MultinomialNb::fit(
            &features,
            &labels,
            vectorizer.vocabulary_size(),
            training.smoothing,
        );

        Ok(SpamModel {
            vectorizer,
            classifier,
        })
    }

    /// Score one text. Returns the raw model verdict and the spam
    /// probability, before any phrase heuristics are applied.
    pub fn predict(&self, text: &str) -> Result<(bool, f64), ClassifyError> {
        if text.is_empty() {
            return Err(ClassifyError::EmptyText);
        }
        if self.vectorizer.vocabulary_size() != self.classifier.n_features() {
            return Err(ClassifyError::Internal(format!(
                "feature dimension mismatch: vectorizer has {} terms, classifier expects {}",
                self.vectorizer.vocabulary_size(),
                self.classifier.n_features()
            )));
        }
        let features = self.vectorizer.transform(text);
        let (is_spam, probability_spam) = self.classifier.predict(&features);
        if !probability_spam.is_finite() {
            return Err(ClassifyError::Internal(
                "non-finite spam probability".to_string(),
            ));
        }
        Ok((is_spam, probability_spam))
    }

    /// Score a labeled holdout and tally the confusion counts.
    pub fn evaluate(&self, holdout: &[TrainingExample]) -> EvalReport {
        let mut report = EvalReport::default();
        for example in holdout {
            let Ok((predicted_spam, _)) = self.predict(&example.text) else {
                continue;
            };
            report.examples += 1;
            if example.is_spam {
                report.actual_spam += 1;
            }
            if predicted_spam {
                report.predicted_spam += 1;
            }
            if predicted_spam && example.is_spam {
                report.true_positives += 1;
            }
            if predicted_spam == example.is_spam {
                report.correct += 1;
            }
        }
        report
    }

    /// Write the artifact atomically: serialize into a sibling temp file,
    /// then rename over the target. A crash mid-write leaves the previous
    /// artifact intact.
    pub fn save(&self, path: &Path) -> Result<(), TrainingError> {
        let persist_err = |source: std::io::Error| TrainingError::Persist {
            path: path.to_path_buf(),
            source,
        };

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(persist_err)?;

        let temp = NamedTempFile::new_in(parent).map_err(persist_err)?;
        let mut writer = BufWriter::new(&temp);
        bincode::serialize_into(&mut writer, self)
            .map_err(|e| persist_err(std::io::Error::new(ErrorKind::Other, e)))?;
        writer.flush().map_err(persist_err)?;
        drop(writer);
        temp.persist(path).map_err(|e| persist_err(e.error))?;
        Ok(())
    }

    /// Read an artifact back. Distinguishes a file that simply is not
    /// there from one that exists but cannot be decoded; the caller treats
    /// those differently.
    pub fn load(path: &Path) -> Result<SpamModel, ModelStoreError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ModelStoreError::Missing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                return Err(ModelStoreError::Corrupt {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };
        // Decode from the fully read buffer: the slice reader checks every
        // length prefix against the remaining input, so garbage bytes fail
        // the decode instead of being trusted as allocation sizes.
        let model: SpamModel =
            bincode::deserialize(&bytes).map_err(|e| ModelStoreError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if model.vectorizer.vocabulary_size() == 0
            || model.vectorizer.vocabulary_size() != model.classifier.n_features()
        {
            return Err(ModelStoreError::Corrupt {
                path: path.to_path_buf(),
                reason: "vectorizer and classifier dimensions do not line up".to_string(),
            });
        }
        Ok(model)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }
}
