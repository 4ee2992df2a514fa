//! Error types for the classification core.
//!
//! The classify path, the artifact store, and the training sequence each
//! fail in their own narrow ways, and callers are expected to branch on
//! them: empty input maps to a client error, a missing artifact triggers
//! training, a corrupt artifact triggers training plus a loud warning,
//! and any training failure is fatal to initialization.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by `classify` and `predict`.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The caller supplied an empty string. Raised before either
    /// sub-component runs; the request layer maps this to a 4xx response.
    #[error("empty text provided")]
    EmptyText,

    /// Malformed model state discovered at prediction time. The request
    /// layer maps this to a 5xx response; the core never retries.
    #[error("internal classifier failure: {0}")]
    Internal(String),
}

/// Errors raised when loading the persisted model artifact.
#[derive(Debug, Error)]
pub enum ModelStoreError {
    /// No artifact exists at the path. Expected on first run;
    /// initialization falls back to training.
    #[error("model artifact not found at {}", .path.display())]
    Missing { path: PathBuf },

    /// An artifact exists but cannot be read, decoded, or shape-validated.
    /// Initialization still falls back to training, but this case is
    /// logged at warn level since it usually means a deployment problem.
    #[error("model artifact at {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
}

/// Errors raised by the train-and-persist sequence. Every variant is
/// fatal to initialization: the detector never serves predictions from an
/// untrained model.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("training corpus unavailable at {}: {source}", .path.display())]
    CorpusUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("training corpus at {} contains no usable examples", .path.display())]
    EmptyCorpus { path: PathBuf },

    #[error("train split contains no {0} examples; both classes are required to fit the classifier")]
    MissingClass(&'static str),

    #[error("vocabulary is empty after pruning; the corpus is too small for the configured document-frequency floors")]
    EmptyVocabulary,

    #[error("failed to persist model artifact to {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
