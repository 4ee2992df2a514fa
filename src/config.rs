//! Runtime configuration: artifact and corpus locations, the spam phrase
//! list, and the training hyperparameters. Loaded from YAML; every field
//! has a usable default, so an empty file (or no file at all) yields the
//! stock setup.

use crate::patterns::PatternSet;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the serialized (vectorizer, classifier) pair lives.
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Labeled corpus used when the artifact is missing or corrupt.
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,

    /// Phrase heuristics. Also injected into training as one synthetic
    /// spam example per phrase.
    #[serde(default)]
    pub spam_patterns: PatternSet,

    #[serde(default)]
    pub training: TrainingConfig,
}

/// Hyperparameters for the vectorizer, the classifier, and the held-out
/// split. The defaults are the canonical values; changing them changes
/// what the artifact contains, so they live in config rather than code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Vocabulary cap. When pruning leaves more terms than this, the most
    /// frequent terms win.
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Minimum document count for a term to enter the vocabulary.
    #[serde(default = "default_min_df")]
    pub min_df: usize,

    /// Maximum document fraction for a term to stay in the vocabulary.
    #[serde(default = "default_max_df")]
    pub max_df: f64,

    /// Additive smoothing for the Naive Bayes feature counts.
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,

    /// Fraction of the corpus held out of training for validation.
    #[serde(default = "default_holdout_fraction")]
    pub holdout_fraction: f64,

    /// Seed for the shuffle behind the train/holdout split. Fixed so the
    /// split is reproducible across runs.
    #[serde(default = "default_shuffle_seed")]
    pub shuffle_seed: u64,
}

fn default_model_path() -> String {
    "models/spam-model.bin".to_string()
}

fn default_corpus_path() -> String {
    "data/spam.csv".to_string()
}

fn default_max_features() -> usize {
    5000
}

fn default_min_df() -> usize {
    2
}

fn default_max_df() -> f64 {
    0.95
}

fn default_smoothing() -> f64 {
    0.1
}

fn default_holdout_fraction() -> f64 {
    0.2
}

fn default_shuffle_seed() -> u64 {
    42
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model_path: default_model_path(),
            corpus_path: default_corpus_path(),
            spam_patterns: PatternSet::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            max_features: default_max_features(),
            min_df: default_min_df(),
            max_df: default_max_df(),
            smoothing: default_smoothing(),
            holdout_fraction: default_holdout_fraction(),
            shuffle_seed: default_shuffle_seed(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> Result<()> {
        let content =
            serde_yaml::to_string(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {path}"))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.model_path.is_empty() {
            bail!("model_path must not be empty");
        }
        if self.corpus_path.is_empty() {
            bail!("corpus_path must not be empty");
        }
        if self.spam_patterns.is_empty() {
            bail!("spam_patterns must contain at least one phrase");
        }
        self.training.validate()
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            bail!("training.max_features must be at least 1");
        }
        if self.min_df == 0 {
            bail!("training.min_df must be at least 1");
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            bail!("training.max_df must be in (0, 1]");
        }
        if self.smoothing <= 0.0 {
            bail!("training.smoothing must be positive");
        }
        if !(self.holdout_fraction > 0.0 && self.holdout_fraction < 1.0) {
            bail!("training.holdout_fraction must be in (0, 1)");
        }
        Ok(())
    }
}
