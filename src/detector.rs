//! The hybrid detector: a statistical model verdict blended with phrase
//! heuristics into one user-facing result.
//!
//! Initialization is explicit and does all the heavy lifting once: load
//! the persisted artifact, or train from the corpus and persist. After
//! that the detector is immutable and classification is pure computation,
//! safe to share across threads.

use crate::config::Config;
use crate::corpus::{self, TrainingExample};
use crate::error::{ClassifyError, ModelStoreError, TrainingError};
use crate::model::{EvalReport, SpamModel};
use crate::patterns::PatternSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Phrase hits at or above this count force the spam verdict.
const OVERRIDE_MIN_HITS: u32 = 2;
/// Confidence added per phrase hit when the override fires.
const PER_HIT_BOOST: f64 = 0.10;
/// Ceiling for boosted confidence; the verdict is never reported certain.
const CONFIDENCE_CAP: f64 = 0.99;

pub const SPAM_LABEL: &str = "This is a Spam Email!";
pub const HAM_LABEL: &str = "This is a Ham Email!";

/// The wire-facing classification outcome. `confidence` is a percentage
/// rounded to two decimals; `spam_indicators` is present only on spam
/// verdicts with at least one phrase hit, and is omitted from JSON
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub is_spam: bool,
    pub confidence: f64,
    pub prediction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spam_indicators: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct SpamDetector {
    model: SpamModel,
    patterns: PatternSet,
}

impl SpamDetector {
    /// Build a ready detector: load the artifact if it is present and
    /// sound, otherwise train from the corpus and persist the result. A
    /// corrupt artifact is replaced, loudly; a training failure is fatal.
    pub fn initialize(config: &Config) -> Result<SpamDetector, TrainingError> {
        let model = match SpamModel::load(Path::new(&config.model_path)) {
            Ok(model) => {
                log::info!(
                    "loaded model artifact from {} ({} terms)",
                    config.model_path,
                    model.vocabulary_size()
                );
                model
            }
            Err(ModelStoreError::Missing { .. }) => {
                log::info!(
                    "no model artifact at {}, training from corpus",
                    config.model_path
                );
                let (model, _) = Self::train_and_persist(config)?;
                model
            }
            Err(err @ ModelStoreError::Corrupt { .. }) => {
                log::warn!("{err}; retraining from corpus");
                let (model, _) = Self::train_and_persist(config)?;
                model
            }
        };
        Ok(SpamDetector {
            model,
            patterns: config.spam_patterns.clone(),
        })
    }

    /// Assemble a detector from already-built parts. Used by the demo and
    /// by callers that manage their own artifacts.
    pub fn from_parts(model: SpamModel, patterns: PatternSet) -> SpamDetector {
        SpamDetector { model, patterns }
    }

    /// Run the full training sequence: load the corpus, add the synthetic
    /// phrase examples, split, fit on the train portion only, score the
    /// holdout, and persist the artifact.
    pub fn train_and_persist(config: &Config) -> Result<(SpamModel, EvalReport), TrainingError> {
        let examples = corpus::load_corpus(Path::new(&config.corpus_path))?;
        let native = examples.len();
        let (train, holdout) = Self::training_split(examples, config);
        log::info!(
            "training on {} examples ({} from corpus), holding out {}",
            train.len(),
            native,
            holdout.len()
        );

        let model = SpamModel::train(&train, &config.training)?;
        log::info!("model fitted with {} vocabulary terms", model.vocabulary_size());
        let report = model.evaluate(&holdout);
        log::info!(
            "held-out validation: accuracy {:.3}, spam precision {:.3}, spam recall {:.3} on {} examples",
            report.accuracy(),
            report.spam_precision(),
            report.spam_recall(),
            report.examples
        );

        model.save(Path::new(&config.model_path))?;
        log::info!("model artifact written to {}", config.model_path);
        Ok((model, report))
    }

    /// Re-derive the holdout from the corpus and score the current model
    /// against it. The split is seeded, so this reproduces the partition
    /// used at training time as long as the corpus has not changed.
    pub fn evaluate_holdout(&self, config: &Config) -> Result<EvalReport, TrainingError> {
        let examples = corpus::load_corpus(Path::new(&config.corpus_path))?;
        let (_, holdout) = Self::training_split(examples, config);
        Ok(self.model.evaluate(&holdout))
    }

    fn training_split(
        mut examples: Vec<TrainingExample>,
        config: &Config,
    ) -> (Vec<TrainingExample>, Vec<TrainingExample>) {
        corpus::augment_with_patterns(&mut examples, &config.spam_patterns);
        corpus::split_corpus(
            examples,
            config.training.holdout_fraction,
            config.training.shuffle_seed,
        )
    }

    /// Classify one text.
    ///
    /// The model verdict comes first; two or more phrase hits then force
    /// spam and boost the confidence by a fixed step per hit, capped below
    /// certainty. A single hit changes nothing on its own.
    pub fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifyError> {
        if text.is_empty() {
            return Err(ClassifyError::EmptyText);
        }

        let (model_spam, probability_spam) = self.model.predict(text)?;
        let scan = self.patterns.scan(text);

        let mut is_spam = model_spam;
        let mut confidence = if model_spam {
            probability_spam
        } else {
            1.0 - probability_spam
        };
        if scan.score >= OVERRIDE_MIN_HITS {
            is_spam = true;
            confidence =
                (probability_spam + f64::from(scan.score) * PER_HIT_BOOST).min(CONFIDENCE_CAP);
        }
        log::debug!(
            "p(spam) {probability_spam:.4}, {} phrase hits, verdict spam={is_spam}",
            scan.score
        );

        let percent = (confidence * 100.0).clamp(0.0, 100.0);
        let percent = (percent * 100.0).round() / 100.0;

        let spam_indicators = if is_spam && !scan.matched.is_empty() {
            Some(scan.matched)
        } else {
            None
        };

        Ok(ClassificationResult {
            is_spam,
            confidence: percent,
            prediction: if is_spam { SPAM_LABEL } else { HAM_LABEL }.to_string(),
            spam_indicators,
        })
    }

    pub fn model(&self) -> &SpamModel {
        &self.model
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Detector trained in memory on the built-in sample corpus, through
    /// the same augment/split/fit path initialization uses.
    fn sample_detector() -> SpamDetector {
        let config = Config::default();
        let mut examples = corpus::sample_messages();
        corpus::augment_with_patterns(&mut examples, &config.spam_patterns);
        let (train, _) = corpus::split_corpus(
            examples,
            config.training.holdout_fraction,
            config.training.shuffle_seed,
        );
        let model = SpamModel::train(&train, &config.training).unwrap();
        SpamDetector::from_parts(model, config.spam_patterns)
    }

    #[test]
    fn test_obvious_spam_is_flagged() {
        let detector = sample_detector();
        let result = detector
            .classify("URGENT! You have won a 1 week FREE membership")
            .unwrap();
        assert!(result.is_spam);
        assert_eq!(result.prediction, SPAM_LABEL);
        assert!(result.confidence > 50.0);
        let indicators = result.spam_indicators.unwrap();
        assert!(indicators.contains(&"free".to_string()));
        assert!(indicators.contains(&"urgent".to_string()));
    }

    #[test]
    fn test_ordinary_message_is_ham() {
        let detector = sample_detector();
        let result = detector
            .classify("Hi, when will you be home for dinner?")
            .unwrap();
        assert!(!result.is_spam);
        assert_eq!(result.prediction, HAM_LABEL);
        assert!(result.confidence > 50.0);
        assert!(result.spam_indicators.is_none());
    }

    #[test]
    fn test_two_phrase_hits_force_spam() {
        let detector = sample_detector();
        // Ham-flavored wording around two phrases: the model alone calls
        // this ham, and the hits flip it.
        let text = "Dinner is at home tonight, free cake and a lottery raffle";
        let scan = detector.patterns().scan(text);
        assert_eq!(scan.matched, vec!["free", "lottery"]);
        assert!(!detector.model().predict(text).unwrap().0);

        let result = detector.classify(text).unwrap();
        assert!(result.is_spam);
        assert_eq!(result.prediction, SPAM_LABEL);
        assert_eq!(
            result.spam_indicators.unwrap(),
            vec!["free".to_string(), "lottery".to_string()]
        );
    }

    #[test]
    fn test_override_confidence_formula() {
        let detector = sample_detector();
        let text = "Get free now! Get win now! Get urgent now!";
        let scan = detector.patterns().scan(text);
        assert_eq!(scan.score, 3);

        let (_, probability_spam) = detector.model().predict(text).unwrap();
        let expected = (probability_spam + 3.0 * 0.10).min(0.99);
        let expected_percent = (expected * 100.0 * 100.0).round() / 100.0;

        let result = detector.classify(text).unwrap();
        assert!(result.is_spam);
        assert!((result.confidence - expected_percent).abs() < 1e-9);
    }

    #[test]
    fn test_single_phrase_hit_does_not_override() {
        let detector = sample_detector();
        // "free" alone inside an otherwise ordinary message: one hit is
        // below the override threshold, so the model verdict stands.
        let text = "Feel free to come by for dinner at home tonight";
        let scan = detector.patterns().scan(text);
        assert_eq!(scan.score, 1);

        let result = detector.classify(text).unwrap();
        assert!(!result.is_spam);
        assert!(result.spam_indicators.is_none());
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let detector = sample_detector();
        assert!(matches!(
            detector.classify(""),
            Err(ClassifyError::EmptyText)
        ));
    }

    #[test]
    fn test_whitespace_only_text_classifies() {
        let detector = sample_detector();
        let result = detector.classify("   \t  ").unwrap();
        assert!((0.0..=100.0).contains(&result.confidence));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let detector = sample_detector();
        let text = "Congratulations, you have won a free cash prize";
        let first = detector.classify(text).unwrap();
        let second = detector.classify(text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_confidence_bounds_across_inputs() {
        let detector = sample_detector();
        for text in [
            "free",
            "free cash prize urgent winner lottery casino",
            "completely unrelated words about gardening",
            "!@#$%^&*()_+ punctuation soup",
            "1234567890",
        ] {
            let result = detector.classify(text).unwrap();
            assert!(
                (0.0..=100.0).contains(&result.confidence),
                "confidence out of range for {text:?}: {}",
                result.confidence
            );
            let label = if result.is_spam { SPAM_LABEL } else { HAM_LABEL };
            assert_eq!(result.prediction, label);
        }
    }

    #[test]
    fn test_very_long_input() {
        let detector = sample_detector();
        let text = "This is a test ".repeat(1000);
        let result = detector.classify(&text).unwrap();
        assert!((0.0..=100.0).contains(&result.confidence));
    }

    #[test]
    fn test_indicators_are_substrings_of_input() {
        let detector = sample_detector();
        let text = "URGENT winner: free cash prize, congratulations!";
        let result = detector.classify(text).unwrap();
        assert!(result.is_spam);
        let lowered = text.to_lowercase();
        for indicator in result.spam_indicators.unwrap() {
            assert!(lowered.contains(&indicator.to_lowercase()));
        }
    }

    #[test]
    fn test_json_omits_indicators_for_ham() {
        let detector = sample_detector();
        let result = detector
            .classify("Hi, when will you be home for dinner?")
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("spam_indicators"));
        assert_eq!(object["prediction"], HAM_LABEL);
        assert_eq!(object["is_spam"], false);
    }

    #[test]
    fn test_json_includes_indicators_for_spam() {
        let detector = sample_detector();
        let result = detector
            .classify("URGENT! You have won a free cash prize")
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        let object = json.as_object().unwrap();
        let indicators = object["spam_indicators"].as_array().unwrap();
        assert!(!indicators.is_empty());
        assert!(object["confidence"].is_number());
    }

    #[test]
    fn test_initialize_trains_then_loads() {
        let dir = TempDir::new().unwrap();
        let config = temp_config(&dir);
        write_sample_corpus(&config);

        // First pass: no artifact, so this trains and persists.
        let detector = SpamDetector::initialize(&config).unwrap();
        assert!(Path::new(&config.model_path).exists());
        let trained = detector.classify("free cash prize now").unwrap();

        // Second pass: remove the corpus; only a successful artifact load
        // can explain initialization still working.
        std::fs::remove_file(&config.corpus_path).unwrap();
        let reloaded = SpamDetector::initialize(&config).unwrap();
        let loaded = reloaded.classify("free cash prize now").unwrap();
        assert_eq!(trained, loaded);
    }

    #[test]
    fn test_initialize_retrains_over_corrupt_artifact() {
        let dir = TempDir::new().unwrap();
        let config = temp_config(&dir);
        write_sample_corpus(&config);
        std::fs::write(&config.model_path, b"garbage artifact").unwrap();

        let detector = SpamDetector::initialize(&config).unwrap();
        let result = detector.classify("free cash prize now").unwrap();
        assert!(result.is_spam);
        // The rewritten artifact must now load cleanly.
        assert!(SpamModel::load(Path::new(&config.model_path)).is_ok());
    }

    #[test]
    fn test_initialize_fails_without_corpus_or_artifact() {
        let dir = TempDir::new().unwrap();
        let config = temp_config(&dir);
        let err = SpamDetector::initialize(&config).unwrap_err();
        assert!(matches!(err, TrainingError::CorpusUnavailable { .. }));
    }

    #[test]
    fn test_evaluate_holdout_reports_counts() {
        let dir = TempDir::new().unwrap();
        let config = temp_config(&dir);
        write_sample_corpus(&config);
        let detector = SpamDetector::initialize(&config).unwrap();
        let report = detector.evaluate_holdout(&config).unwrap();
        assert!(report.examples > 0);
        assert!(report.correct <= report.examples);
    }

    fn temp_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.model_path = dir
            .path()
            .join("model.bin")
            .to_string_lossy()
            .into_owned();
        config.corpus_path = dir
            .path()
            .join("spam.csv")
            .to_string_lossy()
            .into_owned();
        config
    }

    /// Write the built-in sample corpus out as a CSV file, quoting fields
    /// that contain commas or quotes.
    fn write_sample_corpus(config: &Config) {
        let mut lines = String::new();
        for example in corpus::sample_messages() {
            let label = if example.is_spam { "spam" } else { "ham" };
            let field = if example.text.contains(',') || example.text.contains('"') {
                format!("\"{}\"", example.text.replace('"', "\"\""))
            } else {
                example.text.clone()
            };
            lines.push_str(&format!("{label},{field}\n"));
        }
        std::fs::write(&config.corpus_path, lines).unwrap();
    }

    #[test]
    fn test_train_and_persist_reports_and_writes() {
        let dir = TempDir::new().unwrap();
        let config = temp_config(&dir);
        write_sample_corpus(&config);

        let (model, report) = SpamDetector::train_and_persist(&config).unwrap();
        assert!(model.vocabulary_size() > 0);
        assert!(report.examples > 0);
        assert!(Path::new(&config.model_path).exists());
    }
}
