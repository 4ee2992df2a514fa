pub mod bayes;
pub mod config;
pub mod corpus;
pub mod detector;
pub mod error;
pub mod model;
pub mod patterns;
pub mod tokenizer;
pub mod vectorizer;

pub use config::{Config, TrainingConfig};
pub use detector::{ClassificationResult, SpamDetector, HAM_LABEL, SPAM_LABEL};
pub use error::{ClassifyError, ModelStoreError, TrainingError};
pub use model::{EvalReport, SpamModel};
pub use patterns::{PatternScan, PatternSet};
