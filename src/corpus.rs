//! Training corpus loading, synthetic augmentation, and the seeded
//! train/holdout split.
//!
//! The corpus file is label-first CSV ("spam,..." / "ham,...") decoded as
//! latin-1, the encoding the common SMS spam dumps ship in. Only the label
//! and the first message field matter; trailing columns are ignored.
//! Malformed lines are skipped with a warning rather than failing the
//! whole load.

use crate::error::TrainingError;
use crate::patterns::PatternSet;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;

/// One labeled training document.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub text: String,
    pub is_spam: bool,
}

impl TrainingExample {
    pub fn spam(text: &str) -> TrainingExample {
        TrainingExample {
            text: text.to_string(),
            is_spam: true,
        }
    }

    pub fn ham(text: &str) -> TrainingExample {
        TrainingExample {
            text: text.to_string(),
            is_spam: false,
        }
    }
}

/// Read and parse the corpus file. Fails only when the file cannot be
/// read at all or yields zero usable examples.
pub fn load_corpus(path: &Path) -> Result<Vec<TrainingExample>, TrainingError> {
    let bytes = std::fs::read(path).map_err(|source| TrainingError::CorpusUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let content = decode_latin1(&bytes);

    let mut examples = Vec::new();
    let mut skipped = 0usize;
    for (line_no, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        // Kaggle-style dumps carry a "v1,v2,..." header row.
        if line_no == 0 && line.to_ascii_lowercase().starts_with("v1,") {
            continue;
        }
        let Some((label, rest)) = line.split_once(',') else {
            log::warn!("corpus line {}: no label delimiter, skipping", line_no + 1);
            skipped += 1;
            continue;
        };
        let is_spam = match label.trim().to_ascii_lowercase().as_str() {
            "spam" => true,
            "ham" => false,
            other => {
                log::warn!(
                    "corpus line {}: unknown label {:?}, skipping",
                    line_no + 1,
                    other
                );
                skipped += 1;
                continue;
            }
        };
        let text = parse_message_field(rest);
        if text.is_empty() {
            log::debug!("corpus line {}: empty message, skipping", line_no + 1);
            skipped += 1;
            continue;
        }
        examples.push(TrainingExample { text, is_spam });
    }

    if skipped > 0 {
        log::warn!("skipped {skipped} unusable corpus lines");
    }
    if examples.is_empty() {
        return Err(TrainingError::EmptyCorpus {
            path: path.to_path_buf(),
        });
    }
    Ok(examples)
}

/// Append one synthetic spam example per configured phrase. This keeps
/// every phrase represented in the model vocabulary even when the corpus
/// happens not to contain it.
pub fn augment_with_patterns(examples: &mut Vec<TrainingExample>, patterns: &PatternSet) {
    for pattern in patterns.iter() {
        examples.push(TrainingExample::spam(&format!("Get {pattern} now!")));
    }
}

/// Shuffle with a seeded generator and split off the holdout. Returns
/// `(train, holdout)`; the holdout size is the fraction rounded up, so a
/// non-empty corpus always yields a non-empty holdout.
pub fn split_corpus(
    mut examples: Vec<TrainingExample>,
    holdout_fraction: f64,
    seed: u64,
) -> (Vec<TrainingExample>, Vec<TrainingExample>) {
    let mut rng = StdRng::seed_from_u64(seed);
    examples.shuffle(&mut rng);
    let holdout_len = ((examples.len() as f64) * holdout_fraction).ceil() as usize;
    let holdout_len = holdout_len.min(examples.len());
    let train = examples.split_off(holdout_len);
    (train, examples)
}

/// Latin-1 maps every byte to the code point of the same value, so this
/// decode never fails and never merges bytes.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Extract the message column that follows the label. Handles the two CSV
/// shapes that occur in the wild: a double-quoted field with `""` escapes
/// (which may contain commas), or a bare field ending at the next comma.
/// Anything after the field is a trailing column and is dropped.
fn parse_message_field(rest: &str) -> String {
    if let Some(quoted) = rest.strip_prefix('"') {
        let mut message = String::new();
        let mut chars = quoted.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    message.push('"');
                    chars.next();
                } else {
                    break;
                }
            } else {
                message.push(c);
            }
        }
        message
    } else {
        match rest.split_once(',') {
            Some((field, _)) => field.to_string(),
            None => rest.to_string(),
        }
    }
}

/// Small built-in corpus backing the CLI demo mode and the classifier
/// tests. Vocabulary is deliberately repetitive so that the key terms
/// survive the document-frequency pruning even after the holdout split.
pub fn sample_messages() -> Vec<TrainingExample> {
    let ham = [
        "Hi, are you coming home for dinner tonight?",
        "What's for dinner? I'm starving",
        "Dinner at seven works for me, see you then",
        "Hi, dinner is ready, come home soon",
        "The meeting moved to 3pm tomorrow",
        "See you at the meeting tomorrow morning",
        "Thanks for sending the documents yesterday",
        "The documents are attached, let me know if anything is missing",
        "Can you pick up milk on the way home?",
        "I will be home late tonight, trains are delayed",
        "Hi mate, fancy a coffee this afternoon?",
        "Happy birthday! Hope you have a lovely day",
        "Let me know when your train gets in",
        "Good luck with the exam tomorrow",
        "Are we still on for lunch today?",
        "The kids are asleep, call me in the morning",
        "Running ten minutes late, sorry",
        "Did you feed the cat before you left?",
        "My phone battery is nearly dead, talk later",
        "Doctor's appointment is at half past nine",
        "Remember to bring your umbrella, rain forecast all day",
        "Just landed, will call you from the taxi",
        "The plumber is coming between two and four",
        "Movie starts at eight, meet outside the cinema",
        "Can you send me the recipe for that pasta?",
        "Mum says hello, she misses you",
        "Traffic is terrible, might be twenty minutes late",
        "Did you remember to lock the back door?",
        "Lovely seeing you yesterday, we should do it again",
        "The boiler is fixed, engineer just left",
        "Homework is done, heading to bed now",
        "Pick me up from the station at six please",
        "Your parcel arrived, left it on the kitchen table",
        "Shall we walk the dog before it gets dark?",
        "Great game last night, we should go again",
        "The wifi is down again, calling the provider",
        "Table booked for four people at eight",
        "Don't forget your sister's recital on Thursday",
        "I'm in the library, text me when you arrive",
        "Car passed its inspection, picking it up at five",
        "Leftovers are in the fridge if you're hungry",
        "Meeting ran long, heading home now",
        "Can you email me the holiday photos?",
        "The garden looks great after the rain",
        "New neighbours seem friendly, they said hi",
        "Bring a jacket, it's chilly out tonight",
        "Dad fixed the bike, good as new",
        "Quiz night is cancelled this week, pub was double booked",
        "Soup is on the stove, help yourself",
        "Hi love, home in twenty minutes",
        "Dinner smells amazing, almost home",
    ];
    let spam = [
        "URGENT! You have won a cash prize, claim your free reward now",
        "Congratulations, you have won our lottery draw, lucky winner!",
        "FREE entry in a weekly competition to win top prizes",
        "Limited offer: instant cash loans with no credit checks",
        "Earn money from home, no experience needed, start today",
        "You have won a guaranteed cash prize, call now to claim",
        "Get a free discount voucher worth 500 dollars today",
        "Urgent: your prize money is waiting, reply to claim now",
        "Win big at our online casino, free spins when you subscribe",
        "Cheap viagra and weight loss pills at discount prices",
        "Invest in bitcoin today, double your money guaranteed",
        "Final notice: claim your free membership before the offer expires",
    ];

    let mut examples: Vec<TrainingExample> = Vec::with_capacity(ham.len() + spam.len());
    examples.extend(ham.iter().map(|t| TrainingExample::ham(t)));
    examples.extend(spam.iter().map(|t| TrainingExample::spam(t)));
    examples
}
