//! Text analysis front-end shared by training and prediction.
//!
//! Turns raw text into the terms the vectorizer counts: lowercased word
//! tokens of two or more characters, minus English stop words, plus the
//! bigrams formed from adjacent surviving tokens. Stop words are removed
//! before bigram construction, so a bigram can bridge a removed stop word
//! ("free" + "the" + "money" yields the bigram "free money").

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Word characters only, minimum length two. Single letters and digits
/// never become tokens; punctuation always splits.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// The classic frozen English stop-word list used by text pipelines.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together",
    "too", "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your",
    "yours", "yourself", "yourselves",
];

/// Lowercase the text and split it into word tokens of length two or more.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Produce the full term sequence for one document: stop-filtered unigrams
/// followed by the bigrams over those same surviving tokens, each bigram
/// joined with a single space.
pub fn terms(text: &str) -> Vec<String> {
    let kept: Vec<String> = tokenize(text)
        .into_iter()
        .filter(|token| !STOP_WORDS.contains(token.as_str()))
        .collect();

    let mut terms = Vec::with_capacity(kept.len() * 2);
    terms.extend(kept.iter().cloned());
    for pair in kept.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits_on_punctuation() {
        let tokens = tokenize("WIN Cash!!!now");
        assert_eq!(tokens, vec!["win", "cash", "now"]);
    }

    #[test]
    fn test_tokenize_drops_single_character_tokens() {
        let tokens = tokenize("I won a prize 4 u x9");
        assert_eq!(tokens, vec!["won", "prize", "x9"]);
    }

    #[test]
    fn test_tokenize_empty_text() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   !?!   ").is_empty());
    }

    #[test]
    fn test_terms_removes_stop_words() {
        let terms = terms("the cash is in the account");
        assert!(terms.contains(&"cash".to_string()));
        assert!(terms.contains(&"account".to_string()));
        assert!(!terms.contains(&"the".to_string()));
        assert!(!terms.contains(&"is".to_string()));
        assert!(!terms.contains(&"in".to_string()));
    }

    #[test]
    fn test_bigrams_bridge_removed_stop_words() {
        // "the" disappears before pairing, so "free" and "money" become
        // adjacent and form a bigram.
        let terms = terms("free the money");
        assert_eq!(terms, vec!["free", "money", "free money"]);
    }

    #[test]
    fn test_bigrams_follow_token_order() {
        let terms = terms("claim your cash prize");
        assert_eq!(
            terms,
            vec!["claim", "cash", "prize", "claim cash", "cash prize"]
        );
    }

    #[test]
    fn test_single_surviving_token_has_no_bigrams() {
        assert_eq!(terms("the winner is"), vec!["winner"]);
    }

    #[test]
    fn test_all_stop_words_yields_nothing() {
        assert!(terms("to be or not to be").is_empty());
    }

    #[test]
    fn test_unicode_word_characters_are_kept() {
        let tokens = tokenize("gagné un prix");
        assert_eq!(tokens, vec!["gagné", "un", "prix"]);
    }
}
