// Post text normalization: tokenize, drop noise tokens, remove stopwords,
// lemmatize.
//
// Every step is a pure function of its input. Malformed or empty text
// simply produces an empty token list.

use std::collections::HashSet;
use std::sync::OnceLock;

use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

use super::lemmatize::Lemmatizer;

/// Placeholder token that masks usernames in the training corpus.
pub const USER_PLACEHOLDER: &str = "user";

/// Lowercased English stopword set, built once.
fn stopwords() -> &'static HashSet<String> {
    static STOPWORDS: OnceLock<HashSet<String>> = OnceLock::new();
    STOPWORDS.get_or_init(|| {
        get(LANGUAGE::English)
            .into_iter()
            .map(|w| w.to_lowercase())
            .collect()
    })
}

/// Whether `word` (any case) is an English stopword.
pub fn is_stopword(word: &str) -> bool {
    stopwords().contains(&word.to_lowercase())
}

/// English clitics split off the word they attach to, straight and
/// curly apostrophe forms.
const CLITICS: &[&str] = &[
    "n't", "n’t", "'s", "’s", "'re", "’re", "'ll", "’ll", "'ve", "’ve", "'d", "’d", "'m", "’m",
];

/// Split text into words. Punctuation, hashtag markers and mention
/// markers are discarded (`#tag` -> `tag`, `@someone` -> `someone`), and
/// clitics become their own token (`Hillary's` -> `Hillary`, `'s`).
pub fn tokenize(text: &str) -> Vec<&str> {
    text.unicode_words().flat_map(split_clitic).collect()
}

fn split_clitic(word: &str) -> Vec<&str> {
    let lower = word.to_lowercase();
    CLITICS
        .iter()
        .find(|c| lower.len() > c.len() && lower.ends_with(*c) && lower.len() == word.len())
        .map(|c| {
            let (stem, clitic) = word.split_at(word.len() - c.len());
            vec![stem, clitic]
        })
        .unwrap_or_else(|| vec![word])
}

/// Drop the username placeholder and any token containing a character
/// that is not alphabetic (digits, underscores, apostrophes, ...).
pub fn remove_noise<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    tokens
        .iter()
        .copied()
        .filter(|t| *t != USER_PLACEHOLDER)
        .filter(|t| t.chars().all(char::is_alphabetic))
        .collect()
}

/// Drop tokens that case-insensitively match an English stopword.
pub fn remove_stopwords<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    tokens.iter().copied().filter(|t| !is_stopword(t)).collect()
}

/// Normalize a post's raw text into its cleaned, lemmatized token sequence.
pub fn preprocess(raw_text: &str, lemmatizer: &Lemmatizer) -> Vec<String> {
    let tokens = tokenize(raw_text);
    let tokens = remove_noise(&tokens);
    let tokens = remove_stopwords(&tokens);
    // A lemma can land on a stopword or the placeholder ("users" -> "user").
    tokens
        .into_iter()
        .map(|t| lemmatizer.lemmatize_verb(t))
        .filter(|lemma| lemma != USER_PLACEHOLDER && !is_stopword(lemma))
        .collect()
}

/// `preprocess` with the built-in lemmatizer (no corpus on disk needed).
pub fn preprocess_default(raw_text: &str) -> Vec<String> {
    preprocess(raw_text, Lemmatizer::builtin_ref())
}
