// Unit tests for text preprocessing and vectorizer loading.
//
// Tests the invariants of `preprocess` over a spread of realistic post
// texts, and the idempotence of loading a vectorizer artifact from disk.

use tempfile::TempDir;

use tonecheck::error::Error;
use tonecheck::text::preprocess::{is_stopword, USER_PLACEHOLDER};
use tonecheck::text::{preprocess, preprocess_default, Lemmatizer};
use tonecheck::vectorizer::load_vectorizer;

const SAMPLES: &[&str] = &[
    "Hello world",
    "RT @user: The FAKE NEWS media is working overtime!!! #MAGA",
    "Great meeting with @user today in the Oval Office. Jobs, jobs, jobs!",
    "Thank you Ohio 🇺🇸 see you in 2020",
    "we're winning, they're losing... it's that simple",
    "user user USER",
    "",
    "   \t\n",
    "http://t.co/abc123 https://t.co/XYZ",
    "Über schöne Grüße aus München",
];

// ============================================================
// preprocess: invariants
// ============================================================

#[test]
fn output_has_no_stopwords_placeholder_or_non_alpha() {
    for text in SAMPLES {
        for token in preprocess_default(text) {
            assert!(!is_stopword(&token), "stopword {token:?} from {text:?}");
            assert_ne!(token, USER_PLACEHOLDER, "placeholder from {text:?}");
            assert!(
                token.chars().all(char::is_alphabetic),
                "non-alphabetic {token:?} from {text:?}"
            );
        }
    }
}

#[test]
fn preprocess_is_deterministic() {
    for text in SAMPLES {
        assert_eq!(preprocess_default(text), preprocess_default(text));
    }
}

#[test]
fn blank_input_yields_empty_sequence() {
    assert!(preprocess_default("").is_empty());
    assert!(preprocess_default("   \t\n").is_empty());
}

#[test]
fn order_is_preserved() {
    let out = preprocess_default("Tremendous crowds cheering loudly");
    let crowd = out.iter().position(|t| t == "crowd");
    let cheer = out.iter().position(|t| t == "cheer");
    assert!(crowd.is_some() && cheer.is_some(), "got {out:?}");
    assert!(crowd < cheer);
}

#[test]
fn wordnet_backend_used_when_corpus_present() {
    let dir = TempDir::new().unwrap();
    let wordnet = dir.path().join("corpora").join("wordnet");
    std::fs::create_dir_all(&wordnet).unwrap();
    std::fs::write(wordnet.join("index.verb"), "  1 license\ncheer v 1 0\n").unwrap();
    std::fs::write(wordnet.join("verb.exc"), "").unwrap();

    let lemmatizer = Lemmatizer::from_wordnet_dir(dir.path()).unwrap();
    assert!(lemmatizer.is_wordnet());
    // "crowds" is not in this tiny verb index, so it stays as written
    assert_eq!(
        preprocess("crowds cheering", &lemmatizer),
        vec!["crowds".to_string(), "cheer".to_string()]
    );
}

#[test]
fn missing_corpus_is_artifact_error() {
    let dir = TempDir::new().unwrap();
    let err = Lemmatizer::from_wordnet_dir(dir.path()).unwrap_err();
    assert!(matches!(err, Error::ArtifactLoad(_)));
}

// ============================================================
// load_vectorizer: idempotence and failures
// ============================================================

#[test]
fn loading_twice_gives_identical_vectors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tfidf.json");
    std::fs::write(
        &path,
        r#"{"vocabulary": {"jobs": 0, "news": 1, "fake": 2}, "idf": [1.2, 1.0, 2.5]}"#,
    )
    .unwrap();

    let a = load_vectorizer(&path).unwrap();
    let b = load_vectorizer(&path).unwrap();
    assert_eq!(a.vocabulary_size(), 3);

    for text in SAMPLES {
        assert_eq!(a.transform(text).unwrap(), b.transform(text).unwrap());
    }
    // The file is only read
    assert!(path.exists());
}

#[test]
fn missing_artifact_is_load_error() {
    let dir = TempDir::new().unwrap();
    let err = load_vectorizer(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, Error::ArtifactLoad(_)));
}

#[test]
fn incompatible_artifact_is_load_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tfidf.pkl");
    std::fs::write(&path, [0x80, 0x04, 0x95, 0x00]).unwrap();
    let err = load_vectorizer(&path).unwrap_err();
    assert!(matches!(err, Error::ArtifactLoad(_)));
}
