// Verb lemmatization.
//
// Two backends. The WordNet backend reads `verb.exc` and `index.verb` from a
// local corpus directory and runs WordNet's morphological substitution
// rules, only accepting candidates that exist in the verb index. The
// built-in backend needs no files: it knows the common irregular verbs and
// applies conservative suffix rules.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// WordNet's verb suffix substitutions, in the order WordNet applies them.
const VERB_SUBSTITUTIONS: [(&str, &str); 8] = [
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

/// Irregular inflections known to the built-in backend.
const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("am", "be"),
    ("are", "be"),
    ("is", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("has", "have"),
    ("had", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("made", "make"),
    ("said", "say"),
    ("says", "say"),
    ("got", "get"),
    ("gotten", "get"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("took", "take"),
    ("taken", "take"),
    ("saw", "see"),
    ("seen", "see"),
    ("came", "come"),
    ("gave", "give"),
    ("given", "give"),
    ("told", "tell"),
    ("found", "find"),
    ("felt", "feel"),
    ("left", "leave"),
    ("kept", "keep"),
    ("began", "begin"),
    ("begun", "begin"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("built", "build"),
    ("sent", "send"),
    ("spent", "spend"),
    ("lost", "lose"),
    ("paid", "pay"),
    ("met", "meet"),
    ("ran", "run"),
    ("won", "win"),
    ("held", "hold"),
    ("stood", "stand"),
    ("understood", "understand"),
    ("wrote", "write"),
    ("written", "write"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("broke", "break"),
    ("broken", "break"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("led", "lead"),
    ("fought", "fight"),
    ("caught", "catch"),
    ("taught", "teach"),
    ("sold", "sell"),
    ("heard", "hear"),
    ("meant", "mean"),
    ("became", "become"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("threw", "throw"),
    ("thrown", "throw"),
    ("flew", "fly"),
    ("flown", "fly"),
    ("forgot", "forget"),
    ("forgotten", "forget"),
    ("ate", "eat"),
    ("eaten", "eat"),
    ("rose", "rise"),
    ("risen", "rise"),
    ("hid", "hide"),
    ("hidden", "hide"),
    ("stole", "steal"),
    ("stolen", "steal"),
    ("swore", "swear"),
    ("sworn", "swear"),
    ("woke", "wake"),
    ("woken", "wake"),
];

/// Words ending in `s` that are never a verb inflection. The built-in
/// backend has no lexicon, so these are left as written.
const NOT_VERB_INFLECTIONS: &[&str] = &[
    "always",
    "afterwards",
    "besides",
    "news",
    "nowadays",
    "ourselves",
    "perhaps",
    "series",
    "sometimes",
    "species",
    "themselves",
    "towards",
    "yourselves",
];

/// Endings of `s`-final words that stay untouched (`boss`, `status`,
/// `crisis`, `Texas`, `chaos`, `politics`).
const KEEP_S_ENDINGS: [&str; 6] = ["ss", "us", "is", "as", "os", "ics"];

#[derive(Debug)]
enum Backend {
    Builtin,
    WordNet {
        exceptions: HashMap<String, Vec<String>>,
        lemmas: HashSet<String>,
    },
}

/// Reduces inflected verb forms to their base form.
#[derive(Debug)]
pub struct Lemmatizer {
    backend: Backend,
}

static BUILTIN: Lemmatizer = Lemmatizer {
    backend: Backend::Builtin,
};

impl Lemmatizer {
    /// Lemmatizer that needs no corpus files.
    pub fn builtin() -> Self {
        Self {
            backend: Backend::Builtin,
        }
    }

    /// Shared instance of the built-in lemmatizer.
    pub fn builtin_ref() -> &'static Self {
        &BUILTIN
    }

    /// Build a WordNet lemmatizer from the contents of `verb.exc` and
    /// `index.verb`.
    pub fn from_wordnet_data(verb_exc: &str, index_verb: &str) -> Self {
        let mut exceptions: HashMap<String, Vec<String>> = HashMap::new();
        for line in verb_exc.lines() {
            let mut parts = line.split_whitespace();
            if let Some(form) = parts.next() {
                let bases: Vec<String> = parts.map(String::from).collect();
                if !bases.is_empty() {
                    exceptions.entry(form.to_string()).or_default().extend(bases);
                }
            }
        }

        // The index file starts with an indented license header.
        let lemmas: HashSet<String> = index_verb
            .lines()
            .filter(|line| !line.starts_with(' '))
            .filter_map(|line| line.split_whitespace().next())
            .map(String::from)
            .collect();

        Self {
            backend: Backend::WordNet { exceptions, lemmas },
        }
    }

    /// Load WordNet verb data from a corpus directory.
    ///
    /// Looks in `dir`, `dir/wordnet` and `dir/corpora/wordnet`.
    pub fn from_wordnet_dir(dir: &Path) -> Result<Self> {
        let wordnet_dir = wordnet_candidates(dir)
            .into_iter()
            .find(|d| d.join("index.verb").is_file())
            .ok_or_else(|| {
                Error::ArtifactLoad(format!(
                    "WordNet index.verb not found under {}",
                    dir.display()
                ))
            })?;

        let index = std::fs::read_to_string(wordnet_dir.join("index.verb")).map_err(|e| {
            Error::ArtifactLoad(format!("Failed to read {}: {e}", wordnet_dir.display()))
        })?;
        // verb.exc is optional; without it only the suffix rules apply.
        let exc = std::fs::read_to_string(wordnet_dir.join("verb.exc")).unwrap_or_default();

        debug!(dir = %wordnet_dir.display(), "Loaded WordNet verb data");
        Ok(Self::from_wordnet_data(&exc, &index))
    }

    /// Load WordNet data if present, otherwise fall back to the built-in
    /// rules with a warning.
    pub fn load_or_builtin(dir: &Path) -> Self {
        match Self::from_wordnet_dir(dir) {
            Ok(lemmatizer) => lemmatizer,
            Err(e) => {
                warn!(error = %e, "Using built-in lemmatizer");
                Self::builtin()
            }
        }
    }

    /// Whether this lemmatizer is backed by WordNet data.
    pub fn is_wordnet(&self) -> bool {
        matches!(self.backend, Backend::WordNet { .. })
    }

    /// Lemmatize `word` as a verb. Returns the word unchanged when no base
    /// form is found.
    pub fn lemmatize_verb(&self, word: &str) -> String {
        match &self.backend {
            Backend::Builtin => builtin_lemma(word),
            Backend::WordNet { exceptions, lemmas } => morphy(word, exceptions, lemmas)
                .into_iter()
                .min_by_key(|lemma| lemma.len())
                .unwrap_or_else(|| word.to_string()),
        }
    }
}

fn wordnet_candidates(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.to_path_buf(),
        dir.join("wordnet"),
        dir.join("corpora").join("wordnet"),
    ]
}

/// WordNet's morphy for verbs: exceptions first, then repeated suffix
/// substitution until some candidate is a known verb lemma.
fn morphy(
    form: &str,
    exceptions: &HashMap<String, Vec<String>>,
    lemmas: &HashSet<String>,
) -> Vec<String> {
    let filter_forms = |forms: Vec<String>| -> Vec<String> {
        let mut seen = HashSet::new();
        forms
            .into_iter()
            .filter(|f| lemmas.contains(f))
            .filter(|f| seen.insert(f.clone()))
            .collect()
    };

    if let Some(bases) = exceptions.get(form) {
        let mut forms = vec![form.to_string()];
        forms.extend(bases.iter().cloned());
        return filter_forms(forms);
    }

    let mut forms = apply_rules(&[form.to_string()]);
    let mut first = vec![form.to_string()];
    first.extend(forms.iter().cloned());
    let results = filter_forms(first);
    if !results.is_empty() {
        return results;
    }

    while !forms.is_empty() {
        forms = apply_rules(&forms);
        let results = filter_forms(forms.clone());
        if !results.is_empty() {
            return results;
        }
    }
    Vec::new()
}

fn apply_rules(forms: &[String]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            VERB_SUBSTITUTIONS.iter().filter_map(move |(old, new)| {
                form.strip_suffix(old).map(|stem| format!("{stem}{new}"))
            })
        })
        .collect()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Rule-based lemma used when no WordNet data is available.
///
/// Without a verb lexicon the final `-s` rule also applies to plural
/// nouns (`crowds` -> `crowd`), where WordNet would leave them alone.
/// Common non-verbs are kept as written.
fn builtin_lemma(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some((_, base)) = IRREGULAR_VERBS.iter().find(|(form, _)| *form == lower) {
        return base.to_string();
    }

    // Suffix rules only cover English spellings.
    if !word.is_ascii() || word.len() < 4 {
        return word.to_string();
    }

    if NOT_VERB_INFLECTIONS.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some(stem) = lower
        .strip_suffix("ies")
        .or_else(|| lower.strip_suffix("ied"))
    {
        if stem.len() >= 2 {
            return format!("{}y", &word[..stem.len()]);
        }
    }

    if lower.ends_with("eed") {
        return word.to_string();
    }

    for suffix in ["ing", "ed"] {
        if let Some(stem) = lower.strip_suffix(suffix) {
            if stem.chars().count() >= 3 && stem.chars().any(is_vowel) {
                return restore_stem(&word[..stem.len()]);
            }
            return word.to_string();
        }
    }

    if let Some(stem) = lower.strip_suffix("es") {
        if ["sh", "ch", "ss", "x", "z"].iter().any(|s| stem.ends_with(s)) {
            return word[..stem.len()].to_string();
        }
    }

    if lower.ends_with('s') && !KEEP_S_ENDINGS.iter().any(|s| lower.ends_with(s)) {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

/// Undo consonant doubling (`stopp` -> `stop`) and restore a silent `e`
/// (`mak` -> `make`, `serv` -> `serve`) after an `-ing`/`-ed` strip.
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.to_lowercase().chars().collect();
    let n = chars.len();
    let last = chars[n - 1];
    let prev = chars[n - 2];

    if last == prev && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z') {
        let cut = stem.char_indices().last().map(|(i, _)| i).unwrap_or(stem.len());
        return stem[..cut].to_string();
    }

    let cvc = n == 3 && !is_vowel(chars[0]) && is_vowel(chars[1]) && !is_vowel(chars[2]);
    let needs_e = (cvc && !matches!(last, 'w' | 'x' | 'y'))
        || last == 'v'
        || ["iz", "bl", "uc", "dg"]
            .iter()
            .any(|s| chars[n - 2..].iter().collect::<String>() == *s);

    if needs_e {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}
