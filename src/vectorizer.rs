// TF-IDF vectorizer loaded from a JSON export of a pre-fit model.
//
// The classifier behind the inference endpoint was trained on vectors from
// a specific fit (vocabulary + idf weights). That fit is exported as JSON
// and reproduced here: tokenize, count vocabulary n-grams, weight by idf,
// normalize. Nothing is fit at runtime.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Token pattern used when the export doesn't carry one.
pub const DEFAULT_TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// On-disk shape of an exported vectorizer.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Vec<f64>,
    #[serde(default = "default_true")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default = "default_norm")]
    norm: Option<String>,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_true")]
    use_idf: bool,
    #[serde(default)]
    token_pattern: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<String> {
    Some("l2".to_string())
}

/// Vector normalization applied after idf weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Norm {
    L1,
    L2,
    None,
}

/// A dense numeric encoding of one text in the vectorizer's vocabulary space.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Number of dimensions (the vocabulary size).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of non-zero components.
    pub fn nnz(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// Render the components comma-separated in index order, which is the request
    /// body format the inference endpoint expects.
    pub fn to_csv(&self) -> String {
        self.values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A loaded, immutable TF-IDF vectorizer.
#[derive(Debug)]
pub struct VectorizerModel {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    lowercase: bool,
    ngram_range: (usize, usize),
    norm: Norm,
    sublinear_tf: bool,
    token_pattern: Regex,
}

/// Load an exported vectorizer from `path`.
///
/// Fails with `ArtifactLoad` when the file is missing, unreadable, or not
/// a consistent vectorizer export. Reads the file and nothing else, so
/// repeated loads of the same path produce equivalent models.
pub fn load_vectorizer(path: &Path) -> Result<VectorizerModel> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::ArtifactLoad(format!("Failed to read {}: {e}", path.display()))
    })?;
    let model = VectorizerModel::from_json(&raw)
        .map_err(|e| Error::ArtifactLoad(format!("{}: {e}", path.display())))?;

    debug!(
        path = %path.display(),
        vocabulary = model.vocabulary_size(),
        "Vectorizer loaded"
    );
    Ok(model)
}

impl VectorizerModel {
    /// Parse and validate a vectorizer export.
    pub fn from_json(raw: &str) -> Result<Self> {
        let artifact: VectorizerArtifact = serde_json::from_str(raw)
            .map_err(|e| Error::ArtifactLoad(format!("Malformed vectorizer JSON: {e}")))?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: VectorizerArtifact) -> Result<Self> {
        let n = artifact.vocabulary.len();

        // Indices must cover 0..n exactly once.
        let mut seen = vec![false; n];
        for (term, &idx) in &artifact.vocabulary {
            if idx >= n || seen[idx] {
                return Err(Error::ArtifactLoad(format!(
                    "Vocabulary index {idx} for {term:?} is out of range or duplicated"
                )));
            }
            seen[idx] = true;
        }

        let idf = if artifact.use_idf {
            if artifact.idf.len() != n {
                return Err(Error::ArtifactLoad(format!(
                    "idf has {} weights but vocabulary has {n} terms",
                    artifact.idf.len()
                )));
            }
            Some(artifact.idf)
        } else {
            None
        };

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::ArtifactLoad(format!(
                "Invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        let norm = match artifact.norm.as_deref() {
            Some("l2") => Norm::L2,
            Some("l1") => Norm::L1,
            None => Norm::None,
            Some(other) => {
                return Err(Error::ArtifactLoad(format!("Unsupported norm {other:?}")));
            }
        };

        // `\w` and `\b` are Unicode-aware, matching the exporting fit.
        let pattern = artifact
            .token_pattern
            .as_deref()
            .unwrap_or(DEFAULT_TOKEN_PATTERN);
        let token_pattern = Regex::new(pattern)
            .map_err(|e| Error::ArtifactLoad(format!("Invalid token_pattern: {e}")))?;

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf,
            lowercase: artifact.lowercase,
            ngram_range: artifact.ngram_range,
            norm,
            sublinear_tf: artifact.sublinear_tf,
            token_pattern,
        })
    }

    /// Dimensionality of every vector this model produces.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Encode `text` as a feature vector.
    ///
    /// Text with no vocabulary hits maps to the zero vector. Text containing
    /// a NUL byte is rejected as structurally invalid.
    pub fn transform(&self, text: &str) -> Result<FeatureVector> {
        if text.contains('\0') {
            return Err(Error::Vectorization(
                "Text contains a NUL byte".to_string(),
            ));
        }

        let doc = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&doc)
            .map(|m| m.as_str())
            .collect();

        let mut values = vec![0.0_f64; self.vocabulary.len()];
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&idx) = self.vocabulary.get(&term) {
                    values[idx] += 1.0;
                }
            }
        }

        if self.sublinear_tf {
            for v in values.iter_mut().filter(|v| **v > 0.0) {
                *v = 1.0 + v.ln();
            }
        }

        if let Some(idf) = &self.idf {
            for (v, w) in values.iter_mut().zip(idf) {
                *v *= w;
            }
        }

        let denom = match self.norm {
            Norm::L2 => values.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Norm::L1 => values.iter().map(|v| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if denom > 0.0 {
            for v in &mut values {
                *v /= denom;
            }
        }

        Ok(FeatureVector { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "vocabulary": {"great": 0, "sad": 1, "news": 2},
        "idf": [1.0, 2.0, 1.5]
    }"#;

    #[test]
    fn test_transform_l2_normalized() {
        let model = VectorizerModel::from_json(SMALL).unwrap();
        let v = model.transform("Great news, GREAT news!").unwrap();
        assert_eq!(v.len(), 3);
        // counts: great=2, news=2 -> weighted 2.0, 0, 3.0 -> normalized
        let norm = (4.0_f64 + 9.0).sqrt();
        assert!((v.values[0] - 2.0 / norm).abs() < 1e-12);
        assert_eq!(v.values[1], 0.0);
        assert!((v.values[2] - 3.0 / norm).abs() < 1e-12);
    }

    #[test]
    fn test_no_hits_is_zero_vector() {
        let model = VectorizerModel::from_json(SMALL).unwrap();
        let v = model.transform("").unwrap();
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.to_csv(), "0,0,0");
    }

    #[test]
    fn test_bigrams_and_sublinear() {
        let json = r#"{
            "vocabulary": {"fake news": 0, "news": 1},
            "use_idf": false,
            "ngram_range": [1, 2],
            "norm": null,
            "sublinear_tf": true
        }"#;
        let model = VectorizerModel::from_json(json).unwrap();
        let v = model.transform("fake news is fake news").unwrap();
        assert!((v.values[0] - (1.0 + 2.0_f64.ln())).abs() < 1e-12);
        assert!((v.values[1] - (1.0 + 2.0_f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_single_char_tokens_ignored() {
        let json = r#"{"vocabulary": {"a": 0, "ok": 1}, "use_idf": false, "norm": null}"#;
        let model = VectorizerModel::from_json(json).unwrap();
        let v = model.transform("a ok").unwrap();
        assert_eq!(v.values, vec![0.0, 1.0]);
    }

    #[test]
    fn test_nul_is_vectorization_error() {
        let model = VectorizerModel::from_json(SMALL).unwrap();
        let err = model.transform("bad\0text").unwrap_err();
        assert!(matches!(err, Error::Vectorization(_)));
    }

    #[test]
    fn test_rejects_inconsistent_artifacts() {
        let cases = [
            "not json",
            r#"{"idf": [1.0]}"#,
            r#"{"vocabulary": {"a": 0, "b": 1}, "idf": [1.0]}"#,
            r#"{"vocabulary": {"a": 0, "b": 0}, "idf": [1.0, 1.0]}"#,
            r#"{"vocabulary": {"a": 5}, "idf": [1.0]}"#,
            r#"{"vocabulary": {"a": 0}, "idf": [1.0], "norm": "max"}"#,
            r#"{"vocabulary": {"a": 0}, "idf": [1.0], "ngram_range": [2, 1]}"#,
            r#"{"vocabulary": {"a": 0}, "idf": [1.0], "stop_words": null}"#,
        ];
        for case in cases {
            let err = VectorizerModel::from_json(case).unwrap_err();
            assert!(matches!(err, Error::ArtifactLoad(_)), "accepted: {case}");
        }
    }

    #[test]
    fn test_python_unicode_flag_accepted() {
        let json = r#"{"vocabulary": {"hi": 0}, "idf": [1.0], "token_pattern": "(?u)\\b\\w\\w+\\b"}"#;
        let model = VectorizerModel::from_json(json).unwrap();
        assert_eq!(model.transform("hi there").unwrap().values, vec![1.0]);
    }

    #[test]
    fn test_non_ascii_words_are_single_tokens() {
        let json = r#"{
            "vocabulary": {"café": 0, "caf": 1, "señor": 2, "se": 3, "or": 4},
            "use_idf": false,
            "norm": null
        }"#;
        let model = VectorizerModel::from_json(json).unwrap();
        let v = model.transform("Café señor").unwrap();
        assert_eq!(v.values, vec![1.0, 0.0, 1.0, 0.0, 0.0]);
    }
}
