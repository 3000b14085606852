// Inference client trait and prediction decoding.
//
// The classifier is a remote, pre-deployed endpoint. The trait keeps the
// pipeline independent of the hosting service so tests can substitute a
// scripted client.

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Raw response body returned by the inference endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self { body: body.into() }
    }
}

/// Predicted class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction(pub i64);

/// Sentiment classes the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Map a label to its class. Only labels 0 and 1 are known.
    pub fn from_label(label: Prediction) -> Option<Self> {
        match label.0 {
            0 => Some(Sentiment::Positive),
            1 => Some(Sentiment::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }
}

/// Trait for sending a CSV feature vector to a classifier endpoint.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send `payload` (comma-separated feature values) to `endpoint` and
    /// return the undecoded response body. One attempt, no retry.
    async fn invoke(&self, endpoint: &str, payload: &str) -> Result<RawResponse>;
}

/// Decode a response body into an integer label.
///
/// Accepts plain integer text (`"1"`, `"0\n"`), a JSON number, or a
/// one-element JSON array (`[1.0]`). Floats are accepted only when they
/// have no fractional part.
pub fn parse_prediction(raw: &RawResponse) -> Result<Prediction> {
    let text = std::str::from_utf8(&raw.body)
        .map_err(|e| Error::PredictionParse(format!("Response is not UTF-8: {e}")))?
        .trim();

    if let Ok(label) = text.parse::<i64>() {
        return Ok(Prediction(label));
    }

    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|_| Error::PredictionParse(format!("{text:?} is not an integer label")))?;

    let number = match &value {
        serde_json::Value::Array(items) if items.len() == 1 => &items[0],
        other => other,
    };

    let label = match number.as_i64() {
        Some(label) => Some(label),
        None => number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64),
    };

    label
        .map(Prediction)
        .ok_or_else(|| Error::PredictionParse(format!("{text:?} is not an integer label")))
}
