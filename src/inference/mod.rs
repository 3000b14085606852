// Remote sentiment inference: trait-based, so the hosting service can be
// swapped or scripted in tests.
//
// SageMakerClient is the production implementation.

pub mod sagemaker;
pub mod traits;

pub use traits::{parse_prediction, InferenceClient, Prediction, RawResponse, Sentiment};
