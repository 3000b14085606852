// Text normalization: tokenization, stopword removal, verb lemmatization.

pub mod lemmatize;
pub mod preprocess;

pub use lemmatize::Lemmatizer;
pub use preprocess::{preprocess, preprocess_default};
