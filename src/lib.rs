// tonecheck: sentiment-annotated reposting for a single Twitter account
//
// This is the library root. Each module corresponds to one stage of the
// annotation pipeline.

pub mod config;
pub mod error;
pub mod inference;
pub mod pipeline;
pub mod text;
pub mod twitter;
pub mod vectorizer;

pub use error::{Error, Result};
