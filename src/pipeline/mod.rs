// Pipeline orchestration.

pub mod annotate;
pub mod event;

pub use annotate::{AnnotateOptions, Annotator, PostOutcome, RunSummary, VectorizeInput};
pub use event::Event;
