//! Prompt assembly for the form generation pipeline.
//!
//! Everything in here is pure string work: keyword extraction from the
//! user's request, the context paragraph built from previously created
//! forms, and recovery of the JSON object from a model response.

pub mod context;
pub mod json;
pub mod keywords;

pub use context::{FormSummary, build_context_prompt, build_generation_prompt};
pub use json::extract_json_object;
pub use keywords::extract_keywords;
