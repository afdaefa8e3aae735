//! Hugging Face Inference API implementations of the collaborator traits.

mod client;

pub use client::{HuggingFaceClassifier, HuggingFaceSummarizer, model_endpoint};
