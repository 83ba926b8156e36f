use std::sync::Arc;

use tj_core::{Annotator, Error, Result};

use crate::InferenceConfig;

pub mod client;
pub mod dummy;

pub use client::AnnotationClient;
pub use dummy::DummyAnnotator;

/// Build the annotator named by `config.model`: `grok` (HTTP) or `dummy`.
pub fn create_annotator(config: &InferenceConfig) -> Result<Arc<dyn Annotator>> {
    match config.model.to_ascii_lowercase().as_str() {
        "grok" | "remote" => Ok(Arc::new(AnnotationClient::new(config)?)),
        "dummy" | "offline" => Ok(Arc::new(DummyAnnotator)),
        other => Err(Error::Config(format!("Unknown inference model: {}", other))),
    }
}
