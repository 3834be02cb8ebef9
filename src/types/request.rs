//! Analysis request types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single analysis request: which document to analyze and what the user
/// wants to know about it
///
/// The query is opaque to the pipeline; it is passed through unchanged to
/// every stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Path to the financial document (PDF)
    pub file_path: PathBuf,
    /// Free-form user query
    pub query: String,
}

impl AnalysisRequest {
    /// Create a new request
    pub fn new(file_path: impl Into<PathBuf>, query: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            query: query.into(),
        }
    }
}
