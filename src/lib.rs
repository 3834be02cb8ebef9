//! finadvisor: sequential financial-document advisory pipeline
//!
//! Extracts text from a PDF filing and runs four LLM-backed stages in fixed
//! order — verification, analysis, risk assessment, and a final buy/hold/sell
//! advisory — each stage consuming the document text, the user's query, and
//! the upstream stage results it declares.

pub mod agents;
pub mod config;
pub mod error;
pub mod extraction;
pub mod pipeline;
pub mod providers;
pub mod types;

pub use config::AdvisorConfig;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, StageKind, StageSpec};
pub use types::{
    report::{PipelineRun, StageOutput},
    request::AnalysisRequest,
};
