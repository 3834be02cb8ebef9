//! Core data types for the advisory pipeline

pub mod report;
pub mod request;

pub use report::{PipelineRun, StageOutput};
pub use request::AnalysisRequest;
