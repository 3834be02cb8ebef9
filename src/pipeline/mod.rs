//! The four-stage advisory pipeline
//!
//! Stage descriptors declare who does the work, what the work is, and which
//! upstream results each stage may read; the executor walks them strictly in
//! order against one shared LLM handle.

pub mod executor;
pub mod prompt;
pub mod stage;

pub use executor::Pipeline;
pub use prompt::PromptBuilder;
pub use stage::{stages, StageKind, StageSpec};
