//! Pipeline run results

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pipeline::stage::StageKind;

/// Text artifact produced by one pipeline stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutput {
    /// Which stage produced this output
    pub kind: StageKind,
    /// Role of the agent that produced it
    pub role: String,
    /// The generated text
    pub text: String,
}

impl StageOutput {
    /// Create a new stage output
    pub fn new(kind: StageKind, role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            role: role.into(),
            text: text.into(),
        }
    }
}

/// A completed (or halted) pipeline run
///
/// Fields are populated in fixed stage order while the run executes and the
/// struct is immutable once returned. Stages skipped by a verification halt
/// remain `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Document the run analyzed
    pub file_path: PathBuf,
    /// User query, passed through unchanged to every stage
    pub query: String,
    /// Verification stage output
    pub verification: Option<StageOutput>,
    /// Analysis stage output
    pub analysis: Option<StageOutput>,
    /// Risk assessment stage output
    pub risk_assessment: Option<StageOutput>,
    /// Final advisory stage output
    pub advisory: Option<StageOutput>,
}

impl PipelineRun {
    /// Create an empty run for the given request
    pub fn new(file_path: impl Into<PathBuf>, query: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            query: query.into(),
            verification: None,
            analysis: None,
            risk_assessment: None,
            advisory: None,
        }
    }

    /// Output of a given stage, if it ran
    pub fn output(&self, kind: StageKind) -> Option<&StageOutput> {
        match kind {
            StageKind::Verification => self.verification.as_ref(),
            StageKind::Analysis => self.analysis.as_ref(),
            StageKind::RiskAssessment => self.risk_assessment.as_ref(),
            StageKind::Advisory => self.advisory.as_ref(),
        }
    }

    /// Record a stage output in its slot
    pub(crate) fn record(&mut self, output: StageOutput) {
        let slot = match output.kind {
            StageKind::Verification => &mut self.verification,
            StageKind::Analysis => &mut self.analysis,
            StageKind::RiskAssessment => &mut self.risk_assessment,
            StageKind::Advisory => &mut self.advisory,
        };
        *slot = Some(output);
    }

    /// Final advisory report text, when the run got that far
    pub fn report(&self) -> Option<&str> {
        self.advisory.as_ref().map(|o| o.text.as_str())
    }
}
