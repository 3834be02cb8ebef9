//! Stage descriptors and the fixed pipeline ordering

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::agents::{self, AgentSpec, ToolKind};

/// The four pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Classify the document as a legitimate financial filing or reject it
    Verification,
    /// Produce the financial metrics/highlights summary
    Analysis,
    /// Produce a structured low/medium/high risk breakdown
    RiskAssessment,
    /// Produce the buy/hold/sell recommendation
    Advisory,
}

impl StageKind {
    /// All stages in fixed execution order
    pub const ORDER: [StageKind; 4] = [
        StageKind::Verification,
        StageKind::Analysis,
        StageKind::RiskAssessment,
        StageKind::Advisory,
    ];

    /// Human-readable stage name
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Verification => "verification",
            StageKind::Analysis => "analysis",
            StageKind::RiskAssessment => "risk_assessment",
            StageKind::Advisory => "advisory",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One unit of templated work assigned to an agent
///
/// Declarative only: the executor interprets the descriptor when it builds
/// prompts. `depends_on` is the full set of upstream results the stage is
/// allowed to read.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// Which stage this is
    pub kind: StageKind,
    /// Agent responsible for the stage
    pub agent: AgentSpec,
    /// Task description, templated with `{file_path}` and `{query}`
    pub description: String,
    /// Shape of the expected output, free text
    pub expected_output: String,
    /// Tools the stage may invoke, in preference order
    pub tools: Vec<ToolKind>,
    /// Upstream stage results this stage reads
    pub depends_on: Vec<StageKind>,
}

impl StageSpec {
    /// Render the task description against a concrete request
    pub fn render_description(&self, file_path: &Path, query: &str) -> String {
        render_template(&self.description, file_path, query)
    }

    /// Whether this stage carries the given tool
    pub fn has_tool(&self, tool: ToolKind) -> bool {
        self.tools.contains(&tool)
    }
}

/// Substitute `{file_path}` and `{query}` placeholders
pub fn render_template(template: &str, file_path: &Path, query: &str) -> String {
    template
        .replace("{file_path}", &file_path.display().to_string())
        .replace("{query}", query)
}

/// Build the fixed stage chain: verification, analysis, risk assessment,
/// advisory
pub fn stages() -> Vec<StageSpec> {
    vec![
        StageSpec {
            kind: StageKind::Verification,
            agent: agents::verifier(),
            description: "Verify the authenticity and relevance of the document located at \
                          {file_path}. Confirm it is a valid financial report (like an \
                          earnings release, 10-K, or similar corporate filing) before \
                          allowing further analysis."
                .to_string(),
            expected_output: "A short validation statement confirming the document type and \
                              its suitability for financial and investment analysis."
                .to_string(),
            tools: vec![ToolKind::ReadFinancialDocument],
            depends_on: vec![],
        },
        StageSpec {
            kind: StageKind::Analysis,
            agent: agents::financial_analyst(),
            description: "Analyze the provided financial document at the path: {file_path} \
                          to answer the user's query: {query}. Focus on the core financial \
                          performance, margins, and key highlights."
                .to_string(),
            expected_output: "A concise but thorough financial analysis report addressing \
                              the user's specific query. The report should include key \
                              metrics, revenue changes, and notable financial health \
                              indicators."
                .to_string(),
            tools: vec![ToolKind::ReadFinancialDocument, ToolKind::WebSearch],
            depends_on: vec![],
        },
        StageSpec {
            kind: StageKind::RiskAssessment,
            agent: agents::risk_assessor(),
            description: "Conduct a detailed risk assessment based on the financial \
                          document located at {file_path}. Identify liquidity risks, market \
                          uncertainties, debt obligations, or any alarming operational \
                          factors mentioned in the text."
                .to_string(),
            expected_output: "A structured risk assessment detailing low, medium, and \
                              high-probability risks, along with suggestions for mitigating \
                              those risks if an investment is made."
                .to_string(),
            tools: vec![ToolKind::ReadFinancialDocument],
            depends_on: vec![],
        },
        StageSpec {
            kind: StageKind::Advisory,
            agent: agents::investment_advisor(),
            description: "Review the initial financial analysis and the core financial \
                          document ({file_path}) to provide sound investment \
                          recommendations. Take into account the user's focus: {query}. \
                          Base all recommendations on fundamentals and cite specific data \
                          from the report."
                .to_string(),
            expected_output: "An actionable investment advisory report outlining potential \
                              opportunities and whether the asset represents a strong buy, \
                              hold, or sell, heavily grounded in the data."
                .to_string(),
            tools: vec![],
            depends_on: vec![StageKind::Analysis, StageKind::RiskAssessment],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn stage_order_is_fixed() {
        let kinds: Vec<StageKind> = stages().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, StageKind::ORDER);
    }

    #[test]
    fn verification_declares_no_dependencies() {
        let chain = stages();
        let verification = chain.iter().find(|s| s.kind == StageKind::Verification).unwrap();
        assert!(verification.depends_on.is_empty());
    }

    #[test]
    fn advisory_depends_on_exactly_analysis_and_risk() {
        let chain = stages();
        let advisory = chain.iter().find(|s| s.kind == StageKind::Advisory).unwrap();
        assert_eq!(
            advisory.depends_on,
            vec![StageKind::Analysis, StageKind::RiskAssessment]
        );
    }

    #[test]
    fn dependencies_only_point_upstream() {
        let chain = stages();
        for (index, stage) in chain.iter().enumerate() {
            for dep in &stage.depends_on {
                let dep_index = chain.iter().position(|s| s.kind == *dep).unwrap();
                assert!(dep_index < index, "{} depends on downstream {}", stage.kind, dep);
            }
        }
    }

    #[test]
    fn render_substitutes_placeholders() {
        let chain = stages();
        let analysis = chain.iter().find(|s| s.kind == StageKind::Analysis).unwrap();
        let rendered = analysis.render_description(
            &PathBuf::from("data/sample.pdf"),
            "is revenue growing?",
        );
        assert!(rendered.contains("data/sample.pdf"));
        assert!(rendered.contains("is revenue growing?"));
        assert!(!rendered.contains("{file_path}"));
        assert!(!rendered.contains("{query}"));
    }
}
