//! Agent descriptors
//!
//! Agents are declarative configuration: a role, a goal, a backstory, the
//! tools the agent may use, and its iteration/rate bounds. They carry no
//! behavior of their own; the pipeline executor interprets them when it
//! builds prompts and invokes the shared LLM handle.

use serde::{Deserialize, Serialize};

/// A capability an agent may invoke while working a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Extract the text of the financial document under analysis
    ReadFinancialDocument,
    /// Supplement document-only analysis with web search results
    WebSearch,
}

/// Role-scoped agent configuration bound to the shared LLM capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Role played by the agent (capability, not identity)
    pub role: String,
    /// What the agent is trying to achieve
    pub goal: String,
    /// Persona context fed into the system prompt
    pub backstory: String,
    /// Tools the agent may invoke, in preference order
    pub tools: Vec<ToolKind>,
    /// Maximum LLM attempts per stage
    pub max_iter: u32,
    /// Maximum LLM invocations per minute
    pub max_rpm: u32,
    /// Whether the agent may delegate sub-work to other agents
    pub allow_delegation: bool,
}

impl AgentSpec {
    /// Whether this agent carries the given tool
    pub fn has_tool(&self, tool: ToolKind) -> bool {
        self.tools.contains(&tool)
    }
}

/// Senior financial analyst: produces the metrics/highlights summary
pub fn financial_analyst() -> AgentSpec {
    AgentSpec {
        role: "Senior Financial Analyst".to_string(),
        goal: "Accurately analyze the financial document to provide actionable and \
               objective insights based on the query: {query}"
            .to_string(),
        backstory: "You are an experienced and highly professional financial analyst with a \
                    strong background in corporate finance. You pride yourself on delivering \
                    data-driven, objective, and meticulously researched financial analysis. \
                    You rely exclusively on the provided documents to form your conclusions, \
                    maintaining strict regulatory compliance."
            .to_string(),
        tools: vec![ToolKind::ReadFinancialDocument],
        max_iter: 3,
        max_rpm: 10,
        allow_delegation: true,
    }
}

/// Compliance officer: verifies the document is a legitimate financial filing
pub fn verifier() -> AgentSpec {
    AgentSpec {
        role: "Financial Document Verifier".to_string(),
        goal: "Carefully verify whether the provided document is a legitimate and \
               relevant financial document."
            .to_string(),
        backstory: "You are a strict compliance officer specializing in document \
                    verification. You ensure that only authentic financial statements, \
                    corporate reports, and relevant disclosures are processed. You do not \
                    make assumptions; if a document lacks financial data, you reject it."
            .to_string(),
        tools: vec![ToolKind::ReadFinancialDocument],
        max_iter: 3,
        max_rpm: 10,
        allow_delegation: false,
    }
}

/// Risk manager: enumerates low/medium/high-probability risks
pub fn risk_assessor() -> AgentSpec {
    AgentSpec {
        role: "Risk Assessment Expert".to_string(),
        goal: "Identify and quantify potential risks associated with the financial data \
               objectively."
            .to_string(),
        backstory: "You are a seasoned risk manager with experience in identifying market, \
                    credit, and operational risks. You take a balanced perspective, \
                    acknowledging both downside risks and mitigating factors. Your analysis \
                    is heavily relied upon to prevent exposure to unnecessary financial harm."
            .to_string(),
        tools: vec![ToolKind::ReadFinancialDocument],
        max_iter: 3,
        max_rpm: 10,
        allow_delegation: false,
    }
}

/// Fiduciary advisor: issues the final buy/hold/sell recommendation
pub fn investment_advisor() -> AgentSpec {
    AgentSpec {
        role: "Certified Investment Advisor".to_string(),
        goal: "Provide prudent, risk-aware investment recommendations based strictly on \
               verified financial data and analysis."
            .to_string(),
        backstory: "You are a fiduciary investment advisor known for putting your clients' \
                    best interests first. You do not chase trends or recommend high-risk \
                    assets unprompted. Your recommendations are grounded in fundamental \
                    analysis, thoroughly evaluating the financial health of the assets."
            .to_string(),
        tools: vec![],
        max_iter: 3,
        max_rpm: 10,
        allow_delegation: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyst_is_the_only_delegating_agent() {
        assert!(financial_analyst().allow_delegation);
        assert!(!verifier().allow_delegation);
        assert!(!risk_assessor().allow_delegation);
        assert!(!investment_advisor().allow_delegation);
    }

    #[test]
    fn advisor_carries_no_tools() {
        assert!(investment_advisor().tools.is_empty());
        assert!(verifier().has_tool(ToolKind::ReadFinancialDocument));
        assert!(!verifier().has_tool(ToolKind::WebSearch));
    }

    #[test]
    fn bounds_match_configuration() {
        for agent in [financial_analyst(), verifier(), risk_assessor(), investment_advisor()] {
            assert_eq!(agent.max_iter, 3);
            assert_eq!(agent.max_rpm, 10);
        }
    }
}
