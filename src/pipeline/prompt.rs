//! Prompt templates for pipeline stages

use std::path::Path;

use crate::providers::search::SearchHit;
use crate::types::report::StageOutput;

use super::stage::{render_template, StageKind, StageSpec};

/// Leading line the verifier must emit so rejection can be gated on
/// mechanically rather than by parsing prose.
pub const VERDICT_PREFIX: &str = "VERDICT:";

/// Prompt builder for stage invocations
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the system prompt from the agent descriptor
    pub fn build_system_prompt(stage: &StageSpec, file_path: &Path, query: &str) -> String {
        let agent = &stage.agent;
        let mut prompt = String::new();

        prompt.push_str(&format!("You are a {}.\n\n", agent.role));
        prompt.push_str(&format!(
            "Your goal: {}\n\n",
            render_template(&agent.goal, file_path, query)
        ));
        prompt.push_str(&format!("Background: {}\n", agent.backstory));

        prompt
    }

    /// Build the task prompt for one stage invocation
    ///
    /// `upstream` carries the outputs of exactly the stages this one declares
    /// in `depends_on`, in pipeline order.
    pub fn build_stage_prompt(
        stage: &StageSpec,
        file_path: &Path,
        query: &str,
        document_text: &str,
        upstream: &[&StageOutput],
        search_hits: &[SearchHit],
    ) -> String {
        let mut prompt = String::new();

        prompt.push_str("## Task\n\n");
        prompt.push_str(&stage.render_description(file_path, query));
        prompt.push_str("\n\n");

        prompt.push_str("## Expected Output\n\n");
        prompt.push_str(&stage.expected_output);
        prompt.push_str("\n\n");

        prompt.push_str("## Financial Document Content\n\n");
        prompt.push_str(document_text);
        prompt.push_str("\n\n");

        if !search_hits.is_empty() {
            prompt.push_str("## Web Search Results\n\n");
            prompt.push_str(&Self::format_search_hits(search_hits));
            prompt.push('\n');
        }

        for output in upstream {
            prompt.push_str(&format!("## Upstream Result: {}\n\n", output.role));
            prompt.push_str(&output.text);
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!("## User Query\n\n{}\n", query));

        if stage.kind == StageKind::Verification {
            prompt.push_str(&format!(
                "\nBegin your response with a single line reading either \
                 '{prefix} APPROVED' or '{prefix} REJECTED', then explain your verdict. \
                 If the document content looks like an extraction error message or \
                 contains no financial data, reject it.\n",
                prefix = VERDICT_PREFIX
            ));
        }

        prompt
    }

    /// Format search hits for inclusion in a stage prompt
    fn format_search_hits(hits: &[SearchHit]) -> String {
        hits.iter()
            .enumerate()
            .map(|(i, hit)| {
                format!("[{}] {} ({})\n{}\n", i + 1, hit.title, hit.link, hit.snippet)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Whether a verification output carries a rejection verdict
pub fn is_rejection(verification_text: &str) -> bool {
    let Some(line) = verification_text.lines().next() else {
        return false;
    };
    let line = line.trim();
    let Some(head) = line.get(..VERDICT_PREFIX.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(VERDICT_PREFIX)
        && line[VERDICT_PREFIX.len()..]
            .trim()
            .to_ascii_uppercase()
            .starts_with("REJECTED")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stage::stages;
    use std::path::PathBuf;

    fn stage(kind: StageKind) -> StageSpec {
        stages().into_iter().find(|s| s.kind == kind).unwrap()
    }

    #[test]
    fn system_prompt_renders_goal_query() {
        let analysis = stage(StageKind::Analysis);
        let system = PromptBuilder::build_system_prompt(
            &analysis,
            &PathBuf::from("report.pdf"),
            "how are margins trending?",
        );
        assert!(system.contains("Senior Financial Analyst"));
        assert!(system.contains("how are margins trending?"));
        assert!(!system.contains("{query}"));
    }

    #[test]
    fn stage_prompt_includes_document_and_upstream() {
        let advisory = stage(StageKind::Advisory);
        let analysis_out = StageOutput::new(
            StageKind::Analysis,
            "Senior Financial Analyst",
            "revenue grew 12%",
        );
        let risk_out = StageOutput::new(
            StageKind::RiskAssessment,
            "Risk Assessment Expert",
            "high leverage risk",
        );

        let prompt = PromptBuilder::build_stage_prompt(
            &advisory,
            &PathBuf::from("report.pdf"),
            "should I invest?",
            "Revenue\nUp 10%\n",
            &[&analysis_out, &risk_out],
            &[],
        );

        assert!(prompt.contains("Revenue\nUp 10%"));
        assert!(prompt.contains("revenue grew 12%"));
        assert!(prompt.contains("high leverage risk"));
        assert!(prompt.contains("should I invest?"));
    }

    #[test]
    fn verification_prompt_demands_a_verdict_line() {
        let verification = stage(StageKind::Verification);
        let prompt = PromptBuilder::build_stage_prompt(
            &verification,
            &PathBuf::from("report.pdf"),
            "is this legit?",
            "some text\n",
            &[],
            &[],
        );
        assert!(prompt.contains("VERDICT: APPROVED"));
        assert!(prompt.contains("VERDICT: REJECTED"));
    }

    #[test]
    fn rejection_detection_reads_only_the_first_line() {
        assert!(is_rejection("VERDICT: REJECTED\nNot a financial filing."));
        assert!(is_rejection("verdict: rejected"));
        assert!(!is_rejection("VERDICT: APPROVED\nLooks like a 10-K."));
        assert!(!is_rejection("The verdict is that this is REJECTED."));
        assert!(!is_rejection(""));
    }
}
