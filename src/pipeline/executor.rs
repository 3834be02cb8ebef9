//! Sequential pipeline executor
//!
//! One explicit function walks the stage descriptors in fixed order against a
//! shared LLM handle. The document is extracted once per run; each stage sees
//! the extracted text, the user query, and the upstream results it declares.
//! Stage invocations are bounded by the agent's `max_iter` and spaced to
//! honor its `max_rpm`.

use std::sync::Arc;
use std::time::Duration;

use crate::agents::ToolKind;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::extraction;
use crate::providers::llm::LlmProvider;
use crate::providers::search::{SearchHit, SearchProvider};
use crate::types::report::{PipelineRun, StageOutput};
use crate::types::request::AnalysisRequest;

use super::prompt::{is_rejection, PromptBuilder};
use super::stage::{stages, StageKind, StageSpec};

/// The advisory pipeline: a shared LLM handle, an optional web-search
/// capability, and behavior configuration
///
/// Holds no per-run state; independent runs may execute concurrently.
pub struct Pipeline {
    llm: Arc<dyn LlmProvider>,
    search: Option<Arc<dyn SearchProvider>>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline over a shared LLM handle
    pub fn new(llm: Arc<dyn LlmProvider>, config: PipelineConfig) -> Self {
        Self {
            llm,
            search: None,
            config,
        }
    }

    /// Attach the optional web-search capability
    pub fn with_search(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(search);
        self
    }

    /// Execute a full run: extraction, then the four stages strictly in order
    ///
    /// Extraction failures do not abort the run; the fail-soft error string
    /// flows into the stages as document content. LLM failures propagate;
    /// the pipeline does not retry a failed stage beyond the agent's bounds.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<PipelineRun> {
        tracing::info!(
            file = %request.file_path.display(),
            model = self.llm.model(),
            "starting advisory pipeline run"
        );

        let document_text = extraction::read_document(&request.file_path);
        let mut run = PipelineRun::new(request.file_path.clone(), request.query.clone());

        for stage in stages() {
            let upstream: Vec<StageOutput> = stage
                .depends_on
                .iter()
                .filter_map(|kind| run.output(*kind).cloned())
                .collect();
            let upstream_refs: Vec<&StageOutput> = upstream.iter().collect();

            let search_hits = self.search_context(&stage, &request.query).await;

            let system =
                PromptBuilder::build_system_prompt(&stage, &request.file_path, &request.query);
            let prompt = PromptBuilder::build_stage_prompt(
                &stage,
                &request.file_path,
                &request.query,
                &document_text,
                &upstream_refs,
                &search_hits,
            );

            tracing::info!(stage = %stage.kind, role = %stage.agent.role, "invoking stage");
            let text = self.invoke_stage(&stage, &system, &prompt).await?;
            tracing::debug!(stage = %stage.kind, chars = text.len(), "stage complete");

            let rejected = stage.kind == StageKind::Verification && is_rejection(&text);
            run.record(StageOutput::new(stage.kind, &stage.agent.role, text));

            if rejected {
                if self.config.halt_on_rejection {
                    tracing::warn!("verifier rejected the document, halting run");
                    break;
                }
                tracing::warn!("verifier rejected the document, continuing (gating disabled)");
            }
        }

        Ok(run)
    }

    /// Run a web search for stages that carry the tool, when a provider is
    /// attached. Search failures are logged and swallowed; the stage still
    /// runs on document content alone.
    async fn search_context(&self, stage: &StageSpec, query: &str) -> Vec<SearchHit> {
        if !stage.has_tool(ToolKind::WebSearch) {
            return Vec::new();
        }
        let Some(search) = &self.search else {
            return Vec::new();
        };

        match search.search(query).await {
            Ok(hits) => {
                tracing::debug!(stage = %stage.kind, hits = hits.len(), "web search complete");
                hits
            }
            Err(e) => {
                tracing::warn!(stage = %stage.kind, error = %e, "web search failed, continuing without it");
                Vec::new()
            }
        }
    }

    /// Invoke the LLM for one stage, bounded by `max_iter` attempts and
    /// spaced to honor `max_rpm`
    ///
    /// Only empty responses are retried here; transport/provider errors
    /// propagate immediately (the provider owns its own retry policy).
    async fn invoke_stage(&self, stage: &StageSpec, system: &str, prompt: &str) -> Result<String> {
        let min_interval =
            Duration::from_secs_f64(60.0 / f64::from(stage.agent.max_rpm.max(1)));
        let mut last_call: Option<tokio::time::Instant> = None;

        for attempt in 0..stage.agent.max_iter {
            if let Some(last) = last_call {
                tokio::time::sleep_until(last + min_interval).await;
            }
            last_call = Some(tokio::time::Instant::now());

            let text = self.llm.generate(system, prompt).await?;
            let text = text.trim();
            if !text.is_empty() {
                return Ok(text.to_string());
            }

            tracing::warn!(
                stage = %stage.kind,
                attempt = attempt + 1,
                max_iter = stage.agent.max_iter,
                "stage produced empty output"
            );
        }

        Err(Error::llm(format!(
            "{} produced no output after {} attempts",
            stage.agent.role, stage.agent.max_iter
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct MockLlm {
        calls: Mutex<Vec<(String, String)>>,
        responses: Mutex<VecDeque<String>>,
    }

    impl MockLlm {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlm {
        async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            Ok(self.responses.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }

    struct MockSearch;

    #[async_trait]
    impl SearchProvider for MockSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>> {
            Ok(vec![SearchHit {
                title: "Q3 earnings coverage".to_string(),
                link: "https://example.com/earnings".to_string(),
                snippet: "analysts expect margin expansion".to_string(),
            }])
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("missing.pdf", "should I invest?")
    }

    #[tokio::test(start_paused = true)]
    async fn runs_all_stages_in_order() {
        let llm = MockLlm::new(&[
            "VERDICT: APPROVED\nLooks like a 10-K.",
            "revenue grew 12%",
            "high leverage risk",
            "hold",
        ]);
        let pipeline = Pipeline::new(llm.clone(), PipelineConfig::default());

        let run = pipeline.run(&request()).await.unwrap();

        assert_eq!(run.verification.as_ref().unwrap().text, "VERDICT: APPROVED\nLooks like a 10-K.");
        assert_eq!(run.analysis.as_ref().unwrap().text, "revenue grew 12%");
        assert_eq!(run.risk_assessment.as_ref().unwrap().text, "high leverage risk");
        assert_eq!(run.report(), Some("hold"));

        let calls = llm.calls();
        assert_eq!(calls.len(), 4);
        // Advisory reads exactly the analysis and risk results
        let (_, advisory_prompt) = &calls[3];
        assert!(advisory_prompt.contains("revenue grew 12%"));
        assert!(advisory_prompt.contains("high leverage risk"));
        // Verification reads no upstream result
        let (_, verification_prompt) = &calls[0];
        assert!(!verification_prompt.contains("revenue grew 12%"));
    }

    #[tokio::test(start_paused = true)]
    async fn extraction_failure_flows_through_as_text() {
        let llm = MockLlm::new(&["VERDICT: REJECTED\nUnreadable.", "a", "b", "c"]);
        let pipeline = Pipeline::new(llm.clone(), PipelineConfig::default());

        let run = pipeline.run(&request()).await.unwrap();

        // The fail-soft extraction string reaches the stages as content
        let (_, verification_prompt) = &llm.calls()[0];
        assert!(verification_prompt.contains("Error reading PDF missing.pdf: "));
        // Rejection is advisory by default: all stages still ran
        assert!(run.advisory.is_some());
        assert_eq!(llm.calls().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_halts_when_gating_enabled() {
        let llm = MockLlm::new(&["VERDICT: REJECTED\nNot a financial filing."]);
        let config = PipelineConfig {
            halt_on_rejection: true,
            ..Default::default()
        };
        let pipeline = Pipeline::new(llm.clone(), config);

        let run = pipeline.run(&request()).await.unwrap();

        assert!(run.verification.is_some());
        assert!(run.analysis.is_none());
        assert!(run.risk_assessment.is_none());
        assert!(run.advisory.is_none());
        assert_eq!(llm.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_responses_exhaust_iteration_bound() {
        let llm = MockLlm::new(&[]);
        let pipeline = Pipeline::new(llm.clone(), PipelineConfig::default());

        let err = pipeline.run(&request()).await.unwrap_err();

        assert!(matches!(err, Error::Llm(_)));
        // Verifier's max_iter is 3; the run never reaches later stages
        assert_eq!(llm.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn search_context_reaches_only_search_enabled_stages() {
        let llm = MockLlm::new(&["VERDICT: APPROVED", "analysis", "risk", "buy"]);
        let pipeline = Pipeline::new(llm.clone(), PipelineConfig::default())
            .with_search(Arc::new(MockSearch));

        pipeline.run(&request()).await.unwrap();

        let calls = llm.calls();
        // Analysis carries the web-search tool
        assert!(calls[1].1.contains("analysts expect margin expansion"));
        // Verification and advisory do not
        assert!(!calls[0].1.contains("analysts expect margin expansion"));
        assert!(!calls[3].1.contains("analysts expect margin expansion"));
    }
}
