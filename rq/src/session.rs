//! AnalysisSession - one requirement analysis request end to end
//!
//! Plan (checklist generation with critique/refine) -> parse -> seed the
//! tracker -> drive every item through the iteration engine -> summarize.
//! All mutable state of a request (tracker, tool context) is created at
//! entry and owned by the run, so it is torn down on every exit path,
//! fatal faults included.

use std::sync::Arc;

use eyre::Result;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::checklist::parse_checklist;
use crate::config::Config;
use crate::events::EventEmitter;
use crate::execution::{ChecklistExecutor, ExecutionResult};
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::planning::ChecklistPlanner;
use crate::progress::{Outcome, ProgressTracker};
use crate::prompts;
use crate::r#loop::{ItemEngine, LoopConfig};
use crate::tools::{DocumentSource, ToolContext};

/// Result of one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Subjects judged as targets, in outcome order
    pub targets: Vec<String>,
    /// Every recorded outcome, in processing order
    pub outcomes: Vec<Outcome>,
    /// Human-readable summary of the run
    pub summary: String,
}

/// One analysis request
pub struct AnalysisSession {
    session_id: String,
    config: Config,
    llm: Arc<dyn LlmClient>,
    source: Arc<dyn DocumentSource>,
    emitter: Option<EventEmitter>,
}

impl AnalysisSession {
    /// Create a session with a fresh session ID
    pub fn new(config: Config, llm: Arc<dyn LlmClient>, source: Arc<dyn DocumentSource>) -> Self {
        Self {
            session_id: Uuid::now_v7().to_string(),
            config,
            llm,
            source,
            emitter: None,
        }
    }

    /// Attach a progress event emitter
    pub fn with_emitter(mut self, emitter: EventEmitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Session ID, for event correlation
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Analyze a requirement: checklist -> per-item outcomes -> summary
    pub async fn run(&self, requirement: &str) -> Result<AnalysisReport> {
        info!(session_id = %self.session_id, %requirement, "Starting analysis");

        // Request-scoped state; dropped on every exit path below
        let tracker = Arc::new(Mutex::new(ProgressTracker::new(requirement)));
        let tool_ctx = ToolContext::new(&self.session_id, tracker.clone(), self.source.clone())
            .with_search_top_n(self.config.analysis.search_top_n);

        // Step 1: generate and parse the checklist
        let planner = ChecklistPlanner::new(self.llm.clone(), tool_ctx.clone(), self.config.analysis.refine_max_passes);
        let raw_checklist = match planner.generate(requirement).await {
            Ok(raw) => raw,
            Err(e) => {
                if let Some(emitter) = &self.emitter {
                    emitter.fatal_fault("planner", &e.to_string());
                }
                return Err(e.wrap_err("checklist generation failed"));
            }
        };

        let items = parse_checklist(&raw_checklist);
        info!(session_id = %self.session_id, item_count = items.len(), "Checklist parsed");
        if let Some(emitter) = &self.emitter {
            emitter.checklist_generated(items.len());
        }
        // An empty checklist is not an error: there is simply nothing to do
        tracker.lock().await.seed(items);

        // Step 2: drive every item to an outcome
        let loop_config = LoopConfig::from(&self.config.analysis);
        let mut engine = ItemEngine::new(loop_config, self.llm.clone(), tool_ctx.clone());
        if let Some(emitter) = &self.emitter {
            engine = engine.with_emitter(emitter.clone());
        }
        engine.run().await?;

        // Step 3: summarize
        let (outcomes, targets) = {
            let tracker = tracker.lock().await;
            (tracker.outcomes().to_vec(), tracker.targets())
        };
        let summary = self.summarize(requirement, &outcomes).await;

        if let Some(emitter) = &self.emitter {
            emitter.analysis_completed(targets.clone(), outcomes.len());
        }
        info!(session_id = %self.session_id, processed = outcomes.len(), targets = targets.len(), "Analysis complete");

        Ok(AnalysisReport {
            targets,
            outcomes,
            summary,
        })
    }

    /// Generate the checklist only, without executing it
    pub async fn plan(&self, requirement: &str) -> Result<String> {
        let tracker = Arc::new(Mutex::new(ProgressTracker::new(requirement)));
        let tool_ctx = ToolContext::new(&self.session_id, tracker, self.source.clone())
            .with_search_top_n(self.config.analysis.search_top_n);

        let planner = ChecklistPlanner::new(self.llm.clone(), tool_ctx, self.config.analysis.refine_max_passes);
        planner.generate(requirement).await
    }

    /// Run the orchestrated flow: plan, then execute the markdown checklist
    /// through the work/judge/verify loop
    pub async fn orchestrate(&self, requirement: &str) -> Result<ExecutionResult> {
        info!(session_id = %self.session_id, %requirement, "Starting orchestrated run");

        let tracker = Arc::new(Mutex::new(ProgressTracker::new(requirement)));
        let tool_ctx = ToolContext::new(&self.session_id, tracker, self.source.clone())
            .with_search_top_n(self.config.analysis.search_top_n);

        let planner = ChecklistPlanner::new(self.llm.clone(), tool_ctx.clone(), self.config.analysis.refine_max_passes);
        let checklist = planner.generate(requirement).await?;

        let executor = ChecklistExecutor::new(self.llm.clone(), tool_ctx, self.config.analysis.execute_max_passes);
        executor.run(&checklist).await
    }

    /// Produce the run summary
    ///
    /// A faulting summarizer does not abort a run whose outcomes are already
    /// recorded; the fallback is a plain formatted record.
    async fn summarize(&self, requirement: &str, outcomes: &[Outcome]) -> String {
        let record = format_record(outcomes);

        let instruction = match prompts::render(
            prompts::SUMMARIZER_INSTRUCTION_TEMPLATE,
            &[("requirement", requirement), ("record", &record)],
        ) {
            Ok(instruction) => instruction,
            Err(_) => return record,
        };

        let request = CompletionRequest {
            system_prompt: prompts::SUMMARIZER_SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(instruction)],
            tools: vec![],
            max_tokens: self.config.llm.max_tokens,
        };

        match self.llm.complete(request).await {
            Ok(response) => response.content.unwrap_or(record),
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "Summarizer faulted, using plain record");
                record
            }
        }
    }
}

/// Format outcomes as a plain text record
fn format_record(outcomes: &[Outcome]) -> String {
    if outcomes.is_empty() {
        return "No items were processed.".to_string();
    }
    outcomes
        .iter()
        .map(|o| {
            let mark = if o.is_target { "target" } else { "not a target" };
            format!("- {} ({}): {}", o.subject, mark, o.rationale)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
