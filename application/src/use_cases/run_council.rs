//! Run Council use case
//!
//! Orchestrates the three-stage council flow:
//!
//! 1. **Responses**: the question (with history) goes to every panel member
//! 2. **Rankings**: every panel member ranks the anonymized Stage 1 answers
//! 3. **Synthesis**: the chairman writes the final answer
//!
//! Individual model failures never abort a run. They shrink the stage's
//! result set, and a failed chairman call is replaced by a fixed notice.
//! Only a Stage 1 round with no survivors short-circuits, returning
//! [`CouncilResult::total_failure`].

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::model_query::{ModelQueryService, QueryError, QueryOutcome};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use council_domain::{
    AggregateEntry, ChairmanResult, ConversationTurn, CouncilConfig, CouncilMetadata,
    CouncilResult, DomainError, LabelMap, Message, Model, PanelAnswer, PeerRanking,
    PromptTemplate, Question, Stage, aggregate_rankings, anonymize, build_conversation_context,
    parse_ranking,
};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A model paired with the settled result of its call
type SettledCall = (Model, Result<String, QueryError>);

/// Errors that can stop a council run
///
/// Model failures are not errors; they are reflected in the result.
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error("No models configured")]
    NoModels,

    #[error("Invalid council configuration: {0}")]
    InvalidConfig(DomainError),

    #[error("Council run cancelled")]
    Cancelled,
}

impl From<DomainError> for RunCouncilError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::NoModels => RunCouncilError::NoModels,
            DomainError::Cancelled => RunCouncilError::Cancelled,
            other => RunCouncilError::InvalidConfig(other),
        }
    }
}

/// Input for the RunCouncil use case
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    /// The question to ask
    pub question: Question,
    /// Prior turns, oldest first
    pub history: Vec<ConversationTurn>,
    /// Panel members and chairman
    pub council: CouncilConfig,
    /// Per-call limits
    pub execution: ExecutionParams,
    /// Cancels in-flight calls of the current stage when triggered
    pub cancellation: Option<CancellationToken>,
}

impl RunCouncilInput {
    pub fn new(question: Question, council: CouncilConfig) -> Self {
        Self {
            question,
            history: Vec::new(),
            council,
            execution: ExecutionParams::default(),
            cancellation: None,
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Use case for running a council deliberation
#[derive(Clone)]
pub struct RunCouncilUseCase {
    query_service: Arc<dyn ModelQueryService>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl RunCouncilUseCase {
    pub fn new(query_service: Arc<dyn ModelQueryService>) -> Self {
        Self {
            query_service,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunCouncilInput) -> Result<CouncilResult, RunCouncilError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilResult, RunCouncilError> {
        input.council.validate()?;

        info!(
            "Starting council with {} panel members, chairman {}",
            input.council.panel().len(),
            input.council.chairman
        );
        self.conversation_logger.log(ConversationEvent::new(
            "council_started",
            serde_json::json!({
                "question": input.question.content(),
                "panel": input.council.panel(),
                "chairman": input.council.chairman,
                "history_turns": input.history.len(),
            }),
        ));

        // Stage 1: Independent responses
        let stage1 = self.stage1_collect_responses(&input, progress).await?;

        if stage1.is_empty() {
            warn!("Every panel member failed Stage 1, skipping rankings and synthesis");
            self.conversation_logger.log(ConversationEvent::new(
                "council_total_failure",
                serde_json::json!({ "panel": input.council.panel() }),
            ));
            return Ok(CouncilResult::total_failure());
        }

        // Stage 2: Anonymized peer rankings
        let label_map = anonymize(&stage1);
        let stage2 = self
            .stage2_collect_rankings(&input, &stage1, &label_map, progress)
            .await?;

        let aggregate = aggregate_rankings(&stage2, &label_map);
        self.conversation_logger.log(ConversationEvent::new(
            "aggregate_ranking",
            serde_json::json!({
                "label_map": label_map,
                "aggregate_ranking": aggregate,
            }),
        ));

        // Stage 3: Chairman synthesis
        let stage3 = self
            .stage3_synthesize(&input, &stage1, &stage2, &aggregate, progress)
            .await?;

        Ok(CouncilResult::new(
            stage1,
            stage2,
            stage3,
            CouncilMetadata {
                label_map,
                aggregate_ranking: aggregate,
            },
        ))
    }

    /// Stage 1: query every panel member with the conversation context
    async fn stage1_collect_responses(
        &self,
        input: &RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<PanelAnswer>, RunCouncilError> {
        let stage = Stage::Responses;
        info!("{}", stage);

        let messages = build_conversation_context(
            PromptTemplate::RESPONSE_SYSTEM,
            &input.history,
            input.question.content(),
        );
        debug!("Stage 1 context has {} messages", messages.len());

        let outcomes = self.fan_out(&stage, input, &messages, progress).await?;

        let mut answers = Vec::with_capacity(outcomes.len());
        for (model, result) in outcomes {
            match result {
                Ok(text) => {
                    self.conversation_logger.log(ConversationEvent::new(
                        "stage1_response",
                        serde_json::json!({ "model": model, "text": text }),
                    ));
                    answers.push(PanelAnswer::new(model, text));
                }
                Err(e) => {
                    self.conversation_logger.log(ConversationEvent::new(
                        "stage1_failure",
                        serde_json::json!({ "model": model, "error": e.to_string() }),
                    ));
                }
            }
        }

        info!(
            "Stage 1 complete: {}/{} panel members answered",
            answers.len(),
            input.council.panel().len()
        );
        Ok(answers)
    }

    /// Stage 2: every panel member ranks the anonymized answers
    async fn stage2_collect_rankings(
        &self,
        input: &RunCouncilInput,
        stage1: &[PanelAnswer],
        label_map: &LabelMap,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<PeerRanking>, RunCouncilError> {
        let stage = Stage::Rankings;
        info!("{}", stage);

        let prompt =
            PromptTemplate::ranking_prompt(input.question.content(), &label_map.labeled(stage1));
        let messages = vec![
            Message::system(PromptTemplate::RANKING_SYSTEM),
            Message::user(prompt),
        ];

        let outcomes = self.fan_out(&stage, input, &messages, progress).await?;

        let mut rankings = Vec::with_capacity(outcomes.len());
        for (model, result) in outcomes {
            match result {
                Ok(text) => {
                    let parsed_order = parse_ranking(&text);
                    debug!(
                        "{} ranked: {}",
                        model,
                        parsed_order
                            .iter()
                            .map(|l| l.letter().to_string())
                            .collect::<Vec<_>>()
                            .join(" > ")
                    );
                    if parsed_order.is_empty() {
                        warn!("No ranking could be extracted from {}'s evaluation", model);
                    }
                    self.conversation_logger.log(ConversationEvent::new(
                        "stage2_ranking",
                        serde_json::json!({
                            "model": model,
                            "text": text,
                            "parsed_order": parsed_order,
                        }),
                    ));
                    rankings.push(PeerRanking::new(model, text, parsed_order));
                }
                Err(e) => {
                    self.conversation_logger.log(ConversationEvent::new(
                        "stage2_failure",
                        serde_json::json!({ "model": model, "error": e.to_string() }),
                    ));
                }
            }
        }

        if rankings.is_empty() {
            warn!("No peer rankings were collected, synthesizing from answers alone");
        }
        Ok(rankings)
    }

    /// Stage 3: a single chairman call; failure becomes a notice
    async fn stage3_synthesize(
        &self,
        input: &RunCouncilInput,
        stage1: &[PanelAnswer],
        stage2: &[PeerRanking],
        aggregate: &[AggregateEntry],
        progress: &dyn ProgressNotifier,
    ) -> Result<ChairmanResult, RunCouncilError> {
        let stage = Stage::Synthesis;
        info!("{}", stage);
        progress.on_stage_start(&stage, 1);

        let chairman = input.council.chairman.clone();
        let prompt = PromptTemplate::synthesis_prompt(
            input.question.content(),
            stage1,
            stage2,
            aggregate,
        );
        debug!("Synthesis prompt is {} bytes", prompt.len());
        let messages = vec![
            Message::system(PromptTemplate::SYNTHESIS_SYSTEM),
            Message::user(prompt),
        ];

        let call = self.query_service.query_one(
            &chairman,
            &messages,
            input.execution.chairman_timeout,
        );
        let outcome = Self::cancellable(input.cancellation.as_ref(), call).await?;
        let (chairman, result) = QueryOutcome::new(chairman, outcome).into_text();

        let synthesis = match result {
            Ok(text) => {
                progress.on_task_complete(&stage, &chairman, true);
                self.conversation_logger.log(ConversationEvent::new(
                    "stage3_synthesis",
                    serde_json::json!({ "model": chairman, "text": text }),
                ));
                ChairmanResult::success(chairman, text)
            }
            Err(e) => {
                warn!("Chairman {} failed: {}", chairman, e);
                progress.on_task_complete(&stage, &chairman, false);
                self.conversation_logger.log(ConversationEvent::new(
                    "stage3_failure",
                    serde_json::json!({ "model": chairman, "error": e.to_string() }),
                ));
                ChairmanResult::failure(chairman)
            }
        };

        progress.on_stage_complete(&stage);
        Ok(synthesis)
    }

    /// One fan-out round across the whole panel.
    ///
    /// Outcomes come back in panel order regardless of the order the
    /// adapter returns them in, with blank replies counted as failures.
    async fn fan_out(
        &self,
        stage: &Stage,
        input: &RunCouncilInput,
        messages: &[Message],
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<SettledCall>, RunCouncilError> {
        let panel = input.council.panel();
        progress.on_stage_start(stage, panel.len());

        let call = self.query_service.query_many(panel, messages);
        let outcomes = Self::cancellable(input.cancellation.as_ref(), call).await?;
        let ordered = in_panel_order(panel, outcomes);

        for (model, result) in &ordered {
            match result {
                Ok(_) => info!("{} responded in {}", model, stage.as_str()),
                Err(e) => warn!("{} failed in {}: {}", model, stage.as_str(), e),
            }
            progress.on_task_complete(stage, model, result.is_ok());
        }

        progress.on_stage_complete(stage);
        Ok(ordered)
    }

    /// Await `future` unless the token fires first; dropping the future
    /// drops every call it still has in flight.
    async fn cancellable<F: Future>(
        token: Option<&CancellationToken>,
        future: F,
    ) -> Result<F::Output, RunCouncilError> {
        match token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    info!("Council run cancelled");
                    Err(RunCouncilError::Cancelled)
                }
                output = future => Ok(output),
            },
            None => Ok(future.await),
        }
    }
}

/// Arrange outcomes in panel configuration order.
///
/// Outcomes for models outside the panel are discarded; a panel member
/// with no outcome at all is simply absent.
fn in_panel_order(panel: &[Model], outcomes: Vec<QueryOutcome>) -> Vec<SettledCall> {
    let mut slots: Vec<Option<QueryOutcome>> = vec![None; panel.len()];
    for outcome in outcomes {
        let Some(index) = panel.iter().position(|m| *m == outcome.model) else {
            continue;
        };
        if slots[index].is_none() {
            slots[index] = Some(outcome);
        }
    }
    slots
        .into_iter()
        .flatten()
        .map(QueryOutcome::into_text)
        .collect()
}
