//! Run Agent use case
//!
//! Drives a task through the decision protocol. Each `decide` call asks a
//! model to answer, run code, or dispatch sub-tasks; `run` expands dispatches
//! depth-first, left to right, until every branch is complete.
//!
//! # Flow
//!
//! ```text
//! run(task)
//!   └─ decide(task, Base)
//!        ├─ answer        → log (task, content)               [done]
//!        ├─ code_execute  → execute → (repair once on failure) [done]
//!        └─ dispatch      → log sub-tasks                      [open]
//!             └─ run each sub-task with role Sub, depth + 1
//! ```
//!
//! One [`DecisionAgent`] owns one [`ResultLog`] and one instruction context
//! per role. Nothing is shared between agents.

mod types;

pub use types::{RunAgentError, RunAgentOutput};

use super::shared::{TimedOut, is_cancelled, with_timeout};
use crate::config::ExecutionParams;
use crate::ports::agent_progress::{AgentProgressNotifier, NoAgentProgress};
use crate::ports::code_executor::{CodeExecutor, ExecutorError};
use crate::ports::llm_gateway::{GenerationConfig, GenerationRequest, LlmGateway};
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use futures::future::BoxFuture;
use marshall_domain::core::string::truncate;
use marshall_domain::{
    AgentModels, AgentOutcome, AgentPromptTemplate, AgentRole, Decision, DecisionNode,
    InstructionContext, Model, ResultLog, Task, Toolkit, parse_decision,
};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Separator between scratchpad entries
pub const SCRATCHPAD_SEPARATOR: &str = "\n\n--------\n\n";

/// Recursive decision/dispatch orchestrator
pub struct DecisionAgent<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    executor: Option<Arc<dyn CodeExecutor>>,
    models: AgentModels,
    toolkit: Toolkit,
    params: ExecutionParams,
    base_context: InstructionContext,
    sub_context: InstructionContext,
    log: ResultLog,
    scratchpad: Vec<String>,
    progress: Arc<dyn AgentProgressNotifier>,
    run_logger: Arc<dyn RunLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> DecisionAgent<G> {
    pub fn new(gateway: Arc<G>, models: AgentModels) -> Self {
        let params = ExecutionParams::default();
        let toolkit = Toolkit::new();
        let context = fresh_context(&toolkit, &params);
        Self {
            gateway,
            executor: None,
            models,
            toolkit,
            params,
            base_context: context.clone(),
            sub_context: context,
            log: ResultLog::new(),
            scratchpad: Vec::new(),
            progress: Arc::new(NoAgentProgress),
            run_logger: Arc::new(NoRunLogger),
            cancellation_token: None,
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn CodeExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Register tools. Resets the instruction contexts.
    pub fn with_toolkit(mut self, toolkit: Toolkit) -> Self {
        self.toolkit = toolkit;
        self.reset();
        self
    }

    /// Set execution parameters. Resets the instruction contexts.
    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self.reset();
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn AgentProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_run_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.run_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn result_log(&self) -> &ResultLog {
        &self.log
    }

    pub fn models(&self) -> &AgentModels {
        &self.models
    }

    /// Instruction context currently held for `role`
    pub fn context(&self, role: AgentRole) -> &InstructionContext {
        match role {
            AgentRole::Base => &self.base_context,
            AgentRole::Sub => &self.sub_context,
        }
    }

    /// Outcome messages so far, joined by [`SCRATCHPAD_SEPARATOR`]
    pub fn scratchpad(&self) -> String {
        self.scratchpad.join(SCRATCHPAD_SEPARATOR)
    }

    /// Clear the log, the scratchpad and both instruction contexts.
    pub fn reset(&mut self) {
        self.log = ResultLog::new();
        self.scratchpad.clear();
        self.base_context = fresh_context(&self.toolkit, &self.params);
        self.sub_context = self.base_context.clone();
    }

    /// Make a single decision for `task` with the model bound to `role`.
    ///
    /// A dispatch comes back with `done == false`; the caller decides
    /// whether to run the sub-tasks.
    pub async fn decide(
        &mut self,
        task: &Task,
        role: AgentRole,
    ) -> Result<AgentOutcome, RunAgentError> {
        let repairs = self.params.max_repair_attempts;
        self.decide_at(task, role, 0, repairs).await
    }

    /// Drive `task` to completion, expanding every dispatch.
    ///
    /// Errors abort the run; entries already appended stay in
    /// [`DecisionAgent::result_log`].
    pub async fn run(&mut self, task: Task) -> Result<RunAgentOutput, RunAgentError> {
        info!("Starting agent run: {}", truncate(task.content(), 80));

        let tree = self.run_branch(task.clone(), AgentRole::Base, 0).await?;

        info!(
            "Agent run finished: {} decisions, depth {}",
            tree.decision_count(),
            tree.max_depth()
        );

        let final_answer = match self.models.refiner.clone() {
            Some(refiner) => Some(self.refine(&refiner, &task).await?),
            None => None,
        };

        Ok(RunAgentOutput {
            task,
            final_answer,
            result_log: self.log.clone(),
            scratchpad: self.scratchpad(),
            tree,
        })
    }

    fn run_branch(
        &mut self,
        task: Task,
        role: AgentRole,
        depth: usize,
    ) -> BoxFuture<'_, Result<DecisionNode, RunAgentError>> {
        Box::pin(async move {
            if depth > self.params.max_depth {
                warn!(
                    "Refusing sub-task at depth {} (max {}): {}",
                    depth,
                    self.params.max_depth,
                    truncate(task.content(), 60)
                );
                return Err(RunAgentError::RecursionLimitExceeded {
                    depth,
                    max: self.params.max_depth,
                });
            }

            let repairs = self.params.max_repair_attempts;
            let outcome = self.decide_at(&task, role, depth, repairs).await?;
            let pending = outcome.pending_subtasks();
            let mut node = DecisionNode::new(role, depth, outcome)?;

            let mut children = Vec::with_capacity(pending.len());
            for subtask in pending {
                children.push(self.run_branch(subtask, AgentRole::Sub, depth + 1).await?);
            }

            // A repaired execution is already complete; its repair's sub-tasks
            // hang off it directly.
            if node.state.is_terminal() {
                node.children = children;
            } else {
                node.complete(children)?;
            }
            Ok(node)
        })
    }

    fn decide_at<'a>(
        &'a mut self,
        task: &'a Task,
        role: AgentRole,
        depth: usize,
        repairs_left: usize,
    ) -> BoxFuture<'a, Result<AgentOutcome, RunAgentError>> {
        Box::pin(async move {
            let model = self.models.for_role(role).clone();
            debug!(
                "Deciding [{} @ depth {}] with {}: {}",
                role,
                depth,
                model,
                truncate(task.content(), 80)
            );
            self.progress.on_decision_start(task, role, depth);

            if !self.log.is_empty() {
                let rendered = match self.params.memory_entries {
                    Some(count) => self.log.render_recent(count),
                    None => self.log.render(),
                };
                let memory = AgentPromptTemplate::memory_block(&rendered);
                self.context_mut(role).push(memory);
            }
            debug!(
                "{} instructions: {} bytes",
                role,
                self.context(role).total_bytes()
            );

            let request = GenerationRequest::new(task.content())
                .with_instructions(self.context(role).entries())
                .with_config(self.decision_config());
            let raw = self.generate(&model, &request).await?;

            let decision = parse_decision(&raw).map_err(|e| {
                warn!("Model {} returned a malformed decision: {}", model, e);
                RunAgentError::MalformedDecision(e)
            })?;

            info!(
                "[{} @ depth {}] decided {}",
                role,
                depth,
                decision.kind()
            );
            self.progress.on_decision(task, decision.kind(), depth);
            self.run_logger.log(RunEvent::new(
                "decision",
                json!({
                    "task": task.content(),
                    "role": role.as_str(),
                    "depth": depth,
                    "model": model.to_string(),
                    "decision": decision.to_json(),
                }),
            ));

            let outcome = match decision {
                Decision::Answer(content) => {
                    self.log.push(task.content(), content.as_str());
                    AgentOutcome::answered(task.clone(), &content)
                }
                Decision::CodeExecute(code) => {
                    self.execute_code(task, code, depth, repairs_left).await?
                }
                Decision::Dispatch(subtasks) => {
                    if subtasks.len() > self.params.max_fan_out {
                        return Err(RunAgentError::FanOutExceeded {
                            count: subtasks.len(),
                            max: self.params.max_fan_out,
                        });
                    }
                    let names: Vec<&str> = subtasks.iter().map(Task::content).collect();
                    self.log
                        .push(task.content(), AgentPromptTemplate::dispatch_summary(&names));
                    AgentOutcome::dispatched(task.clone(), subtasks)
                }
            };

            if outcome.done {
                self.scratchpad.push(outcome.message_text());
            }
            Ok(outcome)
        })
    }

    async fn execute_code(
        &mut self,
        task: &Task,
        code: String,
        depth: usize,
        repairs_left: usize,
    ) -> Result<AgentOutcome, RunAgentError> {
        let Some(executor) = self.executor.clone() else {
            return Err(RunAgentError::MissingExecutor);
        };

        self.check_cancelled()?;
        let program = self.toolkit.wrap_program(&code);
        // A slow program is a failed execution, not a failed run.
        let execution = with_timeout(self.params.call_timeout, executor.execute(&program))
            .await
            .unwrap_or_else(|TimedOut(limit)| Err(ExecutorError::Timeout(limit.as_secs())));

        let (result, stdout, failure) = match execution {
            Ok(output) => (output.result_text(), output.stdout, None),
            Err(ExecutorError::SpawnFailed(reason)) => {
                return Err(RunAgentError::CodeExecution(ExecutorError::SpawnFailed(
                    reason,
                )));
            }
            Err(e) => (None, String::new(), Some(e.to_string())),
        };

        let success = result.is_some();
        self.progress.on_code_executed(task, success);
        self.run_logger.log(RunEvent::new(
            "code_execution",
            json!({
                "task": task.content(),
                "code": code,
                "result": result,
                "stdout": stdout,
                "error": failure,
            }),
        ));

        let mut outcome = AgentOutcome::executed(task.clone(), &code, result.as_deref());

        if !success && repairs_left > 0 {
            let reason = failure
                .clone()
                .unwrap_or_else(|| "the program did not bind a value to `result`".to_string());
            warn!(
                "Code execution for '{}' produced no result; requesting a repair",
                truncate(task.content(), 60)
            );
            self.progress.on_repair(task);
            let repair_task = Task::new(AgentPromptTemplate::code_repair(
                task.content(),
                &code,
                &reason,
            ));
            let repair = self
                .decide_at(&repair_task, AgentRole::Sub, depth, repairs_left - 1)
                .await?;
            outcome = outcome.with_repair(repair);
        }

        let mut summary =
            AgentPromptTemplate::execution_summary(&code, result.as_deref(), &stdout);
        if let Some(failure) = failure {
            summary.push_str(&format!("\nerror: {}", failure));
        }
        self.log.push(task.content(), summary);

        Ok(outcome)
    }

    async fn refine(&self, refiner: &Model, task: &Task) -> Result<String, RunAgentError> {
        info!("Refining run with {}", refiner);
        self.progress.on_refine_start();

        let request = GenerationRequest::new(AgentPromptTemplate::refiner_prompt(
            task.content(),
            &self.log.render(),
        ))
        .with_instruction(AgentPromptTemplate::refiner_system())
        .with_config(GenerationConfig::default().with_max_tokens(self.params.max_tokens));

        let answer = self.generate(refiner, &request).await?;
        self.run_logger.log(RunEvent::new(
            "refined",
            json!({ "task": task.content(), "model": refiner.to_string(), "answer": answer }),
        ));
        Ok(answer)
    }

    async fn generate(
        &self,
        model: &Model,
        request: &GenerationRequest,
    ) -> Result<String, RunAgentError> {
        self.check_cancelled()?;
        let response = with_timeout(self.params.call_timeout, self.gateway.generate(model, request))
            .await
            .map_err(|TimedOut(limit)| {
                warn!("Model {} timed out after {:?}", model, limit);
                RunAgentError::Timeout(limit)
            })??;
        Ok(response)
    }

    fn decision_config(&self) -> GenerationConfig {
        let config = GenerationConfig::json().with_max_tokens(self.params.max_tokens);
        match self.params.temperature {
            Some(t) => config.with_temperature(t),
            None => config,
        }
    }

    fn context_mut(&mut self, role: AgentRole) -> &mut InstructionContext {
        match role {
            AgentRole::Base => &mut self.base_context,
            AgentRole::Sub => &mut self.sub_context,
        }
    }

    fn check_cancelled(&self) -> Result<(), RunAgentError> {
        if is_cancelled(&self.cancellation_token) {
            return Err(RunAgentError::Cancelled);
        }
        Ok(())
    }
}

fn fresh_context(toolkit: &Toolkit, params: &ExecutionParams) -> InstructionContext {
    InstructionContext::with_system(
        AgentPromptTemplate::decision_system(toolkit),
        params.context_retention,
    )
}
