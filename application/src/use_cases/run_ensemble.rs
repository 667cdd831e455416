//! Run Ensemble use case
//!
//! Samples one model N times at a high temperature and reconciles the
//! answers with exactly one strategy chosen at construction:
//!
//! - **Similarity**: embedding voting via [`SimilaritySelector`]
//! - **Agent**: a refiner model reads every answer and writes the best one

use super::select_answer::{SelectionError, SimilaritySelector};
use super::shared::{TimedOut, is_cancelled, with_timeout};
use crate::config::EnsembleParams;
use crate::ports::agent_progress::{AgentProgressNotifier, NoAgentProgress};
use crate::ports::embedder::Embedder;
use crate::ports::llm_gateway::{GatewayError, GenerationConfig, GenerationRequest, LlmGateway};
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use futures::{StreamExt, TryStreamExt, stream};
use marshall_domain::core::string::truncate;
use marshall_domain::{EnsembleResult, EnsemblePromptTemplate, Model, ReconcileStrategy};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during an ensemble run
#[derive(Error, Debug)]
pub enum RunEnsembleError {
    #[error("Invalid ensemble configuration: {0}")]
    Configuration(String),

    #[error("Every sample came back empty")]
    NoSamples,

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("Call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Builder for [`Ensemble`]; validation happens in [`EnsembleBuilder::build`].
pub struct EnsembleBuilder<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    model: Model,
    params: EnsembleParams,
    embedder: Option<Arc<dyn Embedder>>,
    refiner: Option<Model>,
}

impl<G: LlmGateway + 'static> EnsembleBuilder<G> {
    pub fn params(mut self, params: EnsembleParams) -> Self {
        self.params = params;
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn refiner(mut self, model: Model) -> Self {
        self.refiner = Some(model);
        self
    }

    pub fn build(self) -> Result<Ensemble<G>, RunEnsembleError> {
        if self.params.samples == 0 {
            return Err(RunEnsembleError::Configuration(
                "sample count must be at least 1".to_string(),
            ));
        }

        let reconciler = match self.params.strategy {
            ReconcileStrategy::Similarity => {
                let embedder = self.embedder.ok_or_else(|| {
                    RunEnsembleError::Configuration(
                        "similarity strategy requires an embedder".to_string(),
                    )
                })?;
                Reconciler::Similarity(
                    SimilaritySelector::new(embedder).with_call_timeout(self.params.call_timeout),
                )
            }
            ReconcileStrategy::Agent => {
                let refiner = self.refiner.ok_or_else(|| {
                    RunEnsembleError::Configuration(
                        "agent strategy requires a refiner model".to_string(),
                    )
                })?;
                Reconciler::Refiner(refiner)
            }
        };

        Ok(Ensemble {
            gateway: self.gateway,
            model: self.model,
            params: self.params,
            reconciler,
            progress: Arc::new(NoAgentProgress),
            run_logger: Arc::new(NoRunLogger),
            cancellation_token: None,
        })
    }
}

enum Reconciler {
    Similarity(SimilaritySelector),
    Refiner(Model),
}

/// N-sample ensemble over one model
pub struct Ensemble<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    model: Model,
    params: EnsembleParams,
    reconciler: Reconciler,
    progress: Arc<dyn AgentProgressNotifier>,
    run_logger: Arc<dyn RunLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> Ensemble<G> {
    pub fn builder(gateway: Arc<G>, model: Model) -> EnsembleBuilder<G> {
        EnsembleBuilder {
            gateway,
            model,
            params: EnsembleParams::default(),
            embedder: None,
            refiner: None,
        }
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

    pub fn params(&self) -> &EnsembleParams {
        &self.params
    }

    pub fn strategy(&self) -> ReconcileStrategy {
        self.params.strategy
    }

    /// Sample N answers for `query` and reconcile them into one.
    pub async fn run(&self, query: &str) -> Result<EnsembleResult, RunEnsembleError> {
        info!(
            "Starting ensemble: {} samples of {} ({} strategy)",
            self.params.samples, self.model, self.params.strategy
        );
        self.progress.on_ensemble_start(self.params.samples);

        let candidates = self.sample_all(query).await?;

        self.check_cancelled()?;
        self.progress.on_reconcile_start(self.params.strategy);
        let result = match &self.reconciler {
            Reconciler::Similarity(selector) => {
                let selection = selector.select(&candidates).await?;
                EnsembleResult::selected(query, candidates, selection.index, selection.scores)
            }
            Reconciler::Refiner(refiner) => {
                let answer = self.refine(refiner, query, &candidates).await?;
                EnsembleResult::refined(query, candidates, answer)
            }
        };

        self.progress.on_ensemble_complete(result.selected_index);
        self.run_logger.log(RunEvent::new(
            "selection",
            json!({
                "query": query,
                "strategy": result.strategy.as_str(),
                "selected_index": result.selected_index,
                "scores": result.scores.iter().map(|s| s.score).collect::<Vec<_>>(),
                "answer": result.answer,
            }),
        ));
        Ok(result)
    }

    /// Draw every sample, keeping sample order regardless of concurrency.
    async fn sample_all(&self, query: &str) -> Result<Vec<String>, RunEnsembleError> {
        let concurrency = self.params.concurrency.max(1);
        let samples: Vec<String> = stream::iter(0..self.params.samples)
            .map(|index| self.sample(index, query))
            .buffered(concurrency)
            .try_collect()
            .await?;

        let candidates: Vec<String> = samples
            .into_iter()
            .enumerate()
            .filter_map(|(index, sample)| {
                if sample.trim().is_empty() {
                    warn!("Sample {} came back empty; dropping it", index);
                    None
                } else {
                    Some(sample)
                }
            })
            .collect();

        if candidates.is_empty() {
            return Err(RunEnsembleError::NoSamples);
        }
        Ok(candidates)
    }

    async fn sample(&self, index: usize, query: &str) -> Result<String, RunEnsembleError> {
        self.check_cancelled()?;
        let request = GenerationRequest::new(query).with_config(
            GenerationConfig::default()
                .with_temperature(self.params.temperature)
                .with_max_tokens(self.params.max_tokens),
        );

        let result = self.generate(&self.model, &request).await;
        self.progress.on_sample_complete(index, result.is_ok());

        let text = result?;
        debug!("Sample {}: {}", index, truncate(&text, 80));
        self.run_logger.log(RunEvent::new(
            "sample",
            json!({ "index": index, "model": self.model.to_string(), "text": text }),
        ));
        Ok(text)
    }

    async fn refine(
        &self,
        refiner: &Model,
        query: &str,
        candidates: &[String],
    ) -> Result<String, RunEnsembleError> {
        info!("Refining {} answers with {}", candidates.len(), refiner);
        let request = GenerationRequest::new(EnsemblePromptTemplate::refiner_prompt(query))
            .with_instruction(EnsemblePromptTemplate::refiner_system(query, candidates))
            .with_config(GenerationConfig::default().with_max_tokens(self.params.max_tokens));
        self.generate(refiner, &request).await
    }

    async fn generate(
        &self,
        model: &Model,
        request: &GenerationRequest,
    ) -> Result<String, RunEnsembleError> {
        self.check_cancelled()?;
        let text = with_timeout(self.params.call_timeout, self.gateway.generate(model, request))
            .await
            .map_err(|TimedOut(limit)| RunEnsembleError::Timeout(limit))??;
        Ok(text)
    }

    fn check_cancelled(&self) -> Result<(), RunEnsembleError> {
        if is_cancelled(&self.cancellation_token) {
            return Err(RunEnsembleError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{Reply, ScriptedGateway, TableEmbedder};

    fn similarity_params(samples: usize) -> EnsembleParams {
        EnsembleParams::default()
            .with_samples(samples)
            .with_strategy(ReconcileStrategy::Similarity)
    }

    #[test]
    fn test_agent_strategy_requires_refiner() {
        let gateway = Arc::new(ScriptedGateway::texts(&[]));
        let result = Ensemble::builder(gateway, Model::Gpt4o)
            .params(EnsembleParams::default().with_strategy(ReconcileStrategy::Agent))
            .build();
        assert!(matches!(result, Err(RunEnsembleError::Configuration(_))));
    }

    #[test]
    fn test_similarity_strategy_requires_embedder() {
        let gateway = Arc::new(ScriptedGateway::texts(&[]));
        let result = Ensemble::builder(gateway, Model::Gpt4o)
            .params(similarity_params(3))
            .build();
        assert!(matches!(result, Err(RunEnsembleError::Configuration(_))));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let gateway = Arc::new(ScriptedGateway::texts(&[]));
        let result = Ensemble::builder(gateway, Model::Gpt4o)
            .params(similarity_params(0))
            .embedder(Arc::new(TableEmbedder::new(&[])))
            .build();
        assert!(matches!(result, Err(RunEnsembleError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_similarity_run_picks_consensus() {
        let gateway = Arc::new(ScriptedGateway::texts(&["4", "four", "5"]));
        let embedder = Arc::new(TableEmbedder::new(&[
            ("4", vec![1.0, 0.0]),
            ("four", vec![1.1, 0.0]),
            ("5", vec![3.0, 0.0]),
        ]));
        let ensemble = Ensemble::builder(Arc::clone(&gateway), Model::Gpt4o)
            .params(similarity_params(3))
            .embedder(embedder)
            .build()
            .unwrap();

        let result = ensemble.run("2+2?").await.unwrap();

        assert_eq!(result.candidates, vec!["4", "four", "5"]);
        assert_eq!(result.selected_index, Some(1));
        assert_eq!(result.answer, "four");
        assert_eq!(result.scores.len(), 3);

        for (_, request) in gateway.calls() {
            assert_eq!(request.prompt, "2+2?");
            assert_eq!(request.config.temperature, Some(1.0));
            assert!(!request.config.json_mode);
        }
    }

    #[tokio::test]
    async fn test_single_sample_skips_embedding() {
        let gateway = Arc::new(ScriptedGateway::texts(&["only"]));
        let embedder = Arc::new(TableEmbedder::new(&[]));
        let ensemble = Ensemble::builder(gateway, Model::Gpt4o)
            .params(similarity_params(1))
            .embedder(embedder.clone())
            .build()
            .unwrap();

        let result = ensemble.run("q").await.unwrap();

        assert_eq!(result.answer, "only");
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_agent_strategy_numbers_answers_for_refiner() {
        let gateway = Arc::new(ScriptedGateway::texts(&["4", "5", "The answer is 4."]));
        let ensemble = Ensemble::builder(Arc::clone(&gateway), Model::Gpt4o)
            .params(
                EnsembleParams::default()
                    .with_samples(2)
                    .with_strategy(ReconcileStrategy::Agent),
            )
            .refiner(Model::ClaudeSonnet35)
            .build()
            .unwrap();

        let result = ensemble.run("2+2?").await.unwrap();

        assert_eq!(result.answer, "The answer is 4.");
        assert!(result.selected_index.is_none());

        let calls = gateway.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].0, Model::ClaudeSonnet35);
        let system = &calls[2].1.instructions[0];
        assert!(system.contains("Agent 1: 4"));
        assert!(system.contains("Agent 2: 5"));
        assert!(calls[2].1.prompt.contains("2+2?"));
    }

    #[tokio::test]
    async fn test_concurrent_sampling_preserves_order() {
        let gateway = Arc::new(ScriptedGateway::texts(&["a", "b", "c", "d"]));
        let embedder = Arc::new(TableEmbedder::new(&[
            ("a", vec![0.0]),
            ("b", vec![1.0]),
            ("c", vec![2.0]),
            ("d", vec![3.0]),
        ]));
        let ensemble = Ensemble::builder(gateway, Model::Gpt4o)
            .params(similarity_params(4).with_concurrency(4))
            .embedder(embedder)
            .build()
            .unwrap();

        let result = ensemble.run("q").await.unwrap();

        assert_eq!(result.candidates, vec!["a", "b", "c", "d"]);
        assert_eq!(result.selected_index, Some(1));
    }

    #[tokio::test]
    async fn test_sample_failure_propagates() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Reply::Text("a".into()),
            Reply::Error("rate limited".into()),
        ]));
        let ensemble = Ensemble::builder(gateway, Model::Gpt4o)
            .params(similarity_params(2))
            .embedder(Arc::new(TableEmbedder::new(&[])))
            .build()
            .unwrap();

        let err = ensemble.run("q").await.unwrap_err();
        assert!(matches!(err, RunEnsembleError::Gateway(_)));
    }

    #[tokio::test]
    async fn test_blank_samples_are_dropped() {
        let gateway = Arc::new(ScriptedGateway::texts(&["  ", ""]));
        let ensemble = Ensemble::builder(gateway, Model::Gpt4o)
            .params(similarity_params(2))
            .embedder(Arc::new(TableEmbedder::new(&[])))
            .build()
            .unwrap();

        let err = ensemble.run("q").await.unwrap_err();
        assert!(matches!(err, RunEnsembleError::NoSamples));
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts_selection() {
        let gateway = Arc::new(ScriptedGateway::texts(&["a", "b"]));
        let ensemble = Ensemble::builder(gateway, Model::Gpt4o)
            .params(similarity_params(2))
            .embedder(Arc::new(TableEmbedder::new(&[("a", vec![0.0])])))
            .build()
            .unwrap();

        let err = ensemble.run("q").await.unwrap_err();
        assert!(matches!(
            err,
            RunEnsembleError::Selection(SelectionError::EmbeddingFailure { index: 1, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_sample_times_out() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Reply::Delayed(
            Duration::from_secs(60),
            "late".into(),
        )]));
        let ensemble = Ensemble::builder(gateway, Model::Gpt4o)
            .params(similarity_params(1).with_call_timeout(Some(Duration::from_secs(2))))
            .embedder(Arc::new(TableEmbedder::new(&[])))
            .build()
            .unwrap();

        let err = ensemble.run("q").await.unwrap_err();
        assert!(matches!(err, RunEnsembleError::Timeout(_)));
    }
}
