//! Scripted port implementations shared by use case tests.

use crate::ports::code_executor::{CodeExecutor, ExecutionOutput, ExecutorError};
use crate::ports::embedder::{Embedder, EmbeddingError};
use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use async_trait::async_trait;
use marshall_domain::{Embedding, Model};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// A scripted gateway reply
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Text(String),
    Error(String),
    /// Sleep before answering (drives timeout tests under paused time)
    Delayed(Duration, String),
}

/// Gateway that answers from a script and records every request
pub(crate) struct ScriptedGateway {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(Model, GenerationRequest)>>,
}

impl ScriptedGateway {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn texts(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Reply::Text(r.to_string())).collect())
    }

    pub(crate) fn calls(&self) -> Vec<(Model, GenerationRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|(_, request)| request.prompt)
            .collect()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn generate(
        &self,
        model: &Model,
        request: &GenerationRequest,
    ) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.clone(), request.clone()));
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Error(e)) => Err(GatewayError::RequestFailed(e)),
            Some(Reply::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(GatewayError::Other("script exhausted".to_string())),
        }
    }
}

/// Executor that returns scripted outputs and records every program
pub(crate) struct ScriptedExecutor {
    outputs: Mutex<VecDeque<Result<ExecutionOutput, ExecutorError>>>,
    sources: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedExecutor {
    pub(crate) fn new(outputs: Vec<Result<ExecutionOutput, ExecutorError>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            sources: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep before every execution
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn sources(&self) -> Vec<String> {
        self.sources.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeExecutor for ScriptedExecutor {
    async fn execute(&self, source: &str) -> Result<ExecutionOutput, ExecutorError> {
        self.sources.lock().unwrap().push(source.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ExecutionOutput::empty()))
    }
}

/// Embedder backed by a lookup table; unknown text fails
pub(crate) struct TableEmbedder {
    table: HashMap<String, Embedding>,
    calls: Mutex<Vec<String>>,
}

impl TableEmbedder {
    pub(crate) fn new(entries: &[(&str, Embedding)]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(text, e)| (text.to_string(), e.clone()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Embedder for TableEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| EmbeddingError::RequestFailed(format!("no embedding for '{}'", text)))
    }
}
