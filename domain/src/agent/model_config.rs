//! Role-based model configuration.
//!
//! [`AgentModels`] groups the model selections for the roles of a decision
//! agent. This is a static value object: once created, models don't change
//! at runtime.

use super::role::AgentRole;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Role-based model configuration.
///
/// - **Base**: decides on the task the caller submitted
/// - **Sub**: decides on every dispatched sub-task and code repair
/// - **Refiner** (optional): distils the finished result log into one answer
///
/// # Example
///
/// ```
/// use marshall_domain::{AgentModels, AgentRole, Model};
///
/// let models = AgentModels::new(Model::Gpt4o)
///     .with_sub(Model::Gpt4oMini)
///     .with_refiner(Model::ClaudeHaiku3);
///
/// assert_eq!(models.for_role(AgentRole::Sub), &Model::Gpt4oMini);
/// assert_eq!(models.refiner, Some(Model::ClaudeHaiku3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentModels {
    pub base: Model,
    pub sub: Model,
    pub refiner: Option<Model>,
}

impl Default for AgentModels {
    fn default() -> Self {
        Self::new(Model::default())
    }
}

impl AgentModels {
    /// Use one model for both base and sub roles, without a refiner.
    pub fn new(model: Model) -> Self {
        Self {
            base: model.clone(),
            sub: model,
            refiner: None,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_base(mut self, model: Model) -> Self {
        self.base = model;
        self
    }

    pub fn with_sub(mut self, model: Model) -> Self {
        self.sub = model;
        self
    }

    pub fn with_refiner(mut self, model: Model) -> Self {
        self.refiner = Some(model);
        self
    }

    /// Model bound to `role`
    pub fn for_role(&self, role: AgentRole) -> &Model {
        match role {
            AgentRole::Base => &self.base,
            AgentRole::Sub => &self.sub,
        }
    }
}
