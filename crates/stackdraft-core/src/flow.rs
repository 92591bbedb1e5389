//! Integration flows: directed connections between two stack components.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::component::IntegrationPattern;

/// Errors raised when constructing or attaching an [`IntegrationFlow`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("flow source and target must be different components: {0}")]
    SelfReferential(String),

    #[error("flow {flow_id} references component {component_id} which is not in the stack")]
    MissingEndpoint { flow_id: String, component_id: String },

    #[error("integration flow {0} already exists")]
    Duplicate(String),
}

/// A directed (optionally bidirectional) connection between two components,
/// tagged with the connector/protocol pattern it uses.
///
/// Flows are created either explicitly by the caller or inferred by the
/// composition engine; in both cases they are owned by the stack that
/// references them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationFlow {
    id: String,
    name: String,
    source_component_id: String,
    target_component_id: String,
    pattern: IntegrationPattern,
    description: String,
    #[serde(default)]
    bidirectional: bool,
}

impl IntegrationFlow {
    /// Creates a new flow.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::SelfReferential`] if source and target name the
    /// same component.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        source_component_id: impl Into<String>,
        target_component_id: impl Into<String>,
        pattern: IntegrationPattern,
        description: impl Into<String>,
        bidirectional: bool,
    ) -> Result<Self, FlowError> {
        let source_component_id = source_component_id.into();
        let target_component_id = target_component_id.into();

        if source_component_id == target_component_id {
            return Err(FlowError::SelfReferential(source_component_id));
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            source_component_id,
            target_component_id,
            pattern,
            description: description.into(),
            bidirectional,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_component_id(&self) -> &str {
        &self.source_component_id
    }

    pub fn target_component_id(&self) -> &str {
        &self.target_component_id
    }

    pub fn pattern(&self) -> IntegrationPattern {
        self.pattern
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn bidirectional(&self) -> bool {
        self.bidirectional
    }

    /// Returns true if this flow has `component_id` as either endpoint.
    pub fn references(&self, component_id: &str) -> bool {
        self.source_component_id == component_id || self.target_component_id == component_id
    }
}
