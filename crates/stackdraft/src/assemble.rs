//! Architecture assembly: a stack organized into architectural layers.
//!
//! An [`Architecture`] wraps a [`Stack`] and maintains a derived index of
//! component ids grouped by [`Layer`]. The index is rebuilt after every
//! mutation, so readers always observe the current grouping. Layer order is
//! fixed by [`Layer::CANONICAL_ORDER`] and never influenced by band size or
//! edge density.

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use stackdraft_core::{
    Category, ComponentDefinition, Layer, ProductFamily, Stack, stack::ConflictError,
};

use crate::compose::Composer;

/// A technology stack organized into architectural layers, ready for
/// layout.
#[derive(Debug, Clone, Serialize)]
pub struct Architecture {
    stack: Stack,
    layer_organization: IndexMap<Layer, Vec<String>>,
}

impl Architecture {
    /// Wraps a stack and organizes its components by layer.
    pub fn new(stack: Stack) -> Self {
        let mut architecture = Self {
            stack,
            layer_organization: IndexMap::new(),
        };
        architecture.organize();
        architecture
    }

    /// Builds an architecture from a composer, first attaching every
    /// suggested integration flow not already on the stack.
    pub fn from_composer(mut composer: Composer<'_>) -> Self {
        let applied = composer.apply_suggested_integrations();
        if applied > 0 {
            debug!(applied; "Attached suggested integration flows during assembly");
        }
        Self::new(composer.into_stack())
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn into_stack(self) -> Stack {
        self.stack
    }

    /// Component ids grouped by layer, in canonical layer order with
    /// per-layer insertion order.
    pub fn layer_organization(&self) -> &IndexMap<Layer, Vec<String>> {
        &self.layer_organization
    }

    fn organize(&mut self) {
        self.layer_organization.clear();
        for layer in Layer::CANONICAL_ORDER {
            let ids: Vec<String> = self
                .stack
                .components_by_layer(layer)
                .iter()
                .map(|c| c.id().to_string())
                .collect();
            if !ids.is_empty() {
                self.layer_organization.insert(layer, ids);
            }
        }
    }

    /// Adds a component to the underlying stack and reorganizes.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError`] if the component is mutually exclusive
    /// with one already present.
    pub fn add_component(&mut self, component: ComponentDefinition) -> Result<bool, ConflictError> {
        let added = self.stack.insert(component)?;
        if added {
            self.organize();
        }
        Ok(added)
    }

    /// Removes a component (cascading flow deletion) and reorganizes.
    pub fn remove_component(&mut self, component_id: &str) -> bool {
        let removed = self.stack.remove(component_id);
        if removed {
            self.organize();
        }
        removed
    }

    /// Non-empty layers, in canonical order. This is the band order handed
    /// to the layout engine.
    pub fn layer_order(&self) -> Vec<Layer> {
        self.layer_organization.keys().copied().collect()
    }

    /// The components of one layer, in insertion order.
    pub fn components_in_layer(&self, layer: Layer) -> Vec<&ComponentDefinition> {
        self.layer_organization
            .get(&layer)
            .map(|ids| ids.iter().filter_map(|id| self.stack.get(id)).collect())
            .unwrap_or_default()
    }

    /// Integration complexity on a 1 (trivial) to 10 (very complex) scale.
    pub fn complexity_score(&self) -> usize {
        complexity(
            self.stack.len(),
            self.stack.flows().len(),
            self.layer_organization.len(),
        )
    }

    /// Structural diagnostics for the assembled architecture.
    ///
    /// Checks dependency closure at the id level, flow endpoint integrity,
    /// pattern compatibility of both flow endpoints, and presence of a
    /// data-layer component. Diagnostics are collected, never thrown; an
    /// architecture with warnings still lays out.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for component in self.stack.components() {
            for dependency_id in component.dependencies() {
                if !self.stack.contains(dependency_id) {
                    errors.push(format!(
                        "Component {} requires {} which is not selected",
                        component.id(),
                        dependency_id
                    ));
                }
            }
        }

        for flow in self.stack.flows() {
            let source = self.stack.get(flow.source_component_id());
            let target = self.stack.get(flow.target_component_id());

            if source.is_none() {
                errors.push(format!(
                    "Integration flow {} references missing source component {}",
                    flow.id(),
                    flow.source_component_id()
                ));
            }
            if target.is_none() {
                errors.push(format!(
                    "Integration flow {} references missing target component {}",
                    flow.id(),
                    flow.target_component_id()
                ));
            }

            for endpoint in [source, target].into_iter().flatten() {
                if !endpoint.supports(flow.pattern()) {
                    errors.push(format!(
                        "Component {} does not support integration pattern {}",
                        endpoint.id(),
                        flow.pattern()
                    ));
                }
            }
        }

        if !self.layer_organization.contains_key(&Layer::Data) {
            errors.push("Architecture should include at least one data layer component".to_string());
        }

        errors
    }

    /// Best-practice suggestions, produced by a fixed battery of checks in
    /// declaration order. Advisory only; none of these block assembly.
    pub fn enhancement_suggestions(&self) -> Vec<String> {
        let components = self.stack.components();
        let mut suggestions = Vec::new();

        let has_security = self.layer_organization.contains_key(&Layer::Security);
        if !has_security {
            suggestions
                .push("Consider adding Azure Active Directory for identity management".to_string());
        }

        let has_monitoring = components
            .iter()
            .any(|c| c.has_family(ProductFamily::Monitoring));
        if !has_monitoring {
            suggestions
                .push("Consider adding Azure Application Insights for monitoring".to_string());
        }

        let has_data_layer = self.layer_organization.contains_key(&Layer::Data);
        if !has_data_layer {
            suggestions.push("Consider adding a data storage component like Dataverse".to_string());
        }

        let has_power_apps = components
            .iter()
            .any(|c| c.has_family(ProductFamily::PowerApps));
        let has_power_automate = components
            .iter()
            .any(|c| c.has_family(ProductFamily::PowerAutomate));
        let has_dataverse = components
            .iter()
            .any(|c| c.has_family(ProductFamily::Dataverse));

        if has_power_apps && !has_dataverse {
            suggestions.push("Power Apps works best with Dataverse for data storage".to_string());
        }

        if has_power_apps && !has_power_automate {
            suggestions.push(
                "Consider Power Automate for workflow automation with Power Apps".to_string(),
            );
        }

        let has_dynamics = components
            .iter()
            .any(|c| c.category() == Category::Dynamics365);
        if has_dynamics && !has_dataverse {
            suggestions
                .push("Dynamics 365 applications require Dataverse for data storage".to_string());
        }

        let has_integration = self.layer_organization.contains_key(&Layer::Integration);
        if components.len() > 3 && !has_integration {
            suggestions.push(
                "Consider adding integration services like Azure Logic Apps or Power Automate"
                    .to_string(),
            );
        }

        suggestions
    }
}

/// Complexity formula: component, flow and layer counts folded into a
/// single 1..=10 score with floor division.
fn complexity(component_count: usize, flow_count: usize, layer_count: usize) -> usize {
    (component_count / 3 + flow_count / 2 + layer_count).clamp(1, 10)
}
