//! The mutable stack aggregate: chosen components plus integration flows.
//!
//! A [`Stack`] preserves component insertion order, keeps component ids
//! unique, and maintains the structural invariant that every flow's source
//! and target reference components currently in the stack (enforced on
//! removal via cascade deletion).

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    component::{Category, ComponentDefinition, Layer},
    flow::{FlowError, IntegrationFlow},
};

/// Raised when adding a component that is mutually exclusive with one
/// already in the stack. The check is symmetric: either side declaring the
/// other is enough.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("component {component} conflicts with {existing}")]
pub struct ConflictError {
    pub component: String,
    pub existing: String,
}

/// A user-curated collection of components and their integration flows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    name: String,
    description: String,
    components: Vec<ComponentDefinition>,
    flows: Vec<IntegrationFlow>,
}

impl Stack {
    /// Creates a new, empty stack.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            components: Vec::new(),
            flows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The components in insertion order.
    pub fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }

    pub fn flows(&self) -> &[IntegrationFlow] {
        &self.flows
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, component_id: &str) -> bool {
        self.components.iter().any(|c| c.id() == component_id)
    }

    /// Looks up a component in the stack by id.
    pub fn get(&self, component_id: &str) -> Option<&ComponentDefinition> {
        self.components.iter().find(|c| c.id() == component_id)
    }

    /// All stack components in the given layer, in insertion order.
    pub fn components_by_layer(&self, layer: Layer) -> Vec<&ComponentDefinition> {
        self.components.iter().filter(|c| c.layer() == layer).collect()
    }

    /// All stack components in the given category, in insertion order.
    pub fn components_by_category(&self, category: Category) -> Vec<&ComponentDefinition> {
        self.components
            .iter()
            .filter(|c| c.category() == category)
            .collect()
    }

    /// Appends a component, preserving insertion order.
    ///
    /// Returns `Ok(false)` if the component is already present (a no-op,
    /// not an error).
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError`] if any present component is mutually
    /// exclusive with the new one; the stack is left unmodified.
    pub fn insert(&mut self, component: ComponentDefinition) -> Result<bool, ConflictError> {
        for existing in &self.components {
            if component.conflicts_with(existing.id()) || existing.conflicts_with(component.id()) {
                return Err(ConflictError {
                    component: component.id().to_string(),
                    existing: existing.id().to_string(),
                });
            }
        }

        if self.contains(component.id()) {
            return Ok(false);
        }

        self.components.push(component);
        Ok(true)
    }

    /// Removes a component and every flow that references it.
    ///
    /// Returns whether a component was actually removed.
    pub fn remove(&mut self, component_id: &str) -> bool {
        let before = self.components.len();
        self.components.retain(|c| c.id() != component_id);

        if self.components.len() < before {
            let flows_before = self.flows.len();
            self.flows.retain(|flow| !flow.references(component_id));
            if self.flows.len() < flows_before {
                debug!(
                    component_id,
                    removed_flows = flows_before - self.flows.len();
                    "Cascade-deleted flows for removed component",
                );
            }
            true
        } else {
            false
        }
    }

    /// Looks up a flow by id.
    pub fn flow(&self, flow_id: &str) -> Option<&IntegrationFlow> {
        self.flows.iter().find(|f| f.id() == flow_id)
    }

    /// Attaches a flow to the stack.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::MissingEndpoint`] if either endpoint is not a
    /// stack component, or [`FlowError::Duplicate`] if a flow with the same
    /// id already exists.
    pub fn add_flow(&mut self, flow: IntegrationFlow) -> Result<(), FlowError> {
        if !self.contains(flow.source_component_id()) {
            return Err(FlowError::MissingEndpoint {
                flow_id: flow.id().to_string(),
                component_id: flow.source_component_id().to_string(),
            });
        }
        if !self.contains(flow.target_component_id()) {
            return Err(FlowError::MissingEndpoint {
                flow_id: flow.id().to_string(),
                component_id: flow.target_component_id().to_string(),
            });
        }
        if self.flow(flow.id()).is_some() {
            return Err(FlowError::Duplicate(flow.id().to_string()));
        }

        self.flows.push(flow);
        Ok(())
    }

    /// Removes a flow by id, returning whether anything was removed.
    pub fn remove_flow(&mut self, flow_id: &str) -> bool {
        let before = self.flows.len();
        self.flows.retain(|f| f.id() != flow_id);
        self.flows.len() < before
    }

    /// Infers integration flows from dependency relationships.
    ///
    /// For each component `c` and each of its dependencies `d` that is also
    /// in the stack, the lowest-priority-ordinal pattern common to both is
    /// used to synthesize a flow `d → c` with id `"{d}_to_{c}"`. Pairs with
    /// no common pattern produce nothing, a pair whose flow id already
    /// exists on the stack is skipped, and a dependency entry naming the
    /// component itself never yields a flow.
    ///
    /// The result is deterministic: components are walked in insertion
    /// order and the pattern tie-break is the fixed enum priority order.
    pub fn suggested_integrations(&self) -> Vec<IntegrationFlow> {
        let mut suggestions = Vec::new();

        for component in &self.components {
            for dependency_id in component.dependencies() {
                // Self-references are tolerated in catalog data; they can
                // never form a flow.
                if dependency_id == component.id() {
                    continue;
                }
                let Some(dependency) = self.get(dependency_id) else {
                    continue;
                };
                let Some(pattern) = component.common_pattern(dependency) else {
                    continue;
                };

                let flow_id = format!("{}_to_{}", dependency.id(), component.id());
                if self.flow(&flow_id).is_some() {
                    continue;
                }

                let Ok(flow) = IntegrationFlow::new(
                    flow_id,
                    format!("{} → {}", dependency.name(), component.name()),
                    dependency.id(),
                    component.id(),
                    pattern,
                    format!("Data flow from {} to {}", dependency.name(), component.name()),
                    false,
                ) else {
                    continue;
                };

                suggestions.push(flow);
            }
        }

        suggestions
    }

    /// Exports the stack to its serializable field representation.
    pub fn manifest(&self) -> StackManifest {
        StackManifest {
            name: self.name.clone(),
            description: self.description.clone(),
            component_ids: self.components.iter().map(|c| c.id().to_string()).collect(),
            flows: self.flows.clone(),
        }
    }
}

/// Serializable field representation of a [`Stack`].
///
/// Components are referenced by id; re-adding them from a catalog
/// reproduces an equal component set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackManifest {
    pub name: String,
    pub description: String,
    pub component_ids: Vec<String>,
    pub flows: Vec<IntegrationFlow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::IntegrationPattern;

    fn component(id: &str, conflicts: Vec<&str>) -> ComponentDefinition {
        ComponentDefinition::new(
            id,
            id.to_uppercase(),
            "test component",
            Category::PowerPlatform,
            "testing",
            Layer::Application,
            vec![],
            conflicts.into_iter().map(String::from).collect(),
            vec![IntegrationPattern::RestApi],
            false,
            None,
        )
    }

    fn component_with_deps(id: &str, dependencies: Vec<&str>) -> ComponentDefinition {
        ComponentDefinition::new(
            id,
            id.to_uppercase(),
            "test component",
            Category::PowerPlatform,
            "testing",
            Layer::Application,
            dependencies.into_iter().map(String::from).collect(),
            vec![],
            vec![IntegrationPattern::RestApi],
            false,
            None,
        )
    }

    fn flow(id: &str, source: &str, target: &str) -> IntegrationFlow {
        IntegrationFlow::new(
            id,
            id,
            source,
            target,
            IntegrationPattern::RestApi,
            "",
            false,
        )
        .unwrap()
    }

    #[test]
    fn insert_twice_is_a_noop() {
        let mut stack = Stack::new("test", "");
        assert_eq!(stack.insert(component("power_bi", vec![])), Ok(true));
        assert_eq!(stack.insert(component("power_bi", vec![])), Ok(false));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn conflict_detection_is_symmetric() {
        // Only "b" declares the conflict; adding in either order must fail.
        let mut stack = Stack::new("test", "");
        stack.insert(component("a", vec![])).unwrap();
        assert!(stack.insert(component("b", vec!["a"])).is_err());

        let mut reversed = Stack::new("test", "");
        reversed.insert(component("b", vec!["a"])).unwrap();
        assert!(reversed.insert(component("a", vec![])).is_err());
    }

    #[test]
    fn conflict_leaves_stack_unmodified() {
        let mut stack = Stack::new("test", "");
        stack.insert(component("a", vec![])).unwrap();
        let _ = stack.insert(component("b", vec!["a"]));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn remove_cascades_flow_deletion() {
        let mut stack = Stack::new("test", "");
        stack.insert(component("x", vec![])).unwrap();
        stack.insert(component("y", vec![])).unwrap();
        stack.add_flow(flow("x_to_y", "x", "y")).unwrap();

        assert!(stack.remove("x"));
        assert!(stack.flows().is_empty());
    }

    #[test]
    fn add_flow_requires_both_endpoints() {
        let mut stack = Stack::new("test", "");
        stack.insert(component("x", vec![])).unwrap();

        let err = stack.add_flow(flow("x_to_y", "x", "y")).unwrap_err();
        assert!(matches!(err, FlowError::MissingEndpoint { .. }));
    }

    #[test]
    fn duplicate_flow_id_is_rejected() {
        let mut stack = Stack::new("test", "");
        stack.insert(component("x", vec![])).unwrap();
        stack.insert(component("y", vec![])).unwrap();
        stack.add_flow(flow("x_to_y", "x", "y")).unwrap();

        let err = stack.add_flow(flow("x_to_y", "x", "y")).unwrap_err();
        assert_eq!(err, FlowError::Duplicate("x_to_y".to_string()));
    }

    #[test]
    fn suggested_integrations_skip_existing_flow_ids() {
        let mut stack = Stack::new("test", "");
        stack.insert(component("store", vec![])).unwrap();
        stack
            .insert(component_with_deps("app", vec!["store"]))
            .unwrap();

        let first = stack.suggested_integrations();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id(), "store_to_app");

        stack.add_flow(first[0].clone()).unwrap();
        assert!(stack.suggested_integrations().is_empty());
    }

    #[test]
    fn self_dependency_yields_no_suggested_flow() {
        // Catalog data may list a component's own id as a dependency; the
        // pair must be skipped, not turned into a self-referential flow.
        let mut stack = Stack::new("test", "");
        stack
            .insert(component_with_deps("dataverse", vec!["dataverse"]))
            .unwrap();

        assert!(stack.suggested_integrations().is_empty());
    }

    #[test]
    fn manifest_round_trip_reproduces_component_set() {
        let mut stack = Stack::new("test", "demo");
        stack.insert(component("a", vec![])).unwrap();
        stack.insert(component("b", vec![])).unwrap();
        stack.add_flow(flow("a_to_b", "a", "b")).unwrap();

        let manifest = stack.manifest();

        let mut rebuilt = Stack::new(&manifest.name, &manifest.description);
        for id in &manifest.component_ids {
            rebuilt.insert(component(id, vec![])).unwrap();
        }
        for f in &manifest.flows {
            rebuilt.add_flow(f.clone()).unwrap();
        }

        let mut original_ids: Vec<_> = stack.components().iter().map(|c| c.id()).collect();
        let mut rebuilt_ids: Vec<_> = rebuilt.components().iter().map(|c| c.id()).collect();
        original_ids.sort_unstable();
        rebuilt_ids.sort_unstable();
        assert_eq!(original_ids, rebuilt_ids);
        assert_eq!(stack.flows(), rebuilt.flows());
    }
}
