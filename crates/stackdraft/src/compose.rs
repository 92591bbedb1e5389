//! Stack composition: the business rules for mutating a stack against a
//! catalog.
//!
//! A [`Composer`] pairs a borrowed, read-only [`Catalog`] with an owned
//! [`Stack`] and enforces the composition rules: conflict and dependency
//! checking on add/remove, suggestion heuristics, and integration-flow
//! inference. All catalog access goes through the injected reference; there
//! are no process-wide singletons.
//!
//! # Known limitation
//!
//! Dependency validation and auto-resolution are deliberately single-pass
//! and non-transitive: a missing dependency's own missing dependencies are
//! neither reported nor resolved in the same call. Callers that want a
//! closed stack invoke [`Composer::auto_resolve_dependencies`] repeatedly
//! until it reports zero additions.

use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use stackdraft_catalog::Catalog;
use stackdraft_core::{
    Category, ComponentDefinition, IntegrationFlow, Layer, ProductFamily, Stack, StackManifest,
    stack::ConflictError,
};

use crate::FlowError;

/// Designated identity component suggested when no security-layer
/// component is selected.
const IDENTITY_COMPONENT: &str = "azure_ad";

/// Designated data-platform component suggested alongside Power Apps.
const DATA_PLATFORM_COMPONENT: &str = "dataverse";

/// Recoverable composition failures. The stack is always left consistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("component not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

/// Result of a successful [`Composer::add_component`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The component was already in the stack; nothing changed.
    AlreadyPresent,
}

/// Per-id results of a batch add.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub added: Vec<String>,
    pub failed: Vec<(String, ComposeError)>,
}

/// Serializable summary of the current stack state.
#[derive(Debug, Serialize)]
pub struct StackSummary {
    pub name: String,
    pub description: String,
    pub component_count: usize,
    pub flow_count: usize,
    pub categories: IndexMap<Category, usize>,
    pub layers: IndexMap<Layer, usize>,
    pub is_valid: bool,
    pub missing_dependencies: usize,
    pub suggestions_available: usize,
}

/// Mutates a [`Stack`] under the composition rules of a [`Catalog`].
#[derive(Debug)]
pub struct Composer<'a> {
    catalog: &'a Catalog,
    stack: Stack,
}

impl<'a> Composer<'a> {
    /// Starts a new, empty stack against the given catalog.
    pub fn new(catalog: &'a Catalog, name: impl Into<String>, description: impl Into<String>) -> Self {
        let stack = Stack::new(name, description);
        info!(stack = stack.name(); "Created new technology stack");
        Self { catalog, stack }
    }

    /// Resumes composition of an existing stack.
    pub fn with_stack(catalog: &'a Catalog, stack: Stack) -> Self {
        Self { catalog, stack }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Consumes the composer, yielding the composed stack.
    pub fn into_stack(self) -> Stack {
        self.stack
    }

    /// Adds a catalog component to the stack.
    ///
    /// Adding a component that is already present is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::NotFound`] for an unknown id, or
    /// [`ComposeError::Conflict`] if a present component is mutually
    /// exclusive with it. On failure the stack is unmodified.
    pub fn add_component(&mut self, component_id: &str) -> Result<AddOutcome, ComposeError> {
        let component = self
            .catalog
            .get(component_id)
            .ok_or_else(|| ComposeError::NotFound(component_id.to_string()))?;

        if self.stack.insert(component.clone())? {
            info!(
                component = component.id(),
                stack = self.stack.name();
                "Added component to stack",
            );
            Ok(AddOutcome::Added)
        } else {
            Ok(AddOutcome::AlreadyPresent)
        }
    }

    /// Adds several components, collecting per-id outcomes instead of
    /// stopping at the first failure.
    pub fn add_components<'i>(&mut self, ids: impl IntoIterator<Item = &'i str>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for id in ids {
            match self.add_component(id) {
                Ok(_) => outcome.added.push(id.to_string()),
                Err(err) => outcome.failed.push((id.to_string(), err)),
            }
        }

        outcome
    }

    /// Removes a component, cascading deletion of its flows.
    ///
    /// Returns whether anything was removed.
    pub fn remove_component(&mut self, component_id: &str) -> bool {
        let removed = self.stack.remove(component_id);
        if removed {
            info!(
                component = component_id,
                stack = self.stack.name();
                "Removed component from stack",
            );
        }
        removed
    }

    /// Reports one error per direct missing dependency of a present
    /// component. Single-pass and non-transitive (see module docs).
    pub fn validate_dependencies(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for component in self.stack.components() {
            for dependency_id in component.dependencies() {
                if !self.stack.contains(dependency_id) {
                    let dependency_name = self
                        .catalog
                        .get(dependency_id)
                        .map(ComponentDefinition::name)
                        .unwrap_or(dependency_id);
                    errors.push(format!(
                        "{} requires {} which is not selected",
                        component.name(),
                        dependency_name
                    ));
                }
            }
        }

        errors
    }

    /// Reports one error per unordered pair of present components where
    /// either side declares the other as a conflict.
    pub fn validate_conflicts(&self) -> Vec<String> {
        let components = self.stack.components();
        let mut errors = Vec::new();

        for (i, a) in components.iter().enumerate() {
            for b in &components[i + 1..] {
                if a.conflicts_with(b.id()) || b.conflicts_with(a.id()) {
                    errors.push(format!("{} conflicts with {}", a.name(), b.name()));
                }
            }
        }

        errors
    }

    /// All dependency and conflict diagnostics; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.validate_dependencies();
        errors.extend(self.validate_conflicts());
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Catalog definitions for every dependency referenced by a present
    /// component but not itself present, deduplicated, in stack order.
    ///
    /// Dependencies unknown to the catalog are skipped; they still show up
    /// in [`Composer::validate_dependencies`].
    pub fn missing_dependencies(&self) -> Vec<&'a ComponentDefinition> {
        let mut missing: Vec<&'a ComponentDefinition> = Vec::new();

        for component in self.stack.components() {
            for dependency_id in component.dependencies() {
                if self.stack.contains(dependency_id) {
                    continue;
                }
                if missing.iter().any(|dep| dep.id() == dependency_id) {
                    continue;
                }
                if let Some(dependency) = self.catalog.get(dependency_id) {
                    missing.push(dependency);
                }
            }
        }

        missing
    }

    /// Adds every currently missing dependency in a single pass.
    ///
    /// The missing set is computed once up front: dependencies of the
    /// just-added components are not resolved in the same call. Returns the
    /// number added and messages for any failures (e.g. a dependency that
    /// conflicts with a present component).
    pub fn auto_resolve_dependencies(&mut self) -> (usize, Vec<String>) {
        let missing_ids: Vec<String> = self
            .missing_dependencies()
            .into_iter()
            .map(|dep| dep.id().to_string())
            .collect();

        let mut added = 0;
        let mut errors = Vec::new();

        for id in &missing_ids {
            match self.add_component(id) {
                Ok(AddOutcome::Added) => added += 1,
                Ok(AddOutcome::AlreadyPresent) => {}
                Err(err) => errors.push(err.to_string()),
            }
        }

        info!(added; "Auto-resolved dependencies");
        (added, errors)
    }

    /// Suggests additional components for an arbitrary selection.
    ///
    /// Missing dependencies come first, then two fixed heuristics: a
    /// Power Apps selection without a Dataverse component suggests the
    /// data platform, and a selection with no security-layer component
    /// suggests the designated identity component. Duplicates are
    /// suppressed by id.
    pub fn suggest_additional_components(
        &self,
        selected_ids: &[&str],
    ) -> Vec<&'a ComponentDefinition> {
        let selected: Vec<&ComponentDefinition> = selected_ids
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect();

        let mut suggestions: Vec<&'a ComponentDefinition> = Vec::new();
        let mut suggest = |candidate: &'a ComponentDefinition,
                           suggestions: &mut Vec<&'a ComponentDefinition>| {
            if !suggestions.iter().any(|s| s.id() == candidate.id()) {
                suggestions.push(candidate);
            }
        };

        // Missing dependencies first.
        for component in &selected {
            for dependency_id in component.dependencies() {
                if selected_ids.contains(&dependency_id.as_str()) {
                    continue;
                }
                if let Some(dependency) = self.catalog.get(dependency_id) {
                    suggest(dependency, &mut suggestions);
                }
            }
        }

        let has_power_apps = selected.iter().any(|c| c.has_family(ProductFamily::PowerApps));
        let has_dataverse = selected.iter().any(|c| c.has_family(ProductFamily::Dataverse));
        let has_security = selected.iter().any(|c| c.layer() == Layer::Security);

        if has_power_apps && !has_dataverse {
            if let Some(dataverse) = self.catalog.get(DATA_PLATFORM_COMPONENT) {
                suggest(dataverse, &mut suggestions);
            }
        }

        if !has_security {
            if let Some(identity) = self.catalog.get(IDENTITY_COMPONENT) {
                suggest(identity, &mut suggestions);
            }
        }

        suggestions
    }

    /// Suggestions for the current stack contents.
    pub fn suggestions(&self) -> Vec<&'a ComponentDefinition> {
        let selected_ids: Vec<&str> = self.stack.components().iter().map(|c| c.id()).collect();
        self.suggest_additional_components(&selected_ids)
    }

    /// Infers integration flows from present dependency pairs without
    /// mutating the stack. See [`Stack::suggested_integrations`].
    pub fn generate_suggested_integrations(&self) -> Vec<IntegrationFlow> {
        self.stack.suggested_integrations()
    }

    /// Attaches every suggested integration flow whose id is not yet on the
    /// stack. Returns the number attached.
    pub fn apply_suggested_integrations(&mut self) -> usize {
        let mut applied = 0;

        for flow in self.stack.suggested_integrations() {
            let flow_name = flow.name().to_string();
            match self.stack.add_flow(flow) {
                Ok(()) => {
                    info!(flow = flow_name; "Added suggested integration flow");
                    applied += 1;
                }
                Err(err) => {
                    // Suggestions are computed against the current stack, so
                    // this only fires on duplicate ids raced by the caller.
                    debug!(flow = flow_name; "Skipping suggested flow: {err}");
                }
            }
        }

        applied
    }

    /// Attaches a caller-provided flow after endpoint/id validation.
    pub fn add_flow(&mut self, flow: IntegrationFlow) -> Result<(), FlowError> {
        let flow_name = flow.name().to_string();
        self.stack.add_flow(flow)?;
        info!(flow = flow_name; "Added integration flow");
        Ok(())
    }

    /// Removes a flow by id, returning whether anything was removed.
    pub fn remove_flow(&mut self, flow_id: &str) -> bool {
        self.stack.remove_flow(flow_id)
    }

    /// Summarizes the current stack: counts, validity, pending work.
    pub fn summary(&self) -> StackSummary {
        let mut categories: IndexMap<Category, usize> = IndexMap::new();
        let mut layers: IndexMap<Layer, usize> = IndexMap::new();

        for component in self.stack.components() {
            *categories.entry(component.category()).or_insert(0) += 1;
            *layers.entry(component.layer()).or_insert(0) += 1;
        }

        StackSummary {
            name: self.stack.name().to_string(),
            description: self.stack.description().to_string(),
            component_count: self.stack.len(),
            flow_count: self.stack.flows().len(),
            categories,
            layers,
            is_valid: self.is_valid(),
            missing_dependencies: self.missing_dependencies().len(),
            suggestions_available: self.suggestions().len(),
        }
    }

    /// Exports the stack's serializable field representation.
    pub fn manifest(&self) -> StackManifest {
        self.stack.manifest()
    }
}
