//! Component definitions and their fixed classification enumerations.
//!
//! A [`ComponentDefinition`] is an immutable, catalog-owned record describing
//! one selectable technology building block: its identity, classification
//! ([`Category`], [`Layer`]), relationships (dependencies, conflicts) and the
//! integration patterns it supports.
//!
//! # Classification
//!
//! - [`Category`] - Product grouping used for filtering and style hints
//! - [`Layer`] - Architectural tier; drives validation and left-to-right
//!   diagram placement via [`Layer::CANONICAL_ORDER`]
//! - [`IntegrationPattern`] - Connector/protocol tags; declaration order is
//!   the deterministic priority order for tie-breaking
//! - [`ProductFamily`] - Capability tags resolved once at catalog-load time,
//!   replacing ad-hoc substring checks on component ids

use std::fmt;

use serde::{Deserialize, Serialize};

/// Product category of a technology component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PowerPlatform,
    Dynamics365,
    AzureServices,
    SecurityOps,
}

impl Category {
    /// All categories, in display order. Used for catalog statistics.
    pub const ALL: [Category; 4] = [
        Category::PowerPlatform,
        Category::Dynamics365,
        Category::AzureServices,
        Category::SecurityOps,
    ];

    /// Stable lowercase token for this category, matching the catalog source.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::PowerPlatform => "power_platform",
            Category::Dynamics365 => "dynamics_365",
            Category::AzureServices => "azure_services",
            Category::SecurityOps => "security_ops",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Architectural tier a component belongs to.
///
/// The tier serves two purposes: structural validation (e.g. "at least one
/// data-layer component") and horizontal ordering of layer bands in the
/// generated layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Presentation,
    Application,
    Integration,
    Data,
    Security,
}

impl Layer {
    /// The canonical left-to-right ordering of layers in a diagram.
    ///
    /// Assemblers and layout engines must never reorder layers by edge
    /// density or band size; this table is the single source of truth.
    pub const CANONICAL_ORDER: [Layer; 5] = [
        Layer::Presentation,
        Layer::Application,
        Layer::Integration,
        Layer::Data,
        Layer::Security,
    ];

    /// Stable lowercase token for this layer, matching the catalog source.
    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Presentation => "presentation",
            Layer::Application => "application",
            Layer::Integration => "integration",
            Layer::Data => "data",
            Layer::Security => "security",
        }
    }

    /// Human-readable label for layer bands ("Presentation", "Data", ...).
    pub fn label(self) -> &'static str {
        match self {
            Layer::Presentation => "Presentation",
            Layer::Application => "Application",
            Layer::Integration => "Integration",
            Layer::Data => "Data",
            Layer::Security => "Security",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported connector/protocol pattern tags.
///
/// The declaration order doubles as the deterministic priority order: when an
/// engine must pick a single pattern out of a set intersection, the variant
/// with the lowest ordinal wins. Changing the order of these variants changes
/// which flows get suggested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationPattern {
    DataverseConnector,
    CustomConnector,
    RestApi,
    Odata,
    WebApi,
    LogicApps,
    PowerAutomate,
    AzureFunctions,
    ServiceBus,
    EventGrid,
}

impl IntegrationPattern {
    /// Stable lowercase token for this pattern, matching the catalog source.
    pub fn as_str(self) -> &'static str {
        match self {
            IntegrationPattern::DataverseConnector => "dataverse_connector",
            IntegrationPattern::CustomConnector => "custom_connector",
            IntegrationPattern::RestApi => "rest_api",
            IntegrationPattern::Odata => "odata",
            IntegrationPattern::WebApi => "web_api",
            IntegrationPattern::LogicApps => "logic_apps",
            IntegrationPattern::PowerAutomate => "power_automate",
            IntegrationPattern::AzureFunctions => "azure_functions",
            IntegrationPattern::ServiceBus => "service_bus",
            IntegrationPattern::EventGrid => "event_grid",
        }
    }

    /// Title-cased display label ("Rest Api", "Service Bus"), used for
    /// edge labels handed to the renderer.
    pub fn display_label(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for IntegrationPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability tags for suggestion and enhancement heuristics.
///
/// Resolved once from the component id when the catalog is loaded, so the
/// heuristics downstream never have to do substring matching themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductFamily {
    PowerApps,
    PowerAutomate,
    Dataverse,
    Monitoring,
}

impl ProductFamily {
    /// Infers the family tags carried by a component id.
    ///
    /// A component may carry several tags (e.g. a hypothetical
    /// `dataverse_insights` is both `Dataverse` and `Monitoring`).
    pub fn infer(id: &str) -> Vec<ProductFamily> {
        let mut families = Vec::new();
        if id.contains("power_apps") {
            families.push(ProductFamily::PowerApps);
        }
        if id.contains("power_automate") {
            families.push(ProductFamily::PowerAutomate);
        }
        if id.contains("dataverse") {
            families.push(ProductFamily::Dataverse);
        }
        if id.contains("monitor") || id.contains("insights") {
            families.push(ProductFamily::Monitoring);
        }
        families
    }
}

/// An immutable description of a selectable technology component.
///
/// Definitions are owned by the catalog and cloned into stacks when
/// selected; two stacks never share mutable state through a definition.
///
/// Self-references (a component listing its own id in `dependencies` or
/// `conflicts`) are not rejected here; catalog data is trusted on this
/// point. See DESIGN.md for the open question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    id: String,
    name: String,
    description: String,
    category: Category,
    subcategory: String,
    layer: Layer,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    conflicts: Vec<String>,
    #[serde(default)]
    integration_patterns: Vec<IntegrationPattern>,
    #[serde(default)]
    is_core: bool,
    #[serde(default)]
    pricing_tier: Option<String>,
    #[serde(default)]
    families: Vec<ProductFamily>,
}

impl ComponentDefinition {
    /// Creates a new definition, resolving its [`ProductFamily`] tags from
    /// the id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        subcategory: impl Into<String>,
        layer: Layer,
        dependencies: Vec<String>,
        conflicts: Vec<String>,
        integration_patterns: Vec<IntegrationPattern>,
        is_core: bool,
        pricing_tier: Option<String>,
    ) -> Self {
        let id = id.into();
        let families = ProductFamily::infer(&id);
        Self {
            id,
            name: name.into(),
            description: description.into(),
            category,
            subcategory: subcategory.into(),
            layer,
            dependencies,
            conflicts,
            integration_patterns,
            is_core,
            pricing_tier,
            families,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    pub fn integration_patterns(&self) -> &[IntegrationPattern] {
        &self.integration_patterns
    }

    pub fn is_core(&self) -> bool {
        self.is_core
    }

    pub fn pricing_tier(&self) -> Option<&str> {
        self.pricing_tier.as_deref()
    }

    pub fn families(&self) -> &[ProductFamily] {
        &self.families
    }

    /// Returns true if this component declares a dependency on `component_id`.
    pub fn depends_on(&self, component_id: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == component_id)
    }

    /// Returns true if this component declares a conflict with `component_id`.
    ///
    /// Note this is the one-directional declaration; callers that need the
    /// symmetric check must test both directions.
    pub fn conflicts_with(&self, component_id: &str) -> bool {
        self.conflicts.iter().any(|conflict| conflict == component_id)
    }

    /// Returns true if this component supports the given integration pattern.
    pub fn supports(&self, pattern: IntegrationPattern) -> bool {
        self.integration_patterns.contains(&pattern)
    }

    /// Returns true if this component carries the given family tag.
    pub fn has_family(&self, family: ProductFamily) -> bool {
        self.families.contains(&family)
    }

    /// The lowest-ordinal integration pattern supported by both components,
    /// if any. This is the deterministic tie-break used when inferring flows.
    pub fn common_pattern(&self, other: &ComponentDefinition) -> Option<IntegrationPattern> {
        self.integration_patterns
            .iter()
            .filter(|pattern| other.supports(**pattern))
            .min()
            .copied()
    }
}
