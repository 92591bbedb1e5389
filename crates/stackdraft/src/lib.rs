//! Stackdraft - Composition and layout engine for technology-stack
//! architecture diagrams.
//!
//! Stack composition, validation, layer assembly, and banded geometric
//! layout for architecture diagrams built from a technology catalog.

pub mod assemble;
pub mod compose;
pub mod config;
pub mod export;
pub mod layout;

mod error;

pub use stackdraft_catalog::{Catalog, CatalogError};
pub use stackdraft_core::{
    Category, ComponentDefinition, FlowError, IntegrationFlow, IntegrationPattern, Layer, Point,
    ProductFamily, Size, Stack, StackManifest,
};

pub use assemble::Architecture;
pub use compose::{AddOutcome, BatchOutcome, ComposeError, Composer, StackSummary};
pub use config::{AppConfig, LayoutConfig};
pub use error::StackdraftError;
pub use export::{RenderError, RenderSpec, Renderer};
pub use layout::{Engine, Layout};

use log::{debug, info, warn};

/// Facade for running the full composition-to-render pipeline.
///
/// Each stage is also usable on its own ([`Composer`], [`Architecture`],
/// [`Engine`], [`RenderSpec`]); the pipeline just wires them together with
/// one shared configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use stackdraft::{AppConfig, Catalog, Pipeline};
///
/// let catalog = stackdraft_catalog::load_path("catalog.json")
///     .expect("Failed to load catalog");
///
/// let pipeline = Pipeline::new(AppConfig::default());
/// let spec = pipeline
///     .generate(&catalog, "Sales Platform", "CRM rollout", &["dynamics_365_sales", "dataverse"])
///     .expect("Failed to generate");
///
/// println!("{}", serde_json::to_string_pretty(&spec).expect("Failed to serialize"));
/// ```
#[derive(Debug, Default)]
pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Composes a stack from catalog component ids.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] for an unknown id or a conflicting pair;
    /// composition is all-or-error here, unlike the per-id batch API on
    /// [`Composer`].
    pub fn compose<'a>(
        &self,
        catalog: &'a Catalog,
        name: &str,
        description: &str,
        component_ids: &[&str],
    ) -> Result<Composer<'a>, ComposeError> {
        info!(name, components = component_ids.len(); "Composing stack");

        let mut composer = Composer::new(catalog, name, description);
        for id in component_ids {
            composer.add_component(id)?;
        }

        debug!("Stack composed successfully");
        Ok(composer)
    }

    /// Assembles a composed stack into a layered architecture.
    ///
    /// Suggested integration flows are attached first, then the assembled
    /// architecture is validated; diagnostics are logged as warnings, never
    /// fatal. An architecture with warnings still lays out.
    pub fn assemble(&self, composer: Composer<'_>) -> Architecture {
        let architecture = Architecture::from_composer(composer);

        let diagnostics = architecture.validate();
        if !diagnostics.is_empty() {
            warn!(count = diagnostics.len(); "Assembled architecture has validation warnings");
            for diagnostic in &diagnostics {
                warn!("{diagnostic}");
            }
        }

        info!(
            components = architecture.stack().len(),
            layers = architecture.layer_order().len();
            "Assembled architecture",
        );
        architecture
    }

    /// Calculates the banded layout for an architecture.
    pub fn layout(&self, architecture: &Architecture) -> Layout {
        Engine::new(self.config.layout().clone()).calculate(architecture)
    }

    /// Lays out an architecture and flattens it into a renderer-ready spec.
    pub fn render_spec(&self, architecture: &Architecture) -> RenderSpec {
        let layout = self.layout(architecture);
        RenderSpec::build(architecture, &layout)
    }

    /// Runs the whole pipeline: compose, assemble, layout, flatten.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] if any id is unknown or conflicts.
    pub fn generate(
        &self,
        catalog: &Catalog,
        name: &str,
        description: &str,
        component_ids: &[&str],
    ) -> Result<RenderSpec, ComposeError> {
        let composer = self.compose(catalog, name, description, component_ids)?;
        let architecture = self.assemble(composer);
        Ok(self.render_spec(&architecture))
    }
}
