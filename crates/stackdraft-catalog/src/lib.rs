//! Read-only catalog index over the full set of component definitions.
//!
//! The catalog is loaded once at startup (see [`loader`]) and treated as
//! read-only for the lifetime of the process. All query methods preserve
//! the original catalog load order.
//!
//! Loading failure (missing or malformed source) is a fatal startup error
//! ([`CatalogError`]); individual malformed records inside an otherwise
//! valid source are skipped with a logged warning instead.

pub mod loader;

use indexmap::IndexMap;
use serde::Serialize;

use stackdraft_core::{Category, ComponentDefinition, IntegrationPattern, Layer};

pub use loader::{CatalogError, load_path};

/// Lookup and search index over all known component definitions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    components: IndexMap<String, ComponentDefinition>,
}

impl Catalog {
    /// Builds a catalog from an iterator of definitions.
    ///
    /// A later definition with a duplicate id replaces the earlier one,
    /// keeping the earlier position in the order.
    pub fn from_components(components: impl IntoIterator<Item = ComponentDefinition>) -> Self {
        let components = components
            .into_iter()
            .map(|component| (component.id().to_string(), component))
            .collect();
        Self { components }
    }

    /// Number of components in the catalog.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Looks up a component by id.
    pub fn get(&self, component_id: &str) -> Option<&ComponentDefinition> {
        self.components.get(component_id)
    }

    /// All components in catalog order.
    pub fn all(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.components.values()
    }

    /// All component ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Components in the given category, catalog order preserved.
    pub fn by_category(&self, category: Category) -> Vec<&ComponentDefinition> {
        self.all().filter(|c| c.category() == category).collect()
    }

    /// Components in the given subcategory of a category.
    pub fn by_subcategory(&self, category: Category, subcategory: &str) -> Vec<&ComponentDefinition> {
        self.all()
            .filter(|c| c.category() == category && c.subcategory() == subcategory)
            .collect()
    }

    /// Components in the given architectural layer.
    pub fn by_layer(&self, layer: Layer) -> Vec<&ComponentDefinition> {
        self.all().filter(|c| c.layer() == layer).collect()
    }

    /// Core/foundational components (selection-UI default hints).
    pub fn core_components(&self) -> Vec<&ComponentDefinition> {
        self.all().filter(|c| c.is_core()).collect()
    }

    /// Components supporting the given integration pattern.
    pub fn with_pattern(&self, pattern: IntegrationPattern) -> Vec<&ComponentDefinition> {
        self.all().filter(|c| c.supports(pattern)).collect()
    }

    /// Case-insensitive search over id, name and description.
    pub fn search(&self, query: &str) -> Vec<&ComponentDefinition> {
        let query = query.to_lowercase();
        self.all()
            .filter(|c| {
                c.id().to_lowercase().contains(&query)
                    || c.name().to_lowercase().contains(&query)
                    || c.description().to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Aggregate counts over the catalog.
    pub fn statistics(&self) -> CatalogStatistics {
        let by_category = Category::ALL
            .iter()
            .map(|&category| (category, self.by_category(category).len()))
            .collect();
        let by_layer = Layer::CANONICAL_ORDER
            .iter()
            .map(|&layer| (layer, self.by_layer(layer).len()))
            .collect();

        CatalogStatistics {
            total: self.len(),
            core: self.core_components().len(),
            by_category,
            by_layer,
        }
    }
}

/// Aggregate component counts for the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStatistics {
    pub total: usize,
    pub core: usize,
    pub by_category: IndexMap<Category, usize>,
    pub by_layer: IndexMap<Layer, usize>,
}
