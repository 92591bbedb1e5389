//! Renderer hand-off for laid-out architectures.
//!
//! This module is the final stage in the stackdraft pipeline: it flattens a
//! [`Layout`] and its [`Architecture`] into a serializable [`RenderSpec`]
//! and defines the [`Renderer`] trait that output backends implement.
//! Drawing, file formats and styling decisions are the renderer's concern;
//! the spec only carries positions, labels and style hints.
//!
//! # Pipeline Position
//!
//! ```text
//! Architecture
//!     ↓ layout
//! Layout
//!     ↓ export (this module)
//! RenderSpec → Renderer backend
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

use stackdraft_core::{Category, IntegrationPattern, Layer};

use crate::assemble::Architecture;
use crate::layout::Layout;

/// Errors that can occur in a rendering backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Abstraction for rendering backends.
///
/// Implementors consume a [`RenderSpec`] and produce output in their own
/// format (SVG, drawing-tool documents, ...). The engine itself ships no
/// backend; the built-in CLI serializes the spec to JSON.
pub trait Renderer {
    /// Renders a spec to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Render`] if the spec cannot be expressed in
    /// the target format, or [`RenderError::Io`] if writing output fails.
    fn render(&mut self, spec: &RenderSpec) -> Result<(), RenderError>;
}

/// Canvas geometry shared by every element of a spec.
#[derive(Debug, Clone, Serialize)]
pub struct CanvasSpec {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

/// Style hints for one node. Concrete colors and shapes are the renderer's
/// choice; the category tag is the hook for palette mapping.
#[derive(Debug, Clone, Serialize)]
pub struct NodeStyle {
    pub category: Category,
    pub is_core: bool,
}

/// One positioned, labeled node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSpec {
    pub id: String,
    pub label: String,
    pub layer: Layer,
    pub x: f32,
    pub y: f32,
    pub style: NodeStyle,
}

/// Style hints for one edge.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeStyle {
    pub pattern: IntegrationPattern,
    pub bidirectional: bool,
}

/// One edge between two nodes, labeled with its integration pattern.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeSpec {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub label: String,
    pub style: EdgeStyle,
}

/// A labeled layer band, for renderers that draw band backgrounds.
#[derive(Debug, Clone, Serialize)]
pub struct BandSpec {
    pub layer: Layer,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The complete, self-contained input to a rendering backend.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSpec {
    pub name: String,
    pub canvas: CanvasSpec,
    pub bands: Vec<BandSpec>,
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
}

impl RenderSpec {
    /// Flattens a layout and its architecture into a renderer-ready spec.
    ///
    /// Nodes whose component is missing from the stack and edges whose flow
    /// is missing are skipped; the layout engine only produces such entries
    /// from inconsistent input, and rendering should degrade rather than
    /// fail.
    pub fn build(architecture: &Architecture, layout: &Layout) -> Self {
        let stack = architecture.stack();

        let bands = layout
            .bands()
            .iter()
            .map(|band| BandSpec {
                layer: band.layer(),
                label: band.layer().label().to_string(),
                x: band.origin().x(),
                y: band.origin().y(),
                width: band.size().width(),
                height: band.size().height(),
            })
            .collect();

        let nodes = layout
            .nodes()
            .values()
            .filter_map(|node| {
                let component = stack.get(node.component_id())?;
                Some(NodeSpec {
                    id: node.id().to_string(),
                    label: node.label().to_string(),
                    layer: node.layer(),
                    x: node.position().x(),
                    y: node.position().y(),
                    style: NodeStyle {
                        category: component.category(),
                        is_core: component.is_core(),
                    },
                })
            })
            .collect();

        let edges = layout
            .edges()
            .iter()
            .filter_map(|edge| {
                let flow = stack.flow(edge.flow_id())?;
                Some(EdgeSpec {
                    id: edge.id().to_string(),
                    source_node_id: edge.source_node_id().to_string(),
                    target_node_id: edge.target_node_id().to_string(),
                    label: flow.pattern().display_label(),
                    style: EdgeStyle {
                        pattern: flow.pattern(),
                        bidirectional: flow.bidirectional(),
                    },
                })
            })
            .collect();

        Self {
            name: stack.name().to_string(),
            canvas: CanvasSpec {
                width: layout.canvas().width(),
                height: layout.canvas().height(),
                margin: layout.margin(),
            },
            bands,
            nodes,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::Engine;
    use stackdraft_core::{ComponentDefinition, IntegrationFlow, Stack};

    fn component(id: &str, layer: Layer, core: bool) -> ComponentDefinition {
        ComponentDefinition::new(
            id,
            id.to_uppercase(),
            "test component",
            Category::PowerPlatform,
            "testing",
            layer,
            vec![],
            vec![],
            vec![IntegrationPattern::DataverseConnector],
            core,
            None,
        )
    }

    fn spec() -> RenderSpec {
        let mut stack = Stack::new("demo", "");
        stack.insert(component("dataverse", Layer::Data, true)).unwrap();
        stack
            .insert(component("power_bi", Layer::Presentation, false))
            .unwrap();
        stack
            .add_flow(
                IntegrationFlow::new(
                    "dataverse_to_power_bi",
                    "Dataverse → Power BI",
                    "dataverse",
                    "power_bi",
                    IntegrationPattern::DataverseConnector,
                    "",
                    false,
                )
                .unwrap(),
            )
            .unwrap();

        let architecture = Architecture::new(stack);
        let layout = Engine::new(LayoutConfig::default()).calculate(&architecture);
        RenderSpec::build(&architecture, &layout)
    }

    #[test]
    fn spec_carries_positions_and_style_hints() {
        let spec = spec();

        assert_eq!(spec.name, "demo");
        assert_eq!(spec.bands.len(), 2);
        assert_eq!(spec.nodes.len(), 2);

        let dataverse = spec.nodes.iter().find(|n| n.id == "node_dataverse").unwrap();
        assert_eq!(dataverse.layer, Layer::Data);
        assert!(dataverse.style.is_core);
        assert_eq!(dataverse.style.category, Category::PowerPlatform);
    }

    #[test]
    fn edge_labels_use_pattern_display_form() {
        let spec = spec();

        assert_eq!(spec.edges.len(), 1);
        let edge = &spec.edges[0];
        assert_eq!(edge.label, "Dataverse Connector");
        assert_eq!(edge.source_node_id, "node_dataverse");
        assert!(!edge.style.bidirectional);
    }

    #[test]
    fn spec_serializes_to_json() {
        let value = serde_json::to_value(spec()).unwrap();

        assert_eq!(value["canvas"]["width"], 1200.0);
        assert_eq!(value["nodes"][0]["layer"], "presentation");
        assert_eq!(value["edges"][0]["style"]["pattern"], "dataverse_connector");
    }
}
