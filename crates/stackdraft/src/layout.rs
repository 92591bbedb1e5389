//! Banded layout for architecture diagrams.
//!
//! The layout model is purely geometric bookkeeping: one vertical band per
//! non-empty architectural layer, nodes stacked top-down inside their band,
//! and edges bound to node ids. There is no force-directed placement or
//! constraint solving.
//!
//! # Pipeline Position
//!
//! ```text
//! Architecture
//!     ↓ layout (this module)
//! Layout
//!     ↓ export
//! RenderSpec
//! ```

pub mod engine;

pub use engine::Engine;

use indexmap::IndexMap;
use serde::Serialize;

use stackdraft_core::{Layer, Point, Size};

/// One vertical band holding all nodes of a single layer.
#[derive(Debug, Clone, Serialize)]
pub struct LayerBand {
    layer: Layer,
    origin: Point,
    size: Size,
}

impl LayerBand {
    pub(crate) fn new(layer: Layer, origin: Point, size: Size) -> Self {
        Self { layer, origin, size }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Top-left corner of the band.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

/// A positioned diagram node for one stack component.
#[derive(Debug, Clone, Serialize)]
pub struct NodePosition {
    id: String,
    component_id: String,
    label: String,
    layer: Layer,
    position: Point,
}

impl NodePosition {
    pub(crate) fn new(
        component_id: &str,
        label: impl Into<String>,
        layer: Layer,
        position: Point,
    ) -> Self {
        Self {
            id: format!("node_{component_id}"),
            component_id: component_id.to_string(),
            label: label.into(),
            layer,
            position,
        }
    }

    /// Stable node id, derived from the component id.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// An edge bound to its resolved endpoint nodes.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeBinding {
    id: String,
    flow_id: String,
    source_node_id: String,
    target_node_id: String,
}

impl EdgeBinding {
    pub(crate) fn new(flow_id: &str, source_node_id: String, target_node_id: String) -> Self {
        Self {
            id: format!("edge_{flow_id}"),
            flow_id: flow_id.to_string(),
            source_node_id,
            target_node_id,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the integration flow this edge was derived from.
    pub fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub fn source_node_id(&self) -> &str {
        &self.source_node_id
    }

    pub fn target_node_id(&self) -> &str {
        &self.target_node_id
    }
}

/// A fully positioned diagram: bands, nodes and bound edges on one canvas.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    bands: Vec<LayerBand>,
    nodes: IndexMap<String, NodePosition>,
    edges: Vec<EdgeBinding>,
    canvas: Size,
    margin: f32,
}

impl Layout {
    pub(crate) fn new(
        bands: Vec<LayerBand>,
        nodes: IndexMap<String, NodePosition>,
        edges: Vec<EdgeBinding>,
        canvas: Size,
        margin: f32,
    ) -> Self {
        Self {
            bands,
            nodes,
            edges,
            canvas,
            margin,
        }
    }

    /// Layer bands in canonical left-to-right order.
    pub fn bands(&self) -> &[LayerBand] {
        &self.bands
    }

    /// Positioned nodes, keyed by node id, in placement order.
    pub fn nodes(&self) -> &IndexMap<String, NodePosition> {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeBinding] {
        &self.edges
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Geometric sanity diagnostics.
    ///
    /// Reports edges whose endpoints are not in the node map and bands
    /// containing two nodes at the same coordinates. Collected, never
    /// panicking; an inconsistent layout is still serializable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for edge in &self.edges {
            for endpoint in [&edge.source_node_id, &edge.target_node_id] {
                if !self.nodes.contains_key(endpoint) {
                    errors.push(format!(
                        "Edge {} references missing node {}",
                        edge.id, endpoint
                    ));
                }
            }
        }

        for band in &self.bands {
            let positions: Vec<Point> = self
                .nodes
                .values()
                .filter(|node| node.layer() == band.layer())
                .map(NodePosition::position)
                .collect();

            let mut overlapping = false;
            for (i, a) in positions.iter().enumerate() {
                for b in &positions[i + 1..] {
                    // Exact bit equality: placement is deterministic, so
                    // overlaps only arise from identical computed inputs.
                    if a.x().to_bits() == b.x().to_bits() && a.y().to_bits() == b.y().to_bits() {
                        overlapping = true;
                    }
                }
            }
            if overlapping {
                errors.push(format!(
                    "Layer {} has overlapping node positions",
                    band.layer().label()
                ));
            }
        }

        errors
    }
}
