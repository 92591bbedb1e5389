//! Stackdraft Core Types and Definitions
//!
//! This crate provides the foundational types for the stackdraft
//! composition-and-layout engine. It includes:
//!
//! - **Components**: Catalog component definitions and the fixed
//!   category/layer/pattern enumerations ([`component`] module)
//! - **Flows**: Directed integration flows between components ([`flow`] module)
//! - **Stacks**: The mutable aggregate of chosen components and their flows
//!   ([`stack`] module)
//! - **Geometry**: Basic geometric types used by the layout engine
//!   ([`geometry`] module)

pub mod component;
pub mod flow;
pub mod geometry;
pub mod stack;

pub use component::{Category, ComponentDefinition, IntegrationPattern, Layer, ProductFamily};
pub use flow::{FlowError, IntegrationFlow};
pub use geometry::{Point, Size};
pub use stack::{ConflictError, Stack, StackManifest};
