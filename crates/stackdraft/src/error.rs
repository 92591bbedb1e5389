//! Error types for stackdraft operations.
//!
//! Recoverable, expected conditions (unknown component, conflict, flow
//! problems) are reported through [`StackdraftError`] variants or, for
//! validation, as lists of diagnostic strings — multiple independent
//! problems may coexist and none of them should abort processing. Only
//! truly exceptional conditions (unreadable catalog, I/O failure) flow
//! through the fatal variants.

use std::io;

use thiserror::Error;

use stackdraft_catalog::CatalogError;
use stackdraft_core::FlowError;

use crate::compose::ComposeError;

/// The main error type for stackdraft operations.
#[derive(Debug, Error)]
pub enum StackdraftError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("composition error: {0}")]
    Compose(#[from] ComposeError),

    #[error("flow error: {0}")]
    Flow(#[from] FlowError),
}
