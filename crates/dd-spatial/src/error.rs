//! Spatial-subsystem error type.

use thiserror::Error;

use dd_core::NodeId;

/// Errors produced by `dd-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("routing graph has no nodes")]
    EmptyGraph,

    #[error("edge references unknown node id {0}")]
    UnknownNode(u32),

    #[error("duplicate node id {0}")]
    DuplicateNode(u32),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
