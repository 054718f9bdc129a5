//! Error types for the trade and ledger core.
//!
//! Resource shortages are deliberately absent: they are gameplay states,
//! reported as [`crate::resources::ResourceWarning`]s and stat penalties.

use crate::state::NationId;
use crate::trade::TradeNodeId;
use thiserror::Error;

/// Errors raised by topology validation and merchant actions.
///
/// Assignment errors are raised before any mutation, so a failed action
/// leaves the registry exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeError {
    /// Trade routes must form a DAG. Fatal at load time.
    #[error("trade routes contain a cycle through: {}", nodes.join(", "))]
    CycleDetected { nodes: Vec<String> },

    /// Transfer requested where value cannot flow downstream.
    #[error("invalid steering at {node}: {reason}")]
    InvalidSteering { node: String, reason: String },

    #[error("{nation} has no free merchants ({used}/{total} in use)")]
    NoFreeMerchants { nation: NationId, used: u8, total: u8 },

    #[error("{nation} already has a merchant in {node}")]
    AlreadyAssigned { nation: NationId, node: String },

    #[error("{nation} has no merchant in {node}")]
    NotAssigned { nation: NationId, node: String },

    #[error("unknown trade node: {0}")]
    UnknownNode(String),

    #[error("unknown trade node id: {0:?}")]
    UnknownNodeId(TradeNodeId),

    #[error("unknown nation: {0}")]
    UnknownNation(NationId),

    #[error("duplicate trade node: {0}")]
    DuplicateNode(String),

    #[error("{count} trade nodes exceed the limit of {max}")]
    TooManyNodes { count: usize, max: usize },

    #[error("trade power must be non-negative, got {power} for {nation}")]
    NegativePower { nation: NationId, power: String },
}

/// Errors from reading topology or scenario files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Trade(#[from] TradeError),
}
