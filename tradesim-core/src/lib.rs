//! # Trade Simulation Core
//!
//! Deterministic economic core for a grand-strategy game: trade value flowing
//! through a directed network of trade nodes, and a per-nation resource ledger
//! that the realised trade income feeds into.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Player / AI  │────▶│ PlayerInputs │────▶│ step_turn   │
//! │  (decide)    │     │ (commands)   │     │ (pure fn)   │
//! └──────────────┘     └──────────────┘     └──────┬──────┘
//!                                                  │
//!                      ┌──────────────┐     ┌──────▼───────┐
//!                      │  Observers   │◀────│ EconomyState │
//!                      │  (side fx)   │     │ + TurnReport │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`TradeNetwork`] | Validated node DAG with a cached propagation order |
//! | [`MerchantRegistry`] | Merchant pools, trade power and merchant actions |
//! | [`EconomyState`] | Complete simulation state between turns |
//! | [`step_turn`] | `(state, inputs) -> (state, report)` |
//! | [`TurnReport`] | Read-only node and nation projections for display |
//! | [`SimObserver`] | Trait for observing turn reports |

pub mod config;
pub mod effects;
pub mod error;
pub mod fixed;
pub mod input;
pub mod merchants;
pub mod metrics;
pub mod observer;
pub mod report;
pub mod resources;
pub mod state;
pub mod step;
pub mod systems;
pub mod testing;
pub mod topology;
pub mod trade;

pub use config::{EconomyConfig, SimConfig};
pub use effects::{get_resource_effects, EffectKind, StatDeltas};
pub use error::{LoadError, TradeError};
pub use fixed::Fixed;
pub use input::{PlayerInputs, TradeCommand};
pub use merchants::MerchantRegistry;
pub use metrics::SimMetrics;
pub use observer::console::ConsoleObserver;
pub use observer::json::JsonLinesObserver;
pub use observer::{ObserverConfig, ObserverError, ObserverRegistry, SimObserver};
pub use report::{NationView, NodeView, RejectedCommand, TurnReport};
pub use resources::{Resource, ResourceBalance, ResourceFlow, ResourceMap, ResourceWarning, Resources};
pub use state::{EconomyState, NationContext, NationId, NationState};
pub use step::step_turn;
pub use topology::{compute_node_order, load_trade_network, TradeNetwork};
pub use trade::{MerchantAction, NodeShare, TradeNode, TradeNodeDef, TradeNodeId, TradePresence};
