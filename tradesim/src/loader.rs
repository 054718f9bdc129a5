//! Scenario files.
//!
//! A scenario is one JSON document holding the topology, every nation with its
//! reserves and context, initial trade power by node name, and the merchants to
//! place at the first turn boundary:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "name": "venice", "local_value": 100, "outgoing": ["alexandria"] },
//!     { "name": "alexandria", "local_value": 20 }
//!   ],
//!   "nations": {
//!     "VEN": {
//!       "merchants": 2,
//!       "steering_bonus": 0.1,
//!       "resources": { "treasury": 100 },
//!       "context": { "economy": 5, "territory": 8 },
//!       "trade_power": { "venice": 60 },
//!       "placements": [{ "node": "venice", "action": "transfer" }]
//!     }
//!   }
//! }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tradesim_core::{
    EconomyState, Fixed, LoadError, MerchantAction, NationContext, NationId, NationState,
    PlayerInputs, Resources, TradeCommand, TradeError, TradeNetwork, TradeNodeDef, TradeNodeId,
};

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub nodes: Vec<TradeNodeDef>,
    #[serde(default)]
    pub nations: BTreeMap<NationId, NationEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NationEntry {
    pub merchants: u8,
    pub steering_bonus: Option<Fixed>,
    pub resources: Resources,
    pub context: NationContext,
    /// Node name → raw trade power.
    pub trade_power: BTreeMap<String, Fixed>,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Deserialize)]
pub struct Placement {
    pub node: String,
    #[serde(default)]
    pub action: PlacementAction,
    /// Downstream node name, needed when a node has several routes.
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementAction {
    #[default]
    Collect,
    Transfer,
}

/// Read and parse a scenario without building anything.
pub fn read_scenario(path: &Path) -> Result<Scenario, LoadError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: display,
        source,
    })
}

/// Build the initial state and the commands for the first turn.
pub fn build_scenario(scenario: Scenario) -> Result<(EconomyState, Vec<PlayerInputs>), TradeError> {
    let network = TradeNetwork::new(scenario.nodes)?;
    let mut state = EconomyState::new(network);
    let mut inputs = Vec::new();

    for (id, entry) in scenario.nations {
        let nation = NationState {
            resources: entry.resources,
            context: entry.context,
            steering_bonus: entry.steering_bonus,
        };
        state.add_nation(id.clone(), nation, entry.merchants);

        for (node_name, power) in &entry.trade_power {
            let node = node_id(&state.network, node_name)?;
            state.merchants.set_power(&state.network, &id, node, *power)?;
        }

        let mut commands = Vec::with_capacity(entry.placements.len());
        for placement in &entry.placements {
            let node = node_id(&state.network, &placement.node)?;
            let action = match placement.action {
                PlacementAction::Collect => MerchantAction::Collect,
                PlacementAction::Transfer => MerchantAction::Transfer {
                    target: placement
                        .target
                        .as_deref()
                        .map(|name| node_id(&state.network, name))
                        .transpose()?,
                },
            };
            commands.push(TradeCommand::AssignMerchant { node, action });
        }
        if !commands.is_empty() {
            inputs.push(PlayerInputs::new(id, commands));
        }
    }

    log::info!(
        "Scenario loaded: {} trade nodes, {} nations",
        state.network.len(),
        state.nations.len()
    );

    Ok((state, inputs))
}

pub fn load_scenario(path: &Path) -> Result<(EconomyState, Vec<PlayerInputs>), LoadError> {
    let scenario = read_scenario(path)?;
    Ok(build_scenario(scenario)?)
}

fn node_id(network: &TradeNetwork, name: &str) -> Result<TradeNodeId, TradeError> {
    network
        .id_of(name)
        .ok_or_else(|| TradeError::UnknownNode(name.to_string()))
}
