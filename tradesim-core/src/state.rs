use crate::config::SimConfig;
use crate::error::TradeError;
use crate::fixed::Fixed;
use crate::merchants::MerchantRegistry;
use crate::resources::{Resource, Resources};
use crate::topology::TradeNetwork;
use crate::trade::TradeNodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type NationId = String;

/// Externally owned national stats feeding the production formulas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NationContext {
    pub economy: Fixed,
    pub stability: Fixed,
    pub innovation: Fixed,
    pub prestige: Fixed,
    /// Number of provinces held.
    pub territory: Fixed,
    /// Regiments under arms.
    pub army_size: Fixed,
    pub court_size: Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NationState {
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub context: NationContext,
    /// Extra fraction applied to transferred value, e.g. 0.1 for +10%.
    /// Falls back to [`SimConfig::default_steering_bonus`].
    #[serde(default)]
    pub steering_bonus: Option<Fixed>,
}

/// Complete simulation snapshot between turns.
///
/// The network is read-only during a turn; merchant changes arrive as
/// commands and are applied at the next turn boundary.
#[derive(Debug, Clone)]
pub struct EconomyState {
    /// Turns completed so far.
    pub turn: u32,
    pub network: TradeNetwork,
    pub merchants: MerchantRegistry,
    pub nations: BTreeMap<NationId, NationState>,
}

impl EconomyState {
    pub fn new(network: TradeNetwork) -> Self {
        Self {
            turn: 0,
            network,
            merchants: MerchantRegistry::default(),
            nations: BTreeMap::new(),
        }
    }

    /// Register a nation with its merchant pool.
    ///
    /// Negative starting reserves are clamped to zero.
    pub fn add_nation(&mut self, id: impl Into<NationId>, mut nation: NationState, merchants: u8) {
        let id = id.into();
        for resource in Resource::ALL {
            let reserve = &mut nation.resources[resource];
            if reserve.is_negative() {
                log::warn!("{}: negative {} reserve {} clamped to zero", id, resource, reserve);
                *reserve = Fixed::ZERO;
            }
        }
        self.merchants.set_merchant_count(&id, merchants);
        self.nations.insert(id, nation);
    }

    pub fn nation(&self, id: &str) -> Result<&NationState, TradeError> {
        self.nations
            .get(id)
            .ok_or_else(|| TradeError::UnknownNation(id.to_string()))
    }

    pub fn steering_bonus(&self, id: &str, config: &SimConfig) -> Fixed {
        self.nations
            .get(id)
            .and_then(|n| n.steering_bonus)
            .unwrap_or(config.default_steering_bonus)
    }

    /// Re-steer a node's routes between turns.
    ///
    /// Transfer merchants left without a valid route fall back to collecting.
    pub fn edit_routes(
        &mut self,
        node: TradeNodeId,
        targets: Vec<TradeNodeId>,
    ) -> Result<(), TradeError> {
        self.network.set_outgoing(node, targets)?;
        for (nation, node_id) in self.merchants.release_invalid_transfers(&self.network) {
            log::warn!(
                "{} merchant in {:?} lost its route and now collects",
                nation,
                node_id
            );
        }
        Ok(())
    }
}
