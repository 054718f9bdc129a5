//! Merchant pool and per-node trade presence.
//!
//! Every mutation checks eligibility first through the same function the
//! display layer uses ([`MerchantRegistry::can_assign`]), then mutates. A
//! rejected action never leaves partial state behind.

use crate::error::TradeError;
use crate::fixed::Fixed;
use crate::state::NationId;
use crate::topology::TradeNetwork;
use crate::trade::{MerchantAction, TradeNode, TradeNodeId, TradePresence};
use std::collections::BTreeMap;

/// Resolve where a merchant's action sends value.
///
/// `Collect` has no target. `Transfer` without a target needs exactly one
/// outgoing route; an explicit target must be one of the node's routes.
pub fn steering_target(
    node: &TradeNode,
    action: MerchantAction,
) -> Result<Option<TradeNodeId>, TradeError> {
    let invalid = |reason: String| TradeError::InvalidSteering {
        node: node.name.clone(),
        reason,
    };

    match action {
        MerchantAction::Collect => Ok(None),
        MerchantAction::Transfer { target: None } => match node.outgoing.as_slice() {
            [only] => Ok(Some(*only)),
            [] => Err(invalid("end node has no outgoing route".to_string())),
            routes => Err(invalid(format!(
                "{} outgoing routes, transfer needs an explicit target",
                routes.len()
            ))),
        },
        MerchantAction::Transfer {
            target: Some(target),
        } => {
            if node.outgoing.contains(&target) {
                Ok(Some(target))
            } else {
                Err(invalid(format!("{target:?} is not a downstream route")))
            }
        }
    }
}

/// Merchant slots and trade presences for every nation.
///
/// Presences within a node keep insertion order; share ties resolve in that
/// order.
#[derive(Debug, Clone, Default)]
pub struct MerchantRegistry {
    presences: BTreeMap<TradeNodeId, Vec<TradePresence>>,
    merchant_count: BTreeMap<NationId, u8>,
    used: BTreeMap<NationId, u8>,
}

impl MerchantRegistry {
    /// Set a nation's merchant pool.
    ///
    /// Shrinking the pool does not recall merchants already placed; it only
    /// blocks new assignments until usage falls below the new size.
    pub fn set_merchant_count(&mut self, nation: &str, count: u8) {
        self.merchant_count.insert(nation.to_string(), count);
    }

    pub fn merchant_count(&self, nation: &str) -> u8 {
        self.merchant_count.get(nation).copied().unwrap_or(0)
    }

    pub fn used_merchants(&self, nation: &str) -> u8 {
        self.used.get(nation).copied().unwrap_or(0)
    }

    pub fn free_merchants(&self, nation: &str) -> u8 {
        self.merchant_count(nation)
            .saturating_sub(self.used_merchants(nation))
    }

    /// Presences at a node in insertion order.
    pub fn presences_at(&self, node: TradeNodeId) -> &[TradePresence] {
        self.presences.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn presence(&self, nation: &str, node: TradeNodeId) -> Option<&TradePresence> {
        self.presences_at(node).iter().find(|p| p.nation == nation)
    }

    /// All presences, grouped by node id.
    pub fn presences(&self) -> impl Iterator<Item = &TradePresence> {
        self.presences.values().flatten()
    }

    fn presence_mut(&mut self, nation: &str, node: TradeNodeId) -> Option<&mut TradePresence> {
        self.presences
            .get_mut(&node)
            .and_then(|list| list.iter_mut().find(|p| p.nation == nation))
    }

    fn presence_or_insert(&mut self, nation: &str, node: TradeNodeId) -> &mut TradePresence {
        let list = self.presences.entry(node).or_default();
        let index = match list.iter().position(|p| p.nation == nation) {
            Some(i) => i,
            None => {
                list.push(TradePresence {
                    nation: nation.to_string(),
                    node,
                    power: Fixed::ZERO,
                    merchant: None,
                });
                list.len() - 1
            }
        };
        &mut list[index]
    }

    /// Record the externally computed trade power of a nation at a node.
    pub fn set_power(
        &mut self,
        network: &TradeNetwork,
        nation: &str,
        node: TradeNodeId,
        power: Fixed,
    ) -> Result<(), TradeError> {
        network.require(node)?;
        if power.is_negative() {
            return Err(TradeError::NegativePower {
                nation: nation.to_string(),
                power: power.to_string(),
            });
        }
        self.presence_or_insert(nation, node).power = power;
        Ok(())
    }

    /// Whether `assign_merchant` would succeed, without mutating anything.
    pub fn can_assign(
        &self,
        network: &TradeNetwork,
        nation: &str,
        node: TradeNodeId,
        action: MerchantAction,
    ) -> Result<(), TradeError> {
        let trade_node = network.require(node)?;

        let used = self.used_merchants(nation);
        let total = self.merchant_count(nation);
        if used >= total {
            return Err(TradeError::NoFreeMerchants {
                nation: nation.to_string(),
                used,
                total,
            });
        }

        if self.presence(nation, node).is_some_and(|p| p.has_merchant()) {
            return Err(TradeError::AlreadyAssigned {
                nation: nation.to_string(),
                node: trade_node.name.clone(),
            });
        }

        steering_target(trade_node, action)?;
        Ok(())
    }

    /// Place a merchant, consuming one slot from the nation's pool.
    pub fn assign_merchant(
        &mut self,
        network: &TradeNetwork,
        nation: &str,
        node: TradeNodeId,
        action: MerchantAction,
    ) -> Result<(), TradeError> {
        self.can_assign(network, nation, node, action)?;

        self.presence_or_insert(nation, node).merchant = Some(action);
        *self.used.entry(nation.to_string()).or_insert(0) += 1;

        log::debug!("{} assigned merchant to {:?} ({:?})", nation, node, action);
        Ok(())
    }

    /// Recall a merchant and free its slot. The nation keeps its power.
    pub fn remove_merchant(
        &mut self,
        network: &TradeNetwork,
        nation: &str,
        node: TradeNodeId,
    ) -> Result<(), TradeError> {
        let trade_node = network.require(node)?;
        let presence = self
            .presence_mut(nation, node)
            .filter(|p| p.has_merchant())
            .ok_or_else(|| TradeError::NotAssigned {
                nation: nation.to_string(),
                node: trade_node.name.clone(),
            })?;

        presence.merchant = None;
        if let Some(used) = self.used.get_mut(nation) {
            *used = used.saturating_sub(1);
        }

        log::debug!("{} recalled merchant from {:?}", nation, node);
        Ok(())
    }

    /// Switch an assigned merchant between collecting and transferring.
    pub fn set_merchant_action(
        &mut self,
        network: &TradeNetwork,
        nation: &str,
        node: TradeNodeId,
        action: MerchantAction,
    ) -> Result<(), TradeError> {
        let trade_node = network.require(node)?;
        if !self.presence(nation, node).is_some_and(|p| p.has_merchant()) {
            return Err(TradeError::NotAssigned {
                nation: nation.to_string(),
                node: trade_node.name.clone(),
            });
        }
        steering_target(trade_node, action)?;

        if let Some(presence) = self.presence_mut(nation, node) {
            presence.merchant = Some(action);
        }
        Ok(())
    }

    /// Turn transfer merchants whose route no longer resolves into collectors.
    ///
    /// Returns the affected (nation, node) pairs.
    pub fn release_invalid_transfers(
        &mut self,
        network: &TradeNetwork,
    ) -> Vec<(NationId, TradeNodeId)> {
        let mut released = Vec::new();
        for (&node_id, list) in self.presences.iter_mut() {
            let Some(node) = network.node(node_id) else {
                continue;
            };
            for presence in list.iter_mut() {
                let stranded = presence
                    .merchant
                    .is_some_and(|action| action.is_transfer() && steering_target(node, action).is_err());
                if stranded {
                    presence.merchant = Some(MerchantAction::Collect);
                    released.push((presence.nation.clone(), node_id));
                }
            }
        }
        released
    }
}
