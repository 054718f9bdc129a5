//! Trade types shared by the topology, share resolver and steering engine.
//!
//! Trade nodes form a directed acyclic graph where value flows from source
//! nodes toward end nodes. Nations compete for trade power at each node; a
//! nation's power share decides how much of the node's value it can realise.
//!
//! Key mechanics:
//! - **Trade Value**: local value plus whatever upstream merchants transferred in
//! - **Trade Power**: externally supplied per nation per node
//! - **Merchants**: collect a share locally, or transfer it downstream with a
//!   steering bonus. Power without a merchant yields nothing.

use crate::fixed::Fixed;
use crate::state::NationId;
use serde::{Deserialize, Serialize};

/// Unique identifier for a trade node.
///
/// Indexes the network's node array in definition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TradeNodeId(pub u16);

impl TradeNodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Static definition of a trade node as it appears in topology data.
///
/// Routes reference other nodes by name; ids are assigned in definition order
/// when the network is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeNodeDef {
    pub name: String,
    #[serde(default)]
    pub region: String,
    /// Value generated by provinces in this trade zone.
    #[serde(default)]
    pub local_value: Fixed,
    /// Names of downstream nodes this node flows to.
    #[serde(default)]
    pub outgoing: Vec<String>,
}

/// A resolved trade node inside a [`crate::topology::TradeNetwork`].
#[derive(Debug, Clone, PartialEq)]
pub struct TradeNode {
    pub id: TradeNodeId,
    pub name: String,
    pub region: String,
    pub local_value: Fixed,
    pub outgoing: Vec<TradeNodeId>,
    pub incoming: Vec<TradeNodeId>,
}

impl TradeNode {
    /// End nodes have no outgoing route and are terminal collection points.
    #[inline]
    pub fn is_end_node(&self) -> bool {
        self.outgoing.is_empty()
    }
}

/// Per-turn value of a node. Never persisted across turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TradeNodeState {
    /// Value transferred in from upstream merchants this turn.
    pub incoming_value: Fixed,
    /// `local_value + incoming_value`.
    pub total_value: Fixed,
}

/// What a merchant does in a trade node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MerchantAction {
    /// Realise the nation's share as income at this node.
    Collect,

    /// Push the share downstream, multiplied by `1 + steering_bonus`.
    ///
    /// With no explicit target the node must have exactly one outgoing route.
    Transfer {
        #[serde(default)]
        target: Option<TradeNodeId>,
    },
}

impl MerchantAction {
    /// Transfer along the node's only route.
    pub const TRANSFER: MerchantAction = MerchantAction::Transfer { target: None };

    pub fn is_transfer(&self) -> bool {
        matches!(self, MerchantAction::Transfer { .. })
    }
}

/// One nation's standing in one trade node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePresence {
    pub nation: NationId,
    pub node: TradeNodeId,
    /// Raw trade power, always `>= 0`.
    pub power: Fixed,
    /// `None` when no merchant is assigned.
    pub merchant: Option<MerchantAction>,
}

impl TradePresence {
    pub fn has_merchant(&self) -> bool {
        self.merchant.is_some()
    }
}

/// A nation's derived share of a node's value for the current turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeShare {
    pub nation: NationId,
    pub node: TradeNodeId,
    /// In `[0, 100]`.
    pub share_percent: Fixed,
    /// `total_value × share_percent / 100`.
    pub share_value: Fixed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_node_id_equality() {
        assert_eq!(TradeNodeId(1), TradeNodeId(1));
        assert_ne!(TradeNodeId(1), TradeNodeId(2));
        assert_eq!(TradeNodeId(7).index(), 7);
    }

    #[test]
    fn test_merchant_action_equality() {
        let steer_a = MerchantAction::Transfer {
            target: Some(TradeNodeId(5)),
        };
        let steer_b = MerchantAction::Transfer {
            target: Some(TradeNodeId(6)),
        };

        assert_ne!(steer_a, steer_b);
        assert_ne!(MerchantAction::Collect, MerchantAction::TRANSFER);
        assert!(steer_a.is_transfer());
        assert!(!MerchantAction::Collect.is_transfer());
    }

    #[test]
    fn test_end_node_has_no_outgoing() {
        let node = TradeNode {
            id: TradeNodeId(0),
            name: "venice".to_string(),
            region: "italy".to_string(),
            local_value: Fixed::from_int(10),
            outgoing: vec![],
            incoming: vec![TradeNodeId(1)],
        };
        assert!(node.is_end_node());
    }

    #[test]
    fn test_node_def_defaults_from_json() {
        let def: TradeNodeDef = serde_json::from_str(r#"{ "name": "genoa" }"#).unwrap();
        assert_eq!(def.local_value, Fixed::ZERO);
        assert!(def.outgoing.is_empty());
        assert!(def.region.is_empty());
    }

    #[test]
    fn test_merchant_action_json_shape() {
        let collect: MerchantAction = serde_json::from_str(r#""collect""#).unwrap();
        assert_eq!(collect, MerchantAction::Collect);

        let transfer: MerchantAction = serde_json::from_str(r#"{ "transfer": {} }"#).unwrap();
        assert_eq!(transfer, MerchantAction::TRANSFER);
    }
}
