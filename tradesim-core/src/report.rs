//! Read-only projections handed to the display layer after every turn.

use crate::effects::StatDeltas;
use crate::fixed::Fixed;
use crate::input::TradeCommand;
use crate::resources::{ResourceBalance, ResourceMap, ResourceWarning};
use crate::state::NationId;
use crate::systems::NodeOutcome;
use crate::topology::TradeNetwork;
use crate::trade::{NodeShare, TradeNodeId};
use serde::Serialize;
use std::collections::BTreeMap;

/// One trade node as it ended the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub id: TradeNodeId,
    pub name: String,
    pub total_value: Fixed,
    pub incoming_value: Fixed,
    /// Strongest first.
    pub shares: Vec<NodeShare>,
    /// Value each nation collected here.
    pub income: BTreeMap<NationId, Fixed>,
    pub unclaimed: Fixed,
    pub incoming: Vec<String>,
    pub outgoing: Vec<String>,
}

impl NodeView {
    pub fn new(network: &TradeNetwork, outcome: &NodeOutcome) -> Self {
        let name = network
            .node(outcome.node)
            .map(|n| n.name.clone())
            .unwrap_or_default();
        Self {
            id: outcome.node,
            name,
            total_value: outcome.value.total_value,
            incoming_value: outcome.value.incoming_value,
            shares: outcome.shares.clone(),
            income: outcome.collected.clone(),
            unclaimed: outcome.unclaimed,
            incoming: network.incoming_names(outcome.node),
            outgoing: network.outgoing_names(outcome.node),
        }
    }

    pub fn share_of(&self, nation: &str) -> Option<&NodeShare> {
        self.shares.iter().find(|s| s.nation == nation)
    }
}

/// One nation's ledger after the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NationView {
    pub balances: ResourceMap<ResourceBalance>,
    pub warnings: Vec<ResourceWarning>,
    /// Penalties from reserves at or below zero after this turn.
    pub effects: StatDeltas,
    pub trade_income: Fixed,
    pub free_merchants: u8,
}

/// A command that failed at the turn boundary and changed nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedCommand {
    pub nation: NationId,
    pub command: TradeCommand,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    /// 1-based number of the turn just completed.
    pub turn: u32,
    /// In node id order.
    pub nodes: Vec<NodeView>,
    pub nations: BTreeMap<NationId, NationView>,
    pub rejected: Vec<RejectedCommand>,
}

impl TurnReport {
    pub fn node(&self, name: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn nation(&self, id: &str) -> Option<&NationView> {
        self.nations.get(id)
    }

    pub fn warning_count(&self) -> usize {
        self.nations.values().map(|n| n.warnings.len()).sum()
    }
}
