//! Trade network topology: node resolution, cycle detection, and the cached
//! propagation order.
//!
//! The order is computed once when the network is built and again only when a
//! route is edited, never per turn.

use crate::error::{LoadError, TradeError};
use crate::fixed::Fixed;
use crate::trade::{TradeNode, TradeNodeDef, TradeNodeId, TradeNodeState};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

/// Node ids are `u16`, so a network holds at most this many nodes.
pub const MAX_NODES: usize = u16::MAX as usize + 1;

/// Complete trade network with a validated topological order.
#[derive(Debug, Clone)]
pub struct TradeNetwork {
    nodes: Vec<TradeNode>,
    name_to_id: FxHashMap<String, TradeNodeId>,
    /// Sources first, end nodes last.
    order: Vec<TradeNodeId>,
}

impl TradeNetwork {
    /// Build and validate a network from node definitions.
    ///
    /// Returns `Err` if:
    /// - There are more nodes than [`TradeNodeId`] can address
    /// - Two nodes share a name
    /// - A route names a node that does not exist
    /// - The routes contain a cycle
    pub fn new(defs: Vec<TradeNodeDef>) -> Result<Self, TradeError> {
        if defs.len() > MAX_NODES {
            return Err(TradeError::TooManyNodes {
                count: defs.len(),
                max: MAX_NODES,
            });
        }

        let mut name_to_id = FxHashMap::default();
        for (id, def) in (0..=u16::MAX).map(TradeNodeId).zip(&defs) {
            if name_to_id.insert(def.name.clone(), id).is_some() {
                return Err(TradeError::DuplicateNode(def.name.clone()));
            }
        }

        let mut nodes: Vec<TradeNode> = Vec::with_capacity(defs.len());
        for (id, def) in (0..=u16::MAX).map(TradeNodeId).zip(defs) {
            let outgoing = def
                .outgoing
                .iter()
                .map(|name| {
                    name_to_id
                        .get(name)
                        .copied()
                        .ok_or_else(|| TradeError::UnknownNode(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            nodes.push(TradeNode {
                id,
                name: def.name,
                region: def.region,
                local_value: def.local_value.non_negative(),
                outgoing,
                incoming: Vec::new(),
            });
        }
        rebuild_incoming(&mut nodes);

        let order = compute_node_order(&nodes)?;

        log::info!(
            "Loaded {} trade nodes, {} end nodes",
            nodes.len(),
            nodes.iter().filter(|n| n.is_end_node()).count()
        );

        Ok(Self {
            nodes,
            name_to_id,
            order,
        })
    }

    pub fn nodes(&self) -> &[TradeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: TradeNodeId) -> Option<&TradeNode> {
        self.nodes.get(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<TradeNodeId> {
        self.name_to_id.get(name).copied()
    }

    /// Look up a node, failing with [`TradeError::UnknownNodeId`].
    pub fn require(&self, id: TradeNodeId) -> Result<&TradeNode, TradeError> {
        self.node(id).ok_or(TradeError::UnknownNodeId(id))
    }

    /// Cached propagation order (sources first, end nodes last).
    pub fn order(&self) -> &[TradeNodeId] {
        &self.order
    }

    pub fn end_nodes(&self) -> impl Iterator<Item = &TradeNode> {
        self.nodes.iter().filter(|n| n.is_end_node())
    }

    /// Display names of the downstream nodes.
    pub fn outgoing_names(&self, id: TradeNodeId) -> Vec<String> {
        self.names(self.node(id).map(|n| n.outgoing.as_slice()))
    }

    /// Display names of the upstream nodes.
    pub fn incoming_names(&self, id: TradeNodeId) -> Vec<String> {
        self.names(self.node(id).map(|n| n.incoming.as_slice()))
    }

    fn names(&self, ids: Option<&[TradeNodeId]>) -> Vec<String> {
        ids.unwrap_or_default()
            .iter()
            .filter_map(|&id| self.node(id).map(|n| n.name.clone()))
            .collect()
    }

    /// Update the externally computed local value of a node.
    pub fn set_local_value(&mut self, id: TradeNodeId, value: Fixed) -> Result<(), TradeError> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(TradeError::UnknownNodeId(id))?;
        node.local_value = value.non_negative();
        Ok(())
    }

    /// Re-steer a node's outgoing routes.
    ///
    /// Recomputes the cached order. If the new routes close a cycle the edit is
    /// rolled back and [`TradeError::CycleDetected`] is returned.
    pub fn set_outgoing(
        &mut self,
        id: TradeNodeId,
        targets: Vec<TradeNodeId>,
    ) -> Result<(), TradeError> {
        if let Some(&bad) = targets.iter().find(|t| self.node(**t).is_none()) {
            return Err(TradeError::UnknownNodeId(bad));
        }
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(TradeError::UnknownNodeId(id))?;
        let previous = std::mem::replace(&mut node.outgoing, targets);
        rebuild_incoming(&mut self.nodes);

        match compute_node_order(&self.nodes) {
            Ok(order) => {
                self.order = order;
                log::info!("Routes of trade node {:?} edited, order recomputed", id);
                Ok(())
            }
            Err(e) => {
                self.nodes[id.index()].outgoing = previous;
                rebuild_incoming(&mut self.nodes);
                Err(e)
            }
        }
    }

    /// Fresh per-turn state for every node, see [`reset_turn`].
    pub fn reset_turn(&self) -> Vec<TradeNodeState> {
        reset_turn(&self.nodes)
    }
}

fn rebuild_incoming(nodes: &mut [TradeNode]) {
    let mut incoming: Vec<Vec<TradeNodeId>> = vec![Vec::new(); nodes.len()];
    for node in nodes.iter() {
        for &target in &node.outgoing {
            if let Some(list) = incoming.get_mut(target.index()) {
                list.push(node.id);
            }
        }
    }
    for (node, list) in nodes.iter_mut().zip(incoming) {
        node.incoming = list;
    }
}

/// Compute topological order using Kahn's algorithm.
///
/// Nodes with no pending upstream contributors are released in definition
/// order, so the result is deterministic. Any node left unreleased sits on or
/// behind a cycle and is reported in [`TradeError::CycleDetected`].
pub fn compute_node_order(nodes: &[TradeNode]) -> Result<Vec<TradeNodeId>, TradeError> {
    let n = nodes.len();

    let mut in_degree: Vec<usize> = vec![0; n];
    for node in nodes {
        for &target in &node.outgoing {
            in_degree[target.index()] += 1;
        }
    }

    let mut queue: VecDeque<TradeNodeId> = in_degree
        .iter()
        .zip(nodes)
        .filter(|(deg, _)| **deg == 0)
        .map(|(_, node)| node.id)
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(node_id) = queue.pop_front() {
        order.push(node_id);

        for &target in &nodes[node_id.index()].outgoing {
            in_degree[target.index()] -= 1;
            if in_degree[target.index()] == 0 {
                queue.push_back(target);
            }
        }
    }

    if order.len() != n {
        let stuck = in_degree
            .iter()
            .enumerate()
            .filter(|(_, deg)| **deg > 0)
            .map(|(i, _)| nodes[i].name.clone())
            .collect();
        return Err(TradeError::CycleDetected { nodes: stuck });
    }

    Ok(order)
}

/// Sets every node's total to its local value before propagation.
pub fn reset_turn(nodes: &[TradeNode]) -> Vec<TradeNodeState> {
    nodes
        .iter()
        .map(|node| TradeNodeState {
            incoming_value: Fixed::ZERO,
            total_value: node.local_value,
        })
        .collect()
}

/// Adds value transferred by upstream merchants to the target nodes.
///
/// Called right after a node's merchants are resolved, so every target is
/// updated before it is processed.
pub fn propagate(states: &mut [TradeNodeState], transferred: &BTreeMap<TradeNodeId, Fixed>) {
    for (&target, &amount) in transferred {
        if let Some(state) = states.get_mut(target.index()) {
            state.incoming_value += amount;
            state.total_value += amount;
        }
    }
}

/// Loads node definitions from a JSON array and builds the network.
pub fn load_trade_network(path: &Path) -> Result<TradeNetwork, LoadError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    let defs: Vec<TradeNodeDef> = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: display,
        source,
    })?;
    Ok(TradeNetwork::new(defs)?)
}
