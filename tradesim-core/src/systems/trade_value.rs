//! Trade value propagation through the node network.
//!
//! # Flow
//! 1. Every node starts the turn at its local value
//! 2. Nodes are visited in the cached topological order (sources → end nodes)
//! 3. At each node: compute shares, resolve merchants, push transfers into
//!    the downstream nodes
//!
//! Steering and propagation are interleaved: a node's transfers land in its
//! downstream neighbours before those neighbours are visited.

use crate::error::TradeError;
use crate::fixed::Fixed;
use crate::merchants::MerchantRegistry;
use crate::state::NationId;
use crate::systems::steering::resolve_merchant_actions;
use crate::systems::trade_power::compute_shares;
use crate::topology::{propagate, TradeNetwork};
use crate::trade::{NodeShare, TradeNodeId, TradeNodeState};
use std::collections::BTreeMap;
use tracing::instrument;

/// Everything that happened at one node this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOutcome {
    pub node: TradeNodeId,
    pub value: TradeNodeState,
    pub shares: Vec<NodeShare>,
    pub collected: BTreeMap<NationId, Fixed>,
    pub transferred: BTreeMap<TradeNodeId, Fixed>,
    pub unclaimed: Fixed,
}

/// Result of one trade turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeTurnOutcome {
    /// One entry per node, keyed by id.
    pub nodes: BTreeMap<TradeNodeId, NodeOutcome>,
}

impl TradeTurnOutcome {
    /// Collected income of one nation, per node.
    pub fn collected_by(&self, nation: &str) -> BTreeMap<TradeNodeId, Fixed> {
        self.nodes
            .iter()
            .filter_map(|(&id, outcome)| outcome.collected.get(nation).map(|&v| (id, v)))
            .collect()
    }

    pub fn total_value(&self, node: TradeNodeId) -> Fixed {
        self.nodes
            .get(&node)
            .map(|o| o.value.total_value)
            .unwrap_or(Fixed::ZERO)
    }
}

/// Runs the per-turn trade pass over the whole network.
///
/// Merchant presences are read-only for the duration of the pass.
#[instrument(skip_all, name = "trade")]
pub fn run_trade_turn(
    network: &TradeNetwork,
    merchants: &MerchantRegistry,
    steering_bonus: impl Fn(&str) -> Fixed,
) -> Result<TradeTurnOutcome, TradeError> {
    let mut values = network.reset_turn();
    let mut outcome = TradeTurnOutcome::default();

    for &node_id in network.order() {
        let node = network.require(node_id)?;
        let value = values
            .get(node_id.index())
            .copied()
            .ok_or(TradeError::UnknownNodeId(node_id))?;

        let presences = merchants.presences_at(node_id);
        let shares = compute_shares(node_id, value.total_value, presences);
        let resolution = resolve_merchant_actions(
            node,
            value.total_value,
            &shares,
            presences,
            &steering_bonus,
        )?;

        propagate(&mut values, &resolution.transferred);

        log::debug!(
            "Node {}: total {} (incoming {}), {} collected, {} transferred, {} unclaimed",
            node.name,
            value.total_value,
            value.incoming_value,
            resolution.collected.values().copied().sum::<Fixed>(),
            resolution.transferred_base,
            resolution.unclaimed
        );

        outcome.nodes.insert(
            node_id,
            NodeOutcome {
                node: node_id,
                value,
                shares,
                collected: resolution.collected,
                transferred: resolution.transferred,
                unclaimed: resolution.unclaimed,
            },
        );
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trade::{MerchantAction, TradeNodeDef};

    fn def(name: &str, local: i64, outgoing: &[&str]) -> TradeNodeDef {
        TradeNodeDef {
            name: name.to_string(),
            region: "test".to_string(),
            local_value: Fixed::from_int(local),
            outgoing: outgoing.iter().map(|s| s.to_string()).collect(),
        }
    }

    const VENICE: TradeNodeId = TradeNodeId(0);
    const ALEXANDRIA: TradeNodeId = TradeNodeId(1);

    fn setup() -> (TradeNetwork, MerchantRegistry) {
        let network = TradeNetwork::new(vec![
            def("venice", 100, &["alexandria"]),
            def("alexandria", 20, &[]),
        ])
        .unwrap();

        let mut merchants = MerchantRegistry::default();
        for nation in ["VEN", "GEN"] {
            merchants.set_merchant_count(nation, 2);
        }
        merchants
            .set_power(&network, "VEN", VENICE, Fixed::from_int(60))
            .unwrap();
        merchants
            .set_power(&network, "GEN", VENICE, Fixed::from_int(40))
            .unwrap();
        (network, merchants)
    }

    #[test]
    fn test_collect_scenario() {
        let (network, mut merchants) = setup();
        for nation in ["VEN", "GEN"] {
            merchants
                .assign_merchant(&network, nation, VENICE, MerchantAction::Collect)
                .unwrap();
        }

        let outcome = run_trade_turn(&network, &merchants, |_| Fixed::ZERO).unwrap();

        let venice = &outcome.nodes[&VENICE];
        assert_eq!(venice.shares[0].share_percent, Fixed::from_int(60));
        assert_eq!(venice.shares[1].share_percent, Fixed::from_int(40));
        assert_eq!(venice.collected["VEN"], Fixed::from_int(60));
        assert_eq!(venice.collected["GEN"], Fixed::from_int(40));
        assert_eq!(outcome.total_value(ALEXANDRIA), Fixed::from_int(20));
    }

    #[test]
    fn test_transfer_scenario() {
        let (network, mut merchants) = setup();
        merchants
            .assign_merchant(&network, "VEN", VENICE, MerchantAction::TRANSFER)
            .unwrap();
        merchants
            .assign_merchant(&network, "GEN", VENICE, MerchantAction::Collect)
            .unwrap();

        let outcome = run_trade_turn(&network, &merchants, |_| Fixed::from_f32(0.1)).unwrap();

        // 20 + 60 × 1.1
        assert_eq!(outcome.total_value(ALEXANDRIA), Fixed::from_int(86));
        assert_eq!(
            outcome.nodes[&ALEXANDRIA].value.incoming_value,
            Fixed::from_int(66)
        );
        assert_eq!(outcome.collected_by("GEN")[&VENICE], Fixed::from_int(40));
        assert!(outcome.collected_by("VEN").is_empty());
    }

    #[test]
    fn test_downstream_collector_sees_transfer() {
        let (network, mut merchants) = setup();
        merchants
            .assign_merchant(&network, "VEN", VENICE, MerchantAction::TRANSFER)
            .unwrap();
        merchants
            .set_power(&network, "VEN", ALEXANDRIA, Fixed::from_int(1))
            .unwrap();
        merchants
            .assign_merchant(&network, "VEN", ALEXANDRIA, MerchantAction::Collect)
            .unwrap();

        let outcome = run_trade_turn(&network, &merchants, |_| Fixed::ZERO).unwrap();

        // Sole power at alexandria collects its local 20 plus the 60 sent in
        assert_eq!(outcome.collected_by("VEN")[&ALEXANDRIA], Fixed::from_int(80));
        assert_eq!(outcome.nodes[&VENICE].unclaimed, Fixed::from_int(40));
    }

    #[test]
    fn test_values_reset_each_turn() {
        let (network, mut merchants) = setup();
        merchants
            .assign_merchant(&network, "VEN", VENICE, MerchantAction::TRANSFER)
            .unwrap();

        let first = run_trade_turn(&network, &merchants, |_| Fixed::ZERO).unwrap();
        let second = run_trade_turn(&network, &merchants, |_| Fixed::ZERO).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.total_value(ALEXANDRIA), Fixed::from_int(80));
    }

    #[test]
    fn test_chain_order_independent_of_definition_order() {
        // End node defined first
        let network = TradeNetwork::new(vec![
            def("sink", 0, &[]),
            def("middle", 10, &["sink"]),
            def("source", 10, &["middle"]),
        ])
        .unwrap();
        let (sink, middle, source) = (TradeNodeId(0), TradeNodeId(1), TradeNodeId(2));

        let mut merchants = MerchantRegistry::default();
        merchants.set_merchant_count("VEN", 2);
        for node in [source, middle] {
            merchants
                .set_power(&network, "VEN", node, Fixed::ONE)
                .unwrap();
            merchants
                .assign_merchant(&network, "VEN", node, MerchantAction::TRANSFER)
                .unwrap();
        }

        let outcome = run_trade_turn(&network, &merchants, |_| Fixed::ZERO).unwrap();
        assert_eq!(outcome.total_value(middle), Fixed::from_int(20));
        assert_eq!(outcome.total_value(sink), Fixed::from_int(20));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        // Diamond: a → b, a → c, b → d, c → d
        fn diamond(locals: [i64; 4]) -> TradeNetwork {
            TradeNetwork::new(vec![
                TradeNodeDef {
                    local_value: Fixed::from_raw(locals[0]),
                    ..def("a", 0, &["b", "c"])
                },
                TradeNodeDef {
                    local_value: Fixed::from_raw(locals[1]),
                    ..def("b", 0, &["d"])
                },
                TradeNodeDef {
                    local_value: Fixed::from_raw(locals[2]),
                    ..def("c", 0, &["d"])
                },
                TradeNodeDef {
                    local_value: Fixed::from_raw(locals[3]),
                    ..def("d", 0, &[])
                },
            ])
            .unwrap()
        }

        proptest! {
            #[test]
            fn node_value_accounts_for_every_unit(
                locals in proptest::array::uniform4(0i64..10_000_000),
                powers in proptest::collection::vec(0i64..1_000_000, 3),
                collect in proptest::collection::vec(any::<bool>(), 3),
            ) {
                let network = diamond(locals);
                let mut merchants = MerchantRegistry::default();
                let target_of_a = MerchantAction::Transfer { target: Some(TradeNodeId(1)) };

                for (i, nation) in ["A", "B", "C"].into_iter().enumerate() {
                    merchants.set_merchant_count(nation, 4);
                    for node in 0..4u16 {
                        let node = TradeNodeId(node);
                        merchants
                            .set_power(&network, nation, node, Fixed::from_raw(powers[i]))
                            .unwrap();
                        let action = if collect[i] || node == TradeNodeId(3) {
                            MerchantAction::Collect
                        } else if node == TradeNodeId(0) {
                            target_of_a
                        } else {
                            MerchantAction::TRANSFER
                        };
                        merchants.assign_merchant(&network, nation, node, action).unwrap();
                    }
                }

                let outcome = run_trade_turn(&network, &merchants, |_| Fixed::ZERO).unwrap();

                for node in outcome.nodes.values() {
                    let collected: Fixed = node.collected.values().sum();
                    let sent: Fixed = node.transferred.values().sum();
                    prop_assert_eq!(collected + sent + node.unclaimed, node.value.total_value);
                    prop_assert_eq!(
                        node.value.total_value,
                        network.node(node.node).unwrap().local_value + node.value.incoming_value
                    );
                }

                // Without a bonus, nothing sent downstream is created or lost
                let sent_total: Fixed = outcome
                    .nodes
                    .values()
                    .flat_map(|n| n.transferred.values())
                    .sum();
                let received_total: Fixed = outcome
                    .nodes
                    .values()
                    .map(|n| n.value.incoming_value)
                    .sum();
                prop_assert_eq!(sent_total, received_total);
            }
        }
    }
}
