//! Trade income integration.
//!
//! The only bridge from the trade pass into the resource ledger. Runs after
//! every node has been resolved and before the ledger turn.
//!
//! # Formula
//! `trade_income = Σ collected[node]` over every node the nation collected in,
//! each entry becoming one treasury production source labelled by node name.

use crate::fixed::Fixed;
use crate::resources::ResourceFlow;
use crate::topology::TradeNetwork;
use crate::trade::TradeNodeId;
use std::collections::BTreeMap;

/// Label prefix for trade income sources.
pub const TRADE_SOURCE_PREFIX: &str = "trade: ";

/// Turn a nation's per-node collections into treasury production.
///
/// Sources appear in node id order. Nodes missing from the network are
/// labelled by id rather than dropped so no income disappears.
pub fn integrate_trade_income(
    nation: &str,
    collected: &BTreeMap<TradeNodeId, Fixed>,
    network: &TradeNetwork,
) -> ResourceFlow {
    let mut income = ResourceFlow::default();

    for (&node_id, &amount) in collected {
        let label = match network.node(node_id) {
            Some(node) => format!("{TRADE_SOURCE_PREFIX}{}", node.name),
            None => format!("{TRADE_SOURCE_PREFIX}{node_id:?}"),
        };
        income.add(label, amount);
    }

    if income.total.is_positive() {
        log::trace!(
            "{} collected {} trade income from {} nodes",
            nation,
            income.total,
            income.sources.len()
        );
    }

    income
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trade::TradeNodeDef;

    fn network() -> TradeNetwork {
        TradeNetwork::new(vec![
            TradeNodeDef {
                name: "lubeck".to_string(),
                region: String::new(),
                local_value: Fixed::from_int(10),
                outgoing: vec!["english_channel".to_string()],
            },
            TradeNodeDef {
                name: "english_channel".to_string(),
                region: String::new(),
                local_value: Fixed::from_int(10),
                outgoing: vec![],
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_sums_across_nodes() {
        let collected = BTreeMap::from([
            (TradeNodeId(0), Fixed::from_int(3)),
            (TradeNodeId(1), Fixed::from_f32(4.5)),
        ]);

        let income = integrate_trade_income("HAN", &collected, &network());

        assert_eq!(income.total, Fixed::from_f32(7.5));
        assert_eq!(income.sources.len(), 2);
        assert_eq!(income.sources[0].label, "trade: lubeck");
        assert_eq!(income.sources[1].label, "trade: english_channel");
        assert_eq!(income.sources[1].amount, Fixed::from_f32(4.5));
    }

    #[test]
    fn test_no_collection_no_income() {
        let income = integrate_trade_income("HAN", &BTreeMap::new(), &network());
        assert_eq!(income.total, Fixed::ZERO);
        assert!(income.sources.is_empty());
    }
}
