use crate::config::SimConfig;
use crate::effects::get_resource_effects;
use crate::error::TradeError;
use crate::input::{PlayerInputs, TradeCommand};
use crate::metrics::SimMetrics;
use crate::report::{NationView, NodeView, RejectedCommand, TurnReport};
use crate::state::EconomyState;
use crate::systems::{
    apply_turn, compute_consumption, compute_production, integrate_trade_income, run_trade_turn,
};
use std::collections::BTreeMap;
use std::time::Instant;

/// Advance the economy by one turn.
///
/// Phases, in order:
/// 1. Apply queued commands (merchant changes, trade power)
/// 2. Trade pass over the network in topological order
/// 3. Integrate each nation's collected income into treasury production
/// 4. Production, consumption and the ledger turn
/// 5. Shortage effects from the new reserves
///
/// Commands only take effect here, at the turn boundary. A failing command is
/// logged, listed in the report and changes nothing. Only a structural trade
/// error fails the turn, and then `state` is left untouched.
pub fn step_turn(
    state: &EconomyState,
    inputs: &[PlayerInputs],
    config: &SimConfig,
    metrics: Option<&mut SimMetrics>,
) -> Result<(EconomyState, TurnReport), TradeError> {
    let turn_start = Instant::now();
    let mut new_state = state.clone();

    // 1. Process Inputs
    let mut rejected = Vec::new();
    for player_input in inputs {
        for cmd in &player_input.commands {
            if let Err(e) = execute_command(&mut new_state, &player_input.nation, cmd) {
                log::warn!(
                    "Failed to execute command for {}: {}",
                    player_input.nation,
                    e
                );
                rejected.push(RejectedCommand {
                    nation: player_input.nation.clone(),
                    command: cmd.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    // 2. Trade
    let trade_start = Instant::now();
    let trade = run_trade_turn(&new_state.network, &new_state.merchants, |nation| {
        new_state.steering_bonus(nation, config)
    })?;
    let trade_time = trade_start.elapsed();

    // 3-5. Ledger
    let ledger_start = Instant::now();
    let mut nations = BTreeMap::new();
    for (id, nation) in new_state.nations.iter_mut() {
        let income = integrate_trade_income(id, &trade.collected_by(id), &new_state.network);
        let production = compute_production(&nation.context, &income, &config.economy);
        let consumption = compute_consumption(&nation.context, &config.economy);
        let ledger = apply_turn(
            &nation.resources,
            &production,
            &consumption,
            config.low_reserve_threshold,
        );

        for warning in &ledger.warnings {
            log::warn!("{}: {}", id, warning);
        }

        nation.resources = ledger.resources;
        let effects = get_resource_effects(&nation.resources);

        nations.insert(
            id.clone(),
            NationView {
                balances: ledger.balances,
                warnings: ledger.warnings,
                effects,
                trade_income: income.total,
                free_merchants: new_state.merchants.free_merchants(id),
            },
        );
    }
    let ledger_time = ledger_start.elapsed();

    new_state.turn += 1;

    let nodes: Vec<NodeView> = trade
        .nodes
        .values()
        .map(|outcome| NodeView::new(&new_state.network, outcome))
        .collect();

    let report = TurnReport {
        turn: new_state.turn,
        nodes,
        nations,
        rejected,
    };

    log::info!(
        "Turn {}: {} nodes, {} nations, {} warnings, {} rejected commands",
        report.turn,
        report.nodes.len(),
        report.nations.len(),
        report.warning_count(),
        report.rejected.len()
    );

    if let Some(metrics) = metrics {
        metrics.total_turns += 1;
        metrics.trade_time += trade_time;
        metrics.ledger_time += ledger_time;
        metrics.total_time += turn_start.elapsed();
    }

    Ok((new_state, report))
}

fn execute_command(
    state: &mut EconomyState,
    nation: &str,
    cmd: &TradeCommand,
) -> Result<(), TradeError> {
    state.nation(nation)?;
    let EconomyState {
        network, merchants, ..
    } = state;

    match *cmd {
        TradeCommand::AssignMerchant { node, action } => {
            merchants.assign_merchant(network, nation, node, action)
        }
        TradeCommand::RemoveMerchant { node } => merchants.remove_merchant(network, nation, node),
        TradeCommand::SetMerchantAction { node, action } => {
            merchants.set_merchant_action(network, nation, node, action)
        }
        TradeCommand::SetTradePower { node, power } => {
            merchants.set_power(network, nation, node, power)
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
