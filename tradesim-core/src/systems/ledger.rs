//! Resource ledger turn.
//!
//! Applies one turn of net production to a nation's reserves. Total: any
//! combination of inputs yields new reserves, balances and warnings. Shortage
//! is a gameplay state handled by [`crate::effects`], never an error.

use crate::fixed::Fixed;
use crate::resources::{
    forecast_depletion, Resource, ResourceBalance, ResourceFlow, ResourceMap, ResourceWarning,
    Resources,
};
use tracing::instrument;

/// Result of one ledger turn for one nation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerOutcome {
    pub resources: Resources,
    pub balances: ResourceMap<ResourceBalance>,
    pub warnings: Vec<ResourceWarning>,
}

/// Apply production and consumption to reserves.
///
/// For each resource `net = production - consumption` and the new reserve is
/// `max(0, reserve + net)`. Warnings:
/// - [`ResourceWarning::Depleted`] when a positive reserve reaches zero
/// - [`ResourceWarning::ReservesLow`] when the new reserve is below
///   `low_reserve_threshold` and `net < 0`
#[instrument(skip_all, name = "ledger")]
pub fn apply_turn(
    resources: &Resources,
    production: &ResourceMap<ResourceFlow>,
    consumption: &ResourceMap<ResourceFlow>,
    low_reserve_threshold: Fixed,
) -> LedgerOutcome {
    let mut next = resources.clone();
    let mut balances: ResourceMap<ResourceBalance> = ResourceMap::default();
    let mut warnings = Vec::new();

    for resource in Resource::ALL {
        let produced = production[resource].total;
        let consumed = consumption[resource].total;
        let net = produced - consumed;

        let before = resources[resource];
        let after = before.saturating_add(net).non_negative();
        next[resource] = after;

        if before.is_positive() && after == Fixed::ZERO {
            warnings.push(ResourceWarning::Depleted(resource));
        }
        if after < low_reserve_threshold && net.is_negative() {
            warnings.push(ResourceWarning::ReservesLow(resource));
        }

        balances[resource] = ResourceBalance {
            production: produced,
            consumption: consumed,
            net,
            reserves: after,
            turns_until_depletion: forecast_depletion(after, net),
        };
    }

    LedgerOutcome {
        resources: next,
        balances,
        warnings,
    }
}
