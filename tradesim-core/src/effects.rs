//! Stat penalties from empty reserves.
//!
//! Effects are a closed set of kinds with one accumulated value each, so a new
//! kind cannot be added without every consumer handling it.

use crate::fixed::Fixed;
use crate::resources::Resources;
use serde::Serialize;
use std::fmt;

/// National stats a shortage can penalise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Economy,
    Stability,
    Military,
    Innovation,
    Prestige,
}

impl EffectKind {
    pub const ALL: [EffectKind; 5] = [
        EffectKind::Economy,
        EffectKind::Stability,
        EffectKind::Military,
        EffectKind::Innovation,
        EffectKind::Prestige,
    ];
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectKind::Economy => "economy",
            EffectKind::Stability => "stability",
            EffectKind::Military => "military",
            EffectKind::Innovation => "innovation",
            EffectKind::Prestige => "prestige",
        };
        f.write_str(name)
    }
}

/// Additive stat changes, one slot per [`EffectKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatDeltas {
    pub economy: Fixed,
    pub stability: Fixed,
    pub military: Fixed,
    pub innovation: Fixed,
    pub prestige: Fixed,
}

impl StatDeltas {
    pub fn get(&self, kind: EffectKind) -> Fixed {
        match kind {
            EffectKind::Economy => self.economy,
            EffectKind::Stability => self.stability,
            EffectKind::Military => self.military,
            EffectKind::Innovation => self.innovation,
            EffectKind::Prestige => self.prestige,
        }
    }

    pub fn add(&mut self, kind: EffectKind, delta: Fixed) {
        let slot = match kind {
            EffectKind::Economy => &mut self.economy,
            EffectKind::Stability => &mut self.stability,
            EffectKind::Military => &mut self.military,
            EffectKind::Innovation => &mut self.innovation,
            EffectKind::Prestige => &mut self.prestige,
        };
        *slot += delta;
    }

    /// Non-zero deltas in [`EffectKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, Fixed)> + '_ {
        EffectKind::ALL
            .into_iter()
            .map(move |k| (k, self.get(k)))
            .filter(|(_, v)| *v != Fixed::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Penalties for every resource at or below zero.
///
/// Re-evaluated every turn from current reserves; penalties persist until the
/// stock recovers. Food and iron shortages stack on military.
pub fn get_resource_effects(resources: &Resources) -> StatDeltas {
    let mut deltas = StatDeltas::default();
    let empty = |v: Fixed| v <= Fixed::ZERO;

    if empty(resources.treasury) {
        deltas.add(EffectKind::Economy, Fixed::from_int(-1));
        deltas.add(EffectKind::Stability, -Fixed::HALF);
    }
    if empty(resources.manpower) {
        deltas.add(EffectKind::Military, Fixed::from_int(-1));
    }
    if empty(resources.food) {
        deltas.add(EffectKind::Stability, Fixed::from_int(-2));
        deltas.add(EffectKind::Military, -Fixed::HALF);
    }
    if empty(resources.iron) {
        deltas.add(EffectKind::Military, -Fixed::HALF);
    }
    if empty(resources.coal) {
        deltas.add(EffectKind::Innovation, -Fixed::HALF);
    }
    if empty(resources.luxuries) {
        deltas.add(EffectKind::Prestige, -Fixed::HALF);
    }

    deltas
}
