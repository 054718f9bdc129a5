//! National resource stocks and the per-turn balance types.
//!
//! Quantities in [`Resources`] are reserves (stocks), not rates. Rates live in
//! [`ResourceFlow`], which keeps labelled sources so the display layer can
//! attribute every unit of production and consumption.

use crate::fixed::Fixed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// The seven resources tracked per nation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Treasury,
    Manpower,
    Food,
    Iron,
    Coal,
    Textiles,
    Luxuries,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Treasury,
        Resource::Manpower,
        Resource::Food,
        Resource::Iron,
        Resource::Coal,
        Resource::Textiles,
        Resource::Luxuries,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Resource::Treasury => "treasury",
            Resource::Manpower => "manpower",
            Resource::Food => "food",
            Resource::Iron => "iron",
            Resource::Coal => "coal",
            Resource::Textiles => "textiles",
            Resource::Luxuries => "luxuries",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per resource, with exhaustive access by [`Resource`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct ResourceMap<T> {
    pub treasury: T,
    pub manpower: T,
    pub food: T,
    pub iron: T,
    pub coal: T,
    pub textiles: T,
    pub luxuries: T,
}

impl<T> ResourceMap<T> {
    pub fn from_fn(mut f: impl FnMut(Resource) -> T) -> Self {
        Self {
            treasury: f(Resource::Treasury),
            manpower: f(Resource::Manpower),
            food: f(Resource::Food),
            iron: f(Resource::Iron),
            coal: f(Resource::Coal),
            textiles: f(Resource::Textiles),
            luxuries: f(Resource::Luxuries),
        }
    }

    pub fn get(&self, resource: Resource) -> &T {
        match resource {
            Resource::Treasury => &self.treasury,
            Resource::Manpower => &self.manpower,
            Resource::Food => &self.food,
            Resource::Iron => &self.iron,
            Resource::Coal => &self.coal,
            Resource::Textiles => &self.textiles,
            Resource::Luxuries => &self.luxuries,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> &mut T {
        match resource {
            Resource::Treasury => &mut self.treasury,
            Resource::Manpower => &mut self.manpower,
            Resource::Food => &mut self.food,
            Resource::Iron => &mut self.iron,
            Resource::Coal => &mut self.coal,
            Resource::Textiles => &mut self.textiles,
            Resource::Luxuries => &mut self.luxuries,
        }
    }

    /// Iterate in [`Resource::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, &T)> {
        Resource::ALL.into_iter().map(move |r| (r, self.get(r)))
    }
}

impl<T> Index<Resource> for ResourceMap<T> {
    type Output = T;
    fn index(&self, resource: Resource) -> &T {
        self.get(resource)
    }
}

impl<T> IndexMut<Resource> for ResourceMap<T> {
    fn index_mut(&mut self, resource: Resource) -> &mut T {
        self.get_mut(resource)
    }
}

/// A nation's reserves.
pub type Resources = ResourceMap<Fixed>;

/// A labelled contribution to production or consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub label: String,
    pub amount: Fixed,
}

/// Production or consumption of one resource for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResourceFlow {
    pub total: Fixed,
    pub sources: Vec<Source>,
}

impl ResourceFlow {
    /// Add a labelled source. Negative amounts are clamped to zero so a
    /// flow total is never negative.
    pub fn add(&mut self, label: impl Into<String>, amount: Fixed) {
        let amount = amount.non_negative();
        self.total += amount;
        self.sources.push(Source {
            label: label.into(),
            amount,
        });
    }

    pub fn with(mut self, label: impl Into<String>, amount: Fixed) -> Self {
        self.add(label, amount);
        self
    }

    /// A flow with a single unlabelled total, mostly for tests.
    pub fn flat(amount: Fixed) -> Self {
        Self::default().with("base", amount)
    }
}

/// Derived balance of one resource after a turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResourceBalance {
    pub production: Fixed,
    pub consumption: Fixed,
    /// `production - consumption`
    pub net: Fixed,
    /// Post-turn reserves.
    pub reserves: Fixed,
    /// Present only when `net < 0` and `reserves > 0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turns_until_depletion: Option<u32>,
}

/// Turns until `reserves` run out at a constant negative `net`.
///
/// `ceil(reserves / |net|)`, or `None` when the stock is not shrinking or is
/// already empty.
pub fn forecast_depletion(reserves: Fixed, net: Fixed) -> Option<u32> {
    if !net.is_negative() || !reserves.is_positive() {
        return None;
    }
    reserves.ceil_div(net.abs())
}

/// Non-fatal notices raised by the ledger turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "resource", rename_all = "snake_case")]
pub enum ResourceWarning {
    /// Reserves went from positive to zero this turn.
    Depleted(Resource),
    /// Reserves ended below the low-reserve threshold while shrinking.
    ReservesLow(Resource),
}

impl fmt::Display for ResourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceWarning::Depleted(r) => write!(f, "{r} depleted"),
            ResourceWarning::ReservesLow(r) => write!(f, "{r} reserves low"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_map_access_is_exhaustive() {
        let mut map: ResourceMap<u8> = ResourceMap::default();
        for (i, r) in Resource::ALL.into_iter().enumerate() {
            map[r] = i as u8;
        }
        let collected: Vec<u8> = map.iter().map(|(_, v)| *v).collect();
        assert_eq!(collected, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(map.iron, 3);
    }

    #[test]
    fn test_resources_from_partial_json() {
        let resources: Resources = serde_json::from_str(r#"{ "treasury": 50, "food": 12.5 }"#).unwrap();
        assert_eq!(resources.treasury, Fixed::from_int(50));
        assert_eq!(resources.food, Fixed::from_f32(12.5));
        assert_eq!(resources.coal, Fixed::ZERO);
    }

    #[test]
    fn test_flow_clamps_negative_sources() {
        let flow = ResourceFlow::default()
            .with("provinces", Fixed::from_int(5))
            .with("broken", Fixed::from_int(-3));
        assert_eq!(flow.total, Fixed::from_int(5));
        assert_eq!(flow.sources[1].amount, Fixed::ZERO);
    }

    #[test]
    fn test_forecast_depletion() {
        assert_eq!(
            forecast_depletion(Fixed::from_int(50), Fixed::from_int(-10)),
            Some(5)
        );
        assert_eq!(
            forecast_depletion(Fixed::from_int(55), Fixed::from_int(-10)),
            Some(6)
        );
        assert_eq!(forecast_depletion(Fixed::from_int(50), Fixed::ZERO), None);
        assert_eq!(forecast_depletion(Fixed::from_int(50), Fixed::from_int(3)), None);
        assert_eq!(forecast_depletion(Fixed::ZERO, Fixed::from_int(-10)), None);
    }

    #[test]
    fn test_warning_text() {
        assert_eq!(
            ResourceWarning::Depleted(Resource::Food).to_string(),
            "food depleted"
        );
        assert_eq!(
            ResourceWarning::ReservesLow(Resource::Iron).to_string(),
            "iron reserves low"
        );
    }
}
