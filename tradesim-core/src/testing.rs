use crate::error::TradeError;
use crate::fixed::Fixed;
use crate::resources::{Resource, Resources};
use crate::state::{EconomyState, NationContext, NationState};
use crate::topology::TradeNetwork;
use crate::trade::{MerchantAction, TradeNodeDef};

/// Builds synthetic economies for tests and demos.
///
/// Nodes and merchants are referenced by name; everything is resolved in
/// `build`, which reports the same errors a real scenario would.
pub struct EconomyStateBuilder {
    nodes: Vec<TradeNodeDef>,
    nations: Vec<(String, NationState, u8)>,
    powers: Vec<(String, String, Fixed)>,
    merchants: Vec<(String, String, MerchantAction)>,
}

impl EconomyStateBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            nations: Vec::new(),
            powers: Vec::new(),
            merchants: Vec::new(),
        }
    }

    pub fn with_node(mut self, name: &str, local_value: i64, outgoing: &[&str]) -> Self {
        self.nodes.push(TradeNodeDef {
            name: name.to_string(),
            region: String::new(),
            local_value: Fixed::from_int(local_value),
            outgoing: outgoing.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Nation with generous reserves and an idle context.
    pub fn with_nation(self, id: &str, merchants: u8) -> Self {
        let nation = NationState {
            resources: Resources::from_fn(|_| Fixed::from_int(100)),
            ..Default::default()
        };
        self.with_nation_state(id, nation, merchants)
    }

    pub fn with_nation_state(mut self, id: &str, nation: NationState, merchants: u8) -> Self {
        self.nations.push((id.to_string(), nation, merchants));
        self
    }

    pub fn with_context(mut self, id: &str, context: NationContext) -> Self {
        if let Some((_, nation, _)) = self.nations.iter_mut().find(|(n, _, _)| n == id) {
            nation.context = context;
        }
        self
    }

    pub fn with_reserve(mut self, id: &str, resource: Resource, amount: Fixed) -> Self {
        if let Some((_, nation, _)) = self.nations.iter_mut().find(|(n, _, _)| n == id) {
            nation.resources[resource] = amount;
        }
        self
    }

    pub fn with_steering_bonus(mut self, id: &str, bonus: Fixed) -> Self {
        if let Some((_, nation, _)) = self.nations.iter_mut().find(|(n, _, _)| n == id) {
            nation.steering_bonus = Some(bonus);
        }
        self
    }

    pub fn with_power(mut self, nation: &str, node: &str, power: i64) -> Self {
        self.powers
            .push((nation.to_string(), node.to_string(), Fixed::from_int(power)));
        self
    }

    pub fn with_merchant(mut self, nation: &str, node: &str, action: MerchantAction) -> Self {
        self.merchants
            .push((nation.to_string(), node.to_string(), action));
        self
    }

    pub fn build(self) -> Result<EconomyState, TradeError> {
        let network = TradeNetwork::new(self.nodes)?;
        let mut state = EconomyState::new(network);

        for (id, nation, merchants) in self.nations {
            state.add_nation(id, nation, merchants);
        }
        for (nation, node, power) in self.powers {
            let node = state
                .network
                .id_of(&node)
                .ok_or(TradeError::UnknownNode(node))?;
            state
                .merchants
                .set_power(&state.network, &nation, node, power)?;
        }
        for (nation, node, action) in self.merchants {
            let node = state
                .network
                .id_of(&node)
                .ok_or(TradeError::UnknownNode(node))?;
            state
                .merchants
                .assign_merchant(&state.network, &nation, node, action)?;
        }

        Ok(state)
    }
}

impl Default for EconomyStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
