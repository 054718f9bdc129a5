use crate::fixed::Fixed;
use crate::state::NationId;
use crate::trade::{MerchantAction, TradeNodeId};
use serde::{Deserialize, Serialize};

/// Commands one nation submits for the next turn boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInputs {
    pub nation: NationId,
    pub commands: Vec<TradeCommand>,
}

impl PlayerInputs {
    pub fn new(nation: impl Into<NationId>, commands: Vec<TradeCommand>) -> Self {
        Self {
            nation: nation.into(),
            commands,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeCommand {
    AssignMerchant {
        node: TradeNodeId,
        action: MerchantAction,
    },
    RemoveMerchant {
        node: TradeNodeId,
    },
    SetMerchantAction {
        node: TradeNodeId,
        action: MerchantAction,
    },
    /// Replace the nation's raw power at a node.
    SetTradePower {
        node: TradeNodeId,
        power: Fixed,
    },
}
