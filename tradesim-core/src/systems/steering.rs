//! Merchant steering: collect a share locally or push it downstream.
//!
//! A nation's share only turns into anything when it has a merchant at the
//! node. Collected value becomes income for that nation; transferred value is
//! added to the downstream node, multiplied by `1 + steering_bonus`, before
//! that node is processed.

use crate::error::TradeError;
use crate::fixed::Fixed;
use crate::merchants::steering_target;
use crate::state::NationId;
use crate::trade::{MerchantAction, NodeShare, TradeNode, TradeNodeId, TradePresence};
use std::collections::BTreeMap;

/// Outcome of resolving every merchant at one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerchantResolution {
    pub collected: BTreeMap<NationId, Fixed>,
    /// Value arriving at each downstream node, bonus included.
    pub transferred: BTreeMap<TradeNodeId, Fixed>,
    /// Share value sent downstream before the steering bonus.
    pub transferred_base: Fixed,
    /// Value nobody realised: shares without a merchant, the power-less
    /// remainder and truncation dust. Lost for this turn.
    pub unclaimed: Fixed,
}

/// Resolve the merchants at `node` against this turn's shares.
///
/// `steering_bonus` supplies each nation's transfer modifier. Fails with
/// [`TradeError::InvalidSteering`] if a transfer has no valid route.
pub fn resolve_merchant_actions(
    node: &TradeNode,
    total_value: Fixed,
    shares: &[NodeShare],
    presences: &[TradePresence],
    steering_bonus: impl Fn(&str) -> Fixed,
) -> Result<MerchantResolution, TradeError> {
    let mut resolution = MerchantResolution::default();
    let mut claimed = Fixed::ZERO;

    for share in shares {
        let action = presences
            .iter()
            .find(|p| p.nation == share.nation)
            .and_then(|p| p.merchant);

        match action {
            None => {}
            Some(MerchantAction::Collect) => {
                *resolution
                    .collected
                    .entry(share.nation.clone())
                    .or_insert(Fixed::ZERO) += share.share_value;
                claimed += share.share_value;
            }
            Some(action @ MerchantAction::Transfer { .. }) => {
                let target = steering_target(node, action)?.ok_or_else(|| {
                    TradeError::InvalidSteering {
                        node: node.name.clone(),
                        reason: "transfer resolved to no route".to_string(),
                    }
                })?;
                let multiplier = Fixed::ONE + steering_bonus(&share.nation);
                let arriving = (share.share_value * multiplier).non_negative();

                *resolution.transferred.entry(target).or_insert(Fixed::ZERO) += arriving;
                resolution.transferred_base += share.share_value;
                claimed += share.share_value;

                log::trace!(
                    "{} steers {} from {} to {:?}",
                    share.nation,
                    arriving,
                    node.name,
                    target
                );
            }
        }
    }

    resolution.unclaimed = (total_value - claimed).non_negative();
    Ok(resolution)
}
