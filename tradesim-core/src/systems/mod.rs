//! Per-turn simulation systems, run by [`crate::step::step_turn`] in this order:
//! trade value (with power shares and steering), trade income, production,
//! ledger.

pub mod ledger;
pub mod production;
pub mod steering;
pub mod trade_income;
pub mod trade_power;
pub mod trade_value;

pub use ledger::{apply_turn, LedgerOutcome};
pub use production::{compute_consumption, compute_production};
pub use steering::{resolve_merchant_actions, MerchantResolution};
pub use trade_income::integrate_trade_income;
pub use trade_power::compute_shares;
pub use trade_value::{run_trade_turn, NodeOutcome, TradeTurnOutcome};
