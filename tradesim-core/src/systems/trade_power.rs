//! Trade power share resolution.
//!
//! A nation's share of a node is its raw power over the node's total power:
//! `share_percent = 100 × power / Σ power`. Shares are derived fresh every turn
//! and never stored.

use crate::fixed::Fixed;
use crate::trade::{NodeShare, TradeNodeId, TradePresence};

/// Compute every present nation's share of a node's value.
///
/// Output is ordered by power, strongest first. Equal power keeps the
/// presences' insertion order. With zero total power every share is 0 and the
/// node's whole value goes unclaimed.
pub fn compute_shares(
    node: TradeNodeId,
    total_value: Fixed,
    presences: &[TradePresence],
) -> Vec<NodeShare> {
    // Widened so saturated powers still split proportionally
    let total_power: i128 = presences
        .iter()
        .map(|p| i128::from(p.power.non_negative().raw()))
        .sum();

    let mut ranked: Vec<&TradePresence> = presences.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.power.cmp(&a.power));

    ranked
        .into_iter()
        .map(|presence| {
            let share_percent = presence.power.non_negative().percent_of_raw(total_power);
            NodeShare {
                nation: presence.nation.clone(),
                node,
                share_percent,
                share_value: total_value.apply_percent(share_percent),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODE: TradeNodeId = TradeNodeId(0);

    fn presence(nation: &str, power: i64) -> TradePresence {
        TradePresence {
            nation: nation.to_string(),
            node: NODE,
            power: Fixed::from_int(power),
            merchant: None,
        }
    }

    #[test]
    fn test_sixty_forty() {
        let shares = compute_shares(
            NODE,
            Fixed::from_int(100),
            &[presence("VEN", 60), presence("GEN", 40)],
        );

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].nation, "VEN");
        assert_eq!(shares[0].share_percent, Fixed::from_int(60));
        assert_eq!(shares[0].share_value, Fixed::from_int(60));
        assert_eq!(shares[1].share_percent, Fixed::from_int(40));
        assert_eq!(shares[1].share_value, Fixed::from_int(40));
    }

    #[test]
    fn test_sorted_by_power() {
        let shares = compute_shares(
            NODE,
            Fixed::from_int(50),
            &[presence("GEN", 10), presence("TUR", 30), presence("VEN", 10)],
        );
        let order: Vec<&str> = shares.iter().map(|s| s.nation.as_str()).collect();
        // GEN and VEN tie; GEN was inserted first
        assert_eq!(order, vec!["TUR", "GEN", "VEN"]);
    }

    #[test]
    fn test_zero_total_power() {
        let shares = compute_shares(
            NODE,
            Fixed::from_int(100),
            &[presence("VEN", 0), presence("GEN", 0)],
        );
        assert!(shares.iter().all(|s| s.share_percent == Fixed::ZERO));
        assert!(shares.iter().all(|s| s.share_value == Fixed::ZERO));
    }

    #[test]
    fn test_zero_power_nation_listed() {
        let shares = compute_shares(
            NODE,
            Fixed::from_int(10),
            &[presence("VEN", 0), presence("GEN", 5)],
        );
        assert_eq!(shares[0].share_percent, Fixed::HUNDRED);
        assert_eq!(shares[1].nation, "VEN");
        assert_eq!(shares[1].share_percent, Fixed::ZERO);
    }

    #[test]
    fn test_no_presences() {
        assert!(compute_shares(NODE, Fixed::from_int(10), &[]).is_empty());
    }

    #[test]
    fn test_thirds_truncate() {
        let shares = compute_shares(
            NODE,
            Fixed::from_int(90),
            &[presence("A", 1), presence("B", 1), presence("C", 1)],
        );
        let sum: Fixed = shares.iter().map(|s| s.share_percent).sum();
        // 33.3333 × 3
        assert_eq!(sum, Fixed::from_raw(999_999));
    }

    #[test]
    fn test_saturated_powers_split_evenly() {
        let huge = |nation: &str| TradePresence {
            nation: nation.to_string(),
            node: NODE,
            power: Fixed::from_f64(1e15),
            merchant: None,
        };
        let shares = compute_shares(NODE, Fixed::from_int(100), &[huge("VEN"), huge("GEN")]);

        assert_eq!(shares[0].share_percent, Fixed::from_int(50));
        assert_eq!(shares[1].share_percent, Fixed::from_int(50));
        assert_eq!(shares[0].share_value, Fixed::from_int(50));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn powers() -> impl Strategy<Value = Vec<i64>> {
            // Raw power up to 10_000.0
            proptest::collection::vec(0i64..100_000_000, 1..12)
        }

        proptest! {
            #[test]
            fn shares_sum_to_hundred(raw in powers(), value in 0i64..100_000_000) {
                let presences: Vec<TradePresence> = raw
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| TradePresence {
                        nation: format!("N{i}"),
                        node: NODE,
                        power: Fixed::from_raw(p),
                        merchant: None,
                    })
                    .collect();

                let shares = compute_shares(NODE, Fixed::from_raw(value), &presences);
                prop_assert_eq!(shares.len(), presences.len());

                let sum: Fixed = shares.iter().map(|s| s.share_percent).sum();
                let total_power: i64 = raw.iter().sum();
                if total_power == 0 {
                    prop_assert_eq!(sum, Fixed::ZERO);
                } else {
                    // Each share truncates by less than one raw unit
                    prop_assert!(sum <= Fixed::HUNDRED);
                    prop_assert!(Fixed::HUNDRED.raw() - sum.raw() < presences.len() as i64);
                }

                for share in &shares {
                    prop_assert!(share.share_percent >= Fixed::ZERO);
                    prop_assert!(share.share_percent <= Fixed::HUNDRED);
                }
            }

            #[test]
            fn share_values_never_exceed_total(raw in powers(), value in 0i64..100_000_000) {
                let presences: Vec<TradePresence> = raw
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| TradePresence {
                        nation: format!("N{i}"),
                        node: NODE,
                        power: Fixed::from_raw(p),
                        merchant: None,
                    })
                    .collect();

                let shares = compute_shares(NODE, Fixed::from_raw(value), &presences);
                let claimed: Fixed = shares.iter().map(|s| s.share_value).sum();
                prop_assert!(claimed <= Fixed::from_raw(value));
            }

            #[test]
            fn extreme_powers_never_overclaim(
                raw in proptest::collection::vec(0..=i64::MAX, 1..8),
                value in 0..=i64::MAX,
            ) {
                let presences: Vec<TradePresence> = raw
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| TradePresence {
                        nation: format!("N{i}"),
                        node: NODE,
                        power: Fixed::from_raw(p),
                        merchant: None,
                    })
                    .collect();

                let shares = compute_shares(NODE, Fixed::from_raw(value), &presences);
                let percent: i128 = shares.iter().map(|s| i128::from(s.share_percent.raw())).sum();
                let claimed: i128 = shares.iter().map(|s| i128::from(s.share_value.raw())).sum();
                prop_assert!(percent <= i128::from(Fixed::HUNDRED.raw()));
                prop_assert!(claimed <= i128::from(value));
            }
        }
    }
}
