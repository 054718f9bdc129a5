//! Per-nation production and consumption.
//!
//! Pure functions of the nation's context, the trade income handed over by
//! [`crate::systems::trade_income`], and the [`EconomyConfig`] coefficients.
//! Every term is a labelled source so the display layer can attribute it.
//!
//! # Formulas
//! ```text
//! treasury  + economy × treasury_per_economy + territory × treasury_per_territory + trade
//!           - army × army_upkeep - court × court_upkeep
//! manpower  + territory × manpower_per_territory × (1 + stability × stability_manpower_factor)
//!           - army × army_manpower_reinforce
//! food      + territory × food_per_territory
//!           - territory × food_per_territory_pop - army × army_food
//! iron      + territory × iron_per_territory - army × army_iron
//! coal      + territory × coal_per_territory - innovation × coal_per_innovation
//! textiles  + economy × textiles_per_economy - court × court_textiles
//! luxuries  + economy × luxuries_per_economy
//!           - court × court_luxuries - max(prestige, 0) × luxuries_per_prestige
//! ```

use crate::config::EconomyConfig;
use crate::fixed::Fixed;
use crate::resources::{ResourceFlow, ResourceMap};
use crate::state::NationContext;

pub fn compute_production(
    ctx: &NationContext,
    trade_income: &ResourceFlow,
    cfg: &EconomyConfig,
) -> ResourceMap<ResourceFlow> {
    let mut production: ResourceMap<ResourceFlow> = ResourceMap::default();

    production
        .treasury
        .add("economy", ctx.economy * cfg.treasury_per_economy);
    production
        .treasury
        .add("territory", ctx.territory * cfg.treasury_per_territory);
    for source in &trade_income.sources {
        production.treasury.add(source.label.clone(), source.amount);
    }

    let stability_factor = (Fixed::ONE + ctx.stability * cfg.stability_manpower_factor).non_negative();
    production.manpower.add(
        "territory",
        ctx.territory * cfg.manpower_per_territory * stability_factor,
    );

    production
        .food
        .add("territory", ctx.territory * cfg.food_per_territory);
    production
        .iron
        .add("territory", ctx.territory * cfg.iron_per_territory);
    production
        .coal
        .add("territory", ctx.territory * cfg.coal_per_territory);
    production
        .textiles
        .add("economy", ctx.economy * cfg.textiles_per_economy);
    production
        .luxuries
        .add("economy", ctx.economy * cfg.luxuries_per_economy);

    production
}

pub fn compute_consumption(ctx: &NationContext, cfg: &EconomyConfig) -> ResourceMap<ResourceFlow> {
    let mut consumption: ResourceMap<ResourceFlow> = ResourceMap::default();

    consumption
        .treasury
        .add("army upkeep", ctx.army_size * cfg.army_upkeep);
    consumption
        .treasury
        .add("court upkeep", ctx.court_size * cfg.court_upkeep);

    consumption
        .manpower
        .add("army reinforcement", ctx.army_size * cfg.army_manpower_reinforce);

    consumption
        .food
        .add("population", ctx.territory * cfg.food_per_territory_pop);
    consumption.food.add("army", ctx.army_size * cfg.army_food);

    consumption.iron.add("army", ctx.army_size * cfg.army_iron);

    consumption
        .coal
        .add("innovation", ctx.innovation * cfg.coal_per_innovation);

    consumption
        .textiles
        .add("court", ctx.court_size * cfg.court_textiles);

    consumption
        .luxuries
        .add("court", ctx.court_size * cfg.court_luxuries);
    consumption.luxuries.add(
        "prestige",
        ctx.prestige.non_negative() * cfg.luxuries_per_prestige,
    );

    consumption
}
