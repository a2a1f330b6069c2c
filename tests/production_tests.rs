//! End-to-end production pipeline tests over realistic region data.

use std::collections::HashMap;

use goldrush::domain::{
    Commodity, CountryId, ProductionEngine, ProductionFactors, QualityTier,
};
use goldrush::testkit::region;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn neutral_factors() -> ProductionFactors {
    // Three workers already hired puts the fatigue multiplier at exactly 1.
    ProductionFactors {
        workers_today: 3,
        ..Default::default()
    }
}

#[test]
fn npc_industrial_zone_divides_base_yield_by_three() {
    // Food Q1 has base yield 60; an NPC-owned Industrial Zone cuts the
    // intermediate to 20 before any other step applies.
    let r = region(1, "Alpha", 1, "Iceland", Decimal::ZERO, "");
    let factors = ProductionFactors {
        company_tier: 1,
        is_npc_owned: true,
        ..neutral_factors()
    };
    let result = ProductionEngine::default()
        .calculate(&r, Commodity::Food, &factors, &[], &HashMap::new())
        .unwrap();
    assert_eq!(result.yields.q1, 20);
}

#[test]
fn pollution_debuff_spares_one_tenth_of_production() {
    // Ticket Q1 base 40 at eco skill 75 gives exactly 100 pre-pollution.
    // Pollution 20 then removes (100 - 10) * 0.20 = 18, leaving 82.
    let r = region(1, "Alpha", 1, "Iceland", dec!(20), "");
    let factors = ProductionFactors {
        company_tier: 1,
        eco_skill: 75,
        ..neutral_factors()
    };
    let result = ProductionEngine::default()
        .calculate(&r, Commodity::AirplaneTicket, &factors, &[], &HashMap::new())
        .unwrap();
    assert_eq!(result.yields.q1, 82);
}

#[test]
fn military_step_is_a_noop_below_level_three_and_for_civilian_goods() {
    let r = region(1, "Alpha", 1, "Iceland", Decimal::ZERO, "");
    let engine = ProductionEngine::default();

    let baseline = engine
        .calculate(&r, Commodity::Weapon, &neutral_factors(), &[], &HashMap::new())
        .unwrap();
    let level_two = engine
        .calculate(
            &r,
            Commodity::Weapon,
            &ProductionFactors {
                military_base_level: 2,
                ..neutral_factors()
            },
            &[],
            &HashMap::new(),
        )
        .unwrap();
    assert_eq!(level_two.yields, baseline.yields);

    let grain_baseline = engine
        .calculate(&r, Commodity::Grain, &neutral_factors(), &[], &HashMap::new())
        .unwrap();
    let grain_fortified = engine
        .calculate(
            &r,
            Commodity::Grain,
            &ProductionFactors {
                military_base_level: 5,
                ..neutral_factors()
            },
            &[],
            &HashMap::new(),
        )
        .unwrap();
    assert_eq!(grain_fortified.yields, grain_baseline.yields);
}

#[test]
fn country_bonus_aggregates_weapons_regions() {
    let regions = vec![
        region(1, "Alpha", 1, "Iceland", Decimal::ZERO, "WEAPONS:10"),
        region(2, "Beta", 1, "Iceland", Decimal::ZERO, "WEAPONS:15"),
        region(3, "Gamma", 1, "Iceland", Decimal::ZERO, "WEAPONS:5"),
    ];
    let result = ProductionEngine::default()
        .calculate(
            &regions[0],
            Commodity::Weapon,
            &neutral_factors(),
            &regions,
            &HashMap::new(),
        )
        .unwrap();
    assert_eq!(result.country_bonus, dec!(6.0));
}

#[test]
fn all_tiers_scale_from_one_pipeline_run() {
    let r = region(1, "Alpha", 1, "Iceland", Decimal::ZERO, "");
    let result = ProductionEngine::default()
        .calculate(&r, Commodity::Weapon, &neutral_factors(), &[], &HashMap::new())
        .unwrap();

    // The Q5 run produced 56 (the base); the other tiers follow the
    // base-table ratio 197/143/105/77 over 56.
    assert_eq!(result.yields.q5, 56);
    assert_eq!(result.yields.q1, 197);
    assert_eq!(result.yields.q4, 77);
    assert_eq!(
        result.yields.get(QualityTier::Q3),
        105
    );
}

#[test]
fn full_region_scan_ranks_bonused_regions_first() {
    let regions = vec![
        region(1, "Dusty", 1, "Iceland", dec!(90), ""),
        region(2, "Fertile", 2, "Norway", Decimal::ZERO, "GRAIN:30"),
    ];
    let mut wages = HashMap::new();
    wages.insert(CountryId::new(2), dec!(1.5));

    let results =
        ProductionEngine::default().analyze_all_regions(&regions, &neutral_factors(), &wages);

    assert_eq!(results.len(), regions.len() * Commodity::ALL.len());
    let top = &results[0];
    assert_eq!(top.region_name, "Fertile");
    assert_eq!(top.npc_wage_gold, dec!(1.5));
    // Iceland has no wage data; the configured fallback applies.
    let dusty = results.iter().find(|r| r.region_name == "Dusty").unwrap();
    assert_eq!(dusty.npc_wage_gold, dec!(5.0));
}
