//! The production formula pipeline.
//!
//! A strictly ordered sequence of multiplicative and additive adjustments
//! over the base-yield table. The order is part of the game's mechanics:
//! the steps do not commute, so reordering them changes results.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::bonus::{resolve_country_bonus, resolve_regional_bonus, BonusType, ResolvedBonus};
use super::commodity::{BuildingType, Commodity, QualityTier};
use super::entity::Region;
use super::ids::CountryId;

/// Clamp a building level into the valid 0-5 range.
pub fn clamp_level(level: i64) -> i64 {
    level.clamp(0, 5)
}

/// Per-company inputs to a production calculation.
///
/// Levels outside 0-5 are clamped before use, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionFactors {
    /// Company tier 1-5; out-of-range tiers fall back to Q5.
    pub company_tier: i64,
    pub eco_skill: i64,
    pub workers_today: i64,
    pub is_npc_owned: bool,
    pub military_base_level: i64,
    pub production_field_level: i64,
    pub industrial_zone_level: i64,
    pub hospital_level: i64,
    pub is_on_sale: bool,
}

impl Default for ProductionFactors {
    fn default() -> Self {
        Self {
            company_tier: 5,
            eco_skill: 0,
            workers_today: 0,
            is_npc_owned: false,
            military_base_level: 0,
            production_field_level: 0,
            industrial_zone_level: 0,
            hospital_level: 0,
            is_on_sale: false,
        }
    }
}

impl ProductionFactors {
    /// Normalized copy with all levels clamped and counters floored at zero.
    fn normalized(&self) -> Self {
        Self {
            company_tier: self.company_tier,
            eco_skill: self.eco_skill.max(0),
            workers_today: self.workers_today.max(0),
            is_npc_owned: self.is_npc_owned,
            military_base_level: clamp_level(self.military_base_level),
            production_field_level: clamp_level(self.production_field_level),
            industrial_zone_level: clamp_level(self.industrial_zone_level),
            hospital_level: clamp_level(self.hospital_level),
            is_on_sale: self.is_on_sale,
        }
    }
}

/// Yields per quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierYields {
    pub q1: i64,
    pub q2: i64,
    pub q3: i64,
    pub q4: i64,
    pub q5: i64,
}

impl TierYields {
    pub fn get(&self, tier: QualityTier) -> i64 {
        match tier {
            QualityTier::Q1 => self.q1,
            QualityTier::Q2 => self.q2,
            QualityTier::Q3 => self.q3,
            QualityTier::Q4 => self.q4,
            QualityTier::Q5 => self.q5,
        }
    }
}

/// One production calculation result for a (region, commodity, factors)
/// tuple. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionResult {
    pub region_name: String,
    pub country_name: String,
    pub country_id: CountryId,
    pub commodity: Commodity,
    /// Regional bonus as a fraction.
    pub regional_bonus: Decimal,
    /// Country bonus in percent.
    pub country_bonus: Decimal,
    /// Combined bonus as a fraction: regional + country/100.
    pub total_bonus: Decimal,
    pub bonus_type: Option<BonusType>,
    pub pollution: Decimal,
    pub npc_wage_gold: Decimal,
    pub yields: TierYields,
    pub efficiency_score: Decimal,
}

/// Knobs for the production engine.
#[derive(Debug, Clone)]
pub struct ProductionEngine {
    /// Divisor for country-bonus aggregation (five canonical regions).
    pub country_bonus_divisor: Decimal,
    /// Wage assumed when a country has no NPC wage data, in GOLD.
    pub fallback_npc_wage: Decimal,
}

impl Default for ProductionEngine {
    fn default() -> Self {
        Self {
            country_bonus_divisor: dec!(5),
            fallback_npc_wage: dec!(5.0),
        }
    }
}

impl ProductionEngine {
    pub fn new(country_bonus_divisor: Decimal, fallback_npc_wage: Decimal) -> Self {
        Self {
            country_bonus_divisor,
            fallback_npc_wage,
        }
    }

    /// Run the full pipeline for one region and commodity.
    ///
    /// Returns `None` only when the base table has no entry to scale by,
    /// which cannot happen for a known commodity. Missing NPC wage data
    /// falls back to the configured default.
    pub fn calculate(
        &self,
        region: &Region,
        commodity: Commodity,
        factors: &ProductionFactors,
        all_regions: &[Region],
        npc_wages: &HashMap<CountryId, Decimal>,
    ) -> Option<ProductionResult> {
        let regional = resolve_regional_bonus(region, commodity);
        let country_bonus = resolve_country_bonus(
            &region.country_name,
            commodity,
            all_regions,
            self.country_bonus_divisor,
        );
        self.calculate_with_bonuses(region, commodity, factors, regional, country_bonus, npc_wages)
    }

    /// Pipeline core with bonuses already resolved. Used directly by the
    /// batch path, which precomputes country bonuses once per country.
    pub fn calculate_with_bonuses(
        &self,
        region: &Region,
        commodity: Commodity,
        factors: &ProductionFactors,
        regional: ResolvedBonus,
        country_bonus: Decimal,
        npc_wages: &HashMap<CountryId, Decimal>,
    ) -> Option<ProductionResult> {
        let factors = factors.normalized();
        let tier = QualityTier::from_company_tier(factors.company_tier);
        let building = commodity.building_type();
        let base = Decimal::from(commodity.base_yield(tier));

        // 1. NPC owner debuff, products only.
        let mut production = base;
        if factors.is_npc_owned && building == BuildingType::IndustrialZone {
            production /= dec!(3);
        }

        // 2. Building level, +5% per level of the matching type.
        let building_level = match building {
            BuildingType::ProductionField => factors.production_field_level,
            BuildingType::IndustrialZone => factors.industrial_zone_level,
        };
        production *= Decimal::ONE + Decimal::from(building_level) * dec!(0.05);

        // 3. Hospital, +2% per level.
        production *= Decimal::ONE + Decimal::from(factors.hospital_level) * dec!(0.02);

        // 4. Military base, flat +5% for weapon and aircraft at level 3+.
        if factors.military_base_level >= 3
            && matches!(commodity, Commodity::Weapon | Commodity::Aircraft)
        {
            production *= dec!(1.05);
        }

        // 5. Worker fatigue, floored at 10% of current production.
        let fatigue = dec!(1.3) - Decimal::from(factors.workers_today) / dec!(10);
        production *= fatigue.max(dec!(0.1));

        // 6. Eco skill.
        production *= Decimal::ONE + Decimal::from(factors.eco_skill) / dec!(50);

        // 7. Regional + country bonus.
        let total_bonus = regional.fraction + country_bonus / dec!(100);
        production += production * total_bonus;

        // 8. Pollution debuff against the 90% exposed share.
        if region.pollution > Decimal::ZERO {
            let debuff = (production - production * dec!(0.1)) * (region.pollution / dec!(100));
            production -= debuff;
        }

        // 9. On-sale debuff.
        if factors.is_on_sale {
            production /= dec!(2);
        }

        let production = production.trunc().to_i64().unwrap_or(0).max(0);

        let yields = infer_tier_yields(commodity, tier, production)?;
        let efficiency_score = efficiency_score(&yields);

        let npc_wage_gold = npc_wages
            .get(&region.country_id)
            .copied()
            .unwrap_or(self.fallback_npc_wage);

        Some(ProductionResult {
            region_name: region.name.clone(),
            country_name: region.country_name.clone(),
            country_id: region.country_id,
            commodity,
            regional_bonus: regional.fraction,
            country_bonus,
            total_bonus,
            bonus_type: regional.bonus_type,
            pollution: region.pollution,
            npc_wage_gold,
            yields,
            efficiency_score,
        })
    }

    /// Run every commodity against every region, sorted by efficiency score
    /// descending. Country bonuses are resolved once per (country, commodity).
    pub fn analyze_all_regions(
        &self,
        regions: &[Region],
        factors: &ProductionFactors,
        npc_wages: &HashMap<CountryId, Decimal>,
    ) -> Vec<ProductionResult> {
        let mut country_bonuses: HashMap<(String, Commodity), Decimal> = HashMap::new();
        let mut results = Vec::with_capacity(regions.len() * Commodity::ALL.len());

        for region in regions {
            for &commodity in &Commodity::ALL {
                let key = (region.country_name.to_ascii_lowercase(), commodity);
                let country_bonus = *country_bonuses.entry(key).or_insert_with(|| {
                    resolve_country_bonus(
                        &region.country_name,
                        commodity,
                        regions,
                        self.country_bonus_divisor,
                    )
                });
                let regional = resolve_regional_bonus(region, commodity);
                if let Some(result) = self.calculate_with_bonuses(
                    region,
                    commodity,
                    factors,
                    regional,
                    country_bonus,
                    npc_wages,
                ) {
                    results.push(result);
                }
            }
        }

        results.sort_by(|a, b| b.efficiency_score.cmp(&a.efficiency_score));
        results
    }
}

/// Scale the pipeline output at the requested tier into all five tiers by
/// the base-table ratio. The pipeline runs once; other tiers are inferred
/// proportionally, not recomputed.
fn infer_tier_yields(
    commodity: Commodity,
    tier: QualityTier,
    production: i64,
) -> Option<TierYields> {
    let reference = Decimal::from(commodity.base_yield(tier));
    if reference <= Decimal::ZERO {
        return None;
    }
    let production = Decimal::from(production);

    let scale = |t: QualityTier| {
        (production * Decimal::from(commodity.base_yield(t)) / reference)
            .trunc()
            .to_i64()
            .unwrap_or(0)
    };

    Some(TierYields {
        q1: scale(QualityTier::Q1),
        q2: scale(QualityTier::Q2),
        q3: scale(QualityTier::Q3),
        q4: scale(QualityTier::Q4),
        q5: scale(QualityTier::Q5),
    })
}

/// Weighted average over tiers: (5*Q5 + 4*Q4 + 3*Q3 + 2*Q2 + Q1) / 15.
fn efficiency_score(yields: &TierYields) -> Decimal {
    let weighted = Decimal::from(yields.q5) * dec!(5)
        + Decimal::from(yields.q4) * dec!(4)
        + Decimal::from(yields.q3) * dec!(3)
        + Decimal::from(yields.q2) * dec!(2)
        + Decimal::from(yields.q1);
    weighted / dec!(15)
}
