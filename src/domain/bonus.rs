//! Region bonus parsing and country-level aggregation.
//!
//! Regions carry a compact descriptor like `"WEAPONS:20 TICKETS:15"`. This
//! module parses it into typed values, resolves which bonus applies to a
//! commodity, and aggregates regional bonuses into a country bonus.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::commodity::Commodity;
use super::entity::Region;

/// Bonus type codes the game emits in region descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BonusType {
    Grain,
    Iron,
    Titanium,
    Oil,
    Food,
    Weapons,
    Aircraft,
    Tickets,
    General,
}

impl BonusType {
    /// Parse an uppercase descriptor code. Codes are matched
    /// case-insensitively since older API payloads used lowercase.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "GRAIN" => Some(Self::Grain),
            "IRON" => Some(Self::Iron),
            "TITANIUM" => Some(Self::Titanium),
            "OIL" | "FUEL" => Some(Self::Oil),
            "FOOD" => Some(Self::Food),
            "WEAPONS" | "WEAPON" => Some(Self::Weapons),
            "AIRCRAFT" => Some(Self::Aircraft),
            "TICKETS" | "TICKET" => Some(Self::Tickets),
            "GENERAL" => Some(Self::General),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Grain => "GRAIN",
            Self::Iron => "IRON",
            Self::Titanium => "TITANIUM",
            Self::Oil => "OIL",
            Self::Food => "FOOD",
            Self::Weapons => "WEAPONS",
            Self::Aircraft => "AIRCRAFT",
            Self::Tickets => "TICKETS",
            Self::General => "GENERAL",
        }
    }
}

impl fmt::Display for BonusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result of parsing one bonus descriptor.
///
/// Tokens that fail to parse are never fatal, but they are not silently
/// dropped either: each one lands in `skipped` so callers and tests can see
/// what the parser rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBonuses {
    /// Bonus percentage per type, e.g. `Weapons -> 20`.
    pub by_type: HashMap<BonusType, Decimal>,
    /// Tokens that were malformed, unknown or carried a negative value.
    pub skipped: Vec<String>,
}

impl ParsedBonuses {
    /// Bonus percentage for a type, zero if absent.
    pub fn percent(&self, bonus_type: BonusType) -> Decimal {
        self.by_type.get(&bonus_type).copied().unwrap_or_default()
    }
}

/// Parse a space-separated list of `TYPE:VALUE` tokens.
///
/// Parsing is pure and idempotent; the same descriptor always yields the
/// same map. Duplicate types keep the last value, matching the upstream
/// format which never emits duplicates in practice.
pub fn parse_bonus_descriptor(descriptor: &str) -> ParsedBonuses {
    let mut parsed = ParsedBonuses::default();

    for token in descriptor.split_whitespace() {
        let Some((code, value)) = token.split_once(':') else {
            parsed.skipped.push(token.to_string());
            continue;
        };
        let Some(bonus_type) = BonusType::from_code(code) else {
            parsed.skipped.push(token.to_string());
            continue;
        };
        match value.parse::<Decimal>() {
            Ok(percent) if percent >= Decimal::ZERO => {
                parsed.by_type.insert(bonus_type, percent);
            }
            _ => parsed.skipped.push(token.to_string()),
        }
    }

    parsed
}

/// The regional bonus applied to one commodity in one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBonus {
    /// Bonus as a fraction, e.g. `0.20` for a 20% descriptor value.
    pub fraction: Decimal,
    /// The type that matched, `None` when the region has nothing relevant.
    pub bonus_type: Option<BonusType>,
}

impl ResolvedBonus {
    fn none() -> Self {
        Self {
            fraction: Decimal::ZERO,
            bonus_type: None,
        }
    }
}

/// Resolve the regional bonus for a commodity.
///
/// Walks the commodity's ordered acceptance list and returns the first type
/// present in the region. This is a first-match rule, not a sum.
pub fn resolve_regional_bonus(region: &Region, commodity: Commodity) -> ResolvedBonus {
    let parsed = parse_bonus_descriptor(&region.bonus_descriptor);
    if parsed.by_type.is_empty() {
        return ResolvedBonus::none();
    }

    for &bonus_type in commodity.accepted_bonus_types() {
        if let Some(&percent) = parsed.by_type.get(&bonus_type) {
            return ResolvedBonus {
                fraction: percent / dec!(100),
                bonus_type: Some(bonus_type),
            };
        }
    }

    ResolvedBonus::none()
}

/// Country bonus in percent: the sum of resolved regional bonus values
/// across the country's distinct regions, divided by the canonical-region
/// divisor.
///
/// Regions are deduplicated by name because a refresh can briefly hold two
/// snapshots of the same region; the first occurrence wins. The divisor is
/// a game rule (five canonical regions per country), never the observed
/// region count.
pub fn resolve_country_bonus(
    country_name: &str,
    commodity: Commodity,
    all_regions: &[Region],
    divisor: Decimal,
) -> Decimal {
    if divisor <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut total_percent = Decimal::ZERO;

    for region in all_regions {
        if !region.country_name.eq_ignore_ascii_case(country_name) {
            continue;
        }
        if !seen.insert(region.name.to_ascii_lowercase()) {
            continue;
        }
        let resolved = resolve_regional_bonus(region, commodity);
        total_percent += resolved.fraction * dec!(100);
    }

    total_percent / divisor
}

/// Raw region attractiveness for a commodity: bonus percent discounted by
/// half the pollution, floored at zero.
pub fn region_efficiency_score(total_bonus_fraction: Decimal, pollution: Decimal) -> Decimal {
    let score = total_bonus_fraction * dec!(100) - pollution * dec!(0.5);
    score.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{CountryId, RegionId};

    fn region(name: &str, country: &str, descriptor: &str) -> Region {
        Region {
            id: RegionId::new(1),
            name: name.to_string(),
            country_id: CountryId::new(1),
            country_name: country.to_string(),
            pollution: Decimal::ZERO,
            bonus_descriptor: descriptor.to_string(),
        }
    }

    #[test]
    fn parses_multiple_tokens() {
        let parsed = parse_bonus_descriptor("WEAPONS:20 TICKETS:15");
        assert_eq!(parsed.percent(BonusType::Weapons), dec!(20));
        assert_eq!(parsed.percent(BonusType::Tickets), dec!(15));
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn malformed_tokens_are_skipped_with_signal() {
        let parsed = parse_bonus_descriptor("WEAPONS:20 JUNK GRAIN:abc FISH:5 IRON:-3");
        assert_eq!(parsed.percent(BonusType::Weapons), dec!(20));
        assert_eq!(
            parsed.skipped,
            vec!["JUNK", "GRAIN:abc", "FISH:5", "IRON:-3"]
        );
    }

    #[test]
    fn parsing_is_idempotent() {
        let descriptor = "AIRCRAFT:10 OIL:5";
        assert_eq!(
            parse_bonus_descriptor(descriptor),
            parse_bonus_descriptor(descriptor)
        );
    }

    #[test]
    fn empty_descriptor_parses_to_nothing() {
        let parsed = parse_bonus_descriptor("");
        assert!(parsed.by_type.is_empty());
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn regional_bonus_takes_first_matching_type() {
        // Aircraft accepts AIRCRAFT, then TITANIUM, then IRON. With both
        // TITANIUM and IRON present, TITANIUM wins.
        let r = region("Hengill", "Iceland", "TITANIUM:10 IRON:25");
        let resolved = resolve_regional_bonus(&r, Commodity::Aircraft);
        assert_eq!(resolved.fraction, dec!(0.10));
        assert_eq!(resolved.bonus_type, Some(BonusType::Titanium));
    }

    #[test]
    fn regional_bonus_is_zero_when_nothing_matches() {
        let r = region("Hengill", "Iceland", "GRAIN:30");
        let resolved = resolve_regional_bonus(&r, Commodity::Weapon);
        assert_eq!(resolved.fraction, Decimal::ZERO);
        assert_eq!(resolved.bonus_type, None);
    }

    #[test]
    fn country_bonus_sums_distinct_regions_over_divisor() {
        let regions = vec![
            region("Alpha", "Iceland", "WEAPONS:10"),
            region("Beta", "Iceland", "WEAPONS:15"),
            region("Gamma", "Iceland", "WEAPONS:5"),
        ];
        let bonus = resolve_country_bonus("Iceland", Commodity::Weapon, &regions, dec!(5));
        assert_eq!(bonus, dec!(6.0));
    }

    #[test]
    fn country_bonus_deduplicates_by_region_name() {
        let regions = vec![
            region("Alpha", "Iceland", "WEAPONS:10"),
            region("alpha", "Iceland", "WEAPONS:40"),
            region("Beta", "Iceland", "WEAPONS:15"),
        ];
        let bonus = resolve_country_bonus("Iceland", Commodity::Weapon, &regions, dec!(5));
        // Duplicate "alpha" is ignored; (10 + 15) / 5.
        assert_eq!(bonus, dec!(5.0));
    }

    #[test]
    fn country_bonus_ignores_other_countries() {
        let regions = vec![
            region("Alpha", "Iceland", "WEAPONS:10"),
            region("Delta", "Norway", "WEAPONS:50"),
        ];
        let bonus = resolve_country_bonus("Iceland", Commodity::Weapon, &regions, dec!(5));
        assert_eq!(bonus, dec!(2.0));
    }

    #[test]
    fn efficiency_score_floors_at_zero() {
        assert_eq!(region_efficiency_score(dec!(0.20), dec!(10)), dec!(15.0));
        assert_eq!(region_efficiency_score(dec!(0.01), dec!(90)), Decimal::ZERO);
    }
}
