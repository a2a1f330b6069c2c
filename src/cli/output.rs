//! Report rendering: tables for production, markets and arbitrage.

use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tabled::{Table, Tabled};

use crate::app::AnalysisReport;
use crate::domain::{
    ArbitrageOpportunity, ArbitragePair, CurrencyMarket, ItemMarketAnalysis, ProductionResult,
};

#[derive(Tabled)]
struct ProductionRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Commodity")]
    commodity: String,
    #[tabled(rename = "Bonus %")]
    bonus: String,
    #[tabled(rename = "Pollution")]
    pollution: String,
    #[tabled(rename = "Q5 Yield")]
    q5: i64,
    #[tabled(rename = "Efficiency")]
    efficiency: String,
}

#[derive(Tabled)]
struct MarketRow {
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Best Buy")]
    best_buy: String,
    #[tabled(rename = "Best Sell")]
    best_sell: String,
    #[tabled(rename = "Spread")]
    spread: String,
    #[tabled(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Liquidity")]
    liquidity: String,
}

#[derive(Tabled)]
struct ArbitrageRow {
    #[tabled(rename = "Pair")]
    pair: String,
    #[tabled(rename = "Buy")]
    buy: String,
    #[tabled(rename = "Sell")]
    sell: String,
    #[tabled(rename = "Profit %")]
    profit: String,
    #[tabled(rename = "Net GOLD")]
    net: String,
    #[tabled(rename = "Risk")]
    risk: String,
}

#[derive(Tabled)]
struct ItemMarketRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Offers")]
    offers: usize,
    #[tabled(rename = "Cheapest")]
    cheapest: String,
    #[tabled(rename = "Median")]
    median: String,
    #[tabled(rename = "Best Country")]
    best_country: String,
    #[tabled(rename = "Depth")]
    depth: i64,
}

/// Print the whole report to stdout.
pub fn render_report(report: &AnalysisReport, min_spread: Decimal, top: usize) {
    section("Production");
    print_table(production_rows(report.top_regions(top)));

    section("Currency markets");
    let notable: Vec<CurrencyMarket> = report
        .notable_markets(min_spread)
        .into_iter()
        .cloned()
        .collect();
    print_table(market_rows(&notable));

    if let Some(extremes) = &report.currency_extremes {
        println!(
            "  strongest currency {} at {}, weakest {} at {}",
            extremes.highest.0.to_string().bold(),
            extremes.highest.1,
            extremes.lowest.0.to_string().bold(),
            extremes.lowest.1,
        );
        println!();
    }

    section("Item markets");
    print_table(item_market_rows(&report.item_markets));

    section("Arbitrage");
    let mut rows = arbitrage_rows(&report.currency_arbitrage, top);
    rows.extend(arbitrage_rows(&report.item_arbitrage, top));
    if rows.is_empty() {
        println!("  {}", "no opportunities above threshold".dimmed());
        println!();
    } else {
        print_table(rows);
    }
}

fn section(title: &str) {
    println!("{}", title.bold().underline());
}

fn print_table<R: Tabled>(rows: Vec<R>) {
    if rows.is_empty() {
        println!("  {}", "(empty)".dimmed());
        println!();
        return;
    }
    let table = Table::new(rows).to_string();
    for line in table.lines() {
        println!("  {line}");
    }
    println!();
}

fn production_rows(results: &[ProductionResult]) -> Vec<ProductionRow> {
    results
        .iter()
        .map(|r| ProductionRow {
            region: r.region_name.clone(),
            country: r.country_name.clone(),
            commodity: r.commodity.name().to_string(),
            bonus: format!("{:.1}", r.total_bonus * dec!(100)),
            pollution: format!("{:.1}", r.pollution),
            q5: r.yields.q5,
            efficiency: format!("{:.2}", r.efficiency_score),
        })
        .collect()
}

fn market_rows(markets: &[CurrencyMarket]) -> Vec<MarketRow> {
    markets
        .iter()
        .map(|m| MarketRow {
            currency: m.currency_name.clone(),
            best_buy: m.best_buy_rate.to_string(),
            best_sell: m.best_sell_rate.to_string(),
            spread: m.spread.to_string(),
            volume: m.volume.to_string(),
            liquidity: format!("{:.2}", m.liquidity_score),
        })
        .collect()
}

fn item_market_rows(markets: &[ItemMarketAnalysis]) -> Vec<ItemMarketRow> {
    markets
        .iter()
        .map(|m| ItemMarketRow {
            item: m.item_name.clone(),
            offers: m.total_offers,
            cheapest: format!("{} ({})", m.cheapest.price_gold, m.cheapest.country_name),
            median: m.median_price.to_string(),
            best_country: m
                .best_countries
                .first()
                .map(|(name, avg)| format!("{name} ({avg})"))
                .unwrap_or_default(),
            depth: m.market_depth,
        })
        .collect()
}

fn arbitrage_rows(opportunities: &[ArbitrageOpportunity], top: usize) -> Vec<ArbitrageRow> {
    opportunities
        .iter()
        .take(top)
        .map(|o| ArbitrageRow {
            pair: describe_pair(&o.pair),
            buy: o.buy_rate.to_string(),
            sell: o.sell_rate.to_string(),
            profit: format!("{:.2}", o.profit_percent),
            net: format!("{:.2}", o.net_profit_gold),
            risk: colorize_risk(o.risk_score),
        })
        .collect()
}

fn describe_pair(pair: &ArbitragePair) -> String {
    match pair {
        ArbitragePair::Currency {
            from_name, to_name, ..
        } => format!("{from_name} -> {to_name}"),
        ArbitragePair::Item {
            item_name,
            buy_country,
            sell_country,
            ..
        } => format!("{item_name}: {buy_country} -> {sell_country}"),
    }
}

fn colorize_risk(risk: Decimal) -> String {
    let text = format!("{risk:.2}");
    if risk < dec!(0.33) {
        text.green().to_string()
    } else if risk < dec!(0.66) {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}
