use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    errors::ServiceError,
    models::{BillingLedger, StockItem, StockTable},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriceSuggestion {
    /// Purchase price from stock.
    pub min_price: Decimal,
    /// Most frequent historical sell price, or `min_price` with no sales.
    pub mode_price: Decimal,
}

/// A stock row matched by a customer-demand search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DemandMatch {
    pub tyre_name: String,
    pub size: String,
    pub brand: String,
    pub stock: u32,
    pub buy_price: Decimal,
    pub lowest_sell_price: Decimal,
    pub most_frequent_price: Decimal,
}

pub fn suggest_price(
    tyre_name: &str,
    stock: &StockTable,
    billing: &BillingLedger,
) -> Result<PriceSuggestion, ServiceError> {
    let item = stock
        .get(tyre_name)
        .ok_or_else(|| ServiceError::not_found_tyre(tyre_name))?;
    Ok(suggestion_for(item, billing))
}

fn suggestion_for(item: &StockItem, billing: &BillingLedger) -> PriceSuggestion {
    let min_price = item.purchase_price;
    let mode_price = most_frequent(billing.sell_prices_for(&item.tyre_name)).unwrap_or(min_price);
    PriceSuggestion {
        min_price,
        mode_price,
    }
}

/// Statistical mode. Ties go to the value seen first.
pub fn most_frequent<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    let mut counts: HashMap<Decimal, usize> = HashMap::new();
    let mut first_seen = Vec::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            first_seen.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(Decimal, usize)> = None;
    for value in first_seen {
        let count = counts[&value];
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Case-insensitive substring match on tyre name or size, in stock order.
pub fn search_demand(query: &str, stock: &StockTable, billing: &BillingLedger) -> Vec<DemandMatch> {
    let needle = query.trim().to_lowercase();
    stock
        .iter()
        .filter(|item| {
            item.tyre_name.to_lowercase().contains(&needle)
                || item.size.to_lowercase().contains(&needle)
        })
        .map(|item| {
            let suggestion = suggestion_for(item, billing);
            DemandMatch {
                tyre_name: item.tyre_name.clone(),
                size: item.size.clone(),
                brand: item.brand.clone(),
                stock: item.quantity,
                buy_price: item.purchase_price,
                lowest_sell_price: suggestion.min_price,
                most_frequent_price: suggestion.mode_price,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use crate::models::{BillingRecord, StockItem};

    fn stock() -> StockTable {
        StockTable::from_rows(vec![
            StockItem::new("A", "145/80 R12", "MRF", dec!(100), 4),
            StockItem::new("Apollo Amazer 4G", "155/70 R13", "Apollo", dec!(2600), 2),
            StockItem::new("CEAT Milaze X3", "145/80 R12", "CEAT", dec!(2300), 0),
        ])
        .unwrap()
    }

    fn sale(bill_number: u64, tyre_name: &str, sell_price: Decimal) -> BillingRecord {
        BillingRecord {
            bill_number,
            date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            tyre_name: tyre_name.to_string(),
            size: "145/80 R12".to_string(),
            brand: "MRF".to_string(),
            quantity: 1,
            sell_price,
            total_price: sell_price,
        }
    }

    fn ledger(prices: &[(&str, Decimal)]) -> BillingLedger {
        BillingLedger::from_rows(
            prices
                .iter()
                .enumerate()
                .map(|(i, (name, price))| sale(i as u64 + 1, name, *price))
                .collect(),
        )
    }

    #[test]
    fn mode_of_sell_history_with_purchase_floor() {
        let billing = ledger(&[("A", dec!(120)), ("A", dec!(120)), ("A", dec!(150))]);
        let suggestion = suggest_price("A", &stock(), &billing).unwrap();
        assert_eq!(
            suggestion,
            PriceSuggestion {
                min_price: dec!(100),
                mode_price: dec!(120),
            }
        );
    }

    #[test]
    fn no_history_falls_back_to_purchase_price() {
        let billing = ledger(&[("Apollo Amazer 4G", dec!(2900))]);
        let suggestion = suggest_price("A", &stock(), &billing).unwrap();
        assert_eq!(suggestion.min_price, dec!(100));
        assert_eq!(suggestion.mode_price, dec!(100));
    }

    #[test]
    fn unknown_tyre_is_not_found() {
        let result = suggest_price("missing", &stock(), &BillingLedger::new());
        assert_matches!(result, Err(ServiceError::NotFound(_)));
    }

    #[rstest]
    #[case(&[150, 120, 150, 120], 150)]
    #[case(&[120, 150, 150, 120], 120)]
    #[case(&[90], 90)]
    #[case(&[100, 110, 120], 100)]
    #[case(&[100, 110, 110, 120, 120, 120], 120)]
    fn ties_go_to_first_seen(#[case] prices: &[i64], #[case] expected: i64) {
        let mode = most_frequent(prices.iter().map(|&p| Decimal::from(p)));
        assert_eq!(mode, Some(Decimal::from(expected)));
    }

    #[test]
    fn scale_does_not_split_equal_prices() {
        let mode = most_frequent(vec![dec!(99.5), dec!(120.00), dec!(120)]);
        assert_eq!(mode, Some(dec!(120)));
    }

    #[test]
    fn empty_history_has_no_mode() {
        assert_eq!(most_frequent(Vec::new()), None);
    }

    #[rstest]
    #[case("apollo", &["Apollo Amazer 4G"])]
    #[case("145/80", &["A", "CEAT Milaze X3"])]
    #[case("  R13 ", &["Apollo Amazer 4G"])]
    #[case("bridgestone", &[])]
    fn demand_search_matches_name_or_size(#[case] query: &str, #[case] expected: &[&str]) {
        let hits = search_demand(query, &stock(), &BillingLedger::new());
        let names: Vec<_> = hits.iter().map(|hit| hit.tyre_name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn demand_search_reports_stock_and_prices() {
        let billing = ledger(&[("A", dec!(130)), ("A", dec!(125)), ("A", dec!(125))]);
        let hits = search_demand("a", &stock(), &billing);
        let hit = hits.iter().find(|hit| hit.tyre_name == "A").unwrap();
        assert_eq!(hit.stock, 4);
        assert_eq!(hit.buy_price, dec!(100));
        assert_eq!(hit.lowest_sell_price, dec!(100));
        assert_eq!(hit.most_frequent_price, dec!(125));
    }
}
