//! Range and ordering checks over rendered prices
//!
//! Checks take whatever the page currently shows; a short last page or a
//! single result is fine. Equal neighbours never fail an ordering check.

use crate::error::{Result, SmokeError};
use crate::models::{Money, PriceRange, SortOrder};
use tracing::info;

/// Check a single value against an inclusive `[min, max]`
pub fn verify_value_in_range(value: &Money, min: u64, max: u64) -> Result<()> {
    if min <= value.amount && value.amount <= max {
        Ok(())
    } else {
        Err(SmokeError::assertion(
            "price in range",
            format!("{} <= amount <= {}", min, max),
            value.amount,
        ))
    }
}

/// Every price must lie within `range`; the first violation is reported
pub fn verify_in_range(prices: &[Money], range: &PriceRange) -> Result<()> {
    info!("Checking {} prices against {}", prices.len(), range);

    match prices.iter().position(|p| !range.contains(p)) {
        None => Ok(()),
        Some(idx) => Err(SmokeError::assertion(
            format!("price #{} within filter", idx + 1),
            range,
            prices[idx],
        )),
    }
}

/// Prices must follow `order`, compared by amount
///
/// `Relevance` imposes nothing.
pub fn verify_order(prices: &[Money], order: SortOrder) -> Result<()> {
    let in_order: fn(u64, u64) -> bool = match order {
        SortOrder::Relevance => return Ok(()),
        SortOrder::PriceAscending => |a, b| a <= b,
        SortOrder::PriceDescending => |a, b| a >= b,
    };

    info!(
        "Checking {} prices are sorted {:?}: {:?}",
        prices.len(),
        order,
        prices.iter().map(|p| p.amount).collect::<Vec<_>>()
    );

    for (idx, pair) in prices.windows(2).enumerate() {
        if !in_order(pair[0].amount, pair[1].amount) {
            let relation = if order == SortOrder::PriceAscending { "<=" } else { ">=" };
            return Err(SmokeError::assertion(
                format!("prices #{} and #{} sorted {:?}", idx + 1, idx + 2, order),
                format!("{} {} {}", pair[0].amount, relation, pair[1].amount),
                format!("{} then {}", pair[0], pair[1]),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceSuffix;

    fn prices(amounts: &[u64]) -> Vec<Money> {
        amounts
            .iter()
            .map(|a| Money::new(*a, PriceSuffix::KostenKoper))
            .collect()
    }

    #[test]
    fn test_range_boundaries_pass() {
        let min = 300_000;
        let max = 500_000;
        for amount in [min, max, 400_000] {
            verify_value_in_range(&Money::new(amount, PriceSuffix::KostenKoper), min, max).unwrap();
        }
        assert!(verify_value_in_range(&Money::new(max + 1, PriceSuffix::KostenKoper), min, max).is_err());
        assert!(verify_value_in_range(&Money::new(min - 1, PriceSuffix::KostenKoper), min, max).is_err());
    }

    #[test]
    fn test_range_violation_names_position() {
        let range = PriceRange::between(
            Money::new(300_000, PriceSuffix::KostenKoper),
            Money::new(500_000, PriceSuffix::KostenKoper),
        );
        verify_in_range(&prices(&[300_000, 450_000, 500_000]), &range).unwrap();

        let err = verify_in_range(&prices(&[350_000, 525_000, 600_000]), &range).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("price #2"), "{}", msg);
        assert!(msg.contains("€ 525.000 k.k."), "{}", msg);
    }

    #[test]
    fn test_ascending_allows_ties() {
        verify_order(&prices(&[100, 200, 200, 300]), SortOrder::PriceAscending).unwrap();
        verify_order(&prices(&[300, 300, 200, 100]), SortOrder::PriceDescending).unwrap();
    }

    #[test]
    fn test_short_sequences_pass() {
        verify_order(&[], SortOrder::PriceAscending).unwrap();
        verify_order(&prices(&[42]), SortOrder::PriceDescending).unwrap();
    }

    #[test]
    fn test_shuffled_sequence_names_first_bad_pair() {
        let err = verify_order(&prices(&[100, 300, 200, 50]), SortOrder::PriceAscending).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("#2 and #3"), "{}", msg);
        assert!(msg.contains("300 <= 200"), "{}", msg);

        let err = verify_order(&prices(&[300, 100, 200]), SortOrder::PriceDescending).unwrap_err();
        assert!(err.to_string().contains("#2 and #3"));
    }

    #[test]
    fn test_relevance_imposes_no_order() {
        verify_order(&prices(&[5, 1, 9]), SortOrder::Relevance).unwrap();
    }
}
