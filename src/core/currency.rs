//! Supported currencies and rate provider abstractions

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyDescriptor {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

/// Fixed reference list, also the display order of secondary results.
pub static POPULAR_CURRENCIES: [CurrencyDescriptor; 8] = [
    CurrencyDescriptor {
        code: "USD",
        name: "US Dollar",
        symbol: "$",
    },
    CurrencyDescriptor {
        code: "EUR",
        name: "Euro",
        symbol: "€",
    },
    CurrencyDescriptor {
        code: "CNY",
        name: "Chinese Yuan",
        symbol: "¥",
    },
    CurrencyDescriptor {
        code: "CAD",
        name: "Canadian Dollar",
        symbol: "C$",
    },
    CurrencyDescriptor {
        code: "GBP",
        name: "British Pound",
        symbol: "£",
    },
    CurrencyDescriptor {
        code: "JPY",
        name: "Japanese Yen",
        symbol: "¥",
    },
    CurrencyDescriptor {
        code: "AUD",
        name: "Australian Dollar",
        symbol: "A$",
    },
    CurrencyDescriptor {
        code: "CHF",
        name: "Swiss Franc",
        symbol: "CHF",
    },
];

pub fn find_currency(code: &str) -> Option<&'static CurrencyDescriptor> {
    POPULAR_CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

pub fn is_supported(code: &str) -> bool {
    find_currency(code).is_some()
}

/// Popular currencies other than `source`, in list order.
pub fn popular_targets(source: &str) -> impl Iterator<Item = &'static CurrencyDescriptor> {
    let source = source.to_uppercase();
    POPULAR_CURRENCIES.iter().filter(move |c| c.code != source)
}

/// Rates quoted against a single base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub base: String,
    pub date: Option<NaiveDate>,
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn rate_for(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn latest_rates(&self, base: &str) -> Result<RateTable>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_currency_is_case_insensitive() {
        let eur = find_currency("eur").expect("EUR should be supported");
        assert_eq!(eur.name, "Euro");
        assert!(find_currency(" GBP ").is_some());
        assert!(find_currency("INR").is_none());
        assert!(!is_supported("XYZ"));
    }

    #[test]
    fn test_popular_targets_excludes_source_and_keeps_order() {
        let codes: Vec<_> = popular_targets("CNY").map(|c| c.code).collect();
        assert_eq!(codes, vec!["USD", "EUR", "CAD", "GBP", "JPY", "AUD", "CHF"]);

        // An unsupported source excludes nothing
        assert_eq!(popular_targets("INR").count(), POPULAR_CURRENCIES.len());
    }
}
