use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One url/amount row within an order.
///
/// `amount` keeps the raw user text so partially edited input survives a
/// round trip through the composer; it is parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: u64,
    pub url: String,
    pub amount: String,
}

impl LineItem {
    pub fn empty(id: u64) -> Self {
        Self {
            id,
            url: String::new(),
            amount: String::new(),
        }
    }

    /// Parsed amount, if the raw text is a decimal number.
    pub fn amount_value(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim()).ok()
    }
}

/// A submitted order: the exact payload persisted to the transaction slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub country: String,
    pub links: Vec<LineItem>,
    pub total: Decimal,
}

/// Sum of the parseable item amounts; unparseable rows contribute zero.
pub fn compute_total(links: &[LineItem]) -> Decimal {
    links.iter().filter_map(|l| l.amount_value()).sum()
}

/// Collects every validation error, in display order: country first, then
/// per row the url check followed by at most one amount check.
pub fn validate(country: &str, links: &[LineItem], ceiling: Decimal) -> Vec<String> {
    let mut errors = Vec::new();
    if country.is_empty() {
        errors.push("Select a country".to_string());
    }
    for (i, link) in links.iter().enumerate() {
        let n = i + 1;
        if link.url.trim().is_empty() {
            errors.push(format!("Link {n} is empty"));
        }
        match link.amount_value() {
            Some(amount) if amount <= Decimal::ZERO => {
                errors.push(format!("Link {n} has no valid amount"));
            }
            Some(amount) if amount > ceiling => {
                errors.push(format!("Link {n} exceeds ${ceiling}"));
            }
            Some(_) => {}
            None => errors.push(format!("Link {n} has no valid amount")),
        }
    }
    errors
}
