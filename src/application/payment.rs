use crate::domain::order::Order;
use crate::domain::session::{Balance, shortfall};
use rust_decimal::Decimal;

/// Which way an order gets settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentRoute {
    /// Balance covers the total; confirmation debits it and settles directly.
    Direct,
    /// Balance falls short; the difference is recharged via crypto.
    CryptoTopUp,
}

/// Point-in-time comparison of the stored order against the session balance.
///
/// The balance is sampled once at evaluation and not re-read before the
/// debit on confirmation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentDecision {
    pub total: Decimal,
    pub balance: Balance,
    pub shortfall: Decimal,
}

impl PaymentDecision {
    pub fn evaluate(order: &Order, balance: Balance) -> Self {
        Self {
            total: order.total,
            balance,
            shortfall: shortfall(order.total, balance),
        }
    }

    pub fn route(&self) -> PaymentRoute {
        if self.shortfall.is_zero() {
            PaymentRoute::Direct
        } else {
            PaymentRoute::CryptoTopUp
        }
    }
}
