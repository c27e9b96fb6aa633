use crate::config::Credentials;
use crate::error::{Result, TopUpError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-negative token balance.
///
/// Wrapper around `rust_decimal::Decimal`; all mutations go through the pure
/// [`credit`](Balance::credit) / [`debit`](Balance::debit) transitions so the
/// arithmetic can be tested in isolation.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the balance after adding `amount`.
    pub fn credit(self, amount: Decimal) -> Self {
        Self(self.0 + amount)
    }

    /// Returns the balance after subtracting `amount`, clamped at zero.
    pub fn debit(self, amount: Decimal) -> Self {
        let next = self.0 - amount;
        if next < Decimal::ZERO {
            Self::ZERO
        } else {
            Self(next)
        }
    }
}

/// Amount by which `balance` falls short of `total`. Never negative.
pub fn shortfall(total: Decimal, balance: Balance) -> Decimal {
    (total - balance.0).max(Decimal::ZERO)
}

/// The single in-process user session: authentication state plus the
/// pre-loaded token balance. Not persisted anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub authenticated: bool,
    pub user_email: Option<String>,
    pub balance: Balance,
}

impl Session {
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            authenticated: false,
            user_email: None,
            balance: Balance::new(initial_balance),
        }
    }

    /// Exact string comparison against the configured credential pair.
    pub fn login(&mut self, credentials: &Credentials, email: &str, password: &str) -> Result<()> {
        if email == credentials.email && password == credentials.password {
            self.authenticated = true;
            self.user_email = Some(email.to_string());
            Ok(())
        } else {
            Err(TopUpError::InvalidCredentials)
        }
    }

    /// Clears authentication. The balance survives logout.
    pub fn logout(&mut self) {
        self.authenticated = false;
        self.user_email = None;
    }

    pub fn debit(&mut self, amount: Decimal) {
        self.balance = self.balance.debit(amount);
    }

    pub fn credit(&mut self, amount: Decimal) {
        self.balance = self.balance.credit(amount);
    }
}
