use crate::config::SettlementMode;
use crate::domain::order::Order;
use crate::domain::ports::Clock;
use crate::domain::session::{Balance, shortfall};
use rust_decimal::Decimal;
use std::time::Duration;

pub const EMPTY_TXID_ERROR: &str = "Please enter a Transaction ID";
pub const TXID_FORMAT_ERROR: &str = "Invalid Transaction ID format";

/// Minimum accepted transaction-id length after trimming.
const MIN_TXID_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationState {
    #[default]
    Idle,
    Verifying,
    Verified,
}

/// The crypto top-up workflow: shows the receiving address and the shortfall,
/// then reaches `Verified` either through a simulated chain lookup on a
/// user-supplied transaction id or, in the self-attested variant, through a
/// single "payment done" action.
///
/// The balance is never credited here; the top-up is described as landing
/// out of band after chain confirmation.
#[derive(Debug)]
pub struct CryptoSettlement {
    mode: SettlementMode,
    wallet_address: String,
    shortfall: Decimal,
    txid: Option<String>,
    state: VerificationState,
    error: Option<&'static str>,
    copied: bool,
}

impl CryptoSettlement {
    /// Recomputes the shortfall from the stored order and the balance at
    /// entry.
    pub fn new(mode: SettlementMode, wallet_address: String, order: &Order, balance: Balance) -> Self {
        Self {
            mode,
            wallet_address,
            shortfall: shortfall(order.total, balance),
            txid: None,
            state: VerificationState::Idle,
            error: None,
            copied: false,
        }
    }

    pub fn mode(&self) -> SettlementMode {
        self.mode
    }

    pub fn wallet_address(&self) -> &str {
        &self.wallet_address
    }

    pub fn shortfall(&self) -> Decimal {
        self.shortfall
    }

    pub fn state(&self) -> VerificationState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == VerificationState::Verified
    }

    pub fn txid(&self) -> Option<&str> {
        self.txid.as_deref()
    }

    /// Current user-facing validation message, if any.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn copied(&self) -> bool {
        self.copied
    }

    /// Accepts the user-entered transaction id. Any syntactically plausible
    /// id (trimmed length >= 10) starts verification; no chain lookup occurs.
    /// Returns whether verification started.
    pub fn submit_txid(&mut self, txid: &str) -> bool {
        if self.mode != SettlementMode::Txid || self.state != VerificationState::Idle {
            return false;
        }
        self.error = None;
        let trimmed = txid.trim();
        if trimmed.is_empty() {
            self.error = Some(EMPTY_TXID_ERROR);
            return false;
        }
        if trimmed.len() < MIN_TXID_LEN {
            self.error = Some(TXID_FORMAT_ERROR);
            return false;
        }
        self.txid = Some(trimmed.to_string());
        self.state = VerificationState::Verifying;
        true
    }

    /// Finishes the simulated chain lookup. No-op unless currently verifying,
    /// so a stray completion after navigation cannot corrupt state.
    pub fn complete_verification(&mut self) {
        if self.state == VerificationState::Verifying {
            self.state = VerificationState::Verified;
        }
    }

    /// Waits out the configured verification delay, then completes.
    pub async fn verify(&mut self, clock: &dyn Clock, delay: Duration) {
        if self.state != VerificationState::Verifying {
            return;
        }
        tracing::info!(txid = self.txid.as_deref(), "verifying on blockchain");
        clock.sleep(delay).await;
        self.complete_verification();
        tracing::info!("payment verified");
    }

    /// Self-attested variant: one action straight from idle to verified.
    /// Returns false (and does nothing) in the txid variant.
    pub fn mark_paid(&mut self) -> bool {
        if self.mode == SettlementMode::Attest && self.state == VerificationState::Idle {
            self.state = VerificationState::Verified;
            true
        } else {
            false
        }
    }

    /// Copies the receiving address, raising the transient acknowledgment.
    pub fn copy_address(&mut self) -> &str {
        self.copied = true;
        &self.wallet_address
    }

    /// Drops the copy acknowledgment once its display window has elapsed.
    pub fn clear_copied(&mut self) {
        self.copied = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::LineItem;
    use crate::infrastructure::in_memory::InstantClock;
    use rust_decimal_macros::dec;

    const WALLET: &str = "TXqHyR5GmASbEHKJcg5RmFd5oKgP6sVNRq";

    fn order(total: Decimal) -> Order {
        Order {
            country: "Germany".to_string(),
            links: vec![LineItem {
                id: 1,
                url: "https://a.example".to_string(),
                amount: total.to_string(),
            }],
            total,
        }
    }

    fn settlement(mode: SettlementMode) -> CryptoSettlement {
        CryptoSettlement::new(
            mode,
            WALLET.to_string(),
            &order(dec!(600.00)),
            Balance::new(dec!(153)),
        )
    }

    #[test]
    fn test_shortfall_recomputed_at_entry() {
        let s = settlement(SettlementMode::Txid);
        assert_eq!(s.shortfall(), dec!(447.00));
    }

    #[test]
    fn test_covered_total_shows_zero_shortfall() {
        let s = CryptoSettlement::new(
            SettlementMode::Txid,
            WALLET.to_string(),
            &order(dec!(100.00)),
            Balance::new(dec!(153)),
        );
        assert_eq!(s.shortfall(), Decimal::ZERO);
    }

    #[test]
    fn test_empty_txid_rejected() {
        let mut s = settlement(SettlementMode::Txid);
        assert!(!s.submit_txid("   "));
        assert_eq!(s.error(), Some(EMPTY_TXID_ERROR));
        assert_eq!(s.state(), VerificationState::Idle);
    }

    #[test]
    fn test_short_txid_rejected_with_format_error() {
        let mut s = settlement(SettlementMode::Txid);
        assert!(!s.submit_txid("123456789"));
        assert_eq!(s.error(), Some(TXID_FORMAT_ERROR));
        assert_eq!(s.state(), VerificationState::Idle);
    }

    #[test]
    fn test_resubmit_clears_previous_error() {
        let mut s = settlement(SettlementMode::Txid);
        s.submit_txid("short");
        assert!(s.submit_txid("1234567890"));
        assert_eq!(s.error(), None);
        assert_eq!(s.state(), VerificationState::Verifying);
    }

    #[tokio::test]
    async fn test_any_plausible_txid_verifies_after_delay() {
        let clock = InstantClock::new();
        let mut s = settlement(SettlementMode::Txid);
        assert!(s.submit_txid("  abcdef123456  "));
        assert_eq!(s.txid(), Some("abcdef123456"));

        s.verify(&clock, Duration::from_millis(3000)).await;
        assert!(s.is_verified());
        assert_eq!(clock.slept_ms(), 3000);
    }

    #[tokio::test]
    async fn test_verify_without_submission_is_noop() {
        let clock = InstantClock::new();
        let mut s = settlement(SettlementMode::Txid);
        s.verify(&clock, Duration::from_millis(3000)).await;
        assert_eq!(s.state(), VerificationState::Idle);
        assert_eq!(clock.slept_ms(), 0);
    }

    #[test]
    fn test_stray_completion_is_noop() {
        let mut s = settlement(SettlementMode::Txid);
        s.complete_verification();
        assert_eq!(s.state(), VerificationState::Idle);
    }

    #[test]
    fn test_self_attested_goes_straight_to_verified() {
        let mut s = settlement(SettlementMode::Attest);
        assert!(s.mark_paid());
        assert!(s.is_verified());
        // Repeat attestations are ignored.
        assert!(!s.mark_paid());
    }

    #[test]
    fn test_mark_paid_rejected_in_txid_mode() {
        let mut s = settlement(SettlementMode::Txid);
        assert!(!s.mark_paid());
        assert_eq!(s.state(), VerificationState::Idle);
    }

    #[test]
    fn test_txid_entry_rejected_in_attest_mode() {
        let mut s = settlement(SettlementMode::Attest);
        assert!(!s.submit_txid("abcdef123456"));
        assert_eq!(s.state(), VerificationState::Idle);
    }

    #[test]
    fn test_copy_acknowledgment_lifecycle() {
        let mut s = settlement(SettlementMode::Txid);
        assert!(!s.copied());
        assert_eq!(s.copy_address(), WALLET);
        assert!(s.copied());
        s.clear_copied();
        assert!(!s.copied());
    }
}
