//! The order lifecycle flow: five screens, entry guards, and the event loop
//! tying the composer, processing simulator, payment decision, and crypto
//! settlement together around the transaction slot.

use crate::application::composer::{LinkField, OrderComposer};
use crate::application::payment::{PaymentDecision, PaymentRoute};
use crate::application::processing::ProcessingSimulator;
use crate::application::settlement::CryptoSettlement;
use crate::config::AppConfig;
use crate::domain::order::Order;
use crate::domain::ports::{Clock, TransactionSlotBox};
use crate::domain::session::Session;
use crate::error::{Result, TopUpError};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// The route surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    TopUp,
    Processing,
    Payment,
    CryptoPayment,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Login => "login",
            Screen::TopUp => "topup",
            Screen::Processing => "processing",
            Screen::Payment => "payment",
            Screen::CryptoPayment => "crypto-payment",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Screen {
    type Err = TopUpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "login" => Ok(Screen::Login),
            "topup" => Ok(Screen::TopUp),
            "processing" => Ok(Screen::Processing),
            "payment" => Ok(Screen::Payment),
            "crypto-payment" | "crypto" => Ok(Screen::CryptoPayment),
            other => Err(TopUpError::InvalidEvent(format!("unknown screen: {other}"))),
        }
    }
}

/// A user- or script-triggered action against the flow.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    Login { email: String, password: String },
    Logout,
    SelectCountry(String),
    AddLink,
    RemoveLink { row: usize },
    SetUrl { row: usize, value: String },
    SetAmount { row: usize, value: String },
    Submit,
    Confirm,
    Recharge,
    Back,
    CopyAddress,
    SubmitTxid(String),
    MarkPaid,
    Done,
    Goto(Screen),
}

/// Active screen plus its per-screen state.
enum ScreenState {
    Login,
    TopUp(OrderComposer),
    Processing(ProcessingSimulator),
    Payment(PaymentDecision),
    CryptoPayment(CryptoSettlement),
}

/// Drives the whole flow: owns the session and the transaction slot, applies
/// events to the active screen, and enforces the entry guards.
pub struct FlowController {
    config: AppConfig,
    session: Session,
    slot: TransactionSlotBox,
    screen: ScreenState,
}

impl FlowController {
    pub fn new(config: AppConfig, slot: TransactionSlotBox) -> Self {
        let session = Session::new(config.initial_balance);
        Self {
            config,
            session,
            slot,
            screen: ScreenState::Login,
        }
    }

    pub fn screen(&self) -> Screen {
        match self.screen {
            ScreenState::Login => Screen::Login,
            ScreenState::TopUp(_) => Screen::TopUp,
            ScreenState::Processing(_) => Screen::Processing,
            ScreenState::Payment(_) => Screen::Payment,
            ScreenState::CryptoPayment(_) => Screen::CryptoPayment,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn composer(&self) -> Option<&OrderComposer> {
        match &self.screen {
            ScreenState::TopUp(composer) => Some(composer),
            _ => None,
        }
    }

    pub fn decision(&self) -> Option<&PaymentDecision> {
        match &self.screen {
            ScreenState::Payment(decision) => Some(decision),
            _ => None,
        }
    }

    pub fn settlement(&self) -> Option<&CryptoSettlement> {
        match &self.screen {
            ScreenState::CryptoPayment(settlement) => Some(settlement),
            _ => None,
        }
    }

    /// The order currently persisted in the transaction slot, if any.
    pub async fn stored_order(&self) -> Result<Option<Order>> {
        self.slot.read().await
    }

    /// Applies one event. Validation failures are returned as errors;
    /// events that do not apply to the active screen are ignored, which is
    /// what keeps a stray timer or stale action from corrupting the flow.
    pub async fn apply(&mut self, event: FlowEvent, clock: &dyn Clock) -> Result<()> {
        if !self.session.authenticated && !matches!(event, FlowEvent::Login { .. }) {
            tracing::debug!(?event, "unauthenticated, staying on login");
            self.screen = ScreenState::Login;
            return Ok(());
        }

        match event {
            FlowEvent::Login { email, password } => self.handle_login(&email, &password),
            FlowEvent::Logout => {
                tracing::info!("logged out");
                self.session.logout();
                self.screen = ScreenState::Login;
                Ok(())
            }
            FlowEvent::Goto(target) => self.navigate(target, clock).await,
            FlowEvent::SelectCountry(country) => self.with_composer(|c| {
                c.select_country(&country);
                Ok(())
            }),
            FlowEvent::AddLink => self.with_composer(|c| {
                c.add_link();
                Ok(())
            }),
            FlowEvent::RemoveLink { row } => self.with_composer(|c| {
                let id = link_id(c, row)?;
                c.remove_link(id);
                Ok(())
            }),
            FlowEvent::SetUrl { row, value } => self.with_composer(|c| {
                let id = link_id(c, row)?;
                c.update_link(id, LinkField::Url, &value);
                Ok(())
            }),
            FlowEvent::SetAmount { row, value } => self.with_composer(|c| {
                let id = link_id(c, row)?;
                c.update_link(id, LinkField::Amount, &value);
                Ok(())
            }),
            FlowEvent::Submit => self.handle_submit(clock).await,
            FlowEvent::Confirm => self.handle_confirm().await,
            FlowEvent::Recharge => self.handle_recharge().await,
            FlowEvent::Back => self.handle_back().await,
            FlowEvent::CopyAddress => self.handle_copy(clock).await,
            FlowEvent::SubmitTxid(txid) => self.handle_txid(&txid, clock).await,
            FlowEvent::MarkPaid => self.handle_mark_paid(),
            FlowEvent::Done => self.handle_done().await,
        }
    }

    /// Direct navigation, with the entry guards of each screen: everything
    /// past login needs an authenticated session, and everything past the
    /// composer needs a stored order, else the flow silently falls back to
    /// the composer.
    pub async fn navigate(&mut self, target: Screen, clock: &dyn Clock) -> Result<()> {
        match target {
            Screen::Login => {
                self.screen = ScreenState::Login;
                Ok(())
            }
            Screen::TopUp => {
                self.enter_topup();
                Ok(())
            }
            Screen::Processing => self.enter_processing(clock).await,
            Screen::Payment => self.enter_payment().await,
            Screen::CryptoPayment => self.enter_crypto().await,
        }
    }

    fn handle_login(&mut self, email: &str, password: &str) -> Result<()> {
        if self.session.authenticated {
            tracing::debug!("already authenticated, ignoring login");
            return Ok(());
        }
        self.session
            .login(&self.config.credentials, email, password)?;
        tracing::info!(email, "logged in");
        self.enter_topup();
        Ok(())
    }

    fn with_composer(&mut self, edit: impl FnOnce(&mut OrderComposer) -> Result<()>) -> Result<()> {
        match &mut self.screen {
            ScreenState::TopUp(composer) => edit(composer),
            _ => {
                tracing::debug!("composer edit outside top-up screen ignored");
                Ok(())
            }
        }
    }

    async fn handle_submit(&mut self, clock: &dyn Clock) -> Result<()> {
        let order = match &self.screen {
            ScreenState::TopUp(composer) => composer.try_submit()?,
            _ => {
                tracing::debug!("submit outside top-up screen ignored");
                return Ok(());
            }
        };
        tracing::info!(country = %order.country, total = %order.total, "order submitted");
        self.slot.write(order).await?;
        self.enter_processing(clock).await
    }

    async fn handle_confirm(&mut self) -> Result<()> {
        let decision = match &self.screen {
            ScreenState::Payment(decision) => *decision,
            _ => {
                tracing::debug!("confirm outside payment screen ignored");
                return Ok(());
            }
        };
        if decision.route() != PaymentRoute::Direct {
            tracing::warn!(shortfall = %decision.shortfall, "confirm unavailable, balance short");
            return Ok(());
        }
        // Point-in-time snapshot: the balance is not re-validated here.
        self.session.debit(decision.total);
        self.slot.clear().await?;
        tracing::info!(balance = %self.session.balance.value(), "order settled from balance");
        self.enter_topup();
        Ok(())
    }

    async fn handle_recharge(&mut self) -> Result<()> {
        match &self.screen {
            ScreenState::Payment(decision) if decision.route() == PaymentRoute::CryptoTopUp => {
                self.enter_crypto().await
            }
            ScreenState::Payment(_) => {
                tracing::debug!("recharge not needed, balance covers total");
                Ok(())
            }
            _ => {
                tracing::debug!("recharge outside payment screen ignored");
                Ok(())
            }
        }
    }

    async fn handle_back(&mut self) -> Result<()> {
        match self.screen {
            // Crypto settlement backs out to the payment decision; the
            // payment screen backs out to the composer. The slot stays put.
            ScreenState::CryptoPayment(_) => self.enter_payment().await,
            ScreenState::Payment(_) => {
                self.enter_topup();
                Ok(())
            }
            _ => {
                tracing::debug!("back ignored on this screen");
                Ok(())
            }
        }
    }

    async fn handle_copy(&mut self, clock: &dyn Clock) -> Result<()> {
        let ack = Duration::from_millis(self.config.timing.copy_ack_ms);
        match &mut self.screen {
            ScreenState::CryptoPayment(settlement) => {
                let address = settlement.copy_address().to_string();
                tracing::info!(address = %address, "wallet address copied");
                clock.sleep(ack).await;
                settlement.clear_copied();
                Ok(())
            }
            _ => {
                tracing::debug!("copy outside crypto screen ignored");
                Ok(())
            }
        }
    }

    async fn handle_txid(&mut self, txid: &str, clock: &dyn Clock) -> Result<()> {
        let delay = Duration::from_millis(self.config.timing.verify_delay_ms);
        match &mut self.screen {
            ScreenState::CryptoPayment(settlement) => {
                if settlement.submit_txid(txid) {
                    settlement.verify(clock, delay).await;
                } else if let Some(error) = settlement.error() {
                    tracing::warn!(error, "transaction id rejected");
                }
                Ok(())
            }
            _ => {
                tracing::debug!("txid outside crypto screen ignored");
                Ok(())
            }
        }
    }

    fn handle_mark_paid(&mut self) -> Result<()> {
        match &mut self.screen {
            ScreenState::CryptoPayment(settlement) => {
                if settlement.mark_paid() {
                    tracing::info!("payment self-attested");
                } else {
                    tracing::debug!("mark-paid ignored");
                }
                Ok(())
            }
            _ => {
                tracing::debug!("mark-paid outside crypto screen ignored");
                Ok(())
            }
        }
    }

    async fn handle_done(&mut self) -> Result<()> {
        match &self.screen {
            ScreenState::CryptoPayment(settlement) if settlement.is_verified() => {
                self.slot.clear().await?;
                tracing::info!("crypto settlement complete");
                self.enter_topup();
                Ok(())
            }
            ScreenState::CryptoPayment(_) => {
                tracing::debug!("done ignored, settlement not verified");
                Ok(())
            }
            _ => {
                tracing::debug!("done outside crypto screen ignored");
                Ok(())
            }
        }
    }

    /// Fresh composer; any previous draft is abandoned.
    fn enter_topup(&mut self) {
        self.screen = ScreenState::TopUp(OrderComposer::new(self.config.max_link_amount));
    }

    async fn enter_processing(&mut self, clock: &dyn Clock) -> Result<()> {
        if !self.guard_order_present().await? {
            return Ok(());
        }
        let interval = Duration::from_millis(self.config.timing.step_interval_ms);
        self.screen = ScreenState::Processing(ProcessingSimulator::new());
        if let ScreenState::Processing(simulator) = &mut self.screen {
            simulator.run(clock, interval).await;
        }
        // Processing always succeeds and hands off to the payment decision.
        self.enter_payment().await
    }

    async fn enter_payment(&mut self) -> Result<()> {
        let Some(order) = self.guarded_order().await? else {
            return Ok(());
        };
        let decision = PaymentDecision::evaluate(&order, self.session.balance);
        tracing::info!(
            total = %decision.total,
            shortfall = %decision.shortfall,
            route = ?decision.route(),
            "payment decision"
        );
        self.screen = ScreenState::Payment(decision);
        Ok(())
    }

    async fn enter_crypto(&mut self) -> Result<()> {
        let Some(order) = self.guarded_order().await? else {
            return Ok(());
        };
        let settlement = CryptoSettlement::new(
            self.config.settlement,
            self.config.wallet_address.clone(),
            &order,
            self.session.balance,
        );
        tracing::info!(shortfall = %settlement.shortfall(), "entering crypto settlement");
        self.screen = ScreenState::CryptoPayment(settlement);
        Ok(())
    }

    /// Entry guard shared by every post-composition screen: without a stored
    /// order the flow silently falls back to the composer.
    async fn guarded_order(&mut self) -> Result<Option<Order>> {
        match self.slot.read().await? {
            Some(order) => Ok(Some(order)),
            None => {
                tracing::debug!("no active order, redirecting to top-up");
                self.enter_topup();
                Ok(None)
            }
        }
    }

    async fn guard_order_present(&mut self) -> Result<bool> {
        Ok(self.guarded_order().await?.is_some())
    }
}

fn link_id(composer: &OrderComposer, row: usize) -> Result<u64> {
    row.checked_sub(1)
        .and_then(|index| composer.link_id_at(index))
        .ok_or_else(|| TopUpError::InvalidEvent(format!("no link row {row}")))
}
