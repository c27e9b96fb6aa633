use super::order::Order;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Session-scoped single-slot persistence for the in-flight order.
///
/// `write` overwrites unconditionally; every downstream step calls `read`
/// first and treats absence as an expired flow.
#[async_trait]
pub trait TransactionSlot: Send + Sync {
    async fn write(&self, order: Order) -> Result<()>;
    async fn read(&self) -> Result<Option<Order>>;
    async fn clear(&self) -> Result<()>;
}

/// Injectable time source for timer-driven transitions, so tests and script
/// replay can advance logical time without waiting on real delays.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub type TransactionSlotBox = Box<dyn TransactionSlot>;
pub type ClockBox = Box<dyn Clock>;
