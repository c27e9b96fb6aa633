//! Application layer: the order lifecycle state machine.
//!
//! `FlowController` is the entry point; it owns the session and the
//! transaction slot and routes events to the per-screen components.

pub mod composer;
pub mod flow;
pub mod payment;
pub mod processing;
pub mod settlement;
