//! Domain layer: the session, order, and derived payment values, plus the
//! ports the application layer depends on.

pub mod order;
pub mod ports;
pub mod session;
