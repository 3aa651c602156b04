//! API Module
//!
//! This module exposes the HTTP surface of the oracle: trade submission and
//! queue status. Transport framing only; all screening and batching logic
//! lives behind `TradeIntake`.

mod server;
pub use server::Server;
