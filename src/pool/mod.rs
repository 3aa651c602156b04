//! Pending Trade Queue Module
//!
//! This module manages the buffer of accepted trades awaiting batching.
//! Trades accumulate here between flushes; a flush detaches the entire
//! contents in one atomic swap.

mod trade_queue;

pub use trade_queue::TradeQueue;
