//! Batch Flush Module
//!
//! This module drains the pending queue into sealed batches and drives each
//! batch through commitment and settlement.

mod flusher;


pub use flusher::BatchFlusher;
