//! Trade Intake Module
//!
//! This module screens incoming trades against the capacity oracle before
//! they enter the pending queue, and signals the flush worker when the
//! queue crosses the batch threshold.

mod validator;

pub use validator::TradeIntake;
