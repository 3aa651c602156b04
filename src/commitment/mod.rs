//! Batch Commitment Module
//!
//! This module derives the fixed-size commitment digest submitted on-chain
//! in place of a batch's full trade list.

mod merkle;

pub use merkle::{leaf_hash, merkle_root};
