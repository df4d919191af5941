//! The per-script BiLSTM inference engine.
//!
//! [`LstmBreakEngine`] runs a backward LSTM pass over a same-script run,
//! then a forward pass fused with the dense output layer, decoding one
//! BIES label per code point and reporting word boundaries through a
//! callback. See [`breaker`] for the decoding contract.

mod breaker;
mod cell;

pub use breaker::{BiesLabel, LstmBreakEngine, MAX_RUN_LEN};
