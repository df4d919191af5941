//! # Seabreak - South-East-Asian word-boundary detection
//!
//! Seabreak finds the positions at which a line break may be taken in
//! Thai, Lao, Burmese and Khmer text, scripts that do not separate words
//! with whitespace. Detection is driven by the published Unicode BiLSTM
//! segmentation models: a bidirectional LSTM classifies every code point
//! with a BIES label (Begin/Inside/End/Single) and a break is reported
//! before every Begin and Single.
//!
//! ## Overview
//!
//! A caller hands the dispatcher a code-point buffer and a range. The
//! range is cut into maximal same-script chunks; each chunk of a supported
//! script runs through that script's engine, and everything else is left
//! to the caller's own line-break logic. Engines are built once per
//! process and are immutable afterwards, so calls can run concurrently.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use seabreak::{ModelPaths, Registry};
//!
//! // Memory-map the four trained models.
//! let registry = Registry::from_paths(&ModelPaths::from_dir("models"))?;
//!
//! let text: Vec<char> = "สวัสดีครับ".chars().collect();
//! let breaks = registry.breaks(&text, 0, text.len())?;
//! assert_eq!(breaks, vec![6]);
//! ```
//!
//! ## Architecture
//!
//! - [`math`] - Array views, owned buffers and the numeric kernels
//! - [`model`] - Model data: dimensions, code-point mapping, weight blob
//! - [`engine`] - The BiLSTM inference engine and BIES decoding
//! - [`script`] - Script classification by Unicode range
//! - [`dispatch`] - Chunking by script and per-script engine dispatch
//! - [`storage`] - Binary model container and ICU JSON import
//!
//! ## Model data
//!
//! The trained weights are external artifacts. Convert ICU's per-script
//! `weights.json` files once with the bundled CLI (`seabreak convert`)
//! and load the resulting `.seab` files at startup.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::needless_return)]

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod math;
pub mod model;
pub mod script;
pub mod storage;

// Re-export commonly used types
pub use config::ModelPaths;
pub use dispatch::{break_line, global, install, Registry};
pub use engine::{BiesLabel, LstmBreakEngine, MAX_RUN_LEN};
pub use error::{Result, SeabreakError};
pub use model::{CodepointMap, LstmModel, MapRange};
pub use script::Script;
pub use storage::{import_weights, ModelFormat};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
