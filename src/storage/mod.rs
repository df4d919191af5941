//! Model persistence: the binary `.seab` container and ICU JSON import.

mod format;
mod json;

pub use format::ModelFormat;
pub use json::{import_weights, parse_weights};
