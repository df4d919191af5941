//! Numeric primitives for LSTM inference.
//!
//! Two kinds of storage back the engine:
//!
//! - **Borrowed views** ([`MatrixView`], plain `&[f32]`) index into the
//!   model blob without owning or copying it, so weights can come straight
//!   from memory-mapped files.
//! - **Owned buffers** ([`Matrix`], plain `Vec<f32>`) hold per-call working
//!   memory and are released when the call returns.
//!
//! The elementwise and matrix-vector kernels in [`ops`] operate on slices,
//! so both kinds share them. Shape agreement is checked in debug builds.

mod matrix;
pub mod ops;

pub use matrix::{Matrix, MatrixView};
