//! The dynamically-typed value model.
//!
//! This module defines [`Value`], the closed sum type every codec encodes
//! from and decodes into, and [`ValueKind`], its discriminant used in
//! diagnostics and fidelity reporting.

mod value;

pub use value::{Value, ValueKind};
