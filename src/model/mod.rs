//! Manuscript model.
//!
//! This module defines the types that flow between the input readers, the
//! structure classifier, the title normalizer and the book renderers.

mod metadata;
mod structure;
mod unit;

pub use metadata::*;
pub use structure::*;
pub use unit::*;
